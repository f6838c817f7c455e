//! Reassembly of per-chunk audio files into the final artifact.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::chunk_path;

#[derive(Error, Debug)]
pub enum CombineError {
    /// A chunk file the synthesizer should have produced is missing or
    /// unreadable. Not retried; it means the chunk numbering went wrong
    /// upstream or someone removed a file mid-run.
    #[error("audio chunk {path} is missing or unreadable: {source}")]
    MissingChunk {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write combined audio: {0}")]
    Export(std::io::Error),
}

/// Combine chunk files `part1..partN` for `output` into a single file.
///
/// Chunks are loaded in numeric order and appended to an in-memory buffer;
/// MPEG audio frames are self-delimiting, so same-encoder MP3 streams
/// concatenate without re-encoding. The output file is written only after
/// every chunk has loaded, then all chunk files are removed (best-effort).
///
/// On a load failure nothing is deleted and no output is written, so the
/// remaining chunk files stay on disk for inspection.
pub fn combine_chunks(output: &Path, num_chunks: usize) -> Result<(), CombineError> {
    let mut combined = Vec::new();
    let mut loaded = Vec::with_capacity(num_chunks);

    for i in 1..=num_chunks {
        let path = chunk_path(output, i);
        let bytes = fs::read(&path).map_err(|source| CombineError::MissingChunk {
            path: path.clone(),
            source,
        })?;
        combined.extend_from_slice(&bytes);
        loaded.push(path);
    }

    fs::write(output, &combined).map_err(CombineError::Export)?;

    for path in loaded {
        let _ = fs::remove_file(path);
    }

    Ok(())
}
