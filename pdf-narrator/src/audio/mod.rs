//! Audio synthesis and chunk reassembly.

pub mod combiner;
pub mod synthesizer;

use std::path::{Path, PathBuf};

/// Path of the `i`-th intermediate chunk file for `output` (1-based).
///
/// The synthesizer writes these and the combiner reads them back; both
/// sides must derive the name from here or the numbering desynchronizes.
pub fn chunk_path(output: &Path, index: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = output
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    output.with_file_name(format!("{}_part{}{}", stem, index, ext))
}
