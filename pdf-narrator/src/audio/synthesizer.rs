//! Per-chunk speech synthesis.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use openai_client::SpeechProvider;
use std::fs;
use std::path::Path;

use super::{chunk_path, combiner};
use crate::text::chunker::split_text;

/// Synthesize `text` to a single audio file at `output`.
///
/// Text over `max_chunk` characters is split at sentence boundaries; each
/// chunk becomes one synthesis call. A single chunk is written straight to
/// `output`; multiple chunks go to numbered part files (same numbering the
/// combiner reads back) and are combined afterwards. Chunks are processed
/// strictly in order, and a failure on any chunk aborts the run before a
/// final artifact exists.
pub async fn synthesize_to_file(
    speech: &dyn SpeechProvider,
    text: &str,
    output: &Path,
    voice: &str,
    max_chunk: usize,
) -> Result<()> {
    let chunks = split_text(text, max_chunk);

    if chunks.len() == 1 {
        eprintln!("Converting text to speech...");
        let bytes = speech
            .synthesize(&chunks[0], voice)
            .await
            .context("Speech synthesis failed")?;
        fs::write(output, bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        return Ok(());
    }

    eprintln!("Converting text to speech in {} chunks...", chunks.len());

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    for (i, chunk) in chunks.iter().enumerate() {
        let part = chunk_path(output, i + 1);
        let bytes = speech
            .synthesize(chunk, voice)
            .await
            .with_context(|| format!("Speech synthesis failed on chunk {}", i + 1))?;
        fs::write(&part, bytes)
            .with_context(|| format!("Failed to write {}", part.display()))?;
        pb.inc(1);
    }

    pb.finish_and_clear();

    combiner::combine_chunks(output, chunks.len()).context("Failed to combine audio chunks")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use openai_client::{MockSpeechProvider, OpenAiError};
    use tempfile::TempDir;

    #[tokio::test]
    async fn single_chunk_writes_directly() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.mp3");
        let speech = MockSpeechProvider::echo();

        synthesize_to_file(&speech, "Hello world. This is a test.", &output, "alloy", 1000)
            .await
            .unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"Hello world. This is a test.");
        assert_eq!(speech.call_count(), 1);
        assert!(!chunk_path(&output, 1).exists());
    }

    #[tokio::test]
    async fn multiple_chunks_are_combined_in_order() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.mp3");
        let speech = MockSpeechProvider::echo();
        let text = "First sentence here. Second sentence here. Third sentence here.";

        synthesize_to_file(&speech, text, &output, "alloy", 25).await.unwrap();

        let calls = speech.calls();
        assert!(calls.len() >= 3);

        // The echo mock makes the artifact the chunk texts back to back,
        // so order and completeness are both visible in the bytes.
        let combined = fs::read(&output).unwrap();
        assert_eq!(combined, calls.concat().into_bytes());

        for i in 1..=calls.len() {
            assert!(!chunk_path(&output, i).exists(), "part{} left behind", i);
        }
    }

    #[tokio::test]
    async fn chunk_failure_aborts_without_final_artifact() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.mp3");
        let speech = MockSpeechProvider::fails_on_call(
            2,
            OpenAiError::ServerOverloaded {
                message: "busy".to_string(),
            },
        );
        let text = "First sentence here. Second sentence here. Third sentence here.";

        let result = synthesize_to_file(&speech, text, &output, "alloy", 25).await;

        assert!(result.is_err());
        assert!(!output.exists(), "no artifact from an incomplete chunk set");
        assert_eq!(speech.call_count(), 2, "later chunks are not attempted");
    }
}
