//! PDF text extraction.

use anyhow::{Context, Result};
use std::path::Path;

/// Extract the text content of a PDF, pages concatenated in order.
///
/// Fails on unreadable or corrupt files; scanned image-only PDFs come back
/// empty and are rejected by the caller before any API cost is incurred.
pub fn extract_text(path: &Path) -> Result<String> {
    eprintln!("Reading PDF: {}", path.display());

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;

    Ok(text)
}
