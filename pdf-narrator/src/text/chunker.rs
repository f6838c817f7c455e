//! Sentence-boundary text chunking for API calls.
//!
//! Both the cleanup and synthesis stages call external APIs with a per-call
//! size limit; this module partitions long text into bounded chunks without
//! cutting sentences in half.

/// Sentence boundary used for splitting.
const SENTENCE_BOUNDARY: &str = ". ";

/// Split text into chunks of at most `max_length` characters, preserving
/// sentence boundaries.
///
/// Text that already fits is returned as a single chunk, unchanged. Longer
/// text is split on `". "`; sentences accumulate into a running chunk
/// (separator re-appended) until adding the next one would exceed the
/// limit. A single sentence longer than `max_length` becomes its own
/// oversized chunk; no splitting happens inside a sentence. Text with no
/// `". "` occurrence therefore yields exactly one chunk regardless of the
/// limit.
///
/// Deterministic: identical input always yields the identical sequence.
pub fn split_text(text: &str, max_length: usize) -> Vec<String> {
    if text.len() <= max_length {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in text.split(SENTENCE_BOUNDARY) {
        if current.len() + sentence.len() + SENTENCE_BOUNDARY.len() > max_length
            && !current.is_empty()
        {
            chunks.push(current);
            current = String::new();
        }
        current.push_str(sentence);
        current.push_str(SENTENCE_BOUNDARY);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_returned_unchanged() {
        let text = "Hello world. This is a test.";
        let chunks = split_text(text, 1000);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn exact_fit_returned_unchanged() {
        let text = "abc";
        let chunks = split_text(text, 3);
        assert_eq!(chunks, vec!["abc".to_string()]);
    }

    #[test]
    fn long_text_splits_on_sentence_boundaries() {
        let text = "First sentence. Second sentence. Third sentence. Fourth sentence.";
        let chunks = split_text(text, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.ends_with(SENTENCE_BOUNDARY));
        }
    }

    #[test]
    fn never_emits_empty_chunks() {
        let text = "One. Two. Three. Four. Five. Six. Seven. Eight. Nine. Ten.";
        let chunks = split_text(text, 12);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn concatenation_reconstructs_text() {
        let text = "The quick brown fox. Jumped over the lazy dog. Then it ran away. \
                    It was never seen again. The end came quickly.";
        let chunks = split_text(text, 60);
        assert!(chunks.len() > 1);

        // Chunks carry the re-appended ". " separator; stripping the final
        // one recovers the source text.
        let joined = chunks.concat();
        assert_eq!(joined.trim_end_matches(SENTENCE_BOUNDARY), text);
    }

    #[test]
    fn oversized_sentence_becomes_its_own_chunk() {
        let long = "x".repeat(100);
        let text = format!("Short one. {}. Short two.", long);
        let chunks = split_text(&text, 50);

        assert!(chunks.iter().any(|c| c.len() > 50), "oversized sentence kept whole");
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn text_without_boundary_yields_single_chunk() {
        let text = "word ".repeat(100);
        let chunks = split_text(&text, 20);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn repeated_sentences_fill_chunks_to_the_limit() {
        // 5000 units of "Sentence. " = 50,000 characters.
        let text = "Sentence. ".repeat(5000);
        let chunks = split_text(&text, 4000);

        assert_eq!(chunks.len(), 13);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.len(), 4000);
        }
        assert!(chunks.last().unwrap().len() <= 4000);
    }

    #[test]
    fn deterministic_output() {
        let text = "Alpha beta. Gamma delta. Epsilon zeta. Eta theta. Iota kappa.";
        assert_eq!(split_text(text, 25), split_text(text, 25));
    }
}
