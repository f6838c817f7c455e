//! Pre-run cost estimation for the cleanup and synthesis stages.
//!
//! Displayed to the user before any money is spent. The chunk count here is
//! a fixed-size division for display only; the chunker's sentence-aware
//! output can differ on non-uniform sentence lengths.

use crate::config::NarratorConfig;

/// Approximate characters per token for English text.
const CHARS_PER_TOKEN: usize = 4;

/// Cost projection for one run, derived deterministically from the text
/// and the configured rates.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    /// Character count of the input text
    pub characters: usize,
    /// Estimated token count (characters / 4, rounded up)
    pub tokens: usize,
    /// Approximate number of synthesis chunks (fixed-size division)
    pub chunks: usize,
    /// Cleanup-stage cost in dollars, rounded to 3 decimal places
    pub gpt_cost: f64,
    /// Synthesis-stage cost in dollars, rounded to 2 decimal places
    pub tts_cost: f64,
    /// Sum of the rounded stage costs, rounded to 2 decimal places
    pub total_cost: f64,
}

/// Estimate the cost of processing `text` with the configured rates.
///
/// Pure function of the text and the config; never mutates either.
pub fn estimate(text: &str, config: &NarratorConfig) -> CostEstimate {
    let characters = text.chars().count();
    let tokens = characters.div_ceil(CHARS_PER_TOKEN);
    let chunks = characters.div_ceil(config.tts_chunk_size);

    let gpt_cost = round_to(
        tokens as f64 / 1000.0 * config.cleanup_rate_per_1k_tokens,
        3,
    );
    let tts_cost = round_to(
        characters as f64 / 1000.0 * config.synthesis_rate_per_1k_chars,
        2,
    );
    let total_cost = round_to(gpt_cost + tts_cost, 2);

    CostEstimate {
        characters,
        tokens,
        chunks,
        gpt_cost,
        tts_cost,
        total_cost,
    }
}

/// Round to a fixed number of decimal places for display.
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NarratorConfig {
        NarratorConfig::default()
    }

    #[test]
    fn counts_and_costs_for_known_text() {
        // 8000 characters at the default rates: 2000 tokens, 2 chunks,
        // $0.002 cleanup, $0.12 synthesis.
        let text = "a".repeat(8000);
        let est = estimate(&text, &config());

        assert_eq!(est.characters, 8000);
        assert_eq!(est.tokens, 2000);
        assert_eq!(est.chunks, 2);
        assert_eq!(est.gpt_cost, 0.002);
        assert_eq!(est.tts_cost, 0.12);
        assert_eq!(est.total_cost, 0.12);
    }

    #[test]
    fn token_count_rounds_up() {
        let est = estimate("abcde", &config());
        assert_eq!(est.characters, 5);
        assert_eq!(est.tokens, 2);
        assert_eq!(est.chunks, 1);
    }

    #[test]
    fn chunk_count_is_fixed_size_division() {
        // 50,000 characters / 4000 per chunk = 13 chunks, rounded up.
        let text = "Sentence. ".repeat(5000);
        let est = estimate(&text, &config());
        assert_eq!(est.chunks, 13);
    }

    #[test]
    fn is_pure() {
        let text = "Some sample text. With a few sentences. For estimation.";
        let first = estimate(text, &config());
        let second = estimate(text, &config());
        assert_eq!(first, second);
    }

    #[test]
    fn total_is_rounded_sum_of_stage_costs() {
        let text = "t".repeat(123_456);
        let est = estimate(&text, &config());

        let expected = (est.gpt_cost + est.tts_cost) * 100.0;
        assert_eq!(est.total_cost, expected.round() / 100.0);
    }

    #[test]
    fn empty_text_costs_nothing() {
        let est = estimate("", &config());
        assert_eq!(est.characters, 0);
        assert_eq!(est.tokens, 0);
        assert_eq!(est.chunks, 0);
        assert_eq!(est.total_cost, 0.0);
    }
}
