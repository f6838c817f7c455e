//! narrate configuration management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// OpenAI list rates as of early 2024: $0.0010 per 1K input tokens for
// gpt-3.5-turbo, $0.015 per 1K characters for tts-1.
const DEFAULT_CLEANUP_RATE: f64 = 0.0010;
const DEFAULT_SYNTHESIS_RATE: f64 = 0.015;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorConfig {
    /// Voice used for speech synthesis
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Chat model used for the optional text-cleanup stage
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Speech model used for synthesis
    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    /// Cleanup cost in dollars per 1K tokens
    #[serde(default = "default_cleanup_rate")]
    pub cleanup_rate_per_1k_tokens: f64,

    /// Synthesis cost in dollars per 1K characters
    #[serde(default = "default_synthesis_rate")]
    pub synthesis_rate_per_1k_chars: f64,

    /// Maximum characters per synthesis call
    #[serde(default = "default_tts_chunk_size")]
    pub tts_chunk_size: usize,

    /// Maximum characters per cleanup call (~12K tokens)
    #[serde(default = "default_cleanup_chunk_size")]
    pub cleanup_chunk_size: usize,

    /// Characters taken from the document in test mode (~400 tokens)
    #[serde(default = "default_test_chunk_size")]
    pub test_chunk_size: usize,

    /// Maximum attempts for a retried API call
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,

    /// Delay between retry attempts, in seconds
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo-1106".to_string()
}

fn default_speech_model() -> String {
    "tts-1".to_string()
}

fn default_cleanup_rate() -> f64 {
    DEFAULT_CLEANUP_RATE
}

fn default_synthesis_rate() -> f64 {
    DEFAULT_SYNTHESIS_RATE
}

fn default_tts_chunk_size() -> usize {
    4000
}

fn default_cleanup_chunk_size() -> usize {
    48_000
}

fn default_test_chunk_size() -> usize {
    1600
}

fn default_max_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_seconds() -> u64 {
    1
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            chat_model: default_chat_model(),
            speech_model: default_speech_model(),
            cleanup_rate_per_1k_tokens: default_cleanup_rate(),
            synthesis_rate_per_1k_chars: default_synthesis_rate(),
            tts_chunk_size: default_tts_chunk_size(),
            cleanup_chunk_size: default_cleanup_chunk_size(),
            test_chunk_size: default_test_chunk_size(),
            max_retry_attempts: default_max_retry_attempts(),
            retry_delay_seconds: default_retry_delay_seconds(),
        }
    }
}

impl NarratorConfig {
    /// Get the config file path: ~/.config/cli-programs/narrate.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("narrate.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: NarratorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NarratorConfig::default();
        assert_eq!(config.voice, "alloy");
        assert_eq!(config.tts_chunk_size, 4000);
        assert_eq!(config.cleanup_chunk_size, 48_000);
        assert_eq!(config.max_retry_attempts, 3);
        assert_eq!(config.retry_delay_seconds, 1);
    }

    #[test]
    fn test_config_path() {
        let path = NarratorConfig::config_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.ends_with("cli-programs/narrate.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
voice = "nova"
tts_chunk_size = 2000
max_retry_attempts = 5
"#;
        let config: NarratorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.voice, "nova");
        assert_eq!(config.tts_chunk_size, 2000);
        assert_eq!(config.max_retry_attempts, 5);
        // Unspecified fields keep their defaults
        assert_eq!(config.chat_model, "gpt-3.5-turbo-1106");
        assert_eq!(config.synthesis_rate_per_1k_chars, 0.015);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: NarratorConfig = toml::from_str("").unwrap();
        assert_eq!(config.voice, "alloy");
        assert_eq!(config.speech_model, "tts-1");
        assert_eq!(config.test_chunk_size, 1600);
    }
}
