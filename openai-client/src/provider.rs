use async_trait::async_trait;

use crate::error::Result;

/// Request to send to a chat provider.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    /// Ask the API to return a JSON object instead of free text.
    pub json_response: bool,
}

/// Response from a chat provider.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Trait for chat-completion providers (the text-cleanup stage).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Execute a completion request
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}

/// Trait for speech-synthesis providers (the TTS stage).
///
/// A call returns the raw encoded audio bytes for one text chunk.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize `text` with the given voice, returning encoded audio bytes.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}
