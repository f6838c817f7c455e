//! Shared OpenAI client library for the pdf-narrator workspace
//!
//! Provides the two API surfaces the pipeline needs:
//! - Chat completions (text cleanup before synthesis)
//! - Audio speech (text-to-speech, raw MP3 bytes)
//!
//! plus a bounded retry policy and mock providers for testing.

pub mod error;
pub mod provider;
pub mod providers;
pub mod retry;

pub use error::{OpenAiError, Result};
pub use provider::{ChatProvider, ChatRequest, ChatResponse, SpeechProvider, TokenUsage};
pub use providers::{MockChatProvider, MockSpeechProvider, OpenAiProvider};
pub use retry::RetryPolicy;
