//! Provider implementations

pub mod mock;
mod openai;

pub use mock::{MockChatProvider, MockSpeechProvider};
pub use openai::OpenAiProvider;
