//! Mock providers for testing
//!
//! Configurable mocks that can simulate failures, retries, and successful
//! responses for both the chat and speech sides.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{OpenAiError, Result};
use crate::provider::{ChatProvider, ChatRequest, ChatResponse, SpeechProvider};

/// A mock chat provider for testing retry and fallback behavior
pub struct MockChatProvider {
    /// Number of times to fail before succeeding (0 = always succeed)
    fail_count: AtomicUsize,
    /// Current call count
    call_count: AtomicUsize,
    /// Error to return on failure (None = always succeed)
    fail_with: Mutex<Option<OpenAiError>>,
    /// Response content to return on success
    success_response: String,
}

impl MockChatProvider {
    /// Create a provider that fails `n` times with the given error, then succeeds
    pub fn fails_then_succeeds(n: usize, error: OpenAiError, response: &str) -> Self {
        Self {
            fail_count: AtomicUsize::new(n),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            success_response: response.to_string(),
        }
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: OpenAiError) -> Self {
        Self {
            fail_count: AtomicUsize::new(usize::MAX),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(Some(error)),
            success_response: String::new(),
        }
    }

    /// Create a provider that always succeeds with the given content
    pub fn always_succeeds(response: &str) -> Self {
        Self {
            fail_count: AtomicUsize::new(0),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            success_response: response.to_string(),
        }
    }

    /// Get the number of times complete() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        let fail_count = self.fail_count.load(Ordering::SeqCst);

        if call_num < fail_count {
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        Ok(ChatResponse {
            content: self.success_response.clone(),
            model: "mock-model".to_string(),
            usage: None,
        })
    }

    fn name(&self) -> &'static str {
        "mock chat"
    }
}

/// A mock speech provider that echoes the input text as audio bytes.
///
/// Echoing makes each synthesized chunk byte-distinguishable, so tests can
/// assert ordering in the combined artifact.
pub struct MockSpeechProvider {
    /// 1-based call index that fails (None = always succeed)
    fail_on_call: Option<usize>,
    fail_with: Mutex<Option<OpenAiError>>,
    calls: Mutex<Vec<String>>,
}

impl MockSpeechProvider {
    /// Create a provider that always succeeds, returning the input text bytes
    pub fn echo() -> Self {
        Self {
            fail_on_call: None,
            fail_with: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that fails on the `n`-th call (1-based)
    pub fn fails_on_call(n: usize, error: OpenAiError) -> Self {
        Self {
            fail_on_call: Some(n),
            fail_with: Mutex::new(Some(error)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Get the texts passed to synthesize(), in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>> {
        let call_num = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            calls.len()
        };

        if self.fail_on_call == Some(call_num) {
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        Ok(text.as_bytes().to_vec())
    }

    fn name(&self) -> &'static str {
        "mock speech"
    }
}

/// Clone an OpenAiError (needed because OpenAiError doesn't implement Clone)
fn clone_error(err: &OpenAiError) -> OpenAiError {
    match err {
        OpenAiError::MissingApiKey { env_var } => OpenAiError::MissingApiKey {
            env_var: env_var.clone(),
        },
        OpenAiError::RateLimited { retry_after } => OpenAiError::RateLimited {
            retry_after: *retry_after,
        },
        OpenAiError::ServerOverloaded { message } => OpenAiError::ServerOverloaded {
            message: message.clone(),
        },
        OpenAiError::ApiError {
            message,
            status_code,
        } => OpenAiError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        OpenAiError::ConfigError(s) => OpenAiError::ConfigError(s.clone()),
        // Io errors can't be cloned; substitute a generic error
        OpenAiError::Io(_) => OpenAiError::ConfigError("IO error (mock)".to_string()),
    }
}
