//! OpenAI API provider
//!
//! Direct HTTP implementation for the chat completions endpoint (text
//! cleanup) and the audio speech endpoint (synthesis).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{OpenAiError, Result};
use crate::provider::{ChatProvider, ChatRequest, ChatResponse, SpeechProvider, TokenUsage};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Provider for direct OpenAI API calls.
///
/// Implements both the chat side (cleanup) and the speech side (TTS) so a
/// single credential covers the whole pipeline.
pub struct OpenAiProvider {
    chat_model: String,
    speech_model: String,
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiProvider {
    /// Create a new provider with an explicit API key.
    pub fn new(chat_model: &str, speech_model: &str, api_key: String) -> Result<Self> {
        let client = Client::new();

        Ok(Self {
            chat_model: chat_model.to_string(),
            speech_model: speech_model.to_string(),
            base_url: OPENAI_API_URL.to_string(),
            api_key,
            client,
        })
    }

    /// Create a provider from the `OPENAI_API_KEY` environment variable.
    ///
    /// Fails before any work begins when the key is absent.
    pub fn from_env(chat_model: &str, speech_model: &str) -> Result<Self> {
        let api_key =
            std::env::var(API_KEY_ENV_VAR).map_err(|_| OpenAiError::MissingApiKey {
                env_var: API_KEY_ENV_VAR.to_string(),
            })?;
        Self::new(chat_model, speech_model, api_key)
    }

    /// Override the base URL (proxies, compatible servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Map a non-success HTTP response to an error, parsing the OpenAI
    /// error envelope when present.
    async fn error_from_response(response: reqwest::Response) -> OpenAiError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let error_text = response.text().await.unwrap_or_default();
        let message = if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(&error_text) {
            envelope.error.message
        } else {
            error_text
        };

        match status.as_u16() {
            429 => OpenAiError::RateLimited { retry_after },
            503 => OpenAiError::ServerOverloaded { message },
            code => OpenAiError::ApiError {
                message,
                status_code: Some(code),
            },
        }
    }
}

// OpenAI API request/response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SpeechRequest {
    model: String,
    input: String,
    voice: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let mut messages = Vec::new();

        if let Some(system) = &request.system_prompt {
            messages.push(Message {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        messages.push(Message {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        let chat_request = ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages,
            response_format: request
                .json_response
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| OpenAiError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let chat_response: ChatCompletionResponse =
            response.json().await.map_err(|e| OpenAiError::ApiError {
                message: format!("Failed to parse response: {}", e),
                status_code: None,
            })?;

        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        let usage = chat_response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(ChatResponse {
            content,
            model: self.chat_model.clone(),
            usage,
        })
    }

    fn name(&self) -> &'static str {
        "OpenAI chat"
    }
}

#[async_trait]
impl SpeechProvider for OpenAiProvider {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let speech_request = SpeechRequest {
            model: self.speech_model.clone(),
            input: text.to_string(),
            voice: voice.to_string(),
        };

        let url = format!("{}/audio/speech", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&speech_request)
            .send()
            .await
            .map_err(|e| OpenAiError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let bytes = response.bytes().await.map_err(|e| OpenAiError::ApiError {
            message: format!("Failed to read audio bytes: {}", e),
            status_code: None,
        })?;

        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "OpenAI speech"
    }
}
