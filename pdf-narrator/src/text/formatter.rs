//! Text cleanup via the chat model before synthesis.
//!
//! PDF extraction leaves artifacts (broken lines, repeated headers, page
//! furniture) that read badly when spoken. The cleanup stage sends the text
//! through a chat completion that returns a structured JSON result.

use openai_client::{ChatProvider, ChatRequest, OpenAiError, RetryPolicy};
use serde::Deserialize;
use thiserror::Error;

use super::chunker::split_text;

const SYSTEM_PROMPT: &str = "\
You are a text formatting assistant that prepares text for text-to-speech conversion.
Your task is to format the input text and return a JSON object with the following:
1. A 'formatted_text' field containing the processed text with:
   - Removed duplicate sentences or paragraphs
   - Fixed formatting issues from PDF extraction
   - Proper spacing and punctuation
   - No unnecessary whitespace or special characters
   - Maintained logical flow
   - Important information preserved while removing redundancy
   - Numbers and symbols formatted for better speech output
   - Natural speech-friendly structure

2. A 'statistics' object containing:
   - original_length: number of characters in input
   - formatted_length: number of characters in output
   - removed_duplicates: number of duplicates removed

Ensure your response is a valid JSON object with these fields.";

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("cleanup call failed: {0}")]
    Api(#[from] OpenAiError),

    /// The response body was not the expected JSON structure. Distinct from
    /// transport faults so callers can tell a bad response from a failed one.
    #[error("malformed cleanup response: {0}")]
    MalformedResponse(String),
}

/// Structured result the chat model is instructed to return.
#[derive(Debug, Deserialize)]
struct FormatResponse {
    formatted_text: String,
    statistics: FormatStats,
}

#[derive(Debug, Deserialize)]
struct FormatStats {
    original_length: u64,
    formatted_length: u64,
    removed_duplicates: u64,
}

/// Clean `text` for speech synthesis, one chunk at a time.
///
/// Text over `max_chunk` characters is split at sentence boundaries first;
/// each chunk goes through one retry-wrapped chat call, and the cleaned
/// chunks are rejoined with a single space in original order.
///
/// Failures propagate after the retry policy is exhausted; falling back to
/// the raw text is the caller's decision, never made silently here.
pub async fn format_text(
    chat: &dyn ChatProvider,
    retry: &RetryPolicy,
    text: &str,
    max_chunk: usize,
) -> Result<String, FormatError> {
    let chunks = split_text(text, max_chunk);
    let mut formatted = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        if chunks.len() > 1 {
            eprintln!("Formatting chunk {} of {}", i + 1, chunks.len());
        }
        let cleaned = retry.run(|| format_chunk(chat, chunk)).await?;
        formatted.push(cleaned);
    }

    Ok(formatted.join(" "))
}

/// Run one chunk through the chat model and validate the response shape.
async fn format_chunk(chat: &dyn ChatProvider, chunk: &str) -> Result<String, FormatError> {
    let request = ChatRequest {
        prompt: format!(
            "Please format the following text and return a JSON response with the formatting results: {}",
            chunk
        ),
        system_prompt: Some(SYSTEM_PROMPT.to_string()),
        json_response: true,
    };

    let response = chat.complete(request).await?;

    let parsed: FormatResponse = serde_json::from_str(&response.content)
        .map_err(|e| FormatError::MalformedResponse(e.to_string()))?;

    eprintln!(
        "Cleaned {} -> {} characters, {} duplicates removed",
        parsed.statistics.original_length,
        parsed.statistics.formatted_length,
        parsed.statistics.removed_duplicates
    );

    Ok(parsed.formatted_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openai_client::MockChatProvider;
    use std::time::Duration;

    fn valid_response(text: &str) -> String {
        format!(
            r#"{{"formatted_text": "{}", "statistics": {{"original_length": 10, "formatted_length": 8, "removed_duplicates": 1}}}}"#,
            text
        )
    }

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn returns_cleaned_text() {
        let chat = MockChatProvider::always_succeeds(&valid_response("cleaned"));

        let result = format_text(&chat, &policy(3), "Some raw text.", 4000).await;

        assert_eq!(result.unwrap(), "cleaned");
        assert_eq!(chat.call_count(), 1);
    }

    #[tokio::test]
    async fn long_text_is_chunked_and_rejoined() {
        let chat = MockChatProvider::always_succeeds(&valid_response("part"));
        // Three sentences of ~20 chars with a 30-char limit force multiple calls.
        let text = "First piece of text. Second piece here too. Third piece of text.";

        let result = format_text(&chat, &policy(3), text, 30).await.unwrap();

        assert!(chat.call_count() > 1);
        let expected = vec!["part"; chat.call_count()].join(" ");
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn missing_statistics_is_malformed() {
        let chat = MockChatProvider::always_succeeds(r#"{"formatted_text": "cleaned"}"#);

        let result = format_text(&chat, &policy(1), "Some raw text.", 4000).await;

        match result {
            Err(FormatError::MalformedResponse(msg)) => {
                assert!(msg.contains("statistics"), "unexpected message: {}", msg);
            }
            other => panic!("expected MalformedResponse, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn non_json_response_is_malformed() {
        let chat = MockChatProvider::always_succeeds("I could not do that, sorry.");

        let result = format_text(&chat, &policy(1), "Some raw text.", 4000).await;

        assert!(matches!(result, Err(FormatError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn malformed_response_is_retried_to_exhaustion() {
        let chat = MockChatProvider::always_succeeds(r#"{"formatted_text": "cleaned"}"#);

        let result = format_text(&chat, &policy(3), "Some raw text.", 4000).await;

        assert!(matches!(result, Err(FormatError::MalformedResponse(_))));
        assert_eq!(chat.call_count(), 3);
    }

    #[tokio::test]
    async fn transient_failure_recovers_under_retry() {
        let chat = MockChatProvider::fails_then_succeeds(
            2,
            OpenAiError::ServerOverloaded {
                message: "busy".to_string(),
            },
            &valid_response("recovered"),
        );

        let result = format_text(&chat, &policy(3), "Some raw text.", 4000).await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(chat.call_count(), 3);
    }
}
