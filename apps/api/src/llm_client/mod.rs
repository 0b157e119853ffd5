//! Anthropic Messages API client used by the AI profile analyzer.
//!
//! Nothing else in the service talks to the model provider directly. The
//! only entry point is [`LlmClient::call_json`]: profile extraction always
//! wants one JSON object back, so free-text replies are not exposed.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
/// A full profile with five roles and long descriptions fits well inside this.
const MAX_TOKENS: u32 = 4096;
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("could not reach the model provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// 4xx other than 429; retrying the same request will not help.
    #[error("model provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("model provider still failing after {attempts} attempts (last status {last_status})")]
    Exhausted { attempts: u32, last_status: u16 },

    #[error("reply hit the token limit before the JSON was complete")]
    Truncated,

    #[error("reply had no text block")]
    NoText,

    #[error("reply was not the expected JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    /// Extraction should be repeatable for the same document.
    temperature: f32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Result of one HTTP attempt.
enum Attempt {
    Done(MessagesResponse),
    Retry { status: u16 },
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    /// Sends `prompt` and deserializes the reply as `T`. Markdown fences and
    /// any chatter around the outermost JSON object are ignored.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.send_with_retry(prompt, system).await?;

        if response.stop_reason.as_deref() == Some("max_tokens") {
            return Err(LlmError::Truncated);
        }
        let text = response
            .content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text.as_deref())
            .ok_or(LlmError::NoText)?;

        Ok(serde_json::from_str(json_payload(text))?)
    }

    /// Retries 429s, 5xx and transport failures with 1s/2s backoff.
    async fn send_with_retry(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<MessagesResponse, LlmError> {
        let request = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_status = 0;
        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                let delay = backoff(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying LLM call");
                tokio::time::sleep(delay).await;
            }

            match self.send_once(&request).await {
                Ok(Attempt::Done(response)) => {
                    debug!(
                        attempt,
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "LLM call succeeded"
                    );
                    return Ok(response);
                }
                Ok(Attempt::Retry { status }) => last_status = status,
                Err(LlmError::Transport(e)) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %e, "LLM transport error");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
            last_status,
        })
    }

    async fn send_once(&self, request: &MessagesRequest<'_>) -> Result<Attempt, LlmError> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(Attempt::Done(response.json().await?));
        }

        let body = response.text().await.unwrap_or_default();
        if is_retryable(status) {
            warn!(status = status.as_u16(), %body, "LLM API error");
            return Ok(Attempt::Retry {
                status: status.as_u16(),
            });
        }

        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        Err(LlmError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Delay before attempt `attempt` (1-based); attempt 2 waits 1s, 3 waits 2s.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(2))
}

/// The JSON object inside a model reply: the span from the first `{` to
/// the last `}`. Replies without braces are returned trimmed so the parse
/// error names the real content.
fn json_payload(reply: &str) -> &str {
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_payload_strips_fences() {
        let reply = "```json\n{\"full_name\": \"Jane\"}\n```";
        assert_eq!(json_payload(reply), "{\"full_name\": \"Jane\"}");
        assert_eq!(json_payload("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_json_payload_ignores_surrounding_prose() {
        let reply = "Here is the profile:\n{\"skills\": [\"Rust\"], \"education\": [{\"year\": \"2016\"}]}\nLet me know!";
        assert_eq!(
            json_payload(reply),
            "{\"skills\": [\"Rust\"], \"education\": [{\"year\": \"2016\"}]}"
        );
    }

    #[test]
    fn test_json_payload_unterminated_or_bare() {
        assert_eq!(json_payload("```json\n{\"full_name\": "), "```json\n{\"full_name\":");
        assert_eq!(json_payload("  {}  "), "{}");
        assert_eq!(json_payload(" no json here "), "no json here");
    }

    #[test]
    fn test_retry_policy() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));

        assert_eq!(backoff(2), Duration::from_secs(1));
        assert_eq!(backoff(3), Duration::from_secs(2));
    }

    #[test]
    fn test_text_block_reply_parses_as_profile_json() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"```json\n{\"full_name\":\"Jane Smith\"}\n```"}],
                "stop_reason":"end_turn","usage":{"input_tokens":10,"output_tokens":5}}"#,
        )
        .unwrap();
        let text = response.content[0].text.as_deref().unwrap();
        let value: serde_json::Value = serde_json::from_str(json_payload(text)).unwrap();
        assert_eq!(value["full_name"], "Jane Smith");
    }
}
