//! Anthropic Messages client for the optional narrative endpoint.
//!
//! Scores and reports are computed without it; the model only elaborates on
//! a finished report and must answer with a single JSON object.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("service unavailable after {attempts} attempts (last status {status})")]
    Unavailable { attempts: u32, status: u16 },

    #[error("reply was not the expected JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("reply contained no JSON object")]
    NoJson,
}

/// One structured request: a system role, a user prompt and an output cap.
#[derive(Debug, Clone, Copy)]
pub struct Brief<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Turn<'a>; 1],
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    #[serde(default)]
    content: Vec<Block>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl MessagesReply {
    /// All text blocks joined in order.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                Block::Text { text } => Some(text.as_str()),
                Block::Other => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Outcome of a single HTTP exchange.
enum Attempt {
    Done(MessagesReply),
    Retry(StatusCode),
    Fail(LlmError),
}

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, MESSAGES_URL)
    }

    pub fn with_endpoint(api_key: String, endpoint: &str) -> Result<Self, LlmError> {
        Ok(Self {
            http: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            endpoint: endpoint.to_string(),
        })
    }

    /// Sends `brief` and decodes the JSON object in the reply as `T`.
    /// Overload and 5xx answers are retried with doubling backoff; any other
    /// non-success status fails immediately.
    pub async fn structured<T: DeserializeOwned>(&self, brief: Brief<'_>) -> Result<T, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: brief.max_tokens,
            system: brief.system,
            messages: [Turn {
                role: "user",
                content: brief.prompt,
            }],
        };

        let mut last_status = StatusCode::SERVICE_UNAVAILABLE;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.send_once(&body).await {
                Attempt::Done(reply) => {
                    let text = reply.text();
                    debug!(attempt, chars = text.len(), "narrative reply received");
                    let payload = json_object(&text).ok_or(LlmError::NoJson)?;
                    return Ok(serde_json::from_str(payload)?);
                }
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(status) => {
                    last_status = status;
                    if attempt < MAX_ATTEMPTS {
                        let delay = BASE_BACKOFF * 2u32.pow(attempt - 1);
                        warn!(attempt, %status, delay_ms = delay.as_millis() as u64, "LLM busy, backing off");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(LlmError::Unavailable {
            attempts: MAX_ATTEMPTS,
            status: last_status.as_u16(),
        })
    }

    async fn send_once(&self, body: &MessagesRequest<'_>) -> Attempt {
        let response = match self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() || e.is_connect() => {
                warn!(error = %e, "LLM request did not complete");
                return Attempt::Retry(StatusCode::GATEWAY_TIMEOUT);
            }
            Err(e) => return Attempt::Fail(e.into()),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Attempt::Retry(status);
        }
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorReply>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Attempt::Fail(LlmError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match response.json::<MessagesReply>().await {
            Ok(reply) => Attempt::Done(reply),
            Err(e) => Attempt::Fail(e.into()),
        }
    }
}

/// Slice from the first `{` to the last `}`. Tolerates code fences or a
/// stray sentence around the object.
fn json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
