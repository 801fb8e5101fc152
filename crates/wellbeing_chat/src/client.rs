//! Assistant backend client.
//!
//! The backend exposes three endpoints below a configurable base URL:
//! `POST /chat`, `POST /reset` and `GET /health`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};

/// Successful reply from the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// Assistant text, used verbatim
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ChatReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            timestamp: None,
            status: None,
        }
    }
}

/// Health endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Error body returned by the backend on 4xx/5xx
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
}

/// Request/response boundary to the remote assistant
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send user text and wait for the assistant's reply
    async fn chat(&self, message: &str) -> ChatResult<ChatReply>;

    /// Ask the backend to forget its conversation memory
    async fn reset(&self) -> ChatResult<()>;

    /// Query backend liveness
    async fn health(&self) -> ChatResult<HealthStatus>;

    /// Where the backend is expected to run, for user-facing messages
    fn location(&self) -> String;
}

/// HTTP implementation of [`AssistantClient`]
pub struct HttpAssistantClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpAssistantClient {
    /// Create a client for the given configuration
    pub fn new(config: ClientConfig) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    // Turn a non-2xx response into a Status error, keeping the backend's own message if it sent one
    async fn status_error(response: reqwest::Response) -> ChatError {
        let status = response.status().as_u16();
        let raw = response.text().await.unwrap_or_default();
        let body = match serde_json::from_str::<ErrorBody>(&raw) {
            Ok(ErrorBody {
                error: Some(error),
                details,
            }) => match details {
                Some(details) => format!("{} ({})", error, details),
                None => error,
            },
            _ => raw,
        };
        ChatError::Status { status, body }
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn chat(&self, message: &str) -> ChatResult<ChatReply> {
        let url = self.config.endpoint("chat")?;
        debug!(%url, chars = message.chars().count(), "Sending chat request");

        let response = self
            .client
            .post(url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let raw = response.text().await?;
        let reply: ChatReply = serde_json::from_str(&raw)
            .map_err(|e| ChatError::MalformedReply(format!("Failed to parse response: {}", e)))?;

        if reply.response.is_empty() {
            return Err(ChatError::MalformedReply(
                "Reply contained an empty response".to_string(),
            ));
        }

        Ok(reply)
    }

    async fn reset(&self) -> ChatResult<()> {
        let url = self.config.endpoint("reset")?;
        debug!(%url, "Sending reset request");

        let response = self.client.post(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        Ok(())
    }

    async fn health(&self) -> ChatResult<HealthStatus> {
        let url = self.config.endpoint("health")?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let raw = response.text().await?;
        serde_json::from_str(&raw)
            .map_err(|e| ChatError::MalformedReply(format!("Failed to parse health status: {}", e)))
    }

    fn location(&self) -> String {
        self.config.location()
    }
}
