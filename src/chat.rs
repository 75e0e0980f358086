//! Remote chat client for the assistant backend.
//!
//! The backend exposes a single-shot JSON endpoint: `POST {base}/api/chat`
//! with the new message, the prior role-tagged history, and the interaction
//! mode; a successful response carries `{ "response": "<reply>" }`. Anything
//! else — network failure, non-2xx status, or a missing/invalid `response`
//! field — is a chat error, which the session recovers into a visible
//! fallback turn rather than surfacing to callers.

use crate::config::ChatConfig;
use crate::error::{AssistError, Result};
use crate::session::SessionMode;
use crate::transcript::{Actor, Turn};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Transport seam for the remote chat endpoint.
///
/// The session controller is constructed with a `ChatTransport` so tests can
/// substitute fakes; [`HttpChatClient`] is the production implementation.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `message` with the prior `history` and return the assistant's
    /// reply text.
    ///
    /// `history` is the transcript as it stood *before* the message being
    /// sent was appended; the new message travels in its own field.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Chat`] on network failure, a non-success
    /// status, or a malformed response body.
    async fn send(&self, message: &str, history: &[Turn], mode: SessionMode) -> Result<String>;
}

/// One history entry on the wire: a role plus a single text part.
#[derive(Debug, Serialize)]
struct HistoryEntry {
    role: &'static str,
    parts: Vec<HistoryPart>,
}

#[derive(Debug, Serialize)]
struct HistoryPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: Vec<HistoryEntry>,
    mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: Option<String>,
}

/// Map a transcript turn to its wire role. Assistant turns use the backend's
/// "model" role.
fn wire_role(actor: Actor) -> &'static str {
    match actor {
        Actor::User => "user",
        Actor::Assistant => "model",
    }
}

fn build_history(history: &[Turn]) -> Vec<HistoryEntry> {
    history
        .iter()
        .map(|turn| HistoryEntry {
            role: wire_role(turn.actor),
            parts: vec![HistoryPart {
                text: turn.text.clone(),
            }],
        })
        .collect()
}

/// HTTP implementation of [`ChatTransport`].
pub struct HttpChatClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpChatClient {
    /// Build a client for the configured endpoint with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AssistError::Chat(format!("HTTP client build failed: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_owned();
        info!("chat client configured for {base_url}/api/chat");

        Ok(Self { base_url, http })
    }
}

#[async_trait]
impl ChatTransport for HttpChatClient {
    async fn send(&self, message: &str, history: &[Turn], mode: SessionMode) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            message,
            history: build_history(history),
            mode: mode.wire_name(),
        };

        debug!(
            "sending chat request ({} prior turns, mode {})",
            history.len(),
            mode.wire_name()
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistError::Chat(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistError::Chat(format!(
                "chat endpoint returned {status}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistError::Chat(format!("invalid response body: {e}")))?;

        parsed
            .response
            .ok_or_else(|| AssistError::Chat("response body missing 'response' field".to_owned()))
    }
}
