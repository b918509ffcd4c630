// HTTP client for the chat backend
//
// One POST per chat turn to {api_url}/api/chatbot. No retries, no client-side
// timeout: the call awaits until the transport resolves or rejects, and the
// conversation's busy gate prevents overlapping requests.

use crate::conversation::ReasoningStep;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Marker prefixed onto transport-failure errors. The conversation layer
/// classifies failures by substring match on the error text; this is the
/// connectivity marker it looks for.
pub const FETCH_FAILED: &str = "Failed to fetch";

/// Request body for one exchange
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Fixed caller identifier for this installation (from config)
    pub user_id: String,
    /// Session identifier adopted from an earlier response, null on the
    /// first turn of a session
    pub conversation_id: Option<String>,
}

/// Success response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text to display
    pub response: String,
    /// Session identifier to adopt if none is held yet
    pub conversation_id: Option<String>,
    /// Reasoning trace; absent is treated as empty by the conversation
    pub reasoning_steps: Option<Vec<ReasoningStep>>,
}

/// Error response body. Any non-success status is a failure regardless of
/// body shape; this just extracts the message when one is present.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the chat endpoint. Cheap to clone (reqwest::Client is an Arc
/// around its connection pool), so the send task gets its own copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    chat_url: String,
    user_id: String,
}

impl ApiClient {
    pub fn new(api_url: &str, user_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            chat_url: format!("{}/api/chatbot", api_url.trim_end_matches('/')),
            user_id,
        }
    }

    /// Perform exactly one exchange with the backend.
    ///
    /// On a non-success status the returned error carries the backend's
    /// `error` field when the body parses, otherwise a generic message. On
    /// transport failure the error text starts with the `Failed to fetch`
    /// marker.
    pub async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<String>,
    ) -> Result<ChatReply> {
        let body = ChatRequest {
            message: message.to_string(),
            user_id: self.user_id.clone(),
            conversation_id,
        };

        tracing::debug!(url = %self.chat_url, "sending chat request");

        let response = self
            .http
            .post(&self.chat_url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{}: could not reach {}", FETCH_FAILED, self.chat_url))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| {
                    format!("Failed to get response from agent (HTTP {})", status.as_u16())
                });
            tracing::warn!(%status, "chat request rejected");
            return Err(anyhow!(message));
        }

        response
            .json::<ChatReply>()
            .await
            .context("Invalid response body from chat backend")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_wire_shape() {
        let request = ChatRequest {
            message: "I've been feeling tired lately".to_string(),
            user_id: "cc6ecc1f-0b3d-441a-8f5c-8bb8fb03a724".to_string(),
            conversation_id: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "I've been feeling tired lately",
                "userId": "cc6ecc1f-0b3d-441a-8f5c-8bb8fb03a724",
                "conversationId": null,
            })
        );
    }

    #[test]
    fn request_carries_adopted_conversation_id() {
        let request = ChatRequest {
            message: "and now?".to_string(),
            user_id: "u".to_string(),
            conversation_id: Some("abc123".to_string()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["conversationId"], json!("abc123"));
    }

    #[test]
    fn reply_parses_with_all_fields() {
        let reply: ChatReply = serde_json::from_value(json!({
            "response": "Try resting more.",
            "conversation_id": "abc123",
            "reasoning_steps": [
                {"type": "retrieval", "status": "success"},
                {"status": "running"},
            ],
        }))
        .unwrap();

        assert_eq!(reply.response, "Try resting more.");
        assert_eq!(reply.conversation_id.as_deref(), Some("abc123"));
        let steps = reply.reasoning_steps.unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind.as_deref(), Some("retrieval"));
        assert_eq!(steps[1].kind, None);
        assert_eq!(steps[1].status.as_deref(), Some("running"));
    }

    #[test]
    fn reply_parses_with_optional_fields_absent() {
        let reply: ChatReply =
            serde_json::from_value(json!({"response": "hello"})).unwrap();

        assert_eq!(reply.response, "hello");
        assert_eq!(reply.conversation_id, None);
        assert!(reply.reasoning_steps.is_none());
    }

    #[test]
    fn error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.error, None);

        let body: ErrorBody =
            serde_json::from_value(json!({"error": "log in required"})).unwrap();
        assert_eq!(body.error.as_deref(), Some("log in required"));
    }
}
