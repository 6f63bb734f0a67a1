//! API request and response types

use crate::counter::CounterLevel;
use crate::state_machine::ConvState;
use crate::transcript::MessageView;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub accepted: bool,
}

/// Request to clear the transcript; `confirmed` carries the user's answer
/// to the confirmation prompt
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// Transcript snapshot
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageView>,
    pub state: ConvState,
}

#[derive(Debug, Deserialize)]
pub struct CounterQuery {
    #[serde(default)]
    pub draft: String,
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub used: usize,
    pub limit: usize,
    pub level: CounterLevel,
    pub label: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }
}
