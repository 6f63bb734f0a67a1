//! Conversation state types

use crate::config::WidgetConfig;
use serde::{Deserialize, Serialize};

/// Turn-taking state of the widget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Ready for user input
    #[default]
    Idle,

    /// A user message was accepted and its reply is pending
    AwaitingReply {
        /// Turn number of the pending reply; replies for other turns are stale
        turn: u64,
    },
}

impl ConvState {
    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self, ConvState::AwaitingReply { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingReply { .. } => "awaiting_reply",
        }
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub session_id: String,
    pub config: WidgetConfig,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>, config: WidgetConfig) -> Self {
        Self {
            session_id: session_id.into(),
            config,
        }
    }
}
