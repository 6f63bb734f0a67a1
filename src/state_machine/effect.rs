//! Effects produced by state transitions

use crate::transcript::Sender;
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript, announce it and scroll to it
    AppendMessage { sender: Sender, content: String },

    /// Empty the transcript
    ClearTranscript,

    ShowTyping,
    HideTyping,

    /// Wait out the simulated latency, then compute the reply for `text`
    ScheduleReply {
        turn: u64,
        text: String,
        delay: Duration,
    },

    /// Append the "history cleared" notice after `delay`
    ScheduleClearNotice { delay: Duration },

    /// Broadcast the new state to subscribers
    NotifyStateChange,
}

impl Effect {
    pub fn append_user(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            content: content.into(),
        }
    }

    pub fn append_bot(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            content: content.into(),
        }
    }
}
