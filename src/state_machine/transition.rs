//! Pure state transition function

use super::{ConvContext, ConvState, Effect, Event};
use thiserror::Error;

/// Reply appended when the reply source fails
pub const APOLOGY_MESSAGE: &str = "I apologize, but I encountered an error. Please try again.";

/// Bot message appended shortly after a confirmed clear
pub const CLEARED_NOTICE: &str = "Chat history cleared. How can I help you today?";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons a submission is rejected. The transcript is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectKind {
    #[error("Message is empty")]
    Empty,
    #[error("Message is {len} characters, limit is {limit}")]
    TooLong { len: usize, limit: usize },
    #[error("Still waiting for the previous reply")]
    Busy,
}

impl RejectKind {
    pub fn code(&self) -> &'static str {
        match self {
            RejectKind::Empty => "empty",
            RejectKind::TooLong { .. } => "too_long",
            RejectKind::Busy => "busy",
        }
    }
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; message ids,
/// timestamps and timers are left to the runtime executing the effects.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, RejectKind> {
    match (state, event) {
        // ============================================================
        // User Submission
        // ============================================================
        (state, Event::UserSubmit { text, turn }) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(RejectKind::Empty);
            }
            let len = text.chars().count();
            let limit = context.config.char_limit;
            if len > limit {
                return Err(RejectKind::TooLong { len, limit });
            }
            if state.is_awaiting_reply() {
                return Err(RejectKind::Busy);
            }

            Ok(TransitionResult::new(ConvState::AwaitingReply { turn })
                .with_effect(Effect::append_user(trimmed))
                .with_effect(Effect::NotifyStateChange)
                .with_effect(Effect::ShowTyping)
                .with_effect(Effect::ScheduleReply {
                    turn,
                    text: trimmed.to_string(),
                    delay: context.config.reply_latency,
                }))
        }

        // ============================================================
        // Reply Resolution
        // ============================================================
        (ConvState::AwaitingReply { turn }, Event::ReplyReady { turn: reply_turn, text })
            if *turn == reply_turn =>
        {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::append_bot(text))
                .with_effect(Effect::HideTyping)
                .with_effect(Effect::NotifyStateChange))
        }

        (ConvState::AwaitingReply { turn }, Event::ReplyFailed { turn: reply_turn })
            if *turn == reply_turn =>
        {
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::append_bot(APOLOGY_MESSAGE))
                .with_effect(Effect::HideTyping)
                .with_effect(Effect::NotifyStateChange))
        }

        // A reply for a turn that was cleared away is dropped
        (state, Event::ReplyReady { .. } | Event::ReplyFailed { .. }) => {
            Ok(TransitionResult::new(*state))
        }

        // ============================================================
        // Clearing
        // ============================================================
        (state, Event::ClearConfirmed) => {
            let mut result = TransitionResult::new(ConvState::Idle);
            if state.is_awaiting_reply() {
                result = result.with_effect(Effect::HideTyping);
            }
            Ok(result
                .with_effect(Effect::ClearTranscript)
                .with_effect(Effect::NotifyStateChange)
                .with_effect(Effect::ScheduleClearNotice {
                    delay: context.config.clear_notice_delay,
                }))
        }

        (state, Event::ClearNoticeDue) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::append_bot(CLEARED_NOTICE)))
        }
    }
}
