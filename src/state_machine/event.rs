//! Events that can occur in a conversation

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    UserSubmit {
        /// Raw text as typed, untrimmed
        text: String,
        turn: u64,
    },
    /// The presentation layer obtained the user's confirmation to clear
    ClearConfirmed,

    // Reply events
    ReplyReady {
        turn: u64,
        text: String,
    },
    /// The source errored or panicked; the cause is logged where it happens
    ReplyFailed {
        turn: u64,
    },

    // Timer events
    ClearNoticeDue,
}
