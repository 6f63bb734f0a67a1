//! Runtime for executing conversations
//!
//! One `ConversationRuntime` task owns the state machine and the transcript
//! writes for a widget session. The presentation layer talks to it through
//! a cloneable `ConversationController` and listens on a broadcast channel
//! of `WidgetEvent`s.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::config::WidgetConfig;
use crate::counter::CharCount;
use crate::state_machine::{ConvContext, ConvState, Event, RejectKind};
use crate::transcript::{Message, Sender, TranscriptStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Prompt shown by the presentation layer before clearing
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the chat history?";

/// Events raised for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    MessageAppended { message: Message },
    /// Scroll the transcript so the latest message is visible
    ScrollToLatest,
    TypingStarted,
    TypingEnded,
    /// Insert a polite live-region node with `text`
    Announced {
        id: String,
        sender: Sender,
        text: String,
    },
    /// Remove the live-region node inserted for `id`
    AnnouncementExpired { id: String },
    StateChanged { state: ConvState },
    TranscriptCleared,
    QuickActions { visible: bool },
}

/// Errors surfaced by the controller handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Rejected(#[from] RejectKind),
    #[error("Conversation runtime has stopped")]
    Stopped,
}

/// Acknowledgement for events that originate from the user
pub type Ack = oneshot::Sender<Result<(), RejectKind>>;

/// An event plus an optional channel to report the transition outcome
#[derive(Debug)]
pub struct Envelope {
    pub event: Event,
    pub ack: Option<Ack>,
}

impl Envelope {
    pub fn internal(event: Event) -> Self {
        Self { event, ack: None }
    }
}

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ConversationController {
    event_tx: mpsc::Sender<Envelope>,
    broadcast_tx: broadcast::Sender<WidgetEvent>,
    state_rx: watch::Receiver<ConvState>,
    transcript: Arc<TranscriptStore>,
    config: Arc<WidgetConfig>,
    next_turn: Arc<AtomicU64>,
}

impl ConversationController {
    /// Create the runtime for a new widget session and start it on the
    /// current tokio runtime.
    pub fn spawn<R: ReplySource + 'static>(config: WidgetConfig, reply_source: R) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        let context = ConvContext::new(&session_id, config.clone());
        let transcript = Arc::new(TranscriptStore::new());

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (state_tx, state_rx) = watch::channel(ConvState::Idle);

        let runtime = ConversationRuntime::new(
            context,
            transcript.clone(),
            reply_source,
            event_rx,
            event_tx.downgrade(),
            broadcast_tx.clone(),
            state_tx,
        );

        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(session_id = %session_id, "Conversation runtime finished");
        });

        Self {
            event_tx,
            broadcast_tx,
            state_rx,
            transcript,
            config: Arc::new(config),
            next_turn: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Submit raw user text.
    ///
    /// Returns once the message is validated and appended; the reply arrives
    /// later as `WidgetEvent`s.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), ControllerError> {
        let turn = self.next_turn.fetch_add(1, Ordering::Relaxed);
        let (ack_tx, ack_rx) = oneshot::channel();
        self.event_tx
            .send(Envelope {
                event: Event::UserSubmit {
                    text: text.into(),
                    turn,
                },
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| ControllerError::Stopped)?;

        ack_rx.await.map_err(|_| ControllerError::Stopped)??;
        Ok(())
    }

    /// Ask for confirmation, then clear the transcript. Returns whether the
    /// clear went ahead.
    pub async fn clear<C: ClearConfirmation + ?Sized>(
        &self,
        confirmation: &C,
    ) -> Result<bool, ControllerError> {
        if !confirmation.confirm(CLEAR_PROMPT).await {
            tracing::debug!("Clear declined");
            return Ok(false);
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        self.event_tx
            .send(Envelope {
                event: Event::ClearConfirmed,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| ControllerError::Stopped)?;

        ack_rx.await.map_err(|_| ControllerError::Stopped)??;
        Ok(true)
    }

    /// Snapshot of the transcript in display order
    pub fn all(&self) -> Vec<Message> {
        self.transcript.all()
    }

    pub fn state(&self) -> ConvState {
        *self.state_rx.borrow()
    }

    /// Watch state transitions
    #[cfg(test)]
    pub fn watch_state(&self) -> watch::Receiver<ConvState> {
        self.state_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Counter for an unsent draft
    pub fn char_count(&self, draft: &str) -> CharCount {
        CharCount::measure(draft, self.config.char_limit, self.config.warning_percent)
    }
}
