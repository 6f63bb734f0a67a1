//! Conversation runtime executor

use super::traits::{ReplyError, ReplySource};
use super::{Envelope, WidgetEvent};

use crate::announcer::Announcer;
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event};
use crate::transcript::{Message, Sender, TranscriptStore};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Generic conversation runtime that can work with any reply source
pub struct ConversationRuntime<R>
where
    R: ReplySource + 'static,
{
    context: ConvContext,
    state: ConvState,
    transcript: Arc<TranscriptStore>,
    reply_source: Arc<R>,
    announcer: Announcer,
    event_rx: mpsc::Receiver<Envelope>,
    /// Weak so the loop ends once every controller handle is dropped
    event_tx: mpsc::WeakSender<Envelope>,
    broadcast_tx: broadcast::Sender<WidgetEvent>,
    state_tx: watch::Sender<ConvState>,
    /// Quick-action suggestions are shown until the first user message
    quick_actions_visible: bool,
}

impl<R> ConversationRuntime<R>
where
    R: ReplySource + 'static,
{
    pub fn new(
        context: ConvContext,
        transcript: Arc<TranscriptStore>,
        reply_source: R,
        event_rx: mpsc::Receiver<Envelope>,
        event_tx: mpsc::WeakSender<Envelope>,
        broadcast_tx: broadcast::Sender<WidgetEvent>,
        state_tx: watch::Sender<ConvState>,
    ) -> Self {
        let announcer = Announcer::new(broadcast_tx.clone(), context.config.announcement_ttl);
        Self {
            context,
            state: ConvState::Idle,
            transcript,
            reply_source: Arc::new(reply_source),
            announcer,
            event_rx,
            event_tx,
            broadcast_tx,
            state_tx,
            quick_actions_visible: true,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting conversation runtime");

        // Process events one at a time; this task is the only transcript writer
        loop {
            tokio::select! {
                Some(envelope) = self.event_rx.recv() => {
                    let Envelope { event, ack } = envelope;
                    let outcome = self.process_event(event);
                    if let Some(ack) = ack {
                        let _ = ack.send(outcome);
                    }
                }
                else => break,
            }
        }

        tracing::info!(session_id = %self.context.session_id, "Conversation runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), crate::state_machine::RejectKind> {
        // Pure state transition
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::info!(reason = e.code(), state = self.state.name(), "Submission rejected");
                return Err(e);
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);

        for effect in result.effects {
            self.execute_effect(effect);
        }

        // Watchers see the new state only after its effects have landed
        if old_state != self.state {
            tracing::debug!(from = old_state.name(), to = self.state.name(), "State transition");
            self.state_tx.send_replace(self.state);
        }

        Ok(())
    }

    /// Execute an effect. Timers and reply computation run on spawned tasks
    /// that report back through `event_tx`.
    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { sender, content } => {
                let message = Message::new(sender, content);
                tracing::debug!(
                    id = %message.id,
                    sender = sender.as_str(),
                    len = message.content.chars().count(),
                    "Appending message"
                );
                self.transcript.append(message.clone());
                let _ = self.broadcast_tx.send(WidgetEvent::MessageAppended {
                    message: message.clone(),
                });
                let _ = self.broadcast_tx.send(WidgetEvent::ScrollToLatest);
                self.announcer.announce(sender, &message.content);

                if sender == Sender::User && self.quick_actions_visible {
                    self.set_quick_actions(false);
                }
            }

            Effect::ClearTranscript => {
                let removed = self.transcript.len();
                self.transcript.clear();
                tracing::info!(removed, "Transcript cleared");
                let _ = self.broadcast_tx.send(WidgetEvent::TranscriptCleared);
                if !self.quick_actions_visible {
                    self.set_quick_actions(true);
                }
            }

            Effect::ShowTyping => {
                let _ = self.broadcast_tx.send(WidgetEvent::TypingStarted);
                let _ = self.broadcast_tx.send(WidgetEvent::ScrollToLatest);
            }

            Effect::HideTyping => {
                let _ = self.broadcast_tx.send(WidgetEvent::TypingEnded);
            }

            Effect::ScheduleReply { turn, text, delay } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!(turn, "No controller left, reply not scheduled");
                    return;
                };
                let reply_source = self.reply_source.clone();

                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;

                    // A panicking source must still resolve the turn
                    let outcome = AssertUnwindSafe(reply_source.reply(&text))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| Err(ReplyError::failed("reply source panicked")));

                    let event = match outcome {
                        Ok(text) => Event::ReplyReady { turn, text },
                        Err(e) => {
                            tracing::error!(turn, error = %e, "Reply computation failed");
                            Event::ReplyFailed { turn }
                        }
                    };
                    let _ = event_tx.send(Envelope::internal(event)).await;
                });
            }

            Effect::ScheduleClearNotice { delay } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    return;
                };
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = event_tx.send(Envelope::internal(Event::ClearNoticeDue)).await;
                });
            }

            Effect::NotifyStateChange => {
                let _ = self
                    .broadcast_tx
                    .send(WidgetEvent::StateChanged { state: self.state });
            }
        }
    }

    fn set_quick_actions(&mut self, visible: bool) {
        self.quick_actions_visible = visible;
        let _ = self.broadcast_tx.send(WidgetEvent::QuickActions { visible });
    }
}
