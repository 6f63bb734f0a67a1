//! Mock implementations for testing
//!
//! These mocks enable integration testing of the runtime without a real
//! presentation layer.

use super::traits::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Reply Sources
// ============================================================================

/// Reply source that returns queued results
#[allow(dead_code)]
pub struct MockReplySource {
    responses: Mutex<VecDeque<Result<String, ReplyError>>>,
    /// Record of all texts the source was asked about
    pub requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockReplySource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: ReplyError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockReplySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplySource for MockReplySource {
    async fn reply(&self, text: &str) -> Result<String, ReplyError> {
        self.requests.lock().unwrap().push(text.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ReplyError::failed("No mock reply queued")))
    }
}

/// Reply source that panics instead of returning
pub struct PanickingReplySource;

#[async_trait]
impl ReplySource for PanickingReplySource {
    async fn reply(&self, _text: &str) -> Result<String, ReplyError> {
        panic!("reply source exploded");
    }
}

// ============================================================================
// Mock Confirmation
// ============================================================================

/// Confirmation that answers a fixed value and records the prompts shown
pub struct RecordingConfirmation {
    answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ClearConfirmation for RecordingConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::policy::Category;
    use crate::runtime::{ControllerError, ConversationController, WidgetEvent, CLEAR_PROMPT};
    use crate::state_machine::transition::{APOLOGY_MESSAGE, CLEARED_NOTICE};
    use crate::state_machine::{ConvState, RejectKind};
    use crate::transcript::Sender;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::broadcast;

    fn keyword_controller() -> ConversationController {
        ConversationController::spawn(WidgetConfig::default(), KeywordReplySource::seeded(7))
    }

    async fn wait_for_idle(controller: &ConversationController) {
        let mut rx = controller.watch_state();
        tokio::time::timeout(
            Duration::from_secs(10),
            rx.wait_for(|s| *s == ConvState::Idle),
        )
        .await
        .expect("timed out waiting for Idle")
        .expect("state channel closed");
    }

    /// Drain everything currently buffered, skipping scroll and expiry noise
    fn drain(rx: &mut broadcast::Receiver<WidgetEvent>) -> Vec<WidgetEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if !matches!(
                event,
                WidgetEvent::ScrollToLatest | WidgetEvent::AnnouncementExpired { .. }
            ) {
                events.push(event);
            }
        }
        events
    }

    fn drain_all(rx: &mut broadcast::Receiver<WidgetEvent>) -> Vec<WidgetEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Events immediately preceding each `ScrollToLatest`
    fn scrolled_after(events: &[WidgetEvent]) -> Vec<&WidgetEvent> {
        events
            .windows(2)
            .filter(|pair| pair[1] == WidgetEvent::ScrollToLatest)
            .map(|pair| &pair[0])
            .collect()
    }

    #[tokio::test]
    async fn test_mock_reply_source() {
        let mock = MockReplySource::new();
        mock.queue_reply("Hello");

        assert_eq!(mock.reply("hi").await.unwrap(), "Hello");
        // Second call should fail (no more replies)
        assert!(mock.reply("again").await.is_err());
        assert_eq!(mock.recorded_requests(), vec!["hi", "again"]);
    }

    /// Submit "hi": one user message now, one greeting after the latency
    #[tokio::test(start_paused = true)]
    async fn test_hi_scenario() {
        let controller = keyword_controller();
        let started = tokio::time::Instant::now();

        controller.submit("hi").await.unwrap();
        let msgs = controller.all();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].sender, Sender::User);
        assert_eq!(msgs[0].content, "hi");
        assert!(controller.state().is_awaiting_reply());

        wait_for_idle(&controller).await;
        assert!(started.elapsed() >= Duration::from_millis(1000));

        let msgs = controller.all();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].sender, Sender::Bot);
        assert_eq!(msgs[1].content, Category::Greeting.response());
        assert_eq!(controller.state(), ConvState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_too_long_leaves_transcript_empty() {
        let controller = keyword_controller();
        let result = controller.submit("a".repeat(501)).await;

        assert_eq!(
            result,
            Err(ControllerError::Rejected(RejectKind::TooLong {
                len: 501,
                limit: 500
            }))
        );
        assert!(controller.all().is_empty());
        assert_eq!(controller.state(), ConvState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_rejected_as_empty() {
        let controller = keyword_controller();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(
                controller.submit(text).await,
                Err(ControllerError::Rejected(RejectKind::Empty))
            );
        }
        assert!(controller.all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_awaiting_is_busy() {
        let controller = keyword_controller();
        controller.submit("hi").await.unwrap();

        assert_eq!(
            controller.submit("are you there?").await,
            Err(ControllerError::Rejected(RejectKind::Busy))
        );
        assert_eq!(controller.all().len(), 1);

        // Accepted again once the reply lands
        wait_for_idle(&controller).await;
        controller.submit("thanks").await.unwrap();
        assert_eq!(controller.all().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reply_appends_apology_and_resolves() {
        let source = MockReplySource::new();
        source.queue_error(ReplyError::failed("backend down"));
        let controller = ConversationController::spawn(WidgetConfig::default(), source);

        controller.submit("hello").await.unwrap();
        wait_for_idle(&controller).await;

        let msgs = controller.all();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].content, APOLOGY_MESSAGE);
        assert_eq!(controller.state(), ConvState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_reply_source_still_resolves() {
        let controller =
            ConversationController::spawn(WidgetConfig::default(), PanickingReplySource);

        controller.submit("hello").await.unwrap();
        wait_for_idle(&controller).await;

        let msgs = controller.all();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].content, APOLOGY_MESSAGE);

        // And the controller keeps working
        controller.submit("still there?").await.unwrap();
        assert_eq!(controller.all().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_source_sees_trimmed_text() {
        let source = Arc::new(MockReplySource::new());
        source.queue_reply("ok");
        let controller = ConversationController::spawn(WidgetConfig::default(), source.clone());

        controller.submit("  Where is my order?  ").await.unwrap();
        wait_for_idle(&controller).await;

        assert_eq!(source.recorded_requests(), vec!["Where is my order?"]);
        assert_eq!(controller.all()[0].content, "Where is my order?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_event_sequence() {
        let controller = keyword_controller();
        let mut rx = controller.subscribe();

        controller.submit("hi").await.unwrap();
        wait_for_idle(&controller).await;

        let events = drain(&mut rx);
        let greeting = Category::Greeting.response();
        let position = |pred: &dyn Fn(&WidgetEvent) -> bool| {
            events.iter().position(pred).expect("event missing")
        };

        let user_appended = position(&|e| {
            matches!(e, WidgetEvent::MessageAppended { message } if message.sender == Sender::User)
        });
        let typing_started = position(&|e| matches!(e, WidgetEvent::TypingStarted));
        let bot_appended = position(&|e| {
            matches!(e, WidgetEvent::MessageAppended { message } if message.sender == Sender::Bot)
        });
        let typing_ended = position(&|e| matches!(e, WidgetEvent::TypingEnded));

        assert!(user_appended < typing_started);
        assert!(typing_started < bot_appended);
        assert!(bot_appended < typing_ended);

        let announcements: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                WidgetEvent::Announced { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            announcements,
            vec!["You said: hi".to_string(), format!("AI responded: {greeting}")]
        );
        assert!(events.contains(&WidgetEvent::QuickActions { visible: false }));
        assert!(events.contains(&WidgetEvent::StateChanged {
            state: ConvState::Idle
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_declined_keeps_history() {
        let controller = keyword_controller();
        controller.submit("hi").await.unwrap();
        wait_for_idle(&controller).await;

        let confirmation = RecordingConfirmation::new(false);
        assert!(!controller.clear(&confirmation).await.unwrap());
        assert_eq!(controller.all().len(), 2);
        assert_eq!(*confirmation.prompts.lock().unwrap(), vec![CLEAR_PROMPT]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_then_append_works() {
        let controller = keyword_controller();
        controller.submit("hi").await.unwrap();
        wait_for_idle(&controller).await;

        assert!(controller.clear(&PresetConfirmation(true)).await.unwrap());
        assert!(controller.all().is_empty());
        assert_eq!(controller.state(), ConvState::Idle);

        controller.submit("Where is my order #123?").await.unwrap();
        wait_for_idle(&controller).await;

        let contents: Vec<_> = controller.all().into_iter().map(|m| m.content).collect();
        assert!(contents.contains(&"Where is my order #123?".to_string()));
        assert!(contents.contains(&Category::OrderTracking.response().to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_during_reply_discards_late_reply() {
        let controller = keyword_controller();
        let mut rx = controller.subscribe();

        controller.submit("hi").await.unwrap();
        assert!(controller.clear(&PresetConfirmation(true)).await.unwrap());
        assert_eq!(controller.state(), ConvState::Idle);
        assert!(controller.all().is_empty());

        // Past both the clear notice and the original reply latency
        tokio::time::sleep(Duration::from_secs(2)).await;

        let msgs = controller.all();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].sender, Sender::Bot);
        assert_eq!(msgs[0].content, CLEARED_NOTICE);

        let events = drain(&mut rx);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, WidgetEvent::TypingEnded))
                .count(),
            1
        );
        assert!(events.contains(&WidgetEvent::TranscriptCleared));
        assert!(events.contains(&WidgetEvent::QuickActions { visible: true }));
    }

    /// Every append and the typing indicator are followed by a scroll
    #[tokio::test(start_paused = true)]
    async fn test_appends_scroll_to_latest() {
        let controller = keyword_controller();
        let mut rx = controller.subscribe();

        controller.submit("hi").await.unwrap();
        wait_for_idle(&controller).await;

        let events = drain_all(&mut rx);
        let revealed = scrolled_after(&events);
        assert_eq!(revealed.len(), 3);
        assert!(matches!(
            revealed[0],
            WidgetEvent::MessageAppended { message } if message.sender == Sender::User
        ));
        assert_eq!(revealed[1], &WidgetEvent::TypingStarted);
        assert!(matches!(
            revealed[2],
            WidgetEvent::MessageAppended { message } if message.sender == Sender::Bot
        ));

        // The clear notice is an append too
        assert!(controller.clear(&PresetConfirmation(true)).await.unwrap());
        tokio::time::sleep(Duration::from_millis(500)).await;

        let events = drain_all(&mut rx);
        let revealed = scrolled_after(&events);
        assert_eq!(revealed.len(), 1);
        assert!(matches!(
            revealed[0],
            WidgetEvent::MessageAppended { message } if message.content == CLEARED_NOTICE
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_runtime_stops_after_controllers_dropped() {
        let controller = keyword_controller();
        let mut rx = controller.subscribe();
        controller.submit("hi").await.unwrap();

        let other = controller.clone();
        drop(controller);
        drop(other);

        // The pending reply still lands, then the runtime exits and the
        // event channel closes
        let mut bot_replied = false;
        let closed = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                match rx.recv().await {
                    Ok(WidgetEvent::MessageAppended { message }) if message.sender == Sender::Bot => {
                        bot_replied = true;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    _ => {}
                }
            }
        })
        .await;

        assert!(closed.is_ok(), "runtime kept running without controllers");
        assert!(bot_replied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_char_count_uses_config() {
        let controller = keyword_controller();
        let count = controller.char_count(&"a".repeat(460));
        assert_eq!(count.label(), "460/500");
        assert_eq!(count.level, crate::counter::CounterLevel::Warning);
    }
}
