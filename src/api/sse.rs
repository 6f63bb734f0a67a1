//! Server-Sent Events support

use crate::runtime::WidgetEvent;
use crate::state_machine::ConvState;
use crate::transcript::MessageView;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream, starting with a transcript snapshot
pub fn sse_stream(
    messages: Vec<MessageView>,
    state: ConvState,
    broadcast_rx: tokio::sync::broadcast::Receiver<WidgetEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        let data = json!({
            "type": "init",
            "messages": messages,
            "state": state,
        });
        Ok(Event::default().event("init").data(data.to_string()))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(widget_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn widget_event_to_axum(event: WidgetEvent) -> Event {
    let (event_type, data) = widget_event_payload(event);
    Event::default().event(event_type).data(data.to_string())
}

fn widget_event_payload(event: WidgetEvent) -> (&'static str, Value) {
    match event {
        WidgetEvent::MessageAppended { message } => (
            "message",
            json!({
                "type": "message",
                "message": message.view()
            }),
        ),
        WidgetEvent::ScrollToLatest => ("scroll", json!({ "type": "scroll" })),
        WidgetEvent::TypingStarted => (
            "typing",
            json!({
                "type": "typing",
                "active": true
            }),
        ),
        WidgetEvent::TypingEnded => (
            "typing",
            json!({
                "type": "typing",
                "active": false
            }),
        ),
        WidgetEvent::Announced { id, sender, text } => (
            "announce",
            json!({
                "type": "announce",
                "id": id,
                "sender": sender,
                "text": text,
                "aria_live": "polite",
                "aria_atomic": true
            }),
        ),
        WidgetEvent::AnnouncementExpired { id } => (
            "announce_expired",
            json!({
                "type": "announce_expired",
                "id": id
            }),
        ),
        WidgetEvent::StateChanged { state } => (
            "state_change",
            json!({
                "type": "state_change",
                "state": state,
                "aria_busy": state.is_awaiting_reply()
            }),
        ),
        WidgetEvent::TranscriptCleared => ("cleared", json!({ "type": "cleared" })),
        WidgetEvent::QuickActions { visible } => (
            "quick_actions",
            json!({
                "type": "quick_actions",
                "visible": visible
            }),
        ),
    }
}
