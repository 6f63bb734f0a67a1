//! Screen-reader announcements
//!
//! Each announcement is a polite, atomic live-region entry that the
//! presentation layer inserts on `Announced` and drops on
//! `AnnouncementExpired`. Nothing is remembered between calls.

use crate::runtime::WidgetEvent;
use crate::transcript::Sender;
use std::time::Duration;
use tokio::sync::broadcast;

pub struct Announcer {
    broadcast_tx: broadcast::Sender<WidgetEvent>,
    ttl: Duration,
}

impl Announcer {
    pub fn new(broadcast_tx: broadcast::Sender<WidgetEvent>, ttl: Duration) -> Self {
        Self { broadcast_tx, ttl }
    }

    /// Text read out for a message
    pub fn phrase(sender: Sender, content: &str) -> String {
        match sender {
            Sender::User => format!("You said: {content}"),
            Sender::Bot => format!("AI responded: {content}"),
        }
    }

    /// Emit an announcement and schedule its removal
    pub fn announce(&self, sender: Sender, content: &str) {
        let id = format!("announce_{}", uuid::Uuid::new_v4().simple());
        let _ = self.broadcast_tx.send(WidgetEvent::Announced {
            id: id.clone(),
            sender,
            text: Self::phrase(sender, content),
        });

        let broadcast_tx = self.broadcast_tx.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = broadcast_tx.send(WidgetEvent::AnnouncementExpired { id });
        });
    }
}
