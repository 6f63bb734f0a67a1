//! HTTP API for the chat widget

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::runtime::ConversationController;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: ConversationController,
}

impl AppState {
    pub fn new(controller: ConversationController) -> Self {
        Self { controller }
    }
}
