//! Chatdesk - customer support chat widget
//!
//! A Rust backend implementing the widget's conversation state machine,
//! keyword reply policy and screen-reader announcements, served over HTTP
//! with an SSE event stream for the presentation layer.

mod announcer;
mod api;
mod config;
mod counter;
mod policy;
mod runtime;
mod sanitize;
mod state_machine;
mod transcript;

use api::{create_router, AppState};
use config::{ServerConfig, WidgetConfig};
use runtime::{ConversationController, KeywordReplySource};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatdesk=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let server_config = ServerConfig::from_env();
    let widget_config = WidgetConfig::default();

    let reply_source = match server_config.seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded fallback replies");
            KeywordReplySource::seeded(seed)
        }
        None => KeywordReplySource::from_entropy(),
    };

    tracing::info!(
        char_limit = widget_config.char_limit,
        reply_latency_ms = u64::try_from(widget_config.reply_latency.as_millis()).unwrap_or(u64::MAX),
        "Widget configured"
    );

    // Create application state
    let controller = ConversationController::spawn(widget_config, reply_source);
    let state = AppState::new(controller);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port()));
    tracing::info!("Chatdesk server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
