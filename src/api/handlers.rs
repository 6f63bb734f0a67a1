//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, ChatResponse, ClearRequest, ClearResponse, CounterQuery, CounterResponse,
    ErrorResponse, MessagesResponse,
};
use super::AppState;
use crate::runtime::{ControllerError, PresetConfirmation};
use crate::state_machine::RejectKind;
use crate::transcript::MessageView;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Message submission
        .route("/api/chat", post(send_chat))
        .route("/api/chat/clear", post(clear_chat))
        // Transcript snapshot for initial render
        .route("/api/chat/messages", get(list_messages))
        // Live character counter for the draft
        .route("/api/chat/counter", get(char_counter))
        // SSE streaming of widget events
        .route("/api/chat/stream", get(stream_chat))
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    state.controller.submit(req.text).await?;
    Ok((StatusCode::ACCEPTED, Json(ChatResponse { accepted: true })))
}

async fn clear_chat(
    State(state): State<AppState>,
    Json(req): Json<ClearRequest>,
) -> Result<Json<ClearResponse>, AppError> {
    let cleared = state
        .controller
        .clear(&PresetConfirmation(req.confirmed))
        .await?;
    Ok(Json(ClearResponse { cleared }))
}

async fn list_messages(State(state): State<AppState>) -> Json<MessagesResponse> {
    Json(MessagesResponse {
        messages: state.controller.all().iter().map(|m| m.view()).collect(),
        state: state.controller.state(),
    })
}

async fn char_counter(
    State(state): State<AppState>,
    Query(query): Query<CounterQuery>,
) -> Json<CounterResponse> {
    let count = state.controller.char_count(&query.draft);
    Json(CounterResponse {
        label: count.label(),
        used: count.used,
        limit: count.limit,
        level: count.level,
    })
}

async fn stream_chat(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before taking the snapshot so nothing falls between them
    let broadcast_rx = state.controller.subscribe();
    let messages: Vec<MessageView> = state.controller.all().iter().map(|m| m.view()).collect();
    sse_stream(messages, state.controller.state(), broadcast_rx)
}

async fn get_version() -> &'static str {
    concat!("chatdesk ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    Rejected(RejectKind),
    Internal(String),
}

impl From<ControllerError> for AppError {
    fn from(e: ControllerError) -> Self {
        match e {
            ControllerError::Rejected(kind) => AppError::Rejected(kind),
            ControllerError::Stopped => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Rejected(kind) => {
                let status = match kind {
                    RejectKind::Busy => StatusCode::CONFLICT,
                    RejectKind::Empty | RejectKind::TooLong { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (
                    status,
                    ErrorResponse::new(kind.to_string()).with_kind(kind.code()),
                )
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(msg)),
        };

        (status, Json(body)).into_response()
    }
}
