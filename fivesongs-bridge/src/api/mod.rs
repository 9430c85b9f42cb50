//! Command surface for the controlling process
//!
//! Inbound named commands arrive as HTTP POSTs; outbound named events leave
//! over the SSE stream at `GET /events`.

pub mod handlers;
pub mod sse;

use crate::device::ControllerHandle;
use crate::state::SharedState;
use crate::storage::KvStore;
use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppContext {
    /// Event broadcaster feeding the SSE stream
    pub state: Arc<SharedState>,
    /// Device controller command handle
    pub controller: ControllerHandle,
    /// Session-scoped store (playlist cache)
    pub session: KvStore,
    /// Durable store (saved games, current-game marker)
    pub durable: KvStore,
}

/// Create the API router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Playback commands
        .route("/playback/play", post(handlers::play))
        .route("/playback/pause", post(handlers::pause))
        // Playlist cache
        .route("/playlists/cache", post(handlers::cache_playlists))
        // Game progress
        .route("/game/save", post(handlers::save_game_state))
        .route("/game/saved_state", post(handlers::request_saved_state))
        .route("/game/running", post(handlers::check_running_game))
        // Session lifecycle
        .route("/session/mount", post(handlers::mount))
        // SSE event stream
        .route("/events", get(sse::event_stream))
        .with_state(ctx)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "fivesongs-bridge",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
