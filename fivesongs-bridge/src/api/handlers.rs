//! HTTP command handlers
//!
//! Each handler maps one named command onto the controller or the stores.
//! Commands always acknowledge with 200; any observable results travel as
//! events on the SSE stream. Failures degrade to "nothing happens", so no
//! handler has an error response.

use crate::api::AppContext;
use crate::device::PlaybackIntent;
use crate::storage::game;
use axum::{extract::State, Json};
use fivesongs_common::events::BridgeEvent;
use fivesongs_common::model::{Phase, PlaylistSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

impl StatusResponse {
    fn ok() -> Json<Self> {
        Json(Self {
            status: "ok".to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub uri: String,
    pub token: String,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PauseRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CachePlaylistsRequest {
    pub playlists: Vec<PlaylistSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SavedStateRequest {
    pub playlist_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveGameRequest {
    pub playlist_id: String,
    pub playlist_name: String,
    pub played_track_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MountRequest {
    pub phase: Phase,
}

// ============================================================================
// Playback Commands
// ============================================================================

/// POST /playback/play - queue a track for playback
pub async fn play(State(ctx): State<AppContext>, Json(req): Json<PlayRequest>) -> Json<StatusResponse> {
    debug!("play command for {}", req.uri);
    ctx.controller.play(PlaybackIntent {
        track_uri: req.uri,
        auth_token: req.token,
        device_id: req.device_id,
    });
    StatusResponse::ok()
}

/// POST /playback/pause - pause playback
pub async fn pause(
    State(ctx): State<AppContext>,
    Json(req): Json<PauseRequest>,
) -> Json<StatusResponse> {
    ctx.controller.pause(req.token, req.device_id);
    StatusResponse::ok()
}

// ============================================================================
// Playlist Cache
// ============================================================================

/// POST /playlists/cache - overwrite the cached playlist set
pub async fn cache_playlists(
    State(ctx): State<AppContext>,
    Json(req): Json<CachePlaylistsRequest>,
) -> Json<StatusResponse> {
    game::cache_playlists(&ctx.session, &req.playlists).await;
    StatusResponse::ok()
}

// ============================================================================
// Game Progress
// ============================================================================

/// POST /game/saved_state - emit saved progress for a playlist, if any
pub async fn request_saved_state(
    State(ctx): State<AppContext>,
    Json(req): Json<SavedStateRequest>,
) -> Json<StatusResponse> {
    if let Some(saved) = game::saved_state(&ctx.durable, &req.playlist_id).await {
        if !saved.played_track_ids.is_empty() {
            ctx.state
                .broadcast_event(BridgeEvent::restore_state(saved.played_track_ids));
        }
    }
    StatusResponse::ok()
}

/// POST /game/save - merge one playlist's progress into the saved games
pub async fn save_game_state(
    State(ctx): State<AppContext>,
    Json(req): Json<SaveGameRequest>,
) -> Json<StatusResponse> {
    game::save_game_state(
        &ctx.durable,
        &req.playlist_id,
        &req.playlist_name,
        req.played_track_ids,
    )
    .await;
    StatusResponse::ok()
}

/// POST /game/running - report whether a resumable game exists
pub async fn check_running_game(State(ctx): State<AppContext>) -> Json<StatusResponse> {
    let event = match game::running_game(&ctx.durable).await {
        Some(marker) => BridgeEvent::running_game_available(
            Some(marker.playlist_id),
            Some(marker.playlist_name),
        ),
        None => BridgeEvent::running_game_available(None, None),
    };
    ctx.state.broadcast_event(event);
    StatusResponse::ok()
}

// ============================================================================
// Session Lifecycle
// ============================================================================

/// POST /session/mount - apply phase-transition effects
///
/// Entering the login phase drops the playlist cache; mounting the playlist
/// chooser restores a non-empty cache to the controlling process.
pub async fn mount(
    State(ctx): State<AppContext>,
    Json(req): Json<MountRequest>,
) -> Json<StatusResponse> {
    match req.phase {
        Phase::Login => {
            info!("login phase, clearing playlist cache");
            game::clear_playlist_cache(&ctx.session).await;
        }
        Phase::ChoosePlaylist => {
            if let Some(playlists) = game::cached_playlists(&ctx.session).await {
                if !playlists.is_empty() {
                    ctx.state
                        .broadcast_event(BridgeEvent::restore_playlists(playlists));
                }
            }
        }
        Phase::Other => {}
    }
    StatusResponse::ok()
}
