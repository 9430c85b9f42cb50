//! Event types for the bridge event stream

use crate::model::PlaylistSummary;
use serde::{Deserialize, Serialize};

/// Events emitted by the bridge toward the controlling process
///
/// Serialized with a `type` tag matching the SSE `event:` field, so clients
/// can dispatch on either.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// Cached playlists recovered from the session store
    RestorePlaylists {
        playlists: Vec<PlaylistSummary>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Saved game progress recovered for a requested playlist
    RestoreState {
        played_track_ids: Vec<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Result of a running-game check
    ///
    /// Both fields absent means no resumable game exists.
    RunningGameAvailable {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        playlist_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        playlist_name: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback has audibly started (distinct from the remote HTTP ack)
    PlaybackStarted {
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl BridgeEvent {
    pub fn restore_playlists(playlists: Vec<PlaylistSummary>) -> Self {
        Self::RestorePlaylists {
            playlists,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn restore_state(played_track_ids: Vec<String>) -> Self {
        Self::RestoreState {
            played_track_ids,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn running_game_available(
        playlist_id: Option<String>,
        playlist_name: Option<String>,
    ) -> Self {
        Self::RunningGameAvailable {
            playlist_id,
            playlist_name,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn playback_started() -> Self {
        Self::PlaybackStarted {
            timestamp: chrono::Utc::now(),
        }
    }

    /// Event name used for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RestorePlaylists { .. } => "restore_playlists",
            Self::RestoreState { .. } => "restore_state",
            Self::RunningGameAvailable { .. } => "running_game_available",
            Self::PlaybackStarted { .. } => "playback_started",
        }
    }
}
