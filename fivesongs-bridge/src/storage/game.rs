//! Playlist cache and game progress on top of the key/value stores
//!
//! The playlist cache lives in the session scope; saved games and the
//! current-game marker live in the durable scope.

use crate::storage::KvStore;
use fivesongs_common::model::{GameMarker, PlaylistSummary, SavedGame, SavedGames};

/// Session-scope key holding the cached playlist summaries
pub const PLAYLIST_CACHE_KEY: &str = "five_songs_playlists";

/// Durable-scope key holding the saved games map
pub const SAVED_GAMES_KEY: &str = "five_songs_saved_games";

/// Durable-scope key holding the current game marker
pub const CURRENT_GAME_KEY: &str = "five_songs_current_game";

/// Overwrite the cached playlist set; an empty set is ignored
pub async fn cache_playlists(session: &KvStore, playlists: &[PlaylistSummary]) {
    if playlists.is_empty() {
        return;
    }
    session.set(PLAYLIST_CACHE_KEY, &playlists).await;
}

/// Read the cached playlist set, if any
pub async fn cached_playlists(session: &KvStore) -> Option<Vec<PlaylistSummary>> {
    session.get(PLAYLIST_CACHE_KEY).await
}

/// Drop the cached playlist set (login phase)
pub async fn clear_playlist_cache(session: &KvStore) {
    session.remove(PLAYLIST_CACHE_KEY).await;
}

/// Look up saved progress for one playlist
pub async fn saved_state(durable: &KvStore, playlist_id: &str) -> Option<SavedGame> {
    let games: SavedGames = durable.get(SAVED_GAMES_KEY).await?;
    games.get(playlist_id).cloned()
}

/// Merge one playlist's progress into the saved games map
///
/// Only the saved playlist's entry is replaced. The current-game marker is
/// updated whenever the save carries at least one played track.
pub async fn save_game_state(
    durable: &KvStore,
    playlist_id: &str,
    playlist_name: &str,
    played_track_ids: Vec<String>,
) {
    let mut games: SavedGames = durable.get(SAVED_GAMES_KEY).await.unwrap_or_default();
    let has_progress = !played_track_ids.is_empty();
    games.insert(
        playlist_id.to_string(),
        SavedGame {
            playlist_name: playlist_name.to_string(),
            played_track_ids,
        },
    );
    durable.set(SAVED_GAMES_KEY, &games).await;

    if has_progress {
        let marker = GameMarker {
            playlist_id: playlist_id.to_string(),
            playlist_name: playlist_name.to_string(),
        };
        durable.set(CURRENT_GAME_KEY, &marker).await;
    }
}

/// Resolve the current-game marker, revalidated against the saved games map
///
/// Markers are never deleted, so a stale one (no matching save, or a save
/// with nothing played) reads as no running game.
pub async fn running_game(durable: &KvStore) -> Option<GameMarker> {
    let marker: GameMarker = durable.get(CURRENT_GAME_KEY).await?;
    let games: SavedGames = durable.get(SAVED_GAMES_KEY).await?;
    match games.get(&marker.playlist_id) {
        Some(game) if !game.played_track_ids.is_empty() => Some(marker),
        _ => None,
    }
}
