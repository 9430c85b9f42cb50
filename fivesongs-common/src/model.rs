//! Shared data model for the playback bridge
//!
//! These types cross two boundaries: the command/event surface toward the
//! controlling process, and the persisted layout in the session/durable
//! stores. Both use the same JSON shapes.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// UI phase of the controlling process
///
/// Unknown phases deserialize as `Other` so a new upstream phase never
/// breaks command handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Login,
    ChoosePlaylist,
    Other,
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "login" => Phase::Login,
            "choose_playlist" => Phase::ChoosePlaylist,
            _ => Phase::Other,
        })
    }
}

/// Playlist summary as supplied by the controlling process
///
/// Only `id` and `name` are interpreted here; all remaining fields are
/// carried through `extra` so caching round-trips whatever the upstream
/// rendering needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Saved progress for a single playlist's game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub playlist_name: String,
    pub played_track_ids: Vec<String>,
}

/// Durable store of saved games, keyed by playlist id
///
/// Saves merge into this map; only the saved playlist's entry is replaced.
pub type SavedGames = BTreeMap<String, SavedGame>;

/// Pointer to the most recently saved game with at least one played track
///
/// Never explicitly deleted; readers must revalidate it against the saved
/// games map, since the referenced entry may have gone stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMarker {
    pub playlist_id: String,
    pub playlist_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_parses_known_and_unknown_values() {
        let login: Phase = serde_json::from_str("\"login\"").unwrap();
        assert_eq!(login, Phase::Login);

        let choose: Phase = serde_json::from_str("\"choose_playlist\"").unwrap();
        assert_eq!(choose, Phase::ChoosePlaylist);

        // Anything else maps to Other instead of failing
        let other: Phase = serde_json::from_str("\"guess_song\"").unwrap();
        assert_eq!(other, Phase::Other);
    }

    #[test]
    fn playlist_summary_round_trips_unknown_fields() {
        let raw = serde_json::json!({
            "id": "p1",
            "name": "Road Trip",
            "image_url": "https://example.com/cover.jpg",
            "track_count": 37
        });

        let summary: PlaylistSummary = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(summary.id, "p1");
        assert_eq!(summary.name, "Road Trip");
        assert_eq!(
            summary.extra.get("track_count"),
            Some(&serde_json::json!(37))
        );

        // Extras survive re-serialization unchanged
        let back = serde_json::to_value(&summary).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn saved_games_map_serializes_by_playlist_id() {
        let mut games = SavedGames::new();
        games.insert(
            "p1".to_string(),
            SavedGame {
                playlist_name: "Road Trip".to_string(),
                played_track_ids: vec!["t1".to_string(), "t2".to_string()],
            },
        );

        let json = serde_json::to_value(&games).unwrap();
        assert_eq!(json["p1"]["playlist_name"], "Road Trip");
        assert_eq!(json["p1"]["played_track_ids"][1], "t2");
    }
}
