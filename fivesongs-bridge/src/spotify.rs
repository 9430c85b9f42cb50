//! Spotify Web API client
//!
//! Drives the two remote player endpoints the bridge needs. The base URL is
//! configurable so tests can point the client at a local stand-in server.

use crate::error::Result;
use serde::Serialize;

/// Default Web API base URL
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

#[derive(Debug, Serialize)]
struct PlayBody {
    uris: Vec<String>,
}

/// Remote player command client
#[derive(Clone)]
pub struct SpotifyApi {
    http: reqwest::Client,
    base_url: String,
}

impl SpotifyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// PUT /me/player/play?device_id=<id> with the given track uri
    pub async fn play(&self, device_id: &str, uri: &str, token: &str) -> Result<()> {
        let url = format!("{}/me/player/play", self.base_url);
        self.http
            .put(url)
            .query(&[("device_id", device_id)])
            .bearer_auth(token)
            .json(&PlayBody {
                uris: vec![uri.to_string()],
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// PUT /me/player/pause, scoped to a device when one is known
    pub async fn pause(&self, token: &str, device_id: Option<&str>) -> Result<()> {
        let url = format!("{}/me/player/pause", self.base_url);
        let mut request = self.http.put(url).bearer_auth(token);
        if let Some(device_id) = device_id {
            request = request.query(&[("device_id", device_id)]);
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }
}
