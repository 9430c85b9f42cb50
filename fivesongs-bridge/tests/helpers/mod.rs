//! Shared test infrastructure
//!
//! A recording stand-in for the Spotify Web API plus polling helpers.

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::put;
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type Calls = Arc<Mutex<Vec<RemoteCall>>>;

/// One recorded request against the fake Web API
#[derive(Debug, Clone)]
pub struct RemoteCall {
    pub endpoint: &'static str,
    pub device_id: Option<String>,
    pub uris: Vec<String>,
    pub bearer: Option<String>,
}

/// Spawn a local recording stand-in for the Spotify Web API
///
/// Returns its base URL (point `SpotifyApi` at it) and the recorded calls.
pub async fn spawn_fake_spotify() -> (String, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/me/player/play", put(record_play))
        .route("/me/player/pause", put(record_pause))
        .with_state(Arc::clone(&calls));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake spotify");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake spotify");
    });

    (format!("http://{}", addr), calls)
}

async fn record_play(
    State(calls): State<Calls>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let uris = body["uris"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();
    calls.lock().unwrap().push(RemoteCall {
        endpoint: "play",
        device_id: params.get("device_id").cloned(),
        uris,
        bearer: bearer_token(&headers),
    });
    StatusCode::NO_CONTENT
}

async fn record_pause(
    State(calls): State<Calls>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> StatusCode {
    calls.lock().unwrap().push(RemoteCall {
        endpoint: "pause",
        device_id: params.get("device_id").cloned(),
        uris: Vec::new(),
        bearer: bearer_token(&headers),
    });
    StatusCode::NO_CONTENT
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(String::from)
}

/// Poll until `cond` holds, panicking after two seconds
pub async fn wait_until(mut cond: impl FnMut() -> bool, what: &str) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

/// Snapshot of the recorded calls
pub fn recorded(calls: &Calls) -> Vec<RemoteCall> {
    calls.lock().unwrap().clone()
}
