//! Device controller integration tests
//!
//! Drives the controller against the simulated SDK backend and a recording
//! stand-in for the Spotify Web API, covering the pending-intent rules, the
//! ready-flush, both confirmation strategies, and the pause paths.

mod helpers;

use fivesongs_bridge::device::{ControllerConfig, ControllerHandle, DeviceController, PlaybackIntent};
use fivesongs_bridge::sdk::simulated::SimulatedSdk;
use fivesongs_bridge::sdk::{SdkEvent, SdkGate, SdkInstaller};
use fivesongs_bridge::spotify::SpotifyApi;
use fivesongs_common::events::BridgeEvent;
use helpers::{recorded, spawn_fake_spotify, wait_until, Calls};
use std::time::Duration;
use tokio::sync::broadcast;

async fn spawn_controller(
    confirm_ms: u64,
) -> (
    ControllerHandle,
    broadcast::Receiver<BridgeEvent>,
    Calls,
    SdkInstaller,
) {
    let (base, calls) = spawn_fake_spotify().await;
    let (gate, installer) = SdkGate::new();
    let (event_tx, event_rx) = broadcast::channel(16);
    let controller = DeviceController::spawn(
        ControllerConfig {
            device_name: "5songs".to_string(),
            external_confirm_delay: Duration::from_millis(confirm_ms),
        },
        gate,
        SpotifyApi::new(base),
        event_tx,
    );
    (controller, event_rx, calls, installer)
}

fn intent(uri: &str, token: &str, device_id: Option<&str>) -> PlaybackIntent {
    PlaybackIntent {
        track_uri: uri.to_string(),
        auth_token: token.to_string(),
        device_id: device_id.map(String::from),
    }
}

async fn expect_event(rx: &mut broadcast::Receiver<BridgeEvent>, name: &str) {
    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {} event", name))
        .expect("event channel closed");
    assert_eq!(event.event_type(), name);
}

async fn expect_no_event(rx: &mut broadcast::Receiver<BridgeEvent>) {
    let outcome = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(outcome.is_err(), "unexpected event: {:?}", outcome);
}

#[tokio::test]
async fn play_before_sdk_loads_queues_latest_intent() {
    let (controller, _rx, calls, installer) = spawn_controller(1500).await;

    controller.play(intent("spotify:track:one", "tok-1", None));
    controller.play(intent("spotify:track:two", "tok-2", None));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(recorded(&calls).is_empty(), "no device, no remote call yet");

    // Capability arrives; the queued intent must flush, last write wins
    let sdk = SimulatedSdk::with_device_id("local-1");
    installer.install(sdk.clone());

    wait_until(|| recorded(&calls).len() == 1, "flushed play call").await;
    let call = recorded(&calls)[0].clone();
    assert_eq!(call.endpoint, "play");
    assert_eq!(call.uris, vec!["spotify:track:two"]);
    assert_eq!(call.bearer.as_deref(), Some("tok-2"));
    assert_eq!(call.device_id.as_deref(), Some("local-1"));

    // Nothing left to flush
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(recorded(&calls).len(), 1);
}

#[tokio::test]
async fn connecting_device_reconnects_and_flushes_latest() {
    let (controller, _rx, calls, installer) = spawn_controller(1500).await;
    let sdk = SimulatedSdk::manual("local-1");
    installer.install(sdk.clone());

    controller.play(intent("uri-one", "tok-1", None));
    wait_until(|| sdk.connect_count() == 1, "initial connect").await;

    // Device exists but is not ready; a second play requests a reconnect
    // and replaces the queued intent
    controller.play(intent("uri-two", "tok-2", None));
    wait_until(|| sdk.connect_count() == 2, "reconnect request").await;
    assert!(recorded(&calls).is_empty());

    sdk.emit(SdkEvent::Ready {
        device_id: "local-1".to_string(),
    });
    wait_until(|| recorded(&calls).len() == 1, "flushed play call").await;
    assert_eq!(recorded(&calls)[0].uris, vec!["uri-two"]);

    // A later ready notification with nothing queued must not replay
    sdk.emit(SdkEvent::Ready {
        device_id: "local-1".to_string(),
    });
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(recorded(&calls).len(), 1);
}

#[tokio::test]
async fn ready_device_plays_immediately_without_reconnect() {
    let (controller, _rx, calls, installer) = spawn_controller(1500).await;
    let sdk = SimulatedSdk::with_device_id("local-1");
    installer.install(sdk.clone());

    controller.play(intent("uri-one", "tok", None));
    wait_until(|| recorded(&calls).len() == 1, "first play call").await;

    controller.play(intent("uri-two", "tok", None));
    wait_until(|| recorded(&calls).len() == 2, "second play call").await;

    // The device is constructed once and reused
    assert_eq!(sdk.connect_count(), 1);
    assert_eq!(recorded(&calls)[1].uris, vec!["uri-two"]);
}

#[tokio::test]
async fn confirmation_fires_once_per_command() {
    let (controller, mut rx, calls, installer) = spawn_controller(1500).await;
    let sdk = SimulatedSdk::with_device_id("local-1");
    installer.install(sdk.clone());

    controller.play(intent("uri-one", "tok", None));
    wait_until(|| recorded(&calls).len() == 1, "play call").await;

    // A paused notification is not a start
    sdk.emit(SdkEvent::StateChanged { paused: true });
    expect_no_event(&mut rx).await;

    sdk.emit(SdkEvent::StateChanged { paused: false });
    expect_event(&mut rx, "playback_started").await;

    // Repeated not-paused notifications stay silent
    sdk.emit(SdkEvent::StateChanged { paused: false });
    expect_no_event(&mut rx).await;

    // The next command re-arms the flag
    controller.play(intent("uri-two", "tok", None));
    wait_until(|| recorded(&calls).len() == 2, "second play call").await;
    sdk.emit(SdkEvent::StateChanged { paused: false });
    expect_event(&mut rx, "playback_started").await;
}

#[tokio::test]
async fn external_device_confirms_after_grace_delay() {
    let (controller, mut rx, calls, _installer) = spawn_controller(100).await;

    // Explicit device id bypasses local-device management entirely; no SDK
    // is even installed here
    controller.play(intent("uri-one", "tok", Some("ext-9")));

    wait_until(|| recorded(&calls).len() == 1, "play call").await;
    assert_eq!(recorded(&calls)[0].device_id.as_deref(), Some("ext-9"));

    // No state-change notification ever arrives; the grace delay confirms
    expect_event(&mut rx, "playback_started").await;
}

#[tokio::test]
async fn missing_preconditions_drop_the_command() {
    let (controller, mut rx, calls, _installer) = spawn_controller(100).await;

    controller.play(intent("", "tok", Some("ext-9")));
    controller.play(intent("uri-one", "", Some("ext-9")));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(recorded(&calls).is_empty());
    expect_no_event(&mut rx).await;
}

#[tokio::test]
async fn pause_fires_remote_and_local_paths() {
    let (controller, _rx, calls, installer) = spawn_controller(1500).await;
    let sdk = SimulatedSdk::with_device_id("local-1");
    installer.install(sdk.clone());

    controller.play(intent("uri-one", "tok-1", None));
    wait_until(|| recorded(&calls).len() == 1, "play call").await;

    // No explicit token: the last-used one drives the remote pause
    controller.pause(None, None);
    wait_until(
        || recorded(&calls).iter().any(|c| c.endpoint == "pause"),
        "remote pause call",
    )
    .await;

    let pause = recorded(&calls)
        .into_iter()
        .find(|c| c.endpoint == "pause")
        .unwrap();
    assert_eq!(pause.bearer.as_deref(), Some("tok-1"));
    assert_eq!(pause.device_id.as_deref(), Some("local-1"));

    // The local device pause fires independently
    wait_until(|| sdk.pause_count() == 1, "local pause").await;
}

#[tokio::test]
async fn pause_with_explicit_token_targets_given_device() {
    let (controller, _rx, calls, _installer) = spawn_controller(1500).await;

    controller.pause(Some("tok-9".to_string()), Some("ext-1".to_string()));

    wait_until(|| recorded(&calls).len() == 1, "remote pause call").await;
    let pause = recorded(&calls)[0].clone();
    assert_eq!(pause.endpoint, "pause");
    assert_eq!(pause.bearer.as_deref(), Some("tok-9"));
    assert_eq!(pause.device_id.as_deref(), Some("ext-1"));
}

#[tokio::test]
async fn pause_without_any_token_skips_remote_call() {
    let (controller, _rx, calls, installer) = spawn_controller(1500).await;
    let sdk = SimulatedSdk::with_device_id("local-1");
    installer.install(sdk.clone());

    // No play has happened: no last-used token, no constructed device
    controller.pause(None, None);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(recorded(&calls).is_empty());
    assert_eq!(sdk.pause_count(), 0);
}

#[tokio::test]
async fn token_supplier_hands_out_current_token() {
    let (controller, _rx, _calls, installer) = spawn_controller(1500).await;
    let sdk = SimulatedSdk::manual("local-1");
    installer.install(sdk.clone());

    controller.play(intent("uri-one", "tok-1", None));
    wait_until(|| sdk.connect_count() == 1, "connect").await;

    assert_eq!(sdk.last_token().as_deref(), Some("tok-1"));
}
