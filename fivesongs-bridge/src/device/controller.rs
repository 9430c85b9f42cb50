//! Device controller task
//!
//! All device state (readiness, the pending intent, the confirmation flag)
//! lives in one task. Commands from the API, SDK notifications, and
//! confirmation timers arrive on a single channel, so every transition is
//! ordered by message arrival and nothing needs a lock.
//!
//! Failures stay inside: a play command missing its uri, token, or target is
//! silently dropped, and remote-call errors are logged and swallowed. The
//! controlling process only ever sees the playback-started event.

use crate::device::confirm::{self, ConfirmStrategy};
use crate::device::{DeviceState, PlaybackIntent};
use crate::sdk::{DeviceConfig, PlaybackSdk, SdkDevice, SdkEvent, SdkGate};
use crate::spotify::SpotifyApi;
use fivesongs_common::events::BridgeEvent;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Controller tuning
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Display name for the constructed device
    pub device_name: String,
    /// Grace delay before confirming playback on an external device
    pub external_confirm_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_name: "5songs".to_string(),
            external_confirm_delay: confirm::DEFAULT_EXTERNAL_CONFIRM_DELAY,
        }
    }
}

/// Messages processed by the controller task
enum Msg {
    Play(PlaybackIntent),
    Pause {
        token: Option<String>,
        device_id: Option<String>,
    },
    /// The SDK capability finished loading
    SdkLoaded,
    /// Notification from the device subscription
    Sdk(SdkEvent),
    /// External-device confirmation grace delay elapsed
    ConfirmDelayElapsed,
}

/// Handle for submitting commands to a running controller
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<Msg>,
}

impl ControllerHandle {
    pub fn play(&self, intent: PlaybackIntent) {
        let _ = self.tx.send(Msg::Play(intent));
    }

    pub fn pause(&self, token: Option<String>, device_id: Option<String>) {
        let _ = self.tx.send(Msg::Pause { token, device_id });
    }
}

pub struct DeviceController {
    config: ControllerConfig,
    sdk_gate: SdkGate,
    spotify: SpotifyApi,
    events: broadcast::Sender<BridgeEvent>,
    /// Own sender, cloned into spawned side tasks
    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,

    state: DeviceState,
    device: Option<Arc<dyn SdkDevice>>,
    pending: Option<PlaybackIntent>,
    /// Confirmation flag; true blocks further playback-started signals
    /// until the next play command resets it
    started_sent: bool,
    /// Token of the most recent play, for pauses arriving without one
    last_token: Option<String>,
    /// Source read by the device's token-supplier callback
    current_token: Arc<Mutex<String>>,
    /// One-shot guard for the capability-ready registration
    waiting_for_sdk: bool,
}

impl DeviceController {
    /// Spawn the controller task and return its command handle
    pub fn spawn(
        config: ControllerConfig,
        sdk_gate: SdkGate,
        spotify: SpotifyApi,
        events: broadcast::Sender<BridgeEvent>,
    ) -> ControllerHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            config,
            sdk_gate,
            spotify,
            events,
            tx: tx.clone(),
            rx,
            state: DeviceState::Uninitialized,
            device: None,
            pending: None,
            started_sent: true,
            last_token: None,
            current_token: Arc::new(Mutex::new(String::new())),
            waiting_for_sdk: false,
        };
        tokio::spawn(controller.run());
        ControllerHandle { tx }
    }

    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            self.handle(msg);
        }
        debug!("controller channel closed, task exiting");
    }

    fn handle(&mut self, msg: Msg) {
        match msg {
            Msg::Play(intent) => {
                *self.current_token.lock().unwrap() = intent.auth_token.clone();
                // A new intent always supersedes an unconsumed one
                self.pending = Some(intent);
                self.ensure_device_then_play();
            }
            Msg::Pause { token, device_id } => self.pause(token, device_id),
            Msg::SdkLoaded => {
                self.waiting_for_sdk = false;
                if self.device.is_none() {
                    if let Some(sdk) = self.sdk_gate.try_get() {
                        self.initialize_device(sdk);
                    }
                }
            }
            Msg::Sdk(SdkEvent::Ready { device_id }) => {
                info!("playback device ready: {}", device_id);
                self.state = DeviceState::Ready(device_id);
                if let Some(intent) = self.pending.take() {
                    self.issue_play(intent);
                }
            }
            Msg::Sdk(SdkEvent::NotReady) => {
                // No teardown, no retry; the handle stays usable
                debug!("playback device reported not-ready");
            }
            Msg::Sdk(SdkEvent::StateChanged { paused }) => {
                if !paused {
                    self.confirm_started();
                }
            }
            Msg::ConfirmDelayElapsed => self.confirm_started(),
        }
    }

    /// Signal playback-started, at most once per play command
    fn confirm_started(&mut self) {
        if self.started_sent {
            return;
        }
        self.started_sent = true;
        let _ = self.events.send(BridgeEvent::playback_started());
    }

    fn ensure_device_then_play(&mut self) {
        // An explicitly selected external device bypasses local-device
        // management entirely
        if self.pending.as_ref().is_some_and(|i| i.device_id.is_some()) {
            if let Some(intent) = self.pending.take() {
                self.issue_play(intent);
            }
            return;
        }
        if matches!(self.state, DeviceState::Ready(_)) {
            if let Some(intent) = self.pending.take() {
                self.issue_play(intent);
            }
            return;
        }
        if let Some(device) = &self.device {
            // Device exists but is not ready; request a reconnect and leave
            // the intent queued for the ready notification to flush
            device.connect();
            return;
        }
        match self.sdk_gate.try_get() {
            Some(sdk) => self.initialize_device(sdk),
            None => self.wait_for_sdk(),
        }
    }

    /// One-shot capability-ready registration
    fn wait_for_sdk(&mut self) {
        if self.waiting_for_sdk {
            return;
        }
        self.waiting_for_sdk = true;
        debug!("SDK capability not loaded yet, queueing device init");
        let gate = self.sdk_gate.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            gate.loaded().await;
            let _ = tx.send(Msg::SdkLoaded);
        });
    }

    fn initialize_device(&mut self, sdk: Arc<dyn PlaybackSdk>) {
        let token_source = Arc::clone(&self.current_token);
        let config = DeviceConfig {
            name: self.config.device_name.clone(),
            volume: 1.0,
            token_supplier: Arc::new(move || token_source.lock().unwrap().clone()),
        };

        // Forward device notifications into the controller channel; the
        // subscription lives as long as the device does
        let (sdk_tx, mut sdk_rx) = mpsc::unbounded_channel();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            while let Some(event) = sdk_rx.recv().await {
                if tx.send(Msg::Sdk(event)).is_err() {
                    break;
                }
            }
        });

        let device = sdk.create_device(config, sdk_tx);
        self.state = DeviceState::Connecting;
        device.connect();
        self.device = Some(device);
    }

    fn issue_play(&mut self, intent: PlaybackIntent) {
        // Explicit id takes precedence over the locally-owned device
        let target = intent
            .device_id
            .clone()
            .or_else(|| self.state.device_id().map(str::to_string));

        // Missing preconditions drop the command, not an error
        if intent.track_uri.is_empty() || intent.auth_token.is_empty() {
            debug!("play dropped: missing uri or token");
            return;
        }
        let Some(target) = target else {
            debug!("play dropped: no target device");
            return;
        };

        self.last_token = Some(intent.auth_token.clone());
        // Reset the confirmation flag for this command
        self.started_sent = false;

        let strategy = confirm::select(
            self.state.device_id(),
            &target,
            self.config.external_confirm_delay,
        );
        let spotify = self.spotify.clone();
        let tx = self.tx.clone();
        // The remote call must not block message processing, and an
        // in-flight call is never cancelled by a newer command
        tokio::spawn(async move {
            match spotify
                .play(&target, &intent.track_uri, &intent.auth_token)
                .await
            {
                Ok(()) => match strategy {
                    // The device subscription is already attached; the
                    // flag reset above armed it
                    ConfirmStrategy::StateChange => {}
                    ConfirmStrategy::FixedDelay(grace) => {
                        // No state-change visibility into an external
                        // device; assume it starts within the grace window
                        tokio::time::sleep(grace).await;
                        let _ = tx.send(Msg::ConfirmDelayElapsed);
                    }
                },
                Err(e) => warn!("remote play call failed: {}", e),
            }
        });
    }

    fn pause(&mut self, token: Option<String>, device_id: Option<String>) {
        let token = token.or_else(|| self.last_token.clone());
        if let Some(token) = token {
            let target = device_id.or_else(|| self.state.device_id().map(str::to_string));
            let spotify = self.spotify.clone();
            tokio::spawn(async move {
                if let Err(e) = spotify.pause(&token, target.as_deref()).await {
                    warn!("remote pause call failed: {}", e);
                }
            });
        }
        // The local pause fires independently of the remote path
        if let Some(device) = &self.device {
            device.pause();
        }
    }
}
