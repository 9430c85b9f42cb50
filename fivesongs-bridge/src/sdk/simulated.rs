//! Simulated SDK backend
//!
//! In-process stand-in for the provider SDK: `connect` reports the device
//! ready under a generated id, state-change notifications are injected with
//! `emit`, and local pause/connect calls are counted so tests can verify the
//! controller's side of the contract. The dev binary runs against this
//! backend too.

use super::{DeviceConfig, PlaybackSdk, SdkDevice, SdkEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

pub struct SimulatedSdk {
    device_id: String,
    /// When false, `connect` stays silent and readiness is injected by hand
    auto_ready: bool,
    links: Mutex<Vec<mpsc::UnboundedSender<SdkEvent>>>,
    connect_calls: Arc<AtomicUsize>,
    pause_calls: Arc<AtomicUsize>,
    last_token: Arc<Mutex<Option<String>>>,
}

impl SimulatedSdk {
    pub fn new() -> Arc<Self> {
        Self::build(format!("sim-{}", Uuid::new_v4()), true)
    }

    pub fn with_device_id(device_id: impl Into<String>) -> Arc<Self> {
        Self::build(device_id.into(), true)
    }

    /// Backend whose devices never report ready on their own
    pub fn manual(device_id: impl Into<String>) -> Arc<Self> {
        Self::build(device_id.into(), false)
    }

    fn build(device_id: String, auto_ready: bool) -> Arc<Self> {
        Arc::new(Self {
            device_id,
            auto_ready,
            links: Mutex::new(Vec::new()),
            connect_calls: Arc::new(AtomicUsize::new(0)),
            pause_calls: Arc::new(AtomicUsize::new(0)),
            last_token: Arc::new(Mutex::new(None)),
        })
    }

    /// Device id announced on connect
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Push a notification to every device created from this SDK
    pub fn emit(&self, event: SdkEvent) {
        let links = self.links.lock().unwrap();
        for link in links.iter() {
            let _ = link.send(event.clone());
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn pause_count(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    /// Token most recently handed out by the supplier callback
    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

impl PlaybackSdk for SimulatedSdk {
    fn create_device(
        &self,
        config: DeviceConfig,
        events: mpsc::UnboundedSender<SdkEvent>,
    ) -> Arc<dyn SdkDevice> {
        self.links.lock().unwrap().push(events.clone());
        Arc::new(SimulatedDevice {
            device_id: self.device_id.clone(),
            auto_ready: self.auto_ready,
            config,
            events,
            connect_calls: Arc::clone(&self.connect_calls),
            pause_calls: Arc::clone(&self.pause_calls),
            last_token: Arc::clone(&self.last_token),
        })
    }
}

struct SimulatedDevice {
    device_id: String,
    auto_ready: bool,
    config: DeviceConfig,
    events: mpsc::UnboundedSender<SdkEvent>,
    connect_calls: Arc<AtomicUsize>,
    pause_calls: Arc<AtomicUsize>,
    last_token: Arc<Mutex<Option<String>>>,
}

impl SdkDevice for SimulatedDevice {
    fn connect(&self) {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        // A real SDK authenticates on connect; exercise the supplier seam
        let token = (self.config.token_supplier)();
        *self.last_token.lock().unwrap() = Some(token);
        if self.auto_ready {
            let _ = self.events.send(SdkEvent::Ready {
                device_id: self.device_id.clone(),
            });
        }
    }

    fn pause(&self) {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
    }
}
