//! Remote playback SDK capability seam
//!
//! The provider SDK is an external capability: it constructs a
//! browser-resident playback device, connects it, and notifies about device
//! lifecycle and playback state. The bridge only depends on the traits here;
//! the shipped binary installs the simulated backend and a real integration
//! installs its own through the same gate.
//!
//! The SDK may not be loaded yet when the first play command arrives, so
//! availability is modeled as a gate: `try_get` for the synchronous check,
//! `loaded` to await the capability-ready signal.

pub mod simulated;

use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Notifications pushed by an SDK device
#[derive(Debug, Clone, PartialEq)]
pub enum SdkEvent {
    /// Device is ready to accept remote commands under this id
    Ready { device_id: String },
    /// Device dropped out; the handle stays valid
    NotReady,
    /// Playback state changed
    StateChanged { paused: bool },
}

/// Callback supplying the current auth token on demand
pub type TokenSupplier = Arc<dyn Fn() -> String + Send + Sync>;

/// Construction parameters for an SDK device
#[derive(Clone)]
pub struct DeviceConfig {
    /// Display name shown in the provider's device pickers
    pub name: String,
    /// Initial volume, 0.0-1.0
    pub volume: f32,
    pub token_supplier: TokenSupplier,
}

/// The provider SDK capability
pub trait PlaybackSdk: Send + Sync {
    /// Construct a device; notifications flow through `events`
    fn create_device(
        &self,
        config: DeviceConfig,
        events: mpsc::UnboundedSender<SdkEvent>,
    ) -> Arc<dyn SdkDevice>;
}

/// A constructed SDK device
pub trait SdkDevice: Send + Sync {
    /// Start (or re-request) the device connection; readiness arrives as
    /// an `SdkEvent::Ready` notification
    fn connect(&self);

    /// Pause playback locally on this device
    fn pause(&self);
}

/// Read side of the SDK availability gate
#[derive(Clone)]
pub struct SdkGate {
    rx: watch::Receiver<Option<Arc<dyn PlaybackSdk>>>,
}

/// Write side of the SDK availability gate
pub struct SdkInstaller {
    tx: watch::Sender<Option<Arc<dyn PlaybackSdk>>>,
}

impl SdkGate {
    pub fn new() -> (SdkGate, SdkInstaller) {
        let (tx, rx) = watch::channel(None);
        (SdkGate { rx }, SdkInstaller { tx })
    }

    /// The SDK, if it has been installed
    pub fn try_get(&self) -> Option<Arc<dyn PlaybackSdk>> {
        self.rx.borrow().clone()
    }

    /// Wait for the SDK to be installed
    ///
    /// Never resolves if the capability never loads; callers queue their
    /// pending work behind this signal.
    pub async fn loaded(&self) -> Arc<dyn PlaybackSdk> {
        let mut rx = self.rx.clone();
        loop {
            if let Some(sdk) = rx.borrow().clone() {
                return sdk;
            }
            if rx.changed().await.is_err() {
                // Installer dropped without installing; the capability will
                // never arrive
                std::future::pending::<()>().await;
            }
        }
    }
}

impl SdkInstaller {
    /// Install the SDK, releasing every waiter
    pub fn install(&self, sdk: Arc<dyn PlaybackSdk>) {
        let _ = self.tx.send(Some(sdk));
    }
}

#[cfg(test)]
mod tests {
    use super::simulated::SimulatedSdk;
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn gate_is_empty_until_installed() {
        let (gate, installer) = SdkGate::new();
        assert!(gate.try_get().is_none());

        installer.install(SimulatedSdk::new());
        assert!(gate.try_get().is_some());
    }

    #[tokio::test]
    async fn loaded_resolves_on_install() {
        let (gate, installer) = SdkGate::new();

        let waiter = tokio::spawn(async move { gate.loaded().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        installer.install(SimulatedSdk::new());

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("loaded() should resolve once the SDK is installed")
            .unwrap();
    }
}
