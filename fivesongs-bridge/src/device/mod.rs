//! Playback device ownership
//!
//! The controller task owns the device lifecycle and the single pending
//! play intent; the confirm module decides how playback start is detected
//! for each command.

pub mod confirm;
pub mod controller;

pub use controller::{ControllerConfig, ControllerHandle, DeviceController};

/// A queued request to play a specific track once a device is available
///
/// At most one intent is pending at a time; a newer intent always replaces
/// an unconsumed one.
#[derive(Debug, Clone)]
pub struct PlaybackIntent {
    pub track_uri: String,
    pub auth_token: String,
    /// Explicitly selected external device; bypasses local-device management
    pub device_id: Option<String>,
}

/// Readiness of the locally-owned device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// No device constructed yet
    Uninitialized,
    /// Device constructed, waiting for the ready notification
    Connecting,
    /// Device ready under this id; never recreated once here
    Ready(String),
}

impl DeviceState {
    /// Device id when ready
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::Ready(id) => Some(id),
            _ => None,
        }
    }
}
