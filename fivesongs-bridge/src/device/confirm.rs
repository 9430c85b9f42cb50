//! Start-confirmation strategy
//!
//! The remote play call's HTTP ack does not mean audio is flowing. For the
//! locally-owned device the first not-paused state notification is the
//! confirmation; an externally selected device offers no state-change
//! visibility, so a fixed grace delay stands in for it.

use std::time::Duration;

/// Grace delay before assuming an external device has started
pub const DEFAULT_EXTERNAL_CONFIRM_DELAY: Duration = Duration::from_millis(1500);

/// How playback start is detected for one play command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStrategy {
    /// Wait for the first not-paused state notification
    StateChange,
    /// Assume started after the grace delay
    FixedDelay(Duration),
}

/// Pick the strategy by device-identity comparison at command time
pub fn select(
    local_device_id: Option<&str>,
    target_device_id: &str,
    grace: Duration,
) -> ConfirmStrategy {
    match local_device_id {
        Some(local) if local == target_device_id => ConfirmStrategy::StateChange,
        _ => ConfirmStrategy::FixedDelay(grace),
    }
}
