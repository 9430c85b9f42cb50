//! Shared bridge state
//!
//! Holds the event broadcaster that feeds the SSE stream. Device state lives
//! in the controller task, not here.

use fivesongs_common::events::BridgeEvent;
use tokio::sync::broadcast;

/// Shared state accessible by all handlers
pub struct SharedState {
    /// Event broadcaster for SSE events
    pub event_tx: broadcast::Sender<BridgeEvent>,
}

impl SharedState {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100); // Buffer up to 100 events
        Self { event_tx }
    }

    /// Broadcast an event to all SSE listeners
    pub fn broadcast_event(&self, event: BridgeEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<BridgeEvent> {
        self.event_tx.subscribe()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
