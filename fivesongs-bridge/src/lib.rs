//! # fivesongs Playback Bridge (fivesongs-bridge)
//!
//! Mediates between the controlling game process and the remote playback
//! provider: establishes a playback device on demand, queues the desired
//! track until the device is ready, issues the remote play command, and
//! detects when playback has audibly started. Also mirrors playlist and game
//! progress into session/durable storage so a session survives a reload.
//!
//! **Architecture:** HTTP command surface + SSE event stream over a
//! single-task device controller fed by one message channel.

pub mod api;
pub mod config;
pub mod device;
pub mod error;
pub mod sdk;
pub mod spotify;
pub mod state;
pub mod storage;

pub use error::{Error, Result};
pub use state::SharedState;
