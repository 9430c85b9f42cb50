//! Error types for fivesongs-bridge
//!
//! Module-specific error types using thiserror. Remote-call and storage
//! failures are swallowed at the component boundaries (the bridge never
//! surfaces them upstream), so these mostly travel between internals and
//! the tracing hooks that log them.

use thiserror::Error;

/// Main error type for fivesongs-bridge
#[derive(Error, Debug)]
pub enum Error {
    /// Storage access errors
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Remote playback provider call errors
    #[error("Remote call error: {0}")]
    Remote(#[from] reqwest::Error),

    /// Value serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type using the fivesongs-bridge Error
pub type Result<T> = std::result::Result<T, Error>;
