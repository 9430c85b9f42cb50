//! Common error types for the fivesongs bridge

use thiserror::Error;

/// Common result type for fivesongs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared across fivesongs crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
