//! fivesongs-bridge specific configuration

use std::path::PathBuf;
use std::time::Duration;

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub spotify_api_base: String,
    pub device_name: String,
    pub external_confirm_delay: Duration,
}
