//! Configuration loading and data directory resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Data directory resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(data_dir));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_data_dir())
}

/// Get the configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("fivesongs").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/fivesongs/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fivesongs"))
        .unwrap_or_else(|| PathBuf::from("./fivesongs_data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const TEST_ENV_VAR: &str = "FIVESONGS_TEST_DATA_DIR";

    #[test]
    #[serial]
    fn cli_argument_wins() {
        std::env::set_var(TEST_ENV_VAR, "/from/env");
        let dir = resolve_data_dir(Some("/from/cli"), TEST_ENV_VAR).unwrap();
        std::env::remove_var(TEST_ENV_VAR);
        assert_eq!(dir, PathBuf::from("/from/cli"));
    }

    #[test]
    #[serial]
    fn env_var_beats_default() {
        std::env::set_var(TEST_ENV_VAR, "/from/env");
        let dir = resolve_data_dir(None, TEST_ENV_VAR).unwrap();
        std::env::remove_var(TEST_ENV_VAR);
        assert_eq!(dir, PathBuf::from("/from/env"));
    }

    #[test]
    #[serial]
    fn falls_back_to_platform_default() {
        std::env::remove_var(TEST_ENV_VAR);
        let dir = resolve_data_dir(None, TEST_ENV_VAR).unwrap();
        assert!(dir.to_string_lossy().contains("fivesongs"));
    }
}
