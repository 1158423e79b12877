//! Where the client keeps its configuration.
//!
//! # Platform Behavior
//! - **Linux**: `$XDG_CONFIG_HOME/covert` or `~/.config/covert`
//! - **macOS**: `~/Library/Application Support/covert`
//! - **Windows**: `%APPDATA%/covert`

use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::PathBuf;

use log::{debug, info, warn};

pub const CONFIG_DIR_ENV: &str = "COVERT_CONFIG_DIR";
const APP_DIR_NAME: &str = "covert";

/// Resolve the configuration directory.
///
/// `COVERT_CONFIG_DIR` wins over the platform default.
///
/// # Errors
///
/// Returns [`ConfigError::DirectoryNotFound`] if neither is available.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
        info!("Using {CONFIG_DIR_ENV} override: {custom_dir:?}");
        return Ok(PathBuf::from(custom_dir));
    }

    match dirs::config_dir() {
        Some(base) => {
            let dir = base.join(APP_DIR_NAME);
            debug!("Platform config dir: {dir:?}");
            Ok(dir)
        }
        None => Err(ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("No platform config directory and {CONFIG_DIR_ENV} is not set"),
        }),
    }
}

/// Load `.env` from the working directory or next to the executable.
///
/// Returns the file that was loaded, if any. Variables already set in the
/// process environment are left alone.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {path:?}");
        return Some(path);
    }

    let exe_dir = env::current_exe().ok()?.parent()?.to_path_buf();
    let env_path = exe_dir.join(".env");
    if !env_path.exists() {
        return None;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {env_path:?}");
            Some(env_path)
        }
        Err(e) => {
            warn!("Failed to parse .env at {env_path:?}: {e}");
            None
        }
    }
}
