//! Configuration file discovery and parsing.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::Config;
use super::validation::{validate_latitude, validate_longitude};
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{Error, Result};

/// Default location of the configuration file.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the configuration.
///
/// With an explicit path the file must exist. Without one, the default
/// location is used and a missing file yields an empty configuration.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let path = match get_config_path() {
        Ok(path) => path,
        Err(e) => {
            log_debug!("{e}; using built-in defaults");
            return Ok(Config::default());
        }
    };

    if !path.exists() {
        log_debug!("No config file at {}", path.display());
        return Ok(Config::default());
    }
    load_from_path(&path)
}

/// Load and validate configuration from a specific path.
///
/// This version does NOT fall back to defaults if the path doesn't exist.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            Error::Config(format!("Configuration file not found: {}", path.display()))
        }
        _ => Error::Config(format!("Failed to read config from {}: {e}", path.display())),
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config from {}: {}",
            path.display(),
            e.message()
        ))
    })?;

    if let Some(lat) = config.latitude {
        validate_latitude(lat)?;
    }
    if let Some(lon) = config.longitude {
        validate_longitude(lon)?;
    }

    log_debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
