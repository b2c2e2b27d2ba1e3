//! Configuration for auto-appearance.
//!
//! Settings come from an optional TOML file merged with command-line flags,
//! flags taking precedence:
//!
//! ```toml
//! latitude = 40.7128        # Geographic latitude, north positive (-90 to 90)
//! longitude = -74.0060      # Geographic longitude, east positive (-180 to 180)
//! backend = "auto"          # "auto", "macos" or "gnome"
//! state_file = "/path/to/last-update.json"
//! ```
//!
//! The file lives at `<config dir>/auto-appearance/auto-appearance.toml`
//! unless `--config` names another one. Unknown keys are rejected so typos
//! do not silently fall back to defaults.

pub mod loading;
pub mod validation;

use serde::Deserialize;
use std::path::PathBuf;

use crate::args::RunOptions;
use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::state::default_state_path;

pub use loading::{get_config_path, load, load_from_path};
pub use validation::validate_coordinates;

/// Contents of the configuration file. Every field is optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub backend: Option<Backend>,
    pub state_file: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub latitude: f64,
    pub longitude: f64,
    pub force: bool,
    pub dry_run: bool,
    pub backend: Backend,
    pub state_path: PathBuf,
}

impl Settings {
    /// Merge command-line options over the file configuration.
    ///
    /// # Errors
    /// `Error::Config` if a coordinate is missing from both sources or out of
    /// range, or if no state path can be determined.
    pub fn resolve(options: &RunOptions, config: &Config) -> Result<Self> {
        let latitude = options.latitude.or(config.latitude).ok_or_else(|| {
            Error::Config("Missing latitude: pass --lat or set latitude in the config file".into())
        })?;
        let longitude = options.longitude.or(config.longitude).ok_or_else(|| {
            Error::Config(
                "Missing longitude: pass --lon or set longitude in the config file".into(),
            )
        })?;
        validate_coordinates(latitude, longitude)?;

        let state_path = match options.state_file.as_ref().or(config.state_file.as_ref()) {
            Some(path) => path.clone(),
            None => default_state_path()?,
        };

        Ok(Settings {
            latitude,
            longitude,
            force: options.force,
            dry_run: options.dry_run || options.at.is_some(),
            backend: options.backend.or(config.backend).unwrap_or_default(),
            state_path,
        })
    }
}
