//! Backend abstraction for setting the OS light/dark appearance.
//!
//! The decision engine talks to a single [`AppearanceSetter`] capability. Each
//! platform mechanism lives behind it:
//!
//! - **macOS Backend**: asks System Events through `osascript`
//! - **GNOME Backend**: flips `org.gnome.desktop.interface color-scheme` with `gsettings`
//!
//! ## Backend Selection
//!
//! - **Auto-detection**: macOS builds use the macOS backend; elsewhere the
//!   desktop named in `XDG_CURRENT_DESKTOP` decides
//! - **Explicit Configuration**: `backend = "macos"` / `"gnome"` in the config file,
//!   or `--backend` on the command line

use serde::Deserialize;
use std::fmt;
use std::process::Command;
use std::str::FromStr;

use crate::error::{Error, Result};

pub mod gnome;
pub mod macos;

/// The two OS display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn is_dark(self) -> bool {
        self == Appearance::Dark
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Appearance::Light => "light",
            Appearance::Dark => "dark",
        })
    }
}

/// Capability to change the OS appearance.
#[cfg_attr(test, mockall::automock)]
pub trait AppearanceSetter {
    /// Switch the OS to `appearance`.
    ///
    /// # Errors
    /// `Error::AppearanceSet` when the platform mechanism reports failure.
    fn set_appearance(&self, appearance: Appearance) -> Result<()>;

    /// A human-readable name for this backend (e.g. "macOS", "GNOME").
    fn backend_name(&self) -> &'static str;
}

/// Backend preference from the config file or the command line.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Auto,
    MacOs,
    Gnome,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::MacOs => "macos",
            Backend::Gnome => "gnome",
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "macos" | "mac" => Ok(Backend::MacOs),
            "gnome" => Ok(Backend::Gnome),
            other => Err(Error::Config(format!(
                "Unknown backend '{other}' (expected auto, macos or gnome)"
            ))),
        }
    }
}

/// Concrete backend chosen for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    MacOs,
    Gnome,
}

impl BackendType {
    pub fn name(&self) -> &'static str {
        match self {
            BackendType::MacOs => "macOS",
            BackendType::Gnome => "GNOME",
        }
    }
}

/// Desktops that honor the GNOME color-scheme setting.
const GNOME_LIKE_DESKTOPS: &[&str] = &["gnome", "unity", "budgie", "pantheon", "ubuntu"];

/// Resolve the configured preference to a concrete backend.
///
/// `desktop` is the value of `XDG_CURRENT_DESKTOP`, passed in so detection
/// stays testable.
pub fn detect_backend(preference: Backend, desktop: Option<&str>) -> Result<BackendType> {
    match preference {
        Backend::MacOs => Ok(BackendType::MacOs),
        Backend::Gnome => Ok(BackendType::Gnome),
        Backend::Auto => {
            if cfg!(target_os = "macos") {
                return Ok(BackendType::MacOs);
            }

            let is_gnome_like = desktop.is_some_and(|value| {
                value
                    .split(':')
                    .any(|part| GNOME_LIKE_DESKTOPS.contains(&part.trim().to_lowercase().as_str()))
            });
            if is_gnome_like {
                Ok(BackendType::Gnome)
            } else {
                Err(Error::Config(format!(
                    "No supported appearance backend detected (desktop: {}). Use --backend macos or --backend gnome",
                    desktop.unwrap_or("unknown")
                )))
            }
        }
    }
}

/// Create the setter for a backend type.
pub fn create_backend(backend_type: BackendType) -> Box<dyn AppearanceSetter> {
    match backend_type {
        BackendType::MacOs => Box::new(macos::MacOsBackend::new()),
        BackendType::Gnome => Box::new(gnome::GnomeBackend::new()),
    }
}

/// Run an external command to completion, mapping any failure to `Error::AppearanceSet`.
pub(crate) fn run_command(backend: &'static str, command: &mut Command) -> Result<()> {
    log_debug!("Running {command:?}");

    let output = command.output().map_err(|e| Error::AppearanceSet {
        backend,
        reason: format!("could not run {:?}: {e}", command.get_program()),
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let reason = if stderr.is_empty() {
        format!("command exited with {}", output.status)
    } else {
        format!("command exited with {}: {stderr}", output.status)
    };
    Err(Error::AppearanceSet { backend, reason })
}
