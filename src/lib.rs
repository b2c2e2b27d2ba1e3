//! # Auto Appearance Library
//!
//! Internal library for the `auto-appearance` binary.
//!
//! This library exists to enable testing of the decision logic and keep a clean
//! separation between CLI dispatch (main.rs) and application behavior.
//!
//! ## Architecture
//!
//! - **Decision**: `engine` decides whether to act and which appearance to apply
//! - **Solar**: `geo` resolves the next sunrise/sunset around an instant
//! - **State**: `state` persists the instant of the last successful change
//! - **Backends**: `backend` switches macOS or GNOME between light and dark
//! - **Configuration**: `config` merges the TOML file with command-line flags
//! - **Infrastructure**: run lock, injectable clock, logging and errors

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod backend;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geo;
pub mod io;
pub mod state;
pub mod time_source;

pub use engine::{AppearanceEngine, Outcome};
pub use error::{Error, Result};
