//! Error taxonomy for a single run.
//!
//! Every variant is fatal to the current invocation. There are no internal
//! retries; the scheduler that launched the run tries again on its next cycle.

use std::path::PathBuf;

/// Errors surfaced by the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The astronomical computation could not resolve a sunrise or sunset.
    #[error("cannot compute sun times for lat={latitude:.4}, lon={longitude:.4}: {reason}")]
    Computation {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    /// The state file exists but its timestamp field is malformed.
    #[error("invalid timestamp {value} in state file {}", path.display())]
    StateParse { path: PathBuf, value: String },

    /// The new state could not be persisted.
    #[error("failed to write state file {}", path.display())]
    StateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS appearance mechanism failed; the state file was left untouched.
    #[error("{backend} failed to set appearance: {reason}")]
    AppearanceSet {
        backend: &'static str,
        reason: String,
    },

    /// Invalid or incomplete configuration.
    #[error("{0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
