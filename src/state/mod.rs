//! Persistent record of the last appearance change.
//!
//! The engine owns exactly one piece of state, the instant of its last
//! successful change, and reaches it only through [`StateStore`]. The JSON
//! file implementation writes through a temporary file in the target
//! directory and renames it into place, so a concurrent reader never sees a
//! half-written record.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};

/// Storage for the last-update instant.
#[cfg_attr(test, mockall::automock)]
pub trait StateStore {
    /// The last successful update, or `None` if there never was one.
    ///
    /// # Errors
    /// `Error::StateParse` if a stored timestamp exists but cannot be parsed.
    fn read(&self) -> Result<Option<DateTime<Local>>>;

    /// Record a successful update, replacing any previous value.
    fn write(&self, at: DateTime<Local>) -> Result<()>;
}

/// Default location of the state file under the per-user data directory.
pub fn default_state_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Config("Could not determine user data directory".into()))?;
    Ok(data_dir.join(STATE_DIR_NAME).join(STATE_FILE_NAME))
}

/// JSON file holding `{"last_update": "<ISO-8601>"}`.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_error(&self, value: &Value) -> Error {
        Error::StateParse {
            path: self.path.clone(),
            value: value.to_string(),
        }
    }
}

impl StateStore for JsonStateStore {
    fn read(&self) -> Result<Option<DateTime<Local>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                log_warning!(
                    "Cannot read state file {}: {e}. Treating as never updated",
                    self.path.display()
                );
                return Ok(None);
            }
        };

        let record: Value = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                log_warning!(
                    "State file {} is corrupt ({e}). Treating as never updated",
                    self.path.display()
                );
                return Ok(None);
            }
        };

        match record.get(LAST_UPDATE_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => parse_timestamp(raw)
                .map(Some)
                .ok_or_else(|| self.parse_error(&Value::String(raw.clone()))),
            Some(other) => Err(self.parse_error(other)),
        }
    }

    fn write(&self, at: DateTime<Local>) -> Result<()> {
        let write_error = |source: std::io::Error| Error::StateWrite {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(write_error)?;

        let mut record = Map::new();
        record.insert(LAST_UPDATE_KEY.to_string(), Value::String(at.to_rfc3339()));
        let body = serde_json::to_string_pretty(&Value::Object(record))
            .map_err(|e| write_error(e.into()))?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(write_error)?;
        temp.write_all(body.as_bytes()).map_err(write_error)?;
        temp.write_all(b"\n").map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(&self.path).map_err(|e| write_error(e.error))?;

        log_debug!("Recorded last update {} in {}", at.to_rfc3339(), self.path.display());
        Ok(())
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepted, in order:
/// - RFC 3339 (`2024-06-21T07:00:00+02:00`, `...Z`), also with a space
///   separator; the offset is kept
/// - naive `YYYY-MM-DD[T| ]HH:MM[:SS[.fraction]]`, as written by earlier releases
/// - a bare `YYYY-MM-DD`, meaning local midnight
///
/// Naive values are read as local time. Anything else, such as week dates or
/// hour-only times, is rejected.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z"))
    {
        return Some(dt.with_timezone(&Local));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Local.from_local_datetime(&naive).earliest()
}
