//! Time source abstraction for real and fixed time.
//!
//! The decision engine reads "now" through a [`TimeSource`] so tests and
//! `--at` previews can pin the clock. A process-global source feeds log
//! timestamps and defaults to the wall clock.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};

/// Global time source instance, defaults to [`RealTimeSource`].
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting the current time.
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;
}

/// Wall-clock implementation.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// A clock that only moves when told to.
pub struct FixedTimeSource {
    current: Mutex<DateTime<Local>>,
}

impl FixedTimeSource {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(at),
        }
    }

    /// Move the clock to an absolute instant.
    pub fn set(&self, at: DateTime<Local>) {
        *self.lock() = at;
    }

    /// Move the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: ChronoDuration) {
        let mut guard = self.lock();
        *guard += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Local>> {
        // A poisoned clock still holds a valid instant
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.lock()
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if the global time source is simulated
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as local time.
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}
