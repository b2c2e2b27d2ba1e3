//! Structured logging with box-drawing output.
//!
//! Every run prints a small visual tree: a version header, blocks of related
//! lines, and a terminal marker. Because the tool is normally launched by a
//! scheduler whose output is appended to a file, run output can carry a
//! timestamp on every line and colors are only emitted for terminals.
//!
//! ## Logging Conventions
//!
//! - **`log_block_start!`** opens a new conceptual block (`┃` spacer, then `┣ message`).
//! - **`log_decorated!`** continues a block (`┣ message`).
//! - **`log_indented!`** prints details belonging to the line above (`┃   message`).
//! - **`log_pipe!`** inserts an empty `┃` spacer before a leveled message.
//! - **`log_version!`** prints the `┏ auto-appearance vX.Y.Z ━━╸` header once per run.
//! - **`log_end!`** prints the final `╹` marker.
//! - **`log_info!`, `log_warning!`, `log_debug!`** print a `[LEVEL]`
//!   prefix. `log_debug!` is silent unless verbose output was requested.
//! - **`log_error_exit!`** closes the tree with `┗[ERROR]` right before a failing exit.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);
static TIMESTAMPS: AtomicBool = AtomicBool::new(false);

/// Timestamp format used for line prefixes and for instants shown in messages.
pub const DISPLAY_FORMAT: &str = "%y-%m-%d %I:%M %p";

/// Severity tags rendered as `[LEVEL]` after the pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Debug | Level::Info => "32",
            Level::Warning => "33",
            Level::Error => "31",
        }
    }
}

/// Main logging interface shared by the macros.
pub struct Log;

impl Log {
    /// Show `log_debug!` lines.
    pub fn set_verbose(verbose: bool) {
        VERBOSE.store(verbose, Ordering::SeqCst);
    }

    pub fn is_verbose() -> bool {
        VERBOSE.load(Ordering::SeqCst)
    }

    /// Prefix every line with the current time from the global time source.
    pub fn set_timestamps(enabled: bool) {
        TIMESTAMPS.store(enabled, Ordering::SeqCst);
    }

    /// Timestamp prefix for the current line, or an empty string when disabled.
    pub fn get_timestamp_prefix() -> String {
        if !TIMESTAMPS.load(Ordering::SeqCst) {
            return String::new();
        }
        let now = crate::time_source::now();
        if crate::time_source::is_simulated() {
            format!("[{} sim] ", now.format(DISPLAY_FORMAT))
        } else {
            format!("[{}] ", now.format(DISPLAY_FORMAT))
        }
    }

    /// Render a `[LEVEL]` tag, colored only when stdout is a terminal.
    pub fn level_tag(level: Level) -> String {
        if std::io::stdout().is_terminal() {
            format!("[\x1b[{}m{}\x1b[0m]", level.color(), level.label())
        } else {
            format!("[{}]", level.label())
        }
    }

    /// Write one or more prefixed lines. `lines` pairs a box-drawing marker with its text.
    pub fn emit(lines: &[(&str, &str)]) {
        let prefix = Self::get_timestamp_prefix();
        let mut out = String::new();
        for (marker, text) in lines {
            out.push_str(&prefix);
            out.push_str(marker);
            if !text.is_empty() {
                out.push(' ');
                out.push_str(text);
            }
            out.push('\n');
        }
        write_output(&out);
    }

    /// Write a leveled line such as `┣[INFO] message`.
    pub fn emit_level(marker: &str, level: Level, message: &str) {
        if level == Level::Debug && !Self::is_verbose() {
            return;
        }
        let prefix = Self::get_timestamp_prefix();
        write_output(&format!(
            "{prefix}{marker}{} {message}\n",
            Self::level_tag(level)
        ));
    }
}

pub fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

// # Logging Macros

/// Log a decorated message as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)*) => {{
        $crate::logger::Log::emit(&[("┣", &format!($($arg)*))]);
    }};
}

/// Log an indented detail line.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)*) => {{
        $crate::logger::Log::emit(&[("┃  ", &format!($($arg)*))]);
    }};
}

/// Log an empty pipe for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        $crate::logger::Log::emit(&[("┃", "")]);
    }};
}

/// Start a new block of related lines.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)*) => {{
        $crate::logger::Log::emit(&[("┃", ""), ("┣", &format!($($arg)*))]);
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        let header = format!("auto-appearance v{} ━━╸", env!("CARGO_PKG_VERSION"));
        $crate::logger::Log::emit(&[("┏", &header)]);
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        $crate::logger::Log::emit(&[("╹", "")]);
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::logger::Log::emit_level("┣", $crate::logger::Level::Info, &format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {{
        $crate::logger::Log::emit_level("┣", $crate::logger::Level::Warning, &format!($($arg)*));
    }};
}

/// Log a debug message, shown only in verbose mode.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        $crate::logger::Log::emit_level("┣", $crate::logger::Level::Debug, &format!($($arg)*));
    }};
}

/// Log an error that terminates the run, closing the tree.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)*) => {{
        $crate::logger::Log::emit(&[("┃", "")]);
        $crate::logger::Log::emit_level("┗", $crate::logger::Level::Error, &format!($($arg)*));
    }};
}
