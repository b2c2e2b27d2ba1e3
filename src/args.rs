//! Command-line argument parsing and processing.
//!
//! Handles the run flags, help and version, and reports unknown or malformed
//! options by asking the caller to show help and exit with an error.

use chrono::{DateTime, Local};
use std::path::PathBuf;

use crate::backend::Backend;
use crate::time_source::parse_datetime;

/// Settings for a normal run, as given on the command line.
///
/// Every `Option` left as `None` falls back to the config file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub force: bool,
    pub verbose: bool,
    pub dry_run: bool,
    /// Pretend the current time is this instant (implies `dry_run`)
    pub at: Option<DateTime<Local>>,
    pub backend: Option<Backend>,
    pub state_file: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Decide and (maybe) apply the appearance with these settings
    Run(RunOptions),
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Take the value for a flag, either from `--flag=value` or the next argument.
///
/// The next argument is consumed even if it starts with '-' so negative
/// coordinates like `--lon -74.0` work.
fn take_value(args: &[String], idx: &mut usize, inline: Option<&str>) -> Option<String> {
    if let Some(value) = inline {
        return Some(value.to_string());
    }
    let value = args.get(*idx).cloned();
    if value.is_some() {
        *idx += 1;
    }
    value
}

fn parse_coordinate(flag: &str, value: Option<String>) -> Option<f64> {
    let Some(value) = value else {
        log_warning!("Missing value for {flag}");
        return None;
    };
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => {
            log_warning!("Invalid number for {flag}: {value}");
            None
        }
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action. Version takes precedence
    /// over help, and help over any parse error.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = RunOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = args_vec[i].clone();
            i += 1;

            let (flag, inline) = match arg.split_once('=') {
                Some((name, value)) if name.starts_with("--") => (name, Some(value)),
                _ => (arg.as_str(), None),
            };

            match flag {
                "-h" | "--help" => display_help = true,
                "-V" | "--version" => display_version = true,
                "-f" | "--force" => options.force = true,
                "-v" | "--verbose" => options.verbose = true,
                "-n" | "--dry-run" => options.dry_run = true,
                "--lat" | "--latitude" => {
                    let value = take_value(&args_vec, &mut i, inline);
                    match parse_coordinate(flag, value) {
                        Some(lat) => options.latitude = Some(lat),
                        None => unknown_arg_found = true,
                    }
                }
                "--lon" | "--longitude" => {
                    let value = take_value(&args_vec, &mut i, inline);
                    match parse_coordinate(flag, value) {
                        Some(lon) => options.longitude = Some(lon),
                        None => unknown_arg_found = true,
                    }
                }
                "--at" => match take_value(&args_vec, &mut i, inline) {
                    Some(value) => match parse_datetime(&value) {
                        Ok(at) => options.at = Some(at),
                        Err(e) => {
                            log_warning!("Invalid time for --at: {e}");
                            unknown_arg_found = true;
                        }
                    },
                    None => {
                        log_warning!("Missing time for --at. Usage: --at \"YYYY-MM-DD HH:MM:SS\"");
                        unknown_arg_found = true;
                    }
                },
                "-b" | "--backend" => match take_value(&args_vec, &mut i, inline) {
                    Some(value) => match value.parse::<Backend>() {
                        Ok(backend) => options.backend = Some(backend),
                        Err(e) => {
                            log_warning!("{e}");
                            unknown_arg_found = true;
                        }
                    },
                    None => {
                        log_warning!("Missing value for --backend. Usage: --backend <auto|macos|gnome>");
                        unknown_arg_found = true;
                    }
                },
                "-s" | "--state-file" => match take_value(&args_vec, &mut i, inline) {
                    Some(value) => options.state_file = Some(PathBuf::from(value)),
                    None => {
                        log_warning!("Missing path for --state-file. Usage: --state-file <path>");
                        unknown_arg_found = true;
                    }
                },
                "-c" | "--config" => match take_value(&args_vec, &mut i, inline) {
                    Some(value) => options.config_path = Some(PathBuf::from(value)),
                    None => {
                        log_warning!("Missing path for --config. Usage: --config <path>");
                        unknown_arg_found = true;
                    }
                },
                _ => {
                    if flag.starts_with('-') {
                        log_warning!("Unknown option: {arg}");
                    } else {
                        log_warning!("Unexpected argument: {arg}");
                    }
                    unknown_arg_found = true;
                }
            }
        }

        if options.at.is_some() {
            options.dry_run = true;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help {
            CliAction::ShowHelp
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else {
            CliAction::Run(options)
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!("{}", env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("auto-appearance --lat <degrees> --lon <degrees> [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("    --lat <degrees>      Latitude, north positive");
    log_indented!("    --lon <degrees>      Longitude, east positive");
    log_indented!("-f, --force              Act even if already updated since the last sun motion");
    log_indented!("-n, --dry-run            Decide and report without changing anything");
    log_indented!("    --at <time>          Pretend it is \"YYYY-MM-DD HH:MM:SS\" (implies --dry-run)");
    log_indented!("-b, --backend <name>     auto, macos or gnome");
    log_indented!("-s, --state-file <path>  Where the last update time is recorded");
    log_indented!("-c, --config <path>      Use a custom configuration file");
    log_indented!("-v, --verbose            Enable detailed debug output");
    log_indented!("-h, --help               Print help information");
    log_indented!("-V, --version            Print version information");
    log_block_start!("Scheduling:");
    log_indented!("Run every few minutes from cron, launchd or a systemd timer.");
    log_indented!("Manual appearance changes are kept until the next sunrise or sunset.");
    log_end!();
}
