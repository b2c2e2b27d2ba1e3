//! Main application entry point and high-level flow coordination.
//!
//! One invocation is one decision. The binary is meant to be run on a
//! schedule (cron, launchd, systemd timers); it does not loop.
//!
//! The flow:
//! 1. Argument parsing and early exit for help/version
//! 2. Configuration loading and merge with command-line flags
//! 3. Backend detection
//! 4. Run lock (skipped for dry runs)
//! 5. Decision and, when due, the appearance change
//!
//! Every failure ends in a single `┗[ERROR]` line and a nonzero exit code.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use auto_appearance::args::{self, CliAction, ParsedArgs, RunOptions};
use auto_appearance::backend::{create_backend, detect_backend};
use auto_appearance::config::{self, Settings};
use auto_appearance::constants::*;
use auto_appearance::engine::{AppearanceEngine, Outcome};
use auto_appearance::geo::{SunriseCalculator, format_instant};
use auto_appearance::io::lock::RunLock;
use auto_appearance::logger::Log;
use auto_appearance::state::JsonStateStore;
use auto_appearance::time_source::{self, FixedTimeSource, RealTimeSource, TimeSource};
use auto_appearance::{
    log_block_start, log_debug, log_decorated, log_end, log_error_exit, log_indented, log_pipe,
    log_version,
};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let options = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            std::process::exit(EXIT_SUCCESS);
        }
        CliAction::ShowHelp => {
            args::display_help();
            std::process::exit(EXIT_SUCCESS);
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run(options) => options,
    };

    if let Err(e) = run(options) {
        log_error_exit!("{e:#}");
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(options: RunOptions) -> Result<()> {
    Log::set_verbose(options.verbose);

    // Install the clock before anything logs so timestamps agree with decisions
    let clock: Arc<dyn TimeSource> = match options.at {
        Some(at) => Arc::new(FixedTimeSource::new(at)),
        None => Arc::new(RealTimeSource),
    };
    time_source::init_time_source(clock.clone());
    Log::set_timestamps(true);

    log_version!();

    let config = config::load(options.config_path.as_deref())?;
    let settings = Settings::resolve(&options, &config)?;

    let desktop = std::env::var("XDG_CURRENT_DESKTOP").ok();
    let backend_type = detect_backend(settings.backend, desktop.as_deref())?;
    log_debug!(
        "Backend: {} (preference: {})",
        backend_type.name(),
        settings.backend.as_str()
    );
    log_debug!("State file: {}", settings.state_path.display());

    // Dry runs never write, so they do not need to exclude other runs
    let _lock = if settings.dry_run {
        None
    } else {
        match acquire_lock(&settings.state_path)? {
            Some(lock) => Some(lock),
            None => {
                log_end!();
                return Ok(());
            }
        }
    };

    let solar = SunriseCalculator;
    let store = JsonStateStore::new(&settings.state_path);
    let setter = create_backend(backend_type);

    let engine = AppearanceEngine::new(&solar, &store, setter.as_ref(), clock.as_ref())
        .with_dry_run(settings.dry_run);
    let outcome = engine.update_appearance(settings.latitude, settings.longitude, settings.force)?;

    report(&outcome);
    log_end!();
    Ok(())
}

/// Take the run lock next to the state file.
///
/// Returns `Ok(None)` when another run holds it; that run will do the work.
fn acquire_lock(state_path: &Path) -> Result<Option<RunLock>> {
    let lock_path = state_path.with_file_name(LOCK_FILE_NAME);
    let lock = RunLock::acquire(&lock_path)
        .with_context(|| format!("Could not take run lock {}", lock_path.display()))?;

    if lock.is_none() {
        log_block_start!("Another run is in progress, leaving the work to it");
        if let Some(pid) = RunLock::holder_pid(&lock_path) {
            log_indented!("Lock held by PID {pid}");
        }
    }
    Ok(lock)
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Skipped { .. } => {}
        Outcome::Applied {
            appearance,
            next_motion,
            times,
            recorded_at,
        } => {
            log_block_start!("Appearance set to {appearance}");
            log_indented!(
                "Holds until {next_motion} @ {}",
                format_instant(&times.get(*next_motion))
            );
            log_debug!("Recorded update at {}", format_instant(recorded_at));
        }
        Outcome::Planned {
            appearance,
            next_motion,
            times,
        } => {
            log_block_start!("Dry run, nothing changed");
            log_indented!(
                "Would set {appearance} until {next_motion} @ {}",
                format_instant(&times.get(*next_motion))
            );
        }
    }
    log_pipe!();
    log_decorated!("Done");
}
