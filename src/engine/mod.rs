//! Appearance decision engine.
//!
//! One call to [`AppearanceEngine::update_appearance`] decides whether the OS
//! appearance should change now and, if so, to what. The decision rests on
//! one comparison: the last change this tool made versus the most recent
//! solar transition. If the tool already acted after that transition, either
//! it has nothing left to do or the user switched appearance by hand, and in
//! both cases the run stays quiet.
//!
//! ```text
//!   yesterday's next sunrise/sunset ──► last_movement
//!   stored last_update ───────────────► skip if last_update > last_movement
//!   today's next sunrise/sunset ──────► earliest motion decides appearance
//!   AppearanceSetter ─► on success ───► persist now()
//! ```
//!
//! All collaborators are injected so tests can replace each of them.

use chrono::{DateTime, Local};

use crate::backend::{Appearance, AppearanceSetter};
use crate::error::Result;
use crate::geo::{Motion, SolarTimeProvider, SunTimes, describe_sun_times, format_instant};
use crate::state::StateStore;
use crate::time_source::TimeSource;

/// What a single invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tool already reacted to the latest transition; nothing was changed.
    Skipped {
        last_movement: DateTime<Local>,
        last_update: DateTime<Local>,
    },
    /// The appearance was set and the update recorded.
    Applied {
        appearance: Appearance,
        next_motion: Motion,
        times: SunTimes,
        recorded_at: DateTime<Local>,
    },
    /// Dry run: the appearance that would have been set.
    Planned {
        appearance: Appearance,
        next_motion: Motion,
        times: SunTimes,
    },
}

impl Outcome {
    /// The appearance chosen by this run, if it got that far.
    pub fn appearance(&self) -> Option<Appearance> {
        match self {
            Outcome::Skipped { .. } => None,
            Outcome::Applied { appearance, .. } | Outcome::Planned { appearance, .. } => {
                Some(*appearance)
            }
        }
    }
}

/// The appearance that matches the period leading up to `next_motion`.
///
/// Before sunrise it is night, so dark; before sunset it is day, so light.
pub fn appearance_for(next_motion: Motion) -> Appearance {
    match next_motion {
        Motion::Sunrise => Appearance::Dark,
        Motion::Sunset => Appearance::Light,
    }
}

/// Decides and applies appearance changes.
pub struct AppearanceEngine<'a> {
    solar: &'a dyn SolarTimeProvider,
    store: &'a dyn StateStore,
    setter: &'a dyn AppearanceSetter,
    clock: &'a dyn TimeSource,
    dry_run: bool,
}

impl<'a> AppearanceEngine<'a> {
    pub fn new(
        solar: &'a dyn SolarTimeProvider,
        store: &'a dyn StateStore,
        setter: &'a dyn AppearanceSetter,
        clock: &'a dyn TimeSource,
    ) -> Self {
        Self {
            solar,
            store,
            setter,
            clock,
            dry_run: false,
        }
    }

    /// Decide without setting the appearance or recording anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Match the OS appearance to the sun at the given location.
    ///
    /// # Arguments
    /// * `latitude`, `longitude` - Location in signed degrees
    /// * `force` - Act even if the tool already acted since the last transition
    ///
    /// # Errors
    /// - `Error::Computation` if sun times cannot be resolved
    /// - `Error::StateParse` if the stored timestamp is malformed
    /// - `Error::AppearanceSet` if the OS refused; state is left unchanged
    /// - `Error::StateWrite` if the new state could not be recorded
    pub fn update_appearance(&self, latitude: f64, longitude: f64, force: bool) -> Result<Outcome> {
        log_debug!("User provided lat = {latitude}, lon = {longitude}");
        let now = self.clock.now();

        let last_movement = self.solar.sun_times(latitude, longitude, now, 1)?.latest();
        let last_update = self.store.read()?;

        let last_update_text = last_update
            .as_ref()
            .map_or_else(|| "Never".to_string(), format_instant);
        log_block_start!(
            "Last motion = {}, Last update = {last_update_text}",
            format_instant(&last_movement)
        );

        // A change after the last transition is either ours or the user's; keep it
        if !force
            && let Some(last_update) = last_update
            && last_update > last_movement
        {
            log_info!("Last change occurred after sun motion, so will not act.");
            return Ok(Outcome::Skipped {
                last_movement,
                last_update,
            });
        }
        if force {
            log_debug!("Force requested, ignoring last update");
        }

        let times = self.solar.sun_times(latitude, longitude, now, 0)?;
        log_decorated!("Next sun times: {}", describe_sun_times(&times));

        let next_motion = times.next_motion();
        let appearance = appearance_for(next_motion);

        if self.dry_run {
            log_decorated!("Dry run: would set appearance = \"{appearance}\"");
            return Ok(Outcome::Planned {
                appearance,
                next_motion,
                times,
            });
        }

        log_decorated!(
            "Updating appearance = \"{appearance}\" via {}",
            self.setter.backend_name()
        );
        self.setter.set_appearance(appearance)?;

        let recorded_at = self.clock.now();
        self.store.write(recorded_at)?;

        Ok(Outcome::Applied {
            appearance,
            next_motion,
            times,
            recorded_at,
        })
    }
}

#[cfg(test)]
mod tests;
