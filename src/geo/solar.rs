//! Sunrise and sunset lookup backed by the `sunrise` crate.
//!
//! The crate answers "when does the sun rise and set on this date", while the
//! engine needs "when is the next sunrise and the next sunset after this
//! instant". This module bridges the two by scanning a few dates around the
//! reference and keeping the earliest event of each kind that lies strictly
//! after it.
//!
//! On a date where the sun never crosses the horizon (polar day or night) the
//! crate still returns numbers, just meaningless ones. A date only counts when
//! both of its events land near that date's local solar noon and sunrise
//! precedes sunset. Events are only taken from an unbroken run of such dates
//! around the reference, and the next event must follow one of the opposite
//! kind, so the days where polar day or night begins or ends are reported as
//! errors rather than paired across the gap.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};
use std::fmt;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::constants::*;
use crate::error::{Error, Result};

/// Kind of solar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Sunrise,
    Sunset,
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Motion::Sunrise => "sunrise",
            Motion::Sunset => "sunset",
        })
    }
}

/// The next sunrise and the next sunset after some reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    sunrise: DateTime<Local>,
    sunset: DateTime<Local>,
}

impl SunTimes {
    pub fn new(sunrise: DateTime<Local>, sunset: DateTime<Local>) -> Self {
        Self { sunrise, sunset }
    }

    pub fn get(&self, motion: Motion) -> DateTime<Local> {
        match motion {
            Motion::Sunrise => self.sunrise,
            Motion::Sunset => self.sunset,
        }
    }

    pub fn sunrise(&self) -> DateTime<Local> {
        self.sunrise
    }

    pub fn sunset(&self) -> DateTime<Local> {
        self.sunset
    }

    /// The later of the two instants.
    pub fn latest(&self) -> DateTime<Local> {
        self.sunrise.max(self.sunset)
    }

    /// The motion that happens first. Equal instants resolve to sunset.
    pub fn next_motion(&self) -> Motion {
        if self.sunrise < self.sunset {
            Motion::Sunrise
        } else {
            Motion::Sunset
        }
    }

    /// Both events in chronological order, using the same tie-break as [`Self::next_motion`].
    pub fn iter(&self) -> impl Iterator<Item = (Motion, DateTime<Local>)> {
        let first = self.next_motion();
        let second = match first {
            Motion::Sunrise => Motion::Sunset,
            Motion::Sunset => Motion::Sunrise,
        };
        [(first, self.get(first)), (second, self.get(second))].into_iter()
    }
}

/// Source of sunrise/sunset instants for the decision engine.
#[cfg_attr(test, mockall::automock)]
pub trait SolarTimeProvider {
    /// Next sunrise and sunset strictly after `now` moved back by `day_shift` days.
    fn sun_times(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Local>,
        day_shift: u32,
    ) -> Result<SunTimes>;
}

/// Provider backed by the `sunrise` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SunriseCalculator;

impl SolarTimeProvider for SunriseCalculator {
    fn sun_times(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Local>,
        day_shift: u32,
    ) -> Result<SunTimes> {
        compute_sun_times(latitude, longitude, now, day_shift)
    }
}

/// Compute the next sunrise and sunset after `now - day_shift days`.
///
/// # Errors
/// `Error::Computation` if the coordinates are rejected, or if the next
/// sunrise and sunset cannot both be resolved from consecutive dates around
/// the reference (polar day or night, or the days either side of it).
pub fn compute_sun_times(
    latitude: f64,
    longitude: f64,
    now: DateTime<Local>,
    day_shift: u32,
) -> Result<SunTimes> {
    let computation_error = |reason: &str| Error::Computation {
        latitude,
        longitude,
        reason: reason.to_string(),
    };

    let coord = Coordinates::new(latitude, longitude)
        .ok_or_else(|| computation_error("coordinates out of range"))?;

    let reference = (now - Duration::days(i64::from(day_shift))).with_timezone(&Utc);
    let base_date = reference.date_naive();

    // Chronological events from consecutive dates where the sun crosses the horizon
    let mut events: Vec<(Motion, DateTime<Utc>)> = Vec::new();
    for offset in -SEARCH_DAYS_BEFORE..=SEARCH_DAYS_AFTER {
        let date = base_date + Duration::days(offset);
        match resolve_day(coord, date, longitude) {
            Some((rise, set)) => {
                events.push((Motion::Sunrise, rise));
                events.push((Motion::Sunset, set));
            }
            None if date < base_date => {
                log_debug!("No sunrise/sunset on {date} at {latitude:.4}°, {longitude:.4}°");
                // Earlier events cannot be paired with anything past the gap
                events.clear();
            }
            None => {
                log_debug!("No sunrise/sunset on {date} at {latitude:.4}°, {longitude:.4}°");
                break;
            }
        }
    }
    events.sort_by_key(|(_, at)| *at);

    let next = events
        .iter()
        .position(|(_, at)| *at > reference)
        .ok_or_else(|| computation_error("the sun neither rises nor sets in the coming days"))?;
    let (next_motion, next_at) = events[next];

    // The sun's state at the reference is only known if the opposite event came just before
    match next.checked_sub(1).map(|previous| events[previous].0) {
        Some(previous) if previous != next_motion => {}
        Some(_) => return Err(computation_error("inconsistent sunrise/sunset sequence")),
        None => {
            return Err(computation_error(
                "the sun did not cross the horizon before the reference",
            ));
        }
    }

    let following_at = match events.get(next + 1) {
        Some(&(motion, at)) if motion != next_motion => at,
        Some(_) => return Err(computation_error("inconsistent sunrise/sunset sequence")),
        None => {
            return Err(computation_error(match next_motion {
                Motion::Sunrise => "the sun does not set",
                Motion::Sunset => "the sun does not rise",
            }));
        }
    };

    let (sunrise, sunset) = match next_motion {
        Motion::Sunrise => (next_at, following_at),
        Motion::Sunset => (following_at, next_at),
    };

    let times = SunTimes::new(sunrise.with_timezone(&Local), sunset.with_timezone(&Local));
    log_debug!(
        "Next rising time = {}, setting time = {} (day shift {day_shift})",
        times.sunrise().to_rfc3339(),
        times.sunset().to_rfc3339()
    );
    Ok(times)
}

/// Sunrise and sunset for one date, if the sun actually crosses the horizon.
fn resolve_day(
    coord: Coordinates,
    date: NaiveDate,
    longitude: f64,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let solar_day = SolarDay::new(coord, date);
    let rise = solar_day.event_time(SolarEvent::Sunrise);
    let set = solar_day.event_time(SolarEvent::Sunset);

    let noon = approximate_solar_noon(date, longitude)?;
    let limit = Duration::hours(MAX_EVENT_DISTANCE_FROM_NOON_HOURS);
    let near_noon = |t: DateTime<Utc>| (t - noon).abs() <= limit;

    (near_noon(rise) && near_noon(set) && rise < set).then_some((rise, set))
}

/// Local solar noon in UTC, ignoring the equation of time.
fn approximate_solar_noon(date: NaiveDate, longitude: f64) -> Option<DateTime<Utc>> {
    let noon_utc = date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?).and_utc();
    let offset_seconds = (longitude / 15.0 * 3600.0).round() as i64;
    Some(noon_utc - Duration::seconds(offset_seconds))
}
