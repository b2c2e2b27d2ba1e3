//! Geographic sunrise/sunset calculations.
//!
//! ## Module Structure
//!
//! - [`solar`]: next-sunrise/next-sunset lookup around a reference instant,
//!   with polar day/night detection
//! - [`display`]: formatting of solar instants for run logs

pub mod display;
pub mod solar;

pub use display::{describe_sun_times, format_instant};
pub use solar::{Motion, SolarTimeProvider, SunTimes, SunriseCalculator, compute_sun_times};

#[cfg(test)]
mod tests;
