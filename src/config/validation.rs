//! Configuration validation functionality.

use crate::constants::*;
use crate::error::{Error, Result};

/// Reject coordinates the solar computation cannot use.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    validate_latitude(latitude)?;
    validate_longitude(longitude)
}

pub fn validate_latitude(latitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude) {
        return Err(Error::Config(format!(
            "latitude must be between {MINIMUM_LATITUDE} and {MAXIMUM_LATITUDE} degrees (got {latitude})"
        )));
    }
    Ok(())
}

pub fn validate_longitude(longitude: f64) -> Result<()> {
    if !longitude.is_finite() || !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude) {
        return Err(Error::Config(format!(
            "longitude must be between {MINIMUM_LONGITUDE} and {MAXIMUM_LONGITUDE} degrees (got {longitude})"
        )));
    }
    Ok(())
}
