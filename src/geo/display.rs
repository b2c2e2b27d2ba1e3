//! Display helpers for solar instants.

use chrono::{DateTime, Local};

use super::solar::SunTimes;
use crate::logger::DISPLAY_FORMAT;

/// Format an instant the way run logs show it, e.g. `24-06-21 08:31 PM`.
pub fn format_instant(instant: &DateTime<Local>) -> String {
    instant.format(DISPLAY_FORMAT).to_string()
}

/// One-line summary such as `Sunset @ 24-06-21 08:31 PM, Sunrise @ 24-06-22 05:25 AM`.
pub fn describe_sun_times(times: &SunTimes) -> String {
    times
        .iter()
        .map(|(motion, at)| {
            let name = motion.to_string();
            let mut chars = name.chars();
            let title = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            };
            format!("{title} @ {}", format_instant(&at))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
