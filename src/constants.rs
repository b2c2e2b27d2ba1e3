//! Application-wide constants.

// # Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

// # Names and locations
/// Directory name under the user data dir; shared with earlier releases so old state is found.
pub const STATE_DIR_NAME: &str = "Auto Appearance";
pub const STATE_FILE_NAME: &str = "last-update.json";
pub const LOCK_FILE_NAME: &str = "last-update.lock";
pub const CONFIG_DIR_NAME: &str = "auto-appearance";
pub const CONFIG_FILE_NAME: &str = "auto-appearance.toml";

/// JSON key holding the last successful update instant.
pub const LAST_UPDATE_KEY: &str = "last_update";

// # Solar search
/// Days before the reference date included in the sunrise/sunset search.
pub const SEARCH_DAYS_BEFORE: i64 = 1;
/// Days after the reference date included in the sunrise/sunset search.
pub const SEARCH_DAYS_AFTER: i64 = 3;
/// Maximum distance between an event and the local solar noon of its date.
pub const MAX_EVENT_DISTANCE_FROM_NOON_HOURS: i64 = 18;

// # Coordinate limits
pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// # Backend commands
pub const OSASCRIPT_PATH: &str = "/usr/bin/osascript";
pub const GSETTINGS_COMMAND: &str = "gsettings";
pub const GNOME_INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
pub const GNOME_COLOR_SCHEME_KEY: &str = "color-scheme";
