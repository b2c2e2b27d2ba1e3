//! macOS backend: toggles dark mode through System Events.
//!
//! The switch is one AppleScript statement run by `osascript`. The first run
//! may trigger the automation permission prompt; a denied prompt surfaces as
//! a non-zero exit and therefore as `Error::AppearanceSet`.

use std::process::Command;

use super::{Appearance, AppearanceSetter, run_command};
use crate::constants::OSASCRIPT_PATH;
use crate::error::Result;

pub struct MacOsBackend {
    osascript: String,
}

impl MacOsBackend {
    pub fn new() -> Self {
        Self {
            osascript: OSASCRIPT_PATH.to_string(),
        }
    }

    /// The AppleScript statement that sets dark mode on or off.
    pub fn script(appearance: Appearance) -> String {
        format!(
            "tell application \"System Events\" to tell appearance preferences to set dark mode to {}",
            appearance.is_dark()
        )
    }

    fn command(&self, appearance: Appearance) -> Command {
        let mut command = Command::new(&self.osascript);
        command.arg("-e").arg(Self::script(appearance));
        command
    }
}

impl Default for MacOsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AppearanceSetter for MacOsBackend {
    fn set_appearance(&self, appearance: Appearance) -> Result<()> {
        run_command(self.backend_name(), &mut self.command(appearance))
    }

    fn backend_name(&self) -> &'static str {
        "macOS"
    }
}
