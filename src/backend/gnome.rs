//! GNOME backend: sets the desktop color scheme with `gsettings`.
//!
//! GTK4/libadwaita apps and the portal follow `color-scheme`. `default` is
//! used for light because older GNOME releases do not know `prefer-light`.

use std::process::Command;

use super::{Appearance, AppearanceSetter, run_command};
use crate::constants::*;
use crate::error::Result;

pub struct GnomeBackend;

impl GnomeBackend {
    pub fn new() -> Self {
        Self
    }

    /// The `color-scheme` value for an appearance.
    pub fn color_scheme(appearance: Appearance) -> &'static str {
        match appearance {
            Appearance::Dark => "prefer-dark",
            Appearance::Light => "default",
        }
    }

    fn command(appearance: Appearance) -> Command {
        let mut command = Command::new(GSETTINGS_COMMAND);
        command.args([
            "set",
            GNOME_INTERFACE_SCHEMA,
            GNOME_COLOR_SCHEME_KEY,
            Self::color_scheme(appearance),
        ]);
        command
    }
}

impl Default for GnomeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AppearanceSetter for GnomeBackend {
    fn set_appearance(&self, appearance: Appearance) -> Result<()> {
        run_command(self.backend_name(), &mut Self::command(appearance))
    }

    fn backend_name(&self) -> &'static str {
        "GNOME"
    }
}
