use egui::Visuals;
use serde::{Deserialize, Serialize};

/// Look and feel of the window chrome: menus, dialogs and text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub const fn name(self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Resolves `System` against what the platform reports, light when it reports nothing.
    pub fn resolve(self, system: Option<eframe::Theme>) -> eframe::Theme {
        match self {
            Theme::System => system.unwrap_or(eframe::Theme::Light),
            Theme::Light => eframe::Theme::Light,
            Theme::Dark => eframe::Theme::Dark,
        }
    }

    pub fn visuals(self, system: Option<eframe::Theme>) -> Visuals {
        match self.resolve(system) {
            eframe::Theme::Light => Visuals::light(),
            eframe::Theme::Dark => Visuals::dark(),
        }
    }
}
