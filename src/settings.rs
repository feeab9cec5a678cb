//! Persistent user settings.
//!
//! Stored as pretty printed JSON in the platform's local data directory, e.g.
//! `~/.local/share/minsweeper-client/settings.json` on Linux. Missing fields take
//! their defaults, and an unreadable file is replaced by defaults on the next save.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    game::{BoardSize, ConventionalSize},
    solver::{default_solver, find_solver, Solver},
    texture::Texture,
    theme::Theme,
};

pub const APP_DIR_NAME: &str = "minsweeper-client";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("this platform has no local data directory")]
    NoDataDir,
    #[error("settings file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Let the solver play on after every click
    pub auto: bool,
    /// Flag all unrevealed neighbours of a number when they are exactly its mines
    pub flag_chord: bool,
    /// Chord a revealed number as soon as the pointer enters it
    pub hover_chord: bool,
    pub size: BoardSize,
    /// Name of the solver in the registry
    pub solver: String,
    pub texture: Texture,
    pub theme: Theme,
    /// Inner window size in points, once the user has resized the window
    pub window_size: Option<[f32; 2]>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto: false,
            flag_chord: false,
            hover_chord: false,
            size: ConventionalSize::Beginner.size(),
            solver: default_solver().name().to_owned(),
            texture: Texture::default(),
            theme: Theme::default(),
            window_size: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
            .ok_or(SettingsError::NoDataDir)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads settings, falling back to defaults when there are none yet or they are broken.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                error!("Failed to load settings from {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// The configured solver, or the default one if the name is unknown.
    pub fn solver(&self) -> Arc<dyn Solver> {
        find_solver(&self.solver).unwrap_or_else(|| {
            warn!("Unknown solver {:?}, using the default", self.solver);
            default_solver()
        })
    }
}
