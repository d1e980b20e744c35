//! Game settings and preferences
//!
//! Stored as JSON next to the binary. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TRAIL_CAPACITY};
use crate::sim::Screen;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Trail segments drawn per frame (hit-testing always uses every sample)
    pub fn trail_segments(&self) -> usize {
        match self {
            QualityPreset::Low => TRAIL_CAPACITY / 4,
            QualityPreset::Medium => TRAIL_CAPACITY / 2,
            QualityPreset::High => TRAIL_CAPACITY,
        }
    }
}

/// Settings load failure
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "could not read settings: {}", e),
            Self::Parse(e) => write!(f, "invalid settings file: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Screen ===
    /// Logical screen width
    pub screen_width: f32,
    /// Logical screen height
    pub screen_height: f32,

    // === Visual Effects ===
    /// Swipe trail
    pub trails: bool,
    /// Sliced halves flying off
    pub fragments: bool,

    // === Session ===
    /// Run seed (0 = pick one at startup)
    pub seed: u64,
    /// Let the autopilot play
    pub idle_mode: bool,
    /// Frames the headless driver runs before stopping
    pub max_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            // Visual effects - all on by default
            trails: true,
            fragments: true,

            seed: 0,
            idle_mode: true,
            max_frames: 60 * 60,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Screen the simulation should run in
    pub fn screen(&self) -> Screen {
        Screen {
            width: self.screen_width,
            height: self.screen_height,
        }
    }

    /// Effective trail length (0 when trails are off)
    pub fn trail_segments(&self) -> usize {
        if self.trails {
            self.quality.trail_segments()
        } else {
            0
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("{} - using default settings", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
