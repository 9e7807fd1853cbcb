//! Physics tuning
//!
//! Persisted in LocalStorage on the web (a JSON file next to the binary on
//! native) so the feel can be tweaked without a rebuild. Every field has a
//! default; partial JSON fills in the rest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },

    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
}

/// Spring / collision constants for the bonding simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-frame velocity retention for free atoms (air resistance)
    pub drag: f32,
    /// Fraction of velocity kept (and inverted) on wall contact
    pub elasticity: f32,
    /// Rest length of a bond spring
    pub bond_distance: f32,
    /// Unbonded pairs closer than this may snap into a bond
    pub snap_distance: f32,
    /// Impulse applied to rejected pairs
    pub repel_force: f32,
    /// Bond spring constant
    pub bond_strength: f32,
    /// Dragged atom velocity gain toward the pointer (trail only)
    pub follow_gain: f32,
    /// Magnitude of the idle float applied to unbonded atoms
    pub float_amplitude: f32,
    /// Velocity fraction added along an overlap correction
    pub overlap_nudge: f32,
    /// Rejection only kicks in below snap_distance * this
    pub reject_ratio: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            drag: 0.92,
            elasticity: 0.6,
            bond_distance: 70.0,
            snap_distance: 90.0,
            repel_force: 1.5,
            bond_strength: 0.05,
            follow_gain: 0.25,
            float_amplitude: 0.01,
            overlap_nudge: 0.1,
            reject_ratio: 0.8,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values that would make the simulation diverge or never bond
    pub fn validate(&self) -> Result<(), SettingsError> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);

        if !unit(self.drag) {
            return Err(SettingsError::Invalid { field: "drag", reason: "must be within 0..=1" });
        }
        if !unit(self.elasticity) {
            return Err(SettingsError::Invalid {
                field: "elasticity",
                reason: "must be within 0..=1",
            });
        }
        if !unit(self.reject_ratio) {
            return Err(SettingsError::Invalid {
                field: "reject_ratio",
                reason: "must be within 0..=1",
            });
        }
        if !(self.snap_distance > 0.0) {
            return Err(SettingsError::Invalid {
                field: "snap_distance",
                reason: "must be positive",
            });
        }
        if !(self.bond_distance > 0.0) {
            return Err(SettingsError::Invalid {
                field: "bond_distance",
                reason: "must be positive",
            });
        }
        if !(self.bond_strength >= 0.0) || !(self.repel_force >= 0.0) {
            return Err(SettingsError::Invalid {
                field: "bond_strength",
                reason: "forces must be non-negative",
            });
        }
        Ok(())
    }

    /// LocalStorage key (file stem on native)
    const STORAGE_KEY: &'static str = "molecule_snap_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Default settings file in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> std::path::PathBuf {
        std::path::PathBuf::from(format!("{}.json", Self::STORAGE_KEY))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load settings from the default file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let path = Self::default_path();
        match self.save_to(&path) {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::error!("Failed to save settings: {}", e),
        }
    }
}
