//! Host settings
//!
//! Persisted as JSON: in LocalStorage on the web, in a file natively.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TICK_MS;
use crate::error::SettingsError;
use crate::sim::{EffectKind, Stencil};

/// Weather presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EffectPreset {
    Off,
    /// Steady light rain
    #[default]
    Rain,
    /// A motorboat crossing the water
    Boat,
    /// Wind-whipped chop
    Wind,
    /// Explicit selector and parameters
    Custom { kind: EffectKind, p1: u32, p2: u32, p3: u32 },
}

impl EffectPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectPreset::Off => "Off",
            EffectPreset::Rain => "Rain",
            EffectPreset::Boat => "Boat",
            EffectPreset::Wind => "Wind",
            EffectPreset::Custom { .. } => "Custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(EffectPreset::Off),
            "rain" => Some(EffectPreset::Rain),
            "boat" | "motorboat" => Some(EffectPreset::Boat),
            "wind" | "waves" => Some(EffectPreset::Wind),
            _ => None,
        }
    }

    /// Effect selector and its three parameters
    pub fn params(&self) -> (EffectKind, u32, u32, u32) {
        match *self {
            EffectPreset::Off => (EffectKind::Off, 0, 0, 0),
            // sparseness, max drop size, max extra weight
            EffectPreset::Rain => (EffectKind::Rain, 5, 4, 250),
            // speed, wake size, wake weight
            EffectPreset::Boat => (EffectKind::Boat, 4, 2, 400),
            // density, max size, max weight
            EffectPreset::Wind => (EffectKind::Wind, 100, 3, 7),
            EffectPreset::Custom { kind, p1, p2, p3 } => (kind, p1, p2, p3),
        }
    }
}

/// Simulation settings chosen by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Diffusion stencil (fixed once the object exists)
    pub stencil: Stencil,
    /// Interval between ticks in milliseconds (10-30 looks right)
    pub tick_interval_ms: u32,
    /// Fixed RNG seed; `None` derives one from the clock
    pub seed: Option<u32>,
    /// Weather running from start-up
    pub effect: EffectPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stencil: Stencil::Circular,
            tick_interval_ms: DEFAULT_TICK_MS,
            seed: None,
            effect: EffectPreset::Rain,
        }
    }
}

impl Settings {
    /// Tick interval clamped to at least one millisecond
    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms.max(1)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "water_ripple_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_file(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.stencil, Stencil::Circular);
        assert_eq!(settings.tick_interval_ms(), 30);
        assert_eq!(settings.effect.params(), (EffectKind::Rain, 5, 4, 250));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "stencil": "elliptical", "seed": 7 }"#).unwrap();
        assert_eq!(settings.stencil, Stencil::Elliptical);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.effect, EffectPreset::Rain);
        assert_eq!(settings.tick_interval_ms, 30);
    }

    #[test]
    fn test_custom_effect_json() {
        let json = r#"{ "effect": { "custom": { "kind": "wind", "p1": 1, "p2": 2, "p3": 3 } } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.effect.params(), (EffectKind::Wind, 1, 2, 3));
        assert_eq!(settings.effect.as_str(), "Custom");
    }

    #[test]
    fn test_json_keeps_settings() {
        let settings = Settings {
            stencil: Stencil::Elliptical,
            tick_interval_ms: 12,
            seed: None,
            effect: EffectPreset::Boat,
        };
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ \"stencil\": \"hexagonal\" }"),
            Err(SettingsError::Json(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_save_then_load() {
        let path = std::env::temp_dir().join(format!("water_ripple_settings_{}.json", std::process::id()));
        let settings = Settings {
            seed: Some(99),
            effect: EffectPreset::Wind,
            ..Settings::default()
        };
        settings.save_file(&path).unwrap();
        assert_eq!(Settings::load_file(&path).unwrap(), settings);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(Settings::load_file(&path), Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(EffectPreset::from_str("Motorboat"), Some(EffectPreset::Boat));
        assert_eq!(EffectPreset::from_str("waves"), Some(EffectPreset::Wind));
        assert_eq!(EffectPreset::from_str("snow"), None);
        assert_eq!(EffectPreset::Off.params().0, EffectKind::Off);
    }
}
