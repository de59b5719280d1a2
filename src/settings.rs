//! Player preferences
//!
//! Read from LocalStorage, separately from the high score.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Play the eat cue
    pub sound: bool,
    /// Cue volume (0.0 - 1.0)
    pub volume: f32,
    /// Mute when the tab is hidden or the window loses focus
    pub mute_on_blur: bool,

    // === Input ===
    /// Pause automatically when the tab is hidden or the window loses focus
    pub auto_pause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            volume: 0.8,
            mute_on_blur: true,
            auto_pause: true,
        }
    }
}

impl Settings {
    /// Volume actually applied to the cue (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon-snake-settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings {
            volume: 1.5,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 1.0);
        settings.sound = false;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let settings: Settings = serde_json::from_str(r#"{ "sound": false }"#).unwrap();
        assert!(!settings.sound);
        assert_eq!(settings.volume, Settings::default().volume);
        assert!(settings.auto_pause);
    }
}
