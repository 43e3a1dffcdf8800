//! Presentation preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Color scheme for the draw list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaletteKind {
    #[default]
    Classic,
    HighContrast,
}

impl PaletteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteKind::Classic => "Classic",
            PaletteKind::HighContrast => "High contrast",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(PaletteKind::Classic),
            "high" | "high-contrast" | "high contrast" => Some(PaletteKind::HighContrast),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub palette: PaletteKind,
    /// Blink warning blasters and flashing deadly blocks
    pub blink_hazards: bool,
    /// Reduced motion (draw blinking hazards steadily)
    #[serde(default)]
    pub reduced_motion: bool,
    /// Show the score HUD while playing
    #[serde(default = "default_true")]
    pub show_hud: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette: PaletteKind::Classic,
            blink_hazards: true,
            reduced_motion: false,
            show_hud: true,
        }
    }
}

impl Settings {
    /// Effective blinking (respects reduced_motion)
    pub fn effective_blink(&self) -> bool {
        self.blink_hazards && !self.reduced_motion
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hazard_snake_settings";

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

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Settings not saved: storage unavailable");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Native builds keep settings in memory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
