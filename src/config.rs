use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// UI colour theme, persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// User-configurable parameters for the loading layer.
/// Stored in the platform config directory (`$XDG_CONFIG_HOME/loadscreen/` or `%APPDATA%\loadscreen\`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay after the document-loaded signal before the page overlay starts hiding.
    pub page_hide_delay_ms: u64,
    /// Duration of the page overlay fade-out before it stops occupying layout.
    pub page_fade_ms: u64,
    /// Force-hide the page overlay after this long even if the load signal never fires.
    pub page_fallback_ms: u64,
    /// Collapse delay after the progress bar fills to 100%.
    pub progress_collapse_ms: u64,
    /// Fade-in duration when a skeleton is replaced by real content.
    pub skeleton_fade_ms: u64,
    /// Toasts auto-dismiss after this long.
    pub toast_dismiss_ms: u64,
    /// Duration of the toast dismissing animation before removal.
    pub toast_fade_ms: u64,
    /// UI font scale multiplier (0.75–2.0). Scales all egui text sizes.
    pub ui_font_scale: f32,
    /// Colour theme.
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_hide_delay_ms: 300,
            page_fade_ms: 400,
            page_fallback_ms: 5000,
            progress_collapse_ms: 300,
            skeleton_fade_ms: 300,
            toast_dismiss_ms: 5000,
            toast_fade_ms: 300,
            ui_font_scale: 1.0,
            theme: Theme::Light,
        }
    }
}

impl Config {
    /// Load config from `config.json` in the platform config directory, or return defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file at {}, using defaults. Creating default config.",
                    path.display()
                );
                let config = Self::default();
                config.save();
                config
            }
        }
    }

    /// Save current config to `config.json`.
    pub fn save(&self) {
        let path = config_path();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    log::warn!("Failed to write config to {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize config: {}", e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    let dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loadscreen");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok();
    }
    dir.join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_animation_timings() {
        let config = Config::default();
        assert_eq!(config.page_hide_delay_ms, 300);
        assert_eq!(config.page_fade_ms, 400);
        assert_eq!(config.page_fallback_ms, 5000);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_round_trip_preserves_theme() {
        let mut config = Config::default();
        config.theme = Theme::Dark;
        config.toast_dismiss_ms = 2500;
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.theme, Theme::Dark);
        assert_eq!(back.toast_dismiss_ms, 2500);
    }

    #[test]
    fn test_unknown_and_missing_fields_fall_back() {
        let back: Config = serde_json::from_str(r#"{"theme":"dark","zoom":3.0}"#).unwrap();
        assert_eq!(back.theme, Theme::Dark);
        assert_eq!(back.page_fallback_ms, 5000);
    }
}
