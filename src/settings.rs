//! Game settings and preferences
//!
//! Persisted by the host as JSON, separately from run snapshots. Unknown
//! or missing fields fall back to defaults so old payloads keep loading.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Checkpoint math quiz at every score boundary
    pub math_questions: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake, flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            math_questions: false,

            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse a persisted payload; any failure falls back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("settings payload rejected, using defaults: {err}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut settings = Settings::default();
        settings.math_questions = true;
        settings.sfx_volume = 0.5;
        let restored = Settings::from_json(&settings.to_json());
        assert!(restored.math_questions);
        assert_eq!(restored.sfx_volume, 0.5);
    }

    #[test]
    fn test_partial_payload_gets_defaults() {
        let settings = Settings::from_json(r#"{"math_questions":true}"#);
        assert!(settings.math_questions);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_garbage_payload_falls_back() {
        let settings = Settings::from_json("not json");
        assert!(!settings.math_questions);
    }
}
