//! Game settings and gameplay tuning
//!
//! Loaded from JSON; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Round timing and pool sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    /// Seconds between leaving Setup and the first obstacle
    pub start_delay: f32,
    /// Seconds between the crash and the game-over menu
    pub game_over_delay: f32,
    /// Obstacles built up front
    pub pool_size: usize,
    /// Seconds between obstacle spawns
    pub spawn_delay: f32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            start_delay: 2.0,
            game_over_delay: 2.0,
            pool_size: 10,
            spawn_delay: 1.0,
        }
    }
}

/// Obstacle movement and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    /// Leftward scroll speed (units/sec)
    pub speed: f32,
    /// Spawn height is drawn from `[-y_offset_limit, y_offset_limit]`
    pub y_offset_limit: f32,
    /// Obstacles left of this x are off screen; they spawn at its mirror
    pub offscreen_x: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            y_offset_limit: 2.75,
            offscreen_x: -12.0,
        }
    }
}

/// Plane handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneTuning {
    /// Vertical acceleration (negative = down)
    pub gravity: f32,
    /// Height gained by a single ascend
    pub ascend_height: f32,
    /// Idle bobbing frequency
    pub bob_speed: f32,
    /// Idle bobbing magnitude
    pub bob_height: f32,
    /// Tilt degrees per unit of vertical velocity
    pub tilt_modifier: f32,
    /// Maximum tilt in degrees
    pub tilt_limit: f32,
    /// Engine pitch at full nose-down
    pub engine_pitch_low: f32,
    /// Engine pitch at full nose-up
    pub engine_pitch_high: f32,
}

impl Default for PlaneTuning {
    fn default() -> Self {
        Self {
            gravity: -30.0,
            ascend_height: 1.5,
            bob_speed: 5.0,
            bob_height: 0.15,
            tilt_modifier: 3.0,
            tilt_limit: 60.0,
            engine_pitch_low: 0.8,
            engine_pitch_high: 1.2,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub background_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Gameplay ===
    pub round: RoundTuning,
    pub obstacle: ObstacleTuning,
    pub plane: PlaneTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_volume: 0.5,
            sfx_volume: 0.1,
            round: RoundTuning::default(),
            obstacle: ObstacleTuning::default(),
            plane: PlaneTuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let unit = 0.0f32..=1.0;
        if !unit.contains(&self.background_volume) {
            return Err(invalid("background_volume must be within 0..=1"));
        }
        if !unit.contains(&self.sfx_volume) {
            return Err(invalid("sfx_volume must be within 0..=1"));
        }

        let round = &self.round;
        if !(round.spawn_delay > 0.0) {
            return Err(invalid("round.spawn_delay must be positive"));
        }
        if !(round.start_delay >= 0.0) || !(round.game_over_delay >= 0.0) {
            return Err(invalid("round delays must not be negative"));
        }

        let obstacle = &self.obstacle;
        if !(obstacle.speed > 0.0) {
            return Err(invalid("obstacle.speed must be positive"));
        }
        if !(obstacle.y_offset_limit >= 0.0) {
            return Err(invalid("obstacle.y_offset_limit must not be negative"));
        }
        if !(obstacle.offscreen_x < 0.0) {
            return Err(invalid("obstacle.offscreen_x must be left of the origin"));
        }

        let plane = &self.plane;
        if !(plane.gravity < 0.0) {
            return Err(invalid("plane.gravity must pull down"));
        }
        if !(plane.ascend_height > 0.0) {
            return Err(invalid("plane.ascend_height must be positive"));
        }
        if !(plane.tilt_limit > 0.0) {
            return Err(invalid("plane.tilt_limit must be positive"));
        }

        Ok(())
    }
}

fn invalid(reason: &str) -> SettingsError {
    SettingsError::Invalid(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "round": { "pool_size": 4 } }"#).unwrap();
        assert_eq!(settings.round.pool_size, 4);
        assert_eq!(settings.round.spawn_delay, 1.0);
        assert_eq!(settings.obstacle, ObstacleTuning::default());
        assert_eq!(settings.sfx_volume, 0.1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.obstacle.speed = 7.5;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_zero_spawn_delay() {
        let err = Settings::from_json(r#"{ "round": { "spawn_delay": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_loud_volume() {
        let err = Settings::from_json(r#"{ "sfx_volume": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pux_plane_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.round.pool_size = 6;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
