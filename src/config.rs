//! Run Configuration
//!
//! All tuning in one JSON-loadable struct. Every section and field has a
//! default, so a config file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::combat::CombatConfig;
use crate::game::lucidity::LucidityConfig;
use crate::game::player::PlayerConfig;
use crate::game::room::RoomGeneratorConfig;
use crate::game::state::PacingConfig;

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path as given
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON for `RunConfig`
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    /// Values out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything tunable about a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Room size
    pub room: RoomGeneratorConfig,
    /// Lucidity meter
    pub lucidity: LucidityConfig,
    /// Combat tuning
    pub combat: CombatConfig,
    /// Player and projectile tuning
    pub player: PlayerConfig,
    /// Room sequence
    pub pacing: PacingConfig,
}

impl RunConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min_side = 2 * crate::game::room::OBSTACLE_MARGIN;
        if self.room.width < min_side || self.room.height < min_side {
            return Err(ConfigError::Invalid(format!(
                "room must be at least {min_side}x{min_side}, got {}x{}",
                self.room.width, self.room.height
            )));
        }

        if !(0.0..=100.0).contains(&self.lucidity.initial) {
            return Err(ConfigError::Invalid(format!(
                "initial lucidity {} outside [0, 100]",
                self.lucidity.initial
            )));
        }

        let rates = [
            ("decay_rate_per_second", self.lucidity.decay_rate_per_second),
            ("recovery_rate", self.lucidity.recovery_rate),
            ("boss_recovery_rate", self.lucidity.boss_recovery_rate),
            ("slow_duration_ms", self.combat.slow_duration_ms),
            ("stun_duration_ms", self.combat.stun_duration_ms),
            ("contact_lucidity_loss", self.combat.contact_lucidity_loss),
            ("shoot_interval_ms", self.player.shoot_interval_ms),
            ("speed", self.player.speed),
            ("projectile_speed", self.player.projectile_speed),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number, got {value}")));
            }
        }

        if !(0.0..=1.0).contains(&self.combat.ricochet_speed_retention) {
            return Err(ConfigError::Invalid(format!(
                "ricochet_speed_retention {} outside [0, 1]",
                self.combat.ricochet_speed_retention
            )));
        }

        if !(0.0..=1.0).contains(&self.pacing.elite_room_chance) {
            return Err(ConfigError::Invalid(format!(
                "elite_room_chance {} outside [0, 1]",
                self.pacing.elite_room_chance
            )));
        }

        if self.pacing.boss_room_interval == 0 {
            return Err(ConfigError::Invalid("boss_room_interval must be at least 1".into()));
        }

        if self.player.max_health == 0 {
            return Err(ConfigError::Invalid("max_health must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.room.width, 800);
        assert_eq!(config.room.height, 600);
        assert_eq!(config.lucidity.initial, 50.0);
        assert_eq!(config.combat.contact_cooldown_ms, 500);
        assert_eq!(config.pacing.boss_room_interval, 10);
    }

    #[test]
    fn test_partial_json() {
        let config = RunConfig::from_json_str(r#"{"lucidity": {"initial": 80}, "pacing": {"elite_room_chance": 0.5}}"#)
            .expect("valid config");
        assert_eq!(config.lucidity.initial, 80.0);
        assert_eq!(config.lucidity.decay_rate_per_second, 0.1);
        assert_eq!(config.pacing.elite_room_chance, 0.5);
        assert_eq!(config.pacing.elite_min_room, 3);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(RunConfig::from_json_str("{}").expect("valid"), RunConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            RunConfig::from_json_str(r#"{"lucidity": {"initial": 150}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunConfig::from_json_str(r#"{"room": {"width": 100}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunConfig::from_json_str(r#"{"pacing": {"boss_room_interval": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunConfig::from_json_str(r#"{"combat": {"slow_duration_ms": -1}}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(RunConfig::from_json_str("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = RunConfig::load("/nonexistent/dreamer.json").expect_err("missing file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
