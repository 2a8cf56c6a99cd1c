//! Drill tuning
//!
//! Validated as a whole before it reaches the engine. A bad value is
//! rejected, never clamped into range.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Timing, difficulty, and lives settings for a drill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    // === Speed ===
    /// Scroll speed at level 1 (units per second)
    pub base_speed: f32,
    /// Fractional speed increase per level (0.25 = +25% each level)
    pub growth_rate: f32,
    /// Distance from spawn point to the danger zone
    pub deadline_distance: f32,

    // === Timing (seconds of unpaused time) ===
    /// Delay before the next note spawns
    pub spawn_delay: f32,
    /// How long the correct answer is shown after a miss or wrong answer
    pub reveal_duration: f32,
    /// Show the correct answer after a miss or wrong answer
    pub reveal_enabled: bool,

    // === Lives ===
    /// Lives at session start, and the cap for extra lives
    pub max_lives: u8,
    /// Award a life every N correct answers (while under the cap)
    pub extra_life_interval: u64,

    // === Cues ===
    /// Score at which the host should start background music
    pub music_unlock_score: Option<u64>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            growth_rate: SPEED_GROWTH_PER_LEVEL,
            deadline_distance: DEADLINE_DISTANCE,

            spawn_delay: SPAWN_DELAY,
            reveal_duration: REVEAL_DURATION,
            reveal_enabled: true,

            max_lives: MAX_LIVES,
            extra_life_interval: EXTRA_LIFE_INTERVAL,

            music_unlock_score: Some(MUSIC_UNLOCK_SCORE),
        }
    }
}

impl DrillConfig {
    /// Check every field; the first offending field is reported
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_speed.is_finite() || self.base_speed <= 0.0 {
            return Err(ConfigError::BaseSpeed(self.base_speed));
        }
        if !self.growth_rate.is_finite() || self.growth_rate < 0.0 {
            return Err(ConfigError::GrowthRate(self.growth_rate));
        }
        // Level 2 speed must still be representable
        if !(self.base_speed * (1.0 + self.growth_rate)).is_finite() {
            return Err(ConfigError::GrowthRate(self.growth_rate));
        }
        if !self.deadline_distance.is_finite() || self.deadline_distance <= 0.0 {
            return Err(ConfigError::DeadlineDistance(self.deadline_distance));
        }
        if !self.spawn_delay.is_finite() || self.spawn_delay < 0.0 {
            return Err(ConfigError::SpawnDelay(self.spawn_delay));
        }
        if !self.reveal_duration.is_finite() || self.reveal_duration < 0.0 {
            return Err(ConfigError::RevealDuration(self.reveal_duration));
        }
        if self.max_lives == 0 {
            return Err(ConfigError::ZeroMaxLives);
        }
        if self.extra_life_interval == 0 {
            return Err(ConfigError::ZeroExtraLifeInterval);
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Time for a note to cross the staff at level 1 (seconds)
    pub fn base_travel_time(&self) -> f32 {
        self.deadline_distance / self.base_speed
    }
}
