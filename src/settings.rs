//! Game tuning
//!
//! Every gameplay constant the simulation reads comes from here, so levels
//! can be re-tuned from a JSON file without a rebuild. Missing fields fall
//! back to the defaults in [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Data-driven game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tile_size: f32,

    // === Gravity ===
    /// Gravity magnitude under normal orientation (px per tick per second)
    pub gravity: f32,
    /// Jump impulse under normal orientation (negative is up)
    pub jump_impulse: f32,
    pub gravity_flip_interval_ms: u64,

    // === Rules ===
    pub max_lives: u32,
    /// Items of `required_item_kind` needed before the goal counts
    pub required_items: u32,
    pub required_item_kind: String,

    // === Player ===
    pub player_speed: f32,
    pub climb_speed: f32,
    pub ladder_margin: f32,
    pub climb_ease: f32,

    // === Enemies ===
    pub enemy_patrol_speed: f32,
    pub enemy_chase_speed: f32,
    pub enemy_vision_radius: f32,
    pub water_probe_width: f32,
    pub water_probe_depth: f32,

    // === Stomp ===
    pub land_tolerance: f32,
    pub horiz_align_factor: f32,

    // === Camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub camera_smoothing: f32,
    pub parallax_factor: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,

            gravity: GRAVITY_NORMAL,
            jump_impulse: JUMP_IMPULSE_NORMAL,
            gravity_flip_interval_ms: GRAVITY_FLIP_INTERVAL_MS,

            max_lives: MAX_LIVES,
            required_items: REQUIRED_ITEMS,
            required_item_kind: REQUIRED_ITEM_KIND.to_string(),

            player_speed: PLAYER_SPEED,
            climb_speed: CLIMB_SPEED,
            ladder_margin: LADDER_MARGIN,
            climb_ease: CLIMB_LOCK_EASE,

            enemy_patrol_speed: ENEMY_PATROL_SPEED,
            enemy_chase_speed: ENEMY_CHASE_SPEED,
            enemy_vision_radius: ENEMY_VISION_RADIUS,
            water_probe_width: WATER_PROBE_WIDTH,
            water_probe_depth: WATER_PROBE_DEPTH,

            land_tolerance: LAND_TOLERANCE,
            horiz_align_factor: HORIZ_ALIGN_FACTOR,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            camera_smoothing: CAMERA_SMOOTHING,
            parallax_factor: PARALLAX_FACTOR,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded game config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Like [`GameConfig::load`], but any failure yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "Using default config ({}): {}",
                    path.as_ref().display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Game config saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject tunings the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tile_size", self.tile_size),
            ("gravity", self.gravity),
            ("player_speed", self.player_speed),
            ("climb_speed", self.climb_speed),
            ("enemy_patrol_speed", self.enemy_patrol_speed),
            ("enemy_chase_speed", self.enemy_chase_speed),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if !self.jump_impulse.is_finite() || self.jump_impulse >= 0.0 {
            return Err(ConfigError::Invalid(
                "jump_impulse must point up (negative) under normal gravity".to_string(),
            ));
        }
        if self.gravity_flip_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "gravity_flip_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.max_lives == 0 {
            return Err(ConfigError::Invalid("max_lives must be at least 1".to_string()));
        }

        let fractions = [
            ("camera_smoothing", self.camera_smoothing, false),
            ("parallax_factor", self.parallax_factor, true),
            ("climb_ease", self.climb_ease, false),
        ];
        for (name, value, zero_ok) in fractions {
            let low_ok = if zero_ok { value >= 0.0 } else { value > 0.0 };
            if !(low_ok && value <= 1.0) {
                return Err(ConfigError::Invalid(format!("{name} out of range: {value}")));
            }
        }

        if self.ladder_margin < 0.0 || self.land_tolerance < 0.0 || self.horiz_align_factor <= 0.0 {
            return Err(ConfigError::Invalid(
                "ladder_margin, land_tolerance and horiz_align_factor must be non-negative"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
