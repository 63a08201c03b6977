//! SWITCH BACK - a tile-based platformer where gravity flips on a timer
//!
//! Core modules:
//! - `sim`: Gameplay simulation (physics, ladders, enemy AI, gravity cycle, camera)
//! - `map`: Level layout and the ASCII map format
//! - `settings`: Data-driven game tuning
//! - `ranking`: Speedrun leaderboard
//! - `renderer`: Camera-positioned draw list for a host canvas
//! - `audio`: Sound cues derived from gameplay events

pub mod audio;
pub mod map;
pub mod ranking;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use map::{LevelLayout, MapError};
pub use ranking::{Ranking, RankingEntry};
pub use settings::{ConfigError, GameConfig};
pub use sim::{Level, LevelOutcome, TickInput};

/// Game configuration constants
pub mod consts {
    /// Reference tick rate the per-tick tuning values were authored at
    pub const REFERENCE_HZ: f32 = 60.0;
    /// Nominal timestep at the reference rate
    pub const REFERENCE_DT: f32 = 1.0 / REFERENCE_HZ;

    /// Base tile (16 px) scaled 4x
    pub const TILE_SIZE: f32 = 64.0;

    /// Player hit-box
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    /// Enemy hit-box
    pub const ENEMY_WIDTH: f32 = 50.0;
    pub const ENEMY_HEIGHT: f32 = 50.0;

    /// Gravity magnitude (positive pulls down)
    pub const GRAVITY_NORMAL: f32 = 50.0;
    /// Jump impulse under normal gravity (px per tick, negative is up)
    pub const JUMP_IMPULSE_NORMAL: f32 = -20.0;
    /// Time between gravity flips
    pub const GRAVITY_FLIP_INTERVAL_MS: u64 = 12_000;

    pub const PLAYER_SPEED: f32 = 300.0;
    pub const CLIMB_SPEED: f32 = 200.0;
    /// Hit-box inset used when looking for ladders
    pub const LADDER_MARGIN: f32 = 8.0;
    /// Fraction of the remaining distance covered per tick while centring on a ladder
    pub const CLIMB_LOCK_EASE: f32 = 0.25;

    pub const ENEMY_PATROL_SPEED: f32 = 120.0;
    pub const ENEMY_CHASE_SPEED: f32 = 180.0;
    pub const ENEMY_VISION_RADIUS: f32 = 320.0;
    /// Water probe ahead of an enemy's leading edge
    pub const WATER_PROBE_WIDTH: f32 = 4.0;
    pub const WATER_PROBE_DEPTH: f32 = 8.0;

    pub const MAX_LIVES: u32 = 5;
    pub const REQUIRED_ITEMS: u32 = 5;
    pub const REQUIRED_ITEM_KIND: &str = "shield";

    /// Stomp detection
    pub const LAND_TOLERANCE: f32 = 20.0;
    pub const HORIZ_ALIGN_FACTOR: f32 = 1.0;

    /// Camera
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
    pub const CAMERA_SMOOTHING: f32 = 0.05;
    pub const PARALLAX_FACTOR: f32 = 0.3;
}

/// Sign of `v` as -1, 0 or 1 (unlike `f32::signum`, zero maps to zero)
#[inline]
pub fn sign_of(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Initialise `env_logger`, honouring `RUST_LOG` when set
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    // Already-initialised loggers (tests, embedding hosts) are fine
    let _ = env_logger::Builder::from_env(env).try_init();
}
