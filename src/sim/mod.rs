//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `Level::tick`
//! - Stable iteration order (tiles in layout order, entities by spawn order)
//! - No rendering, audio or file system dependencies

pub mod camera;
pub mod enemy;
pub mod gravity;
pub mod ladder;
pub mod physics;
pub mod rect;
pub mod resolver;
pub mod state;
pub mod tick;
pub mod tiles;

pub use camera::{Camera, sort_by_depth};
pub use gravity::{BackgroundKey, GravityCycle, GravityState};
pub use physics::Body;
pub use rect::Rect;
pub use resolver::{StompCheck, is_stomp};
pub use state::{
    AiMode, Enemy, Facing, GameEvent, Hud, Item, Level, LevelOutcome, LevelPhase, Player,
};
pub use tick::TickInput;
pub use tiles::{Tile, TileKind, TileSet};
