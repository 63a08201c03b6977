//! Level state and entity types
//!
//! The `Level` exclusively owns the tile set and every entity. Systems
//! (physics, ladder, enemy AI, resolver, camera) borrow what they need from
//! it each tick; nothing holds references across ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::gravity::{BackgroundKey, GravityCycle, GravityState};
use super::physics::Body;
use super::rect::Rect;
use super::tick::TickInput;
use super::tiles::TileSet;
use crate::consts::*;
use crate::map::LevelLayout;
use crate::settings::GameConfig;

/// Result of a single simulation tick, consumed by the screen layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Continue,
    /// All required items collected and goal reached, with the run time
    Victory(u64),
    GameOver,
    /// A life was lost and the player is back at the spawn point
    PlayerRespawned,
}

/// Level lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    Playing,
    Paused,
    Won,
    Lost,
}

/// Things that happened during a tick (for audio and HUD feedback)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GravityFlipped { inverted: bool },
    Jumped,
    ItemCollected { kind: String },
    EnemyStomped { enemy_id: u32 },
    LifeLost { lives_left: u32 },
    Victory { elapsed_ms: u64 },
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Hit-box at the start of the current tick
    pub prev_rect: Rect,
    pub lives: u32,
    /// Ladder has taken over vertical motion
    pub climbing: bool,
    /// Left edge the climb lock eases toward
    pub climb_target_x: Option<f32>,
    pub facing: Facing,
    /// Walk-cycle frame (cosmetic)
    pub anim_frame: u32,
    #[serde(skip)]
    pub anim_timer: f32,
}

impl Player {
    pub fn new(pos: Vec2, gravity: GravityState, lives: u32) -> Self {
        let rect = Rect::from_pos_size(pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT));
        Self {
            body: Body::new(rect, gravity),
            prev_rect: rect,
            lives,
            climbing: false,
            climb_target_x: None,
            facing: Facing::Right,
            anim_frame: 0,
            anim_timer: 0.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.body.rect
    }

    pub fn set_gravity(&mut self, gravity: GravityState) {
        self.body.set_gravity(gravity);
    }

    /// Clear transient motion state after a respawn
    pub fn reset_state(&mut self) {
        self.body.vel = Vec2::ZERO;
        self.body.on_ground = false;
        self.climbing = false;
        self.climb_target_x = None;
        self.anim_frame = 0;
        self.anim_timer = 0.0;
        self.prev_rect = self.body.rect;
    }

    /// Advance the walk cycle while moving on the ground
    pub fn animate(&mut self, dt: f32) {
        const FRAME_TIME: f32 = 0.12;
        const FRAMES: u32 = 4;
        let moving = self.body.vel.x != 0.0 || self.climbing;
        if !moving {
            self.anim_frame = 0;
            self.anim_timer = 0.0;
            return;
        }
        self.anim_timer += dt;
        while self.anim_timer >= FRAME_TIME {
            self.anim_timer -= FRAME_TIME;
            self.anim_frame = (self.anim_frame + 1) % FRAMES;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMode {
    Patrol,
    Chase,
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// `vel.x` is the signed horizontal speed
    pub body: Body,
    /// Horizontal range (min_x, max_x) walked while patrolling
    pub patrol_bounds: (f32, f32),
    pub mode: AiMode,
    pub vision_radius: f32,
}

impl Enemy {
    pub fn new(
        id: u32,
        pos: Vec2,
        patrol_bounds: (f32, f32),
        config: &GameConfig,
        gravity: GravityState,
    ) -> Self {
        let rect = Rect::from_pos_size(pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT));
        let mut body = Body::new(rect, gravity);
        body.vel.x = config.enemy_patrol_speed;
        Self {
            id,
            body,
            patrol_bounds,
            mode: AiMode::Patrol,
            vision_radius: config.enemy_vision_radius,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.body.rect
    }

    /// -1 (left) or +1 (right)
    #[inline]
    pub fn direction(&self) -> f32 {
        if self.body.vel.x < 0.0 { -1.0 } else { 1.0 }
    }

    pub fn set_gravity(&mut self, gravity: GravityState) {
        self.body.set_gravity(gravity);
    }
}

/// A collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub rect: Rect,
    pub kind: String,
}

/// Snapshot of everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub lives: u32,
    pub elapsed_ms: u64,
    pub gravity_flip_in_ms: u64,
    pub gravity_inverted: bool,
    pub items_collected: u32,
    pub items_required: u32,
    pub show_inventory: bool,
    pub inventory: Vec<String>,
}

/// One playable level: tiles, entities, gravity cycle, camera and timers
#[derive(Debug, Clone)]
pub struct Level {
    pub config: GameConfig,
    /// Source layout, re-read on restart
    layout: LevelLayout,
    pub world_size: Vec2,
    pub tiles: TileSet,
    pub player: Option<Player>,
    pub spawn_point: Option<Vec2>,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub goal: Option<Rect>,
    pub gravity: GravityCycle,
    pub camera: Camera,
    pub phase: LevelPhase,
    /// Collected item kinds, in pickup order
    pub inventory: Vec<String>,
    pub show_inventory: bool,
    /// Win-gating items collected so far
    pub items_collected: u32,
    /// Win-gating items present at setup
    pub items_total: u32,
    /// Level clock (ms since setup)
    pub now_ms: u64,
    /// Sub-millisecond remainder carried between ticks
    clock_remainder: f64,
    /// Clock reading when the speedrun timer started
    pub run_started_ms: u64,
    /// Last sampled input
    pub input: TickInput,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Outcome latched when the level ends
    pub(super) terminal: Option<LevelOutcome>,
    next_id: u32,
}

impl Level {
    pub fn new(layout: LevelLayout, config: GameConfig) -> Self {
        let normal = GravityState::new(config.gravity, config.jump_impulse);
        let camera = Camera::new(
            layout.world_size,
            Vec2::new(config.viewport_width, config.viewport_height),
            config.camera_smoothing,
            config.parallax_factor,
        );
        let mut level = Self {
            gravity: GravityCycle::new(normal, config.gravity_flip_interval_ms),
            camera,
            world_size: layout.world_size,
            layout,
            config,
            tiles: TileSet::default(),
            player: None,
            spawn_point: None,
            enemies: Vec::new(),
            items: Vec::new(),
            goal: None,
            phase: LevelPhase::Playing,
            inventory: Vec::new(),
            show_inventory: false,
            items_collected: 0,
            items_total: 0,
            now_ms: 0,
            clock_remainder: 0.0,
            run_started_ms: 0,
            input: TickInput::default(),
            events: Vec::new(),
            terminal: None,
            next_id: 1,
        };
        level.setup();
        level
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build tiles and entities from the layout and start the timers
    fn setup(&mut self) {
        let gravity = self.gravity.current();
        self.tiles = TileSet::new(self.layout.tiles.clone());
        self.world_size = self.layout.world_size;
        self.goal = self.layout.goal;
        self.spawn_point = self.layout.player_spawn;
        self.player = self
            .spawn_point
            .map(|pos| Player::new(pos, gravity, self.config.max_lives));

        let enemy_spawns = self.layout.enemies.clone();
        for spawn in enemy_spawns {
            let id = self.next_entity_id();
            let bounds = (spawn.pos.x, spawn.pos.x + spawn.patrol_width);
            let enemy = Enemy::new(id, spawn.pos, bounds, &self.config, gravity);
            self.enemies.push(enemy);
        }

        let item_spawns = self.layout.items.clone();
        for spawn in item_spawns {
            let id = self.next_entity_id();
            if spawn.kind == self.config.required_item_kind {
                self.items_total += 1;
            }
            self.items.push(Item {
                id,
                rect: spawn.rect,
                kind: spawn.kind,
            });
        }

        if self.player.is_none() {
            log::warn!("Level has no player spawn; player systems disabled");
        }

        self.gravity.start(self.now_ms);
        self.run_started_ms = self.now_ms;
        self.camera.reset(self.world_size);
        log::info!(
            "Level ready: {} tiles, {} enemies, {} items ({} required of {})",
            self.tiles.len(),
            self.enemies.len(),
            self.items.len(),
            self.config.required_items,
            self.items_total
        );
    }

    /// Drop every tile and entity
    fn teardown(&mut self) {
        self.tiles.clear();
        self.player = None;
        self.spawn_point = None;
        self.enemies.clear();
        self.items.clear();
        self.goal = None;
        self.inventory.clear();
        self.show_inventory = false;
        self.items_collected = 0;
        self.items_total = 0;
        self.events.clear();
        self.terminal = None;
        self.input = TickInput::default();
    }

    /// Full teardown and rebuild from the layout
    pub fn restart(&mut self) {
        self.teardown();
        self.gravity.reset();
        self.now_ms = 0;
        self.clock_remainder = 0.0;
        self.next_id = 1;
        self.phase = LevelPhase::Playing;
        self.setup();
        log::info!("Level restarted");
    }

    /// Advance the level clock by `dt` seconds and return the new reading
    pub(super) fn advance_clock(&mut self, dt: f32) -> u64 {
        let total = self.clock_remainder + dt as f64 * 1000.0;
        let whole = total.floor();
        self.clock_remainder = total - whole;
        self.now_ms += whole as u64;
        self.now_ms
    }

    /// Speedrun time so far
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.run_started_ms)
    }

    pub fn lives(&self) -> u32 {
        self.player.as_ref().map_or(0, |p| p.lives)
    }

    pub fn background(&self) -> BackgroundKey {
        self.gravity.background()
    }

    /// Push a gravity state to the player and every enemy
    pub fn broadcast_gravity(&mut self, gravity: GravityState) {
        if let Some(player) = self.player.as_mut() {
            player.set_gravity(gravity);
        }
        for enemy in &mut self.enemies {
            enemy.set_gravity(gravity);
        }
    }

    /// Take a life. Respawns the player, or ends the run when none remain.
    pub fn lose_life(&mut self) -> LevelOutcome {
        let Some(player) = self.player.as_mut() else {
            return LevelOutcome::Continue;
        };
        player.lives = player.lives.saturating_sub(1);
        let lives_left = player.lives;
        self.events.push(GameEvent::LifeLost { lives_left });

        if lives_left == 0 {
            self.inventory.clear();
            self.events.push(GameEvent::GameOver);
            log::info!("Game over after {}ms", self.elapsed_ms());
            return LevelOutcome::GameOver;
        }

        if let Some(spawn) = self.spawn_point {
            player.body.rect.pos = spawn;
        }
        player.reset_state();

        // Re-sync with the world's gravity without restarting the flip timer
        let current = self.gravity.force(self.gravity.is_inverted());
        self.broadcast_gravity(current);
        log::debug!("Life lost, {} remaining", lives_left);
        LevelOutcome::PlayerRespawned
    }

    pub fn hud(&self) -> Hud {
        Hud {
            lives: self.lives(),
            elapsed_ms: self.elapsed_ms(),
            gravity_flip_in_ms: self.gravity.remaining_ms(self.now_ms),
            gravity_inverted: self.gravity.is_inverted(),
            items_collected: self.items_collected,
            items_required: self.config.required_items,
            show_inventory: self.show_inventory,
            inventory: self.inventory.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{EnemySpawn, ItemSpawn};

    fn layout() -> LevelLayout {
        LevelLayout {
            world_size: Vec2::new(1280.0, 640.0),
            tiles: Vec::new(),
            player_spawn: Some(Vec2::new(64.0, 64.0)),
            enemies: vec![EnemySpawn {
                pos: Vec2::new(512.0, 64.0),
                patrol_width: 256.0,
            }],
            items: vec![
                ItemSpawn {
                    rect: Rect::new(300.0, 64.0, 64.0, 64.0),
                    kind: "shield".to_string(),
                },
                ItemSpawn {
                    rect: Rect::new(400.0, 64.0, 64.0, 64.0),
                    kind: "key".to_string(),
                },
            ],
            goal: None,
        }
    }

    #[test]
    fn test_setup_builds_entities() {
        let level = Level::new(layout(), GameConfig::default());
        assert!(level.player.is_some());
        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.enemies[0].patrol_bounds, (512.0, 768.0));
        assert_eq!(level.items_total, 1);
        assert_eq!(level.lives(), MAX_LIVES);
        assert!(level.gravity.is_started());
    }

    #[test]
    fn test_respawn_resyncs_current_gravity() {
        let mut level = Level::new(layout(), GameConfig::default());
        let inverted = level.gravity.force(true);
        level.broadcast_gravity(inverted);
        // Player drifted from world gravity somehow
        if let Some(p) = level.player.as_mut() {
            p.set_gravity(level.gravity.current().inverted());
            p.body.rect.pos = Vec2::new(900.0, 300.0);
            p.body.vel = Vec2::new(1.0, 12.0);
        }

        assert_eq!(level.lose_life(), LevelOutcome::PlayerRespawned);

        let player = level.player.as_ref().expect("player");
        assert_eq!(player.body.gravity, inverted);
        assert_eq!(player.body.rect.pos, Vec2::new(64.0, 64.0));
        assert_eq!(player.body.vel, Vec2::ZERO);
        assert!(level.gravity.is_inverted());
    }

    #[test]
    fn test_last_life_clears_inventory() {
        let mut level = Level::new(layout(), GameConfig::default());
        level.inventory.push("shield".to_string());
        if let Some(p) = level.player.as_mut() {
            p.lives = 1;
        }
        assert_eq!(level.lose_life(), LevelOutcome::GameOver);
        assert!(level.inventory.is_empty());
        assert!(level.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_clock_keeps_sub_millisecond_remainder() {
        let mut level = Level::new(layout(), GameConfig::default());
        for _ in 0..60 {
            level.advance_clock(1.0 / 60.0);
        }
        assert!((999..=1000).contains(&level.now_ms));
    }

    #[test]
    fn test_restart_rebuilds_from_layout() {
        let mut level = Level::new(layout(), GameConfig::default());
        level.enemies.clear();
        level.items.clear();
        level.advance_clock(5.0);
        level.restart();
        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.items.len(), 2);
        assert_eq!(level.now_ms, 0);
        assert_eq!(level.lives(), MAX_LIVES);
    }
}
