//! Per-frame simulation step
//!
//! Order within a tick: gravity cycle, player (ladder or physics), enemies,
//! resolver, camera. A tick always runs to completion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::update_enemy;
use super::ladder::{ClimbStep, update_ladder};
use super::physics::{clamp_to_world, move_horizontal, step_vertical};
use super::resolver::resolve;
use super::state::{Facing, GameEvent, Level, LevelOutcome, LevelPhase, Player};
use super::tiles::TileSet;
use crate::settings::GameConfig;

/// Sampled key state for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Inventory overlay toggle (one-shot)
    pub toggle_inventory: bool,
}

impl TickInput {
    /// -1, 0 or 1; left wins when both are held
    pub fn horizontal(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }
}

fn update_player(
    player: &mut Player,
    input: &TickInput,
    tiles: &TileSet,
    world: Vec2,
    config: &GameConfig,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    player.prev_rect = player.body.rect;

    let step = update_ladder(player, input, tiles, config, dt);
    if step == ClimbStep::Jumped {
        events.push(GameEvent::Jumped);
    }
    if step != ClimbStep::Climbed {
        let dir = input.horizontal();
        player.body.vel.x = dir;
        if dir < 0.0 {
            player.facing = Facing::Left;
        } else if dir > 0.0 {
            player.facing = Facing::Right;
        }
        move_horizontal(&mut player.body, dir * config.player_speed * dt, tiles);

        if input.jump && player.body.jump() {
            events.push(GameEvent::Jumped);
        }
        step_vertical(&mut player.body, tiles, dt);
    }

    clamp_to_world(&mut player.body, world);
    player.animate(dt);
}

impl Level {
    /// Sample input for the coming ticks; one-shot toggles apply immediately
    pub fn handle_input(&mut self, input: TickInput) {
        if input.pause {
            self.phase = match self.phase {
                LevelPhase::Playing => LevelPhase::Paused,
                LevelPhase::Paused => LevelPhase::Playing,
                other => other,
            };
        }
        if input.toggle_inventory {
            self.show_inventory = !self.show_inventory;
        }
        self.input = TickInput {
            pause: false,
            toggle_inventory: false,
            ..input
        };
    }

    /// Advance the level by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> LevelOutcome {
        match self.phase {
            LevelPhase::Paused => return LevelOutcome::Continue,
            LevelPhase::Won | LevelPhase::Lost => {
                return self.terminal.unwrap_or(LevelOutcome::Continue);
            }
            LevelPhase::Playing => {}
        }

        self.events.clear();
        let now = self.advance_clock(dt);

        if let Some(gravity) = self.gravity.update(now) {
            self.broadcast_gravity(gravity);
            self.events.push(GameEvent::GravityFlipped {
                inverted: gravity.is_inverted(),
            });
        }

        let input = self.input;
        if let Some(player) = self.player.as_mut() {
            update_player(
                player,
                &input,
                &self.tiles,
                self.world_size,
                &self.config,
                dt,
                &mut self.events,
            );
        }

        let player_x = self.player.as_ref().map(|p| p.rect().center_x());
        for enemy in &mut self.enemies {
            update_enemy(enemy, player_x, &self.tiles, self.world_size, &self.config, dt);
        }

        let outcome = resolve(self);
        match outcome {
            LevelOutcome::Victory(_) => {
                self.phase = LevelPhase::Won;
                self.terminal = Some(outcome);
            }
            LevelOutcome::GameOver => {
                self.phase = LevelPhase::Lost;
                self.terminal = Some(outcome);
            }
            LevelOutcome::Continue | LevelOutcome::PlayerRespawned => {}
        }

        if let Some(player) = self.player.as_ref() {
            self.camera.follow(player.rect(), dt);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_ascii;
    use crate::sim::state::AiMode;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    const ROOM: &str = "\
################
#..............#
#..............#
#.P.........M>.#
################";

    fn level(src: &str) -> Level {
        let config = GameConfig::default();
        let layout = parse_ascii(src, config.tile_size).expect("valid map");
        Level::new(layout, config)
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut lvl = level(ROOM);
        for _ in 0..30 {
            lvl.tick(DT);
        }
        let p = lvl.player.as_ref().expect("player");
        assert!(p.body.on_ground);
        assert_eq!(p.rect().bottom(), 4.0 * 64.0);
    }

    #[test]
    fn test_walk_right_and_face() {
        let mut lvl = level(ROOM);
        let start = lvl.player.as_ref().expect("player").rect().left();
        lvl.handle_input(TickInput {
            right: true,
            ..Default::default()
        });
        for _ in 0..10 {
            lvl.tick(DT);
        }
        let p = lvl.player.as_ref().expect("player");
        assert!(p.rect().left() > start);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut lvl = level(ROOM);
        for _ in 0..5 {
            lvl.tick(DT);
        }
        let floor_top = lvl.player.as_ref().expect("player").rect().top();
        lvl.handle_input(TickInput {
            jump: true,
            ..Default::default()
        });
        lvl.tick(DT);
        assert!(lvl.events.contains(&GameEvent::Jumped));
        let p = lvl.player.as_ref().expect("player");
        assert!(p.rect().top() < floor_top);
        assert!(!p.body.on_ground);
    }

    #[test]
    fn test_jump_off_ladder_is_reported() {
        let mut lvl = level("\
######
#....#
#.H..#
#.H..#
#PH..#
######");
        for _ in 0..5 {
            lvl.tick(DT);
        }
        lvl.player.as_mut().expect("player").body.rect.pos.x = 136.0;
        lvl.handle_input(TickInput {
            up: true,
            ..Default::default()
        });
        for _ in 0..5 {
            lvl.tick(DT);
        }
        assert!(lvl.player.as_ref().expect("player").climbing);

        lvl.handle_input(TickInput {
            jump: true,
            ..Default::default()
        });
        lvl.tick(DT);
        let jumps = lvl.events.iter().filter(|e| **e == GameEvent::Jumped).count();
        assert_eq!(jumps, 1);
        let p = lvl.player.as_ref().expect("player");
        assert!(!p.climbing);
        assert!(p.body.vel.y < 0.0);
    }

    #[test]
    fn test_gravity_flip_reaches_every_entity() {
        let mut lvl = level(ROOM);
        let interval = lvl.config.gravity_flip_interval_ms;
        let ticks = (interval as f32 / 1000.0 / DT) as usize + 2;
        let mut flips = 0;
        for _ in 0..ticks {
            lvl.tick(DT);
            flips += lvl
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::GravityFlipped { .. }))
                .count();
        }
        assert_eq!(flips, 1);
        assert!(lvl.gravity.is_inverted());
        let current = lvl.gravity.current();
        assert_eq!(lvl.player.as_ref().expect("player").body.gravity, current);
        assert!(lvl.enemies.iter().all(|e| e.body.gravity == current));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut lvl = level(ROOM);
        lvl.handle_input(TickInput {
            pause: true,
            ..Default::default()
        });
        assert_eq!(lvl.phase, LevelPhase::Paused);
        let before = lvl.now_ms;
        assert_eq!(lvl.tick(DT), LevelOutcome::Continue);
        assert_eq!(lvl.now_ms, before);

        lvl.handle_input(TickInput {
            pause: true,
            ..Default::default()
        });
        assert_eq!(lvl.phase, LevelPhase::Playing);
        // The toggle itself is not held across ticks
        assert!(!lvl.input.pause);
    }

    #[test]
    fn test_inventory_toggle() {
        let mut lvl = level(ROOM);
        let toggle = TickInput {
            toggle_inventory: true,
            ..Default::default()
        };
        lvl.handle_input(toggle);
        assert!(lvl.hud().show_inventory);
        lvl.handle_input(toggle);
        assert!(!lvl.hud().show_inventory);
    }

    #[test]
    fn test_game_over_latches() {
        let src = "\
######
#P...#
#~~~~#
######";
        let mut lvl = level(src);
        if let Some(p) = lvl.player.as_mut() {
            p.lives = 1;
        }
        let mut outcome = LevelOutcome::Continue;
        for _ in 0..120 {
            outcome = lvl.tick(DT);
            if outcome != LevelOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, LevelOutcome::GameOver);
        assert_eq!(lvl.phase, LevelPhase::Lost);
        let frozen = lvl.now_ms;
        assert_eq!(lvl.tick(DT), LevelOutcome::GameOver);
        assert_eq!(lvl.now_ms, frozen);

        lvl.restart();
        assert_eq!(lvl.phase, LevelPhase::Playing);
        assert_eq!(lvl.lives(), lvl.config.max_lives);
    }

    #[test]
    fn test_enemy_chases_nearby_player() {
        let src = "\
##########
#.P..M>..#
##########";
        let mut lvl = level(src);
        lvl.tick(DT);
        assert!(lvl.enemies.iter().all(|e| e.mode == AiMode::Chase));
        assert!(lvl.enemies.iter().all(|e| e.body.vel.x < 0.0));

        // The wide room keeps its enemy out of sight
        let mut far = level(ROOM);
        far.tick(DT);
        assert!(far.enemies.iter().all(|e| e.mode == AiMode::Patrol));
    }

    #[test]
    fn test_no_player_level_still_ticks() {
        let src = "\
#####
#.M>#
#####";
        let mut lvl = level(src);
        for _ in 0..60 {
            assert_eq!(lvl.tick(DT), LevelOutcome::Continue);
        }
        assert_eq!(lvl.camera.offset, Vec2::ZERO);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn prop_entities_stay_in_world(
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
                1..200,
            ),
        ) {
            let mut lvl = level(ROOM);
            for (left, right, up, down, jump) in inputs {
                lvl.handle_input(TickInput { left, right, up, down, jump, ..Default::default() });
                lvl.tick(DT);
                let w = lvl.world_size;
                if let Some(p) = lvl.player.as_ref() {
                    prop_assert!(p.rect().left() >= 0.0 && p.rect().right() <= w.x);
                    prop_assert!(p.rect().top() >= 0.0 && p.rect().bottom() <= w.y);
                }
                for e in &lvl.enemies {
                    prop_assert!(e.rect().left() >= 0.0 && e.rect().right() <= w.x);
                    prop_assert!(e.rect().top() >= 0.0 && e.rect().bottom() <= w.y);
                }
                let g = lvl.gravity.current();
                prop_assert!(g.is_consistent());
            }
        }
    }
}
