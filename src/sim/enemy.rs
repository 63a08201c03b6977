//! Enemy AI: patrol inside a range, chase the player along x when close
//!
//! Enemies never walk, fall or get pushed into water. A probe ahead of the
//! leading edge turns them around before the step; any overlap that slips
//! through is rolled back.

use glam::Vec2;

use super::physics::{clamp_to_world, move_horizontal, step_vertical};
use super::rect::Rect;
use super::state::{AiMode, Enemy};
use super::tiles::TileSet;
use crate::settings::GameConfig;

/// Mode for an enemy given the player's horizontal centre (if any)
pub fn choose_mode(enemy: &Enemy, player_center_x: Option<f32>) -> AiMode {
    match player_center_x {
        Some(px) if (px - enemy.rect().center_x()).abs() <= enemy.vision_radius => AiMode::Chase,
        _ => AiMode::Patrol,
    }
}

/// Small box just past the leading edge at foot height
pub fn water_probe(enemy: &Enemy, direction: f32, config: &GameConfig) -> Rect {
    let r = enemy.rect();
    let w = config.water_probe_width;
    let d = config.water_probe_depth;
    let x = if direction > 0.0 { r.right() } else { r.left() - w };
    let foot = if enemy.body.gravity.down() > 0.0 {
        r.bottom()
    } else {
        r.top()
    };
    Rect::new(x, foot - d, w, 2.0 * d)
}

/// Advance one enemy by one tick
pub fn update_enemy(
    enemy: &mut Enemy,
    player_center_x: Option<f32>,
    tiles: &TileSet,
    world: Vec2,
    config: &GameConfig,
    dt: f32,
) {
    enemy.mode = choose_mode(enemy, player_center_x);

    let mut direction = enemy.direction();
    let speed = match (enemy.mode, player_center_x) {
        (AiMode::Chase, Some(px)) => {
            let dx = px - enemy.rect().center_x();
            if dx > 0.0 {
                direction = 1.0;
            } else if dx < 0.0 {
                direction = -1.0;
            }
            config.enemy_chase_speed
        }
        _ => {
            let (min_x, max_x) = enemy.patrol_bounds;
            if direction > 0.0 && enemy.rect().right() >= max_x {
                direction = -1.0;
            } else if direction < 0.0 && enemy.rect().left() <= min_x {
                direction = 1.0;
            }
            config.enemy_patrol_speed
        }
    };
    enemy.body.vel.x = direction * speed;

    // Horizontal: probe for water, move, bounce off walls, roll back from water
    let probe = water_probe(enemy, direction, config);
    if tiles.overlaps_water(&probe) {
        enemy.body.vel.x = -enemy.body.vel.x;
    } else {
        let prev_x = enemy.body.rect.pos.x;
        let dx = enemy.body.vel.x * dt;
        if move_horizontal(&mut enemy.body, dx, tiles) {
            enemy.body.vel.x = -enemy.body.vel.x;
        }
        if tiles.overlaps_water(enemy.rect()) {
            enemy.body.rect.pos.x = prev_x;
            enemy.body.vel.x = -enemy.body.vel.x;
        }
    }

    // Vertical: shared physics, but gravity can't drop an enemy into water
    let prev_y = enemy.body.rect.pos.y;
    step_vertical(&mut enemy.body, tiles, dt);
    if tiles.overlaps_water(enemy.rect()) {
        enemy.body.rect.pos.y = prev_y;
        enemy.body.vel.y = 0.0;
        enemy.body.on_ground = true;
    }

    let before = enemy.body.rect.pos.x;
    clamp_to_world(&mut enemy.body, world);
    if enemy.body.rect.pos.x != before {
        enemy.body.vel.x = -enemy.body.vel.x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::gravity::GravityState;
    use crate::sim::tiles::{Tile, TileKind};

    const DT: f32 = 1.0 / 60.0;
    const WORLD: Vec2 = Vec2::new(2000.0, 1000.0);

    fn tile(x: f32, y: f32, kind: TileKind) -> Tile {
        Tile {
            rect: Rect::new(x, y, 64.0, 64.0),
            kind,
        }
    }

    /// Floor of solid tiles along y=512 from x=0 to x=1280
    fn floor() -> Vec<Tile> {
        (0..20)
            .map(|i| tile(i as f32 * 64.0, 512.0, TileKind::Solid))
            .collect()
    }

    fn enemy_at(x: f32, bounds: (f32, f32)) -> Enemy {
        let config = GameConfig::default();
        Enemy::new(
            1,
            Vec2::new(x, 462.0),
            bounds,
            &config,
            GravityState::new(50.0, -20.0),
        )
    }

    #[test]
    fn test_patrol_turns_at_bound() {
        let tiles = TileSet::new(floor());
        let config = GameConfig::default();
        // Right edge exactly on the bound while moving right
        let mut e = enemy_at(350.0, (100.0, 400.0));
        assert_eq!(e.rect().right(), 400.0);
        assert!(e.body.vel.x > 0.0);

        update_enemy(&mut e, None, &tiles, WORLD, &config, DT);

        assert!(e.body.vel.x < 0.0);
        assert_eq!(e.mode, AiMode::Patrol);
    }

    #[test]
    fn test_chase_moves_toward_player_only_in_x() {
        let tiles = TileSet::new(floor());
        let config = GameConfig::default();
        let mut e = enemy_at(600.0, (500.0, 800.0));
        let start = *e.rect();

        update_enemy(&mut e, Some(400.0), &tiles, WORLD, &config, DT);

        assert_eq!(e.mode, AiMode::Chase);
        assert!(e.body.vel.x < 0.0);
        assert!(e.rect().left() < start.left());
        assert!((e.rect().left() - (start.left() - config.enemy_chase_speed * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_player_outside_vision_means_patrol() {
        let e = enemy_at(600.0, (500.0, 800.0));
        let far = e.rect().center_x() + e.vision_radius + 1.0;
        assert_eq!(choose_mode(&e, Some(far)), AiMode::Patrol);
        assert_eq!(choose_mode(&e, None), AiMode::Patrol);
        let near = e.rect().center_x() - e.vision_radius;
        assert_eq!(choose_mode(&e, Some(near)), AiMode::Chase);
    }

    #[test]
    fn test_water_ahead_turns_enemy_around() {
        // Floor with a pool replacing the tile at x=448
        let mut tiles: Vec<Tile> = floor()
            .into_iter()
            .filter(|t| t.rect.left() != 448.0)
            .collect();
        tiles.push(tile(448.0, 512.0, TileKind::Water));
        let tiles = TileSet::new(tiles);
        let config = GameConfig::default();

        // Right edge 1px short of the pool, moving right
        let mut e = enemy_at(397.0, (0.0, 1000.0));
        update_enemy(&mut e, None, &tiles, WORLD, &config, DT);

        assert!(e.body.vel.x < 0.0);
        assert_eq!(e.rect().left(), 397.0);
        assert!(!tiles.overlaps_water(e.rect()));
    }

    #[test]
    fn test_step_into_water_is_rolled_back() {
        // Pool hanging at body height: the foot probe misses it, the step does not
        let mut tiles = floor();
        tiles.push(tile(448.0, 400.0, TileKind::Water));
        let tiles = TileSet::new(tiles);
        let config = GameConfig::default();

        let mut e = enemy_at(397.0, (0.0, 1000.0));
        assert!(!tiles.overlaps_water(&water_probe(&e, 1.0, &config)));
        update_enemy(&mut e, None, &tiles, WORLD, &config, DT);

        assert_eq!(e.rect().left(), 397.0);
        assert!(e.body.vel.x < 0.0);
        assert!(!tiles.overlaps_water(e.rect()));
    }

    #[test]
    fn test_wall_bounces_enemy() {
        let mut tiles = floor();
        tiles.push(tile(640.0, 448.0, TileKind::Solid));
        let tiles = TileSet::new(tiles);
        let config = GameConfig::default();

        let mut e = enemy_at(589.0, (0.0, 1000.0));
        update_enemy(&mut e, None, &tiles, WORLD, &config, DT);

        assert_eq!(e.rect().right(), 640.0);
        assert!(e.body.vel.x < 0.0);
    }

    #[test]
    fn test_gravity_cannot_drop_enemy_into_water() {
        let tiles = TileSet::new(vec![tile(0.0, 512.0, TileKind::Water)]);
        let config = GameConfig::default();
        let mut e = enemy_at(5.0, (0.0, 60.0));
        e.body.vel.y = 10.0;
        let top = e.rect().top();

        update_enemy(&mut e, None, &tiles, WORLD, &config, DT);

        assert_eq!(e.rect().top(), top);
        assert!(e.body.on_ground);
        assert_eq!(e.body.vel.y, 0.0);
    }
}
