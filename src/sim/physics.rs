//! Entity physics core shared by the player and enemies
//!
//! Axis-separated movement against the static solid tiles:
//! horizontal move + clamp, then gravity integration + vertical snap, then
//! world bounds. Overlaps are resolved one tile at a time in tile order with
//! no sub-stepping, so a body moving more than a tile per tick can tunnel
//! through thin geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::gravity::GravityState;
use super::rect::Rect;
use super::tiles::TileSet;

/// Transform + motion state embedded in every moving entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    /// `x` is the caller's horizontal intent, `y` is pixels per tick
    pub vel: Vec2,
    pub on_ground: bool,
    /// Local copy of the world gravity, refreshed by `set_gravity`
    pub gravity: GravityState,
}

impl Body {
    pub fn new(rect: Rect, gravity: GravityState) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            on_ground: false,
            gravity,
        }
    }

    pub fn set_gravity(&mut self, gravity: GravityState) {
        self.gravity = gravity;
    }

    /// Start a jump if standing on something
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel.y = self.gravity.jump_impulse;
        self.on_ground = false;
        true
    }
}

/// Move by `dx` and push out of any solid tile.
///
/// Returns true if a wall stopped the move.
pub fn move_horizontal(body: &mut Body, dx: f32, tiles: &TileSet) -> bool {
    if dx == 0.0 {
        return false;
    }
    body.rect.pos.x += dx;

    let mut hit = false;
    for tile in tiles.solids() {
        if !tile.intersects(&body.rect) {
            continue;
        }
        if dx > 0.0 {
            body.rect.set_right(tile.left());
        } else {
            body.rect.set_left(tile.right());
        }
        hit = true;
    }
    hit
}

/// Integrate gravity into the vertical velocity
#[inline]
pub fn apply_gravity(body: &mut Body, dt: f32) {
    body.vel.y += body.gravity.magnitude * dt;
}

/// Move by the whole-pixel part of `vel.y` and snap against solids.
///
/// Falling into a tile lands on it (`on_ground`), rising into one is a
/// head-bump. Both zero the vertical velocity.
pub fn move_vertical(body: &mut Body, tiles: &TileSet) {
    body.on_ground = false;
    body.rect.pos.y += body.vel.y.trunc();

    let gravity = body.gravity;
    let falling = gravity.is_falling(body.vel.y);
    let rising = body.vel.y != 0.0 && !falling;
    if !falling && !rising {
        return;
    }

    for tile in tiles.solids() {
        if !tile.intersects(&body.rect) {
            continue;
        }
        let down = gravity.down();
        if falling {
            if down > 0.0 {
                body.rect.set_bottom(tile.top());
            } else {
                body.rect.set_top(tile.bottom());
            }
            body.on_ground = true;
        } else if down > 0.0 {
            body.rect.set_top(tile.bottom());
        } else {
            body.rect.set_bottom(tile.top());
        }
        body.vel.y = 0.0;
    }
}

/// Mark a body resting flush on a solid tile as grounded.
///
/// Sub-pixel velocities move nothing, so a standing body only touches its
/// floor every other tick; this keeps `on_ground` steady in between.
pub fn probe_ground(body: &mut Body, tiles: &TileSet) {
    if body.on_ground || body.vel.y * body.gravity.down() < 0.0 {
        return;
    }
    let r = &body.rect;
    let probe = if body.gravity.down() > 0.0 {
        Rect::new(r.left(), r.bottom(), r.width(), 1.0)
    } else {
        Rect::new(r.left(), r.top() - 1.0, r.width(), 1.0)
    };
    if tiles.overlaps_solid(&probe) {
        body.on_ground = true;
    }
}

/// Full vertical step: gravity, move, snap, ground probe
pub fn step_vertical(body: &mut Body, tiles: &TileSet, dt: f32) {
    apply_gravity(body, dt);
    move_vertical(body, tiles);
    probe_ground(body, tiles);
}

/// Keep the body inside `[0, world]`.
///
/// The world edge in the direction of gravity acts as ground; the opposite
/// edge only stops vertical motion.
pub fn clamp_to_world(body: &mut Body, world: Vec2) {
    if body.rect.left() < 0.0 {
        body.rect.set_left(0.0);
    }
    if body.rect.right() > world.x {
        body.rect.set_right(world.x);
    }

    let floor_is_bottom = body.gravity.down() > 0.0;
    if body.rect.bottom() > world.y {
        body.rect.set_bottom(world.y);
        body.vel.y = 0.0;
        if floor_is_bottom {
            body.on_ground = true;
        }
    }
    if body.rect.top() < 0.0 {
        body.rect.set_top(0.0);
        body.vel.y = 0.0;
        if !floor_is_bottom {
            body.on_ground = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tiles::{Tile, TileKind};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;
    const WORLD: Vec2 = Vec2::new(2000.0, 1000.0);

    fn normal() -> GravityState {
        GravityState::new(50.0, -20.0)
    }

    fn solid(x: f32, y: f32, w: f32, h: f32) -> Tile {
        Tile {
            rect: Rect::new(x, y, w, h),
            kind: TileKind::Solid,
        }
    }

    #[test]
    fn test_falling_onto_tile_lands() {
        // Box top at 300, height 64, falling at 200 px/tick onto a tile at y=500
        let tiles = TileSet::new(vec![solid(0.0, 500.0, 640.0, 64.0)]);
        let mut body = Body::new(Rect::new(100.0, 300.0, 48.0, 64.0), normal());
        body.vel.y = 200.0;

        step_vertical(&mut body, &tiles, DT);

        assert_eq!(body.rect.bottom(), 500.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_rising_into_tile_bumps_head() {
        let tiles = TileSet::new(vec![solid(0.0, 100.0, 640.0, 64.0)]);
        let mut body = Body::new(Rect::new(100.0, 180.0, 48.0, 64.0), normal());
        body.vel.y = -20.0;

        step_vertical(&mut body, &tiles, DT);

        assert_eq!(body.rect.top(), 164.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_inverted_gravity_lands_on_ceiling() {
        let tiles = TileSet::new(vec![solid(0.0, 0.0, 640.0, 64.0)]);
        let mut body = Body::new(Rect::new(100.0, 100.0, 48.0, 64.0), normal().inverted());
        body.vel.y = -50.0;

        step_vertical(&mut body, &tiles, DT);

        assert_eq!(body.rect.top(), 64.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_sub_pixel_velocity_is_dropped() {
        let tiles = TileSet::default();
        let mut body = Body::new(Rect::new(0.0, 0.0, 10.0, 10.0), normal());
        step_vertical(&mut body, &tiles, DT);
        assert!(body.vel.y > 0.0 && body.vel.y < 1.0);
        assert_eq!(body.rect.top(), 0.0);
    }

    #[test]
    fn test_standing_body_stays_grounded() {
        let tiles = TileSet::new(vec![solid(0.0, 500.0, 640.0, 64.0)]);
        let mut body = Body::new(Rect::new(100.0, 436.0, 48.0, 64.0), normal());
        for _ in 0..10 {
            step_vertical(&mut body, &tiles, DT);
            assert!(body.on_ground);
            assert_eq!(body.rect.bottom(), 500.0);
        }
    }

    #[test]
    fn test_horizontal_wall_clamps() {
        let tiles = TileSet::new(vec![solid(200.0, 0.0, 64.0, 640.0)]);
        let mut body = Body::new(Rect::new(140.0, 100.0, 48.0, 64.0), normal());

        assert!(move_horizontal(&mut body, 20.0, &tiles));
        assert_eq!(body.rect.right(), 200.0);

        let mut body = Body::new(Rect::new(270.0, 100.0, 48.0, 64.0), normal());
        assert!(move_horizontal(&mut body, -10.0, &tiles));
        assert_eq!(body.rect.left(), 264.0);
    }

    #[test]
    fn test_world_floor_is_ground() {
        let mut body = Body::new(Rect::new(-5.0, 990.0, 48.0, 64.0), normal());
        body.vel.y = 3.0;
        clamp_to_world(&mut body, WORLD);
        assert_eq!(body.rect.left(), 0.0);
        assert_eq!(body.rect.bottom(), WORLD.y);
        assert!(body.on_ground);

        // Ceiling only stops motion under normal gravity
        let mut body = Body::new(Rect::new(0.0, -10.0, 48.0, 64.0), normal());
        body.vel.y = -5.0;
        clamp_to_world(&mut body, WORLD);
        assert_eq!(body.rect.top(), 0.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_fast_body_tunnels_through_thin_tile() {
        // Known limitation: no swept collision
        let tiles = TileSet::new(vec![solid(0.0, 300.0, 640.0, 8.0)]);
        let mut body = Body::new(Rect::new(100.0, 200.0, 48.0, 64.0), normal());
        body.vel.y = 200.0;
        step_vertical(&mut body, &tiles, DT);
        assert!(body.rect.top() > 308.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut body = Body::new(Rect::new(0.0, 0.0, 10.0, 10.0), normal());
        assert!(!body.jump());
        body.on_ground = true;
        assert!(body.jump());
        assert_eq!(body.vel.y, -20.0);
        assert!(!body.on_ground);
    }

    proptest! {
        #[test]
        fn prop_step_stays_in_world(
            x in -500.0f32..2500.0,
            y in -500.0f32..1500.0,
            vx in -400.0f32..400.0,
            vy in -300.0f32..300.0,
            inverted in any::<bool>(),
        ) {
            let g = if inverted { normal().inverted() } else { normal() };
            let tiles = TileSet::new(vec![solid(600.0, 600.0, 128.0, 64.0)]);
            let mut body = Body::new(Rect::new(x, y, 48.0, 64.0), g);
            body.vel.y = vy;

            move_horizontal(&mut body, vx * DT, &tiles);
            step_vertical(&mut body, &tiles, DT);
            clamp_to_world(&mut body, WORLD);

            prop_assert!(body.rect.left() >= 0.0);
            prop_assert!(body.rect.right() <= WORLD.x);
            prop_assert!(body.rect.top() >= 0.0);
            prop_assert!(body.rect.bottom() <= WORLD.y);
        }
    }
}
