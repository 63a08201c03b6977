//! Ladder climbing for the player
//!
//! While climbing, the ladder owns vertical motion: gravity is ignored and
//! up/down move the player at a fixed speed whatever the gravity sign. The
//! horizontal position eases toward the ladder's centre line (climb lock).

use super::rect::Rect;
use super::state::Player;
use super::tick::TickInput;
use super::tiles::TileSet;
use crate::settings::GameConfig;

/// What the ladder did with this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimbStep {
    /// Not on a ladder (or just left one): normal physics runs
    Free,
    /// Jumped off the ladder: normal physics runs with the impulse applied
    Jumped,
    /// Ladder handled all motion this tick
    Climbed,
}

fn enter(player: &mut Player, ladder: &Rect) {
    player.climbing = true;
    player.climb_target_x = Some(ladder.center_x() - player.rect().width() * 0.5);
    player.body.vel.y = 0.0;
    player.body.on_ground = false;
}

fn exit(player: &mut Player) {
    player.climbing = false;
    player.climb_target_x = None;
}

/// Run the ladder state machine for one tick
pub fn update_ladder(
    player: &mut Player,
    input: &TickInput,
    tiles: &TileSet,
    config: &GameConfig,
    dt: f32,
) -> ClimbStep {
    let hitbox = player.rect().inset(config.ladder_margin);
    let ladder = tiles.ladder_at(&hitbox).copied();

    if !player.climbing {
        // Only a pure up/down press grabs; anything else leaves the body alone
        let grab = (input.up || input.down) && input.horizontal() == 0.0 && !input.jump;
        match ladder {
            Some(ladder) if grab => enter(player, &ladder),
            _ => return ClimbStep::Free,
        }
    }

    if ladder.is_none() || input.horizontal() != 0.0 {
        exit(player);
        return ClimbStep::Free;
    }
    if input.jump {
        exit(player);
        player.body.vel.y = player.body.gravity.jump_impulse;
        player.body.on_ground = false;
        return ClimbStep::Jumped;
    }

    if let Some(target) = player.climb_target_x {
        let x = player.body.rect.pos.x;
        player.body.rect.pos.x = x + (target - x) * config.climb_ease;
    }
    player.body.vel.y = 0.0;
    player.body.on_ground = false;

    let step = config.climb_speed * dt;
    let gravity_down = player.body.gravity.down();
    if input.up {
        player.body.rect.pos.y -= step;
        for tile in tiles.solids() {
            if tile.intersects(&player.body.rect) {
                player.body.rect.set_top(tile.bottom());
                exit(player);
                // Under inverted gravity the obstruction above is the floor
                if gravity_down < 0.0 {
                    player.body.on_ground = true;
                }
            }
        }
    } else if input.down {
        player.body.rect.pos.y += step;
        for tile in tiles.solids() {
            if tile.intersects(&player.body.rect) {
                player.body.rect.set_bottom(tile.top());
                exit(player);
                if gravity_down > 0.0 {
                    player.body.on_ground = true;
                }
            }
        }
    }

    ClimbStep::Climbed
}
