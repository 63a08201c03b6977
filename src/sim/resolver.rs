//! Per-tick gameplay collisions: goal, water, items, enemies
//!
//! Runs after physics in a fixed priority order and reports a single
//! `LevelOutcome`. At most one life is lost and at most one enemy is
//! handled per tick.

use super::gravity::GravityState;
use super::rect::Rect;
use super::state::{GameEvent, Level, LevelOutcome, LevelPhase};
use crate::settings::GameConfig;

/// Inputs of the stomp test, all taken from the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StompCheck {
    pub player: Rect,
    pub player_prev: Rect,
    pub player_vel_y: f32,
    pub gravity: GravityState,
    pub enemy: Rect,
}

/// Whether an overlapping enemy is stomped (true) or hurts the player.
///
/// The player's half facing "down" must overlap the enemy's half facing
/// "up", the player must be moving toward the enemy (or have started the
/// tick above it, within `land_tolerance`), and the centres must be roughly
/// aligned. "Up" and "down" follow the gravity sign.
pub fn is_stomp(check: &StompCheck, config: &GameConfig) -> bool {
    let StompCheck {
        player,
        player_prev: prev,
        player_vel_y,
        gravity,
        enemy,
    } = *check;

    let reach = enemy.width().max(player.width()) * config.horiz_align_factor;
    let aligned = (player.center_x() - enemy.center_x()).abs() <= reach;

    let tol = config.land_tolerance;
    let (player_half, enemy_half, moving_towards) = if gravity.magnitude > 0.0 {
        (
            player.bottom_half(),
            enemy.top_half(),
            player_vel_y > 0.0 || prev.bottom() <= enemy.top() + tol,
        )
    } else {
        (
            player.top_half(),
            enemy.bottom_half(),
            player_vel_y < 0.0 || prev.top() >= enemy.bottom() - tol,
        )
    };

    player_half.intersects(&enemy_half) && moving_towards && aligned
}

/// Evaluate all gameplay collisions for the current tick
pub fn resolve(level: &mut Level) -> LevelOutcome {
    let Some(player) = level.player.as_ref() else {
        return LevelOutcome::Continue;
    };
    let player_rect = *player.rect();

    // 1. Goal, only once enough items are in the bag
    let goal_reached = level
        .goal
        .is_some_and(|goal| goal.intersects(&player_rect));
    if goal_reached && level.items_collected >= level.config.required_items {
        let elapsed_ms = level.elapsed_ms();
        level.phase = LevelPhase::Won;
        level.events.push(GameEvent::Victory { elapsed_ms });
        log::info!("Victory in {}ms", elapsed_ms);
        return LevelOutcome::Victory(elapsed_ms);
    }

    // 2. Water
    if level.tiles.overlaps_water(&player_rect) {
        return level.lose_life();
    }

    // 3. Items
    let mut picked = Vec::new();
    level.items.retain(|item| {
        if item.rect.intersects(&player_rect) {
            picked.push(item.kind.clone());
            false
        } else {
            true
        }
    });
    for kind in picked {
        if kind == level.config.required_item_kind {
            level.items_collected += 1;
        }
        log::debug!("Collected {} ({} gating)", kind, level.items_collected);
        level.inventory.push(kind.clone());
        level.events.push(GameEvent::ItemCollected { kind });
    }

    // 4. First overlapping enemy decides stomp or damage
    let Some(index) = level
        .enemies
        .iter()
        .position(|e| e.rect().intersects(&player_rect))
    else {
        return LevelOutcome::Continue;
    };

    let Some(player) = level.player.as_mut() else {
        return LevelOutcome::Continue;
    };
    let check = StompCheck {
        player: player_rect,
        player_prev: player.prev_rect,
        player_vel_y: player.body.vel.y,
        gravity: player.body.gravity,
        enemy: *level.enemies[index].rect(),
    };
    if is_stomp(&check, &level.config) {
        // Rebound away from the enemy at half jump strength
        player.body.vel.y = player.body.gravity.jump_impulse * 0.5;
        player.body.on_ground = false;
        let enemy = level.enemies.remove(index);
        level.events.push(GameEvent::EnemyStomped { enemy_id: enemy.id });
        log::debug!("Stomped enemy {}", enemy.id);
        return LevelOutcome::Continue;
    }

    level.lose_life()
}
