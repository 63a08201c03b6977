//! Gravity state and the timed inversion cycle
//!
//! One `GravityCycle` per level. It owns the current gravity and is the only
//! writer; entities receive copies through `set_gravity`.

use serde::{Deserialize, Serialize};

use crate::sign_of;

/// Vertical acceleration and the matching jump impulse.
///
/// `jump_impulse` always has the opposite sign to `magnitude`: under normal
/// gravity things fall down and jumps go up, inverted gravity mirrors both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityState {
    /// Signed acceleration, positive pulls toward larger `y`
    pub magnitude: f32,
    /// Signed vertical velocity applied on jump
    pub jump_impulse: f32,
}

impl GravityState {
    pub fn new(magnitude: f32, jump_impulse: f32) -> Self {
        Self {
            magnitude,
            jump_impulse,
        }
    }

    /// Mirror image of this state
    pub fn inverted(&self) -> Self {
        Self {
            magnitude: -self.magnitude,
            jump_impulse: -self.jump_impulse,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.magnitude < 0.0
    }

    /// +1 when "down" is larger `y`, -1 when gravity points up
    #[inline]
    pub fn down(&self) -> f32 {
        if self.magnitude < 0.0 { -1.0 } else { 1.0 }
    }

    /// True when a vertical velocity moves along the pull of gravity
    #[inline]
    pub fn is_falling(&self, vel_y: f32) -> bool {
        (self.magnitude > 0.0 && vel_y > 0.0) || (self.magnitude < 0.0 && vel_y < 0.0)
    }

    /// Jump and pull point in opposite directions
    pub fn is_consistent(&self) -> bool {
        self.magnitude != 0.0 && sign_of(self.jump_impulse) == -sign_of(self.magnitude)
    }
}

/// Which background the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundKey {
    #[default]
    Normal,
    Inverted,
}

impl BackgroundKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundKey::Normal => "fundo_mundonormal",
            BackgroundKey::Inverted => "fundo_mundoinvertido",
        }
    }
}

/// Timer that flips world gravity every `interval_ms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityCycle {
    /// Gravity used while not inverted
    normal: GravityState,
    /// Whether gravity currently points up
    inverted: bool,
    /// Milliseconds between flips
    interval_ms: u64,
    /// Clock reading when the current state began (None until started)
    state_started_ms: Option<u64>,
}

impl GravityCycle {
    pub fn new(normal: GravityState, interval_ms: u64) -> Self {
        Self {
            normal,
            inverted: false,
            interval_ms,
            state_started_ms: None,
        }
    }

    /// Start (or restart) the timer at `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.state_started_ms = Some(now_ms);
    }

    pub fn is_started(&self) -> bool {
        self.state_started_ms.is_some()
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Gravity in effect right now
    pub fn current(&self) -> GravityState {
        if self.inverted {
            self.normal.inverted()
        } else {
            self.normal
        }
    }

    pub fn background(&self) -> BackgroundKey {
        if self.inverted {
            BackgroundKey::Inverted
        } else {
            BackgroundKey::Normal
        }
    }

    /// Advance the timer. Returns the new gravity when a flip happened.
    ///
    /// At most one flip per call; the timer restarts from `now_ms`.
    pub fn update(&mut self, now_ms: u64) -> Option<GravityState> {
        let started = self.state_started_ms?;
        if now_ms.saturating_sub(started) < self.interval_ms {
            return None;
        }
        self.inverted = !self.inverted;
        self.state_started_ms = Some(now_ms);
        log::debug!(
            "Gravity flipped at {}ms (inverted: {})",
            now_ms,
            self.inverted
        );
        Some(self.current())
    }

    /// Re-assert a state without touching the timer
    pub fn force(&mut self, inverted: bool) -> GravityState {
        self.inverted = inverted;
        self.current()
    }

    /// Milliseconds left before the next flip (full interval if not started)
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match self.state_started_ms {
            Some(started) => self
                .interval_ms
                .saturating_sub(now_ms.saturating_sub(started)),
            None => self.interval_ms,
        }
    }

    /// Back to normal gravity with the timer stopped
    pub fn reset(&mut self) {
        self.inverted = false;
        self.state_started_ms = None;
    }
}
