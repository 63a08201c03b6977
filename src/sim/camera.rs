//! Smoothed follow camera with world clamping and parallax
//!
//! Recomputed every tick from the target's position, no internal state
//! machine. Smoothing is expressed as "fraction per 60 Hz tick" and scaled by
//! `dt` so the pan speed doesn't depend on frame rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::REFERENCE_HZ;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World position of the viewport's top-left corner
    pub offset: Vec2,
    pub world_size: Vec2,
    pub viewport_size: Vec2,
    /// Fraction of the remaining distance covered per reference tick, in (0, 1]
    pub smoothing: f32,
    /// Background scroll ratio, in [0, 1]
    pub parallax: f32,
}

impl Camera {
    pub fn new(world_size: Vec2, viewport_size: Vec2, smoothing: f32, parallax: f32) -> Self {
        Self {
            offset: Vec2::ZERO,
            world_size,
            viewport_size,
            smoothing,
            parallax,
        }
    }

    pub fn half_viewport(&self) -> Vec2 {
        self.viewport_size * 0.5
    }

    /// Back to the world origin (level setup)
    pub fn reset(&mut self, world_size: Vec2) {
        self.world_size = world_size;
        self.offset = Vec2::ZERO;
    }

    /// Largest offset that keeps the viewport inside the world
    pub fn max_offset(&self) -> Vec2 {
        (self.world_size - self.viewport_size).max(Vec2::ZERO)
    }

    /// Offset that would centre `target` exactly
    pub fn desired_offset(&self, target: Vec2) -> Vec2 {
        target - self.half_viewport()
    }

    /// Interpolation weight for a tick of `dt` seconds
    pub fn smoothing_alpha(&self, dt: f32) -> f32 {
        if self.smoothing >= 1.0 {
            return 1.0;
        }
        let ticks = (dt * REFERENCE_HZ).max(0.0);
        1.0 - (1.0 - self.smoothing).powf(ticks)
    }

    /// Ease toward the target's centre and clamp to the world
    pub fn follow(&mut self, target: &Rect, dt: f32) {
        let desired = self.desired_offset(target.center());
        self.offset += (desired - self.offset) * self.smoothing_alpha(dt);
        self.clamp();
    }

    /// Jump straight to the target (no easing)
    pub fn snap_to(&mut self, target: &Rect) {
        self.offset = self.desired_offset(target.center());
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.clamp(Vec2::ZERO, self.max_offset());
    }

    /// Whole-pixel offset used for sprite placement
    pub fn pixel_offset(&self) -> Vec2 {
        self.offset.floor()
    }

    /// Screen position of a world point
    pub fn to_screen(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.pixel_offset()
    }

    /// Where the background layer's top-left goes
    pub fn background_position(&self) -> Vec2 {
        -self.offset * self.parallax
    }
}

/// Painter's order: ascending box centre `y`, stable for ties
pub fn sort_by_depth<T>(items: &mut [T], rect_of: impl Fn(&T) -> Rect) {
    items.sort_by(|a, b| rect_of(a).center_y().total_cmp(&rect_of(b).center_y()));
}
