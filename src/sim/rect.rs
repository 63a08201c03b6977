//! Axis-aligned bounding boxes
//!
//! Screen convention: `y` grows downward, `pos` is the top-left corner.
//! Edge setters move the box and keep its size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    #[inline]
    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    #[inline]
    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    #[inline]
    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    #[inline]
    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Shrink by `margin` on every side (never below zero size)
    pub fn inset(&self, margin: f32) -> Rect {
        let m = margin.min(self.size.x * 0.5).min(self.size.y * 0.5).max(0.0);
        Rect::from_pos_size(self.pos + Vec2::splat(m), self.size - Vec2::splat(2.0 * m))
    }

    /// Lower half of the box (y-down)
    pub fn bottom_half(&self) -> Rect {
        let mut half = *self;
        half.size.y = self.size.y * 0.5;
        half.pos.y = self.center_y();
        half
    }

    /// Upper half of the box (y-down)
    pub fn top_half(&self) -> Rect {
        let mut half = *self;
        half.size.y = self.size.y * 0.5;
        half
    }
}
