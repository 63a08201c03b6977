//! Static world tiles
//!
//! Built once at level setup and never mutated afterwards. Iteration order is
//! insertion order (row-major for ASCII maps), which is also the order
//! overlapping collisions are resolved in.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Blocks movement
    Solid,
    /// Kills the player, enemies avoid it
    Water,
    /// Climbable
    Ladder,
    /// Drawn only
    Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub rect: Rect,
    pub kind: TileKind,
}

/// The level's full tile collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileSet {
    tiles: Vec<Tile>,
}

impl TileSet {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn all(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn of_kind(&self, kind: TileKind) -> impl Iterator<Item = &Rect> {
        self.tiles
            .iter()
            .filter(move |t| t.kind == kind)
            .map(|t| &t.rect)
    }

    pub fn solids(&self) -> impl Iterator<Item = &Rect> {
        self.of_kind(TileKind::Solid)
    }

    pub fn water(&self) -> impl Iterator<Item = &Rect> {
        self.of_kind(TileKind::Water)
    }

    pub fn ladders(&self) -> impl Iterator<Item = &Rect> {
        self.of_kind(TileKind::Ladder)
    }

    pub fn overlaps_solid(&self, rect: &Rect) -> bool {
        self.solids().any(|t| t.intersects(rect))
    }

    pub fn overlaps_water(&self, rect: &Rect) -> bool {
        self.water().any(|t| t.intersects(rect))
    }

    /// First ladder tile overlapping `rect`
    pub fn ladder_at(&self, rect: &Rect) -> Option<&Rect> {
        self.ladders().find(|t| t.intersects(rect))
    }
}
