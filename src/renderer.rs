//! Camera-positioned drawing
//!
//! The level never touches pixels. It emits draw calls in painter's order to
//! a host-provided [`Canvas`]: background with parallax first, then every
//! tile and entity sorted by its box centre `y`.

use glam::Vec2;

use crate::sim::{BackgroundKey, Facing, Level, Rect, TileKind, sort_by_depth};

/// What to draw at a position
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteKind {
    Tile(TileKind),
    Player {
        facing: Facing,
        frame: u32,
        /// Drawn upside down while gravity is inverted
        flipped: bool,
        climbing: bool,
    },
    Enemy {
        facing: Facing,
        flipped: bool,
    },
    Item { kind: String },
    Goal,
}

/// Drawing backend
pub trait Canvas {
    /// Full-screen background, top-left at `pos` (screen space)
    fn draw_background(&mut self, key: BackgroundKey, pos: Vec2);
    /// One sprite with its top-left at `pos` (screen space)
    fn draw_sprite(&mut self, sprite: &SpriteKind, pos: Vec2, size: Vec2);
}

struct DrawItem {
    sprite: SpriteKind,
    rect: Rect,
}

fn facing_of(vel_x: f32) -> Facing {
    if vel_x < 0.0 { Facing::Left } else { Facing::Right }
}

impl Level {
    /// Issue this frame's draw calls
    pub fn draw(&self, canvas: &mut impl Canvas) {
        let camera = &self.camera;
        canvas.draw_background(self.background(), camera.background_position());

        let view = Rect::from_pos_size(camera.pixel_offset(), camera.viewport_size);
        let capacity = self.tiles.len() + self.enemies.len() + self.items.len() + 2;
        let mut entities = Vec::with_capacity(capacity);
        for tile in self.tiles.all() {
            if tile.rect.intersects(&view) {
                entities.push(DrawItem {
                    sprite: SpriteKind::Tile(tile.kind),
                    rect: tile.rect,
                });
            }
        }
        if let Some(goal) = self.goal {
            entities.push(DrawItem {
                sprite: SpriteKind::Goal,
                rect: goal,
            });
        }
        for item in &self.items {
            entities.push(DrawItem {
                sprite: SpriteKind::Item {
                    kind: item.kind.clone(),
                },
                rect: item.rect,
            });
        }
        for enemy in &self.enemies {
            entities.push(DrawItem {
                sprite: SpriteKind::Enemy {
                    facing: facing_of(enemy.body.vel.x),
                    flipped: enemy.body.gravity.is_inverted(),
                },
                rect: *enemy.rect(),
            });
        }
        if let Some(player) = self.player.as_ref() {
            entities.push(DrawItem {
                sprite: SpriteKind::Player {
                    facing: player.facing,
                    frame: player.anim_frame,
                    flipped: player.body.gravity.is_inverted(),
                    climbing: player.climbing,
                },
                rect: *player.rect(),
            });
        }

        sort_by_depth(&mut entities, |d| d.rect);
        for d in &entities {
            canvas.draw_sprite(&d.sprite, camera.to_screen(d.rect.pos), d.rect.size);
        }
    }
}
