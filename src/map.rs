//! Level layouts and the ASCII map format
//!
//! A layout is authored data only: tile rectangles plus spawn points. The
//! simulation turns it into live entities in `Level::new` / `Level::restart`.
//!
//! ASCII glyphs, one per tile cell:
//!
//! | glyph | meaning |
//! |---|---|
//! | `#` | solid |
//! | `~` | water |
//! | `H` | ladder |
//! | `%` | decoration |
//! | `P` | player spawn (at most one) |
//! | `M` | enemy, each following `>` widens its patrol by one cell |
//! | `S` | shield |
//! | `a`-`z` | other item, named by the letter |
//! | `G` | goal (at most one) |
//! | `.` or space | empty |
//!
//! Entities stand on the bottom of their cell.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ENEMY_HEIGHT, PLAYER_HEIGHT};
use crate::sim::rect::Rect;
use crate::sim::tiles::{Tile, TileKind};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("patrol marker at row {row}, column {col} doesn't follow an enemy")]
    StrayPatrolMarker { row: usize, col: usize },
    #[error("more than one player spawn")]
    MultiplePlayers,
    #[error("more than one goal")]
    MultipleGoals,
    #[error("could not read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed map file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Top-left of the enemy's hit-box
    pub pos: Vec2,
    /// Patrol range starts at `pos.x` and extends this far right
    pub patrol_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawn {
    pub rect: Rect,
    pub kind: String,
}

/// Everything needed to (re)build a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub world_size: Vec2,
    /// Row-major for ASCII maps
    pub tiles: Vec<Tile>,
    pub player_spawn: Option<Vec2>,
    pub enemies: Vec<EnemySpawn>,
    pub items: Vec<ItemSpawn>,
    pub goal: Option<Rect>,
}

impl LevelLayout {
    /// Load a layout file: `.json` files hold a serialized `LevelLayout`,
    /// anything else is read as an ASCII map
    pub fn load(path: impl AsRef<Path>, tile_size: f32) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let layout = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&text)?
        } else {
            parse_ascii(&text, tile_size)?
        };
        log::info!("Loaded map {}", path.display());
        Ok(layout)
    }

    pub fn count_tiles(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }
}

/// Parse an ASCII map into a layout with `tile_size` pixel cells
pub fn parse_ascii(src: &str, tile_size: f32) -> Result<LevelLayout, MapError> {
    let mut rows: Vec<Vec<char>> = src
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect())
        .collect();
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    let Some(width) = rows.first().map(Vec::len) else {
        return Err(MapError::Empty);
    };
    if width == 0 {
        return Err(MapError::Empty);
    }

    let mut layout = LevelLayout {
        world_size: Vec2::new(width as f32 * tile_size, rows.len() as f32 * tile_size),
        tiles: Vec::new(),
        player_spawn: None,
        enemies: Vec::new(),
        items: Vec::new(),
        goal: None,
    };

    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != width {
            return Err(MapError::RaggedRow {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        // Enemy whose patrol is still being extended by `>` cells
        let mut open_patrol: Option<usize> = None;

        for (col, &glyph) in cells.iter().enumerate() {
            let cell = Rect::new(
                col as f32 * tile_size,
                row as f32 * tile_size,
                tile_size,
                tile_size,
            );
            let standing = |height: f32| Vec2::new(cell.left(), cell.bottom() - height);

            if glyph == '>' {
                let Some(index) = open_patrol else {
                    return Err(MapError::StrayPatrolMarker { row, col });
                };
                layout.enemies[index].patrol_width += tile_size;
                continue;
            }
            open_patrol = None;

            let kind = match glyph {
                '#' => Some(TileKind::Solid),
                '~' => Some(TileKind::Water),
                'H' => Some(TileKind::Ladder),
                '%' => Some(TileKind::Decoration),
                _ => None,
            };
            if let Some(kind) = kind {
                layout.tiles.push(Tile { rect: cell, kind });
                continue;
            }

            match glyph {
                '.' | ' ' => {}
                'P' => {
                    if layout.player_spawn.is_some() {
                        return Err(MapError::MultiplePlayers);
                    }
                    layout.player_spawn = Some(standing(PLAYER_HEIGHT));
                }
                'M' => {
                    layout.enemies.push(EnemySpawn {
                        pos: standing(ENEMY_HEIGHT),
                        patrol_width: tile_size,
                    });
                    open_patrol = Some(layout.enemies.len() - 1);
                }
                'G' => {
                    if layout.goal.is_some() {
                        return Err(MapError::MultipleGoals);
                    }
                    layout.goal = Some(cell);
                }
                'S' => layout.items.push(ItemSpawn {
                    rect: cell,
                    kind: "shield".to_string(),
                }),
                c if c.is_ascii_lowercase() => layout.items.push(ItemSpawn {
                    rect: cell,
                    kind: c.to_string(),
                }),
                other => {
                    return Err(MapError::UnknownGlyph {
                        glyph: other,
                        row,
                        col,
                    });
                }
            }
        }
    }

    if layout.player_spawn.is_none() {
        log::warn!("Map has no player spawn");
    }
    Ok(layout)
}
