//! Static tile world: the solid platform grid every actor and arrow collides with.
//!
//! The world is built once from a row map (`'X'` = solid tile, anything else =
//! air) and never mutated while the simulation runs.  Solid cells are kept in
//! a hash set keyed by grid coordinates, so a rectangle query only visits the
//! handful of cells the rectangle covers instead of scanning every tile.
//!
//! ## Derived bounds
//!
//! | Bound | Definition | Used by |
//! |---|---|---|
//! | `bounds` | union of all solid tiles | camera, cull box |
//! | kill line | `bounds.max.y + void_margin` | void damage |
//! | cull box | `bounds` grown by the cull margin | arrow despawn |

use crate::error::{ConfigError, ConfigResult};
use crate::geometry::overlaps;
use bevy::prelude::*;
use std::collections::HashSet;

/// Arena used by the binary when no other level is provided.
pub const DEFAULT_LEVEL: &[&str] = &[
    "                                                                                ",
    "                                                                                ",
    "                                                                                ",
    "       XXXXX                                       XXXXX                        ",
    "                                                                                ",
    "   XX               XX                          XXXXXX                          ",
    "                                                                                ",
    "               XXXX                       XXXXX                                 ",
    "      XXXX            XXXXXX                                                    ",
    "                            XXXXX                                 XXXXXXXXXXXXX ",
    "  XXXXXX         XXXX                           XXXXX                           ",
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXXX        XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX",
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXXX        XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX",
];

#[derive(Resource, Debug, Clone, Default)]
pub struct TileWorld {
    tile_size: f32,
    solid: HashSet<IVec2>,
    tiles: Vec<Rect>,
    bounds: Rect,
}

impl TileWorld {
    /// Build a world from a row map.  Rows may have different lengths.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> ConfigResult<Self> {
        if !(tile_size > 0.0) {
            return Err(ConfigError::InvalidLevel(format!(
                "tile size must be positive, got {tile_size}"
            )));
        }

        let mut solid = HashSet::new();
        let mut tiles = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                if ch == 'X' {
                    let cell = IVec2::new(col as i32, row as i32);
                    solid.insert(cell);
                    tiles.push(Self::cell_rect(cell, tile_size));
                }
            }
        }

        let Some(first) = tiles.first().copied() else {
            return Err(ConfigError::InvalidLevel(
                "level map contains no solid tiles".into(),
            ));
        };
        let bounds = tiles.iter().fold(first, |acc, t| acc.union(*t));

        Ok(Self {
            tile_size,
            solid,
            tiles,
            bounds,
        })
    }

    /// The built-in arena ([`DEFAULT_LEVEL`]).
    pub fn default_level(tile_size: f32) -> ConfigResult<Self> {
        Self::from_rows(DEFAULT_LEVEL, tile_size)
    }

    fn cell_rect(cell: IVec2, tile_size: f32) -> Rect {
        let min = cell.as_vec2() * tile_size;
        Rect::from_corners(min, min + Vec2::splat(tile_size))
    }

    pub fn tiles(&self) -> &[Rect] {
        &self.tiles
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Actors whose top edge passes this y take void damage.
    pub fn kill_line(&self, void_margin: f32) -> f32 {
        self.bounds.max.y + void_margin
    }

    /// Projectiles outside this box are killed.
    pub fn cull_box(&self, margin: f32) -> Rect {
        self.bounds.inflate(margin)
    }

    /// Every solid tile strictly overlapping `rect`.
    pub fn overlapping(&self, rect: Rect) -> impl Iterator<Item = Rect> + '_ {
        let (lo, hi) = if self.tile_size > 0.0 {
            (
                (rect.min / self.tile_size).floor().as_ivec2(),
                (rect.max / self.tile_size).floor().as_ivec2(),
            )
        } else {
            // Empty default world: make the range empty.
            (IVec2::ONE, IVec2::ZERO)
        };
        let tile_size = self.tile_size;
        (lo.y..=hi.y)
            .flat_map(move |y| (lo.x..=hi.x).map(move |x| IVec2::new(x, y)))
            .filter(|cell| self.solid.contains(cell))
            .map(move |cell| Self::cell_rect(cell, tile_size))
            .filter(move |tile| overlaps(*tile, rect))
    }

    /// `true` if `rect` strictly overlaps any solid tile.
    pub fn collides(&self, rect: Rect) -> bool {
        self.overlapping(rect).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_level() {
        let world = TileWorld::default_level(40.0).unwrap();
        assert!(!world.tiles().is_empty());
        // Two full-width floor rows at the bottom.
        assert_eq!(world.bounds().max.y, 13.0 * 40.0);
        assert_eq!(world.kill_line(100.0), 13.0 * 40.0 + 100.0);
    }

    #[test]
    fn empty_map_is_rejected() {
        let err = TileWorld::from_rows(&["    ", "    "], 40.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));
    }

    #[test]
    fn overlap_query_is_strict() {
        let world = TileWorld::from_rows(&["  ", "XX"], 40.0).unwrap();
        // Standing exactly on the floor touches but does not overlap.
        let standing = Rect::new(0.0, 8.0, 32.0, 40.0);
        assert!(!world.collides(standing));
        let sunk = Rect::new(0.0, 9.0, 32.0, 41.0);
        assert_eq!(world.overlapping(sunk).count(), 1);
    }

    #[test]
    fn default_world_collides_with_nothing() {
        let world = TileWorld::default();
        assert!(!world.collides(Rect::new(-10.0, -10.0, 10.0, 10.0)));
    }
}
