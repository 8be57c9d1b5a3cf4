//! The map a world simulates on.
//!
//! The physics core never owns terrain. It asks a [`Terrain`] two questions
//! about the footprint of a body:
//!
//! - how fast can it move there (a multiplier on its velocity)
//! - which tiles block it (as immovable box colliders)
//!
//! [`OpenField`] answers "full speed, nothing blocks". [`TileGrid`] is a plain
//! rectangular tile map for games that do not bring their own.

use crate::collision::Aabb;
use crate::types::Vec2;

/// Query contract for map/terrain data.
///
/// Footprints are given as bottom-left `position` plus `width`/`height` in
/// world units.
pub trait Terrain {
    /// Speed multiplier for a body standing on the footprint.
    fn tile_speed_on(&self, position: Vec2, width: f32, height: f32) -> f32;

    /// Obstacle tiles overlapping the footprint for a body with the given
    /// capabilities.
    fn tiles_on_as_colliders(
        &self,
        position: Vec2,
        width: f32,
        height: f32,
        can_walk: bool,
        can_swim: bool,
    ) -> Vec<Aabb>;
}

/// Terrain with no tiles: full speed everywhere, nothing to collide with.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl Terrain for OpenField {
    fn tile_speed_on(&self, _position: Vec2, _width: f32, _height: f32) -> f32 {
        1.0
    }

    fn tiles_on_as_colliders(&self, _: Vec2, _: f32, _: f32, _: bool, _: bool) -> Vec<Aabb> {
        Vec::new()
    }
}

// =============================================================================
// Tile Grid
// =============================================================================

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tile {
    /// Walkable floor; `speed` scales walking bodies (1.0 = normal, mud < 1).
    Ground { speed: f32 },
    /// Swimmable water.
    Water { speed: f32 },
    /// Blocks every non-flying body.
    Wall,
}

impl Tile {
    pub const GROUND: Tile = Tile::Ground { speed: 1.0 };

    fn speed(&self) -> Option<f32> {
        match self {
            Tile::Ground { speed } | Tile::Water { speed } => Some(*speed),
            Tile::Wall => None,
        }
    }

    fn blocks(&self, can_walk: bool, can_swim: bool) -> bool {
        match self {
            Tile::Ground { .. } => !can_walk,
            Tile::Water { .. } => !can_swim,
            Tile::Wall => true,
        }
    }
}

/// Rectangular tile map, row 0 at the bottom. Cells outside it are walls.
#[derive(Debug, Clone)]
pub struct TileGrid {
    columns: usize,
    rows: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(columns: usize, rows: usize, tile_size: f32, fill: Tile) -> Self {
        Self {
            columns,
            rows,
            tile_size,
            tiles: vec![fill; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Tile at a cell; anything outside the grid reads as a wall.
    pub fn get(&self, column: i64, row: i64) -> Tile {
        self.index(column, row)
            .map_or(Tile::Wall, |index| self.tiles[index])
    }

    /// Returns `false` (and changes nothing) for cells outside the grid.
    pub fn set(&mut self, column: usize, row: usize, tile: Tile) -> bool {
        match self.index(column as i64, row as i64) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    /// World-space box of a cell.
    pub fn cell_bounds(&self, column: i64, row: i64) -> Aabb {
        Aabb::from_xywh(
            column as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    fn index(&self, column: i64, row: i64) -> Option<usize> {
        let in_bounds =
            (0..self.columns as i64).contains(&column) && (0..self.rows as i64).contains(&row);
        in_bounds.then(|| row as usize * self.columns + column as usize)
    }

    /// Cells the footprint overlaps with a positive area, bottom-left first.
    ///
    /// Only the grid and the ring of wall cells around it are visited, so a
    /// footprint far off the map or larger than it stays bounded.
    fn covered_cells(&self, position: Vec2, width: f32, height: f32) -> Vec<(i64, i64)> {
        let span = |start: f32, extent: f32, cells: usize| {
            let limit = cells as f32;
            let first = (start / self.tile_size).floor().clamp(-1.0, limit) as i64;
            let last = ((start + extent) / self.tile_size).ceil() - 1.0;
            first..=(last.clamp(-1.0, limit) as i64).max(first)
        };

        let mut cells = Vec::new();
        for row in span(position.y, height, self.rows) {
            for column in span(position.x, width, self.columns) {
                cells.push((column, row));
            }
        }
        cells
    }
}

impl Terrain for TileGrid {
    /// Slowest non-wall tile under the footprint, 1.0 if there is none.
    fn tile_speed_on(&self, position: Vec2, width: f32, height: f32) -> f32 {
        self.covered_cells(position, width, height)
            .into_iter()
            .filter_map(|(column, row)| self.get(column, row).speed())
            .reduce(f32::min)
            .unwrap_or(1.0)
    }

    fn tiles_on_as_colliders(
        &self,
        position: Vec2,
        width: f32,
        height: f32,
        can_walk: bool,
        can_swim: bool,
    ) -> Vec<Aabb> {
        self.covered_cells(position, width, height)
            .into_iter()
            .filter(|&(column, row)| self.get(column, row).blocks(can_walk, can_swim))
            .map(|(column, row)| self.cell_bounds(column, row))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
