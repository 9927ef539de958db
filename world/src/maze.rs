//! Tile classification, wrap-aware geometry and pellet bookkeeping for a level.
//!
//! The horizontal axis is a cylinder: stepping off the right edge re-enters at
//! column zero and vice versa. The vertical axis is bounded. Coordinates are
//! unsigned, so every operation that can step across the seam wraps the
//! column before it produces a [`CellCoord`]; [`Maze::is_wall`] treats any
//! coordinate outside the grid on either axis as solid.

use std::collections::BTreeSet;

use minopac_core::{
    vector::{self, Point},
    CellCoord, Direction, PelletKind, TILE_SIZE,
};
use thiserror::Error;

use crate::layout::{self, LayoutError};

/// Failures reported by maze queries that have no meaningful fallback.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// Every tile of the maze is a wall.
    #[error("maze contains no open tiles")]
    NoOpenTile,
    /// The layout declared no ghost spawn points.
    #[error("maze declares no ghost spawn points")]
    NoGhostSpawns,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tile {
    Wall,
    Floor,
}

/// Authoritative tile layout and pellet state for one level instance.
#[derive(Clone, Debug)]
pub struct Maze {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    pellets: BTreeSet<CellCoord>,
    power_pellets: BTreeSet<CellCoord>,
    ghost_spawns: Vec<CellCoord>,
    player_spawn: CellCoord,
    spawn_cursor: usize,
}

impl Maze {
    /// Parses a textual layout into a maze.
    ///
    /// Rows must be non-empty and of equal length. Without a `P` marker the
    /// player spawn defaults to the origin; with several, the last one wins.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let (columns, row_count) = layout::dimensions(rows)?;

        let mut tiles = Vec::with_capacity(columns as usize * row_count as usize);
        let mut pellets = BTreeSet::new();
        let mut power_pellets = BTreeSet::new();
        let mut ghost_spawns = Vec::new();
        let mut player_spawn = CellCoord::new(0, 0);

        for (row, line) in (0..row_count).zip(rows) {
            for (column, symbol) in (0..columns).zip(line.as_ref().chars()) {
                let cell = CellCoord::new(column, row);
                let tile = match symbol {
                    '#' => Tile::Wall,
                    '.' => {
                        let _ = pellets.insert(cell);
                        Tile::Floor
                    }
                    'o' | 'O' => {
                        let _ = power_pellets.insert(cell);
                        Tile::Floor
                    }
                    'G' => {
                        ghost_spawns.push(cell);
                        Tile::Floor
                    }
                    'P' => {
                        player_spawn = cell;
                        Tile::Floor
                    }
                    _ => Tile::Floor,
                };
                tiles.push(tile);
            }
        }

        Ok(Self {
            columns,
            rows: row_count,
            tiles,
            pellets,
            power_pellets,
            ghost_spawns,
            player_spawn,
            spawn_cursor: 0,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of the maze in pixels.
    #[must_use]
    pub fn pixel_width(&self) -> f32 {
        self.columns as f32 * TILE_SIZE
    }

    /// Height of the maze in pixels.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    /// Cell marked as the player's spawn point.
    #[must_use]
    pub const fn player_spawn(&self) -> CellCoord {
        self.player_spawn
    }

    /// Ghost spawn points in layout order.
    #[must_use]
    pub fn ghost_spawns(&self) -> &[CellCoord] {
        &self.ghost_spawns
    }

    /// Reports whether `cell` is impassable. Cells outside the grid are walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(true, |index| self.tiles[index] == Tile::Wall)
    }

    /// Iterates over every wall tile in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Wall)
            .map(move |(index, _)| {
                let index = index as u32;
                CellCoord::new(index % columns, index / columns)
            })
    }

    /// Cell one step away from `cell` in `direction`, ignoring walls.
    ///
    /// Columns wrap around the horizontal seam; `None` is returned when the
    /// step would leave the grid vertically.
    #[must_use]
    pub fn cell_in_direction(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = (i64::from(cell.column()) + i64::from(dx)).rem_euclid(i64::from(self.columns));
        let row = i64::from(cell.row()) + i64::from(dy);
        if row < 0 || row >= i64::from(self.rows) {
            return None;
        }

        Some(CellCoord::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    /// Wrap-aware direction that leads from `from` to the adjacent cell `to`.
    #[must_use]
    pub fn direction_between(&self, from: CellCoord, to: CellCoord) -> Option<Direction> {
        Direction::EXPANSION_ORDER
            .into_iter()
            .find(|direction| self.cell_in_direction(from, *direction) == Some(to))
    }

    /// Walkable cardinal neighbours of `cell` in `+x, -x, +y, -y` order.
    pub fn neighbors(&self, cell: CellCoord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        for direction in Direction::EXPANSION_ORDER {
            if let Some(next) = self.cell_in_direction(cell, direction) {
                if !self.is_wall(next) {
                    neighbors.push(next);
                }
            }
        }
        neighbors
    }

    /// Pixel-space centre of `cell`.
    #[must_use]
    pub fn grid_to_pixel(&self, cell: CellCoord) -> Point {
        Point::new(
            (cell.column() as f32 + 0.5) * TILE_SIZE,
            (cell.row() as f32 + 0.5) * TILE_SIZE,
        )
    }

    /// Cell containing the pixel `point`. Negative components saturate to zero.
    #[must_use]
    pub fn pixel_to_grid(&self, point: Point) -> CellCoord {
        CellCoord::new(
            (point.x / TILE_SIZE).floor() as u32,
            (point.y / TILE_SIZE).floor() as u32,
        )
    }

    /// Pixel position `progress` of the way from `start` to `end`.
    ///
    /// A transition between the last and first column is treated as a step
    /// across the seam rather than a jump across the whole maze, and the
    /// result is folded back into `0..pixel_width`. `progress` is not clamped.
    #[must_use]
    pub fn interpolate(&self, start: CellCoord, end: CellCoord, progress: f32) -> Point {
        let mut start_pixel = self.grid_to_pixel(start);
        let mut end_pixel = self.grid_to_pixel(end);
        let width = self.pixel_width();
        let last_column = self.columns.saturating_sub(1);

        if start.column() == last_column && end.column() == 0 {
            end_pixel.x += width;
        } else if start.column() == 0 && end.column() == last_column {
            start_pixel.x += width;
        }

        let mut position = vector::lerp(start_pixel, end_pixel, progress);
        if position.x < 0.0 {
            position.x += width;
        } else if position.x >= width {
            position.x -= width;
        }
        position
    }

    /// Shortest offset from `from` to `to` in pixel space, crossing the seam when shorter.
    #[must_use]
    pub fn pixel_offset(&self, from: Point, to: Point) -> Point {
        let width = self.pixel_width();
        let mut offset = to - from;
        if offset.x > width * 0.5 {
            offset.x -= width;
        } else if offset.x < -width * 0.5 {
            offset.x += width;
        }
        offset
    }

    /// Removes and reports the pellet resting on `cell`, if any.
    pub fn eat_pellet(&mut self, cell: CellCoord) -> Option<PelletKind> {
        if self.pellets.remove(&cell) {
            return Some(PelletKind::Pellet);
        }
        if self.power_pellets.remove(&cell) {
            return Some(PelletKind::PowerPellet);
        }
        None
    }

    /// Number of pellets and power pellets still uneaten.
    #[must_use]
    pub fn remaining_pellets(&self) -> usize {
        self.pellets.len() + self.power_pellets.len()
    }

    /// Iterates over the remaining standard pellets.
    pub fn pellets(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.pellets.iter().copied()
    }

    /// Iterates over the remaining power pellets.
    pub fn power_pellets(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.power_pellets.iter().copied()
    }

    /// Next ghost spawn point, cycling through the layout's spawn markers.
    pub fn next_spawn_location(&mut self) -> Result<CellCoord, MazeError> {
        if self.ghost_spawns.is_empty() {
            return Err(MazeError::NoGhostSpawns);
        }

        let location = self.ghost_spawns[self.spawn_cursor % self.ghost_spawns.len()];
        self.spawn_cursor = self.spawn_cursor.wrapping_add(1);
        Ok(location)
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Iterator over at most four neighbouring cells.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
