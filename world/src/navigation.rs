//! Breadth-first searches over the maze graph.

use std::collections::VecDeque;

use minopac_core::{CellCoord, Direction};

use crate::maze::{Maze, MazeError};

impl Maze {
    /// Returns `preferred` when it is walkable, otherwise the nearest walkable cell.
    ///
    /// The rescue search expands the plain four-neighbourhood without
    /// wrapping, in `+x, -x, +y, -y` order, starting from `preferred` clamped
    /// into the grid. It visits every cell at most once and fails with
    /// [`MazeError::NoOpenTile`] when the whole maze is solid.
    pub fn find_open_tile(&self, preferred: CellCoord) -> Result<CellCoord, MazeError> {
        if !self.is_wall(preferred) {
            return Ok(preferred);
        }

        let origin = CellCoord::new(
            preferred.column().min(self.columns().saturating_sub(1)),
            preferred.row().min(self.rows().saturating_sub(1)),
        );
        if !self.is_wall(origin) {
            return Ok(origin);
        }

        let mut visited = vec![false; self.cell_count()];
        let Some(origin_index) = self.index(origin) else {
            return Err(MazeError::NoOpenTile);
        };
        visited[origin_index] = true;

        let mut queue = VecDeque::from([origin]);
        while let Some(cell) = queue.pop_front() {
            for direction in Direction::EXPANSION_ORDER {
                let Some(next) = step_within_bounds(self, cell, direction) else {
                    continue;
                };
                let Some(index) = self.index(next) else {
                    continue;
                };
                if visited[index] {
                    continue;
                }
                if !self.is_wall(next) {
                    return Ok(next);
                }

                visited[index] = true;
                queue.push_back(next);
            }
        }

        Err(MazeError::NoOpenTile)
    }

    /// Shortest walkable route from `start` to `end`, both inclusive.
    ///
    /// Movement follows [`Maze::neighbors`], so routes may cross the
    /// horizontal seam. Among equally short routes the one discovered first
    /// in `+x, -x, +y, -y` expansion order is returned. `None` is returned
    /// when either endpoint is a wall or `end` is unreachable.
    #[must_use]
    pub fn shortest_path(&self, start: CellCoord, end: CellCoord) -> Option<Vec<CellCoord>> {
        if self.is_wall(start) || self.is_wall(end) {
            return None;
        }

        if start == end {
            return Some(vec![start]);
        }

        let mut parents: Vec<Option<CellCoord>> = vec![None; self.cell_count()];
        let mut visited = vec![false; self.cell_count()];
        visited[self.index(start)?] = true;

        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for neighbor in self.neighbors(cell) {
                let index = self.index(neighbor)?;
                if visited[index] {
                    continue;
                }

                visited[index] = true;
                parents[index] = Some(cell);
                if neighbor == end {
                    return self.trace_back(&parents, start, end);
                }
                queue.push_back(neighbor);
            }
        }

        None
    }

    fn trace_back(
        &self,
        parents: &[Option<CellCoord>],
        start: CellCoord,
        end: CellCoord,
    ) -> Option<Vec<CellCoord>> {
        let mut path = vec![end];
        let mut cursor = end;
        while cursor != start {
            cursor = parents[self.index(cursor)?]?;
            path.push(cursor);
        }
        path.reverse();
        Some(path)
    }
}

fn step_within_bounds(maze: &Maze, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
    let (dx, dy) = direction.delta();
    let column = cell.column().checked_add_signed(dx)?;
    let row = cell.row().checked_add_signed(dy)?;
    if column >= maze.columns() || row >= maze.rows() {
        return None;
    }
    Some(CellCoord::new(column, row))
}
