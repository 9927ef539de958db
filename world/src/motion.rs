//! Tile-to-tile movement controller shared by the player and the ghosts.
//!
//! A controller rests on a cell until a legal direction is available, then
//! commits to the adjacent cell and interpolates towards it over its step
//! duration. An in-flight transition always completes; queued directions only
//! influence the next transition.

use std::time::Duration;

use minopac_core::{vector::Point, CellCoord, Direction};

use crate::maze::Maze;

/// Transition state of a movement controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Resting on the current cell.
    Idle,
    /// Travelling towards `target`.
    Moving {
        /// Adjacent cell being entered.
        target: CellCoord,
        /// Time spent on the transition so far, never above the step duration.
        elapsed: Duration,
    },
}

/// Read-only snapshot of a movement controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Cell the actor rests on or is leaving.
    pub cell: CellCoord,
    /// Cell being entered, if a transition is in flight.
    pub target: Option<CellCoord>,
    /// Interpolated pixel-space position.
    pub position: Point,
    /// Direction of the last committed move.
    pub facing: Direction,
    /// Direction the actor keeps travelling in once able.
    pub current_direction: Option<Direction>,
}

/// Discrete-grid movement with continuous pixel interpolation.
#[derive(Clone, Debug)]
pub struct Mover {
    spawn: CellCoord,
    cell: CellCoord,
    motion: Motion,
    facing: Direction,
    current_direction: Option<Direction>,
    next_direction: Option<Direction>,
    step_duration: Duration,
}

impl Mover {
    /// Creates an idle controller resting on `spawn`.
    #[must_use]
    pub fn new(spawn: CellCoord, step_duration: Duration) -> Self {
        Self {
            spawn,
            cell: spawn,
            motion: Motion::Idle,
            facing: Direction::East,
            current_direction: None,
            next_direction: None,
            step_duration,
        }
    }

    /// Cell the controller rests on, or the cell it is leaving while moving.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Cell the controller returns to on reset.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Current transition state.
    #[must_use]
    pub const fn motion(&self) -> Motion {
        self.motion
    }

    /// Cell being entered, if a transition is in flight.
    #[must_use]
    pub const fn target(&self) -> Option<CellCoord> {
        match self.motion {
            Motion::Idle => None,
            Motion::Moving { target, .. } => Some(target),
        }
    }

    /// Time accumulated into the current transition.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self.motion {
            Motion::Idle => Duration::ZERO,
            Motion::Moving { elapsed, .. } => elapsed,
        }
    }

    /// Direction of the last committed move.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Direction the controller keeps travelling in once able.
    #[must_use]
    pub const fn current_direction(&self) -> Option<Direction> {
        self.current_direction
    }

    /// Buffered turn request awaiting a legal opportunity.
    #[must_use]
    pub const fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    /// Time needed to cross one tile.
    #[must_use]
    pub const fn step_duration(&self) -> Duration {
        self.step_duration
    }

    /// Reports whether a transition is in flight.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self.motion, Motion::Moving { .. })
    }

    /// Buffers `direction`, replacing any earlier request.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.next_direction = Some(direction);
    }

    /// Reports whether the cell in `direction` exists and is walkable.
    #[must_use]
    pub fn can_move(&self, maze: &Maze, direction: Direction) -> bool {
        self.legal_target(maze, direction).is_some()
    }

    /// Changes the step duration while keeping the fraction of the current transition.
    pub fn set_step_duration(&mut self, step_duration: Duration) {
        if let Motion::Moving { target, elapsed } = self.motion {
            self.motion = Motion::Moving {
                target,
                elapsed: rescale(elapsed, self.step_duration, step_duration),
            };
        }
        self.step_duration = step_duration;
    }

    /// Fraction of the current transition already covered, in `0..=1`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self.motion {
            Motion::Idle => 0.0,
            Motion::Moving { elapsed, .. } => {
                if self.step_duration.is_zero() {
                    1.0
                } else {
                    elapsed.as_nanos() as f32 / self.step_duration.as_nanos() as f32
                }
            }
        }
    }

    /// Advances the controller by `dt`, returning the cell it arrived on, if any.
    pub fn update(&mut self, maze: &Maze, dt: Duration) -> Option<CellCoord> {
        if !self.is_moving() {
            self.try_start_move(maze);
        }

        let Motion::Moving { target, elapsed } = self.motion else {
            return None;
        };

        let elapsed = elapsed.saturating_add(dt).min(self.step_duration);
        if elapsed >= self.step_duration {
            self.cell = target;
            self.motion = Motion::Idle;
            return Some(target);
        }

        self.motion = Motion::Moving { target, elapsed };
        None
    }

    /// Returns the controller to its spawn cell, idle, with no pending directions.
    pub fn reset(&mut self) {
        self.cell = self.spawn;
        self.motion = Motion::Idle;
        self.facing = Direction::East;
        self.current_direction = None;
        self.next_direction = None;
    }

    /// Pixel-space position derived from the cell, target and transition progress.
    #[must_use]
    pub fn pixel_position(&self, maze: &Maze) -> Point {
        match self.motion {
            Motion::Idle => maze.grid_to_pixel(self.cell),
            Motion::Moving { target, .. } => maze.interpolate(self.cell, target, self.progress()),
        }
    }

    /// Captures the controller's observable state.
    #[must_use]
    pub fn snapshot(&self, maze: &Maze) -> ActorSnapshot {
        ActorSnapshot {
            cell: self.cell,
            target: self.target(),
            position: self.pixel_position(maze),
            facing: self.facing,
            current_direction: self.current_direction,
        }
    }

    fn try_start_move(&mut self, maze: &Maze) {
        if let Some(next) = self.next_direction {
            if self.can_move(maze, next) {
                self.current_direction = Some(next);
                self.next_direction = None;
            }
        }

        let Some(current) = self.current_direction else {
            return;
        };
        if let Some(target) = self.legal_target(maze, current) {
            self.facing = current;
            self.motion = Motion::Moving {
                target,
                elapsed: Duration::ZERO,
            };
        }
    }

    fn legal_target(&self, maze: &Maze, direction: Direction) -> Option<CellCoord> {
        maze.cell_in_direction(self.cell, direction)
            .filter(|target| !maze.is_wall(*target))
    }
}

/// Maps `elapsed` out of `from` onto the same fraction of `to`, in whole nanoseconds.
fn rescale(elapsed: Duration, from: Duration, to: Duration) -> Duration {
    let from = from.as_nanos();
    if from == 0 {
        return to;
    }
    let nanos = elapsed.as_nanos() * to.as_nanos() / from;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)).min(to)
}
