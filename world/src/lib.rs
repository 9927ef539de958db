#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for MinoPac.

pub mod layout;
mod maze;
mod motion;
mod navigation;

use std::time::Duration;

use minopac_core::{
    vector, CellCoord, Command, Event, GhostColor, GhostId, GhostMode, PelletKind,
    PlayState, FRIGHTENED_STEP_SCALE, GHOST_PALETTE, GHOST_SCORE, GHOST_STEP_DURATION,
    PLAYER_STEP_DURATION, POWER_DURATION, STARTING_LIVES, TILE_SIZE, WELCOME_BANNER,
};
use thiserror::Error;

pub use layout::{LayoutError, DEFAULT_LAYOUT};
pub use maze::{Maze, MazeError, Neighbors};
pub use motion::{ActorSnapshot, Motion, Mover};

/// Failures that prevent a world from being constructed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The level layout was malformed.
    #[error("invalid level layout: {0}")]
    Layout(#[from] LayoutError),
    /// The level has no tile the player could stand on.
    #[error("invalid level: {0}")]
    Maze(#[from] MazeError),
}

/// Represents the authoritative MinoPac world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    template: Maze,
    maze: Maze,
    player: Mover,
    ghosts: Vec<Ghost>,
    next_ghost_id: u32,
    score: u32,
    lives: u32,
    power_remaining: Duration,
    play_state: PlayState,
}

impl World {
    /// Creates a world running the level shipped with the game.
    pub fn new() -> Result<Self, WorldError> {
        Self::with_layout(&DEFAULT_LAYOUT)
    }

    /// Creates a world running the provided textual layout.
    pub fn with_layout<S: AsRef<str>>(rows: &[S]) -> Result<Self, WorldError> {
        let template = Maze::from_rows(rows)?;
        let player_spawn = template.find_open_tile(template.player_spawn())?;

        Ok(Self {
            banner: WELCOME_BANNER,
            maze: template.clone(),
            template,
            player: Mover::new(player_spawn, PLAYER_STEP_DURATION),
            ghosts: Vec::new(),
            next_ghost_id: 0,
            score: 0,
            lives: STARTING_LIVES,
            power_remaining: Duration::ZERO,
            play_state: PlayState::Playing,
        })
    }

    fn restart(&mut self) {
        self.maze = self.template.clone();
        self.player.reset();
        self.ghosts.clear();
        self.next_ghost_id = 0;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.power_remaining = Duration::ZERO;
        self.play_state = PlayState::Playing;
    }

    fn spawn_ghost(&mut self, out_events: &mut Vec<Event>) {
        let location = match self.maze.next_spawn_location() {
            Ok(location) => location,
            Err(error) => {
                log::warn!("ghost release skipped: {error}");
                out_events.push(Event::GhostSpawnRejected);
                return;
            }
        };

        let cell = match self.maze.find_open_tile(location) {
            Ok(cell) => cell,
            Err(error) => {
                log::warn!("ghost release skipped: {error}");
                out_events.push(Event::GhostSpawnRejected);
                return;
            }
        };

        let id = GhostId::new(self.next_ghost_id);
        self.next_ghost_id = self.next_ghost_id.saturating_add(1);
        let color = GHOST_PALETTE[id.get() as usize % GHOST_PALETTE.len()];
        let mut ghost = Ghost::new(id, color, cell);
        if !self.power_remaining.is_zero() {
            ghost.set_mode(GhostMode::Frightened);
        }

        log::info!("released ghost {} at {:?}", id.get(), cell);
        self.ghosts.push(ghost);
        out_events.push(Event::GhostSpawned { ghost: id, cell });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        if let Some(cell) = self.player.update(&self.maze, dt) {
            out_events.push(Event::PlayerArrived { cell });
        }
        for ghost in &mut self.ghosts {
            if let Some(cell) = ghost.mover.update(&self.maze, dt) {
                out_events.push(Event::GhostArrived {
                    ghost: ghost.id,
                    cell,
                });
            }
        }

        self.eat_at_player(out_events);
        if self.play_state.is_over() {
            return;
        }

        self.resolve_collisions(out_events);
        if self.play_state.is_over() {
            return;
        }

        self.advance_power_timer(dt, out_events);
    }

    fn eat_at_player(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.player.cell();
        let Some(kind) = self.maze.eat_pellet(cell) else {
            return;
        };

        out_events.push(Event::PelletEaten { cell, kind });
        self.add_score(kind.score(), out_events);

        if kind == PelletKind::PowerPellet {
            log::debug!("power pellet eaten at {cell:?}");
            self.power_remaining = POWER_DURATION;
            for ghost in &mut self.ghosts {
                ghost.set_mode(GhostMode::Frightened);
            }
            out_events.push(Event::PowerActivated {
                duration: POWER_DURATION,
            });
        }

        let remaining = self.maze.remaining_pellets();
        if remaining > 0 && remaining % 50 == 0 {
            log::debug!("{remaining} pellets left");
        }
        if remaining == 0 {
            log::info!("level cleared with score {}", self.score);
            self.play_state = PlayState::Won;
            out_events.push(Event::LevelCleared);
        }
    }

    fn resolve_collisions(&mut self, out_events: &mut Vec<Event>) {
        let player_position = self.player.pixel_position(&self.maze);
        let reach = TILE_SIZE * 0.5;

        for index in 0..self.ghosts.len() {
            let ghost_position = self.ghosts[index].mover.pixel_position(&self.maze);
            let offset = self.maze.pixel_offset(player_position, ghost_position);
            if vector::length_squared(offset) >= reach * reach {
                continue;
            }

            match self.ghosts[index].mode {
                GhostMode::Frightened => {
                    let ghost = &mut self.ghosts[index];
                    log::debug!("ghost {} eaten", ghost.id.get());
                    ghost.mover.reset();
                    ghost.set_mode(GhostMode::Chase);
                    out_events.push(Event::GhostEaten { ghost: ghost.id });
                    self.add_score(GHOST_SCORE, out_events);
                }
                GhostMode::Chase => {
                    self.lives = self.lives.saturating_sub(1);
                    log::info!("player caught, {} lives left", self.lives);
                    out_events.push(Event::PlayerCaught {
                        lives_remaining: self.lives,
                    });

                    if self.lives == 0 {
                        log::info!("game over with score {}", self.score);
                        self.play_state = PlayState::Lost;
                        out_events.push(Event::GameOver);
                    } else {
                        self.reset_actors();
                    }
                    return;
                }
            }
        }
    }

    fn reset_actors(&mut self) {
        self.player.reset();
        for ghost in &mut self.ghosts {
            ghost.mover.reset();
            ghost.set_mode(GhostMode::Chase);
        }
        self.power_remaining = Duration::ZERO;
    }

    fn advance_power_timer(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.power_remaining.is_zero() {
            return;
        }

        self.power_remaining = self.power_remaining.saturating_sub(dt);
        if self.power_remaining.is_zero() {
            log::debug!("power expired");
            for ghost in &mut self.ghosts {
                ghost.set_mode(GhostMode::Chase);
            }
            out_events.push(Event::PowerExpired);
        }
    }

    fn add_score(&mut self, points: u32, out_events: &mut Vec<Event>) {
        self.score = self.score.saturating_add(points);
        out_events.push(Event::ScoreChanged { score: self.score });
    }

    fn ghost_mut(&mut self, id: GhostId) -> Option<&mut Ghost> {
        self.ghosts.iter_mut().find(|ghost| ghost.id == id)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Restart => {
            if !world.play_state.is_over() {
                log::debug!("restart ignored while playing");
                return;
            }
            world.restart();
            log::info!("level reset");
            out_events.push(Event::LevelReset);
        }
        Command::QueueDirection { direction } => {
            if world.play_state == PlayState::Playing {
                world.player.queue_direction(direction);
            }
        }
        Command::SpawnGhost => {
            if world.play_state == PlayState::Playing {
                world.spawn_ghost(out_events);
            }
        }
        Command::SteerGhost { ghost, direction } => {
            if let Some(ghost) = world.ghost_mut(ghost) {
                ghost.mover.queue_direction(direction);
            }
        }
        Command::Tick { dt } => {
            if world.play_state == PlayState::Playing {
                world.tick(dt, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use minopac_core::{CellCoord, GhostColor, GhostId, GhostMode, PlayState};

    use super::{ActorSnapshot, Maze, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the live maze, including uneaten pellets.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Captures the player's movement state.
    #[must_use]
    pub fn player(world: &World) -> ActorSnapshot {
        world.player.snapshot(&world.maze)
    }

    /// Captures a read-only view of the ghosts roaming the maze.
    #[must_use]
    pub fn ghost_view(world: &World) -> GhostView {
        let snapshots = world
            .ghosts
            .iter()
            .map(|ghost| GhostSnapshot {
                id: ghost.id,
                color: ghost.color,
                mode: ghost.mode,
                actor: ghost.mover.snapshot(&world.maze),
            })
            .collect();
        GhostView { snapshots }
    }

    /// Points collected in the current session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives the player has left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Time left in the frightened window, zero when inactive.
    #[must_use]
    pub fn power_remaining(world: &World) -> Duration {
        world.power_remaining
    }

    /// Progress of the current session.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.play_state
    }

    /// Coordinates of the uneaten standard pellets.
    #[must_use]
    pub fn pellets(world: &World) -> Vec<CellCoord> {
        world.maze.pellets().collect()
    }

    /// Coordinates of the uneaten power pellets.
    #[must_use]
    pub fn power_pellets(world: &World) -> Vec<CellCoord> {
        world.maze.power_pellets().collect()
    }

    /// Coordinates of every wall tile.
    #[must_use]
    pub fn walls(world: &World) -> Vec<CellCoord> {
        world.maze.walls().collect()
    }

    /// Read-only snapshot describing all ghosts in release order.
    #[derive(Clone, Debug)]
    pub struct GhostView {
        snapshots: Vec<GhostSnapshot>,
    }

    impl GhostView {
        /// Iterator over the captured ghost snapshots.
        pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<GhostSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single ghost used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GhostSnapshot {
        /// Identifier assigned at release.
        pub id: GhostId,
        /// Sprite tint.
        pub color: GhostColor,
        /// Current behaviour mode.
        pub mode: GhostMode,
        /// Movement state of the ghost.
        pub actor: ActorSnapshot,
    }
}

#[derive(Clone, Debug)]
struct Ghost {
    id: GhostId,
    color: GhostColor,
    mode: GhostMode,
    mover: Mover,
}

impl Ghost {
    fn new(id: GhostId, color: GhostColor, spawn: CellCoord) -> Self {
        Self {
            id,
            color,
            mode: GhostMode::Chase,
            mover: Mover::new(spawn, GHOST_STEP_DURATION),
        }
    }

    fn set_mode(&mut self, mode: GhostMode) {
        self.mode = mode;
        let step = match mode {
            GhostMode::Chase => GHOST_STEP_DURATION,
            GhostMode::Frightened => GHOST_STEP_DURATION * FRIGHTENED_STEP_SCALE,
        };
        self.mover.set_step_duration(step);
    }
}
