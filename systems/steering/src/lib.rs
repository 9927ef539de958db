#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ghost decision-making expressed as pure systems that emit steering commands.
//!
//! Strategies only see the public maze API and read-only snapshots, so new
//! behaviours can be plugged in through [`Steering`] without touching the
//! world.

use minopac_core::{Command, Direction, Event, GhostMode};
use minopac_world::{query::GhostSnapshot, query::GhostView, ActorSnapshot, Maze};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks the next direction for a ghost resting on a tile.
pub trait Steering {
    /// Chooses where `ghost` should head given the position of `target`.
    ///
    /// Returning `None` leaves the ghost's current heading untouched.
    fn choose(
        &mut self,
        maze: &Maze,
        ghost: &GhostSnapshot,
        target: &ActorSnapshot,
    ) -> Option<Direction>;
}

/// Follows the first hop of the shortest route towards the target's tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pursuit;

impl Steering for Pursuit {
    fn choose(
        &mut self,
        maze: &Maze,
        ghost: &GhostSnapshot,
        target: &ActorSnapshot,
    ) -> Option<Direction> {
        let from = ghost.actor.cell;
        let path = maze.shortest_path(from, target.cell)?;
        let next = path.get(1)?;
        maze.direction_between(from, *next)
    }
}

/// Picks a random open exit, turning back only at dead ends.
#[derive(Clone, Debug)]
pub struct Wander {
    rng: ChaCha8Rng,
}

impl Wander {
    /// Creates a wanderer whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Steering for Wander {
    fn choose(
        &mut self,
        maze: &Maze,
        ghost: &GhostSnapshot,
        _target: &ActorSnapshot,
    ) -> Option<Direction> {
        let from = ghost.actor.cell;
        let mut exits: Vec<Direction> = maze
            .neighbors(from)
            .filter_map(|next| maze.direction_between(from, next))
            .collect();

        let reverse = ghost.actor.facing.opposite();
        if exits.len() > 1 {
            exits.retain(|direction| *direction != reverse);
        }

        if exits.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..exits.len());
        Some(exits[index])
    }
}

/// Configuration parameters required to construct the steering system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    seed: u64,
}

impl Config {
    /// Creates a configuration whose frightened wandering is driven by `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed of the wandering RNG.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Steers every idle ghost once per tick, chasing or fleeing by mode.
#[derive(Debug)]
pub struct GhostSteering<C = Pursuit, F = Wander> {
    chase: C,
    frightened: F,
}

impl GhostSteering {
    /// Creates the default pairing of [`Pursuit`] and a seeded [`Wander`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_strategies(Pursuit, Wander::new(config.seed))
    }
}

impl<C: Steering, F: Steering> GhostSteering<C, F> {
    /// Creates a steering system from custom strategies.
    #[must_use]
    pub fn with_strategies(chase: C, frightened: F) -> Self {
        Self { chase, frightened }
    }

    /// Consumes world events and emits steering commands for idle ghosts.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: &Maze,
        ghosts: &GhostView,
        player: &ActorSnapshot,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for ghost in ghosts.iter().filter(|ghost| ghost.actor.target.is_none()) {
            let choice = match ghost.mode {
                GhostMode::Chase => self.chase.choose(maze, ghost, player),
                GhostMode::Frightened => self.frightened.choose(maze, ghost, player),
            };

            if let Some(direction) = choice {
                out.push(Command::SteerGhost {
                    ghost: ghost.id,
                    direction,
                });
            }
        }
    }
}
