#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic release schedule that emits ghost spawn commands.

use std::time::Duration;

use minopac_core::{Command, Event, PlayState, DEFAULT_GHOST_COUNT, GHOST_RELEASE_INTERVAL};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    ghost_count: usize,
    release_interval: Duration,
}

impl Config {
    /// Creates a configuration releasing `ghost_count` ghosts, one every `release_interval`.
    #[must_use]
    pub const fn new(ghost_count: usize, release_interval: Duration) -> Self {
        Self {
            ghost_count,
            release_interval,
        }
    }

    /// Number of ghosts released per level.
    #[must_use]
    pub const fn ghost_count(&self) -> usize {
        self.ghost_count
    }

    /// Delay between successive releases.
    #[must_use]
    pub const fn release_interval(&self) -> Duration {
        self.release_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_GHOST_COUNT, GHOST_RELEASE_INTERVAL)
    }
}

/// Pure system that releases ghosts at a fixed cadence while a level is in play.
///
/// The first ghost of a level is released on the first tick after the level
/// starts; the rest follow one per interval until the configured count is
/// reached.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
    released: usize,
}

impl Spawning {
    /// Creates a new spawning system primed for a fresh level.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: config.release_interval,
            released: 0,
        }
    }

    /// Number of ghosts released since the level started.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released
    }

    /// Consumes world events and emits spawn commands for every elapsed interval.
    pub fn handle(&mut self, events: &[Event], play_state: PlayState, out: &mut Vec<Command>) {
        let mut advanced = false;
        for event in events {
            match event {
                Event::LevelReset => {
                    self.released = 0;
                    self.accumulator = self.config.release_interval;
                }
                Event::TimeAdvanced { dt } => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                    advanced = true;
                }
                _ => {}
            }
        }

        if !advanced || play_state != PlayState::Playing {
            return;
        }

        while self.released < self.config.ghost_count
            && self.accumulator >= self.config.release_interval
        {
            self.accumulator -= self.config.release_interval;
            self.released += 1;
            out.push(Command::SpawnGhost);
        }

        if self.released >= self.config.ghost_count {
            self.accumulator = Duration::ZERO;
        }
    }
}
