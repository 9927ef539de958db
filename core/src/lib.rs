#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the MinoPac engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod vector;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to MinoPac.";

/// Side length of a single square tile measured in pixels.
pub const TILE_SIZE: f32 = 36.0;

/// Time the player needs to cross one tile.
pub const PLAYER_STEP_DURATION: Duration = Duration::from_millis(200);

/// Time a chasing ghost needs to cross one tile.
pub const GHOST_STEP_DURATION: Duration = Duration::from_millis(200);

/// Multiplier applied to a ghost's step duration while frightened. Must exceed one.
pub const FRIGHTENED_STEP_SCALE: u32 = 2;

/// Duration of the frightened window triggered by a power pellet.
pub const POWER_DURATION: Duration = Duration::from_secs(10);

/// Lives granted to the player at the start of every game.
pub const STARTING_LIVES: u32 = 3;

/// Points awarded for eating a frightened ghost.
pub const GHOST_SCORE: u32 = 200;

/// Number of ghosts released by default.
pub const DEFAULT_GHOST_COUNT: usize = 4;

/// Delay between successive ghost releases.
pub const GHOST_RELEASE_INTERVAL: Duration = Duration::from_secs(4);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Buffers a turn request for the player's movement controller.
    QueueDirection {
        /// Direction the player wants to travel next.
        direction: Direction,
    },
    /// Requests that the world release another ghost at the next spawn point.
    SpawnGhost,
    /// Buffers a turn request for a ghost's movement controller.
    SteerGhost {
        /// Identifier of the ghost being steered.
        ghost: GhostId,
        /// Direction the ghost should travel next.
        direction: Direction,
    },
    /// Rebuilds the level from its static layout once the session has ended.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player finished a tile transition.
    PlayerArrived {
        /// Cell the player now rests on.
        cell: CellCoord,
    },
    /// Reports that the player consumed a pellet.
    PelletEaten {
        /// Cell that held the pellet.
        cell: CellCoord,
        /// Kind of pellet that was eaten.
        kind: PelletKind,
    },
    /// Reports that the running score changed.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// Announces that a power pellet frightened every ghost.
    PowerActivated {
        /// Length of the frightened window.
        duration: Duration,
    },
    /// Announces that the frightened window elapsed.
    PowerExpired,
    /// Confirms that a ghost entered the maze.
    GhostSpawned {
        /// Identifier assigned to the ghost.
        ghost: GhostId,
        /// Cell the ghost occupies after spawning.
        cell: CellCoord,
    },
    /// Reports that a spawn request could not be honoured because the level has no spawn points.
    GhostSpawnRejected,
    /// Confirms that a ghost finished a tile transition.
    GhostArrived {
        /// Identifier of the ghost.
        ghost: GhostId,
        /// Cell the ghost now rests on.
        cell: CellCoord,
    },
    /// Reports that the player ate a frightened ghost.
    GhostEaten {
        /// Identifier of the eaten ghost.
        ghost: GhostId,
    },
    /// Reports that a chasing ghost caught the player.
    PlayerCaught {
        /// Lives left after the catch.
        lives_remaining: u32,
    },
    /// Announces that every pellet was eaten.
    LevelCleared,
    /// Announces that the player ran out of lives.
    GameOver,
    /// Announces that the level was rebuilt from its layout.
    LevelReset,
}

/// Cardinal movement directions available to every moving agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which neighbouring cells are expanded by breadth-first searches: `+x, -x, +y, -y`.
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Unit offset `(dx, dy)` travelled by one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Kinds of pellets that can be placed on a maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PelletKind {
    /// Standard pellet.
    Pellet,
    /// Power pellet that frightens every ghost.
    PowerPellet,
}

impl PelletKind {
    /// Points awarded when a pellet of this kind is eaten.
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Pellet => 10,
            Self::PowerPellet => 50,
        }
    }
}

/// Unique identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Tint applied to a ghost's sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl GhostColor {
    /// Creates a new ghost color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Palette cycled through as ghosts are released.
pub const GHOST_PALETTE: [GhostColor; 4] = [
    GhostColor::from_rgb(0xff, 0x00, 0x00),
    GhostColor::from_rgb(0xff, 0xb8, 0xff),
    GhostColor::from_rgb(0x00, 0xff, 0xff),
    GhostColor::from_rgb(0xff, 0xb8, 0x52),
];

/// Behaviour mode of a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostMode {
    /// The ghost hunts the player and is dangerous on contact.
    Chase,
    /// The ghost is slowed and can be eaten by the player.
    Frightened,
}

/// Progress of the current game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// The level is in progress.
    Playing,
    /// Every pellet was eaten.
    Won,
    /// The player ran out of lives.
    Lost,
}

impl PlayState {
    /// Reports whether the session has finished.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates, ignoring wraparound.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, GhostId, PelletKind, PlayState};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn direction_deltas_are_cardinal_unit_vectors() {
        for direction in Direction::EXPANSION_ORDER {
            let (dx, dy) = direction.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn expansion_order_is_positive_x_first() {
        let deltas: Vec<_> = Direction::EXPANSION_ORDER
            .iter()
            .map(|direction| direction.delta())
            .collect();
        assert_eq!(deltas, vec![(1, 0), (-1, 0), (0, 1), (0, -1)]);
    }

    #[test]
    fn pellet_scores_match_rules() {
        assert_eq!(PelletKind::Pellet.score(), 10);
        assert_eq!(PelletKind::PowerPellet.score(), 50);
    }

    #[test]
    fn only_playing_state_is_in_progress() {
        assert!(!PlayState::Playing.is_over());
        assert!(PlayState::Won.is_over());
        assert!(PlayState::Lost.is_over());
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        let cell = CellCoord::new(20, 9);
        let bytes = bincode::serialize(&(cell, Direction::West, GhostId::new(3))).expect("serialize");
        let restored: (CellCoord, Direction, GhostId) =
            bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, (cell, Direction::West, GhostId::new(3)));
    }
}
