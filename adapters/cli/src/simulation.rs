//! Fixed command loop wiring the world to its systems and the rendered scene.

use std::time::Duration;

use anyhow::Result;
use minopac_core::{Command, Event, GhostMode, PlayState, TILE_SIZE};
use minopac_rendering::{
    Banner, Color, FrameInput, GhostPresentation, HudPresentation, PlayerPresentation, Scene,
    TileGridPresentation,
};
use minopac_system_spawning::{Config as SpawningConfig, Spawning};
use minopac_system_steering::{Config as SteeringConfig, GhostSteering};
use minopac_world::{apply, query, World};

/// Owns the world and the systems reacting to its events.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    steering: GhostSteering,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    pub(crate) fn new(world: World, spawning: SpawningConfig, steering: SteeringConfig) -> Self {
        Self {
            world,
            spawning: Spawning::new(spawning),
            steering: GhostSteering::new(steering),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Translates one frame of input into commands and advances the clock by `dt`.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput) {
        if input.restart {
            self.submit(Command::Restart);
        }
        if let Some(direction) = input.direction {
            self.submit(Command::QueueDirection { direction });
        }
        self.submit(Command::Tick { dt });
    }

    /// Applies `command` and every command the systems emit in response until none remain.
    fn submit(&mut self, command: Command) {
        let mut pending = vec![command];
        while !pending.is_empty() {
            self.events.clear();
            for command in pending.drain(..) {
                apply(&mut self.world, command, &mut self.events);
            }

            self.spawning.handle(
                &self.events,
                query::play_state(&self.world),
                &mut self.commands,
            );
            let ghosts = query::ghost_view(&self.world);
            let player = query::player(&self.world);
            self.steering.handle(
                &self.events,
                query::maze(&self.world),
                &ghosts,
                &player,
                &mut self.commands,
            );

            std::mem::swap(&mut pending, &mut self.commands);
        }
    }
}

/// Builds the scene for the world's current level.
pub(crate) fn initial_scene(world: &World) -> Result<Scene> {
    let maze = query::maze(world);
    let tile_grid = TileGridPresentation::new(maze.columns(), maze.rows(), TILE_SIZE)?;
    let player = query::player(world);
    let mut scene = Scene::new(
        tile_grid,
        query::walls(world),
        PlayerPresentation::new(player.position, player.facing),
        query::lives(world),
    );
    populate_scene(world, &mut scene);
    Ok(scene)
}

/// Refreshes every dynamic part of `scene` from world queries.
pub(crate) fn populate_scene(world: &World, scene: &mut Scene) {
    scene.pellets = query::pellets(world);
    scene.power_pellets = query::power_pellets(world);

    let player = query::player(world);
    scene.player = PlayerPresentation::new(player.position, player.facing);

    scene.ghosts = query::ghost_view(world)
        .iter()
        .map(|ghost| GhostPresentation {
            position: ghost.actor.position,
            facing: ghost.actor.facing,
            color: Color::from(ghost.color),
            frightened: ghost.mode == GhostMode::Frightened,
        })
        .collect();

    let power = query::power_remaining(world);
    scene.hud = HudPresentation {
        score: query::score(world),
        lives: query::lives(world),
        power_seconds: (!power.is_zero()).then(|| power.as_secs_f32()),
    };

    scene.banner = match query::play_state(world) {
        PlayState::Playing => None,
        PlayState::Won => Some(Banner::Won),
        PlayState::Lost => Some(Banner::Lost),
    };
}
