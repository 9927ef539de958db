use std::time::Duration;

use minopac_core::{CellCoord, Command, Direction, Event, GhostId, GhostMode};
use minopac_system_steering::{Config, GhostSteering, Pursuit, Steering, Wander};
use minopac_world::{self as world, query, Maze, World};

const TUNNEL: [&str; 5] = ["#######", "#.#.#.#", "       ", "#.#.#.#", "#######"];

fn drain(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn pursuit_takes_the_tunnel_when_it_is_shorter() {
    let mut world = World::with_layout(&["#######", "#G.  P#", "#######"]).expect("layout is valid");
    let _ = drain(&mut world, vec![Command::SpawnGhost]);
    let maze = Maze::from_rows(&TUNNEL).expect("layout should parse");

    let mut ghost = query::ghost_view(&world).into_vec()[0];
    ghost.actor.cell = CellCoord::new(1, 2);
    let mut player = query::player(&world);
    player.cell = CellCoord::new(6, 2);

    assert_eq!(Pursuit.choose(&maze, &ghost, &player), Some(Direction::West));

    player.cell = CellCoord::new(3, 2);
    assert_eq!(Pursuit.choose(&maze, &ghost, &player), Some(Direction::East));
}

#[test]
fn same_seed_wanders_the_same_way() {
    let mut world = World::with_layout(&["#######", "#G.  P#", "#######"]).expect("layout is valid");
    let _ = drain(&mut world, vec![Command::SpawnGhost]);
    let maze = Maze::from_rows(&TUNNEL).expect("layout should parse");
    let mut ghost = query::ghost_view(&world).into_vec()[0];
    ghost.actor.cell = CellCoord::new(3, 2);
    ghost.actor.facing = Direction::North;
    let player = query::player(&world);

    let mut first = Wander::new(0x5eed);
    let mut second = Wander::new(0x5eed);
    let first: Vec<_> = (0..16)
        .map(|_| first.choose(&maze, &ghost, &player))
        .collect();
    let second: Vec<_> = (0..16)
        .map(|_| second.choose(&maze, &ghost, &player))
        .collect();

    assert_eq!(first, second);
    assert!(first.iter().all(|choice| *choice != Some(Direction::South)));
    assert!(first.iter().all(Option::is_some));
}

#[test]
fn steering_waits_for_time_to_advance() {
    let mut world = World::new().expect("default layout is valid");
    let _ = drain(&mut world, vec![Command::SpawnGhost]);
    let mut steering = GhostSteering::new(Config::new(1));
    let mut commands = Vec::new();

    steering.handle(
        &[Event::LevelReset],
        query::maze(&world),
        &query::ghost_view(&world),
        &query::player(&world),
        &mut commands,
    );
    assert!(commands.is_empty());

    let events = drain(
        &mut world,
        vec![Command::Tick {
            dt: Duration::from_millis(16),
        }],
    );
    steering.handle(
        &events,
        query::maze(&world),
        &query::ghost_view(&world),
        &query::player(&world),
        &mut commands,
    );
    assert_eq!(commands.len(), 1);
    assert!(matches!(
        commands[0],
        Command::SteerGhost {
            ghost,
            ..
        } if ghost == GhostId::new(0)
    ));
}

#[test]
fn chasing_ghost_reaches_a_resting_player() {
    let mut world = World::with_layout(&["#######", "#P..G.#", "#######"]).expect("layout is valid");
    let _ = drain(&mut world, vec![Command::SpawnGhost]);
    let mut steering = GhostSteering::new(Config::new(3));

    let mut caught = false;
    for _ in 0..40 {
        let events = drain(
            &mut world,
            vec![Command::Tick {
                dt: Duration::from_millis(50),
            }],
        );
        if events.contains(&Event::PlayerCaught { lives_remaining: 2 }) {
            caught = true;
            break;
        }

        let mut commands = Vec::new();
        steering.handle(
            &events,
            query::maze(&world),
            &query::ghost_view(&world),
            &query::player(&world),
            &mut commands,
        );
        let _ = drain(&mut world, commands);
    }

    assert!(caught, "pursuit never reached the player");
}

#[test]
fn frightened_ghosts_are_steered_by_the_wander_strategy() {
    struct Fixed(Direction);

    impl Steering for Fixed {
        fn choose(
            &mut self,
            _maze: &Maze,
            _ghost: &minopac_world::query::GhostSnapshot,
            _target: &minopac_world::ActorSnapshot,
        ) -> Option<Direction> {
            Some(self.0)
        }
    }

    let mut world =
        World::with_layout(&["#######", "#Po.G.#", "#######"]).expect("layout is valid");
    let _ = drain(&mut world, vec![Command::SpawnGhost]);
    let _ = drain(
        &mut world,
        vec![Command::QueueDirection {
            direction: Direction::East,
        }],
    );
    let events = drain(
        &mut world,
        vec![Command::Tick {
            dt: Duration::from_millis(200),
        }],
    );
    assert!(query::ghost_view(&world)
        .iter()
        .all(|ghost| ghost.mode == GhostMode::Frightened));

    let mut steering = GhostSteering::with_strategies(Fixed(Direction::North), Fixed(Direction::South));
    let mut commands = Vec::new();
    steering.handle(
        &events,
        query::maze(&world),
        &query::ghost_view(&world),
        &query::player(&world),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SteerGhost {
            ghost: GhostId::new(0),
            direction: Direction::South,
        }]
    );
}
