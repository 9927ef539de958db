use std::time::Duration;

use minopac_core::{vector::Point, CellCoord, Direction, TILE_SIZE};
use minopac_world::{Maze, Motion, Mover};

const STEP: Duration = Duration::from_millis(200);

fn maze(rows: &[&str]) -> Maze {
    Maze::from_rows(rows).expect("layout should parse")
}

fn assert_vec2_close(actual: Point, expected: Point) {
    assert!(
        (actual - expected).length() < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn half_a_step_lands_halfway_between_tiles() {
    let maze = maze(&["#####", "#   #", "#####"]);
    let mut mover = Mover::new(CellCoord::new(1, 1), STEP);
    mover.queue_direction(Direction::East);

    assert_eq!(mover.update(&maze, Duration::from_millis(100)), None);
    assert_eq!(mover.target(), Some(CellCoord::new(2, 1)));
    assert_eq!(mover.cell(), CellCoord::new(1, 1));
    assert_vec2_close(
        mover.pixel_position(&maze),
        Point::new(2.0 * TILE_SIZE, 1.5 * TILE_SIZE),
    );

    assert_eq!(
        mover.update(&maze, Duration::from_millis(100)),
        Some(CellCoord::new(2, 1))
    );
    assert_eq!(mover.motion(), Motion::Idle);
    assert_vec2_close(mover.pixel_position(&maze), maze.grid_to_pixel(CellCoord::new(2, 1)));
}

#[test]
fn movement_continues_until_a_wall_blocks_it() {
    let maze = maze(&["#####", "#   #", "#####"]);
    let mut mover = Mover::new(CellCoord::new(1, 1), STEP);
    mover.queue_direction(Direction::East);

    let arrivals: Vec<_> = (0..4).filter_map(|_| mover.update(&maze, STEP)).collect();
    assert_eq!(arrivals, vec![CellCoord::new(2, 1), CellCoord::new(3, 1)]);
    assert_eq!(mover.cell(), CellCoord::new(3, 1));
    assert!(!mover.is_moving());
    assert_eq!(mover.facing(), Direction::East);
    assert_eq!(mover.current_direction(), Some(Direction::East));
}

#[test]
fn buffered_turn_is_taken_at_the_first_opening() {
    let maze = maze(&["#####", "#   #", "### #", "#####"]);
    let mut mover = Mover::new(CellCoord::new(1, 1), STEP);
    mover.queue_direction(Direction::East);
    let _ = mover.update(&maze, STEP);

    mover.queue_direction(Direction::South);
    assert_eq!(mover.update(&maze, STEP), Some(CellCoord::new(3, 1)));
    assert_eq!(mover.next_direction(), Some(Direction::South));

    assert_eq!(mover.update(&maze, STEP), Some(CellCoord::new(3, 2)));
    assert_eq!(mover.facing(), Direction::South);
    assert_eq!(mover.current_direction(), Some(Direction::South));
    assert_eq!(mover.next_direction(), None);
}

#[test]
fn reversal_waits_for_the_transition_to_finish() {
    let maze = maze(&["#####", "#   #", "#####"]);
    let mut mover = Mover::new(CellCoord::new(1, 1), STEP);
    mover.queue_direction(Direction::East);
    let _ = mover.update(&maze, Duration::from_millis(50));

    mover.queue_direction(Direction::West);
    assert_eq!(
        mover.update(&maze, Duration::from_millis(150)),
        Some(CellCoord::new(2, 1))
    );
    let _ = mover.update(&maze, Duration::from_millis(50));
    assert_eq!(mover.target(), Some(CellCoord::new(1, 1)));
    assert_eq!(mover.facing(), Direction::West);
}

#[test]
fn large_time_steps_never_skip_tiles() {
    let maze = maze(&["#######", "#     #", "#######"]);
    let mut mover = Mover::new(CellCoord::new(1, 1), STEP);
    mover.queue_direction(Direction::East);

    assert_eq!(
        mover.update(&maze, Duration::from_secs(5)),
        Some(CellCoord::new(2, 1))
    );
    assert_eq!(mover.motion(), Motion::Idle);
}

#[test]
fn tunnel_transition_stays_inside_the_maze() {
    let maze = maze(&["#####", "     ", "#####"]);
    let mut mover = Mover::new(CellCoord::new(4, 1), STEP);
    mover.queue_direction(Direction::East);

    let _ = mover.update(&maze, Duration::from_millis(50));
    assert_eq!(mover.target(), Some(CellCoord::new(0, 1)));
    let position = mover.pixel_position(&maze);
    assert!(position.x > maze.grid_to_pixel(CellCoord::new(4, 1)).x);
    assert!(position.x < maze.pixel_width());

    let _ = mover.update(&maze, Duration::from_millis(150));
    let _ = mover.update(&maze, Duration::from_millis(100));
    let position = mover.pixel_position(&maze);
    assert_eq!(mover.cell(), CellCoord::new(0, 1));
    assert!(position.x > maze.grid_to_pixel(CellCoord::new(0, 1)).x);
}

#[test]
fn zero_step_duration_completes_immediately() {
    let maze = maze(&["   "]);
    let mut mover = Mover::new(CellCoord::new(0, 0), Duration::ZERO);
    mover.queue_direction(Direction::East);

    assert_eq!(
        mover.update(&maze, Duration::ZERO),
        Some(CellCoord::new(1, 0))
    );
}

#[test]
fn snapshot_reflects_controller_state() {
    let maze = maze(&["#####", "#   #", "#####"]);
    let mut mover = Mover::new(CellCoord::new(1, 1), STEP);
    mover.queue_direction(Direction::East);
    let _ = mover.update(&maze, Duration::from_millis(50));

    let snapshot = mover.snapshot(&maze);
    assert_eq!(snapshot.cell, CellCoord::new(1, 1));
    assert_eq!(snapshot.target, Some(CellCoord::new(2, 1)));
    assert_eq!(snapshot.facing, Direction::East);
    assert_eq!(snapshot.current_direction, Some(Direction::East));
    assert_vec2_close(snapshot.position, mover.pixel_position(&maze));
}
