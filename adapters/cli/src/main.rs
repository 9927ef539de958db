#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the MinoPac experience.

mod simulation;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use minopac_core::{DEFAULT_GHOST_COUNT, GHOST_RELEASE_INTERVAL};
use minopac_rendering::{Color, Presentation, RenderingBackend};
use minopac_rendering_macroquad::MacroquadBackend;
use minopac_system_spawning::Config as SpawningConfig;
use minopac_system_steering::Config as SteeringConfig;
use minopac_world::{query, World};

use self::simulation::Simulation;

/// Presentation synchronisation requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    /// Wait for the display refresh before presenting.
    On,
    /// Present as fast as possible.
    Off,
}

impl VsyncMode {
    fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Launch options for MinoPac.
#[derive(Debug, Parser)]
#[command(name = "minopac", about = "Grid maze chase game", version)]
struct CliArgs {
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_enum, default_value_t = VsyncMode::On)]
    vsync: VsyncMode,
    /// Log frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Draw flat primitives instead of loading sprite assets.
    #[arg(long)]
    no_sprites: bool,
    /// Number of ghosts released per level.
    #[arg(
        long,
        default_value_t = DEFAULT_GHOST_COUNT as u8,
        value_parser = clap::value_parser!(u8).range(0..=4)
    )]
    ghosts: u8,
    /// Seed driving the frightened ghosts' wandering.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Log filter overriding `RUST_LOG`, e.g. `debug` or `minopac_world=debug`.
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        let _ = builder.parse_filters(filter);
    }
    builder.init();
}

/// Entry point for the MinoPac command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_level.as_deref());

    let world = World::new().context("failed to build the default level")?;
    log::info!("{}", query::welcome_banner(&world));
    log::debug!("launch options: {args:?}");

    let scene = simulation::initial_scene(&world)?;
    let mut simulation = Simulation::new(
        world,
        SpawningConfig::new(usize::from(args.ghosts), GHOST_RELEASE_INTERVAL),
        SteeringConfig::new(args.seed),
    );

    let presentation = Presentation::new("MinoPac", Color::from_rgb_u8(0, 0, 0), scene);
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync.enabled())
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);

    backend.run(presentation, move |dt, input, scene| {
        simulation.advance(dt, input);
        simulation::populate_scene(simulation.world(), scene);
    })
}
