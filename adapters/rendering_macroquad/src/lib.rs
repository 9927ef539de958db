#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for MinoPac.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Sprites are loaded from `assets/manifest.toml` when enabled. Without an
//! atlas every element falls back to flat primitives so the game stays
//! playable from a bare checkout.

mod sprites;

pub use self::sprites::{DrawParams, SpriteAtlas};

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use minopac_core::Direction;
use minopac_rendering::{
    Color, FrameInput, GhostPresentation, Presentation, RenderingBackend, Scene, SpriteKey,
};
use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::mpsc,
    time::{Duration, Instant},
};

/// Height of the status strip below the maze, in maze pixels.
const HUD_HEIGHT: f32 = 40.0;
/// Font size used for the status line and banners, in maze pixels.
const HUD_FONT_SIZE: f32 = 24.0;
/// Remaining power below which frightened ghosts start flashing.
const FLASH_THRESHOLD_SECONDS: f32 = 2.0;
/// Number of flash phases per second while power is running out.
const FLASH_PHASES_PER_SECOND: f32 = 4.0;

const WALL_COLOR: Color = Color::new(0.13, 0.2, 0.85, 1.0);
const PELLET_COLOR: Color = Color::new(1.0, 0.85, 0.7, 1.0);
const PLAYER_COLOR: Color = Color::new(1.0, 0.9, 0.0, 1.0);
const FRIGHTENED_COLOR: Color = Color::new(0.2, 0.2, 0.95, 1.0);
const TEXT_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Snapshot of the keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` rebuilds the level after a win or a loss.
    restart: bool,
    /// Arrow up or `W`.
    up: bool,
    /// Arrow down or `S`.
    down: bool,
    /// Arrow left or `A`.
    left: bool,
    /// Arrow right or `D`.
    right: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            restart: is_key_pressed(KeyCode::R),
            up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        }
    }

    /// Folds the held keys into a single frame input. Vertical keys win over
    /// horizontal ones when several are held.
    fn frame_input(self) -> FrameInput {
        let direction = if self.up {
            Some(Direction::North)
        } else if self.down {
            Some(Direction::South)
        } else if self.left {
            Some(Direction::West)
        } else if self.right {
            Some(Direction::East)
        } else {
            None
        };

        FrameInput {
            direction,
            restart: self.restart,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            manifest_path: SpriteAtlas::default_manifest_path(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the sprite manifest location.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let frames = self.frames;
        let per_second = frames as f32 / self.elapsed.as_secs_f32();
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let initial_metrics = SceneMetrics::native(&scene);
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: initial_metrics.width.round() as i32,
            window_height: initial_metrics.height.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if load_sprites {
                match SpriteAtlas::from_manifest_path(&manifest_path)
                    .context("failed to initialise sprite atlas")
                {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        let _ = atlas_init_sender.send(Err(error));
                        return;
                    }
                }
            } else {
                log::info!("sprite loading disabled; drawing primitives");
                None
            };
            let _ = atlas_init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    log::info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_start = Instant::now();
                update_scene(frame_dt, keyboard.frame_input(), &mut scene);
                let simulation_duration = simulation_start.elapsed();

                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                let render_start = Instant::now();
                draw_maze(&scene, &metrics, sprite_atlas.as_ref());
                draw_pellets(&scene, &metrics, sprite_atlas.as_ref());
                draw_player(&scene, &metrics, sprite_atlas.as_ref());
                draw_ghosts(&scene, &metrics, sprite_atlas.as_ref());
                draw_hud(&scene, &metrics);
                draw_banner(&scene, &metrics);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        log::info!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Maps maze pixels onto the window, keeping the aspect ratio of the maze plus its HUD strip.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    width: f32,
    height: f32,
    tile_step: f32,
}

impl SceneMetrics {
    /// Metrics for a window sized exactly to the scene.
    fn native(scene: &Scene) -> Self {
        let width = scene.tile_grid.width();
        let height = scene.tile_grid.height() + HUD_HEIGHT;
        Self::from_scene(scene, width, height)
    }

    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let tile_grid = scene.tile_grid;
        let world_width = tile_grid.width();
        let world_height = tile_grid.height() + HUD_HEIGHT;
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        let width = world_width * scale;
        let height = world_height * scale;
        let offset = Vec2::new(
            ((screen_width - width) * 0.5).max(0.0),
            ((screen_height - height) * 0.5).max(0.0),
        );

        Self {
            scale,
            offset,
            width,
            height,
            tile_step: tile_grid.tile_length * scale,
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    /// Top edge of the status strip in screen space.
    fn hud_top(&self) -> f32 {
        self.offset.y + self.height - HUD_HEIGHT * self.scale
    }
}

fn draw_sprite(atlas: &SpriteAtlas, key: SpriteKey, params: DrawParams) {
    if let Err(error) = atlas.draw(key, params) {
        log::warn!("{error:#}");
    }
}

/// Draws a sprite of `size` screen pixels centred on `center`.
fn draw_centered_sprite(atlas: &SpriteAtlas, key: SpriteKey, center: Vec2, size: f32, tint: Color) {
    let params = DrawParams::new(center - Vec2::splat(size * 0.5), Vec2::splat(size))
        .with_tint(tint);
    draw_sprite(atlas, key, params);
}

fn draw_maze(scene: &Scene, metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    let tile_grid = scene.tile_grid;
    let tile = metrics.tile_step;
    if tile <= f32::EPSILON {
        return;
    }

    match sprite_atlas {
        Some(atlas) => {
            let size = Vec2::splat(tile);
            for row in 0..tile_grid.rows {
                for column in 0..tile_grid.columns {
                    let cell = minopac_core::CellCoord::new(column, row);
                    let origin = metrics.to_screen(tile_grid.cell_origin(cell));
                    draw_sprite(atlas, SpriteKey::FloorTile, DrawParams::new(origin, size));
                }
            }
            for wall in &scene.walls {
                let origin = metrics.to_screen(tile_grid.cell_origin(*wall));
                draw_sprite(atlas, SpriteKey::WallTile, DrawParams::new(origin, size));
            }
        }
        None => {
            let color = to_macroquad_color(WALL_COLOR);
            for wall in &scene.walls {
                let origin = metrics.to_screen(tile_grid.cell_origin(*wall));
                macroquad::shapes::draw_rectangle(origin.x, origin.y, tile, tile, color);
            }
        }
    }
}

fn draw_pellets(scene: &Scene, metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    let tile_grid = scene.tile_grid;
    let tile = metrics.tile_step;
    let white = Color::new(1.0, 1.0, 1.0, 1.0);

    let kinds = [
        (&scene.pellets, SpriteKey::Pellet, 0.5, 0.1),
        (&scene.power_pellets, SpriteKey::PowerPellet, 1.0, 0.3),
    ];
    for (cells, key, sprite_scale, radius_scale) in kinds {
        for cell in cells {
            let center = metrics.to_screen(tile_grid.cell_center(*cell));
            match sprite_atlas {
                Some(atlas) => draw_centered_sprite(atlas, key, center, tile * sprite_scale, white),
                None => macroquad::shapes::draw_circle(
                    center.x,
                    center.y,
                    tile * radius_scale,
                    to_macroquad_color(PELLET_COLOR),
                ),
            }
        }
    }
}

fn draw_player(scene: &Scene, metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    let player = scene.player;
    let center = metrics.to_screen(player.position);
    let tile = metrics.tile_step;

    match sprite_atlas {
        Some(atlas) => draw_centered_sprite(
            atlas,
            SpriteKey::player(player.facing),
            center,
            tile,
            Color::new(1.0, 1.0, 1.0, 1.0),
        ),
        None => macroquad::shapes::draw_circle(
            center.x,
            center.y,
            tile * 0.45,
            to_macroquad_color(PLAYER_COLOR),
        ),
    }
}

fn draw_ghosts(scene: &Scene, metrics: &SceneMetrics, sprite_atlas: Option<&SpriteAtlas>) {
    let tile = metrics.tile_step;
    let power_seconds = scene.hud.power_seconds;

    for ghost in &scene.ghosts {
        let center = metrics.to_screen(ghost.position);
        let (key, tint) = ghost_appearance(ghost, power_seconds, sprite_atlas.is_some());
        match sprite_atlas {
            Some(atlas) => draw_centered_sprite(atlas, key, center, tile, tint),
            None => {
                macroquad::shapes::draw_circle(
                    center.x,
                    center.y,
                    tile * 0.45,
                    to_macroquad_color(tint),
                );
            }
        }
    }
}

/// Sprite and tint for a ghost. Frightened ghosts flash while power is about to run out.
fn ghost_appearance(
    ghost: &GhostPresentation,
    power_seconds: Option<f32>,
    sprites: bool,
) -> (SpriteKey, Color) {
    if !ghost.frightened {
        return (SpriteKey::Ghost, ghost.color);
    }

    let base = if sprites {
        Color::new(1.0, 1.0, 1.0, 1.0)
    } else {
        FRIGHTENED_COLOR
    };
    let flashing = power_seconds
        .filter(|seconds| *seconds < FLASH_THRESHOLD_SECONDS)
        .map(|seconds| (seconds * FLASH_PHASES_PER_SECOND) as u32 % 2 == 0)
        .unwrap_or(false);
    let tint = if flashing { base.lighten(0.7) } else { base };
    (SpriteKey::GhostFrightened, tint)
}

fn draw_hud(scene: &Scene, metrics: &SceneMetrics) {
    let font_size = HUD_FONT_SIZE * metrics.scale;
    let x = metrics.offset.x + 10.0 * metrics.scale;
    let y = metrics.hud_top() + (HUD_HEIGHT - 12.0) * metrics.scale;
    let _ = macroquad::text::draw_text(
        &scene.hud.text(),
        x,
        y,
        font_size,
        to_macroquad_color(TEXT_COLOR),
    );
}

fn draw_banner(scene: &Scene, metrics: &SceneMetrics) {
    let Some(banner) = scene.banner else {
        return;
    };

    let text = banner.text();
    let font_size = HUD_FONT_SIZE * 1.5 * metrics.scale;
    let dimensions = macroquad::text::measure_text(text, None, font_size.round() as u16, 1.0);
    let grid_height = scene.tile_grid.height() * metrics.scale;
    let x = metrics.offset.x + (metrics.width - dimensions.width) * 0.5;
    let y = metrics.offset.y + (grid_height + dimensions.height) * 0.5;

    macroquad::shapes::draw_rectangle(
        x - 12.0,
        y - dimensions.height - 12.0,
        dimensions.width + 24.0,
        dimensions.height + 24.0,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.75),
    );
    let _ = macroquad::text::draw_text(text, x, y, font_size, to_macroquad_color(TEXT_COLOR));
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
