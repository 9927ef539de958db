#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for MinoPac adapters.
//!
//! Scenes are plain data rebuilt from world queries every frame. Positions
//! are expressed in maze pixels (tile size times tile index) so backends only
//! need to scale and offset them to fit the window.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use minopac_core::{CellCoord, Direction, GhostColor};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<GhostColor> for Color {
    fn from(color: GhostColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction key held or pressed on this frame, if any.
    pub direction: Option<Direction>,
    /// Whether the adapter detected a restart request on this frame.
    pub restart: bool,
}

/// Identifies a sprite that can be drawn by rendering backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Open floor tile.
    FloorTile,
    /// Solid wall tile.
    WallTile,
    /// Standard pellet.
    Pellet,
    /// Power pellet.
    PowerPellet,
    /// Player facing north.
    PlayerNorth,
    /// Player facing east.
    PlayerEast,
    /// Player facing south.
    PlayerSouth,
    /// Player facing west.
    PlayerWest,
    /// Ghost body, tinted with the ghost's color at draw time.
    Ghost,
    /// Ghost while frightened.
    GhostFrightened,
}

impl SpriteKey {
    /// Every sprite a complete atlas provides, in load order.
    pub const ALL: [SpriteKey; 10] = [
        SpriteKey::FloorTile,
        SpriteKey::WallTile,
        SpriteKey::Pellet,
        SpriteKey::PowerPellet,
        SpriteKey::PlayerNorth,
        SpriteKey::PlayerEast,
        SpriteKey::PlayerSouth,
        SpriteKey::PlayerWest,
        SpriteKey::Ghost,
        SpriteKey::GhostFrightened,
    ];

    /// Player sprite oriented towards `facing`.
    #[must_use]
    pub const fn player(facing: Direction) -> Self {
        match facing {
            Direction::North => Self::PlayerNorth,
            Direction::East => Self::PlayerEast,
            Direction::South => Self::PlayerSouth,
            Direction::West => Self::PlayerWest,
        }
    }

    /// Name used for the sprite in asset manifests.
    #[must_use]
    pub const fn manifest_name(self) -> &'static str {
        match self {
            Self::FloorTile => "FloorTile",
            Self::WallTile => "WallTile",
            Self::Pellet => "Pellet",
            Self::PowerPellet => "PowerPellet",
            Self::PlayerNorth => "PlayerNorth",
            Self::PlayerEast => "PlayerEast",
            Self::PlayerSouth => "PlayerSouth",
            Self::PlayerWest => "PlayerWest",
            Self::Ghost => "Ghost",
            Self::GhostFrightened => "GhostFrightened",
        }
    }

    /// Resolves a manifest name back into a sprite key.
    #[must_use]
    pub fn from_manifest_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.manifest_name() == name)
    }
}

/// Describes the square tile grid of the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in maze pixels.
    pub tile_length: f32,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when `tile_length` is not a positive finite number.
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Top-left corner of `cell`.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        )
    }

    /// Centre of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.tile_length * 0.5)
    }
}

/// Player state required for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Centre of the player in maze pixels.
    pub position: Vec2,
    /// Direction the player sprite faces.
    pub facing: Direction,
}

impl PlayerPresentation {
    /// Creates a new player presentation descriptor.
    #[must_use]
    pub const fn new(position: Vec2, facing: Direction) -> Self {
        Self { position, facing }
    }
}

/// Ghost state required for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostPresentation {
    /// Centre of the ghost in maze pixels.
    pub position: Vec2,
    /// Direction of the ghost's last move.
    pub facing: Direction,
    /// Body tint used while chasing.
    pub color: Color,
    /// Whether the ghost can currently be eaten.
    pub frightened: bool,
}

/// Heads-up display values shown beneath the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Current score.
    pub score: u32,
    /// Lives left.
    pub lives: u32,
    /// Seconds of power left, when active.
    pub power_seconds: Option<f32>,
}

impl HudPresentation {
    /// Single-line status text, e.g. `Score: 120   Lives: 2   Power: 4.5s`.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = format!("Score: {}   Lives: {}", self.score, self.lives);
        if let Some(seconds) = self.power_seconds {
            text.push_str(&format!("   Power: {seconds:.1}s"));
        }
        text
    }
}

/// Centred message shown once a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// Every pellet was eaten.
    Won,
    /// The player ran out of lives.
    Lost,
}

impl Banner {
    /// Text displayed for the banner.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Won => "You Win! Press R to restart.",
            Self::Lost => "Game Over! Press R to restart.",
        }
    }
}

/// Scene description combining the maze, its inhabitants and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Wall tiles.
    pub walls: Vec<CellCoord>,
    /// Uneaten standard pellets.
    pub pellets: Vec<CellCoord>,
    /// Uneaten power pellets.
    pub power_pellets: Vec<CellCoord>,
    /// The player.
    pub player: PlayerPresentation,
    /// Ghosts in release order.
    pub ghosts: Vec<GhostPresentation>,
    /// Status line.
    pub hud: HudPresentation,
    /// End-of-session message, if any.
    pub banner: Option<Banner>,
}

impl Scene {
    /// Creates a scene for a freshly started level with no ghosts released.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        walls: Vec<CellCoord>,
        player: PlayerPresentation,
        lives: u32,
    ) -> Self {
        Self {
            tile_grid,
            walls,
            pellets: Vec::new(),
            power_pellets: Vec::new(),
            player,
            ghosts: Vec::new(),
            hud: HudPresentation {
                score: 0,
                lives,
                power_seconds: None,
            },
            banner: None,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting MinoPac scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive finite side length.
    #[error("tile_length must be a positive finite number (received {tile_length})")]
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_grid_rejects_degenerate_tile_lengths() {
        for tile_length in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            let error = TileGridPresentation::new(21, 21, tile_length)
                .expect_err("degenerate tile length must be rejected");
            assert!(matches!(error, RenderingError::InvalidTileLength { .. }));
        }
    }

    #[test]
    fn tile_grid_measures_cells_in_pixels() {
        let grid = TileGridPresentation::new(21, 21, 36.0).expect("valid grid");

        assert_eq!(grid.width(), 756.0);
        assert_eq!(grid.height(), 756.0);
        assert_eq!(grid.cell_origin(CellCoord::new(2, 1)), Vec2::new(72.0, 36.0));
        assert_eq!(grid.cell_center(CellCoord::new(2, 1)), Vec2::new(90.0, 54.0));
    }

    #[test]
    fn hud_text_mentions_power_only_while_active() {
        let mut hud = HudPresentation {
            score: 120,
            lives: 2,
            power_seconds: None,
        };
        assert_eq!(hud.text(), "Score: 120   Lives: 2");

        hud.power_seconds = Some(4.46);
        assert_eq!(hud.text(), "Score: 120   Lives: 2   Power: 4.5s");
    }

    #[test]
    fn banners_prompt_for_restart() {
        assert_eq!(Banner::Won.text(), "You Win! Press R to restart.");
        assert_eq!(Banner::Lost.text(), "Game Over! Press R to restart.");
    }

    #[test]
    fn manifest_names_resolve_to_their_keys() {
        for key in SpriteKey::ALL {
            assert_eq!(SpriteKey::from_manifest_name(key.manifest_name()), Some(key));
        }
        assert_eq!(SpriteKey::from_manifest_name("Cherry"), None);
    }

    #[test]
    fn player_sprite_follows_facing() {
        assert_eq!(SpriteKey::player(Direction::West), SpriteKey::PlayerWest);
        assert_eq!(SpriteKey::player(Direction::North), SpriteKey::PlayerNorth);
    }

    #[test]
    fn ghost_palette_colors_convert_to_unit_channels() {
        let color = Color::from(GhostColor::from_rgb(0xff, 0x00, 0x00));
        assert_eq!(color, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(color.lighten(1.0), Color::new(1.0, 1.0, 1.0, 1.0));
    }
}
