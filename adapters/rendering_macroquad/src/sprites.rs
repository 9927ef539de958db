use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use minopac_rendering::{Color, SpriteKey};

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing where and how large a sprite is drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParams {
    /// Position in screen-space pixels where the sprite's top-left corner is placed.
    pub position: Vec2,
    /// Desired size in screen-space pixels.
    pub size: Vec2,
    /// Multiplicative tint applied to the sprite.
    pub tint: Color,
}

impl DrawParams {
    /// Creates untinted draw parameters anchored at the provided position.
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            tint: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Overrides the tint colour used when drawing the sprite.
    #[must_use]
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Textures loaded once from the sprite manifest and shared by every draw call.
#[derive(Debug)]
pub struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    ///
    /// Requires an active macroquad window because textures are uploaded to the GPU.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Draws the requested sprite using the supplied parameters.
    pub fn draw(&self, key: SpriteKey, params: DrawParams) -> Result<()> {
        let texture = self
            .texture(key)
            .with_context(|| format!("sprite {key:?} missing from atlas"))?;

        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(params.size.x, params.size.y)),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            params.position.x,
            params.position.y,
            to_macroquad_color(params.tint),
            draw_params,
        );

        Ok(())
    }

    /// Returns whether the atlas contains the provided key.
    #[must_use]
    pub fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Retrieves the texture associated with the provided key.
    #[must_use]
    pub fn texture(&self, key: SpriteKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        log::info!("loaded {} sprites", textures.len());
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    resolve_entries(manifest.sprites, base_path)
}

fn resolve_entries(
    sprites: impl IntoIterator<Item = (String, String)>,
    base_path: &Path,
) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let mut resolved = HashMap::new();
    for (name, relative_path) in sprites {
        let Some(key) = SpriteKey::from_manifest_name(&name) else {
            bail!("unknown sprite key `{name}` in manifest");
        };
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const COMPLETE_SPRITES: &str = r#"
        FloorTile = "maze/floor.png"
        WallTile = "maze/wall.png"
        Pellet = "maze/pellet.png"
        PowerPellet = "maze/power_pellet.png"
        PlayerNorth = "player/north.png"
        PlayerEast = "player/east.png"
        PlayerSouth = "player/south.png"
        PlayerWest = "player/west.png"
        Ghost = "ghost/regular.png"
        GhostFrightened = "ghost/frightened.png"
    "#;

    fn manifest(version: u32, extra: &str) -> String {
        format!("version = {version}\n\n[sprites]\n{COMPLETE_SPRITES}\n{extra}\n")
    }

    #[test]
    fn manifest_requires_every_known_key() {
        let manifest = r#"
            version = 1

            [sprites]
            FloorTile = "maze/floor.png"
            WallTile = "maze/wall.png"
        "#;

        let error = parse_manifest(manifest, Path::new("assets"))
            .expect_err("incomplete manifest must be rejected");
        assert!(error.to_string().contains("missing entry"));
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let result = parse_manifest(&manifest(1, "Cherry = \"fruit/cherry.png\""), Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_unsupported_versions() {
        let result = parse_manifest(&manifest(2, ""), Path::new("assets"));
        assert!(result.is_err(), "future manifest versions must be rejected");
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let parsed =
            parse_manifest(&manifest(1, ""), Path::new("root")).expect("manifest should parse");

        assert_eq!(parsed.len(), SpriteKey::ALL.len());
        assert_eq!(
            parsed[0],
            (SpriteKey::FloorTile, PathBuf::from("root/maze/floor.png"))
        );
        assert_eq!(
            parsed[8],
            (SpriteKey::Ghost, PathBuf::from("root/ghost/regular.png"))
        );
    }

    #[test]
    fn manifest_rejects_names_resolving_to_the_same_key() {
        let sprites = [
            ("Ghost".to_owned(), "ghost/regular.png".to_owned()),
            ("Ghost".to_owned(), "ghost/other.png".to_owned()),
        ];

        let error = resolve_entries(sprites, Path::new("assets"))
            .expect_err("duplicate entries must be rejected");
        assert!(error.to_string().contains("duplicate entry for Ghost"));
    }

    #[test]
    fn atlas_loads_each_texture_once_in_canonical_order() {
        let entries =
            parse_manifest(&manifest(1, ""), Path::new("assets")).expect("manifest should parse");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(load_order.borrow().as_slice(), &SpriteKey::ALL);
        assert_eq!(atlas.texture_count(), SpriteKey::ALL.len());
        for key in SpriteKey::ALL {
            assert!(atlas.contains(key));
            assert!(atlas.texture(key).is_some());
        }
    }

    #[test]
    fn atlas_reports_loader_failures() {
        let entries = vec![(SpriteKey::Ghost, PathBuf::from("ghost.png"))];
        let error = SpriteAtlas::from_entries(entries, &mut |_, _| bail!("corrupt image"))
            .expect_err("loader failures must propagate");

        assert!(format!("{error:#}").contains("corrupt image"));
    }

    #[test]
    fn atlas_rejects_duplicate_entries() {
        let entries = vec![
            (SpriteKey::Ghost, PathBuf::from("a.png")),
            (SpriteKey::Ghost, PathBuf::from("b.png")),
        ];
        let result = SpriteAtlas::from_entries(entries, &mut |_, _| Ok(Texture2D::empty()));
        assert!(result.is_err());
    }

    #[test]
    fn bundled_manifest_names_existing_assets() {
        let manifest_path =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/manifest.toml");
        let contents = fs::read_to_string(&manifest_path).expect("bundled manifest is readable");
        let base = manifest_path.parent().expect("manifest has a parent");

        let entries = parse_manifest(&contents, base).expect("bundled manifest should parse");
        for (key, path) in entries {
            assert!(path.is_file(), "asset for {key:?} missing at {}", path.display());
        }
    }

    #[test]
    fn missing_manifest_file_is_reported_with_its_path() {
        let error = SpriteAtlas::from_manifest_with_loader("does/not/exist.toml", |_, _| {
            Ok(Texture2D::empty())
        })
        .expect_err("missing manifest must fail");

        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
