use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    math::{Rect as MacroquadRect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, FilterMode, Texture2D},
};
use robotron_core::{Rect, Species, SpriteRef, ANIMATIONS};
use robotron_rendering::Color;
use serde::Deserialize;

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing where a frame lands on the display surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Top-left corner in display pixels.
    pub(crate) position: Vec2,
    /// Drawn size in display pixels.
    pub(crate) size: Vec2,
    /// Region of the frame to sample, relative to the frame's top-left corner.
    pub(crate) source: Option<Rect>,
    /// Colour multiplied into the texture.
    pub(crate) tint: Color,
}

impl DrawParams {
    pub(crate) fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            source: None,
            tint: Color::WHITE,
        }
    }

    pub(crate) fn with_source(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }

    pub(crate) fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Sprite sheet sliced into per-animation frame regions.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    texture: Texture2D,
    frames: HashMap<(Species, &'static str), Vec<Rect>>,
}

impl SpriteAtlas {
    /// Loads the sheet described by the manifest at `path`.
    pub(crate) fn from_manifest_path(path: &Path) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Draws one frame of `sprite`.
    pub(crate) fn draw(&self, sprite: SpriteRef, params: DrawParams) -> Result<()> {
        let frame = self.frame(sprite).with_context(|| {
            format!(
                "sprite sheet has no `{}` animation for {}",
                sprite.action,
                sprite.species.name()
            )
        })?;
        let region = match params.source {
            Some(source) => Rect::new(
                frame.x() + source.x(),
                frame.y() + source.y(),
                source.width(),
                source.height(),
            ),
            None => frame,
        };

        texture::draw_texture_ex(
            self.texture,
            params.position.x,
            params.position.y,
            to_macroquad_color(params.tint),
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(params.size.x, params.size.y)),
                source: Some(MacroquadRect::new(
                    region.x() as f32,
                    region.y() as f32,
                    region.width() as f32,
                    region.height() as f32,
                )),
                flip_x: sprite.flip_x,
                ..DrawTextureParams::default()
            },
        );
        Ok(())
    }

    /// Sheet region holding the frame, wrapping past the last frame.
    #[must_use]
    pub(crate) fn frame(&self, sprite: SpriteRef) -> Option<Rect> {
        let frames = self.frames.get(&(sprite.species, sprite.action))?;
        if frames.is_empty() {
            return None;
        }
        frames.get(sprite.frame % frames.len()).copied()
    }

    fn from_manifest_with_loader(
        path: &Path,
        loader: impl FnOnce(&Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read sprite manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let sheet = parse_manifest(&contents, &base)?;
        let texture = loader(&sheet.image).with_context(|| {
            format!("failed to load sprite sheet from {}", sheet.image.display())
        })?;
        Ok(Self {
            texture,
            frames: sheet.frames,
        })
    }
}

fn default_loader(path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite sheet at {}", path.display()))?;
    let texture = Texture2D::from_file_with_format(&bytes, None);
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    image: PathBuf,
    #[serde(default)]
    origin: [i32; 2],
    cell: [i32; 2],
    #[serde(default)]
    padding: [i32; 2],
    rows: i32,
    columns: i32,
    animations: HashMap<String, HashMap<String, Extent>>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Extent {
    row: i32,
    column: i32,
    frames: usize,
}

#[derive(Debug, PartialEq)]
struct ParsedSheet {
    image: PathBuf,
    frames: HashMap<(Species, &'static str), Vec<Rect>>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<ParsedSheet> {
    let mut manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }
    let [cell_width, cell_height] = manifest.cell;
    if cell_width <= 0 || cell_height <= 0 {
        bail!("sprite manifest cell size must be positive");
    }

    let mut frames = HashMap::with_capacity(ANIMATIONS.len());
    for spec in ANIMATIONS {
        let species = spec.species.name();
        let Some(extent) = manifest
            .animations
            .get_mut(species)
            .and_then(|actions| actions.remove(spec.action))
        else {
            bail!("sprite manifest missing animation `{species}.{}`", spec.action);
        };
        if extent.frames < spec.frames {
            bail!(
                "animation `{species}.{}` needs {} frames, manifest provides {}",
                spec.action,
                spec.frames,
                extent.frames
            );
        }
        let last_column = extent.column + extent.frames as i32;
        if extent.row < 0
            || extent.row >= manifest.rows
            || extent.column < 0
            || last_column > manifest.columns
        {
            bail!("animation `{species}.{}` lies outside the sheet grid", spec.action);
        }
        let regions = (0..extent.frames as i32)
            .map(|frame| cell_region(&manifest, extent.row, extent.column + frame))
            .collect();
        let _ = frames.insert((spec.species, spec.action), regions);
    }

    let unexpected = manifest
        .animations
        .iter()
        .flat_map(|(species, actions)| {
            actions.keys().map(move |action| format!("{species}.{action}"))
        })
        .collect::<Vec<_>>();
    if !unexpected.is_empty() {
        bail!(
            "sprite manifest contains unexpected animations: {}",
            unexpected.join(", ")
        );
    }

    Ok(ParsedSheet {
        image: base_path.join(manifest.image),
        frames,
    })
}

fn cell_region(manifest: &Manifest, row: i32, column: i32) -> Rect {
    let [origin_x, origin_y] = manifest.origin;
    let [cell_width, cell_height] = manifest.cell;
    let [padding_x, padding_y] = manifest.padding;
    Rect::new(
        origin_x + column * (cell_width + padding_x),
        origin_y + row * (cell_height + padding_y),
        cell_width,
        cell_height,
    )
}
