#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for arena adapters.
//!
//! Scenes are plain data in logical display pixels. Backends scale the
//! 640x480 surface to the window with nearest-neighbour filtering.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use robotron_core::{
    play_area, ControlState, DirectionFlags, ProjectileKind, Rect, Rgb, Size, SoundCue, SpriteRef,
    HUD_BORDER_PADDING, HUD_BORDER_THICKNESS,
};
use robotron_system_effects::{FilledRect, LabelContent, StripDraw};

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
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Colour of the border framing the play area.
    pub const BORDER: Self = Self::from_rgb_u8(255, 0, 0);
    /// Tint added to prog afterimages.
    pub const AFTERIMAGE: Self = Self::from_rgb_u8(255, 255, 0);

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

    /// Returns the same color with a byte alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: u8) -> Self {
        Self {
            alpha: f32::from(alpha) / 255.0,
            ..self
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Movement keys held this frame.
    pub movement: DirectionFlags,
    /// Shooting keys held this frame.
    pub shooting: DirectionFlags,
    /// Whether the restart key was pressed this frame.
    pub restart: bool,
}

impl FrameInput {
    /// Intents handed to the simulation.
    #[must_use]
    pub const fn controls(&self) -> ControlState {
        ControlState {
            movement: self.movement,
            shooting: self.shooting,
            restart: self.restart,
        }
    }
}

/// Whole-frame sprite drawn at an actor's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Frame to draw.
    pub sprite: SpriteRef,
    /// Top-left corner in display pixels.
    pub position: Vec2,
    /// Drawn size in display pixels.
    pub size: Size,
    /// Colour added on top of the frame, if any.
    pub additive_tint: Option<Color>,
}

/// Projectile drawn as a solid hitbox.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// Hitbox in display pixels.
    pub rect: Rect,
}

/// Floating label drawn on top of the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPresentation {
    /// Text or icon to draw.
    pub content: LabelContent,
    /// Top-left corner in display pixels.
    pub position: Vec2,
}

/// Counters shown around the play area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
    /// Current score.
    pub score: u32,
    /// Current wave.
    pub wave: u32,
    /// Lives left.
    pub lives: u32,
    /// Whether the game-over overlay is shown.
    pub game_over: bool,
}

/// Border framing the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderPresentation {
    /// Inner edge of the border.
    pub area: Rect,
    /// Line thickness in display pixels.
    pub thickness: i32,
    /// Space between the border and the display edge.
    pub padding: i32,
    /// Line colour.
    pub color: Color,
}

impl Default for BorderPresentation {
    fn default() -> Self {
        Self {
            area: play_area(),
            thickness: HUD_BORDER_THICKNESS,
            padding: HUD_BORDER_PADDING,
            color: Color::BORDER,
        }
    }
}

/// Everything drawn for one frame, back to front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Frame around the play area.
    pub border: BorderPresentation,
    /// Actors, afterimages first.
    pub sprites: Vec<SpritePresentation>,
    /// Hero and enemy shots.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Explosion, convergence and shrink quads.
    pub strips: Vec<StripDraw>,
    /// Score popups and death markers.
    pub labels: Vec<LabelPresentation>,
    /// Score, wave and lives.
    pub hud: HudPresentation,
    /// Screen wipe covering the scene.
    pub overlay: Vec<FilledRect>,
    /// Sound cues raised since the previous frame.
    pub sounds: Vec<SoundCue>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every per-frame list, keeping their allocations.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.projectiles.clear();
        self.strips.clear();
        self.labels.clear();
        self.overlay.clear();
        self.sounds.clear();
        self.hud = HudPresentation::default();
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

/// Rendering backend capable of presenting arena scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input sampled this frame, and rebuilds the scene before it is
    /// drawn. An error returned by the closure stops the loop and is returned
    /// from `run`.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> AnyResult<()> + 'static;
}
