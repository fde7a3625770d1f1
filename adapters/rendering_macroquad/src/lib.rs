#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the arena.
//!
//! Sound cues carried by a scene are traced, not played; macroquad is built
//! without its `audio` feature.
//!
//! Every frame is drawn into a 640x480 render target that is then stretched
//! over the window with nearest-neighbour filtering.

mod sprites;

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::mpsc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::{
    camera::{set_camera, set_default_camera, Camera2D},
    input::{is_key_down, is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
    shapes::draw_rectangle,
    text::{draw_text, measure_text},
    texture::{draw_texture_ex, render_target, DrawTextureParams, FilterMode},
};
use robotron_core::{
    DirectionFlags, ProjectileKind, Rect, Species, DISPLAY_HEIGHT, DISPLAY_WIDTH,
};
use robotron_rendering::{
    BorderPresentation, Color, FrameInput, HudPresentation, LabelPresentation, Presentation,
    RenderingBackend, Scene, SpritePresentation,
};
use robotron_system_effects::{LabelContent, StripDraw};

use self::sprites::{DrawParams, SpriteAtlas};

/// Window pixels per display pixel.
pub const WINDOW_SCALE: i32 = 2;

const HUD_FONT_SIZE: u16 = 20;
const LABEL_FONT_SIZE: u16 = 16;
const AFTERIMAGE_ALPHA: u8 = 128;

/// Snapshot of the keyboard observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// Intents forwarded to the simulation.
    input: FrameInput,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self::from_keys(is_key_down, is_key_pressed)
    }

    /// Maps WASD to movement, the arrow keys to shooting and `R` to restart.
    fn from_keys(held: impl Fn(KeyCode) -> bool, pressed: impl Fn(KeyCode) -> bool) -> Self {
        let movement = DirectionFlags::new(
            held(KeyCode::A),
            held(KeyCode::D),
            held(KeyCode::W),
            held(KeyCode::S),
        );
        let shooting = DirectionFlags::new(
            held(KeyCode::Left),
            held(KeyCode::Right),
            held(KeyCode::Up),
            held(KeyCode::Down),
        );

        Self {
            quit_requested: pressed(KeyCode::Escape) || pressed(KeyCode::Q),
            input: FrameInput {
                movement,
                shooting,
                restart: pressed(KeyCode::R),
            },
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    sprite_manifest: Option<PathBuf>,
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

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Draws sprites from the sheet described by `manifest`.
    ///
    /// Without a manifest every actor is drawn as a coloured rectangle.
    #[must_use]
    pub fn with_sprite_manifest(mut self, manifest: Option<PathBuf>) -> Self {
        self.sprite_manifest = manifest;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
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

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = self.render_accum / self.frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Result<()> + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            sprite_manifest,
        } = self;

        let mut config = macroquad::window::Conf {
            window_title: presentation.window_title.clone(),
            window_width: DISPLAY_WIDTH * WINDOW_SCALE,
            window_height: DISPLAY_HEIGHT * WINDOW_SCALE,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let outcome = frame_loop(presentation, update_scene, show_fps, sprite_manifest).await;
            if let Err(error) = &outcome {
                tracing::error!(error = %error, "frame loop stopped");
            }
            let _ = outcome_sender.send(outcome);
        });

        outcome_receiver.recv().unwrap_or_else(|_| Ok(()))
    }
}

async fn frame_loop<F>(
    presentation: Presentation,
    mut update_scene: F,
    show_fps: bool,
    sprite_manifest: Option<PathBuf>,
) -> Result<()>
where
    F: FnMut(Duration, FrameInput, &mut Scene) -> Result<()>,
{
    let atlas = match sprite_manifest {
        Some(path) => Some(
            SpriteAtlas::from_manifest_path(&path)
                .with_context(|| format!("failed to initialise sprite atlas from {}", path.display()))?,
        ),
        None => None,
    };

    let Presentation {
        clear_color,
        mut scene,
        ..
    } = presentation;
    let background = to_macroquad_color(clear_color);
    let display = MacroquadVec2::new(DISPLAY_WIDTH as f32, DISPLAY_HEIGHT as f32);
    let target = render_target(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32);
    target.texture.set_filter(FilterMode::Nearest);
    let mut fps_counter = FpsCounter::default();

    loop {
        let keyboard = KeyboardShortcuts::poll();
        if keyboard.quit_requested {
            break;
        }

        let dt_seconds = macroquad::time::get_frame_time();
        let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
        update_scene(frame_dt, keyboard.input, &mut scene)?;

        let render_start = Instant::now();
        // Render targets flip the y axis, so a positive zoom keeps the origin top-left.
        set_camera(&Camera2D {
            zoom: MacroquadVec2::new(2.0 / display.x, 2.0 / display.y),
            target: display / 2.0,
            render_target: Some(target),
            ..Camera2D::default()
        });
        macroquad::window::clear_background(background);
        draw_scene(&scene, atlas.as_ref())?;

        set_default_camera();
        macroquad::window::clear_background(macroquad::color::BLACK);
        draw_texture_ex(
            target.texture,
            0.0,
            0.0,
            macroquad::color::WHITE,
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                )),
                ..DrawTextureParams::default()
            },
        );
        for cue in &scene.sounds {
            tracing::trace!(cue = cue.name(), "sound cue without audio output");
        }

        let fps_metrics = fps_counter.record_frame(FrameBreakdown {
            frame: frame_dt,
            render: render_start.elapsed(),
        });
        if show_fps {
            if let Some(FpsMetrics {
                per_second,
                trailing_ten_seconds,
                avg_render,
            }) = fps_metrics
            {
                println!(
                    "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                    per_second,
                    trailing_ten_seconds,
                    avg_render.as_secs_f64() * 1_000.0,
                );
            }
        }

        macroquad::window::next_frame().await;
    }

    Ok(())
}

fn draw_scene(scene: &Scene, atlas: Option<&SpriteAtlas>) -> Result<()> {
    for rect in border_rects(&scene.border) {
        fill_rect(rect, scene.border.color);
    }
    for sprite in &scene.sprites {
        draw_sprite(sprite, atlas)?;
    }
    for projectile in &scene.projectiles {
        fill_rect(projectile.rect, projectile_color(projectile.kind));
    }
    for strip in &scene.strips {
        draw_strip(strip, atlas)?;
    }
    for label in &scene.labels {
        draw_label(label, atlas)?;
    }
    for (text, position) in hud_lines(&scene.hud) {
        draw_text_at(&text, position, HUD_FONT_SIZE, Color::WHITE);
    }
    for layer in &scene.overlay {
        fill_rect(layer.rect, Color::from(layer.color));
    }
    if scene.hud.game_over {
        draw_game_over();
    }
    Ok(())
}

fn draw_sprite(sprite: &SpritePresentation, atlas: Option<&SpriteAtlas>) -> Result<()> {
    let size = sprite.size.as_vec2();
    match atlas {
        Some(atlas) => {
            let tint = sprite
                .additive_tint
                .map_or(Color::WHITE, |tint| tint.with_alpha(AFTERIMAGE_ALPHA));
            atlas.draw(
                sprite.sprite,
                DrawParams::new(sprite.position, size).with_tint(tint),
            )
        }
        None => {
            let color = sprite.additive_tint.map_or_else(
                || species_color(sprite.sprite.species),
                |tint| tint.with_alpha(AFTERIMAGE_ALPHA),
            );
            fill(sprite.position, size, color);
            Ok(())
        }
    }
}

fn draw_strip(strip: &StripDraw, atlas: Option<&SpriteAtlas>) -> Result<()> {
    match atlas {
        Some(atlas) => atlas.draw(
            strip.sprite,
            DrawParams::new(strip.position, strip.size)
                .with_source(strip.source)
                .with_tint(Color::WHITE.with_alpha(strip.alpha)),
        ),
        None => {
            let color = species_color(strip.sprite.species).with_alpha(strip.alpha);
            fill(strip.position, strip.size, color);
            Ok(())
        }
    }
}

fn draw_label(label: &LabelPresentation, atlas: Option<&SpriteAtlas>) -> Result<()> {
    match &label.content {
        LabelContent::Text(text) => {
            draw_text_at(text, label.position, LABEL_FONT_SIZE, Color::WHITE);
            Ok(())
        }
        LabelContent::Icon(sprite) => {
            let size = sprite.species.profile().size.as_vec2();
            match atlas {
                Some(atlas) => atlas.draw(*sprite, DrawParams::new(label.position, size)),
                None => {
                    draw_text_at("X", label.position, LABEL_FONT_SIZE, species_color(sprite.species));
                    Ok(())
                }
            }
        }
    }
}

fn draw_game_over() {
    let center = Vec2::new(DISPLAY_WIDTH as f32, DISPLAY_HEIGHT as f32) / 2.0;
    for (text, size, offset) in [
        ("GAME OVER", HUD_FONT_SIZE * 2, -20.0),
        ("Press 'R' to restart.", HUD_FONT_SIZE, 20.0),
    ] {
        let width = measure_text(text, None, size, 1.0).width;
        let position = Vec2::new(center.x - width / 2.0, center.y + offset);
        draw_text_at(text, position, size, Color::WHITE);
    }
}

/// HUD counters and the top-left corner of each line.
fn hud_lines(hud: &HudPresentation) -> [(String, Vec2); 3] {
    let width = DISPLAY_WIDTH as f32;
    let height = DISPLAY_HEIGHT as f32;
    [
        (format!("SCORE: {}", hud.score), Vec2::new(5.0, 0.0)),
        (format!("WAVE: {}", hud.wave), Vec2::new(5.0, height - 15.0)),
        (format!("LIVES: {}", hud.lives), Vec2::new(width - 70.0, 0.0)),
    ]
}

/// Four bars framing the border's area.
fn border_rects(border: &BorderPresentation) -> [Rect; 4] {
    let area = border.area;
    let thickness = border.thickness;
    [
        Rect::new(
            area.left() - thickness,
            area.top() - thickness,
            area.width() + 2 * thickness,
            thickness,
        ),
        Rect::new(
            area.left() - thickness,
            area.bottom(),
            area.width() + 2 * thickness,
            thickness,
        ),
        Rect::new(area.left() - thickness, area.top(), thickness, area.height()),
        Rect::new(area.right(), area.top(), thickness, area.height()),
    ]
}

/// Placeholder colour used when no sprite sheet is loaded.
fn species_color(species: Species) -> Color {
    match species {
        Species::Hero => Color::WHITE,
        Species::Grunt => Color::from_rgb_u8(255, 0, 0),
        Species::Hulk => Color::from_rgb_u8(0, 200, 0),
        Species::Spheroid => Color::from_rgb_u8(255, 120, 0),
        Species::Enforcer => Color::from_rgb_u8(255, 200, 0),
        Species::Quark => Color::from_rgb_u8(160, 0, 255),
        Species::Tank => Color::from_rgb_u8(0, 120, 255),
        Species::Brain => Color::from_rgb_u8(255, 0, 200),
        Species::Prog => Color::from_rgb_u8(0, 255, 255),
        Species::Electrode => Color::from_rgb_u8(128, 128, 128),
        Species::Dad => Color::from_rgb_u8(80, 160, 255),
        Species::Mom => Color::from_rgb_u8(255, 140, 180),
        Species::Mike => Color::from_rgb_u8(255, 255, 140),
    }
}

fn projectile_color(kind: ProjectileKind) -> Color {
    match kind {
        ProjectileKind::HeroShot => Color::from_rgb_u8(255, 255, 255),
        ProjectileKind::EnforcerShot => Color::from_rgb_u8(255, 255, 0),
        ProjectileKind::BrainShot => Color::from_rgb_u8(255, 0, 255),
        ProjectileKind::TankShot => Color::from_rgb_u8(0, 255, 0),
    }
}

fn fill_rect(rect: Rect, color: Color) {
    draw_rectangle(
        rect.x() as f32,
        rect.y() as f32,
        rect.width() as f32,
        rect.height() as f32,
        to_macroquad_color(color),
    );
}

fn fill(position: Vec2, size: Vec2, color: Color) {
    draw_rectangle(position.x, position.y, size.x, size.y, to_macroquad_color(color));
}

/// Draws `text` with its top-left corner at `position`.
fn draw_text_at(text: &str, position: Vec2, font_size: u16, color: Color) {
    let offset = measure_text(text, None, font_size, 1.0).offset_y;
    let _ = draw_text(
        text,
        position.x,
        position.y + offset,
        f32::from(font_size),
        to_macroquad_color(color),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
