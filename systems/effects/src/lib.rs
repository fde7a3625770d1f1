#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Self-timed visual effects.
//!
//! Effects own a copy of the sprite frame they animate, so removing the
//! actor from play never disturbs them. Each one is driven by simulated time
//! and reports `finished` once its duration has elapsed.

mod labels;
mod slicing;
mod transition;

use std::time::Duration;

use glam::Vec2;
use robotron_core::{ActorId, ExplodeOrientation, Rect, SpriteRef, SpriteSnapshot};

pub use labels::{FloatingLabel, FloatingLabels, LabelContent, LabelId, LABEL_DRIFT, LABEL_TICKS};
pub use slicing::{slice, SliceAxis, Strip, DISPLACEMENT, SLICE_COUNT};
pub use transition::{
    FilledRect, Transition, TransitionStyle, FINAL_REVEAL, SPAWN_WINDOW, SQUARE_GROWTH,
    SQUARE_LINGER, SQUARE_SPACING,
};

use slicing::{spread_strips, StripState};

/// Lifetime of an explosion.
pub const EXPLODE_DURATION: Duration = Duration::from_millis(1000);
/// Lifetime of a convergence.
pub const CONVERGE_DURATION: Duration = Duration::from_millis(1500);
/// Lifetime of a shrink.
pub const SHRINK_DURATION: Duration = Duration::from_millis(1000);
/// Opacity converging strips start from.
pub const CONVERGE_START_ALPHA: u8 = 128;

/// One textured quad produced by an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripDraw {
    /// Frame the quad samples from.
    pub sprite: SpriteRef,
    /// Region of the frame that is sampled, relative to the frame's top-left corner.
    pub source: Rect,
    /// Top-left corner of the quad in display pixels.
    pub position: Vec2,
    /// Drawn size of the quad in display pixels.
    pub size: Vec2,
    /// Opacity of the quad.
    pub alpha: u8,
}

/// Elapsed-time tracker with a sticky completion flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectClock {
    elapsed: Duration,
    duration: Duration,
    finished: bool,
}

impl EffectClock {
    /// Creates a clock that finishes after `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
            finished: duration.is_zero(),
        }
    }

    /// Adds `dt` to the elapsed time.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            self.finished = true;
        }
    }

    /// Normalised progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Reports whether the full duration has elapsed.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.finished
    }
}

/// Strips flying apart from a destroyed enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    snapshot: SpriteSnapshot,
    orientation: ExplodeOrientation,
    clock: EffectClock,
}

impl Explosion {
    /// Starts an explosion of `snapshot` laid out by `orientation`.
    #[must_use]
    pub const fn new(snapshot: SpriteSnapshot, orientation: ExplodeOrientation) -> Self {
        Self {
            snapshot,
            orientation,
            clock: EffectClock::new(EXPLODE_DURATION),
        }
    }

    /// Adds `dt` to the elapsed time.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Timing of the explosion.
    #[must_use]
    pub const fn clock(&self) -> &EffectClock {
        &self.clock
    }

    /// Emits the strips for the current progress.
    pub fn draw(&self, out: &mut Vec<StripDraw>) {
        let t = self.clock.progress();
        spread_strips(
            self.snapshot.sprite,
            self.snapshot.size,
            self.snapshot.position,
            self.orientation,
            false,
            StripState {
                scale: 1.0 - t,
                spread: t,
                alpha: (255.0 * (1.0 - t)) as u8,
            },
            out,
        );
    }
}

/// Which strip families a convergence animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvergeStyle {
    /// One family laid out by the orientation.
    Single(ExplodeOrientation),
    /// Columns, rows and diagonals at once, used for the hero.
    All,
}

/// Strips assembling into an actor as it enters play.
#[derive(Clone, Debug, PartialEq)]
pub struct Convergence {
    actor: ActorId,
    snapshot: SpriteSnapshot,
    style: ConvergeStyle,
    clock: EffectClock,
}

impl Convergence {
    /// Starts assembling `snapshot` for `actor`.
    #[must_use]
    pub const fn new(actor: ActorId, snapshot: SpriteSnapshot, style: ConvergeStyle) -> Self {
        Self {
            actor,
            snapshot,
            style,
            clock: EffectClock::new(CONVERGE_DURATION),
        }
    }

    /// Actor being assembled.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        self.actor
    }

    /// Adds `dt` to the elapsed time.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Timing of the convergence.
    #[must_use]
    pub const fn clock(&self) -> &EffectClock {
        &self.clock
    }

    /// Emits the strips around `position`, the actor's live top-left corner.
    pub fn draw(&self, position: Vec2, out: &mut Vec<StripDraw>) {
        let t = self.clock.progress();
        let alpha = f32::from(CONVERGE_START_ALPHA) * (1.0 - t) + 255.0 * t;
        let state = StripState {
            scale: t,
            spread: 1.0 - t,
            alpha: alpha as u8,
        };
        let families: &[ExplodeOrientation] = match &self.style {
            ConvergeStyle::Single(orientation) => std::slice::from_ref(orientation),
            ConvergeStyle::All => &[
                ExplodeOrientation::Horizontal,
                ExplodeOrientation::Vertical,
                ExplodeOrientation::Diagonal { mirrored: false },
            ],
        };
        for &orientation in families {
            spread_strips(
                self.snapshot.sprite,
                self.snapshot.size,
                position,
                orientation,
                true,
                state,
                out,
            );
        }
    }
}

/// A whole frame scaling down to nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Shrink {
    snapshot: SpriteSnapshot,
    clock: EffectClock,
}

impl Shrink {
    /// Starts shrinking `snapshot`.
    #[must_use]
    pub const fn new(snapshot: SpriteSnapshot) -> Self {
        Self {
            snapshot,
            clock: EffectClock::new(SHRINK_DURATION),
        }
    }

    /// Adds `dt` to the elapsed time.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Timing of the shrink.
    #[must_use]
    pub const fn clock(&self) -> &EffectClock {
        &self.clock
    }

    /// Emits the scaled frame anchored at its original top-left corner.
    pub fn draw(&self, out: &mut Vec<StripDraw>) {
        let scale = 1.0 - self.clock.progress();
        let size = self.snapshot.size;
        out.push(StripDraw {
            sprite: self.snapshot.sprite,
            source: Rect::new(0, 0, size.width(), size.height()),
            position: self.snapshot.position,
            size: size.as_vec2() * scale,
            alpha: u8::MAX,
        });
    }
}

/// Every effect currently playing.
#[derive(Clone, Debug, Default)]
pub struct Effects {
    explosions: Vec<Explosion>,
    convergences: Vec<Convergence>,
    shrinks: Vec<Shrink>,
    labels: FloatingLabels,
}

impl Effects {
    /// Creates an empty effect list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an explosion.
    pub fn explode(&mut self, snapshot: SpriteSnapshot, orientation: ExplodeOrientation) {
        self.explosions.push(Explosion::new(snapshot, orientation));
    }

    /// Starts a convergence tracking `actor`, replacing any it already had.
    pub fn converge(&mut self, actor: ActorId, snapshot: SpriteSnapshot, style: ConvergeStyle) {
        self.convergences
            .retain(|convergence| convergence.actor != actor);
        self.convergences
            .push(Convergence::new(actor, snapshot, style));
    }

    /// Starts a shrink.
    pub fn shrink(&mut self, snapshot: SpriteSnapshot) {
        self.shrinks.push(Shrink::new(snapshot));
    }

    /// Adds a drifting label.
    pub fn float_label(&mut self, content: LabelContent, position: Vec2) -> LabelId {
        self.labels.spawn(content, position)
    }

    /// Live floating labels.
    #[must_use]
    pub const fn labels(&self) -> &FloatingLabels {
        &self.labels
    }

    /// Reports whether `actor` is still being assembled.
    #[must_use]
    pub fn is_converging(&self, actor: ActorId) -> bool {
        self.convergences
            .iter()
            .any(|convergence| convergence.actor == actor)
    }

    /// Number of convergences still playing.
    #[must_use]
    pub fn active_convergences(&self) -> usize {
        self.convergences.len()
    }

    /// Number of explosions and shrinks still playing.
    #[must_use]
    pub fn active_debris(&self) -> usize {
        self.explosions.len() + self.shrinks.len()
    }

    /// Advances every effect by one tick of `dt` and sweeps the finished ones.
    pub fn advance(&mut self, dt: Duration) {
        for explosion in &mut self.explosions {
            explosion.advance(dt);
        }
        for convergence in &mut self.convergences {
            convergence.advance(dt);
        }
        for shrink in &mut self.shrinks {
            shrink.advance(dt);
        }
        self.labels.tick();

        self.explosions.retain(|effect| !effect.clock.finished());
        self.convergences.retain(|effect| !effect.clock.finished());
        self.shrinks.retain(|effect| !effect.clock.finished());
    }

    /// Drops convergences whose actor no longer exists.
    pub fn forget_missing<F>(&mut self, exists: F)
    where
        F: Fn(ActorId) -> bool,
    {
        self.convergences
            .retain(|convergence| exists(convergence.actor));
    }

    /// Emits the quads of every effect.
    ///
    /// `locate` returns the live top-left corner of an actor so convergences
    /// follow actors that move while assembling.
    pub fn draw<F>(&self, locate: F, out: &mut Vec<StripDraw>)
    where
        F: Fn(ActorId) -> Option<Vec2>,
    {
        for shrink in &self.shrinks {
            shrink.draw(out);
        }
        for explosion in &self.explosions {
            explosion.draw(out);
        }
        for convergence in &self.convergences {
            let position = locate(convergence.actor).unwrap_or(convergence.snapshot.position);
            convergence.draw(position, out);
        }
    }

    /// Drops every effect and label.
    pub fn clear(&mut self) {
        self.explosions.clear();
        self.convergences.clear();
        self.shrinks.clear();
        self.labels.clear();
    }
}
