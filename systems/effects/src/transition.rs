//! Expanding-square screen wipe played between waves.

use std::time::Duration;

use rand::Rng;
use robotron_core::{Rect, Rgb};

/// Time a square takes to grow to full size.
pub const SQUARE_GROWTH: Duration = Duration::from_millis(1000);
/// Time during which new squares keep spawning.
pub const SPAWN_WINDOW: Duration = Duration::from_millis(1000);
/// Growth ratio a square must exceed before the next one spawns.
pub const SQUARE_SPACING: f32 = 0.04;
/// Time a fully grown square stays in the live list.
pub const SQUARE_LINGER: Duration = Duration::from_millis(1000);
/// Time the final square takes to reveal the scene.
pub const FINAL_REVEAL: Duration = Duration::from_millis(1000);

/// Shape the squares grow in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionStyle {
    /// Grows from the centre on both axes.
    Centre,
    /// Full height, grows sideways from the centre.
    Vertical,
    /// Full width, grows up and down from the centre.
    Horizontal,
    /// Grows from the left edge.
    Left,
    /// Grows from the right edge.
    Right,
    /// Grows from the top edge.
    Top,
    /// Grows from the bottom edge.
    Bottom,
}

impl TransitionStyle {
    /// Styles chosen at random for every wave after the first.
    pub const RANDOM_CHOICES: [Self; 6] = [
        Self::Vertical,
        Self::Horizontal,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
    ];

    /// Rectangle covered by a square that reached `ratio` of its full size.
    #[must_use]
    pub fn square(self, ratio: f32, bounds: Rect) -> Rect {
        let ratio = ratio.clamp(0.0, 1.0);
        let full_width = bounds.width() as f32;
        let full_height = bounds.height() as f32;
        let width = full_width * ratio;
        let height = full_height * ratio;
        let centred_x = ((full_width - width) / 2.0).floor();
        let centred_y = ((full_height - height) / 2.0).floor();

        let (x, y, w, h) = match self {
            Self::Centre => (centred_x, centred_y, width, height),
            Self::Vertical => (centred_x, 0.0, width, full_height),
            Self::Horizontal => (0.0, centred_y, full_width, height),
            Self::Left => (0.0, 0.0, width, full_height),
            Self::Right => (full_width - width, 0.0, width, full_height),
            Self::Top => (0.0, 0.0, full_width, height),
            Self::Bottom => (0.0, full_height - height, full_width, height),
        };
        Rect::new(
            bounds.left() + x as i32,
            bounds.top() + y as i32,
            w as i32,
            h as i32,
        )
    }
}

/// Solid rectangle of the transition overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilledRect {
    /// Covered area in display pixels.
    pub rect: Rect,
    /// Fill colour.
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
struct Square {
    color: Rgb,
    age: Duration,
    spawned_next: bool,
}

impl Square {
    fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            color: Rgb::from_rgb(rng.gen(), rng.gen(), rng.gen()),
            age: Duration::ZERO,
            spawned_next: false,
        }
    }

    fn ratio(&self) -> f32 {
        ratio(self.age, SQUARE_GROWTH)
    }
}

/// State of one screen wipe.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    style: TransitionStyle,
    bounds: Rect,
    backdrop: Option<Rgb>,
    elapsed: Duration,
    squares: Vec<Square>,
    started: bool,
    reveal: Option<Duration>,
    finished: bool,
}

impl Transition {
    /// Creates a wipe with an explicit style and optional opaque backdrop.
    #[must_use]
    pub fn new(style: TransitionStyle, backdrop: Option<Rgb>, bounds: Rect) -> Self {
        Self {
            style,
            bounds,
            backdrop,
            elapsed: Duration::ZERO,
            squares: Vec::new(),
            started: false,
            reveal: None,
            finished: false,
        }
    }

    /// Creates the wipe for a wave.
    ///
    /// The first wave of a playthrough always grows from the centre over a
    /// black backdrop. Later waves pick a random style over the live scene.
    #[must_use]
    pub fn for_wave<R: Rng + ?Sized>(first: bool, bounds: Rect, rng: &mut R) -> Self {
        if first {
            Self::new(TransitionStyle::Centre, Some(Rgb::BLACK), bounds)
        } else {
            let index = rng.gen_range(0..TransitionStyle::RANDOM_CHOICES.len());
            Self::new(TransitionStyle::RANDOM_CHOICES[index], None, bounds)
        }
    }

    /// Style the squares grow in.
    #[must_use]
    pub const fn style(&self) -> TransitionStyle {
        self.style
    }

    /// Reports whether the final square has fully revealed the scene.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.finished
    }

    /// Number of squares still growing or lingering.
    #[must_use]
    pub fn live_squares(&self) -> usize {
        self.squares.len()
    }

    /// Advances every square by `dt`.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: Duration, rng: &mut R) {
        if self.finished {
            return;
        }
        if !self.started {
            self.started = true;
            self.squares.push(Square::new(rng));
        }

        let spawning = self.elapsed < SPAWN_WINDOW;
        self.elapsed += dt;

        let mut pending = 0;
        for square in &mut self.squares {
            square.age += dt;
            if spawning && !square.spawned_next && square.ratio() > SQUARE_SPACING {
                square.spawned_next = true;
                pending += 1;
            }
        }

        let retire_after = SQUARE_GROWTH + SQUARE_LINGER;
        let mut backdrop = self.backdrop;
        self.squares.retain(|square| {
            let keep = square.age <= retire_after;
            if !keep {
                backdrop = Some(square.color);
            }
            keep
        });
        self.backdrop = backdrop;

        for _ in 0..pending {
            self.squares.push(Square::new(rng));
        }

        if self.elapsed >= SPAWN_WINDOW {
            let reveal = match self.reveal {
                Some(reveal) => reveal + dt,
                None => Duration::ZERO,
            };
            self.reveal = Some(reveal);
            if reveal >= FINAL_REVEAL {
                self.finished = true;
            }
        }
    }

    /// Emits the visible part of the overlay, back to front.
    pub fn draw(&self, out: &mut Vec<FilledRect>) {
        if self.finished {
            return;
        }
        let hole = self
            .reveal
            .map(|reveal| self.style.square(ratio(reveal, FINAL_REVEAL), self.bounds));

        let layers = self
            .backdrop
            .map(|color| FilledRect {
                rect: self.bounds,
                color,
            })
            .into_iter()
            .chain(self.squares.iter().map(|square| FilledRect {
                rect: self.style.square(square.ratio(), self.bounds),
                color: square.color,
            }));

        for layer in layers {
            match hole {
                Some(hole) => {
                    for rect in subtract(layer.rect, hole) {
                        out.push(FilledRect {
                            rect,
                            color: layer.color,
                        });
                    }
                }
                None => out.push(layer),
            }
        }
    }
}

fn ratio(elapsed: Duration, duration: Duration) -> f32 {
    (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
}

/// Parts of `rect` outside `hole`, as at most four rectangles.
fn subtract(rect: Rect, hole: Rect) -> Vec<Rect> {
    if rect.width() <= 0 || rect.height() <= 0 {
        return Vec::new();
    }
    if !rect.intersects(&hole) {
        return vec![rect];
    }

    let mut parts = Vec::with_capacity(4);
    let top = hole.top().max(rect.top());
    let bottom = hole.bottom().min(rect.bottom());
    if top > rect.top() {
        parts.push(Rect::new(rect.left(), rect.top(), rect.width(), top - rect.top()));
    }
    if bottom < rect.bottom() {
        parts.push(Rect::new(
            rect.left(),
            bottom,
            rect.width(),
            rect.bottom() - bottom,
        ));
    }
    if hole.left() > rect.left() {
        parts.push(Rect::new(
            rect.left(),
            top,
            hole.left() - rect.left(),
            bottom - top,
        ));
    }
    if hole.right() < rect.right() {
        parts.push(Rect::new(
            hole.right(),
            top,
            rect.right() - hole.right(),
            bottom - top,
        ));
    }
    parts
}
