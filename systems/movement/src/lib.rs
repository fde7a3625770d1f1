#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Geometry and movement primitives shared by actors and projectiles.
//!
//! Positions are kept as floating point vectors so sub-pixel steps accumulate
//! across ticks. Hitboxes are derived from the rounded position after every
//! mutation.

use glam::Vec2;
use rand::Rng;
use robotron_core::{DirectionFlags, Rect, Size};

/// Distance under which a target counts as reached on both axes.
pub const ARRIVAL_TOLERANCE: f32 = 2.0;

/// Default per-axis step applied by [`Body::move_to_target`] before scaling.
pub const UNIT_STEP: f32 = 1.0;

/// Restricts movement to a single axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisLock {
    /// Both axes move.
    #[default]
    Free,
    /// Only the horizontal axis moves.
    Horizontal,
    /// Only the vertical axis moves.
    Vertical,
}

impl AxisLock {
    /// Parses the short axis names `"x"` and `"y"`.
    ///
    /// An empty name means no lock. Anything else is reported and falls back to
    /// [`AxisLock::Free`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "x" => AxisLock::Horizontal,
            "y" => AxisLock::Vertical,
            "" => AxisLock::Free,
            other => {
                tracing::warn!(axis = other, "unrecognized axis lock, moving on both axes");
                AxisLock::Free
            }
        }
    }

    /// Swaps a horizontal lock for a vertical one and vice versa.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            AxisLock::Free => AxisLock::Free,
            AxisLock::Horizontal => AxisLock::Vertical,
            AxisLock::Vertical => AxisLock::Horizontal,
        }
    }

    /// Zeroes the component of `delta` on the locked axis.
    #[must_use]
    pub fn apply(self, delta: Vec2) -> Vec2 {
        match self {
            AxisLock::Free => delta,
            AxisLock::Horizontal => Vec2::new(delta.x, 0.0),
            AxisLock::Vertical => Vec2::new(0.0, delta.y),
        }
    }
}

/// Sub-pixel position paired with the hitbox derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    position: Vec2,
    size: Size,
    rect: Rect,
}

impl Body {
    /// Creates a body whose top-left corner sits at `position`.
    #[must_use]
    pub fn new(position: Vec2, size: Size) -> Self {
        Self {
            position,
            size,
            rect: Rect::from_position(position, size),
        }
    }

    /// Top-left position with sub-pixel precision.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Hitbox derived from the rounded position.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Dimensions of the hitbox.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Moves the body to an absolute position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.rect = Rect::from_position(position, self.size);
    }

    /// Offsets the body by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    /// Keeps the whole hitbox inside `area`.
    pub fn clamp_within(&mut self, area: Rect) {
        let max_x = (area.right() - self.size.width()).max(area.left()) as f32;
        let max_y = (area.bottom() - self.size.height()).max(area.top()) as f32;
        let clamped = Vec2::new(
            self.position.x.clamp(area.left() as f32, max_x),
            self.position.y.clamp(area.top() as f32, max_y),
        );
        if clamped != self.position {
            self.set_position(clamped);
        }
    }

    /// Steps toward `target` by `base_movement * speed_scale` on each axis.
    ///
    /// Each axis moves independently by the sign of its delta, so diagonal
    /// steps are longer than axial ones.
    pub fn move_to_target(
        &mut self,
        target: Vec2,
        base_movement: f32,
        speed_scale: f32,
        lock: AxisLock,
    ) {
        let step = axis_signs(target - self.position) * base_movement * speed_scale;
        self.translate(lock.apply(step));
    }

    /// Returns a fresh random target once `target` is within tolerance.
    ///
    /// The replacement is sampled uniformly from the top-left corners that keep
    /// the whole hitbox inside `bounds`; any target still two or more pixels
    /// away on either axis is returned unchanged.
    #[must_use]
    pub fn reached_target<R: Rng + ?Sized>(&self, target: Vec2, bounds: Rect, rng: &mut R) -> Vec2 {
        if within_tolerance(self.position, target) {
            self.random_target(bounds, rng)
        } else {
            target
        }
    }

    /// Random top-left corner at which the whole hitbox fits inside `bounds`.
    #[must_use]
    pub fn random_target<R: Rng + ?Sized>(&self, bounds: Rect, rng: &mut R) -> Vec2 {
        let corners = Rect::new(
            bounds.left(),
            bounds.top(),
            (bounds.width() - self.size.width()).max(1),
            (bounds.height() - self.size.height()).max(1),
        );
        random_point(corners, rng)
    }
}

/// Sign of each component, with zero kept as zero.
#[must_use]
pub fn axis_signs(delta: Vec2) -> Vec2 {
    Vec2::new(sign(delta.x), sign(delta.y))
}

fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Reports whether `position` is within [`ARRIVAL_TOLERANCE`] of `target` on both axes.
#[must_use]
pub fn within_tolerance(position: Vec2, target: Vec2) -> bool {
    let delta = (target - position).abs();
    delta.x < ARRIVAL_TOLERANCE && delta.y < ARRIVAL_TOLERANCE
}

/// Samples a point uniformly inside `bounds`.
#[must_use]
pub fn random_point<R: Rng + ?Sized>(bounds: Rect, rng: &mut R) -> Vec2 {
    let x = rng.gen_range(bounds.left()..bounds.right().max(bounds.left() + 1));
    let y = rng.gen_range(bounds.top()..bounds.bottom().max(bounds.top() + 1));
    Vec2::new(x as f32, y as f32)
}

/// Direction held along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    /// Left or up.
    Negative,
    /// Right or down.
    Positive,
}

/// Press-order stack for the two opposing keys of one axis.
///
/// When both keys are held, the one pressed most recently wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PressOrder {
    held: Vec<AxisDirection>,
}

impl PressOrder {
    /// Records the current key state and returns the winning direction.
    pub fn update(&mut self, negative: bool, positive: bool) -> Option<AxisDirection> {
        let is_held = |direction: &AxisDirection| match direction {
            AxisDirection::Negative => negative,
            AxisDirection::Positive => positive,
        };
        self.held.retain(is_held);
        for direction in [AxisDirection::Negative, AxisDirection::Positive] {
            if is_held(&direction) && !self.held.contains(&direction) {
                self.held.push(direction);
            }
        }
        self.latest()
    }

    /// Most recently pressed direction still held.
    #[must_use]
    pub fn latest(&self) -> Option<AxisDirection> {
        self.held.last().copied()
    }

    /// Forgets every held key.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Press-order stacks for both axes of one set of direction keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionStacks {
    horizontal: PressOrder,
    vertical: PressOrder,
}

impl DirectionStacks {
    /// Resolves held keys into at most one direction per axis.
    pub fn resolve(&mut self, held: DirectionFlags) -> DirectionFlags {
        let horizontal = self.horizontal.update(held.left, held.right);
        let vertical = self.vertical.update(held.up, held.down);
        DirectionFlags::new(
            horizontal == Some(AxisDirection::Negative),
            horizontal == Some(AxisDirection::Positive),
            vertical == Some(AxisDirection::Negative),
            vertical == Some(AxisDirection::Positive),
        )
    }

    /// Forgets every held key on both axes.
    pub fn clear(&mut self) {
        self.horizontal.clear();
        self.vertical.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_keeps_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.5), -1.0);
        assert_eq!(sign(7.0), 1.0);
    }

    #[test]
    fn toggled_lock_swaps_axes() {
        assert_eq!(AxisLock::Horizontal.toggled(), AxisLock::Vertical);
        assert_eq!(AxisLock::Vertical.toggled(), AxisLock::Horizontal);
        assert_eq!(AxisLock::Free.toggled(), AxisLock::Free);
    }
}
