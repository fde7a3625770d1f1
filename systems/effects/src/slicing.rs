//! Strip slicing shared by the explode, converge and shrink effects.

use glam::Vec2;
use robotron_core::{ExplodeOrientation, Rect, Size, SpriteRef};

use crate::StripDraw;

/// Number of strips a sprite is cut into.
pub const SLICE_COUNT: i32 = 5;
/// Base distance, in pixels, strips travel away from their origin.
pub const DISPLACEMENT: f32 = 25.0;

const CENTRE_INDEX: i32 = SLICE_COUNT / 2;

const SIDEWAYS: &[(f32, f32)] = &[(-1.0, 0.0), (1.0, 0.0)];
const UPRIGHT: &[(f32, f32)] = &[(0.0, -1.0), (0.0, 1.0)];
const FALLING: &[(f32, f32)] = &[(-1.0, -1.0), (1.0, 1.0)];
const RISING: &[(f32, f32)] = &[(1.0, -1.0), (-1.0, 1.0)];
const CROSSED: &[(f32, f32)] = &[(-1.0, -1.0), (1.0, 1.0), (1.0, -1.0), (-1.0, 1.0)];

/// Direction a sprite is cut in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceAxis {
    /// Vertical cuts producing side-by-side columns.
    Columns,
    /// Horizontal cuts producing stacked rows.
    Rows,
}

/// One strip of a sliced sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strip {
    /// Position of the strip, zero being the left or top strip.
    pub index: i32,
    /// Region of the frame covered by the strip, relative to its top-left corner.
    pub source: Rect,
}

/// Cuts a frame of `size` into [`SLICE_COUNT`] strips along `axis`.
///
/// Every strip has the same thickness except the last, which takes the
/// remainder so the strips always cover the whole frame.
#[must_use]
pub fn slice(size: Size, axis: SliceAxis) -> Vec<Strip> {
    let span = match axis {
        SliceAxis::Columns => size.width(),
        SliceAxis::Rows => size.height(),
    };
    let thickness = span / SLICE_COUNT;
    (0..SLICE_COUNT)
        .map(|index| {
            let start = index * thickness;
            let extent = if index == SLICE_COUNT - 1 {
                span - start
            } else {
                thickness
            };
            let source = match axis {
                SliceAxis::Columns => Rect::new(start, 0, extent, size.height()),
                SliceAxis::Rows => Rect::new(0, start, size.width(), extent),
            };
            Strip { index, source }
        })
        .collect()
}

/// Visual state of every strip at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StripState {
    /// Fraction of the strip's thickness that is drawn.
    pub(crate) scale: f32,
    /// Fraction of the full displacement applied.
    pub(crate) spread: f32,
    /// Opacity of every copy.
    pub(crate) alpha: u8,
}

/// Emits the strip copies of `sprite` for one orientation family.
pub(crate) fn spread_strips(
    sprite: SpriteRef,
    size: Size,
    origin: Vec2,
    orientation: ExplodeOrientation,
    both_diagonals: bool,
    state: StripState,
    out: &mut Vec<StripDraw>,
) {
    let (axis, offsets) = match orientation {
        ExplodeOrientation::Horizontal => (SliceAxis::Columns, SIDEWAYS),
        ExplodeOrientation::Vertical => (SliceAxis::Rows, UPRIGHT),
        ExplodeOrientation::Diagonal { .. } if both_diagonals => (SliceAxis::Rows, CROSSED),
        ExplodeOrientation::Diagonal { mirrored: false } => (SliceAxis::Rows, FALLING),
        ExplodeOrientation::Diagonal { mirrored: true } => (SliceAxis::Rows, RISING),
    };
    let shrinks_width = !matches!(orientation, ExplodeOrientation::Vertical);
    let shrinks_height = !matches!(orientation, ExplodeOrientation::Horizontal);

    for strip in slice(size, axis) {
        let weight = 1 + (strip.index - CENTRE_INDEX).abs();
        let shift = (DISPLACEMENT * weight as f32 * state.spread).trunc();
        let width = strip.source.width() as f32;
        let height = strip.source.height() as f32;
        let drawn = Vec2::new(
            if shrinks_width {
                (width * state.scale).trunc().max(1.0)
            } else {
                width
            },
            if shrinks_height {
                (height * state.scale).trunc().max(1.0)
            } else {
                height
            },
        );
        let base = origin + strip.source.top_left();
        for &(dx, dy) in offsets {
            out.push(StripDraw {
                sprite,
                source: strip.source,
                position: base + Vec2::new(dx, dy) * shift,
                size: drawn,
                alpha: state.alpha,
            });
        }
    }
}
