//! Fractional-frame arithmetic for morph playback.
//!
//! Stateless helpers shared by the stepping algorithm and its tests. A
//! morph position is a frame ordinal with a fractional part; `n` morph
//! frames split each model-to-model step into `n + 1` units.

/// Tolerance for range membership and integer snapping.
pub const MORPH_TOLERANCE: f32 = 0.001;

/// Size of one morph step for `morph_count` in-between frames.
#[must_use]
pub fn morph_unit(morph_count: u32) -> f32 {
    1.0 / (morph_count as f32 + 1.0)
}

/// Whether `position` lies outside `[first, last]` (in either order).
///
/// A position is out of range only if it passes both bounds by more than
/// [`MORPH_TOLERANCE`] on the same side, so values that land on a bound
/// up to float error stay in range.
#[must_use]
pub fn is_out_of_range(position: f32, first: usize, last: usize) -> bool {
    let (first, last) = (first as f32, last as f32);
    let above = position - MORPH_TOLERANCE;
    let below = position + MORPH_TOLERANCE;
    (above > first && above > last) || (below < first && below < last)
}

/// Snap a position that is within [`MORPH_TOLERANCE`] of an integer onto
/// that integer.
#[must_use]
pub fn snap_position(position: f32) -> f32 {
    let floor = position.floor();
    let frac = position - floor;
    if frac < MORPH_TOLERANCE {
        floor
    } else if frac > 1.0 - MORPH_TOLERANCE {
        floor + 1.0
    } else {
        position
    }
}

/// A morph position split into its bounding frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphSplit {
    /// Frame at or below the position.
    pub base: isize,
    /// Frame above `base`.
    pub next: isize,
    /// Fraction of the way from `base` to `next`, in `[0, 1)`.
    pub fraction: f32,
    /// The (snapped) position itself.
    pub position: f32,
}

impl MorphSplit {
    /// Snap `position` and split it into `base + fraction`.
    #[must_use]
    pub fn new(position: f32) -> Self {
        let position = snap_position(position);
        let floor = position.floor();
        Self {
            base: floor as isize,
            next: floor as isize + 1,
            fraction: position - floor,
            position,
        }
    }

    /// Whether the split needs an interpolated structure: a non-zero
    /// fraction between two distinct, non-negative frames.
    #[must_use]
    pub fn needs_interpolation(&self) -> bool {
        self.fraction > 0.0
            && self.base >= 0
            && self.next >= 0
            && self.base != self.next
    }
}
