#![forbid(unsafe_code)]

//! Tolerance-aware overlap detection.
//!
//! # Invariants
//!
//! 1. **Symmetric**: `overlaps(bb, a, b) == overlaps(bb, b, a)`.
//! 2. **Touching is not overlapping**: two ranges intersect on an axis only
//!    when each extends more than `epsilon * extent` past the other's leading
//!    edge, where `extent` is the bounding box size on that axis.
//! 3. **Absent or degenerate never overlaps**: an unplaced word or a
//!    rectangle with a non-positive extent is disjoint from everything.
//! 4. **Self-overlap needs size**: a rectangle overlaps itself only when it
//!    is wider than `epsilon * bb.width` and taller than
//!    `epsilon * bb.height`. Words smaller than the tolerance never count.
//!
//! The tolerance is shared across the whole layout (it scales with the
//! bounding box, not with either rectangle).

use crate::geometry::Rect;

/// Default relative tolerance: rectangles closer than this fraction of the
/// layout extent count as touching.
pub const DEFAULT_EPSILON: f64 = 0.005;

/// Overlap test parameterised by its tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapDetector {
    epsilon: f64,
}

impl Default for OverlapDetector {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl OverlapDetector {
    /// Create a detector; negative or non-finite tolerances clamp to zero.
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        let epsilon = if epsilon.is_finite() {
            epsilon.max(0.0)
        } else {
            0.0
        };
        Self { epsilon }
    }

    #[inline]
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Overlap test over possibly-absent placements.
    #[must_use]
    pub fn overlaps(&self, bb: &Rect, first: Option<&Rect>, second: Option<&Rect>) -> bool {
        match (first, second) {
            (Some(a), Some(b)) => self.rects_overlap(bb, a, b),
            _ => false,
        }
    }

    /// Overlap test for two placed rectangles.
    #[must_use]
    pub fn rects_overlap(&self, bb: &Rect, a: &Rect, b: &Rect) -> bool {
        if a.is_degenerate() || b.is_degenerate() {
            return false;
        }
        let x = intersect(
            bb.width() * self.epsilon,
            a.min_x(),
            a.max_x(),
            b.min_x(),
            b.max_x(),
        );
        let y = intersect(
            bb.height() * self.epsilon,
            a.min_y(),
            a.max_y(),
            b.min_y(),
            b.max_y(),
        );
        x && y
    }
}

#[inline]
fn intersect(tolerance: f64, m1: f64, big_m1: f64, m2: f64, big_m2: f64) -> bool {
    big_m1 - tolerance > m2 && big_m2 - tolerance > m1
}
