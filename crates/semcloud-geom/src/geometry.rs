#![forbid(unsafe_code)]

//! Axis-aligned rectangles in layout space.
//!
//! Coordinates are abstract world units (`f64`), not pixels. A rectangle with
//! `width <= 0` or `height <= 0` is *degenerate*: it is a valid value and every
//! helper accepts it, but it never overlaps anything.

use serde::{Deserialize, Serialize};

use crate::GeomError;

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle anchored at its minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its minimum corner and size.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size centred on `center`.
    #[inline]
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.x
    }

    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Area; zero for degenerate rectangles.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// True when either extent is non-positive.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The four corners, counter-clockwise from the minimum corner.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ]
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.min_x().min(other.min_x());
        let y = self.min_y().min(other.min_y());
        let right = self.max_x().max(other.max_x());
        let bottom = self.max_y().max(other.max_y());
        Self::new(x, y, right - x, bottom - y)
    }

    /// Scale position and size by `factor` about `origin`.
    #[must_use]
    pub fn scaled_about(&self, origin: Point, factor: f64) -> Self {
        Self::new(
            origin.x + (self.x - origin.x) * factor,
            origin.y + (self.y - origin.y) * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Strict intersection with positive shared area (touching edges do not count).
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_degenerate()
            && !other.is_degenerate()
            && self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Grow by `margin` on every side.
    #[inline]
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Gap between the two rectangles along X (zero when the ranges meet).
    #[inline]
    #[must_use]
    pub fn gap_x(&self, other: &Self) -> f64 {
        (self.min_x().max(other.min_x()) - self.max_x().min(other.max_x())).max(0.0)
    }

    /// Gap between the two rectangles along Y (zero when the ranges meet).
    #[inline]
    #[must_use]
    pub fn gap_y(&self, other: &Self) -> f64 {
        (self.min_y().max(other.min_y()) - self.max_y().min(other.max_y())).max(0.0)
    }

    /// Width / height ratio folded into `[0, 1]`; zero when degenerate.
    #[must_use]
    pub fn squareness(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.width.min(self.height) / self.width.max(self.height)
    }
}

/// Minimal rectangle enclosing every rectangle in `rects`.
///
/// Callers drop unplaced words before calling; an empty sequence is an error
/// rather than a zero-sized box at the origin.
pub fn bounding_box<'a, I>(rects: I) -> Result<Rect, GeomError>
where
    I: IntoIterator<Item = &'a Rect>,
{
    let mut iter = rects.into_iter();
    let first = *iter.next().ok_or(GeomError::EmptyInput)?;
    Ok(iter.fold(first, |acc, r| acc.union(r)))
}
