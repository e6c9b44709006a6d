#![forbid(unsafe_code)]

//! Geometry kernel: rectangles, bounding boxes, and the overlap detector.
//!
//! # Role in semcloud
//! Every other crate places or scores axis-aligned rectangles. This crate
//! owns the numeric rules they share so that a layout strategy and the
//! quality metrics agree on what "overlapping" means.
//!
//! # Primary responsibilities
//! - **Rect**: finite `f64` rectangle with derived extents.
//! - **bounding_box**: minimal enclosing rectangle of a non-empty sequence.
//! - **OverlapDetector**: tolerance-aware intersection test.
//! - **hull**: convex hull area for space-usage scoring.

pub mod geometry;
pub mod hull;
pub mod overlap;

pub use geometry::{Point, Rect, bounding_box};
pub use hull::{convex_hull, hull_area, polygon_area};
pub use overlap::{DEFAULT_EPSILON, OverlapDetector};

/// Errors raised by geometry helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeomError {
    /// A bounding box was requested over zero rectangles.
    #[error("bounding box requested over zero rectangles")]
    EmptyInput,
}
