#![forbid(unsafe_code)]

//! Layout: assign every ranked word a rectangle (or leave it unplaced).
//!
//! # Role in semcloud
//! A layout strategy consumes the ranked words, their similarity map, and a
//! [`BoundingConstraint`], and produces a [`LayoutResult`] with exactly one
//! entry per input word. Strategies are a closed set selected by
//! [`LayoutKind`]; the pipeline never depends on a concrete packer.
//!
//! # Primary responsibilities
//! - **LayoutResult**: word → optional rectangle, immutable once returned.
//! - **BoundingConstraint**: maximum drawable area / width, enforced by
//!   uniform scaling after placement.
//! - **CancelToken**: cooperative cancellation polled inside packer loops.
//! - **Packers**: spiral (Wordle), similarity-seeded spiral, and shelf rows.

pub mod cancel;
pub mod constraint;
pub mod result;
pub mod shelf;
pub mod spiral;
pub mod strategy;

pub use cancel::CancelToken;
pub use constraint::BoundingConstraint;
pub use result::{LayoutResult, Placement};
pub use shelf::ShelfLayout;
pub use spiral::{ContextSpiralLayout, WordleLayout};
pub use strategy::{LayoutAlgo, LayoutKind};

use semcloud_text::TextError;

/// Errors raised while laying out words.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The run was cancelled through its [`CancelToken`].
    #[error("layout '{0}' was cancelled")]
    Cancelled(&'static str),
    /// A strategy name did not match any known packer.
    #[error("unknown layout strategy '{0}'")]
    UnknownStrategy(String),
    /// The similarity map did not cover a word being placed.
    #[error(transparent)]
    Text(#[from] TextError),
}
