#![forbid(unsafe_code)]

//! Layout strategy contract and the registry of concrete packers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use semcloud_text::{SimilarityMap, Word};

use crate::LayoutError;
use crate::cancel::CancelToken;
use crate::constraint::BoundingConstraint;
use crate::result::LayoutResult;
use crate::shelf::ShelfLayout;
use crate::spiral::{ContextSpiralLayout, WordleLayout};

/// Capability: assign rectangles to words.
///
/// Implementors provide [`place`](Self::place); callers use
/// [`layout`](Self::layout), which wraps placement with the bounding
/// constraint and the completeness check.
pub trait LayoutAlgo: Send + Sync {
    /// Stable strategy name for logs and errors.
    fn name(&self) -> &'static str;

    /// Place words at their intrinsic sizes. Must return an entry for every
    /// word and should poll `cancel` inside long loops.
    fn place(
        &self,
        words: &[Word],
        similarity: &SimilarityMap,
        cancel: &CancelToken,
    ) -> Result<LayoutResult, LayoutError>;

    /// Place, then scale the result into `constraint`.
    fn layout(
        &self,
        words: &[Word],
        similarity: &SimilarityMap,
        constraint: &BoundingConstraint,
        cancel: &CancelToken,
    ) -> Result<LayoutResult, LayoutError> {
        let _span = tracing::debug_span!("layout", strategy = self.name(), words = words.len())
            .entered();
        cancel.check(self.name())?;
        let mut result = self.place(words, similarity, cancel)?;
        debug_assert!(result.covers(words), "{} dropped words", self.name());

        if let Some(factor) = constraint.enforce(&mut result) {
            warn!(
                strategy = self.name(),
                factor,
                max_area = constraint.max_area,
                "layout exceeded bounding constraint; scaled down"
            );
        }
        debug!(
            placed = result.placed_count(),
            unplaced = result.len() - result.placed_count(),
            "layout finished"
        );
        Ok(result)
    }
}

/// Closed set of layout strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Weight-ordered Archimedean spiral from the centre.
    Wordle,
    /// Spiral seeded at the similarity-weighted centroid of placed words.
    ContextSpiral,
    /// Row packing; fast and used as the timeout fallback.
    Shelf,
}

impl LayoutKind {
    pub const ALL: [Self; 3] = [Self::Wordle, Self::ContextSpiral, Self::Shelf];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wordle => "wordle",
            Self::ContextSpiral => "context-spiral",
            Self::Shelf => "shelf",
        }
    }

    /// Strategy to retry with when this one times out.
    #[must_use]
    pub const fn fallback(self) -> Option<Self> {
        match self {
            Self::Shelf => None,
            Self::Wordle | Self::ContextSpiral => Some(Self::Shelf),
        }
    }

    #[must_use]
    pub fn build(self) -> Box<dyn LayoutAlgo> {
        match self {
            Self::Wordle => Box::new(WordleLayout::default()),
            Self::ContextSpiral => Box::new(ContextSpiralLayout::default()),
            Self::Shelf => Box::new(ShelfLayout::default()),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "wordle" | "spiral" => Ok(Self::Wordle),
            "context-spiral" | "context" | "star" => Ok(Self::ContextSpiral),
            "shelf" | "rows" => Ok(Self::Shelf),
            _ => Err(LayoutError::UnknownStrategy(s.to_owned())),
        }
    }
}

/// Indices of `words` sorted by weight descending, ties by text.
pub(crate) fn weight_order(words: &[Word]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..words.len()).collect();
    order.sort_by(|&a, &b| {
        words[b]
            .weight
            .total_cmp(&words[a].weight)
            .then_with(|| words[a].text.cmp(&words[b].text))
    });
    order
}
