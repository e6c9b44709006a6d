#![forbid(unsafe_code)]

//! Shared, read-only inputs handed to every metric.

use std::collections::BTreeSet;

use semcloud_geom::{DEFAULT_EPSILON, OverlapDetector, Rect};
use semcloud_layout::LayoutResult;
use semcloud_text::{SimilarityMap, Word};

/// Tolerances used by the geometric metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricParams {
    /// Relative slack below which rectangles count as touching, not overlapping.
    pub overlap_epsilon: f64,
    /// Relative gap up to which two rectangles count as adjacent.
    pub adjacency_epsilon: f64,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            overlap_epsilon: DEFAULT_EPSILON,
            adjacency_epsilon: 0.05,
        }
    }
}

/// A placed word: the word and its rectangle.
#[derive(Debug, Clone, Copy)]
pub struct PlacedWord<'a> {
    pub word: &'a Word,
    pub rect: Rect,
}

/// Borrowed metric inputs plus values derived once per evaluation.
#[derive(Debug)]
pub struct MetricContext<'a> {
    pub words: &'a [Word],
    pub similarity: &'a SimilarityMap,
    pub params: MetricParams,
    placed: Vec<PlacedWord<'a>>,
    bounding_box: Option<Rect>,
    word_set: BTreeSet<&'a str>,
}

impl<'a> MetricContext<'a> {
    #[must_use]
    pub fn new(
        words: &'a [Word],
        similarity: &'a SimilarityMap,
        layout: &'a LayoutResult,
        params: MetricParams,
    ) -> Self {
        let mut placed: Vec<PlacedWord<'a>> = words
            .iter()
            .filter_map(|word| {
                layout
                    .rect_of(&word.text)
                    .map(|rect| PlacedWord { word, rect: *rect })
            })
            .collect();
        placed.sort_by(|a, b| a.word.text.cmp(&b.word.text));
        placed.dedup_by(|a, b| a.word.text == b.word.text);

        let bounding_box = semcloud_geom::bounding_box(placed.iter().map(|p| &p.rect)).ok();
        let word_set = words.iter().map(|w| w.text.as_str()).collect();
        Self {
            words,
            similarity,
            params,
            placed,
            bounding_box,
            word_set,
        }
    }

    /// Placed words in text order.
    #[must_use]
    pub fn placed(&self) -> &[PlacedWord<'a>] {
        &self.placed
    }

    /// Bounding box of placed words; `None` when nothing is placed.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        self.bounding_box
    }

    #[must_use]
    pub fn overlap_detector(&self) -> OverlapDetector {
        OverlapDetector::new(self.params.overlap_epsilon)
    }

    /// True when `text` is one of the evaluated words.
    #[must_use]
    pub fn has_word(&self, text: &str) -> bool {
        self.word_set.contains(text)
    }
}
