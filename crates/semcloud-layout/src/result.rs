#![forbid(unsafe_code)]

//! Layout output: one optional rectangle per word.
//!
//! # Invariants
//!
//! 1. **Complete**: a result built with [`LayoutResult::new`] has an entry for
//!    every input word, in input order; placing never adds or removes entries.
//! 2. **Absent is valid**: `None` means the word was not placed and every
//!    consumer treats it as excluded.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use semcloud_geom::{GeomError, Point, Rect, bounding_box};
use semcloud_text::Word;

/// A word and where it landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub word: String,
    pub rect: Option<Rect>,
}

/// Word → optional rectangle, in input word order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    entries: Vec<Placement>,
    index: FxHashMap<String, usize>,
}

impl LayoutResult {
    /// Result with every word unplaced.
    #[must_use]
    pub fn new(words: &[Word]) -> Self {
        let mut index = FxHashMap::default();
        let entries = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                index.entry(w.text.clone()).or_insert(i);
                Placement {
                    word: w.text.clone(),
                    rect: None,
                }
            })
            .collect();
        Self { entries, index }
    }

    /// Build from explicit placements (used by callers that lay out
    /// externally and by tests).
    #[must_use]
    pub fn from_placements<I, S>(placements: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<Rect>)>,
        S: Into<String>,
    {
        let mut out = Self::default();
        for (word, rect) in placements {
            let word = word.into();
            let i = out.entries.len();
            out.index.entry(word.clone()).or_insert(i);
            out.entries.push(Placement { word, rect });
        }
        out
    }

    /// Record a rectangle for `word`; returns false for unknown words.
    pub fn place(&mut self, word: &str, rect: Rect) -> bool {
        match self.index.get(word) {
            Some(&i) => {
                self.entries[i].rect = Some(rect);
                true
            }
            None => false,
        }
    }

    /// Rectangle of `word`, if it was placed.
    #[must_use]
    pub fn rect_of(&self, word: &str) -> Option<&Rect> {
        self.index
            .get(word)
            .and_then(|&i| self.entries[i].rect.as_ref())
    }

    /// True when the result has an entry (placed or not) for `word`.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// True when every word in `words` has an entry.
    #[must_use]
    pub fn covers(&self, words: &[Word]) -> bool {
        words.iter().all(|w| self.contains(&w.text))
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter()
    }

    /// Placed rectangles only.
    pub fn placed_rects(&self) -> impl Iterator<Item = &Rect> {
        self.entries.iter().filter_map(|p| p.rect.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.placed_rects().count()
    }

    /// Bounding box of placed rectangles; `EmptyInput` when none are placed.
    pub fn bounding_box(&self) -> Result<Rect, GeomError> {
        bounding_box(self.placed_rects())
    }

    /// Scale every placed rectangle by `factor` about `origin`.
    pub fn scale_about(&mut self, origin: Point, factor: f64) {
        for p in &mut self.entries {
            if let Some(r) = p.rect.as_mut() {
                *r = r.scaled_about(origin, factor);
            }
        }
    }
}
