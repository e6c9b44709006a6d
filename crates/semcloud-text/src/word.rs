#![forbid(unsafe_code)]

//! Ranked words and unordered word pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TextError;
use crate::font::FontScale;

/// A ranked, sized term. Identity is its normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Rank score, normalized into `[0, 1]`.
    pub weight: f64,
    pub font_size: f64,
    /// Intrinsic box width at `font_size`.
    pub width: f64,
    /// Intrinsic box height at `font_size`.
    pub height: f64,
}

impl Word {
    /// Create a word sized by `scale`. Negative or non-finite weights clamp to 0.
    #[must_use]
    pub fn new(text: impl Into<String>, weight: f64, scale: &FontScale) -> Self {
        let text = text.into();
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        let font_size = scale.font_size(weight);
        let (width, height) = scale.extent(&text, font_size);
        Self {
            text,
            weight,
            font_size,
            width,
            height,
        }
    }

    /// Create a word with an explicit box, bypassing font scaling.
    #[must_use]
    pub fn with_extent(text: impl Into<String>, weight: f64, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            weight: weight.max(0.0),
            font_size: height,
            width,
            height,
        }
    }

    /// Area of the intrinsic box.
    #[inline]
    #[must_use]
    pub fn intended_area(&self) -> f64 {
        (self.width * self.height).max(0.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Unordered pair of two distinct words, stored in lexical order so that
/// `(a, b)` and `(b, a)` hash and compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordPair {
    first: String,
    second: String,
}

impl WordPair {
    /// Build a pair; fails when both sides are the same word.
    pub fn new(a: &str, b: &str) -> Result<Self, TextError> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Ok(Self {
                first: a.to_owned(),
                second: b.to_owned(),
            }),
            std::cmp::Ordering::Greater => Ok(Self {
                first: b.to_owned(),
                second: a.to_owned(),
            }),
            std::cmp::Ordering::Equal => Err(TextError::SelfPair(a.to_owned())),
        }
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    /// True when `text` is one side of the pair.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.first == text || self.second == text
    }
}
