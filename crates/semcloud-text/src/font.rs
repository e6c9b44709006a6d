#![forbid(unsafe_code)]

//! Weight → font size → intrinsic word box.

use serde::{Deserialize, Serialize};

/// Monotonic mapping from a normalized weight to a font size and box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontScale {
    /// Font size for weight 0.
    pub min_size: f64,
    /// Font size for weight 1.
    pub max_size: f64,
    /// Average glyph advance as a fraction of the font size.
    pub glyph_aspect: f64,
}

impl Default for FontScale {
    fn default() -> Self {
        Self {
            min_size: 10.0,
            max_size: 40.0,
            glyph_aspect: 0.6,
        }
    }
}

impl FontScale {
    /// Font size for a weight in `[0, 1]`; out-of-range weights clamp.
    #[must_use]
    pub fn font_size(&self, weight: f64) -> f64 {
        let w = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.min_size + (self.max_size - self.min_size) * w.sqrt()
    }

    /// Intrinsic `(width, height)` of `text` rendered at `font_size`.
    #[must_use]
    pub fn extent(&self, text: &str, font_size: f64) -> (f64, f64) {
        let glyphs = text.chars().count().max(1) as f64;
        (glyphs * font_size * self.glyph_aspect, font_size)
    }
}
