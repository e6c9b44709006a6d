#![forbid(unsafe_code)]

//! Shelf (row) packing.
//!
//! Words go left to right in weight order into rows of a fixed target width;
//! a word that would overflow the row starts a new one below. The target
//! width is chosen so the packed block roughly matches `aspect`. Runs in
//! `O(n log n)` and always places every word, which makes it the fallback
//! when a spiral packer times out.

use semcloud_geom::Rect;
use semcloud_text::{SimilarityMap, Word};

use crate::LayoutError;
use crate::cancel::CancelToken;
use crate::result::LayoutResult;
use crate::strategy::{LayoutAlgo, weight_order};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfLayout {
    /// Gap between neighbouring words and rows.
    pub padding: f64,
    /// Target width / height ratio of the packed block.
    pub aspect: f64,
}

impl Default for ShelfLayout {
    fn default() -> Self {
        Self {
            padding: 1.0,
            aspect: 1.6,
        }
    }
}

impl ShelfLayout {
    fn target_width(&self, words: &[Word]) -> f64 {
        let area: f64 = words
            .iter()
            .map(|w| (w.width + self.padding) * (w.height + self.padding))
            .sum();
        let widest = words.iter().map(|w| w.width).fold(0.0, f64::max);
        (area * self.aspect.max(f64::EPSILON)).sqrt().max(widest)
    }
}

impl LayoutAlgo for ShelfLayout {
    fn name(&self) -> &'static str {
        "shelf"
    }

    fn place(
        &self,
        words: &[Word],
        _similarity: &SimilarityMap,
        cancel: &CancelToken,
    ) -> Result<LayoutResult, LayoutError> {
        let mut result = LayoutResult::new(words);
        let row_width = self.target_width(words);
        let (mut x, mut y, mut row_height) = (0.0_f64, 0.0_f64, 0.0_f64);

        for i in weight_order(words) {
            cancel.check(self.name())?;
            let word = &words[i];
            if x > 0.0 && x + word.width > row_width {
                x = 0.0;
                y += row_height + self.padding;
                row_height = 0.0;
            }
            result.place(&word.text, Rect::new(x, y, word.width, word.height));
            x += word.width + self.padding;
            row_height = row_height.max(word.height);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semcloud_text::FontScale;

    fn words(n: usize) -> Vec<Word> {
        let scale = FontScale::default();
        (0..n)
            .map(|i| Word::new(format!("term{i}"), 1.0 / (i + 1) as f64, &scale))
            .collect()
    }

    #[test]
    fn places_every_word_without_intersections() {
        let ws = words(40);
        let result = ShelfLayout::default()
            .place(&ws, &SimilarityMap::new(&ws), &CancelToken::new())
            .unwrap();
        assert_eq!(result.placed_count(), 40);
        let rects: Vec<&Rect> = result.placed_rects().collect();
        for i in 0..rects.len() {
            for j in i + 1..rects.len() {
                assert!(!rects[i].intersects(rects[j]));
            }
        }
    }

    #[test]
    fn rows_respect_target_width() {
        let ws = words(40);
        let shelf = ShelfLayout::default();
        let limit = shelf.target_width(&ws);
        let result = shelf
            .place(&ws, &SimilarityMap::new(&ws), &CancelToken::new())
            .unwrap();
        let bb = result.bounding_box().unwrap();
        assert!(bb.width() <= limit + 1e-9);
        assert!(bb.height() > 0.0);
    }

    #[test]
    fn empty_input_is_empty_result() {
        let result = ShelfLayout::default()
            .place(&[], &SimilarityMap::default(), &CancelToken::new())
            .unwrap();
        assert!(result.is_empty());
    }
}
