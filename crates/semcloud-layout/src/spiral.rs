#![forbid(unsafe_code)]

//! Spiral packers.
//!
//! Words are placed one at a time in weight order. Each word walks an
//! Archimedean spiral `r = radius_step · θ` (stretched horizontally by
//! `aspect`) from its start point and takes the first position whose padded
//! box does not intersect any placed word. A word that finds no free spot
//! within `max_steps` stays unplaced.
//!
//! - [`WordleLayout`] starts every spiral at the origin.
//! - [`ContextSpiralLayout`] starts each spiral at the similarity-weighted
//!   centroid of the words already placed, so related words end up close.

use tracing::trace;

use semcloud_geom::{Point, Rect};
use semcloud_text::{SimilarityMap, Word};

use crate::LayoutError;
use crate::cancel::CancelToken;
use crate::result::LayoutResult;
use crate::strategy::{LayoutAlgo, weight_order};

/// Steps between cancellation polls.
const CANCEL_POLL: usize = 256;

/// Spiral walk parameters (world units / radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    pub angle_step: f64,
    pub radius_step: f64,
    pub max_steps: usize,
    /// Minimum clearance kept around every placed word.
    pub padding: f64,
    /// Horizontal stretch of the spiral; > 1 favours wide clouds.
    pub aspect: f64,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            angle_step: 0.1,
            radius_step: 0.5,
            max_steps: 40_000,
            padding: 1.0,
            aspect: 1.5,
        }
    }
}

impl SpiralParams {
    /// First free box of size `w × h` along the spiral from `start`.
    fn search(
        &self,
        start: Point,
        w: f64,
        h: f64,
        placed: &[Rect],
        cancel: &CancelToken,
        strategy: &'static str,
    ) -> Result<Option<Rect>, LayoutError> {
        for step in 0..self.max_steps {
            if step % CANCEL_POLL == 0 {
                cancel.check(strategy)?;
            }
            let theta = step as f64 * self.angle_step;
            let r = self.radius_step * theta;
            let p = Point::new(
                start.x + self.aspect * r * theta.cos(),
                start.y + r * theta.sin(),
            );
            let candidate = Rect::centered(p, w, h);
            let padded = candidate.inflated(self.padding);
            if !placed.iter().any(|q| padded.intersects(q)) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

fn place_along_spiral<F>(
    words: &[Word],
    params: &SpiralParams,
    cancel: &CancelToken,
    strategy: &'static str,
    mut start_for: F,
) -> Result<LayoutResult, LayoutError>
where
    F: FnMut(&Word, &[(usize, Rect)]) -> Result<Point, LayoutError>,
{
    let mut result = LayoutResult::new(words);
    let mut placed: Vec<(usize, Rect)> = Vec::with_capacity(words.len());
    let mut rects: Vec<Rect> = Vec::with_capacity(words.len());

    for i in weight_order(words) {
        let word = &words[i];
        let start = start_for(word, &placed)?;
        match params.search(start, word.width, word.height, &rects, cancel, strategy)? {
            Some(rect) => {
                result.place(&word.text, rect);
                placed.push((i, rect));
                rects.push(rect);
            }
            None => trace!(strategy, word = %word.text, "no free position on spiral"),
        }
    }
    Ok(result)
}

/// Classic Wordle-style spiral placement from the centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordleLayout {
    pub spiral: SpiralParams,
}

impl LayoutAlgo for WordleLayout {
    fn name(&self) -> &'static str {
        "wordle"
    }

    fn place(
        &self,
        words: &[Word],
        _similarity: &SimilarityMap,
        cancel: &CancelToken,
    ) -> Result<LayoutResult, LayoutError> {
        place_along_spiral(words, &self.spiral, cancel, self.name(), |_, _| {
            Ok(Point::default())
        })
    }
}

/// Spiral placement seeded near the words each word is most similar to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSpiralLayout {
    pub spiral: SpiralParams,
}

impl LayoutAlgo for ContextSpiralLayout {
    fn name(&self) -> &'static str {
        "context-spiral"
    }

    fn place(
        &self,
        words: &[Word],
        similarity: &SimilarityMap,
        cancel: &CancelToken,
    ) -> Result<LayoutResult, LayoutError> {
        place_along_spiral(words, &self.spiral, cancel, self.name(), |word, placed| {
            let mut total = 0.0;
            let (mut x, mut y) = (0.0, 0.0);
            for (j, rect) in placed {
                let other = &words[*j];
                if other.text == word.text {
                    continue;
                }
                let s = similarity.get(&word.text, &other.text)?;
                let c = rect.center();
                x += s * c.x;
                y += s * c.y;
                total += s;
            }
            if total > 0.0 {
                Ok(Point::new(x / total, y / total))
            } else {
                Ok(Point::default())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semcloud_text::{FontScale, TextError};

    fn words(n: usize) -> Vec<Word> {
        let scale = FontScale::default();
        (0..n)
            .map(|i| Word::new(format!("word{i:02}"), 1.0 / (i + 1) as f64, &scale))
            .collect()
    }

    fn assert_disjoint(result: &LayoutResult) {
        let rects: Vec<&Rect> = result.placed_rects().collect();
        for i in 0..rects.len() {
            for j in i + 1..rects.len() {
                assert!(!rects[i].intersects(rects[j]), "{i} vs {j}");
            }
        }
    }

    #[test]
    fn wordle_places_everything_disjoint() {
        let ws = words(30);
        let sim = SimilarityMap::new(&ws);
        let result = WordleLayout::default()
            .place(&ws, &sim, &CancelToken::new())
            .unwrap();
        assert_eq!(result.len(), 30);
        assert_eq!(result.placed_count(), 30);
        assert_disjoint(&result);
    }

    #[test]
    fn heaviest_word_sits_at_origin() {
        let ws = words(5);
        let sim = SimilarityMap::new(&ws);
        let result = WordleLayout::default()
            .place(&ws, &sim, &CancelToken::new())
            .unwrap();
        let first = result.rect_of("word00").unwrap();
        assert_eq!(first.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn tiny_step_budget_leaves_words_unplaced() {
        let ws = words(10);
        let sim = SimilarityMap::new(&ws);
        let layout = WordleLayout {
            spiral: SpiralParams {
                max_steps: 1,
                ..SpiralParams::default()
            },
        };
        let result = layout.place(&ws, &sim, &CancelToken::new()).unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result.placed_count(), 1);
    }

    #[test]
    fn context_spiral_pulls_similar_words_together() {
        let scale = FontScale::default();
        let ws = vec![
            Word::new("anchor", 1.0, &scale),
            Word::new("left", 0.9, &scale),
            Word::new("right", 0.8, &scale),
            Word::new("friend", 0.7, &scale),
        ];
        let mut sim = SimilarityMap::new(&ws);
        sim.insert("friend", "right", 1.0).unwrap();
        let result = ContextSpiralLayout::default()
            .place(&ws, &sim, &CancelToken::new())
            .unwrap();
        assert_eq!(result.placed_count(), 4);
        assert_disjoint(&result);
        let friend = result.rect_of("friend").unwrap().center();
        let right = result.rect_of("right").unwrap().center();
        let left = result.rect_of("left").unwrap().center();
        assert!(friend.distance(right) <= friend.distance(left));
    }

    #[test]
    fn context_spiral_reports_unknown_words() {
        let scale = FontScale::default();
        let ws = vec![Word::new("alpha", 1.0, &scale), Word::new("beta", 0.5, &scale)];
        let sim = SimilarityMap::new(&ws[..1]);
        let err = ContextSpiralLayout::default()
            .place(&ws, &sim, &CancelToken::new())
            .unwrap_err();
        assert_eq!(err, LayoutError::Text(TextError::UnknownWord("beta".into())));
    }
}
