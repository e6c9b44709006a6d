#![forbid(unsafe_code)]

//! The metric functions.
//!
//! | Metric | Range | Meaning |
//! |--------|-------|---------|
//! | `overlap` | {0, 1} | 1 if any two placed words overlap beyond tolerance |
//! | `space` | [0, 1] | word area / bounding-box area (denser is higher) |
//! | `space_hull` | [0, 1] | word area / convex-hull area |
//! | `total_weight` | [0, ∞) | sum of similarity over evaluated word pairs |
//! | `adjacency` | [0, 1] | similarity on adjacent pairs / `total_weight` |
//! | `distortion` | [0, 1) | spread of area ratios placed/intended (0 = none) |
//! | `aspect_ratio` | [0, 1] | short side / long side of the bounding box |
//! | `uniformity` | (0, 1] | `1 / (1 + cv)` of placed areas |

use semcloud_geom::hull_area;

use crate::context::MetricContext;

/// 1.0 when any unordered pair of placed words overlaps, else 0.0.
///
/// Scans all pairs; the first hit returns.
#[must_use]
pub fn overlap(ctx: &MetricContext<'_>) -> f64 {
    let Some(bb) = ctx.bounding_box() else {
        return 0.0;
    };
    let detector = ctx.overlap_detector();
    let placed = ctx.placed();
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if detector.rects_overlap(&bb, &a.rect, &b.rect) {
                return 1.0;
            }
        }
    }
    0.0
}

fn covered_area(ctx: &MetricContext<'_>) -> f64 {
    ctx.placed().iter().map(|p| p.rect.area()).sum()
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() && denominator.is_finite() {
        (numerator / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Packing density against the bounding box.
#[must_use]
pub fn space(ctx: &MetricContext<'_>) -> f64 {
    match ctx.bounding_box() {
        Some(bb) => ratio(covered_area(ctx), bb.area()),
        None => 0.0,
    }
}

/// Packing density against the convex hull of all word corners.
#[must_use]
pub fn space_hull(ctx: &MetricContext<'_>) -> f64 {
    if ctx.placed().is_empty() {
        return 0.0;
    }
    let hull = hull_area(ctx.placed().iter().map(|p| &p.rect));
    ratio(covered_area(ctx), hull)
}

/// Sum of similarity over every stored pair of evaluated words.
#[must_use]
pub fn total_weight(ctx: &MetricContext<'_>) -> f64 {
    ctx.similarity
        .iter()
        .filter(|(pair, _)| ctx.has_word(pair.first()) && ctx.has_word(pair.second()))
        .map(|(_, s)| s)
        .sum()
}

/// Share of similarity weight realised by geometrically adjacent pairs.
///
/// Two placed words are adjacent when their gap on each axis is at most
/// `adjacency_epsilon` times the bounding-box extent on that axis.
#[must_use]
pub fn adjacency(ctx: &MetricContext<'_>) -> f64 {
    let Some(bb) = ctx.bounding_box() else {
        return 0.0;
    };
    let total = total_weight(ctx);
    if total <= 0.0 {
        return 0.0;
    }
    let tol_x = ctx.params.adjacency_epsilon * bb.width();
    let tol_y = ctx.params.adjacency_epsilon * bb.height();
    let placed = ctx.placed();

    let mut realised = 0.0;
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if a.rect.gap_x(&b.rect) <= tol_x && a.rect.gap_y(&b.rect) <= tol_y {
                realised += ctx
                    .similarity
                    .get(&a.word.text, &b.word.text)
                    .unwrap_or(0.0);
            }
        }
    }
    ratio(realised, total)
}

/// How unevenly words were resized relative to their intended boxes.
///
/// Uses `ρ_i = placed area / intended area`, normalised by the mean ratio so
/// a uniform rescale of the whole cloud is not distortion. The mean absolute
/// deviation `d` maps to `d / (1 + d)`.
#[must_use]
pub fn distortion(ctx: &MetricContext<'_>) -> f64 {
    let ratios: Vec<f64> = ctx
        .placed()
        .iter()
        .filter(|p| p.word.intended_area() > 0.0)
        .map(|p| p.rect.area() / p.word.intended_area())
        .collect();
    if ratios.is_empty() {
        return 0.0;
    }
    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    if mean <= 0.0 || !mean.is_finite() {
        return 0.0;
    }
    let deviation =
        ratios.iter().map(|r| (1.0 - r / mean).abs()).sum::<f64>() / ratios.len() as f64;
    deviation / (1.0 + deviation)
}

/// Short side over long side of the bounding box.
#[must_use]
pub fn aspect_ratio(ctx: &MetricContext<'_>) -> f64 {
    ctx.bounding_box().map_or(0.0, |bb| bb.squareness())
}

/// `1 / (1 + cv)` where `cv` is the coefficient of variation of placed areas.
#[must_use]
pub fn uniformity(ctx: &MetricContext<'_>) -> f64 {
    let areas: Vec<f64> = ctx.placed().iter().map(|p| p.rect.area()).collect();
    if areas.is_empty() {
        return 0.0;
    }
    let n = areas.len() as f64;
    let mean = areas.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = areas.iter().map(|a| (a - mean) * (a - mean)).sum::<f64>() / n;
    let cv = variance.sqrt() / mean;
    1.0 / (1.0 + cv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MetricParams;
    use semcloud_geom::Rect;
    use semcloud_layout::LayoutResult;
    use semcloud_text::{SimilarityMap, Word};

    fn words() -> Vec<Word> {
        vec![
            Word::with_extent("a", 10.0, 100.0, 50.0),
            Word::with_extent("b", 5.0, 100.0, 50.0),
        ]
    }

    fn similarity(words: &[Word]) -> SimilarityMap {
        let mut sim = SimilarityMap::new(words);
        sim.insert("a", "b", 0.8).unwrap();
        sim
    }

    fn eval(layout: &LayoutResult, f: fn(&MetricContext<'_>) -> f64) -> f64 {
        let ws = words();
        let sim = similarity(&ws);
        let ctx = MetricContext::new(&ws, &sim, layout, MetricParams::default());
        f(&ctx)
    }

    fn apart() -> LayoutResult {
        LayoutResult::from_placements([
            ("a", Some(Rect::new(0.0, 0.0, 100.0, 50.0))),
            ("b", Some(Rect::new(200.0, 0.0, 100.0, 50.0))),
        ])
    }

    fn overlapping() -> LayoutResult {
        LayoutResult::from_placements([
            ("a", Some(Rect::new(0.0, 0.0, 100.0, 50.0))),
            ("b", Some(Rect::new(50.0, 0.0, 100.0, 50.0))),
        ])
    }

    fn touching() -> LayoutResult {
        LayoutResult::from_placements([
            ("a", Some(Rect::new(0.0, 0.0, 100.0, 50.0))),
            ("b", Some(Rect::new(100.0, 0.0, 100.0, 50.0))),
        ])
    }

    fn empty() -> LayoutResult {
        LayoutResult::from_placements([("a", None::<Rect>), ("b", None)])
    }

    #[test]
    fn stacked_words_smaller_than_tolerance_are_not_overlap() {
        // X tolerance is 0.005 * 1000 = 5, wider than either 4x4 word.
        let ws = vec![
            Word::with_extent("banner", 1.0, 1000.0, 50.0),
            Word::with_extent("dot", 0.1, 4.0, 4.0),
            Word::with_extent("tick", 0.1, 4.0, 4.0),
        ];
        let sim = SimilarityMap::new(&ws);
        let layout = LayoutResult::from_placements([
            ("banner", Some(Rect::new(0.0, 0.0, 1000.0, 50.0))),
            ("dot", Some(Rect::new(0.0, 100.0, 4.0, 4.0))),
            ("tick", Some(Rect::new(0.0, 100.0, 4.0, 4.0))),
        ]);
        let ctx = MetricContext::new(&ws, &sim, &layout, MetricParams::default());
        assert_eq!(overlap(&ctx), 0.0);
    }

    #[test]
    fn overlap_scenarios() {
        assert_eq!(eval(&apart(), overlap), 0.0);
        assert_eq!(eval(&overlapping(), overlap), 1.0);
        assert_eq!(eval(&touching(), overlap), 0.0);
        assert_eq!(eval(&empty(), overlap), 0.0);
    }

    #[test]
    fn overlap_ignores_unplaced_words() {
        let layout = LayoutResult::from_placements([
            ("a", Some(Rect::new(0.0, 0.0, 100.0, 50.0))),
            ("b", None),
        ]);
        assert_eq!(eval(&layout, overlap), 0.0);
    }

    #[test]
    fn space_is_density() {
        assert!((eval(&apart(), space) - 10_000.0 / 15_000.0).abs() < 1e-12);
        assert_eq!(eval(&touching(), space), 1.0);
        assert_eq!(eval(&empty(), space), 0.0);
        assert_eq!(eval(&touching(), space_hull), 1.0);
        assert_eq!(eval(&empty(), space_hull), 0.0);
    }

    #[test]
    fn adjacency_counts_touching_similar_pairs() {
        assert!((eval(&touching(), total_weight) - 0.8).abs() < 1e-12);
        assert_eq!(eval(&touching(), adjacency), 1.0);
        assert_eq!(eval(&apart(), adjacency), 0.0);
        assert_eq!(eval(&empty(), adjacency), 0.0);
    }

    #[test]
    fn distortion_ignores_uniform_scale() {
        let scaled = LayoutResult::from_placements([
            ("a", Some(Rect::new(0.0, 0.0, 50.0, 25.0))),
            ("b", Some(Rect::new(100.0, 0.0, 50.0, 25.0))),
        ]);
        assert_eq!(eval(&scaled, distortion), 0.0);
        let uneven = LayoutResult::from_placements([
            ("a", Some(Rect::new(0.0, 0.0, 100.0, 50.0))),
            ("b", Some(Rect::new(200.0, 0.0, 50.0, 25.0))),
        ]);
        let d = eval(&uneven, distortion);
        assert!(d > 0.0 && d < 1.0);
        assert_eq!(eval(&empty(), distortion), 0.0);
    }

    #[test]
    fn aspect_ratio_of_bounding_box() {
        assert!((eval(&apart(), aspect_ratio) - 50.0 / 300.0).abs() < 1e-12);
        assert_eq!(eval(&empty(), aspect_ratio), 0.0);
    }

    #[test]
    fn uniformity_of_equal_areas_is_one() {
        assert_eq!(eval(&apart(), uniformity), 1.0);
        let uneven = LayoutResult::from_placements([
            ("a", Some(Rect::new(0.0, 0.0, 100.0, 50.0))),
            ("b", Some(Rect::new(200.0, 0.0, 10.0, 5.0))),
        ]);
        let u = eval(&uneven, uniformity);
        assert!(u > 0.0 && u < 1.0);
        assert_eq!(eval(&empty(), uniformity), 0.0);
    }
}
