//! Property-based contract tests shared by every layout strategy.
//!
//! 1. Completeness: one entry per input word, never fewer.
//! 2. Bounding constraint: the placed bounding box never exceeds it.
//! 3. Placed words are pairwise disjoint.
//! 4. Determinism: identical inputs give identical layouts.

use proptest::prelude::*;
use semcloud_layout::{BoundingConstraint, CancelToken, LayoutKind};
use semcloud_text::{FontScale, SimilarityMap, Word};

// ── Helpers ─────────────────────────────────────────────────────────────

fn kind_strategy() -> impl Strategy<Value = LayoutKind> {
    prop_oneof![
        Just(LayoutKind::Wordle),
        Just(LayoutKind::ContextSpiral),
        Just(LayoutKind::Shelf),
    ]
}

fn words_strategy() -> impl Strategy<Value = Vec<Word>> {
    proptest::collection::vec((1usize..12, 0.0f64..=1.0), 0..25).prop_map(|specs| {
        let scale = FontScale::default();
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (len, weight))| {
                let text = format!("{}{i}", "w".repeat(len));
                Word::new(text, weight, &scale)
            })
            .collect()
    })
}

fn similarity_for(words: &[Word], seed: u64) -> SimilarityMap {
    let mut map = SimilarityMap::new(words);
    for (i, a) in words.iter().enumerate() {
        for (j, b) in words.iter().enumerate().skip(i + 1) {
            let s = ((seed.wrapping_add((i * 31 + j * 17) as u64)) % 100) as f64 / 100.0;
            map.insert(&a.text, &b.text, s).unwrap();
        }
    }
    map
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_word_gets_an_entry(
        words in words_strategy(),
        kind in kind_strategy(),
        seed in any::<u64>(),
    ) {
        let sim = similarity_for(&words, seed);
        let result = kind
            .build()
            .layout(&words, &sim, &BoundingConstraint::default(), &CancelToken::new())
            .unwrap();
        prop_assert_eq!(result.len(), words.len());
        prop_assert!(result.covers(&words));
    }

    #[test]
    fn bounding_constraint_is_respected(
        words in words_strategy(),
        kind in kind_strategy(),
        max_area in 100.0f64..50_000.0,
    ) {
        let sim = similarity_for(&words, 7);
        let constraint = BoundingConstraint::area(max_area);
        let result = kind
            .build()
            .layout(&words, &sim, &constraint, &CancelToken::new())
            .unwrap();
        if let Ok(bb) = result.bounding_box() {
            prop_assert!(bb.area() <= max_area, "{} > {}", bb.area(), max_area);
        }
    }

    #[test]
    fn placed_words_are_disjoint(words in words_strategy(), kind in kind_strategy()) {
        let sim = similarity_for(&words, 3);
        let result = kind
            .build()
            .layout(&words, &sim, &BoundingConstraint::area(1e12), &CancelToken::new())
            .unwrap();
        let rects: Vec<_> = result.placed_rects().collect();
        for i in 0..rects.len() {
            for j in i + 1..rects.len() {
                prop_assert!(!rects[i].intersects(rects[j]));
            }
        }
    }

    #[test]
    fn layout_is_deterministic(words in words_strategy(), kind in kind_strategy()) {
        let sim = similarity_for(&words, 11);
        let algo = kind.build();
        let a = algo.layout(&words, &sim, &BoundingConstraint::default(), &CancelToken::new()).unwrap();
        let b = algo.layout(&words, &sim, &BoundingConstraint::default(), &CancelToken::new()).unwrap();
        prop_assert_eq!(a, b);
    }
}
