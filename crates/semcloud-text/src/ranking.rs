#![forbid(unsafe_code)]

//! Word ranking strategies.
//!
//! A strategy assigns every document term a raw score; [`RankingAlgo::rank`]
//! turns those scores into the ranked word list shared by every strategy:
//!
//! 1. sort by score descending, ties by text ascending,
//! 2. truncate to the caller's maximum word count,
//! 3. normalize weights by the top score into `(0, 1]`,
//! 4. size each word through the [`FontScale`].
//!
//! All strategies are deterministic for identical text.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TextError;
use crate::document::Document;
use crate::font::FontScale;
use crate::word::Word;

/// Damping factor for the LexRank random walk.
const DAMPING: f64 = 0.85;
const MAX_ITERATIONS: usize = 100;
const CONVERGENCE: f64 = 1e-6;

/// Capability: score the terms of a document.
pub trait RankingAlgo: Send + Sync {
    /// Stable strategy name for logs.
    fn name(&self) -> &'static str;

    /// Raw, non-negative score for every distinct term.
    fn scores(&self, doc: &Document) -> BTreeMap<String, f64>;

    /// Ranked, truncated, normalized, sized words.
    fn rank(&self, doc: &Document, max_words: usize, scale: &FontScale) -> Vec<Word> {
        let mut scored: Vec<(String, f64)> = self
            .scores(doc)
            .into_iter()
            .map(|(term, s)| (term, if s.is_finite() { s.max(0.0) } else { 0.0 }))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(max_words);

        let top = scored.first().map_or(0.0, |(_, s)| *s);
        scored
            .into_iter()
            .map(|(term, s)| {
                let weight = if top > 0.0 { s / top } else { 0.0 };
                Word::new(term, weight, scale)
            })
            .collect()
    }
}

/// Closed set of ranking strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingKind {
    Tf,
    TfIdf,
    LexRank,
}

impl RankingKind {
    pub const ALL: [Self; 3] = [Self::Tf, Self::TfIdf, Self::LexRank];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tf => "tf",
            Self::TfIdf => "tf-idf",
            Self::LexRank => "lexrank",
        }
    }

    /// Construct the strategy for this selector.
    #[must_use]
    pub fn build(self) -> Box<dyn RankingAlgo> {
        match self {
            Self::Tf => Box::new(TermFrequency),
            Self::TfIdf => Box::new(TfIdf),
            Self::LexRank => Box::new(LexRank::default()),
        }
    }
}

impl fmt::Display for RankingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RankingKind {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "tf" => Ok(Self::Tf),
            "tf-idf" | "tfidf" => Ok(Self::TfIdf),
            "lexrank" | "lex" | "lex-rank" => Ok(Self::LexRank),
            _ => Err(TextError::UnknownStrategy {
                kind: "ranking",
                name: s.to_owned(),
            }),
        }
    }
}

/// Raw occurrence count.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequency;

impl RankingAlgo for TermFrequency {
    fn name(&self) -> &'static str {
        "tf"
    }

    fn scores(&self, doc: &Document) -> BTreeMap<String, f64> {
        doc.terms()
            .map(|t| (t.to_owned(), doc.frequency(t) as f64))
            .collect()
    }
}

/// Term frequency scaled by inverse sentence frequency.
///
/// Sentences play the role of the document collection. The idf term is
/// `ln(1 + N / df)` so a term present in every sentence keeps a positive
/// score.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdf;

impl RankingAlgo for TfIdf {
    fn name(&self) -> &'static str {
        "tf-idf"
    }

    fn scores(&self, doc: &Document) -> BTreeMap<String, f64> {
        let n = doc.sentence_count().max(1) as f64;
        doc.terms()
            .map(|t| {
                let df = doc.sentence_frequency(t).max(1) as f64;
                let idf = (1.0 + n / df).ln();
                (t.to_owned(), doc.frequency(t) as f64 * idf)
            })
            .collect()
    }
}

/// PageRank over the sentence co-occurrence graph of terms.
#[derive(Debug, Clone, Copy)]
pub struct LexRank {
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for LexRank {
    fn default() -> Self {
        Self {
            damping: DAMPING,
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE,
        }
    }
}

impl RankingAlgo for LexRank {
    fn name(&self) -> &'static str {
        "lexrank"
    }

    fn scores(&self, doc: &Document) -> BTreeMap<String, f64> {
        let terms: Vec<&str> = doc.terms().collect();
        let n = terms.len();
        if n == 0 {
            return BTreeMap::new();
        }
        let index: BTreeMap<&str, usize> = terms.iter().enumerate().map(|(i, t)| (*t, i)).collect();

        // Sparse symmetric adjacency: edge weight = shared sentences.
        let mut adjacency: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for sentence in doc.sentences() {
            let ids: BTreeSet<usize> = sentence
                .iter()
                .filter_map(|t| index.get(t.as_str()).copied())
                .collect();
            let ids: Vec<usize> = ids.into_iter().collect();
            for (k, &i) in ids.iter().enumerate() {
                for &j in &ids[k + 1..] {
                    *adjacency[i].entry(j).or_default() += 1.0;
                    *adjacency[j].entry(i).or_default() += 1.0;
                }
            }
        }
        let out_weight: Vec<f64> = adjacency.iter().map(|row| row.values().sum()).collect();

        let base = (1.0 - self.damping) / n as f64;
        let mut rank = vec![1.0 / n as f64; n];
        for iteration in 0..self.max_iterations {
            let dangling: f64 = (0..n)
                .filter(|&i| out_weight[i] <= 0.0)
                .map(|i| rank[i])
                .sum();
            let spread = self.damping * dangling / n as f64;
            let mut next = vec![base + spread; n];
            for (j, row) in adjacency.iter().enumerate() {
                if out_weight[j] <= 0.0 {
                    continue;
                }
                let share = self.damping * rank[j] / out_weight[j];
                for (&i, &w) in row {
                    next[i] += share * w;
                }
            }
            let delta: f64 = next.iter().zip(&rank).map(|(a, b)| (a - b).abs()).sum();
            rank = next;
            if delta < self.tolerance {
                tracing::trace!(iteration, delta, "lexrank converged");
                break;
            }
        }

        terms
            .into_iter()
            .zip(rank)
            .map(|(t, r)| (t.to_owned(), r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse(
            "Cloud layout places words. Words carry weight. \
             Cloud words cluster by similarity. Layout quality matters.",
        )
    }

    #[test]
    fn parse_names() {
        assert_eq!("TF".parse::<RankingKind>().unwrap(), RankingKind::Tf);
        assert_eq!("tf_idf".parse::<RankingKind>().unwrap(), RankingKind::TfIdf);
        assert_eq!("LexRank".parse::<RankingKind>().unwrap(), RankingKind::LexRank);
        assert!(matches!(
            "pagerank".parse::<RankingKind>(),
            Err(TextError::UnknownStrategy { kind: "ranking", .. })
        ));
        for kind in RankingKind::ALL {
            assert_eq!(kind.name().parse::<RankingKind>().unwrap(), kind);
            assert_eq!(kind.build().name(), kind.name());
        }
    }

    #[test]
    fn tf_ranks_most_frequent_first() {
        let words = TermFrequency.rank(&doc(), 10, &FontScale::default());
        assert_eq!(words[0].text, "words");
        assert_eq!(words[0].weight, 1.0);
        assert!(words.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn ties_break_by_text() {
        let words = TermFrequency.rank(&doc(), 10, &FontScale::default());
        // "cloud" and "layout" both occur twice.
        let cloud = words.iter().position(|w| w.text == "cloud").unwrap();
        let layout = words.iter().position(|w| w.text == "layout").unwrap();
        assert!(cloud < layout);
    }

    #[test]
    fn truncation_respects_max_words() {
        for kind in RankingKind::ALL {
            let algo = kind.build();
            assert_eq!(algo.rank(&doc(), 3, &FontScale::default()).len(), 3);
            assert!(algo.rank(&doc(), 0, &FontScale::default()).is_empty());
        }
    }

    #[test]
    fn ranking_is_deterministic() {
        for kind in RankingKind::ALL {
            let algo = kind.build();
            let a = algo.rank(&doc(), 20, &FontScale::default());
            let b = algo.rank(&doc(), 20, &FontScale::default());
            assert_eq!(a, b, "{kind} not deterministic");
        }
    }

    #[test]
    fn weights_are_normalized() {
        for kind in RankingKind::ALL {
            let words = kind.build().rank(&doc(), 20, &FontScale::default());
            assert!(!words.is_empty());
            assert!((words[0].weight - 1.0).abs() < 1e-12);
            assert!(words.iter().all(|w| (0.0..=1.0).contains(&w.weight)));
        }
    }

    #[test]
    fn lexrank_scores_sum_to_one() {
        let scores = LexRank::default().scores(&doc());
        let total: f64 = scores.values().sum();
        assert!((total - 1.0).abs() < 1e-6, "total = {total}");
    }

    #[test]
    fn empty_document_ranks_nothing() {
        let empty = Document::default();
        for kind in RankingKind::ALL {
            assert!(kind.build().rank(&empty, 10, &FontScale::default()).is_empty());
        }
    }
}
