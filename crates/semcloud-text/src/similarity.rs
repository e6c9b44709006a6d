#![forbid(unsafe_code)]

//! Pairwise similarity strategies and the similarity map they produce.
//!
//! # Invariants
//!
//! 1. **Symmetric**: keys are [`WordPair`]s, so `(a, b)` and `(b, a)` read
//!    the same score.
//! 2. **Bounded**: every stored score is finite and in `[0, 1]`.
//! 3. **Closed over the ranked set**: asking about a word that was not
//!    ranked is an error, never a silent zero.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown word | Word not in the ranked set | `TextError::UnknownWord` |
//! | Self pair | `get(a, a)` | `TextError::SelfPair` |
//! | Missing pair | Both words known, pair never stored | Returns `0.0` |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::TextError;
use crate::document::Document;
use crate::word::{Word, WordPair};

/// Read-only similarity scores over the ranked word set.
///
/// Deserialization replays every entry through [`SimilarityMap::insert`], so
/// a decoded map keeps the same bounds and word-set checks as a built one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SimilarityEntries")]
pub struct SimilarityMap {
    words: BTreeSet<String>,
    #[serde(serialize_with = "scores_as_entries")]
    scores: BTreeMap<WordPair, f64>,
}

// JSON object keys must be strings, so pairs travel as `[pair, score]` entries.
fn scores_as_entries<S: Serializer>(
    scores: &BTreeMap<WordPair, f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(scores.iter())
}

/// Wire form of [`SimilarityMap`].
#[derive(Deserialize)]
struct SimilarityEntries {
    words: BTreeSet<String>,
    scores: Vec<(WordPair, f64)>,
}

impl TryFrom<SimilarityEntries> for SimilarityMap {
    type Error = TextError;

    fn try_from(raw: SimilarityEntries) -> Result<Self, Self::Error> {
        let mut map = Self {
            words: raw.words,
            scores: BTreeMap::new(),
        };
        for (pair, score) in raw.scores {
            map.insert(pair.first(), pair.second(), score)?;
        }
        Ok(map)
    }
}

impl SimilarityMap {
    /// Empty map over the given ranked words.
    #[must_use]
    pub fn new(words: &[Word]) -> Self {
        Self {
            words: words.iter().map(|w| w.text.clone()).collect(),
            scores: BTreeMap::new(),
        }
    }

    /// Store a score, clamped into `[0, 1]` (non-finite becomes 0).
    pub fn insert(&mut self, a: &str, b: &str, score: f64) -> Result<(), TextError> {
        self.check(a)?;
        self.check(b)?;
        let pair = WordPair::new(a, b)?;
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.scores.insert(pair, score);
        Ok(())
    }

    /// Score for an unordered pair of ranked words.
    pub fn get(&self, a: &str, b: &str) -> Result<f64, TextError> {
        self.check(a)?;
        self.check(b)?;
        let pair = WordPair::new(a, b)?;
        Ok(self.scores.get(&pair).copied().unwrap_or(0.0))
    }

    #[must_use]
    pub fn contains_word(&self, text: &str) -> bool {
        self.words.contains(text)
    }

    /// Stored pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&WordPair, f64)> {
        self.scores.iter().map(|(k, v)| (k, *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn check(&self, text: &str) -> Result<(), TextError> {
        if self.words.contains(text) {
            Ok(())
        } else {
            Err(TextError::UnknownWord(text.to_owned()))
        }
    }
}

/// Capability: score how related two document terms are.
pub trait SimilarityAlgo: Send + Sync {
    /// Stable strategy name for logs.
    fn name(&self) -> &'static str;

    /// Similarity of two distinct terms, expected in `[0, 1]`.
    fn similarity(&self, doc: &Document, a: &str, b: &str) -> f64;

    /// Score every unordered pair of `words`.
    fn compute(&self, doc: &Document, words: &[Word]) -> Result<SimilarityMap, TextError> {
        let mut map = SimilarityMap::new(words);
        for (i, a) in words.iter().enumerate() {
            for b in &words[i + 1..] {
                if a.text == b.text {
                    continue;
                }
                map.insert(&a.text, &b.text, self.similarity(doc, &a.text, &b.text))?;
            }
        }
        tracing::debug!(
            strategy = self.name(),
            words = words.len(),
            pairs = map.len(),
            "similarity computed"
        );
        Ok(map)
    }
}

/// Closed set of similarity strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityKind {
    Cosine,
    Jaccard,
    Lexical,
    Euclidean,
    DiceCoefficient,
}

impl SimilarityKind {
    pub const ALL: [Self; 5] = [
        Self::Cosine,
        Self::Jaccard,
        Self::Lexical,
        Self::Euclidean,
        Self::DiceCoefficient,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Jaccard => "jaccard",
            Self::Lexical => "lexical",
            Self::Euclidean => "euclidean",
            Self::DiceCoefficient => "dice",
        }
    }

    #[must_use]
    pub fn build(self) -> Box<dyn SimilarityAlgo> {
        match self {
            Self::Cosine => Box::new(Cosine),
            Self::Jaccard => Box::new(Jaccard),
            Self::Lexical => Box::new(Lexical),
            Self::Euclidean => Box::new(Euclidean),
            Self::DiceCoefficient => Box::new(Dice),
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimilarityKind {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "cosine" => Ok(Self::Cosine),
            "jaccard" => Ok(Self::Jaccard),
            "lexical" => Ok(Self::Lexical),
            "euclidean" | "matrix-distance" => Ok(Self::Euclidean),
            "dice" | "dice-coefficient" => Ok(Self::DiceCoefficient),
            _ => Err(TextError::UnknownStrategy {
                kind: "similarity",
                name: s.to_owned(),
            }),
        }
    }
}

/// Sparse per-sentence occurrence vector of a term.
fn occurrence_vector(doc: &Document, term: &str) -> BTreeMap<usize, f64> {
    doc.sentences_with(term)
        .map(|set| {
            set.iter()
                .map(|&idx| (idx, doc.count_in_sentence(term, idx) as f64))
                .collect()
        })
        .unwrap_or_default()
}

fn norm(v: &BTreeMap<usize, f64>) -> f64 {
    v.values().map(|x| x * x).sum::<f64>().sqrt()
}

fn dot(a: &BTreeMap<usize, f64>, b: &BTreeMap<usize, f64>) -> f64 {
    a.iter()
        .filter_map(|(k, x)| b.get(k).map(|y| x * y))
        .sum()
}

/// Cosine of sentence-occurrence vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl SimilarityAlgo for Cosine {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn similarity(&self, doc: &Document, a: &str, b: &str) -> f64 {
        let va = occurrence_vector(doc, a);
        let vb = occurrence_vector(doc, b);
        let denom = norm(&va) * norm(&vb);
        if denom <= 0.0 {
            return 0.0;
        }
        dot(&va, &vb) / denom
    }
}

/// Shared-sentence ratio: `|A ∩ B| / |A ∪ B|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl SimilarityAlgo for Jaccard {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn similarity(&self, doc: &Document, a: &str, b: &str) -> f64 {
        let shared = doc.co_occurrences(a, b) as f64;
        let union = (doc.sentence_frequency(a) + doc.sentence_frequency(b)) as f64 - shared;
        if union <= 0.0 { 0.0 } else { shared / union }
    }
}

/// `2|A ∩ B| / (|A| + |B|)` over sentence sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dice;

impl SimilarityAlgo for Dice {
    fn name(&self) -> &'static str {
        "dice"
    }

    fn similarity(&self, doc: &Document, a: &str, b: &str) -> f64 {
        let total = (doc.sentence_frequency(a) + doc.sentence_frequency(b)) as f64;
        if total <= 0.0 {
            return 0.0;
        }
        2.0 * doc.co_occurrences(a, b) as f64 / total
    }
}

/// Spelling closeness: normalized Levenshtein similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexical;

impl SimilarityAlgo for Lexical {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn similarity(&self, _doc: &Document, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

/// Distance between unit occurrence vectors, folded into `[0, 1]`.
///
/// Non-negative unit vectors are at most `√2` apart, so the score is
/// `1 - d / √2`: identical usage scores 1, never sharing a sentence scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl SimilarityAlgo for Euclidean {
    fn name(&self) -> &'static str {
        "euclidean"
    }

    fn similarity(&self, doc: &Document, a: &str, b: &str) -> f64 {
        let va = occurrence_vector(doc, a);
        let vb = occurrence_vector(doc, b);
        let (na, nb) = (norm(&va), norm(&vb));
        if na <= 0.0 || nb <= 0.0 {
            return 0.0;
        }
        let keys: BTreeSet<usize> = va.keys().chain(vb.keys()).copied().collect();
        let d2: f64 = keys
            .into_iter()
            .map(|k| {
                let x = va.get(&k).copied().unwrap_or(0.0) / na;
                let y = vb.get(&k).copied().unwrap_or(0.0) / nb;
                (x - y) * (x - y)
            })
            .sum();
        (1.0 - d2.sqrt() / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
    }
}
