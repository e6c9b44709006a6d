#![forbid(unsafe_code)]

//! Parsed document: sentences of normalized terms.
//!
//! # Invariants
//!
//! 1. **Normalized terms**: every term is lowercase, alphabetic, at least
//!    [`MIN_TERM_LEN`] characters, and not a stop word.
//! 2. **Stable order**: all maps are ordered (`BTreeMap`/`BTreeSet`) so every
//!    derived statistic iterates identically across runs.
//! 3. **Immutable**: a `Document` is built once by [`Document::parse`] and
//!    only read afterwards.

use std::collections::{BTreeMap, BTreeSet};

use unicode_segmentation::UnicodeSegmentation;

/// Terms shorter than this are dropped during parsing.
pub const MIN_TERM_LEN: usize = 3;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "and", "any", "are", "because",
    "been", "before", "being", "below", "between", "both", "but", "can", "could", "did", "does",
    "doing", "down", "during", "each", "few", "for", "from", "further", "had", "has", "have",
    "having", "her", "here", "hers", "herself", "him", "himself", "his", "how", "into", "its",
    "itself", "just", "more", "most", "much", "must", "myself", "nor", "not", "now", "off", "once",
    "only", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "too", "under", "until", "very", "was",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "would", "you", "your", "yours", "yourself", "yourselves",
];

/// True when `term` is filtered as a stop word.
#[must_use]
pub fn is_stop_word(term: &str) -> bool {
    STOP_WORDS.binary_search(&term).is_ok()
}

/// A tokenized document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sentences: Vec<Vec<String>>,
    /// term -> total occurrences.
    frequencies: BTreeMap<String, usize>,
    /// term -> indices of sentences containing it.
    occurrences: BTreeMap<String, BTreeSet<usize>>,
}

impl Document {
    /// Split `text` into sentences and normalized terms.
    ///
    /// Sentences break on Unicode sentence boundaries and on line breaks, so
    /// bullet lists and titles do not merge into one sentence.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sentences = Vec::new();
        for line in text.lines() {
            for sentence in line.unicode_sentences() {
                let terms: Vec<String> = sentence.unicode_words().filter_map(normalize).collect();
                if !terms.is_empty() {
                    sentences.push(terms);
                }
            }
        }
        Self::from_sentences(sentences)
    }

    /// Build from already-normalized sentences.
    #[must_use]
    pub fn from_sentences(sentences: Vec<Vec<String>>) -> Self {
        let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
        let mut occurrences: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (idx, sentence) in sentences.iter().enumerate() {
            for term in sentence {
                *frequencies.entry(term.clone()).or_default() += 1;
                occurrences.entry(term.clone()).or_default().insert(idx);
            }
        }
        Self {
            sentences,
            frequencies,
            occurrences,
        }
    }

    #[must_use]
    pub fn sentences(&self) -> &[Vec<String>] {
        &self.sentences
    }

    #[inline]
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Distinct terms in lexical order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.frequencies.keys().map(String::as_str)
    }

    /// Total occurrences of `term` (zero when absent).
    #[must_use]
    pub fn frequency(&self, term: &str) -> usize {
        self.frequencies.get(term).copied().unwrap_or(0)
    }

    /// Number of sentences containing `term`.
    #[must_use]
    pub fn sentence_frequency(&self, term: &str) -> usize {
        self.occurrences.get(term).map_or(0, BTreeSet::len)
    }

    /// Sentence indices containing `term`.
    #[must_use]
    pub fn sentences_with(&self, term: &str) -> Option<&BTreeSet<usize>> {
        self.occurrences.get(term)
    }

    /// Count of `term` within sentence `idx`.
    #[must_use]
    pub fn count_in_sentence(&self, term: &str, idx: usize) -> usize {
        self.sentences
            .get(idx)
            .map_or(0, |s| s.iter().filter(|t| t.as_str() == term).count())
    }

    /// Number of sentences containing both terms.
    #[must_use]
    pub fn co_occurrences(&self, a: &str, b: &str) -> usize {
        match (self.occurrences.get(a), self.occurrences.get(b)) {
            (Some(sa), Some(sb)) => sa.intersection(sb).count(),
            _ => 0,
        }
    }
}

fn normalize(raw: &str) -> Option<String> {
    if !raw.chars().all(char::is_alphabetic) {
        return None;
    }
    let term = raw.to_lowercase();
    if term.chars().count() < MIN_TERM_LEN || is_stop_word(&term) {
        return None;
    }
    Some(term)
}
