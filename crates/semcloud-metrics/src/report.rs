#![forbid(unsafe_code)]

//! Named metric scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metric name → score, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityReport {
    scores: BTreeMap<String, f64>,
}

impl QualityReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A report with every name scored `0.0`.
    #[must_use]
    pub fn zeroed<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().map(|name| (name.to_owned(), 0.0)).collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, score: f64) {
        self.scores.insert(name.into(), score);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(String, f64)> for QualityReport {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}
