#![forbid(unsafe_code)]

//! Pipeline configuration.
//!
//! [`CloudConfig`] is the serialisable, user-facing form: strategy names are
//! plain strings so a config file can name any of them. [`CloudConfig::resolve`]
//! validates every field and parses the names into closed enums, yielding a
//! [`ResolvedConfig`]. Unknown names fail here, before any stage runs.
//!
//! Environment overrides go through a lookup closure so they can be tested
//! without touching the process environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SEMCLOUD_MAX_WORDS` | `max_words` |
//! | `SEMCLOUD_MAX_AREA` | `max_area` |
//! | `SEMCLOUD_LAYOUT_TIMEOUT_MS` | `layout_timeout_ms` |
//! | `SEMCLOUD_LAYOUT` | `layout` |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use semcloud_geom::DEFAULT_EPSILON;
use semcloud_layout::{BoundingConstraint, LayoutKind};
use semcloud_metrics::MetricParams;
use semcloud_text::{FontScale, RankingKind, SimilarityKind};

use crate::error::CloudError;

/// User-facing pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub ranking: String,
    pub similarity: String,
    pub layout: String,
    /// Words kept after ranking. `0` yields an empty cloud.
    pub max_words: usize,
    /// Maximum bounding-box area of the produced layout.
    pub max_area: f64,
    /// Optional maximum bounding-box width.
    pub max_width: Option<f64>,
    pub overlap_epsilon: f64,
    pub adjacency_epsilon: f64,
    /// Layout deadline in milliseconds; `0` disables it.
    pub layout_timeout_ms: u64,
    /// Retry once with the strategy's fallback after a timeout.
    pub fallback_on_timeout: bool,
    pub compute_metrics: bool,
    pub font: FontScale,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            ranking: RankingKind::Tf.name().to_owned(),
            similarity: SimilarityKind::Cosine.name().to_owned(),
            layout: LayoutKind::Wordle.name().to_owned(),
            max_words: 50,
            max_area: 25_000.0,
            max_width: None,
            overlap_epsilon: DEFAULT_EPSILON,
            adjacency_epsilon: 0.05,
            layout_timeout_ms: 5_000,
            fallback_on_timeout: true,
            compute_metrics: true,
            font: FontScale::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CloudError> {
    value
        .trim()
        .parse()
        .map_err(|_| CloudError::InvalidConfig(format!("{key}={value:?} is not a valid value")))
}

impl CloudConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CloudError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CloudError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply `SEMCLOUD_*` overrides read through `get_env`.
    pub fn with_env_overrides<F>(mut self, get_env: F) -> Result<Self, CloudError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get_env("SEMCLOUD_MAX_WORDS") {
            self.max_words = parse_env("SEMCLOUD_MAX_WORDS", &v)?;
        }
        if let Some(v) = get_env("SEMCLOUD_MAX_AREA") {
            self.max_area = parse_env("SEMCLOUD_MAX_AREA", &v)?;
        }
        if let Some(v) = get_env("SEMCLOUD_LAYOUT_TIMEOUT_MS") {
            self.layout_timeout_ms = parse_env("SEMCLOUD_LAYOUT_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get_env("SEMCLOUD_LAYOUT") {
            self.layout = v.trim().to_owned();
        }
        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn with_process_env(self) -> Result<Self, CloudError> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Validate and parse strategy names.
    ///
    /// Strategy names are checked first, so a bad name is reported as
    /// [`CloudError::UnknownStrategy`] even if other fields are also invalid.
    pub fn resolve(&self) -> Result<ResolvedConfig, CloudError> {
        let ranking: RankingKind = self.ranking.parse()?;
        let similarity: SimilarityKind = self.similarity.parse()?;
        let layout: LayoutKind = self.layout.parse()?;

        if !(self.max_area.is_finite() && self.max_area > 0.0) {
            return Err(CloudError::InvalidConfig(format!(
                "max_area must be positive and finite, got {}",
                self.max_area
            )));
        }
        if let Some(w) = self.max_width {
            if !(w.is_finite() && w > 0.0) {
                return Err(CloudError::InvalidConfig(format!(
                    "max_width must be positive and finite, got {w}"
                )));
            }
        }
        for (name, eps) in [
            ("overlap_epsilon", self.overlap_epsilon),
            ("adjacency_epsilon", self.adjacency_epsilon),
        ] {
            if !(eps.is_finite() && eps >= 0.0) {
                return Err(CloudError::InvalidConfig(format!(
                    "{name} must be non-negative, got {eps}"
                )));
            }
        }
        let font = self.font;
        if !(font.min_size > 0.0 && font.max_size >= font.min_size && font.glyph_aspect > 0.0) {
            return Err(CloudError::InvalidConfig(format!(
                "font scale must satisfy 0 < min_size <= max_size and glyph_aspect > 0, got {font:?}"
            )));
        }

        let mut constraint = BoundingConstraint::area(self.max_area);
        if let Some(w) = self.max_width {
            constraint = constraint.with_max_width(w);
        }
        Ok(ResolvedConfig {
            ranking,
            similarity,
            layout,
            max_words: self.max_words,
            constraint,
            metric_params: MetricParams {
                overlap_epsilon: self.overlap_epsilon,
                adjacency_epsilon: self.adjacency_epsilon,
            },
            layout_timeout: (self.layout_timeout_ms > 0)
                .then(|| Duration::from_millis(self.layout_timeout_ms)),
            fallback_on_timeout: self.fallback_on_timeout,
            compute_metrics: self.compute_metrics,
            font,
        })
    }
}

/// Validated configuration with parsed strategy kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub ranking: RankingKind,
    pub similarity: SimilarityKind,
    pub layout: LayoutKind,
    pub max_words: usize,
    pub constraint: BoundingConstraint,
    pub metric_params: MetricParams,
    /// `None` means no deadline.
    pub layout_timeout: Option<Duration>,
    pub fallback_on_timeout: bool,
    pub compute_metrics: bool,
    pub font: FontScale,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            ranking: RankingKind::Tf,
            similarity: SimilarityKind::Cosine,
            layout: LayoutKind::Wordle,
            max_words: 50,
            constraint: BoundingConstraint::default(),
            metric_params: MetricParams::default(),
            layout_timeout: Some(Duration::from_millis(5_000)),
            fallback_on_timeout: true,
            compute_metrics: true,
            font: FontScale::default(),
        }
    }
}
