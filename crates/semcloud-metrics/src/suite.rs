#![forbid(unsafe_code)]

//! Metric table and parallel evaluation.

use rayon::prelude::*;
use tracing::debug;

use semcloud_layout::LayoutResult;
use semcloud_text::{SimilarityMap, Word};

use crate::context::{MetricContext, MetricParams};
use crate::metrics;
use crate::report::QualityReport;

/// Signature shared by every metric.
pub type MetricFn = fn(&MetricContext<'_>) -> f64;

/// A named metric.
#[derive(Debug, Clone, Copy)]
pub struct Metric {
    pub name: &'static str,
    pub eval: MetricFn,
}

impl Metric {
    #[must_use]
    pub const fn new(name: &'static str, eval: MetricFn) -> Self {
        Self { name, eval }
    }
}

/// The metrics every pipeline run reports.
pub const STANDARD_METRICS: [Metric; 8] = [
    Metric::new("adjacency", metrics::adjacency),
    Metric::new("aspect_ratio", metrics::aspect_ratio),
    Metric::new("distortion", metrics::distortion),
    Metric::new("overlap", metrics::overlap),
    Metric::new("space", metrics::space),
    Metric::new("space_hull", metrics::space_hull),
    Metric::new("total_weight", metrics::total_weight),
    Metric::new("uniformity", metrics::uniformity),
];

/// An ordered set of metrics evaluated together over one layout.
#[derive(Debug, Clone)]
pub struct MetricSuite {
    metrics: Vec<Metric>,
    params: MetricParams,
}

impl Default for MetricSuite {
    fn default() -> Self {
        Self::standard(MetricParams::default())
    }
}

impl MetricSuite {
    /// An empty suite.
    #[must_use]
    pub fn new(params: MetricParams) -> Self {
        Self {
            metrics: Vec::new(),
            params,
        }
    }

    #[must_use]
    pub fn standard(params: MetricParams) -> Self {
        Self {
            metrics: STANDARD_METRICS.to_vec(),
            params,
        }
    }

    /// Add or replace a metric by name.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.retain(|m| m.name != metric.name);
        self.metrics.push(metric);
        self
    }

    /// Keep only metrics whose name is in `names`.
    #[must_use]
    pub fn only(mut self, names: &[&str]) -> Self {
        self.metrics.retain(|m| names.contains(&m.name));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.metrics.iter().map(|m| m.name)
    }

    #[must_use]
    pub fn params(&self) -> MetricParams {
        self.params
    }

    /// Every metric scored `0.0`; the report for an empty layout.
    #[must_use]
    pub fn zeroed(&self) -> QualityReport {
        QualityReport::zeroed(self.names())
    }

    /// Score `layout` with every metric in the suite.
    ///
    /// Metrics run in parallel over a shared context. The report is keyed by
    /// name, so scheduling order never shows up in the result.
    #[must_use]
    pub fn evaluate(
        &self,
        words: &[Word],
        similarity: &SimilarityMap,
        layout: &LayoutResult,
    ) -> QualityReport {
        let _span = tracing::debug_span!("metrics", metrics = self.metrics.len(), words = words.len())
            .entered();
        let ctx = MetricContext::new(words, similarity, layout, self.params);
        if ctx.placed().is_empty() {
            debug!("no placed words; all metrics zero");
            return self.zeroed();
        }

        let report: QualityReport = self
            .metrics
            .par_iter()
            .map(|metric| {
                let score = (metric.eval)(&ctx);
                let score = if score.is_finite() { score } else { 0.0 };
                (metric.name.to_owned(), score)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect();
        debug!(placed = ctx.placed().len(), "metrics evaluated");
        report
    }
}
