#![forbid(unsafe_code)]

//! Quality metrics for a produced word-cloud layout.
//!
//! # Role in semcloud
//! After layout, the pipeline scores the arrangement with a table of
//! independent metrics. Each metric is a plain `fn(&MetricContext) -> f64`;
//! the [`MetricSuite`] runs the table in parallel and collects a
//! [`QualityReport`] keyed by metric name.
//!
//! # Invariants
//!
//! 1. **Pure**: metrics read words, similarity, and layout; none mutates them.
//! 2. **Total**: unplaced words are excluded, never an error. A layout with
//!    no placed word scores `0.0` on every metric.
//! 3. **Order-independent**: every aggregate iterates placed words in text
//!    order, so permuting the input words cannot change a score.
//! 4. **Bounded**: scores are finite and in `[0, 1]`, except `total_weight`
//!    which is the raw similarity sum used to normalise `adjacency`.

pub mod context;
pub mod metrics;
pub mod report;
pub mod suite;

pub use context::{MetricContext, MetricParams};
pub use report::QualityReport;
pub use suite::{Metric, MetricFn, MetricSuite, STANDARD_METRICS};
