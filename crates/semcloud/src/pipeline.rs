#![forbid(unsafe_code)]

//! The pipeline orchestrator.
//!
//! A run moves strictly forward through [`Stage`]s:
//!
//! ```text
//! Configured → Ranked → SimilarityComputed → LaidOut → MetricsComputed
//! ```
//!
//! Each stage consumes only the output of the one before it. A failure
//! aborts the run with the originating error; the single exception is a
//! layout timeout, which may be retried once with the strategy's fallback.
//!
//! Layout is the only stage that can run unbounded, so it runs on a worker
//! thread behind a deadline. On timeout the worker's [`CancelToken`] is
//! cancelled and the partial result is discarded.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use semcloud_geom::Rect;
use semcloud_layout::{BoundingConstraint, CancelToken, LayoutAlgo, LayoutKind, LayoutResult};
use semcloud_metrics::{MetricSuite, QualityReport};
use semcloud_text::{Document, SimilarityMap, Word};

use crate::config::{CloudConfig, ResolvedConfig};
use crate::error::CloudError;

/// Pipeline stage reached by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Configured,
    Ranked,
    SimilarityComputed,
    LaidOut,
    MetricsComputed,
}

impl Stage {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::Ranked => "ranked",
            Self::SimilarityComputed => "similarity-computed",
            Self::LaidOut => "laid-out",
            Self::MetricsComputed => "metrics-computed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an external renderer needs for one placed word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub text: String,
    pub rect: Rect,
    pub font_size: f64,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct CloudOutput {
    /// Ranked words, heaviest first.
    pub words: Vec<Word>,
    pub similarity: SimilarityMap,
    pub layout: LayoutResult,
    /// `None` when metrics are disabled.
    pub report: Option<QualityReport>,
    /// Strategy that produced `layout`; differs from the configured one
    /// after a timeout fallback.
    pub layout_strategy: &'static str,
    pub stage: Stage,
}

impl CloudOutput {
    /// Placed words in rank order, with their rectangle and font size.
    /// Unplaced words are skipped.
    #[must_use]
    pub fn placed_words(&self) -> Vec<PlacedWord> {
        self.words
            .iter()
            .filter_map(|w| {
                self.layout.rect_of(&w.text).map(|rect| PlacedWord {
                    text: w.text.clone(),
                    rect: *rect,
                    font_size: w.font_size,
                })
            })
            .collect()
    }
}

/// A configured, reusable pipeline. Holds no per-run state, so one
/// instance can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ResolvedConfig,
    suite: MetricSuite,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: ResolvedConfig) -> Self {
        let suite = MetricSuite::standard(config.metric_params);
        Self { config, suite }
    }

    /// Validate `config` and build a pipeline from it.
    pub fn from_config(config: &CloudConfig) -> Result<Self, CloudError> {
        Ok(Self::new(config.resolve()?))
    }

    /// Replace the metric table.
    #[must_use]
    pub fn with_metric_suite(mut self, suite: MetricSuite) -> Self {
        self.suite = suite;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Run every stage over plain text.
    pub fn generate(&self, text: &str) -> Result<CloudOutput, CloudError> {
        self.generate_document(&Document::parse(text))
    }

    /// Run every stage over an already parsed document.
    pub fn generate_document(&self, doc: &Document) -> Result<CloudOutput, CloudError> {
        let cfg = &self.config;
        let _span = tracing::info_span!(
            "generate",
            ranking = cfg.ranking.name(),
            similarity = cfg.similarity.name(),
            layout = cfg.layout.name(),
        )
        .entered();
        info!(
            sentences = doc.sentence_count(),
            max_words = cfg.max_words,
            "cloud run started"
        );

        let words = {
            let _stage = tracing::debug_span!("stage", stage = %Stage::Ranked).entered();
            let words = cfg.ranking.build().rank(doc, cfg.max_words, &cfg.font);
            debug!(words = words.len(), "ranked");
            words
        };

        let similarity = {
            let _stage =
                tracing::debug_span!("stage", stage = %Stage::SimilarityComputed).entered();
            cfg.similarity.build().compute(doc, &words)?
        };

        self.arrange(words, similarity)
    }

    /// Run the layout and metric stages over words ranked elsewhere.
    ///
    /// Words beyond `max_words` are dropped. Every kept word must be known
    /// to `similarity`.
    pub fn arrange(
        &self,
        mut words: Vec<Word>,
        similarity: SimilarityMap,
    ) -> Result<CloudOutput, CloudError> {
        let cfg = &self.config;
        words.truncate(cfg.max_words);
        if let Some(missing) = words.iter().find(|w| !similarity.contains_word(&w.text)) {
            return Err(CloudError::UnsupportedConfiguration(format!(
                "word '{}' has no entry in the similarity map",
                missing.text
            )));
        }

        if words.is_empty() {
            info!("no words survived ranking; returning an empty cloud");
            let report = cfg.compute_metrics.then(|| self.suite.zeroed());
            return Ok(CloudOutput {
                words,
                similarity,
                layout: LayoutResult::default(),
                stage: if report.is_some() {
                    Stage::MetricsComputed
                } else {
                    Stage::LaidOut
                },
                report,
                layout_strategy: cfg.layout.name(),
            });
        }

        let words = Arc::new(words);
        let similarity = Arc::new(similarity);
        let (layout_strategy, layout) = {
            let _stage = tracing::debug_span!("stage", stage = %Stage::LaidOut).entered();
            self.layout_with_fallback(
                cfg.layout.build(),
                cfg.layout.fallback(),
                &words,
                &similarity,
            )?
        };
        let words = Arc::try_unwrap(words).unwrap_or_else(|shared| (*shared).clone());
        let similarity = Arc::try_unwrap(similarity).unwrap_or_else(|shared| (*shared).clone());

        let (report, stage) = if cfg.compute_metrics {
            let _stage =
                tracing::debug_span!("stage", stage = %Stage::MetricsComputed).entered();
            let report = self.suite.evaluate(&words, &similarity, &layout);
            (Some(report), Stage::MetricsComputed)
        } else {
            (None, Stage::LaidOut)
        };

        info!(
            words = words.len(),
            placed = layout.placed_count(),
            strategy = layout_strategy,
            "cloud run finished"
        );
        Ok(CloudOutput {
            words,
            similarity,
            layout,
            report,
            layout_strategy,
            stage,
        })
    }

    /// Run `primary`; on timeout, retry once with `fallback` when allowed.
    fn layout_with_fallback(
        &self,
        primary: Box<dyn LayoutAlgo>,
        fallback: Option<LayoutKind>,
        words: &Arc<Vec<Word>>,
        similarity: &Arc<SimilarityMap>,
    ) -> Result<(&'static str, LayoutResult), CloudError> {
        let primary_name = primary.name();
        match self.timed_layout(primary, words, similarity) {
            Ok(layout) => Ok((primary_name, layout)),
            Err(err) if err.is_retryable() && self.config.fallback_on_timeout => {
                let Some(kind) = fallback else {
                    return Err(err);
                };
                warn!(
                    strategy = primary_name,
                    fallback = kind.name(),
                    error = %err,
                    "layout timed out; retrying with fallback"
                );
                let layout = self.timed_layout(kind.build(), words, similarity)?;
                Ok((kind.name(), layout))
            }
            Err(err) => Err(err),
        }
    }

    /// Run one layout strategy under the configured deadline.
    fn timed_layout(
        &self,
        algo: Box<dyn LayoutAlgo>,
        words: &Arc<Vec<Word>>,
        similarity: &Arc<SimilarityMap>,
    ) -> Result<LayoutResult, CloudError> {
        let constraint = self.config.constraint;
        let Some(timeout) = self.config.layout_timeout else {
            return Ok(algo.layout(words, similarity, &constraint, &CancelToken::new())?);
        };
        run_with_deadline(algo, Arc::clone(words), Arc::clone(similarity), constraint, timeout)
    }
}

fn run_with_deadline(
    algo: Box<dyn LayoutAlgo>,
    words: Arc<Vec<Word>>,
    similarity: Arc<SimilarityMap>,
    constraint: BoundingConstraint,
    timeout: Duration,
) -> Result<LayoutResult, CloudError> {
    let strategy = algo.name();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let span = tracing::Span::current();
    let (tx, rx) = mpsc::sync_channel(1);
    let started = Instant::now();

    thread::Builder::new()
        .name(format!("semcloud-layout-{strategy}"))
        .spawn(move || {
            let result = span.in_scope(|| {
                algo.layout(&words, &similarity, &constraint, &worker_cancel)
            });
            // The receiver is gone after a timeout; nothing to report to.
            let _ = tx.send(result);
        })
        .map_err(|err| spawn_failed(strategy, &err))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => Ok(result?),
        Err(RecvTimeoutError::Timeout) => {
            cancel.cancel();
            Err(CloudError::LayoutTimeout {
                strategy,
                elapsed: started.elapsed(),
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(CloudError::WorkerPanicked(strategy)),
    }
}

fn spawn_failed(strategy: &'static str, err: &std::io::Error) -> CloudError {
    tracing::error!(strategy, error = %err, "failed to spawn layout worker");
    CloudError::WorkerSpawn {
        strategy,
        reason: err.to_string(),
    }
}

/// Validate `config`, then run every stage over `text`.
///
/// Unknown strategy names fail before any stage runs.
pub fn generate(text: &str, config: &CloudConfig) -> Result<CloudOutput, CloudError> {
    Pipeline::from_config(config)?.generate(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use semcloud_layout::LayoutError;
    use semcloud_metrics::MetricParams;
    use semcloud_text::FontScale;

    const TEXT: &str = "Rust compilers check ownership. Ownership rules prevent data races. \
                        Compilers report borrow errors early. Data races are undefined behaviour.";

    /// Spins until cancelled, recording that it saw the cancellation.
    struct StuckLayout {
        saw_cancel: Arc<AtomicBool>,
    }

    impl LayoutAlgo for StuckLayout {
        fn name(&self) -> &'static str {
            "stuck"
        }

        fn place(
            &self,
            _words: &[Word],
            _similarity: &SimilarityMap,
            cancel: &CancelToken,
        ) -> Result<LayoutResult, LayoutError> {
            loop {
                if let Err(err) = cancel.check(self.name()) {
                    self.saw_cancel.store(true, Ordering::SeqCst);
                    return Err(err);
                }
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    struct PanickingLayout;

    impl LayoutAlgo for PanickingLayout {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn place(
            &self,
            _words: &[Word],
            _similarity: &SimilarityMap,
            _cancel: &CancelToken,
        ) -> Result<LayoutResult, LayoutError> {
            panic!("packer bug");
        }
    }

    fn small_input() -> (Arc<Vec<Word>>, Arc<SimilarityMap>) {
        let scale = FontScale::default();
        let words = vec![Word::new("alpha", 1.0, &scale), Word::new("beta", 0.5, &scale)];
        let sim = SimilarityMap::new(&words);
        (Arc::new(words), Arc::new(sim))
    }

    fn pipeline_with_timeout(ms: u64, fallback: bool) -> Pipeline {
        Pipeline::new(ResolvedConfig {
            layout_timeout: Some(Duration::from_millis(ms)),
            fallback_on_timeout: fallback,
            ..ResolvedConfig::default()
        })
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Configured < Stage::Ranked);
        assert!(Stage::LaidOut < Stage::MetricsComputed);
        assert_eq!(Stage::SimilarityComputed.to_string(), "similarity-computed");
    }

    #[test]
    fn generate_runs_every_stage() {
        let out = generate(TEXT, &CloudConfig::default()).unwrap();
        assert_eq!(out.stage, Stage::MetricsComputed);
        assert!(!out.words.is_empty());
        assert!(out.layout.covers(&out.words));
        let report = out.report.as_ref().unwrap();
        assert_eq!(report.get("overlap"), Some(0.0));
        assert_eq!(out.placed_words().len(), out.layout.placed_count());
    }

    #[test]
    fn metrics_can_be_disabled() {
        let config = CloudConfig {
            compute_metrics: false,
            ..CloudConfig::default()
        };
        let out = generate(TEXT, &config).unwrap();
        assert!(out.report.is_none());
        assert_eq!(out.stage, Stage::LaidOut);
    }

    #[test]
    fn custom_metric_suite_shapes_the_report() {
        let pipeline = Pipeline::from_config(&CloudConfig::default())
            .unwrap()
            .with_metric_suite(
                MetricSuite::standard(MetricParams::default()).only(&["space", "overlap"]),
            );
        let report = pipeline.generate(TEXT).unwrap().report.unwrap();
        let names: Vec<&str> = report.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["overlap", "space"]);
        assert_eq!(report.get("overlap"), Some(0.0));
    }

    #[test]
    fn timeout_cancels_worker() {
        let (words, sim) = small_input();
        let saw_cancel = Arc::new(AtomicBool::new(false));
        let algo = Box::new(StuckLayout {
            saw_cancel: Arc::clone(&saw_cancel),
        });
        let err = run_with_deadline(
            algo,
            words,
            sim,
            BoundingConstraint::default(),
            Duration::from_millis(20),
        )
        .unwrap_err();
        assert!(matches!(err, CloudError::LayoutTimeout { strategy: "stuck", .. }));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !saw_cancel.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert!(saw_cancel.load(Ordering::SeqCst));
    }

    #[test]
    fn timeout_falls_back_once() {
        let (words, sim) = small_input();
        let pipeline = pipeline_with_timeout(100, true);
        let stuck = Box::new(StuckLayout {
            saw_cancel: Arc::new(AtomicBool::new(false)),
        });
        let (strategy, layout) = pipeline
            .layout_with_fallback(stuck, Some(LayoutKind::Shelf), &words, &sim)
            .unwrap();
        assert_eq!(strategy, "shelf");
        assert_eq!(layout.placed_count(), 2);
    }

    #[test]
    fn timeout_without_fallback_surfaces() {
        let (words, sim) = small_input();
        for (pipeline, fallback) in [
            (pipeline_with_timeout(100, false), Some(LayoutKind::Shelf)),
            (pipeline_with_timeout(100, true), None),
        ] {
            let stuck = Box::new(StuckLayout {
                saw_cancel: Arc::new(AtomicBool::new(false)),
            });
            let err = pipeline
                .layout_with_fallback(stuck, fallback, &words, &sim)
                .unwrap_err();
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn panicking_worker_is_reported() {
        let (words, sim) = small_input();
        let err = run_with_deadline(
            Box::new(PanickingLayout),
            words,
            sim,
            BoundingConstraint::default(),
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert_eq!(err, CloudError::WorkerPanicked("panicking"));
    }

    #[test]
    fn spawn_failure_is_not_a_panic() {
        let err = spawn_failed("wordle", &std::io::Error::other("thread limit reached"));
        assert_eq!(
            err,
            CloudError::WorkerSpawn {
                strategy: "wordle",
                reason: "thread limit reached".into(),
            }
        );
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("could not start layout worker 'wordle'"));
    }

    #[test]
    fn arrange_rejects_words_missing_from_similarity() {
        let scale = FontScale::default();
        let words = vec![Word::new("alpha", 1.0, &scale)];
        let err = Pipeline::new(ResolvedConfig::default())
            .arrange(words, SimilarityMap::default())
            .unwrap_err();
        assert!(matches!(err, CloudError::UnsupportedConfiguration(_)));
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_strategy_runs_no_stage() {
        let config = CloudConfig {
            layout: "UNKNOWN".into(),
            ..CloudConfig::default()
        };
        assert!(generate(TEXT, &config).is_err());
        assert!(!logs_contain("cloud run started"));
        assert!(!logs_contain("ranked"));

        generate(TEXT, &CloudConfig::default()).unwrap();
        assert!(logs_contain("cloud run finished"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn fallback_is_logged() {
        let (words, sim) = small_input();
        let stuck = Box::new(StuckLayout {
            saw_cancel: Arc::new(AtomicBool::new(false)),
        });
        pipeline_with_timeout(100, true)
            .layout_with_fallback(stuck, Some(LayoutKind::Shelf), &words, &sim)
            .unwrap();
        assert!(logs_contain("retrying with fallback"));
    }
}
