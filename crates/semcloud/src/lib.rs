#![forbid(unsafe_code)]

//! Semantic word clouds: rank words, score their similarity, lay them out,
//! and grade the layout.
//!
//! # Role in semcloud
//! This crate is the entry point. It wires the strategy crates together
//! behind one operation:
//!
//! ```no_run
//! use semcloud::{CloudConfig, generate};
//!
//! let config = CloudConfig::from_json(r#"{"layout": "context-spiral"}"#)?;
//! let output = generate("Ownership prevents data races. Races corrupt data.", &config)?;
//! for word in output.placed_words() {
//!     println!("{} at {:?} ({}pt)", word.text, word.rect, word.font_size);
//! }
//! # Ok::<(), semcloud::CloudError>(())
//! ```
//!
//! # Crates
//! - `semcloud-geom`: rectangles, bounding boxes, the overlap detector.
//! - `semcloud-text`: documents, ranking and similarity strategies.
//! - `semcloud-layout`: layout strategies and the bounding constraint.
//! - `semcloud-metrics`: the quality metric table.
//!
//! Rendering, text ingestion, and any service boundary live outside.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::{CloudConfig, ResolvedConfig};
pub use error::CloudError;
pub use pipeline::{CloudOutput, Pipeline, PlacedWord, Stage, generate};

pub use semcloud_geom::{OverlapDetector, Rect};
pub use semcloud_layout::{BoundingConstraint, LayoutKind, LayoutResult};
pub use semcloud_metrics::{MetricSuite, QualityReport};
pub use semcloud_text::{FontScale, RankingKind, SimilarityKind, SimilarityMap, Word, WordPair};
