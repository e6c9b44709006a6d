#![forbid(unsafe_code)]

//! Text side of semcloud: documents, ranked words, and similarity.
//!
//! # Role in semcloud
//! Turns plain text into the two immutable inputs every layout consumes: a
//! ranked, sized `Vec<Word>` and a `SimilarityMap` over every pair of those
//! words. Ranking and similarity are closed sets of strategies selected by
//! [`RankingKind`] and [`SimilarityKind`].
//!
//! Text acquisition (files, URLs, feeds) is not handled here; callers pass
//! the extracted text in.

pub mod document;
pub mod font;
pub mod ranking;
pub mod similarity;
pub mod word;

pub use document::Document;
pub use font::FontScale;
pub use ranking::{RankingAlgo, RankingKind};
pub use similarity::{SimilarityAlgo, SimilarityKind, SimilarityMap};
pub use word::{Word, WordPair};

/// Errors raised by the text stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// Similarity was requested for a word outside the ranked set.
    #[error("word '{0}' is not part of the ranked word set")]
    UnknownWord(String),
    /// A pair was built from a word and itself.
    #[error("word pair must join two distinct words, got '{0}' twice")]
    SelfPair(String),
    /// A strategy name did not match any known strategy.
    #[error("unknown {kind} strategy '{name}'")]
    UnknownStrategy { kind: &'static str, name: String },
}
