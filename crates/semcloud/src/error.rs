#![forbid(unsafe_code)]

//! Pipeline error type.

use std::time::Duration;

use semcloud_geom::GeomError;
use semcloud_layout::LayoutError;
use semcloud_text::TextError;

/// Every way a pipeline run can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CloudError {
    /// A configured strategy name is not registered. Fatal; not retried.
    #[error("unknown {kind} strategy '{name}'")]
    UnknownStrategy { kind: &'static str, name: String },

    /// A stage was asked about data outside the ranked word set.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A bounding box was requested over zero rectangles.
    #[error("empty input: no placed rectangles")]
    EmptyInput,

    /// The layout stage ran past its deadline.
    #[error("layout '{strategy}' timed out after {elapsed:?}")]
    LayoutTimeout {
        strategy: &'static str,
        elapsed: Duration,
    },

    /// The layout stage was cancelled before it finished.
    #[error("layout '{0}' was cancelled")]
    LayoutCancelled(&'static str),

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The layout worker thread died without reporting a result.
    #[error("layout worker '{0}' exited without a result")]
    WorkerPanicked(&'static str),

    /// The OS refused to start the layout worker thread.
    #[error("could not start layout worker '{strategy}': {reason}")]
    WorkerSpawn {
        strategy: &'static str,
        reason: String,
    },
}

impl CloudError {
    /// Only a layout timeout may be retried, and only with a faster strategy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LayoutTimeout { .. })
    }
}

impl From<TextError> for CloudError {
    fn from(err: TextError) -> Self {
        match err {
            TextError::UnknownStrategy { kind, name } => Self::UnknownStrategy { kind, name },
            TextError::UnknownWord(_) | TextError::SelfPair(_) => {
                Self::UnsupportedConfiguration(err.to_string())
            }
        }
    }
}

impl From<LayoutError> for CloudError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::Cancelled(strategy) => Self::LayoutCancelled(strategy),
            LayoutError::UnknownStrategy(name) => Self::UnknownStrategy {
                kind: "layout",
                name,
            },
            LayoutError::Text(inner) => inner.into(),
        }
    }
}

impl From<GeomError> for CloudError {
    fn from(err: GeomError) -> Self {
        match err {
            GeomError::EmptyInput => Self::EmptyInput,
        }
    }
}

impl From<serde_json::Error> for CloudError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
