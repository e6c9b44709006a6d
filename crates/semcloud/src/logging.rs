#![forbid(unsafe_code)]

//! Subscriber setup for binaries and tests that embed the pipeline.

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Env var consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "SEMCLOUD_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter directive from `SEMCLOUD_LOG`, then `RUST_LOG`, then `warn`.
///
/// Blank values are skipped, so an empty `SEMCLOUD_LOG` still defers to
/// `RUST_LOG`.
pub fn filter_directive<F>(get_env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_ENV, "RUST_LOG"]
        .into_iter()
        .filter_map(|key| get_env(key))
        .map(|v| v.trim().to_owned())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_owned())
}

/// Env filter for `directive`; an unparsable directive falls back to `warn`.
#[must_use]
pub fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Filtered fmt subscriber, not yet installed.
pub fn subscriber(directive: &str) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(env_filter(directive))
        .with(tracing_subscriber::fmt::layer().with_target(true))
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init() -> bool {
    let directive = filter_directive(|key| std::env::var(key).ok());
    subscriber(&directive).try_init().is_ok()
}
