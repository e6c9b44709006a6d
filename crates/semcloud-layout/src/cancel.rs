#![forbid(unsafe_code)]

//! Cooperative cancellation for long-running packers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::LayoutError;

/// Shared flag polled by packers; cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancellation was requested.
    #[inline]
    pub fn check(&self, strategy: &'static str) -> Result<(), LayoutError> {
        if self.is_cancelled() {
            Err(LayoutError::Cancelled(strategy))
        } else {
            Ok(())
        }
    }
}
