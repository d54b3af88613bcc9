//! Cooperative cancellation shared between a caller and its worker

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag observed by the generator between grid cells
///
/// Clones share the same flag. Cancelling is idempotent and cannot be undone.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
