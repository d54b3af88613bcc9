//! Monotonic progress value shared between the worker and its observers

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives progress fractions in [0, 1]
pub trait ProgressSink: Send + Sync {
    /// Called with the newly published progress value
    fn report(&self, fraction: f64);
}

impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, fraction: f64) {
        self(fraction);
    }
}

/// Sink that discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f64) {}
}

struct TrackerState {
    value: Mutex<f64>,
    sink: Arc<dyn ProgressSink>,
}

/// Thread-safe progress value that never decreases except on reset
///
/// Clones share the same value and sink. The sink is notified while the
/// value lock is held, so observers see publications in order.
#[derive(Clone)]
pub struct ProgressTracker {
    state: Arc<TrackerState>,
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("value", &self.current())
            .finish_non_exhaustive()
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// Tracker with no observer
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NoProgress))
    }

    /// Tracker that forwards every publication to `sink`
    pub fn with_sink(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            state: Arc::new(TrackerState {
                value: Mutex::new(0.0),
                sink,
            }),
        }
    }

    /// Publish `max(current, candidate)` and return it
    ///
    /// Candidates are clamped to [0, 1]; NaN is ignored.
    pub fn update(&self, candidate: f64) -> f64 {
        let mut value = self
            .state
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !candidate.is_nan() {
            *value = value.max(candidate.clamp(0.0, 1.0));
        }
        self.state.sink.report(*value);
        *value
    }

    /// Force the value back to 0 and publish it
    pub fn reset(&self) {
        let mut value = self
            .state
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *value = 0.0;
        self.state.sink.report(0.0);
    }

    /// Last published value
    pub fn current(&self) -> f64 {
        *self
            .state
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
