//! Background runs with supersede-on-start semantics

use super::cancel::CancellationToken;
use super::parameters::RasterParameters;
use super::pipeline::{RasterOutput, run_pipeline};
use crate::io::error::{RasterError, Result};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::raster::RasterBitmap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// A rasterization running on its own worker thread
#[derive(Debug)]
pub struct RunHandle {
    token: CancellationToken,
    tracker: ProgressTracker,
    worker: JoinHandle<Result<RasterOutput>>,
}

impl RunHandle {
    /// Request cancellation of this run
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token observed by this run
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Last progress value published by this run
    pub fn progress(&self) -> f64 {
        self.tracker.current()
    }

    /// Whether the worker has returned
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Block until the worker returns its result
    ///
    /// # Errors
    ///
    /// Returns the run's own error, or `RasterError::Worker` if the worker
    /// panicked.
    pub fn wait(self) -> Result<RasterOutput> {
        self.worker.join().map_err(|_panic| RasterError::Worker {
            reason: "rasterization worker panicked".into(),
        })?
    }
}

/// Starts runs and cancels the previous one whenever a new one begins
#[derive(Debug, Default)]
pub struct RasterSession {
    current: Mutex<Option<CancellationToken>>,
}

impl RasterSession {
    /// Session with no run in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any previous run and start a new one
    ///
    /// # Errors
    ///
    /// Returns `RasterError::Worker` when the worker thread cannot be spawned.
    pub fn start(
        &self,
        image: RasterBitmap,
        params: RasterParameters,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<RunHandle> {
        let token = CancellationToken::new();
        {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = current.replace(token.clone()) {
                log::debug!("Superseding previous run");
                previous.cancel();
            }
        }
        Self::spawn_run(image, params, progress, token)
    }

    /// Cancel the run most recently started, if any
    pub fn cancel_current(&self) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = current.as_ref() {
            token.cancel();
        }
    }

    /// Spawn a worker running the whole pipeline under `token`
    ///
    /// # Errors
    ///
    /// Returns `RasterError::Worker` when the worker thread cannot be spawned.
    pub fn spawn_run(
        image: RasterBitmap,
        params: RasterParameters,
        progress: Arc<dyn ProgressSink>,
        token: CancellationToken,
    ) -> Result<RunHandle> {
        let tracker = ProgressTracker::with_sink(progress);
        let worker_tracker = tracker.clone();
        let worker_token = token.clone();

        let worker = thread::Builder::new()
            .name("dotraster-worker".into())
            .spawn(move || run_pipeline(image, &params, &worker_tracker, &worker_token))
            .map_err(|reason| RasterError::Worker {
                reason: reason.to_string(),
            })?;

        Ok(RunHandle {
            token,
            tracker,
            worker,
        })
    }
}
