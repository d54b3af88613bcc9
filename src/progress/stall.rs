//! Synthetic progress nudges while a long run shows no genuine movement

use super::tracker::ProgressTracker;
use crate::io::configuration::{STALL_GUARD_CEILING, STALL_GUARD_INTERVAL, STALL_GUARD_STEP};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Timing and bounds of the synthetic progress nudges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallPolicy {
    /// Wait between nudges
    pub interval: Duration,
    /// Amount added per nudge
    pub step: f64,
    /// Value the guard never pushes past
    pub ceiling: f64,
}

impl Default for StallPolicy {
    fn default() -> Self {
        Self {
            interval: STALL_GUARD_INTERVAL,
            step: STALL_GUARD_STEP,
            ceiling: STALL_GUARD_CEILING,
        }
    }
}

/// Background thread that raises a stalled tracker in small steps
///
/// The guard stops once the tracker moves past its last nudge, the ceiling
/// is reached, or the guard is dropped.
#[derive(Debug)]
pub struct StallGuard {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StallGuard {
    /// Start nudging `tracker` according to `policy`
    ///
    /// If the thread cannot be spawned the guard is inert.
    pub fn start(tracker: ProgressTracker, policy: StallPolicy) -> Self {
        let (stop, stopped) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("progress-stall-guard".into())
            .spawn(move || nudge_until_stopped(&tracker, policy, &stopped));

        match spawned {
            Ok(handle) => Self {
                stop: Some(stop),
                handle: Some(handle),
            },
            Err(reason) => {
                log::warn!("Stall guard unavailable: {reason}");
                Self {
                    stop: None,
                    handle: None,
                }
            }
        }
    }

    /// Whether the guard thread has already exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the guard and wait for its thread
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("Stall guard thread panicked");
        }
    }
}

impl Drop for StallGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn nudge_until_stopped(
    tracker: &ProgressTracker,
    policy: StallPolicy,
    stopped: &mpsc::Receiver<()>,
) {
    let mut last = tracker.current();
    while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(policy.interval) {
        let current = tracker.current();
        let next = last + policy.step;
        if current > last || next > policy.ceiling + 1e-9 {
            break;
        }
        last = tracker.update(next);
        log::trace!("Stall guard raised progress to {last:.2}");
    }
}
