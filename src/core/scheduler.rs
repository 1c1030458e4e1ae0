//! Cancelable fixed-delay continuations
//!
//! Each mounted view owns one [`Scheduler`]. Simulated latency is a task
//! spawned through it; tearing the view down cancels every task that has not
//! fired yet, and a cancelled task never touches view state.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token observed by every task spawned through this scheduler
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run `task` until it finishes or the scheduler shuts down
    ///
    /// Returns `false` without spawning anything after shutdown.
    pub fn spawn<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_shut_down() {
            return false;
        }

        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Simulated task dropped on teardown");
                }
                _ = task => {}
            }
        });
        true
    }

    /// Run `continuation` once `delay` has elapsed, unless cancelled first
    pub fn after<F>(&self, delay: Duration, continuation: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            if !cancel.is_cancelled() {
                continuation();
            }
        })
    }

    /// Number of spawned tasks still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel all pending work and refuse new work
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(pending = self.tracker.len(), "Scheduler shutting down");
        }
        self.cancel.cancel();
        self.tracker.close();
    }

    /// Wait until every spawned task has finished; only meaningful after shutdown
    pub async fn drained(&self) {
        self.tracker.wait().await;
    }
}
