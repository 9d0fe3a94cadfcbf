//! services/summarizer/src/workflow/progress.rs
//!
//! Drives the synthetic progress curve on a timer while a request is outstanding.

use std::time::Duration;
use summarizer_core::ProgressEstimate;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Shortest tick accepted; `tokio::time::interval` panics on a zero period.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Starts timer tasks that advance a `ProgressEstimate` every `tick`.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEstimator {
    tick: Duration,
}

impl ProgressEstimator {
    pub fn new(tick: Duration) -> Self {
        if tick < MIN_TICK {
            warn!(?tick, "Progress tick too short, using {:?}.", MIN_TICK);
        }
        Self {
            tick: tick.max(MIN_TICK),
        }
    }

    /// Spawns the ticking task. `on_tick` receives 0 immediately and then each new value.
    /// The task stops when the returned handle is stopped or dropped.
    pub fn start<F>(&self, on_tick: F) -> ProgressHandle
    where
        F: Fn(f64) + Send + 'static,
    {
        let stop = CancellationToken::new();
        let task = tokio::spawn(run_ticks(self.tick, stop.clone(), on_tick));
        ProgressHandle {
            stop,
            task: Some(task),
        }
    }
}

async fn run_ticks<F>(tick: Duration, stop: CancellationToken, on_tick: F) -> f64
where
    F: Fn(f64) + Send + 'static,
{
    let mut estimate = ProgressEstimate::new();
    on_tick(estimate.value());

    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            _ = interval.tick() => {
                if !estimate.at_ceiling() {
                    on_tick(estimate.advance());
                }
            }
        }
    }
    estimate.value()
}

/// A running estimate. Dropping it aborts the timer task.
#[derive(Debug)]
pub struct ProgressHandle {
    stop: CancellationToken,
    task: Option<JoinHandle<f64>>,
}

impl ProgressHandle {
    /// Stops ticking and waits for the task to exit, so no value is emitted after
    /// this returns. Yields the last estimated value.
    pub async fn stop(mut self) -> f64 {
        self.stop.cancel();
        match self.task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                error!("Progress task failed: {}", e);
                0.0
            }),
            None => 0.0,
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
