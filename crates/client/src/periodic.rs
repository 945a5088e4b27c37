//! Fixed-interval job runner.
//!
//! The first run starts immediately. A tick that arrives while the previous
//! run is still in flight is skipped, so a slow job never races itself.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest period a task will run at; shorter periods are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A background loop running `job` every `period` until stopped.
///
/// Dropping the task cancels it without waiting; use [`PeriodicTask::stop`]
/// to wait for the loop to exit.
pub struct PeriodicTask {
    name: &'static str,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    skipped: Arc<AtomicU64>,
}

impl PeriodicTask {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// A `period` below [`MIN_PERIOD`] (including zero) is raised to it.
    pub fn start<F, Fut>(name: &'static str, period: Duration, job: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if period < MIN_PERIOD {
            tracing::warn!(
                task = name,
                period_ms = period.as_millis() as u64,
                "Period below minimum, using {}ms",
                MIN_PERIOD.as_millis()
            );
        }
        let period = period.max(MIN_PERIOD);
        let cancel = CancellationToken::new();
        let skipped = Arc::new(AtomicU64::new(0));

        tracing::debug!(
            task = name,
            period_ms = period.as_millis() as u64,
            "Periodic task started"
        );

        let handle = tokio::spawn(run(name, period, job, cancel.clone(), Arc::clone(&skipped)));

        Self {
            name,
            cancel,
            handle: Some(handle),
            skipped,
        }
    }

    /// Ticks dropped because the previous run had not finished.
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the loop, abort any in-flight run, and wait for the loop to
    /// exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(task = self.name, error = %e, "Periodic task ended abnormally");
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<F, Fut>(
    name: &'static str,
    period: Duration,
    job: F,
    cancel: CancellationToken,
    skipped: Arc<AtomicU64>,
) where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if let Some(h) = in_flight.take() {
                    h.abort();
                }
                tracing::debug!(task = name, "Periodic task stopping");
                break;
            }
            _ = interval.tick() => {
                if in_flight.as_ref().is_some_and(|h| !h.is_finished()) {
                    skipped.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(task = name, "Previous run still in flight, skipping tick");
                    continue;
                }
                in_flight = Some(tokio::spawn(job()));
            }
        }
    }
}
