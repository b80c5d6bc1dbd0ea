//! Periodic background sweep shared by the limiter registries.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A registry that can evict idle entries.
pub(crate) trait Sweep: Send + Sync + 'static {
    /// Evicts eligible entries, returning how many were removed.
    fn evict_idle(&self) -> usize;
}

#[derive(Debug)]
struct Running {
    stop: Arc<Notify>,
    task: JoinHandle<()>,
}

/// Owns at most one background sweep task.
#[derive(Debug, Default)]
pub(crate) struct Sweeper {
    running: Mutex<Option<Running>>,
}

impl Sweeper {
    /// Spawns the sweep loop unless one is already running.
    ///
    /// The task holds only a weak reference to the target and exits once the
    /// target is dropped. Must be called within a Tokio runtime.
    pub(crate) fn start<T: Sweep>(&self, target: Weak<T>, period: Duration, name: &'static str) {
        let mut running = match self.running.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if running.as_ref().is_some_and(|r| !r.task.is_finished()) {
            return;
        }
        if period.is_zero() {
            tracing::warn!(registry = name, "Sweep period is zero, background sweep not started");
            return;
        }

        let stop = Arc::new(Notify::new());
        let signal = Arc::clone(&stop);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = signal.notified() => break,
                    _ = ticker.tick() => {
                        let Some(target) = target.upgrade() else { break };
                        let evicted = target.evict_idle();
                        if evicted > 0 {
                            tracing::debug!(registry = name, evicted, "Swept idle rate limiters");
                        }
                    }
                }
            }
            tracing::debug!(registry = name, "Sweep task stopped");
        });

        *running = Some(Running { stop, task });
        tracing::debug!(registry = name, period_secs = period.as_secs_f64(), "Sweep task started");
    }

    /// Stops the sweep loop and waits for it to finish. Safe without `start`.
    pub(crate) async fn shutdown(&self) {
        let running = match self.running.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(Running { stop, task }) = running {
            stop.notify_one();
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Sweep task ended abnormally");
            }
        }
    }

    /// Returns `true` while a sweep task is alive.
    pub(crate) fn is_running(&self) -> bool {
        match self.running.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|r| !r.task.is_finished()),
            Err(poisoned) => poisoned
                .into_inner()
                .as_ref()
                .is_some_and(|r| !r.task.is_finished()),
        }
    }
}
