use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::SyncEvent;

/// Owns the auto-refresh timer.
///
/// At most one timer task exists: [`start`](Self::start) aborts the active
/// one before spawning its replacement. The first tick fires one period
/// after start, then every period. Read failures never reach this type, so
/// they never stop the timer. Each start bumps a generation carried by
/// its ticks, so ticks still queued from an aborted timer can be told apart.
#[derive(Debug)]
pub struct PollController {
    period: Duration,
    active: Option<JoinHandle<()>>,
    generation: u64,
}

impl PollController {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: None,
            generation: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a tick of `generation` comes from the timer running now.
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }

    /// Enter RUNNING, replacing any timer that is already active.
    pub fn start(&mut self, tx: mpsc::UnboundedSender<SyncEvent>) {
        self.stop();
        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(SyncEvent::Tick(generation)).is_err() {
                    break;
                }
            }
        });
        self.active = Some(handle);
        tracing::debug!(period_ms = period.as_millis() as u64, "auto-refresh started");
    }

    /// Enter STOPPED. No-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.abort();
            tracing::debug!("auto-refresh stopped");
        }
    }

    /// Flip between RUNNING and STOPPED; returns the new running state.
    pub fn toggle(&mut self, tx: mpsc::UnboundedSender<SyncEvent>) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start(tx);
        }
        self.is_running()
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        self.stop();
    }
}
