//! Idle flusher: the periodic task that releases a pending entry once no
//! continuation line has arrived for the idle threshold.
//!
//! The task ticks on a fixed interval and asks the coalescer to flush with the
//! current time from an injected [`Clock`]. It stops when its cancellation
//! token fires; the pipeline then drains the slot itself.

use std::sync::Arc;
use std::time::Duration;

use j2g_core::{Clock, Coalescer};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub struct IdleFlusher {
    coalescer: Arc<Coalescer>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl IdleFlusher {
    pub fn new(coalescer: Arc<Coalescer>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            coalescer,
            clock,
            interval,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<u64> {
        tokio::spawn(self.run(cancel))
    }

    /// Tick until cancelled. Returns how many entries this task flushed.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut flushed = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if self.coalescer.flush_idle(self.clock.now_micros()).await {
                        flushed += 1;
                        trace!("idle entry flushed");
                    }
                }
            }
        }
        debug!(flushed, "idle flusher stopped");
        flushed
    }
}
