//! Coalescer: merges continuation lines into the entry they belong to.
//!
//! Records arrive one at a time with no lookahead, so the coalescer keeps the
//! most recent entry in a [`PendingSlot`] until it knows whether the next
//! record continues it. Three operations touch the slot and all three are
//! serialized by one async mutex:
//!
//! - [`push`](Coalescer::push) merges the new entry into the held one when
//!   they share a source, otherwise flushes the held entry and holds the new
//!   one;
//! - [`flush_idle`](Coalescer::flush_idle) flushes the held entry once it is
//!   older than the idle threshold. Merging advances the held timestamp, so a
//!   steady stream of continuation lines keeps the entry pending;
//! - [`drain`](Coalescer::drain) flushes unconditionally at shutdown.
//!
//! A flush removes the entry from the slot, converts it to a [`GelfMessage`]
//! and enqueues it on the outbox while the lock is still held. The outbox has
//! a single consumer, so messages leave in exactly the order they were
//! flushed, and a slow send never holds the slot lock.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, Mutex};
use tracing::{trace, warn};

use crate::config::CoalesceConfig;
use crate::message::GelfMessage;
use crate::types::Entry;

/// Zero or one entry awaiting its continuation lines.
#[derive(Debug, Default)]
pub struct PendingSlot {
    entry: Option<Entry>,
}

impl PendingSlot {
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn peek(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    fn take(&mut self) -> Option<Entry> {
        self.entry.take()
    }

    fn hold(&mut self, entry: Entry) {
        self.entry = Some(entry);
    }
}

/// Counters for the coalescer.
#[derive(Debug, Default)]
pub struct CoalescerStats {
    /// Entries passed to `push`.
    pub pushed: AtomicU64,
    /// Entries merged into a pending entry.
    pub merged: AtomicU64,
    /// Messages handed to the outbox.
    pub flushed: AtomicU64,
    /// Messages lost because the outbox was closed.
    pub dropped: AtomicU64,
}

pub struct Coalescer {
    slot: Mutex<PendingSlot>,
    window_micros: i64,
    idle_micros: i64,
    outbox: mpsc::Sender<GelfMessage>,
    stats: CoalescerStats,
}

impl Coalescer {
    pub fn new(config: &CoalesceConfig, outbox: mpsc::Sender<GelfMessage>) -> Self {
        Self {
            slot: Mutex::new(PendingSlot::default()),
            window_micros: micros(config.same_source_window()),
            idle_micros: micros(config.idle_threshold()),
            outbox,
            stats: CoalescerStats::default(),
        }
    }

    pub fn stats(&self) -> &CoalescerStats {
        &self.stats
    }

    /// Whether an entry is currently pending.
    pub async fn is_pending(&self) -> bool {
        !self.slot.lock().await.is_empty()
    }

    /// A copy of the pending entry, if any.
    pub async fn pending(&self) -> Option<Entry> {
        self.slot.lock().await.peek().cloned()
    }

    pub async fn push(&self, entry: Entry) {
        let mut slot = self.slot.lock().await;
        self.stats.pushed.fetch_add(1, Ordering::Relaxed);

        match slot.take() {
            None => slot.hold(entry),
            Some(mut held) if self.continues(&held, &entry) => {
                absorb(&mut held, entry);
                slot.hold(held);
                self.stats.merged.fetch_add(1, Ordering::Relaxed);
            }
            Some(held) => {
                slot.hold(entry);
                self.emit(held).await;
            }
        }
    }

    /// Flush the pending entry if it is older than the idle threshold at
    /// `now_micros`. Returns whether a message was flushed.
    pub async fn flush_idle(&self, now_micros: i64) -> bool {
        let mut slot = self.slot.lock().await;
        let expired = slot
            .peek()
            .is_some_and(|held| now_micros.saturating_sub(held.timestamp) > self.idle_micros);
        if !expired {
            return false;
        }
        match slot.take() {
            Some(held) => {
                self.emit(held).await;
                true
            }
            None => false,
        }
    }

    /// Flush the pending entry regardless of age. Returns whether a message
    /// was flushed.
    pub async fn drain(&self) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.take() {
            Some(held) => {
                self.emit(held).await;
                true
            }
            None => false,
        }
    }

    /// Same identifier, same severity, close enough in time, and neither
    /// side carries a JSON body.
    fn continues(&self, held: &Entry, next: &Entry) -> bool {
        held.identifier == next.identifier
            && held.severity == next.severity
            && next.timestamp.abs_diff(held.timestamp) <= self.window_micros.unsigned_abs()
            && !held.structured
            && !next.structured
    }

    async fn emit(&self, entry: Entry) {
        trace!(
            facility = %entry.facility,
            severity = %entry.severity,
            timestamp = entry.timestamp,
            "flushing entry"
        );
        if self.outbox.send(GelfMessage::from(entry)).await.is_err() {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            warn!("outbox closed, dropping message");
            return;
        }
        self.stats.flushed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Append `next` as a new line of `held`'s full body and move `held`'s
/// timestamp forward to `next`'s.
fn absorb(held: &mut Entry, next: Entry) {
    let full = held
        .full_message
        .get_or_insert_with(|| held.short_message.clone());
    full.push('\n');
    full.push_str(next.body());
    held.timestamp = next.timestamp;
}

fn micros(duration: std::time::Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}
