//! Pipeline: wires the stages together and owns their tasks.
//!
//! ```text
//! reader ─► decode ─► normalize ─► Coalescer::push ─┐
//!                                                   ├─► outbox ─► Deliverer ─► Transport
//!               IdleFlusher ─► Coalescer::flush_idle┘
//! ```
//!
//! The decode loop runs on the caller's task, in record order. On end of
//! input (or shutdown) the idle flusher is stopped, the pending entry is
//! drained, the outbox is closed and the delivery task is awaited, so the
//! last entry is never lost and in-flight retries are allowed to finish.
//!
//! A line longer than `input.max_record_bytes` is skipped like any other
//! malformed record; the rest of it is read past, never buffered.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Context;
use j2g_core::config::Config;
use j2g_core::{decoder, Clock, Coalescer, Normalizer, SystemClock};
use j2g_transport::{Deliverer, DeliveryReport, Transport};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::idle::IdleFlusher;

/// What a pipeline run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    /// Non-empty input lines read.
    pub records: u64,
    /// Records that failed to decode.
    pub skipped: u64,
    /// Records merged into an earlier entry.
    pub merged: u64,
    /// Messages flushed to the outbox.
    pub flushed: u64,
    /// Of those, flushed by the idle task.
    pub idle_flushes: u64,
    pub delivery: DeliveryReport,
}

pub struct Pipeline<T> {
    config: Config,
    normalizer: Normalizer,
    transport: T,
    clock: Arc<dyn Clock>,
}

impl<T: Transport + 'static> Pipeline<T> {
    /// Fails when a configured prefix rule does not compile.
    pub fn new(config: Config, transport: T) -> anyhow::Result<Self> {
        let normalizer =
            Normalizer::from_config(&config.normalizer).context("invalid normalizer rule")?;
        debug!(rules = normalizer.rules().len(), "normalizer rules loaded");
        Ok(Self {
            config,
            normalizer,
            transport,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the wall clock used by the idle flusher.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run until `reader` reaches end of input.
    pub async fn run<R>(self, reader: R) -> anyhow::Result<PipelineReport>
    where
        R: AsyncBufRead + Unpin,
    {
        self.run_until(reader, CancellationToken::new()).await
    }

    /// Run until `reader` reaches end of input or `shutdown` is cancelled.
    /// Either way the pending entry is drained and delivered before returning.
    pub async fn run_until<R>(
        self,
        mut reader: R,
        shutdown: CancellationToken,
    ) -> anyhow::Result<PipelineReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let Pipeline {
            config,
            normalizer,
            transport,
            clock,
        } = self;

        let (outbox, queue) = mpsc::channel(config.transport.queue_capacity());
        let delivery = tokio::spawn(Deliverer::from_config(transport, &config.transport).run(queue));

        let coalescer = Arc::new(Coalescer::new(&config.coalesce, outbox));
        let stop_idle = CancellationToken::new();
        let idle = IdleFlusher::new(
            Arc::clone(&coalescer),
            clock,
            config.coalesce.flush_interval(),
        )
        .spawn(stop_idle.clone());

        let limit = config.input.max_record_bytes();
        let mut report = PipelineReport::default();
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, draining");
                    break;
                }
                read = read_record(&mut reader, &mut line, limit) => read,
            };
            match read {
                Ok(ReadOutcome::Eof) => break,
                Ok(ReadOutcome::Line) => {}
                Ok(ReadOutcome::Oversize) => {
                    report.records += 1;
                    report.skipped += 1;
                    debug!(limit, "skipping record longer than max_record_bytes");
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "reading journal records failed");
                    break;
                }
            }

            let text = String::from_utf8_lossy(&line);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            report.records += 1;

            match decoder::decode_line(text) {
                Ok(entry) => coalescer.push(normalizer.normalize(entry)).await,
                Err(e) => {
                    report.skipped += 1;
                    debug!(error = %e, "skipping record");
                }
            }
        }

        stop_idle.cancel();
        report.idle_flushes = idle.await.context("idle flusher panicked")?;
        coalescer.drain().await;

        let stats = coalescer.stats();
        report.merged = stats.merged.load(Ordering::Relaxed);
        report.flushed = stats.flushed.load(Ordering::Relaxed);

        // Last sender of the outbox; the delivery task exits once it is empty.
        drop(coalescer);
        report.delivery = delivery.await.context("delivery task panicked")?;

        info!(
            records = report.records,
            skipped = report.skipped,
            merged = report.merged,
            delivered = report.delivery.delivered,
            dropped = report.delivery.dropped,
            "pipeline finished"
        );
        Ok(report)
    }
}

enum ReadOutcome {
    Eof,
    Line,
    Oversize,
}

/// Read one line of at most `limit` bytes (plus its newline) into `line`.
async fn read_record<R>(
    reader: &mut R,
    line: &mut Vec<u8>,
    limit: usize,
) -> std::io::Result<ReadOutcome>
where
    R: AsyncBufRead + Unpin,
{
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let read = (&mut *reader).take(cap).read_until(b'\n', line).await?;
    if read == 0 {
        return Ok(ReadOutcome::Eof);
    }
    if line.len() > limit && line.last() != Some(&b'\n') {
        discard_line(reader).await?;
        return Ok(ReadOutcome::Oversize);
    }
    Ok(ReadOutcome::Line)
}

/// Consume input up to and including the next newline.
async fn discard_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (used, done) = {
            let buf = reader.fill_buf().await?;
            match buf.iter().position(|&b| b == b'\n') {
                Some(end) => (end + 1, true),
                None => (buf.len(), buf.is_empty()),
            }
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}
