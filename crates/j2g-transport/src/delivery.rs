//! Delivery worker: the single consumer of the coalescer's outbox.

use j2g_core::config::TransportConfig;
use j2g_core::GelfMessage;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::encode::Encoder;
use crate::error::TransportError;
use crate::retry::{send_with_retry, RetryPolicy};
use crate::Transport;

/// Totals reported when the outbox closes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Messages the transport accepted.
    pub delivered: u64,
    /// Messages given up on (oversize, or a bounded policy ran out).
    pub dropped: u64,
    /// Failed attempts that were retried.
    pub retries: u64,
}

pub struct Deliverer<T> {
    transport: T,
    encoder: Encoder,
    policy: RetryPolicy,
}

impl<T: Transport> Deliverer<T> {
    pub fn new(transport: T, encoder: Encoder, policy: RetryPolicy) -> Self {
        Self {
            transport,
            encoder,
            policy,
        }
    }

    pub fn from_config(transport: T, config: &TransportConfig) -> Self {
        Self::new(
            transport,
            Encoder::from_config(config),
            RetryPolicy::from_config(config),
        )
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode and send one message, retrying per the policy. Returns the
    /// number of attempts it took.
    pub async fn deliver(&self, message: &GelfMessage) -> Result<u32, TransportError> {
        let payload = self.encoder.encode(message)?;
        send_with_retry(&self.transport, &payload, &self.policy).await
    }

    /// Deliver messages in arrival order until every sender of `outbox` is
    /// gone and the queue is empty.
    pub async fn run(self, mut outbox: mpsc::Receiver<GelfMessage>) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        while let Some(message) = outbox.recv().await {
            match self.deliver(&message).await {
                Ok(attempts) => {
                    report.delivered += 1;
                    report.retries += u64::from(attempts - 1);
                    if attempts > 1 {
                        debug!(attempts, facility = %message.facility, "delivered after retry");
                    }
                }
                Err(e) => {
                    report.dropped += 1;
                    if let TransportError::Exhausted { attempts, .. } = &e {
                        report.retries += u64::from(attempts - 1);
                    }
                    error!(error = %e, facility = %message.facility, "dropping message");
                }
            }
        }
        debug!(?report, "outbox closed");
        report
    }
}
