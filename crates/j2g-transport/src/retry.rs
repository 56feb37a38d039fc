//! Retry policy for datagram sends.

use std::time::Duration;

use j2g_core::config::TransportConfig;
use tracing::warn;

use crate::error::TransportError;
use crate::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between a failed attempt and the next one.
    pub backoff: Duration,
    /// Total attempts allowed per message; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded(backoff: Duration) -> Self {
        Self {
            backoff,
            max_attempts: None,
        }
    }

    pub fn bounded(backoff: Duration, max_attempts: u32) -> Self {
        Self {
            backoff,
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            backoff: config.retry_backoff(),
            max_attempts: config.max_attempts(),
        }
    }

    /// Whether another attempt may follow `attempts` failed ones.
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}

/// Send `payload` until the transport accepts it. Returns the number of
/// attempts made.
pub async fn send_with_retry<T: Transport>(
    transport: &T,
    payload: &[u8],
    policy: &RetryPolicy,
) -> Result<u32, TransportError> {
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match transport.send(payload).await {
            Ok(()) => return Ok(attempts),
            Err(source) if !policy.allows_retry(attempts) => {
                return Err(TransportError::Exhausted { attempts, source });
            }
            Err(e) => {
                warn!(
                    attempt = attempts,
                    error = %e,
                    backoff_ms = policy.backoff.as_millis() as u64,
                    "send failed, retrying"
                );
                tokio::time::sleep(policy.backoff).await;
            }
        }
    }
}
