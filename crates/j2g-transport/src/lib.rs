//! j2g-transport: delivers GELF messages to the collector.
//!
//! The outbox written by the coalescer is drained by a single [`Deliverer`]
//! task. Each message is encoded once ([`Encoder`]) and then handed to a
//! [`Transport`] until a send succeeds, sleeping the [`RetryPolicy`] backoff
//! between attempts.
//!
//! UDP gives no delivery feedback of its own. An error returned from a send
//! usually reports an ICMP failure caused by an *earlier* datagram, so the
//! only sound reaction is to try the current message again.

use std::future::Future;
use std::io;
use std::sync::Arc;

pub mod delivery;
pub mod encode;
pub mod error;
pub mod retry;
pub mod udp;

pub use delivery::{Deliverer, DeliveryReport};
pub use encode::Encoder;
pub use error::TransportError;
pub use retry::{send_with_retry, RetryPolicy};
pub use udp::UdpTransport;

/// A connectionless, fire-and-forget channel to one destination.
pub trait Transport: Send + Sync {
    /// Hand one complete datagram to the channel.
    fn send(&self, payload: &[u8]) -> impl Future<Output = io::Result<()>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, payload: &[u8]) -> impl Future<Output = io::Result<()>> + Send {
        (**self).send(payload)
    }
}
