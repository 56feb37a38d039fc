//! Transport error types.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The destination name could not be resolved.
    #[error("cannot resolve destination {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The destination name resolved to nothing.
    #[error("destination {0} resolved to no addresses")]
    NoAddress(String),

    /// The local socket could not be bound or connected.
    #[error("cannot open socket to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The message could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The payload could not be compressed.
    #[error("failed to compress message: {0}")]
    Compress(#[source] io::Error),

    /// The payload cannot fit in one datagram; sending it can never succeed.
    #[error("payload of {size} bytes exceeds the datagram limit of {limit} bytes")]
    Oversize { size: usize, limit: usize },

    /// A bounded retry policy ran out of attempts.
    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: io::Error,
    },
}
