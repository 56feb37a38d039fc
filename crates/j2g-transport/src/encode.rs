//! GELF payload encoding: JSON, optionally gzip-compressed.
//!
//! GELF servers detect gzip by its magic bytes, so compressed and plain
//! payloads need no framing. Chunked GELF is not produced; a payload that does
//! not fit in one datagram is rejected here instead of failing on every send.

use std::io::Write;

use flate2::write::GzEncoder;
use j2g_core::config::{Compression, TransportConfig};
use j2g_core::GelfMessage;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    compression: Compression,
    max_datagram_bytes: usize,
}

impl Encoder {
    pub fn new(compression: Compression, max_datagram_bytes: usize) -> Self {
        Self {
            compression,
            max_datagram_bytes,
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.compression, config.max_datagram_bytes)
    }

    pub fn encode(&self, message: &GelfMessage) -> Result<Vec<u8>, TransportError> {
        let json = serde_json::to_vec(message)?;
        let payload = match self.compression {
            Compression::None => json,
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(&json).map_err(TransportError::Compress)?;
                encoder.finish().map_err(TransportError::Compress)?
            }
        };
        if payload.len() > self.max_datagram_bytes {
            return Err(TransportError::Oversize {
                size: payload.len(),
                limit: self.max_datagram_bytes,
            });
        }
        Ok(payload)
    }
}
