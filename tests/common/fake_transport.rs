//! In-memory [`Transport`] fakes.
//!
//! [`RecordingTransport`] keeps every datagram it is handed and can decode
//! them back into GELF JSON (gunzipping when needed). Construct it with
//! [`RecordingTransport::failing_first`] to simulate a collector that is
//! unreachable for the first few sends.

use flate2::read::GzDecoder;
use j2g_transport::Transport;
use serde_json::Value;
use std::io::{self, Read};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Vec<u8>>>,
    attempts: AtomicU32,
    fail_first: u32,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Refuse the first `failures` sends with `ConnectionRefused`.
    pub fn failing_first(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            fail_first: failures,
            ..Self::default()
        })
    }

    /// Every send call, successful or not.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Raw accepted datagrams, in send order.
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    /// Accepted datagrams decoded as GELF JSON, in send order.
    pub fn messages(&self) -> Vec<Value> {
        self.payloads().iter().map(|p| decode_payload(p)).collect()
    }

    /// `short_message` of every accepted datagram, in send order.
    pub fn short_messages(&self) -> Vec<String> {
        self.messages()
            .iter()
            .map(|m| m["short_message"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, payload: &[u8]) -> io::Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_first {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "collector unreachable",
            ));
        }
        self.sent.lock().unwrap().push(payload.to_vec());
        Ok(())
    }
}

/// Decode one datagram into JSON, gunzipping it first if it carries the gzip
/// magic bytes.
pub fn decode_payload(payload: &[u8]) -> Value {
    if payload.starts_with(&GZIP_MAGIC) {
        let mut json = Vec::new();
        GzDecoder::new(payload)
            .read_to_end(&mut json)
            .expect("payload is valid gzip");
        serde_json::from_slice(&json).expect("gunzipped payload is JSON")
    } else {
        serde_json::from_slice(payload).expect("payload is JSON")
    }
}
