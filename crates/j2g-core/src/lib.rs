//! j2g-core: journal-to-GELF core library.
//!
//! This crate holds every stage of the forwarding pipeline that has real
//! invariants, plus the shared types used across stages.
//!
//! # Architecture
//!
//! ```text
//! Decoder ──► Normalizer ──► Coalescer ──► outbox ──► Transport
//!                               ▲
//!                     idle flush (timer)
//! ```
//!
//! The [`Coalescer`](coalescer::Coalescer) is the only stage with shared
//! mutable state. Everything upstream of it is a pure function of one record;
//! everything downstream of it consumes [`GelfMessage`] values in flush order.

pub mod clock;
pub mod coalescer;
pub mod config;
pub mod decoder;
pub mod error;
pub mod message;
pub mod normalizer;
pub mod rules;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coalescer::{Coalescer, CoalescerStats, PendingSlot};
pub use error::{DecodeError, RuleError, ValueKind};
pub use message::GelfMessage;
pub use normalizer::Normalizer;
pub use rules::{Rule, RuleSet};
pub use types::{Entry, Severity};
