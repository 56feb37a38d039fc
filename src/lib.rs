//! j2g: forward systemd journal entries to a GELF collector.
//!
//! This crate assembles the stages from `j2g-core`, `j2g-feeds` and
//! `j2g-transport` into a running [`Pipeline`](pipeline::Pipeline), and owns
//! the one background task that belongs to no single stage: the
//! [`IdleFlusher`](idle::IdleFlusher).
//!
//! # Architecture
//!
//! ```text
//! Feed ──► Decoder ──► Normalizer ──► Coalescer ──► Deliverer ──► UDP
//!                                        ▲
//!                                   IdleFlusher
//! ```
//!
//! The modules are public so that integration tests can drive the pipeline
//! with an in-memory reader and a fake transport.

pub mod idle;
pub mod pipeline;

pub use idle::IdleFlusher;
pub use pipeline::{Pipeline, PipelineReport};
