//! Shared test utilities for j2g integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. The fake transports record every payload in memory and
//! work with `tokio::time::pause()`, so timing tests stay deterministic.

pub mod assertions;
pub mod builders;
pub mod fake_transport;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fake_transport::*;
pub use fixtures::*;
