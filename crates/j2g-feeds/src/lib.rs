//! j2g-feeds: journal record sources for j2g.
//!
//! A feed yields journal records as newline-delimited JSON on an
//! [`AsyncBufRead`](tokio::io::AsyncBufRead). The pipeline only needs the
//! reader; the feed keeps whatever it needs to shut down cleanly (for
//! journalctl, the child process handle).

pub mod error;
pub mod journal;
pub mod stdin;

pub use error::FeedError;
pub use journal::{JournalCommand, JournalProcess};
pub use stdin::stdin_reader;
