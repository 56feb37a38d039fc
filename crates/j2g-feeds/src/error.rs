//! Feed error types.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The record-producing process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child was started without a stdout pipe.
    #[error("{0} has no stdout pipe")]
    MissingStdout(String),

    /// Waiting for the child to exit failed.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}
