//! journalctl feed: runs `journalctl --all --output=json` as a child process
//! and reads its stdout.
//!
//! The child's stderr is inherited so its diagnostics reach the operator
//! unchanged. The child is killed if the handle is dropped before it exits.

use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};

use tokio::io::BufReader;
use tokio::process::{Child, ChildStdout, Command};
use tracing::debug;

use crate::error::FeedError;

/// Arguments always passed to journalctl ahead of the user's.
pub const JOURNALCTL_BASE_ARGS: &[&str] = &["--all", "--output=json"];

/// How to start the record producer.
#[derive(Debug, Clone)]
pub struct JournalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl JournalCommand {
    /// `journalctl --all --output=json` followed by `extra`.
    pub fn journalctl<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self::new("journalctl")
            .args(JOURNALCTL_BASE_ARGS.iter().copied())
            .args(extra)
    }

    /// An arbitrary program emitting journal JSON lines.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn spawn(&self) -> Result<(JournalProcess, BufReader<ChildStdout>), FeedError> {
        let program = self.program.to_string_lossy().into_owned();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FeedError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FeedError::MissingStdout(program.clone()))?;

        debug!(%program, args = ?self.args, pid = ?child.id(), "record producer started");
        Ok((JournalProcess { child, program }, BufReader::new(stdout)))
    }
}

/// A running record producer.
#[derive(Debug)]
pub struct JournalProcess {
    child: Child,
    program: String,
}

impl JournalProcess {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Wait for the producer to exit. Call after its stdout reached EOF.
    pub async fn wait(mut self) -> Result<ExitStatus, FeedError> {
        self.child.wait().await.map_err(|source| FeedError::Wait {
            program: self.program.clone(),
            source,
        })
    }
}
