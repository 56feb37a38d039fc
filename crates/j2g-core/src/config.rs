//! Configuration types for j2g.
//!
//! [`Config::load`] layers an optional user file (`--config`, or
//! `~/.config/j2g/config.toml`) on top of the embedded defaults.
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[input]
max_record_bytes = 1048576

[coalesce]
same_source_window_ms = 100
idle_threshold_ms     = 100
flush_interval_ms     = 50

[transport]
retry_backoff_ms   = 1000
max_attempts       = 0
compression        = "gzip"
max_datagram_bytes = 65000
queue_capacity     = 1024
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub coalesce: CoalesceConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

/// `[input]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Longest journal line accepted; longer lines are skipped unbuffered.
    #[serde(default = "default_max_record_bytes")]
    pub max_record_bytes: usize,
}

fn default_max_record_bytes() -> usize { 1 << 20 }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_record_bytes: default_max_record_bytes(),
        }
    }
}

impl InputConfig {
    pub fn max_record_bytes(&self) -> usize {
        self.max_record_bytes.max(1)
    }
}

/// `[coalesce]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CoalesceConfig {
    /// Two entries from the same source this close together are one event.
    #[serde(default = "default_same_source_window_ms")]
    pub same_source_window_ms: u64,
    /// A pending entry older than this is flushed by the idle task.
    #[serde(default = "default_idle_threshold_ms")]
    pub idle_threshold_ms: u64,
    /// How often the idle task checks the pending entry.
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

fn default_same_source_window_ms() -> u64 { 100 }
fn default_idle_threshold_ms() -> u64 { 100 }
fn default_flush_interval_ms() -> u64 { 50 }

impl Default for CoalesceConfig {
    fn default() -> Self {
        Self {
            same_source_window_ms: default_same_source_window_ms(),
            idle_threshold_ms: default_idle_threshold_ms(),
            flush_interval_ms: default_flush_interval_ms(),
        }
    }
}

impl CoalesceConfig {
    pub fn same_source_window(&self) -> Duration {
        Duration::from_millis(self.same_source_window_ms)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms.max(1))
    }
}

/// Payload compression applied before a datagram is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    #[default]
    Gzip,
}

/// `[transport]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// `0` retries forever.
    #[serde(default)]
    pub max_attempts: u32,
    #[serde(default)]
    pub compression: Compression,
    #[serde(default = "default_max_datagram_bytes")]
    pub max_datagram_bytes: usize,
    /// Flushed messages waiting for the delivery task.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_retry_backoff_ms() -> u64 { 1000 }
fn default_max_datagram_bytes() -> usize { 65_000 }
fn default_queue_capacity() -> usize { 1024 }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            retry_backoff_ms: default_retry_backoff_ms(),
            max_attempts: 0,
            compression: Compression::default(),
            max_datagram_bytes: default_max_datagram_bytes(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl TransportConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn max_attempts(&self) -> Option<u32> {
        (self.max_attempts > 0).then_some(self.max_attempts)
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

/// `[normalizer]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One `[[normalizer.rules]]` entry. Without `identifier` the rule is a
/// fallback for producers that have no rule of their own.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub identifier: Option<String>,
    pub pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load `path` (or the default location when `None`), layered on top of
    /// the built-in defaults. An explicit path must exist; the default
    /// location is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (config_path(), false),
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(required))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("j2g")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
