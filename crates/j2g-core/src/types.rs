//! Core types for j2g-core.
//!
//! This module defines the unit that flows through the pipeline, the
//! [`Entry`], and its syslog [`Severity`].

use std::collections::HashMap;

/// A journal entry after decoding. The normalizer rewrites its message fields
/// in place; after that only the coalescer touches it, and only to merge a
/// continuation line into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Originating machine (`_HOSTNAME`).
    pub host: String,
    /// Producer / service name (`SYSLOG_IDENTIFIER`). May be empty.
    pub identifier: String,
    /// Executable name of the producer (`_COMM`), used when `identifier` is blank.
    pub process_name: Option<String>,
    /// Outward-facing facility label. Set by the normalizer.
    pub facility: String,
    pub severity: Severity,
    /// Event time in microseconds since the Unix epoch (`__REALTIME_TIMESTAMP`).
    pub timestamp: i64,
    /// First line of the message, or the JSON-body `Message` override.
    pub short_message: String,
    /// Complete message body when it differs from `short_message`.
    pub full_message: Option<String>,
    /// Additional attributes forwarded as GELF `_` fields. Owned by the entry.
    pub extras: HashMap<String, serde_json::Value>,
    /// True once the message body was reinterpreted as a JSON document.
    /// Structured entries are never coalesced.
    pub structured: bool,
}

impl Entry {
    /// The text this entry contributes when merged into another entry.
    pub fn body(&self) -> &str {
        self.full_message.as_deref().unwrap_or(&self.short_message)
    }

    /// Event time as fractional Unix seconds.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp as f64 / 1_000_000.0
    }
}

/// Syslog severity, 0 (most severe) to 7 (least severe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

/// Severity tokens producers put in their own prefixes. Keys are lowercase.
static SEVERITY_NAMES: phf::Map<&'static str, Severity> = phf::phf_map! {
    "emergency" => Severity::Emergency,
    "emerg" => Severity::Emergency,
    "alert" => Severity::Alert,
    "critical" => Severity::Critical,
    "crit" => Severity::Critical,
    "error" => Severity::Error,
    "err" => Severity::Error,
    "warning" => Severity::Warning,
    "warn" => Severity::Warning,
    "notice" => Severity::Notice,
    "note" => Severity::Notice,
    "info" => Severity::Info,
    "debug" => Severity::Debug,
};

impl Severity {
    /// Severity used when a record carries no `PRIORITY`.
    pub const DEFAULT: Severity = Severity::Info;

    /// Map a numeric syslog level. Returns `None` outside `0..=7`.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Severity::Emergency,
            1 => Severity::Alert,
            2 => Severity::Critical,
            3 => Severity::Error,
            4 => Severity::Warning,
            5 => Severity::Notice,
            6 => Severity::Info,
            7 => Severity::Debug,
            _ => return None,
        })
    }

    /// Look up a severity token such as `"warn"` or `"ERROR"`, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        SEVERITY_NAMES.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Emergency => write!(f, "emerg"),
            Severity::Alert => write!(f, "alert"),
            Severity::Critical => write!(f, "crit"),
            Severity::Error => write!(f, "err"),
            Severity::Warning => write!(f, "warning"),
            Severity::Notice => write!(f, "notice"),
            Severity::Info => write!(f, "info"),
            Severity::Debug => write!(f, "debug"),
        }
    }
}
