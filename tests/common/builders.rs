//! Test builders: ergonomic constructors for `Entry` values and journal
//! records.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use j2g_core::{Entry, Severity};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// EntryBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Entry`] fixtures that skip the decoder.
///
/// # Example
///
/// ```rust
/// let entry = EntryBuilder::new("upstream timed out")
///     .identifier("nginx")
///     .severity(Severity::Error)
///     .at(1_000_000)
///     .build();
/// ```
pub struct EntryBuilder {
    host: String,
    identifier: String,
    process_name: Option<String>,
    severity: Severity,
    timestamp: i64,
    message: String,
    full_message: Option<String>,
    extras: HashMap<String, Value>,
    structured: bool,
}

impl EntryBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            host: "machine.nl".to_string(),
            identifier: "app".to_string(),
            process_name: None,
            severity: Severity::Info,
            timestamp: 1_549_067_421_000_000,
            message: message.into(),
            full_message: None,
            extras: HashMap::new(),
            structured: false,
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn process_name(mut self, name: impl Into<String>) -> Self {
        self.process_name = Some(name.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Timestamp in microseconds since the epoch.
    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn full_message(mut self, full: impl Into<String>) -> Self {
        self.full_message = Some(full.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn structured(mut self) -> Self {
        self.structured = true;
        self
    }

    pub fn build(self) -> Entry {
        Entry {
            host: self.host,
            facility: self.identifier.clone(),
            identifier: self.identifier,
            process_name: self.process_name,
            severity: self.severity,
            timestamp: self.timestamp,
            short_message: self.message,
            full_message: self.full_message,
            extras: self.extras,
            structured: self.structured,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for journal JSON lines, as `journalctl --output=json`
/// writes them: every value a string unless set otherwise with [`raw`].
///
/// [`raw`]: RecordBuilder::raw
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new(message: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("MESSAGE".into(), json!(message));
        fields.insert("PRIORITY".into(), json!("6"));
        fields.insert("__REALTIME_TIMESTAMP".into(), json!("1549067421000000"));
        fields.insert("_HOSTNAME".into(), json!("machine.nl"));
        fields.insert("SYSLOG_IDENTIFIER".into(), json!("app"));
        fields.insert("_PID".into(), json!("4242"));
        fields.insert("_UID".into(), json!("0"));
        fields.insert("_BOOT_ID".into(), json!("61c0e40c739f4f009c785cef13b46e17"));
        Self { fields }
    }

    pub fn identifier(self, identifier: &str) -> Self {
        self.field("SYSLOG_IDENTIFIER", identifier)
    }

    pub fn priority(self, priority: u8) -> Self {
        self.field("PRIORITY", &priority.to_string())
    }

    /// `__REALTIME_TIMESTAMP` in microseconds.
    pub fn at(self, timestamp: i64) -> Self {
        self.field("__REALTIME_TIMESTAMP", &timestamp.to_string())
    }

    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.into(), json!(value));
        self
    }

    /// Set a field to an arbitrary JSON value (byte arrays, wrong types).
    pub fn raw(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    pub fn line(self) -> String {
        Value::Object(self.fields).to_string()
    }
}

/// Join journal lines into the newline-delimited stream a feed produces.
pub fn journal_stream<I, S>(lines: I) -> Vec<u8>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stream = Vec::new();
    for line in lines {
        stream.extend_from_slice(line.as_ref().as_bytes());
        stream.push(b'\n');
    }
    stream
}
