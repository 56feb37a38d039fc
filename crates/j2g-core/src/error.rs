//! Error types for the decode and normalize stages.
//!
//! Decode errors are classified structurally so that the decoder can tell the
//! one recoverable anomaly (a byte-array `MESSAGE`) apart from every other
//! failure without inspecting error text.

use thiserror::Error;

/// The JSON type of a record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Why a journal record could not be turned into an [`Entry`](crate::Entry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line is not valid JSON.
    #[error("malformed record: {0}")]
    Syntax(String),

    /// The line is valid JSON but not an object.
    #[error("record must be a JSON object, found {0}")]
    NotAnObject(ValueKind),

    /// A field holds a value of the wrong JSON type.
    #[error("field {field}: expected {expected}, found {actual}")]
    TypeMismatch {
        field: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// A mandatory field is absent.
    #[error("field {field} is missing")]
    MissingField { field: &'static str },

    /// A decimal-string field does not parse as a number.
    #[error("field {field}: {value:?} is not a decimal number")]
    NotNumeric { field: &'static str, value: String },

    /// `PRIORITY` parsed but lies outside the syslog range.
    #[error("severity {0} is outside 0-7")]
    SeverityOutOfRange(u64),

    /// `__REALTIME_TIMESTAMP` does not fit the signed microsecond range.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(u64),

    /// An element of a byte-array field is not an integer in `0..=255`.
    #[error("field {field}: element {index} is not a byte value")]
    InvalidByte { field: &'static str, index: usize },
}

/// A prefix rule could not be registered.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid pattern for rule {identifier:?}: {source}")]
    InvalidPattern {
        identifier: String,
        #[source]
        source: regex::Error,
    },

    /// Every rule must be anchored at the start of the message.
    #[error("pattern for rule {identifier:?} must start with '^'")]
    Unanchored { identifier: String },
}
