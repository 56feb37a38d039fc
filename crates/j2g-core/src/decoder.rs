//! Decoder: turns one journal record into a typed [`Entry`].
//!
//! journalctl's JSON output encodes every field as a string, numbers
//! included. The one exception is a field whose value is not printable UTF-8:
//! journalctl emits it as an array of byte values instead. For `MESSAGE` that
//! is common enough (kernel and terminal output) to be worth recovering, so
//! decoding runs in two stages:
//!
//! 1. decode every field with its expected type;
//! 2. if, and only if, stage 1 failed with a type mismatch on `MESSAGE` where
//!    an array was found, rebuild the text from the byte array and decode the
//!    rest of the record again with that text.
//!
//! Every other error rejects the whole record.

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{DecodeError, ValueKind};
use crate::types::{Entry, Severity};

/// One journal record as parsed from its JSON line.
pub type RawRecord = serde_json::Map<String, Value>;

/// Journal field names read by the decoder.
pub mod fields {
    pub const HOSTNAME: &str = "_HOSTNAME";
    pub const MESSAGE: &str = "MESSAGE";
    pub const PRIORITY: &str = "PRIORITY";
    pub const REALTIME_TIMESTAMP: &str = "__REALTIME_TIMESTAMP";
    pub const SYSLOG_IDENTIFIER: &str = "SYSLOG_IDENTIFIER";
    pub const COMM: &str = "_COMM";
    pub const PID: &str = "_PID";
    pub const UID: &str = "_UID";
    pub const BOOT_ID: &str = "_BOOT_ID";
    pub const SYSTEMD_UNIT: &str = "_SYSTEMD_UNIT";
    pub const SYSTEMD_SESSION: &str = "_SYSTEMD_SESSION";
}

/// Journal fields copied into extras under a GELF-friendly name. The first
/// group is always present (empty when the journal omits it); the second only
/// when the journal has it.
const CONTEXT_FIELDS: &[(&str, &str)] = &[
    (fields::PID, "Pid"),
    (fields::UID, "Uid"),
    (fields::BOOT_ID, "Boot_id"),
];
const OPTIONAL_CONTEXT_FIELDS: &[(&str, &str)] = &[
    (fields::SYSTEMD_UNIT, "Systemd_unit"),
    (fields::SYSTEMD_SESSION, "Systemd_session"),
];

/// Parse one line of `journalctl --output=json` and decode it.
pub fn decode_line(line: &str) -> Result<Entry, DecodeError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    match value {
        Value::Object(record) => decode(&record),
        other => Err(DecodeError::NotAnObject(ValueKind::of(&other))),
    }
}

/// Decode a parsed record, recovering a byte-array `MESSAGE`.
pub fn decode(record: &RawRecord) -> Result<Entry, DecodeError> {
    match decode_typed(record, None) {
        Err(DecodeError::TypeMismatch {
            field: fields::MESSAGE,
            actual: ValueKind::Array,
            ..
        }) => {
            let message = recover_byte_message(record)?;
            decode_typed(record, Some(message))
        }
        result => result,
    }
}

fn decode_typed(record: &RawRecord, message: Option<String>) -> Result<Entry, DecodeError> {
    let message = match message {
        Some(message) => message,
        None => text(record, fields::MESSAGE)?.unwrap_or_default(),
    };

    let severity = match number::<u64>(record, fields::PRIORITY)? {
        None => Severity::DEFAULT,
        Some(code) => u8::try_from(code)
            .ok()
            .and_then(Severity::from_code)
            .ok_or(DecodeError::SeverityOutOfRange(code))?,
    };

    let timestamp = number::<u64>(record, fields::REALTIME_TIMESTAMP)?.ok_or(
        DecodeError::MissingField {
            field: fields::REALTIME_TIMESTAMP,
        },
    )?;
    let timestamp =
        i64::try_from(timestamp).map_err(|_| DecodeError::TimestampOutOfRange(timestamp))?;

    let identifier = text(record, fields::SYSLOG_IDENTIFIER)?.unwrap_or_default();

    let mut extras = HashMap::new();
    for (field, key) in CONTEXT_FIELDS {
        let value = text(record, *field)?.unwrap_or_default();
        extras.insert((*key).to_string(), Value::String(value));
    }
    for (field, key) in OPTIONAL_CONTEXT_FIELDS {
        if let Some(value) = text(record, *field)? {
            extras.insert((*key).to_string(), Value::String(value));
        }
    }

    Ok(Entry {
        host: text(record, fields::HOSTNAME)?.unwrap_or_default(),
        facility: identifier.clone(),
        identifier,
        process_name: text(record, fields::COMM)?,
        severity,
        timestamp,
        short_message: message,
        full_message: None,
        extras,
        structured: false,
    })
}

/// Read a string field. Absent and `null` both read as `None`.
fn text(record: &RawRecord, field: &'static str) -> Result<Option<String>, DecodeError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(DecodeError::TypeMismatch {
            field,
            expected: ValueKind::String,
            actual: ValueKind::of(other),
        }),
    }
}

/// Read a decimal-string field.
fn number<T: FromStr>(record: &RawRecord, field: &'static str) -> Result<Option<T>, DecodeError> {
    let Some(raw) = text(record, field)? else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(DecodeError::NotNumeric { field, value: raw }),
    }
}

fn recover_byte_message(record: &RawRecord) -> Result<String, DecodeError> {
    let values = match record.get(fields::MESSAGE) {
        Some(Value::Array(values)) => values,
        other => {
            return Err(DecodeError::TypeMismatch {
                field: fields::MESSAGE,
                expected: ValueKind::Array,
                actual: other.map_or(ValueKind::Null, ValueKind::of),
            })
        }
    };

    let bytes = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or(DecodeError::InvalidByte {
                    field: fields::MESSAGE,
                    index,
                })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
