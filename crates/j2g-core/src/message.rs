//! GELF 1.1 message: the wire-ready form of a flushed [`Entry`].
//!
//! Serializes to the GELF JSON object: the fixed fields, then every extra as
//! an additional field with a leading underscore. `_id` is reserved by GELF
//! and never emitted.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::Entry;

pub const GELF_VERSION: &str = "1.1";

/// Additional field name GELF servers reject.
const RESERVED_EXTRA: &str = "_id";

#[derive(Debug, Clone, PartialEq)]
pub struct GelfMessage {
    pub version: &'static str,
    pub host: String,
    pub short_message: String,
    pub full_message: Option<String>,
    /// Unix seconds with sub-second precision.
    pub timestamp: f64,
    pub level: u8,
    pub facility: String,
    pub extra: HashMap<String, serde_json::Value>,
}

impl From<Entry> for GelfMessage {
    fn from(entry: Entry) -> Self {
        Self {
            version: GELF_VERSION,
            timestamp: entry.timestamp_secs(),
            level: entry.severity.code(),
            host: entry.host,
            short_message: entry.short_message,
            full_message: entry.full_message,
            facility: entry.facility,
            extra: entry.extras,
        }
    }
}

impl GelfMessage {
    /// A plain key yields to an extra already spelled with the underscore,
    /// so each wire name is written once. Journal context keys are always
    /// plain; only a JSON body can supply `_Pid` next to `Pid`.
    fn shadowed(&self, key: &str, name: &str) -> bool {
        key.len() != name.len() && self.extra.contains_key(name)
    }
}

/// GELF additional-field name for an extra key.
pub fn extra_field_name(key: &str) -> String {
    if key.starts_with('_') {
        key.to_string()
    } else {
        format!("_{key}")
    }
}

impl Serialize for GelfMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("version", self.version)?;
        map.serialize_entry("host", &self.host)?;
        map.serialize_entry("short_message", &self.short_message)?;
        if let Some(full) = &self.full_message {
            map.serialize_entry("full_message", full)?;
        }
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("level", &self.level)?;
        map.serialize_entry("facility", &self.facility)?;
        for (key, value) in &self.extra {
            let name = extra_field_name(key);
            if name == RESERVED_EXTRA || self.shadowed(key, &name) {
                continue;
            }
            map.serialize_entry(&name, value)?;
        }
        map.end()
    }
}
