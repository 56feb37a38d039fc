//! Normalizer: cleans a decoded [`Entry`] before it reaches the coalescer.
//!
//! Steps, in order:
//!
//! 1. resolve the facility label (identifier, or process name when blank);
//! 2. strip the producer's prefix using the [`RuleSet`] rule for that
//!    facility, letting a captured severity token override `PRIORITY`;
//! 3. if the message is a JSON object, merge it into extras and apply the
//!    `Message` / `FullMessage` overrides;
//! 4. otherwise split multi-line text into a short line and a full body.
//!
//! The normalizer holds no mutable state and can be shared freely.

use serde_json::Value;

use crate::config::NormalizerConfig;
use crate::error::RuleError;
use crate::rules::RuleSet;
use crate::types::{Entry, Severity};

/// JSON-body key overriding the short message.
pub const MESSAGE_KEY: &str = "Message";
/// JSON-body key overriding the full message.
pub const FULL_MESSAGE_KEY: &str = "FullMessage";

#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: RuleSet,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(RuleSet::builtin())
    }
}

impl Normalizer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Built-in rules plus the `[[normalizer.rules]]` entries from config.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self, RuleError> {
        let mut rules = RuleSet::builtin();
        for rule in &config.rules {
            rules.register(rule.identifier.as_deref(), &rule.pattern)?;
        }
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn normalize(&self, mut entry: Entry) -> Entry {
        entry.facility = facility_for(&entry);
        self.strip_prefix(&mut entry);
        if !apply_json_body(&mut entry) {
            split_lines(&mut entry);
        }
        entry
    }

    fn strip_prefix(&self, entry: &mut Entry) {
        let Some(rule) = self.rules.select(&entry.facility) else {
            return;
        };
        let Some(matched) = rule.match_prefix(&entry.short_message) else {
            return;
        };
        if let Some(severity) = matched.severity.and_then(Severity::from_name) {
            entry.severity = severity;
        }
        let len = matched.len;
        entry.short_message.drain(..len);
    }
}

/// Facility label: the identifier, or the process name for producers that
/// leave `SYSLOG_IDENTIFIER` blank (php-fpm does).
fn facility_for(entry: &Entry) -> String {
    if entry.identifier.is_empty() {
        entry.process_name.clone().unwrap_or_default()
    } else {
        entry.identifier.clone()
    }
}

/// A message is treated as a JSON body when it opens an object with a quoted key.
pub fn looks_like_json(message: &str) -> bool {
    message.starts_with("{\"")
}

/// Returns `true` when the message was a JSON object and has been applied.
fn apply_json_body(entry: &mut Entry) -> bool {
    if !looks_like_json(&entry.short_message) {
        return false;
    }
    let Ok(body) = serde_json::from_str::<serde_json::Map<String, Value>>(&entry.short_message)
    else {
        return false;
    };

    entry.extras.extend(body);
    if let Some(message) = entry.extras.remove(MESSAGE_KEY) {
        entry.short_message = into_text(message);
    }
    if let Some(full) = entry.extras.remove(FULL_MESSAGE_KEY) {
        entry.full_message = Some(into_text(full));
    }
    entry.structured = true;
    true
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn split_lines(entry: &mut Entry) {
    if let Some((first, _)) = entry.short_message.split_once('\n') {
        let first = first.to_string();
        entry.full_message = Some(std::mem::replace(&mut entry.short_message, first));
    }
}
