//! Domain-specific assertion macros for j2g harnesses.
//!
//! These add context-rich failure messages that make it clear *which* stage of
//! the pipeline produced the unexpected value and what the record looked like.

// ---------------------------------------------------------------------------
// Entry assertions
// ---------------------------------------------------------------------------

/// Assert that an `Entry` carries an extra with the expected value.
///
/// ```rust
/// assert_extra!(entry, "Pid", "1234");
/// ```
#[macro_export]
macro_rules! assert_extra {
    ($entry:expr, $key:expr, $value:expr) => {{
        let entry: &j2g_core::Entry = &$entry;
        let key: &str = $key;
        let expected = serde_json::json!($value);
        match entry.extras.get(key) {
            Some(actual) if *actual == expected => {}
            Some(actual) => panic!(
                "assert_extra! failed:\n  entry.extras[{:?}]\n  expected: {}\n  actual:   {}",
                key, expected, actual
            ),
            None => panic!(
                "assert_extra! failed: extra {:?} not found.\n  Available extras: {:?}",
                key,
                entry.extras.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert that an `Entry` has a specific severity.
#[macro_export]
macro_rules! assert_severity {
    ($entry:expr, $severity:expr) => {{
        let entry: &j2g_core::Entry = &$entry;
        let expected: j2g_core::Severity = $severity;
        if entry.severity != expected {
            panic!(
                "assert_severity! failed:\n  expected: {:?}\n  actual:   {:?}\n  message: {:?}",
                expected, entry.severity, entry.short_message
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// GELF payload assertions
// ---------------------------------------------------------------------------

/// Assert that a decoded GELF payload has the fields every GELF 1.1 message
/// needs, with the right JSON types.
#[macro_export]
macro_rules! assert_gelf_shape {
    ($message:expr) => {{
        let message: &serde_json::Value = &$message;
        let check = |key: &str, ok: bool| {
            if !ok {
                panic!(
                    "assert_gelf_shape! failed: field {:?} missing or mistyped.\n  message: {}",
                    key, message
                );
            }
        };
        check("version", message["version"] == "1.1");
        check("host", message["host"].is_string());
        check("short_message", message["short_message"].is_string());
        check("timestamp", message["timestamp"].is_f64());
        check("level", message["level"].as_u64().map_or(false, |l| l <= 7));
        check("facility", message["facility"].is_string());
        if message.get("_id").is_some() {
            panic!("assert_gelf_shape! failed: reserved `_id` emitted.\n  message: {}", message);
        }
    }};
}

/// Assert the `short_message` of each delivered payload, in order.
///
/// ```rust
/// assert_delivered!(transport, ["first", "second"]);
/// ```
#[macro_export]
macro_rules! assert_delivered {
    ($transport:expr, [$($message:expr),* $(,)?]) => {{
        let actual = $transport.short_messages();
        let expected: Vec<String> = vec![$($message.to_string()),*];
        if actual != expected {
            panic!(
                "assert_delivered! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}
