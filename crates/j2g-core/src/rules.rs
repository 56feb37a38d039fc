//! Prefix rules: per-producer patterns for boilerplate the producer writes in
//! front of every message.
//!
//! Many daemons log through the journal but still format lines for a plain
//! log file: a timestamp, often a bracketed level. The journal already records
//! both, so the normalizer strips the prefix and, when the rule captures a
//! `severity` group, lets the producer's own level override `PRIORITY`.
//!
//! A [`RuleSet`] is an ordered list of rules keyed by identifier, with rules
//! that have no identifier acting as the fallback for unknown producers.

use regex::Regex;

use crate::error::RuleError;

/// Name of the capture group holding a severity token.
pub const SEVERITY_CAPTURE: &str = "severity";

/// Built-in rules: `(identifier, pattern)`. `None` marks the fallback.
const BUILTIN_RULES: &[(Option<&str>, &str)] = &[
    (
        Some("nginx"),
        r"^20[0-9]{2}/[01][0-9]/[0-3][0-9] [0-2][0-9]:[0-5][0-9]:[0-5][0-9] \[(?P<severity>[a-z]+)\] ",
    ),
    (
        Some("graylog-server"),
        r"^20[0-9]{2}-[01][0-9]-[0-3][0-9] [0-2][0-9]:[0-5][0-9]:[0-5][0-9],[0-9]{3} (?P<severity>[A-Z]+) : ",
    ),
    (
        Some("mysqld"),
        r"^[0-9]{6} [ 01]?[0-9]:[0-5][0-9]:[0-5][0-9] \[(?P<severity>[A-Za-z]+)\] ",
    ),
    (
        Some("searchd"),
        r"^\[[A-Z][a-z]{2} [A-Z][a-z]{2} +[0-9]+ [0-2][0-9]:[0-5][0-9]:[0-5][0-9]\.[0-9]{3} 20[0-9]{2}\] \[ *[0-9]+\] ",
    ),
    (
        Some("jenkins"),
        r"^[A-Z][a-z]{2} [0-3]?[0-9], 20[0-9]{2} [01]?[0-9]:[0-5][0-9]:[0-5][0-9] [AP]M ",
    ),
    (Some("php-fpm"), r"^pool [A-Za-z0-9_.-]+: "),
    (
        None,
        r"^\[?20[0-9]{2}[-/][01][0-9][-/][0-3][0-9][ T][0-2][0-9]:[0-5][0-9]:[0-5][0-9](?:[.,][0-9]+)?(?:Z|[+-][0-9]{2}:?[0-9]{2})?\]? +(?:\[?(?P<severity>(?i:emerg|emergency|alert|crit|critical|err|error|warn|warning|notice|info|debug))\]?:? +)?",
    ),
];

/// One registered prefix pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    identifier: Option<String>,
    pattern: Regex,
}

/// Result of matching a rule against a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch<'t> {
    /// Byte length of the matched prefix.
    pub len: usize,
    /// Text of the `severity` capture, when the rule has one and it matched.
    pub severity: Option<&'t str>,
}

impl Rule {
    /// Compile a rule. Patterns must be anchored with `^`.
    pub fn new(identifier: Option<&str>, pattern: &str) -> Result<Self, RuleError> {
        let label = identifier.unwrap_or("*").to_string();
        if !pattern.starts_with('^') {
            return Err(RuleError::Unanchored { identifier: label });
        }
        let pattern = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            identifier: label,
            source,
        })?;
        Ok(Self {
            identifier: identifier.map(str::to_string),
            pattern,
        })
    }

    /// The producer this rule is for; `None` for the fallback rule.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn captures_severity(&self) -> bool {
        self.pattern
            .capture_names()
            .flatten()
            .any(|name| name == SEVERITY_CAPTURE)
    }

    pub fn match_prefix<'t>(&self, message: &'t str) -> Option<PrefixMatch<'t>> {
        let captures = self.pattern.captures(message)?;
        let whole = captures.get(0)?;
        Some(PrefixMatch {
            len: whole.end(),
            severity: captures.name(SEVERITY_CAPTURE).map(|m| m.as_str()),
        })
    }
}

/// Ordered prefix rules. Rules registered at runtime are consulted before the
/// built-ins, so configuration can override a built-in pattern.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    registered: usize,
}

impl RuleSet {
    /// A rule set with no rules: every message is left untouched.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in rules for common daemons plus the leading-timestamp fallback.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(identifier, pattern)| {
                Rule::new(*identifier, pattern).expect("built-in rule pattern must compile")
            })
            .collect();
        Self {
            rules,
            registered: 0,
        }
    }

    /// Add a rule ahead of the built-ins and of nothing registered earlier.
    pub fn register(&mut self, identifier: Option<&str>, pattern: &str) -> Result<(), RuleError> {
        let rule = Rule::new(identifier, pattern)?;
        self.rules.insert(self.registered, rule);
        self.registered += 1;
        Ok(())
    }

    /// The rule for `identifier`, or the first fallback rule if none is keyed
    /// to it.
    pub fn select(&self, identifier: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.identifier() == Some(identifier))
            .or_else(|| self.rules.iter().find(|rule| rule.identifier().is_none()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
