//! Rule severities
//!
//! A ruleset maps rule ids to the severity their messages are reported
//! with. It can be loaded from JSON such as `{"ids": 0, "important": "error"}`.

use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{LintError, LintResult};
use crate::rules::RULES;

/// How messages of a rule are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSeverity", into = "u8")]
pub enum Severity {
    Off,
    Warning,
    Error,
}

impl Severity {
    /// Parse `0`/`1`/`2`, `false`/`true`, `off`/`warning`/`error`.
    /// An empty word means warning.
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "0" | "false" | "off" => Some(Severity::Off),
            "" | "1" | "warn" | "warning" => Some(Severity::Warning),
            "2" | "true" | "error" => Some(Severity::Error),
            _ => None,
        }
    }

    pub fn is_on(self) -> bool {
        self != Severity::Off
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Off => "off",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s as u8
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeverity {
    Number(i64),
    Bool(bool),
    Word(String),
}

impl TryFrom<RawSeverity> for Severity {
    type Error = LintError;

    fn try_from(raw: RawSeverity) -> Result<Self, LintError> {
        match raw {
            RawSeverity::Number(0) | RawSeverity::Bool(false) => Ok(Severity::Off),
            RawSeverity::Number(1) => Ok(Severity::Warning),
            RawSeverity::Number(2) | RawSeverity::Bool(true) => Ok(Severity::Error),
            RawSeverity::Number(n) => Err(LintError::UnknownSeverity(n.to_string())),
            RawSeverity::Word(w) => Severity::parse(&w).ok_or(LintError::UnknownSeverity(w)),
        }
    }
}

/// Rule id to severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ruleset(FxHashMap<String, Severity>);

impl Ruleset {
    /// A ruleset with every rule off
    pub fn empty() -> Self {
        Self(FxHashMap::default())
    }

    pub fn from_json(json: &str) -> LintResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> LintResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn get(&self, id: &str) -> Severity {
        self.0.get(id).copied().unwrap_or(Severity::Off)
    }

    pub fn set(&mut self, id: impl Into<String>, severity: Severity) {
        self.0.insert(id.into(), severity);
    }

    /// Copy every entry of `other` over this ruleset
    pub fn merge(&mut self, other: &Ruleset) {
        for (id, severity) in &other.0 {
            self.0.insert(id.clone(), *severity);
        }
    }

    /// Ids of the rules that are not off
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|(_, s)| s.is_on()).map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.0.iter().map(|(id, s)| (id.as_str(), *s))
    }
}

impl Default for Ruleset {
    /// Every registered rule as a warning
    fn default() -> Self {
        Self(RULES.iter().map(|r| (r.id.to_string(), Severity::Warning)).collect())
    }
}

impl<S: Into<String>> FromIterator<(S, Severity)> for Ruleset {
    fn from_iter<I: IntoIterator<Item = (S, Severity)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, s)| (id.into(), s)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_words() {
        assert_eq!(Severity::parse("2"), Some(Severity::Error));
        assert_eq!(Severity::parse(" true "), Some(Severity::Error));
        assert_eq!(Severity::parse(""), Some(Severity::Warning));
        assert_eq!(Severity::parse("false"), Some(Severity::Off));
        assert_eq!(Severity::parse("loud"), None);
    }

    #[test]
    fn test_from_json() {
        let rs = Ruleset::from_json(r#"{"ids": 0, "important": "error", "floats": true, "zero-units": 1}"#)
            .unwrap();
        assert_eq!(rs.get("ids"), Severity::Off);
        assert_eq!(rs.get("important"), Severity::Error);
        assert_eq!(rs.get("floats"), Severity::Error);
        assert_eq!(rs.get("zero-units"), Severity::Warning);
        assert_eq!(rs.get("missing"), Severity::Off);
        assert_eq!(rs.enabled().count(), 3);
    }

    #[test]
    fn test_bad_severity() {
        assert!(Ruleset::from_json(r#"{"ids": 5}"#).is_err());
        assert!(Ruleset::from_json(r#"{"ids": "loud"}"#).is_err());
    }

    #[test]
    fn test_default_enables_everything() {
        let rs = Ruleset::default();
        assert_eq!(rs.get("duplicate-properties"), Severity::Warning);
        assert_eq!(rs.enabled().count(), RULES.len());
    }
}
