//! Message reporter
//!
//! Collects the messages of all rules during one run. Rule messages get
//! their final severity from the ruleset here and are dropped when an
//! embedded override exempts their line.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use stylint_css::{split_lines, ParseStats, SourceLocation};

use crate::overrides::Overrides;
use crate::ruleset::{Ruleset, Severity};

/// Grammar abbreviations and what messages call them
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("rel-hsl", "h-s-l-alpha-none"),
    ("rel-hwb", "h-w-b-alpha-none"),
    ("rel-lab", "l-a-b-alpha-none"),
    ("rel-lch", "l-c-h-alpha-none"),
    ("rel-rgb", "r-g-b-alpha-none"),
    ("int", "integer"),
    ("len", "length"),
    ("num", "number"),
    ("pct", "percentage"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
    Info,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageKind::Error => "error",
            MessageKind::Warning => "warning",
            MessageKind::Info => "info",
        })
    }
}

/// One diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub message: String,
    /// 0 for rollups
    pub line: usize,
    pub col: usize,
    /// Source line the message points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub rule: String,
    /// Concerns the whole sheet
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rollup: bool,
}

/// Result of a lint run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub messages: Vec<Message>,
    /// Counters published by rules
    pub stats: BTreeMap<String, usize>,
    /// Parser work for this run
    pub parse: ParseStats,
}

impl Report {
    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.kind == MessageKind::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

pub struct Reporter<'a> {
    lines: Vec<&'a str>,
    ruleset: &'a Ruleset,
    overrides: &'a Overrides,
    messages: Vec<Message>,
    stats: BTreeMap<String, usize>,
}

impl<'a> Reporter<'a> {
    pub fn new(text: &'a str, ruleset: &'a Ruleset, overrides: &'a Overrides) -> Self {
        Self {
            lines: split_lines(text),
            ruleset,
            overrides,
            messages: Vec::new(),
            stats: BTreeMap::new(),
        }
    }

    fn push(&mut self, kind: MessageKind, message: String, loc: SourceLocation, rule: &str) {
        let evidence = loc.line.checked_sub(1).and_then(|i| self.lines.get(i)).map(|l| l.to_string());
        self.messages.push(Message {
            kind,
            message,
            line: loc.line,
            col: loc.column,
            evidence,
            rule: rule.to_string(),
            rollup: false,
        });
    }

    /// An error regardless of the ruleset and overrides
    pub fn error(&mut self, message: impl Into<String>, loc: SourceLocation, rule: &str) {
        self.push(MessageKind::Error, message.into(), loc, rule);
    }

    /// A rule violation, with the severity the ruleset gives `rule`
    pub fn report(&mut self, message: impl Into<String>, loc: SourceLocation, rule: &str) {
        if self.overrides.suppresses(loc.line, rule) {
            return;
        }
        let kind = match self.ruleset.get(rule) {
            Severity::Error => MessageKind::Error,
            _ => MessageKind::Warning,
        };
        self.push(kind, message.into(), loc, rule);
    }

    pub fn info(&mut self, message: impl Into<String>, loc: SourceLocation, rule: &str) {
        self.push(MessageKind::Info, message.into(), loc, rule);
    }

    fn rollup(&mut self, kind: MessageKind, message: String, rule: &str) {
        self.messages.push(Message {
            kind,
            message,
            line: 0,
            col: 0,
            evidence: None,
            rule: rule.to_string(),
            rollup: true,
        });
    }

    pub fn rollup_error(&mut self, message: impl Into<String>, rule: &str) {
        self.rollup(MessageKind::Error, message.into(), rule);
    }

    pub fn rollup_warn(&mut self, message: impl Into<String>, rule: &str) {
        self.rollup(MessageKind::Warning, message.into(), rule);
    }

    pub fn stat(&mut self, name: &str, value: usize) {
        self.stats.insert(name.to_string(), value);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Sort by position with rollups last and spell out grammar abbreviations
    pub fn finish(self, parse: ParseStats) -> Report {
        let mut messages = self.messages;
        messages.sort_by_key(|m| (m.rollup, m.line, m.col));
        for m in &mut messages {
            if m.message.contains('<') {
                m.message = unabbreviate(&m.message);
            }
        }
        Report { messages, stats: self.stats, parse }
    }
}

/// `<len>` -> `<length>`, `<rel-hsl>` -> `<h-s-l-alpha-none>`, also after a `-`
fn unabbreviate(message: &str) -> String {
    let mut out = String::with_capacity(message.len() + 16);
    let mut rest = message;
    while let Some(i) = rest.find(['<', '-']) {
        out.push_str(&rest[..=i]);
        rest = &rest[i + 1..];
        let found = ABBREVIATIONS.iter().find(|(short, _)| {
            rest.strip_prefix(short)
                .and_then(|after| after.chars().next())
                .is_some_and(|c| !(c.is_alphanumeric() || c == '_'))
        });
        if let Some((short, long)) = found {
            out.push_str(long);
            rest = &rest[short.len()..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: usize, col: usize) -> SourceLocation {
        SourceLocation::new(line, col, 0)
    }

    #[test]
    fn test_unabbreviate() {
        assert_eq!(
            unabbreviate("Expected <len> | <pct> but found \"x\"."),
            "Expected <length> | <percentage> but found \"x\"."
        );
        assert_eq!(unabbreviate("<rel-hsl>#{3}"), "<h-s-l-alpha-none>#{3}");
        assert_eq!(unabbreviate("<length-pct> <intro>"), "<length-percentage> <intro>");
        assert_eq!(unabbreviate("<num>"), "<number>");
        assert_eq!(unabbreviate("<int"), "<int");
    }

    #[test]
    fn test_severity_and_overrides() {
        let ruleset: Ruleset = [("ids", Severity::Error), ("floats", Severity::Warning)].into_iter().collect();
        let mut overrides = Overrides::default();
        overrides.ignore.push((3, 4));
        let mut r = Reporter::new("a\nb\nc\nd\ne", &ruleset, &overrides);
        r.report("id", loc(1, 1), "ids");
        r.report("float", loc(2, 1), "floats");
        r.report("ignored", loc(3, 1), "floats");
        r.error("broken", loc(4, 2), "errors");
        assert_eq!(r.messages().len(), 3);
        assert_eq!(r.messages()[0].kind, MessageKind::Error);
        assert_eq!(r.messages()[1].kind, MessageKind::Warning);
        assert_eq!(r.messages()[1].evidence.as_deref(), Some("b"));
        assert_eq!(r.messages()[2].message, "broken");
    }

    #[test]
    fn test_evidence_follows_all_line_endings() {
        let ruleset = Ruleset::default();
        let overrides = Overrides::default();
        let mut r = Reporter::new("a{}\rb{}\x0cc{}\r\nd{}", &ruleset, &overrides);
        r.report("third", loc(3, 1), "ids");
        r.report("fourth", loc(4, 1), "ids");
        assert_eq!(r.messages()[0].evidence.as_deref(), Some("c{}"));
        assert_eq!(r.messages()[1].evidence.as_deref(), Some("d{}"));
    }

    #[test]
    fn test_finish_sorts_rollups_last() {
        let ruleset = Ruleset::default();
        let overrides = Overrides::default();
        let mut r = Reporter::new("", &ruleset, &overrides);
        r.rollup_warn("sheet", "floats");
        r.report("second", loc(2, 1), "ids");
        r.report("first", loc(1, 5), "ids");
        r.report("first too", loc(1, 7), "ids");
        r.stat("floats", 3);
        let report = r.finish(ParseStats::default());
        let order: Vec<&str> = report.messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(order, ["first", "first too", "second", "sheet"]);
        assert_eq!(report.stats["floats"], 3);
        assert!(!report.has_errors());
    }
}
