//! Embedded overrides
//!
//! Comments starting with `csslint` adjust a run from inside the sheet:
//!
//! * `/* csslint ids:0, important:2 */` changes rule severities for the
//!   whole sheet (`2`/`true` error, `1` or nothing warning, `0`/`false` off);
//! * `/* csslint allow:ids,important */` drops messages of those rules on
//!   the line of the comment;
//! * `/* csslint ignore:start */` ... `/* csslint ignore:end */` drops all
//!   rule messages on the lines in between, comment lines included.

use rustc_hash::{FxHashMap, FxHashSet};
use stylint_css::split_lines;

use crate::ruleset::{Ruleset, Severity};

/// Lines exempted from rule messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Line to the ids of the rules allowed on it
    pub allow: FxHashMap<usize, FxHashSet<String>>,
    /// Inclusive line ranges
    pub ignore: Vec<(usize, usize)>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.ignore.is_empty()
    }

    /// Whether a message of `rule` on `line` is dropped
    pub fn suppresses(&self, line: usize, rule: &str) -> bool {
        self.allow.get(&line).is_some_and(|ids| ids.contains(rule))
            || self.ignore.iter().any(|&(from, to)| from <= line && line <= to)
    }
}

/// A `/* csslint ... */` comment: its line and its body
fn directives(text: &str) -> Vec<(usize, &str)> {
    let mut found = Vec::new();
    let mut line = 1;
    let mut counted = 0;
    let mut pos = 0;
    while let Some(i) = text[pos..].find("/*") {
        let open = pos + i;
        pos = open + 2;
        let rest = text[pos..].trim_start();
        let Some(word) = rest.get(..7) else {
            continue;
        };
        if !word.eq_ignore_ascii_case("csslint") || !rest[7..].starts_with(char::is_whitespace) {
            continue;
        }
        let Some(close) = rest.find("*/") else {
            break;
        };
        let body = rest[7..close].trim_start();
        if body.is_empty() {
            continue;
        }
        line += split_lines(&text[counted..open]).len() - 1;
        counted = open;
        found.push((line, body));
        pos = text.len() - rest.len() + close + 2;
    }
    found
}

/// Apply the severity overrides embedded in `text` to `ruleset` and
/// collect its allowed and ignored lines
pub fn apply(text: &str, ruleset: &mut Ruleset) -> Overrides {
    let mut ovr = Overrides::default();
    if !text.contains("csslint") && !text.to_ascii_lowercase().contains("csslint") {
        return ovr;
    }
    let mut ignore_start = None;
    for (line, body) in directives(text) {
        let body = body.to_lowercase();
        let (cmd, args) = body.split_once(':').unwrap_or((body.as_str(), ""));
        match cmd.trim() {
            "allow" => {
                let ids: FxHashSet<String> = args
                    .split(',')
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect();
                if !ids.is_empty() {
                    ovr.allow.insert(line, ids);
                }
            }
            "ignore" => {
                if args.contains("start") {
                    ignore_start.get_or_insert(line);
                } else if args.contains("end") {
                    if let Some(start) = ignore_start.take() {
                        ovr.ignore.push((start, line));
                    }
                }
            }
            _ => {
                for item in body.split(',') {
                    let (id, value) = item.split_once(':').unwrap_or((item, ""));
                    let id = id.trim();
                    if !id.is_empty() {
                        ruleset.set(id, Severity::parse(value).unwrap_or(Severity::Warning));
                    }
                }
            }
        }
    }
    if let Some(start) = ignore_start {
        ovr.ignore.push((start, usize::MAX));
    }
    ovr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_overrides() {
        let mut rs = Ruleset::default();
        let ovr = apply("/* csslint ids:0, important:2 */\n/* CSSLint zero-units */ a{}", &mut rs);
        assert!(ovr.is_empty());
        assert_eq!(rs.get("ids"), Severity::Off);
        assert_eq!(rs.get("important"), Severity::Error);
        assert_eq!(rs.get("zero-units"), Severity::Warning);
    }

    #[test]
    fn test_allow() {
        let mut rs = Ruleset::default();
        let ovr = apply("a{}\n#x{} /* csslint allow: ids, important */\n", &mut rs);
        assert!(ovr.suppresses(2, "ids"));
        assert!(ovr.suppresses(2, "important"));
        assert!(!ovr.suppresses(2, "floats"));
        assert!(!ovr.suppresses(1, "ids"));
    }

    #[test]
    fn test_allow_counts_lines_like_the_parser() {
        let mut rs = Ruleset::default();
        let ovr = apply("a{}\rb{}\x0c#x{} /* csslint allow: ids */\r\n", &mut rs);
        assert!(ovr.suppresses(3, "ids"));
        assert!(!ovr.suppresses(1, "ids"));
    }

    #[test]
    fn test_ignore_ranges() {
        let mut rs = Ruleset::default();
        let css = "a{}\n/* csslint ignore:start */\nb{}\n/* csslint ignore:end */\nc{}\n/* csslint ignore:start */\nd{}";
        let ovr = apply(css, &mut rs);
        assert_eq!(ovr.ignore, [(2, 4), (6, usize::MAX)]);
        assert!(ovr.suppresses(3, "anything"));
        assert!(!ovr.suppresses(5, "anything"));
        assert!(ovr.suppresses(7, "anything"));
    }

    #[test]
    fn test_plain_comments_are_skipped() {
        let mut rs = Ruleset::empty();
        let ovr = apply("/* csslinting is fun */ /* just csslint ids */ /*csslint*/ a{}", &mut rs);
        assert!(ovr.is_empty());
        assert_eq!(rs, Ruleset::empty());
    }
}
