//! Lint engine
//!
//! Runs the enabled rules over the events of one parse. An engine keeps
//! its block cache between runs, so linting a sheet again after a small
//! edit replays the events of the unchanged rules instead of parsing them.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use stylint_css::{BlockCache, Event, Grammar, Listener, ParseStats, Parser, ParserOptions};

use crate::overrides::{self, Overrides};
use crate::reporter::{Report, Reporter};
use crate::rules::{self, Rule};
use crate::ruleset::{Ruleset, Severity};

/// Hands every event to the live rules
struct Dispatch<'r, 'a> {
    rules: Vec<Box<dyn Rule>>,
    reporter: &'r mut Reporter<'a>,
}

impl Dispatch<'_, '_> {
    /// Run `f` on every rule; a rule that panics reports an error and is
    /// dropped for the rest of the run
    fn each(&mut self, mut f: impl FnMut(&mut dyn Rule, &mut Reporter<'_>)) {
        let reporter = &mut *self.reporter;
        self.rules.retain_mut(|rule| {
            let res = panic::catch_unwind(AssertUnwindSafe(|| f(rule.as_mut(), reporter)));
            if res.is_err() {
                warn!("rule {} panicked, disabled for this run", rule.id());
                reporter.rollup_error(format!("Rule \"{}\" failed and was disabled.", rule.id()), "errors");
            }
            res.is_ok()
        });
    }
}

impl Listener for Dispatch<'_, '_> {
    fn on_event(&mut self, event: &Event) {
        self.each(|rule, reporter| rule.on_event(event, reporter));
    }
}

/// Reusable linter
pub struct Engine {
    grammar: Grammar,
    cache: BlockCache,
    /// Ruleset and overrides of the previous run
    prev: Option<(Ruleset, Overrides)>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
            cache: BlockCache::new(),
            prev: None,
        }
    }

    /// Lint `text` with `ruleset`, adjusted by the `csslint` comments in it
    pub fn verify(&mut self, text: &str, ruleset: &Ruleset) -> Report {
        let mut ruleset = ruleset.clone();
        let overrides = overrides::apply(text, &mut ruleset);
        ruleset.set("errors", Severity::Error);

        let current = (ruleset, overrides);
        if self.prev.as_ref() != Some(&current) {
            if !self.cache.is_empty() {
                debug!("ruleset or overrides changed, dropping {} cached blocks", self.cache.len());
            }
            self.cache.clear();
        }
        let (ruleset, overrides) = &current;

        let mut reporter = Reporter::new(text, ruleset, overrides);
        for id in ruleset.enabled().filter(|id| rules::find(id).is_none()) {
            debug!("no rule named {}", id);
        }
        let rules: Vec<Box<dyn Rule>> = rules::RULES
            .iter()
            .filter(|info| ruleset.get(info.id).is_on())
            .map(|info| info.create())
            .collect();
        debug!("linting {} bytes with {} rules", text.len(), rules.len());

        let opts = ParserOptions {
            star_hack: true,
            underscore_hack: true,
            ie_filters: true,
            ..Default::default()
        };
        let res = {
            let mut dispatch = Dispatch { rules, reporter: &mut reporter };
            let res = Parser::new(&self.grammar, opts, &mut dispatch)
                .with_cache(&mut self.cache)
                .parse(text);
            if res.is_ok() {
                dispatch.each(|rule, reporter| rule.finish(reporter));
            }
            res
        };
        let stats = match res {
            Ok(stats) => stats,
            Err(err) => {
                warn!("fatal parse error: {}", err);
                reporter.error(
                    format!("Fatal error, cannot continue!\n{}", err.message()),
                    err.location(),
                    "errors",
                );
                ParseStats::default()
            }
        };

        self.cache.feedback(
            reporter
                .messages()
                .iter()
                .filter(|m| !m.rollup)
                .map(|m| (m.line, m.col)),
        );
        let report = reporter.finish(stats);
        self.prev = Some(current);
        report
    }

    /// Drop cached blocks that were not used for a while
    pub fn trim_cache(&mut self) {
        self.cache.trim();
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::MessageKind;

    fn only(ids: &[&str]) -> Ruleset {
        ids.iter().map(|id| (*id, Severity::Warning)).collect()
    }

    #[test]
    fn test_verify_is_repeatable() {
        let css = "a{color:red;color:red}\n#x{width:0px}\nb{}";
        let ruleset = Ruleset::default();
        let mut engine = Engine::new();
        let first = engine.verify(css, &ruleset);
        let second = engine.verify(css, &ruleset);
        assert!(!first.messages.is_empty());
        assert_eq!(first.messages, second.messages);
        // `b{}` is empty and never cached
        assert_eq!(second.parse.blocks_reused, 2);
        assert_eq!(crate::verify(css, &ruleset).messages, first.messages);
    }

    #[test]
    fn test_severity_from_ruleset() {
        let mut ruleset = only(&[]);
        ruleset.set("duplicate-properties", Severity::Error);
        let report = crate::verify("a{color:red;color:red}", &ruleset);
        assert_eq!(report.messages.len(), 1);
        let m = &report.messages[0];
        assert_eq!(m.kind, MessageKind::Error);
        assert!(m.message.contains("Duplicate"));
        assert_eq!((m.line, m.col), (1, 13));
        assert_eq!(m.evidence.as_deref(), Some("a{color:red;color:red}"));
        assert!(report.has_errors());
    }

    #[test]
    fn test_embedded_overrides() {
        let ruleset = only(&["ids", "important"]);
        let report = crate::verify("/* csslint ids:0 */\n#a{color:red!important}", &ruleset);
        let rules: Vec<&str> = report.messages.iter().map(|m| m.rule.as_str()).collect();
        assert_eq!(rules, ["important"]);

        let css = "#a{} /* csslint allow: ids */\n#b{}";
        let report = crate::verify(css, &ruleset);
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].line, 2);
    }

    #[test]
    fn test_errors_are_always_on() {
        let report = crate::verify("a{color:red;;b c;color:blue}", &Ruleset::empty());
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].rule, "errors");
        assert_eq!(report.messages[0].kind, MessageKind::Error);
    }

    #[test]
    fn test_unknown_property_and_abbreviations() {
        let report = crate::verify("a{colr:red;width:10xyz}", &only(&["known-properties"]));
        assert_eq!(report.messages.len(), 2);
        assert_eq!(report.messages[0].message, "Unknown property \"colr\".");
        assert!(!report.messages[1].message.contains("<len>"), "{}", report.messages[1].message);
    }

    #[test]
    fn test_rollups_come_last() {
        let css = "a{float:left}\n".repeat(10);
        let report = crate::verify(&css, &only(&["floats", "zero-units"]));
        assert_eq!(report.stats.get("floats"), Some(&10));
        let last = report.messages.last().unwrap();
        assert!(last.rollup);
        assert_eq!(last.rule, "floats");
    }

    #[test]
    fn test_edits_reuse_untouched_blocks() {
        let ruleset = only(&["zero-units"]);
        let mut engine = Engine::new();
        let before = engine.verify("A{margin:0px}\nB{color:red}", &ruleset);
        let after = engine.verify("A{margin:0px}\nB{color:blue}", &ruleset);
        assert_eq!(after.parse.blocks_reused, 1);
        assert_eq!(before.messages, after.messages);
        assert_eq!(after.messages[0].line, 1);
    }

    #[test]
    fn test_moved_blocks_report_new_positions() {
        let ruleset = only(&["zero-units"]);
        let mut engine = Engine::new();
        engine.verify("A{margin:0px}", &ruleset);
        let report = engine.verify("\n\nB{}  A{margin:0px}", &ruleset);
        assert_eq!(report.parse.blocks_reused, 1);
        let m = &report.messages[0];
        assert_eq!((m.line, m.col), (3, 15));
        assert_eq!(m.evidence.as_deref(), Some("B{}  A{margin:0px}"));
    }

    #[test]
    fn test_override_change_drops_cache() {
        let ruleset = only(&["ids"]);
        let mut engine = Engine::new();
        engine.verify("#a{color:red}", &ruleset);
        let report = engine.verify("/* csslint ignore:start */\n#a{color:red}", &ruleset);
        assert!(report.messages.is_empty());
        assert_eq!(report.parse.blocks_reused, 0);
    }

    #[test]
    fn test_clean_sheet() {
        let mut engine = Engine::new();
        let report = engine.verify("a{color:red}", &Ruleset::default());
        assert!(!report.has_errors());
        assert!(report.parse.tokens > 0);
    }
}
