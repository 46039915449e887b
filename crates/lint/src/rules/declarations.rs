//! Rules checking the declarations of a block

use rustc_hash::FxHashMap;
use stylint_css::{Block, Event, EventKind, SourceLocation, TokenKind};

use super::{prop_name, rule_event, BlockStack, Rule, RuleEvent};
use crate::reporter::Reporter;

#[derive(Default)]
struct Seen {
    /// Property to its last value
    values: FxHashMap<String, String>,
    last: Option<String>,
}

/// Repeating a property is fine right after itself with another value, as a
/// fallback for older browsers; anything else is reported
#[derive(Default)]
pub struct DuplicateProperties {
    blocks: BlockStack<Seen>,
}

impl Rule for DuplicateProperties {
    fn id(&self) -> &'static str {
        "duplicate-properties"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(..)) => self.blocks.push(),
            Some(RuleEvent::Property(decl, loc)) => {
                let Some(seen) = self.blocks.current() else {
                    return;
                };
                let name = decl.property.to_string().to_lowercase();
                let value = decl.value.text.trim().to_string();
                if let Some(prev) = seen.values.get(&name) {
                    if seen.last.as_deref() != Some(name.as_str()) || *prev == value {
                        let message = format!("Duplicate property \"{}\" found.", decl.property);
                        reporter.report(message, loc, "duplicate-properties");
                    }
                }
                seen.values.insert(name.clone(), value);
                seen.last = Some(name);
            }
            Some(RuleEvent::End(..)) => {
                self.blocks.pop();
            }
            None => {}
        }
    }
}

/// Image urls used in backgrounds and where they first appeared
#[derive(Default)]
pub struct DuplicateBackgroundImages {
    urls: FxHashMap<String, SourceLocation>,
}

impl Rule for DuplicateBackgroundImages {
    fn id(&self) -> &'static str {
        "duplicate-background-images"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        let Some(RuleEvent::Property(decl, loc)) = rule_event(event) else {
            return;
        };
        if !prop_name(&decl.property).starts_with("background") {
            return;
        }
        for part in decl.value.parts.iter().filter(|p| p.kind == TokenKind::Uri) {
            let Some(uri) = part.uri.as_deref() else {
                continue;
            };
            match self.urls.get(uri) {
                Some(first) => reporter.report(
                    format!(
                        "Background image \"{}\" was used multiple times, first declared at line {}, col {}.",
                        uri, first.line, first.column
                    ),
                    loc,
                    "duplicate-background-images",
                ),
                None => {
                    self.urls.insert(uri.to_string(), loc);
                }
            }
        }
    }
}

#[derive(Default)]
pub struct EmptyRules;

impl Rule for EmptyRules {
    fn id(&self) -> &'static str {
        "empty-rules"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        if let EventKind::End { block: Block::Rule { selectors }, empty: true } = &event.kind {
            let loc = selectors.first().map_or(event.loc, |s| s.loc);
            reporter.report("Rule is empty.", loc, self.id());
        }
    }
}

#[derive(Default)]
pub struct KnownProperties;

impl Rule for KnownProperties {
    fn id(&self) -> &'static str {
        "known-properties"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        if let Some(invalid) = event.declaration().and_then(|d| d.invalid.as_ref()) {
            reporter.report(invalid.message.clone(), invalid.loc, self.id());
        }
    }
}

#[derive(Default)]
pub struct OrderAlphabetical {
    blocks: BlockStack<(SourceLocation, Vec<String>)>,
}

impl Rule for OrderAlphabetical {
    fn id(&self) -> &'static str {
        "order-alphabetical"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(_, loc)) => {
                self.blocks.push();
                if let Some(state) = self.blocks.current() {
                    state.0 = loc;
                }
            }
            Some(RuleEvent::Property(decl, _)) => {
                if let Some((_, names)) = self.blocks.current() {
                    names.push(prop_name(&decl.property).to_string());
                }
            }
            Some(RuleEvent::End(..)) => {
                let Some((loc, names)) = self.blocks.pop() else {
                    return;
                };
                if !names.windows(2).all(|w| w[0] <= w[1]) {
                    reporter.report("Rule doesn't have all its properties in alphabetical order.", loc, self.id());
                }
            }
            None => {}
        }
    }
}

#[derive(Default)]
pub struct ZeroUnits;

impl Rule for ZeroUnits {
    fn id(&self) -> &'static str {
        "zero-units"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        let Some(RuleEvent::Property(decl, _)) = rule_event(event) else {
            return;
        };
        for part in &decl.value.parts {
            if matches!(part.kind, TokenKind::Length | TokenKind::Pct) && part.number == Some(0.0) {
                reporter.report("Values of 0 shouldn't have units specified.", part.loc, self.id());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_duplicate_properties() {
        let msgs = lint("duplicate-properties", "a{color:red;color:red}");
        assert_eq!(texts(&msgs), ["Duplicate property \"color\" found."]);
        assert_eq!(msgs[0].col, 13);
        assert!(lint("duplicate-properties", "a{color:red;color:rgba(0,0,0,.5)}").is_empty());
        assert_eq!(lint("duplicate-properties", "a{color:red;width:0;color:blue}").len(), 1);
        assert!(lint("duplicate-properties", "a{color:red} b{color:red}").is_empty());
    }

    #[test]
    fn test_duplicate_background_images() {
        let msgs = lint(
            "duplicate-background-images",
            "a{background:url(sprite.png) 0 0}\nb{background-image:url(sprite.png)}",
        );
        assert_eq!(
            texts(&msgs),
            ["Background image \"sprite.png\" was used multiple times, first declared at line 1, col 3."]
        );
        assert_eq!(msgs[0].line, 2);
    }

    #[test]
    fn test_empty_rules() {
        let msgs = lint("empty-rules", "a{}\nb{color:red}\n c{ }");
        assert_eq!(texts(&msgs), ["Rule is empty.", "Rule is empty."]);
        assert_eq!((msgs[1].line, msgs[1].col), (3, 2));
    }

    #[test]
    fn test_known_properties() {
        let msgs = lint("known-properties", "a{width:10xyz;unknown-prop:red;-webkit-unknown-prop:red;color:red}");
        assert_eq!(msgs.len(), 3);
        assert!(msgs[0].message.contains("10xyz"), "{}", msgs[0].message);
        assert_eq!(msgs[1].message, "Unknown property \"unknown-prop\".");
        assert_eq!(msgs[2].message, "Unknown property \"-webkit-unknown-prop\".");
    }

    #[test]
    fn test_order_alphabetical() {
        assert_eq!(lint("order-alphabetical", "a{width:1px;color:red}").len(), 1);
        assert!(lint("order-alphabetical", "a{-webkit-box-shadow:none;color:red;width:1px}").is_empty());
    }

    #[test]
    fn test_zero_units() {
        let msgs = lint("zero-units", "a{margin:0px 1px 0 0%;transition:all 0s}");
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].col, 10);
        assert_eq!(msgs[1].col, 20);
    }
}
