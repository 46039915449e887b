//! Shorthand rules
//!
//! Both rules collect, per declaration block, the longhands seen so far
//! grouped by the shorthand that covers them.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use stylint_css::{Event, SourceLocation};

use super::{prop_name, rule_event, BlockStack, Rule, RuleEvent};
use crate::reporter::Reporter;

const WSC: &str = "width|style|color";
const TBLR: &str = "top|bottom|left|right";

/// Shorthand, name pattern, then the alternatives for `1`, `2` in the
/// pattern; `%` stands for the shorthand
const PATTERNS: &[(&str, &str, &[&str])] = &[
    (
        "animation",
        "%-1",
        &["name|duration|timing-function|delay|iteration-count|direction|fill-mode|play-state"],
    ),
    ("background", "%-1", &["image|size|position|repeat|origin|clip|attachment|color"]),
    ("border", "%-1-2", &[TBLR, WSC]),
    ("border-top", "%-1", &[WSC]),
    ("border-left", "%-1", &[WSC]),
    ("border-right", "%-1", &[WSC]),
    ("border-bottom", "%-1", &[WSC]),
    ("border-block-end", "%-1", &[WSC]),
    ("border-block-start", "%-1", &[WSC]),
    ("border-image", "%-1", &["source|slice|width|outset|repeat"]),
    ("border-inline-end", "%-1", &[WSC]),
    ("border-inline-start", "%-1", &[WSC]),
    ("border-radius", "border-1-2-radius", &["top|bottom", "left|right"]),
    ("border-color", "border-1-color", &[TBLR]),
    ("border-style", "border-1-style", &[TBLR]),
    ("border-width", "border-1-width", &[TBLR]),
    ("column-rule", "%-1", &[WSC]),
    ("columns", "column-1", &["width|count"]),
    ("flex", "%-1", &["grow|shrink|basis"]),
    ("flex-flow", "flex-1", &["direction|wrap"]),
    ("font", "%-style|%-variant|%-weight|%-stretch|%-size|%-family|line-height", &[]),
    (
        "grid",
        "%-1",
        &["template-rows|template-columns|template-areas|auto-rows|auto-columns|auto-flow|column-gap|row-gap"],
    ),
    ("grid-area", "grid-1-2", &["row|column", "start|end"]),
    ("grid-column", "%-1", &["start|end"]),
    ("grid-gap", "grid-1-gap", &["row|column"]),
    ("grid-row", "%-1", &["start|end"]),
    ("grid-template", "%-1", &["columns|rows|areas"]),
    ("list-style", "list-1", &["type|position|image"]),
    ("margin", "%-1", &[TBLR]),
    ("mask", "%-1", &["image|mode|position|size|repeat|origin|clip|composite"]),
    ("outline", "%-1", &[WSC]),
    ("padding", "%-1", &[TBLR]),
    ("text-decoration", "%-1", &["color|style|line"]),
    ("text-emphasis", "%-1", &["style|color"]),
    ("transition", "%-1", &["delay|duration|property|timing-function"]),
];

struct Shorthands {
    /// Shorthand to all of its longhands
    longhands: FxHashMap<&'static str, Vec<String>>,
    /// Longhand to the shorthand it is grouped under; later patterns win
    owner: FxHashMap<String, &'static str>,
}

/// Expand one pattern: each argument substitutes its digit, the
/// alternatives of the latest argument varying slowest
fn expand(shorthand: &str, pattern: &str, args: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = pattern.replace('%', shorthand).split('|').map(str::to_string).collect();
    for (i, arg) in args.iter().enumerate() {
        let digit = (i + 1).to_string();
        let digit = digit.as_str();
        names = arg
            .split('|')
            .flat_map(|alt| names.iter().map(move |n| n.replace(digit, alt)))
            .collect();
    }
    names
}

static SHORTHANDS: LazyLock<Shorthands> = LazyLock::new(|| {
    let mut longhands = FxHashMap::default();
    let mut owner = FxHashMap::default();
    for &(shorthand, pattern, args) in PATTERNS {
        let names = expand(shorthand, pattern, args);
        for name in &names {
            owner.insert(name.clone(), shorthand);
        }
        longhands.insert(shorthand, names);
    }
    Shorthands { longhands, owner }
});

/// Longhands of one shorthand in the order they were first declared
type Group = Vec<(String, String, SourceLocation)>;

/// Longhands of the current block, grouped by shorthand
#[derive(Default)]
struct Groups(Vec<(&'static str, Group)>);

impl Groups {
    fn add(&mut self, shorthand: &'static str, name: &str, display: String, loc: SourceLocation) {
        let at = match self.0.iter().position(|(sh, _)| *sh == shorthand) {
            Some(at) => at,
            None => {
                self.0.push((shorthand, Vec::new()));
                self.0.len() - 1
            }
        };
        let group = &mut self.0[at].1;
        match group.iter_mut().find(|(n, ..)| n == name) {
            Some(entry) => *entry = (name.to_string(), display, loc),
            None => group.push((name.to_string(), display, loc)),
        }
    }

    fn take(&mut self, shorthand: &str) -> Option<Group> {
        let at = self.0.iter().position(|(sh, _)| *sh == shorthand)?;
        Some(self.0.remove(at).1)
    }
}

fn joined(group: &Group) -> String {
    group.iter().map(|(n, ..)| n.as_str()).collect::<Vec<_>>().join("\" + \"")
}

/// What a shorthand rule gets to see of a declaration
enum Seen<'e> {
    /// A longhand, filed away
    Longhand,
    /// A shorthand declared in the current block
    Shorthand(&'e str, String, SourceLocation),
    /// The block closed with these groups
    End(Groups),
    Nothing,
}

fn track<'e>(blocks: &mut BlockStack<Groups>, event: &'e Event) -> Seen<'e> {
    match rule_event(event) {
        Some(RuleEvent::Start(..)) => {
            blocks.push();
            Seen::Nothing
        }
        Some(RuleEvent::Property(decl, loc)) => {
            let Some(groups) = blocks.current() else {
                return Seen::Nothing;
            };
            let name = prop_name(&decl.property);
            if let Some(&shorthand) = SHORTHANDS.owner.get(name) {
                groups.add(shorthand, name, decl.property.to_string(), loc);
                Seen::Longhand
            } else if SHORTHANDS.longhands.contains_key(name) {
                Seen::Shorthand(name, decl.property.to_string(), loc)
            } else {
                Seen::Nothing
            }
        }
        Some(RuleEvent::End(..)) => blocks.pop().map_or(Seen::Nothing, Seen::End),
        None => Seen::Nothing,
    }
}

#[derive(Default)]
pub struct Shorthand {
    blocks: BlockStack<Groups>,
}

impl Rule for Shorthand {
    fn id(&self) -> &'static str {
        "shorthand"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        let Seen::End(groups) = track(&mut self.blocks, event) else {
            return;
        };
        for (shorthand, group) in &groups.0 {
            let all = SHORTHANDS.longhands.get(shorthand).map_or(0, Vec::len);
            if group.len() != all {
                continue;
            }
            let message = format!("\"{}\" shorthand can replace \"{}\"", shorthand, joined(group));
            for (_, _, loc) in group {
                reporter.report(message.clone(), *loc, self.id());
            }
        }
    }
}

#[derive(Default)]
pub struct ShorthandOverrides {
    blocks: BlockStack<Groups>,
}

impl Rule for ShorthandOverrides {
    fn id(&self) -> &'static str {
        "shorthand-overrides"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        let Seen::Shorthand(name, display, loc) = track(&mut self.blocks, event) else {
            return;
        };
        let Some(overridden) = self.blocks.current().and_then(|g| g.take(name)) else {
            return;
        };
        reporter.report(format!("\"{}\" overrides \"{}\" above.", display, joined(&overridden)), loc, self.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_expand() {
        assert_eq!(
            expand("border-radius", "border-1-2-radius", &["top|bottom", "left|right"]),
            [
                "border-top-left-radius",
                "border-bottom-left-radius",
                "border-top-right-radius",
                "border-bottom-right-radius",
            ]
        );
        assert_eq!(expand("font", "%-style|line-height", &[]), ["font-style", "line-height"]);
        assert_eq!(SHORTHANDS.owner.get("border-top-width"), Some(&"border-width"));
        assert_eq!(SHORTHANDS.longhands["margin"].len(), 4);
    }

    #[test]
    fn test_shorthand() {
        let msgs = lint("shorthand", "a{margin-top:0;margin-bottom:0;\nmargin-left:0;margin-right:0}");
        assert_eq!(msgs.len(), 4);
        assert_eq!(
            msgs[0].message,
            "\"margin\" shorthand can replace \"margin-top\" + \"margin-bottom\" + \"margin-left\" + \"margin-right\""
        );
        assert_eq!(msgs[2].line, 2);
        assert!(lint("shorthand", "a{padding-top:0;padding-left:0}").is_empty());
        assert!(lint("shorthand", "a{margin-top:0;margin-bottom:0} b{margin-left:0;margin-right:0}").is_empty());
    }

    #[test]
    fn test_shorthand_overrides() {
        let msgs = lint("shorthand-overrides", "a{margin-top:1px;margin-left:1px;margin:0}");
        assert_eq!(texts(&msgs), ["\"margin\" overrides \"margin-top\" + \"margin-left\" above."]);
        assert_eq!(msgs[0].col, 34);
        assert!(lint("shorthand-overrides", "a{margin:0;margin-top:1px}").is_empty());
    }
}
