//! Box and display related rules

use rustc_hash::FxHashMap;
use stylint_css::{Block, Event, SourceLocation, TokenKind, TokenValue};

use super::{prop_name, rule_event, BlockStack, Rule, RuleEvent};
use crate::reporter::Reporter;

/// `0`, `00`, `0px`: a value without any other digit after leading zeros
fn is_zero_text(text: &str) -> bool {
    let rest = text.trim_start_matches('0');
    rest.len() < text.len() && !rest.contains(|c: char| c.is_ascii_digit())
}

#[derive(Default)]
struct BoxProps {
    box_sizing: bool,
    width: bool,
    height: bool,
    /// Paddings and borders that add to the size
    edges: FxHashMap<String, (SourceLocation, TokenValue)>,
}

const WIDTH_EDGES: &[&str] = &["border", "border-left", "border-right", "padding", "padding-left", "padding-right"];
const HEIGHT_EDGES: &[&str] = &["border", "border-bottom", "border-top", "padding", "padding-bottom", "padding-top"];

#[derive(Default)]
pub struct BoxModel {
    blocks: BlockStack<BoxProps>,
}

impl BoxModel {
    fn check(props: &BoxProps, reporter: &mut Reporter<'_>) {
        if props.box_sizing {
            return;
        }
        for (size, set, edges, axis) in [
            ("width", props.width, WIDTH_EDGES, 1),
            ("height", props.height, HEIGHT_EDGES, 0),
        ] {
            if !set {
                continue;
            }
            for &edge in edges {
                let Some((loc, value)) = props.edges.get(edge) else {
                    continue;
                };
                // `padding: 10px 0` leaves the width alone
                let spared = edge == "padding"
                    && value.parts.len() == 2
                    && value.parts[axis].number == Some(0.0);
                if !spared {
                    reporter.report(format!("No box-sizing and {} in {}", size, edge), *loc, "box-model");
                }
            }
        }
    }
}

impl Rule for BoxModel {
    fn id(&self) -> &'static str {
        "box-model"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(..)) => self.blocks.push(),
            Some(RuleEvent::Property(decl, _)) => {
                let Some(props) = self.blocks.current() else {
                    return;
                };
                let name = prop_name(&decl.property);
                let text = decl.value.text.trim();
                if WIDTH_EDGES.contains(&name) || HEIGHT_EDGES.contains(&name) {
                    if !is_zero_text(text) && !(name == "border" && text.eq_ignore_ascii_case("none")) {
                        props.edges.insert(name.to_string(), (decl.property.loc, decl.value.clone()));
                    }
                } else if name == "box-sizing" {
                    props.box_sizing = true;
                } else if name == "width" || name == "height" {
                    let sized = decl
                        .value
                        .parts
                        .first()
                        .is_some_and(|p| matches!(p.kind, TokenKind::Length | TokenKind::Pct));
                    if sized {
                        if name == "width" {
                            props.width = true;
                        } else {
                            props.height = true;
                        }
                    }
                }
            }
            Some(RuleEvent::End(..)) => {
                if let Some(props) = self.blocks.pop() {
                    Self::check(&props, reporter);
                }
            }
            None => {}
        }
    }
}

/// Property to the one value allowed whatever the display
const DISPLAY_DEPENDENT: &[(&str, Option<&str>)] = &[
    ("display", None),
    ("float", Some("none")),
    ("height", None),
    ("width", None),
    ("margin", None),
    ("margin-left", None),
    ("margin-right", None),
    ("margin-bottom", None),
    ("margin-top", None),
    ("padding", None),
    ("padding-left", None),
    ("padding-right", None),
    ("padding-bottom", None),
    ("padding-top", None),
    ("vertical-align", None),
];

const INLINE_IGNORES: &[&str] = &["height", "width", "margin", "margin-top", "margin-bottom"];
const TABLE_IGNORES: &[&str] = &["margin", "margin-left", "margin-right", "margin-top", "margin-bottom", "float"];

#[derive(Default)]
pub struct DisplayPropertyGrouping {
    blocks: BlockStack<FxHashMap<&'static str, (String, SourceLocation)>>,
}

impl DisplayPropertyGrouping {
    fn check(props: &FxHashMap<&'static str, (String, SourceLocation)>, reporter: &mut Reporter<'_>) {
        let Some((display, _)) = props.get("display") else {
            return;
        };
        let display = display.to_lowercase();
        let mut flag = |name: &str, message: Option<&str>| {
            let Some((value, loc)) = props.get(name) else {
                return;
            };
            let allowed = DISPLAY_DEPENDENT.iter().find(|(n, _)| *n == name).and_then(|(_, v)| *v);
            if allowed == Some(value.to_lowercase().as_str()) {
                return;
            }
            let message = message.map_or_else(
                || format!("\"{}\" can't be used with display: {}.", name, display),
                str::to_string,
            );
            reporter.report(message, *loc, "display-property-grouping");
        };
        match display.as_str() {
            "inline" => {
                for &name in INLINE_IGNORES {
                    flag(name, None);
                }
                flag(
                    "float",
                    Some(
                        "\"display:inline\" has no effect on floated elements \
                         (but may be used to fix the IE6 double-margin bug).",
                    ),
                );
            }
            "block" => flag("vertical-align", None),
            "inline-block" => flag("float", None),
            d if d.starts_with("table-") => {
                for &name in TABLE_IGNORES {
                    flag(name, None);
                }
            }
            _ => {}
        }
    }
}

impl Rule for DisplayPropertyGrouping {
    fn id(&self) -> &'static str {
        "display-property-grouping"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(..)) => self.blocks.push(),
            Some(RuleEvent::Property(decl, _)) => {
                let Some(props) = self.blocks.current() else {
                    return;
                };
                let name = prop_name(&decl.property);
                if let Some((known, _)) = DISPLAY_DEPENDENT.iter().find(|(n, _)| *n == name) {
                    props.insert(*known, (decl.value.text.trim().to_string(), decl.property.loc));
                }
            }
            Some(RuleEvent::End(..)) => {
                if let Some(props) = self.blocks.pop() {
                    Self::check(&props, reporter);
                }
            }
            None => {}
        }
    }
}

struct OutlineState {
    loc: SourceLocation,
    focus: bool,
    props: usize,
    outline: bool,
}

#[derive(Default)]
pub struct OutlineNone {
    blocks: BlockStack<Option<OutlineState>>,
}

impl Rule for OutlineNone {
    fn id(&self) -> &'static str {
        "outline-none"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(block, loc)) => {
                self.blocks.push();
                if let (Block::Rule { selectors }, Some(state)) = (block, self.blocks.current()) {
                    let focus = selectors.iter().any(|s| s.text.to_lowercase().contains(":focus"));
                    *state = Some(OutlineState { loc, focus, props: 0, outline: false });
                }
            }
            Some(RuleEvent::Property(decl, _)) => {
                if let Some(Some(state)) = self.blocks.current() {
                    state.props += 1;
                    let value = decl.value.text.trim();
                    if prop_name(&decl.property) == "outline" && (value == "0" || value.eq_ignore_ascii_case("none")) {
                        state.outline = true;
                    }
                }
            }
            Some(RuleEvent::End(..)) => match self.blocks.pop().flatten() {
                Some(state) if state.outline && !state.focus => {
                    reporter.report("Outlines should only be modified using :focus.", state.loc, self.id());
                }
                Some(state) if state.outline && state.props == 1 => {
                    reporter.report(
                        "Outlines shouldn't be hidden unless other visual changes are made.",
                        state.loc,
                        self.id(),
                    );
                }
                _ => {}
            },
            None => {}
        }
    }
}

#[derive(Default)]
struct IndentState {
    indent: Option<SourceLocation>,
    ltr: bool,
}

#[derive(Default)]
pub struct TextIndent {
    blocks: BlockStack<IndentState>,
}

impl Rule for TextIndent {
    fn id(&self) -> &'static str {
        "text-indent"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(..)) => self.blocks.push(),
            Some(RuleEvent::Property(decl, _)) => {
                let Some(state) = self.blocks.current() else {
                    return;
                };
                match prop_name(&decl.property) {
                    "text-indent" => {
                        let far = decl
                            .value
                            .parts
                            .first()
                            .is_some_and(|p| p.kind == TokenKind::Length && p.number.is_some_and(|n| n < -99.0));
                        state.indent = far.then_some(decl.property.loc);
                    }
                    "direction" => state.ltr = decl.value.text.trim().eq_ignore_ascii_case("ltr"),
                    _ => {}
                }
            }
            Some(RuleEvent::End(..)) => {
                if let Some(IndentState { indent: Some(loc), ltr: false }) = self.blocks.pop() {
                    reporter.report(
                        "Negative text-indent doesn't work well with RTL. If you use text-indent \
                         for image replacement explicitly set direction for that item to ltr.",
                        loc,
                        self.id(),
                    );
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_box_model() {
        let msgs = lint("box-model", "a{width:100px;padding:5px}");
        assert_eq!(texts(&msgs), ["No box-sizing and width in padding"]);
        assert_eq!(msgs[0].col, 15);
        assert!(lint("box-model", "a{width:100px;padding:5px;box-sizing:border-box}").is_empty());
        assert!(lint("box-model", "a{width:100px;padding:5px 0}").is_empty());
        assert!(lint("box-model", "a{width:100px;border:none;padding:0}").is_empty());
        assert_eq!(
            texts(&lint("box-model", "a{height:50%;border-top:1px solid}")),
            ["No box-sizing and height in border-top"]
        );
    }

    #[test]
    fn test_display_property_grouping() {
        let msgs = lint("display-property-grouping", "a{display:inline;width:10px;float:left}");
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].message, "\"width\" can't be used with display: inline.");
        assert!(msgs[1].message.starts_with("\"display:inline\" has no effect"));
        assert!(lint("display-property-grouping", "a{display:inline-block;float:none}").is_empty());
        assert_eq!(
            texts(&lint("display-property-grouping", "a{display:table-cell;margin:0}")),
            ["\"margin\" can't be used with display: table-cell."]
        );
    }

    #[test]
    fn test_outline_none() {
        assert_eq!(
            texts(&lint("outline-none", "a{outline:none}")),
            ["Outlines should only be modified using :focus."]
        );
        assert_eq!(
            texts(&lint("outline-none", "a:focus{outline:0}")),
            ["Outlines shouldn't be hidden unless other visual changes are made."]
        );
        assert!(lint("outline-none", "a:focus{outline:0;border:1px solid}").is_empty());
    }

    #[test]
    fn test_text_indent() {
        assert_eq!(lint("text-indent", "a{text-indent:-999px}").len(), 1);
        assert!(lint("text-indent", "a{text-indent:-999px;direction:ltr}").is_empty());
        assert!(lint("text-indent", "a{text-indent:-5px}").is_empty());
    }
}
