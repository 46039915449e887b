//! Browser compatibility rules

use stylint_css::{Block, Event, EventKind, SourceLocation};

use super::{rule_event, BlockStack, Rule, RuleEvent};
use crate::reporter::Reporter;

/// Properties and the vendor prefixes that should all be given together
const COMPATIBLE_PREFIXES: &[(&str, &[&str])] = &[
    ("animation", &["webkit"]),
    ("animation-delay", &["webkit"]),
    ("animation-direction", &["webkit"]),
    ("animation-duration", &["webkit"]),
    ("animation-fill-mode", &["webkit"]),
    ("animation-iteration-count", &["webkit"]),
    ("animation-name", &["webkit"]),
    ("animation-play-state", &["webkit"]),
    ("animation-timing-function", &["webkit"]),
    ("appearance", &["webkit", "moz"]),
    ("border-end", &["webkit", "moz"]),
    ("border-end-color", &["webkit", "moz"]),
    ("border-end-style", &["webkit", "moz"]),
    ("border-end-width", &["webkit", "moz"]),
    ("border-image", &["webkit", "moz", "o"]),
    ("border-radius", &["webkit"]),
    ("border-start", &["webkit", "moz"]),
    ("border-start-color", &["webkit", "moz"]),
    ("border-start-style", &["webkit", "moz"]),
    ("border-start-width", &["webkit", "moz"]),
    ("box-align", &["webkit", "moz"]),
    ("box-direction", &["webkit", "moz"]),
    ("box-flex", &["webkit", "moz"]),
    ("box-lines", &["webkit"]),
    ("box-ordinal-group", &["webkit", "moz"]),
    ("box-orient", &["webkit", "moz"]),
    ("box-pack", &["webkit", "moz"]),
    ("column-count", &["webkit", "moz", "ms"]),
    ("column-gap", &["webkit", "moz", "ms"]),
    ("column-rule", &["webkit", "moz", "ms"]),
    ("column-rule-color", &["webkit", "moz", "ms"]),
    ("column-rule-style", &["webkit", "moz", "ms"]),
    ("column-rule-width", &["webkit", "moz", "ms"]),
    ("column-width", &["webkit", "moz", "ms"]),
    ("flex", &["webkit", "ms"]),
    ("flex-basis", &["webkit"]),
    ("flex-direction", &["webkit", "ms"]),
    ("flex-flow", &["webkit"]),
    ("flex-grow", &["webkit"]),
    ("flex-shrink", &["webkit"]),
    ("hyphens", &["epub", "moz"]),
    ("line-break", &["webkit", "ms"]),
    ("margin-end", &["webkit", "moz"]),
    ("margin-start", &["webkit", "moz"]),
    ("marquee-speed", &["webkit", "wap"]),
    ("marquee-style", &["webkit", "wap"]),
    ("padding-end", &["webkit", "moz"]),
    ("padding-start", &["webkit", "moz"]),
    ("tab-size", &["moz", "o"]),
    ("text-size-adjust", &["webkit", "ms"]),
    ("transform", &["webkit", "ms"]),
    ("transform-origin", &["webkit", "ms"]),
    ("user-modify", &["webkit", "moz"]),
    ("user-select", &["webkit", "moz", "ms"]),
    ("word-break", &["epub", "ms"]),
    ("writing-mode", &["epub", "ms"]),
];

/// `-webkit-foo`, `-moz-foo`, ... for a property of the table
fn variations(prop: &str, prefixes: &[&str]) -> Vec<String> {
    prefixes.iter().map(|p| format!("-{}-{}", p, prop)).collect()
}

fn compatible_group(name: &str) -> Option<(&'static str, Vec<String>)> {
    let bare = name.strip_prefix('-')?.split_once('-')?.1;
    let &(prop, prefixes) = COMPATIBLE_PREFIXES.iter().find(|(p, _)| *p == bare)?;
    let all = variations(prop, prefixes);
    all.iter().any(|v| v == name).then_some((prop, all))
}

#[derive(Default)]
struct Prefixed {
    /// Prefixed property names in order of appearance, with the first position
    names: Vec<(String, SourceLocation)>,
}

#[derive(Default)]
pub struct CompatibleVendorPrefixes {
    blocks: BlockStack<Prefixed>,
    /// Prefix of the enclosing `@-webkit-keyframes` and the like
    keyframes: Option<String>,
}

impl CompatibleVendorPrefixes {
    fn check(found: Prefixed, reporter: &mut Reporter<'_>) {
        let mut groups: Vec<(&'static str, Vec<String>, Vec<&str>, SourceLocation)> = Vec::new();
        for (name, loc) in &found.names {
            let Some((prop, all)) = compatible_group(name) else {
                continue;
            };
            match groups.iter_mut().find(|g| g.0 == prop) {
                Some(group) => {
                    if !group.2.contains(&name.as_str()) {
                        group.2.push(name);
                    }
                }
                None => groups.push((prop, all, vec![name.as_str()], *loc)),
            }
        }
        for (_, all, actual, loc) in groups {
            if actual.len() >= all.len() {
                continue;
            }
            let have = match actual.len() {
                1 => actual[0].to_string(),
                2 => actual.join(" and "),
                _ => actual.join(", "),
            };
            for item in all.iter().filter(|v| !actual.contains(&v.as_str())) {
                reporter.report(
                    format!("\"{}\" is compatible with {} and should be included as well.", item, have),
                    loc,
                    "compatible-vendor-prefixes",
                );
            }
        }
    }
}

impl Rule for CompatibleVendorPrefixes {
    fn id(&self) -> &'static str {
        "compatible-vendor-prefixes"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match &event.kind {
            EventKind::Start(Block::Keyframes { prefix, .. }) => {
                self.keyframes = Some(prefix.to_lowercase());
                return;
            }
            EventKind::End { block: Block::Keyframes { .. }, .. } => {
                self.keyframes = None;
                return;
            }
            _ => {}
        }
        match rule_event(event) {
            Some(RuleEvent::Start(Block::Rule { .. } | Block::KeyframeRule { .. }, _)) => self.blocks.push(),
            Some(RuleEvent::Property(decl, _)) => {
                let keyframes = self.keyframes.as_deref().filter(|p| !p.is_empty());
                let Some(found) = self.blocks.current() else {
                    return;
                };
                let name = decl.property.low_text();
                if keyframes.is_some_and(|p| name.starts_with(p)) || compatible_group(name).is_none() {
                    return;
                }
                found.names.push((name.to_string(), decl.property.loc));
            }
            Some(RuleEvent::End(Block::Rule { .. } | Block::KeyframeRule { .. })) => {
                if let Some(found) = self.blocks.pop() {
                    Self::check(found, reporter);
                }
            }
            _ => {}
        }
    }
}

/// Prefixed properties and their standard names
const STANDARD_PROPERTIES: &[(&str, &str)] = &[
    ("-webkit-border-radius", "border-radius"),
    ("-webkit-border-top-left-radius", "border-top-left-radius"),
    ("-webkit-border-top-right-radius", "border-top-right-radius"),
    ("-webkit-border-bottom-left-radius", "border-bottom-left-radius"),
    ("-webkit-border-bottom-right-radius", "border-bottom-right-radius"),
    ("-o-border-radius", "border-radius"),
    ("-o-border-top-left-radius", "border-top-left-radius"),
    ("-o-border-top-right-radius", "border-top-right-radius"),
    ("-o-border-bottom-left-radius", "border-bottom-left-radius"),
    ("-o-border-bottom-right-radius", "border-bottom-right-radius"),
    ("-moz-border-radius", "border-radius"),
    ("-moz-border-radius-topleft", "border-top-left-radius"),
    ("-moz-border-radius-topright", "border-top-right-radius"),
    ("-moz-border-radius-bottomleft", "border-bottom-left-radius"),
    ("-moz-border-radius-bottomright", "border-bottom-right-radius"),
    ("-moz-column-count", "column-count"),
    ("-webkit-column-count", "column-count"),
    ("-moz-column-gap", "column-gap"),
    ("-webkit-column-gap", "column-gap"),
    ("-moz-column-rule", "column-rule"),
    ("-webkit-column-rule", "column-rule"),
    ("-moz-column-rule-style", "column-rule-style"),
    ("-webkit-column-rule-style", "column-rule-style"),
    ("-moz-column-rule-color", "column-rule-color"),
    ("-webkit-column-rule-color", "column-rule-color"),
    ("-moz-column-rule-width", "column-rule-width"),
    ("-webkit-column-rule-width", "column-rule-width"),
    ("-moz-column-width", "column-width"),
    ("-webkit-column-width", "column-width"),
    ("-webkit-column-span", "column-span"),
    ("-webkit-columns", "columns"),
    ("-moz-box-shadow", "box-shadow"),
    ("-webkit-box-shadow", "box-shadow"),
    ("-moz-transform", "transform"),
    ("-webkit-transform", "transform"),
    ("-o-transform", "transform"),
    ("-ms-transform", "transform"),
    ("-moz-transform-origin", "transform-origin"),
    ("-webkit-transform-origin", "transform-origin"),
    ("-o-transform-origin", "transform-origin"),
    ("-ms-transform-origin", "transform-origin"),
    ("-moz-box-sizing", "box-sizing"),
    ("-webkit-box-sizing", "box-sizing"),
];

#[derive(Default)]
pub struct VendorPrefix {
    /// First position of each property in the block
    blocks: BlockStack<Vec<(String, SourceLocation)>>,
}

impl Rule for VendorPrefix {
    fn id(&self) -> &'static str {
        "vendor-prefix"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(..)) => self.blocks.push(),
            Some(RuleEvent::Property(decl, _)) => {
                if let Some(seen) = self.blocks.current() {
                    let name = decl.property.low_text();
                    if !seen.iter().any(|(n, _)| n == name) {
                        seen.push((name.to_string(), decl.property.loc));
                    }
                }
            }
            Some(RuleEvent::End(..)) => {
                let Some(seen) = self.blocks.pop() else {
                    return;
                };
                for (pos, (actual, loc)) in seen.iter().enumerate() {
                    let Some(&(_, needed)) = STANDARD_PROPERTIES.iter().find(|(p, _)| p == actual) else {
                        continue;
                    };
                    match seen.iter().position(|(n, _)| n == needed) {
                        None => reporter.report(
                            format!("Missing standard property \"{}\" to go along with \"{}\".", needed, actual),
                            *loc,
                            self.id(),
                        ),
                        Some(standard) if standard < pos => reporter.report(
                            format!(
                                "Standard property \"{}\" should come after vendor-prefixed property \"{}\".",
                                needed, actual
                            ),
                            *loc,
                            self.id(),
                        ),
                        Some(_) => {}
                    }
                }
            }
            None => {}
        }
    }
}

#[derive(Default)]
struct GradientState {
    loc: SourceLocation,
    moz: bool,
    webkit: bool,
    old_webkit: bool,
    o: bool,
}

#[derive(Default)]
pub struct Gradients {
    blocks: BlockStack<Option<GradientState>>,
}

impl Rule for Gradients {
    fn id(&self) -> &'static str {
        "gradients"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match rule_event(event) {
            Some(RuleEvent::Start(block, loc)) => {
                self.blocks.push();
                if let (Block::Rule { .. }, Some(state)) = (block, self.blocks.current()) {
                    *state = Some(GradientState { loc, ..Default::default() });
                }
            }
            Some(RuleEvent::Property(decl, _)) => {
                let Some(Some(state)) = self.blocks.current() else {
                    return;
                };
                let value = decl.value.text.to_lowercase();
                let prefixed = |p: &str| {
                    value.contains(&format!("-{}-linear-gradient", p)) || value.contains(&format!("-{}-radial-gradient", p))
                };
                state.moz |= prefixed("moz");
                state.webkit |= prefixed("webkit");
                state.o |= prefixed("o");
                state.old_webkit |= value.contains("-webkit-gradient");
            }
            Some(RuleEvent::End(..)) => {
                let Some(Some(state)) = self.blocks.pop() else {
                    return;
                };
                let missing: Vec<&str> = [
                    (state.moz, "Firefox 3.6+"),
                    (state.webkit, "Webkit (Safari 5+, Chrome)"),
                    (state.old_webkit, "Old Webkit (Safari 4+, Chrome)"),
                    (state.o, "Opera 11.1+"),
                ]
                .into_iter()
                .filter(|(seen, _)| !seen)
                .map(|(_, browser)| browser)
                .collect();
                if !missing.is_empty() && missing.len() < 4 {
                    reporter.report(
                        format!("Missing vendor-prefixed CSS gradients for {}.", missing.join(", ")),
                        state.loc,
                        self.id(),
                    );
                }
            }
            None => {}
        }
    }
}

/// Reports declarations written with an old IE property hack
fn report_hack(event: &Event, hack: char, message: &str, rule: &str, reporter: &mut Reporter<'_>) {
    if let EventKind::Property(decl) = &event.kind {
        if decl.property.hack == Some(hack) {
            reporter.report(message, decl.property.loc, rule);
        }
    }
}

#[derive(Default)]
pub struct StarPropertyHack;

impl Rule for StarPropertyHack {
    fn id(&self) -> &'static str {
        "star-property-hack"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        report_hack(event, '*', "Property with star prefix found.", self.id(), reporter);
    }
}

#[derive(Default)]
pub struct UnderscorePropertyHack;

impl Rule for UnderscorePropertyHack {
    fn id(&self) -> &'static str {
        "underscore-property-hack"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        report_hack(event, '_', "Property with underscore prefix found.", self.id(), reporter);
    }
}

#[derive(Default)]
pub struct StyleRuleNesting {
    depth: usize,
}

impl Rule for StyleRuleNesting {
    fn id(&self) -> &'static str {
        "style-rule-nesting"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        match &event.kind {
            EventKind::Start(Block::Rule { .. }) => {
                if self.depth > 0 {
                    reporter.report(
                        "Nested style rules are not supported by browsers released before 2023.",
                        event.loc,
                        self.id(),
                    );
                }
                self.depth += 1;
            }
            EventKind::End { block: Block::Rule { .. }, .. } => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_compatible_vendor_prefixes() {
        let msgs = lint("compatible-vendor-prefixes", "a{-webkit-column-count:2}");
        assert_eq!(
            texts(&msgs),
            [
                "\"-moz-column-count\" is compatible with -webkit-column-count and should be included as well.",
                "\"-ms-column-count\" is compatible with -webkit-column-count and should be included as well.",
            ]
        );
        assert!(lint("compatible-vendor-prefixes", "a{-webkit-animation:x}").is_empty());
        assert!(lint(
            "compatible-vendor-prefixes",
            "@-moz-keyframes k{from{-moz-transform:none}}"
        )
        .is_empty());
    }

    #[test]
    fn test_vendor_prefix() {
        assert_eq!(
            texts(&lint("vendor-prefix", "a{-moz-box-shadow:none}")),
            ["Missing standard property \"box-shadow\" to go along with \"-moz-box-shadow\"."]
        );
        assert_eq!(
            texts(&lint("vendor-prefix", "a{transform:none;-webkit-transform:none}")),
            ["Standard property \"transform\" should come after vendor-prefixed property \"-webkit-transform\"."]
        );
        assert!(lint("vendor-prefix", "a{-webkit-transform:none;transform:none}").is_empty());
    }

    #[test]
    fn test_gradients() {
        let msgs = lint("gradients", "a{background:-moz-linear-gradient(red,blue)}");
        assert_eq!(
            texts(&msgs),
            ["Missing vendor-prefixed CSS gradients for Webkit (Safari 5+, Chrome), \
              Old Webkit (Safari 4+, Chrome), Opera 11.1+."]
        );
        assert!(lint("gradients", "a{background:linear-gradient(red,blue)}").is_empty());
    }

    #[test]
    fn test_property_hacks() {
        assert_eq!(
            texts(&lint("star-property-hack", "a{*width:1px;height:1px}")),
            ["Property with star prefix found."]
        );
        assert_eq!(
            texts(&lint("underscore-property-hack", "a{_width:1px}")),
            ["Property with underscore prefix found."]
        );
    }

    #[test]
    fn test_style_rule_nesting() {
        let msgs = lint("style-rule-nesting", "a{color:red; &:hover{color:blue}} b{color:red}");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].col, 14);
    }
}
