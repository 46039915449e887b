//! Selector rules

use rustc_hash::FxHashMap;
use stylint_css::selector::{AttributeOp, CombinatorKind, Compound, ModifierKind, SelectorPart};
use stylint_css::{Block, Event, EventKind, Selector, SourceLocation};

use super::Rule;
use crate::reporter::Reporter;

/// Selectors of a style rule being entered
fn rule_selectors(event: &Event) -> &[Selector] {
    match &event.kind {
        EventKind::Start(Block::Rule { selectors }) => selectors,
        _ => &[],
    }
}

fn heading(compound: &Compound) -> Option<String> {
    compound.element_name().filter(|name| {
        let b = name.as_bytes();
        b.len() == 2 && b[0] == b'h' && (b'1'..=b'6').contains(&b[1])
    })
}

#[derive(Default)]
pub struct Ids;

impl Rule for Ids {
    fn id(&self) -> &'static str {
        "ids"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for sel in rule_selectors(event) {
            let count: usize = sel.compounds().map(|c| c.ids().count()).sum();
            match count {
                0 => {}
                1 => reporter.report("Don't use IDs in selectors.", sel.loc, self.id()),
                n => reporter.report(format!("{} IDs in the selector, really?", n), sel.loc, self.id()),
            }
        }
    }
}

struct ClassUse {
    compound: String,
    modifier: String,
    loc: SourceLocation,
    qualified: bool,
}

/// Element names in front of ids always, in front of classes used only
/// with that element anywhere in the sheet
#[derive(Default)]
pub struct OverqualifiedElements {
    classes: FxHashMap<String, Vec<ClassUse>>,
    order: Vec<String>,
}

impl Rule for OverqualifiedElements {
    fn id(&self) -> &'static str {
        "overqualified-elements"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for compound in rule_selectors(event).iter().flat_map(Selector::compounds) {
            let qualified = compound.element.as_deref().is_some_and(|e| e != "*");
            for m in &compound.modifiers {
                match &m.kind {
                    ModifierKind::Id(_) if qualified => reporter.report(
                        format!("\"{}\" is overqualified, just use \"{}\" without element name.", compound, m),
                        compound.loc,
                        self.id(),
                    ),
                    ModifierKind::Class(name) => {
                        let uses = self.classes.entry(name.clone()).or_insert_with(|| {
                            self.order.push(name.clone());
                            Vec::new()
                        });
                        uses.push(ClassUse {
                            compound: compound.text.clone(),
                            modifier: m.text.clone(),
                            loc: compound.loc,
                            qualified,
                        });
                    }
                    _ => {}
                }
            }
        }
    }

    fn finish(&mut self, reporter: &mut Reporter<'_>) {
        for name in &self.order {
            if let Some([only]) = self.classes.get(name).map(Vec::as_slice) {
                if only.qualified {
                    reporter.report(
                        format!(
                            "\"{}\" is overqualified, just use \"{}\" without element name.",
                            only.compound, only.modifier
                        ),
                        only.loc,
                        "overqualified-elements",
                    );
                }
            }
        }
    }
}

#[derive(Default)]
pub struct QualifiedHeadings;

impl Rule for QualifiedHeadings {
    fn id(&self) -> &'static str {
        "qualified-headings"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for sel in rule_selectors(event) {
            for part in sel.parts.iter().skip(1) {
                let SelectorPart::Compound(compound) = part else {
                    continue;
                };
                if let Some(h) = heading(compound) {
                    reporter.report(format!("Heading ({}) should not be qualified.", h), compound.loc, self.id());
                }
            }
        }
    }
}

#[derive(Default)]
pub struct RegexSelectors;

impl Rule for RegexSelectors {
    fn id(&self) -> &'static str {
        "regex-selectors"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for compound in rule_selectors(event).iter().flat_map(Selector::compounds) {
            for (m, attr) in compound.attributes() {
                match attr.op {
                    None | Some(AttributeOp::Equals) => {}
                    Some(op) => reporter.report(
                        format!("Attribute selectors with {} are slow!", op.symbol()),
                        m.loc,
                        self.id(),
                    ),
                }
            }
        }
    }
}

#[derive(Default)]
pub struct SelectorNewline;

impl Rule for SelectorNewline {
    fn id(&self) -> &'static str {
        "selector-newline"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for sel in rule_selectors(event) {
            for pair in sel.parts.windows(2) {
                let [SelectorPart::Combinator(comb), SelectorPart::Compound(next)] = pair else {
                    continue;
                };
                if comb.kind == CombinatorKind::Descendant && next.loc.line > comb.loc.line {
                    reporter.report("newline character found in selector (forgot a comma?)", comb.loc, self.id());
                }
            }
        }
    }
}

#[derive(Default)]
pub struct SimpleNot;

impl Rule for SimpleNot {
    fn id(&self) -> &'static str {
        "simple-not"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for compound in rule_selectors(event).iter().flat_map(Selector::compounds) {
            for (m, pseudo) in compound.pseudos() {
                if pseudo.bare_name() != "not" {
                    continue;
                }
                let complex = pseudo.selectors().iter().any(|arg| {
                    let mut compounds = arg.compounds();
                    match (compounds.next(), compounds.next()) {
                        (Some(c), None) => {
                            c.modifiers.len() > 1 || (c.element.is_some() && !c.modifiers.is_empty())
                        }
                        _ => true,
                    }
                });
                if complex {
                    reporter.report("Use only a simple selector in :not().", m.loc, self.id());
                }
            }
        }
    }
}

#[derive(Default)]
pub struct UniqueHeadings {
    /// Times each of h1 to h6 was styled on its own
    counts: [usize; 6],
}

impl Rule for UniqueHeadings {
    fn id(&self) -> &'static str {
        "unique-headings"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for sel in rule_selectors(event) {
            let Some(compound) = sel.last_compound() else {
                continue;
            };
            let Some(h) = heading(compound) else {
                continue;
            };
            if compound.pseudos().next().is_some() {
                continue;
            }
            let level = usize::from(h.as_bytes()[1] - b'1');
            self.counts[level] += 1;
            if self.counts[level] > 1 {
                reporter.report(format!("Heading ({}) has already been defined.", h), compound.loc, self.id());
            }
        }
    }

    fn finish(&mut self, reporter: &mut Reporter<'_>) {
        let repeated: Vec<String> = self
            .counts
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 1)
            .map(|(i, n)| format!("{} h{}s", n, i + 1))
            .collect();
        if !repeated.is_empty() {
            reporter.rollup_warn(
                format!("You have {} defined in this stylesheet.", repeated.join(", ")),
                self.id(),
            );
        }
    }
}

#[derive(Default)]
pub struct UniversalSelector;

impl Rule for UniversalSelector {
    fn id(&self) -> &'static str {
        "universal-selector"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for sel in rule_selectors(event) {
            if let Some(compound) = sel.last_compound().filter(|c| c.element.as_deref() == Some("*")) {
                reporter.report("The universal selector (*) is known to be slow.", compound.loc, self.id());
            }
        }
    }
}

#[derive(Default)]
pub struct UnqualifiedAttributes;

impl Rule for UnqualifiedAttributes {
    fn id(&self) -> &'static str {
        "unqualified-attributes"
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>) {
        for sel in rule_selectors(event) {
            let Some(compound) = sel.last_compound() else {
                continue;
            };
            if compound.element.as_deref().is_some_and(|e| e != "*")
                || compound.ids().next().is_some()
                || compound.classes().next().is_some()
            {
                continue;
            }
            for (m, _) in compound.attributes() {
                reporter.report("Unqualified attribute selectors are known to be slow.", m.loc, self.id());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{lint, texts};

    #[test]
    fn test_ids() {
        assert_eq!(texts(&lint("ids", "#a{}\n.b{}")), ["Don't use IDs in selectors."]);
        assert_eq!(texts(&lint("ids", "#a #b, c{}")), ["2 IDs in the selector, really?"]);
    }

    #[test]
    fn test_overqualified_elements() {
        let msgs = lint("overqualified-elements", "div#main{}\nli.item{}\np.note{} .note{}");
        assert_eq!(
            texts(&msgs),
            [
                "\"div#main\" is overqualified, just use \"#main\" without element name.",
                "\"li.item\" is overqualified, just use \".item\" without element name.",
            ]
        );
        assert_eq!(msgs[1].line, 2);
    }

    #[test]
    fn test_qualified_headings() {
        let msgs = lint("qualified-headings", "h1{} .box h3{} h2 span{}");
        assert_eq!(texts(&msgs), ["Heading (h3) should not be qualified."]);
        assert_eq!(msgs[0].col, 11);
    }

    #[test]
    fn test_regex_selectors() {
        let msgs = lint("regex-selectors", "a[href$='.pdf'], [lang|=en], [type=text]{}");
        assert_eq!(
            texts(&msgs),
            ["Attribute selectors with $= are slow!", "Attribute selectors with |= are slow!"]
        );
    }

    #[test]
    fn test_selector_newline() {
        let msgs = lint("selector-newline", ".a\n.b{}\n.c,\n.d{}");
        assert_eq!(texts(&msgs), ["newline character found in selector (forgot a comma?)"]);
        assert_eq!((msgs[0].line, msgs[0].col), (1, 3));
    }

    #[test]
    fn test_simple_not() {
        assert_eq!(lint("simple-not", "a:not(.b .c){}").len(), 1);
        assert_eq!(lint("simple-not", "a:not(p.b){}").len(), 1);
        assert!(lint("simple-not", "a:not(.b), :not([x]){}").is_empty());
    }

    #[test]
    fn test_unique_headings() {
        let msgs = lint("unique-headings", "h1{} h2{} .x h1{} h1:hover{} h2{}");
        assert_eq!(
            texts(&msgs),
            [
                "Heading (h1) has already been defined.",
                "Heading (h2) has already been defined.",
                "You have 2 h1s, 2 h2s defined in this stylesheet.",
            ]
        );
        assert!(msgs[2].rollup);
    }

    #[test]
    fn test_universal_selector() {
        assert_eq!(lint("universal-selector", "* {} .a *{}").len(), 2);
        assert!(lint("universal-selector", "* .a{}").is_empty());
    }

    #[test]
    fn test_unqualified_attributes() {
        assert_eq!(
            texts(&lint("unqualified-attributes", "[type=text]{}")),
            ["Unqualified attribute selectors are known to be slow."]
        );
        assert!(lint("unqualified-attributes", "input[type=text], .a[b], *.c[d]{}").is_empty());
    }
}
