//! Lint rules
//!
//! Every rule watches the parser events on its own and reports what it
//! finds. Rules never see each other's state.

mod boxes;
mod compat;
mod counts;
mod declarations;
mod messages;
mod pseudos;
mod selectors;
mod shorthand;

use stylint_css::{Block, Declaration, Event, EventKind, SourceLocation, Token};

use crate::reporter::Reporter;

/// A lint rule fed with the events of one parse
pub trait Rule {
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str {
        find(self.id()).map_or("", |info| info.description)
    }

    fn on_event(&mut self, event: &Event, reporter: &mut Reporter<'_>);

    /// Called after the whole sheet was parsed
    fn finish(&mut self, _reporter: &mut Reporter<'_>) {}
}

/// A registered rule
pub struct RuleInfo {
    pub id: &'static str,
    pub description: &'static str,
    create: fn() -> Box<dyn Rule>,
}

impl RuleInfo {
    /// A fresh instance for one run
    pub fn create(&self) -> Box<dyn Rule> {
        (self.create)()
    }
}

fn boxed<R: Rule + Default + 'static>() -> Box<dyn Rule> {
    Box::new(R::default())
}

macro_rules! rules {
    ($($id:literal => $rule:ty, $desc:literal;)*) => {
        /// All rules, sorted by id
        pub static RULES: &[RuleInfo] = &[
            $(RuleInfo { id: $id, description: $desc, create: boxed::<$rule> },)*
        ];
    };
}

rules! {
    "box-model" => boxes::BoxModel,
        "width or height specified with padding or border and no box-sizing.";
    "compatible-vendor-prefixes" => compat::CompatibleVendorPrefixes,
        "Require all compatible vendor prefixes.";
    "display-property-grouping" => boxes::DisplayPropertyGrouping,
        "Must use properties compatible with the value of `display`.";
    "duplicate-background-images" => declarations::DuplicateBackgroundImages,
        "Every background-image should be unique. Use a common class for e.g. sprites.";
    "duplicate-properties" => declarations::DuplicateProperties,
        "Duplicate properties must appear one after the other. Exact duplicates are always reported.";
    "empty-rules" => declarations::EmptyRules,
        "Rules without any properties specified should be removed.";
    "errors" => messages::Errors,
        "This rule looks for recoverable syntax errors.";
    "floats" => counts::Floats,
        "This rule tests if the float property is used too many times.";
    "font-faces" => counts::FontFaces,
        "Too many different web fonts in the same stylesheet.";
    "font-sizes" => counts::FontSizes,
        "Checks the number of font-size declarations.";
    "globals-in-document" => messages::GlobalsInDocument,
        "Warn about @import, @charset, @namespace inside @-moz-document.";
    "gradients" => compat::Gradients,
        "When using a vendor-prefixed gradient, make sure to use them all.";
    "ids" => selectors::Ids,
        "Selectors should not contain IDs.";
    "import" => messages::Import,
        "Don't use @import, use <link> instead.";
    "important" => counts::Important,
        "Be careful when using !important declaration.";
    "known-properties" => declarations::KnownProperties,
        "Properties should be known (defined by a CSS standard) or be a vendor-prefixed property.";
    "known-pseudos" => pseudos::KnownPseudos,
        "Require use of known pseudo selectors.";
    "order-alphabetical" => declarations::OrderAlphabetical,
        "Assure properties are in alphabetical order.";
    "outline-none" => boxes::OutlineNone,
        "none or 0 for `outline` outside of :focus rule.";
    "overqualified-elements" => selectors::OverqualifiedElements,
        ".class or #id after an element tag is forbidden.";
    "qualified-headings" => selectors::QualifiedHeadings,
        "Headings should not be qualified (namespaced).";
    "regex-selectors" => selectors::RegexSelectors,
        "Selectors that look like regular expressions are slow and should be avoided.";
    "selector-newline" => selectors::SelectorNewline,
        "Put selectors on separate lines or use a comma.";
    "shorthand" => shorthand::Shorthand,
        "Use shorthand properties where possible.";
    "shorthand-overrides" => shorthand::ShorthandOverrides,
        "Avoid shorthands that override individual properties declared before.";
    "simple-not" => selectors::SimpleNot,
        "Require use of simple selectors inside :not().";
    "star-property-hack" => compat::StarPropertyHack,
        "Checks for the star property hack (targets IE6/7).";
    "style-rule-nesting" => compat::StyleRuleNesting,
        "Warn about nested style rules, unsupported by browsers released before 2023.";
    "text-indent" => boxes::TextIndent,
        "Checks for text indent less than -99px.";
    "underscore-property-hack" => compat::UnderscorePropertyHack,
        "Checks for the underscore property hack (targets IE6).";
    "unique-headings" => selectors::UniqueHeadings,
        "Headings should be defined only once.";
    "universal-selector" => selectors::UniversalSelector,
        "The universal selector (*) is known to be slow.";
    "unqualified-attributes" => selectors::UnqualifiedAttributes,
        "Unqualified attribute selectors are known to be slow.";
    "vendor-prefix" => compat::VendorPrefix,
        "When using a vendor-prefixed property, make sure to include the standard one.";
    "warnings" => messages::Warnings,
        "This rule looks for parser warnings.";
    "zero-units" => declarations::ZeroUnits,
        "You don't need to specify units when a value is 0.";
}

/// Look up a registered rule
pub fn find(id: &str) -> Option<&'static RuleInfo> {
    RULES.iter().find(|r| r.id == id)
}

/// Lower-cased property name without vendor prefix
pub(crate) fn prop_name(prop: &Token) -> &str {
    prop.unprefixed()
}

/// Events of the blocks holding declarations, seen one block at a time
pub(crate) enum RuleEvent<'e> {
    Start(&'e Block, SourceLocation),
    Property(&'e Declaration, SourceLocation),
    End(&'e Block),
}

/// Narrow `event` to the declaration blocks; declarations inside
/// conditions such as `@supports (display: grid)` are left out
pub(crate) fn rule_event(event: &Event) -> Option<RuleEvent<'_>> {
    match &event.kind {
        EventKind::Start(block) if block.is_rule_like() => Some(RuleEvent::Start(block, event.loc)),
        EventKind::End { block, .. } if block.is_rule_like() => Some(RuleEvent::End(block)),
        EventKind::Property(decl) if !decl.in_parens => Some(RuleEvent::Property(decl, event.loc)),
        _ => None,
    }
}

/// Per-block state of a rule, saved while nested blocks are open
pub(crate) struct BlockStack<T> {
    stack: Vec<T>,
}

impl<T> Default for BlockStack<T> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<T: Default> BlockStack<T> {
    pub fn push(&mut self) {
        self.stack.push(T::default());
    }

    pub fn pop(&mut self) -> Option<T> {
        self.stack.pop()
    }

    /// State of the innermost open block
    pub fn current(&mut self) -> Option<&mut T> {
        self.stack.last_mut()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use stylint_css::{Event, Grammar, Parser, ParserOptions};

    use crate::overrides::Overrides;
    use crate::reporter::{Message, Reporter};
    use crate::ruleset::{Ruleset, Severity};

    /// Run only the rule `id` over `css`
    pub fn lint(id: &str, css: &str) -> Vec<Message> {
        let grammar = Grammar::new();
        let opts = ParserOptions {
            star_hack: true,
            underscore_hack: true,
            ie_filters: true,
            ..Default::default()
        };
        let mut events: Vec<Event> = Vec::new();
        let _ = Parser::new(&grammar, opts, &mut events).parse(css);

        let ruleset: Ruleset = [(id, Severity::Warning)].into_iter().collect();
        let overrides = Overrides::default();
        let mut reporter = Reporter::new(css, &ruleset, &overrides);
        let mut rule = super::find(id).unwrap().create();
        for event in &events {
            rule.on_event(event, &mut reporter);
        }
        rule.finish(&mut reporter);
        reporter.messages().to_vec()
    }

    pub fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.message.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_sorted_and_unique() {
        assert_eq!(RULES.len(), 36);
        assert!(RULES.windows(2).all(|w| w[0].id < w[1].id));
        for info in RULES {
            let rule = info.create();
            assert_eq!(rule.id(), info.id);
            assert_eq!(rule.description(), info.description);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("ids").map(|r| r.description), Some("Selectors should not contain IDs."));
        assert!(find("nope").is_none());
    }
}
