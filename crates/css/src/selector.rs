//! Selector model
//!
//! Selectors as the parser reports them in rule events: compound
//! selectors joined by combinators, each compound carrying its element
//! name, namespace and an ordered list of modifiers. Every node keeps its
//! source text and position so lint rules can point at it.

use std::fmt;

use crate::error::SourceLocation;
use crate::token::TokenValue;

/// A complex selector: `ul > li.item:hover`
#[derive(Debug, Clone)]
pub struct Selector {
    /// Compound selectors with the combinators between them
    pub parts: Vec<SelectorPart>,
    pub loc: SourceLocation,
    /// Byte offset just past the selector
    pub end: usize,
    pub text: String,
}

/// A part of a complex selector
#[derive(Debug, Clone)]
pub enum SelectorPart {
    Compound(Compound),
    Combinator(Combinator),
}

/// Selector combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    /// Descendant combinator (whitespace)
    Descendant,
    /// Child combinator (>)
    Child,
    /// Next sibling combinator (+)
    NextSibling,
    /// Subsequent sibling combinator (~)
    SubsequentSibling,
    /// Column combinator (||)
    Column,
}

impl CombinatorKind {
    pub fn from_text(text: &str) -> Self {
        match text {
            ">" => Self::Child,
            "+" => Self::NextSibling,
            "~" => Self::SubsequentSibling,
            "||" => Self::Column,
            _ => Self::Descendant,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Descendant => "descendant",
            Self::Child => "child",
            Self::NextSibling => "adjacent-sibling",
            Self::SubsequentSibling => "sibling",
            Self::Column => "column",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Combinator {
    pub kind: CombinatorKind,
    pub loc: SourceLocation,
    pub text: String,
}

/// A compound selector: `svg|a.link[href]:hover`
#[derive(Debug, Clone)]
pub struct Compound {
    /// Namespace prefix; empty for `|a`
    pub ns: Option<String>,
    /// Element name or `*` as written
    pub element: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub loc: SourceLocation,
    pub end: usize,
    pub text: String,
}

/// A simple selector following the element name
#[derive(Debug, Clone)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub loc: SourceLocation,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum ModifierKind {
    /// Nesting selector (&)
    Amp,
    /// ID selector, name without `#`
    Id(String),
    /// Class selector, name without `.`
    Class(String),
    Attribute(Attribute),
    /// Pseudo-class or pseudo-element
    Pseudo(Pseudo),
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// [attr=value] - exact match
    Equals,
    /// [attr~=value] - contains word
    Includes,
    /// [attr|=value] - starts with value or value-
    DashMatch,
    /// [attr^=value] - starts with
    PrefixMatch,
    /// [attr$=value] - ends with
    SuffixMatch,
    /// [attr*=value] - contains
    SubstringMatch,
}

impl AttributeOp {
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "=" => Self::Equals,
            "~=" => Self::Includes,
            "|=" => Self::DashMatch,
            "^=" => Self::PrefixMatch,
            "$=" => Self::SuffixMatch,
            "*=" => Self::SubstringMatch,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::PrefixMatch => "^=",
            Self::SuffixMatch => "$=",
            Self::SubstringMatch => "*=",
        }
    }
}

/// `[ns|name op value flag]`
#[derive(Debug, Clone)]
pub struct Attribute {
    pub ns: Option<String>,
    pub name: String,
    pub op: Option<AttributeOp>,
    /// Value as written, quotes included
    pub value: Option<String>,
    /// `i` or `s`
    pub flag: Option<String>,
}

/// `:hover`, `::before`, `:not(.a)`, `:nth-child(2n+1 of .b)`
#[derive(Debug, Clone)]
pub struct Pseudo {
    /// Lower-cased name as written, vendor prefix included
    pub name: String,
    /// 1 for pseudo-classes, 2 for `::` pseudo-elements
    pub colons: u8,
    /// Arguments of a functional pseudo
    pub args: Option<PseudoArgs>,
}

#[derive(Debug, Clone)]
pub enum PseudoArgs {
    /// `an+b` of `:nth-child()` and `:nth-last-child()`
    Nth { a: String, b: String, of: Vec<Selector> },
    /// `:not()`, `:is()`, `:where()`, `:any()` and `:has()`
    Selectors(Vec<Selector>),
    /// Anything else, unchecked
    Value(Option<TokenValue>),
}

impl Pseudo {
    pub fn is_function(&self) -> bool {
        self.args.is_some()
    }

    /// Name without a vendor prefix
    pub fn bare_name(&self) -> &str {
        match self.name.strip_prefix('-').and_then(|n| n.find('-')) {
            Some(i) => &self.name[i + 2..],
            None => &self.name,
        }
    }

    /// Selectors given as arguments, if any
    pub fn selectors(&self) -> &[Selector] {
        match &self.args {
            Some(PseudoArgs::Selectors(sels)) => sels,
            Some(PseudoArgs::Nth { of, .. }) => of,
            _ => &[],
        }
    }
}

impl Selector {
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.parts.iter().filter_map(|p| match p {
            SelectorPart::Compound(c) => Some(c),
            SelectorPart::Combinator(_) => None,
        })
    }

    pub fn combinators(&self) -> impl Iterator<Item = &Combinator> {
        self.parts.iter().filter_map(|p| match p {
            SelectorPart::Combinator(c) => Some(c),
            SelectorPart::Compound(_) => None,
        })
    }

    /// Starts with a combinator: `> a` inside a nested rule
    pub fn is_relative(&self) -> bool {
        matches!(self.parts.first(), Some(SelectorPart::Combinator(_)))
    }

    pub fn last_compound(&self) -> Option<&Compound> {
        self.compounds().last()
    }
}

impl Compound {
    /// Lower-cased element name
    pub fn element_name(&self) -> Option<String> {
        self.element.as_ref().map(|e| e.to_lowercase())
    }

    pub fn ids(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.iter().filter(|m| matches!(m.kind, ModifierKind::Id(_)))
    }

    pub fn classes(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.iter().filter(|m| matches!(m.kind, ModifierKind::Class(_)))
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&Modifier, &Attribute)> {
        self.modifiers.iter().filter_map(|m| match &m.kind {
            ModifierKind::Attribute(a) => Some((m, a)),
            _ => None,
        })
    }

    pub fn pseudos(&self) -> impl Iterator<Item = (&Modifier, &Pseudo)> {
        self.modifiers.iter().filter_map(|m| match &m.kind {
            ModifierKind::Pseudo(p) => Some((m, p)),
            _ => None,
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_selectors;

    fn one(text: &str) -> Selector {
        let mut sels = parse_selectors(text).unwrap();
        assert_eq!(sels.len(), 1, "{}", text);
        sels.remove(0)
    }

    #[test]
    fn test_type_selector() {
        let sel = one("div");
        let c = sel.last_compound().unwrap();
        assert_eq!(c.element.as_deref(), Some("div"));
        assert!(c.modifiers.is_empty());
        assert_eq!(sel.text, "div");
    }

    #[test]
    fn test_compound_selector() {
        let sel = one("A.foo#bar");
        let c = sel.last_compound().unwrap();
        assert_eq!(c.element_name().as_deref(), Some("a"));
        assert_eq!(c.classes().count(), 1);
        assert_eq!(c.ids().count(), 1);
        assert_eq!(c.modifiers[0].text, ".foo");
        assert_eq!(c.modifiers[1].text, "#bar");
        assert_eq!(c.text, "A.foo#bar");
    }

    #[test]
    fn test_combinators() {
        let sel = one("ul > li + li ~ p a");
        let kinds: Vec<_> = sel.combinators().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CombinatorKind::Child,
                CombinatorKind::NextSibling,
                CombinatorKind::SubsequentSibling,
                CombinatorKind::Descendant,
            ]
        );
        assert_eq!(sel.compounds().count(), 5);
        assert_eq!(sel.text, "ul > li + li ~ p a");
    }

    #[test]
    fn test_selector_list() {
        let sels = parse_selectors("a, .b,#c").unwrap();
        assert_eq!(sels.len(), 3);
        assert_eq!(sels[1].text, ".b");
        assert_eq!(sels[2].loc.column, 7);
    }

    #[test]
    fn test_attribute_selectors() {
        let sel = one("[href]");
        let (_, attr) = sel.last_compound().unwrap().attributes().next().unwrap();
        assert_eq!(attr.name, "href");
        assert_eq!(attr.op, None);

        let sel = one("a[type^='te' i]");
        let (m, attr) = sel.last_compound().unwrap().attributes().next().unwrap();
        assert_eq!(attr.op, Some(AttributeOp::PrefixMatch));
        assert_eq!(attr.value.as_deref(), Some("'te'"));
        assert_eq!(attr.flag.as_deref(), Some("i"));
        assert_eq!(m.text, "[type^='te' i]");
    }

    #[test]
    fn test_pseudo_classes_and_elements() {
        let sel = one("a:hover::before");
        let pseudos: Vec<_> = sel.last_compound().unwrap().pseudos().map(|(m, p)| (m.text.clone(), p.colons)).collect();
        assert_eq!(pseudos, vec![(":hover".to_string(), 1), ("::before".to_string(), 2)]);
        let (m, _) = sel.last_compound().unwrap().pseudos().nth(1).unwrap();
        assert_eq!(m.loc.column, 8);
    }

    #[test]
    fn test_functional_pseudos() {
        let sel = one(":not(.a, .b)");
        let (m, p) = sel.last_compound().unwrap().pseudos().next().unwrap();
        assert_eq!(p.name, "not");
        assert_eq!(p.selectors().len(), 2);
        assert_eq!(m.text, ":not(.a, .b)");

        let sel = one("li:nth-child(2n + 1 of .x)");
        let (_, p) = sel.last_compound().unwrap().pseudos().next().unwrap();
        match &p.args {
            Some(PseudoArgs::Nth { a, b, of }) => {
                assert_eq!((a.as_str(), b.as_str()), ("2n", "+1"));
                assert_eq!(of.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }

        let sel = one("p:-moz-any(a, b)");
        let (_, p) = sel.last_compound().unwrap().pseudos().next().unwrap();
        assert_eq!(p.bare_name(), "any");
        let sel = one(":lang(en)");
        let (_, p) = sel.last_compound().unwrap().pseudos().next().unwrap();
        assert!(matches!(&p.args, Some(PseudoArgs::Value(Some(v))) if v.text == "en"));
    }

    #[test]
    fn test_namespaces_and_universal() {
        let sel = one("svg|rect");
        let c = sel.last_compound().unwrap();
        assert_eq!(c.ns.as_deref(), Some("svg"));
        assert_eq!(c.element.as_deref(), Some("rect"));
        let sel = one("*|*");
        assert_eq!(sel.last_compound().unwrap().element.as_deref(), Some("*"));
        let sel = one("*.x");
        assert_eq!(sel.last_compound().unwrap().element.as_deref(), Some("*"));
    }

    #[test]
    fn test_nesting_and_relative() {
        let sels = parse_selectors("&.on, > b").unwrap();
        assert!(matches!(sels[0].last_compound().unwrap().modifiers[0].kind, ModifierKind::Amp));
        assert!(!sels[0].is_relative());
        assert!(sels[1].is_relative());
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(parse_selectors("a,").is_err());
        assert!(parse_selectors("a > ").is_err());
        assert!(parse_selectors(":not()").is_err());
        assert!(parse_selectors("[a=]").is_err());
    }
}
