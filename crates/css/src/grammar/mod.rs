//! Value grammars
//!
//! Static tables describing what each property accepts, and [`Grammar`],
//! which compiles those tables into [`Matcher`] trees on demand and keeps
//! them for the lifetime of the owning engine.

pub mod complex;
pub mod functions;
pub mod properties;
pub mod scoped;
pub mod simple;

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{CssError, CssResult};
use crate::matcher::{GrammarParser, Matcher};

/// What a property or descriptor accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spec<'a> {
    Grammar(&'a str),
    /// Recognized but its value is not checked
    Known,
}

/// Compiled grammars and already validated values
#[derive(Debug, Default)]
pub struct Grammar {
    compiled: RefCell<FxHashMap<String, Rc<Matcher>>>,
    terms: RefCell<FxHashMap<String, Rc<Matcher>>>,
    resolved: RefCell<FxHashMap<String, Rc<Matcher>>>,
    valid: RefCell<FxHashMap<String, FxHashSet<String>>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a grammar string, reusing an earlier compilation
    pub fn compile(&self, text: &str) -> CssResult<Rc<Matcher>> {
        if let Some(m) = self.compiled.borrow().get(text) {
            return Ok(m.clone());
        }
        debug!("compiling grammar \"{}\"", text);
        let m = GrammarParser::parse(text, self)?;
        self.compiled.borrow_mut().insert(text.to_string(), m.clone());
        Ok(m)
    }

    /// A single term: keywords, `<type>` or `<fn:family>`
    pub fn term(&self, text: &str) -> CssResult<Rc<Matcher>> {
        let low = text.to_lowercase();
        if let Some(m) = self.terms.borrow().get(&low) {
            return Ok(m.clone());
        }
        let m = if !low.starts_with('<') {
            Matcher::keywords(&low)
        } else if let Some(family) = low.strip_prefix("<fn:").and_then(|f| f.strip_suffix('>')) {
            match functions::family(family) {
                Some(family) => Matcher::FuncList(family),
                None => return Err(CssError::grammar(text, "Unknown function family")),
            }
        } else if let Some(test) = simple::lookup(&low) {
            Matcher::Simple { name: low.clone(), test }
        } else if self.definition(&low).is_some() {
            Matcher::Ref(low.clone())
        } else {
            return Err(CssError::grammar(text, "Unknown type"));
        };
        let m = Rc::new(m);
        self.terms.borrow_mut().insert(low, m.clone());
        Ok(m)
    }

    /// Matcher behind a named type such as `<width>` or `<top>`
    pub fn resolve(&self, name: &str) -> CssResult<Rc<Matcher>> {
        if let Some(m) = self.resolved.borrow().get(name) {
            return Ok(m.clone());
        }
        let m = match self.definition(name) {
            Some(Definition::Text(text)) => self.compile(text)?,
            Some(Definition::Built(build)) => build(self)?,
            None => return Err(CssError::grammar(name, "Unknown type")),
        };
        self.resolved.borrow_mut().insert(name.to_string(), m.clone());
        Ok(m)
    }

    /// Complex types first, then `<property-name>`, then scoped descriptors
    fn definition(&self, name: &str) -> Option<Definition> {
        if let Some(def) = complex::lookup(name) {
            return Some(def);
        }
        let inner = name.strip_prefix('<')?.strip_suffix('>')?;
        match properties::lookup(inner) {
            Some(Spec::Grammar(text)) => return Some(Definition::Text(text)),
            Some(Spec::Known) => return None,
            None => {}
        }
        scoped::SCOPES.iter().find_map(|scope| match scope.own(inner) {
            Some(Spec::Grammar(text)) => Some(Definition::Text(text)),
            _ => None,
        })
    }

    /// Readable form of a property grammar for messages
    pub fn describe(&self, spec: &str) -> CssResult<String> {
        let text = match complex::lookup(spec) {
            Some(Definition::Text(text)) => text,
            Some(Definition::Built(build)) => return Ok(build(self)?.to_string()),
            None => match spec
                .strip_prefix('<')
                .and_then(|s| s.strip_suffix('>'))
                .and_then(properties::lookup)
            {
                Some(Spec::Grammar(text)) => text,
                _ => spec,
            },
        };
        self.explode(text)
    }

    /// Normalized form of a grammar string
    pub fn explode(&self, text: &str) -> CssResult<String> {
        if !text.contains('<') {
            return Ok(text.to_string());
        }
        Ok(self.compile(text)?.to_string())
    }

    /// Whether `value` was already found valid for `prop`
    pub fn is_known_valid(&self, prop: &str, value: &str) -> bool {
        self.valid.borrow().get(prop).is_some_and(|set| set.contains(value))
    }

    pub fn remember_valid(&self, prop: &str, value: &str) {
        self.valid
            .borrow_mut()
            .entry(prop.to_string())
            .or_default()
            .insert(value.to_string());
    }
}

/// Source of a named type
#[derive(Clone, Copy)]
pub enum Definition {
    Text(&'static str),
    Built(fn(&Grammar) -> CssResult<Rc<Matcher>>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Cursor;
    use crate::parser::parse_value;
    use crate::token::TokenValue;

    #[test]
    fn test_compile_is_memoized() {
        let g = Grammar::new();
        let a = g.compile("<len> | auto").unwrap();
        let b = g.compile("<len> | auto").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert!(Rc::ptr_eq(&g.term("AUTO").unwrap(), &g.term("auto").unwrap()));
    }

    #[test]
    fn test_term_kinds() {
        let g = Grammar::new();
        assert!(matches!(&*g.term("<len>").unwrap(), Matcher::Simple { .. }));
        assert!(matches!(&*g.term("<width>").unwrap(), Matcher::Ref(_)));
        assert!(matches!(&*g.term("<top>").unwrap(), Matcher::Ref(_)));
        assert!(matches!(&*g.term("<prefix>").unwrap(), Matcher::Ref(_)));
        assert!(matches!(&*g.term("<fn:basicShape>").unwrap(), Matcher::FuncList("basicShape")));
        assert!(g.term("<fn:nope>").is_err());
    }

    #[test]
    fn test_describe() {
        let g = Grammar::new();
        assert_eq!(g.describe("<width>").unwrap(), "auto | <width-base>");
        assert_eq!(g.describe("<top>").unwrap(), "auto | <len-pct>");
        assert_eq!(g.describe("collapse | separate").unwrap(), "collapse | separate");
        assert_eq!(g.describe("<len>{1,2}").unwrap(), "<len>{1,2}");
    }

    fn accepts(m: &Matcher, value: &TokenValue, g: &Grammar) -> bool {
        let mut cx = Cursor::new(value);
        m.matches(&mut cx, g).map_or(false, |hit| hit.is_hit()) && cx.at_end()
    }

    #[test]
    fn test_every_table_grammar_compiles_and_reprints() {
        let g = Grammar::new();
        let samples: Vec<TokenValue> = [
            "0", "auto", "none", "10px", "50%", "1.5", "red", "#fff", "1 2", "10px solid red",
            "left top", "bold 12px serif", "url(a.png)", "translateX(10px)",
        ]
        .iter()
        .map(|v| parse_value(v).unwrap())
        .collect();
        let texts = properties::grammars()
            .chain(complex::grammars())
            .chain(functions::grammars())
            .chain(scoped::grammars());
        for text in texts {
            let m = g.compile(text).unwrap_or_else(|e| panic!("{}: {}", text, e));
            let printed = m.to_string();
            let again = g.compile(&printed).unwrap_or_else(|e| panic!("{} -> {}: {}", text, printed, e));
            assert_eq!(again.to_string(), printed, "{}", text);
            for value in &samples {
                assert_eq!(
                    accepts(&m, value, &g),
                    accepts(&again, value, &g),
                    "{} -> {} on {:?}",
                    text,
                    printed,
                    value.text
                );
            }
        }
    }

    #[test]
    fn test_function_family_prints_lower_case() {
        let g = Grammar::new();
        let printed = g.compile("<fn:transform>").unwrap().to_string();
        assert!(printed.contains("rotatex()"), "{}", printed);
        assert!(!printed.contains("rotateX()"), "{}", printed);
        assert_eq!(g.compile(&printed).unwrap().to_string(), printed);
    }

    #[test]
    fn test_every_named_type_resolves() {
        let g = Grammar::new();
        for name in complex::names() {
            g.resolve(name).unwrap_or_else(|e| panic!("{}: {}", name, e));
        }
    }

    #[test]
    fn test_valid_memo() {
        let g = Grammar::new();
        assert!(!g.is_known_valid("color", "red"));
        g.remember_valid("color", "red");
        assert!(g.is_known_valid("color", "red"));
        assert!(!g.is_known_valid("width", "red"));
    }
}
