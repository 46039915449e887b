//! Declaration value validation
//!
//! Checks a declaration value against the grammar of its property, looked
//! up in the global property table or in the descriptor table of the
//! enclosing at-rule.

use crate::bucket::GLOBAL_KEYWORDS;
use crate::error::{CssResult, SourceLocation};
use crate::grammar::scoped::Scope;
use crate::grammar::{properties, Grammar, Spec};
use crate::matcher::Cursor;
use crate::token::{clip, Token, TokenKind, TokenValue};

/// Longest excerpt of a value quoted in a message
const CLIP: usize = 30;

/// A declaration rejected by its grammar
#[derive(Debug, Clone, PartialEq)]
pub struct Invalid {
    pub message: String,
    pub loc: SourceLocation,
}

impl Invalid {
    fn new(message: String, loc: SourceLocation) -> Self {
        Self { message, loc }
    }

    fn end_of_value(p: &Token) -> Self {
        Self::new(
            format!("Expected end of value but found \"{}\".", clip(&p.text, CLIP)),
            p.loc,
        )
    }
}

/// Table lookup result: the spec and whether it came from the global table
fn find(name: &str, scope: Option<&Scope>) -> (Option<Spec<'static>>, bool) {
    match scope {
        None => (properties::lookup(name), true),
        Some(scope) => match scope.get(name) {
            Some(spec) => (Some(spec), false),
            None if scope.all => (properties::lookup(name), true),
            None => (None, false),
        },
    }
}

/// `attr(` as a whole word, any case
fn mentions_attr(text: &str) -> bool {
    let low = text.to_ascii_lowercase();
    low.match_indices("attr(").any(|(i, _)| {
        low[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
    })
}

impl Grammar {
    /// Validate `value` of declaration `prop`, within the descriptor table of
    /// the enclosing at-rule if there is one. Returns the problem found, if any.
    pub fn validate_property(
        &self,
        prop: &Token,
        value: &TokenValue,
        scope: Option<&Scope>,
    ) -> CssResult<Option<Invalid>> {
        let mut name = prop.low_text();
        let (mut spec, mut global) = find(name, scope);
        if spec.is_none() && prop.vendor_pos > 0 {
            name = prop.unprefixed();
            (spec, global) = find(name, scope);
        }
        let text = match spec {
            Some(Spec::Known) => return Ok(None),
            Some(Spec::Grammar(text)) => text,
            None => {
                let what = if !global && properties::lookup(name).is_some() {
                    "Misplaced"
                } else {
                    "Unknown"
                };
                return Ok(Some(Invalid::new(
                    format!("{} property \"{}\".", what, prop),
                    prop.loc,
                )));
            }
        };
        if value.is_var {
            return Ok(None);
        }
        let Some(p0) = value.parts.first() else {
            return Ok(None);
        };
        if p0.kind == TokenKind::Ident && GLOBAL_KEYWORDS.has(p0.low_text()) {
            return Ok(value.parts.get(1).map(Invalid::end_of_value));
        }
        let src = value.text.trim();
        if self.is_known_valid(name, src) {
            return Ok(None);
        }

        let m = self.compile(text)?;
        let mut cx = Cursor::new(value);
        let mut hit = m.matches(&mut cx, self)?.is_hit();
        if (!hit || !cx.at_end()) && mentions_attr(src) {
            if !hit {
                cx.i = 0;
                cx.try_attr = true;
                hit = m.matches(&mut cx, self)?.is_hit();
            }
            while cx.current().is_some_and(|p| p.is_attr) {
                cx.i += 1;
            }
        }
        if let Some(p) = cx.current() {
            if hit || cx.i > 0 {
                return Ok(Some(Invalid::end_of_value(p)));
            }
        }
        if !hit {
            if let Some(bad) = cx.bad_func.take() {
                if bad.is_var {
                    return Ok(None);
                }
                return Ok(Some(Invalid::new(
                    format!("Expected {} but found \"{}\".", bad.matcher, clip(&bad.text, CLIP)),
                    bad.loc,
                )));
            }
            return Ok(Some(Invalid::new(
                format!(
                    "Expected {} but found \"{}\".",
                    self.describe(text)?,
                    clip(&value.text, CLIP)
                ),
                value.loc,
            )));
        }
        self.remember_valid(name, src);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::scoped::scope;
    use crate::parser::parse_value;
    use crate::tokenizer::TokenStream;

    fn check_in(prop: &str, value: &str, within: Option<&str>) -> Option<Invalid> {
        let g = Grammar::new();
        let prop = TokenStream::new(prop).get(false, false);
        let value = parse_value(value).unwrap();
        let scope = within.and_then(scope);
        g.validate_property(&prop, &value, scope).unwrap()
    }

    fn check(prop: &str, value: &str) -> Option<String> {
        check_in(prop, value, None).map(|e| e.message)
    }

    #[test]
    fn test_valid_values() {
        assert_eq!(check("width", "10px"), None);
        assert_eq!(check("color", "rgb(1 2 3 / 50%)"), None);
        assert_eq!(check("margin", "0 auto"), None);
        assert_eq!(check("display", "inline flex"), None);
        assert_eq!(check("transform", "rotateX(10deg) scale(2)"), None);
        assert_eq!(check("background", "url(a.png) no-repeat, red"), None);
        assert_eq!(check("quotes", "anything goes"), None);
    }

    #[test]
    fn test_bad_unit() {
        let err = check("width", "10xyz").unwrap();
        assert!(err.starts_with("Expected auto | <width-base>"), "{}", err);
        assert!(err.ends_with("but found \"10xyz\"."), "{}", err);
    }

    #[test]
    fn test_unknown_properties() {
        assert_eq!(check("unknown-prop", "red").as_deref(), Some("Unknown property \"unknown-prop\"."));
        assert_eq!(
            check("-webkit-unknown-prop", "red").as_deref(),
            Some("Unknown property \"-webkit-unknown-prop\".")
        );
        assert_eq!(check("-webkit-transition", "none"), None);
    }

    #[test]
    fn test_global_keywords() {
        assert_eq!(check("width", "inherit"), None);
        assert_eq!(
            check("width", "inherit 10px").as_deref(),
            Some("Expected end of value but found \"10px\".")
        );
    }

    #[test]
    fn test_trailing_token() {
        let err = check_in("width", "10px 20px", None).unwrap();
        assert_eq!(err.message, "Expected end of value but found \"20px\".");
        assert_eq!(err.loc.column, 6);
    }

    #[test]
    fn test_variables_are_not_checked() {
        assert_eq!(check("width", "var(--w) 1 2 3"), None);
        assert_eq!(check("color", "rgb(var(--c))"), None);
    }

    #[test]
    fn test_bad_function_arguments() {
        let err = check("color", "rgb(1 2)").unwrap();
        assert!(err.ends_with("but found \"1 2\"."), "{}", err);
        assert!(err.starts_with("Expected [ <num>#{3} | <pct>#{3} ]"), "{}", err);
    }

    #[test]
    fn test_attr_fallback() {
        assert_eq!(check("width", "attr(data-w px)"), None);
        assert!(check("width", "attr(data-w px) 1px").is_some());
    }

    #[test]
    fn test_scoped_descriptors() {
        assert_eq!(check_in("font-display", "swap", Some("font-face")), None);
        assert_eq!(check_in("font-family", "Foo", Some("font-face")), None);
        let err = check_in("color", "red", Some("font-face")).unwrap();
        assert_eq!(err.message, "Misplaced property \"color\".");
        let err = check_in("nope", "red", Some("font-face")).unwrap();
        assert_eq!(err.message, "Unknown property \"nope\".");
        assert_eq!(check_in("color", "red", Some("page")), None);
        assert_eq!(check_in("size", "A4 landscape", Some("page")), None);
        assert_eq!(check_in("system", "fixed 3", Some("counter-style")), None);
        assert_eq!(check_in("pad", "3 \"0\"", Some("counter-style")), None);
    }

    #[test]
    fn test_valid_values_are_remembered() {
        let g = Grammar::new();
        let prop = TokenStream::new("width").get(false, false);
        let value = parse_value("10px").unwrap();
        assert!(g.validate_property(&prop, &value, None).unwrap().is_none());
        assert!(g.is_known_valid("width", "10px"));
    }
}
