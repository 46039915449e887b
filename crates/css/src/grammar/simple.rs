//! Single-token value types
//!
//! Each `<type>` here is a predicate over one token. Calc-like functions
//! (`calc()`, `min()`...) are accepted wherever a number of some kind is.

use crate::bucket::{ALPHA, GLOBAL_KEYWORDS};
use crate::matcher::SimpleTest;
use crate::token::{Token, TokenKind, ValueType};

/// Predicate for a simple type name such as `<len>` (lower-cased, with brackets)
pub fn lookup(name: &str) -> Option<SimpleTest> {
    let test: SimpleTest = match name {
        "<animateable-feature-name>" => {
            |p| custom_ident_except(p, &["will-change", "auto", "scroll-position", "contents"])
        }
        "<angle>" => |p| p.is_calc || p.kind == TokenKind::Angle,
        "<angle-or-0>" => |p| p.is_calc || p.is0 || p.kind == TokenKind::Angle,
        "<ascii4>" => |p| {
            p.kind == TokenKind::String && {
                let s = p.string_value();
                s.chars().count() == 4 && s.chars().all(|c| (' '..='~').contains(&c))
            }
        },
        "<attr>" => |p| p.is_attr,
        "<custom-ident>" => |p| custom_ident_except(p, &[]),
        "<custom-prop>" => |p| p.ty == ValueType::Custom,
        "<flex>" => |p| p.is_calc || (p.units == "fr" && non_negative(p)),
        "<func>" => |p| p.ty == ValueType::Function,
        "<hue>" => |p| p.is_calc || matches!(p.kind, TokenKind::Number | TokenKind::Angle),
        "<ident>" => |p| p.kind == TokenKind::Ident,
        "<ident-for-grid>" => ident_for_grid,
        "<ident-not-none>" => |p| p.kind == TokenKind::Ident && !p.is_none,
        "<ie-function>" => |p| p.ie,
        "<int>" => |p| p.is_calc || p.is_int,
        "<int0-1>" => |p| p.is_calc || p.is0 || (p.is_int && p.number == Some(1.0)),
        "<int0+>" => |p| p.is_calc || (p.is_int && non_negative(p)),
        "<int1+>" => |p| p.is_calc || (p.is_int && p.number.is_some_and(|n| n > 0.0)),
        "<int2-4>" => |p| p.is_calc || (p.is_int && in_range(p, 2.0, 4.0)),
        "<keyframes-name>" => |p| custom_ident_except(p, &[]) || p.kind == TokenKind::String,
        "<len>" => |p| p.is_calc || p.is0 || p.kind == TokenKind::Length,
        "<len0+>" => |p| p.is_calc || p.is0 || (p.kind == TokenKind::Length && non_negative(p)),
        "<len-pct>" => {
            |p| p.is_calc || p.is0 || matches!(p.kind, TokenKind::Length | TokenKind::Pct)
        }
        "<len-pct0+>" => |p| {
            p.is_calc || p.is0 || (non_negative(p) && matches!(p.kind, TokenKind::Length | TokenKind::Pct))
        },
        "<line-names>" => line_names,
        "<named-or-hex-color>" => |p| p.ty == ValueType::Color,
        "<num>" => |p| p.is_calc || p.kind == TokenKind::Number,
        "<num0+>" => |p| p.is_calc || (p.kind == TokenKind::Number && non_negative(p)),
        "<num0-1>" => |p| p.is_calc || (p.kind == TokenKind::Number && in_range(p, 0.0, 1.0)),
        "<num1-1000>" => |p| p.is_calc || (p.kind == TokenKind::Number && in_range(p, 1.0, 1000.0)),
        "<num-pct>" => |p| p.is_calc || matches!(p.kind, TokenKind::Number | TokenKind::Pct),
        "<num-pct0+>" => |p| {
            p.is_calc || (non_negative(p) && matches!(p.kind, TokenKind::Number | TokenKind::Pct))
        },
        "<num-pct-none>" => {
            |p| p.is_calc || p.is_none || matches!(p.kind, TokenKind::Number | TokenKind::Pct)
        }
        "<pct>" => |p| p.is_calc || p.is0 || p.kind == TokenKind::Pct,
        "<pct0+>" => |p| p.is_calc || p.is0 || (p.kind == TokenKind::Pct && non_negative(p)),
        "<pct0-100>" => |p| p.is_calc || p.is0 || (p.kind == TokenKind::Pct && in_range(p, 0.0, 100.0)),
        "<resolution>" => |p| p.kind == TokenKind::Resolution,
        "<string>" => |p| p.kind == TokenKind::String,
        "<time>" => |p| p.is_calc || p.kind == TokenKind::Time,
        "<time0+>" => |p| p.is_calc || (p.kind == TokenKind::Time && non_negative(p)),
        "<unicode-range>" => |p| p.kind == TokenKind::URange,
        "<uri>" => |p| p.uri.is_some(),
        "<rel-hsl>" => |p| p.is_none || rel_channel(p, "hsl"),
        "<rel-hwb>" => |p| p.is_none || rel_channel(p, "hwb"),
        "<rel-lab>" => |p| p.is_none || rel_channel(p, "lab"),
        "<rel-lch>" => |p| p.is_none || rel_channel(p, "lch"),
        "<rel-rgb>" => |p| p.is_none || rel_channel(p, "rgb"),
        "<rel-hsl-num-pct>" => |p| rel_num_pct(p, "hsl"),
        "<rel-hwb-num-pct>" => |p| rel_num_pct(p, "hwb"),
        "<rel-lab-num-pct>" => |p| rel_num_pct(p, "lab"),
        "<rel-lch-num-pct>" => |p| rel_num_pct(p, "lch"),
        "<rel-rgb-num-pct>" => |p| rel_num_pct(p, "rgb"),
        _ => return None,
    };
    Some(test)
}

fn non_negative(p: &Token) -> bool {
    p.number.is_some_and(|n| n >= 0.0)
}

fn in_range(p: &Token, min: f64, max: f64) -> bool {
    p.number.is_some_and(|n| (min..=max).contains(&n))
}

fn custom_ident_except(p: &Token, extra: &[&str]) -> bool {
    p.kind == TokenKind::Ident && !GLOBAL_KEYWORDS.has(p.low_text()) && !extra.contains(&p.low_text())
}

fn ident_for_grid(p: &Token) -> bool {
    custom_ident_except(p, &["span", "auto"])
}

/// `[ name1 name2 ]` in grid templates
fn line_names(p: &Token) -> bool {
    p.ty == ValueType::Block
        && p.code == '['
        && p.expr
            .as_ref()
            .map_or(true, |e| e.parts.iter().all(|t| t.is_var || ident_for_grid(t)))
}

/// Channel keyword of relative color syntax: `r`, `g`, `b`, `alpha`...
fn rel_channel(p: &Token, letters: &str) -> bool {
    match p.len() {
        1 => letters.contains(p.code),
        5 => ALPHA.has(p.low_text()),
        _ => false,
    }
}

fn rel_num_pct(p: &Token, letters: &str) -> bool {
    p.is_none
        || p.is_calc
        || matches!(p.kind, TokenKind::Number | TokenKind::Pct)
        || rel_channel(p, letters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;

    fn check(name: &str, value: &str) -> bool {
        let test = lookup(name).unwrap();
        let value = parse_value(value).unwrap();
        test(&value.parts[0])
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(check("<num0-1>", "0.5"));
        assert!(!check("<num0-1>", "1.5"));
        assert!(check("<int1+>", "3"));
        assert!(!check("<int1+>", "0"));
        assert!(!check("<int>", "1.5"));
        assert!(check("<len>", "0"));
        assert!(!check("<len>", "1"));
        assert!(check("<len0+>", "2em"));
        assert!(!check("<len0+>", "-2em"));
        assert!(check("<pct0-100>", "50%"));
        assert!(check("<len>", "calc(1px + 2em)"));
    }

    #[test]
    fn test_identifiers() {
        assert!(check("<custom-ident>", "foo"));
        assert!(!check("<custom-ident>", "inherit"));
        assert!(!check("<ident-for-grid>", "span"));
        assert!(check("<keyframes-name>", "'spin'"));
        assert!(!check("<ident-not-none>", "none"));
        assert!(check("<custom-prop>", "--x"));
    }

    #[test]
    fn test_strings_and_colors() {
        assert!(check("<ascii4>", "\"liga\""));
        assert!(!check("<ascii4>", "\"lig\""));
        assert!(check("<named-or-hex-color>", "red"));
        assert!(check("<named-or-hex-color>", "#abc"));
        assert!(!check("<named-or-hex-color>", "foo"));
        assert!(check("<uri>", "url(a.png)"));
    }

    #[test]
    fn test_relative_color_channels() {
        assert!(check("<rel-rgb>", "r"));
        assert!(!check("<rel-rgb>", "h"));
        assert!(check("<rel-hsl>", "alpha"));
        assert!(check("<rel-lab-num-pct>", "10%"));
    }

    #[test]
    fn test_line_names() {
        assert!(check("<line-names>", "[a b]"));
        assert!(!check("<line-names>", "[auto]"));
        assert!(!check("<line-names>", "(a)"));
    }

    #[test]
    fn test_unknown() {
        assert!(lookup("<nope>").is_none());
        assert!(lookup("len").is_none());
    }
}
