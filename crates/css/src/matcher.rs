//! Value grammar matcher
//!
//! Compiles CSS value definition syntax (`<len> | auto`, `a || b`,
//! `[ x y ]{1,4}`, `fn( <num># )`...) into a tree of [`Matcher`] nodes and
//! matches the tree against the tokens of a declaration value.
//!
//! Matching is greedy with local backtracking: a node that fails restores
//! the cursor to where it started, and only `||` / `&&` groups search
//! through the possible orders of their members.

use std::fmt;
use std::rc::Rc;

use smallvec::{smallvec, SmallVec};

use crate::bucket::Bucket;
use crate::error::{CssError, CssResult, SourceLocation};
use crate::grammar::{functions, Grammar};
use crate::token::{clip, Token, TokenValue, ValueType};

/// Predicate of a simple value type like `<len>`
pub type SimpleTest = fn(&Token) -> bool;

// Printing precedences of combinators
pub const MOD: u8 = 5;
pub const SEQ: u8 = 4;
pub const ANDAND: u8 = 3;
pub const OROR: u8 = 2;
pub const ALT: u8 = 1;

/// Outcome of matching a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Miss,
    /// Succeeded without consuming anything, e.g. `<x>?` when `<x>` is absent
    Empty,
    Matched,
}

impl Hit {
    pub fn is_hit(self) -> bool {
        self != Hit::Miss
    }
}

/// A grammar node
#[derive(Debug)]
pub enum Matcher {
    /// One of several keywords: `auto | none`
    Keywords { words: Bucket, text: String },
    /// A predicate type: `<len>`
    Simple { name: String, test: SimpleTest },
    /// A named complex type or property grammar, resolved on first use
    Ref(String),
    /// `name()` accepting any arguments, or `name( body )`
    Func { name: String, body: Option<Rc<Matcher>> },
    /// `<fn:color>`: any function of a family
    FuncList(&'static str),
    /// `a | b`
    Alt(Vec<Rc<Matcher>>),
    /// `a b`
    Seq(Vec<Rc<Matcher>>),
    /// `a || b` when `req` is `None`, otherwise `a && b` with the required members marked
    Many { items: Vec<Rc<Matcher>>, req: Option<Vec<bool>> },
    /// Repetition: `?`, `*`, `+`, `#`, `{m,n}`; `max` is `usize::MAX` for unbounded
    Braces {
        m: Rc<Matcher>,
        min: usize,
        max: usize,
        marker: Option<char>,
        sep: Option<Rc<Matcher>>,
    },
}

/// A function whose arguments did not match its inner grammar
#[derive(Debug, Clone)]
pub struct BadFunc {
    pub loc: SourceLocation,
    pub text: String,
    pub is_var: bool,
    pub matcher: Rc<Matcher>,
}

/// Position inside the tokens of a value
#[derive(Debug)]
pub struct Cursor<'v> {
    pub parts: &'v [Token],
    pub i: usize,
    /// Let `attr()` stand in for any term
    pub try_attr: bool,
    pub bad_func: Option<BadFunc>,
}

impl<'v> Cursor<'v> {
    pub fn new(value: &'v TokenValue) -> Self {
        Self::over(&value.parts)
    }

    pub fn over(parts: &'v [Token]) -> Self {
        Self { parts, i: 0, try_attr: false, bad_func: None }
    }

    pub fn current(&self) -> Option<&'v Token> {
        self.parts.get(self.i)
    }

    pub fn at_end(&self) -> bool {
        self.i >= self.parts.len()
    }
}

/// How `many` decides which members are required
#[derive(Debug, Clone)]
pub enum Required {
    /// `||`: at least one member
    Any,
    /// `&&`: every member not marked with `?`
    AllButOptional,
    Mask(Vec<bool>),
}

impl Matcher {
    pub fn keywords(text: &str) -> Self {
        let text = text.to_lowercase();
        let words = Bucket::new(text.split('|').map(str::trim));
        Matcher::Keywords { words, text }
    }

    /// Alternatives; plain keyword members are merged into one set up front
    pub fn alt(mut ms: Vec<Rc<Matcher>>) -> Rc<Matcher> {
        let mut merged: Vec<String> = Vec::new();
        ms.retain(|m| match &**m {
            Matcher::Keywords { text, .. } => {
                merged.push(text.clone());
                false
            }
            _ => true,
        });
        if !merged.is_empty() {
            ms.insert(0, Rc::new(Matcher::keywords(&merged.join(" | "))));
        }
        if ms.len() == 1 {
            return ms.remove(0);
        }
        Rc::new(Matcher::Alt(ms))
    }

    pub fn seq(mut ms: Vec<Rc<Matcher>>) -> Rc<Matcher> {
        if ms.len() == 1 {
            return ms.remove(0);
        }
        Rc::new(Matcher::Seq(ms))
    }

    pub fn many(req: Required, mut ms: Vec<Rc<Matcher>>) -> Rc<Matcher> {
        if ms.len() == 1 {
            return ms.remove(0);
        }
        let req = match req {
            Required::Any => None,
            Required::AllButOptional => Some(
                ms.iter()
                    .map(|m| !matches!(&**m, Matcher::Braces { marker: Some('?'), .. }))
                    .collect(),
            ),
            Required::Mask(mask) => Some(mask),
        };
        Rc::new(Matcher::Many { items: ms, req })
    }

    /// Repeat `m`; with a separator every repetition after the first is `sep m`
    pub fn braces(
        m: Rc<Matcher>,
        min: usize,
        max: usize,
        marker: Option<char>,
        sep: Option<Rc<Matcher>>,
    ) -> Rc<Matcher> {
        let sep = sep.map(|s| Matcher::seq(vec![s, m.clone()]));
        Rc::new(Matcher::Braces { m, min, max, marker, sep })
    }

    fn is_meta(&self) -> bool {
        matches!(
            self,
            Matcher::Alt(_) | Matcher::Seq(_) | Matcher::Many { .. } | Matcher::Braces { .. }
        )
    }

    /// Match at the cursor, advancing it past the consumed tokens. On a
    /// miss the cursor is left where it was.
    pub fn matches(&self, cx: &mut Cursor<'_>, g: &Grammar) -> CssResult<Hit> {
        if let Matcher::Ref(name) = self {
            return g.resolve(name)?.matches(cx, g);
        }
        let start = cx.i;
        let Some(p) = cx.current() else {
            return Ok(match self {
                Matcher::Braces { min: 0, .. } => Hit::Empty,
                _ => Hit::Miss,
            });
        };
        let hit = if self.is_meta() {
            self.match_meta(cx, g)?
        } else if p.is_var || self.test(p, cx, g)? || (cx.try_attr && p.is_attr) {
            cx.i += 1;
            Hit::Matched
        } else {
            Hit::Miss
        };
        if hit == Hit::Miss {
            cx.i = start;
        }
        Ok(hit)
    }

    /// Whether a single token satisfies a leaf node
    fn test(&self, p: &Token, cx: &mut Cursor<'_>, g: &Grammar) -> CssResult<bool> {
        Ok(match self {
            Matcher::Keywords { words, .. } => {
                words.has(p.low_text()) || (p.vendor_pos > 0 && words.has(p.unprefixed()))
            }
            Matcher::Simple { test, .. } => test(p),
            Matcher::Func { name, body } => {
                if !func_name_is(p, name) {
                    return Ok(false);
                }
                match body {
                    Some(body) => match_args(p, body.clone(), cx, g)?,
                    None => true,
                }
            }
            Matcher::FuncList(family) => {
                let Some(body) = func_in_family(p, family) else {
                    return Ok(false);
                };
                let body = g.compile(body)?;
                match_args(p, body, cx, g)?
            }
            _ => false,
        })
    }

    fn match_meta(&self, cx: &mut Cursor<'_>, g: &Grammar) -> CssResult<Hit> {
        match self {
            Matcher::Alt(ms) => {
                for m in ms {
                    if m.matches(cx, g)?.is_hit() {
                        return Ok(Hit::Matched);
                    }
                }
                Ok(Hit::Miss)
            }
            Matcher::Seq(ms) => {
                for m in ms {
                    if !m.matches(cx, g)?.is_hit() {
                        return Ok(Hit::Miss);
                    }
                }
                Ok(Hit::Matched)
            }
            Matcher::Braces { m, min, max, sep, .. } => {
                let start = cx.i;
                let mut n = 0;
                while n < *max {
                    let before = cx.i;
                    let item = match sep {
                        Some(sep) if n > 0 => sep,
                        _ => m,
                    };
                    if !item.matches(cx, g)?.is_hit() {
                        break;
                    }
                    n += 1;
                    if cx.i == before && n >= *min {
                        break;
                    }
                }
                Ok(if n < *min {
                    Hit::Miss
                } else if cx.i == start && *min == 0 {
                    Hit::Empty
                } else {
                    Hit::Matched
                })
            }
            Matcher::Many { items, req } => {
                let mut run = ManyRun {
                    items,
                    req: req.as_deref(),
                    state: smallvec![false; items.len()],
                    max: 0,
                };
                if !run.search(cx, g, 0, false)? {
                    run.search(cx, g, 0, true)?;
                }
                let ok = match req {
                    None => run.max > 0,
                    Some(req) => req.iter().zip(&run.state).all(|(r, s)| !*r || *s),
                };
                Ok(if ok { Hit::Matched } else { Hit::Miss })
            }
            _ => Ok(Hit::Miss),
        }
    }

    /// Printable grammar at the given precedence
    pub fn to_string_prec(&self, prec: u8) -> String {
        let wrap = |s: String, own: u8| if prec > own { format!("[ {} ]", s) } else { s };
        match self {
            Matcher::Keywords { text, .. } => {
                if prec > ALT && text.contains('|') {
                    format!("[ {} ]", text)
                } else {
                    text.clone()
                }
            }
            Matcher::Simple { name, .. } => name.clone(),
            Matcher::Ref(name) => name.clone(),
            Matcher::Func { name, body: None } => format!("{}()", name),
            Matcher::Func { name, body: Some(body) } => format!("{}( {} )", name, body.to_string_prec(0)),
            Matcher::FuncList(family) => {
                let names: Vec<_> = functions::names(family)
                    .map(|n| format!("{}()", n.to_ascii_lowercase()))
                    .collect();
                wrap(names.join(" | "), ALT)
            }
            Matcher::Alt(ms) => wrap(join(ms, ALT, " | "), ALT),
            Matcher::Seq(ms) => wrap(join(ms, SEQ, " "), SEQ),
            Matcher::Many { items, req } => {
                let own = if req.is_some() { ANDAND } else { OROR };
                let parts: Vec<String> = items
                    .iter()
                    .enumerate()
                    .map(|(i, m)| match req {
                        Some(req) if !req[i] => {
                            let s = m.to_string_prec(MOD);
                            if s.ends_with('?') { s } else { s + "?" }
                        }
                        _ => m.to_string_prec(own),
                    })
                    .collect();
                wrap(parts.join(if req.is_some() { " && " } else { " || " }), own)
            }
            Matcher::Braces { m, min, max, marker, .. } => {
                let mut s = m.to_string_prec(MOD);
                let counts = || match (*min, *max) {
                    (a, b) if a == b => format!("{{{}}}", a),
                    (a, usize::MAX) => format!("{{{},}}", a),
                    (a, b) => format!("{{{},{}}}", a, b),
                };
                match marker {
                    Some('#') => {
                        s.push('#');
                        if !(*min == 1 && *max == usize::MAX) {
                            s.push_str(&counts());
                        }
                    }
                    Some(c) => s.push(*c),
                    None => s.push_str(&counts()),
                }
                s
            }
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_prec(0))
    }
}

fn join(ms: &[Rc<Matcher>], prec: u8, sep: &str) -> String {
    ms.iter().map(|m| m.to_string_prec(prec)).collect::<Vec<_>>().join(sep)
}

fn func_name_is(p: &Token, name: &str) -> bool {
    if p.ty != ValueType::Function {
        return false;
    }
    let Some(pn) = p.name.as_deref() else {
        return false;
    };
    pn == name
        || p.prefix.as_deref().is_some_and(|pre| {
            name.len() == pre.len() + pn.len() && name.starts_with(pre) && name.ends_with(pn)
        })
}

fn func_in_family(p: &Token, family: &str) -> Option<&'static str> {
    if p.ty != ValueType::Function {
        return None;
    }
    let pn = p.name.as_deref()?;
    functions::lookup(family, pn).or_else(|| {
        let prefixed = format!("{}{}", p.prefix.as_deref()?, pn);
        functions::lookup(family, &prefixed)
    })
}

/// Match the arguments of function token `p` against `body` as a whole
fn match_args(p: &Token, body: Rc<Matcher>, cx: &mut Cursor<'_>, g: &Grammar) -> CssResult<bool> {
    let Some(args) = p.expr.as_deref() else {
        return Ok(matches!(&*body, Matcher::Braces { min: 0, .. }));
    };
    if args.is_var {
        return Ok(true);
    }
    let mut inner = Cursor::new(args);
    if body.matches(&mut inner, g)?.is_hit() && inner.at_end() {
        return Ok(true);
    }
    cx.bad_func = Some(BadFunc {
        loc: args.loc,
        text: args.text.clone(),
        is_var: args.is_var,
        matcher: body,
    });
    Ok(false)
}

/// Search state of a `||` / `&&` group
struct ManyRun<'m> {
    items: &'m [Rc<Matcher>],
    req: Option<&'m [bool]>,
    state: SmallVec<[bool; 8]>,
    max: usize,
}

impl ManyRun<'_> {
    /// Depth-first search for an order that matches every member. Records
    /// the best count seen; with `retry` it stops at the first combination
    /// reaching that count.
    fn search(&mut self, cx: &mut Cursor<'_>, g: &Grammar, count: usize, retry: bool) -> CssResult<bool> {
        for i in 0..self.items.len() {
            if self.state[i] {
                continue;
            }
            let start = cx.i;
            // running out of tokens counts as a match for the rest
            let ok = start >= cx.parts.len() || self.items[i].matches(cx, g)? == Hit::Matched;
            if !ok {
                continue;
            }
            self.state[i] = true;
            let inc = usize::from(self.req.map_or(true, |req| req[i]));
            if self.search(cx, g, count + inc, retry)? {
                return Ok(true);
            }
            self.state[i] = false;
            cx.i = start;
        }
        if retry {
            return Ok(count == self.max);
        }
        self.max = self.max.max(count);
        Ok(count == self.items.len())
    }
}

/// Compiles grammar strings
pub(crate) struct GrammarParser<'s, 'g> {
    src: &'s str,
    pos: usize,
    g: &'g Grammar,
}

impl<'s, 'g> GrammarParser<'s, 'g> {
    pub(crate) fn parse(src: &'s str, g: &'g Grammar) -> CssResult<Rc<Matcher>> {
        let mut parser = GrammarParser { src, pos: 0, g };
        let m = parser.alt()?;
        if parser.pos < src.len() {
            let rest = &src[parser.pos..];
            return Err(CssError::grammar(
                src,
                format!("Unexpected \"{}\" at position {}", clip(rest, 30), parser.pos),
            ));
        }
        Ok(m)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn ws_len(&self) -> usize {
        let rest = self.rest();
        rest.len() - rest.trim_start().len()
    }

    fn fail<T>(&self, expected: &str) -> CssResult<T> {
        Err(CssError::grammar(self.src, format!("Expected {} at {}", expected, self.pos)))
    }

    /// `a | b | c` made only of plain words, up to a `|`, `]`, `)` or the end
    fn plain_text_alt(&mut self) -> Option<&'s str> {
        let rest = self.rest();
        let word = |s: &str| s.bytes().take_while(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_').count();
        let mut ends = Vec::new();
        let mut i = word(rest);
        if i == 0 {
            return None;
        }
        ends.push(i);
        loop {
            let after = &rest[i..];
            let lead = after.len() - after.trim_start().len();
            let Some(bar) = after[lead..].strip_prefix('|') else { break };
            if bar.starts_with('|') {
                break;
            }
            let gap = bar.len() - bar.trim_start().len();
            let n = word(&bar[gap..]);
            if n == 0 {
                break;
            }
            i += lead + 1 + gap + n;
            ends.push(i);
        }
        let accepted = ends.into_iter().rev().find(|&end| {
            let after = &rest[end..];
            let trimmed = after.trim_start();
            let had_ws = trimmed.len() < after.len();
            trimmed.is_empty()
                || (trimmed.starts_with('|') && !trimmed[1..].starts_with('|'))
                || trimmed.starts_with(']')
                || (had_ws && trimmed.starts_with(')'))
        })?;
        self.pos += accepted;
        Some(&rest[..accepted])
    }

    fn read_sep(&mut self, sep: &str) -> bool {
        let lead = self.ws_len();
        let rest = &self.rest()[lead..];
        if !rest.starts_with(sep) || (sep == "|" && rest[1..].starts_with('|')) {
            return false;
        }
        self.pos += lead + sep.len();
        self.pos += self.ws_len();
        true
    }

    /// Juxtaposition: whitespace not followed by another combinator or a closer
    fn read_seq_sep(&mut self) -> bool {
        let lead = self.ws_len();
        if lead == 0 {
            return false;
        }
        match self.rest()[lead..].chars().next() {
            None | Some('&' | '|' | ')' | ']') => false,
            Some(_) => {
                self.pos += lead;
                true
            }
        }
    }

    fn alt(&mut self) -> CssResult<Rc<Matcher>> {
        let mut alts = Vec::new();
        loop {
            if let Some(words) = self.plain_text_alt() {
                alts.push(self.g.term(words)?);
            } else {
                let mut ors = Vec::new();
                loop {
                    let mut ands = Vec::new();
                    loop {
                        let mut seq = vec![self.term()?];
                        while self.read_seq_sep() {
                            seq.push(self.term()?);
                        }
                        ands.push(Matcher::seq(seq));
                        if !self.read_sep("&&") {
                            break;
                        }
                    }
                    ors.push(Matcher::many(Required::AllButOptional, ands));
                    if !self.read_sep("||") {
                        break;
                    }
                }
                alts.push(Matcher::many(Required::Any, ors));
            }
            if !self.read_sep("|") {
                break;
            }
        }
        Ok(Matcher::alt(alts))
    }

    fn term(&mut self) -> CssResult<Rc<Matcher>> {
        let m = if self.peek() == Some('[') {
            self.pos += 1;
            self.pos += self.ws_len();
            let m = self.alt()?;
            self.pos += self.ws_len();
            if self.peek() != Some(']') {
                return self.fail("\"]\"");
            }
            self.pos += 1;
            m
        } else if let Some((name, empty)) = self.func_begin() {
            let body = if empty {
                None
            } else {
                let body = self.alt()?;
                self.pos += self.ws_len();
                if self.peek() != Some(')') {
                    return self.fail("\")\"");
                }
                self.pos += 1;
                Some(body)
            };
            Rc::new(Matcher::Func { name, body })
        } else {
            let len = self.term_len();
            if len == 0 {
                return self.fail("a term");
            }
            let text = &self.rest()[..len];
            self.pos += len;
            self.g.term(text)?
        };
        self.modifier(m)
    }

    /// `name(` followed by an optional immediate `)`
    fn func_begin(&mut self) -> Option<(String, bool)> {
        let rest = self.rest();
        let n = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
            .count();
        if n == 0 || !rest[n..].starts_with('(') {
            return None;
        }
        let name = rest[..n].to_lowercase();
        self.pos += n + 1;
        self.pos += self.ws_len();
        let empty = self.peek() == Some(')');
        if empty {
            self.pos += 1;
        }
        Some((name, empty))
    }

    /// `<type>`, a quoted literal, or a bare word
    fn term_len(&self) -> usize {
        let rest = self.rest();
        match rest.chars().next() {
            Some('<') => match rest.find(|c: char| c == '>' || c.is_whitespace()) {
                Some(i) if rest[i..].starts_with('>') && i > 1 => i + 1,
                _ => bare_len(rest),
            },
            Some(q @ ('"' | '\'')) => match rest[1..].find(q) {
                Some(i) => i + 2,
                None => bare_len(rest),
            },
            _ => bare_len(rest),
        }
    }

    fn modifier(&mut self, m: Rc<Matcher>) -> CssResult<Rc<Matcher>> {
        let rest = self.rest();
        let hash = rest.starts_with("#{");
        if rest.starts_with('{') || hash {
            self.pos += usize::from(hash);
            let (min, max) = self.counts()?;
            let sep = if hash { Some(self.g.term(",")?) } else { None };
            return Ok(Matcher::braces(m, min, max, hash.then_some('#'), sep));
        }
        let Some(c) = self.peek() else { return Ok(m) };
        let (min, max) = match c {
            '?' => (0, 1),
            '*' => (0, usize::MAX),
            '+' => (1, usize::MAX),
            '#' => (1, usize::MAX),
            _ => return Ok(m),
        };
        self.pos += 1;
        let sep = if c == '#' { Some(self.g.term(",")?) } else { None };
        Ok(Matcher::braces(m, min, max, Some(c), sep))
    }

    /// `{a}`, `{a,}` or `{a,b}`
    fn counts(&mut self) -> CssResult<(usize, usize)> {
        let rest = self.rest();
        let Some(close) = rest.find('}') else {
            return self.fail("\"{n,m}\"");
        };
        let inner = &rest[1..close];
        let parse = |s: &str| s.trim().parse::<usize>().ok();
        let counts = match inner.split_once(',') {
            None => parse(inner).map(|a| (a, a)),
            Some((a, b)) if b.trim().is_empty() => parse(a).map(|a| (a, usize::MAX)),
            Some((a, b)) => parse(a).zip(parse(b)),
        };
        match counts {
            Some(counts) => {
                self.pos += close + 1;
                Ok(counts)
            }
            None => self.fail("\"{n,m}\""),
        }
    }
}

fn bare_len(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || "?*+#{}()[]|&".contains(c))
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;

    fn accepts(g: &Grammar, grammar: &str, value: &str) -> bool {
        let m = g.compile(grammar).unwrap();
        let value = parse_value(value).unwrap();
        let mut cx = Cursor::new(&value);
        m.matches(&mut cx, g).unwrap().is_hit() && cx.at_end()
    }

    #[test]
    fn test_alternatives() {
        let g = Grammar::new();
        assert!(accepts(&g, "<len> | auto", "auto"));
        assert!(accepts(&g, "<len> | auto", "10px"));
        assert!(!accepts(&g, "<len> | auto", "red"));
    }

    #[test]
    fn test_repetition_counts() {
        let g = Grammar::new();
        assert!(accepts(&g, "<num>{1,4}", "1"));
        assert!(accepts(&g, "<num>{1,4}", "1 2 3 4"));
        assert!(!accepts(&g, "<num>{1,4}", "1 2 3 4 5"));
        assert!(accepts(&g, "<num>#", "1, 2,3"));
        assert!(!accepts(&g, "<num>#", "1 2"));
    }

    #[test]
    fn test_double_ampersand_any_order() {
        let g = Grammar::new();
        assert!(accepts(&g, "a && b", "b a"));
        assert!(accepts(&g, "a && b", "a b"));
        assert!(!accepts(&g, "a && b", "a a"));
        assert!(accepts(&g, "a && b?", "a"));
    }

    #[test]
    fn test_double_bar_takes_all_members() {
        let g = Grammar::new();
        let m = g.compile("x || y || z").unwrap();
        let value = parse_value("y x").unwrap();
        let mut cx = Cursor::new(&value);
        assert_eq!(m.matches(&mut cx, &g).unwrap(), Hit::Matched);
        assert_eq!(cx.i, 2);
        assert!(!accepts(&g, "x || y || z", "y y"));
    }

    #[test]
    fn test_double_bar_worst_case_terminates() {
        let g = Grammar::new();
        let m = g.compile("<num> || <num> || <num> || <num> || <num> || <num> || <num>").unwrap();
        let value = parse_value("1 2 3 4 5 6 foo").unwrap();
        let mut cx = Cursor::new(&value);
        assert_eq!(m.matches(&mut cx, &g).unwrap(), Hit::Matched);
        assert_eq!(cx.i, 6);
    }

    #[test]
    fn test_reversed_keywords_in_double_bar() {
        let g = Grammar::new();
        assert!(accepts(&g, "a || b || c || d || e || f || g", "g f e d c b a"));
    }

    #[test]
    fn test_functions() {
        let g = Grammar::new();
        assert!(accepts(&g, "foo( <num> , <num> )", "foo(1, 2)"));
        assert!(!accepts(&g, "foo( <num> , <num> )", "foo(1)"));
        assert!(accepts(&g, "foo()", "foo(anything at all)"));
        assert!(accepts(&g, "<fn:transform>", "rotateX(10deg)"));
        assert!(accepts(&g, "<fn:filter>", "blur()"));
        assert!(!accepts(&g, "<fn:transform>", "scale(red)"));
    }

    #[test]
    fn test_bad_function_is_remembered() {
        let g = Grammar::new();
        let m = g.compile("<color>").unwrap();
        let value = parse_value("rgb(1 2)").unwrap();
        let mut cx = Cursor::new(&value);
        assert_eq!(m.matches(&mut cx, &g).unwrap(), Hit::Miss);
        let bad = cx.bad_func.unwrap();
        assert_eq!(bad.text, "1 2");
    }

    #[test]
    fn test_variables_match_anything() {
        let g = Grammar::new();
        assert!(accepts(&g, "<len> <color>", "var(--x) red"));
        assert!(accepts(&g, "<len>", "/*[[size]]*/"));
    }

    #[test]
    fn test_vendor_prefixed_keyword() {
        let g = Grammar::new();
        assert!(accepts(&g, "box | flex", "-webkit-box"));
    }

    #[test]
    fn test_keywords_are_merged() {
        let g = Grammar::new();
        let m = g.compile("<len> | auto | none").unwrap();
        assert_eq!(m.to_string(), "auto | none | <len>");
    }

    #[test]
    fn test_printing() {
        let g = Grammar::new();
        for (src, printed) in [
            ("<len> | auto", "auto | <len>"),
            ("[ a | b ] <num>", "[ a | b ] <num>"),
            ("a && b? && <len>", "a && b? && <len>"),
            ("[ <len> | auto ]{1,2}", "[ auto | <len> ]{1,2}"),
            ("<num>#{3}", "<num>#{3}"),
            ("<num>#{1,4}", "<num>#{1,4}"),
            ("<pct>#", "<pct>#"),
            ("x || [ y z ]", "x || y z"),
            ("[a|b] || c", "[ a|b ] || c"),
            ("foo( <num>+ )", "foo( <num>+ )"),
            ("bar()", "bar()"),
            ("[ a || b ]*", "[ a || b ]*"),
        ] {
            let m = g.compile(src).unwrap();
            assert_eq!(m.to_string(), printed);
        }
    }

    #[test]
    fn test_grammar_errors() {
        let g = Grammar::new();
        assert!(matches!(g.compile("[ a | b"), Err(CssError::Grammar { .. })));
        assert!(matches!(g.compile("a{x}"), Err(CssError::Grammar { .. })));
        assert!(matches!(g.compile("<no-such-type>"), Err(CssError::Grammar { .. })));
    }
}
