//! CSS Tokenizer
//!
//! Pulls characters from the [`Source`] cursor and classifies them into
//! [`Token`]s on demand. A four-slot circular buffer lets the parser step
//! back a few tokens without lexing them again.

use crate::bucket::Bucket;
use crate::error::{CssError, CssResult, SourceLocation};
use crate::source::{Mark, Source};
use crate::token::TokenKind::{
    Amp, At, AttrEq, Cdco, Char, Combinator, Comment, Dimension, Eof, EqCmp, Function, Hash, Ident,
    Invalid, Minus, Number, Pct, RBrace, Semicolon, Star, URange, UVar, Uri, Ws,
};
use crate::token::{clip, parse_string, unescape, unit_kind, Kinds, Token, TokenKind, ValueType};

/// Size of the lookahead buffer
pub const LOOKAHEAD: usize = 4;

/// What the parser wanted when it hit an unexpected token
#[derive(Debug, Clone, Copy)]
pub enum Goal<'g> {
    None,
    Text(&'g str),
    Kinds(Kinds),
    Words(&'g Bucket),
}

impl From<Kinds> for Goal<'_> {
    fn from(kinds: Kinds) -> Self {
        Goal::Kinds(kinds)
    }
}

impl From<TokenKind> for Goal<'_> {
    fn from(kind: TokenKind) -> Self {
        Goal::Kinds(kind.into())
    }
}

impl<'g> From<&'g str> for Goal<'g> {
    fn from(text: &'g str) -> Self {
        Goal::Text(text)
    }
}

impl Goal<'_> {
    fn describe(&self) -> String {
        match self {
            Goal::None => String::new(),
            Goal::Text(text) => text.to_string(),
            Goal::Kinds(kinds) => kinds.describe(),
            Goal::Words(words) => format!("\"{}\"", words.join("\", \"")),
        }
    }
}

/// Options of [`TokenStream::match_smart`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Smart<'b> {
    /// Fail with an error instead of returning `None`
    pub must: bool,
    /// Test the last consumed token instead of reading a new one
    pub reuse: bool,
    pub text: Option<&'b Bucket>,
}

impl Smart<'static> {
    pub const OR_DIE: Smart<'static> = Smart { must: true, reuse: false, text: None };
    pub const OR_DIE_REUSING: Smart<'static> = Smart { must: true, reuse: true, text: None };
}

impl<'b> Smart<'b> {
    pub fn text(text: &'b Bucket) -> Self {
        Smart { must: false, reuse: false, text: Some(text) }
    }

    pub fn must_text(text: &'b Bucket) -> Self {
        Smart { must: true, reuse: false, text: Some(text) }
    }
}

/// Token stream over a stylesheet
pub struct TokenStream<'a> {
    source: Source<'a>,
    buf: Vec<Token>,
    seqs: [u64; LOOKAHEAD],
    next_seq: u64,
    cur: usize,
    cycle: usize,
    current: Option<usize>,
    none: Token,
    amp: usize,
    /// Closing token of the construct being parsed, used by error recovery
    pub pair: Option<TokenKind>,
    lexed: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            source: Source::new(input),
            buf: Vec::with_capacity(LOOKAHEAD),
            seqs: [0; LOOKAHEAD],
            next_seq: 0,
            cur: 0,
            cycle: 0,
            current: None,
            none: Token::new(Eof, SourceLocation::new(1, 1, 0), 0, ""),
            amp: 0,
            pair: None,
            lexed: 0,
        }
    }

    pub fn source(&self) -> &Source<'a> {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut Source<'a> {
        &mut self.source
    }

    /// The normalized input text
    pub fn text(&self) -> &str {
        self.source.text()
    }

    /// Number of tokens lexed so far
    pub fn lexed(&self) -> usize {
        self.lexed
    }

    /// Number of consumed `&` tokens
    pub fn amp(&self) -> usize {
        self.amp
    }

    /// The last consumed token
    pub fn token(&self) -> &Token {
        match self.current {
            Some(slot) => &self.buf[slot],
            None => &self.none,
        }
    }

    /// Identity of the last consumed token
    pub fn current_seq(&self) -> u64 {
        self.current.map(|slot| self.seqs[slot]).unwrap_or(0)
    }

    /// Next token, skipping whitespace unless `ws` and placeholders unless `uvar`
    pub fn get(&mut self, uvar: bool, ws: bool) -> Token {
        let mut i = self.cur;
        let slot = loop {
            let slot = (i + self.cycle) % LOOKAHEAD;
            if i >= self.buf.len() {
                if self.buf.len() < LOOKAHEAD {
                    i += 1;
                } else {
                    self.cycle = (self.cycle + 1) % LOOKAHEAD;
                }
                let tok = self.lex(uvar, ws);
                if slot < self.buf.len() {
                    self.buf[slot] = tok;
                } else {
                    self.buf.push(tok);
                }
                self.next_seq += 1;
                self.seqs[slot] = self.next_seq;
                break slot;
            }
            i += 1;
            let kind = self.buf[slot].kind;
            if !(kind == Comment || (!ws && kind == Ws) || (!uvar && kind == UVar)) {
                break slot;
            }
        };
        if self.buf[slot].kind == Amp {
            self.amp += 1;
        }
        self.cur = i;
        self.current = Some(slot);
        self.buf[slot].clone()
    }

    /// Next significant token: no whitespace, no placeholders
    pub fn grab(&mut self) -> Token {
        self.get(false, false)
    }

    /// Put the last consumed token back
    pub fn unget(&mut self) -> CssResult<()> {
        if self.cur == 0 {
            return Err(CssError::Lookahead { location: self.token().loc });
        }
        if self.token().kind == Amp {
            self.amp = self.amp.saturating_sub(1);
        }
        self.cur -= 1;
        let slot = (self.cur + self.cycle + LOOKAHEAD - 1) % LOOKAHEAD;
        self.current = (slot < self.buf.len()).then_some(slot);
        Ok(())
    }

    /// The next buffered token, if it was already lexed
    pub fn peek_cached(&self) -> Option<&Token> {
        (self.cur < self.buf.len()).then(|| &self.buf[(self.cur + self.cycle) % LOOKAHEAD])
    }

    /// Forget buffered tokens; the source position is kept
    pub fn reset_buf(&mut self) {
        self.buf.clear();
        self.cur = 0;
        self.cycle = 0;
        self.current = None;
    }

    pub fn mark(&self) -> Mark {
        self.source.mark()
    }

    /// Rewind the source and drop the buffer
    pub fn reset_to(&mut self, mark: Mark) {
        self.source.reset(mark);
        self.reset_buf();
    }

    /// Continue after a block that was replayed from the cache
    pub fn seek(&mut self, loc: SourceLocation) {
        self.source.seek(loc);
        self.reset_buf();
    }

    fn accepts(what: Kinds, text: Option<&Bucket>, tok: &Token) -> bool {
        (what == Kinds::EMPTY || what.contains(tok.kind))
            && text.map_or(true, |b| b.has(tok.low_text()))
    }

    /// Consume the next token (whitespace included) if it matches
    pub fn matches(&mut self, what: impl Into<Kinds>, text: Option<&Bucket>) -> CssResult<Option<Token>> {
        let what = what.into();
        let tok = self.get(false, true);
        if Self::accepts(what, text, &tok) {
            return Ok(Some(tok));
        }
        self.unget()?;
        Ok(None)
    }

    pub fn match_or_die(&mut self, what: impl Into<Kinds>, text: Option<&Bucket>) -> CssResult<Token> {
        let what = what.into();
        let tok = self.get(false, true);
        if Self::accepts(what, text, &tok) {
            return Ok(tok);
        }
        self.unget()?;
        let goal = match text {
            Some(words) => Goal::Words(words),
            None => Goal::Kinds(what),
        };
        Err(self.failure(goal, &tok))
    }

    /// Skip whitespace and consume the next token if it matches. A
    /// placeholder variable is accepted where an ident, number or string
    /// is expected.
    pub fn match_smart(&mut self, what: impl Into<Kinds>, opts: Smart<'_>) -> CssResult<Option<Token>> {
        let what = what.into();
        let ws = what.contains(Ws);
        let uvp = !ws && opts.text.is_none() && what.is_uvar_proxy();
        let tok = if opts.reuse { self.token().clone() } else { self.get(uvp, ws) };
        if Self::accepts(what, opts.text, &tok) {
            return Ok(Some(tok));
        }
        if uvp && tok.is_var {
            let next = self.grab();
            if Self::accepts(what, opts.text, &next) {
                return Ok(Some(next));
            }
            self.unget()?;
            return Ok(Some(tok));
        }
        self.unget()?;
        if opts.must {
            let goal = match opts.text {
                Some(words) => Goal::Words(words),
                None => Goal::Kinds(what),
            };
            return Err(self.failure(goal, &tok));
        }
        Ok(None)
    }

    /// `Expected X but found "tok".` or `Unexpected "tok".`
    pub fn failure<'g>(&self, goal: impl Into<Goal<'g>>, tok: &Token) -> CssError {
        let goal = goal.into().describe();
        let found = clip(&tok.to_string(), 30);
        let message = if goal.is_empty() {
            format!("Unexpected \"{}\".", found)
        } else {
            format!("Expected {} but found \"{}\".", goal, found)
        };
        CssError::parse_error(message, tok.loc)
    }

    /// Same as [`failure`](Self::failure) for the last consumed token
    pub fn fail<'g>(&self, goal: impl Into<Goal<'g>>) -> CssError {
        self.failure(goal, self.token())
    }

    fn lex(&mut self, uvar: bool, ws: bool) -> Token {
        self.lexed += 1;
        loop {
            let start = self.source.location();
            let Some(a) = self.source.read() else {
                return Token::new(Eof, start, start.offset, "");
            };
            let b = self.source.peek();
            if matches!(a, ' ' | '\t' | '\n') {
                self.skip_whitespace();
                if ws {
                    return self.finish(Ws, start);
                }
            } else if a == '/' && b == Some('*') {
                let placeholder = self.skip_comment();
                if uvar && placeholder {
                    let mut tok = self.finish(UVar, start);
                    tok.is_var = true;
                    return tok;
                }
            } else {
                return self.lex_token(a, b, start);
            }
        }
    }

    fn finish(&self, kind: TokenKind, start: SourceLocation) -> Token {
        let end = self.source.offset();
        Token::new(kind, start, end, self.source.slice(start.offset, end))
    }

    fn lex_token(&mut self, a: char, b: Option<char>, start: SourceLocation) -> Token {
        let c = self.source.peek_nth(1);
        let is_digit = |ch: Option<char>| ch.is_some_and(|ch| ch.is_ascii_digit());

        if a.is_ascii_digit() {
            return self.number(a, start);
        }
        if matches!(a, '-' | '+' | '.')
            && (is_digit(b) || (a != '.' && b == Some('.') && is_digit(c)))
        {
            return self.number(a, start);
        }
        if a == '-' {
            if b == Some('-') {
                if is_ident_char(c, b) {
                    let mut tok = self.ident(a, b, start);
                    tok.ty = ValueType::Custom;
                    return tok;
                }
                if c == Some('>') {
                    self.source.advance(2);
                    return self.finish(Cdco, start);
                }
                return self.finish(Minus, start);
            }
            let c = if b == Some('\\') { c } else { None };
            if is_ident_start(b, c) {
                return self.ident(a, b, start);
            }
            return self.finish(Minus, start);
        }
        if matches!(a, 'u' | 'U') && b == Some('+') {
            return self.unicode_range(start);
        }
        if is_ident_start(Some(a), b) {
            return self.ident(a, b, start);
        }
        let pair = match (a, b) {
            ('$' | '*' | '^' | '|' | '~', Some('=')) => Some(AttrEq),
            ('<' | '>', Some('=')) => Some(EqCmp),
            ('|', Some('|')) => Some(Combinator),
            _ => None,
        };
        if let Some(kind) = pair {
            self.source.read();
            return self.finish(kind, start);
        }
        match a {
            '#' => {
                if is_ident_char(b, Some('#')) {
                    let len = scan_name(self.source.rest());
                    let (name_start, name_end) = self.source.advance(len);
                    let raw = self.source.slice(name_start, name_end);
                    let text = format!("#{}", if raw.contains('\\') { unescape(raw) } else { raw.to_string() });
                    return Token::new(Hash, start, name_end, text);
                }
                self.finish(Char, start)
            }
            '*' => {
                let mut tok = self.finish(Star, start);
                if is_ident_start(b, None) {
                    tok.hack = Some('*');
                }
                tok
            }
            '"' | '\'' => {
                let len = scan_string_body(self.source.rest(), a);
                self.source.advance(len);
                if self.source.read_if(a) {
                    let mut tok = self.finish(TokenKind::String, start);
                    tok.ty = ValueType::String;
                    tok
                } else {
                    self.finish(Invalid, start)
                }
            }
            '\\' => match b {
                None => Token::new(Char, start, self.source.offset(), "\u{FFFD}"),
                Some('\n') => {
                    let ws_start = self.source.offset();
                    self.skip_whitespace();
                    let end = self.source.offset();
                    Token::new(Ws, start, end, self.source.slice(ws_start, end))
                }
                Some(_) => self.finish(Char, start),
            },
            '@' => {
                let c = if matches!(b, Some('-' | '\\')) { c } else { None };
                if !is_ident_start(b, c) {
                    return self.finish(Char, start);
                }
                let len = scan_name(self.source.rest());
                let (name_start, name_end) = self.source.advance(len);
                let raw = self.source.slice(name_start, name_end);
                let name = if raw.contains('\\') { unescape(raw) } else { raw.to_string() };
                let bare = match name.strip_prefix('-').and_then(|n| n.find('-')) {
                    Some(i) if i > 0 => &name[i + 2..],
                    _ => name.as_str(),
                };
                let mut tok = Token::new(At, start, name_end, format!("@{}", name));
                tok.at_name = Some(bare.to_lowercase());
                tok
            }
            '<' if b == Some('!') && self.source.read_str_if("!--") => self.finish(Cdco, start),
            _ => match TokenKind::from_char(a) {
                Some(kind) => self.finish(kind, start),
                None => self.finish(Char, start),
            },
        }
    }

    /// Identifier, function, url or `progid:` filter starting with `a`
    fn ident(&mut self, a: char, b: Option<char>, start: SourceLocation) -> Token {
        // rescan from the first char so a leading escape is decoded too
        let len = scan_name(&self.source.text()[start.offset..]);
        let (_, name_end) = self.source.advance(len.saturating_sub(a.len_utf8()));
        let raw = self.source.slice(start.offset, name_end);
        let escaped = raw.contains('\\');
        let name = if escaped { unescape(raw) } else { raw.to_string() };
        let vendor_pos = if a == '-' && b != Some('-') {
            name.get(2..).and_then(|s| s.find('-')).map(|i| i + 3).unwrap_or(0)
        } else {
            0
        };
        let mut tok = match self.source.peek() {
            Some('(') => {
                self.source.read();
                let low = name.to_lowercase();
                let uri = if matches!(low.as_str(), "url" | "url-prefix" | "domain") {
                    self.uri_value()
                } else {
                    None
                };
                let end = self.source.offset();
                let text = if escaped {
                    format!("{}{}", name, self.source.slice(name_end, end))
                } else {
                    self.source.slice(start.offset, end).to_string()
                };
                let mut tok = match uri {
                    Some(uri) => {
                        let mut tok = Token::new(Uri, start, end, text);
                        tok.ty = ValueType::Uri;
                        tok.uri = Some(uri);
                        tok
                    }
                    None => {
                        let mut tok = Token::new(Function, start, end, text);
                        tok.ty = ValueType::Function;
                        tok
                    }
                };
                tok.name = Some(low.get(vendor_pos..).unwrap_or(&low).to_string());
                if vendor_pos > 0 {
                    tok.prefix = Some(low[..vendor_pos].to_string());
                }
                tok
            }
            Some(':') if name.eq_ignore_ascii_case("progid") => {
                let rest = self.source.rest();
                let line_end = rest.find('\n').unwrap_or(rest.len());
                match rest[..line_end].find('(') {
                    Some(paren) => {
                        self.source.advance(paren + 1);
                        let end = self.source.offset();
                        let text = self.source.slice(start.offset, end).to_string();
                        let mut tok = Token::new(Function, start, end, text.as_str());
                        tok.name = Some(text[..text.len() - 1].to_lowercase());
                        tok.ty = ValueType::Function;
                        tok.ie = true;
                        tok
                    }
                    None => Token::new(Ident, start, name_end, name.as_str()),
                }
            }
            _ => {
                let mut tok = Token::new(Ident, start, name_end, name.as_str());
                let chars = name.chars().count();
                // named colors are 3 (red) to 20 (lightgoldenrodyellow) chars long
                if a == '-' || !(3..=20).contains(&chars) {
                    tok.ty = ValueType::Ident;
                }
                tok
            }
        };
        tok.vendor_pos = vendor_pos;
        tok
    }

    fn number(&mut self, a: char, start: SourceLocation) -> Token {
        let rest = self.source.rest();
        let (len, has_dot, has_exp) = match a {
            '.' => {
                let d = digits(rest);
                let e = exponent(&rest[d..]);
                (d + e, true, e > 0)
            }
            '-' | '+' => {
                let (mut n, mut dot) = (0, false);
                if rest.starts_with('.') {
                    n = 1 + digits(&rest[1..]);
                    dot = true;
                } else {
                    n += digits(rest);
                    if rest[n..].starts_with('.') {
                        n += 1 + digits(&rest[n + 1..]);
                        dot = true;
                    }
                }
                let e = exponent(&rest[n..]);
                (n + e, dot, e > 0)
            }
            _ => {
                let mut n = digits(rest);
                let mut dot = false;
                if rest[n..].starts_with('.') {
                    n += 1 + digits(&rest[n + 1..]);
                    dot = true;
                }
                let e = exponent(&rest[n..]);
                (n + e, dot, e > 0)
            }
        };
        let (_, num_end) = self.source.advance(len);
        let num_str = self.source.slice(start.offset, num_end).to_string();
        let is_float = a == '.' || has_dot || has_exp;

        let next = self.source.peek();
        let next2 = if matches!(next, Some('-' | '\\')) { self.source.peek_nth(1) } else { None };
        let (kind, units, escaped_units) = if next == Some('%') {
            self.source.read();
            (Pct, "%".to_string(), None)
        } else if is_ident_start(next, next2) {
            let len = scan_name(self.source.rest());
            let (u_start, u_end) = self.source.advance(len);
            let raw = self.source.slice(u_start, u_end);
            let (units, escaped) = if raw.contains('\\') {
                let u = unescape(raw);
                (u.clone(), Some(u))
            } else {
                (raw.to_string(), None)
            };
            let low = units.to_lowercase();
            (unit_kind(&low).unwrap_or(Dimension), low, escaped)
        } else {
            (Number, String::new(), None)
        };

        let end = self.source.offset();
        let text = match escaped_units {
            Some(u) => format!("{}{}", num_str, u),
            None => self.source.slice(start.offset, end).to_string(),
        };
        let mut tok = Token::new(kind, start, end, text);
        let number = num_str.parse::<f64>().unwrap_or(0.0);
        tok.ty = ValueType::Numeric;
        tok.number = Some(number);
        tok.is0 = units.is_empty() && number == 0.0;
        tok.is_int = tok.is0 || (units.is_empty() && !is_float);
        tok.units = units;
        tok
    }

    fn unicode_range(&mut self, start: SourceLocation) -> Token {
        let rest = self.source.rest();
        let bytes = rest.as_bytes();
        let hex_run = |from: usize| bytes[from..].iter().take(6).take_while(|b| b.is_ascii_hexdigit()).count();
        let first = hex_run(1);
        let mut len = 1 + first;
        let mut valid = first > 0;
        if valid {
            let head = &rest[1..1 + first];
            valid = u32::from_str_radix(head, 16).is_ok_and(|v| v <= 0x10FFFF);
            let marks = bytes[len..].iter().take(6).take_while(|b| **b == b'?').count();
            if marks > 0 {
                len += marks;
                valid = valid && first + marks <= 6;
            } else if bytes.get(len) == Some(&b'-') {
                let second = hex_run(len + 1);
                if second > 0 {
                    let tail = &rest[len + 1..len + 1 + second];
                    valid = valid && u32::from_str_radix(tail, 16).is_ok_and(|v| v <= 0x10FFFF);
                    len += 1 + second;
                }
            }
        }
        if valid {
            self.source.advance(len);
            return self.finish(URange, start);
        }
        let mut tok = self.finish(Ident, start);
        tok.ty = ValueType::Ident;
        tok
    }

    /// Value of `url(...)` after the opening paren; consumes the closing one
    fn uri_value(&mut self) -> Option<String> {
        let mark = self.source.mark();
        let rest = self.source.rest();
        let lead = rest.len() - rest.trim_start_matches(is_space).len();
        let body = &rest[lead..];
        let (value, len) = match body.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let n = scan_string_body(&body[1..], q);
                if !body[1 + n..].starts_with(q) {
                    return None;
                }
                (parse_string(&body[..n + 2]), lead + n + 2)
            }
            _ => {
                let n = scan_unquoted_url(body);
                if n == 0 {
                    return None;
                }
                (unescape(&body[..n]), lead + n)
            }
        };
        self.source.advance(len);
        let rest = self.source.rest();
        let trail = rest.len() - rest.trim_start_matches(is_space).len();
        if rest[trail..].starts_with(')') {
            self.source.advance(trail + 1);
            Some(value)
        } else {
            self.source.reset(mark);
            None
        }
    }

    fn skip_whitespace(&mut self) -> usize {
        let rest = self.source.rest();
        let n = rest.len() - rest.trim_start_matches(is_space).len();
        self.source.advance(n);
        n
    }

    /// Skip a comment whose `/` was read; true for `/*[[placeholder]]*/`
    fn skip_comment(&mut self) -> bool {
        let rest = self.source.rest();
        if let Some(inner) = rest.strip_prefix("*[[") {
            let name = inner
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
                .count();
            if name > 0 && inner[name..].starts_with("]]*/") {
                self.source.advance(3 + name + 4);
                return true;
            }
        }
        let len = match rest[1..].find("*/") {
            Some(i) => i + 3,
            None => rest.len(),
        };
        self.source.advance(len);
        false
    }

    fn skip_space_comments(&mut self) -> usize {
        let mut total = 0;
        loop {
            let n = self.skip_whitespace();
            total += n;
            if self.source.rest().starts_with("/*") {
                let before = self.source.offset();
                self.source.read();
                self.skip_comment();
                total += self.source.offset() - before;
            } else if n == 0 {
                return total;
            }
        }
    }

    /// Argument of `:nth-child()` and friends: `even`, `odd`, `an+b` or `b`.
    /// Returns the `a` and `b` parts as written.
    pub fn read_nth_child(&mut self) -> Option<(String, String)> {
        self.skip_space_comments();
        let nth = scan_nth(self.source.rest())?;
        let whole = self.source.rest()[..nth.len].to_string();
        self.source.advance(nth.len);
        let mut a = String::new();
        let mut b = String::new();
        let mut ws = 0;
        if let Some(eo) = nth.even_odd {
            a = eo;
        } else if nth.an.is_none() {
            b = whole;
        } else {
            a = nth.an.unwrap_or_default();
            let mut sign = nth.sign;
            if sign.is_none() && !nth.followed {
                ws = self.skip_space_comments();
                if let Some(s @ ('-' | '+')) = self.source.peek() {
                    self.source.read();
                    sign = Some(s);
                }
            }
            if let Some(sign) = sign {
                let int = match nth.int {
                    Some(int) => Some(int),
                    None => {
                        let mark = self.source.mark();
                        self.skip_space_comments();
                        let n = digits(self.source.rest());
                        if n == 0 {
                            self.source.reset(mark);
                            None
                        } else {
                            let (s, e) = self.source.advance(n);
                            Some(self.source.slice(s, e).to_string())
                        }
                    }
                };
                b = format!("{}{}", sign, int?.trim());
            }
        }
        let rest = self.source.rest();
        let boundary = ws > 0
            || rest.starts_with(is_space)
            || rest.starts_with("/*")
            || rest.starts_with(')');
        ((!a.is_empty() || !b.is_empty()) && boundary).then_some((a, b))
    }

    /// Skip the rest of a broken declaration (or of the whole block when
    /// `in_block`), honoring nested brackets, strings and comments. A `;`
    /// ending the declaration is consumed, the `}` of the block is not.
    pub fn skip_decl_block(&mut self, in_block: bool) {
        if self
            .peek_cached()
            .is_some_and(|t| matches!(t.kind, RBrace | Semicolon))
        {
            return;
        }
        #[derive(Clone, Copy, PartialEq)]
        enum End {
            Decl,
            Char(char),
        }
        let mut stack: Vec<End> = Vec::new();
        let mut end = if in_block { End::Char('}') } else { End::Decl };
        while let Some(c) = self.source.peek() {
            let closes = match end {
                End::Char(e) => c == e,
                End::Decl => c == ';' || c == '}',
            };
            if closes {
                match stack.pop() {
                    None => {
                        if c == ';' {
                            self.source.read();
                        }
                        break;
                    }
                    Some(End::Decl) if c == '}' => {
                        self.source.read();
                        break;
                    }
                    Some(prev) => end = prev,
                }
            } else if matches!(c, '}' | ')' | ']') {
                break;
            } else if let Some(closer) = match c {
                '{' => Some('}'),
                '(' => Some(')'),
                '[' => Some(']'),
                _ => None,
            } {
                stack.push(end);
                end = End::Char(closer);
            }
            let rest = self.source.rest();
            let len = match c {
                '"' | '\'' => {
                    let n = scan_string_body(&rest[1..], c);
                    1 + n + usize::from(rest[1 + n..].starts_with(c))
                }
                '/' if rest.starts_with("/*") => rest[2..].find("*/").map_or(rest.len(), |i| i + 4),
                '\\' => 1 + rest[1..].chars().next().map_or(0, char::len_utf8),
                _ => c.len_utf8(),
            };
            self.source.advance(len);
        }
        self.reset_buf();
    }
}

/// Parts of an `an+b` argument
struct Nth {
    len: usize,
    even_odd: Option<String>,
    an: Option<String>,
    sign: Option<char>,
    int: Option<String>,
    /// Followed by ` of ` or `)`
    followed: bool,
}

fn scan_nth(s: &str) -> Option<Nth> {
    for word in ["even", "odd"] {
        if s.get(..word.len()).is_some_and(|w| w.eq_ignore_ascii_case(word)) {
            return Some(Nth {
                len: word.len(),
                even_odd: Some(s[..word.len()].to_string()),
                an: None,
                sign: None,
                int: None,
                followed: false,
            });
        }
    }
    let bytes = s.as_bytes();
    let signed = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let d = digits(&s[signed..]);
    let mut len;
    let mut an = None;
    let mut sign = None;
    let mut int = None;
    if matches!(bytes.get(signed + d), Some(b'n' | b'N')) {
        len = signed + d + 1;
        an = Some(s[..len].to_string());
        let ws = s[len..].len() - s[len..].trim_start_matches(is_space).len();
        if let Some(sc @ (b'-' | b'+')) = bytes.get(len + ws).copied() {
            len += ws + 1;
            sign = Some(sc as char);
            let ws2 = s[len..].len() - s[len..].trim_start_matches(is_space).len();
            let n = digits(&s[len + ws2..]);
            if n > 0 {
                int = Some(s[len..len + ws2 + n].to_string());
                len += ws2 + n;
            }
        }
    } else if d > 0 {
        len = signed + d;
    } else {
        return None;
    }
    let after = &s[len..];
    let trimmed = after.trim_start_matches(is_space);
    let followed = trimmed.starts_with(')')
        || (trimmed.len() < after.len()
            && trimmed.get(..2).is_some_and(|w| w.eq_ignore_ascii_case("of"))
            && trimmed[2..].starts_with(is_space));
    Some(Nth { len, even_odd: None, an, sign, int, followed })
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// `e[+-]?\d+`
fn exponent(s: &str) -> usize {
    let bytes = s.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return 0;
    }
    let sign = usize::from(matches!(bytes.get(1), Some(b'+' | b'-')));
    match digits(&s[1 + sign..]) {
        0 => 0,
        n => 1 + sign + n,
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c >= '\u{A0}'
}

pub(crate) fn is_ident_char(c: Option<char>, prev: Option<char>) -> bool {
    match c {
        Some(c) => is_name_char(c) || c == '\\' || (prev == Some('\\') && c != '\n'),
        None => false,
    }
}

pub(crate) fn is_ident_start(a: Option<char>, b: Option<char>) -> bool {
    match a {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c >= '\u{A0}' => true,
        Some('-') => b != Some('-') && is_ident_start(b, None),
        Some('\\') => is_ident_char(b, Some('\\')),
        _ => false,
    }
}

/// Byte length of an identifier name (escapes included) at the start of `s`
fn scan_name(s: &str) -> usize {
    let mut i = 0;
    while let Some(c) = s[i..].chars().next() {
        if is_name_char(c) {
            i += c.len_utf8();
        } else if c == '\\' {
            match s[i + 1..].chars().next() {
                None => return i + 1,
                Some('\n') => break,
                Some(_) => i += 1 + escape_len(&s[i + 1..]),
            }
        } else {
            break;
        }
    }
    i
}

/// Byte length of an escape body following its backslash
fn escape_len(s: &str) -> usize {
    let hex = s.bytes().take(6).take_while(u8::is_ascii_hexdigit).count();
    let len = if hex > 0 { hex } else { s.chars().next().map_or(0, char::len_utf8) };
    len + usize::from(matches!(s.as_bytes().get(len), Some(b' ' | b'\t')))
}

/// Byte length of a string body up to (not including) the closing quote
/// or an unescaped newline
fn scan_string_body(s: &str, quote: char) -> usize {
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == quote || c == '\n' {
            return i;
        }
        if c == '\\' {
            if chars.next().is_none() {
                return s.len();
            }
        }
    }
    s.len()
}

/// Byte length of an unquoted url at the start of `s`
fn scan_unquoted_url(s: &str) -> usize {
    let mut i = 0;
    while let Some(c) = s[i..].chars().next() {
        let plain = matches!(c, '-' | '!' | '#' | '$' | '%' | '&')
            || ('\u{2A}'..='\u{5B}').contains(&c)
            || ('\u{5D}'..='\u{7E}').contains(&c)
            || c >= '\u{A0}';
        if plain {
            i += c.len_utf8();
        } else if c == '\\' {
            match s[i + 1..].chars().next() {
                None => return i + 1,
                Some('\n') => break,
                Some(_) => i += 1 + escape_len(&s[i + 1..]),
            }
        } else {
            break;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind::{Colon, Delim, Flex, LBrace, Length, Time};

    fn tokenize(input: &str) -> Vec<Token> {
        let mut stream = TokenStream::new(input);
        let mut tokens = Vec::new();
        loop {
            let tok = stream.get(true, true);
            if tok.kind == Eof {
                break;
            }
            tokens.push(tok);
        }
        tokens
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_rule() {
        let tokens = tokenize("p { color: red; }");
        assert!(matches!(tokens[0].kind, Ident) && tokens[0].text == "p");
        assert!(matches!(tokens[2].kind, LBrace));
        assert_eq!(tokens[4].text, "color");
        assert!(matches!(tokens[5].kind, Colon));
        assert_eq!(tokens[7].text, "red");
        assert!(matches!(tokens[8].kind, Semicolon));
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("a{\n  b:1px}");
        let b = &tokens[3];
        assert_eq!(b.text, "b");
        assert_eq!((b.line(), b.col(), b.offset()), (2, 3, 5));
        assert_eq!(b.end, 6);
    }

    #[test]
    fn test_numbers_and_units() {
        let tokens = tokenize("10px 50% 1.5 -2em .5s 0 3fr 7foo 1e3");
        let nums: Vec<_> = tokens.iter().filter(|t| t.kind != Ws).collect();
        assert_eq!(nums[0].kind, Length);
        assert_eq!(nums[0].number, Some(10.0));
        assert_eq!(nums[0].units, "px");
        assert_eq!(nums[1].kind, Pct);
        assert_eq!(nums[2].kind, Number);
        assert!(!nums[2].is_int);
        assert_eq!(nums[3].number, Some(-2.0));
        assert_eq!(nums[3].kind, Length);
        assert_eq!(nums[4].kind, Time);
        assert!(nums[5].is0 && nums[5].is_int);
        assert_eq!(nums[6].kind, Flex);
        assert_eq!(nums[7].kind, Dimension);
        assert_eq!(nums[8].number, Some(1000.0));
    }

    #[test]
    fn test_minus_disambiguation() {
        let tokens = tokenize("-1px -foo --bar - x -->");
        assert_eq!(tokens[0].kind, Length);
        assert_eq!(tokens[2].kind, Ident);
        assert_eq!(tokens[2].ty, ValueType::Ident);
        assert_eq!(tokens[4].ty, ValueType::Custom);
        assert_eq!(tokens[4].text, "--bar");
        assert_eq!(tokens[6].kind, Minus);
        assert_eq!(tokens[10].kind, Cdco);
    }

    #[test]
    fn test_vendor_prefix() {
        let tokens = tokenize("-webkit-box -moz-linear-gradient(");
        assert_eq!(tokens[0].vendor_pos, 8);
        assert_eq!(tokens[0].unprefixed(), "box");
        assert_eq!(tokens[2].kind, Function);
        assert_eq!(tokens[2].name.as_deref(), Some("linear-gradient"));
        assert_eq!(tokens[2].prefix.as_deref(), Some("-moz-"));
    }

    #[test]
    fn test_functions_and_urls() {
        let tokens = tokenize("rgb( url(a.png) url( \"b c\" ) url-prefix(http://x) url(");
        assert_eq!(tokens[0].kind, Function);
        assert_eq!(tokens[0].name.as_deref(), Some("rgb"));
        assert_eq!(tokens[2].kind, Uri);
        assert_eq!(tokens[2].uri.as_deref(), Some("a.png"));
        assert_eq!(tokens[4].uri.as_deref(), Some("b c"));
        assert_eq!(tokens[6].uri.as_deref(), Some("http://x"));
        assert_eq!(tokens[8].kind, Function);
    }

    #[test]
    fn test_at_keyword() {
        let tokens = tokenize("@media @-moz-document @Font-Face");
        assert_eq!(tokens[0].kind, At);
        assert_eq!(tokens[0].at_name.as_deref(), Some("media"));
        assert_eq!(tokens[2].at_name.as_deref(), Some("document"));
        assert_eq!(tokens[4].at_name.as_deref(), Some("font-face"));
    }

    #[test]
    fn test_hash_and_punctuation() {
        assert_eq!(
            kinds("#fff # |= || ~ >= * & ! ;"),
            vec![Hash, Ws, Char, Ws, AttrEq, Ws, Combinator, Ws, Combinator, Ws, EqCmp, Ws, Star, Ws, Amp, Ws, Delim, Ws, Semicolon]
        );
    }

    #[test]
    fn test_star_hack() {
        let tokens = tokenize("*zoom");
        assert_eq!(tokens[0].kind, Star);
        assert_eq!(tokens[0].hack, Some('*'));
    }

    #[test]
    fn test_strings() {
        let tokens = tokenize("'a\\'b' \"open\nx");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].string_value(), "a'b");
        assert_eq!(tokens[2].kind, Invalid);
    }

    #[test]
    fn test_escaped_ident() {
        let tokens = tokenize("\\66oo b\\:c");
        assert_eq!(tokens[0].kind, Ident);
        assert_eq!(tokens[0].text, "foo");
        assert_eq!(tokens[2].text, "b:c");
    }

    #[test]
    fn test_unicode_range() {
        let tokens = tokenize("U+0025-00FF u+4?? U+110000");
        assert_eq!(tokens[0].kind, URange);
        assert_eq!(tokens[2].kind, URange);
        assert_eq!(tokens[4].kind, Ident);
    }

    #[test]
    fn test_comments_and_placeholders() {
        let mut stream = TokenStream::new("/* c */ a /*[[var]]*/ b");
        assert_eq!(stream.grab().text, "a");
        let tok = stream.get(true, false);
        assert_eq!(tok.kind, UVar);
        assert!(tok.is_var);
        let mut stream = TokenStream::new("/*[[var]]*/ b");
        assert_eq!(stream.grab().text, "b");
    }

    #[test]
    fn test_ie_filter() {
        let tokens = tokenize("progid:DXImageTransform.Microsoft.Alpha(Opacity=80)");
        assert_eq!(tokens[0].kind, Function);
        assert!(tokens[0].ie);
        assert_eq!(tokens[0].name.as_deref(), Some("progid:dximagetransform.microsoft.alpha"));
    }

    #[test]
    fn test_unget_and_lookahead_limit() {
        let mut stream = TokenStream::new("a b c d e f");
        for _ in 0..5 {
            stream.grab();
        }
        assert_eq!(stream.token().text, "e");
        stream.unget().unwrap();
        assert_eq!(stream.token().text, "d");
        assert_eq!(stream.grab().text, "e");
        for _ in 0..4 {
            stream.unget().unwrap();
        }
        assert!(matches!(stream.unget(), Err(CssError::Lookahead { .. })));
    }

    #[test]
    fn test_match_smart() {
        let mut stream = TokenStream::new("  foo : 1");
        let tok = stream.match_smart(Ident, Smart::default()).unwrap();
        assert_eq!(tok.map(|t| t.text), Some("foo".to_string()));
        assert!(stream.match_smart(Semicolon, Smart::default()).unwrap().is_none());
        let err = stream.match_smart(Semicolon, Smart::OR_DIE).unwrap_err();
        assert_eq!(err.message(), "Expected \";\" but found \":\".");
    }

    #[test]
    fn test_match_smart_placeholder() {
        let mut stream = TokenStream::new("/*[[size]]*/ ;");
        let tok = stream.match_smart(Ident, Smart::default()).unwrap();
        assert!(tok.is_some_and(|t| t.kind == UVar));
    }

    #[test]
    fn test_amp_counter() {
        let mut stream = TokenStream::new("& &");
        stream.grab();
        stream.grab();
        assert_eq!(stream.amp(), 2);
        stream.unget().unwrap();
        assert_eq!(stream.amp(), 1);
    }

    #[test]
    fn test_read_nth_child() {
        for (input, a, b) in [
            ("2n + 1)", "2n", "+1"),
            ("odd)", "odd", ""),
            ("-n+3)", "-n", "+3"),
            ("5)", "", "5"),
            ("n of .x)", "n", ""),
        ] {
            let mut stream = TokenStream::new(input);
            assert_eq!(stream.read_nth_child(), Some((a.to_string(), b.to_string())), "{}", input);
        }
        assert_eq!(TokenStream::new("x)").read_nth_child(), None);
    }

    #[test]
    fn test_skip_decl_block() {
        let mut stream = TokenStream::new("a: b(;x) \"};\" ; next");
        stream.skip_decl_block(false);
        assert_eq!(stream.grab().text, "next");

        let mut stream = TokenStream::new("x { y } z } after");
        stream.skip_decl_block(true);
        assert_eq!(stream.grab().kind, RBrace);
        assert_eq!(stream.grab().text, "after");
    }
}
