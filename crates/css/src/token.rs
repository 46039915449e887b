//! Token model
//!
//! Tokens own their text so they can outlive the tokenizer, e.g. inside
//! parser events kept by the block cache.

use std::cell::OnceCell;
use std::fmt;

use crate::error::SourceLocation;

/// Token kinds, ordered as they are listed in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    Eof,
    Amp,
    At,
    AttrEq,
    /// `<!--` and `-->`
    Cdco,
    Char,
    Colon,
    /// `~` and `||`
    Combinator,
    Comma,
    Comment,
    Delim,
    Dot,
    Equals,
    EqCmp,
    Function,
    Gt,
    Hash,
    Ident,
    Invalid,
    LBrace,
    LBracket,
    LParen,
    Minus,
    Pipe,
    Plus,
    RBrace,
    RBracket,
    RParen,
    Semicolon,
    Star,
    String,
    URange,
    Uri,
    /// `/*[[name]]*/` placeholder of a userstyle variable
    UVar,
    Ws,
    Angle,
    Dimension,
    Flex,
    Frequency,
    Length,
    Number,
    Pct,
    Resolution,
    Time,
}

const ALL_KINDS: [TokenKind; 44] = {
    use TokenKind::*;
    [
        Eof, Amp, At, AttrEq, Cdco, Char, Colon, Combinator, Comma, Comment, Delim, Dot, Equals,
        EqCmp, Function, Gt, Hash, Ident, Invalid, LBrace, LBracket, LParen, Minus, Pipe, Plus,
        RBrace, RBracket, RParen, Semicolon, Star, String, URange, Uri, UVar, Ws, Angle,
        Dimension, Flex, Frequency, Length, Number, Pct, Resolution, Time,
    ]
};

impl TokenKind {
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Eof => "EOF",
            Amp => "AMP",
            At => "AT",
            AttrEq => "ATTR_EQ",
            Cdco => "CDCO",
            Char => "CHAR",
            Colon => "COLON",
            Combinator => "COMBINATOR",
            Comma => "COMMA",
            Comment => "COMMENT",
            Delim => "DELIM",
            Dot => "DOT",
            Equals => "EQUALS",
            EqCmp => "EQ_CMP",
            Function => "FUNCTION",
            Gt => "GT",
            Hash => "HASH",
            Ident => "IDENT",
            Invalid => "INVALID",
            LBrace => "LBRACE",
            LBracket => "LBRACKET",
            LParen => "LPAREN",
            Minus => "MINUS",
            Pipe => "PIPE",
            Plus => "PLUS",
            RBrace => "RBRACE",
            RBracket => "RBRACKET",
            RParen => "RPAREN",
            Semicolon => "SEMICOLON",
            Star => "STAR",
            String => "STRING",
            URange => "URANGE",
            Uri => "URI",
            UVar => "UVAR",
            Ws => "WS",
            Angle => "ANGLE",
            Dimension => "DIMENSION",
            Flex => "FLEX",
            Frequency => "FREQUENCY",
            Length => "LENGTH",
            Number => "NUMBER",
            Pct => "PCT",
            Resolution => "RESOLUTION",
            Time => "TIME",
        }
    }

    /// Literal spelling of punctuation kinds
    pub fn fixed_text(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            Amp => "&",
            AttrEq => "|=,~=,^=,*=,$=",
            Colon => ":",
            Combinator => "~,||",
            Comma => ",",
            Delim => "!",
            Dot => ".",
            Equals => "=",
            EqCmp => ">=,<=",
            Gt => ">",
            Hash => "#",
            LBrace => "{",
            LBracket => "[",
            LParen => "(",
            Minus => "-",
            Pipe => "|",
            Plus => "+",
            RBrace => "}",
            RBracket => "]",
            RParen => ")",
            Semicolon => ";",
            Star => "*",
            _ => return None,
        })
    }

    /// How the kind is named in "Expected ..." messages
    pub fn describe(self) -> String {
        match self.fixed_text() {
            Some(text) => format!("\"{}\"", text),
            None => self.name().to_string(),
        }
    }

    /// Kind of a single-character punctuation token
    pub fn from_char(c: char) -> Option<Self> {
        use TokenKind::*;
        Some(match c {
            '&' => Amp,
            ':' => Colon,
            '~' => Combinator,
            ',' => Comma,
            '!' => Delim,
            '.' => Dot,
            '=' => Equals,
            '>' => Gt,
            '#' => Hash,
            '{' => LBrace,
            '[' => LBracket,
            '(' => LParen,
            '-' => Minus,
            '|' => Pipe,
            '+' => Plus,
            '}' => RBrace,
            ']' => RBracket,
            ')' => RParen,
            ';' => Semicolon,
            '*' => Star,
            _ => return None,
        })
    }

    pub fn is_numeric(self) -> bool {
        self >= TokenKind::Angle
    }

    const fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

/// A set of token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kinds(u64);

impl Kinds {
    pub const EMPTY: Kinds = Kinds(0);

    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Kinds(bits)
    }

    pub const fn one(kind: TokenKind) -> Self {
        Kinds(kind.bit())
    }

    pub const fn with(self, other: Kinds) -> Self {
        Kinds(self.0 | other.0)
    }

    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Whether a variable placeholder may stand in for one of these kinds
    pub const fn is_uvar_proxy(self) -> bool {
        self.0 & UVAR_PROXY.0 != 0
    }

    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        ALL_KINDS.into_iter().filter(move |k| self.contains(*k))
    }

    pub fn describe(self) -> String {
        self.iter().map(TokenKind::describe).collect::<Vec<_>>().join(", ")
    }
}

impl From<TokenKind> for Kinds {
    fn from(kind: TokenKind) -> Self {
        Kinds::one(kind)
    }
}

/// Named kind sets used by the parser
pub mod tt {
    use super::Kinds;
    use super::TokenKind::*;

    pub const ATTR_EQ: Kinds = Kinds::of(&[AttrEq, Equals]);
    pub const ATTR_EQ_END: Kinds = Kinds::of(&[AttrEq, Equals, RBracket]);
    pub const ATTR_START: Kinds = Kinds::of(&[Pipe, Ident, Star]);
    pub const ATTR_NAME_END: Kinds = Kinds::of(&[RBracket, UVar, Ws]);
    pub const COLON_LPAREN: Kinds = Kinds::of(&[Colon, LParen]);
    pub const COMBINATOR: Kinds = Kinds::of(&[Plus, Gt, Combinator]);
    pub const CONDITION: Kinds = Kinds::of(&[Function, Ident, LParen]);
    pub const DECL_END: Kinds = Kinds::of(&[Semicolon, RBrace]);
    pub const DOC_FUNC: Kinds = Kinds::of(&[Function, Ident, Uri]);
    pub const IDENT_STAR: Kinds = Kinds::of(&[Ident, Star]);
    pub const IDENT_STRING: Kinds = Kinds::of(&[Ident, String]);
    pub const MEDIA_LIST: Kinds = Kinds::of(&[Ident, LParen]);
    pub const MEDIA_VALUE: Kinds = Kinds::of(&[Ident, Number, Dimension, Length]);
    pub const PROP_CUSTOM_END: Kinds = Kinds::of(&[Delim, Semicolon, RBrace, RBracket, RParen, Invalid]);
    pub const PROP_VAL_END: Kinds = Kinds::of(&[Delim, Semicolon, RBrace]);
    pub const PROP_VAL_END_PAREN: Kinds = Kinds::of(&[Delim, Semicolon, RBrace, RParen]);
    pub const PSEUDO: Kinds = Kinds::of(&[Function, Ident]);
    pub const SELECTOR_START: Kinds = Kinds::of(&[Amp, Pipe, Ident, Star, Hash, Dot, LBracket, Colon]);
    pub const STRING_URI: Kinds = Kinds::of(&[String, Uri]);
    pub const NEST_SEL: Kinds = SELECTOR_START.with(COMBINATOR);
    pub const NEST_SEL_BLOCK: Kinds = NEST_SEL.with(Kinds::one(LBrace));
    pub const PARENS: Kinds = Kinds::of(&[LBrace, LBracket, LParen]);
}

const UVAR_PROXY: Kinds = Kinds::of(&[
    TokenKind::Pct,
    TokenKind::Ident,
    TokenKind::Number,
    TokenKind::Dimension,
    TokenKind::Length,
    TokenKind::String,
]);

/// Numeric kind for a lower-cased unit, `None` for unknown units
pub fn unit_kind(units: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match units {
        "deg" | "grad" | "rad" | "turn" => Angle,
        "fr" => Flex,
        "hz" | "khz" => Frequency,
        "dpcm" | "dpi" | "dppx" | "x" => Resolution,
        "ms" | "s" => Time,
        "cap" | "ch" | "em" | "ex" | "ic" | "lh" | "rcap" | "rch" | "rem" | "rex" | "ric"
        | "rlh" | "cm" | "mm" | "in" | "pc" | "pt" | "px" | "q" | "cqw" | "cqh" | "cqi"
        | "cqb" | "cqmin" | "cqmax" => Length,
        _ => {
            let rest = ["dv", "lv", "sv", "v"].iter().find_map(|p| units.strip_prefix(p))?;
            match rest {
                "b" | "i" | "h" | "w" | "min" | "max" => Length,
                _ => return None,
            }
        }
    })
}

/// Coarse classification of a value token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    Unknown,
    Ident,
    Color,
    Function,
    /// `--custom` identifier
    Custom,
    Uri,
    String,
    /// `( )`, `[ ]` or `{ }` group inside a value
    Block,
    Numeric,
}

/// A classified lexical unit
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub ty: ValueType,
    pub loc: SourceLocation,
    /// Byte offset just past the token
    pub end: usize,
    /// Lower-cased first character
    pub code: char,
    pub text: String,
    /// Function or url name without vendor prefix, lower-cased
    pub name: Option<String>,
    /// Vendor prefix of a function name, e.g. `-webkit-`
    pub prefix: Option<String>,
    /// Byte index of the name after a vendor prefix, 0 when unprefixed
    pub vendor_pos: usize,
    /// At-rule name without `@` and vendor prefix, lower-cased
    pub at_name: Option<String>,
    pub uri: Option<String>,
    pub number: Option<f64>,
    /// Lower-cased units of a number, `%` for percentages
    pub units: String,
    pub is0: bool,
    pub is_int: bool,
    pub is_none: bool,
    pub is_var: bool,
    pub is_calc: bool,
    pub is_attr: bool,
    /// `progid:` filter of old IE
    pub ie: bool,
    /// Property-name hack of old IE: `*` or `_`
    pub hack: Option<char>,
    /// Arguments of a function or the contents of a block
    pub expr: Option<Box<TokenValue>>,
    low_text: OnceCell<String>,
    string: OnceCell<String>,
}

impl Token {
    pub fn new(kind: TokenKind, loc: SourceLocation, end: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let code = text.chars().next().map(|c| c.to_ascii_lowercase()).unwrap_or('\0');
        Self {
            kind,
            ty: ValueType::Unknown,
            loc,
            end,
            code,
            text,
            name: None,
            prefix: None,
            vendor_pos: 0,
            at_name: None,
            uri: None,
            number: None,
            units: String::new(),
            is0: false,
            is_int: false,
            is_none: false,
            is_var: false,
            is_calc: false,
            is_attr: false,
            ie: false,
            hack: None,
            expr: None,
            low_text: OnceCell::new(),
            string: OnceCell::new(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn line(&self) -> usize {
        self.loc.line
    }

    pub fn col(&self) -> usize {
        self.loc.column
    }

    pub fn offset(&self) -> usize {
        self.loc.offset
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn low_text(&self) -> &str {
        self.low_text.get_or_init(|| self.text.to_lowercase())
    }

    /// Replace the text, dropping memoized forms of the old one
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.low_text = OnceCell::new();
        self.string = OnceCell::new();
    }

    /// Unquoted and unescaped value of a STRING token
    pub fn string_value(&self) -> &str {
        self.string.get_or_init(|| parse_string(&self.text))
    }

    /// Lower-cased character at the vendor position, e.g. `f` in `-moz-foo`
    pub fn vendor_code(&self) -> Option<char> {
        if self.vendor_pos == 0 {
            return None;
        }
        self.low_text()
            .get(self.vendor_pos..)
            .and_then(|s| s.chars().next())
    }

    /// Lower-cased text without the vendor prefix
    pub fn unprefixed(&self) -> &str {
        let low = self.low_text();
        low.get(self.vendor_pos..).unwrap_or(low)
    }

    pub fn is_function(&self) -> bool {
        self.ty == ValueType::Function
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(hack) = self.hack {
            write!(f, "{}", hack)?;
        }
        f.write_str(&self.text)
    }
}

/// An ordered sequence of tokens: a declaration value or function arguments
#[derive(Debug, Clone)]
pub struct TokenValue {
    pub parts: Vec<Token>,
    pub loc: SourceLocation,
    pub end: usize,
    pub text: String,
    /// Contains `var()`, `env()` or a placeholder somewhere
    pub is_var: bool,
}

impl TokenValue {
    /// Build from parts; `text` is the source span they cover
    pub fn new(parts: Vec<Token>, text: impl Into<String>) -> Self {
        let loc = parts.first().map(|p| p.loc).unwrap_or_default();
        let end = parts.last().map(|p| p.end).unwrap_or(loc.offset);
        Self { parts, loc, end, text: text.into(), is_var: false }
    }

    /// A value with no tokens, e.g. `--x:;`
    pub fn empty(loc: SourceLocation) -> Self {
        Self { parts: Vec::new(), loc, end: loc.offset, text: String::new(), is_var: false }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Decode CSS escapes; whitespace following an escape is part of it
pub fn unescape(s: &str) -> String {
    unescape_impl(s, false)
}

/// Strip the quotes of a string literal and decode its escapes
pub fn parse_string(s: &str) -> String {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    unescape_impl(chars.as_str(), true)
}

fn unescape_impl(s: &str, drop_lf: bool) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(h) if h.is_ascii_hexdigit() => {
                    hex.push(*h);
                    chars.next();
                }
                _ => break,
            }
        }
        if !hex.is_empty() {
            let code = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
            out.push(char::from_u32(code).filter(|c| *c != '\0').unwrap_or('\u{FFFD}'));
        } else {
            match chars.next() {
                Some('\n') if drop_lf => continue,
                Some('\n') => {
                    out.push('\\');
                    out.push('\n');
                    continue;
                }
                Some(other) => out.push(other),
                None => {
                    out.push('\\');
                    break;
                }
            }
        }
        if matches!(chars.peek(), Some(' ' | '\t')) {
            chars.next();
        }
    }
    out
}

/// Shorten text for messages
pub fn clip(s: &str, len: usize) -> String {
    match s.char_indices().nth(len) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_set() {
        assert!(tt::DECL_END.contains(TokenKind::Semicolon));
        assert!(!tt::DECL_END.contains(TokenKind::Colon));
        assert!(tt::NEST_SEL_BLOCK.contains(TokenKind::LBrace));
        assert!(tt::MEDIA_VALUE.is_uvar_proxy());
        assert!(!tt::DECL_END.is_uvar_proxy());
    }

    #[test]
    fn test_kinds_describe_in_declaration_order() {
        assert_eq!(Kinds::of(&[TokenKind::RBrace, TokenKind::Semicolon]).describe(), "\"}\", \";\"");
        assert_eq!(Kinds::of(&[TokenKind::String, TokenKind::Ident]).describe(), "IDENT, STRING");
    }

    #[test]
    fn test_unit_kinds() {
        assert_eq!(unit_kind("px"), Some(TokenKind::Length));
        assert_eq!(unit_kind("dvh"), Some(TokenKind::Length));
        assert_eq!(unit_kind("svmin"), Some(TokenKind::Length));
        assert_eq!(unit_kind("vmax"), Some(TokenKind::Length));
        assert_eq!(unit_kind("turn"), Some(TokenKind::Angle));
        assert_eq!(unit_kind("x"), Some(TokenKind::Resolution));
        assert_eq!(unit_kind("xyz"), None);
        assert_eq!(unit_kind("vq"), None);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a\\62 c"), "abc");
        assert_eq!(unescape("\\:x"), ":x");
        assert_eq!(parse_string("'a\\\nb'"), "ab");
        assert_eq!(parse_string("\"\\22\""), "\"");
    }

    #[test]
    fn test_token_accessors() {
        let mut tok = Token::new(TokenKind::Ident, SourceLocation::new(1, 1, 0), 8, "-MOZ-Foo");
        tok.vendor_pos = 5;
        assert_eq!(tok.low_text(), "-moz-foo");
        assert_eq!(tok.vendor_code(), Some('f'));
        assert_eq!(tok.unprefixed(), "foo");
        assert_eq!(tok.code, '-');
        tok.hack = Some('*');
        assert_eq!(tok.to_string(), "*-MOZ-Foo");
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("abc", 30), "abc");
        assert_eq!(clip(&"x".repeat(31), 30), format!("{}...", "x".repeat(30)));
    }
}
