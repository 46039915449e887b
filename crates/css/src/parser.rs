//! CSS Parser
//!
//! Recursive-descent parser over the [`TokenStream`]. Instead of building a
//! stylesheet tree it reports rules, declarations and diagnostics as
//! [`Event`]s, validating every declaration against the property grammars
//! on the way. Syntax errors inside a block are reported and skipped so one
//! bad declaration does not hide the rest of the sheet.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::bucket::{
    Bucket, AND, AND_OR, ATTR_IS, AUTO, AUTO_NONE, COLORS, FROM_TO, IMPORTANT, LAYER, MARGIN_SYMS, NOT,
    NOT_ONLY, OF, OR, TO,
};
use crate::cache::BlockCache;
use crate::error::{CssError, CssResult, SourceLocation};
use crate::event::{Block, Declaration, Event, EventKind, Listener, MediaQuery};
use crate::grammar::scoped::{self, Scope};
use crate::grammar::Grammar;
use crate::selector::{
    Attribute, AttributeOp, Combinator, CombinatorKind, Compound, Modifier, ModifierKind, Pseudo,
    PseudoArgs, Selector, SelectorPart,
};
use crate::token::TokenKind::{
    self, Amp, At, Cdco, Colon, Comma, Delim, Dot, Eof, EqCmp, Equals, Function, Gt, Hash, Ident,
    LBrace, LBracket, LParen, Pct, Pipe, RBrace, RBracket, RParen, Semicolon, Star, UVar, Uri, Ws,
};
use crate::token::{clip, tt, Kinds, Token, TokenValue, ValueType};
use crate::tokenizer::{Goal, Smart, TokenStream};

/// Functions whose result is a computed number
const CALC_FUNCTIONS: &[&str] = &[
    "calc", "clamp", "min", "max", "sin", "cos", "tan", "asin", "acos", "atan", "atan2",
];

/// Parser switches
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Accept `*prop: value`
    pub star_hack: bool,
    /// Accept `_prop: value`
    pub underscore_hack: bool,
    /// Accept `progid:DXImageTransform...` values
    pub ie_filters: bool,
    /// Stop at the first syntax error
    pub strict: bool,
    /// Do not check values against property grammars
    pub no_validation: bool,
    /// Only parse `@-moz-document` blocks at the top level
    pub top_doc_only: bool,
    /// Stop after `@charset`, `@import`, `@namespace` and `@layer`
    pub globals_only: bool,
}

/// Counters of one [`Parser::parse`] run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub tokens: usize,
    pub blocks_reused: usize,
    pub events_replayed: usize,
}

/// Kinds of conditions sharing the `and`/`or`/`not` syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cond {
    Supports,
    Container,
}

/// How [`Parser::block`] treats the items of a `{}` block
#[derive(Default)]
struct BlockOpts {
    /// The `{` was already consumed
    brace: bool,
    /// Declarations are allowed
    decl: bool,
    /// Nested style rules are allowed
    nest: bool,
    /// `@import` and friends are allowed before anything else
    globals: bool,
    /// `@top-left` and other margin boxes are allowed
    margins: bool,
    scope: Option<&'static Scope>,
    event: Option<Block>,
}

/// Event-emitting CSS parser
pub struct Parser<'p> {
    grammar: &'p Grammar,
    opts: ParserOptions,
    listener: &'p mut dyn Listener,
    cache: Option<&'p mut BlockCache>,
    in_style: usize,
    in_scope: usize,
    depth: usize,
    /// Events of a declaration that may turn out to be a nested rule
    deferred: Option<Vec<Event>>,
    stop: bool,
    stats: ParseStats,
}

impl<'p> Parser<'p> {
    pub fn new(grammar: &'p Grammar, opts: ParserOptions, listener: &'p mut dyn Listener) -> Self {
        Self {
            grammar,
            opts,
            listener,
            cache: None,
            in_style: 0,
            in_scope: 0,
            depth: 0,
            deferred: None,
            stop: false,
            stats: ParseStats::default(),
        }
    }

    /// Record style rule blocks in `cache` and replay unchanged ones from it
    pub fn with_cache(mut self, cache: &'p mut BlockCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.opts
    }

    /// Parse a whole stylesheet. Recoverable syntax errors are reported as
    /// events; the returned error is fatal (or the first syntax error in
    /// strict mode).
    pub fn parse(&mut self, input: &str) -> CssResult<ParseStats> {
        self.in_style = 0;
        self.in_scope = 0;
        self.depth = 0;
        self.deferred = None;
        self.stop = false;
        self.stats = ParseStats::default();
        if let Some(cache) = self.cache.as_deref_mut() {
            cache.begin();
        }

        let mut s = TokenStream::new(input);
        self.fire(EventKind::StartStylesheet, SourceLocation::new(1, 1, 0));
        let res = self.stylesheet(&mut s);
        self.stats.tokens = s.lexed();
        res?;
        let end = s.source().location();
        self.fire(EventKind::EndStylesheet, end);

        debug!(
            "parsed {} tokens, {} blocks reused ({} events)",
            self.stats.tokens, self.stats.blocks_reused, self.stats.events_replayed
        );
        Ok(self.stats)
    }

    fn stylesheet(&mut self, s: &mut TokenStream<'_>) -> CssResult<()> {
        let mut globals = true;
        while !self.stop {
            let tok = s.grab();
            match tok.kind {
                Eof => break,
                Cdco => continue,
                _ => {}
            }
            if let Err(err) = self.top_item(s, tok, &mut globals) {
                if self.opts.strict || !err.is_syntax() {
                    return Err(err);
                }
                self.recover(s, err, false);
            }
        }
        Ok(())
    }

    fn top_item(&mut self, s: &mut TokenStream<'_>, tok: Token, globals: &mut bool) -> CssResult<()> {
        let at = if tok.kind == At { tok.at_name.clone() } else { None };
        if *globals {
            match at.as_deref() {
                Some("charset") => return self.charset(s, &tok),
                Some("import") => return self.import(s, &tok),
                Some("namespace") => return self.namespace(s, &tok),
                Some("layer") => {
                    if self.layer(s, &tok)? {
                        *globals = false;
                        self.stop = self.opts.globals_only;
                    }
                    return Ok(());
                }
                _ => *globals = false,
            }
        }
        if self.opts.globals_only {
            s.unget()?;
            self.stop = true;
            return Ok(());
        }
        match at.as_deref() {
            Some("document") => self.document(s, &tok),
            Some(_) if self.opts.top_doc_only => self.unknown_at(s, &tok),
            Some(_) => self.at_rule(s, tok),
            None if self.opts.top_doc_only => {
                s.skip_decl_block(false);
                Ok(())
            }
            None => {
                if !self.style_rule(s, tok)? && s.grab().kind != Eof {
                    return Err(s.fail(Goal::None));
                }
                Ok(())
            }
        }
    }

    // Events

    fn fire(&mut self, kind: EventKind, loc: SourceLocation) {
        let event = Event::new(kind, loc);
        match self.deferred.as_mut() {
            Some(buf) => buf.push(event),
            None => self.emit(event),
        }
    }

    fn emit(&mut self, event: Event) {
        if let Some(cache) = self.cache.as_deref_mut() {
            cache.add_event(&event);
        }
        self.listener.on_event(&event);
    }

    /// Report a problem that does not stop the parse
    fn alarm(&mut self, level: u8, message: impl Into<String>, loc: SourceLocation) {
        let message = message.into();
        let kind = match level {
            l if l >= 2 => EventKind::Error { message, recoverable: true },
            1 => EventKind::Warning { message },
            _ => EventKind::Info { message },
        };
        self.fire(kind, loc);
    }

    /// Report `err` and skip the rest of the broken declaration or rule
    fn recover(&mut self, s: &mut TokenStream<'_>, err: CssError, in_block: bool) {
        if let Some(closer) = s.pair.take() {
            self.expr(s, closer.into(), true).ok();
        }
        s.skip_decl_block(in_block);
        self.fire(
            EventKind::Error { message: err.message(), recoverable: true },
            err.location(),
        );
    }

    fn nesting(&self) -> bool {
        self.in_style > 0 || self.in_scope > 0
    }

    // Blocks

    /// Parse a `{}` block, firing start/end events when `opts.event` is set.
    /// Returns whether the block had any content.
    fn block(&mut self, s: &mut TokenStream<'_>, loc: SourceLocation, opts: BlockOpts) -> CssResult<bool> {
        if !opts.brace {
            expect(s, LBrace)?;
        }
        if let Some(block) = &opts.event {
            self.fire(EventKind::Start(block.clone()), loc);
        }
        self.depth += 1;
        let res = self.block_items(s, &opts);
        self.depth -= 1;
        let child = res?;
        if let Some(block) = opts.event {
            let end = s.token().loc;
            self.fire(EventKind::End { block, empty: !child }, end);
        }
        Ok(child)
    }

    fn block_items(&mut self, s: &mut TokenStream<'_>, opts: &BlockOpts) -> CssResult<bool> {
        let mut child = false;
        let mut globals = opts.globals;
        let mut last_seq = 0;
        loop {
            let tok = s.get(true, false);
            let seq = s.current_seq();
            match tok.kind {
                RBrace => return Ok(child),
                Eof => return Err(s.failure(RBrace, &tok)),
                Semicolon => continue,
                UVar => {
                    child = true;
                    continue;
                }
                _ => {}
            }
            let res = if seq == last_seq {
                Err(s.failure(Goal::None, &tok))
            } else {
                last_seq = seq;
                self.block_item(s, tok, opts, &mut globals)
            };
            match res {
                Ok(()) => child = true,
                Err(err) if self.opts.strict || !err.is_syntax() => return Err(err),
                Err(err) => self.recover(s, err, false),
            }
        }
    }

    fn block_item(
        &mut self,
        s: &mut TokenStream<'_>,
        tok: Token,
        opts: &BlockOpts,
        globals: &mut bool,
    ) -> CssResult<()> {
        if tok.kind == At {
            let at = tok.at_name.clone().unwrap_or_default();
            if *globals {
                match at.as_str() {
                    "charset" => return self.charset(s, &tok),
                    "import" => return self.import(s, &tok),
                    "namespace" => return self.namespace(s, &tok),
                    _ => *globals = false,
                }
            }
            if opts.margins && MARGIN_SYMS.has(&at) {
                return self.margin(s, &tok);
            }
            return self.at_rule(s, tok);
        }
        *globals = false;
        let star = self.opts.star_hack && tok.kind == Star && tok.hack.is_some();
        if opts.decl && (tok.kind == Ident || star) {
            if self.declaration(s, &tok, None, false, opts.scope)?.is_some() {
                return Ok(());
            }
            // not a declaration: the stream was rewound to just after `tok`
        }
        if opts.nest
            && tok.ty != ValueType::Custom
            && (!self.nesting() || tt::NEST_SEL.contains(tok.kind))
            && self.style_rule(s, tok.clone())?
        {
            return Ok(());
        }
        Err(s.failure(Goal::None, &tok))
    }

    // Declarations

    /// Parse `prop: value [!important]` starting at `tok`. Returns the kind of
    /// the terminator, or `None` if this turned out to be a nested selector,
    /// in which case the stream is rewound to just after `tok`.
    fn declaration(
        &mut self,
        s: &mut TokenStream<'_>,
        tok: &Token,
        colon: Option<Token>,
        in_parens: bool,
        scope: Option<&'static Scope>,
    ) -> CssResult<Option<TokenKind>> {
        let restart = after(s, tok);
        let mut prop = tok.clone();
        if tok.kind == Star {
            let Some(name) = s.matches(Ident, None)? else {
                return Ok(None);
            };
            prop = name;
            prop.loc.column -= 1;
            prop.loc.offset -= 1;
            prop.hack = Some('*');
        } else if self.opts.underscore_hack && prop.text.starts_with('_') {
            let text = prop.text[1..].to_string();
            prop.set_text(text);
            prop.hack = Some('_');
        }
        let custom = prop.ty == ValueType::Custom;

        let mut defer = false;
        if colon.is_none() {
            let t2 = s.grab();
            if t2.kind != Colon {
                if !in_parens && !custom && self.nesting() && tt::NEST_SEL_BLOCK.contains(t2.kind) {
                    s.seek(restart);
                    return Ok(None);
                }
                return Err(s.failure(Colon, &t2));
            }
            let t3 = s.get(true, true);
            s.unget()?;
            defer = !in_parens
                && !custom
                && self.nesting()
                && matches!(t3.kind, Ident | Function | Colon);
        }

        let end = if custom {
            tt::PROP_CUSTOM_END
        } else if in_parens {
            tt::PROP_VAL_END_PAREN
        } else {
            tt::PROP_VAL_END
        };
        let saved = std::mem::replace(&mut self.deferred, defer.then(Vec::new));
        let value = self.expr(s, end, custom);
        let buffered = std::mem::replace(&mut self.deferred, saved);
        let value = value?;

        if s.token().kind == LBrace {
            if defer {
                s.seek(restart);
                return Ok(None);
            }
            s.pair = Some(RBrace);
            return Err(CssError::parse_error(
                format!("Unexpected \"{{\" in \"{}\" declaration.", prop),
                s.token().loc,
            ));
        }
        for event in buffered.into_iter().flatten() {
            self.fire(event.kind, event.loc);
        }

        let value = match value {
            Some(value) => value,
            None if custom => TokenValue::empty(s.token().loc),
            None => return Err(s.fail(Goal::None)),
        };
        let invalid = if custom || self.opts.no_validation {
            None
        } else {
            self.grammar.validate_property(&prop, &value, scope)?
        };
        let important = s.token().kind == Delim
            && s.match_smart(Ident, Smart::must_text(&IMPORTANT))?.is_some();

        let loc = prop.loc;
        self.fire(
            EventKind::Property(Box::new(Declaration {
                property: prop,
                value,
                important,
                in_parens,
                invalid,
                scope: scope.map(|sc| sc.name),
            })),
            loc,
        );

        let what: Kinds = if in_parens { RParen.into() } else { tt::DECL_END };
        let terminator = if s.token().kind == Eof && !important {
            Eof
        } else {
            match s.match_smart(what, Smart { must: true, reuse: !important, text: None })? {
                Some(t) => t.kind,
                None => return Err(s.fail(what)),
            }
        };
        if terminator == RBrace {
            s.unget()?;
        }
        Ok(Some(terminator))
    }

    /// Parse a value up to one of the `end` kinds. In `dumb` mode nothing is
    /// classified or reported, only brackets are balanced.
    fn expr(&mut self, s: &mut TokenStream<'_>, end: Kinds, dumb: bool) -> CssResult<Option<TokenValue>> {
        let mut parts: Vec<Token> = Vec::new();
        let mut is_var = false;
        loop {
            let mut tok = s.get(true, false);
            if tok.kind == Eof || end.contains(tok.kind) {
                break;
            }
            if tt::PARENS.contains(tok.kind) {
                if tok.kind == LBrace && !dumb && !parts.is_empty() {
                    break;
                }
                let closer = match tok.kind {
                    LBrace => RBrace,
                    LBracket => RBracket,
                    _ => RParen,
                };
                let inner = self.expr(s, closer.into(), dumb || tok.kind == LBrace)?;
                if s.token().kind != closer {
                    return Err(s.fail(closer));
                }
                let close_end = s.token().end;
                let text = s.text()[tok.offset()..close_end].to_string();
                tok.set_text(text);
                tok.end = close_end;
                tok.ty = ValueType::Block;
                if let Some(inner) = &inner {
                    is_var |= inner.is_var;
                }
                tok.expr = inner.map(Box::new);
            } else if tok.kind == Function {
                if !tok.ie || self.opts.ie_filters {
                    tok = self.function(s, tok, dumb)?;
                    is_var |= tok.is_var;
                }
            } else if tok.kind == UVar {
                is_var = true;
            } else if !dumb {
                if tok.kind == Hash {
                    self.hex_color(&mut tok);
                } else if tok.kind == Ident && tok.ty == ValueType::Unknown {
                    let low = tok.low_text();
                    if AUTO_NONE.has(low) {
                        tok.is_none = low == "none";
                        tok.ty = ValueType::Ident;
                    } else if COLORS.has(low) {
                        tok.ty = ValueType::Color;
                    } else {
                        tok.ty = ValueType::Ident;
                    }
                }
            }
            parts.push(tok);
        }
        let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
            return Ok(None);
        };
        let text = s.text().get(first.offset()..last.end).unwrap_or_default().to_string();
        let mut value = TokenValue::new(parts, text);
        value.is_var = is_var;
        Ok(Some(value))
    }

    /// Parse the arguments of function token `tok` up to its `)`
    fn function(&mut self, s: &mut TokenStream<'_>, mut tok: Token, dumb: bool) -> CssResult<Token> {
        let args = self.expr(s, RParen.into(), dumb)?;
        let end = s.token().end.max(tok.end);
        let text = format!("{}{}", tok.text, &s.text()[tok.end..end]);
        tok.set_text(text);
        tok.end = end;
        if let Some(args) = args {
            let name = tok.name.clone().unwrap_or_default();
            tok.is_calc = CALC_FUNCTIONS.contains(&name.as_str());
            tok.is_var = matches!(name.as_str(), "var" | "env");
            tok.is_attr = name == "attr"
                && args.parts.first().is_some_and(|p| matches!(p.kind, Ident | UVar));
            tok.expr = Some(Box::new(args));
        }
        Ok(tok)
    }

    fn hex_color(&mut self, tok: &mut Token) {
        let len = tok.text.len();
        if matches!(len, 4 | 5 | 7 | 9) && tok.text[1..].bytes().all(|b| b.is_ascii_hexdigit()) {
            tok.ty = ValueType::Color;
        } else {
            self.alarm(
                1,
                format!("Expected a hex color but found \"{}\".", clip(&tok.text, 30)),
                tok.loc,
            );
        }
    }

    // Style rules

    /// Parse a style rule starting at `tok`. Returns `false` (with `tok`
    /// put back) if no selector starts there.
    fn style_rule(&mut self, s: &mut TokenStream<'_>, tok: Token) -> CssResult<bool> {
        let can_cache = self.cache.is_some()
            && self.in_style == 0
            && tok.kind != Amp
            && self.deferred.is_none();
        if can_cache && self.replay(s, &tok) {
            return Ok(true);
        }
        let amps = s.amp().saturating_sub(usize::from(tok.kind == Amp));
        let mut handle = None;
        let mut in_block = false;
        match self.rule_body(s, &tok, can_cache, amps, &mut handle, &mut in_block) {
            Ok(found) => Ok(found),
            Err(err) => {
                if let (Some(h), Some(cache)) = (handle, self.cache.as_deref_mut()) {
                    cache.cancel(h);
                }
                if self.opts.strict || !err.is_syntax() {
                    return Err(err);
                }
                self.recover(s, err, in_block);
                Ok(true)
            }
        }
    }

    fn rule_body(
        &mut self,
        s: &mut TokenStream<'_>,
        tok: &Token,
        can_cache: bool,
        amps: usize,
        handle: &mut Option<usize>,
        in_block: &mut bool,
    ) -> CssResult<bool> {
        let Some(selectors) = self.selectors_group(s, Some(tok.clone()), true, false)? else {
            s.unget()?;
            return Ok(false);
        };
        let nested = s.amp() > amps || selectors.iter().any(Selector::is_relative);
        let brace = s.match_smart(LBrace, Smart::OR_DIE_REUSING);
        let loc = selectors[0].loc;
        if brace.is_ok() && can_cache {
            *handle = self.cache.as_deref_mut().map(|cache| cache.start(loc));
        }
        if nested && !self.nesting() {
            self.alarm(2, "Nested selector must be inside a style rule.", tok.loc);
        }
        brace?;
        *in_block = true;

        self.in_style += 1;
        let res = self.block(
            s,
            loc,
            BlockOpts {
                brace: true,
                decl: true,
                nest: true,
                event: Some(Block::Rule { selectors }),
                ..Default::default()
            },
        );
        self.in_style -= 1;
        let child = res?;

        if let (Some(h), Some(cache)) = (handle.take(), self.cache.as_deref_mut()) {
            if child {
                cache.end(h, s.token(), s.text());
            } else {
                cache.cancel(h);
            }
        }
        Ok(true)
    }

    /// Replay an unchanged block from the cache
    fn replay(&mut self, s: &mut TokenStream<'_>, tok: &Token) -> bool {
        let Some(cache) = self.cache.as_deref_mut() else {
            return false;
        };
        let Some(replay) = cache.find(s.text(), tok.loc) else {
            return false;
        };
        trace!("replaying {} events at {}", replay.events.len(), tok.loc);
        self.stats.blocks_reused += 1;
        self.stats.events_replayed += replay.events.len();
        for event in &replay.events {
            self.listener.on_event(event);
        }
        s.seek(replay.end);
        true
    }

    // Selectors

    fn selectors_group(
        &mut self,
        s: &mut TokenStream<'_>,
        tok: Option<Token>,
        relative: bool,
        lax: bool,
    ) -> CssResult<Option<Vec<Selector>>> {
        let mut selectors = Vec::new();
        let mut comma = false;
        let mut next = tok;
        while let Some(sel) = self.selector(s, next.take(), relative)? {
            selectors.push(sel);
            let mut cur = s.token().clone();
            if cur.is_var {
                cur = s.grab();
            }
            comma = cur.kind == Comma;
            if !comma {
                break;
            }
        }
        if comma {
            return Err(s.fail(Goal::None));
        }
        if selectors.is_empty() {
            return Ok(lax.then(Vec::new));
        }
        Ok(Some(selectors))
    }

    fn selector(&mut self, s: &mut TokenStream<'_>, tok: Option<Token>, relative: bool) -> CssResult<Option<Selector>> {
        let tok = match tok {
            Some(t) if !t.is_var => t,
            _ => s.grab(),
        };
        let mut parts = Vec::new();
        let mut cur = if relative && tt::COMBINATOR.contains(tok.kind) {
            tok
        } else {
            let Some(first) = self.compound(s, tok)? else {
                return Ok(None);
            };
            parts.push(SelectorPart::Compound(first));
            s.token().clone()
        };
        loop {
            if tt::COMBINATOR.contains(cur.kind) {
                parts.push(SelectorPart::Combinator(combinator(&cur)));
                let start = s.grab();
                match self.compound(s, start)? {
                    Some(c) => parts.push(SelectorPart::Compound(c)),
                    None => return Err(s.fail(Goal::None)),
                }
                cur = s.token().clone();
                continue;
            }
            while cur.is_var {
                cur = s.get(true, true);
            }
            if cur.kind != Ws {
                break;
            }
            let next = s.grab();
            if next.kind == LBrace {
                break;
            }
            let (comb, start) = if tt::COMBINATOR.contains(next.kind) {
                (combinator(&next), s.grab())
            } else {
                (combinator(&cur), next)
            };
            let explicit = comb.kind != CombinatorKind::Descendant;
            match self.compound(s, start)? {
                Some(c) => {
                    parts.push(SelectorPart::Combinator(comb));
                    parts.push(SelectorPart::Compound(c));
                }
                None if explicit => return Err(s.fail(Goal::None)),
                None => {}
            }
            cur = s.token().clone();
        }

        let loc = match parts.first() {
            Some(SelectorPart::Compound(c)) => c.loc,
            Some(SelectorPart::Combinator(c)) => c.loc,
            None => return Ok(None),
        };
        let Some(end) = parts.iter().rev().find_map(|p| match p {
            SelectorPart::Compound(c) => Some(c.end),
            SelectorPart::Combinator(_) => None,
        }) else {
            return Err(s.fail(Goal::None));
        };
        let text = s.text()[loc.offset..end].to_string();
        Ok(Some(Selector { parts, loc, end, text }))
    }

    fn compound(&mut self, s: &mut TokenStream<'_>, start: Token) -> CssResult<Option<Compound>> {
        if start.ty == ValueType::Custom || !tt::SELECTOR_START.contains(start.kind) {
            return Ok(None);
        }
        let mut ns = None;
        let mut element = None;
        let mut pending = None;
        let mut end = start.end;
        match start.kind {
            Pipe => {
                let Some(name) = s.matches(tt::IDENT_STAR, None)? else {
                    return Ok(None);
                };
                ns = Some(String::new());
                end = name.end;
                element = Some(name.text);
            }
            Ident | Star => {
                let next = s.get(true, true);
                if next.kind == Pipe {
                    let Some(name) = s.matches(tt::IDENT_STAR, None)? else {
                        s.unget()?;
                        return Ok(None);
                    };
                    ns = Some(start.text.clone());
                    end = name.end;
                    element = Some(name.text);
                } else {
                    element = Some(start.text.clone());
                    pending = Some(next);
                }
            }
            _ => pending = Some(start.clone()),
        }

        let mut modifiers = Vec::new();
        loop {
            let tok = match pending.take() {
                Some(t) => t,
                None => s.get(true, true),
            };
            let modifier = match tok.kind {
                Amp => Modifier {
                    kind: ModifierKind::Amp,
                    loc: tok.loc,
                    end: tok.end,
                    text: tok.text.clone(),
                },
                Hash => Modifier {
                    kind: ModifierKind::Id(tok.text[1..].to_string()),
                    loc: tok.loc,
                    end: tok.end,
                    text: tok.text.clone(),
                },
                Dot => {
                    let name = s.match_or_die(Ident, None)?;
                    Modifier {
                        kind: ModifierKind::Class(name.text.clone()),
                        loc: tok.loc,
                        end: name.end,
                        text: format!(".{}", name.text),
                    }
                }
                LBracket => self.attribute(s, &tok)?,
                Colon => self.pseudo(s, &tok)?,
                _ => break,
            };
            end = modifier.end;
            modifiers.push(modifier);
        }

        let text = s.text()[start.offset()..end].to_string();
        Ok(Some(Compound { ns, element, modifiers, loc: start.loc, end, text }))
    }

    fn attribute(&mut self, s: &mut TokenStream<'_>, open: &Token) -> CssResult<Modifier> {
        s.pair = Some(RBracket);
        let t1 = expect(s, tt::ATTR_START)?;
        let mut ns = None;
        let mut name = None;
        let mut op = None;
        let mut close = None;
        match t1.kind {
            Pipe => ns = Some(String::new()),
            Star => {
                s.match_or_die(Pipe, None)?;
                ns = Some(t1.text.clone());
            }
            _ => {
                let t2 = s.get(true, true);
                if t2.kind == Pipe {
                    ns = Some(t1.text.clone());
                } else if tt::ATTR_EQ.contains(t2.kind) {
                    name = Some(t1);
                    op = Some(t2);
                } else if tt::ATTR_NAME_END.contains(t2.kind) {
                    name = Some(t1);
                    if t2.kind == RBracket {
                        close = Some(t2);
                    }
                } else {
                    return Err(s.failure("\"]\"", &t2));
                }
            }
        }
        let name = match name {
            Some(name) => name,
            None => s.match_or_die(Ident, None)?,
        };
        if op.is_none() && close.is_none() {
            let t = expect(s, tt::ATTR_EQ_END)?;
            if t.kind == RBracket {
                close = Some(t);
            } else {
                op = Some(t);
            }
        }
        let mut value = None;
        let mut flag = None;
        if op.is_some() {
            value = Some(expect(s, tt::IDENT_STRING)?.text);
            let t = s.grab();
            if t.kind == RBracket {
                close = Some(t);
            } else if t.kind == Ident && ATTR_IS.has(t.low_text()) {
                flag = Some(t.text.clone());
            } else {
                return Err(s.failure(Goal::Words(&*ATTR_IS), &t));
            }
        }
        let close = match close {
            Some(close) => close,
            None => expect(s, RBracket)?,
        };
        s.pair = None;

        Ok(Modifier {
            kind: ModifierKind::Attribute(Attribute {
                ns,
                name: name.text,
                op: op.and_then(|t| AttributeOp::from_text(&t.text)),
                value,
                flag,
            }),
            loc: open.loc,
            end: close.end,
            text: s.text()[open.offset()..close.end].to_string(),
        })
    }

    fn pseudo(&mut self, s: &mut TokenStream<'_>, colon: &Token) -> CssResult<Modifier> {
        let colons = if s.matches(Colon, None)?.is_some() { 2 } else { 1 };
        let tok = s.match_or_die(tt::PSEUDO, None)?;
        let (name, args, end) = if tok.kind == Function {
            let bare = tok.name.clone().unwrap_or_default();
            let name = format!("{}{}", tok.prefix.as_deref().unwrap_or(""), bare);
            s.pair = Some(RParen);
            let args = self.pseudo_args(s, &bare)?;
            s.pair = None;
            (name, Some(args), s.token().end)
        } else {
            (tok.low_text().to_string(), None, tok.end)
        };
        Ok(Modifier {
            kind: ModifierKind::Pseudo(Pseudo { name, colons, args }),
            loc: colon.loc,
            end,
            text: s.text()[colon.offset()..end].to_string(),
        })
    }

    fn pseudo_args(&mut self, s: &mut TokenStream<'_>, name: &str) -> CssResult<PseudoArgs> {
        match name {
            "nth-child" | "nth-last-child" => {
                let nth = s.read_nth_child();
                let t0 = s.get(true, true);
                let t1 = if t0.kind == Ws { s.grab() } else { t0.clone() };
                let Some((a, b)) = nth else {
                    return Err(s.failure(Goal::None, &t0));
                };
                if t1.kind == RParen {
                    return Ok(PseudoArgs::Nth { a, b, of: Vec::new() });
                }
                if t1.kind == Ident && OF.has(t1.low_text()) {
                    let Some(of) = self.selectors_group(s, None, false, false)? else {
                        return Err(s.fail("a selector"));
                    };
                    expect_reusing(s, RParen)?;
                    return Ok(PseudoArgs::Nth { a, b, of });
                }
                Err(s.failure(Goal::None, &t1))
            }
            "not" | "is" | "where" | "any" | "has" => {
                let lax = matches!(name, "is" | "where" | "any");
                let Some(sels) = self.selectors_group(s, None, name == "has", lax)? else {
                    return Err(s.fail("a selector"));
                };
                expect_reusing(s, RParen)?;
                Ok(PseudoArgs::Selectors(sels))
            }
            _ => {
                let value = self.expr(s, RParen.into(), true)?;
                if s.token().kind != RParen {
                    return Err(s.fail(RParen));
                }
                Ok(PseudoArgs::Value(value))
            }
        }
    }

    // At-rules

    fn at_rule(&mut self, s: &mut TokenStream<'_>, tok: Token) -> CssResult<()> {
        let name = tok.at_name.clone().unwrap_or_default();
        match name.as_str() {
            "charset" | "import" | "namespace" => Err(s.failure(Goal::None, &tok)),
            "container" => self.container(s, &tok),
            "counter-style" => self.named_block(s, &tok, |name| Block::CounterStyle { name }),
            "document" => self.document(s, &tok),
            "font-face" => self.block(
                s,
                tok.loc,
                BlockOpts {
                    decl: true,
                    scope: scoped::scope("font-face"),
                    event: Some(Block::FontFace),
                    ..Default::default()
                },
            )
            .map(drop),
            "font-palette-values" => self.named_block(s, &tok, |id| Block::FontPaletteValues { id }),
            "keyframes" => self.keyframes(s, &tok),
            "layer" => self.layer(s, &tok).map(drop),
            "media" => self.media(s, &tok),
            "page" => self.page(s, &tok),
            "property" => self.named_block(s, &tok, |name| Block::Property { name }),
            "scope" => self.scope_rule(s, &tok),
            "supports" => self.supports(s, &tok),
            _ => self.unknown_at(s, &tok),
        }
    }

    fn charset(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let tok = expect(s, TokenKind::String)?;
        expect(s, Semicolon)?;
        self.fire(EventKind::Charset { charset: tok.string_value().to_string() }, start.loc);
        Ok(())
    }

    fn import(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let tok = expect(s, tt::STRING_URI)?;
        let uri = match &tok.uri {
            Some(uri) => uri.clone(),
            None => tok.string_value().to_string(),
        };
        let mut layer = None;
        let mut next = s.grab();
        if next.kind == Function && next.name.as_deref() == Some("layer") {
            layer = Some(self.layer_name(s, None)?);
            expect(s, RParen)?;
            next = s.grab();
        } else if next.kind == Ident && LAYER.has(next.low_text()) {
            layer = Some(String::new());
            next = s.grab();
        }
        let media = if next.kind == Function && next.name.as_deref() == Some("supports") {
            let paren = Token::new(LParen, next.loc, next.end, "(");
            self.condition_in_parens(s, Cond::Supports, Some(paren))?;
            self.media_query_list(s, false)?
        } else {
            self.media_query_list(s, true)?
        };
        expect(s, Semicolon)?;
        self.fire(EventKind::Import { uri, layer, media }, start.loc);
        Ok(())
    }

    fn namespace(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let prefix = s.match_smart(Ident, Smart::default())?.map(|t| t.text);
        let tok = expect(s, tt::STRING_URI)?;
        let uri = match &tok.uri {
            Some(uri) => uri.clone(),
            None => tok.string_value().to_string(),
        };
        expect(s, Semicolon)?;
        self.fire(EventKind::Namespace { prefix, uri }, start.loc);
        Ok(())
    }

    /// `@layer a, b;` or `@layer a { }`. Returns whether it had a block.
    fn layer(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<bool> {
        let mut ids = Vec::new();
        loop {
            let mut tok = s.grab();
            if tok.kind == Ident {
                ids.push(self.layer_name(s, Some(tok))?);
                tok = s.grab();
            }
            if tok.kind == LBrace {
                if ids.len() > 1 {
                    self.alarm(1, "@layer block cannot have multiple ids", start.loc);
                }
                let nest = self.nesting();
                self.block(
                    s,
                    start.loc,
                    BlockOpts {
                        brace: true,
                        decl: nest,
                        nest: true,
                        event: Some(Block::Layer { id: ids.into_iter().next() }),
                        ..Default::default()
                    },
                )?;
                return Ok(true);
            }
            if tok.kind != Comma {
                break;
            }
        }
        s.match_smart(Semicolon, Smart::OR_DIE_REUSING)?;
        self.fire(EventKind::Layer { ids }, start.loc);
        Ok(false)
    }

    /// Dotted layer name: `base.reset`
    fn layer_name(&mut self, s: &mut TokenStream<'_>, start: Option<Token>) -> CssResult<String> {
        let mut name = String::new();
        let mut next = start;
        loop {
            let tok = match next.take() {
                Some(tok) => tok,
                None => match s.match_smart(Ident, Smart::default())? {
                    Some(tok) => tok,
                    None => break,
                },
            };
            name.push_str(&tok.text);
            if s.matches(Dot, None)?.is_none() {
                break;
            }
            name.push('.');
        }
        Ok(name)
    }

    fn media(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let media = self.media_query_list(s, false)?;
        let nest = self.nesting();
        self.block(
            s,
            start.loc,
            BlockOpts {
                decl: nest,
                nest: true,
                event: Some(Block::Media { media }),
                ..Default::default()
            },
        )
        .map(drop)
    }

    /// Media queries separated by commas. With `reuse`, the last consumed
    /// token is the first candidate.
    fn media_query_list(&mut self, s: &mut TokenStream<'_>, mut reuse: bool) -> CssResult<Vec<MediaQuery>> {
        let mut list = Vec::new();
        while let Some(tok) = s.match_smart(tt::MEDIA_LIST, Smart { reuse, ..Default::default() })? {
            reuse = false;
            let modifier = (tok.kind == Ident && NOT_ONLY.has(tok.low_text())).then(|| tok.text.clone());
            let head = if modifier.is_some() { expect(s, tt::MEDIA_LIST)? } else { tok.clone() };
            let media_type = (head.kind == Ident).then(|| head.text.clone());
            let mut features = Vec::new();
            if media_type.is_none() {
                features.push(self.media_expression(s, true)?);
            }
            let joiners: &Bucket = if media_type.is_some() { &*AND } else { &*AND_OR };
            while s.match_smart(Ident, Smart::text(joiners))?.is_some() {
                features.push(self.media_expression(s, false)?);
            }
            let end = s.token().end.max(tok.end);
            list.push(MediaQuery {
                modifier,
                media_type,
                features,
                loc: tok.loc,
                text: s.text()[tok.offset()..end].to_string(),
            });
            if s.match_smart(Comma, Smart::default())?.is_none() {
                break;
            }
        }
        Ok(list)
    }

    /// `(feature)`, `(feature: value)` or a range such as `(width > 10px)`
    fn media_expression(&mut self, s: &mut TokenStream<'_>, reuse: bool) -> CssResult<Token> {
        s.match_smart(LParen, Smart { must: true, reuse, text: None })?;
        let mut feature = expect(s, tt::MEDIA_VALUE)?;
        for _ in 0..2 {
            let op = s.grab();
            let range = matches!(op.kind, Gt | EqCmp) || op.text == "<";
            if op.kind == Colon || op.kind == Equals || range {
                let value = self.expr(s, RParen.into(), true)?;
                feature.expr = value.map(Box::new);
                s.unget()?;
                if !range {
                    break;
                }
            } else {
                s.unget()?;
                break;
            }
        }
        expect(s, RParen)?;
        Ok(feature)
    }

    fn supports(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        self.condition(s, Cond::Supports)?;
        let nest = self.nesting();
        self.block(
            s,
            start.loc,
            BlockOpts { decl: nest, nest: true, event: Some(Block::Supports), ..Default::default() },
        )
        .map(drop)
    }

    fn container(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let name = match s.match_smart(Ident, Smart::default())? {
            Some(tok) if NOT.has(tok.low_text()) => {
                s.unget()?;
                None
            }
            Some(tok) => Some(tok.text),
            None => None,
        };
        self.condition(s, Cond::Container)?;
        let nest = self.nesting();
        self.block(
            s,
            start.loc,
            BlockOpts {
                decl: nest,
                nest: true,
                event: Some(Block::Container { name }),
                ..Default::default()
            },
        )
        .map(drop)
    }

    /// `not X`, or `X and Y and ...`, or `X or Y or ...`
    fn condition(&mut self, s: &mut TokenStream<'_>, kind: Cond) -> CssResult<()> {
        if s.match_smart(Ident, Smart::text(&NOT))?.is_some() {
            return self.condition_in_parens(s, kind, None);
        }
        let mut joiner: Option<char> = None;
        loop {
            self.condition_in_parens(s, kind, None)?;
            let words: &Bucket = match joiner {
                None => &*AND_OR,
                Some('a') => &*AND,
                Some(_) => &*OR,
            };
            match s.match_smart(Ident, Smart::text(words))? {
                Some(tok) => joiner = tok.low_text().chars().next(),
                None => break,
            }
        }
        Ok(())
    }

    fn condition_in_parens(&mut self, s: &mut TokenStream<'_>, kind: Cond, tok: Option<Token>) -> CssResult<()> {
        let tok = match tok {
            Some(tok) => tok,
            None => expect(s, tt::CONDITION)?,
        };
        let mut reuse = false;
        match tok.kind {
            Function if kind == Cond::Supports && tok.name.as_deref() == Some("selector") => {
                let Some(selector) = self.selector(s, None, false)? else {
                    return Err(s.fail("a selector"));
                };
                let loc = selector.loc;
                self.fire(EventKind::SupportsSelector { selector }, loc);
                reuse = true;
            }
            Function => {
                self.function(s, tok, false)?;
                return Ok(());
            }
            LParen => {
                let inner = expect(s, tt::CONDITION)?;
                if inner.kind != Ident {
                    s.unget()?;
                    self.condition(s, kind)?;
                } else if NOT.has(inner.low_text()) {
                    self.condition_in_parens(s, kind, None)?;
                } else if kind == Cond::Container {
                    s.unget()?;
                    self.media_expression(s, true)?;
                    return Ok(());
                } else {
                    match s.match_smart(tt::COLON_LPAREN, Smart::default())? {
                        Some(colon) if colon.kind == Colon => {
                            self.declaration(s, &inner, Some(colon), true, None)?;
                            return Ok(());
                        }
                        Some(_) => {
                            self.expr(s, RParen.into(), true)?;
                        }
                        None => {}
                    }
                }
            }
            _ => {}
        }
        s.match_smart(RParen, Smart { must: true, reuse, text: None })?;
        Ok(())
    }

    fn page(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let id = match s.match_smart(Ident, Smart::default())? {
            Some(tok) if AUTO.has(tok.low_text()) => return Err(s.failure(Goal::None, &tok)),
            Some(tok) => Some(tok.text),
            None => None,
        };
        let pseudo = match s.match_smart(Colon, Smart::default())? {
            Some(_) => Some(s.match_or_die(Ident, None)?.text),
            None => None,
        };
        self.block(
            s,
            start.loc,
            BlockOpts {
                decl: true,
                margins: true,
                scope: scoped::scope("page"),
                event: Some(Block::Page { id, pseudo }),
                ..Default::default()
            },
        )
        .map(drop)
    }

    fn margin(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let margin = start.at_name.clone().unwrap_or_default();
        self.block(
            s,
            start.loc,
            BlockOpts { decl: true, event: Some(Block::PageMargin { margin }), ..Default::default() },
        )
        .map(drop)
    }

    /// `@property`, `@counter-style` and `@font-palette-values`: an ident
    /// followed by a block of descriptors
    fn named_block(
        &mut self,
        s: &mut TokenStream<'_>,
        start: &Token,
        event: impl FnOnce(String) -> Block,
    ) -> CssResult<()> {
        let name = expect(s, Ident)?;
        let at = start.at_name.as_deref().unwrap_or_default();
        self.block(
            s,
            start.loc,
            BlockOpts {
                decl: true,
                scope: scoped::scope(at),
                event: Some(event(name.text)),
                ..Default::default()
            },
        )
        .map(drop)
    }

    fn keyframes(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let raw = start.text.get(1..).unwrap_or_default();
        let at_len = start.at_name.as_deref().map_or(0, str::len);
        let prefix = raw.get(..raw.len().saturating_sub(at_len)).unwrap_or_default().to_string();
        let name = expect(s, tt::IDENT_STRING)?.text;
        expect(s, LBrace)?;
        let block = Block::Keyframes { name, prefix };
        self.fire(EventKind::Start(block.clone()), start.loc);
        self.depth += 1;
        let res = self.keyframe_rules(s);
        self.depth -= 1;
        let any = res?;
        expect(s, RBrace)?;
        let end = s.token().loc;
        self.fire(EventKind::End { block, empty: !any }, end);
        Ok(())
    }

    fn keyframe_rules(&mut self, s: &mut TokenStream<'_>) -> CssResult<bool> {
        let mut any = false;
        while let Some(first) = self.key(s, true)? {
            let mut keys = vec![first];
            while s.match_smart(Comma, Smart::default())?.is_some() {
                if let Some(key) = self.key(s, false)? {
                    keys.push(key);
                }
            }
            let loc = keys[0].loc;
            self.block(
                s,
                loc,
                BlockOpts { decl: true, event: Some(Block::KeyframeRule { keys }), ..Default::default() },
            )?;
            any = true;
        }
        Ok(any)
    }

    /// `50%`, `from` or `to`
    fn key(&mut self, s: &mut TokenStream<'_>, optional: bool) -> CssResult<Option<Token>> {
        if let Some(tok) = s.match_smart(Pct, Smart::default())? {
            return Ok(Some(tok));
        }
        if let Some(tok) = s.match_smart(Ident, Smart::text(&FROM_TO))? {
            return Ok(Some(tok));
        }
        if optional {
            return Ok(None);
        }
        let next = s.grab();
        Err(s.failure("percentage%, \"from\", \"to\"", &next))
    }

    fn document(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        if self.depth > 0 {
            self.alarm(2, "Nested @document produces broken code", start.loc);
        }
        let mut functions = Vec::new();
        loop {
            let tok = expect(s, tt::DOC_FUNC)?;
            match tok.kind {
                Uri => functions.push(tok),
                Function => {
                    let func = self.function(s, tok, true)?;
                    if func.name.as_deref() == Some("regexp") {
                        functions.push(func);
                    } else {
                        self.alarm(1, "Unknown document function", func.loc);
                    }
                }
                _ => self.alarm(1, "Unknown document function", tok.loc),
            }
            if s.match_smart(Comma, Smart::default())?.is_none() {
                break;
            }
        }
        let block = Block::Document { functions };
        if !self.opts.top_doc_only {
            return self
                .block(
                    s,
                    start.loc,
                    BlockOpts { nest: true, globals: true, event: Some(block), ..Default::default() },
                )
                .map(drop);
        }
        expect(s, LBrace)?;
        self.fire(EventKind::Start(block.clone()), start.loc);
        s.skip_decl_block(true);
        expect(s, RBrace)?;
        let end = s.token().loc;
        self.fire(EventKind::End { block, empty: false }, end);
        Ok(())
    }

    /// `@scope (.start) to (.end) { }`
    fn scope_rule(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        let mut from = None;
        let mut to = None;
        if s.match_smart(LParen, Smart::default())?.is_some() {
            from = self.selectors_group(s, None, false, false)?;
            expect_reusing(s, RParen)?;
        }
        if s.match_smart(Ident, Smart::text(&TO))?.is_some() {
            expect(s, LParen)?;
            to = self.selectors_group(s, None, false, false)?;
            expect_reusing(s, RParen)?;
        }
        self.in_scope += 1;
        let res = self.block(
            s,
            start.loc,
            BlockOpts {
                decl: true,
                nest: true,
                event: Some(Block::Scope { start: from, end: to }),
                ..Default::default()
            },
        );
        self.in_scope -= 1;
        res.map(drop)
    }

    fn unknown_at(&mut self, s: &mut TokenStream<'_>, start: &Token) -> CssResult<()> {
        if self.opts.strict {
            return Err(CssError::parse_error(format!("Unknown rule: {}", start), start.loc));
        }
        s.skip_decl_block(false);
        Ok(())
    }
}

/// Consume the next token or fail
fn expect(s: &mut TokenStream<'_>, what: impl Into<Kinds>) -> CssResult<Token> {
    let what = what.into();
    match s.match_smart(what, Smart::OR_DIE)? {
        Some(tok) => Ok(tok),
        None => Err(s.fail(what)),
    }
}

/// Require the last consumed token to be `what`
fn expect_reusing(s: &mut TokenStream<'_>, what: TokenKind) -> CssResult<Token> {
    match s.match_smart(what, Smart::OR_DIE_REUSING)? {
        Some(tok) => Ok(tok),
        None => Err(s.fail(what)),
    }
}

/// Position just past `tok`
fn after(s: &TokenStream<'_>, tok: &Token) -> SourceLocation {
    let chars = s.text().get(tok.offset()..tok.end).map_or(0, |t| t.chars().count());
    SourceLocation::new(tok.line(), tok.col() + chars, tok.end)
}

fn combinator(tok: &Token) -> Combinator {
    Combinator {
        kind: CombinatorKind::from_text(&tok.text),
        loc: tok.loc,
        text: tok.text.clone(),
    }
}

/// Parse a standalone property value
pub fn parse_value(text: &str) -> CssResult<TokenValue> {
    let grammar = Grammar::new();
    let mut sink: Vec<Event> = Vec::new();
    let mut parser = Parser::new(&grammar, ParserOptions::default(), &mut sink);
    let mut s = TokenStream::new(text);
    let value = parser.expr(&mut s, Kinds::EMPTY, false)?;
    Ok(value.unwrap_or_else(|| TokenValue::empty(SourceLocation::new(1, 1, 0))))
}

/// Parse a standalone selector list such as `a > b, .c`
pub fn parse_selectors(text: &str) -> CssResult<Vec<Selector>> {
    let grammar = Grammar::new();
    let mut sink: Vec<Event> = Vec::new();
    let mut parser = Parser::new(&grammar, ParserOptions::default(), &mut sink);
    let mut s = TokenStream::new(text);
    let selectors = parser.selectors_group(&mut s, None, true, false)?;
    if !matches!(s.token().kind, Eof | LBrace) {
        return Err(s.fail(Goal::None));
    }
    match selectors {
        Some(selectors) => Ok(selectors),
        None => Err(s.fail("a selector")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> ParserOptions {
        ParserOptions {
            star_hack: true,
            underscore_hack: true,
            ie_filters: true,
            ..Default::default()
        }
    }

    fn parse_with(css: &str, opts: ParserOptions) -> Vec<Event> {
        let grammar = Grammar::new();
        let mut events: Vec<Event> = Vec::new();
        Parser::new(&grammar, opts, &mut events).parse(css).unwrap();
        events
    }

    fn parse(css: &str) -> Vec<Event> {
        parse_with(css, lenient())
    }

    fn names(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .map(|e| match &e.kind {
                EventKind::StartStylesheet => "startstylesheet".to_string(),
                EventKind::EndStylesheet => "endstylesheet".to_string(),
                EventKind::Start(b) => format!("start{}", b.name()),
                EventKind::End { block, .. } => format!("end{}", block.name()),
                EventKind::Property(_) => "property".to_string(),
                EventKind::Charset { .. } => "charset".to_string(),
                EventKind::Import { .. } => "import".to_string(),
                EventKind::Namespace { .. } => "namespace".to_string(),
                EventKind::Layer { .. } => "layer".to_string(),
                EventKind::SupportsSelector { .. } => "supportsselector".to_string(),
                EventKind::Error { .. } => "error".to_string(),
                EventKind::Warning { .. } => "warning".to_string(),
                EventKind::Info { .. } => "info".to_string(),
            })
            .collect()
    }

    fn decls(events: &[Event]) -> Vec<&Declaration> {
        events.iter().filter_map(Event::declaration).collect()
    }

    fn errors(events: &[Event]) -> Vec<&str> {
        events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Error { .. }))
            .filter_map(Event::message)
            .collect()
    }

    #[test]
    fn test_simple_rule() {
        let events = parse("a { color: red; }");
        assert_eq!(
            names(&events),
            ["startstylesheet", "startrule", "property", "endrule", "endstylesheet"]
        );
        let d = decls(&events)[0];
        assert_eq!(d.property.text, "color");
        assert_eq!(d.value.text, "red");
        assert!(d.invalid.is_none());
        assert!(!d.important);
        assert_eq!((events[2].line(), events[2].col()), (1, 5));
        match &events[3].kind {
            EventKind::End { empty, .. } => assert!(!empty),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rule_selectors() {
        let events = parse("ul > li, .x:hover { }");
        let EventKind::Start(Block::Rule { selectors }) = &events[1].kind else {
            panic!("expected a rule");
        };
        assert_eq!(selectors.len(), 2);
        assert_eq!(selectors[0].text, "ul > li");
        assert_eq!(selectors[1].text, ".x:hover");
        assert!(matches!(events[2].kind, EventKind::End { empty: true, .. }));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let events = parse("a{width:10xyz;foo:1}");
        let d = decls(&events);
        assert_eq!(d.len(), 2);
        assert!(d[0].invalid.as_ref().unwrap().message.starts_with("Expected"));
        assert_eq!(d[1].invalid.as_ref().unwrap().message, "Unknown property \"foo\".");
    }

    #[test]
    fn test_important() {
        let events = parse("a{color:red !important}");
        let d = decls(&events)[0];
        assert!(d.important);
        assert_eq!(d.value.text, "red");
    }

    #[test]
    fn test_property_hacks() {
        let events = parse("a{*zoom:1;_height:1px}");
        let d = decls(&events);
        assert_eq!(d[0].property.hack, Some('*'));
        assert_eq!(d[0].property.text, "zoom");
        assert_eq!(d[0].property.to_string(), "*zoom");
        assert_eq!(d[0].property.col(), 3);
        assert_eq!(d[1].property.hack, Some('_'));
        assert_eq!(d[1].property.to_string(), "_height");

        let events = parse_with("a{_height:1px}", ParserOptions::default());
        let d = decls(&events);
        assert_eq!(d[0].invalid.as_ref().unwrap().message, "Unknown property \"_height\".");
    }

    #[test]
    fn test_recovers_from_broken_declarations() {
        let events = parse("a{color:red;;b c;color:blue}");
        assert_eq!(errors(&events), ["Expected \"{\" but found \";\"."]);
        let d = decls(&events);
        assert_eq!(d.len(), 2);
        assert_eq!(d[1].value.text, "blue");
    }

    #[test]
    fn test_brace_in_value() {
        let events = parse("a{margin:0 {x}}");
        assert_eq!(errors(&events), ["Unexpected \"{\" in \"margin\" declaration."]);
        let err = events.iter().find(|e| e.message().is_some()).unwrap();
        assert_eq!(err.col(), 12);
        assert!(names(&events).contains(&"endrule".to_string()));
    }

    #[test]
    fn test_nested_rules() {
        let events = parse("a{color:red; &:hover{color:blue} .b{color:red} > i{color:red}}");
        assert!(errors(&events).is_empty(), "{:?}", errors(&events));
        let starts = names(&events).iter().filter(|n| *n == "startrule").count();
        assert_eq!(starts, 4);
        assert_eq!(decls(&events).len(), 4);
    }

    #[test]
    fn test_nested_selector_outside_rule() {
        let events = parse("&.x{color:red}");
        assert_eq!(errors(&events), ["Nested selector must be inside a style rule."]);
        assert_eq!(decls(&events).len(), 1);
    }

    #[test]
    fn test_media() {
        let events = parse("@media screen and (min-width: 100px), print { a{color:red} }");
        let EventKind::Start(Block::Media { media }) = &events[1].kind else {
            panic!("expected media");
        };
        assert_eq!(media.len(), 2);
        assert_eq!(media[0].media_type.as_deref(), Some("screen"));
        assert_eq!(media[0].features[0].text, "min-width");
        assert_eq!(media[0].features[0].expr.as_ref().unwrap().text, "100px");
        assert_eq!(media[0].text, "screen and (min-width: 100px)");
        assert_eq!(media[1].media_type.as_deref(), Some("print"));
        assert_eq!(
            names(&events)[1..6],
            ["startmedia", "startrule", "property", "endrule", "endmedia"]
        );
    }

    #[test]
    fn test_supports() {
        let events = parse("@supports (display:grid) and selector(a > b) { a{color:red} }");
        assert!(errors(&events).is_empty(), "{:?}", errors(&events));
        let d = decls(&events);
        assert!(d[0].in_parens);
        assert_eq!(d[0].property.text, "display");
        let sel = events
            .iter()
            .find_map(|e| match &e.kind {
                EventKind::SupportsSelector { selector } => Some(selector),
                _ => None,
            })
            .unwrap();
        assert_eq!(sel.text, "a > b");
    }

    #[test]
    fn test_import_and_globals() {
        let events = parse(
            "@charset \"utf-8\";\n@import url(x.css) layer(base) supports(display:grid) screen;\n\
             @namespace svg url(http://www.w3.org/2000/svg);",
        );
        match &events[1].kind {
            EventKind::Charset { charset } => assert_eq!(charset, "utf-8"),
            other => panic!("unexpected {:?}", other),
        }
        match &events[3].kind {
            EventKind::Import { uri, layer, media } => {
                assert_eq!(uri, "x.css");
                assert_eq!(layer.as_deref(), Some("base"));
                assert_eq!(media.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &events[4].kind {
            EventKind::Namespace { prefix, uri } => {
                assert_eq!(prefix.as_deref(), Some("svg"));
                assert_eq!(uri, "http://www.w3.org/2000/svg");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_misplaced_import() {
        let events = parse("a{} @import 'x.css'; b{}");
        assert_eq!(errors(&events), ["Unexpected \"@import\"."]);
        assert_eq!(names(&events).iter().filter(|n| *n == "startrule").count(), 2);
    }

    #[test]
    fn test_layers() {
        let events = parse("@layer a, b.c; @layer x, y { a{color:red} }");
        match &events[1].kind {
            EventKind::Layer { ids } => assert_eq!(ids, &["a", "b.c"]),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(events[2].message(), Some("@layer block cannot have multiple ids"));
        assert!(matches!(
            &events[3].kind,
            EventKind::Start(Block::Layer { id: Some(id) }) if id == "x"
        ));
    }

    #[test]
    fn test_keyframes() {
        let events = parse("@-webkit-keyframes spin { from {opacity:0} 50%, to {opacity:1} }");
        assert!(errors(&events).is_empty(), "{:?}", errors(&events));
        match &events[1].kind {
            EventKind::Start(Block::Keyframes { name, prefix }) => {
                assert_eq!(name, "spin");
                assert_eq!(prefix, "-webkit-");
            }
            other => panic!("unexpected {:?}", other),
        }
        let keys: Vec<usize> = events
            .iter()
            .filter_map(|e| match &e.kind {
                EventKind::Start(Block::KeyframeRule { keys }) => Some(keys.len()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, [1, 2]);
    }

    #[test]
    fn test_font_face_descriptors() {
        let events = parse("@font-face{font-display:swap;color:red}");
        let d = decls(&events);
        assert!(d[0].invalid.is_none());
        assert_eq!(d[0].scope, Some("font-face"));
        assert_eq!(d[1].invalid.as_ref().unwrap().message, "Misplaced property \"color\".");
    }

    #[test]
    fn test_page_margins() {
        let events = parse("@page :first { margin: 1in; @top-left { content: 'x' } }");
        assert!(errors(&events).is_empty(), "{:?}", errors(&events));
        assert!(matches!(
            &events[1].kind,
            EventKind::Start(Block::Page { id: None, pseudo: Some(p) }) if p == "first"
        ));
        assert!(events.iter().any(|e| matches!(
            &e.kind,
            EventKind::Start(Block::PageMargin { margin }) if margin == "top-left"
        )));
        assert!(parse("@page auto {}").iter().any(|e| e.message() == Some("Unexpected \"auto\".")));
    }

    #[test]
    fn test_document() {
        let events = parse("@-moz-document url(http://a), regexp(\"x\\\\.y\"), foo(bar) { a{color:red} }");
        let warnings: Vec<_> = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Warning { .. }))
            .filter_map(Event::message)
            .collect();
        assert_eq!(warnings, ["Unknown document function"]);
        match &events[2].kind {
            EventKind::Start(Block::Document { functions }) => {
                assert_eq!(functions.len(), 2);
                assert_eq!(functions[1].text, "regexp(\"x\\\\.y\")");
            }
            other => panic!("unexpected {:?}", other),
        }
        let events = parse("@media print { @document url(a) { } }");
        assert_eq!(errors(&events), ["Nested @document produces broken code"]);
    }

    #[test]
    fn test_top_doc_only() {
        let opts = ParserOptions { top_doc_only: true, ..lenient() };
        let events = parse_with("@-moz-document domain(a.com) { a { color: red } } b{color:red}", opts);
        assert_eq!(
            names(&events),
            ["startstylesheet", "startdocument", "enddocument", "endstylesheet"]
        );
    }

    #[test]
    fn test_globals_only() {
        let opts = ParserOptions { globals_only: true, ..lenient() };
        let events = parse_with("@import 'a.css'; a{color:red}", opts);
        assert_eq!(names(&events), ["startstylesheet", "import", "endstylesheet"]);
    }

    #[test]
    fn test_hex_color_warning() {
        let events = parse("a{color:#ggg;background:#fff}");
        let warnings: Vec<_> = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Warning { .. }))
            .filter_map(Event::message)
            .collect();
        assert_eq!(warnings, ["Expected a hex color but found \"#ggg\"."]);
        assert!(decls(&events)[1].invalid.is_none());
    }

    #[test]
    fn test_placeholders_are_not_validated() {
        let events = parse("a{color:/*[[c]]*/}");
        let d = decls(&events)[0];
        assert!(d.value.is_var);
        assert!(d.invalid.is_none());
    }

    #[test]
    fn test_custom_properties() {
        let events = parse("a{--x: { any } ;--y:}");
        assert!(errors(&events).is_empty(), "{:?}", errors(&events));
        let d = decls(&events);
        assert_eq!(d[0].value.text, "{ any }");
        assert!(d[1].value.is_empty());
    }

    #[test]
    fn test_scope() {
        let events = parse("@scope (.card) to (.content) { img { color: red } & > p {color:red} }");
        assert!(errors(&events).is_empty(), "{:?}", errors(&events));
        match &events[1].kind {
            EventKind::Start(Block::Scope { start, end }) => {
                assert_eq!(start.as_ref().unwrap()[0].text, ".card");
                assert_eq!(end.as_ref().unwrap()[0].text, ".content");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_block() {
        let events = parse("a{color:red");
        assert_eq!(errors(&events), ["Expected \"}\" but found \"\"."]);
        assert!(!names(&events).contains(&"endrule".to_string()));
    }

    #[test]
    fn test_strict_mode_stops() {
        let grammar = Grammar::new();
        let mut events: Vec<Event> = Vec::new();
        let opts = ParserOptions { strict: true, ..Default::default() };
        let err = Parser::new(&grammar, opts, &mut events).parse("a{} }").unwrap_err();
        assert_eq!(err.message(), "Unexpected \"}\".");
    }

    #[test]
    fn test_value_classification() {
        let v = parse_value("red foo #abc none [a b] rgb(1 2) var(--x)").unwrap();
        let tys: Vec<ValueType> = v.parts.iter().map(|p| p.ty).collect();
        assert_eq!(tys[..4], [ValueType::Color, ValueType::Ident, ValueType::Color, ValueType::Ident]);
        assert!(v.parts[3].is_none);
        assert_eq!(v.parts[4].ty, ValueType::Block);
        assert_eq!(v.parts[4].text, "[a b]");
        assert_eq!(v.parts[5].expr.as_ref().unwrap().text, "1 2");
        assert!(v.parts[6].is_var);
        assert!(v.is_var);
        assert!(parse_value("calc(1px + 2%)").unwrap().parts[0].is_calc);
    }

    #[test]
    fn test_options_from_json() {
        let opts: ParserOptions = serde_json::from_str(r#"{"star_hack": true}"#).unwrap();
        assert!(opts.star_hack);
        assert!(!opts.strict);
    }
}
