//! Parser events
//!
//! The parser does not build a tree. It reports what it recognizes as a
//! flat sequence of [`Event`]s delivered to a [`Listener`], so lint rules
//! can keep their own state and the block cache can record and replay
//! whole `{}` blocks.

use crate::error::SourceLocation;
use crate::selector::Selector;
use crate::token::{Token, TokenValue};
use crate::validation::Invalid;

/// A `{}` block the parser entered or left
#[derive(Debug, Clone)]
pub enum Block {
    /// Style rule
    Rule { selectors: Vec<Selector> },
    Media { media: Vec<MediaQuery> },
    Supports,
    Container { name: Option<String> },
    /// `@layer name { }`
    Layer { id: Option<String> },
    /// `@-moz-document`; holds the `url()`, `url-prefix()`, `domain()` and `regexp()` tokens
    Document { functions: Vec<Token> },
    Keyframes { name: String, prefix: String },
    /// One keyframe selector list inside `@keyframes`
    KeyframeRule { keys: Vec<Token> },
    FontFace,
    FontPaletteValues { id: String },
    Page { id: Option<String>, pseudo: Option<String> },
    /// `@top-left` and other margin boxes inside `@page`
    PageMargin { margin: String },
    Property { name: String },
    Scope {
        start: Option<Vec<Selector>>,
        end: Option<Vec<Selector>>,
    },
    CounterStyle { name: String },
}

impl Block {
    /// Event name without the `start`/`end` prefix
    pub fn name(&self) -> &'static str {
        match self {
            Block::Rule { .. } => "rule",
            Block::Media { .. } => "media",
            Block::Supports => "supports",
            Block::Container { .. } => "container",
            Block::Layer { .. } => "layer",
            Block::Document { .. } => "document",
            Block::Keyframes { .. } => "keyframes",
            Block::KeyframeRule { .. } => "keyframerule",
            Block::FontFace => "fontface",
            Block::FontPaletteValues { .. } => "fontpalettevalues",
            Block::Page { .. } => "page",
            Block::PageMargin { .. } => "pagemargin",
            Block::Property { .. } => "property",
            Block::Scope { .. } => "scope",
            Block::CounterStyle { .. } => "counterstyle",
        }
    }

    /// Blocks holding declarations that rules track one at a time
    pub fn is_rule_like(&self) -> bool {
        matches!(
            self,
            Block::Rule { .. }
                | Block::Media { .. }
                | Block::Supports
                | Block::Container { .. }
                | Block::KeyframeRule { .. }
                | Block::FontFace
                | Block::Page { .. }
                | Block::PageMargin { .. }
        )
    }
}

/// One query of a media query list: `not screen and (min-width: 1px)`
#[derive(Debug, Clone)]
pub struct MediaQuery {
    /// `not` or `only`
    pub modifier: Option<String>,
    pub media_type: Option<String>,
    /// Feature names, each with its value in `expr`
    pub features: Vec<Token>,
    pub loc: SourceLocation,
    pub text: String,
}

/// A `prop: value` declaration
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Property name; `hack` is set for `*prop` and `_prop`
    pub property: Token,
    pub value: TokenValue,
    pub important: bool,
    /// Inside a condition such as `@supports (display: grid)`
    pub in_parens: bool,
    /// Why the value does not match the grammar of the property
    pub invalid: Option<Invalid>,
    /// Descriptor table the declaration was checked against
    pub scope: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub enum EventKind {
    StartStylesheet,
    EndStylesheet,
    Start(Block),
    End { block: Block, empty: bool },
    Property(Box<Declaration>),
    Charset { charset: String },
    Import {
        uri: String,
        layer: Option<String>,
        media: Vec<MediaQuery>,
    },
    Namespace { prefix: Option<String>, uri: String },
    /// `@layer a, b;`
    Layer { ids: Vec<String> },
    /// `selector()` inside an `@supports` condition
    SupportsSelector { selector: Selector },
    Error { message: String, recoverable: bool },
    Warning { message: String },
    Info { message: String },
}

/// Something the parser recognized, at the position it starts
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub loc: SourceLocation,
}

impl Event {
    pub fn new(kind: EventKind, loc: SourceLocation) -> Self {
        Self { kind, loc }
    }

    pub fn line(&self) -> usize {
        self.loc.line
    }

    pub fn col(&self) -> usize {
        self.loc.column
    }

    /// The declaration carried by a `property` event
    pub fn declaration(&self) -> Option<&Declaration> {
        match &self.kind {
            EventKind::Property(decl) => Some(decl),
            _ => None,
        }
    }

    /// Message of an error, warning or info event
    pub fn message(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Error { message, .. }
            | EventKind::Warning { message }
            | EventKind::Info { message } => Some(message),
            _ => None,
        }
    }
}

/// Receiver of parser events
pub trait Listener {
    fn on_event(&mut self, event: &Event);
}

impl Listener for Vec<Event> {
    fn on_event(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names() {
        assert_eq!(Block::FontFace.name(), "fontface");
        assert_eq!(Block::KeyframeRule { keys: Vec::new() }.name(), "keyframerule");
        assert!(Block::Supports.is_rule_like());
        assert!(!Block::Layer { id: None }.is_rule_like());
    }

    #[test]
    fn test_collecting_listener() {
        let event = Event::new(
            EventKind::Warning { message: "careful".into() },
            SourceLocation::new(2, 3, 10),
        );
        let mut seen: Vec<Event> = Vec::new();
        seen.on_event(&event);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message(), Some("careful"));
        assert_eq!((seen[0].line(), seen[0].col()), (2, 3));
    }
}
