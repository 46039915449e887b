//! Stylint CSS engine
//!
//! Tokenizer, value grammar matcher and event-driven stylesheet parser with
//! an incremental block cache.

pub mod bucket;
pub mod cache;
pub mod error;
pub mod event;
pub mod grammar;
pub mod matcher;
pub mod parser;
pub mod selector;
pub mod source;
pub mod token;
pub mod tokenizer;
pub mod validation;

pub use cache::BlockCache;
pub use error::{CssError, CssResult, SourceLocation};
pub use event::{Block, Declaration, Event, EventKind, Listener, MediaQuery};
pub use grammar::Grammar;
pub use parser::{parse_selectors, parse_value, ParseStats, Parser, ParserOptions};
pub use selector::Selector;
pub use source::split_lines;
pub use token::{Token, TokenKind, TokenValue};
