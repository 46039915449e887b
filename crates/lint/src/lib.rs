//! Stylint lint engine
//!
//! CSSLint-style rules on top of the `stylint-css` parser: a [`Ruleset`]
//! picks the rules and their severities, `/* csslint ... */` comments in
//! the sheet adjust it, and [`verify`] returns the sorted [`Report`].

pub mod engine;
pub mod error;
pub mod overrides;
pub mod reporter;
pub mod rules;
pub mod ruleset;

pub use engine::Engine;
pub use error::{LintError, LintResult};
pub use overrides::Overrides;
pub use reporter::{Message, MessageKind, Report};
pub use rules::{Rule, RuleInfo, RULES};
pub use ruleset::{Ruleset, Severity};

/// Lint `text` once, without a block cache kept around
pub fn verify(text: &str, ruleset: &Ruleset) -> Report {
    Engine::new().verify(text, ruleset)
}
