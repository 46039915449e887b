//! CSS parsing error types

use std::fmt;
use thiserror::Error;

/// CSS parsing result type
pub type CssResult<T> = Result<T, CssError>;

/// Source location in CSS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// CSS parsing errors
#[derive(Debug, Clone, Error)]
pub enum CssError {
    /// Malformed input the parser may recover from
    #[error("{message} at {location}")]
    Syntax {
        message: String,
        location: SourceLocation,
        recoverable: bool,
    },

    /// The token stream was asked to step back further than its buffer
    #[error("Too much lookahead. at {location}")]
    Lookahead {
        location: SourceLocation,
    },

    /// A grammar string in the value tables could not be compiled
    #[error("Internal grammar error: {message} in \"{grammar}\"")]
    Grammar {
        grammar: String,
        message: String,
    },
}

impl CssError {
    /// Get the source location of this error
    pub fn location(&self) -> SourceLocation {
        match self {
            Self::Syntax { location, .. } => *location,
            Self::Lookahead { location } => *location,
            Self::Grammar { .. } => SourceLocation::default(),
        }
    }

    /// The bare message, without the location suffix
    pub fn message(&self) -> String {
        match self {
            Self::Syntax { message, .. } => message.clone(),
            Self::Lookahead { .. } => "Too much lookahead.".to_string(),
            Self::Grammar { .. } => self.to_string(),
        }
    }

    /// Whether the parser may skip ahead and continue
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::Syntax { message: message.into(), location, recoverable: true }
    }

    pub fn grammar(grammar: &str, message: impl Into<String>) -> Self {
        Self::Grammar { grammar: grammar.to_string(), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::new(10, 5, 100);
        assert_eq!(format!("{}", loc), "10:5");
    }

    #[test]
    fn test_error_display() {
        let loc = SourceLocation::new(1, 10, 9);
        let err = CssError::parse_error("Unexpected \"@\".", loc);
        assert_eq!(format!("{}", err), "Unexpected \"@\". at 1:10");
        assert_eq!(err.message(), "Unexpected \"@\".");
        assert!(err.is_syntax());
    }

    #[test]
    fn test_fatal_errors() {
        let err = CssError::Lookahead { location: SourceLocation::new(2, 3, 4) };
        assert!(!err.is_syntax());
        assert_eq!(err.location().line, 2);
        let err = CssError::grammar("<a> |", "unexpected end");
        assert!(err.to_string().starts_with("Internal grammar error"));
    }
}
