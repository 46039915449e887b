//! Lint error types

use thiserror::Error;

/// Lint configuration result type
pub type LintResult<T> = Result<T, LintError>;

/// Errors loading a ruleset
#[derive(Debug, Error)]
pub enum LintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ruleset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown severity \"{0}\"")]
    UnknownSeverity(String),
}
