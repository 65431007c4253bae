//! Error types for parsing, analysis, and rewriting

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for syntax analysis and rewrite operations
#[derive(Debug, Error)]
pub enum PrismError {
    /// Source text did not parse cleanly
    #[error("Parse error: {message} at {location}")]
    Parse {
        message: String,
        location: Box<crate::diagnostics::Location>,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Rule registration or execution errors
    #[error("Rule error in '{rule_id}': {message}")]
    Rule { rule_id: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Binder or symbol-resolution errors
    #[error("Semantic error: {message}")]
    Semantic { message: String },

    /// A tree edit could not be applied without breaking an invariant;
    /// the original tree is left untouched.
    #[error("Rewrite aborted: {message}")]
    Rewrite { message: String },

    /// Analysis was cancelled through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Rule,
    Io,
    Semantic,
    Rewrite,
    Cancelled,
    Internal,
}

impl PrismError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrismError::Parse { .. } => ErrorKind::Parse,
            PrismError::Config { .. } => ErrorKind::Config,
            PrismError::Rule { .. } => ErrorKind::Rule,
            PrismError::Io { .. } => ErrorKind::Io,
            PrismError::Semantic { .. } => ErrorKind::Semantic,
            PrismError::Rewrite { .. } => ErrorKind::Rewrite,
            PrismError::Cancelled => ErrorKind::Cancelled,
            PrismError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (other documents can still be
    /// analyzed after it)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Rule | ErrorKind::Semantic | ErrorKind::Rewrite
        )
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, location: crate::diagnostics::Location) -> Self {
        Self::Parse {
            message: message.into(),
            location: Box::new(location),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a semantic error
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic {
            message: message.into(),
        }
    }

    /// Create a rewrite error
    pub fn rewrite(message: impl Into<String>) -> Self {
        Self::Rewrite {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
