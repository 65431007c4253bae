//! Prism Core
//!
//! Core analysis engine: lossless syntax trees, the semantic binder, and
//! the trivia-preserving rewrite machinery. This crate carries everything
//! needed to parse a source file, reason about its symbols and constants,
//! and produce an edited tree; the rule surface on top of it lives in
//! `prism-rules`.

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod result;
pub mod rewrite;
pub mod semantic;
pub mod syntax; // Concrete Syntax Tree (lossless, Rowan-based)

// Re-export commonly used types
pub use config::{PrismConfig, RuleSeverity};
pub use diagnostics::{Diagnostic, Location, Severity};
pub use document::Document;
pub use error::{ErrorKind, PrismError};
pub use result::{Result, ResultExt};
pub use rewrite::{Rewritten, factory, preview};
pub use semantic::{
    Accessibility, ConstantValue, FlagsMember, SemanticModel, Symbol, SymbolId, SymbolKind,
    UnderlyingWidth, WellKnownNames, decompose,
};
pub use syntax::{
    Parse, PrismLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, parse,
    structurally_equal,
};
