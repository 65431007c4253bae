//! Diagnostic types produced by analyzer rules

use std::collections::BTreeMap;
use std::path::PathBuf;

use rowan::TextRange;
use serde::{Deserialize, Serialize};

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span
    pub length: usize,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            line: 0,
            column: 0,
            offset: 0,
            length: 0,
        }
    }
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset,
            length,
        }
    }

    /// Resolve a byte range against the source text it was produced from.
    pub fn from_range(file: impl Into<PathBuf>, text: &str, range: TextRange) -> Self {
        let offset = usize::from(range.start()).min(text.len());
        let before = &text[..offset];
        let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
        let column = before.rfind('\n').map_or(offset + 1, |nl| offset - nl);
        Self {
            file: file.into(),
            line,
            column,
            offset,
            length: range.len().into(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Represents one finding reported by an analyzer rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique identifier for the rule that generated this diagnostic
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Location in the source file
    pub location: Location,
    /// Primary span in the syntax tree
    #[serde(skip, default = "empty_range")]
    pub range: TextRange,
    /// Secondary spans a renderer should de-emphasize (code the rewrite
    /// would remove)
    #[serde(skip, default)]
    pub fade_out_ranges: Vec<TextRange>,
    /// Rule-specific string properties carried alongside the finding
    pub metadata: BTreeMap<String, String>,
}

fn empty_range() -> TextRange {
    TextRange::empty(0.into())
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
        range: TextRange,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            range,
            fade_out_ranges: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a rule-specific property
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Mark a secondary span for de-emphasis in rendering
    pub fn with_fade_out(mut self, range: TextRange) -> Self {
        self.fade_out_ranges.push(range);
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
