//! Symbols: resolved identities of named program entities
//!
//! Symbol equality is identity equality on [`SymbolId`]; two syntax
//! occurrences refer to the same declaration exactly when they resolve to
//! the same id. This is the basis of every "is this the same variable"
//! check in rewrite-safety analysis.

use rowan::TextRange;
use serde::{Deserialize, Serialize};

/// Opaque identity of a symbol within one [`super::SemanticModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    Method,
    Field,
    Local,
    Param,
    Enum,
    EnumMember,
}

/// Declared accessibility of a member, if any was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Public,
    Private,
    Internal,
    Protected,
}

impl Accessibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Private => "private",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
        }
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        let access = match text {
            "public" => Accessibility::Public,
            "private" => Accessibility::Private,
            "internal" => Accessibility::Internal,
            "protected" => Accessibility::Protected,
            _ => return None,
        };
        Some(access)
    }
}

/// A named program entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    /// Containing symbol (class for members, method for locals/params).
    pub container: Option<SymbolId>,
    pub accessibility: Option<Accessibility>,
    pub is_static: bool,
    /// Declared type text, where the declaration has one (fields, locals,
    /// params: the annotation; methods: the return type).
    pub declared_type: Option<String>,
    /// Span of the declaring node in its source file.
    #[serde(skip, default = "default_range")]
    pub decl_range: TextRange,
}

fn default_range() -> TextRange {
    TextRange::empty(0.into())
}

impl Symbol {
    pub fn is_local(&self) -> bool {
        self.kind == SymbolKind::Local
    }

    pub fn is_type(&self) -> bool {
        matches!(self.kind, SymbolKind::Class | SymbolKind::Enum)
    }
}
