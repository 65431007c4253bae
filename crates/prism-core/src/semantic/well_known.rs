//! Well-known name lookup
//!
//! A read-only table mapping canonical qualified names (`Type` or
//! `Type.Member`) to symbol ids. It is built once while the semantic model
//! is constructed and threaded explicitly into whatever needs it; there is
//! no ambient global registry.

use dashmap::DashMap;

use super::symbol::SymbolId;

/// Process-initialized, read-only qualified-name index.
#[derive(Debug, Default)]
pub struct WellKnownNames {
    by_qualified_name: DashMap<String, SymbolId>,
}

impl WellKnownNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, qualified_name: impl Into<String>, id: SymbolId) {
        self.by_qualified_name.insert(qualified_name.into(), id);
    }

    /// Resolve a canonical qualified name like `Widget` or `Widget.Run`.
    pub fn resolve(&self, qualified_name: &str) -> Option<SymbolId> {
        self.by_qualified_name.get(qualified_name).map(|entry| *entry)
    }

    /// Does `id` come from the declaration with this qualified name?
    pub fn matches(&self, id: SymbolId, qualified_name: &str) -> bool {
        self.resolve(qualified_name) == Some(id)
    }

    pub fn len(&self) -> usize {
        self.by_qualified_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_qualified_name.is_empty()
    }
}
