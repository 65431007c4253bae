//! Switch-section recognizer and body-equivalence check

use crate::syntax::ast::{AstNode, SwitchSection};
use crate::syntax::{SyntaxNode, trivia};

/// Labels and statements of one switch section.
#[derive(Debug, Clone)]
pub struct SwitchSectionInfo {
    pub section: SyntaxNode,
    pub labels: Vec<SyntaxNode>,
    pub statements: Vec<SyntaxNode>,
}

impl SwitchSectionInfo {
    pub fn from_section(section: &SyntaxNode) -> Option<Self> {
        let typed = SwitchSection::cast(section.clone())?;
        let labels: Vec<_> = typed.labels().collect();
        if labels.is_empty() {
            return None;
        }
        Some(Self {
            section: section.clone(),
            labels,
            statements: typed.statements().collect(),
        })
    }

    /// True if the section body ends in `break;` (the only shape whose
    /// statements can be dropped in favor of falling through).
    pub fn ends_with_break(&self) -> bool {
        self.statements
            .last()
            .is_some_and(|s| s.kind() == crate::syntax::SyntaxKind::BreakStmt)
    }

    pub fn contains_directive(&self) -> bool {
        trivia::contains_directive(&self.section)
    }
}

/// Token-for-token equivalence of two section bodies, ignoring labels and
/// trivia.
pub fn sections_equivalent(first: &SwitchSectionInfo, second: &SwitchSectionInfo) -> bool {
    if first.statements.len() != second.statements.len() {
        return false;
    }
    first
        .statements
        .iter()
        .zip(&second.statements)
        .all(|(a, b)| crate::syntax::structurally_equal(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxKind;
    use crate::syntax::parser::parse;

    fn sections(source: &str) -> Vec<SwitchSectionInfo> {
        parse(source)
            .root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::SwitchSection)
            .map(|s| SwitchSectionInfo::from_section(&s).unwrap())
            .collect()
    }

    #[test]
    fn equivalent_bodies_ignoring_labels_and_layout() {
        let infos = sections(
            "class C { void M() { switch (x) {\
             case 1: y = 1; break;\
             case 2:\n  y = 1;\n  break;\
             case 3: y = 2; break; } } }",
        );
        assert_eq!(infos.len(), 3);
        assert!(sections_equivalent(&infos[0], &infos[1]));
        assert!(!sections_equivalent(&infos[0], &infos[2]));
        assert!(infos[0].ends_with_break());
    }

    #[test]
    fn statement_count_mismatch() {
        let infos = sections(
            "class C { void M() { switch (x) { case 1: y = 1; break; case 2: break; } } }",
        );
        assert!(!sections_equivalent(&infos[0], &infos[1]));
    }
}
