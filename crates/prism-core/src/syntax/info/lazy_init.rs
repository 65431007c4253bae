//! Lazy-initialization recognizer
//!
//! Matches the two-statement shape
//!
//! ```text
//! if (x == null) { x = <init>; }
//! return x;
//! ```
//!
//! (with or without the block around the assignment), which rewrites to
//! `return x ?? (x = <init>);`. Built by composing the null-check and
//! simple-assignment matchers.

use super::null_check::{NullCheckInfo, NullCheckPolarity};
use super::assignment::SimpleAssignmentInfo;
use crate::syntax::ast::{AstNode, IfStmt, ReturnStmt};
use crate::syntax::{SyntaxNode, structurally_equal, trivia};

/// Decomposition of a matched lazy-initialization shape.
#[derive(Debug, Clone)]
pub struct LazyInitInfo {
    pub if_statement: SyntaxNode,
    pub return_statement: SyntaxNode,
    /// The lazily initialized expression (`x`).
    pub target: SyntaxNode,
    /// The initializer (`<init>`).
    pub initializer: SyntaxNode,
}

impl LazyInitInfo {
    pub fn from_if_statement(statement: &SyntaxNode) -> Option<Self> {
        let if_stmt = IfStmt::cast(statement.clone())?;
        if if_stmt.else_clause().is_some() {
            return None;
        }

        let null_check = NullCheckInfo::from_expr(&if_stmt.condition()?)?;
        if null_check.polarity != NullCheckPolarity::IsNull {
            return None;
        }

        let assignment =
            SimpleAssignmentInfo::from_statement(&if_stmt.single_then_statement()?)?;
        if !structurally_equal(&assignment.lhs, &null_check.checked) {
            return None;
        }

        // The statement after the `if` must return the same expression.
        let return_statement = statement.next_sibling()?;
        let ret = ReturnStmt::cast(return_statement.clone())?;
        if !structurally_equal(&ret.value()?, &null_check.checked) {
            return None;
        }

        // Directive safety: the rewrite collapses both statements, so a
        // directive anywhere inside either of them blocks the match.
        if trivia::contains_directive(statement)
            || trivia::contains_directive(&return_statement)
        {
            return None;
        }
        if let Some(between) = trivia::trivia_between(statement, &return_statement)
            && between.iter().any(|t| t.kind().is_directive())
        {
            return None;
        }

        Some(Self {
            if_statement: statement.clone(),
            return_statement,
            target: null_check.checked,
            initializer: assignment.rhs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxKind;
    use crate::syntax::parser::parse;

    fn first_if(source: &str) -> SyntaxNode {
        parse(source)
            .root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::IfStmt)
            .unwrap()
    }

    #[test]
    fn matches_block_form() {
        let if_stmt =
            first_if("class C { Foo M() { if (x == null) { x = new Foo(); } return x; } }");
        let info = LazyInitInfo::from_if_statement(&if_stmt).unwrap();
        assert_eq!(info.target.text().to_string(), "x");
        assert_eq!(info.initializer.text().to_string(), "new Foo()");
    }

    #[test]
    fn matches_unbraced_form() {
        let if_stmt =
            first_if("class C { Foo M() { if (x == null) x = new Foo(); return x; } }");
        assert!(LazyInitInfo::from_if_statement(&if_stmt).is_some());
    }

    #[test]
    fn rejects_different_target() {
        let if_stmt =
            first_if("class C { Foo M() { if (x == null) { y = new Foo(); } return x; } }");
        assert!(LazyInitInfo::from_if_statement(&if_stmt).is_none());
    }

    #[test]
    fn rejects_not_null_polarity() {
        let if_stmt =
            first_if("class C { Foo M() { if (x != null) { x = new Foo(); } return x; } }");
        assert!(LazyInitInfo::from_if_statement(&if_stmt).is_none());
    }

    #[test]
    fn rejects_else_clause() {
        let if_stmt = first_if(
            "class C { Foo M() { if (x == null) { x = new Foo(); } else { x = y; } return x; } }",
        );
        assert!(LazyInitInfo::from_if_statement(&if_stmt).is_none());
    }

    #[test]
    fn rejects_return_of_other_expression() {
        let if_stmt =
            first_if("class C { Foo M() { if (x == null) { x = new Foo(); } return y; } }");
        assert!(LazyInitInfo::from_if_statement(&if_stmt).is_none());
    }

    #[test]
    fn directive_in_span_blocks_match() {
        let if_stmt = first_if(
            "class C { Foo M() { if (x == null) {\n#if DEBUG\n x = new Foo();\n#endif\n } return x; } }",
        );
        assert!(LazyInitInfo::from_if_statement(&if_stmt).is_none());
    }
}
