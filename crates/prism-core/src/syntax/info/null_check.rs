//! Null-check recognizer

use crate::syntax::ast::{AstNode, BinaryExpr, Literal, ParenExpr};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// Whether the check asserts null or not-null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullCheckPolarity {
    /// `x == null`
    IsNull,
    /// `x != null`
    IsNotNull,
}

/// Canonical decomposition of a null-check expression.
///
/// Matches `<expr> == null`, `<expr> != null`, and the flipped operand
/// order `null == <expr>`; parentheses around the whole check are looked
/// through.
#[derive(Debug, Clone)]
pub struct NullCheckInfo {
    /// The expression being compared against `null`.
    pub checked: SyntaxNode,
    pub polarity: NullCheckPolarity,
    /// The whole comparison expression.
    pub node: SyntaxNode,
}

impl NullCheckInfo {
    pub fn from_expr(expr: &SyntaxNode) -> Option<Self> {
        let expr = peel_parens(expr.clone())?;
        let binary = BinaryExpr::cast(expr.clone())?;
        let polarity = match binary.op_kind()? {
            SyntaxKind::EqEq => NullCheckPolarity::IsNull,
            SyntaxKind::NotEq => NullCheckPolarity::IsNotNull,
            _ => return None,
        };

        let lhs = binary.lhs()?;
        let rhs = binary.rhs()?;
        let checked = match (is_null_literal(&lhs), is_null_literal(&rhs)) {
            (false, true) => lhs,
            (true, false) => rhs,
            // `null == null` and `x == y` are not null checks.
            _ => return None,
        };

        Some(Self { checked, polarity, node: expr })
    }
}

fn peel_parens(mut expr: SyntaxNode) -> Option<SyntaxNode> {
    while let Some(paren) = ParenExpr::cast(expr.clone()) {
        expr = paren.inner()?;
    }
    Some(expr)
}

fn is_null_literal(expr: &SyntaxNode) -> bool {
    Literal::cast(expr.clone())
        .and_then(|l| l.token())
        .is_some_and(|t| t.kind() == SyntaxKind::NullKw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    fn condition_of(source: &str) -> SyntaxNode {
        let root = parse(source).root();
        let if_stmt = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::IfStmt)
            .unwrap();
        crate::syntax::ast::IfStmt::cast(if_stmt)
            .unwrap()
            .condition()
            .unwrap()
    }

    #[test]
    fn matches_eq_null() {
        let cond = condition_of("class C { void M() { if (x == null) { } } }");
        let info = NullCheckInfo::from_expr(&cond).unwrap();
        assert_eq!(info.polarity, NullCheckPolarity::IsNull);
        assert_eq!(info.checked.text().to_string(), "x");
    }

    #[test]
    fn matches_flipped_operands() {
        let cond = condition_of("class C { void M() { if (null != Get()) { } } }");
        let info = NullCheckInfo::from_expr(&cond).unwrap();
        assert_eq!(info.polarity, NullCheckPolarity::IsNotNull);
        assert_eq!(info.checked.text().to_string(), "Get()");
    }

    #[test]
    fn looks_through_parens() {
        let cond = condition_of("class C { void M() { if ((x == null)) { } } }");
        assert!(NullCheckInfo::from_expr(&cond).is_some());
    }

    #[test]
    fn rejects_non_null_comparison() {
        let cond = condition_of("class C { void M() { if (x == y) { } } }");
        assert!(NullCheckInfo::from_expr(&cond).is_none());

        let cond = condition_of("class C { void M() { if (null == null) { } } }");
        assert!(NullCheckInfo::from_expr(&cond).is_none());
    }
}
