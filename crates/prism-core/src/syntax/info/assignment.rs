//! Simple-assignment recognizer

use crate::syntax::ast::{AssignExpr, AstNode, ExprStmt};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// An expression statement of the shape `<lhs> = <rhs>;`.
#[derive(Debug, Clone)]
pub struct SimpleAssignmentInfo {
    /// The whole `ExprStmt`.
    pub statement: SyntaxNode,
    pub lhs: SyntaxNode,
    pub rhs: SyntaxNode,
}

impl SimpleAssignmentInfo {
    /// Match a statement node. Compound shapes (`a = b = c`) are rejected;
    /// the rhs of a simple assignment must not itself be an assignment.
    pub fn from_statement(statement: &SyntaxNode) -> Option<Self> {
        let stmt = ExprStmt::cast(statement.clone())?;
        let assign = AssignExpr::cast(stmt.expr()?)?;
        let lhs = assign.lhs()?;
        let rhs = assign.rhs()?;
        if rhs.kind() == SyntaxKind::AssignExpr {
            return None;
        }
        Some(Self { statement: statement.clone(), lhs, rhs })
    }
}
