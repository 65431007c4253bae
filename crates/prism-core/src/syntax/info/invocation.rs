//! Member-invocation recognizer

use crate::syntax::ast::{ArgList, AstNode, InvocationExpr, MemberAccessExpr};
use crate::syntax::{SyntaxNode, SyntaxToken};

/// An invocation through a member access: `<receiver>.<name>(<args>)`.
#[derive(Debug, Clone)]
pub struct MemberInvocationInfo {
    pub receiver: SyntaxNode,
    pub name_token: SyntaxToken,
    pub arg_list: ArgList,
    /// The whole `InvocationExpr`.
    pub node: SyntaxNode,
}

impl MemberInvocationInfo {
    pub fn from_expr(expr: &SyntaxNode) -> Option<Self> {
        let invocation = InvocationExpr::cast(expr.clone())?;
        let access = MemberAccessExpr::cast(invocation.callee()?)?;
        Some(Self {
            receiver: access.receiver()?,
            name_token: access.name_token()?,
            arg_list: invocation.arg_list()?,
            node: expr.clone(),
        })
    }

    pub fn name(&self) -> &str {
        self.name_token.text()
    }

    /// Walk a chain outside-in: `a.B().C()` yields the `C` invocation, then
    /// the `B` invocation.
    pub fn chain(expr: &SyntaxNode) -> Vec<MemberInvocationInfo> {
        let mut links = Vec::new();
        let mut cursor = expr.clone();
        while let Some(info) = MemberInvocationInfo::from_expr(&cursor) {
            cursor = info.receiver.clone();
            links.push(info);
        }
        links
    }
}
