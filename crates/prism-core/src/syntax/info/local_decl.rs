//! Single-declarator local declaration recognizer

use crate::syntax::ast::{AstNode, LocalDecl, TypeRef};
use crate::syntax::{SyntaxNode, SyntaxToken};

/// A local declaration `T name;` or `T name = init;`.
#[derive(Debug, Clone)]
pub struct SingleLocalDeclInfo {
    pub statement: SyntaxNode,
    pub ty: TypeRef,
    pub name_token: SyntaxToken,
    /// Initializer expression, if the declaration has one.
    pub initializer: Option<SyntaxNode>,
}

impl SingleLocalDeclInfo {
    pub fn from_statement(statement: &SyntaxNode) -> Option<Self> {
        let decl = LocalDecl::cast(statement.clone())?;
        Some(Self {
            statement: statement.clone(),
            ty: decl.ty()?,
            name_token: decl.name_token()?,
            initializer: decl.initializer().and_then(|init| init.value()),
        })
    }

    pub fn name(&self) -> &str {
        self.name_token.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxKind;
    use crate::syntax::parser::parse;

    fn first_statement(source: &str) -> SyntaxNode {
        let root = parse(source).root();
        root.descendants()
            .find(|n| n.kind() == SyntaxKind::Block)
            .unwrap()
            .children()
            .find(|n| n.kind().is_statement())
            .unwrap()
    }

    #[test]
    fn matches_with_initializer() {
        let stmt = first_statement("class C { void M() { int y = GetValue(); } }");
        let info = SingleLocalDeclInfo::from_statement(&stmt).unwrap();
        assert_eq!(info.name(), "y");
        assert_eq!(info.ty.text().as_deref(), Some("int"));
        assert_eq!(info.initializer.as_ref().unwrap().text().to_string(), "GetValue()");
    }

    #[test]
    fn matches_without_initializer() {
        let stmt = first_statement("class C { void M() { Foo f; } }");
        let info = SingleLocalDeclInfo::from_statement(&stmt).unwrap();
        assert_eq!(info.name(), "f");
        assert!(info.initializer.is_none());
    }

    #[test]
    fn rejects_non_declaration() {
        let stmt = first_statement("class C { void M() { y = 5; } }");
        assert!(SingleLocalDeclInfo::from_statement(&stmt).is_none());
    }
}
