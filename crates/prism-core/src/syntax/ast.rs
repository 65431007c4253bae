//! Typed AST layer over the CST
//!
//! Ergonomic, type-safe wrappers over raw syntax nodes. Each wrapper casts
//! from a CST node via [`AstNode::cast`] and exposes the semantically
//! meaningful children; all accessors return `Option` because the tree may
//! be malformed, and a missing child is "no value", never a panic.

use super::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Casting trait connecting typed wrappers to raw CST nodes.
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn text_range(&self) -> rowan::TextRange {
        self.syntax().text_range()
    }
}

fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn first_expr(parent: &SyntaxNode) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind().is_expression())
}

fn nth_expr(parent: &SyntaxNode, n: usize) -> Option<SyntaxNode> {
    parent.children().filter(|c| c.kind().is_expression()).nth(n)
}

macro_rules! ast_node {
    ($(#[$attr:meta])* $name:ident, $kind:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self { syntax: node })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

// === declarations =========================================================

ast_node!(
    /// Root node of one parsed source file.
    SourceFile,
    SourceFile
);

impl SourceFile {
    pub fn classes(&self) -> impl Iterator<Item = ClassDecl> + '_ {
        self.syntax.children().filter_map(ClassDecl::cast)
    }

    pub fn enums(&self) -> impl Iterator<Item = EnumDecl> + '_ {
        self.syntax.children().filter_map(EnumDecl::cast)
    }
}

ast_node!(ClassDecl, ClassDecl);

impl ClassDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        self.syntax.children().find_map(ModifierList::cast)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDecl> + '_ {
        self.syntax.children().filter_map(MethodDecl::cast)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + '_ {
        self.syntax.children().filter_map(FieldDecl::cast)
    }

    pub fn enums(&self) -> impl Iterator<Item = EnumDecl> + '_ {
        self.syntax.children().filter_map(EnumDecl::cast)
    }

    /// Member declarations in declaration order.
    pub fn members(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::MethodDecl | SyntaxKind::FieldDecl | SyntaxKind::EnumDecl
            )
        })
    }
}

ast_node!(EnumDecl, EnumDecl);

impl EnumDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        self.syntax.children().find_map(ModifierList::cast)
    }

    pub fn underlying_type(&self) -> Option<TypeRef> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::UnderlyingTypeClause)
            .and_then(|clause| clause.children().find_map(TypeRef::cast))
    }

    pub fn members(&self) -> impl Iterator<Item = EnumMember> + '_ {
        self.syntax.children().filter_map(EnumMember::cast)
    }
}

ast_node!(EnumMember, EnumMember);

impl EnumMember {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn initializer(&self) -> Option<EqualsClause> {
        self.syntax.children().find_map(EqualsClause::cast)
    }
}

ast_node!(MethodDecl, MethodDecl);

impl MethodDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        // The method name is the identifier outside the return TypeRef.
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        self.syntax.children().find_map(ModifierList::cast)
    }

    pub fn return_type(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        self.syntax.children().find_map(ParamList::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }
}

ast_node!(FieldDecl, FieldDecl);

impl FieldDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn modifier_list(&self) -> Option<ModifierList> {
        self.syntax.children().find_map(ModifierList::cast)
    }

    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn initializer(&self) -> Option<EqualsClause> {
        self.syntax.children().find_map(EqualsClause::cast)
    }
}

ast_node!(
    /// Possibly-empty run of modifier tokens; always present on member
    /// declarations so modifier insertion has a stable anchor.
    ModifierList,
    ModifierList
);

impl ModifierList {
    pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind().is_access_modifier() || t.kind() == SyntaxKind::StaticKw)
    }

    pub fn access_modifier(&self) -> Option<SyntaxToken> {
        self.modifiers().find(|t| t.kind().is_access_modifier())
    }

    pub fn has_access_modifier(&self) -> bool {
        self.access_modifier().is_some()
    }
}

ast_node!(ParamList, ParamList);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.syntax.children().filter_map(Param::cast)
    }
}

ast_node!(Param, Param);

impl Param {
    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }
}

ast_node!(TypeRef, TypeRef);

impl TypeRef {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn text(&self) -> Option<String> {
        self.token().map(|t| t.text().to_string())
    }
}

ast_node!(
    /// `= <expr>` initializer clause on locals, fields, and enum members.
    EqualsClause,
    EqualsClause
);

impl EqualsClause {
    pub fn eq_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Eq)
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }
}

// === statements ===========================================================

ast_node!(Block, Block);

impl Block {
    pub fn l_brace(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn r_brace(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::RBrace)
    }

    /// Statements in source order. Trivia between statements is not part of
    /// any statement; it sits between them as sibling tokens.
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }

    pub fn statement_at(&self, index: usize) -> Option<SyntaxNode> {
        self.statements().nth(index)
    }
}

ast_node!(LocalDecl, LocalDecl);

impl LocalDecl {
    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn initializer(&self) -> Option<EqualsClause> {
        self.syntax.children().find_map(EqualsClause::cast)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Semicolon)
    }
}

ast_node!(ExprStmt, ExprStmt);

impl ExprStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }

    pub fn semicolon(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Semicolon)
    }
}

ast_node!(IfStmt, IfStmt);

impl IfStmt {
    pub fn if_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::IfKw)
    }

    pub fn condition(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }

    /// The statement executed when the condition holds (block or single).
    pub fn then_branch(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_statement())
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.syntax.children().find_map(ElseClause::cast)
    }

    /// Single statement in the then branch, unwrapping a one-statement block.
    pub fn single_then_statement(&self) -> Option<SyntaxNode> {
        let then = self.then_branch()?;
        if let Some(block) = Block::cast(then.clone()) {
            let mut stmts = block.statements();
            let only = stmts.next()?;
            stmts.next().is_none().then_some(only)
        } else {
            Some(then)
        }
    }
}

ast_node!(ElseClause, ElseClause);

impl ElseClause {
    pub fn body(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| n.kind().is_statement())
    }
}

ast_node!(ReturnStmt, ReturnStmt);

impl ReturnStmt {
    pub fn return_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::ReturnKw)
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }
}

ast_node!(SwitchStmt, SwitchStmt);

impl SwitchStmt {
    pub fn scrutinee(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }

    pub fn sections(&self) -> impl Iterator<Item = SwitchSection> + '_ {
        self.syntax.children().filter_map(SwitchSection::cast)
    }
}

ast_node!(SwitchSection, SwitchSection);

impl SwitchSection {
    pub fn labels(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| {
            matches!(n.kind(), SyntaxKind::CaseLabel | SyntaxKind::DefaultLabel)
        })
    }

    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }
}

ast_node!(CaseLabel, CaseLabel);

impl CaseLabel {
    pub fn value(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }
}

ast_node!(DefaultLabel, DefaultLabel);

// === expressions ==========================================================

ast_node!(BinaryExpr, BinaryExpr);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        nth_expr(&self.syntax, 0)
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        nth_expr(&self.syntax, 1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.op_token().map(|t| t.kind())
    }
}

ast_node!(PrefixUnaryExpr, PrefixUnaryExpr);

impl PrefixUnaryExpr {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn operand(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }
}

ast_node!(AssignExpr, AssignExpr);

impl AssignExpr {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        nth_expr(&self.syntax, 0)
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        nth_expr(&self.syntax, 1)
    }

    pub fn eq_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Eq)
    }
}

ast_node!(ParenExpr, ParenExpr);

impl ParenExpr {
    pub fn inner(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }
}

ast_node!(InvocationExpr, InvocationExpr);

impl InvocationExpr {
    pub fn callee(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

ast_node!(MemberAccessExpr, MemberAccessExpr);

impl MemberAccessExpr {
    pub fn receiver(&self) -> Option<SyntaxNode> {
        first_expr(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        // The member name is the identifier after the dot.
        let mut seen_dot = false;
        for element in self.syntax.children_with_tokens() {
            if let Some(token) = element.into_token() {
                if token.kind() == SyntaxKind::Dot {
                    seen_dot = true;
                } else if seen_dot && token.kind() == SyntaxKind::Ident {
                    return Some(token);
                }
            }
        }
        None
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }
}

ast_node!(ObjectCreationExpr, ObjectCreationExpr);

impl ObjectCreationExpr {
    pub fn ty(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

ast_node!(NameRef, NameRef);

impl NameRef {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn text(&self) -> Option<String> {
        self.ident_token().map(|t| t.text().to_string())
    }
}

ast_node!(Literal, Literal);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

ast_node!(ArgList, ArgList);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| n.kind().is_expression())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    fn cast_first<T: AstNode>(source: &str) -> T {
        let root = parse(source).root();
        root.descendants()
            .find_map(T::cast)
            .expect("expected node not found")
    }

    #[test]
    fn class_and_member_access() {
        let class: ClassDecl =
            cast_first("public class Widget { int count = 0; void Run() { } }");
        assert_eq!(class.name().as_deref(), Some("Widget"));
        assert!(class.modifier_list().unwrap().has_access_modifier());

        let field = class.fields().next().unwrap();
        assert_eq!(field.name().as_deref(), Some("count"));
        assert_eq!(field.ty().unwrap().text().as_deref(), Some("int"));
        assert!(field.initializer().is_some());

        let method = class.methods().next().unwrap();
        assert_eq!(method.name().as_deref(), Some("Run"));
        assert!(!method.modifier_list().unwrap().has_access_modifier());
    }

    #[test]
    fn if_with_single_statement_block() {
        let if_stmt: IfStmt =
            cast_first("class C { Foo M() { if (x == null) { x = new Foo(); } return x; } }");
        let cond = BinaryExpr::cast(if_stmt.condition().unwrap()).unwrap();
        assert_eq!(cond.op_kind(), Some(SyntaxKind::EqEq));

        let single = if_stmt.single_then_statement().unwrap();
        assert_eq!(single.kind(), SyntaxKind::ExprStmt);
    }

    #[test]
    fn enum_members_in_order() {
        let decl: EnumDecl = cast_first("enum E : u8 { None = 0, A = 1, B = 2 }");
        assert_eq!(decl.underlying_type().unwrap().text().as_deref(), Some("u8"));
        let names: Vec<_> = decl.members().filter_map(|m| m.name()).collect();
        assert_eq!(names, ["None", "A", "B"]);
    }

    #[test]
    fn member_access_name_after_dot() {
        let access: MemberAccessExpr = cast_first("class C { void M() { a.b.Run(); } }");
        // Preorder finds the outermost MemberAccessExpr first; its name is "Run".
        assert_eq!(access.name().as_deref(), Some("Run"));
        let inner = MemberAccessExpr::cast(access.receiver().unwrap()).unwrap();
        assert_eq!(inner.name().as_deref(), Some("b"));
    }

    #[test]
    fn switch_section_shape() {
        let section: SwitchSection = cast_first(
            "class C { void M() { switch (x) { case 1: y = 1; break; } } }",
        );
        assert_eq!(section.labels().count(), 1);
        assert_eq!(section.statements().count(), 2);
    }
}
