//! Recursive-descent parser building a lossless CST
//!
//! The parser consumes the trivia-preserving token stream from
//! [`super::lexer`] and assembles a hierarchical green tree. Every token,
//! including whitespace, comments, and directives, lands in the tree, so
//! `parse(source).root().text() == source` holds for arbitrary input.
//!
//! Trivia placement rule: trivia between two statements (or two members)
//! attaches to the enclosing list node as sibling tokens, never inside the
//! preceding or following statement. List-level rewrites rely on this to
//! find a statement's leading trivia among its left siblings.
//!
//! Malformed input never panics; unexpected tokens are wrapped into
//! `ErrorNode` and a [`ParseError`] is recorded.

use rowan::GreenNode;

use super::builder::TreeBuilder;
use super::lexer::{self, LexError, Span, Token};
use super::{SyntaxKind, SyntaxNode};

/// A parse-stage error with the byte span it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

/// Result of parsing one source file.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    lex_errors: Vec<LexError>,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Fresh red root over the parsed green tree.
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> GreenNode {
        self.green.clone()
    }

    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.lex_errors.is_empty()
    }
}

/// Parse Prism source into a lossless CST.
pub fn parse(source: &str) -> Parse {
    let (tokens, lex_errors) = lexer::lex(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    Parse {
        green: parser.builder.finish_green(),
        lex_errors,
        errors: parser.errors,
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    builder: TreeBuilder,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: TreeBuilder::new(),
            errors: Vec::new(),
        }
    }

    // === token cursor =====================================================

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map_or(SyntaxKind::Eof, |t| t.kind)
    }

    fn current_span(&self) -> Span {
        self.current().map_or_else(
            || {
                let end = self.tokens.last().map_or(0, |t| t.span.end);
                end..end
            },
            |t| t.span.clone(),
        )
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Kind of the next non-trivia token at or after the cursor, with
    /// `offset` counting non-trivia tokens.
    fn peek_past_trivia(&self, offset: usize) -> SyntaxKind {
        let mut remaining = offset;
        for token in &self.tokens[self.pos.min(self.tokens.len())..] {
            if token.kind.is_trivia() {
                continue;
            }
            if remaining == 0 {
                return token.kind;
            }
            remaining -= 1;
        }
        SyntaxKind::Eof
    }

    fn at_trivia(&self) -> bool {
        self.current_kind().is_trivia()
    }

    /// Add the current token to the tree and advance.
    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind, &token.text);
            self.pos += 1;
        }
    }

    /// Consume consecutive trivia tokens into the current node.
    fn eat_trivia(&mut self) {
        while self.at_trivia() {
            self.bump();
        }
    }

    /// Bump if the current token has `kind`; otherwise record an error and
    /// leave the cursor alone so the caller can recover.
    fn expect(&mut self, kind: SyntaxKind) -> bool {
        self.eat_trivia();
        if self.current_kind() == kind {
            self.bump();
            true
        } else {
            self.errors.push(ParseError::new(
                format!("expected {:?}, found {:?}", kind, self.current_kind()),
                self.current_span(),
            ));
            false
        }
    }

    /// Wrap the current token into an `ErrorNode` and move on.
    fn error_and_recover(&mut self, context: &str) {
        self.errors.push(ParseError::new(
            format!("unexpected {:?} in {}", self.current_kind(), context),
            self.current_span(),
        ));
        self.builder.start_node(SyntaxKind::ErrorNode);
        self.bump();
        self.builder.finish_node();
    }

    // === declarations =====================================================

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SourceFile);

        while !self.at_end() {
            if self.at_trivia() {
                self.eat_trivia();
                continue;
            }
            match self.current_kind() {
                k if k.is_access_modifier() || k == SyntaxKind::StaticKw => {
                    self.parse_type_decl()
                }
                SyntaxKind::ClassKw | SyntaxKind::EnumKw => self.parse_type_decl(),
                _ => self.error_and_recover("source file"),
            }
        }

        self.builder.finish_node();
    }

    /// `class` or `enum` declaration, with an optional modifier run.
    fn parse_type_decl(&mut self) {
        match self.peek_past_type_modifiers() {
            SyntaxKind::EnumKw => self.parse_enum_decl(),
            _ => self.parse_class_decl(),
        }
    }

    fn peek_past_type_modifiers(&self) -> SyntaxKind {
        let mut offset = 0;
        loop {
            let kind = self.peek_past_trivia(offset);
            if kind.is_access_modifier() || kind == SyntaxKind::StaticKw {
                offset += 1;
            } else {
                return kind;
            }
        }
    }

    fn parse_modifier_list(&mut self) {
        // Always present so modifier insertion has a stable anchor, even
        // when no modifier token was written.
        self.builder.start_node(SyntaxKind::ModifierList);
        loop {
            self.eat_trivia();
            let kind = self.current_kind();
            if kind.is_access_modifier() || kind == SyntaxKind::StaticKw {
                self.bump();
            } else {
                break;
            }
        }
        self.builder.finish_node();
    }

    fn parse_class_decl(&mut self) {
        self.builder.start_node(SyntaxKind::ClassDecl);
        self.parse_modifier_list();
        self.expect(SyntaxKind::ClassKw);
        self.expect(SyntaxKind::Ident);
        self.eat_trivia();
        self.expect(SyntaxKind::LBrace);

        loop {
            if self.at_trivia() {
                self.eat_trivia();
                continue;
            }
            match self.current_kind() {
                SyntaxKind::RBrace | SyntaxKind::Eof => break,
                _ if self.at_end() => break,
                SyntaxKind::EnumKw => self.parse_enum_decl(),
                k if k.is_access_modifier() || k == SyntaxKind::StaticKw => self.parse_member(),
                SyntaxKind::Ident | SyntaxKind::VoidKw | SyntaxKind::VarKw => self.parse_member(),
                _ => self.error_and_recover("class body"),
            }
        }

        self.expect(SyntaxKind::RBrace);
        self.builder.finish_node();
    }

    /// Field or method; disambiguated by `(` after the member name.
    fn parse_member(&mut self) {
        if self.peek_past_type_modifiers() == SyntaxKind::EnumKw {
            self.parse_enum_decl();
            return;
        }

        let mut offset = 0;
        while self.peek_past_trivia(offset).is_access_modifier()
            || self.peek_past_trivia(offset) == SyntaxKind::StaticKw
        {
            offset += 1;
        }
        // offset now at the type, offset+1 at the name, offset+2 at `(` or not.
        let is_method = self.peek_past_trivia(offset + 2) == SyntaxKind::LParen;

        if is_method {
            self.parse_method_decl();
        } else {
            self.parse_field_decl();
        }
    }

    fn parse_method_decl(&mut self) {
        self.builder.start_node(SyntaxKind::MethodDecl);
        self.parse_modifier_list();
        self.parse_type_ref();
        self.expect(SyntaxKind::Ident);
        self.parse_param_list();
        self.eat_trivia();
        self.parse_block();
        self.builder.finish_node();
    }

    fn parse_field_decl(&mut self) {
        self.builder.start_node(SyntaxKind::FieldDecl);
        self.parse_modifier_list();
        self.parse_type_ref();
        self.expect(SyntaxKind::Ident);
        self.eat_trivia();
        if self.current_kind() == SyntaxKind::Eq {
            self.parse_equals_clause();
        }
        self.expect(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_param_list(&mut self) {
        self.builder.start_node(SyntaxKind::ParamList);
        self.expect(SyntaxKind::LParen);
        loop {
            self.eat_trivia();
            match self.current_kind() {
                SyntaxKind::RParen | SyntaxKind::Eof => break,
                SyntaxKind::Comma => self.bump(),
                SyntaxKind::Ident | SyntaxKind::VarKw | SyntaxKind::VoidKw => {
                    self.builder.start_node(SyntaxKind::Param);
                    self.parse_type_ref();
                    self.expect(SyntaxKind::Ident);
                    self.builder.finish_node();
                }
                _ => self.error_and_recover("parameter list"),
            }
            if self.at_end() {
                break;
            }
        }
        self.expect(SyntaxKind::RParen);
        self.builder.finish_node();
    }

    fn parse_type_ref(&mut self) {
        self.eat_trivia();
        self.builder.start_node(SyntaxKind::TypeRef);
        match self.current_kind() {
            SyntaxKind::Ident | SyntaxKind::VoidKw | SyntaxKind::VarKw => self.bump(),
            _ => self.errors.push(ParseError::new(
                format!("expected type, found {:?}", self.current_kind()),
                self.current_span(),
            )),
        }
        self.builder.finish_node();
    }

    fn parse_enum_decl(&mut self) {
        self.builder.start_node(SyntaxKind::EnumDecl);
        self.parse_modifier_list();
        self.expect(SyntaxKind::EnumKw);
        self.expect(SyntaxKind::Ident);
        self.eat_trivia();
        if self.current_kind() == SyntaxKind::Colon {
            self.builder.start_node(SyntaxKind::UnderlyingTypeClause);
            self.bump();
            self.parse_type_ref();
            self.builder.finish_node();
            self.eat_trivia();
        }
        self.expect(SyntaxKind::LBrace);

        loop {
            if self.at_trivia() {
                self.eat_trivia();
                continue;
            }
            match self.current_kind() {
                SyntaxKind::RBrace | SyntaxKind::Eof => break,
                _ if self.at_end() => break,
                SyntaxKind::Comma => self.bump(),
                SyntaxKind::Ident => {
                    self.builder.start_node(SyntaxKind::EnumMember);
                    self.bump();
                    self.eat_trivia();
                    if self.current_kind() == SyntaxKind::Eq {
                        self.parse_equals_clause();
                    }
                    self.builder.finish_node();
                }
                _ => self.error_and_recover("enum body"),
            }
        }

        self.expect(SyntaxKind::RBrace);
        self.builder.finish_node();
    }

    /// `= <expr>` initializer clause.
    fn parse_equals_clause(&mut self) {
        self.builder.start_node(SyntaxKind::EqualsClause);
        self.expect(SyntaxKind::Eq);
        self.parse_expr();
        self.builder.finish_node();
    }

    // === statements =======================================================

    fn parse_block(&mut self) {
        self.builder.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::LBrace);

        loop {
            if self.at_trivia() {
                self.eat_trivia();
                continue;
            }
            match self.current_kind() {
                SyntaxKind::RBrace | SyntaxKind::Eof => break,
                _ if self.at_end() => break,
                _ => self.parse_statement(),
            }
        }

        self.expect(SyntaxKind::RBrace);
        self.builder.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::IfKw => self.parse_if_stmt(),
            SyntaxKind::ReturnKw => self.parse_return_stmt(),
            SyntaxKind::BreakKw => {
                self.builder.start_node(SyntaxKind::BreakStmt);
                self.bump();
                self.expect(SyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            SyntaxKind::SwitchKw => self.parse_switch_stmt(),
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::VarKw => self.parse_local_decl(),
            SyntaxKind::Ident if self.peek_past_trivia(1) == SyntaxKind::Ident => {
                // Two consecutive identifiers: `Type name ...` local declaration.
                self.parse_local_decl()
            }
            SyntaxKind::Ident
            | SyntaxKind::IntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NullKw
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NewKw
            | SyntaxKind::LParen
            | SyntaxKind::Bang
            | SyntaxKind::Minus =>
            {
                self.builder.start_node(SyntaxKind::ExprStmt);
                self.parse_expr();
                self.expect(SyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            _ => self.error_and_recover("statement"),
        }
    }

    fn parse_local_decl(&mut self) {
        self.builder.start_node(SyntaxKind::LocalDecl);
        self.parse_type_ref();
        self.expect(SyntaxKind::Ident);
        self.eat_trivia();
        if self.current_kind() == SyntaxKind::Eq {
            self.parse_equals_clause();
        }
        self.expect(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_if_stmt(&mut self) {
        self.builder.start_node(SyntaxKind::IfStmt);
        self.expect(SyntaxKind::IfKw);
        self.eat_trivia();
        self.expect(SyntaxKind::LParen);
        self.parse_expr();
        self.expect(SyntaxKind::RParen);
        self.eat_trivia();
        self.parse_statement();
        self.eat_trivia();
        if self.current_kind() == SyntaxKind::ElseKw {
            self.builder.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.eat_trivia();
            self.parse_statement();
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    fn parse_return_stmt(&mut self) {
        self.builder.start_node(SyntaxKind::ReturnStmt);
        self.expect(SyntaxKind::ReturnKw);
        self.eat_trivia();
        if self.current_kind() != SyntaxKind::Semicolon {
            self.parse_expr();
        }
        self.expect(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_switch_stmt(&mut self) {
        self.builder.start_node(SyntaxKind::SwitchStmt);
        self.expect(SyntaxKind::SwitchKw);
        self.eat_trivia();
        self.expect(SyntaxKind::LParen);
        self.parse_expr();
        self.expect(SyntaxKind::RParen);
        self.eat_trivia();
        self.expect(SyntaxKind::LBrace);

        loop {
            if self.at_trivia() {
                self.eat_trivia();
                continue;
            }
            match self.current_kind() {
                SyntaxKind::RBrace | SyntaxKind::Eof => break,
                _ if self.at_end() => break,
                SyntaxKind::CaseKw | SyntaxKind::DefaultKw => self.parse_switch_section(),
                _ => self.error_and_recover("switch body"),
            }
        }

        self.expect(SyntaxKind::RBrace);
        self.builder.finish_node();
    }

    /// One or more labels followed by the section's statements.
    fn parse_switch_section(&mut self) {
        self.builder.start_node(SyntaxKind::SwitchSection);

        loop {
            self.eat_trivia();
            match self.current_kind() {
                SyntaxKind::CaseKw => {
                    self.builder.start_node(SyntaxKind::CaseLabel);
                    self.bump();
                    self.parse_expr();
                    self.expect(SyntaxKind::Colon);
                    self.builder.finish_node();
                }
                SyntaxKind::DefaultKw => {
                    self.builder.start_node(SyntaxKind::DefaultLabel);
                    self.bump();
                    self.expect(SyntaxKind::Colon);
                    self.builder.finish_node();
                }
                _ => break,
            }
        }

        loop {
            if self.at_trivia() {
                self.eat_trivia();
                continue;
            }
            match self.current_kind() {
                SyntaxKind::RBrace
                | SyntaxKind::CaseKw
                | SyntaxKind::DefaultKw
                | SyntaxKind::Eof => break,
                _ if self.at_end() => break,
                _ => self.parse_statement(),
            }
        }

        self.builder.finish_node();
    }

    // === expressions ======================================================

    fn parse_expr(&mut self) {
        self.parse_assign_expr();
    }

    /// Assignment is right-associative and lowest precedence.
    fn parse_assign_expr(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_coalesce_expr();

        if self.current_kind_past_trivia() == SyntaxKind::Eq {
            self.builder.start_node_at(checkpoint, SyntaxKind::AssignExpr);
            self.eat_trivia();
            self.bump(); // '='
            self.parse_assign_expr();
            self.builder.finish_node();
        }
    }

    /// `??` is right-associative.
    fn parse_coalesce_expr(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_binary_expr(0);

        if self.current_kind_past_trivia() == SyntaxKind::QuestionQuestion {
            self.builder.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
            self.eat_trivia();
            self.bump(); // '??'
            self.parse_coalesce_expr();
            self.builder.finish_node();
        }
    }

    fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
        let prec = match kind {
            SyntaxKind::PipePipe => 1,
            SyntaxKind::AmpAmp => 2,
            SyntaxKind::Pipe => 3,
            SyntaxKind::Caret => 4,
            SyntaxKind::Amp => 5,
            SyntaxKind::EqEq | SyntaxKind::NotEq => 6,
            SyntaxKind::Lt | SyntaxKind::Gt | SyntaxKind::LtEq | SyntaxKind::GtEq => 7,
            SyntaxKind::Plus | SyntaxKind::Minus => 8,
            SyntaxKind::Star | SyntaxKind::Slash => 9,
            _ => return None,
        };
        Some(prec)
    }

    /// Precedence-climbing loop for left-associative binary operators.
    fn parse_binary_expr(&mut self, min_precedence: u8) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_unary_expr();

        loop {
            let op = self.current_kind_past_trivia();
            let Some(precedence) = Self::binary_precedence(op) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.builder.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
            self.eat_trivia();
            self.bump(); // operator
            self.parse_binary_expr(precedence + 1);
            self.builder.finish_node();
        }
    }

    fn parse_unary_expr(&mut self) {
        self.eat_trivia();
        match self.current_kind() {
            SyntaxKind::Bang | SyntaxKind::Minus => {
                self.builder.start_node(SyntaxKind::PrefixUnaryExpr);
                self.bump();
                self.parse_unary_expr();
                self.builder.finish_node();
            }
            _ => self.parse_postfix_expr(),
        }
    }

    /// Member access and invocation chains: `a.b.C(x).d`.
    fn parse_postfix_expr(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_primary_expr();

        loop {
            match self.current_kind_past_trivia() {
                SyntaxKind::Dot => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::MemberAccessExpr);
                    self.eat_trivia();
                    self.bump(); // '.'
                    self.eat_trivia();
                    self.expect(SyntaxKind::Ident);
                    self.builder.finish_node();
                }
                SyntaxKind::LParen => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::InvocationExpr);
                    self.eat_trivia();
                    self.parse_arg_list();
                    self.builder.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_arg_list(&mut self) {
        self.builder.start_node(SyntaxKind::ArgList);
        self.expect(SyntaxKind::LParen);
        loop {
            self.eat_trivia();
            match self.current_kind() {
                SyntaxKind::RParen | SyntaxKind::Eof => break,
                _ if self.at_end() => break,
                SyntaxKind::Comma => self.bump(),
                _ => self.parse_expr(),
            }
        }
        self.expect(SyntaxKind::RParen);
        self.builder.finish_node();
    }

    fn parse_primary_expr(&mut self) {
        self.eat_trivia();
        match self.current_kind() {
            SyntaxKind::IntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NullKw
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw => {
                self.builder.start_node(SyntaxKind::Literal);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::Ident => {
                self.builder.start_node(SyntaxKind::NameRef);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::LParen => {
                self.builder.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::RParen);
                self.builder.finish_node();
            }
            SyntaxKind::NewKw => {
                self.builder.start_node(SyntaxKind::ObjectCreationExpr);
                self.bump();
                self.parse_type_ref();
                self.eat_trivia();
                if self.current_kind() == SyntaxKind::LParen {
                    self.parse_arg_list();
                }
                self.builder.finish_node();
            }
            _ => self.error_and_recover("expression"),
        }
    }

    // === trivia lookahead helpers =========================================

    /// Kind of the next non-trivia token without consuming anything.
    fn current_kind_past_trivia(&self) -> SyntaxKind {
        self.peek_past_trivia(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(source: &str) -> SyntaxNode {
        let parse = parse(source);
        let root = parse.root();
        assert_eq!(root.text().to_string(), source, "lossless round-trip");
        root
    }

    fn first_of(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
        root.descendants()
            .find(|n| n.kind() == kind)
            .unwrap_or_else(|| panic!("no {kind:?} in tree"))
    }

    #[test]
    fn parses_class_with_method() {
        let source = "class C {\n  int GetValue() {\n    return 1;\n  }\n}\n";
        let root = roundtrip(source);
        assert_eq!(root.kind(), SyntaxKind::SourceFile);
        first_of(&root, SyntaxKind::ClassDecl);
        first_of(&root, SyntaxKind::MethodDecl);
        first_of(&root, SyntaxKind::ReturnStmt);
    }

    #[test]
    fn parses_lazy_init_shape() {
        let source = "class C { Foo M() { if (x == null) { x = new Foo(); } return x; } }";
        let root = roundtrip(source);
        let if_stmt = first_of(&root, SyntaxKind::IfStmt);
        let cond = first_of(&if_stmt, SyntaxKind::BinaryExpr);
        assert!(cond.children_with_tokens().any(|e| e.kind() == SyntaxKind::EqEq));
        first_of(&root, SyntaxKind::ObjectCreationExpr);
        first_of(&root, SyntaxKind::AssignExpr);
    }

    #[test]
    fn parses_coalesce_right_associative() {
        let source = "class C { int M() { return a ?? b ?? c; } }";
        let root = roundtrip(source);
        let outer = first_of(&root, SyntaxKind::BinaryExpr);
        // Right operand of the outer ?? is itself a ?? expression.
        let inner: Vec<_> = outer
            .children()
            .filter(|n| n.kind() == SyntaxKind::BinaryExpr)
            .collect();
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn parses_switch_sections() {
        let source = "class C { void M() { switch (x) { case 1: y = 1; break; case 2: default: break; } } }";
        let root = roundtrip(source);
        let sections: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::SwitchSection)
            .collect();
        assert_eq!(sections.len(), 2);
        // Second section carries both labels.
        let labels: Vec<_> = sections[1]
            .children()
            .filter(|n| {
                matches!(n.kind(), SyntaxKind::CaseLabel | SyntaxKind::DefaultLabel)
            })
            .collect();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn parses_enum_with_underlying_type() {
        let source = "enum Flags : u8 {\n  None = 0,\n  A = 1,\n  B = 2,\n  AB = 3,\n}\n";
        let root = roundtrip(source);
        first_of(&root, SyntaxKind::UnderlyingTypeClause);
        let members: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::EnumMember)
            .collect();
        assert_eq!(members.len(), 4);
    }

    #[test]
    fn statement_trivia_stays_at_block_level() {
        let source = "class C { void M() {\n  // leading comment\n  int x = 1;\n} }";
        let root = roundtrip(source);
        let block = first_of(&root, SyntaxKind::Block);
        let comment = block
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::CommentLine);
        assert!(comment.is_some(), "comment must be a direct child of the block");
    }

    #[test]
    fn directives_preserved_in_tree() {
        let source = "class C { void M() {\n#if DEBUG\n  x = 1;\n#endif\n} }";
        let root = roundtrip(source);
        let directives: Vec<_> = root
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Directive)
            .collect();
        assert_eq!(directives.len(), 2);
    }

    #[test]
    fn malformed_input_never_panics() {
        for source in ["class", "class C { int ", "}{", "class C { void M() { if ( } }", "@@@"] {
            let parse = parse(source);
            assert_eq!(parse.root().text().to_string(), source);
            assert!(parse.has_errors());
        }
    }

    #[test]
    fn local_decl_vs_expr_stmt() {
        let source = "class C { void M() { int y = GetValue(); y = 5; } }";
        let root = roundtrip(source);
        first_of(&root, SyntaxKind::LocalDecl);
        let expr_stmt = first_of(&root, SyntaxKind::ExprStmt);
        first_of(&expr_stmt, SyntaxKind::AssignExpr);
    }
}
