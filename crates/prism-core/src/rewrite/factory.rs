//! Synthesis of green tokens and nodes for tree edits
//!
//! Small replacement fragments are produced by parsing them inside a
//! throwaway wrapper and lifting out the green node. Parsing keeps the
//! factory honest: a fragment that would not survive a reparse is rejected
//! here instead of corrupting a tree later.

use rowan::{GreenNode, GreenToken};

use crate::semantic::constant::{ConstantValue, default_value_of_type};
use crate::semantic::symbol::Accessibility;
use crate::syntax::ast::{AstNode, MethodDecl, ReturnStmt};
use crate::syntax::parser::parse;
use crate::syntax::SyntaxKind;

fn raw(kind: SyntaxKind) -> rowan::SyntaxKind {
    rowan::SyntaxKind(kind as u16)
}

/// Token with fixed spelling (keywords, punctuation).
pub fn fixed_token(kind: SyntaxKind) -> Option<GreenToken> {
    kind.fixed_text().map(|text| GreenToken::new(raw(kind), text))
}

pub fn whitespace(text: &str) -> GreenToken {
    GreenToken::new(raw(SyntaxKind::Whitespace), text)
}

pub fn newline() -> GreenToken {
    GreenToken::new(raw(SyntaxKind::Newline), "\n")
}

pub fn access_modifier_token(accessibility: Accessibility) -> GreenToken {
    let kind = match accessibility {
        Accessibility::Public => SyntaxKind::PublicKw,
        Accessibility::Private => SyntaxKind::PrivateKw,
        Accessibility::Internal => SyntaxKind::InternalKw,
        Accessibility::Protected => SyntaxKind::ProtectedKw,
    };
    GreenToken::new(raw(kind), accessibility.keyword())
}

/// Parse `text` as a single statement and return its green node.
pub fn statement(text: &str) -> Option<GreenNode> {
    let source = format!("class __F {{ void __m() {{\n{text}\n}} }}");
    let parsed = parse(&source);
    if parsed.has_errors() {
        return None;
    }
    let body = parsed
        .root()
        .descendants()
        .find_map(MethodDecl::cast)?
        .body()?;
    let mut statements = body.statements();
    let only = statements.next()?;
    if statements.next().is_some() {
        return None;
    }
    Some(only.green().into_owned())
}

/// Parse `text` as a single expression and return its green node.
pub fn expression(text: &str) -> Option<GreenNode> {
    let source = format!("class __F {{ void __m() {{ return {text}; }} }}");
    let parsed = parse(&source);
    if parsed.has_errors() {
        return None;
    }
    let value = parsed
        .root()
        .descendants()
        .find_map(ReturnStmt::cast)?
        .value()?;
    Some(value.green().into_owned())
}

/// Source text of the default value for a declared type.
pub fn default_expression_text(type_text: &str) -> &'static str {
    match default_value_of_type(type_text) {
        ConstantValue::Int(_) => "0",
        ConstantValue::Bool(_) => "false",
        _ => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxNode;

    #[test]
    fn statement_fragment_round_trips() {
        let green = statement("return x ?? (x = new Foo());").unwrap();
        let node = SyntaxNode::new_root(green);
        assert_eq!(node.kind(), SyntaxKind::ReturnStmt);
        assert_eq!(node.text().to_string(), "return x ?? (x = new Foo());");
    }

    #[test]
    fn expression_fragment_round_trips() {
        let green = expression("A | B").unwrap();
        let node = SyntaxNode::new_root(green);
        assert_eq!(node.kind(), SyntaxKind::BinaryExpr);
        assert_eq!(node.text().to_string(), "A | B");
    }

    #[test]
    fn malformed_fragments_are_rejected() {
        assert!(statement("return @@;").is_none());
        assert!(statement("x = 1; y = 2;").is_none());
        assert!(expression("1 +").is_none());
    }

    #[test]
    fn default_expressions() {
        assert_eq!(default_expression_text("int"), "0");
        assert_eq!(default_expression_text("bool"), "false");
        assert_eq!(default_expression_text("Widget"), "null");
    }

    #[test]
    fn fixed_tokens_carry_their_spelling() {
        assert_eq!(fixed_token(SyntaxKind::QuestionQuestion).unwrap().text(), "??");
        assert!(fixed_token(SyntaxKind::Ident).is_none());
        assert_eq!(
            access_modifier_token(Accessibility::Private).text(),
            "private"
        );
    }

    #[test]
    fn nested_block_counts_as_one_statement() {
        let green = statement("{ x = 1; }").unwrap();
        let node = SyntaxNode::new_root(green);
        assert_eq!(node.kind(), SyntaxKind::Block);
    }
}
