//! Lossless syntax tree for the Prism source language
//!
//! Rowan-based CST with the green/red split: green trees are immutable,
//! position-independent, structurally shared storage; red trees are cheap
//! on-demand views with parent pointers. All trivia (whitespace, comments,
//! preprocessor directives) lives in the tree as ordinary tokens, so
//! `parse(source).root().text() == source` for any input, well-formed or not.
//!
//! A "changed" tree is always a new green root built from the old root plus
//! a localized replacement; see [`crate::rewrite`].

mod builder;
mod kind;
mod language;
mod lexer;

pub mod ast;
pub mod info;
pub mod parser;
pub mod trivia;

pub use builder::TreeBuilder;
pub use kind::SyntaxKind;
pub use language::{
    PrismLanguage, SyntaxElement, SyntaxElementChildren, SyntaxNode, SyntaxNodeChildren,
    SyntaxToken,
};
pub use lexer::{LexError, Span, Token, lex};
pub use parser::{Parse, ParseError, parse};

/// Structural (token-for-token) equality of two subtrees, ignoring trivia.
///
/// This is the comparison switch-section merging and other "same body"
/// checks use: kinds and token texts must match in order, while whitespace,
/// comments, and directives are skipped on both sides.
pub fn structurally_equal(left: &SyntaxNode, right: &SyntaxNode) -> bool {
    let mut lhs = non_trivia_tokens(left);
    let mut rhs = non_trivia_tokens(right);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l.kind() == r.kind() && l.text() == r.text() => {}
            _ => return false,
        }
    }
}

/// All non-trivia tokens under `node`, in source order.
pub fn non_trivia_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
}
