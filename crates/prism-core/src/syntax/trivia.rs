//! Trivia inspection helpers
//!
//! Trivia (whitespace, newlines, comments, preprocessor directives) are
//! ordinary tokens in the Prism CST, attached as siblings of the node they
//! precede or follow. These helpers answer the questions matchers and the
//! rewrite engine ask constantly: what is a node's leading trivia, is there
//! anything but whitespace between two statements, and does a span contain a
//! preprocessor directive.
//!
//! Directive safety is a hard invariant: a rewrite must never silently
//! delete or reorder a directive, so matchers call [`contains_directive`]
//! on the candidate span and refuse to fire when it returns true.

use rowan::{NodeOrToken, TextRange};

use super::{SyntaxNode, SyntaxToken};

/// True if any token inside `node` (itself included) is a preprocessor
/// directive.
pub fn contains_directive(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind().is_directive())
}

/// True if any directive token in the tree under `root` intersects `range`.
pub fn range_contains_directive(root: &SyntaxNode, range: TextRange) -> bool {
    root.descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind().is_directive())
        .any(|t| t.text_range().intersect(range).is_some())
}

/// The contiguous run of trivia tokens immediately preceding `node` among
/// its siblings, in source order.
pub fn leading_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    let mut trivia = Vec::new();
    let mut cursor = node.prev_sibling_or_token();
    while let Some(NodeOrToken::Token(token)) = cursor {
        if !token.kind().is_trivia() {
            break;
        }
        cursor = token.prev_sibling_or_token();
        trivia.push(token);
    }
    trivia.reverse();
    trivia
}

/// Trailing trivia: sibling trivia tokens after `node` up to and including
/// the first newline.
pub fn trailing_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    let mut trivia = Vec::new();
    let mut cursor = node.next_sibling_or_token();
    while let Some(NodeOrToken::Token(token)) = cursor {
        if !token.kind().is_trivia() {
            break;
        }
        let is_newline = token.kind().is_newline();
        cursor = token.next_sibling_or_token();
        trivia.push(token);
        if is_newline {
            break;
        }
    }
    trivia
}

/// Sibling trivia tokens strictly between two sibling nodes.
///
/// Returns `None` when the two nodes are not siblings or anything other
/// than trivia separates them.
pub fn trivia_between(first: &SyntaxNode, second: &SyntaxNode) -> Option<Vec<SyntaxToken>> {
    if first.parent() != second.parent() {
        return None;
    }
    let mut trivia = Vec::new();
    let mut cursor = first.next_sibling_or_token();
    loop {
        match cursor {
            Some(NodeOrToken::Token(token)) if token.kind().is_trivia() => {
                cursor = token.next_sibling_or_token();
                trivia.push(token);
            }
            Some(NodeOrToken::Node(node)) if node == *second => return Some(trivia),
            _ => return None,
        }
    }
}

/// True when every token in `trivia` is whitespace or a newline; comments
/// and directives make the run impure and must be preserved by relocation.
pub fn is_pure_whitespace(trivia: &[SyntaxToken]) -> bool {
    trivia.iter().all(|t| t.kind().is_whitespace_or_newline())
}

/// Comments (line and block) contained in a trivia run.
pub fn comments(trivia: &[SyntaxToken]) -> Vec<SyntaxToken> {
    trivia.iter().filter(|t| t.kind().is_comment()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxKind;
    use crate::syntax::parser::parse;

    fn block_statements(source: &str) -> (SyntaxNode, Vec<SyntaxNode>) {
        let root = parse(source).root();
        let block = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::Block)
            .unwrap();
        let stmts = block
            .children()
            .filter(|n| n.kind().is_statement())
            .collect();
        (root, stmts)
    }

    #[test]
    fn leading_trivia_of_statement() {
        let (_root, stmts) =
            block_statements("class C { void M() {\n  // note\n  int x = 1;\n} }");
        let trivia = leading_trivia(&stmts[0]);
        assert!(trivia.iter().any(|t| t.kind() == SyntaxKind::CommentLine));
        assert!(!is_pure_whitespace(&trivia));
        assert_eq!(comments(&trivia).len(), 1);
    }

    #[test]
    fn trivia_between_statements() {
        let (_root, stmts) =
            block_statements("class C { void M() { int x = 1; /* keep */ x = 2; } }");
        assert_eq!(stmts.len(), 2);
        let between = trivia_between(&stmts[0], &stmts[1]).unwrap();
        assert!(between.iter().any(|t| t.kind() == SyntaxKind::CommentBlock));
        assert!(!is_pure_whitespace(&between));
    }

    #[test]
    fn directive_detection() {
        let root = parse("class C { void M() {\n#if DEBUG\n  x = 1;\n#endif\n} }").root();
        let block = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::Block)
            .unwrap();
        assert!(contains_directive(&block));

        let clean = parse("class C { void M() { x = 1; } }").root();
        assert!(!contains_directive(&clean));
    }

    #[test]
    fn range_directive_intersection() {
        let root = parse("class C { void M() {\n#region A\n  x = 1;\n#endregion\n} }").root();
        let stmt = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ExprStmt)
            .unwrap();
        // The statement itself holds no directive...
        assert!(!contains_directive(&stmt));
        // ...but the surrounding block-level range does.
        let block = stmt.parent().unwrap();
        assert!(range_contains_directive(&root, block.text_range()));
    }
}
