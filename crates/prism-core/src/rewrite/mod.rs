//! Trivia-preserving tree rewrites
//!
//! All edits are pure green-tree surgery: the input tree is never mutated,
//! each operation returns a fresh root. An edit either applies completely
//! or returns an error and leaves nothing half-done.
//!
//! Two invariants hold for every operation here:
//! - tokens outside the edited span are carried over byte-for-byte,
//!   comments included;
//! - a span that contains a preprocessor directive refuses to be edited.
//!
//! The edited span itself is synthesized with minimal spacing; callers get
//! its range back in [`Rewritten::reformat`] and are expected to hand those
//! ranges to a formatter.

pub mod factory;
pub mod preview;

use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};
use tracing::trace;

use crate::error::PrismError;
use crate::result::Result;
use crate::semantic::symbol::Accessibility;
use crate::syntax::ast::{AstNode, LocalDecl, ModifierList, SwitchSection};
use crate::syntax::{SyntaxNode, SyntaxToken, trivia};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Result of one applied rewrite.
#[derive(Debug, Clone)]
pub struct Rewritten {
    /// New tree root; the input tree is untouched.
    pub root: SyntaxNode,
    /// Spans in the new tree whose layout was synthesized and should be
    /// reformatted.
    pub reformat: Vec<TextRange>,
}

/// Replace one node with a synthesized green node.
pub fn replace_node(target: &SyntaxNode, replacement: GreenNode) -> Rewritten {
    let start = target.text_range().start();
    let len = replacement.text_len();
    let root = SyntaxNode::new_root(target.replace_with(replacement));
    trace!(kind = ?target.kind(), "replaced node");
    Rewritten {
        root,
        reformat: vec![TextRange::at(start, len)],
    }
}

/// Replace one token with a synthesized green token.
pub fn replace_token(target: &SyntaxToken, replacement: GreenToken) -> Rewritten {
    let start = target.text_range().start();
    let len = TextSize::of(replacement.text());
    let root = SyntaxNode::new_root(target.replace_with(replacement));
    Rewritten {
        root,
        reformat: vec![TextRange::at(start, len)],
    }
}

/// Replace the sibling span `first..=last` (statements plus the trivia
/// between them) with `replacement` elements. Comment tokens between the
/// two statements are relocated in front of the replacement instead of
/// being dropped.
pub fn replace_statements(
    block: &SyntaxNode,
    first: &SyntaxNode,
    last: &SyntaxNode,
    replacement: Vec<GreenElement>,
) -> Result<Rewritten> {
    if first.parent().as_ref() != Some(block) || last.parent().as_ref() != Some(block) {
        return Err(PrismError::rewrite("statements are not siblings in the block"));
    }
    let start = first.index();
    let end = last.index();
    if start > end {
        return Err(PrismError::rewrite("statement span is reversed"));
    }
    guard_no_directives(block, start, end)?;

    let mut spliced = Vec::new();
    for element in block.children_with_tokens().skip(start).take(end - start + 1) {
        if let Some(token) = element.as_token() {
            if token.kind().is_comment() {
                spliced.push(NodeOrToken::Token(token.green().to_owned()));
                spliced.push(NodeOrToken::Token(factory::newline()));
            }
        }
    }
    spliced.extend(replacement);

    Ok(splice(block, start, end + 1, spliced))
}

/// Replace a single statement.
pub fn replace_statement(
    block: &SyntaxNode,
    statement: &SyntaxNode,
    replacement: GreenNode,
) -> Result<Rewritten> {
    replace_statements(
        block,
        statement,
        statement,
        vec![NodeOrToken::Node(replacement)],
    )
}

/// Remove a statement together with the whitespace run directly before it.
/// Comments and directives in that run stay: only blank space goes.
pub fn remove_statement(block: &SyntaxNode, statement: &SyntaxNode) -> Result<Rewritten> {
    if statement.parent().as_ref() != Some(block) {
        return Err(PrismError::rewrite("statement is not a child of the block"));
    }
    if trivia::contains_directive(statement) {
        return Err(PrismError::rewrite(
            "cannot remove a statement containing a preprocessor directive",
        ));
    }

    let mut start = statement.index();
    let mut cursor = statement.prev_sibling_or_token();
    while let Some(NodeOrToken::Token(token)) = cursor {
        if !token.kind().is_whitespace_or_newline() {
            break;
        }
        start = token.index();
        cursor = token.prev_sibling_or_token();
    }

    Ok(splice(block, start, statement.index() + 1, Vec::new()))
}

/// Insert a statement before `anchor`, on its own line.
pub fn insert_statement(
    block: &SyntaxNode,
    anchor: &SyntaxNode,
    statement: GreenNode,
) -> Result<Rewritten> {
    if anchor.parent().as_ref() != Some(block) {
        return Err(PrismError::rewrite("anchor is not a child of the block"));
    }
    let index = anchor.index();
    let inserted = vec![
        NodeOrToken::Node(statement),
        NodeOrToken::Token(factory::newline()),
    ];
    Ok(splice(block, index, index, inserted))
}

/// Replace a local declaration's initializer value with the default
/// expression of its declared type (`0`, `false`, or `null`).
pub fn reset_initializer_to_default(decl: &LocalDecl) -> Result<Rewritten> {
    let ty = decl
        .ty()
        .and_then(|t| t.text())
        .ok_or_else(|| PrismError::rewrite("declaration has no type"))?;
    let value = decl
        .initializer()
        .and_then(|c| c.value())
        .ok_or_else(|| PrismError::rewrite("declaration has no initializer"))?;
    if trivia::contains_directive(&value) {
        return Err(PrismError::rewrite(
            "initializer contains a preprocessor directive",
        ));
    }
    let replacement = factory::expression(factory::default_expression_text(&ty))
        .ok_or_else(|| PrismError::rewrite("synthesized default failed to parse"))?;
    Ok(replace_node(&value, replacement))
}

/// Insert an access modifier at the front of a member's modifier list.
pub fn insert_access_modifier(
    list: &ModifierList,
    accessibility: Accessibility,
) -> Result<Rewritten> {
    if list.has_access_modifier() {
        return Err(PrismError::rewrite("member already has an access modifier"));
    }
    let inserted = vec![
        NodeOrToken::Token(factory::access_modifier_token(accessibility)),
        NodeOrToken::Token(factory::whitespace(" ")),
    ];
    Ok(splice(list.syntax(), 0, 0, inserted))
}

/// Drop a switch section's statements, leaving only its labels so control
/// falls through to the next section.
pub fn strip_switch_section_body(section: &SwitchSection) -> Result<Rewritten> {
    let node = section.syntax();
    let last_label = section
        .labels()
        .last()
        .ok_or_else(|| PrismError::rewrite("switch section has no labels"))?;
    let body_start = last_label.index() + 1;
    let child_count = node.children_with_tokens().count();
    if body_start >= child_count {
        return Err(PrismError::rewrite("switch section has no body to drop"));
    }
    guard_no_directives(node, body_start, child_count - 1)?;

    let replacement = vec![NodeOrToken::Token(factory::newline())];
    Ok(splice(node, body_start, child_count, replacement))
}

/// Refuse edits over spans that contain preprocessor directives.
fn guard_no_directives(parent: &SyntaxNode, start: usize, end: usize) -> Result<()> {
    for element in parent.children_with_tokens().skip(start).take(end - start + 1) {
        let has_directive = match &element {
            NodeOrToken::Token(token) => token.kind().is_directive(),
            NodeOrToken::Node(node) => trivia::contains_directive(node),
        };
        if has_directive {
            return Err(PrismError::rewrite(
                "edit span contains a preprocessor directive",
            ));
        }
    }
    Ok(())
}

/// Core splice: replace `parent`'s green children `[start, end)` with
/// `replacement` and rebuild the root. Returns the new root and the span
/// the replacement occupies in it.
fn splice(
    parent: &SyntaxNode,
    start: usize,
    end: usize,
    replacement: Vec<GreenElement>,
) -> Rewritten {
    let span_start = parent
        .children_with_tokens()
        .nth(start)
        .map(|e| e.text_range().start())
        .unwrap_or_else(|| parent.text_range().end());
    let span_len: TextSize = replacement.iter().map(element_len).sum();

    let mut children = owned_children(parent);
    children.splice(start..end, replacement);
    let green = GreenNode::new(parent.green().kind(), children);
    let root = SyntaxNode::new_root(parent.replace_with(green));
    trace!(kind = ?parent.kind(), start, end, "spliced children");

    Rewritten {
        root,
        reformat: vec![TextRange::at(span_start, span_len)],
    }
}

fn owned_children(node: &SyntaxNode) -> Vec<GreenElement> {
    let green = node.green();
    green
        .children()
        .map(|child| match child {
            NodeOrToken::Node(n) => NodeOrToken::Node(n.to_owned()),
            NodeOrToken::Token(t) => NodeOrToken::Token(t.to_owned()),
        })
        .collect()
}

fn element_len(element: &GreenElement) -> TextSize {
    match element {
        NodeOrToken::Node(n) => n.text_len(),
        NodeOrToken::Token(t) => t.text_len(),
    }
}
