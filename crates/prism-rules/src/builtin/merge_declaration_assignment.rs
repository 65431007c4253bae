//! Merge a local declaration with the assignment that follows it
//!
//! ```text
//! Foo f;                Foo f = Create();
//! f = Create();     ->
//! ```
//!
//! A declaration carrying an explicit default initializer (`Foo f = null;`)
//! merges too, since the default write is dead. The match is rejected when
//! the assignment's right side reads the declared local.

use async_trait::async_trait;
use rowan::{NodeOrToken, TextRange};
use tokio_util::sync::CancellationToken;

use prism_core::rewrite::{self, factory};
use prism_core::syntax::info::{SimpleAssignmentInfo, SingleLocalDeclInfo};
use prism_core::syntax::trivia;
use prism_core::{
    Diagnostic, Document, PrismConfig, PrismError, Result, Rewritten, SemanticModel, Severity,
    SymbolId, SyntaxKind, SyntaxNode,
};

use crate::engine::{AnalyzerRule, RewriteRule, RuleContext};

pub const MERGE_DECLARATION_AND_ASSIGNMENT: &str = "merge-declaration-and-assignment";

pub struct MergeDeclarationAndAssignment;

/// The declaration, the assignment after it, and the merged pieces.
struct Match {
    decl: SingleLocalDeclInfo,
    assignment: SimpleAssignmentInfo,
}

fn shape_match(node: &SyntaxNode, model: &SemanticModel) -> Option<(SymbolId, Match)> {
    let decl = SingleLocalDeclInfo::from_statement(node)?;
    let ty = decl.ty.text()?;

    // A non-default initializer carries a value the merge would lose.
    if let Some(init) = &decl.initializer {
        if !model.is_default_value(&ty, init) {
            return None;
        }
    }

    let next = node.next_sibling()?;
    let assignment = SimpleAssignmentInfo::from_statement(&next)?;

    let local = model.declared_symbol(node)?;
    if model.resolve(&assignment.lhs).map(|s| s.id) != Some(local.id) {
        return None;
    }

    if trivia::contains_directive(node) || trivia::contains_directive(&next) {
        return None;
    }
    let between = trivia::trivia_between(node, &next)?;
    if between.iter().any(|t| t.kind().is_directive()) {
        return None;
    }

    Some((local.id, Match { decl, assignment }))
}

fn match_at(
    node: &SyntaxNode,
    model: &SemanticModel,
    cancel: &CancellationToken,
) -> Result<Option<Match>> {
    let Some((local, matched)) = shape_match(node, model) else {
        return Ok(None);
    };
    // The right side must not read the local it would now initialize.
    // Cancellation inside the scan propagates, it is not a failed match.
    if model.is_referenced_in(local, &matched.assignment.rhs, cancel)? {
        return Ok(None);
    }
    Ok(Some(matched))
}

impl AnalyzerRule for MergeDeclarationAndAssignment {
    fn id(&self) -> &'static str {
        MERGE_DECLARATION_AND_ASSIGNMENT
    }

    fn default_severity(&self) -> Severity {
        Severity::Hint
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::LocalDecl]
    }

    fn check(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Ok(Some(matched)) = match_at(node, ctx.model, ctx.cancel) else {
            return Vec::new();
        };
        vec![
            Diagnostic::new(
                AnalyzerRule::id(self),
                self.default_severity(),
                format!(
                    "merge declaration of '{}' with the assignment below it",
                    matched.decl.name()
                ),
                ctx.location(node.text_range()),
                node.text_range(),
            )
            .with_metadata("name", matched.decl.name())
            .with_fade_out(matched.assignment.statement.text_range()),
        ]
    }
}

#[async_trait]
impl RewriteRule for MergeDeclarationAndAssignment {
    fn id(&self) -> &'static str {
        MERGE_DECLARATION_AND_ASSIGNMENT
    }

    async fn apply(
        &self,
        document: &Document,
        target: TextRange,
        _config: &PrismConfig,
        cancel: &CancellationToken,
    ) -> Result<Rewritten> {
        let node = document
            .find_node_at(target, SyntaxKind::LocalDecl)
            .ok_or_else(|| PrismError::rewrite("no local declaration at target range"))?;
        let root = document.root();
        let model = SemanticModel::new(&root);
        let matched = match_at(&node, &model, cancel)?.ok_or_else(|| {
            PrismError::rewrite("statements no longer match declaration-then-assignment")
        })?;
        let block = node
            .parent()
            .ok_or_else(|| PrismError::rewrite("statement has no enclosing block"))?;

        let ty = matched
            .decl
            .ty
            .text()
            .ok_or_else(|| PrismError::rewrite("declaration has no type text"))?;
        let text = format!(
            "{ty} {} = {};",
            matched.decl.name(),
            matched.assignment.rhs.text()
        );
        let replacement = factory::statement(&text)
            .ok_or_else(|| PrismError::rewrite("synthesized declaration failed to parse"))?;

        rewrite::replace_statements(
            &block,
            &node,
            &matched.assignment.statement,
            vec![NodeOrToken::Node(replacement)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::default_registry;

    fn diagnostics_for(source: &str) -> Vec<Diagnostic> {
        let document = Document::parse("t.src", source);
        default_registry()
            .analyze_document(&document, &PrismConfig::default(), &CancellationToken::new())
            .unwrap()
            .into_iter()
            .filter(|d| d.rule_id == MERGE_DECLARATION_AND_ASSIGNMENT)
            .collect()
    }

    #[test]
    fn detects_bare_declaration_then_assignment() {
        let found = diagnostics_for("class C { void M() { Foo f;\nf = Create(); } }");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].metadata("name"), Some("f"));
    }

    #[test]
    fn detects_default_initialized_declaration() {
        assert_eq!(
            diagnostics_for("class C { void M() { Foo f = null;\nf = Create(); } }").len(),
            1
        );
        assert_eq!(
            diagnostics_for("class C { void M() { int n = 0;\nn = Next(); } }").len(),
            1
        );
    }

    #[test]
    fn meaningful_initializer_blocks_the_merge() {
        assert!(diagnostics_for("class C { void M() { int n = 5;\nn = Next(); } }").is_empty());
    }

    #[test]
    fn rhs_reading_the_local_blocks_the_merge() {
        assert!(
            diagnostics_for("class C { void M() { Foo f = null;\nf = Wrap(f); } }").is_empty()
        );
    }

    #[test]
    fn assignment_to_other_variable_is_ignored() {
        assert!(diagnostics_for("class C { void M() { Foo f;\ng = Create(); } }").is_empty());
    }

    #[tokio::test]
    async fn cancellation_surfaces_as_cancelled() {
        let source = "class C { void M() {\n  Foo f = null;\n  f = Create();\n} }";
        let document = Document::parse("t.src", source);
        let diagnostics = diagnostics_for(source);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = MergeDeclarationAndAssignment
            .apply(
                &document,
                diagnostics[0].range,
                &PrismConfig::default(),
                &cancel,
            )
            .await;
        assert!(matches!(result, Err(PrismError::Cancelled)));
    }

    #[tokio::test]
    async fn merges_into_single_declaration() {
        let source = "class C { void M() {\n  Foo f = null;\n  f = Create();\n} }";
        let document = Document::parse("t.src", source);
        let diagnostics = diagnostics_for(source);
        let rewritten = MergeDeclarationAndAssignment
            .apply(
                &document,
                diagnostics[0].range,
                &PrismConfig::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(
            rewritten.root.text().to_string(),
            "class C { void M() {\n  Foo f = Create();\n} }"
        );
    }
}
