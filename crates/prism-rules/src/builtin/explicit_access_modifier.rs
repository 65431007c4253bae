//! Add explicit access modifiers to declarations that have none
//!
//! Top-level types get `internal`; everything else gets the accessibility
//! configured in `member-accessibility` (`private` by default).

use async_trait::async_trait;
use rowan::TextRange;
use tokio_util::sync::CancellationToken;

use prism_core::rewrite;
use prism_core::syntax::ast::{AstNode, ClassDecl, EnumDecl, FieldDecl, MethodDecl, ModifierList};
use prism_core::{
    Accessibility, Diagnostic, Document, PrismConfig, PrismError, Result, Rewritten, Severity,
    SyntaxKind, SyntaxNode,
};

use crate::engine::{AnalyzerRule, RewriteRule, RuleContext};

pub const EXPLICIT_ACCESS_MODIFIER: &str = "explicit-access-modifier";

const DECL_KINDS: [SyntaxKind; 4] = [
    SyntaxKind::ClassDecl,
    SyntaxKind::EnumDecl,
    SyntaxKind::MethodDecl,
    SyntaxKind::FieldDecl,
];

pub struct ExplicitAccessModifier;

fn modifier_list_of(node: &SyntaxNode) -> Option<ModifierList> {
    match node.kind() {
        SyntaxKind::ClassDecl => ClassDecl::cast(node.clone())?.modifier_list(),
        SyntaxKind::EnumDecl => EnumDecl::cast(node.clone())?.modifier_list(),
        SyntaxKind::MethodDecl => MethodDecl::cast(node.clone())?.modifier_list(),
        SyntaxKind::FieldDecl => FieldDecl::cast(node.clone())?.modifier_list(),
        _ => None,
    }
}

fn is_top_level_type(node: &SyntaxNode) -> bool {
    matches!(node.kind(), SyntaxKind::ClassDecl | SyntaxKind::EnumDecl)
        && node
            .parent()
            .is_some_and(|p| p.kind() == SyntaxKind::SourceFile)
}

fn accessibility_for(node: &SyntaxNode, config: &PrismConfig) -> Accessibility {
    if is_top_level_type(node) {
        Accessibility::Internal
    } else {
        config.member_accessibility
    }
}

impl AnalyzerRule for ExplicitAccessModifier {
    fn id(&self) -> &'static str {
        EXPLICIT_ACCESS_MODIFIER
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &DECL_KINDS
    }

    fn check(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(list) = modifier_list_of(node) else {
            return Vec::new();
        };
        if list.has_access_modifier() {
            return Vec::new();
        }
        let accessibility = accessibility_for(node, ctx.config);
        vec![
            Diagnostic::new(
                AnalyzerRule::id(self),
                self.default_severity(),
                format!("declaration should state '{}' explicitly", accessibility.keyword()),
                ctx.location(node.text_range()),
                node.text_range(),
            )
            .with_metadata("accessibility", accessibility.keyword()),
        ]
    }
}

#[async_trait]
impl RewriteRule for ExplicitAccessModifier {
    fn id(&self) -> &'static str {
        EXPLICIT_ACCESS_MODIFIER
    }

    async fn apply(
        &self,
        document: &Document,
        target: TextRange,
        config: &PrismConfig,
        _cancel: &CancellationToken,
    ) -> Result<Rewritten> {
        let node = DECL_KINDS
            .iter()
            .find_map(|&kind| document.find_node_at(target, kind))
            .ok_or_else(|| PrismError::rewrite("no declaration at target range"))?;
        let list = modifier_list_of(&node)
            .ok_or_else(|| PrismError::rewrite("declaration has no modifier list"))?;
        rewrite::insert_access_modifier(&list, accessibility_for(&node, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::default_registry;

    fn diagnostics_for(source: &str) -> (Document, Vec<Diagnostic>) {
        let document = Document::parse("t.src", source);
        let diagnostics = default_registry()
            .analyze_document(&document, &PrismConfig::default(), &CancellationToken::new())
            .unwrap()
            .into_iter()
            .filter(|d| d.rule_id == EXPLICIT_ACCESS_MODIFIER)
            .collect();
        (document, diagnostics)
    }

    #[test]
    fn flags_bare_type_and_members() {
        let (_, found) = diagnostics_for("class C { int x; public void M() { } }");
        // The class itself and the field; the method already has a modifier.
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].metadata("accessibility"), Some("internal"));
        assert_eq!(found[1].metadata("accessibility"), Some("private"));
    }

    #[test]
    fn decorated_declarations_are_quiet() {
        let (_, found) =
            diagnostics_for("public class C { private int x; internal void M() { } }");
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn inserts_configured_member_accessibility() {
        let source = "public class C { static int x; }";
        let (document, found) = diagnostics_for(source);
        assert_eq!(found.len(), 1);

        let config =
            PrismConfig::from_toml_str("member-accessibility = \"internal\"").unwrap();
        let rewritten = ExplicitAccessModifier
            .apply(&document, found[0].range, &config, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            rewritten.root.text().to_string(),
            "public class C { internal static int x; }"
        );
    }

    #[tokio::test]
    async fn inserts_internal_on_top_level_type() {
        let source = "class C { public int x; }";
        let (document, found) = diagnostics_for(source);
        let rewritten = ExplicitAccessModifier
            .apply(
                &document,
                found[0].range,
                &PrismConfig::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(
            rewritten.root.text().to_string(),
            "internal class C { public int x; }"
        );
    }
}
