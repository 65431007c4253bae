//! Collapse lazy initialization into a coalesce expression
//!
//! ```text
//! if (x == null) { x = new Foo(); }     return x ?? (x = new Foo());
//! return x;                         ->
//! ```

use async_trait::async_trait;
use rowan::{NodeOrToken, TextRange};
use tokio_util::sync::CancellationToken;

use prism_core::rewrite::{self, factory};
use prism_core::syntax::info::LazyInitInfo;
use prism_core::{
    Diagnostic, Document, PrismConfig, PrismError, Result, Rewritten, Severity, SyntaxKind,
    SyntaxNode,
};

use crate::engine::{AnalyzerRule, RewriteRule, RuleContext};

pub const USE_COALESCE_EXPRESSION: &str = "use-coalesce-expression";

pub struct UseCoalesceExpression;

impl AnalyzerRule for UseCoalesceExpression {
    fn id(&self) -> &'static str {
        USE_COALESCE_EXPRESSION
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::IfStmt]
    }

    fn check(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(info) = LazyInitInfo::from_if_statement(node) else {
            return Vec::new();
        };
        vec![
            Diagnostic::new(
                AnalyzerRule::id(self),
                self.default_severity(),
                "use coalesce expression for lazy initialization",
                ctx.location(node.text_range()),
                node.text_range(),
            )
            .with_metadata("target", info.target.text().to_string())
            .with_fade_out(info.if_statement.text_range()),
        ]
    }
}

#[async_trait]
impl RewriteRule for UseCoalesceExpression {
    fn id(&self) -> &'static str {
        USE_COALESCE_EXPRESSION
    }

    async fn apply(
        &self,
        document: &Document,
        target: TextRange,
        _config: &PrismConfig,
        _cancel: &CancellationToken,
    ) -> Result<Rewritten> {
        let if_stmt = document
            .find_node_at(target, SyntaxKind::IfStmt)
            .ok_or_else(|| PrismError::rewrite("no if statement at target range"))?;
        let info = LazyInitInfo::from_if_statement(&if_stmt).ok_or_else(|| {
            PrismError::rewrite("statement no longer matches lazy initialization")
        })?;
        let block = if_stmt
            .parent()
            .ok_or_else(|| PrismError::rewrite("statement has no enclosing block"))?;

        let target_text = info.target.text().to_string();
        let text = format!(
            "return {target_text} ?? ({target_text} = {});",
            info.initializer.text()
        );
        let replacement = factory::statement(&text)
            .ok_or_else(|| PrismError::rewrite("synthesized statement failed to parse"))?;

        rewrite::replace_statements(
            &block,
            &info.if_statement,
            &info.return_statement,
            vec![NodeOrToken::Node(replacement)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::default_registry;

    const SOURCE: &str = "class C { Foo M() {\n  if (f == null) { f = new Foo(); }\n  return f;\n} }";

    #[test]
    fn detects_lazy_initialization() {
        let document = Document::parse("t.src", SOURCE);
        let diagnostics = default_registry()
            .analyze_document(&document, &PrismConfig::default(), &CancellationToken::new())
            .unwrap();
        let found: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.rule_id == USE_COALESCE_EXPRESSION)
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].metadata("target"), Some("f"));
        assert_eq!(found[0].fade_out_ranges.len(), 1);
    }

    #[tokio::test]
    async fn rewrites_to_coalesce_return() {
        let document = Document::parse("t.src", SOURCE);
        let diagnostics = default_registry()
            .analyze_document(&document, &PrismConfig::default(), &CancellationToken::new())
            .unwrap();
        let diagnostic = diagnostics
            .iter()
            .find(|d| d.rule_id == USE_COALESCE_EXPRESSION)
            .unwrap();

        let rewritten = UseCoalesceExpression
            .apply(
                &document,
                diagnostic.range,
                &PrismConfig::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(
            rewritten.root.text().to_string(),
            "class C { Foo M() {\n  return f ?? (f = new Foo());\n} }"
        );
    }

    #[tokio::test]
    async fn stale_target_is_an_error() {
        let document = Document::parse("t.src", "class C { void M() { x = 1; } }");
        let result = UseCoalesceExpression
            .apply(
                &document,
                TextRange::at(0.into(), 4.into()),
                &PrismConfig::default(),
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(PrismError::Rewrite { .. })));
    }

    #[test]
    fn if_with_else_is_not_lazy_init() {
        let document = Document::parse(
            "t.src",
            "class C { Foo M() { if (f == null) { f = new Foo(); } else { f = null; } return f; } }",
        );
        let diagnostics = default_registry()
            .analyze_document(&document, &PrismConfig::default(), &CancellationToken::new())
            .unwrap();
        assert!(diagnostics.iter().all(|d| d.rule_id != USE_COALESCE_EXPRESSION));
    }
}
