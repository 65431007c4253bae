//! Rule engine: registration and dispatch
//!
//! Analyzer rules are pure detectors: they subscribe to node kinds and
//! return diagnostics. The registry walks each document's tree exactly
//! once, in preorder, handing every node to the rules subscribed to its
//! kind; one walk serves any number of rules.
//!
//! Rewrite rules are the applying side. They are addressed by rule id and
//! take their target as a byte range rather than a node, so a pending
//! rewrite can cross threads and be re-resolved against the document in
//! whichever worker applies it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rayon::prelude::*;
use rowan::TextRange;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use prism_core::{
    Diagnostic, Document, Location, PrismConfig, PrismError, Result, ResultExt, Rewritten,
    SemanticModel, Severity, SyntaxKind, SyntaxNode,
};

/// Everything a rule may consult while checking one document.
pub struct RuleContext<'a> {
    pub document: &'a Document,
    pub model: &'a SemanticModel,
    pub config: &'a PrismConfig,
    pub cancel: &'a CancellationToken,
}

impl RuleContext<'_> {
    pub fn location(&self, range: TextRange) -> Location {
        self.document.location(range)
    }
}

/// A detector. Subscribes to node kinds; must be side-effect free.
pub trait AnalyzerRule: Send + Sync {
    fn id(&self) -> &'static str;
    fn default_severity(&self) -> Severity;
    /// Node kinds this rule wants to be called for.
    fn kinds(&self) -> &'static [SyntaxKind];
    fn check(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// The applying side of a rule. `target` is the primary range of the
/// diagnostic the rewrite answers; the implementation re-resolves it to a
/// node and produces a new tree, or explains why it cannot.
#[async_trait]
pub trait RewriteRule: Send + Sync {
    fn id(&self) -> &'static str;

    async fn apply(
        &self,
        document: &Document,
        target: TextRange,
        config: &PrismConfig,
        cancel: &CancellationToken,
    ) -> Result<Rewritten>;
}

/// Registry of analyzer and rewrite rules, with kind-indexed dispatch.
#[derive(Default)]
pub struct RuleRegistry {
    analyzers: Vec<Arc<dyn AnalyzerRule>>,
    by_kind: HashMap<SyntaxKind, Vec<usize>>,
    rewriters: HashMap<&'static str, Arc<dyn RewriteRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_analyzer(&mut self, rule: Arc<dyn AnalyzerRule>) {
        let index = self.analyzers.len();
        for &kind in rule.kinds() {
            self.by_kind.entry(kind).or_default().push(index);
        }
        debug!(rule = rule.id(), "registered analyzer rule");
        self.analyzers.push(rule);
    }

    pub fn register_rewriter(&mut self, rule: Arc<dyn RewriteRule>) {
        self.rewriters.insert(rule.id(), rule);
    }

    pub fn analyzer_ids(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|r| r.id()).collect()
    }

    pub fn rewriter(&self, id: &str) -> Option<Arc<dyn RewriteRule>> {
        self.rewriters.get(id).cloned()
    }

    /// Apply the rewrite registered under `rule_id` to a pending target.
    /// A recoverable failure (typically a stale diagnostic whose shape no
    /// longer matches the document) is logged and reported as `None`;
    /// cancellation and infrastructure errors propagate.
    pub async fn apply_rewrite(
        &self,
        rule_id: &str,
        document: &Document,
        target: TextRange,
        config: &PrismConfig,
        cancel: &CancellationToken,
    ) -> Result<Option<Rewritten>> {
        let rule = self
            .rewriters
            .get(rule_id)
            .ok_or_else(|| PrismError::rule(rule_id, "no rewrite registered under this id"))?;
        rule.apply(document, target, config, cancel)
            .await
            .recoverable()
    }

    /// Analyze one document: single preorder walk, kind-dispatched rules.
    pub fn analyze_document(
        &self,
        document: &Document,
        config: &PrismConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let root = document.root();
        let model = SemanticModel::new(&root);
        let ctx = RuleContext {
            document,
            model: &model,
            config,
            cancel,
        };

        let mut diagnostics = Vec::new();
        for (visited, node) in root.descendants().enumerate() {
            if visited % 128 == 0 && cancel.is_cancelled() {
                return Err(PrismError::Cancelled);
            }
            let Some(indices) = self.by_kind.get(&node.kind()) else {
                continue;
            };
            for &index in indices {
                let rule = &self.analyzers[index];
                let Some(severity) = config.severity_for(rule.id(), rule.default_severity())
                else {
                    continue;
                };
                for mut diagnostic in rule.check(&node, &ctx) {
                    diagnostic.severity = severity;
                    diagnostics.push(diagnostic);
                    if diagnostics.len() >= config.max_diagnostics_per_document {
                        warn!(
                            path = %document.path().display(),
                            limit = config.max_diagnostics_per_document,
                            "diagnostic limit reached, stopping analysis of document"
                        );
                        return Ok(diagnostics);
                    }
                }
            }
        }
        Ok(diagnostics)
    }

    /// Analyze a batch of documents in parallel. The first error cancels
    /// nothing by itself; a cancelled token aborts every worker.
    pub fn analyze_all(
        &self,
        documents: &[Document],
        config: &PrismConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let per_document: Vec<Vec<Diagnostic>> = documents
            .par_iter()
            .map(|document| self.analyze_document(document, config, cancel))
            .collect::<Result<_>>()?;
        Ok(per_document.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountAssignments;

    impl AnalyzerRule for CountAssignments {
        fn id(&self) -> &'static str {
            "count-assignments"
        }

        fn default_severity(&self) -> Severity {
            Severity::Info
        }

        fn kinds(&self) -> &'static [SyntaxKind] {
            &[SyntaxKind::AssignExpr]
        }

        fn check(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
            vec![Diagnostic::new(
                self.id(),
                self.default_severity(),
                "assignment",
                ctx.location(node.text_range()),
                node.text_range(),
            )]
        }
    }

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register_analyzer(Arc::new(CountAssignments));
        registry
    }

    #[test]
    fn kind_dispatch_fires_per_matching_node() {
        let document = Document::parse("t.src", "class C { void M() { x = 1; y = 2; } }");
        let diagnostics = registry()
            .analyze_document(&document, &PrismConfig::default(), &CancellationToken::new())
            .unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.rule_id == "count-assignments"));
    }

    #[test]
    fn configured_severity_overrides_default() {
        let config = PrismConfig::from_toml_str("[rules]\ncount-assignments = \"error\"").unwrap();
        let document = Document::parse("t.src", "class C { void M() { x = 1; } }");
        let diagnostics = registry()
            .analyze_document(&document, &config, &CancellationToken::new())
            .unwrap();
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let config = PrismConfig::from_toml_str("[rules]\ncount-assignments = \"off\"").unwrap();
        let document = Document::parse("t.src", "class C { void M() { x = 1; } }");
        let diagnostics = registry()
            .analyze_document(&document, &config, &CancellationToken::new())
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn cancelled_token_aborts_analysis() {
        let document = Document::parse("t.src", "class C { void M() { x = 1; } }");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = registry().analyze_document(&document, &PrismConfig::default(), &cancel);
        assert!(matches!(result, Err(PrismError::Cancelled)));
    }

    #[tokio::test]
    async fn stale_rewrite_target_is_skipped_not_fatal() {
        let registry = crate::builtin::default_registry();
        let document = Document::parse("t.src", "class C { void M() { x = 1; } }");
        let skipped = registry
            .apply_rewrite(
                "use-coalesce-expression",
                &document,
                TextRange::at(0.into(), 4.into()),
                &PrismConfig::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(skipped.is_none());
    }

    #[tokio::test]
    async fn cancelled_rewrite_propagates() {
        let registry = crate::builtin::default_registry();
        let document =
            Document::parse("t.src", "class C { void M() { Foo f = null;\nf = Create(); } }");
        let target = registry
            .analyze_document(&document, &PrismConfig::default(), &CancellationToken::new())
            .unwrap()
            .into_iter()
            .find(|d| d.rule_id == "merge-declaration-and-assignment")
            .unwrap()
            .range;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = registry
            .apply_rewrite(
                "merge-declaration-and-assignment",
                &document,
                target,
                &PrismConfig::default(),
                &cancel,
            )
            .await;
        assert!(matches!(result, Err(PrismError::Cancelled)));
    }

    #[tokio::test]
    async fn unknown_rewrite_id_is_a_rule_error() {
        let registry = crate::builtin::default_registry();
        let document = Document::parse("t.src", "class C { }");
        let result = registry
            .apply_rewrite(
                "no-such-rule",
                &document,
                TextRange::at(0.into(), 1.into()),
                &PrismConfig::default(),
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(PrismError::Rule { .. })));
    }

    #[test]
    fn batch_analysis_flattens_documents() {
        let documents = vec![
            Document::parse("a.src", "class A { void M() { x = 1; } }"),
            Document::parse("b.src", "class B { void M() { x = 1; y = 2; } }"),
        ];
        let diagnostics = registry()
            .analyze_all(&documents, &PrismConfig::default(), &CancellationToken::new())
            .unwrap();
        assert_eq!(diagnostics.len(), 3);
    }
}
