//! Expand composite enum constants into a combination of flags
//!
//! A member initialized with a literal that is exactly covered by other
//! declared members is rewritten to spell the combination out:
//!
//! ```text
//! enum E { A = 1, B = 2, C = 4, AB = 3, All = 7 }
//!                             ->  AB = A | B, All = C | AB
//! ```
//!
//! The member itself never appears in its own expansion, and a value with
//! no exact cover is left alone. Zero is never expanded.

use async_trait::async_trait;
use rowan::TextRange;
use tokio_util::sync::CancellationToken;

use prism_core::rewrite::{self, factory};
use prism_core::syntax::ast::{AstNode, EnumMember};
use prism_core::{
    Diagnostic, Document, PrismConfig, PrismError, Result, Rewritten, SemanticModel, Severity,
    SyntaxKind, SyntaxNode, decompose,
};

use crate::engine::{AnalyzerRule, RewriteRule, RuleContext};

pub const EXPAND_FLAGS_VALUE: &str = "expand-flags-value";

pub struct ExpandFlagsValue;

/// The literal initializer node and the expansion text replacing it.
struct Match {
    initializer: SyntaxNode,
    expansion: String,
}

fn match_at(node: &SyntaxNode, model: &SemanticModel) -> Option<Match> {
    let member = EnumMember::cast(node.clone())?;
    let initializer = member.initializer()?.value()?;
    // Only plain literals expand; an explicit combination stays as written.
    if initializer.kind() != SyntaxKind::Literal {
        return None;
    }

    let symbol = model.declared_symbol(node)?;
    let enum_id = symbol.container?;
    let value = model.enum_member_value(symbol.id)?;
    let width = model.enum_width(enum_id)?;
    let members = model.flags_members(enum_id)?;
    let decl_index = model.member_decl_index(symbol.id)?;

    let selection = decompose(width.bits_of(value), width, &members, Some(decl_index))?;
    if selection.len() < 2 {
        return None;
    }
    let expansion = selection
        .iter()
        .map(|&i| members[i].name.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    Some(Match {
        initializer,
        expansion,
    })
}

impl AnalyzerRule for ExpandFlagsValue {
    fn id(&self) -> &'static str {
        EXPAND_FLAGS_VALUE
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::EnumMember]
    }

    fn check(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(matched) = match_at(node, ctx.model) else {
            return Vec::new();
        };
        vec![
            Diagnostic::new(
                AnalyzerRule::id(self),
                self.default_severity(),
                format!("value can be written as '{}'", matched.expansion),
                ctx.location(matched.initializer.text_range()),
                matched.initializer.text_range(),
            )
            .with_metadata("expansion", matched.expansion.clone()),
        ]
    }
}

#[async_trait]
impl RewriteRule for ExpandFlagsValue {
    fn id(&self) -> &'static str {
        EXPAND_FLAGS_VALUE
    }

    async fn apply(
        &self,
        document: &Document,
        target: TextRange,
        _config: &PrismConfig,
        _cancel: &CancellationToken,
    ) -> Result<Rewritten> {
        let literal = document
            .find_node_at(target, SyntaxKind::Literal)
            .ok_or_else(|| PrismError::rewrite("no literal at target range"))?;
        let member = literal
            .ancestors()
            .find(|n| n.kind() == SyntaxKind::EnumMember)
            .ok_or_else(|| PrismError::rewrite("literal is not an enum member initializer"))?;

        let root = document.root();
        let model = SemanticModel::new(&root);
        let matched = match_at(&member, &model)
            .ok_or_else(|| PrismError::rewrite("member no longer expands to a flag combination"))?;
        let replacement = factory::expression(&matched.expansion)
            .ok_or_else(|| PrismError::rewrite("synthesized expansion failed to parse"))?;
        Ok(rewrite::replace_node(&matched.initializer, replacement))
    }
}
