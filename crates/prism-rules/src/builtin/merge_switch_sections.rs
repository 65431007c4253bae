//! Merge switch sections with equivalent bodies
//!
//! When two adjacent sections run token-for-token the same statements, the
//! first section's body is dropped and its labels fall through:
//!
//! ```text
//! case 1: y = 1; break;          case 1:
//! case 2: y = 1; break;     ->   case 2: y = 1; break;
//! ```

use async_trait::async_trait;
use rowan::TextRange;
use tokio_util::sync::CancellationToken;

use prism_core::rewrite;
use prism_core::syntax::ast::{AstNode, SwitchSection};
use prism_core::syntax::info::{SwitchSectionInfo, sections_equivalent};
use prism_core::{
    Diagnostic, Document, PrismConfig, PrismError, Result, Rewritten, Severity, SyntaxKind,
    SyntaxNode,
};

use crate::engine::{AnalyzerRule, RewriteRule, RuleContext};

pub const MERGE_SWITCH_SECTIONS: &str = "merge-switch-sections";

pub struct MergeSwitchSections;

fn match_at(node: &SyntaxNode) -> Option<SwitchSectionInfo> {
    let info = SwitchSectionInfo::from_section(node)?;
    if info.statements.is_empty() || !info.ends_with_break() || info.contains_directive() {
        return None;
    }
    let next = node.next_sibling()?;
    if next.kind() != SyntaxKind::SwitchSection {
        return None;
    }
    let next_info = SwitchSectionInfo::from_section(&next)?;
    if !sections_equivalent(&info, &next_info) {
        return None;
    }
    Some(info)
}

impl AnalyzerRule for MergeSwitchSections {
    fn id(&self) -> &'static str {
        MERGE_SWITCH_SECTIONS
    }

    fn default_severity(&self) -> Severity {
        Severity::Hint
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::SwitchSection]
    }

    fn check(&self, node: &SyntaxNode, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(info) = match_at(node) else {
            return Vec::new();
        };
        let body_range = TextRange::new(
            info.statements[0].text_range().start(),
            info.statements[info.statements.len() - 1].text_range().end(),
        );
        vec![
            Diagnostic::new(
                AnalyzerRule::id(self),
                self.default_severity(),
                "this section runs the same statements as the next one; merge the labels",
                ctx.location(node.text_range()),
                node.text_range(),
            )
            .with_fade_out(body_range),
        ]
    }
}

#[async_trait]
impl RewriteRule for MergeSwitchSections {
    fn id(&self) -> &'static str {
        MERGE_SWITCH_SECTIONS
    }

    async fn apply(
        &self,
        document: &Document,
        target: TextRange,
        _config: &PrismConfig,
        _cancel: &CancellationToken,
    ) -> Result<Rewritten> {
        let node = document
            .find_node_at(target, SyntaxKind::SwitchSection)
            .ok_or_else(|| PrismError::rewrite("no switch section at target range"))?;
        match_at(&node).ok_or_else(|| {
            PrismError::rewrite("sections no longer have equivalent bodies")
        })?;
        let section = SwitchSection::cast(node)
            .ok_or_else(|| PrismError::rewrite("target is not a switch section"))?;
        rewrite::strip_switch_section_body(&section)
    }
}
