//! Built-in analyzer and rewrite rules
//!
//! Every rule here has two faces registered under one id: the analyzer
//! that detects the pattern and the rewrite that applies the change.

mod expand_flags_value;
mod explicit_access_modifier;
mod merge_declaration_assignment;
mod merge_switch_sections;
mod use_coalesce;

use std::sync::Arc;

pub use expand_flags_value::{EXPAND_FLAGS_VALUE, ExpandFlagsValue};
pub use explicit_access_modifier::{EXPLICIT_ACCESS_MODIFIER, ExplicitAccessModifier};
pub use merge_declaration_assignment::{
    MERGE_DECLARATION_AND_ASSIGNMENT, MergeDeclarationAndAssignment,
};
pub use merge_switch_sections::{MERGE_SWITCH_SECTIONS, MergeSwitchSections};
pub use use_coalesce::{USE_COALESCE_EXPRESSION, UseCoalesceExpression};

use crate::engine::RuleRegistry;

/// Registry with every built-in rule registered, analyzers and rewriters.
pub fn default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    registry.register_analyzer(Arc::new(UseCoalesceExpression));
    registry.register_rewriter(Arc::new(UseCoalesceExpression));

    registry.register_analyzer(Arc::new(MergeDeclarationAndAssignment));
    registry.register_rewriter(Arc::new(MergeDeclarationAndAssignment));

    registry.register_analyzer(Arc::new(MergeSwitchSections));
    registry.register_rewriter(Arc::new(MergeSwitchSections));

    registry.register_analyzer(Arc::new(ExplicitAccessModifier));
    registry.register_rewriter(Arc::new(ExplicitAccessModifier));

    registry.register_analyzer(Arc::new(ExpandFlagsValue));
    registry.register_rewriter(Arc::new(ExpandFlagsValue));

    registry
}
