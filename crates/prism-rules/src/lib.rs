//! Prism Rules
//!
//! The rule surface on top of `prism-core`: the analyzer/rewrite rule
//! traits, the kind-dispatched rule registry, and the built-in rules.

pub mod builtin;
pub mod engine;

pub use builtin::default_registry;
pub use engine::{AnalyzerRule, RewriteRule, RuleContext, RuleRegistry};
