//! Configuration for analysis runs
//!
//! Loaded from a TOML file (`prism.toml` by convention). Everything has a
//! default so an empty file, or no file at all, yields a working setup.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Severity;
use crate::error::PrismError;
use crate::result::Result;
use crate::semantic::Accessibility;

/// Per-rule severity override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Hint for improvements
    Hint,
    /// Warning (doesn't fail build)
    Warn,
    /// Error (fails build)
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity this maps to; `None` disables the rule.
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Hint => Some(Severity::Hint),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PrismConfig {
    /// Severity overrides keyed by rule id, in file order.
    pub rules: IndexMap<String, RuleSeverity>,

    /// Accessibility inserted by the explicit-access-modifier rewrite when
    /// a member declares none.
    pub member_accessibility: Accessibility,

    /// Abort an analysis run after this many diagnostics per document.
    pub max_diagnostics_per_document: usize,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            rules: IndexMap::new(),
            member_accessibility: Accessibility::Private,
            max_diagnostics_per_document: 1024,
        }
    }
}

impl PrismConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PrismError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PrismError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Effective severity of a rule: the configured override, or the
    /// rule's own default. `None` means the rule is off.
    pub fn severity_for(&self, rule_id: &str, default: Severity) -> Option<Severity> {
        match self.rules.get(rule_id) {
            Some(configured) => configured.to_severity(),
            None => Some(default),
        }
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        self.rules.get(rule_id) != Some(&RuleSeverity::Off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = PrismConfig::from_toml_str("").unwrap();
        assert_eq!(config.member_accessibility, Accessibility::Private);
        assert!(config.is_enabled("use-coalesce-expression"));
        assert_eq!(
            config.severity_for("use-coalesce-expression", Severity::Info),
            Some(Severity::Info)
        );
    }

    #[test]
    fn rule_overrides_parse_in_order() {
        let config = PrismConfig::from_toml_str(
            r#"
            member-accessibility = "internal"

            [rules]
            use-coalesce-expression = "off"
            merge-switch-sections = "warn"
            "#,
        )
        .unwrap();
        assert_eq!(config.member_accessibility, Accessibility::Internal);
        assert!(!config.is_enabled("use-coalesce-expression"));
        assert_eq!(
            config.severity_for("use-coalesce-expression", Severity::Info),
            None
        );
        assert_eq!(
            config.severity_for("merge-switch-sections", Severity::Info),
            Some(Severity::Warning)
        );
        let keys: Vec<_> = config.rules.keys().map(String::as_str).collect();
        assert_eq!(keys, ["use-coalesce-expression", "merge-switch-sections"]);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prism.toml");
        std::fs::write(&path, "max-diagnostics-per-document = 16\n").unwrap();

        let config = PrismConfig::load(&path).unwrap();
        assert_eq!(config.max_diagnostics_per_document, 16);

        let err = PrismConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, PrismError::Io { .. }));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = PrismConfig::from_toml_str("rules = 3").unwrap_err();
        assert!(matches!(err, PrismError::Config { .. }));
    }
}
