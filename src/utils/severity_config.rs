use super::severity::{Rule, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// configuration for diagnostic severity levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityConfig {
    /// rules that are not evaluated at all
    #[serde(default)]
    pub allow: Vec<Rule>,

    /// per-rule severity, keyed by rule id (e.g. "empty-release" = "error")
    #[serde(default)]
    pub overrides: BTreeMap<String, Severity>,
}

impl SeverityConfig {
    pub fn allow(mut self, rule: Rule) -> Self {
        self.allow.push(rule);
        self
    }

    pub fn set_severity(mut self, rule: Rule, severity: Severity) -> Self {
        self.overrides.insert(rule.as_str().to_string(), severity);
        self
    }

    /// check if a rule should be evaluated
    pub fn is_enabled(&self, rule: Rule) -> bool {
        !self.allow.contains(&rule)
    }

    /// get severity for a specific rule
    pub fn get_severity(&self, rule: Rule) -> Severity {
        self.overrides
            .get(rule.as_str())
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }

    /// check that every override names a known rule
    pub fn validate(&self) -> Result<(), String> {
        for key in self.overrides.keys() {
            key.parse::<Rule>()?;
        }
        if self.allow.contains(&Rule::ParseError) {
            return Err("the parse-error rule cannot be allowed".to_string());
        }
        Ok(())
    }
}
