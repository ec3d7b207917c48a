use super::changelog::{ChangelogConfig, parse_changelog, validate_changelog};
use super::document::Document;
use super::severity::{Diagnostic, Location, Rule};
use super::severity_config::SeverityConfig;
use tracing::debug;

/// evaluates a document against a rule-set
pub trait RuleEngine {
    fn analyze(&self, document: &Document) -> Vec<Diagnostic>;
}

/// the keep-a-changelog rule-set
#[derive(Debug, Clone, Default)]
pub struct ChangelogRules {
    pub config: ChangelogConfig,
    pub severity: SeverityConfig,
    /// canonical repository url used to check release links
    pub repository: Option<String>,
}

impl ChangelogRules {
    pub fn new(config: ChangelogConfig, severity: SeverityConfig) -> Self {
        Self {
            config,
            severity,
            repository: None,
        }
    }

    pub fn repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    /// documents that cannot be analyzed at all
    fn parse_error(&self, document: &Document) -> Option<Diagnostic> {
        let severity = self.severity.get_severity(Rule::ParseError);

        if let Some(offset) = document.invalid_utf8_at {
            return Some(
                Diagnostic::new(
                    severity,
                    Rule::ParseError,
                    "document is not valid UTF-8 text",
                )
                .at(document.location(offset)),
            );
        }

        if document.is_blank() {
            return Some(
                Diagnostic::new(severity, Rule::ParseError, "document is empty")
                    .at(Location::new(1, 1)),
            );
        }

        None
    }
}

impl RuleEngine for ChangelogRules {
    fn analyze(&self, document: &Document) -> Vec<Diagnostic> {
        if let Some(diagnostic) = self.parse_error(document) {
            debug!(path = %document.path.display(), "document cannot be parsed");
            return vec![diagnostic];
        }

        if self.repository.is_none() {
            debug!("no repository configured, skipping link rules");
        }

        let changelog = parse_changelog(document);
        validate_changelog(
            &changelog,
            &self.config,
            &self.severity,
            self.repository.as_deref(),
        )
    }
}
