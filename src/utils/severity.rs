use serde::{Deserialize, Serialize};
use std::fmt;

/// severity level for diagnostics reported against a changelog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// violation of a required convention
    Error,
    /// suspicious structure that still fails the run unless allowed
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            _ => Err(format!("invalid severity: {}, use 'error' or 'warning'", s)),
        }
    }
}

/// rule that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// document is empty or not valid UTF-8
    ParseError,
    /// missing or misnamed level-1 title
    Title,
    /// level-2 heading is not a recognizable release
    ReleaseHeading,
    /// release date missing, malformed or out of order
    ReleaseDate,
    /// releases not in descending order
    ReleaseOrder,
    /// same release listed twice
    DuplicateRelease,
    /// level-3 heading outside the allowed categories
    UnknownCategory,
    /// same category twice within one release
    DuplicateCategory,
    /// category heading without entries
    EmptyCategory,
    /// release without any content
    EmptyRelease,
    /// list entry not grouped under a category
    EntryOutsideCategory,
    /// list entry without text
    EmptyEntry,
    /// release label has no link target
    MissingLinkDefinition,
    /// release link target does not match the repository
    InvalidLinkDefinition,
    /// version-like link definition without a release
    UnusedLinkDefinition,
}

impl Rule {
    pub const ALL: [Rule; 15] = [
        Rule::ParseError,
        Rule::Title,
        Rule::ReleaseHeading,
        Rule::ReleaseDate,
        Rule::ReleaseOrder,
        Rule::DuplicateRelease,
        Rule::UnknownCategory,
        Rule::DuplicateCategory,
        Rule::EmptyCategory,
        Rule::EmptyRelease,
        Rule::EntryOutsideCategory,
        Rule::EmptyEntry,
        Rule::MissingLinkDefinition,
        Rule::InvalidLinkDefinition,
        Rule::UnusedLinkDefinition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::ParseError => "parse-error",
            Rule::Title => "title",
            Rule::ReleaseHeading => "release-heading",
            Rule::ReleaseDate => "release-date",
            Rule::ReleaseOrder => "release-order",
            Rule::DuplicateRelease => "duplicate-release",
            Rule::UnknownCategory => "unknown-category",
            Rule::DuplicateCategory => "duplicate-category",
            Rule::EmptyCategory => "empty-category",
            Rule::EmptyRelease => "empty-release",
            Rule::EntryOutsideCategory => "entry-outside-category",
            Rule::EmptyEntry => "empty-entry",
            Rule::MissingLinkDefinition => "missing-link-definition",
            Rule::InvalidLinkDefinition => "invalid-link-definition",
            Rule::UnusedLinkDefinition => "unused-link-definition",
        }
    }

    /// severity used when the configuration does not override it
    pub fn default_severity(&self) -> Severity {
        match self {
            Rule::EmptyRelease | Rule::UnusedLinkDefinition => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Rule::ALL
            .iter()
            .find(|rule| rule.as_str() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown rule: {}", s))
    }
}

/// 1-based position inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// one problem found in a changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub rule: Rule,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(severity: Severity, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(
                f,
                "{} [{}] {} ({})",
                location, self.severity, self.message, self.rule
            ),
            None => write!(f, "[{}] {} ({})", self.severity, self.message, self.rule),
        }
    }
}

/// order diagnostics by first occurrence, keeping emission order for ties
pub fn sort_by_position(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| d.location);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_round_trips_through_str() {
        for rule in Rule::ALL {
            assert_eq!(rule.as_str().parse::<Rule>().unwrap(), rule);
        }
        assert_eq!(
            "release_order".parse::<Rule>().unwrap(),
            Rule::ReleaseOrder
        );
        assert!("no-such-rule".parse::<Rule>().is_err());
    }

    #[test]
    fn test_sort_keeps_unlocated_first_and_ties_stable() {
        let mut diagnostics = vec![
            Diagnostic::new(Severity::Error, Rule::Title, "b").at(Location::new(4, 1)),
            Diagnostic::new(Severity::Error, Rule::EmptyEntry, "c").at(Location::new(2, 1)),
            Diagnostic::new(Severity::Error, Rule::ParseError, "a"),
            Diagnostic::new(Severity::Error, Rule::EmptyCategory, "d").at(Location::new(2, 1)),
        ];

        sort_by_position(&mut diagnostics);

        let order: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_display_includes_location_and_rule() {
        let diagnostic = Diagnostic::new(Severity::Warning, Rule::EmptyRelease, "empty")
            .at(Location::new(3, 1));
        assert_eq!(diagnostic.to_string(), "3:1 [warning] empty (empty-release)");
    }
}
