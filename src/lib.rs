pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    Changelog, ChangelogConfig, ChangelogEntry, ChangelogVersion, ReleaseDate, ReleaseVersion,
    parse_changelog, validate_changelog,
};
pub use utils::changelog_checker::{ChangelogChecker, CheckReport, RunOptions, run};
pub use utils::config::LintConfig;
pub use utils::document::Document;
pub use utils::engine::{ChangelogRules, RuleEngine};
pub use utils::reporter::{
    JsonReporter, Outcome, ReportFormat, Reporter, TextReporter, decide_outcome,
};
pub use utils::severity::{Diagnostic, Location, Rule, Severity};
pub use utils::severity_config::SeverityConfig;
