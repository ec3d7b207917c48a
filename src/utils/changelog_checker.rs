use super::config::LintConfig;
use super::document::Document;
use super::engine::{ChangelogRules, RuleEngine};
use super::reporter::{Outcome, ReportFormat, Reporter, decide_outcome};
use super::severity::Diagnostic;
use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// diagnostics for one changelog
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn outcome(&self) -> Outcome {
        decide_outcome(&self.diagnostics)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }
}

/// where to find the changelog and how to configure the rules
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// project root; config, Cargo.toml and relative changelog paths resolve here
    pub project_dir: PathBuf,
    pub changelog: Option<PathBuf>,
    /// used as given, a relative path is relative to the working directory
    pub config_file: Option<PathBuf>,
    pub repository: Option<String>,
    pub quiet: bool,
    pub format: ReportFormat,
}

impl RunOptions {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            changelog: None,
            config_file: None,
            repository: None,
            quiet: false,
            format: ReportFormat::Human,
        }
    }

    pub fn changelog(mut self, path: impl Into<PathBuf>) -> Self {
        self.changelog = Some(path.into());
        self
    }

    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// load the config file and apply command line overrides
    pub fn load_config(&self) -> Result<LintConfig> {
        let mut config = match &self.config_file {
            Some(path) => LintConfig::load_from_file(path)?,
            None => LintConfig::load_or_default(&self.project_dir)?,
        };

        if self.repository.is_some() {
            config.repository = self.repository.clone();
        }
        config.quiet |= self.quiet;
        config.resolve_repository(&self.project_dir)?;

        Ok(config)
    }

    pub fn changelog_path(&self, config: &LintConfig) -> PathBuf {
        let name = match &self.changelog {
            Some(path) => path.clone(),
            None => PathBuf::from(&config.changelog.changelog_file_name),
        };
        self.project_dir.join(name)
    }
}

/// loads a changelog, runs the rules and reports the result
pub struct ChangelogChecker;

impl ChangelogChecker {
    /// load the document and evaluate it; load failures abort before any rule runs
    pub fn check<P: AsRef<Path>>(path: P, engine: &dyn RuleEngine) -> Result<CheckReport> {
        let document = Document::load(path)?;
        let diagnostics = engine.analyze(&document);

        debug!(
            path = %document.path.display(),
            diagnostics = diagnostics.len(),
            "analyzed changelog"
        );

        Ok(CheckReport {
            path: document.path,
            diagnostics,
        })
    }

    /// check a changelog and write the rendered report
    pub fn run<P: AsRef<Path>, W: Write>(
        path: P,
        engine: &dyn RuleEngine,
        reporter: &dyn Reporter,
        out: &mut W,
    ) -> Result<Outcome> {
        let report = Self::check(path, engine)?;

        let rendered = reporter.report(&report.path, &report.diagnostics)?;
        out.write_all(rendered.as_bytes())?;
        out.flush()?;

        let outcome = report.outcome();
        info!(
            path = %report.path.display(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            outcome = ?outcome,
            "changelog check finished"
        );
        Ok(outcome)
    }
}

/// resolve configuration and run the whole pipeline
pub fn run<W: Write>(options: &RunOptions, out: &mut W) -> Result<Outcome> {
    let config = options.load_config()?;
    let path = options.changelog_path(&config);

    let engine = ChangelogRules::new(config.changelog.clone(), config.severity.clone())
        .repository(config.repository.clone());
    let reporter = options.format.reporter(config.quiet);

    ChangelogChecker::run(&path, &engine, reporter.as_ref(), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::severity::{Location, Rule, Severity};
    use std::fs;
    use tempfile::TempDir;

    /// engine that returns a fixed list of diagnostics
    struct FixedEngine(Vec<Diagnostic>);

    impl RuleEngine for FixedEngine {
        fn analyze(&self, _document: &Document) -> Vec<Diagnostic> {
            self.0.clone()
        }
    }

    /// reporter that renders only the count
    struct CountingReporter;

    impl Reporter for CountingReporter {
        fn report(&self, _source: &Path, diagnostics: &[Diagnostic]) -> Result<String> {
            Ok(format!("{}\n", diagnostics.len()))
        }
    }

    /// reporter whose rendering always fails
    struct BrokenReporter;

    impl Reporter for BrokenReporter {
        fn report(&self, _source: &Path, _diagnostics: &[Diagnostic]) -> Result<String> {
            let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            Err(err.into())
        }
    }

    fn changelog_file(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("CHANGELOG.md");
        fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_run_passes_with_no_diagnostics() {
        let (_temp_dir, path) = changelog_file("# Changelog\n");
        let mut out = Vec::new();

        let outcome =
            ChangelogChecker::run(&path, &FixedEngine(Vec::new()), &CountingReporter, &mut out)
                .unwrap();

        assert_eq!(outcome, Outcome::Pass);
        assert_eq!(String::from_utf8(out).unwrap(), "0\n");
    }

    #[test]
    fn test_run_fails_with_diagnostics() {
        let (_temp_dir, path) = changelog_file("# Changelog\n");
        let engine = FixedEngine(vec![
            Diagnostic::new(Severity::Warning, Rule::EmptyRelease, "empty")
                .at(Location::new(3, 1)),
        ]);
        let mut out = Vec::new();

        let outcome = ChangelogChecker::run(&path, &engine, &CountingReporter, &mut out).unwrap();

        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");
    }

    #[test]
    fn test_load_error_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        let err = ChangelogChecker::run(
            temp_dir.path().join("CHANGELOG.md"),
            &FixedEngine(Vec::new()),
            &CountingReporter,
            &mut out,
        )
        .unwrap_err();

        assert!(err.is_load_error());
        assert!(out.is_empty());
    }

    #[test]
    fn test_render_failure_is_an_error() {
        let (_temp_dir, path) = changelog_file("# Changelog\n");
        let mut out = Vec::new();

        let err = ChangelogChecker::run(&path, &FixedEngine(Vec::new()), &BrokenReporter, &mut out)
            .unwrap_err();

        assert!(matches!(err, crate::error::Error::ReportError(_)));
        assert!(err.to_string().starts_with("failed to render report"));
        assert!(!err.is_load_error());
        assert!(out.is_empty());
    }

    #[test]
    fn test_options_resolve_paths_and_overrides() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("changelint.toml"),
            "repository = \"https://github.com/owner/from-config\"\n\n[changelog]\nchangelog_file_name = \"CHANGES.md\"\n",
        )
        .unwrap();

        let options = RunOptions::new(temp_dir.path());
        let config = options.load_config().unwrap();
        assert_eq!(
            options.changelog_path(&config),
            temp_dir.path().join("CHANGES.md")
        );
        assert_eq!(
            config.repository.as_deref(),
            Some("https://github.com/owner/from-config")
        );

        let options = RunOptions::new(temp_dir.path())
            .changelog("docs/HISTORY.md")
            .repository("https://github.com/owner/from-flag")
            .quiet(true);
        let config = options.load_config().unwrap();
        assert_eq!(
            options.changelog_path(&config),
            temp_dir.path().join("docs/HISTORY.md")
        );
        assert_eq!(
            config.repository.as_deref(),
            Some("https://github.com/owner/from-flag")
        );
        assert!(config.quiet);
    }
}
