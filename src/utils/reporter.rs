use super::severity::Diagnostic;
use crate::error::Result;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// result of a lint run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        *self == Outcome::Pass
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 1,
        }
    }
}

/// any diagnostic, warnings included, fails the run
pub fn decide_outcome(diagnostics: &[Diagnostic]) -> Outcome {
    if diagnostics.is_empty() {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}

/// renders diagnostics for one document
pub trait Reporter {
    fn report(&self, source: &Path, diagnostics: &[Diagnostic]) -> Result<String>;
}

/// report format selectable from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Human,
    Json,
}

impl ReportFormat {
    pub fn reporter(&self, quiet: bool) -> Box<dyn Reporter> {
        match self {
            ReportFormat::Human => Box::new(TextReporter::new(quiet)),
            ReportFormat::Json => Box::new(JsonReporter),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "human" | "text" => Ok(ReportFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// human readable report, one line per diagnostic
#[derive(Debug, Clone, Default)]
pub struct TextReporter {
    /// render nothing when there are no diagnostics
    pub quiet: bool,
}

impl TextReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for TextReporter {
    fn report(&self, source: &Path, diagnostics: &[Diagnostic]) -> Result<String> {
        let mut output = String::new();

        if diagnostics.is_empty() {
            if !self.quiet {
                let _ = writeln!(output, "{}: no issues found", source.display());
            }
            return Ok(output);
        }

        let positions: Vec<String> = diagnostics
            .iter()
            .map(|d| match d.location {
                Some(location) => location.to_string(),
                None => "-".to_string(),
            })
            .collect();
        let position_width = positions.iter().map(|p| p.len()).max().unwrap_or(1);

        let _ = writeln!(output, "{}", source.display());
        for (diagnostic, position) in diagnostics.iter().zip(&positions) {
            let _ = writeln!(
                output,
                "  {:<position_width$}  {:<7}  {}  {}",
                position,
                diagnostic.severity.to_string(),
                diagnostic.message,
                diagnostic.rule,
                position_width = position_width
            );
        }

        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.len() - errors;
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "{}, {}",
            plural(errors, "error"),
            plural(warnings, "warning")
        );

        Ok(output)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    path: String,
    passed: bool,
    errors: usize,
    warnings: usize,
    diagnostics: &'a [Diagnostic],
}

/// machine readable report
#[derive(Debug, Clone, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, source: &Path, diagnostics: &[Diagnostic]) -> Result<String> {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let report = JsonReport {
            path: source.display().to_string(),
            passed: decide_outcome(diagnostics).is_pass(),
            errors,
            warnings: diagnostics.len() - errors,
            diagnostics,
        };

        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    }
}
