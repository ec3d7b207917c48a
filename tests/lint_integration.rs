use changelint::utils::testing::{TestChangelog, TestProject, TestRelease};
use changelint::{
    ChangelogChecker, ChangelogRules, Error, Outcome, ReportFormat, Rule, RunOptions, run,
};

const REPO: &str = "https://github.com/owner/project";

fn conformant() -> TestChangelog {
    TestChangelog::new()
        .release(TestRelease::unreleased().category("Added", &["work in progress"]))
        .release(
            TestRelease::new("1.1.0")
                .date("2024-02-01")
                .category("Added", &["json output"])
                .category("Fixed", &["crash on empty input"]),
        )
        .release(
            TestRelease::new("1.0.0")
                .date("2024-01-01")
                .category("Added", &["initial release"]),
        )
        .links_to(REPO)
}

fn run_to_string(options: &RunOptions) -> (changelint::Result<Outcome>, String) {
    let mut out = Vec::new();
    let result = run(options, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_conformant_changelog_passes() {
    let project = TestProject::with_changelog(&conformant().render()).unwrap();
    let options = RunOptions::new(&project.path).repository(REPO);

    let (result, output) = run_to_string(&options);

    assert_eq!(result.unwrap(), Outcome::Pass);
    assert!(output.ends_with("CHANGELOG.md: no issues found\n"));
}

#[test]
fn test_quiet_run_prints_nothing() {
    let project = TestProject::with_changelog(&conformant().render()).unwrap();
    let options = RunOptions::new(&project.path).repository(REPO).quiet(true);

    let (result, output) = run_to_string(&options);

    assert_eq!(result.unwrap(), Outcome::Pass);
    assert_eq!(output, "");
}

#[test]
fn test_single_violation_fails() {
    let content = conformant().render().replace("### Fixed", "### Misc");
    let project = TestProject::with_changelog(&content).unwrap();

    let report =
        ChangelogChecker::check(project.changelog_path(), &ChangelogRules::default()).unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].rule, Rule::UnknownCategory);
    assert_eq!(report.outcome(), Outcome::Fail);
}

#[test]
fn test_runs_are_idempotent() {
    let content = TestChangelog::new()
        .release(TestRelease::new("1.0.0").category("Misc", &["thing"]))
        .release(TestRelease::new("2.0.0").date("2024-01-01"))
        .render();
    let project = TestProject::with_changelog(&content).unwrap();
    let options = RunOptions::new(&project.path).repository(REPO);

    let (first_result, first_output) = run_to_string(&options);
    let (second_result, second_output) = run_to_string(&options);

    assert_eq!(first_result.unwrap(), Outcome::Fail);
    assert_eq!(second_result.unwrap(), Outcome::Fail);
    assert_eq!(first_output, second_output);
}

#[test]
fn test_missing_file_is_load_error() {
    let project = TestProject::new().unwrap();
    let options = RunOptions::new(&project.path);

    let (result, output) = run_to_string(&options);

    let err = result.unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(err.to_string().contains("CHANGELOG.md"));
    assert_eq!(output, "");
}

#[test]
fn test_diagnostics_reported_in_document_order() {
    let content = TestChangelog::new()
        .release(
            TestRelease::new("2.0.0")
                .date("2024-02-01")
                .category("Misc", &["a"]),
        )
        .release(
            TestRelease::new("1.0.0")
                .date("2024-01-01")
                .category("Other", &["b"]),
        )
        .render();
    let project = TestProject::with_changelog(&content).unwrap();

    let report =
        ChangelogChecker::check(project.changelog_path(), &ChangelogRules::default()).unwrap();

    assert_eq!(report.diagnostics.len(), 2);
    assert!(report.diagnostics[0].message.contains("'Misc'"));
    assert!(report.diagnostics[1].message.contains("'Other'"));
    let first = report.diagnostics[0].location.unwrap();
    let second = report.diagnostics[1].location.unwrap();
    assert!(first < second);
}

#[test]
fn test_newer_release_below_older_is_one_order_violation() {
    let content = TestChangelog::new()
        .release(
            TestRelease::new("1.0.0")
                .date("2024-01-01")
                .category("Added", &["first"]),
        )
        .release(
            TestRelease::new("1.1.0")
                .date("2024-02-01")
                .category("Added", &["second"]),
        )
        .render();
    let project = TestProject::with_changelog(&content).unwrap();
    let options = RunOptions::new(&project.path);

    let report =
        ChangelogChecker::check(project.changelog_path(), &ChangelogRules::default()).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].rule, Rule::ReleaseOrder);
    assert!(report.diagnostics[0].message.contains("1.1.0"));
    assert!(report.diagnostics[0].message.contains("1.0.0"));

    let (result, output) = run_to_string(&options);
    assert_eq!(result.unwrap().exit_code(), 1);
    assert!(output.contains("release-order"));
}

#[test]
fn test_empty_file_is_single_parse_error() {
    let project = TestProject::with_changelog("").unwrap();

    let report =
        ChangelogChecker::check(project.changelog_path(), &ChangelogRules::default()).unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].rule, Rule::ParseError);
    assert_eq!(report.outcome().exit_code(), 1);
}

#[test]
fn test_repository_from_cargo_manifest() {
    let content = conformant().render().replace("/releases/tag/v1.0.0", "/tree/v1.0.0");
    let project = TestProject::with_changelog(&content).unwrap();
    project
        .write(
            "Cargo.toml",
            format!("[package]\nname = \"demo\"\nrepository = \"{}.git\"\n", REPO),
        )
        .unwrap();

    let (result, output) = run_to_string(&RunOptions::new(&project.path));

    assert_eq!(result.unwrap(), Outcome::Fail);
    assert!(output.contains("invalid-link-definition"));
    assert!(output.contains("1 error, 0 warnings"));
}

#[test]
fn test_config_file_changes_rules() {
    let content = TestChangelog::new()
        .release(
            TestRelease::new("1.0.0")
                .date("2024-01-01")
                .category("Misc", &["thing"]),
        )
        .render();
    let project = TestProject::new().unwrap();
    project.write("docs/HISTORY.md", &content).unwrap();
    project
        .write(
            "changelint.toml",
            "[changelog]\nchangelog_file_name = \"docs/HISTORY.md\"\ncategories = [\"Misc\"]\n",
        )
        .unwrap();

    let (result, output) = run_to_string(&RunOptions::new(&project.path));

    assert_eq!(result.unwrap(), Outcome::Pass);
    assert!(output.contains("HISTORY.md: no issues found"));
}

#[test]
fn test_json_format() {
    let project = TestProject::with_changelog("").unwrap();
    let options = RunOptions::new(&project.path).format(ReportFormat::Json);

    let (result, output) = run_to_string(&options);

    assert_eq!(result.unwrap(), Outcome::Fail);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["passed"], false);
    assert_eq!(value["diagnostics"][0]["rule"], "parse-error");
}
