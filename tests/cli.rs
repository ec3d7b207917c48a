use assert_cmd::Command;
use changelint::utils::testing::{TestChangelog, TestProject, TestRelease};
use predicates::prelude::*;
use predicates::str::contains;

fn cmd() -> Command {
    Command::cargo_bin("changelint").unwrap()
}

fn clean_changelog() -> String {
    TestChangelog::new()
        .release(
            TestRelease::new("0.2.0")
                .date("2024-03-10")
                .category("Changed", &["faster startup"]),
        )
        .release(
            TestRelease::new("0.1.0")
                .date("2024-01-05")
                .category("Added", &["first release"]),
        )
        .links_to("https://github.com/owner/tool")
        .render()
}

#[test]
fn clean_changelog_exits_zero() {
    let project = TestProject::with_changelog(&clean_changelog()).unwrap();

    cmd()
        .current_dir(&project.path)
        .args(["--repository", "https://github.com/owner/tool"])
        .assert()
        .success()
        .stdout("")
        .stderr(contains("no issues found"));
}

#[test]
fn violations_exit_one() {
    let content = clean_changelog().replace("## [0.1.0] - 2024-01-05", "## [0.1.0]");
    let project = TestProject::with_changelog(&content).unwrap();

    cmd()
        .arg("--dir")
        .arg(&project.path)
        .assert()
        .code(1)
        .stdout("")
        .stderr(contains("release-date"))
        .stderr(contains("1 error, 0 warnings"));
}

#[test]
fn missing_changelog_reports_load_error() {
    let project = TestProject::new().unwrap();

    cmd()
        .current_dir(&project.path)
        .assert()
        .code(1)
        .stderr(contains("error: failed to check changelog: file not found"))
        .stderr(contains("release-").not());
}

#[test]
fn explicit_path_and_json_format() {
    let project = TestProject::new().unwrap();
    project.write("CHANGES.md", "").unwrap();

    cmd()
        .current_dir(&project.path)
        .args(["CHANGES.md", "--format", "json"])
        .assert()
        .code(1)
        .stderr(contains("\"rule\": \"parse-error\""));
}

#[test]
fn config_path_is_relative_to_working_directory() {
    let content = TestChangelog::new()
        .release(
            TestRelease::new("1.0.0")
                .date("2024-01-01")
                .category("Misc", &["thing"]),
        )
        .render();
    let project = TestProject::new().unwrap();
    project.write("sub/CHANGELOG.md", &content).unwrap();
    project
        .write("sub/lint.toml", "[changelog]\ncategories = [\"Misc\"]\n")
        .unwrap();

    cmd()
        .current_dir(&project.path)
        .args(["-C", "sub", "-c", "sub/lint.toml"])
        .assert()
        .success()
        .stderr(contains("no issues found"));
}

#[test]
fn invalid_format_is_usage_error() {
    cmd().args(["--format", "xml"]).assert().code(2);
}
