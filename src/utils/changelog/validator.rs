// changelog validator

use super::config::ChangelogConfig;
use super::links::{RepositoryLinks, looks_like_release_label};
use super::types::{Changelog, ChangelogEntry, ChangelogVersion, ReleaseDate, ReleaseVersion};
use crate::utils::severity::{Diagnostic, Location, Rule, sort_by_position};
use crate::utils::severity_config::SeverityConfig;
use semver::Version;
use std::collections::HashMap;

/// collects diagnostics, applying the configured severity per rule
struct Findings<'a> {
    severity: &'a SeverityConfig,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Findings<'a> {
    fn new(severity: &'a SeverityConfig) -> Self {
        Self {
            severity,
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, rule: Rule, location: Location, message: String) {
        if !self.severity.is_enabled(rule) {
            return;
        }
        let severity = self.severity.get_severity(rule);
        self.diagnostics
            .push(Diagnostic::new(severity, rule, message).at(location));
    }

    fn finish(mut self) -> Vec<Diagnostic> {
        sort_by_position(&mut self.diagnostics);
        self.diagnostics
    }
}

/// validate a changelog against configuration rules
///
/// link rules only run when a canonical repository url is given
pub fn validate_changelog(
    changelog: &Changelog,
    config: &ChangelogConfig,
    severity: &SeverityConfig,
    repository: Option<&str>,
) -> Vec<Diagnostic> {
    let mut findings = Findings::new(severity);

    check_title(changelog, config, &mut findings);

    // issues found while reading the structure
    for issue in &changelog.format_issues {
        let location = issue.location.unwrap_or(Location::new(1, 1));
        findings.push(issue.rule, location, issue.message.clone());
    }

    for category in &changelog.stray_categories {
        findings.push(
            Rule::EntryOutsideCategory,
            category.location,
            format!("category '{}' appears before any release", category.name),
        );
    }
    for entry in &changelog.stray_entries {
        findings.push(
            Rule::EntryOutsideCategory,
            entry.location,
            "entry appears before any release".to_string(),
        );
    }

    for release in &changelog.versions {
        check_release(release, config, &mut findings);
    }

    check_order(changelog, &mut findings);

    if let Some(repository) = repository {
        let links = RepositoryLinks::new(repository, &config.tag_prefix);
        check_links(changelog, &links, &mut findings);
    }

    findings.finish()
}

fn check_title(changelog: &Changelog, config: &ChangelogConfig, findings: &mut Findings) {
    let Some(title) = changelog.titles.first() else {
        findings.push(
            Rule::Title,
            Location::new(1, 1),
            format!("missing '# {}' title", config.title),
        );
        return;
    };

    if changelog.first_heading_level != Some(1) {
        findings.push(
            Rule::Title,
            title.location,
            "title must be the first heading in the document".to_string(),
        );
    }

    if !config.is_title(&title.text) {
        findings.push(
            Rule::Title,
            title.location,
            format!("title should be '{}', found '{}'", config.title, title.text),
        );
    }

    for extra in &changelog.titles[1..] {
        findings.push(
            Rule::Title,
            extra.location,
            format!("unexpected second level-1 heading '{}'", extra.text),
        );
    }
}

fn check_release(release: &ChangelogVersion, config: &ChangelogConfig, findings: &mut Findings) {
    let label = &release.label;

    match (&release.version, &release.date) {
        (ReleaseVersion::Version(_), ReleaseDate::Missing) if config.require_dates => {
            findings.push(
                Rule::ReleaseDate,
                release.location,
                format!("release {} has no date (expected YYYY-MM-DD)", label),
            );
        }
        (ReleaseVersion::Version(_), ReleaseDate::Invalid(raw)) => {
            findings.push(
                Rule::ReleaseDate,
                release.location,
                format!(
                    "release {} has invalid date '{}' (expected YYYY-MM-DD)",
                    label, raw
                ),
            );
        }
        (ReleaseVersion::Unreleased, date) if *date != ReleaseDate::Missing => {
            findings.push(
                Rule::ReleaseDate,
                release.location,
                "'Unreleased' section must not have a date".to_string(),
            );
        }
        _ => {}
    }

    for entry in &release.uncategorized {
        findings.push(
            Rule::EntryOutsideCategory,
            entry.location,
            format!("entry in release {} is not under a category heading", label),
        );
    }
    check_entries(&release.uncategorized, findings);

    let mut seen_categories: HashMap<String, Location> = HashMap::new();
    for category in &release.categories {
        if !config.is_allowed_category(&category.name) {
            findings.push(
                Rule::UnknownCategory,
                category.location,
                format!(
                    "unknown category '{}' in release {} (allowed: {})",
                    category.name,
                    label,
                    config.categories.join(", ")
                ),
            );
        }

        let key = category.name.trim().to_lowercase();
        if let Some(first) = seen_categories.get(&key) {
            findings.push(
                Rule::DuplicateCategory,
                category.location,
                format!(
                    "category '{}' appears twice in release {} (first at line {})",
                    category.name, label, first.line
                ),
            );
        } else {
            seen_categories.insert(key, category.location);
        }

        if category.entries.is_empty() {
            findings.push(
                Rule::EmptyCategory,
                category.location,
                format!(
                    "category '{}' in release {} has no entries",
                    category.name, label
                ),
            );
        }
        check_entries(&category.entries, findings);
    }

    if release.is_empty() && !release.is_unreleased() {
        findings.push(
            Rule::EmptyRelease,
            release.location,
            format!("release {} has no entries", label),
        );
    }
}

fn check_entries(entries: &[ChangelogEntry], findings: &mut Findings) {
    for entry in entries {
        if entry.text.trim().is_empty() {
            findings.push(
                Rule::EmptyEntry,
                entry.location,
                "entry has no text".to_string(),
            );
        }
    }
}

fn check_order(changelog: &Changelog, findings: &mut Findings) {
    let mut first_unreleased: Option<&ChangelogVersion> = None;
    let mut first_released: Option<&ChangelogVersion> = None;
    let mut seen: HashMap<&Version, &ChangelogVersion> = HashMap::new();
    let mut previous: Option<(&Version, &ChangelogVersion)> = None;

    for release in &changelog.versions {
        match &release.version {
            ReleaseVersion::Unreleased => {
                if let Some(first) = first_unreleased {
                    findings.push(
                        Rule::DuplicateRelease,
                        release.location,
                        format!(
                            "duplicate 'Unreleased' section (first at line {})",
                            first.location.line
                        ),
                    );
                    continue;
                }
                first_unreleased = Some(release);

                if let Some(released) = first_released {
                    findings.push(
                        Rule::ReleaseOrder,
                        release.location,
                        format!(
                            "'Unreleased' section (line {}) must come before release {} (line {})",
                            release.location.line, released.label, released.location.line
                        ),
                    );
                }
            }
            ReleaseVersion::Version(version) => {
                first_released.get_or_insert(release);

                if let Some(first) = seen.get(version) {
                    findings.push(
                        Rule::DuplicateRelease,
                        release.location,
                        format!(
                            "release {} is listed twice (first at line {})",
                            version, first.location.line
                        ),
                    );
                    continue;
                }
                seen.insert(version, release);

                if let Some((prev_version, prev_release)) = previous {
                    if version > prev_version {
                        findings.push(
                            Rule::ReleaseOrder,
                            release.location,
                            format!(
                                "release {} (line {}) must be listed before release {} (line {}); versions must be in descending order",
                                version,
                                release.location.line,
                                prev_version,
                                prev_release.location.line
                            ),
                        );
                    } else if let (ReleaseDate::Valid(date), ReleaseDate::Valid(prev_date)) =
                        (&release.date, &prev_release.date)
                        && date > prev_date
                    {
                        findings.push(
                            Rule::ReleaseDate,
                            release.location,
                            format!(
                                "release {} is dated {} which is after newer release {} ({})",
                                version, date, prev_version, prev_date
                            ),
                        );
                    }
                }
                previous = Some((version, release));
            }
            ReleaseVersion::Invalid(_) => {}
        }
    }
}

fn check_links(changelog: &Changelog, links: &RepositoryLinks, findings: &mut Findings) {
    for release in &changelog.versions {
        if matches!(release.version, ReleaseVersion::Invalid(_)) {
            continue;
        }

        if release.inline_link.is_none() && !release.linked {
            findings.push(
                Rule::MissingLinkDefinition,
                release.location,
                format!(
                    "release heading {} is not a link (write it as '[{}]')",
                    release.label, release.label
                ),
            );
            continue;
        }

        let expected = links.expected_for(changelog, release);
        let actual = match &release.inline_link {
            Some(url) => Some((url.as_str(), release.location)),
            None => changelog
                .definition(&release.label)
                .map(|d| (d.url.as_str(), d.location)),
        };

        match (actual, expected) {
            (None, Some(expected)) => findings.push(
                Rule::MissingLinkDefinition,
                release.location,
                format!(
                    "release {} has no link definition (expected '[{}]: {}')",
                    release.label, release.label, expected
                ),
            ),
            (None, None) => findings.push(
                Rule::MissingLinkDefinition,
                release.location,
                format!("release {} has no link definition", release.label),
            ),
            (Some((url, location)), Some(expected)) if !RepositoryLinks::matches(url, &expected) => {
                findings.push(
                    Rule::InvalidLinkDefinition,
                    location,
                    format!(
                        "link for {} points to '{}', expected '{}'",
                        release.label, url, expected
                    ),
                )
            }
            _ => {}
        }
    }

    for definition in &changelog.definitions {
        if !looks_like_release_label(&definition.label) {
            continue;
        }
        let used = changelog
            .versions
            .iter()
            .any(|r| r.label.eq_ignore_ascii_case(&definition.label));
        if !used {
            findings.push(
                Rule::UnusedLinkDefinition,
                definition.location,
                format!(
                    "link definition [{}] does not match any release",
                    definition.label
                ),
            );
        }
    }
}
