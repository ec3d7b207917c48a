// changelog data structures

use crate::utils::severity::{Diagnostic, Location};
use chrono::NaiveDate;
use semver::Version;
use std::fmt;

/// version part of a release heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseVersion {
    Unreleased,
    Version(Version),
    Invalid(String),
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseVersion::Unreleased => write!(f, "Unreleased"),
            ReleaseVersion::Version(version) => write!(f, "{}", version),
            ReleaseVersion::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

/// date part of a release heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDate {
    Missing,
    Valid(NaiveDate),
    Invalid(String),
}

/// a single list entry under a release
#[derive(Debug, Clone)]
pub struct ChangelogEntry {
    pub text: String,
    pub location: Location,
}

impl ChangelogEntry {
    pub fn new(text: String, location: Location) -> Self {
        Self { text, location }
    }
}

/// a category section ("### Added") inside a release
#[derive(Debug, Clone)]
pub struct ChangelogCategory {
    pub name: String,
    pub location: Location,
    pub entries: Vec<ChangelogEntry>,
}

impl ChangelogCategory {
    pub fn new(name: String, location: Location) -> Self {
        Self {
            name,
            location,
            entries: Vec::new(),
        }
    }
}

/// represents a release section in the changelog
#[derive(Debug, Clone)]
pub struct ChangelogVersion {
    /// label as written in the heading, without brackets
    pub label: String,
    pub version: ReleaseVersion,
    pub date: ReleaseDate,
    /// label written as `[label]`
    pub linked: bool,
    /// destination of an inline `[label](url)` heading link
    pub inline_link: Option<String>,
    pub location: Location,
    pub categories: Vec<ChangelogCategory>,
    /// entries that appear before the first category heading
    pub uncategorized: Vec<ChangelogEntry>,
}

impl ChangelogVersion {
    pub fn new(label: String, version: ReleaseVersion, location: Location) -> Self {
        Self {
            label,
            version,
            date: ReleaseDate::Missing,
            linked: false,
            inline_link: None,
            location,
            categories: Vec::new(),
            uncategorized: Vec::new(),
        }
    }

    pub fn is_unreleased(&self) -> bool {
        self.version == ReleaseVersion::Unreleased
    }

    pub fn semver(&self) -> Option<&Version> {
        match &self.version {
            ReleaseVersion::Version(version) => Some(version),
            _ => None,
        }
    }

    pub fn add_entry(&mut self, entry: ChangelogEntry) {
        match self.categories.last_mut() {
            Some(category) => category.entries.push(entry),
            None => self.uncategorized.push(entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.uncategorized.is_empty()
    }
}

/// a markdown reference definition (`[label]: url`)
#[derive(Debug, Clone)]
pub struct LinkDefinition {
    pub label: String,
    pub url: String,
    pub location: Location,
}

/// a level-1 heading
#[derive(Debug, Clone)]
pub struct Title {
    pub text: String,
    pub location: Location,
}

/// represents a complete changelog file
#[derive(Debug, Clone, Default)]
pub struct Changelog {
    /// every level-1 heading in document order
    pub titles: Vec<Title>,
    /// level of the first heading in the document, if any
    pub first_heading_level: Option<u8>,
    pub versions: Vec<ChangelogVersion>,
    /// entries found before any release heading
    pub stray_entries: Vec<ChangelogEntry>,
    /// category headings found before any release heading
    pub stray_categories: Vec<ChangelogCategory>,
    /// sorted by position in the document
    pub definitions: Vec<LinkDefinition>,
    /// problems found while reading the structure
    pub format_issues: Vec<Diagnostic>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_version(&mut self, version_section: ChangelogVersion) {
        self.versions.push(version_section);
    }

    pub fn definition(&self, label: &str) -> Option<&LinkDefinition> {
        self.definitions
            .iter()
            .find(|d| d.label.eq_ignore_ascii_case(label))
    }

    /// released versions in ascending semver order, duplicates removed
    pub fn sorted_versions(&self) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self.versions.iter().filter_map(|v| v.semver()).collect();
        versions.sort();
        versions.dedup();
        versions
    }
}
