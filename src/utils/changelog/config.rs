// changelog configuration

use serde::{Deserialize, Serialize};

/// configuration for changelog structure rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// name of the changelog file (default: "CHANGELOG.md")
    pub changelog_file_name: String,

    /// expected text of the level-1 title
    pub title: String,

    /// allowed category headings under each release
    pub categories: Vec<String>,

    /// require a date on every released version
    pub require_dates: bool,

    /// prefix used for git tags in release links (e.g. "v" for v1.2.3)
    pub tag_prefix: String,
}

impl ChangelogConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn require_dates(mut self, required: bool) -> Self {
        self.require_dates = required;
        self
    }

    /// check if a category heading is allowed
    pub fn is_allowed_category(&self, category: &str) -> bool {
        if self.categories.is_empty() {
            return true; // if no restrictions, allow all
        }
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category.trim()))
    }

    /// check if a level-1 heading matches the configured title
    pub fn is_title(&self, heading: &str) -> bool {
        heading.trim().eq_ignore_ascii_case(self.title.trim())
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            changelog_file_name: "CHANGELOG.md".to_string(),
            title: "Changelog".to_string(),
            categories: vec![
                "Added".to_string(),
                "Changed".to_string(),
                "Deprecated".to_string(),
                "Removed".to_string(),
                "Fixed".to_string(),
                "Security".to_string(),
            ],
            require_dates: true,
            tag_prefix: "v".to_string(),
        }
    }
}
