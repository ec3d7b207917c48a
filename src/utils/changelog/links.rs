// release comparison links

use super::types::{Changelog, ChangelogVersion, ReleaseVersion};
use semver::Version;

/// strip the decorations people commonly leave on a repository url
pub fn normalize_repository(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    url.strip_suffix(".git").unwrap_or(url).to_string()
}

/// check if a link label names a release rather than an arbitrary reference
pub fn looks_like_release_label(label: &str) -> bool {
    label.eq_ignore_ascii_case("unreleased") || Version::parse(label.trim_start_matches('v')).is_ok()
}

/// builds the links a release heading is expected to point at
#[derive(Debug, Clone)]
pub struct RepositoryLinks {
    base: String,
    tag_prefix: String,
}

impl RepositoryLinks {
    pub fn new(repository: &str, tag_prefix: &str) -> Self {
        Self {
            base: normalize_repository(repository),
            tag_prefix: tag_prefix.to_string(),
        }
    }

    pub fn tag(&self, version: &Version) -> String {
        format!("{}{}", self.tag_prefix, version)
    }

    pub fn release(&self, version: &Version) -> String {
        format!("{}/releases/tag/{}", self.base, self.tag(version))
    }

    pub fn compare(&self, from: &str, to: &str) -> String {
        format!("{}/compare/{}...{}", self.base, from, to)
    }

    /// expected link for a release, based on semver order of all releases
    pub fn expected_for(&self, changelog: &Changelog, release: &ChangelogVersion) -> Option<String> {
        let sorted = changelog.sorted_versions();

        match &release.version {
            ReleaseVersion::Unreleased => {
                let latest = sorted.last()?;
                Some(self.compare(&self.tag(latest), "HEAD"))
            }
            ReleaseVersion::Version(version) => {
                let index = sorted.iter().position(|v| *v == version)?;
                if index == 0 {
                    Some(self.release(version))
                } else {
                    Some(self.compare(&self.tag(sorted[index - 1]), &self.tag(version)))
                }
            }
            ReleaseVersion::Invalid(_) => None,
        }
    }

    /// compare an actual link against the expected one, ignoring a trailing slash
    pub fn matches(actual: &str, expected: &str) -> bool {
        actual.trim().trim_end_matches('/') == expected.trim_end_matches('/')
    }
}
