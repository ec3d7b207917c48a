// builder for creating test changelogs and projects

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// represents a release section to be rendered
#[derive(Debug, Clone)]
pub struct TestRelease {
    pub label: String,
    pub date: Option<String>,
    pub categories: Vec<(String, Vec<String>)>,
}

impl TestRelease {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            date: None,
            categories: Vec::new(),
        }
    }

    pub fn unreleased() -> Self {
        Self::new("Unreleased")
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn category(mut self, name: impl Into<String>, entries: &[&str]) -> Self {
        self.categories.push((
            name.into(),
            entries.iter().map(|e| e.to_string()).collect(),
        ));
        self
    }
}

/// builder for keep-a-changelog documents
#[derive(Debug, Clone)]
pub struct TestChangelog {
    title: String,
    releases: Vec<TestRelease>,
    repository: Option<String>,
}

impl TestChangelog {
    pub fn new() -> Self {
        Self {
            title: "Changelog".to_string(),
            releases: Vec::new(),
            repository: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn release(mut self, release: TestRelease) -> Self {
        self.releases.push(release);
        self
    }

    /// append link definitions pointing at this repository
    pub fn links_to(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    fn tag(label: &str) -> String {
        format!("v{}", label)
    }

    /// link definitions following the release order given to the builder
    fn definitions(&self, repository: &str) -> Vec<String> {
        let released: Vec<&str> = self
            .releases
            .iter()
            .map(|r| r.label.as_str())
            .filter(|l| !l.eq_ignore_ascii_case("unreleased"))
            .collect();

        self.releases
            .iter()
            .map(|release| {
                let label = release.label.as_str();
                let url = if label.eq_ignore_ascii_case("unreleased") {
                    match released.first() {
                        Some(latest) => {
                            format!("{}/compare/{}...HEAD", repository, Self::tag(latest))
                        }
                        None => format!("{}/commits/HEAD", repository),
                    }
                } else {
                    let position = released.iter().position(|l| *l == label).unwrap_or(0);
                    match released.get(position + 1) {
                        Some(previous) => format!(
                            "{}/compare/{}...{}",
                            repository,
                            Self::tag(previous),
                            Self::tag(label)
                        ),
                        None => format!("{}/releases/tag/{}", repository, Self::tag(label)),
                    }
                };
                format!("[{}]: {}", label.to_lowercase(), url)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = format!("# {}\n\nAll notable changes to this project will be documented in this file.\n", self.title);

        for release in &self.releases {
            out.push('\n');
            match &release.date {
                Some(date) => out.push_str(&format!("## [{}] - {}\n", release.label, date)),
                None => out.push_str(&format!("## [{}]\n", release.label)),
            }
            for (name, entries) in &release.categories {
                out.push_str(&format!("\n### {}\n\n", name));
                for entry in entries {
                    out.push_str(&format!("- {}\n", entry));
                }
            }
        }

        if let Some(repository) = &self.repository {
            out.push('\n');
            for definition in self.definitions(repository) {
                out.push_str(&definition);
                out.push('\n');
            }
        }

        out
    }
}

impl Default for TestChangelog {
    fn default() -> Self {
        Self::new()
    }
}

/// a temporary project directory holding a changelog
pub struct TestProject {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        Ok(Self {
            path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    pub fn with_changelog(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let project = Self::new()?;
        project.write("CHANGELOG.md", content)?;
        Ok(project)
    }

    pub fn write(
        &self,
        relative: impl AsRef<Path>,
        content: impl AsRef<[u8]>,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.path.join("CHANGELOG.md")
    }
}
