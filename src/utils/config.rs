use super::changelog::ChangelogConfig;
use super::manifest::ManifestReader;
use super::severity_config::SeverityConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "changelint.toml";

/// main configuration for changelint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    /// canonical repository url used to check release links
    #[serde(default)]
    pub repository: Option<String>,

    /// do not print a confirmation when no issues are found
    #[serde(default)]
    pub quiet: bool,

    /// changelog-related configuration
    #[serde(default)]
    pub changelog: ChangelogConfig,

    /// rule severities and allowed rules
    #[serde(default)]
    pub severity: SeverityConfig,
}

impl LintConfig {
    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: LintConfig = toml::from_str(&contents).map_err(|e| Error::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config
            .severity
            .validate()
            .map_err(|reason| Error::InvalidConfig {
                path: path.to_path_buf(),
                reason,
            })?;

        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// find and load configuration file in a project directory
    ///
    /// looks for `changelint.toml` in the project root
    /// returns default config if file is not found
    pub fn load_or_default<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        match Self::find_config_file(&project_path) {
            Some(config_path) => Self::load_from_file(&config_path),
            None => Ok(Self::default()),
        }
    }

    /// find configuration file in a project directory
    pub fn find_config_file<P: AsRef<Path>>(project_path: P) -> Option<PathBuf> {
        let config_path = project_path.as_ref().join(CONFIG_FILE_NAME);

        if config_path.exists() && config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }

    /// fill in the repository from the project's Cargo.toml when not configured
    pub fn resolve_repository<P: AsRef<Path>>(&mut self, project_path: P) -> Result<()> {
        if self.repository.is_none() {
            self.repository = ManifestReader::read_repository(project_path)?;
            if let Some(repository) = &self.repository {
                debug!(repository = %repository, "using repository from Cargo.toml");
            }
        }
        Ok(())
    }
}
