// cargo manifest lookup for the canonical repository url

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

pub struct ManifestReader;

impl ManifestReader {
    pub fn read_file<P: AsRef<Path>>(file_path: P) -> Result<toml::Value> {
        let path = file_path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| Error::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `package.repository`, falling back to `workspace.package.repository`
    pub fn repository_from_value(manifest: &toml::Value) -> Option<String> {
        let package = manifest
            .get("package")
            .and_then(|p| p.get("repository"))
            .and_then(|r| r.as_str());

        let workspace = || {
            manifest
                .get("workspace")
                .and_then(|w| w.get("package"))
                .and_then(|p| p.get("repository"))
                .and_then(|r| r.as_str())
        };

        package.or_else(workspace).map(|s| s.to_string())
    }

    /// read the repository url from `Cargo.toml` in a directory, if there is one
    pub fn read_repository<P: AsRef<Path>>(directory: P) -> Result<Option<String>> {
        let cargo_path = directory.as_ref().join("Cargo.toml");
        if !cargo_path.is_file() {
            return Ok(None);
        }

        let manifest = Self::read_file(&cargo_path)?;
        Ok(Self::repository_from_value(&manifest))
    }
}
