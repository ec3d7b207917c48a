use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    FileNotFound {
        path: PathBuf,
    },
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidConfig {
        path: PathBuf,
        reason: String,
    },
    ReportError(serde_json::Error),
    IoError(std::io::Error),
}

impl Error {
    /// true for errors raised while loading the changelog itself
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound { .. } | Error::FileReadError { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileNotFound { path } => {
                write!(f, "file not found: {}", path.display())
            }
            Error::FileReadError { path, source } => {
                write!(f, "failed to read file: {} ({})", path.display(), source)
            }
            Error::TomlParseError { path, source } => {
                write!(
                    f,
                    "failed to parse toml file: {} ({})",
                    path.display(),
                    source
                )
            }
            Error::InvalidConfig { path, reason } => {
                write!(f, "invalid configuration in {}: {}", path.display(), reason)
            }
            Error::ReportError(err) => {
                write!(f, "failed to render report: {}", err)
            }
            Error::IoError(err) => {
                write!(f, "io error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileReadError { source, .. } => Some(source),
            Error::TomlParseError { source, .. } => Some(source),
            Error::ReportError(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ReportError(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}
