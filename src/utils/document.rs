// changelog document loading

use super::severity::Location;
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const BYTE_ORDER_MARK: char = '\u{feff}';
const BYTE_ORDER_MARK_BYTES: &[u8] = b"\xef\xbb\xbf";

/// raw changelog text plus its source path
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub content: String,
    /// byte offset of the first invalid UTF-8 sequence, if any
    pub invalid_utf8_at: Option<usize>,
    line_starts: Vec<usize>,
}

impl Document {
    /// build a document from text already in memory, dropping a leading byte order mark
    pub fn from_string(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let mut content = content.into();
        if content.starts_with(BYTE_ORDER_MARK) {
            content.drain(..BYTE_ORDER_MARK.len_utf8());
        }
        let line_starts = index_lines(&content);
        Self {
            path: path.into(),
            content,
            invalid_utf8_at: None,
            line_starts,
        }
    }

    /// build a document from raw bytes, replacing invalid UTF-8
    pub fn from_bytes(path: impl Into<PathBuf>, mut bytes: Vec<u8>) -> Self {
        // strip here too so invalid_utf8_at matches the stored content
        if bytes.starts_with(BYTE_ORDER_MARK_BYTES) {
            bytes.drain(..BYTE_ORDER_MARK_BYTES.len());
        }
        match String::from_utf8(bytes) {
            Ok(content) => Self::from_string(path, content),
            Err(err) => {
                let invalid_at = err.utf8_error().valid_up_to();
                let content = String::from_utf8_lossy(err.as_bytes()).into_owned();
                let mut document = Self::from_string(path, content);
                document.invalid_utf8_at = Some(invalid_at);
                document
            }
        }
    }

    /// read a changelog file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::FileReadError {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        debug!(path = %path.display(), bytes = bytes.len(), "loaded changelog");
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// map a byte offset to a 1-based line and column
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.content.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = self
            .content
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Location::new(line_index + 1, column + 1)
    }
}

fn index_lines(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        content
            .char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| i + 1),
    );
    starts
}
