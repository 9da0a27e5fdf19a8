//! Input container formats and source metadata.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SifterError};

/// Supported input containers, dispatched by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Office Open XML workbook (`.xlsx`).
    Xlsx,
    /// Legacy BIFF workbook (`.xls`).
    Xls,
    /// Comma-delimited text (`.csv`).
    Csv,
}

impl InputFormat {
    /// Pick the format from the (case-insensitive) file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => Ok(InputFormat::Xlsx),
            "xls" => Ok(InputFormat::Xls),
            "csv" => Ok(InputFormat::Csv),
            "" => Err(SifterError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(SifterError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Xlsx => write!(f, "xlsx"),
            InputFormat::Xls => write!(f, "xls"),
            InputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Metadata about the input file of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Container format.
    pub format: InputFormat,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64, format: InputFormat) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            loaded_at: Utc::now(),
        }
    }
}
