//! Error types for the Sifter library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sifter operations.
///
/// Only failures at the container level end up here (input, output,
/// configuration). Per-provider failures are reported as attempt outcomes
/// and never surface as errors.
#[derive(Debug, Error)]
pub enum SifterError {
    /// Error reading or accessing an input file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file does not exist.
    #[error("Input file '{0}' not found")]
    MissingInput(PathBuf),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error opening or reading a spreadsheet container.
    #[error("Spreadsheet error for '{path}': {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// File format not supported.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Error opening or appending to the output file.
    #[error("Output error for '{path}': {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// The background worker died before reporting a result.
    #[error("Enrichment worker panicked")]
    WorkerPanicked,
}

/// Result type alias for Sifter operations.
pub type Result<T> = std::result::Result<T, SifterError>;
