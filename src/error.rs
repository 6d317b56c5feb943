//! Error types for worldcup-dashboard

use thiserror::Error;

/// Result type alias for worldcup-dashboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for worldcup-dashboard
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error("Unknown callback input: {0}")]
    UnknownInput(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure to produce a complete dataset at startup.
///
/// Always fatal: the server must not start with a partial dataset.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to read data file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: String, column: &'static str },

    #[error("Invalid year '{value}' on line {line}")]
    InvalidYear { line: u64, value: String },

    #[error("Empty {column} on line {line}")]
    EmptyField { line: u64, column: &'static str },

    #[error("No match records found in {path}")]
    NoRecords { path: String },
}

/// A selection value with no entry in its backing table.
///
/// The dropdowns only offer valid values, so this only shows up for
/// hand-crafted requests. Its display text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
    #[error("No data available for country '{0}'.")]
    Country(String),

    #[error("No data available for year {0}.")]
    Year(String),
}
