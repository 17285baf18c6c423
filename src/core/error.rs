//! Error types and error handling for spacerini.
//!
//! Errors raised by the indexing engine or the hub API are carried
//! with their original message; nothing here reinterprets them.

use thiserror::Error;

/// Result type alias for spacerini operations
pub type Result<T> = std::result::Result<T, SpaceriniError>;

/// Main error type for spacerini
#[derive(Error, Debug)]
pub enum SpaceriniError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid size expression: {0}")]
    SizeParse(String),

    #[error("Engine error: {0}")]
    ExternalEngine(String),

    #[error("Remote API error: {0}")]
    RemoteApi(String),

    #[error("Page {page} out of range ({num_pages} pages)")]
    PageOutOfRange { page: usize, num_pages: usize },

    #[error("Row {row} out of range (dataset has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl From<tantivy::TantivyError> for SpaceriniError {
    fn from(err: tantivy::TantivyError) -> Self {
        SpaceriniError::ExternalEngine(err.to_string())
    }
}

impl SpaceriniError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error was caused by invalid input
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            SpaceriniError::ConfigError(_)
                | SpaceriniError::SizeParse(_)
                | SpaceriniError::PageOutOfRange { .. }
                | SpaceriniError::RowOutOfRange { .. }
        )
    }

    /// Check if this error came from a remote service
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SpaceriniError::RemoteApi(_) | SpaceriniError::HttpError(_)
        )
    }
}
