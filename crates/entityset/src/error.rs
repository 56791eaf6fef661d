//! Error types for the entityset library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for entityset operations.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A timestamp value failed every parse strategy.
    #[error("Malformed timestamp at record {index}, field '{field}': '{value}'")]
    MalformedTimestamp {
        index: usize,
        field: String,
        value: String,
    },

    /// A strict-mode record is missing a required field (or it is empty).
    #[error("Missing required field '{field}' at record {index}")]
    MissingRequiredField { index: usize, field: String },

    /// Wrong point/path/polygon cardinality, or zero/multiple geometry fields.
    #[error("Invalid geometry at record {index}: {message}")]
    InvalidGeometry { index: usize, message: String },

    /// A strict-mode record carries a field its variant forbids.
    #[error("Unexpected field '{field}' at record {index}: {message}")]
    UnexpectedField {
        index: usize,
        field: String,
        message: String,
    },

    /// A strict-mode identity was seen twice in the same batch.
    #[error("Duplicate identity '{identity}' at record {index}")]
    DuplicateIdentity { index: usize, identity: String },

    /// The interactive confirmation of the role mapping was refused.
    #[error("Role mapping was declined")]
    UserDeclinedMapping,

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no records to normalize.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-level failure (connection, timeout) that outlived every retry.
    #[error("Transport error: {message}")]
    Transport { message: String, retryable: bool },

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// An asynchronous ingest job finished unsuccessfully.
    #[error("Ingest job '{job}' failed: {message}")]
    JobFailed { job: String, message: String },
}

impl IngestError {
    /// Whether the transport should try the request again.
    ///
    /// Only server errors (5xx), timeouts and connection failures qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::HttpStatus { status, .. } => *status >= 500,
            IngestError::Transport { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return IngestError::HttpStatus {
                status: status.as_u16(),
                body: e.to_string(),
            };
        }
        IngestError::Transport {
            retryable: e.is_timeout() || e.is_connect() || e.is_request(),
            message: e.to_string(),
        }
    }
}

/// Result type alias for entityset operations.
pub type Result<T> = std::result::Result<T, IngestError>;
