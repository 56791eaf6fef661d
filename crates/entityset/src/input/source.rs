//! Data source metadata.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of a record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Guess the format from a file extension. Anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Csv,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => f.write_str("csv"),
            SourceFormat::Json => f.write_str("json"),
        }
    }
}

/// Metadata about the source data file.
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
    /// Format the records were read as.
    pub format: SourceFormat,
    /// CSV delimiter, when the source was CSV.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
    /// Number of records read.
    pub record_count: usize,
    /// Number of columns in the first record.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: SourceFormat,
        record_count: usize,
        column_count: usize,
    ) -> Self {
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
            delimiter: None,
            record_count,
            column_count,
            read_at: Utc::now(),
        }
    }

    /// Record the CSV delimiter that was used.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter as char);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("a.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("a.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("a.csv")), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("a.txt")), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("noext")), SourceFormat::Csv);
    }

    #[test]
    fn test_metadata_file_name() {
        let meta = SourceMetadata::new(
            PathBuf::from("/data/cities.csv"),
            "sha256:00".to_string(),
            10,
            SourceFormat::Csv,
            2,
            3,
        )
        .with_delimiter(b';');
        assert_eq!(meta.file, "cities.csv");
        assert_eq!(meta.delimiter, Some(';'));
    }
}
