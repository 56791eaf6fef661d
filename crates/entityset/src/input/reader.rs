//! CSV and JSON record readers with delimiter sniffing.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::record::RawRecord;
use super::source::{SourceFormat, SourceMetadata};
use crate::error::{IngestError, Result};

/// Reader configuration.
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Input format (None = guess from the file extension).
    pub format: Option<SourceFormat>,
    /// CSV delimiter (None = sniff among `,` and `;`).
    pub delimiter: Option<u8>,
    /// Maximum records to read (None = all).
    pub max_records: Option<usize>,
}

/// Reads CSV/JSON sources into ordered raw records.
pub struct RecordReader {
    config: ReaderConfig,
}

impl RecordReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file and return its records and metadata.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<(Vec<RawRecord>, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |e| IngestError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let format = self
            .config
            .format
            .unwrap_or_else(|| SourceFormat::from_path(path));

        let (records, delimiter) = match format {
            SourceFormat::Json => (self.read_json(&contents)?, None),
            SourceFormat::Csv => {
                let delimiter = self.delimiter_for(&contents)?;
                (self.parse_csv(&contents, delimiter)?, Some(delimiter))
            }
        };

        let column_count = records.first().map(|r| r.len()).unwrap_or(0);
        let mut metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            records.len(),
            column_count,
        );
        if let Some(d) = delimiter {
            metadata = metadata.with_delimiter(d);
        }

        tracing::debug!(
            file = %metadata.file,
            format = %format,
            records = metadata.record_count,
            columns = metadata.column_count,
            "read records"
        );

        Ok((records, metadata))
    }

    /// Read records from in-memory bytes of a known format.
    pub fn read_bytes(&self, bytes: &[u8], format: SourceFormat) -> Result<Vec<RawRecord>> {
        match format {
            SourceFormat::Json => self.read_json(bytes),
            SourceFormat::Csv => self.read_csv(bytes),
        }
    }

    /// Read CSV bytes, sniffing the delimiter unless one is configured.
    pub fn read_csv(&self, bytes: &[u8]) -> Result<Vec<RawRecord>> {
        let delimiter = self.delimiter_for(bytes)?;
        self.parse_csv(bytes, delimiter)
    }

    /// Read a JSON array of objects, keeping each object's key order.
    pub fn read_json(&self, bytes: &[u8]) -> Result<Vec<RawRecord>> {
        let mut records: Vec<RawRecord> = serde_json::from_slice(bytes).map_err(|e| {
            if e.classify() == serde_json::error::Category::Data {
                IngestError::UnsupportedFormat(format!(
                    "JSON input must be an array of objects: {}",
                    e
                ))
            } else {
                IngestError::Json(e)
            }
        })?;

        if records.is_empty() {
            return Err(IngestError::EmptyData("JSON array has no records".to_string()));
        }
        if let Some(max) = self.config.max_records {
            records.truncate(max);
        }

        Ok(records)
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) => Ok(d),
            None => detect_delimiter(bytes),
        }
    }

    /// Parse CSV bytes with a known delimiter. The header row names the columns.
    fn parse_csv(&self, bytes: &[u8], delimiter: u8) -> Result<Vec<RawRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(IngestError::EmptyData("No columns found".to_string()));
        }

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_records {
                if row_idx >= max {
                    break;
                }
            }

            let row = result?;
            // Short rows are padded with empty cells, extra cells dropped
            let record: RawRecord = headers
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let cell = row.get(i).unwrap_or("");
                    (name.clone(), Value::String(cell.to_string()))
                })
                .collect();
            records.push(record);
        }

        if records.is_empty() {
            return Err(IngestError::EmptyData("No data rows found".to_string()));
        }

        Ok(records)
    }
}

impl Default for RecordReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick `;` or `,` from the header row.
///
/// Semicolons win only when the header holds more of them than commas, so
/// decimal commas in the data rows never sway the choice.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let header = BufReader::new(bytes)
        .lines()
        .map_while(|l| l.ok())
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| IngestError::EmptyData("No header line to analyze".to_string()))?;

    let (commas, semicolons) = unquoted_separators(&header);
    Ok(if semicolons > commas { b';' } else { b',' })
}

/// Count `,` and `;` outside double quotes.
fn unquoted_separators(line: &str) -> (usize, usize) {
    let mut in_quotes = false;
    let mut counts = (0, 0);

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => counts.0 += 1,
            ';' if !in_quotes => counts.1 += 1,
            _ => {}
        }
    }

    counts
}
