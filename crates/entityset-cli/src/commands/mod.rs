//! CLI command implementations.

pub mod config;
pub mod convert;
pub mod ingest;
pub mod score;

mod prompt;

use std::path::Path;

use colored::Colorize;
use entityset::{EntitySet, IngestError, Normalizer, SourceMetadata};

use crate::cli::{MappingArgs, StrictChoice};

/// Read and convert `file`, asking for confirmation unless `-y` was given.
///
/// Returns `None` when the mapping was declined.
pub(crate) fn load_entities(
    file: &Path,
    strict: Option<StrictChoice>,
    mapping: &MappingArgs,
) -> Result<Option<(EntitySet, SourceMetadata)>, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let normalizer = Normalizer::new(mapping.to_options()?).with_confirmer(prompt::ConsoleConfirm);

    let result = match strict {
        Some(variant) => normalizer.normalize_strict_file(file, variant.into()),
        None => normalizer.normalize_file(file),
    };

    match result {
        Ok(converted) => Ok(Some(converted)),
        Err(IngestError::UserDeclinedMapping) => {
            eprintln!("{}", "Mapping declined; nothing was converted.".yellow());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
