//! Convert command - write the entity set document for a data file.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;

use crate::cli::{MappingArgs, StrictChoice};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    strict: Option<StrictChoice>,
    mapping: MappingArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some((set, source)) = super::load_entities(&file, strict, &mapping)? else {
        return Ok(());
    };

    if verbose {
        eprintln!(
            "{} {} records ({} columns) from {}",
            "Read".cyan().bold(),
            source.record_count,
            source.column_count,
            source.file
        );
    }

    let json = serde_json::to_string_pretty(&set)?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            eprintln!(
                "{} {} entities to {}",
                "Wrote".green().bold(),
                set.len().to_string().white().bold(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
