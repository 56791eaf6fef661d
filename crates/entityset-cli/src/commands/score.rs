//! Score command - show role scores and the mapping they resolve to.

use std::path::PathBuf;

use colored::Colorize;
use entityset::input::RecordReader;
use entityset::{FieldRole, Normalizer};

use crate::cli::MappingArgs;

pub fn run(
    file: PathBuf,
    json_output: bool,
    mapping: MappingArgs,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (records, source) = RecordReader::new().read_file(&file)?;
    let normalizer = Normalizer::new(mapping.to_options()?);
    let Some((table, assignment)) = normalizer.plan(&records) else {
        return Err(format!("No records in {}", file.display()).into());
    };

    if json_output {
        let report = serde_json::json!({
            "file": source.file,
            "records": source.record_count,
            "scores": table,
            "mapping": assignment,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} ({} records, {} columns)",
        "Scores for".cyan().bold(),
        source.file.white(),
        source.record_count,
        table.column_count()
    );
    println!();

    for role in FieldRole::ALL {
        let slot = assignment.slot(role);
        let chosen = match (&slot.override_value, &slot.column) {
            (Some(value), _) => format!("= \"{}\" (override)", value).magenta().to_string(),
            (None, Some(column)) => format!("{} ({})", column, slot.score).green().to_string(),
            (None, None) => "unassigned".dimmed().to_string(),
        };
        println!("  {:14} {}", role.as_str().yellow().bold(), chosen);

        for (column, score) in table.role(role).filter(|(_, s)| *s > 0) {
            println!("  {:14}   {:20} {}", "", column, score);
        }
    }

    Ok(())
}
