//! Ingest command - convert a data file and add the entities to a dataset.

use std::path::PathBuf;

use colored::Colorize;
use entityset::config::{ClientConfig, ConfigFile, ConfigOverrides};
use entityset::transport::{ingest_set, HttpTransport, IngestMode, IngestTransport, RecordingTransport};

use crate::cli::{MappingArgs, StrictChoice};

/// Connection flags for the ingest command.
pub struct Target {
    pub dataset: String,
    pub host: Option<String>,
    pub user: Option<String>,
    pub api_key: Option<String>,
}

pub fn run(
    file: PathBuf,
    target: Target,
    per_entity: bool,
    dry_run: bool,
    strict: Option<StrictChoice>,
    mapping: MappingArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some((set, source)) = super::load_entities(&file, strict, &mapping)? else {
        return Ok(());
    };

    println!(
        "{} {} entities from {}",
        "Converted".cyan().bold(),
        set.len().to_string().white().bold(),
        source.file
    );

    let mode = if per_entity {
        IngestMode::PerEntity
    } else {
        IngestMode::Batch
    };

    let transport: Box<dyn IngestTransport> = if dry_run {
        Box::new(RecordingTransport::new())
    } else {
        let overrides = ConfigOverrides {
            host: target.host,
            user: target.user,
            api_key: target.api_key,
        };
        let file_config = ConfigFile::load(ConfigFile::default_path()?)?;
        let client = ClientConfig::resolve(&overrides, &file_config);
        if verbose {
            println!("Host: {}", client.host);
        }
        Box::new(HttpTransport::from_client_config(&client)?)
    };

    let receipt = ingest_set(transport.as_ref(), &target.dataset, &set, mode)?;

    if dry_run {
        println!("{}", "Dry run: nothing was sent.".yellow());
    }
    println!(
        "{} {} entities into {} ({} requests)",
        "Ingested".green().bold(),
        receipt.entities.to_string().white().bold(),
        receipt.dataset_id,
        receipt.requests
    );
    if verbose {
        for job in &receipt.jobs {
            println!("  job {}", job);
        }
    }

    Ok(())
}
