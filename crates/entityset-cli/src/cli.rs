//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use entityset::{IngestOptions, StrictVariant};

/// Entityset: convert tabular records into canonical entities and ingest them
#[derive(Parser)]
#[command(name = "entityset")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV or JSON file into an entity set document
    Convert {
        /// Path to the data file (CSV or JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Validate pre-typed records instead of inferring roles
        #[arg(long, value_name = "VARIANT")]
        strict: Option<StrictChoice>,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Show how each column scores for each role and the resulting mapping
    Score {
        /// Path to the data file (CSV or JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Convert a file and add its entities to a dataset
    Ingest {
        /// Path to the data file (CSV or JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dataset to add the entities to
        #[arg(short, long)]
        dataset: String,

        /// Host to ingest into (default: configured host)
        #[arg(long)]
        host: Option<String>,

        /// User whose stored API key to use
        #[arg(long)]
        user: Option<String>,

        /// API key (default: ENTITYSET_API_KEY or the config file)
        #[arg(long)]
        api_key: Option<String>,

        /// Send one request per entity to find entities the service rejects
        #[arg(long)]
        per_entity: bool,

        /// Build and report, but send nothing
        #[arg(long)]
        dry_run: bool,

        /// Validate pre-typed records instead of inferring roles
        #[arg(long, value_name = "VARIANT")]
        strict: Option<StrictChoice>,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Show or change the stored client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file
    Show,

    /// Set the default host
    SetHost {
        #[arg(value_name = "HOST")]
        host: String,
    },

    /// Set the default user
    SetUser {
        #[arg(value_name = "USER")]
        user: String,
    },

    /// Store an API key for a host's environment
    SetApiKey {
        #[arg(value_name = "KEY")]
        key: String,

        /// Host (or stg/dev/prd) the key belongs to
        #[arg(long)]
        host: String,

        /// User the key belongs to (default: the default user)
        #[arg(long)]
        user: Option<String>,
    },
}

/// Options controlling role inference and entity building.
#[derive(Args, Debug, Clone, Default)]
pub struct MappingArgs {
    /// Use this kind for every entity
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Generate a new identity for every record
    #[arg(long)]
    pub generate_ids: bool,

    /// Accept the inferred mapping without asking
    #[arg(short = 'y', long, visible_alias = "auto-confirm")]
    pub answer_yes: bool,

    /// Give every entity the full time range
    #[arg(long)]
    pub infinite: bool,

    /// Timezone for date strings (IANA name, e.g. America/New_York)
    #[arg(long)]
    pub timezone: Option<String>,
}

impl MappingArgs {
    pub fn to_options(&self) -> entityset::Result<IngestOptions> {
        let mut options = IngestOptions::new()
            .generate_ids(self.generate_ids)
            .auto_confirm(self.answer_yes)
            .infinite(self.infinite);

        if let Some(kind) = &self.kind {
            options = options.with_kind(kind.clone());
        }
        if let Some(tz) = &self.timezone {
            options = options.with_timezone_name(tz)?;
        }

        Ok(options)
    }
}

/// Strict input variant
#[derive(Clone, Copy, Debug)]
pub enum StrictChoice {
    /// Time-stamped samples
    Samples,
    /// Timeless entities
    Entities,
}

impl std::str::FromStr for StrictChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "samples" | "sample" => Ok(StrictChoice::Samples),
            "entities" | "entity" => Ok(StrictChoice::Entities),
            _ => Err(format!("Unknown variant: {}. Use samples or entities.", s)),
        }
    }
}

impl From<StrictChoice> for StrictVariant {
    fn from(choice: StrictChoice) -> Self {
        match choice {
            StrictChoice::Samples => StrictVariant::Samples,
            StrictChoice::Entities => StrictVariant::Entities,
        }
    }
}
