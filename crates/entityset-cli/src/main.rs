//! Entityset CLI - convert tabular records into entities and ingest them.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            file,
            output,
            strict,
            mapping,
        } => commands::convert::run(file, output, strict, mapping, cli.verbose),

        Commands::Score {
            file,
            json,
            mapping,
        } => commands::score::run(file, json, mapping, cli.verbose),

        Commands::Ingest {
            file,
            dataset,
            host,
            user,
            api_key,
            per_entity,
            dry_run,
            strict,
            mapping,
        } => commands::ingest::run(
            file,
            commands::ingest::Target {
                dataset,
                host,
                user,
                api_key,
            },
            per_entity,
            dry_run,
            strict,
            mapping,
            cli.verbose,
        ),

        Commands::Config { action } => commands::config::run(action, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr: `debug` with `--verbose`, otherwise `warn`. `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}
