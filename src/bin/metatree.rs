//! Metatree CLI: build an ontology and dump its concept records.
//!
//! Usage:
//!   metatree build --config ontology.yaml --catalog catalog.yaml [--verbose]

use clap::{Parser, Subcommand};
use metatree::{InMemoryCatalog, Metadata, OntologyConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "metatree",
    version,
    about = "Deduplicated concept ontology builder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the ontology and print one JSON record per concept
    Build {
        /// Path to the ontology config (YAML)
        #[arg(long)]
        config: PathBuf,
        /// Path to the definition catalog (YAML)
        #[arg(long)]
        catalog: PathBuf,
        /// Log construction phases and builders
        #[arg(long, short)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_build(config: &Path, catalog: &Path) -> Result<(), String> {
    let config = OntologyConfig::load(config)
        .map_err(|e| format!("Failed to load config '{}': {}", config.display(), e))?;
    let catalog = InMemoryCatalog::load(catalog)
        .map_err(|e| format!("Failed to load catalog '{}': {}", catalog.display(), e))?;
    let metadata = Metadata::new(&config, &catalog).map_err(|e| e.to_string())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in metadata.concept_records() {
        let line = serde_json::to_string(&record).map_err(|e| e.to_string())?;
        writeln!(out, "{}", line).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            config,
            catalog,
            verbose,
        } => {
            init_logging(verbose);
            if let Err(e) = cmd_build(&config, &catalog) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
