#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shutsuba_config::Config;
use shutsuba_core::{ExtractedField, KnownNameRegistry, ParticipantRecord};
use shutsuba_parse::RaceCardParser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "shutsuba")]
#[command(about = "shutsuba race-card parser", long_about = None)]
struct Cli {
    /// Log classification decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a race-card paste into participant records
    Parse {
        /// File holding the pasted card; stdin when omitted
        file: Option<PathBuf>,

        /// Emit records as a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Parse { file, json } => {
            let config = Config::load_or_default()?;
            let registry = KnownNameRegistry::from_config(&config.registry)?;
            let parser = RaceCardParser::new(registry, config.extractor);

            let text = match file {
                Some(path) => {
                    info!("Reading race card from {}", path.display());
                    std::fs::read_to_string(&path)?
                }
                None => std::io::read_to_string(std::io::stdin())?,
            };

            let records = parser.parse(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }
        Commands::Init => {
            Config::create_config()?;
        }
        Commands::Version => {
            println!("shutsuba {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn print_records(records: &[ParticipantRecord]) {
    println!("=== Race Card ({} participants) ===\n", records.len());

    for record in records {
        println!("#{} (draw {}):", record.number, record.draw);
        println!("  Name: {}", format_field(record.name.as_ref()));
        println!("  Sire: {}", format_field(record.sire.as_ref()));
        println!("  Dam: {}", format_field(record.dam.as_ref()));
        println!("  Dam Sire: {}", format_field(record.dam_sire.as_ref()));

        if let Some(style) = record.running_style {
            println!("  Running Style: {} ({})", style.token(), style.as_str());
        }
        if let Some(odds) = record.odds {
            println!("  Odds: {odds}");
        }
        if let Some(popularity) = record.popularity {
            println!("  Popularity: {popularity}");
        }
        if let Some(weight) = record.weight {
            println!("  Weight: {}kg ({:+})", weight.body, weight.delta);
        }
        println!();
    }
}

fn format_field(field: Option<&ExtractedField>) -> String {
    field.map_or_else(
        || "(not found)".to_string(),
        |field| {
            format!(
                "{} [{}, {:.2}]",
                field.value,
                field.provenance.as_str(),
                field.confidence()
            )
        },
    )
}
