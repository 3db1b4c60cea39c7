//! Diavgeia CLI
//!
//! Command-line interface for:
//! - Generating the canonical N3 document for one decision record (`generate`)
//! - Running the full publication pipeline (`publish`)
//! - Timing bare generation throughput (`bench`)
//!
//! Decision records are JSON files carrying `{decision_type, iun, version,
//! organization_id, unit_ids, fields}`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use diavgeia_model::Decision;
use diavgeia_publish::PublishConfig;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "diavgeia")]
#[command(author, version, about = "Diavgeia decision N3 generation and publication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the N3 document for a decision record.
    Generate {
        /// Decision record JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Skip type-specific and auxiliary entity emission
        #[arg(long)]
        benchmark: bool,
    },

    /// Generate, index, write, load and compress a decision record.
    Publish {
        /// Decision record JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Publication config JSON file
        #[arg(short, long)]
        config: PathBuf,
        /// Skip the index insert and the loader; keep only the compressed file
        #[arg(long)]
        benchmark: bool,
    },

    /// Time bare generation of one record.
    Bench {
        /// Decision record JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Number of generation runs
        #[arg(short = 'n', long, default_value_t = 1000)]
        iterations: u32,
    },
}

fn load_decision(path: &PathBuf) -> Result<Decision> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading decision record {}", path.display()))?;
    let decision: Decision = serde_json::from_str(&raw)
        .with_context(|| format!("parsing decision record {}", path.display()))?;
    Ok(decision)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            input,
            out,
            benchmark,
        } => {
            let mut decision = load_decision(&input)?;
            decision.benchmark = benchmark;
            let document = diavgeia_emit::generate(&decision);
            match out {
                Some(path) => {
                    fs::write(&path, &document)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("{} {}", "wrote".green(), path.display());
                }
                None => print!("{document}"),
            }
        }
        Commands::Publish {
            input,
            config,
            benchmark,
        } => {
            let mut decision = load_decision(&input)?;
            decision.benchmark = benchmark;
            let config = PublishConfig::load(&config)?;
            let published = diavgeia_publish::publish(&config, &decision)?;
            println!(
                "{} {} (version {}) -> {}",
                "published".green(),
                decision.iun,
                decision.version,
                published.file.display()
            );
            if let Some(output) = published.loader_output.filter(|o| !o.is_empty()) {
                println!("{} {output}", "loader:".cyan());
            }
        }
        Commands::Bench { input, iterations } => {
            let decision = load_decision(&input)?;
            let start = Instant::now();
            let mut bytes = 0usize;
            for _ in 0..iterations {
                bytes += diavgeia_emit::generate(&decision).len();
            }
            let elapsed = start.elapsed();
            let per_run = elapsed / iterations.max(1);
            println!(
                "{}: {} runs in {:.3}s ({:?}/run, {} bytes/doc)",
                "bench".cyan().bold(),
                iterations,
                elapsed.as_secs_f64(),
                per_run,
                bytes / iterations.max(1) as usize
            );
        }
    }
    Ok(())
}
