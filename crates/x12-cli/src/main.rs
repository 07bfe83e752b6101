//! # x12-cli
//!
//! Command-line front end for X12 999 acknowledgment generation.
//!
//! Reads a validation result tree (JSON or YAML), generates the 999 and
//! writes it to a file or stdout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use x12_ack::{AckConfig, FixedClock, LocalClock, generate_999_with_clock};
use x12_ir::InterchangeResult;

#[derive(Parser)]
#[command(name = "x12")]
#[command(about = "X12 999 acknowledgment generator")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Generate a 999 from a validation result tree
    Ack {
        /// Validation tree file (.json, otherwise YAML)
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Envelope timestamp, e.g. 2003-04-25T15:01:53 (local time when omitted)
        #[arg(long)]
        timestamp: Option<NaiveDateTime>,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AckConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => AckConfig::default(),
    };

    match cli.command {
        Commands::Ack {
            input,
            output,
            timestamp,
        } => run_ack(&input, output.as_deref(), timestamp, &config),
    }
}

fn run_ack(
    input: &Path,
    output: Option<&Path>,
    timestamp: Option<NaiveDateTime>,
    config: &AckConfig,
) -> anyhow::Result<()> {
    tracing::info!(input = %input.display(), "Generating 999 acknowledgment");
    let tree = read_tree(input)?;

    let ack = match timestamp {
        Some(at) => generate_999_with_clock(&tree, config, FixedClock(at)),
        None => generate_999_with_clock(&tree, config, LocalClock),
    }
    .with_context(|| format!("Failed to acknowledge {}", input.display()))?;

    match output {
        Some(path) => {
            fs::write(path, &ack)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), "Wrote 999 acknowledgment");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(ack.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn read_tree(path: &Path) -> anyhow::Result<InterchangeResult> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let tree = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON validation tree in {}", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML validation tree in {}", path.display()))?
    };
    Ok(tree)
}
