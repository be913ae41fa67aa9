use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, error};
use serde::Serialize;
use tally_transform::{DataTransform, Dataset, ThresholdBanding, TransformConfig};

const STDIN_PATH: &str = "-";

/// Summarize and pivot chart datasets
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print derived statistics (keys, totals, extents, thresholds) for a dataset
    Summary {
        /// Path to a JSON dataset, or `-` for stdin
        #[arg(default_value = STDIN_PATH)]
        file_path: String,

        /// Threshold banding: `quartile` or `legacy`
        #[arg(short, long, default_value_t = ThresholdBanding::Quartile)]
        banding: ThresholdBanding,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print a multi-series dataset with rows and columns swapped
    Rotate {
        /// Path to a JSON dataset, or `-` for stdin
        #[arg(default_value = STDIN_PATH)]
        file_path: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn read_dataset(file_path: &str) -> Result<Dataset> {
    let contents = if file_path == STDIN_PATH {
        let mut contents = String::new();
        io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read dataset from stdin")?;
        contents
    } else {
        let path = PathBuf::from(file_path);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read dataset from {}", path.display()))?
    };

    let dataset = contents
        .parse::<Dataset>()
        .with_context(|| format!("Failed to parse dataset from {file_path}"))?;
    debug!(
        "Loaded dataset with {} series from {}",
        dataset.series().len(),
        file_path
    );
    Ok(dataset)
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summary {
            file_path,
            banding,
            pretty,
        } => {
            let config = TransformConfig::default().with_threshold_banding(banding);
            let transform = DataTransform::with_config(read_dataset(&file_path)?, config);
            write_json(&transform.summary(), pretty)
        }
        Commands::Rotate { file_path, pretty } => {
            let transform = DataTransform::new(read_dataset(&file_path)?);
            let rotated = transform
                .rotate()
                .with_context(|| format!("Failed to rotate dataset from {file_path}"))?;
            write_json(&rotated, pretty)
        }
    }
}

fn main() {
    // Setup logger
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
