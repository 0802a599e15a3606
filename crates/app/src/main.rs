use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use totalline_label::DatasetError;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::TrainerConfig;

#[derive(Parser)]
#[command(
    name = "totalline",
    version,
    about = "Weak labels for receipt total-line classification"
)]
struct Cli {
    /// TOML settings file; flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Args)]
struct DatasetArgs {
    /// Exported receipt_labels.jsonl
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Minimum positive lines required to train
    #[arg(long)]
    min_positives: Option<usize>,
    /// Drop exact duplicate records first
    #[arg(long)]
    dedup: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the canonical form of each money string
    Normalize {
        #[arg(required = true)]
        raw: Vec<String>,
    },
    /// Weak-label the lines of one receipt (reads stdin without --file)
    Label {
        #[arg(long)]
        total: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show dataset statistics
    Stats {
        #[command(flatten)]
        args: DatasetArgs,
    },
    /// Label the dataset and write training samples as JSONL
    Export {
        #[command(flatten)]
        args: DatasetArgs,
        /// Output path for samples
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>, args: DatasetArgs) -> Result<TrainerConfig> {
    let mut config = match path {
        Some(p) => TrainerConfig::load(p)?,
        None => TrainerConfig::default(),
    };
    if let Some(dataset) = args.dataset {
        config.dataset = dataset;
    }
    if let Some(min) = args.min_positives {
        config.min_positives = min;
    }
    config.dedup |= args.dedup;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match cli.cmd {
        Cmd::Normalize { raw } => commands::normalize_amounts(&raw, &mut stdout),
        Cmd::Label { total, file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            commands::label_receipt(&text, &total, &mut stdout)
        }
        Cmd::Stats { args } => {
            let config = load_config(cli.config.as_ref(), args)?;
            commands::stats(&config, &mut stdout).map(|_| ())
        }
        Cmd::Export { args, output } => {
            let mut config = load_config(cli.config.as_ref(), args)?;
            if let Some(output) = output {
                config.output = output;
            }
            commands::export(&config, &mut stdout).map(|_| ())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        // Too little data is a configuration problem, not a crash.
        Err(e) if e.downcast_ref::<DatasetError>().is_some() => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
