//! cconv: linear convolution of complex sequences.
//!
//! This is the main entry point for the command-line tool.

mod config;
mod orchestrator;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cconv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Convolve the built-in example sequences
    Demo,

    /// Run a job described by a TOML or JSON file
    Run {
        /// Path to the job configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Demo => {
            run_demo(cli.format)?;
        }
        Commands::Run { config, output } => {
            run_job(&config, output.as_deref(), cli.format)?;
        }
    }

    Ok(())
}

fn run_demo(format: OutputFormat) -> Result<()> {
    let results = orchestrator::Orchestrator::new(config::JobConfig::reference()).run()?;
    output::print_results(&results, format)
}

fn run_job(config_path: &Path, output_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    tracing::info!("Loading configuration from {:?}", config_path);

    let config = config::load_config(config_path)?;
    let results = orchestrator::Orchestrator::new(config).run()?;

    match output_path {
        Some(path) => output::write_results(&results, path, format)?,
        None => output::print_results(&results, format)?,
    }

    Ok(())
}
