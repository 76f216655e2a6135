//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Dataforge: query-to-dataset pipeline
#[derive(Parser)]
#[command(name = "dataforge")]
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
    /// Run the pipeline for a query and export the dataset
    Run {
        /// The dataset request to fulfill
        query: String,

        /// JSON file of raw extracted records to feed the pipeline
        #[arg(short, long)]
        input: PathBuf,

        /// Use the deterministic mock oracle (no API calls)
        #[arg(long)]
        mock: bool,

        /// Oracle model to use (e.g., "gpt-4o")
        #[arg(long)]
        model: Option<String>,

        /// Output format for the dataset
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Directory for generated files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Score an existing dataset file
    Score {
        /// JSON file holding an array of records
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Dataset export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    All,
}
