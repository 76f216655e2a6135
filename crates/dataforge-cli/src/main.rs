//! Dataforge CLI - query-to-dataset pipeline.

mod cli;
mod commands;
mod export;
mod extraction;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "dataforge=debug,info"
    } else {
        "dataforge=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            query,
            input,
            mock,
            model,
            format,
            output,
        } => commands::run::run(query, input, mock, model, format, output, cli.verbose),

        Commands::Score { file, json } => commands::score::run(file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
