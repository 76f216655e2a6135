//! Run command - execute the pipeline and export the dataset.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use colored::Colorize;
use serde_json::json;

use dataforge::oracle::OracleConfig;
use dataforge::{Dataforge, MockOracle, OpenAiOracle, Oracle};

use crate::cli::OutputFormat;
use crate::export;
use crate::extraction::FileExtraction;

pub fn run(
    query: String,
    input: PathBuf,
    mock: bool,
    model: Option<String>,
    format: OutputFormat,
    output: PathBuf,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }

    let mut config = OracleConfig::default();
    if let Some(model) = model {
        config.model = model;
    }

    let oracle: Arc<dyn Oracle> = if mock {
        Arc::new(MockOracle::with_config(config))
    } else {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| "OPENAI_API_KEY environment variable not set (or pass --mock)")?;
        Arc::new(OpenAiOracle::with_config(api_key, config)?)
    };

    println!("{} {}", "Running".cyan().bold(), query.white());

    let forge =
        Dataforge::from_arc(oracle).with_stage(Box::new(FileExtraction::new(input)));

    let start = Instant::now();
    let outcome = forge.run(&query)?;
    let elapsed = start.elapsed();

    println!(
        "Pipeline completed in {} with {} records",
        format!("{:.2}s", elapsed.as_secs_f64()).white().bold(),
        outcome.dataset.len().to_string().white().bold()
    );

    if let Some(ref quality) = outcome.quality {
        println!(
            "Quality: {} completeness, {} consistency, {} uniqueness",
            format!("{:.1}%", quality.overall_completeness).green(),
            format!("{:.1}%", quality.structure_consistency).green(),
            format!("{:.1}%", quality.uniqueness).green()
        );
    }

    if verbose {
        println!();
        println!("{}", "Stages:".yellow().bold());
        for (stage, payload) in outcome.run.store.iter() {
            let marker = if payload.get("error").is_some() {
                "degraded".yellow()
            } else {
                "ok".green()
            };
            println!("  {:12} {}", stage, marker);
        }
        println!();
    }

    if let Some(ref error) = outcome.error {
        println!("{} {}", "Warning:".yellow().bold(), error);
    }

    if outcome.success() {
        let summary = export::generate(&outcome.dataset, &query, format, &output)?;
        println!(
            "{} {} rows x {} columns",
            "Exported".cyan().bold(),
            summary.row_count.to_string().white().bold(),
            summary.columns.len().to_string().white().bold()
        );
        for (fmt, path) in &summary.output_paths {
            println!("  {} {}", fmt.to_uppercase().cyan(), path.display());
        }
    }

    write_report(&outcome, elapsed.as_secs_f64(), &output)?;

    Ok(())
}

/// Persist the execution report alongside the dataset.
fn write_report(
    outcome: &dataforge::ForgeOutcome,
    execution_time: f64,
    output: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output)?;

    let extracted = outcome
        .run
        .stage_output("extraction")
        .and_then(|v| v.get("total_items"))
        .cloned();
    let processed = outcome
        .run
        .stage_output("processing")
        .and_then(|v| v.get("processed_count"))
        .cloned();

    let report = json!({
        "query": outcome.query,
        "execution_time": execution_time,
        "plan": outcome.run.plan,
        "data_collected": outcome.dataset.len(),
        "success": outcome.success(),
        "execution_summary": {
            "data_extracted": extracted,
            "data_processed": processed,
            "overall_completeness": outcome.quality.as_ref().map(|q| q.overall_completeness),
        },
    });

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = output.join(format!("execution_report_{timestamp}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;

    tracing::info!(path = %path.display(), "execution report saved");
    Ok(())
}
