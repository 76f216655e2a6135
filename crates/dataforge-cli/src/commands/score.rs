//! Score command - quality metrics for an existing dataset file.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::Value;

use dataforge::{payload, quality};

pub fn run(file: PathBuf, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let text = std::fs::read_to_string(&file)?;
    let value: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
    let records = payload::extract_records(&value);

    if records.is_empty() {
        return Err(format!("No records found in {}", file.display()).into());
    }

    let report = quality::score(&records)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} records",
        "Scored".cyan().bold(),
        report.total_items.to_string().white().bold()
    );
    println!(
        "  Overall completeness:  {}",
        format!("{:.1}%", report.overall_completeness).green()
    );
    println!(
        "  Structure consistency: {}",
        format!("{:.1}%", report.structure_consistency).green()
    );
    println!(
        "  Uniqueness:            {}",
        format!("{:.1}%", report.uniqueness).green()
    );

    println!();
    println!("{}", "Per-field completeness:".yellow().bold());
    for (field, pct) in &report.field_completeness {
        println!("  {:24} {:.1}%", field, pct);
    }

    Ok(())
}
