//! Dataset export: the file-writing collaborator at the pipeline edge.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::{Value, json};

use dataforge::Record;

use crate::cli::OutputFormat;

/// Where one export run landed.
pub struct ExportSummary {
    /// Number of records written.
    pub row_count: usize,
    /// Columns, in first-seen order.
    pub columns: Vec<String>,
    /// (format, path) of each generated file.
    pub output_paths: Vec<(String, PathBuf)>,
}

/// Write the dataset in the requested formats plus a metadata file.
///
/// Filenames derive from a sanitized query slug and a timestamp.
pub fn generate(
    records: &[Record],
    query: &str,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<ExportSummary, Box<dyn Error>> {
    if records.is_empty() {
        return Err("No data to generate dataset".into());
    }

    fs::create_dir_all(output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let base = format!("{}_{}", slugify(query), timestamp);
    let columns = collect_columns(records);

    let mut output_paths = Vec::new();

    if matches!(format, OutputFormat::Csv | OutputFormat::All) {
        let path = output_dir.join(format!("{base}.csv"));
        write_csv(records, &columns, &path)?;
        output_paths.push(("csv".to_string(), path));
    }

    if matches!(format, OutputFormat::Json | OutputFormat::All) {
        let path = output_dir.join(format!("{base}.json"));
        fs::write(&path, serde_json::to_string_pretty(records)?)?;
        output_paths.push(("json".to_string(), path));
    }

    let metadata = json!({
        "query": query,
        "row_count": records.len(),
        "column_count": columns.len(),
        "columns": columns,
        "output_paths": output_paths
            .iter()
            .map(|(f, p)| (f.clone(), p.display().to_string()))
            .collect::<Vec<_>>(),
    });
    let metadata_path = output_dir.join(format!("{base}_metadata.json"));
    fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

    Ok(ExportSummary {
        row_count: records.len(),
        columns,
        output_paths,
    })
}

/// Lowercased query with every non-alphanumeric run collapsed to `_`.
fn slugify(query: &str) -> String {
    query
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// All columns across records, in first-seen order.
fn collect_columns(records: &[Record]) -> Vec<String> {
    let mut columns = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn write_csv(records: &[Record], columns: &[String], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| record.get(col).map(cell).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Render one value as a CSV cell.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_generate_csv_and_metadata() {
        let dir = TempDir::new().unwrap();
        let records = vec![
            record(&[("name", json!("A")), ("price", json!(10.5))]),
            record(&[("name", json!("B")), ("price", Value::Null)]),
        ];

        let summary = generate(&records, "AI tools 2024", OutputFormat::Csv, dir.path()).unwrap();

        assert_eq!(summary.row_count, 2);
        assert_eq!(summary.columns, vec!["name", "price"]);
        assert_eq!(summary.output_paths.len(), 1);

        let csv_path = &summary.output_paths[0].1;
        assert!(csv_path.file_name().unwrap().to_string_lossy().starts_with("ai_tools_2024_"));

        let content = fs::read_to_string(csv_path).unwrap();
        assert!(content.starts_with("name,price\n"));
        assert!(content.contains("A,10.5"));
        assert!(content.contains("B,\n") || content.ends_with("B,"));
    }

    #[test]
    fn test_generate_all_formats() {
        let dir = TempDir::new().unwrap();
        let records = vec![record(&[("name", json!("A"))])];

        let summary = generate(&records, "q", OutputFormat::All, dir.path()).unwrap();
        let formats: Vec<&str> = summary.output_paths.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(formats, vec!["csv", "json"]);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(generate(&[], "q", OutputFormat::Csv, dir.path()).is_err());
    }

    #[test]
    fn test_nested_values_serialize_into_cells() {
        let dir = TempDir::new().unwrap();
        let records = vec![record(&[
            ("name", json!("A")),
            ("features", json!(["fast", "cheap"])),
        ])];

        let summary = generate(&records, "q", OutputFormat::Csv, dir.path()).unwrap();
        let content = fs::read_to_string(&summary.output_paths[0].1).unwrap();
        assert!(content.contains(r#""[""fast"",""cheap""]""#));
    }
}
