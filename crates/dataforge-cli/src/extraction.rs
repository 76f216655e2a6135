//! File-backed extraction collaborator.
//!
//! The core pipeline treats extraction as an external concern. This
//! stage feeds it from a JSON file of previously extracted raw records,
//! tolerating the same payload shapes the pipeline accepts everywhere.

use std::path::PathBuf;

use serde_json::{Value, json};

use dataforge::payload;
use dataforge::{Result, Stage, StageInput};

/// Extraction stage that loads raw records from a file.
pub struct FileExtraction {
    path: PathBuf,
}

impl FileExtraction {
    /// Create an extraction stage reading from `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Stage for FileExtraction {
    fn name(&self) -> &str {
        "extraction"
    }

    fn execute(&self, _input: &StageInput<'_>) -> Result<Value> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "cannot read input file");
                return Ok(json!({
                    "error": format!("Cannot read {}: {e}", self.path.display()),
                    "extracted_data": [],
                }));
            }
        };

        let value: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        let records = payload::extract_records(&value);

        tracing::info!(records = records.len(), "loaded extracted records");

        Ok(json!({
            "extracted_data": records,
            "total_items": records.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataforge::ResultStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn execute_on(content: &str) -> Value {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let stage = FileExtraction::new(file.path().to_path_buf());
        let store = ResultStore::new();
        let input = StageInput {
            query: "q",
            interpreted_query: "",
            required_fields: &[],
            instructions: "",
            previous_results: &store,
        };
        stage.execute(&input).unwrap()
    }

    #[test]
    fn test_loads_bare_array() {
        let output = execute_on(r#"[{"name": "A"}, {"name": "B"}]"#);
        assert_eq!(output["total_items"], json!(2));
    }

    #[test]
    fn test_loads_wrapped_records() {
        let output = execute_on(r#"{"data": [{"name": "A"}]}"#);
        assert_eq!(output["total_items"], json!(1));
    }

    #[test]
    fn test_missing_file_reports_error_marker() {
        let stage = FileExtraction::new(PathBuf::from("/nonexistent/records.json"));
        let store = ResultStore::new();
        let input = StageInput {
            query: "q",
            interpreted_query: "",
            required_fields: &[],
            instructions: "",
            previous_results: &store,
        };
        let output = stage.execute(&input).unwrap();
        assert!(output["error"].as_str().unwrap().contains("Cannot read"));
        assert_eq!(output["extracted_data"], json!([]));
    }
}
