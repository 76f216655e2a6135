//! The shared result store threaded through the pipeline.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::payload;
use crate::record::Record;

/// Stage outputs keyed by stage name.
///
/// The executor is the only writer, once per stage, immediately after
/// that stage returns; every later stage sees the full store read-only.
/// Because writes are sequential and happen before all later reads, no
/// locking is involved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultStore {
    entries: IndexMap<String, Value>,
}

impl ResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a stage's output.
    pub fn insert(&mut self, stage: impl Into<String>, output: Value) {
        self.entries.insert(stage.into(), output);
    }

    /// A stage's stored output, if it executed.
    pub fn get(&self, stage: &str) -> Option<&Value> {
        self.entries.get(stage)
    }

    /// Decode a stage's output into records, tolerating the accepted
    /// payload shapes. Missing stage or undecodable payload yields an
    /// empty list.
    pub fn records_from(&self, stage: &str) -> Vec<Record> {
        self.get(stage).map(payload::extract_records).unwrap_or_default()
    }

    /// Names of executed stages, in execution order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of executed stages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no stage has executed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (stage, output) pairs in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_preserves_execution_order() {
        let mut store = ResultStore::new();
        store.insert("extraction", json!({"extracted_data": []}));
        store.insert("processing", json!({"processed_data": []}));

        let names: Vec<&str> = store.stage_names().collect();
        assert_eq!(names, vec!["extraction", "processing"]);
    }

    #[test]
    fn test_records_from_decodes_payload_shapes() {
        let mut store = ResultStore::new();
        store.insert("extraction", json!({"extracted_data": [{"name": "A"}]}));

        let records = store.records_from("extraction");
        assert_eq!(records.len(), 1);
        assert!(store.records_from("missing").is_empty());
    }
}
