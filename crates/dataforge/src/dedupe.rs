//! Two-granularity duplicate suppression.
//!
//! The coarse pass runs right after raw extraction, before any
//! standardization, keyed on the identifying `name` field alone. The fine
//! pass runs after standardization, keyed on the whole-record fingerprint:
//! cleaning can make two previously-distinct raw records collapse to
//! identical canonical content that the name-only pass could not detect.

use std::collections::HashSet;

use serde_json::Value;

use crate::record::{Record, fingerprint};

/// Field used as the coarse dedup key.
const COARSE_KEY: &str = "name";

/// Coarse pass: first-seen-wins on the lowercased `name` value.
///
/// Records with a missing, non-string, or empty `name` are always kept.
/// Accepted heuristic: this can under-deduplicate nameless records, which
/// the fine pass catches later.
pub fn coarse_dedupe(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let key = match record.get(COARSE_KEY) {
            Some(Value::String(name)) if !name.is_empty() => Some(name.to_lowercase()),
            _ => None,
        };

        match key {
            Some(key) => {
                if seen.insert(key) {
                    unique.push(record);
                }
            }
            None => unique.push(record),
        }
    }

    unique
}

/// Fine pass: first-seen-wins on the content fingerprint, provenance
/// fields excluded. Input order is preserved in the output.
pub fn fine_dedupe(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(fingerprint(&record)) {
            unique.push(record);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_coarse_dedupe_is_case_insensitive() {
        let records = vec![
            record(&[("name", json!("Claude")), ("price", json!("$10"))]),
            record(&[("name", json!("claude")), ("price", json!("10.00"))]),
            record(&[("name", json!("Other"))]),
        ];
        let unique = coarse_dedupe(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0]["price"], json!("$10"));
    }

    #[test]
    fn test_coarse_dedupe_keeps_nameless_records() {
        let records = vec![
            record(&[("description", json!("a"))]),
            record(&[("description", json!("a"))]),
            record(&[("name", json!(""))]),
            record(&[("name", json!(42))]),
        ];
        assert_eq!(coarse_dedupe(records).len(), 4);
    }

    #[test]
    fn test_fine_dedupe_ignores_provenance() {
        let records = vec![
            record(&[("name", json!("X")), ("source_url", json!("https://a.example"))]),
            record(&[("name", json!("X")), ("source_url", json!("https://b.example"))]),
        ];
        let unique = fine_dedupe(records);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0]["source_url"], json!("https://a.example"));
    }

    #[test]
    fn test_fine_dedupe_preserves_order() {
        let records = vec![
            record(&[("name", json!("B"))]),
            record(&[("name", json!("A"))]),
            record(&[("name", json!("B"))]),
        ];
        let unique = fine_dedupe(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0]["name"], json!("B"));
        assert_eq!(unique[1]["name"], json!("A"));
    }

    #[test]
    fn test_fine_dedupe_is_idempotent() {
        let records = vec![
            record(&[("name", json!("A"))]),
            record(&[("name", json!("A"))]),
            record(&[("name", json!("B"))]),
        ];
        let once = fine_dedupe(records);
        let twice = fine_dedupe(once.clone());
        assert_eq!(once, twice);
    }
}
