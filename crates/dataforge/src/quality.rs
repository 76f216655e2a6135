//! Quality scoring for the final dataset.
//!
//! All metrics are recomputed on the dataset as finally delivered, not
//! cached from the dedup stage, since enhancement may alter content after
//! dedup ran.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DataforgeError, Result};
use crate::record::{Record, fingerprint, is_filled};

/// Quality metrics for a record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Unweighted mean of all per-field completeness percentages.
    pub overall_completeness: f64,
    /// Per-field percentage of records where the field is present,
    /// non-null, and non-empty. Each distinct field counts once.
    pub field_completeness: IndexMap<String, f64>,
    /// Share of records with the most common exact field set, in percent.
    pub structure_consistency: f64,
    /// Distinct content fingerprints over total records, in percent.
    pub uniqueness: f64,
    /// Number of records scored.
    pub total_items: usize,
}

/// Score a record set.
///
/// Returns `EmptyInput` for an empty set rather than dividing by zero;
/// callers surface that as an explicit error field in their result.
pub fn score(records: &[Record]) -> Result<QualityReport> {
    if records.is_empty() {
        return Err(DataforgeError::EmptyInput(
            "No data to calculate metrics".to_string(),
        ));
    }

    let total = records.len();

    // All fields observed across records, in first-seen order.
    let mut fields: Vec<&str> = Vec::new();
    let mut seen_fields: HashSet<&str> = HashSet::new();
    for record in records {
        for key in record.keys() {
            if seen_fields.insert(key) {
                fields.push(key);
            }
        }
    }

    let mut field_completeness = IndexMap::new();
    for field in &fields {
        let filled = records
            .iter()
            .filter(|r| r.get(*field).is_some_and(is_filled))
            .count();
        field_completeness.insert(field.to_string(), filled as f64 / total as f64 * 100.0);
    }

    let overall_completeness = if field_completeness.is_empty() {
        0.0
    } else {
        field_completeness.values().sum::<f64>() / field_completeness.len() as f64
    };

    // Group records by their exact sorted set of present field names.
    let mut structure_counts: HashMap<Vec<&str>, usize> = HashMap::new();
    for record in records {
        let mut shape: Vec<&str> = record.keys().map(String::as_str).collect();
        shape.sort_unstable();
        *structure_counts.entry(shape).or_insert(0) += 1;
    }
    let largest_group = structure_counts.values().copied().max().unwrap_or(0);
    let structure_consistency = largest_group as f64 / total as f64 * 100.0;

    let distinct: HashSet<String> = records.iter().map(fingerprint).collect();
    let uniqueness = distinct.len() as f64 / total as f64 * 100.0;

    Ok(QualityReport {
        overall_completeness,
        field_completeness,
        structure_consistency,
        uniqueness,
        total_items: total,
    })
}

/// Flat completeness: filled cells over (distinct fields x records), in
/// percent. Zero for an empty set.
pub fn completeness_rate(records: &[Record]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let mut fields: HashSet<&str> = HashSet::new();
    for record in records {
        fields.extend(record.keys().map(String::as_str));
    }
    if fields.is_empty() {
        return 0.0;
    }

    let filled: usize = records
        .iter()
        .map(|r| {
            fields
                .iter()
                .filter(|f| r.get(**f).is_some_and(is_filled))
                .count()
        })
        .sum();

    filled as f64 / (fields.len() * records.len()) as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_set_is_an_error() {
        let err = score(&[]).unwrap_err();
        assert!(matches!(err, DataforgeError::EmptyInput(_)));
    }

    #[test]
    fn test_perfect_dataset() {
        let records = vec![
            record(&[("name", json!("A")), ("price", json!(10.0))]),
            record(&[("name", json!("B")), ("price", json!(12.0))]),
        ];
        let report = score(&records).unwrap();
        assert_eq!(report.overall_completeness, 100.0);
        assert_eq!(report.structure_consistency, 100.0);
        assert_eq!(report.uniqueness, 100.0);
        assert_eq!(report.total_items, 2);
    }

    #[test]
    fn test_field_completeness_counts_nulls_and_empties_as_missing() {
        let records = vec![
            record(&[("name", json!("A")), ("price", json!(10.0))]),
            record(&[("name", json!("B")), ("price", Value::Null)]),
            record(&[("name", json!("")), ("price", json!(5.0))]),
            record(&[("name", json!("D"))]),
        ];
        let report = score(&records).unwrap();
        assert_eq!(report.field_completeness["name"], 75.0);
        assert_eq!(report.field_completeness["price"], 50.0);
        assert_eq!(report.overall_completeness, 62.5);
    }

    #[test]
    fn test_structure_consistency_uses_largest_group() {
        let records = vec![
            record(&[("name", json!("A")), ("price", json!(1.0))]),
            record(&[("price", json!(2.0)), ("name", json!("B"))]),
            record(&[("name", json!("C"))]),
        ];
        let report = score(&records).unwrap();
        // Field order does not matter; the two-field shape dominates.
        assert!((report.structure_consistency - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_uniqueness_detects_duplicates() {
        let records = vec![
            record(&[("name", json!("A"))]),
            record(&[("name", json!("A"))]),
            record(&[("name", json!("B"))]),
            record(&[("name", json!("C"))]),
        ];
        let report = score(&records).unwrap();
        assert_eq!(report.uniqueness, 75.0);
    }

    #[test]
    fn test_metrics_stay_in_bounds() {
        let records = vec![
            record(&[("a", Value::Null)]),
            record(&[("b", json!(""))]),
            record(&[("c", json!("x"))]),
        ];
        let report = score(&records).unwrap();
        assert!((0.0..=100.0).contains(&report.overall_completeness));
        assert!((0.0..=100.0).contains(&report.structure_consistency));
        assert!((0.0..=100.0).contains(&report.uniqueness));
    }

    #[test]
    fn test_completeness_rate() {
        let records = vec![
            record(&[("name", json!("A")), ("price", json!(1.0))]),
            record(&[("name", json!("B"))]),
        ];
        // 3 filled cells out of 2 fields x 2 records.
        assert_eq!(completeness_rate(&records), 75.0);
        assert_eq!(completeness_rate(&[]), 0.0);
    }
}
