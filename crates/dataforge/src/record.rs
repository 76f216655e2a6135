//! Record types and content fingerprinting.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// A single data record: field name to scalar, list, or nested value.
///
/// Raw records carry uncontrolled free-text keys from heterogeneous
/// producers; canonical records are restricted to the target schema's
/// field names (plus normalized leftovers) after standardization. Field
/// insertion order is preserved for export.
pub type Record = IndexMap<String, Value>;

/// Provenance fields excluded from fingerprinting.
///
/// They vary by origin, not content: two records describing the same
/// entity from different pages must still collapse as duplicates.
pub const PROVENANCE_FIELDS: [&str; 2] = ["source_url", "source_title"];

/// Compute a content fingerprint for a record.
///
/// Keys are sorted before digesting so the result is insensitive to field
/// iteration order; nested objects serialize with sorted keys as well.
/// Equal content always yields equal fingerprints.
pub fn fingerprint(record: &Record) -> String {
    let filtered: BTreeMap<&str, &Value> = record
        .iter()
        .filter(|(k, _)| !PROVENANCE_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    let canonical = serde_json::to_string(&filtered).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

/// Whether a field value counts as filled for completeness purposes:
/// present, non-null, and not an empty string.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
