//! Template extrapolation: extending cleaning decisions from an
//! oracle-cleaned sample to the rest of a batch without further oracle
//! calls.

use indexmap::IndexMap;
use serde_json::Value;

use crate::record::Record;
use crate::reconcile::fields_similar;

/// Extend the structure of `cleaned_sample[0]` to every record in
/// `remaining`.
///
/// A one-shot raw-to-canonical field mapping is derived by comparing the
/// key set of the first remaining record against the template's key set
/// with the exact / substring / prefix-ratio similarity rule, independent
/// of the run's mapping cache. Keys the derived mapping misses get a
/// second-chance match directly against `target_fields` (a hit is
/// memoized for later records); still-unmatched keys keep their original
/// name. Every output record is padded to the template's full field set
/// with nulls.
///
/// Accepted limitation: this assumes the first sampled record's structure
/// generalizes. A structurally heterogeneous batch may extrapolate
/// incorrectly shaped records.
pub fn extrapolate(
    remaining: &[Record],
    cleaned_sample: &[Record],
    target_fields: &[String],
) -> Vec<Record> {
    let (Some(first), Some(template)) = (remaining.first(), cleaned_sample.first()) else {
        return Vec::new();
    };

    let mut mapping: IndexMap<String, String> = IndexMap::new();
    for orig_key in first.keys() {
        if let Some(template_key) = template
            .keys()
            .find(|template_key| fields_similar(orig_key, template_key))
        {
            mapping.insert(orig_key.clone(), template_key.clone());
        }
    }

    let mut extrapolated = Vec::with_capacity(remaining.len());
    for record in remaining {
        let mut shaped = Record::new();

        for (key, value) in record {
            if let Some(mapped) = mapping.get(key) {
                shaped.insert(mapped.clone(), value.clone());
            } else if let Some(target) = target_fields
                .iter()
                .find(|target| fields_similar(key, target))
            {
                shaped.insert(target.clone(), value.clone());
                mapping.insert(key.clone(), target.clone());
            } else {
                shaped.insert(key.clone(), value.clone());
            }
        }

        for field in template.keys() {
            if !shaped.contains_key(field) {
                shaped.insert(field.clone(), Value::Null);
            }
        }

        extrapolated.push(shaped);
    }

    extrapolated
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

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_maps_keys_onto_template_structure() {
        let sample = vec![record(&[
            ("tool_name", json!("Claude")),
            ("price", json!(20.0)),
        ])];
        let remaining = vec![record(&[
            ("Tool Name", json!("Codex")),
            ("Price", json!("$25")),
        ])];

        let shaped = extrapolate(&remaining, &sample, &strings(&["tool_name", "price"]));
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0]["tool_name"], json!("Codex"));
        assert_eq!(shaped[0]["price"], json!("$25"));
    }

    #[test]
    fn test_pads_missing_template_fields_with_null() {
        let sample = vec![record(&[
            ("tool_name", json!("Claude")),
            ("price", json!(20.0)),
            ("url", json!("https://claude.ai")),
        ])];
        let remaining = vec![record(&[("tool_name", json!("Codex"))])];

        let shaped = extrapolate(&remaining, &sample, &strings(&["tool_name"]));
        assert_eq!(shaped[0]["price"], Value::Null);
        assert_eq!(shaped[0]["url"], Value::Null);
    }

    #[test]
    fn test_second_chance_match_against_target_fields() {
        let sample = vec![record(&[("tool_name", json!("Claude"))])];
        // "pricing" has no counterpart in the template but matches the
        // target field "price".
        let remaining = vec![
            record(&[("tool_name", json!("Codex")), ("pricing", json!("$25"))]),
            record(&[("tool_name", json!("Bard")), ("pricing", json!("free"))]),
        ];

        let shaped = extrapolate(&remaining, &sample, &strings(&["tool_name", "price"]));
        assert_eq!(shaped[0]["price"], json!("$25"));
        assert_eq!(shaped[1]["price"], json!("free"));
    }

    #[test]
    fn test_unmatched_keys_keep_original_name() {
        let sample = vec![record(&[("tool_name", json!("Claude"))])];
        let remaining = vec![record(&[
            ("tool_name", json!("Codex")),
            ("editor_notes", json!("solid")),
        ])];

        let shaped = extrapolate(&remaining, &sample, &strings(&["tool_name"]));
        assert_eq!(shaped[0]["editor_notes"], json!("solid"));
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let sample = vec![record(&[("a", json!(1))])];
        assert!(extrapolate(&[], &sample, &[]).is_empty());
        assert!(extrapolate(&[record(&[("a", json!(1))])], &[], &[]).is_empty());
    }
}
