//! The processing stage: reconciliation, standardization, dedup,
//! extrapolation.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::dedupe::{coarse_dedupe, fine_dedupe};
use crate::error::Result;
use crate::extrapolate::extrapolate;
use crate::oracle::{CleanRequest, Oracle};
use crate::pipeline::{Stage, StageInput};
use crate::payload;
use crate::reconcile::{MappingCache, reconcile_field};
use crate::record::Record;
use crate::schema::{FieldSpec, TargetSchema};
use crate::standardize::clean_value;

use super::{EXTRACTION, PROCESSING, QUERY_ANALYSIS};

/// Turns raw extracted records into a clean, deduplicated canonical set.
///
/// A bounded sample goes to the oracle for cleaning; the remainder is
/// extrapolated from the cleaned sample's structure without further
/// oracle calls. All records then pass through field reconciliation and
/// value standardization before the fine dedup pass.
pub struct ProcessStage {
    oracle: Arc<dyn Oracle>,
}

impl ProcessStage {
    /// Create a processing stage backed by an oracle.
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Fields to standardize against: the query-analysis stage's output
    /// wins over the plan's fields.
    fn resolve_fields(&self, input: &StageInput<'_>) -> Vec<FieldSpec> {
        input
            .previous_results
            .get(QUERY_ANALYSIS)
            .and_then(|v| v.get("required_data_fields"))
            .and_then(|v| serde_json::from_value::<Vec<FieldSpec>>(v.clone()).ok())
            .filter(|fields| !fields.is_empty())
            .unwrap_or_else(|| input.required_fields.to_vec())
    }
}

impl Stage for ProcessStage {
    fn name(&self) -> &str {
        PROCESSING
    }

    fn execute(&self, input: &StageInput<'_>) -> Result<Value> {
        let extracted = input.previous_results.records_from(EXTRACTION);
        let original_count = extracted.len();

        tracing::info!(records = original_count, "processing extracted data");

        if extracted.is_empty() {
            tracing::error!("no extracted data to process");
            return Ok(json!({
                "error": "No extracted data to process",
                "processed_data": [],
            }));
        }

        let schema = TargetSchema::from_fields(self.resolve_fields(input));
        let field_names: Vec<String> =
            schema.field_names().into_iter().map(String::from).collect();

        // Coarse pass runs on raw records, before any standardization.
        let records = coarse_dedupe(extracted);

        let query = if input.interpreted_query.is_empty() {
            input.query
        } else {
            input.interpreted_query
        };

        let limit = self.oracle.config().sample_limit.min(records.len());
        let (sample, remaining) = records.split_at(limit);

        let request = CleanRequest {
            query,
            instructions: input.instructions,
            field_names: &field_names,
            sample,
            total: records.len(),
        };

        let (mut cleaned, dropped) = match self.oracle.clean_records(&request) {
            Ok(response) => payload::extract_records_counted(&response),
            Err(e) => {
                tracing::warn!(error = %e, "oracle cleaning failed, using empty sample");
                (Vec::new(), 0)
            }
        };

        if !remaining.is_empty() && !cleaned.is_empty() {
            tracing::info!(remaining = remaining.len(), "extrapolating past the sample");
            let shaped = extrapolate(remaining, &cleaned, &field_names);
            cleaned.extend(shaped);
        }

        let mut cache = MappingCache::new();
        let mut canonical: Vec<Record> = Vec::with_capacity(cleaned.len());
        for record in &cleaned {
            let mut out = Record::new();
            for (key, value) in record {
                let mapped = reconcile_field(key, &schema, &mut cache);
                out.insert(mapped.clone(), clean_value(value, &mapped));
            }
            for name in schema.field_names() {
                if !out.contains_key(name) {
                    out.insert(name.to_string(), Value::Null);
                }
            }
            canonical.push(out);
        }

        let unique = fine_dedupe(canonical);

        let standardized_fields: Vec<&String> =
            unique.first().map(|r| r.keys().collect()).unwrap_or_default();

        tracing::info!(
            original = original_count,
            processed = unique.len(),
            dropped,
            "processing complete"
        );

        Ok(json!({
            "processed_data": unique,
            "original_count": original_count,
            "processed_count": unique.len(),
            "records_dropped": dropped,
            "standardized_fields": standardized_fields,
        }))
    }
}
