//! The validation stage: oracle review, enhancement, quality scoring.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::enhance::{apply_fixes, fixes_from_report};
use crate::error::Result;
use crate::oracle::{Oracle, ReviewRequest};
use crate::pipeline::{Stage, StageInput};
use crate::quality::{completeness_rate, score};

use super::{PROCESSING, VALIDATION};

/// Score assumed when the oracle's review carries no usable one.
///
/// One neutral default for every unrecognized-review path: neither
/// punishing nor rewarding a dataset the oracle could not assess.
const NEUTRAL_QUALITY_SCORE: f64 = 50.0;

/// Reviews the processed dataset, applies suggested fixes, and measures
/// the result.
pub struct ValidateStage {
    oracle: Arc<dyn Oracle>,
}

impl ValidateStage {
    /// Create a validation stage backed by an oracle.
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

impl Stage for ValidateStage {
    fn name(&self) -> &str {
        VALIDATION
    }

    fn execute(&self, input: &StageInput<'_>) -> Result<Value> {
        let processed = input.previous_results.records_from(PROCESSING);

        tracing::info!(records = processed.len(), "validating processed data");

        if processed.is_empty() {
            tracing::error!("no processed data to validate");
            return Ok(json!({
                "error": "No processed data to validate",
                "validated_data": [],
            }));
        }

        let query = if input.interpreted_query.is_empty() {
            input.query
        } else {
            input.interpreted_query
        };

        let limit = self.oracle.config().review_limit.min(processed.len());
        let request = ReviewRequest {
            query,
            instructions: input.instructions,
            sample: &processed[..limit],
            total: processed.len(),
        };

        let report = match self.oracle.review_records(&request) {
            Ok(Value::Object(map)) => match map.get("validation_report") {
                Some(inner @ Value::Object(_)) => inner.clone(),
                _ => Value::Object(map),
            },
            Ok(other) => {
                tracing::warn!("review response was not an object: {other}");
                neutral_report()
            }
            Err(e) => {
                tracing::warn!(error = %e, "oracle review failed, using neutral report");
                neutral_report()
            }
        };

        let fixes = fixes_from_report(&report);
        let enhanced = apply_fixes(processed, &fixes);

        let data_quality = match score(&enhanced) {
            Ok(metrics) => serde_json::to_value(metrics)?,
            Err(e) => json!({ "error": e.to_string() }),
        };

        let quality_score = quality_score_from(&report);

        tracing::info!(
            records = enhanced.len(),
            quality_score,
            fixes = fixes.len(),
            "validation complete"
        );

        Ok(json!({
            "validated_data": enhanced,
            "validation_report": report,
            "data_quality": data_quality,
            "completeness_rate": completeness_rate(&enhanced),
            "oracle_quality_score": quality_score,
            "enhancement_suggestions": report
                .get("enhancement_suggestions")
                .cloned()
                .unwrap_or_else(|| json!([])),
        }))
    }
}

fn neutral_report() -> Value {
    json!({
        "error": "Unrecognized review response",
        "quality_score": NEUTRAL_QUALITY_SCORE,
    })
}

/// Read the review's quality score, tolerating numbers, "85"-style
/// strings, and "85%"-style strings. Anything else is neutral.
fn quality_score_from(report: &Value) -> f64 {
    match report.get("quality_score") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(NEUTRAL_QUALITY_SCORE),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse()
            .unwrap_or(NEUTRAL_QUALITY_SCORE),
        _ => NEUTRAL_QUALITY_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockOracle;
    use crate::pipeline::ResultStore;
    use crate::schema::FieldSpec;

    fn run_stage(oracle: MockOracle, processing_payload: Value) -> Value {
        let mut store = ResultStore::new();
        store.insert(PROCESSING, processing_payload);

        let fields: Vec<FieldSpec> = vec![FieldSpec::new("name")];
        let stage = ValidateStage::new(Arc::new(oracle));
        let input = StageInput {
            query: "ai tools",
            interpreted_query: "",
            required_fields: &fields,
            instructions: "",
            previous_results: &store,
        };
        stage.execute(&input).unwrap()
    }

    #[test]
    fn test_empty_processing_reports_error_marker() {
        let output = run_stage(MockOracle::new(), json!({"processed_data": []}));
        assert_eq!(output["error"], json!("No processed data to validate"));
        assert_eq!(output["validated_data"], json!([]));
    }

    #[test]
    fn test_quality_metrics_computed_on_delivered_data() {
        let output = run_stage(
            MockOracle::new(),
            json!({"processed_data": [
                {"name": "A", "price": 10.0},
                {"name": "B", "price": null},
            ]}),
        );

        let quality = &output["data_quality"];
        assert_eq!(quality["total_items"], json!(2));
        assert_eq!(quality["uniqueness"], json!(100.0));
        assert_eq!(output["oracle_quality_score"], json!(85.0));
    }

    #[test]
    fn test_review_failure_yields_neutral_report() {
        let output = run_stage(
            MockOracle::new().with_failing_review(),
            json!({"processed_data": [{"name": "A"}]}),
        );

        assert_eq!(output["oracle_quality_score"], json!(50.0));
        assert!(
            output["validation_report"]["error"]
                .as_str()
                .unwrap()
                .contains("Unrecognized")
        );
        // The data still flows through untouched.
        assert_eq!(output["validated_data"], json!([{"name": "A"}]));
    }

    #[test]
    fn test_fixes_are_applied_before_scoring() {
        let review = json!({
            "quality_score": "90%",
            "fixes": [
                {"field": "notes", "action": "remove"},
                {"field": "launch_date", "action": "standardize", "format": "mm/dd/yyyy"},
            ],
        });
        let output = run_stage(
            MockOracle::new().with_review(review),
            json!({"processed_data": [
                {"name": "A", "notes": "x", "launch_date": "03/14/2024"},
            ]}),
        );

        let data = output["validated_data"].as_array().unwrap();
        assert!(data[0].get("notes").is_none());
        assert_eq!(data[0]["launch_date"], json!("2024-03-14"));
        assert_eq!(output["oracle_quality_score"], json!(90.0));

        // Metrics reflect the enhanced records, not the input.
        let fields = output["data_quality"]["field_completeness"]
            .as_object()
            .unwrap();
        assert!(!fields.contains_key("notes"));
    }

    #[test]
    fn test_nested_validation_report_is_unwrapped() {
        let review = json!({
            "validation_report": {"quality_score": 72, "fixes": []},
            "other": "ignored",
        });
        let output = run_stage(
            MockOracle::new().with_review(review),
            json!({"processed_data": [{"name": "A"}]}),
        );
        assert_eq!(output["oracle_quality_score"], json!(72.0));
    }

    #[test]
    fn test_quality_score_parsing() {
        assert_eq!(quality_score_from(&json!({"quality_score": 80})), 80.0);
        assert_eq!(quality_score_from(&json!({"quality_score": "75%"})), 75.0);
        assert_eq!(quality_score_from(&json!({"quality_score": "oops"})), 50.0);
        assert_eq!(quality_score_from(&json!({})), 50.0);
    }
}
