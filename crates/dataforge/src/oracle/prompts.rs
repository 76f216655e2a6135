//! Prompt templates for oracle interactions.

use super::provider::{CleanRequest, ReviewRequest};

/// System prompt for all Dataforge oracle interactions.
pub fn system_prompt() -> &'static str {
    r#"You are the reasoning engine of Dataforge, a pipeline that turns
loosely-specified requests into clean tabular datasets.

Your roles are to:
1. Interpret vague queries and plan the pipeline stages to run
2. Clean, standardize, and deduplicate extracted records
3. Review datasets for consistency, completeness, and anomalies

Guidelines:
- Be concrete and consistent; identical inputs deserve identical answers
- Use canonical snake_case field names
- Use null for values you cannot determine; never invent data
- Always respond with valid JSON when requested"#
}

/// Build the planning prompt for a query.
///
/// `stage_names` lists the handlers registered with the executor so the
/// oracle only orders stages that exist.
pub fn planning_prompt(query: &str, stage_names: &[String]) -> String {
    let stage_list = if stage_names.is_empty() {
        "  (none registered)".to_string()
    } else {
        stage_names
            .iter()
            .map(|s| format!("  - {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Create an execution plan for this dataset request.

## Query
{query}

## Available stages
{stage_list}

## Task
Interpret the query, decide which fields the final dataset needs, and
order the stages. Give each stage specific instructions.

Respond with a JSON object:
{{
  "interpreted_query": "The query interpreted in a clear, specific way",
  "required_fields": [
    {{"name": "field", "description": "what it holds", "importance": "high|medium|low"}}
  ],
  "execution_order": ["stage1", "stage2"],
  "agent_instructions": {{"stage1": "instructions", "stage2": "instructions"}}
}}"#
    )
}

/// Build the record-cleaning prompt for a processing request.
pub fn cleaning_prompt(request: &CleanRequest<'_>) -> String {
    let sample_json =
        serde_json::to_string_pretty(request.sample).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Clean, standardize, and enrich this extracted data.

## Query
{}

## Instructions
{}

## Desired fields
{}

## Data ({} of {} records shown)
{}

## Task
Standardize field names and formats, remove duplicates, and fill in
missing values where they can be inferred from other entries.

Return the cleaned records as a JSON array of objects with consistent
field names. You may wrap the array in an object under a "processed_data"
key together with a short processing summary."#,
        request.query,
        request.instructions,
        request.field_names.join(", "),
        request.sample.len(),
        request.total,
        sample_json
    )
}

/// Build the dataset-review prompt for a validation request.
pub fn review_prompt(request: &ReviewRequest<'_>) -> String {
    let sample_json =
        serde_json::to_string_pretty(request.sample).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Review this dataset for quality.

## Query
{}

## Instructions
{}

## Sample ({} of {} records shown)
{}

## Task
Check consistency, completeness, outliers, and logical coherence.

Respond with a JSON object:
{{
  "quality_score": 0-100,
  "issues": ["issue descriptions"],
  "fixes": [
    {{"field": "field", "action": "remove"}},
    {{"field": "field", "action": "standardize", "format": "date|url|yyyy-mm-dd|mm/dd/yyyy"}}
  ],
  "enhancement_suggestions": ["suggestions"]
}}"#,
        request.query,
        request.instructions,
        request.sample.len(),
        request.total,
        sample_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use serde_json::json;

    #[test]
    fn test_planning_prompt_lists_stages() {
        let prompt = planning_prompt(
            "ai coding tools",
            &["processing".to_string(), "validation".to_string()],
        );
        assert!(prompt.contains("ai coding tools"));
        assert!(prompt.contains("- processing"));
        assert!(prompt.contains("- validation"));
        assert!(prompt.contains("execution_order"));
    }

    #[test]
    fn test_cleaning_prompt_includes_sample_and_fields() {
        let sample: Vec<Record> = vec![
            [("name".to_string(), json!("Claude"))]
                .into_iter()
                .collect(),
        ];
        let fields = vec!["name".to_string(), "price".to_string()];
        let request = CleanRequest {
            query: "ai tools",
            instructions: "normalize prices",
            field_names: &fields,
            sample: &sample,
            total: 120,
        };

        let prompt = cleaning_prompt(&request);
        assert!(prompt.contains("Claude"));
        assert!(prompt.contains("name, price"));
        assert!(prompt.contains("1 of 120"));
    }

    #[test]
    fn test_review_prompt_mentions_quality_score() {
        let sample: Vec<Record> = Vec::new();
        let request = ReviewRequest {
            query: "ai tools",
            instructions: "",
            sample: &sample,
            total: 0,
        };
        assert!(review_prompt(&request).contains("quality_score"));
    }
}
