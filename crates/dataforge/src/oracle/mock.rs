//! Mock oracle for testing and offline runs.

use serde_json::{Value, json};

use crate::error::{DataforgeError, Result};
use crate::pipeline::ExecutionPlan;
use crate::schema::FieldSpec;

use super::provider::{CleanRequest, Oracle, OracleConfig, ReviewRequest};

/// Deterministic oracle that never leaves the process.
///
/// Defaults: a plan running every available stage in registry order over
/// `name`/`description`/`price`/`url`, cleaning that echoes the sample,
/// and a clean review. Each response can be pinned for a test, and the
/// cleaning/review paths can be forced to fail to exercise degradation.
pub struct MockOracle {
    config: OracleConfig,
    plan: Option<ExecutionPlan>,
    cleaned: Option<Value>,
    review: Option<Value>,
    fail_clean: bool,
    fail_review: bool,
}

impl MockOracle {
    /// Create a mock with default responses.
    pub fn new() -> Self {
        Self {
            config: OracleConfig::default(),
            plan: None,
            cleaned: None,
            review: None,
            fail_clean: false,
            fail_review: false,
        }
    }

    /// Create with custom configuration.
    pub fn with_config(config: OracleConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Pin the plan response.
    pub fn with_plan(mut self, plan: ExecutionPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Pin the cleaning response payload.
    pub fn with_cleaned(mut self, payload: Value) -> Self {
        self.cleaned = Some(payload);
        self
    }

    /// Pin the review response payload.
    pub fn with_review(mut self, payload: Value) -> Self {
        self.review = Some(payload);
        self
    }

    /// Make cleaning requests fail with an unrecognized-format error.
    pub fn with_failing_clean(mut self) -> Self {
        self.fail_clean = true;
        self
    }

    /// Make review requests fail with an unrecognized-format error.
    pub fn with_failing_review(mut self) -> Self {
        self.fail_review = true;
        self
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for MockOracle {
    fn plan(&self, query: &str, available_stages: &[String]) -> Result<ExecutionPlan> {
        if let Some(ref plan) = self.plan {
            return Ok(plan.clone());
        }

        // Canonical stage ordering first, then anything else as
        // registered: sources before cleaning before review.
        const CANONICAL: [&str; 5] = [
            "query_analysis",
            "search",
            "extraction",
            "processing",
            "validation",
        ];
        let mut execution_order: Vec<String> = CANONICAL
            .iter()
            .filter(|name| available_stages.iter().any(|s| s == *name))
            .map(|name| name.to_string())
            .collect();
        for stage in available_stages {
            if !execution_order.contains(stage) {
                execution_order.push(stage.clone());
            }
        }

        Ok(ExecutionPlan {
            interpreted_query: format!("Structured dataset request: {query}"),
            required_fields: ["name", "description", "price", "url"]
                .into_iter()
                .map(FieldSpec::new)
                .collect(),
            execution_order,
            agent_instructions: Default::default(),
            error: None,
        })
    }

    fn clean_records(&self, request: &CleanRequest<'_>) -> Result<Value> {
        if self.fail_clean {
            return Err(DataforgeError::OracleFormat(
                "mock cleaning failure".to_string(),
            ));
        }
        if let Some(ref cleaned) = self.cleaned {
            return Ok(cleaned.clone());
        }

        Ok(json!({
            "processed_data": request.sample,
            "items_processed": request.sample.len(),
        }))
    }

    fn review_records(&self, request: &ReviewRequest<'_>) -> Result<Value> {
        if self.fail_review {
            return Err(DataforgeError::OracleFormat(
                "mock review failure".to_string(),
            ));
        }
        if let Some(ref review) = self.review {
            return Ok(review.clone());
        }

        Ok(json!({
            "quality_score": 85,
            "issues": [],
            "fixes": [],
            "enhancement_suggestions": [],
            "records_reviewed": request.sample.len(),
        }))
    }

    fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
