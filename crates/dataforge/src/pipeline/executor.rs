//! The plan executor: obtains a plan and runs stages in its order.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{DataforgeError, Result};
use crate::oracle::Oracle;
use crate::record::Record;
use crate::schema::FieldSpec;

use super::plan::ExecutionPlan;
use super::stage::{Stage, StageInput};
use super::store::ResultStore;

/// Stage names probed, in order, for the final dataset fallback chain.
const DATASET_STAGES: [&str; 3] = ["validation", "processing", "extraction"];

/// Runs registered stages in the order a plan declares.
///
/// Execution is strictly sequential: a stage never starts before the
/// previous handler returns, so later stages may treat all earlier
/// outputs as final and immutable. The executor owns the only mutable
/// result accumulator; stages only ever see it read-only.
pub struct PlanExecutor {
    oracle: Arc<dyn Oracle>,
    stages: IndexMap<String, Box<dyn Stage>>,
    fallback_fields: Vec<FieldSpec>,
}

impl PlanExecutor {
    /// Create an executor with no registered stages.
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            stages: IndexMap::new(),
            fallback_fields: Vec::new(),
        }
    }

    /// Register a stage handler under its own name.
    pub fn register(&mut self, stage: Box<dyn Stage>) {
        self.stages.insert(stage.name().to_string(), stage);
    }

    /// Register a stage handler, builder style.
    pub fn with_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.register(stage);
        self
    }

    /// Fields to fall back on when the plan names none.
    pub fn with_fallback_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fallback_fields = fields;
        self
    }

    /// Names of registered stages.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.keys().map(String::as_str)
    }

    /// Plan and run the pipeline for a query.
    ///
    /// Plan acquisition failure is the one fatal outcome: no stage runs.
    /// After that, a stage name with no registered handler is skipped
    /// with a warning, and a stage error is absorbed into an
    /// error-marker payload so the run always completes its planned
    /// sequence.
    pub fn run(&self, query: &str) -> Result<RunResult> {
        let available: Vec<String> = self.stages.keys().cloned().collect();
        let plan = self
            .oracle
            .plan(query, &available)
            .map_err(|e| DataforgeError::Planning(e.to_string()))?;

        if let Some(ref message) = plan.error {
            return Err(DataforgeError::Planning(message.clone()));
        }

        tracing::info!(
            stages = plan.execution_order.len(),
            fields = plan.required_fields.len(),
            "execution plan acquired"
        );

        let required_fields = if plan.required_fields.is_empty() {
            &self.fallback_fields
        } else {
            &plan.required_fields
        };

        let mut store = ResultStore::new();

        for stage_name in &plan.execution_order {
            let Some(stage) = self.stages.get(stage_name) else {
                tracing::warn!(stage = %stage_name, "no handler registered, skipping");
                continue;
            };

            tracing::info!(stage = %stage_name, "executing stage");

            let input = StageInput {
                query,
                interpreted_query: &plan.interpreted_query,
                required_fields,
                instructions: plan.instructions_for(stage_name),
                previous_results: &store,
            };

            let output = match stage.execute(&input) {
                Ok(output) => output,
                Err(e) => {
                    tracing::error!(stage = %stage_name, error = %e, "stage failed");
                    json!({ "error": e.to_string() })
                }
            };

            store.insert(stage_name.clone(), output);
        }

        Ok(RunResult {
            query: query.to_string(),
            plan,
            store,
        })
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// The original query.
    pub query: String,
    /// The plan the run followed.
    pub plan: ExecutionPlan,
    /// Output of every executed stage.
    pub store: ResultStore,
}

impl RunResult {
    /// The best available dataset: validated records, else processed,
    /// else raw extracted.
    pub fn final_dataset(&self) -> Vec<Record> {
        for stage in DATASET_STAGES {
            let records = self.store.records_from(stage);
            if !records.is_empty() {
                return records;
            }
        }
        Vec::new()
    }

    /// The stored output of a stage, if it executed.
    pub fn stage_output(&self, stage: &str) -> Option<&Value> {
        self.store.get(stage)
    }
}
