//! Main Dataforge struct and public API.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::oracle::Oracle;
use crate::pipeline::{PlanExecutor, RunResult, Stage};
use crate::quality::{QualityReport, score};
use crate::record::Record;
use crate::schema::FieldSpec;
use crate::stages::{ProcessStage, ValidateStage};

/// The pipeline facade: wires an oracle to the core stages and runs
/// queries end to end.
pub struct Dataforge {
    executor: PlanExecutor,
}

impl Dataforge {
    /// Create a pipeline with the core processing and validation stages
    /// registered.
    pub fn new(oracle: impl Oracle + 'static) -> Self {
        Self::from_arc(Arc::new(oracle))
    }

    /// Create from a shared oracle handle.
    pub fn from_arc(oracle: Arc<dyn Oracle>) -> Self {
        let executor = PlanExecutor::new(oracle.clone())
            .with_stage(Box::new(ProcessStage::new(oracle.clone())))
            .with_stage(Box::new(ValidateStage::new(oracle)));
        Self { executor }
    }

    /// Register an additional stage handler (e.g. an extraction
    /// collaborator).
    pub fn with_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.executor = self.executor.with_stage(stage);
        self
    }

    /// Fields to fall back on when the plan names none.
    pub fn with_fallback_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.executor = self.executor.with_fallback_fields(fields);
        self
    }

    /// Run the full pipeline for a query.
    ///
    /// Only planning failures return `Err`; every stage-level condition
    /// surfaces inside the outcome as data.
    pub fn run(&self, query: &str) -> Result<ForgeOutcome> {
        tracing::info!(query, "starting pipeline run");

        let run = self.executor.run(query)?;
        let dataset = run.final_dataset();
        let quality = score(&dataset).ok();

        let error = if dataset.is_empty() {
            Some("No data collected. Check stage results for details.".to_string())
        } else {
            None
        };

        tracing::info!(records = dataset.len(), "pipeline run finished");

        Ok(ForgeOutcome {
            query: query.to_string(),
            dataset,
            quality,
            error,
            run,
        })
    }
}

/// Everything a pipeline run delivers.
#[derive(Debug, Clone, Serialize)]
pub struct ForgeOutcome {
    /// The original query.
    pub query: String,
    /// The best available dataset (validated, else processed, else raw).
    pub dataset: Vec<Record>,
    /// Quality metrics over the delivered dataset; absent when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
    /// Error marker when no data was collected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The underlying run: plan and per-stage outputs.
    pub run: RunResult,
}

impl ForgeOutcome {
    /// Whether the run delivered any records.
    pub fn success(&self) -> bool {
        !self.dataset.is_empty()
    }
}
