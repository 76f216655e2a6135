//! The execution plan consumed from the oracle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{FieldSpec, TargetSchema};

/// One run's execution plan: the interpreted query, the fields the final
/// dataset should carry, the ordered stage sequence, and per-stage
/// instructions. Unknown wire keys are tolerated and dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// The query restated in a clear, specific way.
    #[serde(default)]
    pub interpreted_query: String,

    /// Fields the final dataset should carry; bare strings or full
    /// descriptors on the wire.
    #[serde(default)]
    pub required_fields: Vec<FieldSpec>,

    /// Stage names in execution order.
    #[serde(default)]
    pub execution_order: Vec<String>,

    /// Per-stage free-text instructions.
    #[serde(default)]
    pub agent_instructions: IndexMap<String, String>,

    /// Error marker: a plan carrying this aborts the run before any
    /// stage executes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionPlan {
    /// Build the target schema from the plan's required fields.
    pub fn target_schema(&self) -> TargetSchema {
        TargetSchema::from_fields(self.required_fields.clone())
    }

    /// Instructions for a stage, empty if the plan has none.
    pub fn instructions_for(&self, stage: &str) -> &str {
        self.agent_instructions
            .get(stage)
            .map(String::as_str)
            .unwrap_or("")
    }
}
