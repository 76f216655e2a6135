//! The stage capability and its input envelope.

use serde_json::Value;

use crate::error::Result;
use crate::schema::FieldSpec;

use super::store::ResultStore;

/// Input envelope handed to every stage handler.
pub struct StageInput<'a> {
    /// The original user query.
    pub query: &'a str,
    /// The oracle's interpretation of the query.
    pub interpreted_query: &'a str,
    /// Fields the final dataset should carry.
    pub required_fields: &'a [FieldSpec],
    /// Plan instructions addressed to this stage.
    pub instructions: &'a str,
    /// Outputs of every previously executed stage.
    pub previous_results: &'a ResultStore,
}

/// One named unit of pipeline work.
///
/// A stage reads whatever prior outputs it needs from the envelope's
/// store and returns its output payload. Errors a stage cannot absorb
/// itself are converted to an error-marker payload by the executor;
/// they never abort the run.
pub trait Stage {
    /// Name the plan refers to this stage by.
    fn name(&self) -> &str;

    /// Run the stage against the envelope.
    fn execute(&self, input: &StageInput<'_>) -> Result<Value>;
}
