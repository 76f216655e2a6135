//! Oracle trait and request types.

use serde_json::Value;

use crate::error::Result;
use crate::pipeline::ExecutionPlan;
use crate::record::Record;

/// Configuration shared by oracle implementations.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Model to use (e.g., "gpt-4o").
    pub model: String,

    /// Maximum tokens in a response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Largest record sample sent for cleaning in one round trip.
    pub sample_limit: usize,

    /// Largest record sample sent for review in one round trip.
    pub review_limit: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            sample_limit: 50,
            review_limit: 20,
        }
    }
}

/// A request to clean and standardize a record sample.
pub struct CleanRequest<'a> {
    /// The interpreted query the dataset answers.
    pub query: &'a str,
    /// Plan instructions for the processing stage.
    pub instructions: &'a str,
    /// Desired canonical field names.
    pub field_names: &'a [String],
    /// The bounded record sample to clean.
    pub sample: &'a [Record],
    /// Size of the full batch the sample was drawn from.
    pub total: usize,
}

/// A request to review a processed dataset sample.
pub struct ReviewRequest<'a> {
    /// The interpreted query the dataset answers.
    pub query: &'a str,
    /// Plan instructions for the validation stage.
    pub instructions: &'a str,
    /// The bounded record sample to review.
    pub sample: &'a [Record],
    /// Size of the full dataset the sample was drawn from.
    pub total: usize,
}

/// The external text-generation service.
///
/// Calls are blocking, synchronous round trips. Implementations must be
/// thread-safe (Send + Sync) so one oracle can back every stage.
pub trait Oracle: Send + Sync {
    /// Produce an execution plan for a query.
    ///
    /// `available_stages` names the handlers registered with the
    /// executor, so the oracle only orders stages that exist. Any error
    /// here is fatal to the run; the executor converts it to a planning
    /// failure before any stage executes.
    fn plan(&self, query: &str, available_stages: &[String]) -> Result<ExecutionPlan>;

    /// Clean and standardize a record sample.
    ///
    /// The returned payload may take any of the accepted stage-output
    /// shapes; the caller decodes it tolerantly and treats failure as
    /// an empty cleaned sample.
    fn clean_records(&self, request: &CleanRequest<'_>) -> Result<Value>;

    /// Review a dataset sample for quality issues and fixes.
    ///
    /// The caller treats an unrecognized response as a neutral report.
    fn review_records(&self, request: &ReviewRequest<'_>) -> Result<Value>;

    /// The configuration for this oracle.
    fn config(&self) -> &OracleConfig;

    /// The name of this oracle (for logging).
    fn name(&self) -> &str;
}
