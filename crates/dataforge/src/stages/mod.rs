//! The core stage handlers.

mod process;
mod validate;

pub use process::ProcessStage;
pub use validate::ValidateStage;

/// Stage name the processing handler registers under.
pub const PROCESSING: &str = "processing";

/// Stage name the validation handler registers under.
pub const VALIDATION: &str = "validation";

/// Stage name both handlers read raw records from.
pub const EXTRACTION: &str = "extraction";

/// Stage name whose field analysis overrides the plan's fields.
pub const QUERY_ANALYSIS: &str = "query_analysis";
