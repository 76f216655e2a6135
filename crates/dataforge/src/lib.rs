//! Dataforge: oracle-driven pipeline that turns loosely-specified
//! requests into clean, deduplicated, schema-conformant tabular datasets.
//!
//! A text-generation oracle plans the run and cleans sampled records;
//! the pipeline itself guarantees the deterministic part: field
//! reconciliation onto a target schema, value standardization,
//! two-granularity deduplication, template extrapolation past the
//! sampled subset, and quality scoring of the delivered dataset.
//!
//! # Core Principles
//!
//! - **Plan-driven**: one plan per run decides which stages execute, in
//!   what order, with what instructions
//! - **Degrade, don't abort**: only planning failures are fatal; every
//!   stage-level condition surfaces as data
//! - **Deterministic structure**: identical inputs and cache history
//!   always reconcile, deduplicate, and score identically
//!
//! # Example
//!
//! ```no_run
//! use dataforge::{Dataforge, MockOracle};
//!
//! let forge = Dataforge::new(MockOracle::new());
//! let outcome = forge.run("list of open source vector databases").unwrap();
//!
//! println!("Records: {}", outcome.dataset.len());
//! if let Some(quality) = &outcome.quality {
//!     println!("Completeness: {:.1}%", quality.overall_completeness);
//! }
//! ```

pub mod dedupe;
pub mod enhance;
pub mod error;
pub mod extrapolate;
pub mod oracle;
pub mod payload;
pub mod pipeline;
pub mod quality;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod stages;
pub mod standardize;

mod forge;

pub use crate::forge::{Dataforge, ForgeOutcome};
pub use dedupe::{coarse_dedupe, fine_dedupe};
pub use error::{DataforgeError, Result};
pub use extrapolate::extrapolate;
pub use oracle::{MockOracle, OpenAiOracle, Oracle, OracleConfig};
pub use pipeline::{ExecutionPlan, PlanExecutor, ResultStore, RunResult, Stage, StageInput};
pub use quality::{QualityReport, completeness_rate, score};
pub use reconcile::{MappingCache, reconcile_field};
pub use record::{PROVENANCE_FIELDS, Record, fingerprint};
pub use schema::{FieldSpec, Importance, TargetSchema};
pub use standardize::clean_value;
