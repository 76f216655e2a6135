//! Error types for the Dataforge library.

use thiserror::Error;

/// Main error type for Dataforge operations.
#[derive(Debug, Error)]
pub enum DataforgeError {
    /// The oracle failed to produce a usable execution plan.
    ///
    /// This is the only fatal pipeline error: no stage runs without a plan.
    #[error("Planning failed: {0}")]
    Planning(String),

    /// An oracle response was not valid or recognized JSON.
    ///
    /// Recovered at the stage boundary with a documented neutral default
    /// (empty record list, or a 50-point quality score).
    #[error("Unrecognized oracle response: {0}")]
    OracleFormat(String),

    /// A stage received zero input records from its upstream dependency.
    ///
    /// Non-fatal: the stage reports an explicit empty result carrying an
    /// error marker so downstream stages and the final report can surface it.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Configuration error (missing API key, bad option, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport failure talking to the oracle.
    #[error("Oracle request failed: {0}")]
    Http(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for Dataforge operations.
pub type Result<T> = std::result::Result<T, DataforgeError>;
