//! Typed errors for the harvesting pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Each stage of the pipeline
//! has its own error enum; `HarvestError` is the top-level type a run
//! surfaces to callers.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for one family's extract/persist run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Network fetch never succeeded within the attempt budget
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Raw payload could not be decoded into normalized records
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    /// Merged dataset does not satisfy the required schema
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),

    /// Artifact write or read-back verification failed
    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),
}

/// Errors from the retrying fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No successful response within the attempt budget
    #[error("could not get results from {url} after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },
}

/// Errors decoding a raw payload into normalized records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Two raw columns normalize to the same name
    #[error("columns {first:?} and {second:?} both normalize to {normalized:?}")]
    ColumnCollision {
        first: String,
        second: String,
        normalized: String,
    },

    /// A required column is absent after normalization
    #[error("missing required column {column:?}")]
    MissingColumn { column: String },

    /// A column survives normalization that the schema does not know
    #[error("unexpected column {column:?}")]
    UnexpectedColumn { column: String },

    /// JSON body could not be decoded
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV body could not be decoded
    #[error("CSV decode error: {0}")]
    Csv(#[from] csv::Error),

    /// A last-modified timestamp could not be interpreted
    #[error("cannot interpret timestamp {raw:?}")]
    Timestamp { raw: String },

    /// A cell did not have the type the schema requires
    #[error("column {column:?}: expected {expected}, got {raw:?}")]
    Field {
        column: String,
        expected: &'static str,
        raw: String,
    },
}

/// Residual dynamic checks on a merged dataset.
///
/// Column presence and field types are enforced statically by
/// [`crate::dataset::Record`]; these are the invariants that can still be
/// violated at runtime.
#[derive(Debug, Error)]
pub enum SchemaViolation {
    /// A record carries an empty naive timestamp
    #[error("record {index}: naive_timestamp is empty")]
    EmptyTimestamp { index: usize },

    /// A record carries a NaN or infinite measurement
    #[error("record {index}: value {value} is not finite")]
    NonFiniteValue { index: usize, value: f64 },
}

/// Errors writing or verifying the output artifact.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset could not be serialized or the artifact deserialized
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Artifact was written but does not read back equal to the input
    #[error("read-back of {path} does not match the dataset that was written")]
    VerificationFailed { path: PathBuf },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for parse operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for persistence operations.
pub type PersistResult<T> = std::result::Result<T, PersistError>;
