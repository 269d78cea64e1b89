//! Error types for the tabular record codec.

use thiserror::Error;

use pagestat_model::ModelError;

use crate::coerce::CoerceError;

/// Errors that can occur while decoding, validating, or structuring rows.
///
/// Every record-level variant aborts the current row only; whether a batch
/// continues past a failed row is the caller's decision.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The row's column set does not satisfy the schema's expected aliases.
    /// Raised only when header validation is requested.
    #[error(
        "columns of {schema} do not match the row: missing [{}], unexpected [{}]",
        missing.join(", "),
        extra.join(", ")
    )]
    SchemaMismatch {
        schema: &'static str,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// A scalar cell violated its coercer's grammar.
    #[error("field '{field}': expected {expected}, received {value:?}")]
    Coercion {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// A repeated-group key matched a family but its key token or payload
    /// could not be split into the expected parts.
    #[error("column '{key}' with value {value:?}: {reason}")]
    Pattern {
        key: String,
        value: String,
        reason: String,
    },

    /// A row contained a non-text cell where text was required.
    #[error("column '{key}' holds a {kind} cell where text was required")]
    NonText { key: String, kind: &'static str },

    /// The input byte stream is not well-formed CSV.
    #[error("failed to parse CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// Schema registration or typed flat-record construction failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CodecError {
    /// Attaches the owning field identifier to a scalar coercion failure.
    pub fn coercion(field: impl Into<String>, error: CoerceError) -> Self {
        Self::Coercion {
            field: field.into(),
            value: error.value,
            expected: error.expected,
        }
    }

    /// Wraps a payload coercion failure that happened inside a
    /// repeated-group column.
    pub fn group_coercion(key: &str, value: &str, error: CoerceError) -> Self {
        Self::Pattern {
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("expected {}, received {:?}", error.expected, error.value),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
