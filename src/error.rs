//! Error types for the inference, comparison, and column resolution engine.
//!
//! Command handlers wrap these in `anyhow` with file and row context; the
//! engine itself only ever returns them.

use thiserror::Error;

use crate::{compare::Operator, inference::InferredType};

#[derive(Debug, Error)]
pub enum Error {
    /// A column reference token that is not `N`, `A-B`, `-B`, `A-` or `-`.
    #[error("Invalid column reference '{token}': {reason}")]
    ColumnSyntax { token: String, reason: String },

    /// A column reference that points outside the header.
    #[error(
        "Column {index} in '{token}' is out of bounds; columns must be between 1 and {len}"
    )]
    ColumnOutOfBounds {
        token: String,
        index: usize,
        len: usize,
    },

    #[error("Unknown operator '{0}'; expected one of eq, ne, gt, gte, lt, lte, re")]
    UnknownOperator(String),

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    /// An operator that has no meaning for the comparison type, e.g. `gt` on booleans.
    #[error("Operator '{op}' is not allowed for {ty} values")]
    IllegalOperator { op: Operator, ty: InferredType },

    #[error("Failed to parse '{value}' as {expected}")]
    Parse {
        value: String,
        expected: InferredType,
    },

    /// A field that does not fit the type its comparison requires.
    #[error(
        "Evaluating row {row} column {column}: could not compare {found} '{value}' to {expected} '{reference}'"
    )]
    TypeMismatch {
        row: usize,
        column: usize,
        value: String,
        found: InferredType,
        expected: InferredType,
        reference: String,
    },

    #[error("Invalid time layout '{0}'")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
