//! Error handling for schema analysis.
//!
//! The analysis core itself is total: classification and accumulation never
//! fail on well-formed BSON. Errors here cover the two places failure is
//! meaningful:
//! - invariant violations in a schema tree handed to a generator (a defect,
//!   surfaced rather than silently repaired)
//! - the CLI input path (reading and decoding a sample file)

use std::{fmt, io};

/// Crate-wide `Result` type using [`ScanError`] as the error.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Top-level error type for schema-scan operations.
#[derive(Debug)]
pub enum ScanError {
    /// A schema-tree invariant was violated.
    Invariant(InvariantError),

    /// Sample input could not be read or decoded.
    Input(InputError),

    /// I/O errors.
    Io(io::Error),

    /// JSON decoding errors.
    Json(serde_json::Error),
}

/// Violations of the aggregate-tree invariants that every generator
/// relies on.
#[derive(Debug)]
pub enum InvariantError {
    /// Branch occurrences do not sum to the node occurrence.
    OccurrenceSumMismatch {
        path: String,
        branch_sum: u64,
        occurrence: u64,
    },

    /// A node claims more occurrences than inspected documents.
    OccurrenceExceedsInspected {
        path: String,
        occurrence: u64,
        documents_inspected: u64,
    },

    /// Boolean branch counts do not sum to the branch occurrence.
    BooleanCountMismatch {
        path: String,
        true_count: u64,
        false_count: u64,
        type_occurrence: u64,
    },

    /// A nested node's inspected count disagrees with its parent's
    /// Object branch.
    ChildInspectedMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },
}

/// Errors decoding a document sample.
#[derive(Debug)]
pub enum InputError {
    /// The sample file did not contain a JSON array.
    NotAnArray,

    /// An array element was not a document.
    NotADocument(usize),

    /// Extended JSON could not be converted to BSON.
    InvalidBson(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Invariant(e) => write!(f, "Schema invariant violated: {e}"),
            ScanError::Input(e) => write!(f, "Invalid sample input: {e}"),
            ScanError::Io(e) => write!(f, "I/O error: {e}"),
            ScanError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::OccurrenceSumMismatch {
                path,
                branch_sum,
                occurrence,
            } => write!(
                f,
                "at '{path}': branch occurrences sum to {branch_sum}, node occurrence is {occurrence}"
            ),
            InvariantError::OccurrenceExceedsInspected {
                path,
                occurrence,
                documents_inspected,
            } => write!(
                f,
                "at '{path}': occurrence {occurrence} exceeds documents inspected {documents_inspected}"
            ),
            InvariantError::BooleanCountMismatch {
                path,
                true_count,
                false_count,
                type_occurrence,
            } => write!(
                f,
                "at '{path}': true {true_count} + false {false_count} != boolean occurrence {type_occurrence}"
            ),
            InvariantError::ChildInspectedMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "at '{path}': child inspected count {actual}, parent object branch has {expected}"
            ),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotAnArray => write!(f, "expected a JSON array of documents"),
            InputError::NotADocument(i) => write!(f, "element {i} is not a document"),
            InputError::InvalidBson(msg) => write!(f, "invalid extended JSON: {msg}"),
        }
    }
}

impl std::error::Error for ScanError {}
impl std::error::Error for InvariantError {}
impl std::error::Error for InputError {}

/* ========================= Conversions to ScanError ========================= */

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> Self {
        ScanError::Io(err)
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Json(err)
    }
}

impl From<InvariantError> for ScanError {
    fn from(err: InvariantError) -> Self {
        ScanError::Invariant(err)
    }
}

impl From<InputError> for ScanError {
    fn from(err: InputError) -> Self {
        ScanError::Input(err)
    }
}
