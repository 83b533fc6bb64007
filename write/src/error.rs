//! Write error types.

use thiserror::Error;
use vellum_core::DatumError;
use vellum_table::TableError;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Errors that can occur while validating or executing a write request.
///
/// Argument failures are raised before any mutation; per-document mutation
/// failures never appear here, they are absorbed into the `errors` counter
/// of the returned stats. Foreach is the one executor that escalates
/// per-row failures.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Unrecognized `conflict` option value.
    #[error("Conflict option `{0}` unrecognized (options are \"error\", \"replace\" and \"update\").")]
    UnrecognizedConflict(String),

    /// Unrecognized `durability` option value.
    #[error("Durability option `{0}` unrecognized (options are \"hard\" and \"soft\").")]
    UnrecognizedDurability(String),

    /// A `return_changes` string value other than "always".
    #[error("Invalid return_changes value `{0}` (options are `true`, `false`, and `'always'`).")]
    InvalidReturnChanges(String),

    /// The deprecated `return_vals` option is rejected outright.
    #[error("Encountered obsolete option `return_vals`. Use `return_changes` instead.")]
    ObsoleteReturnVals,

    /// A replace transform the compiler could not prove deterministic,
    /// used without the non-atomic opt-in.
    #[error("Could not prove transform deterministic. Maybe you want to use the non_atomic flag?")]
    NondeterministicFunction,

    /// A foreach row function failed, or returned something that is not
    /// one or more write stats objects.
    #[error("foreach expects one or more basic write queries. {source}")]
    Foreach {
        #[source]
        source: DatumError,
    },

    /// Structural failure evaluating a document or option value.
    #[error(transparent)]
    Datum(#[from] DatumError),

    /// Failure propagated from a table call or stream pull.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl WriteError {
    pub(crate) fn foreach(source: DatumError) -> Self {
        Self::Foreach { source }
    }

    /// Whether this is a request-level argument failure raised before any
    /// mutation.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            WriteError::UnrecognizedConflict(_)
                | WriteError::UnrecognizedDurability(_)
                | WriteError::InvalidReturnChanges(_)
                | WriteError::ObsoleteReturnVals
                | WriteError::NondeterministicFunction
        )
    }
}
