//! Table error types.

use thiserror::Error;
use vellum_core::DatumError;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised by table calls and stream pulls.
#[derive(Debug, Error)]
pub enum TableError {
    /// Structural failure evaluating a projection or key.
    #[error(transparent)]
    Datum(#[from] DatumError),

    /// An insert batch whose generated-key flags disagree with its
    /// documents.
    #[error("Batch of {docs} documents with {flags} generated-key flags")]
    FlagArity { docs: usize, flags: usize },

    /// A replace batch whose keys disagree with its documents.
    #[error("Batch of {docs} documents with {keys} keys")]
    KeyArity { docs: usize, keys: usize },
}
