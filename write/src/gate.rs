//! Determinism gate for replace transforms.

use tracing::debug;
use vellum_table::WriteFunction;

use crate::error::{WriteError, WriteResult};

/// How the replace loop obtains each row's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlan {
    /// Key extraction is pushed into the stream: pulls yield key values
    /// and the engine re-reads each row by key.
    Pushdown,
    /// Keys are read from each pulled document's primary-key field.
    FromRow,
}

/// Decide whether `transform` may run at all, and how row keys are
/// obtained.
///
/// This is a request-level gate: without the non-atomic opt-in, a
/// transform the compiler could not prove deterministic fails the whole
/// request before any document is touched. Key extraction can only be
/// pushed ahead of a deterministic transform — the stream carries the
/// pre-transform rows, and re-evaluating a non-deterministic transform to
/// find a key would change the answer.
pub fn admit(transform: &dyn WriteFunction, non_atomic: bool) -> WriteResult<KeyPlan> {
    if transform.is_deterministic() {
        return Ok(KeyPlan::Pushdown);
    }
    if !non_atomic {
        return Err(WriteError::NondeterministicFunction);
    }
    debug!("non-deterministic transform admitted via non_atomic opt-in");
    Ok(KeyPlan::FromRow)
}
