//! The table mutation contract.

use vellum_core::Datum;

use crate::error::TableResult;
use crate::func::WriteFunction;
use crate::options::{ConflictPolicy, Durability, ReturnChanges};

/// A table accepting batched document mutations.
///
/// One call is the atomic unit from the write engine's perspective;
/// whatever sharding, replication or syncing happens behind it belongs to
/// the engine. Every call returns a stats object whose per-document
/// failures live in the `errors` counter, never in the `Err` channel.
pub trait Table {
    /// Name of the field holding a document's primary key.
    fn primary_key(&self) -> &str;

    /// Insert a batch of documents, resolving key collisions according to
    /// `conflict`. `generated_flags[i]` records whether `docs[i]` carries a
    /// freshly generated key.
    fn batched_insert(
        &mut self,
        docs: Vec<Datum>,
        generated_flags: Vec<bool>,
        conflict: ConflictPolicy,
        durability: Durability,
        return_changes: ReturnChanges,
    ) -> TableResult<Datum>;

    /// Replace the rows at `keys` through `transform`. For a deterministic
    /// transform the engine re-reads each row by key and evaluates the
    /// transform against the stored row (`docs` then carries the key
    /// values themselves); for a non-deterministic one it applies the
    /// transform once to each pulled row in `docs`.
    fn batched_replace(
        &mut self,
        docs: Vec<Datum>,
        keys: Vec<Datum>,
        transform: &dyn WriteFunction,
        non_atomic: bool,
        durability: Durability,
        return_changes: ReturnChanges,
    ) -> TableResult<Datum>;
}

/// One identified row of a table.
pub trait SingleSelection {
    /// Replace this row through `transform`, returning a stats object.
    fn replace(
        &mut self,
        transform: &dyn WriteFunction,
        non_atomic: bool,
        durability: Durability,
        return_changes: ReturnChanges,
    ) -> TableResult<Datum>;
}
