//! Structural merge primitives.
//!
//! Two merge flavors exist:
//! - [`Datum::merge`]: right-preferential deep merge, used when an insert
//!   conflict resolves by updating the stored document.
//! - [`Datum::merge_with`]: top-level key union under a named strategy,
//!   accumulating warning conditions. Write statistics combine this way.

use std::collections::btree_map::Entry;
use std::collections::BTreeSet;

use crate::datum::Datum;
use crate::error::{DatumError, DatumResult};
use crate::limits::Limits;

/// Distinct warning messages accumulated while merging. Duplicates collapse
/// before rendering.
pub type ConditionSet = BTreeSet<String>;

/// How colliding top-level keys resolve during [`Datum::merge_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Statistics combination: numbers sum, arrays concatenate in call
    /// order (bounded by the array size limit), strings keep the left
    /// value. Anything else is a malformed stats object.
    Stats,
    /// The keys are known disjoint. A collision is a programming defect
    /// and aborts.
    Disjoint,
}

impl Datum {
    /// Right-preferential deep merge: objects merge field-wise, everything
    /// else takes the right-hand value.
    pub fn merge(&self, rhs: &Datum) -> Datum {
        match (self, rhs) {
            (Datum::Object(left), Datum::Object(right)) => {
                let mut out = left.clone();
                for (key, rv) in right {
                    let merged = match out.get(key) {
                        Some(lv) => lv.merge(rv),
                        None => rv.clone(),
                    };
                    out.insert(key.clone(), merged);
                }
                Datum::Object(out)
            }
            _ => rhs.clone(),
        }
    }

    /// Union the top-level keys of two objects, resolving collisions with
    /// `strategy`. Warning conditions land in `conditions`.
    pub fn merge_with(
        &self,
        rhs: &Datum,
        strategy: MergeStrategy,
        limits: &Limits,
        conditions: &mut ConditionSet,
    ) -> DatumResult<Datum> {
        let left = self.try_as_object()?;
        let right = rhs.try_as_object()?;

        let mut out = left.clone();
        for (key, rv) in right {
            match out.entry(key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(rv.clone());
                }
                Entry::Occupied(mut slot) => {
                    let merged = match strategy {
                        MergeStrategy::Disjoint => disjoint_conflict(key),
                        MergeStrategy::Stats => {
                            merge_stats_field(key, slot.get(), rv, limits, conditions)?
                        }
                    };
                    slot.insert(merged);
                }
            }
        }
        Ok(Datum::Object(out))
    }
}

fn merge_stats_field(
    key: &str,
    left: &Datum,
    right: &Datum,
    limits: &Limits,
    conditions: &mut ConditionSet,
) -> DatumResult<Datum> {
    match (left, right) {
        (Datum::Num(l), Datum::Num(r)) => Ok(Datum::Num(l + r)),
        (Datum::Array(l), Datum::Array(r)) => {
            let limit = limits.array_size_limit();
            if l.len() + r.len() > limit {
                conditions.insert(format!("Too many changes, array truncated to {limit}."));
            }
            let mut out: Vec<Datum> = Vec::with_capacity((l.len() + r.len()).min(limit));
            out.extend(l.iter().take(limit).cloned());
            out.extend(r.iter().take(limit - out.len()).cloned());
            Ok(Datum::Array(out))
        }
        // First-error style strings keep the earliest value.
        (Datum::Str(_), Datum::Str(_)) => Ok(left.clone()),
        _ => Err(DatumError::stats_merge_mismatch(
            key,
            left.datum_type(),
            right.datum_type(),
        )),
    }
}

/// Collision handler for the strategy that must never observe one.
fn disjoint_conflict(key: &str) -> ! {
    unreachable!("disjoint merge resolved a conflicting key `{key}`")
}
