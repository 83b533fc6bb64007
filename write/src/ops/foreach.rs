//! FOREACH operation - per-row side effects aggregated fail-fast.

use vellum_core::{ConditionSet, Datum, DatumError, DatumType};
use vellum_table::{DatumStream, WriteFunction};

use crate::env::WriteEnv;
use crate::error::{WriteError, WriteResult};
use crate::stats::{attach_warnings, merge_stats};

/// Execute a foreach: evaluate `func` once per row, purely for the write
/// stats it returns. Rows are pulled one at a time — the function may
/// perform arbitrarily large nested writes, so there is no useful batch
/// unit here.
///
/// Unlike insert and replace, any per-row failure aborts the whole
/// request: the function's result shape is caller-defined, so a malformed
/// result cannot be safely absorbed into an `errors` counter.
pub fn execute_foreach(
    env: &WriteEnv,
    rows: &mut dyn DatumStream,
    func: &dyn WriteFunction,
) -> WriteResult<Datum> {
    // Accumulation starts from an empty object: the row function's results
    // define which counters appear.
    let mut stats = Datum::empty_object();
    let mut conditions = ConditionSet::new();

    loop {
        if env.interrupted() {
            break;
        }
        let Some(row) = rows.next()? else {
            break;
        };
        let result = func.call(&row).map_err(WriteError::foreach)?;
        stats = merge_row_result(stats, &result, env, &mut conditions)?;
    }

    Ok(attach_warnings(stats, &conditions, None))
}

/// Merge one row's result: a single stats-shaped object, or a sequence of
/// them merged in order. Anything else aborts the whole foreach.
fn merge_row_result(
    stats: Datum,
    result: &Datum,
    env: &WriteEnv,
    conditions: &mut ConditionSet,
) -> WriteResult<Datum> {
    match result {
        Datum::Object(_) => {
            merge_stats(stats, result, env.limits(), conditions).map_err(WriteError::foreach)
        }
        Datum::Array(items) => {
            let mut stats = stats;
            for item in items {
                stats =
                    merge_stats(stats, item, env.limits(), conditions).map_err(WriteError::foreach)?;
            }
            Ok(stats)
        }
        other => Err(WriteError::foreach(DatumError::type_mismatch(
            DatumType::Array,
            other.datum_type(),
        ))),
    }
}
