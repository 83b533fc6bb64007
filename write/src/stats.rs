//! Write statistics objects.
//!
//! A stats object is a plain object datum, so results from any number of
//! batches (or, for foreach, any caller-supplied write results) combine
//! through one merge path. The six counters are associative and
//! commutative under merging: the batch sizes a request happens to use
//! never change the final totals.

use std::collections::BTreeSet;

use vellum_core::{ConditionSet, Datum, DatumResult, Limits, MergeStrategy};

/// Counter keys present in every fresh stats object.
pub(crate) const COUNTER_KEYS: [&str; 6] = [
    "inserted",
    "deleted",
    "skipped",
    "replaced",
    "unchanged",
    "errors",
];

/// A stats object with the six counters zeroed.
pub fn new_stats_object() -> Datum {
    Datum::Object(
        COUNTER_KEYS
            .iter()
            .map(|key| (key.to_string(), Datum::Num(0.0)))
            .collect(),
    )
}

/// Merge one batch's stats into the running total.
pub fn merge_stats(
    total: Datum,
    batch: &Datum,
    limits: &Limits,
    conditions: &mut ConditionSet,
) -> DatumResult<Datum> {
    total.merge_with(batch, MergeStrategy::Stats, limits, conditions)
}

/// Render accumulated warning conditions into the stats object's
/// `warnings` array, unioned with any warnings already present in the
/// stats and with `extra` (the one aggregated truncation warning, when
/// keys were skipped). Duplicates collapse.
pub(crate) fn attach_warnings(
    stats: Datum,
    conditions: &ConditionSet,
    extra: Option<String>,
) -> Datum {
    let mut fields = match stats {
        Datum::Object(fields) => fields,
        other => return other,
    };

    let mut warnings: BTreeSet<String> = conditions.clone();
    if let Some(Datum::Array(existing)) = fields.get("warnings") {
        for warning in existing {
            if let Datum::Str(message) = warning {
                warnings.insert(message.clone());
            }
        }
    }
    if let Some(message) = extra {
        warnings.insert(message);
    }

    if !warnings.is_empty() {
        fields.insert(
            "warnings".to_string(),
            Datum::Array(warnings.into_iter().map(Datum::Str).collect()),
        );
    }
    Datum::Object(fields)
}
