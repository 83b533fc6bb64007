//! REPLACE operation - selection-based or stream-based batched replace.

use tracing::debug;
use vellum_core::{ConditionSet, Datum};
use vellum_table::{DatumStream, Projection, SingleSelection, Table, WriteFunction};

use crate::env::WriteEnv;
use crate::error::WriteResult;
use crate::gate::{admit, KeyPlan};
use crate::options::ReplaceOptions;
use crate::stats::{attach_warnings, merge_stats, new_stats_object};

/// The target of a replace: one identified row, or a row set given by a
/// table plus the stream of its pre-transform rows.
pub enum ReplaceTarget<'a> {
    Row(&'a mut dyn SingleSelection),
    Rows {
        table: &'a mut dyn Table,
        rows: &'a mut dyn DatumStream,
    },
}

/// Execute a replace/update. The determinism gate runs first and decides
/// the whole request; per-document transform failures stay inside the
/// per-batch stats.
pub fn execute_replace(
    env: &WriteEnv,
    target: ReplaceTarget<'_>,
    transform: &dyn WriteFunction,
    opts: &ReplaceOptions,
) -> WriteResult<Datum> {
    let plan = admit(transform, opts.non_atomic)?;

    let mut stats = new_stats_object();
    let mut conditions = ConditionSet::new();

    match target {
        ReplaceTarget::Row(selection) => {
            let replace_stats = selection.replace(
                transform,
                opts.non_atomic,
                opts.durability,
                opts.return_changes,
            )?;
            stats = merge_stats(stats, &replace_stats, env.limits(), &mut conditions)?;
        }
        ReplaceTarget::Rows { table, rows } => {
            let pkey = table.primary_key().to_string();
            if plan == KeyPlan::Pushdown {
                // Pulls now yield primary-key values directly; the row's
                // content is re-read by the table, so the potentially
                // expensive transform never runs just to find a key.
                rows.add_projection(Projection::field(&pkey));
            }

            let spec = *env.batch_spec();
            loop {
                if env.interrupted() {
                    debug!("replace interrupted at batch boundary");
                    break;
                }
                let batch = rows.next_batch(&spec)?;
                if batch.is_empty() {
                    break;
                }

                let keys = match plan {
                    KeyPlan::Pushdown => batch.clone(),
                    KeyPlan::FromRow => batch
                        .iter()
                        .map(|row| row.field(&pkey).cloned())
                        .collect::<Result<Vec<_>, _>>()?,
                };

                debug!(rows = batch.len(), plan = ?plan, "replacing batch");
                let batch_stats = table.batched_replace(
                    batch,
                    keys,
                    transform,
                    opts.non_atomic,
                    opts.durability,
                    opts.return_changes,
                )?;
                stats = merge_stats(stats, &batch_stats, env.limits(), &mut conditions)?;
            }
        }
    }

    Ok(attach_warnings(stats, &conditions, None))
}
