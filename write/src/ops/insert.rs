//! INSERT operation - batched insertion with key generation.

use std::collections::BTreeMap;

use tracing::debug;
use vellum_core::{ConditionSet, Datum, DatumError, DatumType, MergeStrategy};
use vellum_table::Table;

use crate::env::WriteEnv;
use crate::error::WriteResult;
use crate::keygen::KeyGenerator;
use crate::options::InsertOptions;
use crate::source::WriteSource;
use crate::stats::{attach_warnings, merge_stats, new_stats_object};

/// Execute an insert: pull bounded batches from `source`, give each
/// document a primary key if it lacks one, and issue one table call per
/// batch, folding every batch's stats into one total.
pub fn execute_insert(
    env: &WriteEnv,
    table: &mut dyn Table,
    mut source: WriteSource<'_>,
    opts: &InsertOptions,
) -> WriteResult<Datum> {
    // A literal that is not an object can never be inserted; everything
    // else about a literal goes through the same loop as a stream.
    if let Some(doc) = source.literal_doc() {
        if !doc.is_object() {
            return Err(DatumError::type_mismatch(DatumType::Object, doc.datum_type()).into());
        }
    }

    let mut stats = new_stats_object();
    let mut conditions = ConditionSet::new();
    let mut keygen = KeyGenerator::new(table.primary_key());
    let spec = *env.batch_spec();

    loop {
        if env.interrupted() {
            debug!("insert interrupted at batch boundary");
            break;
        }
        let batch = source.next_batch(&spec)?;
        if batch.is_empty() {
            break;
        }

        let mut docs = Vec::with_capacity(batch.len());
        let mut generated_flags = Vec::with_capacity(batch.len());
        for doc in batch {
            // A failed generation attempt is dropped on purpose: the table
            // reports the same failure in this document's error
            // accounting, and reporting it twice would be misleading.
            let (doc, generated) = match keygen.maybe_generate_key(env, &doc) {
                Ok(pair) => pair,
                Err(_) => (doc, false),
            };
            docs.push(doc);
            generated_flags.push(generated);
        }

        debug!(rows = docs.len(), "inserting batch");
        let batch_stats = table.batched_insert(
            docs,
            generated_flags,
            opts.conflict,
            opts.durability,
            opts.return_changes,
        )?;
        stats = merge_stats(stats, &batch_stats, env.limits(), &mut conditions)?;
    }

    let (generated_keys, keys_skipped) = keygen.into_parts();
    let generated = generated_keys.len();

    if generated > 0 {
        let fold = Datum::Object(BTreeMap::from([(
            "generated_keys".to_string(),
            Datum::Array(generated_keys.into_iter().map(Datum::Str).collect()),
        )]));
        // Key-list folding is a non-conflicting append; the disjoint
        // strategy asserts as much and never warns.
        let mut fold_conditions = ConditionSet::new();
        stats = stats.merge_with(&fold, MergeStrategy::Disjoint, env.limits(), &mut fold_conditions)?;
        debug_assert!(fold_conditions.is_empty());
    }

    let mut truncation = None;
    if keys_skipped > 0 {
        let skipped = Datum::Object(BTreeMap::from([(
            "skipped".to_string(),
            Datum::Num(keys_skipped as f64),
        )]));
        stats = merge_stats(stats, &skipped, env.limits(), &mut conditions)?;
        truncation = Some(format!(
            "Too many generated keys ({}), array truncated to {generated}.",
            keys_skipped + generated
        ));
    }

    Ok(attach_warnings(stats, &conditions, truncation))
}
