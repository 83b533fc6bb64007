//! Replace/update scenarios: the determinism gate, key-extraction
//! pushdown, and end-to-end row-set replaces.

use pretty_assertions::assert_eq;
use vellum_core::{obj, Datum};
use vellum_table::{
    ConflictPolicy, ConstFn, Durability, MapFn, MemTable, Projection, ReturnChanges, Table,
    VecStream,
};
use vellum_tests::{stats_num, RecordingTable};
use vellum_write::{
    OptArgs, ReplaceOptions, ReplaceRequest, ReplaceTarget, WriteEnv, WriteError, WriteRequest,
};

fn seeded_table() -> MemTable {
    let mut table = MemTable::new("id");
    let docs: Vec<Datum> = (1..=3)
        .map(|i| obj! { "id" => i as i64, "n" => 0_i64 })
        .collect();
    let flags = vec![false; docs.len()];
    table
        .batched_insert(
            docs,
            flags,
            ConflictPolicy::Error,
            Durability::Default,
            ReturnChanges::No,
        )
        .unwrap();
    table
}

fn replace_rows(
    env: &WriteEnv,
    table: &mut dyn Table,
    rows: &mut VecStream,
    transform: &dyn vellum_table::WriteFunction,
    optargs: &OptArgs,
) -> Result<Datum, WriteError> {
    WriteRequest::Replace(ReplaceRequest {
        target: ReplaceTarget::Rows { table, rows },
        transform,
        options: ReplaceOptions::parse(optargs)?,
    })
    .evaluate(env)
}

#[test]
fn unproven_transform_without_opt_in_never_touches_the_table() {
    // GIVEN a table stub that records every call
    let env = WriteEnv::new();
    let mut table = RecordingTable::new("id");
    let mut rows = VecStream::new(vec![obj! { "id" => 1_i64 }]);
    let f = MapFn::non_deterministic(|row: &Datum| Ok(row.clone()));

    // WHEN
    let result = replace_rows(&env, &mut table, &mut rows, &f, &OptArgs::new());

    // THEN the request fails up front and zero table calls were made
    assert!(matches!(result, Err(WriteError::NondeterministicFunction)));
    assert!(result.unwrap_err().is_argument_error());
    assert_eq!(table.calls(), 0);
}

#[test]
fn deterministic_transform_pushes_key_extraction_into_the_stream() {
    // GIVEN
    let env = WriteEnv::new();
    let mut table = RecordingTable::new("id");
    let mut rows = VecStream::new(vec![
        obj! { "id" => 1_i64, "big" => "payload" },
        obj! { "id" => 2_i64, "big" => "payload" },
    ]);
    let f = MapFn::deterministic(|row: &Datum| Ok(row.clone()));

    // WHEN
    let stats = replace_rows(&env, &mut table, &mut rows, &f, &OptArgs::new()).unwrap();

    // THEN the stream carries the projection, and the table saw key
    // values in both positions — never the fetched documents
    assert_eq!(rows.projections(), [Projection::field("id")]);
    assert_eq!(table.replace_batches.len(), 1);
    let batch = &table.replace_batches[0];
    assert_eq!(batch.keys, vec![Datum::Num(1.0), Datum::Num(2.0)]);
    assert_eq!(batch.docs, batch.keys);
    assert_eq!(stats_num(&stats, "replaced"), 2.0);
}

#[test]
fn non_deterministic_opt_in_reads_keys_from_pulled_rows() {
    // GIVEN
    let env = WriteEnv::new();
    let mut table = RecordingTable::new("id");
    let mut rows = VecStream::new(vec![
        obj! { "id" => 1_i64, "v" => "a" },
        obj! { "id" => 2_i64, "v" => "b" },
    ]);
    let f = MapFn::non_deterministic(|row: &Datum| Ok(row.clone()));

    // WHEN
    replace_rows(
        &env,
        &mut table,
        &mut rows,
        &f,
        &OptArgs::new().with("non_atomic", true),
    )
    .unwrap();

    // THEN no pushdown happened; documents travel whole, keys alongside
    assert!(rows.projections().is_empty());
    let batch = &table.replace_batches[0];
    assert_eq!(batch.keys, vec![Datum::Num(1.0), Datum::Num(2.0)]);
    assert_eq!(batch.docs[0], obj! { "id" => 1_i64, "v" => "a" });
}

#[test]
fn row_set_update_end_to_end() {
    // GIVEN three stored rows and a transform bumping a field
    let env = WriteEnv::new();
    let mut table = seeded_table();
    let mut rows = VecStream::new(
        (1..=3)
            .map(|i| obj! { "id" => i as i64, "n" => 0_i64 })
            .collect(),
    );
    let bump = MapFn::deterministic(|row: &Datum| Ok(row.merge(&obj! { "n" => 1_i64 })));

    // WHEN
    let stats = replace_rows(&env, &mut table, &mut rows, &bump, &OptArgs::new()).unwrap();

    // THEN
    assert_eq!(stats_num(&stats, "replaced"), 3.0);
    assert_eq!(stats_num(&stats, "errors"), 0.0);
    for i in 1..=3 {
        assert_eq!(
            table.get(&Datum::Num(i as f64)),
            Some(&obj! { "id" => i as i64, "n" => 1_i64 })
        );
    }
}

#[test]
fn replacing_with_null_deletes_rows() {
    // GIVEN
    let env = WriteEnv::new();
    let mut table = seeded_table();
    let mut rows = VecStream::new(
        (1..=3)
            .map(|i| obj! { "id" => i as i64, "n" => 0_i64 })
            .collect(),
    );
    let delete = ConstFn::new(Datum::Null);

    // WHEN
    let stats = replace_rows(&env, &mut table, &mut rows, &delete, &OptArgs::new()).unwrap();

    // THEN
    assert_eq!(stats_num(&stats, "deleted"), 3.0);
    assert!(table.is_empty());
}

#[test]
fn single_selection_replace_with_changes() {
    // GIVEN one stored row selected by key
    let env = WriteEnv::new();
    let mut table = seeded_table();
    let patch = ConstFn::new(obj! { "id" => 2_i64, "n" => 7_i64 });

    // WHEN
    let stats = {
        let mut selection = table.selection(Datum::Num(2.0));
        WriteRequest::Replace(ReplaceRequest {
            target: ReplaceTarget::Row(&mut selection),
            transform: &patch,
            options: ReplaceOptions::parse(&OptArgs::new().with("return_changes", true)).unwrap(),
        })
        .evaluate(&env)
        .unwrap()
    };

    // THEN
    assert_eq!(stats_num(&stats, "replaced"), 1.0);
    let changes = stats.get_field("changes").and_then(Datum::as_array).unwrap();
    assert_eq!(
        changes[0].get_field("new_val"),
        Some(&obj! { "id" => 2_i64, "n" => 7_i64 })
    );
    assert_eq!(
        table.get(&Datum::Num(2.0)),
        Some(&obj! { "id" => 2_i64, "n" => 7_i64 })
    );
}
