//! Foreach scenarios: nested writes per row, strict fail-fast semantics.

use std::cell::{Cell, RefCell};

use pretty_assertions::assert_eq;
use vellum_core::{obj, Datum, DatumError};
use vellum_table::{MapFn, MemTable, VecStream};
use vellum_tests::stats_num;
use vellum_write::{
    ForeachRequest, InsertOptions, InsertRequest, WriteEnv, WriteError, WriteRequest, WriteSource,
};

#[test]
fn foreach_aggregates_nested_insert_stats() {
    // GIVEN a target table written once per source row
    let env = WriteEnv::new();
    let target = RefCell::new(MemTable::new("id"));
    let mut rows = VecStream::new(
        (1..=3)
            .map(|i| obj! { "id" => i as i64, "v" => "row" })
            .collect(),
    );
    let write_one = MapFn::non_deterministic(|row: &Datum| {
        let mut table = target.borrow_mut();
        let stats = WriteRequest::Insert(InsertRequest {
            table: &mut *table,
            source: WriteSource::literal(row.clone()),
            options: InsertOptions::default(),
        })
        .evaluate(&WriteEnv::new())
        .unwrap();
        Ok(stats)
    });

    // WHEN
    let stats = WriteRequest::Foreach(ForeachRequest {
        rows: &mut rows,
        func: &write_one,
    })
    .evaluate(&env)
    .unwrap();

    // THEN the per-row stats folded into one total
    assert_eq!(stats_num(&stats, "inserted"), 3.0);
    assert_eq!(target.borrow().len(), 3);
}

#[test]
fn foreach_merges_result_sequences_in_order() {
    // GIVEN a row function returning two write results per row
    let env = WriteEnv::new();
    let mut rows = VecStream::new(vec![obj!(), obj!()]);
    let f = MapFn::deterministic(|_row: &Datum| {
        Ok(Datum::Array(vec![
            obj! { "inserted" => 1_i64 },
            obj! { "deleted" => 1_i64 },
        ]))
    });

    // WHEN
    let stats = WriteRequest::Foreach(ForeachRequest {
        rows: &mut rows,
        func: &f,
    })
    .evaluate(&env)
    .unwrap();

    // THEN
    assert_eq!(stats_num(&stats, "inserted"), 2.0);
    assert_eq!(stats_num(&stats, "deleted"), 2.0);
}

#[test]
fn non_write_result_aborts_the_whole_foreach() {
    // GIVEN four rows where the second yields a bare scalar
    let env = WriteEnv::new();
    let mut rows = VecStream::new((0_i64..4).map(|i| obj! { "i" => i }).collect());
    let calls = Cell::new(0_usize);
    let f = MapFn::deterministic(|row: &Datum| {
        calls.set(calls.get() + 1);
        if row.get_field("i") == Some(&Datum::Num(1.0)) {
            Ok(Datum::Str("not stats".into()))
        } else {
            Ok(obj! { "inserted" => 1_i64 })
        }
    });

    // WHEN
    let result = WriteRequest::Foreach(ForeachRequest {
        rows: &mut rows,
        func: &f,
    })
    .evaluate(&env);

    // THEN the failure is wrapped with the fixed context message, keeps
    // the original classification, and no further rows were processed
    let err = result.unwrap_err();
    let WriteError::Foreach { source } = &err else {
        panic!("expected a foreach wrap, got {err}");
    };
    assert!(matches!(source, DatumError::TypeMismatch { .. }));
    assert!(err
        .to_string()
        .starts_with("foreach expects one or more basic write queries."));
    assert_eq!(calls.get(), 2);
}

#[test]
fn failing_row_function_aborts_with_original_error_attached() {
    // GIVEN
    let env = WriteEnv::new();
    let mut rows = VecStream::new(vec![obj!()]);
    let f = MapFn::deterministic(|row: &Datum| row.field("absent").cloned());

    // WHEN
    let result = WriteRequest::Foreach(ForeachRequest {
        rows: &mut rows,
        func: &f,
    })
    .evaluate(&env);

    // THEN
    let Err(WriteError::Foreach { source }) = result else {
        panic!("expected a foreach wrap");
    };
    assert_eq!(source, DatumError::missing_field("absent"));
}
