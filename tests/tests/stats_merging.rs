//! Stats merging properties: order independence on counters, change-record
//! concatenation, warning deduplication.

use pretty_assertions::assert_eq;
use vellum_core::{obj, ConditionSet, Datum, Limits};
use vellum_table::{BatchSpec, MemTable, VecStream};
use vellum_tests::{stats_num, warnings, SequentialKeys};
use vellum_write::{
    merge_stats, new_stats_object, InsertOptions, InsertRequest, OptArgs, WriteEnv, WriteRequest,
    WriteSource,
};

const COUNTERS: [&str; 6] = ["inserted", "deleted", "skipped", "replaced", "unchanged", "errors"];

fn sample_stats() -> Vec<Datum> {
    vec![
        obj! { "inserted" => 2_i64, "errors" => 1_i64, "first_error" => "a" },
        obj! { "inserted" => 1_i64, "deleted" => 3_i64, "first_error" => "b" },
        obj! { "skipped" => 4_i64, "unchanged" => 2_i64 },
    ]
}

#[test]
fn merge_is_associative_on_counters() {
    // GIVEN
    let [a, b, c]: [Datum; 3] = sample_stats().try_into().unwrap();
    let limits = Limits::default();
    let mut conditions = ConditionSet::new();

    // WHEN
    let left = merge_stats(
        merge_stats(a.clone(), &b, &limits, &mut conditions).unwrap(),
        &c,
        &limits,
        &mut conditions,
    )
    .unwrap();
    let right = merge_stats(
        a,
        &merge_stats(b, &c, &limits, &mut conditions).unwrap(),
        &limits,
        &mut conditions,
    )
    .unwrap();

    // THEN
    assert_eq!(left, right);
}

#[test]
fn merge_is_commutative_on_counters() {
    // GIVEN
    let [a, b, _]: [Datum; 3] = sample_stats().try_into().unwrap();
    let limits = Limits::default();
    let mut conditions = ConditionSet::new();

    // WHEN
    let ab = merge_stats(a.clone(), &b, &limits, &mut conditions).unwrap();
    let ba = merge_stats(b, &a, &limits, &mut conditions).unwrap();

    // THEN the six counters agree either way (string fields such as
    // first_error are order-sensitive by design)
    for key in COUNTERS {
        let l = ab.get_field(key).and_then(Datum::as_num).unwrap_or(0.0);
        let r = ba.get_field(key).and_then(Datum::as_num).unwrap_or(0.0);
        assert_eq!(l, r, "{key}");
    }
}

#[test]
fn zeroed_stats_object_is_a_merge_identity() {
    // GIVEN
    let stats = obj! { "inserted" => 5_i64, "errors" => 2_i64 };
    let limits = Limits::default();
    let mut conditions = ConditionSet::new();

    // WHEN
    let merged = merge_stats(new_stats_object(), &stats, &limits, &mut conditions).unwrap();

    // THEN every named counter survives, the rest stay zero
    assert_eq!(stats_num(&merged, "inserted"), 5.0);
    assert_eq!(stats_num(&merged, "errors"), 2.0);
    assert_eq!(stats_num(&merged, "deleted"), 0.0);
}

#[test]
fn change_records_concatenate_and_truncate_with_one_warning() {
    // GIVEN four single-document batches recording changes, with room for
    // only two change records
    let env = WriteEnv::new()
        .with_limits(Limits::default().with_array_size_limit(2))
        .with_batch_spec(BatchSpec::terminal().with_max_rows(1))
        .with_key_source(SequentialKeys::new());
    let mut table = MemTable::new("id");
    let mut rows = VecStream::new((1..=4).map(|i| obj! { "id" => i as i64 }).collect());

    // WHEN
    let stats = WriteRequest::Insert(InsertRequest {
        table: &mut table,
        source: WriteSource::stream(&mut rows),
        options: InsertOptions::parse(&OptArgs::new().with("return_changes", true)).unwrap(),
    })
    .evaluate(&env)
    .unwrap();

    // THEN all four documents landed, the change log is truncated, and
    // the repeated truncation condition collapsed into one warning
    assert_eq!(stats_num(&stats, "inserted"), 4.0);
    assert_eq!(
        stats.get_field("changes").and_then(Datum::as_array).unwrap().len(),
        2
    );
    assert_eq!(
        warnings(&stats),
        vec!["Too many changes, array truncated to 2.".to_string()]
    );
}
