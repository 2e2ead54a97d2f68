use super::*;
use crate::schema::{FieldSpec, Schema, SchemaError};
use crate::storage::{AttributeValue, MemoryBackend, StorageBackend, StorageError};
use proptest::prelude::*;

fn counter_schema() -> Schema {
    Schema::new(vec![FieldSpec::u32("n"), FieldSpec::f64("x")]).unwrap()
}

fn write_sequence(values: &[u32], capacity: usize) -> (MemoryBackend, RecordTable) {
    let mut backend = MemoryBackend::new();
    let mut table =
        RecordTable::new("t", "Test", counter_schema(), TableConfig::with_capacity(capacity)).unwrap();
    let n = table.bind::<u32>("n").unwrap();
    let x = table.bind::<f64>("x").unwrap();

    for &v in values {
        table.set(n, v);
        table.set(x, f64::from(v) * 0.5);
        table.write(&mut backend).unwrap();
    }
    table.flush(&mut backend).unwrap();
    (backend, table)
}

#[test]
fn test_nrows_counts_writes() {
    let mut backend = MemoryBackend::new();
    let mut table = RecordTable::new("t", "Test", counter_schema(), TableConfig::default()).unwrap();

    for k in 1..=7 {
        table.write(&mut backend).unwrap();
        assert_eq!(table.nrows(), k);
    }
    // capacity 100: nothing reached the backend yet
    assert!(backend.table("t").is_none());
    assert_eq!(table.in_buffer(), 7);
}

#[test]
fn test_flush_on_full_buffer() {
    let mut backend = MemoryBackend::new();
    let mut table =
        RecordTable::new("t", "Test", counter_schema(), TableConfig::with_capacity(3)).unwrap();

    for _ in 0..3 {
        table.write(&mut backend).unwrap();
    }
    assert!(table.exists());
    assert_eq!(table.in_buffer(), 0);
    assert_eq!(backend.rows("t"), 3);

    for _ in 0..4 {
        table.write(&mut backend).unwrap();
    }
    assert_eq!(backend.rows("t"), 6);
    assert_eq!(backend.table("t").unwrap().appends, 1);
    assert_eq!(table.nrows(), 7);
}

#[test]
fn test_flush_is_idempotent() {
    let (mut backend, mut table) = write_sequence(&[1, 2, 3], 10);
    let before = backend.clone();
    let rows = table.nrows();

    table.flush(&mut backend).unwrap();
    assert!(backend.same_contents(&before));
    assert_eq!(backend.table("t").unwrap().appends, 0);
    assert_eq!(table.nrows(), rows);
}

#[test]
fn test_lazy_create_skips_empty_tables() {
    let mut backend = MemoryBackend::new();
    let mut table = RecordTable::new("t", "Test", counter_schema(), TableConfig::default()).unwrap();

    table.flush(&mut backend).unwrap();
    assert!(!table.exists());
    assert_eq!(backend.table_names().count(), 0);

    let stats = table.close(&mut backend).unwrap();
    assert_eq!(stats.rows_written, 0);
    assert_eq!(stats.flushes, 0);
}

#[test]
fn test_unbuffered_flushes_every_write() {
    let (backend, table) = write_sequence(&[5, 6, 7], 1);
    assert_eq!(backend.rows("t"), 3);
    assert_eq!(backend.table("t").unwrap().appends, 2);
    assert_eq!(table.stats().flushes, 3);
}

#[test]
fn test_rows_reach_backend_in_order() {
    let (backend, table) = write_sequence(&[10, 20, 30], 2);
    let n = table.bind::<u32>("n").unwrap();
    let x = table.bind::<f64>("x").unwrap();

    let records = backend.table("t").unwrap().records();
    let values: Vec<(u32, f64)> = records.iter().map(|r| (r.get(n), r.get(x))).collect();
    assert_eq!(values, vec![(10, 5.0), (20, 10.0), (30, 15.0)]);
}

#[test]
fn test_bind_errors() {
    let table = RecordTable::new("t", "Test", counter_schema(), TableConfig::default()).unwrap();
    assert!(matches!(
        table.bind::<u32>("missing"),
        Err(TableError::Schema(SchemaError::FieldNotFound(_)))
    ));
    assert!(matches!(
        table.bind::<i32>("n"),
        Err(TableError::Schema(SchemaError::TypeMismatch { .. }))
    ));
}

#[test]
fn test_invalid_construction() {
    let result = RecordTable::new("t", "Test", counter_schema(), TableConfig::with_capacity(0));
    assert!(matches!(result, Err(TableError::InvalidCapacity { capacity: 0, .. })));

    let empty = Schema::new(Vec::new()).unwrap();
    let result = RecordTable::new("t", "Test", empty, TableConfig::default());
    assert!(matches!(result, Err(TableError::EmptySchema(_))));
}

#[test]
fn test_table_attribute_before_first_flush() {
    let mut backend = MemoryBackend::new();
    let table = RecordTable::new("t", "Test", counter_schema(), TableConfig::default()).unwrap();
    table.set_attribute(&mut backend, "units", "GeV").unwrap();

    assert_eq!(
        backend.attributes().get_table("t", "units"),
        Some(&AttributeValue::Text("GeV".to_string()))
    );
    assert!(backend.table("t").is_none());
}

#[test]
fn test_failed_flush_keeps_buffer_bounded() {
    let mut backend = MemoryBackend::new();
    backend.create_table("t", "Taken", &counter_schema(), &[], 0).unwrap();
    let mut table =
        RecordTable::new("t", "Test", counter_schema(), TableConfig::with_capacity(2)).unwrap();

    table.write(&mut backend).unwrap();
    assert!(matches!(
        table.write(&mut backend),
        Err(TableError::Storage(StorageError::TableExists(_)))
    ));
    for _ in 0..5 {
        assert!(table.write(&mut backend).is_err());
    }
    assert_eq!(table.in_buffer(), 2);
    assert_eq!(table.nrows(), 2);
}

proptest! {
    #[test]
    fn prop_capacity_does_not_change_contents(
        values in prop::collection::vec(any::<u32>(), 0..64),
        capacity in 2usize..20,
    ) {
        let (unbuffered, a) = write_sequence(&values, 1);
        let (buffered, b) = write_sequence(&values, capacity);
        prop_assert!(unbuffered.same_contents(&buffered));
        prop_assert_eq!(a.nrows(), values.len());
        prop_assert_eq!(b.nrows(), values.len());
    }
}
