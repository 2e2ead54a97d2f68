use super::*;
use crate::schema::{create_particle_schema, FieldSpec, FixedStr, Record, KEY_TABLE_TITLE};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::sync::Arc;
use tempfile::tempdir;

fn small_schema() -> Schema {
    Schema::new(vec![
        FieldSpec::u32("id"),
        FieldSpec::f64("value"),
        FieldSpec::fixed_str("label", 8),
    ])
    .unwrap()
}

fn rows(schema: &Schema, values: &[(u32, f64, &str)]) -> Vec<u8> {
    let schema = Arc::new(schema.clone());
    let id = schema.bind::<u32>("id").unwrap();
    let value = schema.bind::<f64>("value").unwrap();
    let label = schema.bind::<FixedStr<8>>("label").unwrap();

    let mut out = Vec::new();
    let mut record = Record::new(schema);
    for (i, v, l) in values {
        record.set(id, *i);
        record.set(value, *v);
        record.set(label, FixedStr::new(l));
        out.extend_from_slice(record.as_bytes());
    }
    out
}

// ==================== Memory Backend ====================

#[test]
fn test_memory_create_and_append() {
    let schema = small_schema();
    let mut backend = MemoryBackend::new();

    let first = rows(&schema, &[(1, 1.5, "a"), (2, 2.5, "b")]);
    backend.create_table("t", "test", &schema, &first, 2).unwrap();
    let more = rows(&schema, &[(3, 3.5, "c")]);
    backend.append_rows("t", &more, 1).unwrap();

    let table = backend.table("t").unwrap();
    assert_eq!(table.rows, 3);
    assert_eq!(table.appends, 1);
    assert_eq!(table.title, "test");

    let id = schema.bind::<u32>("id").unwrap();
    let ids: Vec<u32> = table.records().iter().map(|r| r.get(id)).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_memory_table_errors() {
    let schema = small_schema();
    let mut backend = MemoryBackend::new();

    let result = backend.append_rows("missing", &[], 0);
    assert!(matches!(result, Err(StorageError::TableNotFound(_))));

    backend.create_table("t", "test", &schema, &[], 0).unwrap();
    let result = backend.create_table("t", "test", &schema, &[], 0);
    assert!(matches!(result, Err(StorageError::TableExists(_))));

    let result = backend.append_rows("t", &[0u8; 3], 1);
    assert!(matches!(
        result,
        Err(StorageError::RowSizeMismatch { expected: 20, actual: 3, .. })
    ));
}

#[test]
fn test_memory_row_out_of_range() {
    let schema = small_schema();
    let mut backend = MemoryBackend::new();
    backend
        .create_table("t", "test", &schema, &rows(&schema, &[(1, 1.5, "a")]), 1)
        .unwrap();

    let table = backend.table("t").unwrap();
    assert!(table.row_bytes(0).is_some());
    assert!(table.row_bytes(1).is_none());
    assert!(table.row_bytes(usize::MAX / schema.record_size()).is_none());
    assert!(table.row(usize::MAX).is_none());
}

#[test]
fn test_memory_attributes_replace() {
    let mut backend = MemoryBackend::new();
    backend.write_attribute(None, "seed", 7i32.into()).unwrap();
    backend.write_attribute(None, "seed", 9i32.into()).unwrap();
    backend.write_attribute(Some("events"), "title", "Events".into()).unwrap();

    assert_eq!(backend.attribute("seed"), Some(&AttributeValue::Int(9)));
    assert_eq!(
        backend.attributes().get_table("events", "title").and_then(|v| v.as_str()),
        Some("Events")
    );
}

#[test]
fn test_same_contents_ignores_batching() {
    let schema = small_schema();
    let data = rows(&schema, &[(1, 1.0, "x"), (2, 2.0, "y")]);
    let size = schema.record_size();

    let mut one_shot = MemoryBackend::new();
    one_shot.create_table("t", "test", &schema, &data, 2).unwrap();

    let mut split = MemoryBackend::new();
    split.create_table("t", "test", &schema, &data[..size], 1).unwrap();
    split.append_rows("t", &data[size..], 1).unwrap();

    assert!(one_shot.same_contents(&split));
    split.write_attribute(None, "cutoff", 0.01.into()).unwrap();
    assert!(!one_shot.same_contents(&split));
}

// ==================== Attribute Values ====================

#[test]
fn test_attribute_value_conversions() {
    assert_eq!(AttributeValue::Int(3).as_f64(), Some(3.0));
    assert_eq!(AttributeValue::UInt(5).as_i32(), Some(5));
    assert_eq!(AttributeValue::Int(-1).as_u32(), None);
    assert_eq!(AttributeValue::Text("m".into()).as_f64(), None);
    assert_eq!(AttributeValue::Float(0.5).to_string(), "0.5");
}

#[test]
fn test_attributes_json_shape() {
    let mut attrs = Attributes::default();
    attrs.insert(None, "model_crc", AttributeValue::UInt(42));
    let json = serde_json::to_value(&attrs).unwrap();
    assert_eq!(json["root"]["model_crc"]["type"], "u_int");
    assert_eq!(json["root"]["model_crc"]["value"], 42);

    let back: Attributes = serde_json::from_value(json).unwrap();
    assert_eq!(back, attrs);
}

// ==================== Row Codec ====================

#[test]
fn test_codec_round_trip_particles() {
    let schema = create_particle_schema().unwrap();
    let mut data = vec![0u8; schema.record_size() * 2];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = (i % 7) as u8;
    }
    // names must be valid, NUL-terminated UTF-8 to survive the Utf8 column
    let name = schema.bind::<FixedStr<16>>("name").unwrap();
    for row in data.chunks_exact_mut(schema.record_size()) {
        row[name.range()].copy_from_slice(FixedStr::<16>::new("proton").as_bytes());
    }

    let arrow = Arc::new(arrow_schema(&schema));
    let batch = rows_to_record_batch(&schema, arrow, &data, 2).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), schema.len());

    let mut back = Vec::new();
    let n = record_batch_to_rows(&schema, &batch, &mut back).unwrap();
    assert_eq!(n, 2);
    assert_eq!(back, data);
}

#[test]
fn test_schema_from_arrow_keeps_string_width() {
    let schema = small_schema();
    let rebuilt = schema_from_arrow(&arrow_schema(&schema)).unwrap();
    assert_eq!(rebuilt, schema);
}

// ==================== Parquet Bundle ====================

#[test]
fn test_bundle_writes_tables_and_attributes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.bundle");
    let schema = small_schema();

    let mut bundle = ParquetBundle::create(&path, BundleConfig::default()).unwrap();
    bundle
        .create_table("t", "Test table", &schema, &rows(&schema, &[(1, 0.5, "p")]), 1)
        .unwrap();
    bundle
        .append_rows("t", &rows(&schema, &[(2, 1.5, "q"), (3, 2.5, "r")]), 2)
        .unwrap();
    bundle.write_attribute(None, "seed", 11i32.into()).unwrap();
    assert_eq!(bundle.rows("t"), 3);

    let stats = bundle.finish().unwrap();
    assert_eq!(stats.rows("t"), 3);
    assert_eq!(stats.rows("absent"), 0);
    assert!(path.join(ATTRIBUTES_FILE).exists());

    let file = File::open(path.join("t.parquet")).unwrap();
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
    let kv = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .cloned()
        .unwrap_or_default();
    assert!(kv
        .iter()
        .any(|e| e.key == KEY_TABLE_TITLE && e.value.as_deref() == Some("Test table")));

    let mut data = Vec::new();
    for batch in builder.build().unwrap() {
        record_batch_to_rows(&schema, &batch.unwrap(), &mut data).unwrap();
    }
    assert_eq!(data, rows(&schema, &[(1, 0.5, "p"), (2, 1.5, "q"), (3, 2.5, "r")]));
}

#[test]
fn test_bundle_already_exists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("done.bundle");

    ParquetBundle::create(&path, BundleConfig::default())
        .unwrap()
        .finish()
        .unwrap();

    let result = ParquetBundle::create(&path, BundleConfig::default());
    assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
}

#[test]
fn test_bundle_append_to_missing_table() {
    let dir = tempdir().unwrap();
    let mut bundle = ParquetBundle::create(dir.path().join("b"), BundleConfig::fast_write()).unwrap();
    let result = bundle.append_rows("events", &[], 0);
    assert!(matches!(result, Err(StorageError::TableNotFound(_))));
    bundle.finish().unwrap();
}

#[test]
fn test_bundle_ignores_files_left_by_unfinished_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rerun.bundle");
    let schema = small_schema();

    let mut crashed = ParquetBundle::create(&path, BundleConfig::default()).unwrap();
    crashed
        .create_table("stale", "Left over", &schema, &rows(&schema, &[(99, 1.0, "x")]), 1)
        .unwrap();
    crashed.finish().unwrap();
    std::fs::remove_file(path.join(ATTRIBUTES_FILE)).unwrap();

    let mut bundle = ParquetBundle::create(&path, BundleConfig::default()).unwrap();
    bundle
        .create_table("t", "Test table", &schema, &rows(&schema, &[(1, 0.5, "p")]), 1)
        .unwrap();
    bundle.finish().unwrap();
    assert!(path.join("stale.parquet").exists());

    let reader = crate::reader::BundleReader::open(&path).unwrap();
    assert!(!reader.has_table("stale"));
    assert!(reader.has_table("t"));
    assert_eq!(reader.rows("stale").unwrap(), 0);
}
