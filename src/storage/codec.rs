//! Conversion between fixed-width little-endian rows and Arrow record batches.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float32Array, Float32Builder, Float64Array, Float64Builder, Int32Array,
    Int32Builder, Int64Array, Int64Builder, StringArray, StringBuilder, UInt32Array,
    UInt32Builder, UInt64Array, UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;

use crate::schema::{
    decode_fixed_str, encode_fixed_str, FieldSpec, FieldType, FieldValue, Schema, KEY_FIELD_TYPE,
};

use super::StorageError;

/// Arrow type used to store a field type
fn arrow_data_type(field_type: FieldType) -> DataType {
    match field_type {
        FieldType::UInt32 => DataType::UInt32,
        FieldType::Int32 => DataType::Int32,
        FieldType::UInt64 => DataType::UInt64,
        FieldType::Int64 => DataType::Int64,
        FieldType::Float32 => DataType::Float32,
        FieldType::Float64 => DataType::Float64,
        FieldType::FixedString(_) => DataType::Utf8,
    }
}

/// Creates the Arrow schema for a record layout.
///
/// Every field carries its stored type tag in the `trackledger:type` metadata key
/// so fixed string widths survive a round trip through Parquet.
pub fn arrow_schema(schema: &Schema) -> ArrowSchema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|spec| {
            let mut metadata = HashMap::new();
            metadata.insert(KEY_FIELD_TYPE.to_string(), spec.field_type.tag());
            Field::new(&spec.name, arrow_data_type(spec.field_type), false).with_metadata(metadata)
        })
        .collect();
    ArrowSchema::new(fields)
}

/// Rebuild a record layout from an Arrow schema written by [`arrow_schema`].
///
/// Columns without a type tag are mapped from their Arrow type; string columns
/// must carry a tag since their width cannot be inferred.
pub fn schema_from_arrow(arrow: &ArrowSchema) -> Result<Schema, StorageError> {
    let mut fields = Vec::with_capacity(arrow.fields().len());
    for field in arrow.fields() {
        let field_type = match field.metadata().get(KEY_FIELD_TYPE) {
            Some(tag) => FieldType::from_tag(tag).ok_or_else(|| StorageError::UnsupportedColumn {
                column: field.name().clone(),
                reason: format!("unknown type tag '{}'", tag),
            })?,
            None => match field.data_type() {
                DataType::UInt32 => FieldType::UInt32,
                DataType::Int32 => FieldType::Int32,
                DataType::UInt64 => FieldType::UInt64,
                DataType::Int64 => FieldType::Int64,
                DataType::Float32 => FieldType::Float32,
                DataType::Float64 => FieldType::Float64,
                other => {
                    return Err(StorageError::UnsupportedColumn {
                        column: field.name().clone(),
                        reason: format!("no type tag for {:?} column", other),
                    })
                }
            },
        };
        fields.push(FieldSpec::new(field.name().clone(), field_type));
    }
    Ok(Schema::new(fields)?)
}

macro_rules! primitive_column {
    ($builder:ty, $ty:ty, $rows:expr, $nrows:expr, $record_size:expr, $range:expr) => {{
        let mut builder = <$builder>::with_capacity($nrows);
        for row in $rows.chunks_exact($record_size) {
            builder.append_value(<$ty as FieldValue>::decode(&row[$range.clone()]));
        }
        Arc::new(builder.finish()) as ArrayRef
    }};
}

/// Decode `nrows` packed records into a record batch matching `arrow_schema`
pub fn rows_to_record_batch(
    schema: &Schema,
    arrow_schema: Arc<ArrowSchema>,
    rows: &[u8],
    nrows: usize,
) -> Result<RecordBatch, StorageError> {
    let record_size = schema.record_size();
    if record_size == 0 {
        return Err(StorageError::UnsupportedColumn {
            column: String::new(),
            reason: "schema has no fields".to_string(),
        });
    }
    super::check_row_bytes("<batch>", record_size, rows, nrows)?;

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.len());
    for (spec, offset) in schema.layout() {
        let range = offset..offset + spec.size();
        let column = match spec.field_type {
            FieldType::UInt32 => primitive_column!(UInt32Builder, u32, rows, nrows, record_size, range),
            FieldType::Int32 => primitive_column!(Int32Builder, i32, rows, nrows, record_size, range),
            FieldType::UInt64 => primitive_column!(UInt64Builder, u64, rows, nrows, record_size, range),
            FieldType::Int64 => primitive_column!(Int64Builder, i64, rows, nrows, record_size, range),
            FieldType::Float32 => primitive_column!(Float32Builder, f32, rows, nrows, record_size, range),
            FieldType::Float64 => primitive_column!(Float64Builder, f64, rows, nrows, record_size, range),
            FieldType::FixedString(width) => {
                let mut builder = StringBuilder::with_capacity(nrows, nrows * width);
                for row in rows.chunks_exact(record_size) {
                    builder.append_value(decode_fixed_str(&row[range.clone()]));
                }
                Arc::new(builder.finish()) as ArrayRef
            }
        };
        columns.push(column);
    }

    Ok(RecordBatch::try_new(arrow_schema, columns)?)
}

fn downcast<'a, A: Array + 'static>(
    column: &'a ArrayRef,
    spec: &FieldSpec,
) -> Result<&'a A, StorageError> {
    column
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| StorageError::UnsupportedColumn {
            column: spec.name.clone(),
            reason: format!(
                "stored as {:?}, expected {}",
                column.data_type(),
                spec.field_type
            ),
        })
}

macro_rules! encode_primitive {
    ($array:ty, $column:expr, $spec:expr, $out:expr, $record_size:expr, $range:expr) => {{
        let values = downcast::<$array>($column, $spec)?;
        for (row, value) in $out.chunks_exact_mut($record_size).zip(values.values().iter()) {
            value.encode(&mut row[$range.clone()]);
        }
    }};
}

/// Encode a record batch into packed records appended to `out`.
///
/// Columns are matched to fields by position. Returns the number of rows added.
pub fn record_batch_to_rows(
    schema: &Schema,
    batch: &RecordBatch,
    out: &mut Vec<u8>,
) -> Result<usize, StorageError> {
    if batch.num_columns() != schema.len() {
        return Err(StorageError::UnsupportedColumn {
            column: String::new(),
            reason: format!(
                "batch has {} columns, layout has {} fields",
                batch.num_columns(),
                schema.len()
            ),
        });
    }

    let record_size = schema.record_size();
    let nrows = batch.num_rows();
    let start = out.len();
    out.resize(start + nrows * record_size, 0);
    if nrows == 0 {
        return Ok(0);
    }
    let rows = &mut out[start..];

    for ((spec, offset), column) in schema.layout().zip(batch.columns()) {
        let range = offset..offset + spec.size();
        match spec.field_type {
            FieldType::UInt32 => encode_primitive!(UInt32Array, column, spec, rows, record_size, range),
            FieldType::Int32 => encode_primitive!(Int32Array, column, spec, rows, record_size, range),
            FieldType::UInt64 => encode_primitive!(UInt64Array, column, spec, rows, record_size, range),
            FieldType::Int64 => encode_primitive!(Int64Array, column, spec, rows, record_size, range),
            FieldType::Float32 => encode_primitive!(Float32Array, column, spec, rows, record_size, range),
            FieldType::Float64 => encode_primitive!(Float64Array, column, spec, rows, record_size, range),
            FieldType::FixedString(_) => {
                let values = downcast::<StringArray>(column, spec)?;
                for (i, row) in rows.chunks_exact_mut(record_size).enumerate() {
                    encode_fixed_str(values.value(i), &mut row[range.clone()]);
                }
            }
        }
    }

    Ok(nrows)
}
