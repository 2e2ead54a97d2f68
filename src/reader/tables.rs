use std::fmt;
use std::fs::File;

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::schema::{FieldType, Schema, KEY_FORMAT_VERSION, KEY_TABLE_TITLE};
use crate::storage::schema_from_arrow;

use super::{BundleReader, ReaderError};

/// One column of a stored table
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Column name
    pub name: String,
    /// Stored type
    pub field_type: FieldType,
    /// Byte offset within a row
    pub offset: usize,
}

/// Layout and size of one table in a bundle
#[derive(Debug, Clone)]
pub struct TableInfo {
    /// Table name
    pub name: String,
    /// Human-readable title from the file footer
    pub title: Option<String>,
    /// Format version from the file footer
    pub format_version: Option<String>,
    /// Number of rows
    pub rows: usize,
    /// Parquet row groups
    pub row_groups: usize,
    /// Bytes per fixed-width row
    pub record_size: usize,
    /// Columns in row order
    pub fields: Vec<FieldInfo>,
}

impl BundleReader {
    /// Rows in `table`; a table that was never created has zero rows
    pub fn rows(&self, table: &str) -> Result<usize, ReaderError> {
        if !self.has_table(table) {
            return Ok(0);
        }
        Ok(self.table_info(table)?.rows)
    }

    /// Read the footer of `table`
    pub fn table_info(&self, table: &str) -> Result<TableInfo, ReaderError> {
        let path = self
            .tables
            .get(table)
            .ok_or_else(|| ReaderError::TableNotFound(table.to_string()))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
        let schema = schema_from_arrow(builder.schema())?;

        let metadata = builder.metadata();
        let file_metadata = metadata.file_metadata();
        let lookup = |key: &str| {
            file_metadata.key_value_metadata().and_then(|kvs| {
                kvs.iter()
                    .find(|kv| kv.key == key)
                    .and_then(|kv| kv.value.clone())
            })
        };

        Ok(TableInfo {
            name: table.to_string(),
            title: lookup(KEY_TABLE_TITLE),
            format_version: lookup(KEY_FORMAT_VERSION),
            rows: usize::try_from(file_metadata.num_rows()).unwrap_or(0),
            row_groups: metadata.num_row_groups(),
            record_size: schema.record_size(),
            fields: field_infos(&schema),
        })
    }

    /// Footers of every table, sorted by name
    pub fn table_infos(&self) -> Result<Vec<TableInfo>, ReaderError> {
        self.tables.keys().map(|name| self.table_info(name)).collect()
    }
}

fn field_infos(schema: &Schema) -> Vec<FieldInfo> {
    schema
        .layout()
        .map(|(spec, offset)| FieldInfo {
            name: spec.name.clone(),
            field_type: spec.field_type,
            offset,
        })
        .collect()
}

impl fmt::Display for TableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Table '{}' ({})",
            self.name,
            self.title.as_deref().unwrap_or("untitled")
        )?;
        writeln!(
            f,
            "  Rows: {} in {} row groups, {} bytes per row",
            self.rows, self.row_groups, self.record_size
        )?;
        for field in &self.fields {
            writeln!(f, "  {:>5}  {:<16} {}", field.offset, field.name, field.field_type)?;
        }
        Ok(())
    }
}
