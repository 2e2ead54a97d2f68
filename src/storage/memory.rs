use std::collections::BTreeMap;
use std::sync::Arc;

use crate::schema::{Record, Schema};

use super::{check_row_bytes, AttributeValue, Attributes, StorageBackend, StorageError};

/// One table held by a [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    /// Human-readable title given at creation
    pub title: String,
    /// Record layout
    pub schema: Arc<Schema>,
    /// Concatenated row bytes
    pub data: Vec<u8>,
    /// Number of rows stored
    pub rows: usize,
    /// Number of append calls after creation
    pub appends: usize,
}

impl MemoryTable {
    /// Bytes of row `index`
    pub fn row_bytes(&self, index: usize) -> Option<&[u8]> {
        let size = self.schema.record_size();
        let start = index.checked_mul(size)?;
        self.data.get(start..start.checked_add(size)?)
    }

    /// Row `index` as a record
    pub fn row(&self, index: usize) -> Option<Record> {
        let bytes = self.row_bytes(index)?.to_vec();
        Record::from_bytes(self.schema.clone(), bytes).ok()
    }

    /// All rows as records
    pub fn records(&self) -> Vec<Record> {
        (0..self.rows).filter_map(|i| self.row(i)).collect()
    }
}

/// In-memory storage backend.
///
/// Table contents compare equal regardless of how the rows were batched, so two
/// backends fed the same write sequence can be compared with
/// [`MemoryBackend::same_contents`].
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    tables: BTreeMap<String, MemoryTable>,
    attributes: Attributes,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Table by name
    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    /// Names of all created tables
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Stored row count of a table, zero if it was never created
    pub fn rows(&self, name: &str) -> usize {
        self.tables.get(name).map(|t| t.rows).unwrap_or(0)
    }

    /// Root attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// All attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// True if both backends hold the same tables, rows and attributes,
    /// ignoring how many append calls produced them
    pub fn same_contents(&self, other: &MemoryBackend) -> bool {
        self.attributes == other.attributes
            && self.tables.len() == other.tables.len()
            && self.tables.iter().zip(other.tables.iter()).all(|((na, a), (nb, b))| {
                na == nb
                    && a.title == b.title
                    && a.schema == b.schema
                    && a.rows == b.rows
                    && a.data == b.data
            })
    }
}

impl StorageBackend for MemoryBackend {
    fn create_table(
        &mut self,
        name: &str,
        title: &str,
        schema: &Schema,
        rows: &[u8],
        nrows: usize,
    ) -> Result<(), StorageError> {
        if self.tables.contains_key(name) {
            return Err(StorageError::TableExists(name.to_string()));
        }
        check_row_bytes(name, schema.record_size(), rows, nrows)?;

        self.tables.insert(
            name.to_string(),
            MemoryTable {
                title: title.to_string(),
                schema: Arc::new(schema.clone()),
                data: rows.to_vec(),
                rows: nrows,
                appends: 0,
            },
        );
        Ok(())
    }

    fn append_rows(&mut self, name: &str, rows: &[u8], nrows: usize) -> Result<(), StorageError> {
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| StorageError::TableNotFound(name.to_string()))?;
        check_row_bytes(name, table.schema.record_size(), rows, nrows)?;

        table.data.extend_from_slice(rows);
        table.rows += nrows;
        table.appends += 1;
        Ok(())
    }

    fn write_attribute(
        &mut self,
        table: Option<&str>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StorageError> {
        self.attributes.insert(table, name, value);
        Ok(())
    }
}
