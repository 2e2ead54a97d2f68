//! # Storage Backends
//!
//! A storage backend is an append-only container of named fixed-width tables plus
//! scalar attributes. [`RecordTable`](crate::table::RecordTable) talks to it through
//! three calls only:
//!
//! 1. [`StorageBackend::create_table`]: create a table, seeded with its first rows
//! 2. [`StorageBackend::append_rows`]: append rows to an existing table
//! 3. [`StorageBackend::write_attribute`]: attach a scalar to the container or a table
//!
//! Rows are passed as contiguous little-endian records laid out by a
//! [`Schema`]. Backends never see partially filled records.
//!
//! Two implementations are provided:
//!
//! - [`ParquetBundle`]: a directory with one Parquet file per table and an
//!   `attributes.json` file
//! - [`MemoryBackend`]: keeps everything in memory; used by tests and tools

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

mod codec;
mod config;
mod error;
mod memory;
mod parquet_bundle;

#[cfg(test)]
mod tests;

pub use codec::{arrow_schema, record_batch_to_rows, rows_to_record_batch, schema_from_arrow};
pub use config::{BundleConfig, CompressionType};
pub use error::StorageError;
pub use memory::{MemoryBackend, MemoryTable};
pub use parquet_bundle::{BundleStats, ParquetBundle, TableSummary, ATTRIBUTES_FILE};
pub(crate) use parquet_bundle::{AttributeFile, TABLE_EXTENSION};

/// Append-only container of named tables and scalar attributes
pub trait StorageBackend {
    /// Create `name` with the given layout, seeded with `nrows` initial rows.
    ///
    /// Fails with [`StorageError::TableExists`] if the table was already created.
    fn create_table(
        &mut self,
        name: &str,
        title: &str,
        schema: &Schema,
        rows: &[u8],
        nrows: usize,
    ) -> Result<(), StorageError>;

    /// Append `nrows` rows to an existing table.
    ///
    /// Fails with [`StorageError::TableNotFound`] if the table was never created.
    fn append_rows(&mut self, name: &str, rows: &[u8], nrows: usize) -> Result<(), StorageError>;

    /// Write a scalar attribute on the container (`table == None`) or on a table.
    ///
    /// Writing the same name twice replaces the earlier value.
    fn write_attribute(
        &mut self,
        table: Option<&str>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for &mut B {
    fn create_table(
        &mut self,
        name: &str,
        title: &str,
        schema: &Schema,
        rows: &[u8],
        nrows: usize,
    ) -> Result<(), StorageError> {
        (**self).create_table(name, title, schema, rows, nrows)
    }

    fn append_rows(&mut self, name: &str, rows: &[u8], nrows: usize) -> Result<(), StorageError> {
        (**self).append_rows(name, rows, nrows)
    }

    fn write_attribute(
        &mut self,
        table: Option<&str>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StorageError> {
        (**self).write_attribute(table, name, value)
    }
}

/// Check that `rows` holds exactly `nrows` records of `record_size` bytes
pub(crate) fn check_row_bytes(
    table: &str,
    record_size: usize,
    rows: &[u8],
    nrows: usize,
) -> Result<(), StorageError> {
    let expected = record_size * nrows;
    if rows.len() != expected {
        return Err(StorageError::RowSizeMismatch {
            table: table.to_string(),
            expected,
            actual: rows.len(),
        });
    }
    Ok(())
}

/// A single scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// 64-bit float
    Float(f64),
    /// Signed 32-bit integer
    Int(i32),
    /// Unsigned 32-bit integer
    UInt(u32),
    /// UTF-8 string
    Text(String),
}

impl AttributeValue {
    /// Value as a float, if numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(f64::from(*v)),
            Self::UInt(v) => Some(f64::from(*v)),
            Self::Text(_) => None,
        }
    }

    /// Value as a signed integer, if it is an integer that fits
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Value as an unsigned integer, if it is an integer that fits
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt(v) => Some(*v),
            Self::Int(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Value as a string slice, if textual
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        Self::UInt(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Attributes of a container: root-level scalars plus per-table scalars
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// Attributes attached to the container itself
    #[serde(default)]
    pub root: BTreeMap<String, AttributeValue>,
    /// Attributes attached to individual tables, keyed by table name
    #[serde(default)]
    pub tables: BTreeMap<String, BTreeMap<String, AttributeValue>>,
}

impl Attributes {
    /// Insert or replace an attribute
    pub fn insert(&mut self, table: Option<&str>, name: &str, value: AttributeValue) {
        match table {
            None => {
                self.root.insert(name.to_string(), value);
            }
            Some(table) => {
                self.tables
                    .entry(table.to_string())
                    .or_default()
                    .insert(name.to_string(), value);
            }
        }
    }

    /// Look up a root attribute
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.root.get(name)
    }

    /// Look up a table attribute
    pub fn get_table(&self, table: &str, name: &str) -> Option<&AttributeValue> {
        self.tables.get(table).and_then(|attrs| attrs.get(name))
    }
}
