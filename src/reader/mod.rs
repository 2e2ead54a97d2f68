//! # Bundle Reader
//!
//! Reads finished [`ParquetBundle`](crate::storage::ParquetBundle) directories
//! back into fixed-width rows and typed records.
//!
//! ## Example
//!
//! ```rust,no_run
//! use trackledger::reader::BundleReader;
//!
//! let reader = BundleReader::open("run42.bundle")?;
//!
//! for info in reader.table_infos()? {
//!     println!("{}", info);
//! }
//!
//! for event in reader.read_events()? {
//!     println!("event {}: {} crossings", event.id, event.size);
//! }
//! # Ok::<(), trackledger::reader::ReaderError>(())
//! ```
//!
//! A table that was never flushed has no file. Reading it yields zero rows.

mod config;
mod error;
mod open;
mod rows;
mod tables;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

pub use config::ReaderConfig;
pub use error::ReaderError;
pub use rows::TableData;
pub use tables::{FieldInfo, TableInfo};

use crate::storage::Attributes;

/// Reader for trackledger bundles
#[derive(Debug)]
pub struct BundleReader {
    root: PathBuf,
    config: ReaderConfig,
    format_version: String,
    created: DateTime<Utc>,
    attributes: Attributes,
    tables: BTreeMap<String, PathBuf>,
}

impl BundleReader {
    /// Bundle directory
    pub fn path(&self) -> &std::path::Path {
        &self.root
    }

    /// Format version recorded when the bundle was finished
    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    /// Creation time of the bundle
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Root and per-table attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Names of the tables present, sorted
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// True if the bundle holds a file for `table`
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }
}
