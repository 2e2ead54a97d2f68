use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::datatypes::Schema as ArrowSchema;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};

use crate::schema::{Schema, TRACKLEDGER_FORMAT_VERSION};

use super::codec::{arrow_schema, rows_to_record_batch};
use super::config::BundleConfig;
use super::{check_row_bytes, AttributeValue, Attributes, StorageBackend, StorageError};

/// Name of the attribute file inside a bundle directory
pub const ATTRIBUTES_FILE: &str = "attributes.json";

/// File extension of bundle tables
pub(crate) const TABLE_EXTENSION: &str = "parquet";

/// On-disk form of `attributes.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AttributeFile {
    pub format_version: String,
    pub created: DateTime<Utc>,
    /// Tables written by this bundle; other `.parquet` files in the
    /// directory are not part of it
    #[serde(default)]
    pub stored_tables: Vec<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

struct OpenTable {
    writer: ArrowWriter<File>,
    arrow_schema: Arc<ArrowSchema>,
    schema: Schema,
    rows: usize,
}

/// Directory bundle of Parquet tables.
///
/// ```text
/// run.bundle/
/// ├── events.parquet       # one file per table, created on first flush
/// ├── particles.parquet
/// └── attributes.json      # root and per-table attributes
/// ```
///
/// Every `create_table`/`append_rows` call writes one record batch through a
/// streaming [`ArrowWriter`]. Parquet footers are only written by
/// [`ParquetBundle::finish`]; a bundle that is dropped unfinished is unreadable.
pub struct ParquetBundle {
    root: PathBuf,
    config: BundleConfig,
    tables: BTreeMap<String, OpenTable>,
    attributes: Attributes,
    created: DateTime<Utc>,
    finished: bool,
}

impl ParquetBundle {
    /// Create a bundle directory at `path`.
    ///
    /// The directory may exist but must not already contain a finished bundle.
    pub fn create<P: AsRef<Path>>(path: P, config: BundleConfig) -> Result<Self, StorageError> {
        let root = path.as_ref().to_path_buf();
        if root.join(ATTRIBUTES_FILE).exists() {
            return Err(StorageError::AlreadyExists(root.display().to_string()));
        }
        fs::create_dir_all(&root)?;
        info!("Creating bundle: {}", root.display());

        Ok(Self {
            root,
            config,
            tables: BTreeMap::new(),
            attributes: Attributes::default(),
            created: Utc::now(),
            finished: false,
        })
    }

    /// Bundle directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of the Parquet file backing `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{}.{}", table, TABLE_EXTENSION))
    }

    /// Rows stored so far in `table`, zero if it was never created
    pub fn rows(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.rows).unwrap_or(0)
    }

    /// Attributes written so far
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Close every table file and write `attributes.json`
    pub fn finish(mut self) -> Result<BundleStats, StorageError> {
        let mut tables = Vec::with_capacity(self.tables.len());
        for (name, table) in std::mem::take(&mut self.tables) {
            let metadata = table.writer.close()?;
            debug!(
                "Closed table '{}': {} rows in {} row groups",
                name,
                table.rows,
                metadata.row_groups.len()
            );
            tables.push(TableSummary {
                name,
                rows: table.rows,
                row_groups: metadata.row_groups.len(),
            });
        }

        let file = AttributeFile {
            format_version: TRACKLEDGER_FORMAT_VERSION.to_string(),
            created: self.created,
            stored_tables: tables.iter().map(|t| t.name.clone()).collect(),
            attributes: std::mem::take(&mut self.attributes),
        };
        let writer = BufWriter::new(File::create(self.root.join(ATTRIBUTES_FILE))?);
        serde_json::to_writer_pretty(writer, &file)?;
        self.finished = true;

        let stats = BundleStats {
            path: self.root.clone(),
            tables,
        };
        info!("{}", stats);
        Ok(stats)
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.finished {
            return Err(StorageError::Finished);
        }
        Ok(())
    }
}

impl StorageBackend for ParquetBundle {
    fn create_table(
        &mut self,
        name: &str,
        title: &str,
        schema: &Schema,
        rows: &[u8],
        nrows: usize,
    ) -> Result<(), StorageError> {
        self.ensure_open()?;
        if self.tables.contains_key(name) {
            return Err(StorageError::TableExists(name.to_string()));
        }
        check_row_bytes(name, schema.record_size(), rows, nrows)?;

        let arrow_schema = Arc::new(arrow_schema(schema));
        let props = self.config.to_writer_properties(schema, title);
        let file = File::create(self.table_path(name))?;
        let mut writer = ArrowWriter::try_new(file, arrow_schema.clone(), Some(props))?;

        if nrows > 0 {
            let batch = rows_to_record_batch(schema, arrow_schema.clone(), rows, nrows)?;
            writer.write(&batch)?;
        }
        info!("Created table '{}' ({} fields, {} initial rows)", name, schema.len(), nrows);

        self.tables.insert(
            name.to_string(),
            OpenTable {
                writer,
                arrow_schema,
                schema: schema.clone(),
                rows: nrows,
            },
        );
        Ok(())
    }

    fn append_rows(&mut self, name: &str, rows: &[u8], nrows: usize) -> Result<(), StorageError> {
        self.ensure_open()?;
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| StorageError::TableNotFound(name.to_string()))?;
        check_row_bytes(name, table.schema.record_size(), rows, nrows)?;
        if nrows == 0 {
            return Ok(());
        }

        let batch = rows_to_record_batch(&table.schema, table.arrow_schema.clone(), rows, nrows)?;
        table.writer.write(&batch)?;
        table.rows += nrows;
        Ok(())
    }

    fn write_attribute(
        &mut self,
        table: Option<&str>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StorageError> {
        self.ensure_open()?;
        self.attributes.insert(table, name, value);
        Ok(())
    }
}

impl Drop for ParquetBundle {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                "Bundle {} dropped without finish(); its tables are incomplete",
                self.root.display()
            );
        }
    }
}

/// Row counts of one table in a finished bundle
#[derive(Debug, Clone)]
pub struct TableSummary {
    /// Table name
    pub name: String,
    /// Rows written
    pub rows: usize,
    /// Parquet row groups written
    pub row_groups: usize,
}

/// Statistics from a finished bundle
#[derive(Debug, Clone)]
pub struct BundleStats {
    /// Bundle directory
    pub path: PathBuf,
    /// Per-table summaries, sorted by table name
    pub tables: Vec<TableSummary>,
}

impl BundleStats {
    /// Rows written to `table`, zero if it was never created
    pub fn rows(&self, table: &str) -> usize {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .map(|t| t.rows)
            .unwrap_or(0)
    }
}

impl fmt::Display for BundleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrote bundle {}:", self.path.display())?;
        for table in &self.tables {
            write!(
                f,
                " {} ({} rows, {} row groups)",
                table.name, table.rows, table.row_groups
            )?;
        }
        Ok(())
    }
}
