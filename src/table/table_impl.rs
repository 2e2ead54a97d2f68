use std::sync::Arc;

use log::debug;

use crate::schema::{Binding, FieldValue, Record, Schema};
use crate::storage::{AttributeValue, StorageBackend};

use super::config::TableConfig;
use super::error::TableError;
use super::stats::TableStats;

/// Buffered, append-only writer for one fixed-width table.
///
/// Callers fill the scratch record through [`Binding`]s and call
/// [`write`](Self::write). Records accumulate in a batch buffer of `capacity`
/// slots and are handed to the backend when the buffer is full or on an explicit
/// [`flush`](Self::flush). The backend table is created lazily on the first
/// non-empty flush, so a stream that never writes leaves no table behind.
///
/// The table does not own its backend. Every call that may reach storage takes
/// the backend as an argument, which lets one owner drive several tables that
/// share a container.
pub struct RecordTable {
    name: String,
    title: String,
    schema: Arc<Schema>,
    scratch: Record,
    batch: Vec<u8>,
    capacity: usize,
    in_buffer: usize,
    total_rows: usize,
    table_exists: bool,
    rows_flushed: usize,
    flushes: usize,
}

impl RecordTable {
    /// Create a table writer.
    ///
    /// Nothing is written to storage until the first flush.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        schema: Schema,
        config: TableConfig,
    ) -> Result<Self, TableError> {
        let name = name.into();
        if config.capacity == 0 {
            return Err(TableError::InvalidCapacity {
                table: name,
                capacity: config.capacity,
            });
        }
        if schema.is_empty() {
            return Err(TableError::EmptySchema(name));
        }

        let schema = Arc::new(schema);
        let batch = Vec::with_capacity(config.capacity * schema.record_size());
        Ok(Self {
            name,
            title: title.into(),
            scratch: Record::new(schema.clone()),
            schema,
            batch,
            capacity: config.capacity,
            in_buffer: 0,
            total_rows: 0,
            table_exists: false,
            rows_flushed: 0,
            flushes: 0,
        })
    }

    /// Backend table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable title stored with the table
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Record layout
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Batch capacity in records
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records buffered but not yet flushed
    pub fn in_buffer(&self) -> usize {
        self.in_buffer
    }

    /// True once the backend table has been created
    pub fn exists(&self) -> bool {
        self.table_exists
    }

    /// Resolve a field of this table into a typed binding
    pub fn bind<T: FieldValue>(&self, field: &str) -> Result<Binding<T>, TableError> {
        Ok(self.schema.bind(field)?)
    }

    /// The record that the next [`write`](Self::write) will append
    pub fn scratch(&self) -> &Record {
        &self.scratch
    }

    /// Mutable access to the scratch record
    pub fn scratch_mut(&mut self) -> &mut Record {
        &mut self.scratch
    }

    /// Store one field of the scratch record
    #[inline]
    pub fn set<T: FieldValue>(&mut self, binding: Binding<T>, value: T) {
        self.scratch.set(binding, value);
    }

    /// Append the scratch record, flushing if the batch is full.
    ///
    /// The scratch record keeps its contents after the write. If an earlier
    /// flush failed the full batch is retried first, and the record is not
    /// buffered unless that flush succeeds.
    pub fn write<B: StorageBackend>(&mut self, backend: &mut B) -> Result<(), TableError> {
        if self.in_buffer >= self.capacity {
            self.flush(backend)?;
        }
        self.batch.extend_from_slice(self.scratch.as_bytes());
        self.in_buffer += 1;
        self.total_rows += 1;

        if self.in_buffer == self.capacity {
            self.flush(backend)?;
        }
        Ok(())
    }

    /// Replace the scratch record with `record` and append it
    pub fn write_record<B: StorageBackend>(
        &mut self,
        record: &Record,
        backend: &mut B,
    ) -> Result<(), TableError> {
        self.scratch.copy_from(record)?;
        self.write(backend)
    }

    /// Hand buffered records to the backend.
    ///
    /// Creates the backend table seeded with the buffered rows on the first
    /// non-empty flush and appends afterwards. Does nothing when the buffer is
    /// empty, so consecutive flushes are idempotent.
    pub fn flush<B: StorageBackend>(&mut self, backend: &mut B) -> Result<(), TableError> {
        if self.in_buffer == 0 {
            return Ok(());
        }

        if self.table_exists {
            backend.append_rows(&self.name, &self.batch, self.in_buffer)?;
        } else {
            backend.create_table(&self.name, &self.title, &self.schema, &self.batch, self.in_buffer)?;
            self.table_exists = true;
        }
        debug!("Flushed {} rows to table '{}'", self.in_buffer, self.name);

        self.rows_flushed += self.in_buffer;
        self.flushes += 1;
        self.in_buffer = 0;
        self.batch.clear();
        Ok(())
    }

    /// Number of records written, flushed or not
    pub fn nrows(&self) -> usize {
        self.total_rows
    }

    /// Attach a scalar attribute to this table.
    ///
    /// Independent of the rows; the backend table does not need to exist yet.
    pub fn set_attribute<B: StorageBackend>(
        &self,
        backend: &mut B,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<(), TableError> {
        backend.write_attribute(Some(&self.name), name, value.into())?;
        Ok(())
    }

    /// Current counters
    pub fn stats(&self) -> TableStats {
        TableStats {
            name: self.name.clone(),
            rows_written: self.total_rows,
            rows_flushed: self.rows_flushed,
            flushes: self.flushes,
        }
    }

    /// Flush remaining records and return the final counters
    pub fn close<B: StorageBackend>(mut self, backend: &mut B) -> Result<TableStats, TableError> {
        self.flush(backend)?;
        Ok(self.stats())
    }
}

impl std::fmt::Debug for RecordTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordTable")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("in_buffer", &self.in_buffer)
            .field("total_rows", &self.total_rows)
            .field("exists", &self.table_exists)
            .finish()
    }
}
