use crate::schema::{Record, SchemaError};
use crate::storage::StorageBackend;
use crate::table::{RecordTable, TableConfig, TableError, TableStats};

use super::layout::{EventFields, ParticleFields, RecordLayout, RunFields};

/// A [`RecordTable`] together with the typed layout of its rows
pub struct Ledger<L: RecordLayout> {
    table: RecordTable,
    layout: L,
}

/// Ledger of the `events` table
pub type EventLedger = Ledger<EventFields>;

/// Ledger of the `particles` table
pub type ParticleLedger = Ledger<ParticleFields>;

/// Ledger of the `runs` table of merged bundles
pub type RunLedger = Ledger<RunFields>;

impl<L: RecordLayout> Ledger<L> {
    /// Create the ledger and bind all of its fields.
    ///
    /// Fails with a schema error if the layout names a field the table lacks.
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        let table = RecordTable::new(L::TABLE, L::TITLE, L::schema()?, config)?;
        let layout = L::resolve(table.schema())?;
        Ok(Self { table, layout })
    }

    /// Serialize `value` into the scratch record and write it
    pub fn write<B: StorageBackend>(
        &mut self,
        value: &L::Value,
        backend: &mut B,
    ) -> Result<(), TableError> {
        self.layout.store(value, self.table.scratch_mut());
        self.table.write(backend)
    }

    /// Flush buffered rows
    pub fn flush<B: StorageBackend>(&mut self, backend: &mut B) -> Result<(), TableError> {
        self.table.flush(backend)
    }

    /// Rows written so far
    pub fn nrows(&self) -> usize {
        self.table.nrows()
    }

    /// Decode a stored row of this table.
    ///
    /// Fails with [`SchemaError::LayoutMismatch`] if `record` was not built
    /// from this table's schema.
    pub fn decode(&self, record: &Record) -> Result<L::Value, SchemaError> {
        if **record.schema() != **self.table.schema() {
            return Err(SchemaError::LayoutMismatch(format!(
                "record does not belong to table '{}'",
                L::TABLE
            )));
        }
        Ok(self.layout.load(record))
    }

    /// Value currently in the scratch record
    pub fn last_written(&self) -> L::Value {
        self.layout.load(self.table.scratch())
    }

    /// Underlying table
    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    /// Field bindings
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Flush remaining rows and return the table counters
    pub fn close<B: StorageBackend>(self, backend: &mut B) -> Result<TableStats, TableError> {
        self.table.close(backend)
    }
}
