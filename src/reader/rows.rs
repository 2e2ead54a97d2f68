use std::fs::File;
use std::sync::Arc;

use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::ledger::{
    EventFields, EventRecord, ParticleFields, ParticleRecord, RecordLayout, RunFields, RunRecord,
};
use crate::schema::{Record, Schema};
use crate::storage::{record_batch_to_rows, schema_from_arrow};

use super::{BundleReader, ReaderError};

/// All rows of one table as packed fixed-width records
#[derive(Debug, Clone)]
pub struct TableData {
    /// Table name
    pub name: String,
    /// Layout rebuilt from the stored column types
    pub schema: Arc<Schema>,
    /// Contiguous little-endian rows
    pub data: Vec<u8>,
    /// Number of rows in `data`
    pub rows: usize,
}

impl TableData {
    /// Copy of row `index`
    pub fn row(&self, index: usize) -> Option<Record> {
        let size = self.schema.record_size();
        let bytes = self.data.get(index * size..(index + 1) * size)?;
        Record::from_bytes(self.schema.clone(), bytes.to_vec()).ok()
    }

    /// Every row in order
    pub fn records(&self) -> Vec<Record> {
        (0..self.rows).filter_map(|i| self.row(i)).collect()
    }
}

impl BundleReader {
    /// Decode every row of `table` into packed records
    pub fn read_raw(&self, table: &str) -> Result<TableData, ReaderError> {
        let path = self
            .tables
            .get(table)
            .ok_or_else(|| ReaderError::TableNotFound(table.to_string()))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?
            .with_batch_size(self.config.batch_size);
        let schema = Arc::new(schema_from_arrow(builder.schema())?);

        let mut data = Vec::new();
        let mut rows = 0;
        for batch in builder.build()? {
            rows += record_batch_to_rows(&schema, &batch?, &mut data)?;
        }
        debug!("Read {} rows from table '{}'", rows, table);

        Ok(TableData {
            name: table.to_string(),
            schema,
            data,
            rows,
        })
    }

    /// Decode `L::TABLE` into typed values.
    ///
    /// Fields are resolved by name against the stored layout. A table that was
    /// never created yields no values.
    pub fn read<L: RecordLayout>(&self) -> Result<Vec<L::Value>, ReaderError> {
        if !self.has_table(L::TABLE) {
            return Ok(Vec::new());
        }
        let table = self.read_raw(L::TABLE)?;
        let layout = L::resolve(&table.schema)?;
        Ok(table.records().iter().map(|r| layout.load(r)).collect())
    }

    /// Rows of the `events` table
    pub fn read_events(&self) -> Result<Vec<EventRecord>, ReaderError> {
        self.read::<EventFields>()
    }

    /// Rows of the `particles` table
    pub fn read_particles(&self) -> Result<Vec<ParticleRecord>, ReaderError> {
        self.read::<ParticleFields>()
    }

    /// Rows of the `runs` table of a merged bundle
    pub fn read_runs(&self) -> Result<Vec<RunRecord>, ReaderError> {
        self.read::<RunFields>()
    }
}
