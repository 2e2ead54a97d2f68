use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Errors that can occur while buffering or flushing a record table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Binding failed: unknown field name or incompatible value type
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Buffer capacity must hold at least one record
    #[error("Invalid buffer capacity for table '{table}': {capacity}")]
    InvalidCapacity {
        /// Table name
        table: String,
        /// Rejected capacity
        capacity: usize,
    },

    /// A table needs at least one field
    #[error("Table '{0}' has an empty schema")]
    EmptySchema(String),

    /// The storage backend rejected a create or append
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
