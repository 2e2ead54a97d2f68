/// Errors raised by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library while building record batches
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library while writing or reading files
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Error serializing or parsing the attribute file
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A table was created twice
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Rows were appended to a table that was never created
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The byte length of a row batch does not match the table layout
    #[error("Row data for table '{table}' has {actual} bytes, expected {expected}")]
    RowSizeMismatch {
        /// Table name
        table: String,
        /// Expected byte length (rows * record size)
        expected: usize,
        /// Byte length received
        actual: usize,
    },

    /// A column could not be mapped onto the record layout
    #[error("Unsupported column '{column}': {reason}")]
    UnsupportedColumn {
        /// Column name
        column: String,
        /// Why the column was rejected
        reason: String,
    },

    /// Invalid record layout
    #[error("Schema error: {0}")]
    SchemaError(#[from] crate::schema::SchemaError),

    /// The bundle directory already holds a finished bundle
    #[error("Bundle already exists: {0}")]
    AlreadyExists(String),

    /// The backend was used after it was finished
    #[error("Storage backend already finished")]
    Finished,
}
