/// Errors that can occur during reading
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Rows could not be decoded into the stored layout
    #[error("Storage error: {0}")]
    StorageError(#[from] crate::storage::StorageError),

    /// A table lacks a field the caller asked for
    #[error("Schema error: {0}")]
    SchemaError(#[from] crate::schema::SchemaError),

    /// The path is not a finished bundle
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The bundle has no table of this name
    #[error("Table not found: {0}")]
    TableNotFound(String),
}
