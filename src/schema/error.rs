/// Errors raised while building a schema or resolving its fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two fields share the same name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// A field was declared without a name
    #[error("Field at position {position} has an empty name")]
    EmptyFieldName {
        /// Declaration index of the offending field
        position: usize,
    },

    /// A field with a zero byte size was declared
    #[error("Field '{0}' has zero size")]
    ZeroSizedField(String),

    /// A binding was requested for a name the schema does not contain
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// A binding was requested with a Rust type that does not match the field
    #[error("Type mismatch for field '{field}': stored as {expected}, requested as {requested}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Stored type tag
        expected: String,
        /// Requested Rust type
        requested: String,
    },

    /// Two records with different layouts were combined
    #[error("Record layout mismatch: {0}")]
    LayoutMismatch(String),
}
