use std::fmt;

/// Counters of a record table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Table name
    pub name: String,
    /// Rows accepted by `write()`
    pub rows_written: usize,
    /// Rows handed to the backend so far
    pub rows_flushed: usize,
    /// Number of non-empty flushes
    pub flushes: usize,
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Table '{}': {} rows written, {} flushed in {} batches",
            self.name, self.rows_written, self.rows_flushed, self.flushes
        )
    }
}
