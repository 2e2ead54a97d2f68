/// Default batch capacity of the `events` table
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Default batch capacity of the `particles` table
pub const DEFAULT_PARTICLE_CAPACITY: usize = 500;

/// Configuration for a [`RecordTable`](super::RecordTable)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of records buffered before the batch is flushed to the backend.
    /// A capacity of 1 flushes on every write.
    pub capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl TableConfig {
    /// Buffer `capacity` records per flush
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Flush every record immediately
    pub fn unbuffered() -> Self {
        Self { capacity: 1 }
    }

    /// Default configuration for the `events` table
    pub fn events() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Default configuration for the `particles` table
    pub fn particles() -> Self {
        Self::with_capacity(DEFAULT_PARTICLE_CAPACITY)
    }
}
