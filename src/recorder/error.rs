use crate::storage::StorageError;
use crate::table::TableError;

/// Errors raised while recording a run
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// A ledger could not be created, written or flushed
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// The backend rejected an attribute
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// An event callback arrived outside an event
    #[error("No event is open")]
    NoOpenEvent,

    /// `on_event_begin` was called while another event was open
    #[error("Event {open} is still open, cannot begin event {requested}")]
    EventAlreadyOpen {
        /// Event currently open
        open: u32,
        /// Event the kernel tried to begin
        requested: u32,
    },

    /// A secondary list lost entries that were already approved
    #[error("Secondary list of track {track} shrank to {len} entries below the {mark} already approved")]
    SecondariesShrunk {
        /// Producing track
        track: i32,
        /// Entries approved on earlier steps
        mark: usize,
        /// Current list length
        len: usize,
    },

    /// The particle table outgrew the 32-bit row index of the events table
    #[error("Particle row index {0} does not fit the events table")]
    RowIndexOverflow(usize),
}
