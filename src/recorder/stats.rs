use std::fmt;

use crate::table::TableStats;

/// Counters from a finished recording
#[derive(Debug, Clone, Default)]
pub struct RecorderStats {
    /// Events written
    pub events: usize,
    /// Tracks classified
    pub tracks: usize,
    /// Boundary crossings persisted
    pub particles_written: usize,
    /// Boundary crossings rejected by the acceptance radius
    pub particles_discarded: usize,
    /// Secondaries removed by the cutoff
    pub secondaries_removed: usize,
    /// Final counters of the `events` table
    pub events_table: TableStats,
    /// Final counters of the `particles` table
    pub particles_table: TableStats,
}

impl fmt::Display for RecorderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recorded {} events: {} tracks, {} crossings persisted, {} discarded, {} secondaries cut",
            self.events,
            self.tracks,
            self.particles_written,
            self.particles_discarded,
            self.secondaries_removed
        )
    }
}
