use crate::table::TableConfig;

/// Radial tolerance of the acceptance shell (km)
pub const ACCEPTANCE_TOLERANCE: f64 = 0.1;

/// Configuration for a [`Recorder`](super::Recorder)
#[derive(Debug, Clone, PartialEq)]
pub struct RecorderConfig {
    /// Secondaries with a kinetic energy below this value (MeV) are removed
    /// at their producer's next step
    pub cutoff: f64,

    /// Radius of the acceptance shell (km). When set, only boundary crossings
    /// within [`ACCEPTANCE_TOLERANCE`] of it are persisted.
    pub acceptance_radius: Option<f64>,

    /// Buffering of the `events` table
    pub events: TableConfig,

    /// Buffering of the `particles` table
    pub particles: TableConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            cutoff: 0.0,
            acceptance_radius: None,
            events: TableConfig::events(),
            particles: TableConfig::particles(),
        }
    }
}

impl RecorderConfig {
    /// Default configuration with the given cutoff (MeV)
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }

    /// Only persist crossings within tolerance of `radius` (km)
    pub fn acceptance_radius(mut self, radius: f64) -> Self {
        self.acceptance_radius = Some(radius);
        self
    }

    /// True if a crossing at `radius` (km) should be persisted
    pub fn accepts(&self, radius: f64) -> bool {
        match self.acceptance_radius {
            Some(shell) => (radius - shell).abs() <= ACCEPTANCE_TOLERANCE,
            None => true,
        }
    }
}
