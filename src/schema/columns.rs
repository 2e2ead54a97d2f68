/// Column names of the `events` table
pub mod events {
    /// Event number assigned by the simulation kernel
    pub const EVENT_ID: &str = "eventid";
    /// Particle-table row count observed when the event began
    pub const FIRST: &str = "first";
    /// Number of particle rows persisted for the event
    pub const SIZE: &str = "size";
    /// PDG code of the primary particle
    pub const PID: &str = "pid";
    /// Total energy of the primary (GeV)
    pub const ENERGY: &str = "E";
    /// Kinetic energy of the primary (GeV)
    pub const KINETIC_ENERGY: &str = "KE";
    /// Angle-of-incidence parameter of the primary
    pub const INCIDENCE: &str = "incidence";
    /// Boundary crossings rejected by the acceptance radius
    pub const DISCARDED: &str = "discarded";
}

/// Column names of the `particles` table
pub mod particles {
    /// Event the particle belongs to
    pub const EVENT_ID: &str = "eventid";
    /// PDG code
    pub const PID: &str = "pid";
    /// Particle name (16 bytes, NUL padded)
    pub const NAME: &str = "name";
    /// Rest mass (GeV)
    pub const MASS: &str = "mass";
    /// Prefix of the creation-point kinematics columns
    pub const VERTEX: &str = "vtx";
    /// Prefix of the boundary-crossing kinematics columns
    pub const BOUNDARY: &str = "boundary";
    /// Suffixes of one kinematics group, in column order
    pub const KINEMATICS: [&str; 7] = ["KE", "x", "y", "z", "px", "py", "pz"];
}

/// Column names of the `runs` table written when merging bundles
pub mod runs {
    /// First row of this run in the merged `events` table
    pub const EVENT_FIRST: &str = "event_first";
    /// Number of events contributed by this run
    pub const EVENT_SIZE: &str = "event_size";
    /// First row of this run in the merged `particles` table
    pub const PARTICLE_FIRST: &str = "particle_first";
    /// Number of particles contributed by this run
    pub const PARTICLE_SIZE: &str = "particle_size";
    /// Path of the input bundle (64 bytes)
    pub const FILE_PATH: &str = "file_path";
    /// Secondary cutoff of the run (GeV)
    pub const CUTOFF: &str = "cutoff";
    /// Random seed of the run
    pub const SEED: &str = "seed";
    /// Model description file (32 bytes)
    pub const MODEL_FILE: &str = "model_file";
    /// CRC32 of the model description
    pub const MODEL_CRC: &str = "model_crc";
}
