use serde::Serialize;

use crate::schema::{FixedStr, FILE_PATH_LEN, MODEL_FILE_LEN, PARTICLE_NAME_LEN};

/// Particle name as stored in the `particles` table
pub type ParticleName = FixedStr<PARTICLE_NAME_LEN>;

/// Kinetic energy, position and momentum direction at one point of a track.
///
/// Persisted units: GeV and km. The direction is a unit vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kinematics {
    /// Kinetic energy (GeV)
    pub ke: f64,
    /// Position x (km)
    pub x: f64,
    /// Position y (km)
    pub y: f64,
    /// Position z (km)
    pub z: f64,
    /// Momentum direction x
    pub px: f64,
    /// Momentum direction y
    pub py: f64,
    /// Momentum direction z
    pub pz: f64,
}

impl Kinematics {
    /// Distance from the origin (km)
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Summary of one simulated event, one row of the `events` table.
///
/// `first..first + size` indexes the rows of the `particles` table written
/// for this event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EventRecord {
    /// Event number assigned by the kernel
    pub id: u32,
    /// Row count of the particle table when the event began
    pub first: u32,
    /// Boundary crossings persisted for this event
    pub size: u32,
    /// Boundary crossings rejected by the acceptance radius
    pub discarded: u32,
    /// PDG code of the primary particle
    pub pid: i32,
    /// Total energy of the primary (GeV)
    pub energy: f64,
    /// Kinetic energy of the primary (GeV)
    pub kinetic_energy: f64,
    /// Incidence parameter of the primary
    pub incidence: f64,
}

/// One persisted boundary crossing, one row of the `particles` table
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParticleRecord {
    /// Event the crossing belongs to
    pub event_id: u32,
    /// PDG code
    pub pid: i32,
    /// Particle name, truncated to 15 bytes
    #[serde(serialize_with = "serialize_name")]
    pub name: ParticleName,
    /// Rest mass (GeV)
    pub mass: f64,
    /// Kinematics where the track was created
    pub vertex: Kinematics,
    /// Kinematics where the track left the world volume
    pub boundary: Kinematics,
}

fn serialize_name<S: serde::Serializer>(name: &ParticleName, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&name.as_str())
}

/// One input run of a merged bundle, one row of the `runs` table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRecord {
    /// First row of this run in the merged `events` table
    pub event_first: u64,
    /// Events contributed by this run
    pub event_size: u64,
    /// First row of this run in the merged `particles` table
    pub particle_first: u64,
    /// Particles contributed by this run
    pub particle_size: u64,
    /// Input bundle path, truncated to 63 bytes
    pub file_path: FixedStr<FILE_PATH_LEN>,
    /// Secondary cutoff (GeV), NaN when the input did not record it
    pub cutoff: f64,
    /// Random seed, 0 when the input did not record it
    pub seed: i32,
    /// Model description file, truncated to 31 bytes
    pub model_file: FixedStr<MODEL_FILE_LEN>,
    /// CRC32 of the model description
    pub model_crc: u32,
}
