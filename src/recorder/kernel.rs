//! Interface between the transport kernel and the recorder.
//!
//! The kernel owns tracks and drives the recorder through four handler traits,
//! in a fixed nesting order:
//!
//! ```text
//! on_event_begin
//!   on_track_created*          (stacking: every new track)
//!   on_track_begin
//!     on_step*                 (stepping: with the track's secondary list)
//!   on_track_ended
//!   ...
//! on_event_end
//! ```
//!
//! Energies are in MeV and lengths in mm.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use super::RecorderError;

/// Three-vector in kernel units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    /// x component
    pub x: f64,
    /// y component
    pub y: f64,
    /// z component
    pub z: f64,
}

impl Vec3 {
    /// Create a vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    pub fn mag(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Dot product
    pub fn dot(&self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Unit vector in the same direction; the zero vector stays zero
    pub fn unit(&self) -> Vec3 {
        let mag = self.mag();
        if mag == 0.0 {
            *self
        } else {
            *self * (1.0 / mag)
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step ended on the outer surface of the world volume
    WorldBoundary,
    /// The step ended on an inner volume boundary
    GeometryBoundary,
    /// The step was limited by a physics process
    Process,
    /// The track was stopped or killed
    Stopped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WorldBoundary => "world-boundary",
            Self::GeometryBoundary => "geometry-boundary",
            Self::Process => "process",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Stacking decision for a newly created track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Simulate the track
    Urgent,
    /// Simulate the track after the urgent stack is empty
    Waiting,
    /// Drop the track
    Kill,
}

/// Primary particle of an event, in kernel units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventInfo {
    /// PDG code of the primary
    pub pid: i32,
    /// Total energy (MeV)
    pub total_energy: f64,
    /// Kinetic energy (MeV)
    pub kinetic_energy: f64,
    /// Incidence parameter
    pub incidence: f64,
}

/// Read-only view of a track
pub trait TrackView {
    /// Track id, unique within an event
    fn track_id(&self) -> i32;
    /// Id of the producing track, 0 for primaries
    fn parent_id(&self) -> i32;
    /// PDG code
    fn pdg(&self) -> i32;
    /// Particle name
    fn particle_name(&self) -> &str;
    /// Rest mass (MeV)
    fn mass(&self) -> f64;
    /// Current kinetic energy (MeV)
    fn kinetic_energy(&self) -> f64;
    /// Current total energy (MeV)
    fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.mass()
    }
    /// Current position (mm)
    fn position(&self) -> Vec3;
    /// Current unit momentum direction
    fn momentum_direction(&self) -> Vec3;
    /// Kinetic energy at creation (MeV)
    fn vertex_kinetic_energy(&self) -> f64;
    /// Position at creation (mm)
    fn vertex_position(&self) -> Vec3;
    /// Momentum direction at creation
    fn vertex_momentum_direction(&self) -> Vec3;
    /// Name of the process that created the track, `None` for primaries
    fn creator_process(&self) -> Option<&str>;
    /// Number of steps taken so far
    fn step_number(&self) -> u32;
}

/// Event begin and end callbacks
pub trait EventHandler {
    /// A new event starts
    fn on_event_begin(&mut self, event_id: u32, info: &EventInfo) -> Result<(), RecorderError>;
    /// The current event is complete
    fn on_event_end(&mut self) -> Result<(), RecorderError>;
}

/// Classification of newly created tracks
pub trait StackingHandler<T: TrackView> {
    /// Decide whether the kernel should simulate `track`
    fn on_track_created(&mut self, track: &T) -> Classification;
}

/// Per-step callback
pub trait SteppingHandler<T: TrackView> {
    /// `track` finished a step. `secondaries` is the full list of tracks the
    /// current track produced so far; the handler may remove entries it has not
    /// seen before. Entries seen on an earlier step must be left in place.
    fn on_step(
        &mut self,
        track: &T,
        status: StepStatus,
        secondaries: &mut Vec<T>,
    ) -> Result<(), RecorderError>;
}

/// Track begin and end callbacks
pub trait TrackingHandler<T: TrackView> {
    /// The kernel starts transporting `track`
    fn on_track_begin(&mut self, track: &T);
    /// Transport of `track` ended; `status` is how its last step ended
    fn on_track_ended(&mut self, track: &T, status: StepStatus) -> Result<(), RecorderError>;
}

/// Plain owned track state, for kernels that keep tracks as values
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Track id
    pub id: i32,
    /// Parent track id
    pub parent_id: i32,
    /// PDG code
    pub pdg: i32,
    /// Particle name
    pub name: String,
    /// Rest mass (MeV)
    pub mass: f64,
    /// Kinetic energy (MeV)
    pub kinetic_energy: f64,
    /// Position (mm)
    pub position: Vec3,
    /// Unit momentum direction
    pub direction: Vec3,
    /// Kinetic energy at creation (MeV)
    pub vertex_kinetic_energy: f64,
    /// Position at creation (mm)
    pub vertex_position: Vec3,
    /// Momentum direction at creation
    pub vertex_direction: Vec3,
    /// Creator process name
    pub creator: Option<String>,
    /// Steps taken
    pub steps: u32,
}

impl TrackState {
    /// A fresh track at its creation point
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i32,
        parent_id: i32,
        pdg: i32,
        name: impl Into<String>,
        mass: f64,
        kinetic_energy: f64,
        position: Vec3,
        direction: Vec3,
    ) -> Self {
        Self {
            id,
            parent_id,
            pdg,
            name: name.into(),
            mass,
            kinetic_energy,
            position,
            direction,
            vertex_kinetic_energy: kinetic_energy,
            vertex_position: position,
            vertex_direction: direction,
            creator: None,
            steps: 0,
        }
    }

    /// Set the creator process
    pub fn created_by(mut self, process: impl Into<String>) -> Self {
        self.creator = Some(process.into());
        self
    }
}

impl TrackView for TrackState {
    fn track_id(&self) -> i32 {
        self.id
    }
    fn parent_id(&self) -> i32 {
        self.parent_id
    }
    fn pdg(&self) -> i32 {
        self.pdg
    }
    fn particle_name(&self) -> &str {
        &self.name
    }
    fn mass(&self) -> f64 {
        self.mass
    }
    fn kinetic_energy(&self) -> f64 {
        self.kinetic_energy
    }
    fn position(&self) -> Vec3 {
        self.position
    }
    fn momentum_direction(&self) -> Vec3 {
        self.direction
    }
    fn vertex_kinetic_energy(&self) -> f64 {
        self.vertex_kinetic_energy
    }
    fn vertex_position(&self) -> Vec3 {
        self.vertex_position
    }
    fn vertex_momentum_direction(&self) -> Vec3 {
        self.vertex_direction
    }
    fn creator_process(&self) -> Option<&str> {
        self.creator.as_deref()
    }
    fn step_number(&self) -> u32 {
        self.steps
    }
}
