//! A small seeded transport kernel.
//!
//! Particles travel through a spherical atmosphere shell between the ground
//! ([`GROUND_RADIUS`]) and the top of the world ([`WORLD_RADIUS`]). Each step
//! has an exponentially distributed length; a step that ends inside the shell
//! is an interaction that loses energy and may emit secondaries. Tracks end on
//! leaving the world, on reaching the ground or when they run out of energy.
//!
//! The physics is made up. It exists to drive a [`Recorder`](crate::recorder::Recorder)
//! through the same callback sequence a real transport engine produces:
//!
//! ```text
//! on_event_begin
//!   on_track_created (primary)
//!   on_track_begin
//!     on_step ... (secondary list grows, recorder culls new entries)
//!   on_track_ended
//!   on_track_created (each surviving secondary), stacked LIFO
//!   ...
//! on_event_end
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EventConfig;
use crate::recorder::{
    Classification, EventHandler, EventInfo, RecorderError, StackingHandler, StepStatus,
    SteppingHandler, TrackState, TrackingHandler, Vec3, KM, MEV,
};

/// Radius of the ground sphere (mm)
pub const GROUND_RADIUS: f64 = 6371.0 * KM;

/// Radius of the world boundary (mm)
pub const WORLD_RADIUS: f64 = 6471.0 * KM;

/// Depth of the primary vertex below the world boundary (mm)
pub const GUN_DEPTH: f64 = 1.0 * KM;

const MEAN_FREE_PATH: f64 = 8.0 * KM;
const STOP_ENERGY: f64 = 1.0 * MEV;
const PRODUCTION_THRESHOLD: f64 = 0.1 * MEV;
const MAX_STEPS: u32 = 10_000;
const SECONDARY_PROBABILITY: f64 = 0.6;
const MAX_SCATTER: f64 = 0.15;

/// A particle species known to the kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Species {
    /// PDG code
    pub pdg: i32,
    /// Particle name
    pub name: &'static str,
    /// Rest mass (MeV)
    pub mass: f64,
}

const SPECIES: [Species; 11] = [
    Species { pdg: 2212, name: "proton", mass: 938.272 },
    Species { pdg: 2112, name: "neutron", mass: 939.565 },
    Species { pdg: 211, name: "pi+", mass: 139.570 },
    Species { pdg: -211, name: "pi-", mass: 139.570 },
    Species { pdg: 111, name: "pi0", mass: 134.977 },
    Species { pdg: 22, name: "gamma", mass: 0.0 },
    Species { pdg: 11, name: "e-", mass: 0.511 },
    Species { pdg: -11, name: "e+", mass: 0.511 },
    Species { pdg: 13, name: "mu-", mass: 105.658 },
    Species { pdg: -13, name: "mu+", mass: 105.658 },
    Species { pdg: 12, name: "nu_e", mass: 0.0 },
];

/// Secondaries: species index into `SPECIES` and creator process
const PRODUCTS: [(usize, &str); 8] = [
    (5, "eBrem"),
    (6, "eIoni"),
    (7, "conv"),
    (2, "hadElastic"),
    (3, "protonInelastic"),
    (1, "neutronInelastic"),
    (8, "Decay"),
    (10, "Decay"),
];

/// Look up a species by PDG code
pub fn species(pdg: i32) -> Option<Species> {
    SPECIES.iter().copied().find(|s| s.pdg == pdg)
}

/// A kernel that can drive all four recorder callbacks
pub trait KernelHandler:
    EventHandler
    + StackingHandler<TrackState>
    + SteppingHandler<TrackState>
    + TrackingHandler<TrackState>
{
}

impl<H> KernelHandler for H where
    H: EventHandler
        + StackingHandler<TrackState>
        + SteppingHandler<TrackState>
        + TrackingHandler<TrackState>
{
}

/// Counters of one simulated event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSummary {
    /// Tracks transported
    pub tracks: usize,
    /// Steps taken over all tracks
    pub steps: usize,
    /// Tracks that left through the world boundary
    pub escaped: usize,
}

/// Seeded synthetic transport kernel
#[derive(Debug)]
pub struct SyntheticKernel {
    rng: StdRng,
    next_id: i32,
}

impl SyntheticKernel {
    /// Create a kernel; the same seed always produces the same events
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Distance of the primary vertex from the origin (mm)
    pub fn gun_radius(&self) -> f64 {
        WORLD_RADIUS - GUN_DEPTH
    }

    /// Short description of the model constants, used for the model checksum
    pub fn describe() -> String {
        format!(
            "synthetic shell ground={}mm world={}mm mfp={}mm stop={}MeV",
            GROUND_RADIUS, WORLD_RADIUS, MEAN_FREE_PATH, STOP_ENERGY
        )
    }

    /// Simulate one event of the primary described by `primary`.
    ///
    /// `aoi` is the sine of the zenith angle: 0 is vertical incidence.
    pub fn run_event<H: KernelHandler>(
        &mut self,
        handler: &mut H,
        event_id: u32,
        particle: Species,
        primary: &EventConfig,
    ) -> Result<EventSummary, RecorderError> {
        self.next_id = 0;
        let cos_zenith = (1.0 - primary.aoi * primary.aoi).max(0.0).sqrt();
        let direction = Vec3::new(primary.aoi, 0.0, -cos_zenith);
        let position = Vec3::new(0.0, 0.0, self.gun_radius());

        handler.on_event_begin(
            event_id,
            &EventInfo {
                pid: particle.pdg,
                total_energy: primary.energy + particle.mass,
                kinetic_energy: primary.energy,
                incidence: primary.aoi,
            },
        )?;

        let track = TrackState::new(
            self.new_id(),
            0,
            particle.pdg,
            particle.name,
            particle.mass,
            primary.energy,
            position,
            direction,
        );

        let mut summary = EventSummary::default();
        let mut urgent = Vec::new();
        let mut waiting = Vec::new();
        classify(handler, track, &mut urgent, &mut waiting);

        loop {
            let mut track = match urgent.pop() {
                Some(track) => track,
                None if !waiting.is_empty() => {
                    urgent.append(&mut waiting);
                    continue;
                }
                None => break,
            };

            handler.on_track_begin(&track);
            let mut secondaries = Vec::new();
            let status = loop {
                let status = self.step(&mut track, &mut secondaries);
                handler.on_step(&track, status, &mut secondaries)?;
                if status != StepStatus::Process {
                    break status;
                }
            };
            handler.on_track_ended(&track, status)?;

            summary.tracks += 1;
            summary.steps += track.steps as usize;
            if status == StepStatus::WorldBoundary {
                summary.escaped += 1;
            }
            // stacked in reverse so the first secondary is transported first
            for secondary in secondaries.into_iter().rev() {
                classify(handler, secondary, &mut urgent, &mut waiting);
            }
        }

        handler.on_event_end()?;
        Ok(summary)
    }

    fn new_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Advance `track` by one step and append any secondaries it emits
    fn step(&mut self, track: &mut TrackState, secondaries: &mut Vec<TrackState>) -> StepStatus {
        track.steps += 1;
        let length = -self.rng.gen_range(f64::EPSILON..1.0f64).ln() * MEAN_FREE_PATH;

        let to_world = exit_distance(track.position, track.direction, WORLD_RADIUS);
        let to_ground = entry_distance(track.position, track.direction, GROUND_RADIUS);

        if let Some(t) = to_ground.filter(|&t| t <= length && t < to_world) {
            track.position = track.position + track.direction * t;
            return StepStatus::GeometryBoundary;
        }
        if length >= to_world {
            track.position = track.position + track.direction * to_world;
            return StepStatus::WorldBoundary;
        }

        track.position = track.position + track.direction * length;
        let lost = track.kinetic_energy * self.rng.gen_range(0.05..0.3);
        track.kinetic_energy -= lost;

        if self.rng.gen_bool(SECONDARY_PROBABILITY) {
            let count = self.rng.gen_range(1..=3);
            let mut budget = lost * self.rng.gen_range(0.5..0.95);
            for i in 0..count {
                let share = if i + 1 == count {
                    budget
                } else {
                    budget * self.rng.gen_range(0.2..0.8)
                };
                budget -= share;
                if share < PRODUCTION_THRESHOLD {
                    continue;
                }
                let (index, process) = PRODUCTS[self.rng.gen_range(0..PRODUCTS.len())];
                let kind = SPECIES[index];
                let direction = self.scatter(track.direction);
                let secondary = TrackState::new(
                    self.new_id(),
                    track.id,
                    kind.pdg,
                    kind.name,
                    kind.mass,
                    share,
                    track.position,
                    direction,
                )
                .created_by(process);
                secondaries.push(secondary);
            }
        }
        track.direction = self.scatter(track.direction);

        if track.kinetic_energy < STOP_ENERGY || track.steps >= MAX_STEPS {
            track.kinetic_energy = track.kinetic_energy.max(0.0);
            return StepStatus::Stopped;
        }
        StepStatus::Process
    }

    /// Deflect `direction` by a small random angle
    fn scatter(&mut self, direction: Vec3) -> Vec3 {
        let kick = Vec3::new(
            self.rng.gen_range(-MAX_SCATTER..MAX_SCATTER),
            self.rng.gen_range(-MAX_SCATTER..MAX_SCATTER),
            self.rng.gen_range(-MAX_SCATTER..MAX_SCATTER),
        );
        let deflected = (direction + kick).unit();
        if deflected.mag() > 0.0 {
            deflected
        } else {
            direction
        }
    }
}

fn classify<H: KernelHandler>(
    handler: &mut H,
    track: TrackState,
    urgent: &mut Vec<TrackState>,
    waiting: &mut Vec<TrackState>,
) {
    match handler.on_track_created(&track) {
        Classification::Urgent => urgent.push(track),
        Classification::Waiting => waiting.push(track),
        Classification::Kill => {}
    }
}

/// Distance along `direction` from `position` (inside the sphere) to its surface
fn exit_distance(position: Vec3, direction: Vec3, radius: f64) -> f64 {
    let b = position.dot(direction);
    let c = position.dot(position) - radius * radius;
    let disc = (b * b - c).max(0.0);
    (-b + disc.sqrt()).max(0.0)
}

/// Distance along `direction` from `position` (outside the sphere) to its surface,
/// if the ray hits it
fn entry_distance(position: Vec3, direction: Vec3, radius: f64) -> Option<f64> {
    let b = position.dot(direction);
    let c = position.dot(position) - radius * radius;
    let disc = b * b - c;
    if b >= 0.0 || disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{Recorder, RecorderConfig};
    use crate::schema::{EVENTS_TABLE, PARTICLES_TABLE};
    use crate::storage::MemoryBackend;

    fn run(seed: u64, cutoff: f64, events: u32) -> (MemoryBackend, Vec<EventSummary>) {
        let primary = EventConfig::parse("E=5,aoi=0.3").unwrap();
        let proton = species(2212).unwrap();
        let mut kernel = SyntheticKernel::new(seed);
        let mut recorder =
            Recorder::new(MemoryBackend::new(), RecorderConfig::with_cutoff(cutoff)).unwrap();
        let summaries = (0..events)
            .map(|id| kernel.run_event(&mut recorder, id, proton, &primary).unwrap())
            .collect();
        let (backend, _) = recorder.finish().unwrap();
        (backend, summaries)
    }

    #[test]
    fn test_same_seed_same_output() {
        let (a, sa) = run(11, 10.0, 3);
        let (b, sb) = run(11, 10.0, 3);
        assert_eq!(sa, sb);
        assert!(a.same_contents(&b));
        assert_eq!(a.rows(EVENTS_TABLE), 3);
    }

    #[test]
    fn test_crossings_lie_on_world_boundary() {
        let (backend, summaries) = run(3, 1.0, 5);
        let escaped: usize = summaries.iter().map(|s| s.escaped).sum();
        assert_eq!(backend.rows(PARTICLES_TABLE), escaped);

        if let Some(table) = backend.table(PARTICLES_TABLE) {
            let ledger = crate::ledger::ParticleLedger::new(Default::default()).unwrap();
            for record in table.records() {
                let particle = ledger.decode(&record).unwrap();
                assert!((particle.boundary.radius() - WORLD_RADIUS / KM).abs() < 1e-6);
                assert!(particle.boundary.ke <= particle.vertex.ke);
            }
        }
    }

    #[test]
    fn test_higher_cutoff_transports_fewer_tracks() {
        let (_, low) = run(5, 0.0, 2);
        let (_, high) = run(5, 10_000.0, 2);
        let tracks = |s: &[EventSummary]| s.iter().map(|e| e.tracks).sum::<usize>();
        assert!(tracks(&high) <= tracks(&low));
        // no secondary of a 5 GeV primary passes a 10 GeV cutoff
        assert!(high.iter().all(|e| e.tracks == 1));
    }

    #[test]
    fn test_ray_sphere_distances() {
        let up = Vec3::new(0.0, 0.0, 1.0);
        let down = Vec3::new(0.0, 0.0, -1.0);
        let p = Vec3::new(0.0, 0.0, 5.0);
        assert!((exit_distance(p, up, 10.0) - 5.0).abs() < 1e-12);
        assert!((exit_distance(p, down, 10.0) - 15.0).abs() < 1e-12);
        assert_eq!(entry_distance(Vec3::new(0.0, 0.0, 8.0), down, 3.0), Some(5.0));
        assert_eq!(entry_distance(Vec3::new(0.0, 0.0, 8.0), up, 3.0), None);
    }
}
