use std::time::Instant;

use log::{debug, info, warn};

use crate::ledger::{EventLedger, EventRecord, ParticleLedger, ParticleName, ParticleRecord};
use crate::schema::{ATTR_ACCEPTANCE_RADIUS, ATTR_CUTOFF};
use crate::storage::{AttributeValue, StorageBackend};
use crate::tracking_log::TrackingLog;

use super::config::RecorderConfig;
use super::error::RecorderError;
use super::kernel::{
    Classification, EventHandler, EventInfo, StackingHandler, StepStatus, SteppingHandler,
    TrackView, TrackingHandler,
};
use super::stats::RecorderStats;
use super::units::{kinematics, to_gev};

/// Secondary bookkeeping of the track currently being stepped
#[derive(Debug, Clone, Copy, Default)]
struct TrackCursor {
    id: Option<i32>,
    approved: usize,
}

impl TrackCursor {
    fn start(id: i32) -> Self {
        Self {
            id: Some(id),
            approved: 0,
        }
    }
}

/// Receives kernel callbacks and writes the `events` and `particles` tables.
///
/// One recorder implements all four handler traits. It owns the storage
/// backend and both ledgers for the whole run; [`Recorder::finish`] performs
/// the mandatory final flush and hands the backend back.
pub struct Recorder<B: StorageBackend> {
    backend: B,
    config: RecorderConfig,
    events: EventLedger,
    particles: ParticleLedger,
    event: Option<EventRecord>,
    track: TrackCursor,
    log: TrackingLog,
    started: Instant,
    stats: RecorderStats,
}

impl<B: StorageBackend> Recorder<B> {
    /// Create a recorder writing into `backend`.
    ///
    /// Writes the `cutoff` root attribute (GeV) and, when configured, the
    /// `acceptance_radius` attribute (km).
    pub fn new(mut backend: B, config: RecorderConfig) -> Result<Self, RecorderError> {
        let events = EventLedger::new(config.events)?;
        let particles = ParticleLedger::new(config.particles)?;

        backend.write_attribute(None, ATTR_CUTOFF, AttributeValue::Float(to_gev(config.cutoff)))?;
        if let Some(radius) = config.acceptance_radius {
            backend.write_attribute(None, ATTR_ACCEPTANCE_RADIUS, AttributeValue::Float(radius))?;
        }
        info!(
            "Recorder ready: cutoff {} MeV, acceptance radius {}",
            config.cutoff,
            config
                .acceptance_radius
                .map(|r| format!("{} km", r))
                .unwrap_or_else(|| "off".to_string())
        );

        Ok(Self {
            backend,
            config,
            events,
            particles,
            event: None,
            track: TrackCursor::default(),
            log: TrackingLog::disabled(),
            started: Instant::now(),
            stats: RecorderStats::default(),
        })
    }

    /// Record track diagnostics to `log`
    pub fn with_tracking_log(mut self, log: TrackingLog) -> Self {
        self.log = log;
        self
    }

    /// Write a root attribute of the run
    pub fn write_attribute(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<(), RecorderError> {
        self.backend.write_attribute(None, name, value.into())?;
        Ok(())
    }

    /// Configuration in use
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// The event being recorded, if any
    pub fn current_event(&self) -> Option<&EventRecord> {
        self.event.as_ref()
    }

    /// Secondaries of the current track already evaluated against the cutoff
    pub fn approved_secondaries(&self) -> usize {
        self.track.approved
    }

    /// Ledger of the `events` table
    pub fn event_ledger(&self) -> &EventLedger {
        &self.events
    }

    /// Ledger of the `particles` table
    pub fn particle_ledger(&self) -> &ParticleLedger {
        &self.particles
    }

    /// Storage backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Counters so far
    pub fn stats(&self) -> &RecorderStats {
        &self.stats
    }

    /// Flush both tables and return the backend.
    ///
    /// An event that was begun but never ended is dropped with a warning.
    pub fn finish(mut self) -> Result<(B, RecorderStats), RecorderError> {
        if let Some(event) = self.event.take() {
            warn!("Event {} was never ended and is not recorded", event.id);
        }
        self.stats.events_table = self.events.close(&mut self.backend)?;
        self.stats.particles_table = self.particles.close(&mut self.backend)?;
        self.log.flush();

        info!("{} in {:.3}s", self.stats, self.started.elapsed().as_secs_f64());
        Ok((self.backend, self.stats))
    }

    fn boundary_record<T: TrackView>(&self, event_id: u32, track: &T) -> ParticleRecord {
        ParticleRecord {
            event_id,
            pid: track.pdg(),
            name: ParticleName::new(track.particle_name()),
            mass: to_gev(track.mass()),
            vertex: kinematics(
                track.vertex_kinetic_energy(),
                track.vertex_position(),
                track.vertex_momentum_direction(),
            ),
            boundary: kinematics(
                track.kinetic_energy(),
                track.position(),
                track.momentum_direction(),
            ),
        }
    }
}

impl<B: StorageBackend> EventHandler for Recorder<B> {
    fn on_event_begin(&mut self, event_id: u32, info: &EventInfo) -> Result<(), RecorderError> {
        if let Some(open) = &self.event {
            return Err(RecorderError::EventAlreadyOpen {
                open: open.id,
                requested: event_id,
            });
        }
        let rows = self.particles.nrows();
        let first = u32::try_from(rows).map_err(|_| RecorderError::RowIndexOverflow(rows))?;

        info!(
            "Event {} began at {:.3}s",
            event_id,
            self.started.elapsed().as_secs_f64()
        );
        self.event = Some(EventRecord {
            id: event_id,
            first,
            size: 0,
            discarded: 0,
            pid: info.pid,
            energy: to_gev(info.total_energy),
            kinetic_energy: to_gev(info.kinetic_energy),
            incidence: info.incidence,
        });
        self.track = TrackCursor::default();
        Ok(())
    }

    fn on_event_end(&mut self) -> Result<(), RecorderError> {
        let event = self.event.take().ok_or(RecorderError::NoOpenEvent)?;
        self.events.write(&event, &mut self.backend)?;
        self.stats.events += 1;
        debug!(
            "Event {} ended: {} crossings persisted, {} discarded",
            event.id, event.size, event.discarded
        );
        Ok(())
    }
}

impl<B: StorageBackend, T: TrackView> StackingHandler<T> for Recorder<B> {
    fn on_track_created(&mut self, track: &T) -> Classification {
        self.log.classification(track);
        self.stats.tracks += 1;
        // the cutoff is applied when the producer steps again
        Classification::Urgent
    }
}

impl<B: StorageBackend, T: TrackView> SteppingHandler<T> for Recorder<B> {
    fn on_step(
        &mut self,
        track: &T,
        status: StepStatus,
        secondaries: &mut Vec<T>,
    ) -> Result<(), RecorderError> {
        if self.track.id != Some(track.track_id()) {
            self.track = TrackCursor::start(track.track_id());
        }
        self.log.stepping(track, status, secondaries.len());

        let mark = self.track.approved;
        if secondaries.len() < mark {
            return Err(RecorderError::SecondariesShrunk {
                track: track.track_id(),
                mark,
                len: secondaries.len(),
            });
        }

        let fresh = secondaries.split_off(mark);
        for secondary in fresh {
            let removed = secondary.kinetic_energy() < self.config.cutoff;
            self.log.step_secondary(&secondary, removed);
            if removed {
                self.stats.secondaries_removed += 1;
            } else {
                secondaries.push(secondary);
            }
        }
        self.track.approved = secondaries.len();
        Ok(())
    }
}

impl<B: StorageBackend, T: TrackView> TrackingHandler<T> for Recorder<B> {
    fn on_track_begin(&mut self, track: &T) {
        self.log.pre_tracking(track);
        self.track = TrackCursor::start(track.track_id());
    }

    fn on_track_ended(&mut self, track: &T, status: StepStatus) -> Result<(), RecorderError> {
        let on_boundary = status == StepStatus::WorldBoundary;
        self.log.post_tracking(track, on_boundary);
        self.track = TrackCursor::default();
        if !on_boundary {
            return Ok(());
        }

        let event_id = self.event.as_ref().ok_or(RecorderError::NoOpenEvent)?.id;
        let record = self.boundary_record(event_id, track);
        let accepted = self.config.accepts(record.boundary.radius());
        if accepted {
            self.particles.write(&record, &mut self.backend)?;
            self.stats.particles_written += 1;
        } else {
            self.stats.particles_discarded += 1;
        }

        if let Some(event) = self.event.as_mut() {
            if accepted {
                event.size += 1;
            } else {
                event.discarded += 1;
            }
        }
        Ok(())
    }
}
