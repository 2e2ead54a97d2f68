//! Optional plain-text audit trail of track creation, stepping and secondary
//! culling.
//!
//! The log never influences filtering or persisted data. When disabled every
//! call returns after a single branch. An I/O error disables the log with a
//! warning instead of aborting the run.
//!
//! Line formats (energies in MeV, radii in km):
//!
//! ```text
//! PreTrack [7]
//! CLASSIFY: 7,12,22,gamma,4.2,6371.001,eBrem
//!  |-- Step(7) 3 secs=2 process
//!  |    - 12,22,gamma,4.2,6371.001,eBrem
//!  |    - 13,11,e-,0.03,6371.001,eIoni [REMOVED]
//! PostTrack[7] step=5 [BOUNDARY]
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::warn;

use crate::recorder::{to_km, StepStatus, TrackView};

const NO_CREATOR: &str = "[NO CREATOR]";

/// Text diagnostic stream for track processing
pub struct TrackingLog {
    out: Option<Box<dyn Write + Send>>,
}

impl TrackingLog {
    /// A log that records nothing
    pub fn disabled() -> Self {
        Self { out: None }
    }

    /// Log to a newly created file
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::to_writer(BufWriter::new(file)))
    }

    /// Log to any writer
    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Some(Box::new(writer)),
        }
    }

    /// True while lines are being recorded
    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    /// A track is about to be transported
    pub fn pre_tracking<T: TrackView>(&mut self, track: &T) {
        if self.out.is_none() {
            return;
        }
        self.line(format_args!("PreTrack [{}]", track.track_id()));
    }

    /// A track finished transport
    pub fn post_tracking<T: TrackView>(&mut self, track: &T, on_boundary: bool) {
        if self.out.is_none() {
            return;
        }
        self.line(format_args!(
            "PostTrack[{}] step={}{}",
            track.track_id(),
            track.step_number(),
            if on_boundary { " [BOUNDARY]" } else { "" }
        ));
        self.flush();
    }

    /// A new track was classified
    pub fn classification<T: TrackView>(&mut self, track: &T) {
        if self.out.is_none() {
            return;
        }
        self.line(format_args!(
            "CLASSIFY: {},{},{},{},{},{},{}",
            track.parent_id(),
            track.track_id(),
            track.pdg(),
            track.particle_name(),
            track.kinetic_energy(),
            to_km(track.position().mag()),
            track.creator_process().unwrap_or(NO_CREATOR)
        ));
    }

    /// A step finished with `secondaries` entries in the secondary list
    pub fn stepping<T: TrackView>(&mut self, track: &T, status: StepStatus, secondaries: usize) {
        if self.out.is_none() {
            return;
        }
        self.line(format_args!(
            " |-- Step({}) {} secs={} {}",
            track.track_id(),
            track.step_number(),
            secondaries,
            status
        ));
    }

    /// A secondary was evaluated against the cutoff
    pub fn step_secondary<T: TrackView>(&mut self, track: &T, removed: bool) {
        if self.out.is_none() {
            return;
        }
        self.line(format_args!(
            " |    - {},{},{},{},{},{}{}",
            track.track_id(),
            track.pdg(),
            track.particle_name(),
            track.kinetic_energy(),
            to_km(track.position().mag()),
            track.creator_process().unwrap_or(NO_CREATOR),
            if removed { " [REMOVED]" } else { "" }
        ));
    }

    /// Flush buffered lines
    pub fn flush(&mut self) {
        if let Some(out) = self.out.as_mut() {
            if let Err(e) = out.flush() {
                self.fail(e);
            }
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Some(out) = self.out.as_mut() {
            if let Err(e) = writeln!(out, "{}", args) {
                self.fail(e);
            }
        }
    }

    fn fail(&mut self, err: std::io::Error) {
        warn!("Tracking log disabled after write error: {}", err);
        self.out = None;
    }
}

impl Default for TrackingLog {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for TrackingLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingLog")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Drop for TrackingLog {
    fn drop(&mut self) {
        self.flush();
    }
}
