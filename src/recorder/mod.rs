//! # Event Recorder
//!
//! The [`Recorder`] sits between a particle transport kernel and the two
//! ledgers. It decides per step, per track and per event what is persisted.
//!
//! ## Filtering
//!
//! | Stage | Callback | Rule |
//! |-------|----------|------|
//! | creation | [`StackingHandler::on_track_created`] | always [`Classification::Urgent`] |
//! | step | [`SteppingHandler::on_step`] | new secondaries below the cutoff are removed |
//! | track end | [`TrackingHandler::on_track_ended`] | world-boundary crossings are persisted if within the acceptance shell |
//! | event end | [`EventHandler::on_event_end`] | one [`EventRecord`](crate::ledger::EventRecord) |
//!
//! Each track keeps a high-water mark of secondaries already evaluated; only
//! entries past the mark are checked on the next step. The kernel must treat
//! secondary lists as append-only between steps; a list that shrinks below the
//! mark is reported as [`RecorderError::SecondariesShrunk`].
//!
//! ## Units
//!
//! The kernel works in MeV and mm. The recorder converts to GeV and km before
//! anything reaches a ledger; see [`units`].

mod config;
mod error;
mod kernel;
mod recorder_impl;
mod stats;
pub mod units;


pub use config::{RecorderConfig, ACCEPTANCE_TOLERANCE};
pub use error::RecorderError;
pub use kernel::{
    Classification, EventHandler, EventInfo, StackingHandler, StepStatus, SteppingHandler,
    TrackState, TrackView, TrackingHandler, Vec3,
};
pub use recorder_impl::Recorder;
pub use stats::RecorderStats;
pub use units::{to_gev, to_km, GEV, KM, MEV, MM};
