//! # trackledger - Event and Boundary-Crossing Ledgers
//!
//! `trackledger` records what leaves a particle transport simulation: one row
//! per event and one row per particle that crosses the world boundary. Rows are
//! fixed-width records buffered in memory and flushed in batches to a storage
//! backend.
//!
//! ## Key Features
//!
//! - **Fixed-width record tables**: a [`schema::Schema`] partitions each row
//!   into typed little-endian fields; [`table::RecordTable`] buffers rows and
//!   creates its table lazily on the first flush.
//!
//! - **Secondary culling**: the [`recorder::Recorder`] removes secondaries
//!   below a kinetic-energy cutoff the next time their producer steps, checking
//!   each secondary exactly once.
//!
//! - **Acceptance shell**: optionally only crossings within 0.1 km of a given
//!   radius are persisted; the rest are counted per event.
//!
//! - **Parquet bundles**: [`storage::ParquetBundle`] writes one Parquet file per
//!   table plus a human-readable `attributes.json`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trackledger::config::EventConfig;
//! use trackledger::recorder::{Recorder, RecorderConfig};
//! use trackledger::storage::{BundleConfig, ParquetBundle};
//! use trackledger::synthetic::{species, SyntheticKernel};
//!
//! let bundle = ParquetBundle::create("run.bundle", BundleConfig::default())?;
//! let mut recorder = Recorder::new(bundle, RecorderConfig::with_cutoff(10.0))?;
//!
//! let primary = EventConfig::parse("pid=2212,E=100,aoi=0.5")?;
//! let proton = species(primary.pid).ok_or("unknown particle")?;
//! let mut kernel = SyntheticKernel::new(42);
//! for event_id in 0..primary.n {
//!     kernel.run_event(&mut recorder, event_id, proton, &primary)?;
//! }
//!
//! let (bundle, stats) = recorder.finish()?;
//! bundle.finish()?;
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! This creates a directory structure:
//! ```text
//! run.bundle/
//! ├── events.parquet       # one row per event
//! ├── particles.parquet    # one row per persisted boundary crossing
//! └── attributes.json      # cutoff, seed, model checksum, ...
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: field types, record layouts, packed records
//! - [`table`]: buffered append-only record tables
//! - [`storage`]: storage backends (Parquet bundle, in-memory)
//! - [`ledger`]: typed event, particle and run records
//! - [`recorder`]: kernel callbacks and filtering
//! - [`tracking_log`]: optional text audit trail of track processing
//! - [`reader`]: reading bundles back
//! - [`merge`]: merging run bundles
//! - [`config`]: TOML run configuration and event strings
//! - [`synthetic`]: a seeded toy transport kernel
//!
//! ## Units
//!
//! | Quantity | Kernel | Persisted |
//! |----------|--------|-----------|
//! | energy | MeV | GeV |
//! | length | mm | km |
//!
//! The cutoff is configured in MeV and stored as the `cutoff` attribute in GeV.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod ledger;
pub mod merge;
pub mod reader;
pub mod recorder;
pub mod schema;
pub mod storage;
pub mod synthetic;
pub mod table;
pub mod tracking_log;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{EventConfig, RunConfig};
    pub use crate::ledger::{
        EventLedger, EventRecord, Kinematics, ParticleLedger, ParticleRecord, RecordLayout,
        RunLedger, RunRecord,
    };
    pub use crate::merge::{merge_runs, MergeError, MergeStats};
    pub use crate::reader::{BundleReader, ReaderConfig, ReaderError, TableInfo};
    pub use crate::recorder::{
        Classification, EventHandler, EventInfo, Recorder, RecorderConfig, RecorderError,
        RecorderStats, StackingHandler, StepStatus, SteppingHandler, TrackState, TrackView,
        TrackingHandler, Vec3,
    };
    pub use crate::schema::{
        columns, FieldSpec, FieldType, FixedStr, Record, Schema, EVENTS_TABLE, PARTICLES_TABLE,
        RUNS_TABLE, TRACKLEDGER_FORMAT_VERSION,
    };
    pub use crate::storage::{
        AttributeValue, BundleConfig, MemoryBackend, ParquetBundle, StorageBackend, StorageError,
    };
    pub use crate::table::{RecordTable, TableConfig, TableError};
    pub use crate::tracking_log::TrackingLog;
}
