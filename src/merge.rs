//! Merging several run bundles into one.
//!
//! The merged bundle holds the concatenated `events` and `particles` tables
//! plus a `runs` table with one row per input:
//!
//! ```text
//! runs[i].event_first     first row of input i in `events`
//! runs[i].particle_first  first row of input i in `particles`
//! ```
//!
//! Event ids are shifted by the number of events of the preceding inputs and
//! `events.first` by the number of preceding particles, so every event still
//! points at its own slice of `particles`.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::ledger::{EventLedger, ParticleLedger, RunLedger, RunRecord};
use crate::reader::{BundleReader, ReaderError};
use crate::schema::{FixedStr, ATTR_CUTOFF, ATTR_MODEL_CRC, ATTR_MODEL_FILE, ATTR_SEED};
use crate::storage::{BundleConfig, BundleStats, ParquetBundle, StorageError};
use crate::table::{TableConfig, TableError};

/// `model_file` of a run whose attributes could not be read
pub const MERGE_ERROR_MODEL: &str = "<MERGE ERROR>";

/// Rows copied per ledger flush
const MERGE_CAPACITY: usize = 4096;

/// Errors from [`merge_runs`]
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// No input bundles were given
    #[error("No input bundles given")]
    NoInputs,

    /// An input could not be read
    #[error("Failed to read {path}: {source}")]
    Input {
        /// Input bundle
        path: PathBuf,
        /// Underlying error
        source: ReaderError,
    },

    /// Writing the merged bundle failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Writing a merged table failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Shifted ids no longer fit the 32-bit columns
    #[error("Row index overflow while merging {path}: {value} does not fit in u32")]
    IndexOverflow {
        /// Input bundle
        path: PathBuf,
        /// Value that overflowed
        value: u64,
    },
}

/// Summary of a merge
#[derive(Debug, Clone)]
pub struct MergeStats {
    /// One row per input, as written to `runs`
    pub runs: Vec<RunRecord>,
    /// Inputs whose attributes were incomplete
    pub incomplete: usize,
    /// The finished output bundle
    pub bundle: BundleStats,
}

impl MergeStats {
    /// Total events merged
    pub fn events(&self) -> u64 {
        self.runs.iter().map(|r| r.event_size).sum()
    }

    /// Total particles merged
    pub fn particles(&self) -> u64 {
        self.runs.iter().map(|r| r.particle_size).sum()
    }
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Merged {} runs: {} events, {} particles",
            self.runs.len(),
            self.events(),
            self.particles()
        )?;
        if self.incomplete > 0 {
            writeln!(f, "  {} runs with missing attributes", self.incomplete)?;
        }
        write!(f, "{}", self.bundle)
    }
}

/// Run attributes of one input, or `None` if any is missing
fn run_attributes(reader: &BundleReader) -> Option<(f64, i32, String, u32)> {
    let attrs = reader.attributes();
    let cutoff = attrs.get(ATTR_CUTOFF)?.as_f64()?;
    let seed = attrs.get(ATTR_SEED)?.as_i32()?;
    let model_file = attrs.get(ATTR_MODEL_FILE)?.as_str()?.to_string();
    let model_crc = attrs.get(ATTR_MODEL_CRC)?.as_u32()?;
    Some((cutoff, seed, model_file, model_crc))
}

fn shift(value: u32, offset: u64, path: &Path) -> Result<u32, MergeError> {
    let shifted = u64::from(value) + offset;
    u32::try_from(shifted).map_err(|_| MergeError::IndexOverflow {
        path: path.to_path_buf(),
        value: shifted,
    })
}

/// Merge `inputs` in order into a new bundle at `output`.
///
/// Inputs missing any of the `cutoff`, `seed`, `model_file` or `model_crc`
/// attributes are still merged; their `runs` row gets `model_file =
/// "<MERGE ERROR>"`, `cutoff = NaN` and zero `seed` and `model_crc`.
pub fn merge_runs<P: AsRef<Path>>(
    inputs: &[P],
    output: &Path,
    config: BundleConfig,
) -> Result<MergeStats, MergeError> {
    if inputs.is_empty() {
        return Err(MergeError::NoInputs);
    }

    let mut bundle = ParquetBundle::create(output, config)?;
    let table_config = TableConfig::with_capacity(MERGE_CAPACITY);
    let mut runs = RunLedger::new(TableConfig::default())?;
    let mut events = EventLedger::new(table_config)?;
    let mut particles = ParticleLedger::new(table_config)?;

    let mut event_offset = 0u64;
    let mut particle_offset = 0u64;
    let mut merged = Vec::with_capacity(inputs.len());
    let mut incomplete = 0;

    for input in inputs {
        let path = input.as_ref();
        let read_err = |source| MergeError::Input {
            path: path.to_path_buf(),
            source,
        };
        info!("Reading: {}", path.display());
        let reader = BundleReader::open(path).map_err(read_err)?;
        let input_events = reader.read_events().map_err(read_err)?;
        let input_particles = reader.read_particles().map_err(read_err)?;

        let (cutoff, seed, model_file, model_crc) = match run_attributes(&reader) {
            Some(attrs) => attrs,
            None => {
                warn!("Missing run attributes in {}", path.display());
                incomplete += 1;
                (f64::NAN, 0, MERGE_ERROR_MODEL.to_string(), 0)
            }
        };
        let run = RunRecord {
            event_first: event_offset,
            event_size: input_events.len() as u64,
            particle_first: particle_offset,
            particle_size: input_particles.len() as u64,
            file_path: FixedStr::new(&path.display().to_string()),
            cutoff,
            seed,
            model_file: FixedStr::new(&model_file),
            model_crc,
        };
        runs.write(&run, &mut bundle)?;

        for mut event in input_events {
            event.id = shift(event.id, event_offset, path)?;
            event.first = shift(event.first, particle_offset, path)?;
            events.write(&event, &mut bundle)?;
        }
        for mut particle in input_particles {
            particle.event_id = shift(particle.event_id, event_offset, path)?;
            particles.write(&particle, &mut bundle)?;
        }
        info!(
            " > copied {} events and {} particles",
            run.event_size, run.particle_size
        );

        event_offset += run.event_size;
        particle_offset += run.particle_size;
        merged.push(run);
    }

    runs.close(&mut bundle)?;
    events.close(&mut bundle)?;
    particles.close(&mut bundle)?;

    Ok(MergeStats {
        runs: merged,
        incomplete,
        bundle: bundle.finish()?,
    })
}
