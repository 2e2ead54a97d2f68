//! Run configuration.
//!
//! Settings can be given in a TOML file instead of command-line flags:
//!
//! ```toml
//! # run.toml
//! [run]
//! output = "run42.bundle"
//! seed = 42
//! events = 1000
//! cutoff = 10.0              # MeV
//! acceptance_radius = 6400.0 # km
//! track_log = "run42.tracks.log"
//! model_file = "atmosphere.txt"
//! event = "pid=2212,E=100,aoi=0.5"
//!
//! [buffers]
//! events = 100
//! particles = 500
//! ```
//!
//! The primary particle is described by a compact event string, see
//! [`EventConfig::parse`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::recorder::{RecorderConfig, GEV};
use crate::table::TableConfig;

/// Default PDG code of the primary (proton)
pub const DEFAULT_PID: i32 = 2212;

/// Errors from loading a run configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unexpected keys
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The `event` string is invalid
    #[error("Invalid event string: {0}")]
    Event(#[from] EventConfigError),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root of a run configuration file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Run settings
    #[serde(default)]
    pub run: RunSection,

    /// Table buffering
    #[serde(default)]
    pub buffers: BufferSection,
}

/// The `[run]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Output bundle directory
    pub output: Option<PathBuf>,
    /// Random seed
    pub seed: Option<i32>,
    /// Number of events to simulate
    pub events: Option<u32>,
    /// Secondary cutoff (MeV)
    pub cutoff: Option<f64>,
    /// Acceptance radius (km)
    pub acceptance_radius: Option<f64>,
    /// Tracking log file
    pub track_log: Option<PathBuf>,
    /// Model description file
    pub model_file: Option<PathBuf>,
    /// Primary particle, e.g. `pid=2212,E=100,aoi=0.5`
    pub event: Option<String>,
}

/// The `[buffers]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BufferSection {
    /// Capacity of the `events` table buffer
    pub events: Option<usize>,
    /// Capacity of the `particles` table buffer
    pub particles: Option<usize>,
}

impl RunConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Recorder configuration described by this file
    pub fn recorder_config(&self) -> Result<RecorderConfig, ConfigError> {
        let cutoff = self.run.cutoff.unwrap_or(0.0);
        if cutoff.is_nan() || cutoff < 0.0 {
            return Err(ConfigError::Invalid(format!("cutoff must be >= 0, got {}", cutoff)));
        }
        if let Some(radius) = self.run.acceptance_radius {
            if radius.is_nan() || radius <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "acceptance_radius must be > 0, got {}",
                    radius
                )));
            }
        }

        let capacity = |value: Option<usize>, default: TableConfig, name: &str| match value {
            Some(0) => Err(ConfigError::Invalid(format!("buffers.{} must be > 0", name))),
            Some(n) => Ok(TableConfig::with_capacity(n)),
            None => Ok(default),
        };

        Ok(RecorderConfig {
            cutoff,
            acceptance_radius: self.run.acceptance_radius,
            events: capacity(self.buffers.events, TableConfig::events(), "events")?,
            particles: capacity(self.buffers.particles, TableConfig::particles(), "particles")?,
        })
    }

    /// The primary particle, if configured
    pub fn event_config(&self) -> Result<Option<EventConfig>, ConfigError> {
        Ok(self.run.event.as_deref().map(EventConfig::parse).transpose()?)
    }
}

impl FromStr for RunConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

/// Error from [`EventConfig::parse`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (event `{event}`, token `{token}`)")]
pub struct EventConfigError {
    /// What is wrong
    pub message: String,
    /// The full event string
    pub event: String,
    /// The offending `name=value` token, or `<no token>`
    pub token: String,
}

impl EventConfigError {
    fn new(message: &str, event: &str, token: Option<&str>) -> Self {
        Self {
            message: message.to_string(),
            event: event.to_string(),
            token: token.unwrap_or("<no token>").to_string(),
        }
    }
}

/// Primary particle settings parsed from `pid=..,E=..,aoi=..,n=..`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventConfig {
    /// PDG code, default 2212
    pub pid: i32,
    /// Energy (MeV); the event string gives it in GeV
    pub energy: f64,
    /// Angle-of-incidence parameter in `[0, 1]`
    pub aoi: f64,
    /// Number of events, default 1
    pub n: u32,
}

impl EventConfig {
    /// Parse a comma-separated list of `name=value` tokens.
    ///
    /// `E` (GeV, non-negative) and `aoi` (in `[0, 1]`) are required; `pid`
    /// defaults to 2212 and `n` (positive) to 1. Later tokens override earlier
    /// ones.
    pub fn parse(event: &str) -> Result<Self, EventConfigError> {
        let mut pid = DEFAULT_PID;
        let mut n = 1;
        let mut energy = None;
        let mut aoi = None;

        for token in event.split(',') {
            let err = |message: &str| EventConfigError::new(message, event, Some(token));
            let (name, value) = match token.split('=').collect::<Vec<_>>().as_slice() {
                [name, value] => (name.trim(), value.trim()),
                _ => return Err(err("bad token - not in the form 'name=value'")),
            };

            match name {
                "E" => {
                    let e: f64 = value.parse().map_err(|_| err("E is not a number"))?;
                    if !e.is_finite() {
                        return Err(err("E must be finite"));
                    }
                    if e < 0.0 {
                        return Err(err("E cannot be negative"));
                    }
                    energy = Some(e * GEV);
                }
                "aoi" => {
                    let a: f64 = value.parse().map_err(|_| err("aoi is not a number"))?;
                    if !(0.0..=1.0).contains(&a) {
                        return Err(err("aoi has to be between 0 and 1"));
                    }
                    aoi = Some(a);
                }
                "pid" => {
                    pid = value.parse().map_err(|_| err("pid is not an integer"))?;
                }
                "n" => {
                    let count: i64 = value.parse().map_err(|_| err("n is not an integer"))?;
                    if count <= 0 {
                        return Err(err("n has to be greater than zero"));
                    }
                    n = u32::try_from(count).map_err(|_| err("n is too large"))?;
                }
                _ => return Err(err("bad token - invalid name")),
            }
        }

        match (energy, aoi) {
            (Some(energy), Some(aoi)) => Ok(Self { pid, energy, aoi, n }),
            _ => Err(EventConfigError::new("E or aoi not set", event, None)),
        }
    }
}

impl FromStr for EventConfig {
    type Err = EventConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EventConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EventConfig(pid={}, E[GeV]={}, aoi={}, n={})",
            self.pid,
            self.energy / GEV,
            self.aoi,
            self.n
        )
    }
}
