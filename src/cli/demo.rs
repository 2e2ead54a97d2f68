use anyhow::{Context, Result};
use clap::Args;
use log::info;
use std::path::PathBuf;

use trackledger::config::{EventConfig, RunConfig};
use trackledger::recorder::{to_km, Recorder};
use trackledger::schema::{ATTR_GUN_RADIUS, ATTR_MODEL_CRC, ATTR_MODEL_FILE, ATTR_SEED};
use trackledger::storage::{BundleConfig, CompressionType, ParquetBundle};
use trackledger::synthetic::{species, SyntheticKernel};
use trackledger::tracking_log::TrackingLog;

/// Primary used when neither `--event` nor the config file names one
const DEFAULT_EVENT: &str = "E=10,aoi=0";

/// `model_file` attribute of runs without a model description file
const SYNTHETIC_MODEL: &str = "<synthetic>";

/// Arguments of the `demo` command
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Output bundle directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of events (default: `n` of the event string)
    #[arg(short = 'n', long)]
    events: Option<u32>,

    /// Random seed (default: drawn at random and recorded)
    #[arg(short, long)]
    seed: Option<i32>,

    /// Secondary cutoff in MeV
    #[arg(long, value_name = "MEV")]
    cutoff: Option<f64>,

    /// Only record crossings within 0.1 km of this radius
    #[arg(long, value_name = "KM")]
    radius: Option<f64>,

    /// Write a tracking log to this file
    #[arg(long, value_name = "FILE")]
    track_log: Option<PathBuf>,

    /// Primary particle, e.g. "pid=2212,E=100,aoi=0.5" (E in GeV)
    #[arg(long, value_name = "EVENT")]
    event: Option<String>,

    /// Model description file checksummed into the run attributes
    #[arg(long, value_name = "FILE")]
    model_file: Option<PathBuf>,

    /// Compression level for ZSTD (1-22, default: 3)
    #[arg(short = 'c', long, default_value = "3")]
    compression_level: i32,
}

/// Simulate synthetic events into a bundle
pub fn run(args: DemoArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RunConfig::default(),
    };

    // command-line flags override the config file
    let section = &mut config.run;
    section.output = args.output.or(section.output.take());
    section.seed = args.seed.or(section.seed);
    section.events = args.events.or(section.events);
    section.cutoff = args.cutoff.or(section.cutoff);
    section.acceptance_radius = args.radius.or(section.acceptance_radius);
    section.track_log = args.track_log.or(section.track_log.take());
    section.model_file = args.model_file.or(section.model_file.take());
    section.event = args.event.or(section.event.take());

    let output = config
        .run
        .output
        .clone()
        .context("No output bundle given (OUTPUT argument or run.output)")?;
    let primary = match config.event_config()? {
        Some(primary) => primary,
        None => EventConfig::parse(DEFAULT_EVENT)?,
    };
    let particle = species(primary.pid)
        .with_context(|| format!("The synthetic kernel has no particle with PDG code {}", primary.pid))?;
    let events = config.run.events.unwrap_or(primary.n);
    let seed = config.run.seed.unwrap_or_else(rand::random);

    let (model_file, model_crc) = match &config.run.model_file {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read model file {}", path.display()))?;
            (path.display().to_string(), crc32fast::hash(&bytes))
        }
        None => (
            SYNTHETIC_MODEL.to_string(),
            crc32fast::hash(SyntheticKernel::describe().as_bytes()),
        ),
    };

    info!("trackledger demo: {} events of {}", events, primary);
    info!("  Seed: {}", seed);
    info!("  Model: {} (crc32 {:08x})", model_file, model_crc);

    let bundle_config = BundleConfig {
        compression: CompressionType::Zstd(args.compression_level),
        ..Default::default()
    };
    let bundle = ParquetBundle::create(&output, bundle_config)
        .with_context(|| format!("Failed to create bundle {}", output.display()))?;

    let mut kernel = SyntheticKernel::new(u64::from(seed as u32));
    let mut recorder = Recorder::new(bundle, config.recorder_config()?)
        .context("Failed to initialize recorder")?;
    if let Some(path) = &config.run.track_log {
        let log = TrackingLog::create(path)
            .with_context(|| format!("Failed to create tracking log {}", path.display()))?;
        recorder = recorder.with_tracking_log(log);
    }

    recorder.write_attribute(ATTR_SEED, seed)?;
    recorder.write_attribute(ATTR_MODEL_FILE, model_file)?;
    recorder.write_attribute(ATTR_MODEL_CRC, model_crc)?;
    recorder.write_attribute(ATTR_GUN_RADIUS, to_km(kernel.gun_radius()))?;

    for event_id in 0..events {
        let summary = kernel
            .run_event(&mut recorder, event_id, particle, &primary)
            .with_context(|| format!("Event {} failed", event_id))?;
        info!(
            "  Event {}: {} tracks, {} steps, {} escaped",
            event_id, summary.tracks, summary.steps, summary.escaped
        );
    }

    let (bundle, stats) = recorder.finish().context("Failed to flush ledgers")?;
    let bundle_stats = bundle.finish().context("Failed to finalize bundle")?;

    println!("{}", stats);
    println!("{}", bundle_stats);
    Ok(())
}
