//! Integration tests for trackledger
//!
//! These tests drive the recorder with the synthetic kernel into Parquet
//! bundles and read the results back.

use std::path::Path;

use tempfile::tempdir;
use trackledger::config::{EventConfig, RunConfig};
use trackledger::merge::merge_runs;
use trackledger::reader::BundleReader;
use trackledger::recorder::{Recorder, RecorderConfig, KM};
use trackledger::schema::{
    ATTR_CUTOFF, ATTR_MODEL_CRC, ATTR_MODEL_FILE, ATTR_SEED, EVENTS_TABLE, PARTICLES_TABLE,
};
use trackledger::storage::{BundleConfig, MemoryBackend, ParquetBundle};
use trackledger::synthetic::{species, SyntheticKernel, WORLD_RADIUS};
use trackledger::table::TableConfig;
use trackledger::tracking_log::TrackingLog;

/// Simulate `events` events into a bundle at `path`
fn simulate(path: &Path, seed: i32, events: u32, config: RecorderConfig) -> RecorderSummary {
    let primary = EventConfig::parse("pid=2212,E=2,aoi=0.4").unwrap();
    let proton = species(primary.pid).unwrap();

    let bundle = ParquetBundle::create(path, BundleConfig::fast_write()).unwrap();
    let mut recorder = Recorder::new(bundle, config).unwrap();
    recorder.write_attribute(ATTR_SEED, seed).unwrap();
    recorder.write_attribute(ATTR_MODEL_FILE, "<synthetic>").unwrap();
    recorder.write_attribute(ATTR_MODEL_CRC, 0x1234_5678u32).unwrap();

    let mut kernel = SyntheticKernel::new(seed as u64);
    let mut escaped = 0;
    for event_id in 0..events {
        escaped += kernel
            .run_event(&mut recorder, event_id, proton, &primary)
            .unwrap()
            .escaped;
    }
    let (bundle, stats) = recorder.finish().unwrap();
    bundle.finish().unwrap();

    RecorderSummary {
        escaped,
        written: stats.particles_written,
    }
}

struct RecorderSummary {
    escaped: usize,
    written: usize,
}

/// Test the complete simulate-read cycle
#[test]
fn test_simulate_read_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.bundle");
    let summary = simulate(&path, 42, 5, RecorderConfig::with_cutoff(5.0));
    assert_eq!(summary.escaped, summary.written);

    let reader = BundleReader::open(&path).unwrap();
    assert_eq!(reader.attributes().get(ATTR_CUTOFF).unwrap().as_f64(), Some(0.005));
    assert_eq!(reader.attributes().get(ATTR_SEED).unwrap().as_i32(), Some(42));

    let events = reader.read_events().unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    for event in &events {
        assert_eq!(event.pid, 2212);
        assert!((event.kinetic_energy - 2.0).abs() < 1e-12);
        assert!((event.energy - event.kinetic_energy - 0.938272).abs() < 1e-9);
        assert_eq!(event.incidence, 0.4);
        assert_eq!(event.discarded, 0);
    }

    // events partition the particles table in order
    let particles = reader.read_particles().unwrap();
    assert_eq!(particles.len(), summary.written);
    let mut next = 0;
    for event in &events {
        assert_eq!(event.first as usize, next);
        let slice = &particles[next..next + event.size as usize];
        assert!(slice.iter().all(|p| p.event_id == event.id));
        next += event.size as usize;
    }
    assert_eq!(next, particles.len());

    for particle in &particles {
        assert!((particle.boundary.radius() - WORLD_RADIUS / KM).abs() < 1e-6);
    }
}

/// Buffer capacities never change the persisted contents
#[test]
fn test_capacity_does_not_change_output() {
    let primary = EventConfig::parse("E=1,aoi=0.1,n=3").unwrap();
    let proton = species(primary.pid).unwrap();

    let run = |events: usize, particles: usize| {
        let config = RecorderConfig {
            events: TableConfig::with_capacity(events),
            particles: TableConfig::with_capacity(particles),
            ..RecorderConfig::with_cutoff(1.0)
        };
        let mut recorder = Recorder::new(MemoryBackend::new(), config).unwrap();
        let mut kernel = SyntheticKernel::new(9);
        for event_id in 0..primary.n {
            kernel
                .run_event(&mut recorder, event_id, proton, &primary)
                .unwrap();
        }
        recorder.finish().unwrap().0
    };

    let unbuffered = run(1, 1);
    let buffered = run(100, 500);
    assert!(unbuffered.same_contents(&buffered));
    assert_eq!(unbuffered.rows(EVENTS_TABLE), 3);
    let appends = |backend: &MemoryBackend| backend.table(EVENTS_TABLE).unwrap().appends;
    assert!(appends(&unbuffered) >= appends(&buffered));
}

/// Crossings outside the acceptance shell are counted, not written
#[test]
fn test_acceptance_shell() {
    let dir = tempdir().unwrap();

    let inside = dir.path().join("inside.bundle");
    let shell = RecorderConfig::with_cutoff(5.0).acceptance_radius(WORLD_RADIUS / KM);
    let all = simulate(&inside, 7, 3, shell);
    let outside = dir.path().join("outside.bundle");
    let none = simulate(&outside, 7, 3, RecorderConfig::with_cutoff(5.0).acceptance_radius(100.0));

    assert_eq!(all.written, all.escaped);
    assert_eq!(none.written, 0);

    let reader = BundleReader::open(&outside).unwrap();
    assert_eq!(reader.rows(PARTICLES_TABLE).unwrap(), 0);
    let discarded: u32 = reader.read_events().unwrap().iter().map(|e| e.discarded).sum();
    assert_eq!(discarded as usize, none.escaped);
    assert_eq!(reader.attributes().get("acceptance_radius").unwrap().as_f64(), Some(100.0));
}

/// Merging two simulated runs keeps every event's particle slice intact
#[test]
fn test_merge_simulated_runs() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.bundle");
    let b = dir.path().join("b.bundle");
    let sa = simulate(&a, 1, 4, RecorderConfig::with_cutoff(5.0));
    let sb = simulate(&b, 2, 3, RecorderConfig::with_cutoff(5.0));

    let merged = dir.path().join("merged.bundle");
    let stats = merge_runs(&[&a, &b], &merged, BundleConfig::default()).unwrap();
    assert_eq!(stats.events(), 7);
    assert_eq!(stats.particles() as usize, sa.written + sb.written);
    assert_eq!(stats.incomplete, 0);

    let reader = BundleReader::open(&merged).unwrap();
    let runs = reader.read_runs().unwrap();
    assert_eq!(runs[0].seed, 1);
    assert_eq!(runs[1].seed, 2);
    assert_eq!(runs[1].event_first, 4);
    assert_eq!(runs[1].particle_first as usize, sa.written);
    assert_eq!(runs[0].cutoff, 0.005);
    assert_eq!(runs[0].model_crc, 0x1234_5678);

    let events = reader.read_events().unwrap();
    let particles = reader.read_particles().unwrap();
    assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
    for event in &events {
        let range = event.first as usize..(event.first + event.size) as usize;
        assert!(particles[range].iter().all(|p| p.event_id == event.id));
    }
}

/// A run configured from TOML writes a tracking log
#[test]
fn test_run_config_and_tracking_log() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("tracks.log");
    let config: RunConfig = r#"
        [run]
        cutoff = 50.0
        event = "E=0.5,aoi=0"

        [buffers]
        particles = 2
    "#
    .parse()
    .unwrap();

    let primary = config.event_config().unwrap().unwrap();
    let mut recorder = Recorder::new(MemoryBackend::new(), config.recorder_config().unwrap())
        .unwrap()
        .with_tracking_log(TrackingLog::create(&log_path).unwrap());
    let mut kernel = SyntheticKernel::new(3);
    kernel
        .run_event(&mut recorder, 0, species(primary.pid).unwrap(), &primary)
        .unwrap();
    let (backend, stats) = recorder.finish().unwrap();
    assert_eq!(stats.events, 1);
    assert_eq!(backend.rows(EVENTS_TABLE), 1);

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.starts_with("CLASSIFY: 0,1,2212,proton"));
    assert!(log.contains("PreTrack [1]"));
    assert!(log.contains("PostTrack[1]"));
}
