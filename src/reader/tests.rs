use super::*;
use crate::ledger::{
    EventLedger, EventRecord, Kinematics, ParticleLedger, ParticleName, ParticleRecord,
};
use crate::schema::{FieldType, EVENTS_TABLE, PARTICLES_TABLE, RUNS_TABLE, TRACKLEDGER_FORMAT_VERSION};
use crate::storage::{BundleConfig, ParquetBundle, StorageBackend, ATTRIBUTES_FILE};
use crate::table::TableConfig;
use std::path::Path;
use tempfile::tempdir;

fn particle(event_id: u32, ke: f64) -> ParticleRecord {
    let k = Kinematics {
        ke,
        x: 0.0,
        y: 0.0,
        z: 6371.0,
        px: 0.0,
        py: 0.0,
        pz: 1.0,
    };
    ParticleRecord {
        event_id,
        pid: 13,
        name: ParticleName::new("mu-"),
        mass: 0.105_658,
        vertex: k,
        boundary: k,
    }
}

fn write_bundle(path: &Path, events: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut bundle = ParquetBundle::create(path, BundleConfig::default())?;
    let mut event_ledger = EventLedger::new(TableConfig::with_capacity(2))?;
    let mut particle_ledger = ParticleLedger::new(TableConfig::with_capacity(3))?;

    for id in 0..events {
        let first = particle_ledger.nrows() as u32;
        for i in 0..id {
            particle_ledger.write(&particle(id, f64::from(i)), &mut bundle)?;
        }
        let event = EventRecord {
            id,
            first,
            size: id,
            discarded: 0,
            pid: 2212,
            energy: 100.0,
            kinetic_energy: 99.0,
            incidence: 0.25,
        };
        event_ledger.write(&event, &mut bundle)?;
    }
    event_ledger.close(&mut bundle)?;
    particle_ledger.close(&mut bundle)?;
    bundle.write_attribute(None, "cutoff", 0.01.into())?;
    bundle.finish()?;
    Ok(())
}

#[test]
fn test_read_events_and_particles() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.bundle");
    write_bundle(&path, 4)?;

    let reader = BundleReader::open(&path)?;
    assert_eq!(reader.format_version(), TRACKLEDGER_FORMAT_VERSION);
    assert_eq!(
        reader.table_names().collect::<Vec<_>>(),
        vec![EVENTS_TABLE, PARTICLES_TABLE]
    );
    assert_eq!(reader.attributes().get("cutoff").and_then(|v| v.as_f64()), Some(0.01));

    let events = reader.read_events()?;
    assert_eq!(events.len(), 4);
    assert_eq!(events.iter().map(|e| e.first).collect::<Vec<_>>(), vec![0, 0, 1, 3]);

    let particles = reader.read_particles()?;
    assert_eq!(particles.len(), 6);
    for event in &events {
        let range = event.first as usize..(event.first + event.size) as usize;
        assert!(particles[range].iter().all(|p| p.event_id == event.id));
    }
    assert_eq!(particles[5].name.as_str(), "mu-");
    Ok(())
}

#[test]
fn test_table_info() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.bundle");
    write_bundle(&path, 3)?;

    let reader = BundleReader::open(&path)?;
    let info = reader.table_info(EVENTS_TABLE)?;
    assert_eq!(info.rows, 3);
    assert_eq!(info.record_size, 4 * 4 + 3 * 8 + 4);
    assert_eq!(info.title.as_deref(), Some("Event summaries"));
    assert_eq!(info.fields.len(), 8);
    assert_eq!(info.fields[4].name, "E");
    assert_eq!(info.fields[4].offset, 16);

    let particles = reader.table_info(PARTICLES_TABLE)?;
    assert_eq!(particles.fields[2].field_type, FieldType::FixedString(16));
    assert!(info.to_string().contains("Table 'events' (Event summaries)"));
    assert_eq!(reader.table_infos()?.len(), 2);
    Ok(())
}

#[test]
fn test_absent_table_reads_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.bundle");
    write_bundle(&path, 1)?;

    let reader = BundleReader::open(&path)?;
    // event 0 has no crossings so the particles table was never created
    assert!(!reader.has_table(PARTICLES_TABLE));
    assert_eq!(reader.rows(PARTICLES_TABLE)?, 0);
    assert!(reader.read_particles()?.is_empty());
    assert!(reader.read_runs()?.is_empty());
    assert!(matches!(
        reader.read_raw(RUNS_TABLE),
        Err(ReaderError::TableNotFound(_))
    ));
    Ok(())
}

#[test]
fn test_read_raw_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.bundle");
    write_bundle(&path, 3)?;

    let reader = BundleReader::open_with_config(&path, ReaderConfig { batch_size: 1 })?;
    let table = reader.read_raw(PARTICLES_TABLE)?;
    assert_eq!(table.rows, 3);
    assert_eq!(table.data.len(), 3 * table.schema.record_size());
    assert_eq!(table.records().len(), 3);
    assert!(table.row(3).is_none());
    Ok(())
}

#[test]
fn test_open_unfinished_bundle_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("run.bundle");
    std::fs::create_dir_all(&path)?;
    assert!(!path.join(ATTRIBUTES_FILE).exists());

    assert!(matches!(
        BundleReader::open(&path),
        Err(ReaderError::InvalidFormat(_))
    ));
    assert!(matches!(
        BundleReader::open(dir.path().join("missing")),
        Err(ReaderError::InvalidFormat(_))
    ));
    Ok(())
}
