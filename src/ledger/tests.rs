use super::*;
use crate::schema::{FixedStr, SchemaError, EVENTS_TABLE, PARTICLES_TABLE};
use crate::storage::MemoryBackend;
use crate::table::{TableConfig, TableError};

fn sample_particle(event_id: u32) -> ParticleRecord {
    ParticleRecord {
        event_id,
        pid: 22,
        name: ParticleName::new("gamma"),
        mass: 0.0,
        vertex: Kinematics {
            ke: 1.25,
            x: 0.1,
            y: -0.2,
            z: 6.3,
            px: 0.0,
            py: 0.6,
            pz: 0.8,
        },
        boundary: Kinematics {
            ke: 1.0,
            x: 0.0,
            y: 3.0,
            z: 4.0,
            px: 0.0,
            py: 0.6,
            pz: 0.8,
        },
    }
}

#[test]
fn test_particle_round_trip_through_backend() {
    let mut backend = MemoryBackend::new();
    let mut ledger = ParticleLedger::new(TableConfig::with_capacity(4)).unwrap();

    let written = sample_particle(17);
    ledger.write(&written, &mut backend).unwrap();
    ledger.flush(&mut backend).unwrap();

    let table = backend.table(PARTICLES_TABLE).unwrap();
    assert_eq!(table.rows, 1);
    let read = ledger.decode(&table.row(0).unwrap()).unwrap();
    assert_eq!(read, written);
    assert_eq!(read.name.as_str(), "gamma");
    assert_eq!(read.boundary.radius(), 5.0);
}

#[test]
fn test_event_ledger_rows() {
    let mut backend = MemoryBackend::new();
    let mut ledger = EventLedger::new(TableConfig::unbuffered()).unwrap();

    for id in 0..3 {
        let event = EventRecord {
            id,
            first: id * 2,
            size: 2,
            discarded: 1,
            pid: 2212,
            energy: 10.0 + f64::from(id),
            kinetic_energy: 9.0 + f64::from(id),
            incidence: 0.5,
        };
        ledger.write(&event, &mut backend).unwrap();
        assert_eq!(ledger.last_written(), event);
    }
    assert_eq!(ledger.nrows(), 3);

    let rows: Vec<EventRecord> = backend
        .table(EVENTS_TABLE)
        .unwrap()
        .records()
        .iter()
        .map(|r| ledger.decode(r).unwrap())
        .collect();
    assert_eq!(rows.iter().map(|e| e.first).collect::<Vec<_>>(), vec![0, 2, 4]);
    assert_eq!(rows[2].energy, 12.0);
}

#[test]
fn test_long_particle_names_are_truncated() {
    let mut backend = MemoryBackend::new();
    let mut ledger = ParticleLedger::new(TableConfig::unbuffered()).unwrap();

    let mut particle = sample_particle(0);
    particle.name = ParticleName::new("anti_sigma_c_plus_plus");
    ledger.write(&particle, &mut backend).unwrap();

    let row = backend.table(PARTICLES_TABLE).unwrap().row(0).unwrap();
    assert_eq!(ledger.decode(&row).unwrap().name.as_str(), "anti_sigma_c_pl");
}

#[test]
fn test_run_record_round_trip() {
    let mut backend = MemoryBackend::new();
    let mut ledger = RunLedger::new(TableConfig::default()).unwrap();

    let run = RunRecord {
        event_first: 10,
        event_size: 5,
        particle_first: 120,
        particle_size: 33,
        file_path: FixedStr::new("runs/a.bundle"),
        cutoff: 0.01,
        seed: 42,
        model_file: FixedStr::new("models/atmosphere.txt"),
        model_crc: 0xdead_beef,
    };
    let stats = {
        ledger.write(&run, &mut backend).unwrap();
        let layout = *ledger.layout();
        let stats = ledger.close(&mut backend).unwrap();
        let row = backend.table("runs").unwrap().row(0).unwrap();
        assert_eq!(layout.load(&row), run);
        stats
    };
    assert_eq!(stats.rows_flushed, 1);
}

#[test]
fn test_layout_against_wrong_schema() {
    let schema = crate::schema::create_event_schema().unwrap();
    let result = ParticleFields::resolve(&schema);
    assert!(matches!(result, Err(SchemaError::FieldNotFound(_)) | Err(SchemaError::TypeMismatch { .. })));
}

#[test]
fn test_ledger_rejects_zero_capacity() {
    let result = EventLedger::new(TableConfig::with_capacity(0));
    assert!(matches!(result, Err(TableError::InvalidCapacity { .. })));
}

#[test]
fn test_decode_rejects_row_of_other_table() {
    let events = EventLedger::new(TableConfig::default()).unwrap();
    let particles = ParticleLedger::new(TableConfig::default()).unwrap();
    let row = crate::schema::Record::new(events.table().schema().clone());

    let result = particles.decode(&row);
    assert!(matches!(result, Err(SchemaError::LayoutMismatch(_))));
    assert!(events.decode(&row).is_ok());
}
