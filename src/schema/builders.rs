use super::columns::{events, particles, runs};
use super::{FieldSpec, Schema, SchemaError};
use super::{FILE_PATH_LEN, MODEL_FILE_LEN, PARTICLE_NAME_LEN};

/// Column names of one kinematics group, e.g. `vtx.KE`, `vtx.x`, ...
pub fn kinematics_columns(prefix: &str) -> [String; 7] {
    particles::KINEMATICS.map(|suffix| format!("{}.{}", prefix, suffix))
}

/// Creates the `events` table schema.
///
/// `eventid:u32, first:u32, size:u32, pid:i32, E:f64, KE:f64, incidence:f64, discarded:u32`
pub fn create_event_schema() -> Result<Schema, SchemaError> {
    Schema::new(vec![
        FieldSpec::u32(events::EVENT_ID),
        FieldSpec::u32(events::FIRST),
        FieldSpec::u32(events::SIZE),
        FieldSpec::i32(events::PID),
        FieldSpec::f64(events::ENERGY),
        FieldSpec::f64(events::KINETIC_ENERGY),
        FieldSpec::f64(events::INCIDENCE),
        FieldSpec::u32(events::DISCARDED),
    ])
}

/// Creates the `particles` table schema.
///
/// `eventid:u32, pid:i32, name:char[16], mass:f64` followed by the seven
/// `vtx.*` and seven `boundary.*` kinematics columns.
pub fn create_particle_schema() -> Result<Schema, SchemaError> {
    let mut fields = vec![
        FieldSpec::u32(particles::EVENT_ID),
        FieldSpec::i32(particles::PID),
        FieldSpec::fixed_str(particles::NAME, PARTICLE_NAME_LEN),
        FieldSpec::f64(particles::MASS),
    ];
    for prefix in [particles::VERTEX, particles::BOUNDARY] {
        fields.extend(kinematics_columns(prefix).into_iter().map(FieldSpec::f64));
    }
    Schema::new(fields)
}

/// Creates the `runs` table schema used by merged bundles.
pub fn create_run_schema() -> Result<Schema, SchemaError> {
    Schema::new(vec![
        FieldSpec::u64(runs::EVENT_FIRST),
        FieldSpec::u64(runs::EVENT_SIZE),
        FieldSpec::u64(runs::PARTICLE_FIRST),
        FieldSpec::u64(runs::PARTICLE_SIZE),
        FieldSpec::fixed_str(runs::FILE_PATH, FILE_PATH_LEN),
        FieldSpec::f64(runs::CUTOFF),
        FieldSpec::i32(runs::SEED),
        FieldSpec::fixed_str(runs::MODEL_FILE, MODEL_FILE_LEN),
        FieldSpec::u32(runs::MODEL_CRC),
    ])
}
