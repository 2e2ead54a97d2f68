use crate::schema::{
    columns::{events, particles, runs},
    create_event_schema, create_particle_schema, create_run_schema, kinematics_columns, Binding,
    FixedStr, Record, Schema, SchemaError, EVENTS_TABLE, FILE_PATH_LEN, MODEL_FILE_LEN,
    PARTICLES_TABLE, RUNS_TABLE,
};

use super::records::{EventRecord, Kinematics, ParticleName, ParticleRecord, RunRecord};

/// Mapping between a plain record value and the fields of a table.
///
/// Implementors hold one [`Binding`] per field, resolved once against the
/// table's schema; `store` and `load` then move values without name lookups.
pub trait RecordLayout: Sized {
    /// Value type written as one row
    type Value;

    /// Backend table name
    const TABLE: &'static str;

    /// Human-readable table title
    const TITLE: &'static str;

    /// The table's record layout
    fn schema() -> Result<Schema, SchemaError>;

    /// Bind every field against `schema`
    fn resolve(schema: &Schema) -> Result<Self, SchemaError>;

    /// Serialize `value` into `record`
    fn store(&self, value: &Self::Value, record: &mut Record);

    /// Deserialize a value from `record`
    fn load(&self, record: &Record) -> Self::Value;
}

/// Bindings of one kinematics group (`vtx.*` or `boundary.*`)
#[derive(Debug, Clone, Copy)]
pub struct KinematicsFields {
    ke: Binding<f64>,
    x: Binding<f64>,
    y: Binding<f64>,
    z: Binding<f64>,
    px: Binding<f64>,
    py: Binding<f64>,
    pz: Binding<f64>,
}

impl KinematicsFields {
    /// Bind the seven `<prefix>.*` columns
    pub fn resolve(schema: &Schema, prefix: &str) -> Result<Self, SchemaError> {
        let [ke, x, y, z, px, py, pz] = kinematics_columns(prefix);
        Ok(Self {
            ke: schema.bind(&ke)?,
            x: schema.bind(&x)?,
            y: schema.bind(&y)?,
            z: schema.bind(&z)?,
            px: schema.bind(&px)?,
            py: schema.bind(&py)?,
            pz: schema.bind(&pz)?,
        })
    }

    fn store(&self, k: &Kinematics, record: &mut Record) {
        record.set(self.ke, k.ke);
        record.set(self.x, k.x);
        record.set(self.y, k.y);
        record.set(self.z, k.z);
        record.set(self.px, k.px);
        record.set(self.py, k.py);
        record.set(self.pz, k.pz);
    }

    fn load(&self, record: &Record) -> Kinematics {
        Kinematics {
            ke: record.get(self.ke),
            x: record.get(self.x),
            y: record.get(self.y),
            z: record.get(self.z),
            px: record.get(self.px),
            py: record.get(self.py),
            pz: record.get(self.pz),
        }
    }
}

/// Bindings of the `events` table
#[derive(Debug, Clone, Copy)]
pub struct EventFields {
    id: Binding<u32>,
    first: Binding<u32>,
    size: Binding<u32>,
    pid: Binding<i32>,
    energy: Binding<f64>,
    kinetic_energy: Binding<f64>,
    incidence: Binding<f64>,
    discarded: Binding<u32>,
}

impl RecordLayout for EventFields {
    type Value = EventRecord;
    const TABLE: &'static str = EVENTS_TABLE;
    const TITLE: &'static str = "Event summaries";

    fn schema() -> Result<Schema, SchemaError> {
        create_event_schema()
    }

    fn resolve(schema: &Schema) -> Result<Self, SchemaError> {
        Ok(Self {
            id: schema.bind(events::EVENT_ID)?,
            first: schema.bind(events::FIRST)?,
            size: schema.bind(events::SIZE)?,
            pid: schema.bind(events::PID)?,
            energy: schema.bind(events::ENERGY)?,
            kinetic_energy: schema.bind(events::KINETIC_ENERGY)?,
            incidence: schema.bind(events::INCIDENCE)?,
            discarded: schema.bind(events::DISCARDED)?,
        })
    }

    fn store(&self, ev: &EventRecord, record: &mut Record) {
        record.set(self.id, ev.id);
        record.set(self.first, ev.first);
        record.set(self.size, ev.size);
        record.set(self.pid, ev.pid);
        record.set(self.energy, ev.energy);
        record.set(self.kinetic_energy, ev.kinetic_energy);
        record.set(self.incidence, ev.incidence);
        record.set(self.discarded, ev.discarded);
    }

    fn load(&self, record: &Record) -> EventRecord {
        EventRecord {
            id: record.get(self.id),
            first: record.get(self.first),
            size: record.get(self.size),
            discarded: record.get(self.discarded),
            pid: record.get(self.pid),
            energy: record.get(self.energy),
            kinetic_energy: record.get(self.kinetic_energy),
            incidence: record.get(self.incidence),
        }
    }
}

/// Bindings of the `particles` table
#[derive(Debug, Clone, Copy)]
pub struct ParticleFields {
    event_id: Binding<u32>,
    pid: Binding<i32>,
    name: Binding<ParticleName>,
    mass: Binding<f64>,
    vertex: KinematicsFields,
    boundary: KinematicsFields,
}

impl RecordLayout for ParticleFields {
    type Value = ParticleRecord;
    const TABLE: &'static str = PARTICLES_TABLE;
    const TITLE: &'static str = "Boundary crossings";

    fn schema() -> Result<Schema, SchemaError> {
        create_particle_schema()
    }

    fn resolve(schema: &Schema) -> Result<Self, SchemaError> {
        Ok(Self {
            event_id: schema.bind(particles::EVENT_ID)?,
            pid: schema.bind(particles::PID)?,
            name: schema.bind(particles::NAME)?,
            mass: schema.bind(particles::MASS)?,
            vertex: KinematicsFields::resolve(schema, particles::VERTEX)?,
            boundary: KinematicsFields::resolve(schema, particles::BOUNDARY)?,
        })
    }

    fn store(&self, p: &ParticleRecord, record: &mut Record) {
        record.set(self.event_id, p.event_id);
        record.set(self.pid, p.pid);
        record.set(self.name, p.name);
        record.set(self.mass, p.mass);
        self.vertex.store(&p.vertex, record);
        self.boundary.store(&p.boundary, record);
    }

    fn load(&self, record: &Record) -> ParticleRecord {
        ParticleRecord {
            event_id: record.get(self.event_id),
            pid: record.get(self.pid),
            name: record.get(self.name),
            mass: record.get(self.mass),
            vertex: self.vertex.load(record),
            boundary: self.boundary.load(record),
        }
    }
}

/// Bindings of the `runs` table of merged bundles
#[derive(Debug, Clone, Copy)]
pub struct RunFields {
    event_first: Binding<u64>,
    event_size: Binding<u64>,
    particle_first: Binding<u64>,
    particle_size: Binding<u64>,
    file_path: Binding<FixedStr<FILE_PATH_LEN>>,
    cutoff: Binding<f64>,
    seed: Binding<i32>,
    model_file: Binding<FixedStr<MODEL_FILE_LEN>>,
    model_crc: Binding<u32>,
}

impl RecordLayout for RunFields {
    type Value = RunRecord;
    const TABLE: &'static str = RUNS_TABLE;
    const TITLE: &'static str = "Merged runs";

    fn schema() -> Result<Schema, SchemaError> {
        create_run_schema()
    }

    fn resolve(schema: &Schema) -> Result<Self, SchemaError> {
        Ok(Self {
            event_first: schema.bind(runs::EVENT_FIRST)?,
            event_size: schema.bind(runs::EVENT_SIZE)?,
            particle_first: schema.bind(runs::PARTICLE_FIRST)?,
            particle_size: schema.bind(runs::PARTICLE_SIZE)?,
            file_path: schema.bind(runs::FILE_PATH)?,
            cutoff: schema.bind(runs::CUTOFF)?,
            seed: schema.bind(runs::SEED)?,
            model_file: schema.bind(runs::MODEL_FILE)?,
            model_crc: schema.bind(runs::MODEL_CRC)?,
        })
    }

    fn store(&self, run: &RunRecord, record: &mut Record) {
        record.set(self.event_first, run.event_first);
        record.set(self.event_size, run.event_size);
        record.set(self.particle_first, run.particle_first);
        record.set(self.particle_size, run.particle_size);
        record.set(self.file_path, run.file_path);
        record.set(self.cutoff, run.cutoff);
        record.set(self.seed, run.seed);
        record.set(self.model_file, run.model_file);
        record.set(self.model_crc, run.model_crc);
    }

    fn load(&self, record: &Record) -> RunRecord {
        RunRecord {
            event_first: record.get(self.event_first),
            event_size: record.get(self.event_size),
            particle_first: record.get(self.particle_first),
            particle_size: record.get(self.particle_size),
            file_path: record.get(self.file_path),
            cutoff: record.get(self.cutoff),
            seed: record.get(self.seed),
            model_file: record.get(self.model_file),
            model_crc: record.get(self.model_crc),
        }
    }
}
