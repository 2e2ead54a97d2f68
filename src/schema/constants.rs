/// trackledger bundle format version - follows semantic versioning
pub const TRACKLEDGER_FORMAT_VERSION: &str = "1.0.0";

/// Name of the event summary table
pub const EVENTS_TABLE: &str = "events";

/// Name of the boundary-crossing particle table
pub const PARTICLES_TABLE: &str = "particles";

/// Name of the per-run table in merged bundles
pub const RUNS_TABLE: &str = "runs";

/// Byte width of the particle name column
pub const PARTICLE_NAME_LEN: usize = 16;

/// Byte width of the input path column in the runs table
pub const FILE_PATH_LEN: usize = 64;

/// Byte width of the model file column in the runs table
pub const MODEL_FILE_LEN: usize = 32;

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "trackledger:format_version";

/// Metadata key for the human-readable table title in Parquet footer
pub const KEY_TABLE_TITLE: &str = "trackledger:table_title";

/// Field metadata key carrying the stored type tag of a column
pub const KEY_FIELD_TYPE: &str = "trackledger:type";

/// Root attribute: secondary kinetic energy cutoff (GeV)
pub const ATTR_CUTOFF: &str = "cutoff";

/// Root attribute: random seed of the run
pub const ATTR_SEED: &str = "seed";

/// Root attribute: model description file
pub const ATTR_MODEL_FILE: &str = "model_file";

/// Root attribute: CRC32 of the model description
pub const ATTR_MODEL_CRC: &str = "model_crc";

/// Root attribute: radius of the primary generator sphere (km)
pub const ATTR_GUN_RADIUS: &str = "gunradius";

/// Root attribute: acceptance radius (km), absent when every crossing is kept
pub const ATTR_ACCEPTANCE_RADIUS: &str = "acceptance_radius";
