use parquet::basic::{Compression, Encoding, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;
use parquet::schema::types::ColumnPath;

use crate::schema::{FieldType, Schema, KEY_FORMAT_VERSION, KEY_TABLE_TITLE, TRACKLEDGER_FORMAT_VERSION};

/// Compression options for bundle tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// ZSTD compression (recommended, best compression ratio)
    Zstd(i32),
    /// Snappy compression (faster, slightly larger files)
    Snappy,
    /// No compression (fastest write, largest files)
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Zstd(3)
    }
}

/// Configuration for a [`ParquetBundle`](super::ParquetBundle)
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Compression type to use
    pub compression: CompressionType,

    /// Maximum rows per Parquet row group. Each flush of a record table
    /// writes one batch; batches smaller than this share a row group.
    pub row_group_size: usize,

    /// Whether to write statistics for columns
    pub write_statistics: bool,

    /// Enable BYTE_STREAM_SPLIT encoding for floating-point columns.
    /// Kinematics columns compress noticeably better with it.
    pub use_byte_stream_split: bool,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::Zstd(3),
            row_group_size: 64 * 1024,
            write_statistics: true,
            use_byte_stream_split: true,
        }
    }
}

impl BundleConfig {
    /// Configuration optimized for fast writing (larger files)
    pub fn fast_write() -> Self {
        Self {
            compression: CompressionType::Snappy,
            use_byte_stream_split: false,
            ..Self::default()
        }
    }

    /// Create writer properties for one table
    pub(super) fn to_writer_properties(&self, schema: &Schema, title: &str) -> WriterProperties {
        let compression = match self.compression {
            CompressionType::Zstd(level) => {
                Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or(ZstdLevel::default()))
            }
            CompressionType::Snappy => Compression::SNAPPY,
            CompressionType::Uncompressed => Compression::UNCOMPRESSED,
        };

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let mut builder = WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size);

        // Floating-point columns are high-cardinality: skip the dictionary and
        // group exponent/mantissa bytes together instead.
        if self.use_byte_stream_split {
            for spec in schema.fields() {
                if matches!(spec.field_type, FieldType::Float32 | FieldType::Float64) {
                    let path = ColumnPath::new(vec![spec.name.clone()]);
                    builder = builder
                        .set_column_dictionary_enabled(path.clone(), false)
                        .set_column_encoding(path, Encoding::BYTE_STREAM_SPLIT);
                }
            }
        }

        let kv_metadata = vec![
            KeyValue {
                key: KEY_FORMAT_VERSION.to_string(),
                value: Some(TRACKLEDGER_FORMAT_VERSION.to_string()),
            },
            KeyValue {
                key: KEY_TABLE_TITLE.to_string(),
                value: Some(title.to_string()),
            },
        ];

        builder.set_key_value_metadata(Some(kv_metadata)).build()
    }
}
