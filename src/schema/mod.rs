//! # Record Schema Definition
//!
//! This module defines the fixed-width record layout shared by every table in a
//! trackledger bundle.
//!
//! ## Design Rationale
//!
//! A [`Schema`] is an ordered list of named, typed fields. Each field occupies a
//! fixed number of bytes and its byte offset is the cumulative size of all fields
//! declared before it, so the offsets partition `[0, record_size)` without gaps or
//! overlaps. Field names are resolved once into a [`Binding`], a type-checked handle
//! that reads and writes a [`Record`] buffer without any further lookups.
//!
//! All values are stored little-endian. Strings are fixed-width, NUL-padded and
//! always NUL-terminated inside their slot.
//!
//! ## Standard Tables
//!
//! | Table | Builder | Description |
//! |-------|---------|-------------|
//! | events | [`create_event_schema`] | One summary row per simulated event |
//! | particles | [`create_particle_schema`] | One row per persisted boundary crossing |
//! | runs | [`create_run_schema`] | One row per input run in a merged bundle |

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

mod builders;
/// Column name constants for the standard tables.
pub mod columns;
mod constants;
mod error;
mod record;
mod value;


pub use builders::{
    create_event_schema, create_particle_schema, create_run_schema, kinematics_columns,
};
pub use constants::*;
pub use error::SchemaError;
pub use record::{Binding, Record};
pub use value::{FieldValue, FixedStr};
pub(crate) use value::{decode_fixed_str, encode_fixed_str};

/// Storage type of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 64-bit integer
    UInt64,
    /// Signed 64-bit integer
    Int64,
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64,
    /// NUL-padded string occupying exactly this many bytes
    FixedString(usize),
}

impl FieldType {
    /// Number of bytes a value of this type occupies in a record
    pub fn size(&self) -> usize {
        match self {
            Self::UInt32 | Self::Int32 | Self::Float32 => 4,
            Self::UInt64 | Self::Int64 | Self::Float64 => 8,
            Self::FixedString(len) => *len,
        }
    }

    /// Short type tag, also stored in the Parquet field metadata
    pub fn tag(&self) -> String {
        match self {
            Self::UInt32 => "u32".to_string(),
            Self::Int32 => "i32".to_string(),
            Self::UInt64 => "u64".to_string(),
            Self::Int64 => "i64".to_string(),
            Self::Float32 => "f32".to_string(),
            Self::Float64 => "f64".to_string(),
            Self::FixedString(len) => format!("char[{}]", len),
        }
    }

    /// Parse a tag produced by [`FieldType::tag`]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "u32" => Some(Self::UInt32),
            "i32" => Some(Self::Int32),
            "u64" => Some(Self::UInt64),
            "i64" => Some(Self::Int64),
            "f32" => Some(Self::Float32),
            "f64" => Some(Self::Float64),
            other => other
                .strip_prefix("char[")
                .and_then(|rest| rest.strip_suffix(']'))
                .and_then(|len| len.parse().ok())
                .map(Self::FixedString),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// A single named field of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, unique within its schema
    pub name: String,
    /// Storage type
    pub field_type: FieldType,
}

impl FieldSpec {
    /// Create a field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Unsigned 32-bit field
    pub fn u32(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::UInt32)
    }

    /// Signed 32-bit field
    pub fn i32(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int32)
    }

    /// Unsigned 64-bit field
    pub fn u64(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::UInt64)
    }

    /// 64-bit float field
    pub fn f64(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float64)
    }

    /// Fixed-width string field of `len` bytes
    pub fn fixed_str(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, FieldType::FixedString(len))
    }

    /// Byte size of this field
    pub fn size(&self) -> usize {
        self.field_type.size()
    }
}

/// Validated index of a field within a [`Schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    /// Position of the field in declaration order
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Ordered, immutable set of fields with precomputed byte offsets
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    offsets: Vec<usize>,
    index: HashMap<String, usize>,
    record_size: usize,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        // offsets and index are derived from the field list
        self.fields == other.fields
    }
}

impl Eq for Schema {}

impl Schema {
    /// Build a schema, rejecting duplicate or empty names and zero-sized fields.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let mut offsets = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());
        let mut offset = 0;

        for (i, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName { position: i });
            }
            if field.size() == 0 {
                return Err(SchemaError::ZeroSizedField(field.name.clone()));
            }
            if index.insert(field.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            offsets.push(offset);
            offset += field.size();
        }

        Ok(Self {
            fields,
            offsets,
            index,
            record_size: offset,
        })
    }

    /// Total size of one record in bytes
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Byte offsets in declaration order
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Resolve a field name
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.index.get(name).copied().map(FieldId)
    }

    /// Field description for a resolved id
    pub fn field(&self, id: FieldId) -> &FieldSpec {
        &self.fields[id.0]
    }

    /// Byte offset for a resolved id
    pub fn offset(&self, id: FieldId) -> usize {
        self.offsets[id.0]
    }

    /// Byte range of a field inside a record
    pub fn byte_range(&self, id: FieldId) -> std::ops::Range<usize> {
        let start = self.offsets[id.0];
        start..start + self.fields[id.0].size()
    }

    /// Resolve a field name into a typed binding.
    ///
    /// Fails with [`SchemaError::FieldNotFound`] for unknown names and with
    /// [`SchemaError::TypeMismatch`] when `T` cannot represent the field's type.
    pub fn bind<T: FieldValue>(&self, name: &str) -> Result<Binding<T>, SchemaError> {
        let id = self
            .field_id(name)
            .ok_or_else(|| SchemaError::FieldNotFound(name.to_string()))?;
        let field_type = self.field(id).field_type;
        if !T::accepts(field_type) {
            return Err(SchemaError::TypeMismatch {
                field: name.to_string(),
                expected: field_type.tag(),
                requested: T::type_name(),
            });
        }
        Ok(Binding::new(id, self.byte_range(id)))
    }

    /// Iterate over `(field, offset)` pairs in declaration order
    pub fn layout(&self) -> impl Iterator<Item = (&FieldSpec, usize)> {
        self.fields.iter().zip(self.offsets.iter().copied())
    }
}
