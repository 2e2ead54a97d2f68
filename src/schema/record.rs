use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::Arc;

use super::{FieldId, FieldValue, Schema, SchemaError};

/// Typed handle to one field of a schema.
///
/// Produced by [`Schema::bind`]; the field name and type are checked once at
/// binding time. A binding is only meaningful for records of the schema that
/// produced it.
pub struct Binding<T> {
    id: FieldId,
    start: usize,
    end: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Binding<T> {
    pub(super) fn new(id: FieldId, range: Range<usize>) -> Self {
        Self {
            id,
            start: range.start,
            end: range.end,
            _marker: PhantomData,
        }
    }

    /// Field this binding refers to
    pub fn field_id(&self) -> FieldId {
        self.id
    }

    /// Byte range of the field inside a record
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Binding<T> {}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("field", &self.id.index())
            .field("range", &(self.start..self.end))
            .finish()
    }
}

/// One record's worth of bytes laid out according to a schema.
///
/// This is the scratch buffer a [`RecordTable`](crate::table::RecordTable)
/// copies into its batch on every write. Two bindings to the same field read
/// and write the same bytes.
#[derive(Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    bytes: Vec<u8>,
}

impl Record {
    /// Zero-filled record
    pub fn new(schema: Arc<Schema>) -> Self {
        let bytes = vec![0u8; schema.record_size()];
        Self { schema, bytes }
    }

    /// Wrap existing bytes; the length must equal the record size
    pub fn from_bytes(schema: Arc<Schema>, bytes: Vec<u8>) -> Result<Self, SchemaError> {
        if bytes.len() != schema.record_size() {
            return Err(SchemaError::LayoutMismatch(format!(
                "expected {} bytes, got {}",
                schema.record_size(),
                bytes.len()
            )));
        }
        Ok(Self { schema, bytes })
    }

    /// Schema of this record
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Store a value through a binding.
    ///
    /// # Panics
    ///
    /// If the binding came from a schema with a shorter record.
    #[inline]
    pub fn set<T: FieldValue>(&mut self, binding: Binding<T>, value: T) {
        value.encode(&mut self.bytes[binding.range()]);
    }

    /// Read a value through a binding.
    ///
    /// # Panics
    ///
    /// If the binding came from a schema with a shorter record.
    #[inline]
    pub fn get<T: FieldValue>(&self, binding: Binding<T>) -> T {
        T::decode(&self.bytes[binding.range()])
    }

    /// Copy the contents of another record with an identical layout
    pub fn copy_from(&mut self, other: &Record) -> Result<(), SchemaError> {
        if *self.schema != *other.schema {
            return Err(SchemaError::LayoutMismatch(
                "records were built from different schemas".to_string(),
            ));
        }
        self.bytes.copy_from_slice(&other.bytes);
        Ok(())
    }

    /// Reset every byte to zero
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Raw record bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("fields", &self.schema.len())
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
