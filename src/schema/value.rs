use std::borrow::Cow;
use std::fmt;

use super::FieldType;

/// A Rust type that can be stored in a record field.
///
/// `encode` receives exactly `field_type.size()` bytes; `decode` receives the
/// same slice back.
pub trait FieldValue: Sized {
    /// True if values of this type can be stored in a field of `field_type`
    fn accepts(field_type: FieldType) -> bool;

    /// Human-readable name used in error messages
    fn type_name() -> String;

    /// Serialize into the field's bytes
    fn encode(&self, dst: &mut [u8]);

    /// Deserialize from the field's bytes
    fn decode(src: &[u8]) -> Self;
}

macro_rules! impl_numeric_field {
    ($ty:ty, $variant:ident, $len:expr) => {
        impl FieldValue for $ty {
            fn accepts(field_type: FieldType) -> bool {
                field_type == FieldType::$variant
            }

            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            #[inline]
            fn encode(&self, dst: &mut [u8]) {
                dst.copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn decode(src: &[u8]) -> Self {
                let mut buf = [0u8; $len];
                buf.copy_from_slice(src);
                <$ty>::from_le_bytes(buf)
            }
        }
    };
}

impl_numeric_field!(u32, UInt32, 4);
impl_numeric_field!(i32, Int32, 4);
impl_numeric_field!(u64, UInt64, 8);
impl_numeric_field!(i64, Int64, 8);
impl_numeric_field!(f32, Float32, 4);
impl_numeric_field!(f64, Float64, 8);

/// Write `s` into `dst` NUL-padded, keeping at most `dst.len() - 1` bytes of text
pub(crate) fn encode_fixed_str(s: &str, dst: &mut [u8]) {
    let mut len = s.len().min(dst.len().saturating_sub(1));
    while !s.is_char_boundary(len) {
        len -= 1;
    }
    dst[..len].copy_from_slice(&s.as_bytes()[..len]);
    dst[len..].fill(0);
}

/// Text of a NUL-padded slot, up to the first NUL byte
pub(crate) fn decode_fixed_str(src: &[u8]) -> Cow<'_, str> {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end])
}

/// Fixed-width, NUL-padded string of `N` bytes.
///
/// At most `N - 1` bytes of text are kept so the slot is always NUL-terminated.
/// Truncation never splits a UTF-8 character.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize>([u8; N]);

impl<const N: usize> FixedStr<N> {
    /// Copy `s` into a new fixed-width string, truncating if needed
    pub fn new(s: &str) -> Self {
        let mut bytes = [0u8; N];
        encode_fixed_str(s, &mut bytes);
        Self(bytes)
    }

    /// Raw bytes including padding
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Text up to the first NUL byte
    pub fn as_str(&self) -> Cow<'_, str> {
        decode_fixed_str(&self.0)
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedStr<{}>({:?})", N, self.as_str())
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl<const N: usize> From<&str> for FixedStr<N> {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<const N: usize> FieldValue for FixedStr<N> {
    fn accepts(field_type: FieldType) -> bool {
        field_type == FieldType::FixedString(N)
    }

    fn type_name() -> String {
        format!("FixedStr<{}>", N)
    }

    fn encode(&self, dst: &mut [u8]) {
        dst.copy_from_slice(&self.0);
    }

    fn decode(src: &[u8]) -> Self {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(src);
        Self(bytes)
    }
}
