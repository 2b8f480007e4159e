//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be
//! stored as matrix elements in MDF payloads.

use crate::format::DataType;

/// Trait for types that can be stored as matrix elements
///
/// Elements are fixed-size little-endian numbers. `from_f64`/`to_f64`
/// give codecs a common numeric type for precision conversions.
pub trait MatrixElement: Copy + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// Fixed-size byte representation
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// The DataType this element is stored as
    const DATA_TYPE: DataType;

    /// Get the DataType representation for this element type
    fn data_type() -> DataType {
        Self::DATA_TYPE
    }

    /// Get the size in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Convert from f64 for generic construction
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for generic operations
    fn to_f64(self) -> f64;

    /// Additive identity, used as padding fill
    fn zero() -> Self {
        Self::from_f64(0.0)
    }

    /// Decode from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Encode to little-endian bytes
    fn to_le_bytes(self) -> Self::Bytes;

    /// Decode from the first `size_bytes()` bytes of a slice
    ///
    /// The slice must hold at least one element.
    fn read_le(slice: &[u8]) -> Self {
        let mut bytes = Self::Bytes::default();
        let width = bytes.as_ref().len();
        bytes.as_mut().copy_from_slice(&slice[..width]);
        Self::from_le_bytes(bytes)
    }
}

macro_rules! impl_matrix_element {
    ($ty:ty, $data_type:expr, $width:expr) => {
        impl MatrixElement for $ty {
            type Bytes = [u8; $width];

            const DATA_TYPE: DataType = $data_type;

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from_le_bytes(bytes)
            }

            fn to_le_bytes(self) -> Self::Bytes {
                <$ty>::to_le_bytes(self)
            }
        }
    };
}

impl_matrix_element!(f32, DataType::F32, 4);
impl_matrix_element!(f64, DataType::F64, 8);
impl_matrix_element!(i32, DataType::I32, 4);
impl_matrix_element!(u32, DataType::U32, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes_match_data_types() {
        assert_eq!(f32::size_bytes(), f32::data_type().size_bytes());
        assert_eq!(f64::size_bytes(), f64::data_type().size_bytes());
        assert_eq!(i32::size_bytes(), i32::data_type().size_bytes());
        assert_eq!(u32::size_bytes(), u32::data_type().size_bytes());
    }

    #[test]
    fn test_read_le() {
        let bytes = 1.5f64.to_le_bytes();
        assert_eq!(<f64 as MatrixElement>::read_le(&bytes), 1.5);
        assert_eq!(<i32 as MatrixElement>::read_le(&[0xFF, 0xFF, 0xFF, 0xFF, 9]), -1);
        assert_eq!(<u32 as MatrixElement>::zero(), 0);
    }
}
