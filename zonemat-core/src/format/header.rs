//! MDF header format definitions
//!
//! An MDF file opens with a 16-byte preamble of four little-endian u32
//! words (magic, version, data type code, ndim), followed by `ndim` u32
//! axis lengths, one i32 label array per axis and the row-major payload.

use super::constants::{mdf, WORD_SIZE};
use crate::error::{FormatError, HeaderFields, Result};

/// Element types an MDF payload can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum DataType {
    /// 32-bit floating point
    F32 = 1,
    /// 64-bit floating point
    F64 = 2,
    /// 32-bit signed integer
    I32 = 3,
    /// 32-bit unsigned integer
    U32 = 4,
}

impl DataType {
    /// Convert from the on-disk code
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(DataType::F32),
            2 => Some(DataType::F64),
            3 => Some(DataType::I32),
            4 => Some(DataType::U32),
            _ => None,
        }
    }

    /// On-disk code
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Size in bytes of one element
    pub const fn size_bytes(self) -> usize {
        match self {
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F64 => 8,
        }
    }
}

impl TryFrom<u32> for DataType {
    type Error = FormatError;

    fn try_from(code: u32) -> Result<Self> {
        DataType::from_code(code).ok_or(FormatError::UnsupportedDataType(code))
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataType::F32 => write!(f, "f32"),
            DataType::F64 => write!(f, "f64"),
            DataType::I32 => write!(f, "i32"),
            DataType::U32 => write!(f, "u32"),
        }
    }
}

/// Fixed MDF preamble
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MdfHeader {
    /// Magic number: 0xC4D4F1B2
    pub magic: u32,
    /// Format version
    pub version: u32,
    /// Data type code (see [`DataType`])
    pub data_type: u32,
    /// Number of axes (1 or 2)
    pub ndim: u32,
}

impl MdfHeader {
    /// Magic number for MDF files
    pub const MAGIC: u32 = mdf::MAGIC;

    /// Current format version
    pub const VERSION: u32 = mdf::VERSION;

    /// Size of the preamble in bytes
    pub const SIZE: usize = mdf::HEADER_SIZE;

    /// Create a header for the given element type and dimensionality
    pub const fn new(data_type: DataType, ndim: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            data_type: data_type.code(),
            ndim,
        }
    }

    /// Check a magic number on its own
    ///
    /// Readers call this on the first word before reading anything else.
    pub const fn check_magic(magic: u32) -> Result<()> {
        if magic != Self::MAGIC {
            return Err(FormatError::HeaderInvalid(HeaderFields::magic_only(magic)));
        }
        Ok(())
    }

    /// Validate every preamble field
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate every preamble field, reporting all values on failure
    pub fn validate(&self) -> Result<()> {
        let valid = self.magic == Self::MAGIC
            && self.version == Self::VERSION
            && DataType::from_code(self.data_type).is_some()
            && (1..=mdf::MAX_NDIM).contains(&self.ndim);

        if !valid {
            return Err(FormatError::HeaderInvalid(self.fields()));
        }
        Ok(())
    }

    /// Element type of the payload
    pub fn element_type(&self) -> Result<DataType> {
        DataType::try_from(self.data_type)
    }

    /// Field values for error reporting
    pub const fn fields(&self) -> HeaderFields {
        HeaderFields {
            magic: self.magic,
            version: Some(self.version),
            data_type: Some(self.data_type),
            ndim: Some(self.ndim),
        }
    }

    /// Parse and validate the preamble from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::LengthMismatch {
                expected: Self::SIZE as u64,
                actual: bytes.len() as u64,
            });
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self::check_magic(magic)?;

        let header = Self {
            magic,
            version: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            data_type: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            ndim: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        };
        header.validate()?;

        Ok(header)
    }

    /// Convert the preamble to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.data_type.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.ndim.to_le_bytes());
        bytes
    }
}

impl Default for MdfHeader {
    fn default() -> Self {
        Self::new(DataType::F32, 2)
    }
}

/// Axis lengths of an MDF matrix (one or two axes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdfShape {
    dims: [u32; 2],
    ndim: usize,
}

impl MdfShape {
    /// One-axis shape
    pub const fn vector(len: u32) -> Self {
        Self {
            dims: [len, 0],
            ndim: 1,
        }
    }

    /// Two-axis shape
    pub const fn matrix(rows: u32, cols: u32) -> Self {
        Self {
            dims: [rows, cols],
            ndim: 2,
        }
    }

    /// Parse `ndim` little-endian axis lengths
    pub fn from_bytes(ndim: u32, bytes: &[u8]) -> Result<Self> {
        let ndim = ndim as usize;
        if ndim == 0 || ndim > mdf::MAX_NDIM as usize {
            return Err(FormatError::InvalidDimension(ndim as i64));
        }
        if bytes.len() < ndim * WORD_SIZE {
            return Err(FormatError::LengthMismatch {
                expected: ndim as u64,
                actual: (bytes.len() / WORD_SIZE) as u64,
            });
        }

        let mut dims = [0u32; 2];
        for (axis, dim) in dims.iter_mut().take(ndim).enumerate() {
            let at = axis * WORD_SIZE;
            *dim = u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        }

        Ok(Self { dims, ndim })
    }

    /// Number of axes
    pub const fn ndim(&self) -> usize {
        self.ndim
    }

    /// Axis lengths
    pub fn dims(&self) -> &[u32] {
        &self.dims[..self.ndim]
    }

    /// Total element count, guarding against overflow
    pub fn element_count(&self) -> Result<usize> {
        crate::validation::checked_element_count(self.dims())
    }

    /// Size of the encoded shape in bytes
    pub const fn byte_len(&self) -> usize {
        self.ndim * WORD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip_bytes() {
        let header = MdfHeader::new(DataType::F64, 2);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], &[0xB2, 0xF1, 0xD4, 0xC4]);
        assert_eq!(MdfHeader::from_bytes(&bytes), Ok(header));
        assert_eq!(header.element_type(), Ok(DataType::F64));
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let mut bytes = MdfHeader::default().to_bytes();
        bytes[0] = 0;
        let err = MdfHeader::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            FormatError::HeaderInvalid(HeaderFields::magic_only(0xC4D4_F100))
        );
    }

    #[test]
    fn test_header_rejects_each_field() {
        let cases = [
            MdfHeader { version: 2, ..MdfHeader::default() },
            MdfHeader { data_type: 0, ..MdfHeader::default() },
            MdfHeader { data_type: 5, ..MdfHeader::default() },
            MdfHeader { ndim: 0, ..MdfHeader::default() },
            MdfHeader { ndim: 3, ..MdfHeader::default() },
        ];

        for header in cases {
            assert_eq!(
                MdfHeader::from_bytes(&header.to_bytes()),
                Err(FormatError::HeaderInvalid(header.fields()))
            );
        }
    }

    #[test]
    fn test_data_type_codes() {
        for code in mdf::DATA_TYPE_CODES {
            let data_type = DataType::try_from(code).unwrap();
            assert_eq!(data_type.code(), code);
        }
        assert_eq!(DataType::try_from(9), Err(FormatError::UnsupportedDataType(9)));
        assert_eq!(DataType::F64.size_bytes(), 8);
    }

    #[test]
    fn test_shape_parse() {
        let bytes = [3, 0, 0, 0, 4, 0, 0, 0];
        let shape = MdfShape::from_bytes(2, &bytes).unwrap();
        assert_eq!(shape.dims(), &[3, 4]);
        assert_eq!(shape.element_count(), Ok(12));

        let shape = MdfShape::from_bytes(1, &bytes).unwrap();
        assert_eq!(shape.dims(), &[3]);
    }
}
