//! Little-endian primitives over byte streams
//!
//! Every codec reads and writes through these helpers. Reads are bounded by
//! the declared element count, so a short stream is reported as a
//! [`FormatError::LengthMismatch`] carrying the number of whole elements
//! actually present rather than as a bare end-of-file error.

use std::io::{Read, Write};

use zonemat_core::{checked_byte_size, validate_array_bounds, FormatError, MatrixElement};

use crate::error::Result;

/// Largest buffer reserved up front for a declared read
///
/// Declared lengths come from untrusted headers; beyond this the buffer
/// grows only as bytes actually arrive.
const MAX_PREALLOC_BYTES: usize = 1 << 20;

/// Read exactly `count` elements of `T`
pub fn read_elements<T: MatrixElement, R: Read + ?Sized>(
    reader: &mut R,
    count: usize,
) -> Result<Vec<T>> {
    let width = T::size_bytes();
    let byte_len = checked_byte_size(count, width)?;

    let mut bytes = Vec::with_capacity(byte_len.min(MAX_PREALLOC_BYTES));
    Read::take(&mut *reader, byte_len as u64).read_to_end(&mut bytes)?;
    if bytes.len() < byte_len {
        return Err(FormatError::LengthMismatch {
            expected: count as u64,
            actual: (bytes.len() / width) as u64,
        }
        .into());
    }

    Ok(bytes.chunks_exact(width).map(T::read_le).collect())
}

/// Read exactly `count` unsigned 32-bit words
pub fn read_words<R: Read + ?Sized>(reader: &mut R, count: usize) -> Result<Vec<u32>> {
    read_elements(reader, count)
}

/// Read a single unsigned 32-bit word
pub fn read_word<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    let mut bytes = [0u8; 4];
    let mut filled = 0;
    while filled < bytes.len() {
        match reader.read(&mut bytes[filled..]) {
            Ok(0) => {
                return Err(FormatError::LengthMismatch {
                    expected: 1,
                    actual: 0,
                }
                .into())
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(u32::from_le_bytes(bytes))
}

/// Read every remaining float32 word of the stream
///
/// The remaining length must be a whole number of words.
pub fn read_words_to_end<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<f32>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let count = validate_array_bounds::<f32>(bytes.len())?;

    let mut words = Vec::with_capacity(count);
    words.extend(bytes.chunks_exact(4).map(f32::read_le));
    Ok(words)
}

/// Write elements in order as little-endian bytes
pub fn write_elements<T, W, I>(writer: &mut W, values: I) -> Result<()>
where
    T: MatrixElement,
    W: Write + ?Sized,
    I: IntoIterator<Item = T>,
{
    let values = values.into_iter();
    let mut bytes = Vec::with_capacity(values.size_hint().0 * T::size_bytes());
    for value in values {
        bytes.extend_from_slice(value.to_le_bytes().as_ref());
    }
    writer.write_all(&bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    #[test]
    fn test_read_elements() {
        let mut cursor = Cursor::new(vec![1u8, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        let values: Vec<i32> = read_elements(&mut cursor, 2).unwrap();
        assert_eq!(values, vec![1, -1]);
    }

    #[test]
    fn test_short_read_reports_length() {
        let mut cursor = Cursor::new(vec![0u8; 10]);
        let err = read_elements::<f32, _>(&mut cursor, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::LengthMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_huge_declared_count_fails_without_reserving() {
        let mut cursor = Cursor::new(vec![0u8; 8]);
        let count = 1usize << 31;
        let err = read_elements::<i32, _>(&mut cursor, count).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::LengthMismatch { expected, actual: 2 })
                if expected == count as u64
        ));
    }

    #[test]
    fn test_read_word_stops_after_four_bytes() {
        let mut cursor = Cursor::new(vec![0xB2u8, 0xF1, 0xD4, 0xC4, 9, 9]);
        assert_eq!(read_word(&mut cursor).unwrap(), 0xC4D4_F1B2);
        assert_eq!(cursor.position(), 4);
        assert_eq!(read_words(&mut cursor, 0).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_read_words_to_end_rejects_partial_word() {
        let mut cursor = Cursor::new(vec![0u8; 9]);
        assert!(matches!(
            read_words_to_end(&mut cursor),
            Err(Error::Format(FormatError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_write_elements() {
        let mut out = Vec::new();
        write_elements(&mut out, [1.0f32, -2.5]).unwrap();
        write_elements(&mut out, [7u32]).unwrap();
        assert_eq!(out.len(), 12);

        let mut cursor = Cursor::new(out);
        assert_eq!(read_elements::<f32, _>(&mut cursor, 2).unwrap(), vec![1.0, -2.5]);
        assert_eq!(read_words(&mut cursor, 1).unwrap(), vec![7]);
    }
}
