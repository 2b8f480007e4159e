//! Array bounds validation

use crate::error::{FormatError, Result};

/// Number of `T` elements held in `byte_len` bytes
///
/// Fails when the length is not a whole number of elements.
pub const fn validate_array_bounds<T>(byte_len: usize) -> Result<usize> {
    let element_size = core::mem::size_of::<T>();

    if byte_len % element_size != 0 {
        return Err(FormatError::LengthMismatch {
            expected: ((byte_len / element_size + 1) * element_size) as u64,
            actual: byte_len as u64,
        });
    }

    Ok(byte_len / element_size)
}

/// Product of axis lengths with overflow protection
pub fn checked_element_count(dims: &[u32]) -> Result<usize> {
    dims.iter().try_fold(1usize, |count, &dim| {
        count
            .checked_mul(dim as usize)
            .ok_or(FormatError::SizeOverflow)
    })
}

/// Byte size of `count` elements of `element_size` bytes
pub const fn checked_byte_size(count: usize, element_size: usize) -> Result<usize> {
    match count.checked_mul(element_size) {
        Some(size) => Ok(size),
        None => Err(FormatError::SizeOverflow),
    }
}
