//! FORTRAN "simple binary" row tags
//!
//! Every row of a FORTRAN-friendly file starts with one 4-byte word holding
//! the 1-based row number. The word is stored as the *bit pattern* of an
//! i32 inside an f32 slot, so both directions reinterpret bits and never
//! convert numerically.

use super::constants::fortran::{INDEX_BASE, TAG_WORDS};

/// Recover the 0-based row index from a tag word
///
/// Returned as i64 so that a corrupt tag of `i32::MIN` cannot overflow.
pub fn decode_row_tag(word: f32) -> i64 {
    i64::from(bytemuck::cast::<f32, i32>(word)) - INDEX_BASE
}

/// Encode a 1-based row number as a tag word
pub fn encode_row_tag(row_number: i32) -> f32 {
    bytemuck::cast::<i32, f32>(row_number)
}

/// Words in one physical row holding `n_columns` values
pub const fn row_width(n_columns: usize) -> usize {
    n_columns + TAG_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_bit_pattern() {
        let word = encode_row_tag(1);
        assert_eq!(word.to_bits(), 1);
        // A numeric cast would have produced 1.0
        assert_ne!(word, 1.0);
        assert_eq!(decode_row_tag(word), 0);
    }

    #[test]
    fn test_tag_roundtrip() {
        for number in [1, 2, 17, 3500, i32::MAX] {
            assert_eq!(decode_row_tag(encode_row_tag(number)), i64::from(number) - 1);
        }
        assert_eq!(decode_row_tag(encode_row_tag(i32::MIN)), i64::from(i32::MIN) - 1);
    }

    #[test]
    fn test_reexported_at_root() {
        assert_eq!(crate::row_width(3), 4);
        assert_eq!(crate::DEFAULT_OMX_MAPPING, "zone_numbers");
    }

    #[test]
    fn test_row_width() {
        assert_eq!(row_width(0), 1);
        assert_eq!(row_width(10), 11);
    }
}
