//! Shape inference for formats without an explicit header
//!
//! EMX files hold `n * n` words, square FORTRAN files `n * (n + 1)` words.
//! Both sides are recovered with integer arithmetic and then verified
//! exactly, so a file one word too long is always rejected.

use crate::error::{FormatError, Result};
use crate::format::fortran::row_width;

/// Integer square root, rounded down
pub const fn isqrt(n: u64) -> u64 {
    if n < 4 {
        return if n == 0 { 0 } else { 1 };
    }

    let mut x = n;
    let mut y = n / 2 + 1;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Side of the square matrix holding `elements` values
pub fn infer_square_side(elements: usize) -> Result<usize> {
    let n = isqrt(elements as u64) as usize;
    if n.checked_mul(n) != Some(elements) {
        return Err(FormatError::NotSquare {
            elements: elements as u64,
        });
    }
    Ok(n)
}

/// Side of the square matrix stored in a FORTRAN file of `words` words
///
/// Inverts `words = n * (n + 1)` through the root of `n^2 + n - words = 0`,
/// i.e. `n = (sqrt(1 + 4 * words) - 1) / 2`.
pub fn infer_fortran_side(words: usize) -> Result<usize> {
    let not_square = FormatError::NotSquare {
        elements: words as u64,
    };

    let discriminant = (words as u64)
        .checked_mul(4)
        .and_then(|w| w.checked_add(1))
        .ok_or(not_square)?;
    let n = ((isqrt(discriminant) - 1) / 2) as usize;

    match n.checked_mul(n + 1) {
        Some(expected) if expected == words => Ok(n),
        _ => Err(not_square),
    }
}

/// Number of physical rows in a rectangular FORTRAN file
pub fn rectangle_rows(words: usize, n_columns: usize) -> Result<usize> {
    if n_columns == 0 {
        return Err(FormatError::InvalidDimension(0));
    }

    let width = row_width(n_columns);
    let rows = words / width;
    if rows * width != words {
        return Err(FormatError::LengthMismatch {
            expected: ((rows + 1) * width) as u64,
            actual: words as u64,
        });
    }
    Ok(rows)
}

/// Require a strictly positive size parameter
pub const fn validate_dimension(value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(FormatError::InvalidDimension(value));
    }
    Ok(value as usize)
}

/// Require a 1-based starting row number
pub const fn validate_min_index(min_index: i32) -> Result<i32> {
    if min_index < 1 {
        return Err(FormatError::InvalidDimension(min_index as i64));
    }
    Ok(min_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isqrt() {
        for n in 0u64..2000 {
            let r = isqrt(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n, "isqrt({n}) = {r}");
        }
        assert_eq!(isqrt(u64::MAX), 4_294_967_295);
    }

    #[test]
    fn test_infer_square_side() {
        assert_eq!(infer_square_side(0), Ok(0));
        assert_eq!(infer_square_side(1), Ok(1));
        assert_eq!(infer_square_side(25), Ok(5));
        assert_eq!(
            infer_square_side(26),
            Err(FormatError::NotSquare { elements: 26 })
        );
    }

    #[test]
    fn test_infer_fortran_side() {
        for n in [1usize, 2, 5, 100, 3500] {
            assert_eq!(infer_fortran_side(n * (n + 1)), Ok(n));
            let words = n * (n + 1) + 1;
            assert_eq!(
                infer_fortran_side(words),
                Err(FormatError::NotSquare {
                    elements: words as u64
                })
            );
        }
    }

    #[test]
    fn test_rectangle_rows() {
        assert_eq!(rectangle_rows(12, 3), Ok(3));
        assert_eq!(rectangle_rows(0, 3), Ok(0));
        assert_eq!(
            rectangle_rows(13, 3),
            Err(FormatError::LengthMismatch {
                expected: 16,
                actual: 13
            })
        );
        assert_eq!(rectangle_rows(12, 0), Err(FormatError::InvalidDimension(0)));
    }

    #[test]
    fn test_parameter_validation() {
        assert_eq!(validate_dimension(8), Ok(8));
        assert_eq!(validate_dimension(0), Err(FormatError::InvalidDimension(0)));
        assert_eq!(validate_min_index(1), Ok(1));
        assert_eq!(validate_min_index(0), Err(FormatError::InvalidDimension(0)));
    }
}
