//! EMX codec
//!
//! An EMX file is a bare row-major float32 square matrix. The side is
//! inferred from the word count or supplied through [`ZoneSpec`].

use std::io::{Read, Write};

use ndarray::{s, Array1, Array2};
use tracing::{debug, warn};
use zonemat_core::{infer_square_side, validate_dimension, FormatError, MatrixElement};

use crate::binary::{read_words_to_end, write_elements};
use crate::coerce::{coerce_matrix, expand_array};
use crate::error::Result;
use crate::matrix::{Decoded, MatrixInput, ZoneSpec};

/// Read an EMX matrix
///
/// - `Inferred` returns the whole matrix unlabelled (flat when `tall`)
/// - `Count(k)` returns the top-left `k x k` block unlabelled
/// - `Labels(zones)` returns the top-left block of the label count with
///   `zones` on both axes
///
/// The word count must be a perfect square.
pub fn read_emx<R: Read + ?Sized>(reader: &mut R, zones: &ZoneSpec, tall: bool) -> Result<Decoded<f32>> {
    let words = read_words_to_end(reader)?;
    let n = infer_square_side(words.len())?;
    debug!(zones = n, "decoding EMX matrix");

    if tall && matches!(zones, ZoneSpec::Inferred) {
        return Ok(Decoded::Raw(Array1::from(words).into_dyn()));
    }

    let data = Array2::from_shape_vec((n, n), words).map_err(|_| FormatError::NotSquare {
        elements: (n * n) as u64,
    })?;
    Ok(Decoded::from_square(data, zones, tall)?)
}

/// Write a square matrix as EMX with exactly `emmebank_zones` zones
///
/// Larger matrices are truncated to the top-left block and smaller ones
/// zero-padded. Truncation drops data and is logged. Tall input is laid
/// out over its labels in order of first appearance, not sorted.
pub fn write_emx<A: MatrixElement, W: Write + ?Sized>(
    writer: &mut W,
    input: &MatrixInput<A>,
    emmebank_zones: i64,
) -> Result<()> {
    let size = validate_dimension(emmebank_zones)?;
    let data = coerce_matrix(input, true, true)?;
    let n = data.nrows();

    let out = if n > size {
        warn!(zones = n, emmebank_zones = size, "truncating matrix for EMX");
        data.slice(s![..size, ..size]).to_owned()
    } else if n < size {
        expand_array(&data, size - n, None)?
    } else {
        data
    };

    write_elements(writer, out.iter().copied())?;
    debug!(zones = size, "encoded EMX matrix");
    Ok(())
}
