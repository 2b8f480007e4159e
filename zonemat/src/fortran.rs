//! FORTRAN "simple binary" codec
//!
//! Each physical row is a tag word holding the 1-based row number (an i32
//! bit pattern in an f32 slot) followed by the row's float32 values.
//! Rectangular files need the column count from the caller; square files
//! hold `n * (n + 1)` words and the side is inferred.

use std::io::{Read, Write};

use ndarray::{s, Array2, Axis};
use tracing::debug;
use zonemat_core::{
    decode_row_tag, encode_row_tag, infer_fortran_side, rectangle_rows, row_width,
    validate_dimension, validate_min_index, FormatError, MatrixElement,
};

use crate::binary::{read_words_to_end, write_elements};
use crate::coerce::{coerce_matrix, expand_array};
use crate::error::Result;
use crate::labels::AxisLabels;
use crate::matrix::{raw_block, Decoded, Frame, MatrixInput, ZoneSpec};

/// Options for [`read_fortran_rectangle`]
#[derive(Debug, Clone, PartialEq)]
pub struct FortranReadOptions {
    zones: ZoneSpec,
    tall: bool,
    reindex_rows: bool,
    fill_value: f32,
}

impl Default for FortranReadOptions {
    fn default() -> Self {
        Self {
            zones: ZoneSpec::Inferred,
            tall: false,
            reindex_rows: false,
            fill_value: f32::NAN,
        }
    }
}

impl FortranReadOptions {
    /// Zone count or labels to apply
    pub fn with_zones(mut self, zones: impl Into<ZoneSpec>) -> Self {
        self.zones = zones.into();
        self
    }

    /// Flatten the result row-major
    pub fn with_tall(mut self, tall: bool) -> Self {
        self.tall = tall;
        self
    }

    /// Give every label a row, filling rows absent from the file
    pub fn with_reindex_rows(mut self, reindex_rows: bool) -> Self {
        self.reindex_rows = reindex_rows;
        self
    }

    /// Value for rows added by reindexing (NaN unless set)
    pub fn with_fill_value(mut self, fill_value: f32) -> Self {
        self.fill_value = fill_value;
        self
    }

    pub fn zones(&self) -> &ZoneSpec {
        &self.zones
    }

    pub fn tall(&self) -> bool {
        self.tall
    }

    pub fn reindex_rows(&self) -> bool {
        self.reindex_rows
    }

    pub fn fill_value(&self) -> f32 {
        self.fill_value
    }
}

/// Options for [`write_fortran`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FortranWriteOptions {
    n_columns: Option<usize>,
    min_index: i32,
    force_square: bool,
}

impl Default for FortranWriteOptions {
    fn default() -> Self {
        Self {
            n_columns: None,
            min_index: 1,
            force_square: true,
        }
    }
}

impl FortranWriteOptions {
    /// Zero-pad each row on the right up to `n_columns` values
    pub fn with_n_columns(mut self, n_columns: usize) -> Self {
        self.n_columns = Some(n_columns);
        self
    }

    /// Row number written in the first row's tag (at least 1)
    pub fn with_min_index(mut self, min_index: i32) -> Self {
        self.min_index = min_index;
        self
    }

    /// Require a square matrix with identical row and column labels
    pub fn with_force_square(mut self, force_square: bool) -> Self {
        self.force_square = force_square;
        self
    }

    pub fn n_columns(&self) -> Option<usize> {
        self.n_columns
    }

    pub fn min_index(&self) -> i32 {
        self.min_index
    }

    pub fn force_square(&self) -> bool {
        self.force_square
    }
}

/// Split tagged rows into 0-based row indices and the value block
fn split_rows(words: Vec<f32>, rows: usize, n_columns: usize) -> Result<(Vec<i64>, Array2<f32>)> {
    let block = Array2::from_shape_vec((rows, row_width(n_columns)), words)
        .map_err(|_| FormatError::SizeOverflow)?;

    let tags = block.column(0).iter().map(|&word| decode_row_tag(word)).collect();
    let values = block.slice(s![.., 1..]).to_owned();
    Ok((tags, values))
}

/// Read a rectangular FORTRAN file of `n_columns` values per row
///
/// Without labels the rows come back in file order and the tags are not
/// consulted. With labels, each physical row is assigned the label its tag
/// points at; only as many rows and columns as there are labels are kept.
pub fn read_fortran_rectangle<R: Read + ?Sized>(
    reader: &mut R,
    n_columns: i64,
    options: &FortranReadOptions,
) -> Result<Decoded<f32>> {
    let n_columns = validate_dimension(n_columns)?;
    let words = read_words_to_end(reader)?;
    let rows = rectangle_rows(words.len(), n_columns)?;
    debug!(rows, n_columns, "decoding rectangular FORTRAN matrix");

    let (tags, values) = split_rows(words, rows, n_columns)?;

    let zones = match &options.zones {
        ZoneSpec::Inferred => return Ok(Decoded::Raw(raw_block(values, options.tall))),
        ZoneSpec::Count(0) => return Err(FormatError::InvalidDimension(0).into()),
        ZoneSpec::Count(k) => {
            let block = values.slice(s![..(*k).min(rows), ..(*k).min(n_columns)]).to_owned();
            return Ok(Decoded::Raw(raw_block(block, options.tall)));
        }
        ZoneSpec::Labels(zones) => zones,
    };

    let kept_rows = zones.len().min(rows);
    let kept_cols = zones.len().min(n_columns);
    let block = values.slice(s![..kept_rows, ..kept_cols]).to_owned();

    let row_labels = tags[..kept_rows]
        .iter()
        .map(|&index| {
            usize::try_from(index)
                .ok()
                .and_then(|i| zones.get(i).copied())
                .ok_or(FormatError::RowIndexOutOfRange {
                    index,
                    rows: zones.len(),
                })
        })
        .collect::<std::result::Result<AxisLabels, _>>()?;
    let col_labels = zones.truncated(kept_cols);

    let frame = if options.reindex_rows {
        reindex_rows(&block, &row_labels, zones, col_labels, options.fill_value)?
    } else {
        Frame::new(block, row_labels, col_labels)?
    };

    Ok(if options.tall {
        Decoded::Tall(frame.stack())
    } else {
        Decoded::Wide(frame)
    })
}

/// Reorder rows onto `zones`, filling labels the file did not contain
fn reindex_rows(
    block: &Array2<f32>,
    row_labels: &AxisLabels,
    zones: &AxisLabels,
    col_labels: AxisLabels,
    fill_value: f32,
) -> Result<Frame<f32>> {
    let positions = zones.position_map()?;
    let mut data = Array2::from_elem((zones.len(), col_labels.len()), fill_value);
    let mut seen = vec![false; zones.len()];

    for (row, &label) in block.axis_iter(Axis(0)).zip(row_labels.iter()) {
        let target = positions[&label];
        if seen[target] {
            let col = col_labels.first().copied().unwrap_or(label);
            return Err(FormatError::DuplicateEntry { row: label, col }.into());
        }
        seen[target] = true;
        data.row_mut(target).assign(&row);
    }

    Ok(Frame::new(data, zones.clone(), col_labels)?)
}

/// Read a square FORTRAN file
///
/// Row tags are skipped. `zones` and `tall` behave as for EMX reads.
pub fn read_fortran_square<R: Read + ?Sized>(
    reader: &mut R,
    zones: &ZoneSpec,
    tall: bool,
) -> Result<Decoded<f32>> {
    let words = read_words_to_end(reader)?;
    let n = infer_fortran_side(words.len())?;
    debug!(zones = n, "decoding square FORTRAN matrix");

    let (_, values) = split_rows(words, n, n)?;
    Ok(Decoded::from_square(values, zones, tall)?)
}

/// Write a matrix in FORTRAN layout
///
/// Rows are tagged `min_index, min_index + 1, ...`. With `n_columns` wider
/// than the matrix, each row is zero-padded on the right.
pub fn write_fortran<A: MatrixElement, W: Write + ?Sized>(
    writer: &mut W,
    input: &MatrixInput<A>,
    options: &FortranWriteOptions,
) -> Result<()> {
    let min_index = validate_min_index(options.min_index)?;
    let mut data = coerce_matrix(input, true, options.force_square)?;

    if let Some(n_columns) = options.n_columns {
        if n_columns > data.ncols() {
            data = expand_array(&data, n_columns - data.ncols(), Some(Axis(1)))?;
        }
    }

    let (rows, cols) = data.dim();
    let mut words = Vec::with_capacity(rows * row_width(cols));
    for (offset, row) in data.axis_iter(Axis(0)).enumerate() {
        let number = i32::try_from(offset)
            .ok()
            .and_then(|offset| min_index.checked_add(offset))
            .ok_or(FormatError::SizeOverflow)?;
        words.push(encode_row_tag(number));
        words.extend(row.iter().copied());
    }

    write_elements(writer, words)?;
    debug!(rows, cols, min_index, "encoded FORTRAN matrix");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::array;
    use std::io::Cursor;

    /// Rectangular file with the given tags and rows
    fn tagged(rows: &[(i32, [f32; 3])]) -> Vec<u8> {
        let mut words = Vec::new();
        for (tag, values) in rows {
            words.push(encode_row_tag(*tag));
            words.extend_from_slice(values);
        }
        let mut out = Vec::new();
        write_elements(&mut out, words).unwrap();
        out
    }

    #[test]
    fn test_rectangle_raw_ignores_tags() {
        let bytes = tagged(&[(3, [1.0, 2.0, 3.0]), (1, [4.0, 5.0, 6.0])]);
        let raw = read_fortran_rectangle(&mut Cursor::new(&bytes), 3, &FortranReadOptions::default())
            .unwrap()
            .into_raw()
            .unwrap();
        assert_eq!(raw.shape(), &[2, 3]);
        assert_eq!(raw[[0, 0]], 1.0);
    }

    #[test]
    fn test_rectangle_length_mismatch() {
        let mut bytes = tagged(&[(1, [1.0, 2.0, 3.0])]);
        bytes.extend_from_slice(&0f32.to_le_bytes());
        let err = read_fortran_rectangle(&mut Cursor::new(&bytes), 3, &FortranReadOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::LengthMismatch {
                expected: 8,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_rectangle_count_clamps() {
        let bytes = tagged(&[(1, [1.0, 2.0, 3.0]), (2, [4.0, 5.0, 6.0])]);
        let options = FortranReadOptions::default().with_zones(5usize);
        let raw = read_fortran_rectangle(&mut Cursor::new(&bytes), 3, &options).unwrap();
        assert_eq!(raw.shape(), vec![2, 3]);
    }

    #[test]
    fn test_rectangle_tag_out_of_range() {
        let bytes = tagged(&[(4, [1.0, 2.0, 3.0])]);
        let options = FortranReadOptions::default().with_zones(vec![10, 20, 30]);
        let err = read_fortran_rectangle(&mut Cursor::new(&bytes), 3, &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::RowIndexOutOfRange { index: 3, rows: 3 })
        ));
    }

    #[test]
    fn test_reindex_fills_missing_rows() {
        let bytes = tagged(&[(3, [7.0, 8.0, 9.0]), (1, [1.0, 2.0, 3.0])]);
        let options = FortranReadOptions::default()
            .with_zones(vec![10, 20, 30])
            .with_reindex_rows(true)
            .with_fill_value(-1.0);
        let frame = read_fortran_rectangle(&mut Cursor::new(&bytes), 3, &options)
            .unwrap()
            .into_frame()
            .unwrap();

        assert_eq!(frame.rows().as_slice(), &[10, 20, 30]);
        assert_eq!(
            frame.data(),
            &array![[1.0, 2.0, 3.0], [-1.0, -1.0, -1.0], [7.0, 8.0, 9.0]]
        );

        let dropped = read_fortran_rectangle(
            &mut Cursor::new(&bytes),
            3,
            &options.clone().with_reindex_rows(false),
        )
        .unwrap()
        .into_frame()
        .unwrap();
        assert_eq!(dropped.rows().as_slice(), &[30, 10]);
    }

    #[test]
    fn test_reindex_rejects_repeated_tags() {
        let bytes = tagged(&[(2, [1.0, 2.0, 3.0]), (2, [4.0, 5.0, 6.0])]);
        let options = FortranReadOptions::default()
            .with_zones(vec![10, 20, 30])
            .with_reindex_rows(true);
        let err = read_fortran_rectangle(&mut Cursor::new(&bytes), 3, &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::DuplicateEntry { row: 20, .. })
        ));
    }

    #[test]
    fn test_write_tags_and_padding() {
        let input = MatrixInput::from(array![[1.0f32, 2.0], [3.0, 4.0]]);
        let options = FortranWriteOptions::default()
            .with_min_index(5)
            .with_n_columns(3);

        let mut out = Vec::new();
        write_fortran(&mut out, &input, &options).unwrap();
        assert_eq!(out.len(), 2 * 4 * 4);
        assert_eq!(&out[0..4], &5i32.to_le_bytes());
        assert_eq!(&out[16..20], &6i32.to_le_bytes());
        assert_eq!(&out[12..16], &0f32.to_le_bytes());
    }

    #[test]
    fn test_rectangular_write_rejects_raw_rectangle() {
        let input = MatrixInput::from(Array2::<f32>::zeros((2, 3)));
        let options = FortranWriteOptions::default().with_force_square(false);
        let mut out = Vec::new();
        let err = write_fortran(&mut out, &input, &options).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::NotSquare { elements: 6 })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_rejects_min_index_zero() {
        let input = MatrixInput::from(array![[1.0f32]]);
        let options = FortranWriteOptions::default().with_min_index(0);
        let err = write_fortran(&mut Vec::new(), &input, &options).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::InvalidDimension(0))));
    }

    #[test]
    fn test_square_roundtrip_with_labels() {
        let input = MatrixInput::from(array![[1.0f32, 2.0], [3.0, 4.0]]);
        let mut out = Vec::new();
        write_fortran(&mut out, &input, &FortranWriteOptions::default()).unwrap();

        let zones = ZoneSpec::from(vec![4, 8]);
        let tall = read_fortran_square(&mut Cursor::new(&out), &zones, true)
            .unwrap()
            .into_tall()
            .unwrap();
        assert_eq!(tall.index(), &[(4, 4), (4, 8), (8, 4), (8, 8)]);
        assert_eq!(tall.values().to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
