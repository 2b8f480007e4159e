//! Normalising writer input into dense buffers
//!
//! Fixed-width formats need a plain 2-D buffer. These helpers turn any
//! [`MatrixInput`] into one, checking the shape rules on the way.

use ndarray::{Array, Array2, ArrayD, Axis, Dimension, Ix2, Slice};
use zonemat_core::{FormatError, MatrixElement, Result};

use crate::labels::AxisLabels;
use crate::matrix::{Frame, MatrixInput, TallMatrix};

/// Labelled square-or-rectangular frame for any input kind
///
/// - wide input keeps its labels; with `force_square` both axes must carry
///   the same labels (`ShapeMismatch` otherwise)
/// - tall input is spread over the union of its row and column labels,
///   absent cells filled with zero; the union keeps row labels in order of
///   first appearance followed by unseen column labels in order of first
///   appearance, so labels are not sorted
/// - raw input must be 2-D and square (`NotSquare` otherwise) whatever
///   `force_square` says, and is labelled by position; with
///   `allow_raw == false` it fails `RawNotAllowed`
pub fn coerce_frame<A: MatrixElement>(
    input: &MatrixInput<A>,
    allow_raw: bool,
    force_square: bool,
) -> Result<Frame<A>> {
    match input {
        MatrixInput::Wide(frame) => {
            if force_square && !frame.is_square() {
                return Err(FormatError::ShapeMismatch {
                    rows: frame.rows().len(),
                    cols: frame.cols().len(),
                });
            }
            Ok(frame.clone())
        }
        MatrixInput::Tall(tall) => tall_to_square(tall),
        MatrixInput::Raw(array) => {
            if !allow_raw {
                return Err(FormatError::RawNotAllowed);
            }
            let array = raw_to_2d(array)?;
            if array.nrows() != array.ncols() {
                return Err(FormatError::NotSquare {
                    elements: array.len() as u64,
                });
            }
            Ok(Frame::positional(array))
        }
    }
}

/// Strict float32 buffer for fixed-width writers
pub fn coerce_matrix<A: MatrixElement>(
    input: &MatrixInput<A>,
    allow_raw: bool,
    force_square: bool,
) -> Result<Array2<f32>> {
    let frame = coerce_frame(input, allow_raw, force_square)?;
    Ok(narrow_to_f32(frame.data()))
}

/// Labelled frame, rejecting raw buffers
pub fn coerce_labeled<A: MatrixElement>(
    input: &MatrixInput<A>,
    force_square: bool,
) -> Result<Frame<A>> {
    coerce_frame(input, false, force_square)
}

/// Convert element-wise to float32
pub fn narrow_to_f32<A: MatrixElement>(data: &Array2<A>) -> Array2<f32> {
    data.mapv(|value| value.to_f64() as f32)
}

/// Copy of `a` grown by `n` zero cells along `axis`, or along every axis
///
/// The original values stay in the low-index corner.
pub fn expand_array<A, D>(a: &Array<A, D>, n: usize, axis: Option<Axis>) -> Result<Array<A, D>>
where
    A: MatrixElement,
    D: Dimension,
{
    let mut shape = a.raw_dim();
    match axis {
        Some(Axis(index)) if index >= a.ndim() => {
            return Err(FormatError::InvalidDimension(index as i64));
        }
        Some(Axis(index)) => shape[index] += n,
        None => {
            for index in 0..a.ndim() {
                shape[index] += n;
            }
        }
    }

    let mut expanded = Array::from_elem(shape, A::zero());
    expanded
        .slice_each_axis_mut(|desc| Slice::from(0..a.len_of(desc.axis)))
        .assign(a);
    Ok(expanded)
}

fn raw_to_2d<A: Clone>(array: &ArrayD<A>) -> Result<Array2<A>> {
    array
        .clone()
        .into_dimensionality::<Ix2>()
        .map_err(|_| FormatError::NotSquare {
            elements: array.len() as u64,
        })
}

/// Spread a tall matrix over the union of its labels
///
/// Zone order is first appearance, rows before columns.
fn tall_to_square<A: MatrixElement>(tall: &TallMatrix<A>) -> Result<Frame<A>> {
    let zones: AxisLabels = tall.row_labels().union(&tall.col_labels());
    let data = tall.scatter(&zones, &zones, A::zero())?;
    Frame::square(data, zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_wide_force_square() {
        let frame = Frame::new(
            array![[1.0f32, 2.0], [3.0, 4.0]],
            AxisLabels::new(vec![1, 2]),
            AxisLabels::new(vec![2, 1]),
        )
        .unwrap();
        let input = MatrixInput::Wide(frame);

        assert_eq!(
            coerce_matrix(&input, true, true).unwrap_err(),
            FormatError::ShapeMismatch { rows: 2, cols: 2 }
        );
        assert_eq!(coerce_matrix(&input, true, false).unwrap()[[1, 0]], 3.0);
    }

    #[test]
    fn test_tall_union_fills_zero() {
        // rows {1, 2}, columns {2, 3}: union is [1, 2, 3]
        let tall = TallMatrix::new(
            Array1::from(vec![5.0f64, 6.0, 7.0]),
            vec![(1, 2), (2, 3), (1, 3)],
        )
        .unwrap();
        let frame = coerce_labeled(&MatrixInput::Tall(tall), true).unwrap();

        assert_eq!(frame.rows().as_slice(), &[1, 2, 3]);
        assert_eq!(
            frame.data(),
            &array![[0.0, 5.0, 7.0], [0.0, 0.0, 6.0], [0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_tall_union_keeps_first_appearance() {
        let tall = TallMatrix::new(
            Array1::from(vec![1.0f32, 2.0, 3.0]),
            vec![(9, 4), (2, 9), (2, 7)],
        )
        .unwrap();
        let frame = coerce_labeled(&MatrixInput::Tall(tall), true).unwrap();

        assert_eq!(frame.rows().as_slice(), &[9, 2, 4, 7]);
        assert_eq!(frame.get(9, 4), Some(&1.0));
        assert_eq!(frame.get(2, 7), Some(&3.0));
    }

    #[test]
    fn test_tall_duplicate_pair() {
        let tall = TallMatrix::new(Array1::from(vec![1.0f32, 2.0]), vec![(4, 4), (4, 4)]).unwrap();
        assert_eq!(
            coerce_matrix(&MatrixInput::Tall(tall), true, true).unwrap_err(),
            FormatError::DuplicateEntry { row: 4, col: 4 }
        );
    }

    #[test]
    fn test_raw_rules() {
        let square = MatrixInput::from(array![[1i32, 2], [3, 4]]);
        assert_eq!(
            coerce_matrix(&square, true, true).unwrap(),
            array![[1.0f32, 2.0], [3.0, 4.0]]
        );
        assert_eq!(
            coerce_matrix(&square, false, true).unwrap_err(),
            FormatError::RawNotAllowed
        );

        let rect = MatrixInput::from(Array2::<f32>::zeros((2, 3)));
        assert_eq!(
            coerce_matrix(&rect, true, true).unwrap_err(),
            FormatError::NotSquare { elements: 6 }
        );

        assert_eq!(
            coerce_matrix(&rect, true, false).unwrap_err(),
            FormatError::NotSquare { elements: 6 }
        );

        let flat = MatrixInput::Raw(Array1::<f32>::zeros(4).into_dyn());
        assert_eq!(
            coerce_matrix(&flat, true, true).unwrap_err(),
            FormatError::NotSquare { elements: 4 }
        );
    }

    #[test]
    fn test_expand_array() {
        let a = array![[1.0f32, 2.0], [3.0, 4.0]];

        let both = expand_array(&a, 1, None).unwrap();
        assert_eq!(both, array![[1.0, 2.0, 0.0], [3.0, 4.0, 0.0], [0.0, 0.0, 0.0]]);

        let right = expand_array(&a, 2, Some(Axis(1))).unwrap();
        assert_eq!(right, array![[1.0, 2.0, 0.0, 0.0], [3.0, 4.0, 0.0, 0.0]]);

        assert_eq!(
            expand_array(&a, 1, Some(Axis(2))).unwrap_err(),
            FormatError::InvalidDimension(2)
        );
    }
}
