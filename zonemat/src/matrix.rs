//! Labelled matrix containers and codec result types
//!
//! `ndarray` holds the numbers. The wrappers here attach zone labels:
//! [`Frame`] is the wide form (one label per row and per column),
//! [`TallMatrix`] the tall form (one `(row, col)` label pair per value) and
//! [`Series`] the one-axis form read from 1-D MDF files.

use ndarray::{Array1, Array2, ArrayD};
use zonemat_core::{DataType, FormatError, MatrixElement, Result};

use crate::labels::AxisLabels;

/// Wide labelled matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<A> {
    data: Array2<A>,
    rows: AxisLabels,
    cols: AxisLabels,
}

impl<A> Frame<A> {
    /// Attach labels to a 2-D array
    ///
    /// Each label sequence must match the length of its axis.
    pub fn new(data: Array2<A>, rows: AxisLabels, cols: AxisLabels) -> Result<Self> {
        let (nrows, ncols) = data.dim();
        if rows.len() != nrows {
            return Err(FormatError::LabelMismatch {
                expected: nrows,
                actual: rows.len(),
            });
        }
        if cols.len() != ncols {
            return Err(FormatError::LabelMismatch {
                expected: ncols,
                actual: cols.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Square frame with the same labels on both axes
    pub fn square(data: Array2<A>, zones: AxisLabels) -> Result<Self> {
        Self::new(data, zones.clone(), zones)
    }

    /// Frame labelled by position, `0..n` on each axis
    pub fn positional(data: Array2<A>) -> Self {
        let (nrows, ncols) = data.dim();
        Self {
            data,
            rows: AxisLabels::positional(nrows),
            cols: AxisLabels::positional(ncols),
        }
    }

    pub fn data(&self) -> &Array2<A> {
        &self.data
    }

    pub fn rows(&self) -> &AxisLabels {
        &self.rows
    }

    pub fn cols(&self) -> &AxisLabels {
        &self.cols
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Whether both axes carry the same label sequence
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn into_parts(self) -> (Array2<A>, AxisLabels, AxisLabels) {
        (self.data, self.rows, self.cols)
    }

    /// Value at a (row label, column label) pair
    pub fn get(&self, row: i32, col: i32) -> Option<&A> {
        let i = self.rows.position(row)?;
        let j = self.cols.position(col)?;
        self.data.get((i, j))
    }
}

impl<A: Clone> Frame<A> {
    /// Convert to tall form, row-major over the label pairs
    pub fn stack(&self) -> TallMatrix<A> {
        let index = cross_labels(&self.rows, &self.cols);
        let values = Array1::from_iter(self.data.iter().cloned());
        TallMatrix { values, index }
    }

    /// Flatten row-major under an externally supplied composite index
    ///
    /// Only the length is checked; the caller vouches that `index` is in
    /// the frame's row-major order.
    pub fn reshape_tall(&self, index: Vec<(i32, i32)>) -> Result<TallMatrix<A>> {
        TallMatrix::new(Array1::from_iter(self.data.iter().cloned()), index)
    }
}

/// One-axis labelled vector
#[derive(Debug, Clone, PartialEq)]
pub struct Series<A> {
    data: Array1<A>,
    labels: AxisLabels,
}

impl<A> Series<A> {
    pub fn new(data: Array1<A>, labels: AxisLabels) -> Result<Self> {
        if labels.len() != data.len() {
            return Err(FormatError::LabelMismatch {
                expected: data.len(),
                actual: labels.len(),
            });
        }
        Ok(Self { data, labels })
    }

    pub fn data(&self) -> &Array1<A> {
        &self.data
    }

    pub fn labels(&self) -> &AxisLabels {
        &self.labels
    }

    pub fn into_parts(self) -> (Array1<A>, AxisLabels) {
        (self.data, self.labels)
    }
}

/// Tall labelled matrix: one value per `(row label, column label)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct TallMatrix<A> {
    values: Array1<A>,
    index: Vec<(i32, i32)>,
}

impl<A> TallMatrix<A> {
    pub fn new(values: Array1<A>, index: Vec<(i32, i32)>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(FormatError::LengthMismatch {
                expected: index.len() as u64,
                actual: values.len() as u64,
            });
        }
        Ok(Self { values, index })
    }

    /// Tall matrix over the cartesian product of `rows` and `cols`
    pub fn cross(rows: &AxisLabels, cols: &AxisLabels, values: Array1<A>) -> Result<Self> {
        Self::new(values, cross_labels(rows, cols))
    }

    pub fn values(&self) -> &Array1<A> {
        &self.values
    }

    pub fn index(&self) -> &[(i32, i32)] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_parts(self) -> (Array1<A>, Vec<(i32, i32)>) {
        (self.values, self.index)
    }

    /// Distinct row labels, in order of first appearance
    pub fn row_labels(&self) -> AxisLabels {
        AxisLabels::first_appearance(self.index.iter().map(|&(row, _)| row))
    }

    /// Distinct column labels, in order of first appearance
    pub fn col_labels(&self) -> AxisLabels {
        AxisLabels::first_appearance(self.index.iter().map(|&(_, col)| col))
    }
}

impl<A: Clone> TallMatrix<A> {
    /// Wide frame from the values in row-major order, trusting the lengths
    pub fn reshape(&self, rows: &AxisLabels, cols: &AxisLabels) -> Result<Frame<A>> {
        let expected = rows.len() * cols.len();
        if self.values.len() != expected {
            return Err(FormatError::LengthMismatch {
                expected: expected as u64,
                actual: self.values.len() as u64,
            });
        }

        let values = self.values.iter().cloned().collect();
        let data = Array2::from_shape_vec((rows.len(), cols.len()), values)
            .map_err(|_| FormatError::SizeOverflow)?;
        Frame::new(data, rows.clone(), cols.clone())
    }
}

impl<A: MatrixElement> TallMatrix<A> {
    /// Place every value on a `rows x cols` grid, filling gaps with `fill`
    ///
    /// Pairs whose labels are not on the grid are an error, as is a pair
    /// that appears twice.
    pub(crate) fn scatter(&self, rows: &AxisLabels, cols: &AxisLabels, fill: A) -> Result<Array2<A>> {
        let row_positions = rows.position_map()?;
        let col_positions = cols.position_map()?;

        let mut data = Array2::from_elem((rows.len(), cols.len()), fill);
        let mut seen = Array2::from_elem((rows.len(), cols.len()), false);

        for (&(row, col), &value) in self.index.iter().zip(self.values.iter()) {
            let (i, j) = match (row_positions.get(&row), col_positions.get(&col)) {
                (Some(&i), Some(&j)) => (i, j),
                _ => {
                    return Err(FormatError::LabelMismatch {
                        expected: rows.len() * cols.len(),
                        actual: self.index.len(),
                    })
                }
            };
            if seen[(i, j)] {
                return Err(FormatError::DuplicateEntry { row, col });
            }
            seen[(i, j)] = true;
            data[(i, j)] = value;
        }

        Ok(data)
    }

    /// Convert to wide form
    ///
    /// Rows and columns keep the first-appearance order of their labels.
    /// Every `(row, col)` pair must appear exactly once.
    pub fn unstack(&self) -> Result<Frame<A>> {
        let rows = self.row_labels();
        let cols = self.col_labels();

        let expected = rows.len() * cols.len();
        if self.len() != expected {
            return Err(FormatError::LengthMismatch {
                expected: expected as u64,
                actual: self.len() as u64,
            });
        }

        let data = self.scatter(&rows, &cols, A::zero())?;
        Frame::new(data, rows, cols)
    }
}

/// Row-major cartesian product of two label sequences
fn cross_labels(rows: &AxisLabels, cols: &AxisLabels) -> Vec<(i32, i32)> {
    let mut index = Vec::with_capacity(rows.len() * cols.len());
    for &row in rows.iter() {
        index.extend(cols.iter().map(|&col| (row, col)));
    }
    index
}

/// Matrix decoded by one of the codecs
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<A> {
    /// Unlabelled buffer, flat or shaped
    Raw(ArrayD<A>),
    /// Labelled wide matrix
    Wide(Frame<A>),
    /// Labelled tall matrix
    Tall(TallMatrix<A>),
    /// Labelled vector (1-D MDF only)
    Series(Series<A>),
}

impl<A> Decoded<A> {
    /// Shape of the underlying values
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Decoded::Raw(array) => array.shape().to_vec(),
            Decoded::Wide(frame) => {
                let (rows, cols) = frame.dim();
                vec![rows, cols]
            }
            Decoded::Tall(tall) => vec![tall.len()],
            Decoded::Series(series) => vec![series.data().len()],
        }
    }

    pub fn into_raw(self) -> Option<ArrayD<A>> {
        match self {
            Decoded::Raw(array) => Some(array),
            _ => None,
        }
    }

    pub fn into_frame(self) -> Option<Frame<A>> {
        match self {
            Decoded::Wide(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn into_tall(self) -> Option<TallMatrix<A>> {
        match self {
            Decoded::Tall(tall) => Some(tall),
            _ => None,
        }
    }

    pub fn into_series(self) -> Option<Series<A>> {
        match self {
            Decoded::Series(series) => Some(series),
            _ => None,
        }
    }
}

impl<A: Clone> Decoded<A> {
    /// Present a square buffer according to `zones`
    ///
    /// EMX and square FORTRAN reads share this: no zones gives the whole
    /// buffer, a count keeps the top-left `k x k` block, a label sequence
    /// keeps a block of its length and labels both axes with it. `tall`
    /// flattens row-major.
    pub(crate) fn from_square(data: Array2<A>, zones: &ZoneSpec, tall: bool) -> Result<Self> {
        let n = data.nrows();
        let keep = match zones {
            ZoneSpec::Inferred => n,
            ZoneSpec::Count(0) => return Err(FormatError::InvalidDimension(0)),
            ZoneSpec::Count(k) => *k,
            ZoneSpec::Labels(labels) => labels.len(),
        };
        if keep > n {
            return Err(FormatError::LengthMismatch {
                expected: keep as u64,
                actual: n as u64,
            });
        }

        let block = if keep == n {
            data
        } else {
            data.slice(ndarray::s![..keep, ..keep]).to_owned()
        };

        match zones {
            ZoneSpec::Labels(labels) => {
                let frame = Frame::square(block, labels.clone())?;
                Ok(if tall {
                    Decoded::Tall(frame.stack())
                } else {
                    Decoded::Wide(frame)
                })
            }
            _ => Ok(Decoded::Raw(raw_block(block, tall))),
        }
    }
}

/// Unlabelled result, flattened row-major when `tall`
pub(crate) fn raw_block<A: Clone>(block: Array2<A>, tall: bool) -> ArrayD<A> {
    if tall {
        Array1::from_iter(block.iter().cloned()).into_dyn()
    } else {
        block.into_dyn()
    }
}

/// MDF matrix dispatched on its stored element type
#[derive(Debug, Clone, PartialEq)]
pub enum MdfMatrix {
    F32(Decoded<f32>),
    F64(Decoded<f64>),
    I32(Decoded<i32>),
    U32(Decoded<u32>),
}

impl MdfMatrix {
    /// Element type stored in the file
    pub fn data_type(&self) -> DataType {
        match self {
            MdfMatrix::F32(_) => DataType::F32,
            MdfMatrix::F64(_) => DataType::F64,
            MdfMatrix::I32(_) => DataType::I32,
            MdfMatrix::U32(_) => DataType::U32,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            MdfMatrix::F32(m) => m.shape(),
            MdfMatrix::F64(m) => m.shape(),
            MdfMatrix::I32(m) => m.shape(),
            MdfMatrix::U32(m) => m.shape(),
        }
    }

    pub fn into_f32(self) -> Option<Decoded<f32>> {
        match self {
            MdfMatrix::F32(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_f64(self) -> Option<Decoded<f64>> {
        match self {
            MdfMatrix::F64(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_i32(self) -> Option<Decoded<i32>> {
        match self {
            MdfMatrix::I32(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_u32(self) -> Option<Decoded<u32>> {
        match self {
            MdfMatrix::U32(m) => Some(m),
            _ => None,
        }
    }
}

/// Matrix handed to a writer
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixInput<A> {
    /// Unlabelled buffer
    Raw(ArrayD<A>),
    /// Labelled wide matrix
    Wide(Frame<A>),
    /// Labelled tall matrix
    Tall(TallMatrix<A>),
}

/// Representation kind of a [`MatrixInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Raw,
    Wide,
    Tall,
}

impl<A> MatrixInput<A> {
    pub fn kind(&self) -> MatrixKind {
        match self {
            MatrixInput::Raw(_) => MatrixKind::Raw,
            MatrixInput::Wide(_) => MatrixKind::Wide,
            MatrixInput::Tall(_) => MatrixKind::Tall,
        }
    }
}

impl<A> From<Frame<A>> for MatrixInput<A> {
    fn from(frame: Frame<A>) -> Self {
        MatrixInput::Wide(frame)
    }
}

impl<A> From<TallMatrix<A>> for MatrixInput<A> {
    fn from(tall: TallMatrix<A>) -> Self {
        MatrixInput::Tall(tall)
    }
}

impl<A> From<Array2<A>> for MatrixInput<A> {
    fn from(array: Array2<A>) -> Self {
        MatrixInput::Raw(array.into_dyn())
    }
}

impl<A> From<ArrayD<A>> for MatrixInput<A> {
    fn from(array: ArrayD<A>) -> Self {
        MatrixInput::Raw(array)
    }
}

/// Layout of a decoded matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Two axes
    #[default]
    Wide,
    /// Flattened row-major
    Tall,
}

/// How a reader presents what it decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Unlabelled buffer
    Raw(Orientation),
    /// Labelled frame, tall matrix or series
    Labeled(Orientation),
}

impl OutputMode {
    pub const fn is_raw(self) -> bool {
        matches!(self, OutputMode::Raw(_))
    }

    pub const fn orientation(self) -> Orientation {
        match self {
            OutputMode::Raw(orientation) | OutputMode::Labeled(orientation) => orientation,
        }
    }

    pub const fn is_tall(self) -> bool {
        matches!(self.orientation(), Orientation::Tall)
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Labeled(Orientation::Wide)
    }
}

/// Zone information supplied to formats without embedded labels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZoneSpec {
    /// Size taken from the data, no labels
    #[default]
    Inferred,
    /// Keep the first `k` zones, no labels
    Count(usize),
    /// Keep as many zones as labels and attach them
    Labels(AxisLabels),
}

impl From<usize> for ZoneSpec {
    fn from(count: usize) -> Self {
        ZoneSpec::Count(count)
    }
}

impl From<AxisLabels> for ZoneSpec {
    fn from(labels: AxisLabels) -> Self {
        ZoneSpec::Labels(labels)
    }
}

impl From<Vec<i32>> for ZoneSpec {
    fn from(labels: Vec<i32>) -> Self {
        ZoneSpec::Labels(AxisLabels::new(labels))
    }
}
