//! OMX codec
//!
//! Reading and writing collections of named matrices that share one zone
//! mapping. Storage is delegated to an [`OmxStore`]; this module owns the
//! rules on top of it:
//!
//! - matrix names are processed in sorted order
//! - labelled reads need exactly one mapping unless one is named
//! - a single-matrix read collapses to that matrix when `squeeze` is set
//! - writes take matrices of one representation kind sharing one zone axis

pub mod memory;
pub mod store;

use std::collections::BTreeMap;

use ndarray::Array2;
use tracing::debug;
use zonemat_core::{infer_square_side, FormatError, DEFAULT_OMX_MAPPING};

use crate::error::{Error, Result};
use crate::labels::AxisLabels;
use crate::matrix::{raw_block, Decoded, Frame, MatrixInput, MatrixKind, OutputMode};

pub use memory::{MemoryOmx, OmxEntry};
pub use store::{AttrValue, Attributes, OmxStore};

/// Options for [`read_omx`]
#[derive(Debug, Clone, PartialEq)]
pub struct OmxReadOptions {
    matrices: Option<Vec<String>>,
    mapping: Option<String>,
    mode: OutputMode,
    squeeze: bool,
}

impl Default for OmxReadOptions {
    fn default() -> Self {
        Self {
            matrices: None,
            mapping: None,
            mode: OutputMode::default(),
            squeeze: true,
        }
    }
}

impl OmxReadOptions {
    /// Read only these matrices instead of all of them
    pub fn with_matrices<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matrices = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Zone mapping to label with
    pub fn with_mapping(mut self, mapping: impl Into<String>) -> Self {
        self.mapping = Some(mapping.into());
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Return a lone matrix directly rather than in a map
    pub fn with_squeeze(mut self, squeeze: bool) -> Self {
        self.squeeze = squeeze;
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn squeeze(&self) -> bool {
        self.squeeze
    }
}

/// Options for [`write_omx`]
#[derive(Debug, Clone, PartialEq)]
pub struct OmxWriteOptions {
    zone_index: Option<AxisLabels>,
    title: String,
    descriptions: BTreeMap<String, String>,
    attributes: BTreeMap<String, Attributes>,
    mapping: String,
}

impl Default for OmxWriteOptions {
    fn default() -> Self {
        Self {
            zone_index: None,
            title: String::new(),
            descriptions: BTreeMap::new(),
            attributes: BTreeMap::new(),
            mapping: DEFAULT_OMX_MAPPING.to_string(),
        }
    }
}

impl OmxWriteOptions {
    /// Zone labels the matrices must resolve to
    ///
    /// Mostly useful to label raw buffers, which otherwise get `0..n`.
    pub fn with_zone_index(mut self, zones: AxisLabels) -> Self {
        self.zone_index = Some(zones);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, matrix: impl Into<String>, text: impl Into<String>) -> Self {
        self.descriptions.insert(matrix.into(), text.into());
        self
    }

    pub fn with_attributes(mut self, matrix: impl Into<String>, attributes: Attributes) -> Self {
        self.attributes.insert(matrix.into(), attributes);
        self
    }

    /// Name of the zone mapping to create
    pub fn with_mapping(mut self, mapping: impl Into<String>) -> Self {
        self.mapping = mapping.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mapping(&self) -> &str {
        &self.mapping
    }
}

/// Result of [`read_omx`]
#[derive(Debug, Clone, PartialEq)]
pub enum OmxMatrices {
    /// The only matrix read, when squeezing
    Single(Decoded<f32>),
    /// Matrices by name
    Many(BTreeMap<String, Decoded<f32>>),
}

impl OmxMatrices {
    pub fn into_single(self) -> Option<Decoded<f32>> {
        match self {
            OmxMatrices::Single(matrix) => Some(matrix),
            OmxMatrices::Many(_) => None,
        }
    }

    pub fn into_map(self) -> Option<BTreeMap<String, Decoded<f32>>> {
        match self {
            OmxMatrices::Single(_) => None,
            OmxMatrices::Many(map) => Some(map),
        }
    }
}

/// Pick the mapping to label with
fn resolve_mapping<S: OmxStore + ?Sized>(store: &S, requested: Option<&str>) -> Result<AxisLabels> {
    let name = match requested {
        Some(name) => name.to_string(),
        None => {
            let mut names = store.mapping_names()?;
            if names.len() != 1 {
                return Err(FormatError::AmbiguousMapping { found: names.len() }.into());
            }
            names.remove(0)
        }
    };
    store.read_mapping(&name)
}

/// Read matrices from an OMX container
///
/// Raw modes return unlabelled buffers and never look at the mappings.
/// Labelled modes label both axes with the zone mapping (wide) or with its
/// cross product with itself (tall).
pub fn read_omx<S: OmxStore + ?Sized>(store: &S, options: &OmxReadOptions) -> Result<OmxMatrices> {
    let mode = options.mode;
    let zones = if mode.is_raw() {
        None
    } else {
        Some(resolve_mapping(store, options.mapping.as_deref())?)
    };

    let mut names = match &options.matrices {
        Some(names) => names.clone(),
        None => store.matrix_names()?,
    };
    names.sort();

    let mut matrices = BTreeMap::new();
    for name in &names {
        let data = store.read_matrix(name)?;
        let decoded = match &zones {
            None => Decoded::Raw(raw_block(data, mode.is_tall())),
            Some(zones) => {
                let frame = Frame::square(data, zones.clone())?;
                if mode.is_tall() {
                    Decoded::Tall(frame.stack())
                } else {
                    Decoded::Wide(frame)
                }
            }
        };
        matrices.insert(name.clone(), decoded);
    }
    debug!(count = matrices.len(), ?mode, "read OMX matrices");

    if options.squeeze && names.len() == 1 {
        if let Some(matrix) = matrices.remove(&names[0]) {
            return Ok(OmxMatrices::Single(matrix));
        }
    }
    Ok(OmxMatrices::Many(matrices))
}

/// Square buffers and their shared zone axis
struct Prepared {
    arrays: Vec<(String, Array2<f32>)>,
    zones: AxisLabels,
}

fn prepare_raw(matrices: &BTreeMap<String, MatrixInput<f32>>) -> Result<Prepared> {
    let mut side = None;
    let mut ndim = None;
    let mut arrays = Vec::with_capacity(matrices.len());

    for (name, input) in matrices {
        let MatrixInput::Raw(array) = input else {
            return Err(FormatError::InconsistentMatrixKinds.into());
        };

        let n = match array.ndim() {
            1 => infer_square_side(array.len())?,
            2 if array.shape()[0] == array.shape()[1] => array.shape()[0],
            2 => {
                return Err(FormatError::NotSquare {
                    elements: array.len() as u64,
                }
                .into())
            }
            other => return Err(FormatError::InvalidDimension(other as i64).into()),
        };

        match (ndim, side) {
            (Some(first_ndim), _) if first_ndim != array.ndim() => {
                return Err(FormatError::InconsistentMatrixKinds.into())
            }
            (_, Some(first_side)) if first_side != n => {
                return Err(FormatError::LabelMismatch {
                    expected: first_side,
                    actual: n,
                }
                .into())
            }
            _ => {
                ndim = Some(array.ndim());
                side = Some(n);
            }
        }

        let values: Vec<f32> = array.iter().copied().collect();
        let square = Array2::from_shape_vec((n, n), values).map_err(|_| FormatError::SizeOverflow)?;
        arrays.push((name.clone(), square));
    }

    Ok(Prepared {
        arrays,
        zones: AxisLabels::positional(side.unwrap_or(0)),
    })
}

fn prepare_wide(matrices: &BTreeMap<String, MatrixInput<f32>>) -> Result<Prepared> {
    let mut zones: Option<AxisLabels> = None;
    let mut arrays = Vec::with_capacity(matrices.len());

    for (name, input) in matrices {
        let MatrixInput::Wide(frame) = input else {
            return Err(FormatError::InconsistentMatrixKinds.into());
        };

        if zones.is_none() && !frame.is_square() {
            return Err(FormatError::ShapeMismatch {
                rows: frame.rows().len(),
                cols: frame.cols().len(),
            }
            .into());
        }
        let shared: &AxisLabels = zones.get_or_insert_with(|| frame.rows().clone());
        if frame.rows() != shared || frame.cols() != shared {
            return Err(FormatError::LabelMismatch {
                expected: shared.len(),
                actual: frame.rows().len(),
            }
            .into());
        }
        arrays.push((name.clone(), frame.data().clone()));
    }

    Ok(Prepared {
        arrays,
        zones: zones.unwrap_or_default(),
    })
}

fn prepare_tall(matrices: &BTreeMap<String, MatrixInput<f32>>) -> Result<Prepared> {
    // index of the first matrix, its zones, and whether it is the plain
    // row-major product of those zones
    let mut first: Option<(&[(i32, i32)], AxisLabels, bool)> = None;
    let mut arrays = Vec::with_capacity(matrices.len());

    for (name, input) in matrices {
        let MatrixInput::Tall(tall) = input else {
            return Err(FormatError::InconsistentMatrixKinds.into());
        };

        let frame = match &first {
            None => {
                let frame = tall.unstack()?;
                if !frame.is_square() {
                    return Err(FormatError::ShapeMismatch {
                        rows: frame.rows().len(),
                        cols: frame.cols().len(),
                    }
                    .into());
                }
                let zones = frame.rows().clone();
                let row_major = frame.stack().index() == tall.index();
                first = Some((tall.index(), zones, row_major));
                frame
            }
            Some((index, zones, row_major)) => {
                if tall.index() != *index {
                    return Err(FormatError::LabelMismatch {
                        expected: index.len(),
                        actual: tall.len(),
                    }
                    .into());
                }
                if *row_major {
                    tall.reshape(zones, zones)?
                } else {
                    tall.unstack()?
                }
            }
        };
        arrays.push((name.clone(), frame.into_parts().0));
    }

    Ok(Prepared {
        arrays,
        zones: first.map(|(_, zones, _)| zones).unwrap_or_default(),
    })
}

/// Write a homogeneous collection of matrices to an OMX container
///
/// All matrices must be raw buffers (square 2-D, or 1-D of square length),
/// all wide frames, or all tall matrices, and must share one zone axis.
/// Descriptions default to empty text and attributes to an empty map.
/// Writes are not atomic: an error partway leaves earlier matrices stored.
pub fn write_omx<S: OmxStore + ?Sized>(
    store: &mut S,
    matrices: &BTreeMap<String, MatrixInput<f32>>,
    options: &OmxWriteOptions,
) -> Result<()> {
    let first_kind = matrices
        .values()
        .next()
        .map(MatrixInput::kind)
        .ok_or(Error::EmptyMatrixSet)?;
    if matrices.values().any(|input| input.kind() != first_kind) {
        return Err(FormatError::InconsistentMatrixKinds.into());
    }

    let prepared = match first_kind {
        MatrixKind::Raw => prepare_raw(matrices)?,
        MatrixKind::Wide => prepare_wide(matrices)?,
        MatrixKind::Tall => prepare_tall(matrices)?,
    };

    if let Some(zone_index) = &options.zone_index {
        if *zone_index != prepared.zones {
            return Err(FormatError::LabelMismatch {
                expected: prepared.zones.len(),
                actual: zone_index.len(),
            }
            .into());
        }
    }
    let zones = options.zone_index.as_ref().unwrap_or(&prepared.zones);

    store.set_title(&options.title)?;
    store.create_mapping(&options.mapping, zones)?;

    let no_attributes = Attributes::new();
    for (name, data) in prepared.arrays {
        let description = options.descriptions.get(&name).map(String::as_str).unwrap_or("");
        let attributes = options.attributes.get(&name).unwrap_or(&no_attributes);
        store.create_matrix(&name, data, description, attributes)?;
    }

    debug!(count = matrices.len(), zones = zones.len(), mapping = %options.mapping, "wrote OMX matrices");
    Ok(())
}
