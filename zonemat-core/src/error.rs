//! Error types for matrix format operations

/// Header field values observed when an MDF header is rejected.
///
/// Fields after the magic number are `None` when the header was rejected
/// before they were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    pub magic: u32,
    pub version: Option<u32>,
    pub data_type: Option<u32>,
    pub ndim: Option<u32>,
}

impl HeaderFields {
    /// Fields for a header rejected on its magic number alone
    pub const fn magic_only(magic: u32) -> Self {
        Self {
            magic,
            version: None,
            data_type: None,
            ndim: None,
        }
    }
}

/// Broad families of format errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or unsupported file header
    Header,
    /// Element counts or shapes that do not add up
    Shape,
    /// Axis labels that disagree or repeat
    Labels,
    /// Caller-supplied parameter out of range
    Parameter,
    /// Multi-matrix container rules
    Container,
}

/// Errors that can occur while encoding or decoding matrix files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Bad magic number, version, data type code or dimensionality
    HeaderInvalid(HeaderFields),
    /// Element type code outside the supported table
    UnsupportedDataType(u32),
    /// Declared element count and actual stream length disagree
    LengthMismatch { expected: u64, actual: u64 },
    /// No square shape fits the number of elements
    NotSquare { elements: u64 },
    /// Row and column axes of one matrix differ
    ShapeMismatch { rows: usize, cols: usize },
    /// Two label sequences that must be equal are not
    LabelMismatch { expected: usize, actual: usize },
    /// Size parameter must be positive
    InvalidDimension(i64),
    /// Container holds zero or several zone mappings and none was named
    AmbiguousMapping { found: usize },
    /// A matrix collection mixes raw, wide and tall inputs
    InconsistentMatrixKinds,
    /// An unlabelled buffer was given where labels are required
    RawNotAllowed,
    /// The same (row, column) pair appears twice in a tall matrix
    DuplicateEntry { row: i32, col: i32 },
    /// The same label appears twice on an axis used for lookup
    DuplicateLabel(i32),
    /// A FORTRAN row tag points outside the label sequence
    RowIndexOutOfRange { index: i64, rows: usize },
    /// Size arithmetic would overflow
    SizeOverflow,
}

impl FormatError {
    /// Family this error belongs to
    pub const fn category(&self) -> ErrorCategory {
        match self {
            FormatError::HeaderInvalid(_) | FormatError::UnsupportedDataType(_) => {
                ErrorCategory::Header
            }
            FormatError::LengthMismatch { .. }
            | FormatError::NotSquare { .. }
            | FormatError::ShapeMismatch { .. }
            | FormatError::SizeOverflow => ErrorCategory::Shape,
            FormatError::LabelMismatch { .. }
            | FormatError::DuplicateEntry { .. }
            | FormatError::DuplicateLabel(_)
            | FormatError::RowIndexOutOfRange { .. } => ErrorCategory::Labels,
            FormatError::InvalidDimension(_) | FormatError::RawNotAllowed => {
                ErrorCategory::Parameter
            }
            FormatError::AmbiguousMapping { .. } | FormatError::InconsistentMatrixKinds => {
                ErrorCategory::Container
            }
        }
    }
}

struct OptField(Option<u32>);

impl core::fmt::Display for OptField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "-"),
        }
    }
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FormatError::HeaderInvalid(fields) => write!(
                f,
                "Unexpected file header: magic number: {:X}, version: {}, data type: {}, dimensions: {}",
                fields.magic,
                OptField(fields.version),
                OptField(fields.data_type),
                OptField(fields.ndim)
            ),
            FormatError::UnsupportedDataType(code) => {
                write!(f, "Unsupported data type code {code}")
            }
            FormatError::LengthMismatch { expected, actual } => {
                write!(f, "Expected {expected} elements, found {actual}")
            }
            FormatError::NotSquare { elements } => {
                write!(f, "Could not infer a square matrix from {elements} elements")
            }
            FormatError::ShapeMismatch { rows, cols } => write!(
                f,
                "Row axis ({rows} labels) does not match column axis ({cols} labels)"
            ),
            FormatError::LabelMismatch { expected, actual } => write!(
                f,
                "Label sequences differ (expected {expected} labels, got {actual})"
            ),
            FormatError::InvalidDimension(value) => {
                write!(f, "Dimension must be positive, got {value}")
            }
            FormatError::AmbiguousMapping { found } => write!(
                f,
                "Container holds {found} zone mappings; name the one to use"
            ),
            FormatError::InconsistentMatrixKinds => {
                write!(f, "All matrices must be of the same kind")
            }
            FormatError::RawNotAllowed => write!(f, "Only labelled matrices are supported"),
            FormatError::DuplicateEntry { row, col } => {
                write!(f, "Duplicate entry for ({row}, {col})")
            }
            FormatError::DuplicateLabel(label) => write!(f, "Duplicate label {label}"),
            FormatError::RowIndexOutOfRange { index, rows } => write!(
                f,
                "Row index {index} out of range for {rows} labels"
            ),
            FormatError::SizeOverflow => write!(f, "Matrix size overflows"),
        }
    }
}

impl core::error::Error for FormatError {}

/// Result type for format operations
pub type Result<T> = core::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            FormatError::HeaderInvalid(HeaderFields::magic_only(0)).category(),
            ErrorCategory::Header
        );
        assert_eq!(
            FormatError::NotSquare { elements: 3 }.category(),
            ErrorCategory::Shape
        );
        assert_eq!(FormatError::DuplicateLabel(4).category(), ErrorCategory::Labels);
        assert_eq!(FormatError::InvalidDimension(0).category(), ErrorCategory::Parameter);
        assert_eq!(
            FormatError::AmbiguousMapping { found: 2 }.category(),
            ErrorCategory::Container
        );
    }
}
