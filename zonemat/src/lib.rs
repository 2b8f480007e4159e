//! zonemat - binary codecs for zone-labelled demand matrices
//!
//! Readers and writers for the matrix files used in transportation demand
//! modelling, over any `std::io` stream or through a path-level handle.
//!
//! ## Architecture
//!
//! - **zonemat-core**: format constants, headers, element traits and shape
//!   inference (no I/O, `no_std`)
//! - **zonemat**: the stream codecs, labelled matrix types and file handles
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zonemat::{MatrixFile, OutputMode, ZoneSpec};
//!
//! fn example() -> zonemat::Result<()> {
//!     // Self-describing MDF file, labelled by zone number
//!     let matrix = MatrixFile::new("auto_demand.mdf").read_mdf(OutputMode::default())?;
//!     println!("{} matrix of shape {:?}", matrix.data_type(), matrix.shape());
//!
//!     // EMX files carry no labels; keep the first 3500 zones
//!     let emx = MatrixFile::new("mf01.emx").read_emx(&ZoneSpec::Count(3500), false)?;
//!     println!("emx shape {:?}", emx.shape());
//!     Ok(())
//! }
//! ```
//!
//! ## Formats
//!
//! - **MDF**: header, shape, per-axis labels, payload of f32/f64/i32/u32
//! - **EMX**: bare float32 square matrix
//! - **FORTRAN**: float32 rows, each prefixed by its 1-based row number
//! - **OMX**: named matrices sharing a zone mapping, through [`OmxStore`]

pub use zonemat_core::{
    // Format definitions
    DataType, MdfHeader, MdfShape,
    // Element trait
    MatrixElement,
    // Error handling
    ErrorCategory, FormatError, HeaderFields,
};

pub mod binary;
pub mod coerce;
pub mod emx;
pub mod error;
pub mod file_io;
pub mod fortran;
pub mod labels;
pub mod matrix;
pub mod mdf;
pub mod omx;

pub use coerce::{coerce_labeled, coerce_matrix, expand_array};
pub use emx::{read_emx, write_emx};
pub use error::{Error, Result};
pub use file_io::{FileFormat, MatrixFile};
pub use fortran::{
    read_fortran_rectangle, read_fortran_square, write_fortran, FortranReadOptions,
    FortranWriteOptions,
};
pub use labels::AxisLabels;
pub use matrix::{
    Decoded, Frame, MatrixInput, MatrixKind, MdfMatrix, Orientation, OutputMode, Series,
    TallMatrix, ZoneSpec,
};
pub use mdf::{peek_mdf, read_mdf, write_mdf, write_mdf_native};
pub use omx::{
    read_omx, write_omx, AttrValue, Attributes, MemoryOmx, OmxMatrices, OmxReadOptions,
    OmxStore, OmxWriteOptions,
};
