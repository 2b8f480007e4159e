//! Binary format definitions
//!
//! Pure data structure definitions for the on-disk layouts. No I/O.

pub mod constants;
pub mod fortran;
pub mod header;

pub use constants::DEFAULT_OMX_MAPPING;
pub use fortran::{decode_row_tag, encode_row_tag, row_width};
pub use header::{DataType, MdfHeader, MdfShape};
