//! Shape and size validation
//!
//! Pure functions over element counts and dimensions, with no I/O.

pub mod bounds;
pub mod shape;

pub use bounds::{checked_byte_size, checked_element_count, validate_array_bounds};
pub use shape::{
    infer_fortran_side, infer_square_side, isqrt, rectangle_rows, validate_dimension,
    validate_min_index,
};
