#![no_std]

//! zonemat core - binary matrix format definitions
//!
//! This crate provides the pure format definitions, element traits and
//! shape validation shared by the zonemat codecs. Nothing here performs I/O.

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
pub use validation::*;
