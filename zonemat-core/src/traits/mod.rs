//! Abstract interfaces shared by the codecs

pub mod element;

pub use element::MatrixElement;
