//! Container backend interface
//!
//! OMX files are HDF5 containers. The codec only layers naming, mapping
//! and homogeneity rules on top, so all storage goes through [`OmxStore`].

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::error::Result;
use crate::labels::AxisLabels;

/// Value of a per-matrix attribute
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Attribute mapping attached to one matrix
pub type Attributes = BTreeMap<String, AttrValue>;

/// Named-matrix container with named zone mappings
pub trait OmxStore {
    /// Names of all stored matrices, in any order
    fn matrix_names(&self) -> Result<Vec<String>>;

    /// Read one matrix; fails `MatrixNotFound` if absent
    fn read_matrix(&self, name: &str) -> Result<Array2<f32>>;

    /// Names of all zone mappings, in any order
    fn mapping_names(&self) -> Result<Vec<String>>;

    /// Labels of one mapping, in key order; fails `MappingNotFound` if absent
    fn read_mapping(&self, name: &str) -> Result<AxisLabels>;

    /// Store a matrix with its description and attributes
    fn create_matrix(
        &mut self,
        name: &str,
        data: Array2<f32>,
        description: &str,
        attributes: &Attributes,
    ) -> Result<()>;

    /// Store a zone mapping
    fn create_mapping(&mut self, name: &str, labels: &AxisLabels) -> Result<()>;

    /// Set the container title
    fn set_title(&mut self, title: &str) -> Result<()>;
}
