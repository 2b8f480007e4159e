//! In-memory OMX container

use std::collections::BTreeMap;

use ndarray::Array2;

use super::store::{Attributes, OmxStore};
use crate::error::{Error, Result};
use crate::labels::AxisLabels;

/// One stored matrix
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OmxEntry {
    pub data: Array2<f32>,
    pub description: String,
    pub attributes: Attributes,
}

/// OMX container held in memory
///
/// Like an OMX file, every matrix and mapping must agree on the zone
/// count: the first matrix or mapping stored fixes the shape.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryOmx {
    title: String,
    shape: Option<(usize, usize)>,
    matrices: BTreeMap<String, OmxEntry>,
    mappings: BTreeMap<String, AxisLabels>,
}

impl MemoryOmx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Shape shared by all matrices, once one has been stored
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }

    pub fn entry(&self, name: &str) -> Option<&OmxEntry> {
        self.matrices.get(name)
    }

    fn check_shape(&mut self, shape: (usize, usize)) -> Result<()> {
        match self.shape {
            Some(existing) if existing != shape => Err(Error::Container(format!(
                "shape {shape:?} does not match container shape {existing:?}"
            ))),
            Some(_) => Ok(()),
            None => {
                self.shape = Some(shape);
                Ok(())
            }
        }
    }

    /// Serialize the whole container as JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| Error::Container(err.to_string()))
    }

    /// Restore a container serialized with [`MemoryOmx::to_json`]
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::Container(err.to_string()))
    }
}

impl OmxStore for MemoryOmx {
    fn matrix_names(&self) -> Result<Vec<String>> {
        Ok(self.matrices.keys().cloned().collect())
    }

    fn read_matrix(&self, name: &str) -> Result<Array2<f32>> {
        self.matrices
            .get(name)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| Error::MatrixNotFound(name.to_string()))
    }

    fn mapping_names(&self) -> Result<Vec<String>> {
        Ok(self.mappings.keys().cloned().collect())
    }

    fn read_mapping(&self, name: &str) -> Result<AxisLabels> {
        self.mappings
            .get(name)
            .cloned()
            .ok_or_else(|| Error::MappingNotFound(name.to_string()))
    }

    fn create_matrix(
        &mut self,
        name: &str,
        data: Array2<f32>,
        description: &str,
        attributes: &Attributes,
    ) -> Result<()> {
        self.check_shape(data.dim())?;
        self.matrices.insert(
            name.to_string(),
            OmxEntry {
                data,
                description: description.to_string(),
                attributes: attributes.clone(),
            },
        );
        Ok(())
    }

    fn create_mapping(&mut self, name: &str, labels: &AxisLabels) -> Result<()> {
        labels.ensure_unique()?;
        let len = labels.len();
        self.check_shape((len, len))?;
        self.mappings.insert(name.to_string(), labels.clone());
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = title.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omx::AttrValue;

    #[test]
    fn test_shape_is_fixed_by_first_entry() {
        let mut store = MemoryOmx::new();
        store
            .create_mapping("zones", &AxisLabels::new(vec![1, 2]))
            .unwrap();
        assert_eq!(store.shape(), Some((2, 2)));

        let err = store
            .create_matrix("bad", Array2::zeros((3, 3)), "", &Attributes::new())
            .unwrap_err();
        assert!(matches!(err, Error::Container(_)));
    }

    #[test]
    fn test_missing_names() {
        let store = MemoryOmx::new();
        assert!(matches!(store.read_matrix("x"), Err(Error::MatrixNotFound(name)) if name == "x"));
        assert!(matches!(store.read_mapping("y"), Err(Error::MappingNotFound(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_roundtrip() {
        let mut store = MemoryOmx::new();
        store.set_title("base year").unwrap();
        store
            .create_mapping("zones", &AxisLabels::new(vec![5, 9]))
            .unwrap();
        let mut attributes = Attributes::new();
        attributes.insert("mode".to_string(), AttrValue::from("auto"));
        attributes.insert("year".to_string(), AttrValue::from(2016i64));
        store
            .create_matrix("demand", ndarray::array![[1.5, 2.0], [0.0, 4.25]], "AM peak", &attributes)
            .unwrap();

        let restored = MemoryOmx::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(restored, store);
        assert_eq!(restored.entry("demand").unwrap().attributes["year"], AttrValue::Int(2016));
    }
}
