//! Zone label sequences
//!
//! Labels are plain i32 zone numbers. They need not be sorted or
//! contiguous, but an axis used for lookup must not repeat a label.

use std::ops::Deref;

use hashbrown::HashMap;
use zonemat_core::{FormatError, Result};

/// Ordered label sequence for one matrix axis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AxisLabels(Vec<i32>);

impl AxisLabels {
    /// Wrap a label vector
    pub fn new(labels: Vec<i32>) -> Self {
        Self(labels)
    }

    /// Positional labels `0..len`, used for unlabelled buffers
    pub fn positional(len: usize) -> Self {
        Self((0..len as i32).collect())
    }

    /// Consecutive labels `start, start + 1, ...`
    pub fn consecutive(start: i32, len: usize) -> Self {
        Self((0..len as i32).map(|offset| start + offset).collect())
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<i32> {
        self.0
    }

    /// First `len` labels (all of them when `len` exceeds the length)
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Fail with `DuplicateLabel` on the first repeated label
    pub fn ensure_unique(&self) -> Result<()> {
        self.position_map().map(|_| ())
    }

    /// Label to position lookup table
    pub fn position_map(&self) -> Result<HashMap<i32, usize>> {
        let mut positions = HashMap::with_capacity(self.0.len());
        for (position, &label) in self.0.iter().enumerate() {
            if positions.insert(label, position).is_some() {
                return Err(FormatError::DuplicateLabel(label));
            }
        }
        Ok(positions)
    }

    /// Position of `label`, by linear scan
    pub fn position(&self, label: i32) -> Option<usize> {
        self.0.iter().position(|&candidate| candidate == label)
    }

    /// Distinct labels of `iter`, in order of first appearance
    pub fn first_appearance<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        let mut seen = hashbrown::HashSet::new();
        Self(iter.into_iter().filter(|label| seen.insert(*label)).collect())
    }

    /// Labels of `self` followed by the labels of `other` not already present
    pub fn union(&self, other: &AxisLabels) -> Self {
        Self::first_appearance(self.0.iter().chain(other.0.iter()).copied())
    }
}

impl Deref for AxisLabels {
    type Target = [i32];

    fn deref(&self) -> &[i32] {
        &self.0
    }
}

impl From<Vec<i32>> for AxisLabels {
    fn from(labels: Vec<i32>) -> Self {
        Self(labels)
    }
}

impl From<&[i32]> for AxisLabels {
    fn from(labels: &[i32]) -> Self {
        Self(labels.to_vec())
    }
}

impl FromIterator<i32> for AxisLabels {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AxisLabels {
    type Item = &'a i32;
    type IntoIter = std::slice::Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_map_rejects_duplicates() {
        let labels = AxisLabels::new(vec![10, 20, 30]);
        let positions = labels.position_map().unwrap();
        assert_eq!(positions[&20], 1);

        let labels = AxisLabels::new(vec![10, 20, 10]);
        assert_eq!(labels.ensure_unique(), Err(FormatError::DuplicateLabel(10)));
    }

    #[test]
    fn test_union_keeps_first_appearance() {
        let rows = AxisLabels::first_appearance([3, 3, 1, 1]);
        let cols = AxisLabels::first_appearance([1, 7, 3, 7]);
        assert_eq!(rows.as_slice(), &[3, 1]);
        assert_eq!(rows.union(&cols).as_slice(), &[3, 1, 7]);
    }

    #[test]
    fn test_truncated() {
        let labels = AxisLabels::consecutive(101, 4);
        assert_eq!(labels.as_slice(), &[101, 102, 103, 104]);
        assert_eq!(labels.truncated(2).as_slice(), &[101, 102]);
        assert_eq!(labels.truncated(9), labels);
        assert_eq!(AxisLabels::positional(3).as_slice(), &[0, 1, 2]);
    }
}
