//! Per-vertex validity masks.
//!
//! A mask restricts every computation to a sub-surface, such as the cortex
//! without the medial wall. Excluded vertices are never seeds, never relaxed
//! into and never used as intermediates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GeodesicError, GeodesicResult};

/// Per-vertex validity flags.
///
/// # Example
///
/// ```
/// use mesh_geodesic::VertexMask;
///
/// let mask = VertexMask::from_valid_indices(5, &[0, 2, 4]).unwrap();
/// assert!(mask.is_valid(2));
/// assert!(!mask.is_valid(1));
/// assert_eq!(mask.valid_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexMask {
    valid: Vec<bool>,
}

impl VertexMask {
    /// A mask with every vertex valid.
    #[must_use]
    pub fn all_valid(vertex_count: usize) -> Self {
        Self {
            valid: vec![true; vertex_count],
        }
    }

    /// Build a mask from per-vertex validity flags (`true` = keep).
    #[must_use]
    pub const fn from_valid(valid: Vec<bool>) -> Self {
        Self { valid }
    }

    /// Build a mask from per-vertex exclusion flags (`true` = drop).
    #[must_use]
    pub fn from_excluded(excluded: &[bool]) -> Self {
        Self {
            valid: excluded.iter().map(|&e| !e).collect(),
        }
    }

    /// Build a mask that keeps only the listed vertices.
    ///
    /// This is the usual shape of a cortex label: a list of vertex indices.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::InvalidIndex`] if an index is `>= vertex_count`.
    pub fn from_valid_indices(vertex_count: usize, indices: &[usize]) -> GeodesicResult<Self> {
        let mut valid = vec![false; vertex_count];
        for &index in indices {
            GeodesicError::check_index(index, vertex_count)?;
            valid[index] = true;
        }
        Ok(Self { valid })
    }

    /// Whether `vertex` is valid. Out-of-range vertices are not.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, vertex: usize) -> bool {
        self.valid.get(vertex).copied().unwrap_or(false)
    }

    /// Mark a vertex as excluded.
    ///
    /// Returns `false` if the index is out of bounds.
    pub fn exclude(&mut self, vertex: usize) -> bool {
        self.valid.get_mut(vertex).is_some_and(|v| {
            *v = false;
            true
        })
    }

    /// Number of vertices the mask covers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.valid.len()
    }

    /// Whether the mask covers no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }

    /// Number of valid vertices.
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Number of excluded vertices.
    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.len() - self.valid_count()
    }

    /// Iterate over the indices of valid vertices in ascending order.
    pub fn iter_valid(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| v.then_some(i))
    }

    /// The raw flags.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.valid
    }

    /// Check that the mask covers exactly `vertex_count` vertices.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::InvalidArgument`] on a length mismatch.
    pub fn check_len(&self, vertex_count: usize) -> GeodesicResult<()> {
        if self.valid.len() == vertex_count {
            Ok(())
        } else {
            Err(GeodesicError::invalid_argument(
                "mask",
                format!(
                    "length {} does not match vertex count {vertex_count}",
                    self.valid.len()
                ),
            ))
        }
    }
}

/// Whether `vertex` passes an optional mask.
#[inline]
pub(crate) fn passes(mask: Option<&VertexMask>, vertex: usize) -> bool {
    mask.is_none_or(|m| m.is_valid(vertex))
}
