//! Distance field representation.
//!
//! Stores per-vertex distance values computed by the propagator, together with
//! the seeds they were measured from.
//!
//! # Sentinel policy
//!
//! A raw value of `0.0` on a vertex that is not a seed means "unreached": the
//! vertex lies beyond the distance limit, behind a mask, or in another
//! connected component. [`DistanceField::correct_unreached`] rewrites those
//! values to [`UNREACHED_DISTANCE`] so that threshold comparisons treat them
//! as infinitely far. [`DistanceField::is_reached`] gives the same answer
//! before and after correction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value assigned to unreached vertices by [`DistanceField::correct_unreached`].
#[allow(clippy::cast_lossless)]
pub const UNREACHED_DISTANCE: f64 = f32::MAX as f64;

/// Per-vertex geodesic distance field.
///
/// # Example
///
/// ```
/// use mesh_geodesic::{DistanceField, UNREACHED_DISTANCE};
///
/// let mut field = DistanceField::from_parts(vec![0.0, 1.5, 0.0], vec![0]);
/// assert!(field.is_reached(0));
/// assert!(!field.is_reached(2));
///
/// field.correct_unreached();
/// assert_eq!(field.distance(2), UNREACHED_DISTANCE);
/// assert_eq!(field.distance(0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "FieldParts"))]
pub struct DistanceField {
    /// Distance values for each vertex.
    pub(crate) distances: Vec<f64>,
    /// Active seeds, sorted and deduplicated.
    pub(crate) seeds: Vec<usize>,
}

/// Serialized form of a [`DistanceField`]; seeds are normalized on the way in.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct FieldParts {
    distances: Vec<f64>,
    seeds: Vec<usize>,
}

#[cfg(feature = "serde")]
impl From<FieldParts> for DistanceField {
    fn from(parts: FieldParts) -> Self {
        Self::from_parts(parts.distances, parts.seeds)
    }
}

impl DistanceField {
    /// Create a field with every vertex unreached and no seeds.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            distances: vec![0.0; vertex_count],
            seeds: Vec::new(),
        }
    }

    /// Create a field from raw distances and the seeds they were measured from.
    ///
    /// Seeds out of range are ignored.
    #[must_use]
    pub fn from_parts(distances: Vec<f64>, mut seeds: Vec<usize>) -> Self {
        seeds.retain(|&s| s < distances.len());
        seeds.sort_unstable();
        seeds.dedup();
        Self { distances, seeds }
    }

    /// Get the distance to a vertex.
    ///
    /// Returns `0.0` (the raw unreached sentinel) if the index is out of bounds.
    #[inline]
    #[must_use]
    pub fn distance(&self, vertex: usize) -> f64 {
        self.distances.get(vertex).copied().unwrap_or(0.0)
    }

    /// The active seeds, sorted ascending.
    #[inline]
    #[must_use]
    pub fn seeds(&self) -> &[usize] {
        &self.seeds
    }

    /// Whether `vertex` is an active seed.
    #[inline]
    #[must_use]
    pub fn is_seed(&self, vertex: usize) -> bool {
        self.seeds.binary_search(&vertex).is_ok()
    }

    /// Whether `vertex` was reached by the propagation.
    ///
    /// Seeds are always reached. Any other vertex is reached iff its value is
    /// strictly positive and below [`UNREACHED_DISTANCE`].
    #[must_use]
    pub fn is_reached(&self, vertex: usize) -> bool {
        if self.is_seed(vertex) {
            return true;
        }
        let d = self.distance(vertex);
        d > 0.0 && d < UNREACHED_DISTANCE
    }

    /// Rewrite every unreached non-seed value to [`UNREACHED_DISTANCE`].
    ///
    /// Idempotent.
    pub fn correct_unreached(&mut self) {
        for (vertex, d) in self.distances.iter_mut().enumerate() {
            if *d <= 0.0 && self.seeds.binary_search(&vertex).is_err() {
                *d = UNREACHED_DISTANCE;
            }
        }
    }

    /// Consume the field and return it with [`correct_unreached`](Self::correct_unreached) applied.
    #[must_use]
    pub fn corrected(mut self) -> Self {
        self.correct_unreached();
        self
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Check if the distance field is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Get all distances as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.distances
    }

    /// Consume and return the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.distances
    }

    /// Iterate over (vertex index, distance) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.distances.iter().copied().enumerate()
    }

    /// Iterate over reached vertices only.
    pub fn iter_reached(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.iter().filter(|&(v, _)| self.is_reached(v))
    }

    /// Count the reached vertices, seeds included.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.iter_reached().count()
    }

    /// Count the unreached vertices.
    #[must_use]
    pub fn unreached_count(&self) -> usize {
        self.len() - self.reached_count()
    }

    /// Mean distance over reached vertices, seeds included at `0.0`.
    ///
    /// Returns `0.0` if nothing was reached.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_reached(&self) -> f64 {
        let (sum, count) = self
            .iter_reached()
            .fold((0.0, 0_usize), |(sum, count), (_, d)| (sum + d, count + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Find the reached vertex with the largest distance.
    ///
    /// Returns `None` if no vertex was reached.
    #[must_use]
    pub fn farthest_vertex(&self) -> Option<(usize, f64)> {
        self.iter_reached()
            .max_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
    }

    /// Largest reached distance, or `0.0` if nothing was reached.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.farthest_vertex().map_or(0.0, |(_, d)| d)
    }
}
