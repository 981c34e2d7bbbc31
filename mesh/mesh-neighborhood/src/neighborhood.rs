//! Neighborhood result types.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One vertex in the neighborhood of a source vertex.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neighbor {
    /// Index of the neighbor vertex.
    pub vertex: usize,
    /// Distance from the source: Euclidean for edge-hop neighborhoods,
    /// geodesic for geodesic ones.
    pub distance: f64,
    /// Neighbor position minus source position.
    pub offset: Vector3<f64>,
    /// Normal of the neighbor, if normals were supplied.
    pub normal: Option<Vector3<f64>>,
    /// Descriptor value of the neighbor, if a descriptor was supplied.
    pub descriptor: Option<f64>,
}

/// The neighbors of one source vertex.
///
/// Order depends on how the neighborhood was built: discovery order for
/// edge-hop neighborhoods, ascending vertex index for geodesic ones. Use
/// [`sorted_by_distance`](Self::sorted_by_distance) when distance order
/// matters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neighborhood {
    /// The vertex this neighborhood is centered on.
    pub source: usize,
    /// The neighbors, possibly including the source itself at distance 0.
    pub neighbors: Vec<Neighbor>,
}

impl Neighborhood {
    /// Number of neighbors.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the neighborhood has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Iterate over the neighbors.
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.neighbors.iter()
    }

    /// Indices of the member vertices, in stored order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().map(|n| n.vertex)
    }

    /// Look up a member by vertex index.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<&Neighbor> {
        self.neighbors.iter().find(|n| n.vertex == vertex)
    }

    /// Whether `vertex` is a member.
    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        self.get(vertex).is_some()
    }

    /// Return the neighborhood with members sorted by ascending distance.
    ///
    /// The sort is stable, so members at equal distance keep their
    /// relative order.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_neighborhood::{Neighbor, Neighborhood};
    /// use nalgebra::Vector3;
    ///
    /// let member = |vertex, distance| Neighbor {
    ///     vertex,
    ///     distance,
    ///     offset: Vector3::zeros(),
    ///     normal: None,
    ///     descriptor: None,
    /// };
    /// let hood = Neighborhood {
    ///     source: 0,
    ///     neighbors: vec![member(4, 2.0), member(0, 0.0), member(7, 1.0)],
    /// };
    /// let sorted: Vec<usize> = hood.sorted_by_distance().vertices().collect();
    /// assert_eq!(sorted, vec![0, 7, 4]);
    /// ```
    #[must_use]
    pub fn sorted_by_distance(mut self) -> Self {
        self.neighbors
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        self
    }
}

impl<'a> IntoIterator for &'a Neighborhood {
    type Item = &'a Neighbor;
    type IntoIter = std::slice::Iter<'a, Neighbor>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.iter()
    }
}
