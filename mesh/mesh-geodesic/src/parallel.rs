//! Parallel per-vertex queries.
//!
//! Fans a list of query vertices out over the rayon pool. Every worker owns a
//! private [`Workspace`] derived from the shared, immutable solver, and the
//! results come back in query order.

use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dijkstra::{GeodesicSolver, Workspace};
use crate::error::{GeodesicError, GeodesicResult};
use crate::mask::VertexMask;

/// Values computed for a list of query vertices.
///
/// `values[i]` belongs to `vertices[i]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerVertex<T> {
    /// Query vertices, in query order.
    pub vertices: Vec<usize>,
    /// One value per query vertex.
    pub values: Vec<T>,
}

impl<T> PerVertex<T> {
    /// Number of query vertices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether there are no query vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over (vertex index, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.vertices.iter().copied().zip(&self.values)
    }

    /// Look up the value computed for `vertex`.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<&T> {
        let (_, value) = self.iter().find(|&(v, _)| v == vertex)?;
        Some(value)
    }
}

impl<T: Clone> PerVertex<T> {
    /// Spread the values into a dense per-vertex array.
    ///
    /// Vertices that were not queried get `fill`; out-of-range query
    /// vertices are skipped.
    #[must_use]
    pub fn scatter(&self, vertex_count: usize, fill: T) -> Vec<T> {
        let mut dense = vec![fill; vertex_count];
        for (v, value) in self.iter() {
            if let Some(slot) = dense.get_mut(v) {
                *slot = value.clone();
            }
        }
        dense
    }
}

/// Resolve the vertices a batch should run on.
///
/// `None` selects every vertex that passes `mask`, in ascending order. An
/// explicit list is returned as given after validation.
///
/// # Errors
///
/// - [`GeodesicError::InvalidIndex`] if a query is out of range
/// - [`GeodesicError::InvalidArgument`] if a query is excluded by `mask`
///   or the mask length is wrong
///
/// # Example
///
/// ```
/// use mesh_geodesic::{resolve_queries, VertexMask};
///
/// let mask = VertexMask::from_excluded(&[false, true, false]);
/// assert_eq!(resolve_queries(3, None, Some(&mask)).unwrap(), vec![0, 2]);
/// assert!(resolve_queries(3, Some(&[1]), Some(&mask)).is_err());
/// ```
pub fn resolve_queries(
    vertex_count: usize,
    queries: Option<&[usize]>,
    mask: Option<&VertexMask>,
) -> GeodesicResult<Vec<usize>> {
    if let Some(mask) = mask {
        mask.check_len(vertex_count)?;
    }

    let Some(queries) = queries else {
        return Ok(match mask {
            Some(mask) => mask.iter_valid().collect(),
            None => (0..vertex_count).collect(),
        });
    };

    for &query in queries {
        GeodesicError::check_index(query, vertex_count)?;
        if mask.is_some_and(|m| !m.is_valid(query)) {
            return Err(GeodesicError::invalid_argument(
                "queries",
                format!("vertex {query} is excluded by the mask"),
            ));
        }
    }
    Ok(queries.to_vec())
}

/// Run `task` for every query vertex in parallel.
///
/// Each rayon worker gets its own [`Workspace`] through `map_init`, so tasks
/// never share scratch state. Output slot `i` belongs to `queries[i]`. The
/// first error fails the whole batch.
///
/// # Errors
///
/// Returns the error of a failing task.
///
/// # Example
///
/// ```
/// use mesh_geodesic::{par_map_queries, GeodesicError, GeodesicSolver};
/// use mesh_types::cube;
///
/// let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
/// let reached = par_map_queries(&solver, &[0, 6], |workspace, v| {
///     let field = workspace.propagate(&[v], Some(2.5), None)?;
///     Ok::<_, GeodesicError>(field.reached_count())
/// })
/// .unwrap();
/// assert_eq!(reached.len(), 2);
/// ```
pub fn par_map_queries<T, E, F>(
    solver: &GeodesicSolver,
    queries: &[usize],
    task: F,
) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send,
    F: Fn(&mut Workspace<'_>, usize) -> Result<T, E> + Sync + Send,
{
    queries
        .par_iter()
        .map_init(
            || solver.workspace(),
            |workspace, &query| task(workspace, query),
        )
        .collect()
}

/// Mean geodesic distance from each query vertex to every reached vertex.
///
/// Propagation runs unbounded. The query vertex itself counts at distance
/// zero, and vertices in other components or behind the mask are ignored.
///
/// # Errors
///
/// See [`resolve_queries`].
///
/// # Example
///
/// ```
/// use mesh_geodesic::{mean_distances, GeodesicSolver};
/// use mesh_types::cube;
///
/// let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
/// let means = mean_distances(&solver, Some(&[0]), None).unwrap();
/// assert!(means.values[0] > 0.0);
/// ```
pub fn mean_distances(
    solver: &GeodesicSolver,
    queries: Option<&[usize]>,
    mask: Option<&VertexMask>,
) -> GeodesicResult<PerVertex<f64>> {
    let vertices = resolve_queries(solver.vertex_count(), queries, mask)?;
    let start = Instant::now();

    info!(
        queries = vertices.len(),
        vertices = solver.vertex_count(),
        masked = mask.is_some(),
        "Starting mean geodesic distance"
    );

    let values = par_map_queries(solver, &vertices, |workspace, v| {
        workspace
            .propagate(&[v], None, mask)
            .map(|field| field.mean_reached())
    })?;

    info!(
        queries = vertices.len(),
        elapsed = ?start.elapsed(),
        "Mean geodesic distance complete"
    );

    Ok(PerVertex { vertices, values })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{cube, grid};

    #[test]
    fn resolve_all_vertices() {
        assert_eq!(resolve_queries(4, None, None).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn resolve_explicit_list_keeps_order() {
        assert_eq!(
            resolve_queries(4, Some(&[3, 1, 3]), None).unwrap(),
            vec![3, 1, 3]
        );
        assert!(matches!(
            resolve_queries(4, Some(&[4]), None),
            Err(GeodesicError::InvalidIndex { index: 4, .. })
        ));
    }

    #[test]
    fn resolve_rejects_masked_query() {
        let mask = VertexMask::from_excluded(&[false, true]);
        assert!(matches!(
            resolve_queries(2, Some(&[1]), Some(&mask)),
            Err(GeodesicError::InvalidArgument {
                name: "queries",
                ..
            })
        ));
    }

    #[test]
    fn results_follow_query_order() {
        let solver = GeodesicSolver::new(&grid(8, 8, 1.0)).unwrap();
        let queries: Vec<usize> = (0..81).rev().collect();
        let echoed = par_map_queries(&solver, &queries, |_, v| Ok::<_, GeodesicError>(v)).unwrap();
        assert_eq!(echoed, queries);
    }

    #[test]
    fn parallel_matches_sequential() {
        let solver = GeodesicSolver::new(&grid(8, 8, 1.0)).unwrap();
        let queries: Vec<usize> = (0..81).collect();

        let parallel = par_map_queries(&solver, &queries, |workspace, v| {
            workspace.propagate(&[v], Some(3.0), None)
        })
        .unwrap();

        for (&v, field) in queries.iter().zip(&parallel) {
            let sequential = solver.propagate(&[v], Some(3.0), None).unwrap();
            assert_eq!(field, &sequential);
        }
    }

    #[test]
    fn first_error_fails_batch() {
        let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
        let err = par_map_queries(&solver, &[0, 1, 2], |workspace, v| {
            let seed = if v == 1 { 100 } else { v };
            workspace.propagate(&[seed], None, None)
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid vertex index: 100 (mesh has 8 vertices)"
        );
    }

    #[test]
    fn mean_distance_on_cube_is_symmetric() {
        let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
        let means = mean_distances(&solver, None, None).unwrap();
        assert_eq!(means.len(), 8);
        for &mean in &means.values {
            assert!(mean > 0.0);
        }

        // Corners 0 and 6 see the same diagonal pattern.
        let m0 = *means.get(0).unwrap();
        let m6 = *means.get(6).unwrap();
        assert_relative_eq!(m0, m6, epsilon = 1e-10);
    }

    #[test]
    fn mean_distance_ignores_masked_vertices() {
        let solver = GeodesicSolver::new(&grid(1, 1, 1.0)).unwrap();
        // Grid vertices: 0 (0,0), 1 (1,0), 2 (0,1), 3 (1,1); diagonal 0-3.
        let mask = VertexMask::from_excluded(&[false, false, true, true]);
        let means = mean_distances(&solver, Some(&[0]), Some(&mask)).unwrap();
        assert_relative_eq!(means.values[0], 0.5, epsilon = 1e-10);
    }

    #[test]
    fn scatter_fills_missing_vertices() {
        let values = PerVertex {
            vertices: vec![2, 0],
            values: vec![1.5, 0.5],
        };
        assert_eq!(values.scatter(4, -1.0), vec![0.5, -1.0, 1.5, -1.0]);
        assert_eq!(values.get(2), Some(&1.5));
        assert_eq!(values.get(3), None);
    }
}
