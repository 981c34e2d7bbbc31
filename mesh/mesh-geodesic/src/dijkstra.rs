//! Dijkstra's algorithm for geodesic distance computation.
//!
//! This module implements shortest-path computation on mesh surfaces
//! using Dijkstra's algorithm on the edge graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mesh_types::IndexedMesh;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distance::DistanceField;
use crate::error::{GeodesicError, GeodesicResult};
use crate::graph::MeshGraph;
use crate::mask::{passes, VertexMask};

const NO_PREDECESSOR: u32 = u32::MAX;

/// Geodesic distance solver using Dijkstra's algorithm.
///
/// Computes shortest-path distances along mesh edges from one or more
/// source vertices. The solver is an immutable snapshot of the mesh graph
/// and can be shared across threads; per-call scratch lives in a
/// [`Workspace`].
///
/// # Performance
///
/// Time complexity: O((V + E) log V) where V is vertices and E is edges.
/// A distance limit stops the search early, so localized queries only pay
/// for the region they touch.
///
/// # Example
///
/// ```
/// use mesh_geodesic::GeodesicSolver;
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let solver = GeodesicSolver::new(&mesh).unwrap();
/// let field = solver.propagate(&[0], None, None).unwrap();
/// assert_eq!(field.distance(0), 0.0);
/// assert!((field.distance(1) - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct GeodesicSolver {
    graph: MeshGraph,
}

/// State for the priority queue in Dijkstra's algorithm.
#[derive(Debug, Clone, Copy)]
struct State {
    /// Current vertex.
    vertex: u32,
    /// Distance from source(s) to this vertex.
    distance: f64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Shortest edge path between two vertices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodesicPath {
    /// Vertices along the path, source first and target last.
    pub vertices: Vec<usize>,
    /// Total path length.
    pub length: f64,
}

impl GeodesicPath {
    /// First vertex of the path.
    #[must_use]
    pub fn source(&self) -> Option<usize> {
        self.vertices.first().copied()
    }

    /// Last vertex of the path.
    #[must_use]
    pub fn target(&self) -> Option<usize> {
        self.vertices.last().copied()
    }

    /// Number of edges on the path.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

impl GeodesicSolver {
    /// Create a new geodesic solver from a mesh.
    ///
    /// Builds and validates the internal [`MeshGraph`].
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`MeshGraph::from_mesh`].
    pub fn new(mesh: &IndexedMesh) -> GeodesicResult<Self> {
        Ok(Self {
            graph: MeshGraph::from_mesh(mesh)?,
        })
    }

    /// Create a solver from a pre-built graph.
    ///
    /// Use this if you already have a graph to avoid rebuilding.
    #[must_use]
    pub const fn from_graph(graph: MeshGraph) -> Self {
        Self { graph }
    }

    /// Get a reference to the internal mesh graph.
    #[must_use]
    pub const fn graph(&self) -> &MeshGraph {
        &self.graph
    }

    /// Get the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Create fresh scratch space for repeated queries on this solver.
    #[must_use]
    pub fn workspace(&self) -> Workspace<'_> {
        Workspace::new(&self.graph)
    }

    /// Compute distances from a set of seed vertices.
    ///
    /// Convenience for a one-off query; batches should reuse a [`Workspace`].
    /// See [`Workspace::propagate`] for the semantics.
    ///
    /// # Errors
    ///
    /// See [`Workspace::propagate`].
    pub fn propagate(
        &self,
        seeds: &[usize],
        max_distance: Option<f64>,
        mask: Option<&VertexMask>,
    ) -> GeodesicResult<DistanceField> {
        self.workspace().propagate(seeds, max_distance, mask)
    }

    /// Compute unbounded distances from a single source vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::InvalidIndex`] if `source` is out of range.
    pub fn compute_from_vertex(&self, source: usize) -> GeodesicResult<DistanceField> {
        self.propagate(&[source], None, None)
    }

    /// Find the shortest edge path from `source` to `target`.
    ///
    /// # Errors
    ///
    /// See [`Workspace::shortest_path`].
    pub fn shortest_path(
        &self,
        source: usize,
        target: usize,
        mask: Option<&VertexMask>,
    ) -> GeodesicResult<Option<GeodesicPath>> {
        self.workspace().shortest_path(source, target, mask)
    }
}

/// Reusable per-worker scratch for distance propagation.
///
/// Buffers are sized once for the mesh and reset at the start of every
/// call, so no state leaks between queries. Only the vertices a query
/// touched are reset, which keeps bounded queries cheap on large meshes.
#[derive(Debug)]
pub struct Workspace<'a> {
    graph: &'a MeshGraph,
    tentative: Vec<f64>,
    settled: Vec<bool>,
    predecessor: Vec<u32>,
    touched: Vec<u32>,
    order: Vec<u32>,
    heap: BinaryHeap<State>,
}

impl<'a> Workspace<'a> {
    /// Allocate scratch for a graph.
    #[must_use]
    pub fn new(graph: &'a MeshGraph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            tentative: vec![f64::INFINITY; n],
            settled: vec![false; n],
            predecessor: vec![NO_PREDECESSOR; n],
            touched: Vec::new(),
            order: Vec::new(),
            heap: BinaryHeap::new(),
        }
    }

    /// The graph this workspace runs on.
    #[must_use]
    pub const fn graph(&self) -> &'a MeshGraph {
        self.graph
    }

    /// Compute distances from a set of seed vertices.
    ///
    /// The distance to a vertex is the minimum over all seeds. Vertices
    /// excluded by `mask` are never relaxed into, and masked seeds are
    /// dropped.
    ///
    /// `max_distance = Some(d)` with `d > 0` stops the search once the
    /// frontier passes `d`. `None` or a non-positive limit runs to
    /// completion. Vertices beyond the limit or unreachable read the raw
    /// sentinel `0.0`; see [`DistanceField`].
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidArgument`] if `seeds` is empty,
    ///   `max_distance` is NaN, or the mask length is wrong
    /// - [`GeodesicError::InvalidIndex`] if a seed is out of range
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex indices are u32, meshes with >4B vertices unsupported
    pub fn propagate(
        &mut self,
        seeds: &[usize],
        max_distance: Option<f64>,
        mask: Option<&VertexMask>,
    ) -> GeodesicResult<DistanceField> {
        let vertex_count = self.graph.vertex_count();
        if seeds.is_empty() {
            return Err(GeodesicError::invalid_argument(
                "seeds",
                "at least one seed is required",
            ));
        }
        for &seed in seeds {
            GeodesicError::check_index(seed, vertex_count)?;
        }
        if let Some(mask) = mask {
            mask.check_len(vertex_count)?;
        }
        let limit = match max_distance {
            Some(d) if d.is_nan() => {
                return Err(GeodesicError::invalid_argument(
                    "max_distance",
                    "must not be NaN",
                ));
            }
            Some(d) if d > 0.0 => d,
            _ => f64::INFINITY,
        };

        self.run(seeds, limit, mask, None);

        let mut distances = vec![0.0; vertex_count];
        for &v in &self.order {
            distances[v as usize] = self.tentative[v as usize];
        }
        let active = seeds.iter().copied().filter(|&s| passes(mask, s)).collect();

        Ok(DistanceField::from_parts(distances, active))
    }

    /// Find the shortest edge path from `source` to `target`.
    ///
    /// Returns `Ok(None)` if the target cannot be reached, including when
    /// either endpoint is excluded by `mask`.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidIndex`] if either endpoint is out of range
    /// - [`GeodesicError::InvalidArgument`] if the mask length is wrong
    pub fn shortest_path(
        &mut self,
        source: usize,
        target: usize,
        mask: Option<&VertexMask>,
    ) -> GeodesicResult<Option<GeodesicPath>> {
        let vertex_count = self.graph.vertex_count();
        GeodesicError::check_index(source, vertex_count)?;
        GeodesicError::check_index(target, vertex_count)?;
        if let Some(mask) = mask {
            mask.check_len(vertex_count)?;
        }
        if !passes(mask, source) || !passes(mask, target) {
            return Ok(None);
        }

        self.run(&[source], f64::INFINITY, mask, Some(target));
        if !self.settled[target] {
            return Ok(None);
        }

        let mut vertices = vec![target];
        let mut current = target;
        while current != source {
            let prev = self.predecessor[current];
            if prev == NO_PREDECESSOR {
                return Ok(None);
            }
            current = prev as usize;
            vertices.push(current);
        }
        vertices.reverse();

        Ok(Some(GeodesicPath {
            vertices,
            length: self.tentative[target],
        }))
    }

    /// Clear the state left by the previous query.
    fn reset(&mut self) {
        for &v in &self.touched {
            let v = v as usize;
            self.tentative[v] = f64::INFINITY;
            self.settled[v] = false;
            self.predecessor[v] = NO_PREDECESSOR;
        }
        self.touched.clear();
        self.order.clear();
        self.heap.clear();
    }

    /// Run Dijkstra from validated seeds, settling vertices up to `limit`.
    ///
    /// Stops early once `target` is settled.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex indices are u32, meshes with >4B vertices unsupported
    fn run(
        &mut self,
        seeds: &[usize],
        limit: f64,
        mask: Option<&VertexMask>,
        target: Option<usize>,
    ) {
        self.reset();

        // Initialize sources
        for &seed in seeds {
            if !passes(mask, seed) || self.tentative[seed].is_finite() {
                continue;
            }
            self.tentative[seed] = 0.0;
            self.touched.push(seed as u32);
            self.heap.push(State {
                vertex: seed as u32,
                distance: 0.0,
            });
        }

        // Process vertices in order of increasing distance
        while let Some(State { vertex, distance }) = self.heap.pop() {
            let vertex_idx = vertex as usize;

            // Skip stale entries
            if self.settled[vertex_idx] || distance > self.tentative[vertex_idx] {
                continue;
            }
            // The heap is ordered, so everything left is beyond the limit too
            if distance > limit {
                break;
            }

            self.settled[vertex_idx] = true;
            self.order.push(vertex);
            if target == Some(vertex_idx) {
                break;
            }

            // Relax edges
            for &(neighbor, edge_length) in self.graph.neighbors(vertex_idx) {
                let neighbor_idx = neighbor as usize;
                if self.settled[neighbor_idx] || !passes(mask, neighbor_idx) {
                    continue;
                }

                let new_distance = distance + edge_length;
                if new_distance <= limit && new_distance < self.tentative[neighbor_idx] {
                    if self.tentative[neighbor_idx].is_infinite() {
                        self.touched.push(neighbor);
                    }
                    self.tentative[neighbor_idx] = new_distance;
                    self.predecessor[neighbor_idx] = vertex;
                    self.heap.push(State {
                        vertex: neighbor,
                        distance: new_distance,
                    });
                }
            }
        }
    }
}
