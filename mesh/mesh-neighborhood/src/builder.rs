//! Fluent builder API for neighborhood queries.
//!
//! # Example
//!
//! ```
//! use mesh_geodesic::GeodesicSolver;
//! use mesh_neighborhood::NeighborhoodBuilder;
//! use mesh_types::cube;
//!
//! let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
//!
//! // One-ring of vertex 0, without the vertex itself
//! let rings = NeighborhoodBuilder::new(&solver)
//!     .include_self(false)
//!     .edge_hops(Some(&[0]), 1)
//!     .unwrap();
//! assert_eq!(rings[0].len(), 6);
//!
//! // Everything within geodesic distance 2.5 of every vertex
//! let discs = NeighborhoodBuilder::new(&solver)
//!     .geodesic(None, 2.5)
//!     .unwrap();
//! assert_eq!(discs.len(), 8);
//! ```

use std::collections::VecDeque;
use std::time::Instant;

use mesh_geodesic::{
    par_map_queries, resolve_queries, GeodesicError, GeodesicResult, GeodesicSolver, MeshGraph,
    VertexMask,
};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::info;

use crate::neighborhood::{Neighbor, Neighborhood};

/// Fluent builder for vertex neighborhoods.
///
/// Two modes are available:
///
/// - [`edge_hops`](Self::edge_hops): every vertex within `k` mesh edges,
///   in breadth-first discovery order, with Euclidean distances
/// - [`geodesic`](Self::geodesic): every vertex within a geodesic radius,
///   in ascending vertex order, with geodesic distances
///
/// By default the source vertex is included at distance 0.
pub struct NeighborhoodBuilder<'a> {
    solver: &'a GeodesicSolver,
    include_self: bool,
    normals: Option<&'a [Vector3<f64>]>,
    descriptor: Option<&'a [f64]>,
    mask: Option<&'a VertexMask>,
}

impl<'a> NeighborhoodBuilder<'a> {
    /// Create a new `NeighborhoodBuilder` for the given solver.
    #[must_use]
    pub const fn new(solver: &'a GeodesicSolver) -> Self {
        Self {
            solver,
            include_self: true,
            normals: None,
            descriptor: None,
            mask: None,
        }
    }

    /// Include or omit the source vertex itself.
    #[must_use]
    pub const fn include_self(mut self, include: bool) -> Self {
        self.include_self = include;
        self
    }

    /// Attach per-vertex normals, copied onto each neighbor.
    ///
    /// Must have one entry per mesh vertex.
    #[must_use]
    pub const fn normals(mut self, normals: &'a [Vector3<f64>]) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach a per-vertex descriptor (e.g. cortical thickness), copied onto
    /// each neighbor.
    ///
    /// Must have one entry per mesh vertex.
    #[must_use]
    pub const fn descriptor(mut self, values: &'a [f64]) -> Self {
        self.descriptor = Some(values);
        self
    }

    /// Restrict the neighborhoods to vertices that pass `mask`.
    #[must_use]
    pub const fn mask(mut self, mask: &'a VertexMask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Collect every vertex within `k` edge hops of each query vertex.
    ///
    /// `queries = None` runs on every vertex that passes the mask. Members
    /// come in breadth-first discovery order, source first when included;
    /// distances are Euclidean.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidArgument`] if `k == 0`, an attached array
    ///   has the wrong length, or a query is masked
    /// - [`GeodesicError::InvalidIndex`] if a query is out of range
    pub fn edge_hops(
        &self,
        queries: Option<&[usize]>,
        k: usize,
    ) -> GeodesicResult<Vec<Neighborhood>> {
        if k == 0 {
            return Err(GeodesicError::invalid_argument("k", "must be at least 1"));
        }
        let queries = self.prepare(queries)?;
        let graph = self.solver.graph();
        let start = Instant::now();

        info!(queries = queries.len(), k, "Starting hop neighborhoods");

        let result: Vec<Neighborhood> = queries
            .par_iter()
            .map_init(
                || HopScratch::new(graph.vertex_count()),
                |scratch, &source| self.hop_neighborhood(graph, scratch, source, k),
            )
            .collect();

        info!(
            queries = result.len(),
            members = result.iter().map(Neighborhood::len).sum::<usize>(),
            elapsed = ?start.elapsed(),
            "Edge-hop neighborhoods complete"
        );

        Ok(result)
    }

    /// Collect every vertex within geodesic distance `max_distance` of each
    /// query vertex.
    ///
    /// `queries = None` runs on every vertex that passes the mask. Members
    /// come in ascending vertex order. Queries run in parallel.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::InvalidArgument`] if `max_distance` is not
    ///   positive, an attached array has the wrong length, or a query is
    ///   masked
    /// - [`GeodesicError::InvalidIndex`] if a query is out of range
    pub fn geodesic(
        &self,
        queries: Option<&[usize]>,
        max_distance: f64,
    ) -> GeodesicResult<Vec<Neighborhood>> {
        if max_distance.is_nan() || max_distance <= 0.0 {
            return Err(GeodesicError::invalid_argument(
                "max_distance",
                format!("must be positive, got {max_distance}"),
            ));
        }
        let queries = self.prepare(queries)?;
        let graph = self.solver.graph();
        let start = Instant::now();

        info!(
            queries = queries.len(),
            max_distance, "Starting geodesic neighborhoods"
        );

        let result = par_map_queries(self.solver, &queries, |workspace, source| {
            let limit = Some(max_distance);
            let field = workspace.propagate(&[source], limit, self.mask)?;
            let origin = graph.positions()[source];

            let neighbors = field
                .iter()
                .filter(|&(j, d)| {
                    if j == source {
                        self.include_self
                    } else {
                        d > 0.0 && d <= max_distance
                    }
                })
                .map(|(j, d)| self.member(graph, &origin, j, d))
                .collect();

            Ok::<_, GeodesicError>(Neighborhood { source, neighbors })
        })?;

        info!(
            queries = result.len(),
            members = result.iter().map(Neighborhood::len).sum::<usize>(),
            elapsed = ?start.elapsed(),
            "Geodesic neighborhoods complete"
        );

        Ok(result)
    }

    /// Validate attached arrays and resolve the query list.
    fn prepare(&self, queries: Option<&[usize]>) -> GeodesicResult<Vec<usize>> {
        let vertex_count = self.solver.vertex_count();
        if let Some(normals) = self.normals {
            check_len("normals", normals.len(), vertex_count)?;
        }
        if let Some(descriptor) = self.descriptor {
            check_len("descriptor", descriptor.len(), vertex_count)?;
        }
        resolve_queries(vertex_count, queries, self.mask)
    }

    /// Breadth-first search up to `k` hops from `source`.
    fn hop_neighborhood(
        &self,
        graph: &MeshGraph,
        scratch: &mut HopScratch,
        source: usize,
        k: usize,
    ) -> Neighborhood {
        scratch.reset();
        let origin = graph.positions()[source];
        let mut neighbors = Vec::new();

        scratch.visit(source);
        if self.include_self {
            neighbors.push(self.member(graph, &origin, source, 0.0));
        }
        scratch.queue.push_back((source, 0));

        while let Some((vertex, hops)) = scratch.queue.pop_front() {
            if hops == k {
                continue;
            }
            for &(next, _) in graph.neighbors(vertex) {
                let next = next as usize;
                if scratch.visited[next] || !self.mask.is_none_or(|m| m.is_valid(next)) {
                    continue;
                }
                scratch.visit(next);
                let distance = (graph.positions()[next] - origin).norm();
                neighbors.push(self.member(graph, &origin, next, distance));
                scratch.queue.push_back((next, hops + 1));
            }
        }

        Neighborhood { source, neighbors }
    }

    fn member(
        &self,
        graph: &MeshGraph,
        origin: &Point3<f64>,
        vertex: usize,
        distance: f64,
    ) -> Neighbor {
        Neighbor {
            vertex,
            distance,
            offset: graph.positions()[vertex] - origin,
            normal: self.normals.and_then(|n| n.get(vertex).copied()),
            descriptor: self.descriptor.and_then(|d| d.get(vertex).copied()),
        }
    }
}

/// Per-worker breadth-first search state.
struct HopScratch {
    visited: Vec<bool>,
    touched: Vec<usize>,
    queue: VecDeque<(usize, usize)>,
}

impl HopScratch {
    fn new(vertex_count: usize) -> Self {
        Self {
            visited: vec![false; vertex_count],
            touched: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    fn visit(&mut self, vertex: usize) {
        self.visited[vertex] = true;
        self.touched.push(vertex);
    }

    fn reset(&mut self) {
        for &v in &self.touched {
            self.visited[v] = false;
        }
        self.touched.clear();
        self.queue.clear();
    }
}

fn check_len(name: &'static str, len: usize, vertex_count: usize) -> GeodesicResult<()> {
    if len == vertex_count {
        Ok(())
    } else {
        Err(GeodesicError::invalid_argument(
            name,
            format!("length {len} does not match vertex count {vertex_count}"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{cube, grid};

    fn cube_solver() -> GeodesicSolver {
        GeodesicSolver::new(&cube(1.0)).unwrap()
    }

    #[test]
    fn one_ring_on_cube() {
        let solver = cube_solver();
        let hoods = NeighborhoodBuilder::new(&solver)
            .edge_hops(Some(&[0]), 1)
            .unwrap();

        let hood = &hoods[0];
        assert_eq!(hood.source, 0);
        // Source first, then its six edge neighbors
        assert_eq!(hood.neighbors[0].vertex, 0);
        assert_eq!(hood.neighbors[0].distance, 0.0);
        assert_eq!(hood.len(), 7);
        for v in [1, 2, 3, 4, 5, 7] {
            assert!(hood.contains(v));
        }
        assert!(!hood.contains(6));
    }

    #[test]
    fn two_rings_cover_cube() {
        let solver = cube_solver();
        let hoods = NeighborhoodBuilder::new(&solver)
            .include_self(false)
            .edge_hops(Some(&[0]), 2)
            .unwrap();
        assert_eq!(hoods[0].len(), 7);
        assert!(!hoods[0].contains(0));
    }

    #[test]
    fn edge_hop_distances_are_euclidean() {
        let solver = cube_solver();
        let hoods = NeighborhoodBuilder::new(&solver)
            .edge_hops(Some(&[0]), 2)
            .unwrap();
        let far = hoods[0].get(6).unwrap();
        assert_relative_eq!(far.distance, 12.0_f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(far.offset.x, 2.0, epsilon = 1e-10);
        assert_relative_eq!(far.offset.y, 2.0, epsilon = 1e-10);
        assert_relative_eq!(far.offset.z, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn zero_hops_rejected() {
        let solver = cube_solver();
        assert!(matches!(
            NeighborhoodBuilder::new(&solver).edge_hops(None, 0),
            Err(GeodesicError::InvalidArgument { name: "k", .. })
        ));
    }

    #[test]
    fn geodesic_radius_on_grid() {
        let solver = GeodesicSolver::new(&grid(4, 4, 1.0)).unwrap();
        // Center vertex (2, 2) has index 12
        let hoods = NeighborhoodBuilder::new(&solver)
            .include_self(false)
            .geodesic(Some(&[12]), 1.0)
            .unwrap();

        let members: Vec<usize> = hoods[0].vertices().collect();
        assert_eq!(members, vec![7, 11, 13, 17]);
        for n in &hoods[0] {
            assert_relative_eq!(n.distance, 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn geodesic_includes_self_at_zero() {
        let solver = GeodesicSolver::new(&grid(4, 4, 1.0)).unwrap();
        let hoods = NeighborhoodBuilder::new(&solver)
            .geodesic(Some(&[12]), 1.0)
            .unwrap();
        let center = hoods[0].get(12).unwrap();
        assert_eq!(center.distance, 0.0);
        assert_eq!(center.offset, Vector3::zeros());
        assert_eq!(hoods[0].len(), 5);
    }

    #[test]
    fn geodesic_rejects_bad_radius() {
        let solver = cube_solver();
        for radius in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                NeighborhoodBuilder::new(&solver).geodesic(None, radius),
                Err(GeodesicError::InvalidArgument {
                    name: "max_distance",
                    ..
                })
            ));
        }
    }

    #[test]
    fn attributes_are_copied() {
        let mesh = cube(1.0);
        let solver = GeodesicSolver::new(&mesh).unwrap();
        let normals = mesh.vertex_normals(mesh_types::NormalWeighting::Angle);
        let descriptor: Vec<f64> = (0..8).map(f64::from).collect();

        let hoods = NeighborhoodBuilder::new(&solver)
            .normals(&normals)
            .descriptor(&descriptor)
            .edge_hops(Some(&[0]), 1)
            .unwrap();

        for n in &hoods[0] {
            assert_eq!(n.normal, Some(normals[n.vertex]));
            assert_eq!(n.descriptor, Some(descriptor[n.vertex]));
        }
    }

    #[test]
    fn attribute_length_checked() {
        let solver = cube_solver();
        let short = vec![0.0; 3];
        assert!(matches!(
            NeighborhoodBuilder::new(&solver)
                .descriptor(&short)
                .edge_hops(None, 1),
            Err(GeodesicError::InvalidArgument {
                name: "descriptor",
                ..
            })
        ));
    }

    #[test]
    fn mask_limits_members_and_queries() {
        let solver = cube_solver();
        let mut mask = VertexMask::all_valid(8);
        mask.exclude(1);

        let builder = NeighborhoodBuilder::new(&solver).mask(&mask);
        let hoods = builder.edge_hops(None, 1).unwrap();
        assert_eq!(hoods.len(), 7);
        assert!(hoods.iter().all(|h| h.source != 1 && !h.contains(1)));

        let hoods = builder.geodesic(None, 3.0).unwrap();
        assert!(hoods.iter().all(|h| !h.contains(1)));

        assert!(matches!(
            builder.edge_hops(Some(&[1]), 1),
            Err(GeodesicError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn query_index_validated() {
        let solver = cube_solver();
        assert!(matches!(
            NeighborhoodBuilder::new(&solver).geodesic(Some(&[8]), 1.0),
            Err(GeodesicError::InvalidIndex { index: 8, .. })
        ));
    }
}
