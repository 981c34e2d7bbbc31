//! Geodesic (surface) distance computation for triangle meshes.
//!
//! This crate provides the distance machinery shared by the neighborhood and
//! geodesic circle crates:
//!
//! - [`MeshGraph`] - Validated adjacency, incident faces and face areas
//! - [`GeodesicSolver`] / [`Workspace`] - Multi-source Dijkstra with an
//!   optional distance limit and vertex mask
//! - [`DistanceField`] - Per-vertex distances with one sentinel policy
//! - [`par_map_queries`] - Parallel per-vertex queries with per-worker scratch
//!
//! # Algorithm
//!
//! The implementation uses Dijkstra's algorithm on the mesh edge graph.
//! Edge weights are Euclidean distances between vertices.
//!
//! This gives exact geodesic distances **along edges**, which is an approximation
//! of the true geodesic distance (shortest path on the surface). For denser meshes,
//! this approximation is very accurate.
//!
//! # Unreached vertices
//!
//! Vertices beyond the distance limit, behind the mask or in another connected
//! component read `0.0` in a fresh [`DistanceField`]. Use
//! [`DistanceField::is_reached`] to tell them apart from seeds, or
//! [`DistanceField::correct_unreached`] to push them to
//! [`UNREACHED_DISTANCE`].
//!
//! # Example
//!
//! ```
//! use mesh_geodesic::GeodesicSolver;
//! use mesh_types::{IndexedMesh, Vertex};
//!
//! // Create a simple mesh (triangle)
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! // Compute distances from vertex 0
//! let solver = GeodesicSolver::new(&mesh).unwrap();
//! let distances = solver.compute_from_vertex(0).unwrap();
//!
//! assert!(distances.distance(0) < 1e-10); // Distance to self is 0
//! assert!((distances.distance(1) - 1.0).abs() < 1e-10); // Distance to v1
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod dijkstra;
mod distance;
mod error;
mod graph;
mod mask;
mod parallel;

pub use dijkstra::{GeodesicPath, GeodesicSolver, Workspace};
pub use distance::{DistanceField, UNREACHED_DISTANCE};
pub use error::{GeodesicError, GeodesicResult};
pub use graph::MeshGraph;
pub use mask::VertexMask;
pub use parallel::{mean_distances, par_map_queries, resolve_queries, PerVertex};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use mesh_types::{cube, IndexedMesh, Vertex};

    fn create_line_mesh() -> IndexedMesh {
        // Three vertices in a line: 0 -- 1 -- 2
        // Two triangles sharing edge 1-3
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(2.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 0.5, 0.0)); // Top vertex
        mesh.faces.push([0, 1, 3]);
        mesh.faces.push([1, 2, 3]);
        mesh
    }

    #[test]
    fn basic_geodesic() {
        let solver = GeodesicSolver::new(&create_line_mesh()).unwrap();
        let distances = solver.compute_from_vertex(0).unwrap();

        assert_eq!(distances.distance(0), 0.0);
        assert!((distances.distance(1) - 1.0).abs() < 1e-10);
        // Via vertex 1
        assert!((distances.distance(2) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn multi_source_geodesic() {
        let solver = GeodesicSolver::new(&create_line_mesh()).unwrap();
        let distances = solver.propagate(&[0, 2], None, None).unwrap();

        // Equidistant from both
        assert!((distances.distance(1) - 1.0).abs() < 1e-10);
        assert_eq!(distances.distance(0), 0.0);
        assert_eq!(distances.distance(2), 0.0);
    }

    #[test]
    fn self_distance_is_zero_everywhere() {
        let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
        for v in 0..solver.vertex_count() {
            let field = solver.compute_from_vertex(v).unwrap();
            assert_eq!(field.distance(v), 0.0);
            assert!(field.is_reached(v));
            assert_eq!(field.reached_count(), 8);
        }
    }

    #[test]
    fn cube_distances_bounded_by_three_edges() {
        let solver = GeodesicSolver::new(&cube(0.5)).unwrap();
        // A non-positive limit means unbounded
        let field = solver.propagate(&[0], Some(-1.0), None).unwrap();

        let bound = 3.0 * 2.0_f64.sqrt();
        assert_eq!(field.distance(0), 0.0);
        for v in 1..8 {
            assert!(field.distance(v) > 0.0);
            assert!(field.distance(v) <= bound + 1e-12);
        }
        // Opposite corner: one face diagonal plus one edge
        assert!((field.distance(6) - (1.0 + 2.0_f64.sqrt())).abs() < 1e-10);
    }

    #[test]
    fn empty_mesh_is_degenerate() {
        assert!(matches!(
            GeodesicSolver::new(&IndexedMesh::new()),
            Err(GeodesicError::DegenerateMesh { .. })
        ));
    }
}
