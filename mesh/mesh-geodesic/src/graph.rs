//! Read-only graph view of a triangle mesh.
//!
//! Provides neighbor lookup, incident faces and face areas for the distance
//! propagator, the neighborhood builder and the circle statistics.

use mesh_types::{IndexedMesh, Point3, Triangle};
use tracing::{debug, warn};

use crate::error::{GeodesicError, GeodesicResult};
use crate::mask::{passes, VertexMask};

/// Validated, indexed snapshot of a triangle mesh.
///
/// Built once per mesh and shared immutably by every query. Each vertex stores
/// its edge neighbors together with the Euclidean edge length.
///
/// # Example
///
/// ```
/// use mesh_geodesic::MeshGraph;
/// use mesh_types::cube;
///
/// let graph = MeshGraph::from_mesh(&cube(1.0)).unwrap();
/// assert_eq!(graph.vertex_count(), 8);
/// assert_eq!(graph.edge_count(), 18);
/// assert!((graph.total_area() - 24.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct MeshGraph {
    positions: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
    face_areas: Vec<f64>,
    /// For each vertex, list of (neighbor index, edge length) pairs.
    neighbors: Vec<Vec<(u32, f64)>>,
    vertex_faces: Vec<Vec<u32>>,
    edge_count: usize,
    max_edge_length: f64,
    mean_edge_length: f64,
    total_area: f64,
}

impl MeshGraph {
    /// Build the graph view of a mesh.
    ///
    /// # Errors
    ///
    /// - [`GeodesicError::DegenerateMesh`] if the mesh has no vertices or no
    ///   faces, a coordinate is not finite, or an edge has zero length
    /// - [`GeodesicError::InvalidIndex`] if a face references a missing vertex
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    // Truncation: vertex indices are u32, meshes with >4B vertices unsupported
    pub fn from_mesh(mesh: &IndexedMesh) -> GeodesicResult<Self> {
        let vertex_count = mesh.vertices.len();
        if vertex_count == 0 {
            return Err(GeodesicError::degenerate("mesh has no vertices"));
        }
        if mesh.faces.is_empty() {
            return Err(GeodesicError::degenerate("mesh has no faces"));
        }

        if let Some(bad) = mesh.vertices.iter().position(|v| !v.is_finite()) {
            return Err(GeodesicError::degenerate(format!(
                "vertex {bad} has a non-finite coordinate"
            )));
        }

        let positions: Vec<Point3<f64>> = mesh.vertices.iter().map(|v| v.position).collect();
        let mut neighbors: Vec<Vec<(u32, f64)>> = vec![Vec::new(); vertex_count];
        let mut vertex_faces: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        let mut face_areas = Vec::with_capacity(mesh.faces.len());

        let mut edge_count = 0_usize;
        let mut edge_length_sum = 0.0;
        let mut max_edge_length = 0.0_f64;

        for (face_idx, face) in mesh.faces.iter().enumerate() {
            for &vi in face {
                GeodesicError::check_index(vi as usize, vertex_count)?;
            }

            let [i0, i1, i2] = *face;
            for (a, b) in [(i0, i1), (i1, i2), (i2, i0)] {
                let length = (positions[b as usize] - positions[a as usize]).norm();
                if length <= 0.0 {
                    return Err(GeodesicError::degenerate(format!(
                        "edge {a}-{b} of face {face_idx} has zero length"
                    )));
                }
                if Self::add_edge(&mut neighbors, a, b, length) {
                    edge_count += 1;
                    edge_length_sum += length;
                    max_edge_length = max_edge_length.max(length);
                }
            }

            for &vi in face {
                vertex_faces[vi as usize].push(face_idx as u32);
            }

            let tri = Triangle::new(
                positions[i0 as usize],
                positions[i1 as usize],
                positions[i2 as usize],
            );
            face_areas.push(tri.area());
        }

        let isolated = neighbors.iter().filter(|n| n.is_empty()).count();
        if isolated > 0 {
            warn!(isolated, "mesh has vertices without incident faces");
        }

        let total_area = face_areas.iter().sum();
        let mean_edge_length = edge_length_sum / edge_count as f64;

        debug!(
            vertices = vertex_count,
            faces = face_areas.len(),
            edges = edge_count,
            max_edge_length,
            total_area,
            "built mesh graph"
        );

        Ok(Self {
            positions,
            faces: mesh.faces.clone(),
            face_areas,
            neighbors,
            vertex_faces,
            edge_count,
            max_edge_length,
            mean_edge_length,
            total_area,
        })
    }

    /// Add an edge between two vertices (if not already present).
    ///
    /// Returns `true` if the edge is new.
    fn add_edge(neighbors: &mut [Vec<(u32, f64)>], v0: u32, v1: u32, length: f64) -> bool {
        if neighbors[v0 as usize].iter().any(|&(n, _)| n == v1) {
            return false;
        }
        neighbors[v0 as usize].push((v1, length));
        neighbors[v1 as usize].push((v0, length));
        true
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of unique edges.
    #[inline]
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Position of a vertex, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn position(&self, vertex: usize) -> Option<&Point3<f64>> {
        self.positions.get(vertex)
    }

    /// All vertex positions.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// All faces as vertex index triples.
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Area of a face, or `0.0` if out of bounds.
    #[inline]
    #[must_use]
    pub fn face_area(&self, face: usize) -> f64 {
        self.face_areas.get(face).copied().unwrap_or(0.0)
    }

    /// Total surface area.
    #[inline]
    #[must_use]
    pub const fn total_area(&self) -> f64 {
        self.total_area
    }

    /// Surface area restricted to faces whose three vertices pass the mask.
    ///
    /// Equals [`total_area`](Self::total_area) when `mask` is `None`.
    #[must_use]
    pub fn masked_area(&self, mask: Option<&VertexMask>) -> f64 {
        if mask.is_none() {
            return self.total_area;
        }
        self.faces
            .iter()
            .zip(&self.face_areas)
            .filter(|(face, _)| face_passes(mask, face))
            .map(|(_, &area)| area)
            .sum()
    }

    /// Edge neighbors of a vertex as (neighbor index, edge length) pairs.
    ///
    /// Returns an empty slice if the vertex is out of bounds.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[(u32, f64)] {
        self.neighbors.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Indices of the faces incident to a vertex.
    ///
    /// Returns an empty slice if the vertex is out of bounds.
    #[inline]
    #[must_use]
    pub fn vertex_faces(&self, vertex: usize) -> &[u32] {
        self.vertex_faces.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Length of the longest edge.
    #[inline]
    #[must_use]
    pub const fn max_edge_length(&self) -> f64 {
        self.max_edge_length
    }

    /// Mean length over unique edges.
    #[inline]
    #[must_use]
    pub const fn mean_edge_length(&self) -> f64 {
        self.mean_edge_length
    }
}

/// Whether all three vertices of a face pass an optional mask.
#[inline]
pub(crate) fn face_passes(mask: Option<&VertexMask>, face: &[u32; 3]) -> bool {
    face.iter().all(|&v| passes(mask, v as usize))
}
