//! Indexed triangle mesh.

use crate::{Triangle, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Faces reference vertices by 0-based index. The geodesic crates treat a
/// mesh as read-only; distances and other per-vertex results live in their
/// own arrays.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Vertex>,

    /// Triangles as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create an empty mesh with room for the given counts.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Assemble a mesh from already-built vertex and face lists.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Assemble a mesh from flat single-precision buffers, as surface readers
    /// usually deliver them.
    ///
    /// Returns `None` if either buffer length is not a multiple of 3.
    /// Indices are not checked here.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::IndexedMesh;
    ///
    /// let coords = [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = IndexedMesh::from_buffers(&coords, &[0, 1, 2]).unwrap();
    /// assert_eq!(mesh.vertex_count(), 3);
    ///
    /// assert!(IndexedMesh::from_buffers(&coords[..4], &[0, 1, 2]).is_none());
    /// ```
    #[must_use]
    pub fn from_buffers(coords: &[f32], indices: &[u32]) -> Option<Self> {
        if coords.len() % 3 != 0 || indices.len() % 3 != 0 {
            return None;
        }

        let vertices = coords
            .chunks_exact(3)
            .map(|c| Vertex::from([c[0], c[1], c[2]]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Some(Self { vertices, faces })
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Resolve face `face` to its corner positions.
    ///
    /// Returns `None` if the face or one of its vertices does not exist.
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        let [a, b, c] = *self.faces.get(face)?;
        let corner = |v: u32| self.vertices.get(v as usize).map(|vertex| vertex.position);
        Some(Triangle::new(corner(a)?, corner(b)?, corner(c)?))
    }

    /// Area of each face, in face order.
    ///
    /// Faces referencing missing vertices get an area of `0.0`.
    #[must_use]
    pub fn face_areas(&self) -> Vec<f64> {
        (0..self.faces.len())
            .map(|f| self.triangle(f).map_or(0.0, |tri| tri.area()))
            .collect()
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.face_areas().iter().sum()
    }
}

/// Create an axis-aligned cube centered at the origin.
///
/// Vertices sit at `±half_extent` on each axis; each square side is split into
/// two triangles (8 vertices, 12 faces) with outward CCW winding.
///
/// # Example
///
/// ```
/// use mesh_types::cube;
///
/// let cube = cube(1.0);
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// assert!((cube.surface_area() - 24.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn cube(half_extent: f64) -> IndexedMesh {
    let h = half_extent;
    let mut mesh = IndexedMesh::with_capacity(8, 12);

    mesh.vertices.push(Vertex::from_coords(-h, -h, -h)); // 0
    mesh.vertices.push(Vertex::from_coords(h, -h, -h)); // 1
    mesh.vertices.push(Vertex::from_coords(h, h, -h)); // 2
    mesh.vertices.push(Vertex::from_coords(-h, h, -h)); // 3
    mesh.vertices.push(Vertex::from_coords(-h, -h, h)); // 4
    mesh.vertices.push(Vertex::from_coords(h, -h, h)); // 5
    mesh.vertices.push(Vertex::from_coords(h, h, h)); // 6
    mesh.vertices.push(Vertex::from_coords(-h, h, h)); // 7

    // Bottom (-Z)
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);
    // Top (+Z)
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);
    // Front (-Y)
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);
    // Back (+Y)
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);
    // Left (-X)
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);
    // Right (+X)
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}

/// Create a flat, regularly triangulated grid in the XY plane.
///
/// The grid has `(cols + 1) * (rows + 1)` vertices spaced `spacing` apart,
/// starting at the origin. Vertex `(i, j)` (column `i`, row `j`) has index
/// `j * (cols + 1) + i`. Every cell is split along the same diagonal.
///
/// Returns an empty mesh if `cols` or `rows` is zero.
///
/// # Example
///
/// ```
/// use mesh_types::grid;
///
/// let plane = grid(4, 3, 0.5);
/// assert_eq!(plane.vertex_count(), 20);
/// assert_eq!(plane.face_count(), 24);
/// assert!((plane.surface_area() - 3.0).abs() < 1e-10);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
// Truncation: grid fixtures stay far below u32::MAX vertices
pub fn grid(cols: usize, rows: usize, spacing: f64) -> IndexedMesh {
    if cols == 0 || rows == 0 {
        return IndexedMesh::new();
    }

    let stride = cols + 1;
    let mut mesh = IndexedMesh::with_capacity(stride * (rows + 1), 2 * cols * rows);

    for j in 0..=rows {
        for i in 0..=cols {
            mesh.vertices.push(Vertex::from_coords(
                i as f64 * spacing,
                j as f64 * spacing,
                0.0,
            ));
        }
    }

    for j in 0..rows {
        for i in 0..cols {
            let a = (j * stride + i) as u32;
            let b = a + 1;
            let c = a + stride as u32;
            let d = c + 1;
            mesh.faces.push([a, b, d]);
            mesh.faces.push([a, d, c]);
        }
    }

    mesh
}
