//! Per-vertex normals.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::IndexedMesh;

/// How face normals are weighted when averaged into vertex normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NormalWeighting {
    /// Weight each incident face normal by the face area.
    #[default]
    Area,

    /// Weight each incident face normal by the interior angle at the vertex.
    Angle,
}

impl IndexedMesh {
    /// Compute unit vertex normals by averaging incident face normals.
    ///
    /// Vertices without any non-degenerate incident face get a zero vector.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{grid, NormalWeighting};
    ///
    /// let plane = grid(2, 2, 1.0);
    /// let normals = plane.vertex_normals(NormalWeighting::Angle);
    /// assert_eq!(normals.len(), 9);
    /// assert!(normals.iter().all(|n| (n.z - 1.0).abs() < 1e-10));
    /// ```
    #[must_use]
    pub fn vertex_normals(&self, weighting: NormalWeighting) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];

        for (face_idx, face) in self.faces.iter().enumerate() {
            let Some(tri) = self.triangle(face_idx) else {
                continue;
            };
            let Some(face_normal) = tri.normal() else {
                continue;
            };

            let weights = match weighting {
                NormalWeighting::Area => [tri.area(); 3],
                NormalWeighting::Angle => tri.angles(),
            };

            for (&vi, weight) in face.iter().zip(weights) {
                normals[vi as usize] += face_normal * weight;
            }
        }

        for normal in &mut normals {
            let len = normal.norm();
            if len > f64::EPSILON {
                *normal /= len;
            }
        }

        normals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube;
    use approx::assert_relative_eq;

    #[test]
    fn cube_corner_normals_point_outward() {
        let mesh = cube(1.0);
        for weighting in [NormalWeighting::Area, NormalWeighting::Angle] {
            let normals = mesh.vertex_normals(weighting);
            for (vertex, normal) in mesh.vertices.iter().zip(&normals) {
                assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-10);
                // Outward: same hemisphere as the corner direction.
                assert!(normal.dot(&vertex.position.coords) > 0.0);
            }
        }
    }

    #[test]
    fn angle_weighting_is_symmetric_on_cube() {
        // Each cube corner sees three right angles, one per side, so the
        // angle-weighted normal is the exact diagonal.
        let mesh = cube(1.0);
        let normals = mesh.vertex_normals(NormalWeighting::Angle);
        let expected = 1.0 / 3.0_f64.sqrt();
        for normal in normals {
            assert_relative_eq!(normal.x.abs(), expected, epsilon = 1e-10);
            assert_relative_eq!(normal.y.abs(), expected, epsilon = 1e-10);
            assert_relative_eq!(normal.z.abs(), expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn isolated_vertex_gets_zero_normal() {
        let mut mesh = cube(1.0);
        mesh.vertices.push(crate::Vertex::from_coords(5.0, 5.0, 5.0));
        let normals = mesh.vertex_normals(NormalWeighting::Area);
        assert_relative_eq!(normals[8].norm(), 0.0);
    }
}
