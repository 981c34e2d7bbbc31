//! Mesh primitives for geodesic surface analysis.
//!
//! - [`Vertex`] and [`IndexedMesh`] - Positions plus `[u32; 3]` faces
//! - [`Triangle`] - A face with resolved corners (area, normal, angles)
//! - [`NormalWeighting`] - Area- or angle-weighted vertex normals
//! - [`cube`] and [`grid`] - Small fixture surfaces
//!
//! Reading surface files is left to the caller. Anything that yields a vertex
//! list and a face list plugs in through [`IndexedMesh::from_parts`] or
//! [`IndexedMesh::from_buffers`].
//!
//! Coordinates are unit-agnostic `f64`. Cortical surfaces are usually in
//! millimeters.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, NormalWeighting, Point3, Vertex};
//!
//! let mesh = IndexedMesh::from_parts(
//!     vec![
//!         Vertex::new(Point3::new(0.0, 0.0, 0.0)),
//!         Vertex::new(Point3::new(1.0, 0.0, 0.0)),
//!         Vertex::new(Point3::new(0.0, 1.0, 0.0)),
//!     ],
//!     vec![[0, 1, 2]],
//! );
//!
//! assert!((mesh.surface_area() - 0.5).abs() < 1e-12);
//! let normals = mesh.vertex_normals(NormalWeighting::Area);
//! assert!((normals[0].z - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod mesh;
mod normals;
mod triangle;
mod vertex;

pub use mesh::{cube, grid, IndexedMesh};
pub use normals::NormalWeighting;
pub use triangle::Triangle;
pub use vertex::Vertex;

pub use nalgebra::{Point3, Vector3};
