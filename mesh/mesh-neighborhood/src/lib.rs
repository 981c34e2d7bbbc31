//! Vertex neighborhoods on triangle meshes.
//!
//! Collects, for each query vertex, the surrounding vertices together with
//! their distance, centered offset and optional per-vertex attributes:
//!
//! - **Edge-hop neighborhoods** - everything within `k` mesh edges
//! - **Geodesic neighborhoods** - everything within a geodesic radius
//!
//! Typical use is feature extraction on brain surfaces: the offsets, normals
//! and descriptor values of a neighborhood form the input of a per-vertex
//! model.
//!
//! # Example
//!
//! ```
//! use mesh_geodesic::GeodesicSolver;
//! use mesh_neighborhood::NeighborhoodBuilder;
//! use mesh_types::grid;
//!
//! let solver = GeodesicSolver::new(&grid(4, 4, 1.0)).unwrap();
//! let hoods = NeighborhoodBuilder::new(&solver)
//!     .geodesic(Some(&[12]), 1.5)
//!     .unwrap();
//!
//! let sorted = hoods[0].clone().sorted_by_distance();
//! assert_eq!(sorted.neighbors[0].vertex, 12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod builder;
mod neighborhood;

pub use builder::NeighborhoodBuilder;
pub use neighborhood::{Neighbor, Neighborhood};
