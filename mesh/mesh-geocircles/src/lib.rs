//! Geodesic circle statistics for triangle meshes.
//!
//! Around each query vertex this crate fits the geodesic circle that encloses
//! a fixed share of the surface, and reports its radius and perimeter
//! (optionally with the mean geodesic distance to the rest of the surface).
//! On cortical surfaces these are standard local shape descriptors.
//!
//! - [`geodesic_circles`] - Batch computation over query vertices
//! - [`circle_stats`] - Area and perimeter enclosed at given radii
//! - [`MonotoneCubic`] - Shape-preserving interpolation used for the fit
//! - [`CircleParams`] - Area fraction, sampling and margin settings
//!
//! # Example
//!
//! ```
//! use mesh_geocircles::{geodesic_circles, CircleParams};
//! use mesh_geodesic::GeodesicSolver;
//! use mesh_types::grid;
//!
//! let solver = GeodesicSolver::new(&grid(10, 10, 1.0)).unwrap();
//! let params = CircleParams::with_area_fraction(10.0).sample_half_width(2.0);
//! let circles = geodesic_circles(&solver, Some(&[60]), &params, None).unwrap();
//!
//! let circle = &circles.circles[0];
//! assert!(circle.radius > 0.0);
//! assert!(circle.perimeter > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod circles;
mod coverage;
mod error;
mod params;
mod spline;

pub use circles::{geodesic_circles, CircleResult, GeodesicCircles};
pub use coverage::{circle_stats, RadiusSample};
pub use error::{CircleError, CirclesResult};
pub use params::CircleParams;
pub use spline::MonotoneCubic;
