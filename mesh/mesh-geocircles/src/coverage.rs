//! Area and perimeter enclosed by geodesic circles.
//!
//! For a distance field and a radius `r`, a vertex is inside the circle iff
//! its distance is `< r`. Faces with all three vertices inside count fully.
//! Faces with one or two vertices inside are cut along the straight segment
//! between the two edge points where the distance, interpolated linearly,
//! equals `r`. That segment also contributes to the perimeter.

use mesh_geodesic::{DistanceField, MeshGraph, VertexMask, UNREACHED_DISTANCE};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CircleError, CirclesResult};

/// Area and perimeter of one geodesic circle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadiusSample {
    /// The sampled radius.
    pub radius: f64,
    /// Surface area enclosed by the circle.
    pub area: f64,
    /// Length of the circle boundary.
    pub perimeter: f64,
}

/// Measure the circles of the given radii around the seeds of `field`.
///
/// `field` should have had [`DistanceField::correct_unreached`] applied so
/// that unreached vertices lie outside every circle. Faces touching a vertex
/// excluded by `mask` are not part of the surface.
///
/// # Errors
///
/// - [`CircleError::InvalidArgument`] if the field or mask length does not
///   match the graph
/// - [`CircleError::InsufficientMargin`] if a face that straddles a radius
///   touches an unreached vertex
///
/// # Example
///
/// ```
/// use mesh_geocircles::circle_stats;
/// use mesh_geodesic::GeodesicSolver;
/// use mesh_types::cube;
///
/// let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
/// let field = solver.compute_from_vertex(0).unwrap().corrected();
///
/// let samples = circle_stats(solver.graph(), &field, &[0.0, 100.0], None).unwrap();
/// assert_eq!(samples[0].area, 0.0);
/// assert!((samples[1].area - 24.0).abs() < 1e-10);
/// assert_eq!(samples[1].perimeter, 0.0);
/// ```
pub fn circle_stats(
    graph: &MeshGraph,
    field: &DistanceField,
    radii: &[f64],
    mask: Option<&VertexMask>,
) -> CirclesResult<Vec<RadiusSample>> {
    if field.len() != graph.vertex_count() {
        return Err(CircleError::invalid_argument(
            "field",
            format!(
                "length {} does not match vertex count {}",
                field.len(),
                graph.vertex_count()
            ),
        ));
    }
    if let Some(mask) = mask {
        mask.check_len(graph.vertex_count())?;
    }

    radii
        .iter()
        .map(|&radius| sample_radius(graph, field, radius, mask))
        .collect()
}

fn sample_radius(
    graph: &MeshGraph,
    field: &DistanceField,
    radius: f64,
    mask: Option<&VertexMask>,
) -> CirclesResult<RadiusSample> {
    let dist = field.as_slice();
    let positions = graph.positions();

    let mut area = 0.0;
    let mut perimeter = 0.0;

    for (face_idx, face) in graph.faces().iter().enumerate() {
        let verts = face.map(|v| v as usize);
        if mask.is_some_and(|m| verts.iter().any(|&v| !m.is_valid(v))) {
            continue;
        }

        let inside = verts.map(|v| dist[v] < radius);
        let inside_count = inside.iter().filter(|&&i| i).count();
        match inside_count {
            0 => {}
            3 => area += graph.face_area(face_idx),
            _ => {
                // The odd vertex is the one alone on its side of the radius
                let odd_is_inside = inside_count == 1;
                let Some(k) = inside.iter().position(|&i| i == odd_is_inside) else {
                    continue;
                };
                let [a, b, c] = [verts[k], verts[(k + 1) % 3], verts[(k + 2) % 3]];

                for v in [a, b, c] {
                    if dist[v] >= UNREACHED_DISTANCE {
                        return Err(CircleError::InsufficientMargin {
                            vertex: v,
                            radius,
                            distance: dist[v],
                        });
                    }
                }

                let [da, db, dc] = [a, b, c].map(|v| dist[v] - radius);
                let p1 = crossing(&positions[a], &positions[b], da, db);
                let p2 = crossing(&positions[a], &positions[c], da, dc);

                // Triangle cut off around the odd vertex
                let cut = (positions[a] - p1).cross(&(positions[a] - p2)).norm() / 2.0;
                area += if odd_is_inside {
                    cut
                } else {
                    graph.face_area(face_idx) - cut
                };
                perimeter += (p1 - p2).norm();
            }
        }
    }

    Ok(RadiusSample {
        radius,
        area,
        perimeter,
    })
}

/// Point on edge `odd`-`far` where the offset distance crosses zero.
///
/// `d_odd` and `d_far` are distances minus the radius and have opposite
/// signs (or `d_far` is zero).
fn crossing(odd: &Point3<f64>, far: &Point3<f64>, d_odd: f64, d_far: f64) -> Point3<f64> {
    let alpha = d_far / (d_far - d_odd);
    Point3::from(odd.coords * alpha + far.coords * (1.0 - alpha))
}
