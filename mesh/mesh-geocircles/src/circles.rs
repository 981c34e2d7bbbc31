//! Per-vertex geodesic circles.

use std::f64::consts::PI;
use std::time::Instant;

use mesh_geodesic::{
    par_map_queries, resolve_queries, DistanceField, GeodesicSolver, MeshGraph, VertexMask,
};
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coverage::{circle_stats, RadiusSample};
use crate::error::{CircleError, CirclesResult};
use crate::params::CircleParams;
use crate::spline::MonotoneCubic;

/// The geodesic circle fitted around one query vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircleResult {
    /// The query vertex.
    pub vertex: usize,
    /// Radius of the circle enclosing the target area.
    pub radius: f64,
    /// Perimeter of that circle.
    pub perimeter: f64,
    /// Mean geodesic distance to every reached vertex, if requested.
    pub mean_distance: Option<f64>,
}

/// Geodesic circles for a batch of query vertices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodesicCircles {
    /// One circle per query vertex, in query order.
    pub circles: Vec<CircleResult>,
    /// Area each circle should enclose.
    pub target_area: f64,
    /// Radius of a flat disc with the target area.
    pub ideal_radius: f64,
    /// Propagation limit used, or `None` if propagation ran unbounded.
    pub max_distance: Option<f64>,
}

impl GeodesicCircles {
    /// Number of circles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.circles.len()
    }

    /// Whether there are no circles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    /// Iterate over the circles.
    pub fn iter(&self) -> impl Iterator<Item = &CircleResult> {
        self.circles.iter()
    }

    /// Radii, in query order.
    #[must_use]
    pub fn radii(&self) -> Vec<f64> {
        self.circles.iter().map(|c| c.radius).collect()
    }

    /// Perimeters, in query order.
    #[must_use]
    pub fn perimeters(&self) -> Vec<f64> {
        self.circles.iter().map(|c| c.perimeter).collect()
    }

    /// Mean distances, in query order, or `None` if they were not computed.
    #[must_use]
    pub fn mean_distances(&self) -> Option<Vec<f64>> {
        self.circles.iter().map(|c| c.mean_distance).collect()
    }

    /// Spread a per-circle value into a dense per-vertex array.
    ///
    /// Vertices without a circle get `fill`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_geocircles::{geodesic_circles, CircleParams};
    /// use mesh_geodesic::GeodesicSolver;
    /// use mesh_types::cube;
    ///
    /// let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
    /// let params = CircleParams::default();
    /// let circles = geodesic_circles(&solver, Some(&[2]), &params, None).unwrap();
    /// let radius = circles.scatter(8, f64::NAN, |c| c.radius);
    /// assert!(radius[0].is_nan());
    /// assert!(radius[2] > 0.0);
    /// ```
    #[must_use]
    pub fn scatter<F>(&self, vertex_count: usize, fill: f64, value: F) -> Vec<f64>
    where
        F: Fn(&CircleResult) -> f64,
    {
        let mut dense = vec![fill; vertex_count];
        for circle in &self.circles {
            if let Some(slot) = dense.get_mut(circle.vertex) {
                *slot = value(circle);
            }
        }
        dense
    }
}

/// Fit a geodesic circle enclosing a fixed share of the surface around each
/// query vertex.
///
/// For every query vertex the distance field is sampled at evenly spaced
/// radii around the ideal radius `sqrt(target_area / π)`. Monotone cubic
/// splines through the enclosed areas, radii and perimeters are resampled
/// finely, and the first resampled point whose area is closest to the
/// target gives the radius and perimeter.
///
/// Unless mean distances are requested, propagation stops at
/// `ideal_radius + sample_half_width + margin_edge_factor * max_edge_length`.
/// The margin is measured from the largest sampled radius, not from the
/// ideal radius, so the limit is `sample_half_width` larger than a margin
/// taken from the ideal radius alone. [`GeodesicCircles::max_distance`]
/// reports the limit used.
///
/// `queries = None` runs on every vertex that passes `mask`. Queries run in
/// parallel; the first error fails the batch.
///
/// # Errors
///
/// - [`CircleError::InvalidArgument`] if `params` are out of range
/// - [`CircleError::Geodesic`] for invalid or masked query indices
/// - [`CircleError::DegenerateMesh`] if the (masked) surface has no area
/// - [`CircleError::Query`] if the circle around one query vertex fails,
///   naming that vertex and wrapping the cause (for example
///   [`CircleError::InsufficientMargin`] when `margin_edge_factor` is too
///   small for the sampled radii)
///
/// # Example
///
/// ```
/// use mesh_geocircles::{geodesic_circles, CircleParams};
/// use mesh_geodesic::GeodesicSolver;
/// use mesh_types::cube;
///
/// let solver = GeodesicSolver::new(&cube(1.0)).unwrap();
/// let params = CircleParams::with_area_fraction(25.0).mean_distance(true);
/// let circles = geodesic_circles(&solver, None, &params, None).unwrap();
///
/// assert_eq!(circles.len(), 8);
/// assert!(circles.max_distance.is_none());
/// for circle in circles.iter() {
///     assert!(circle.radius > 0.0);
///     assert!(circle.mean_distance.is_some());
/// }
/// ```
pub fn geodesic_circles(
    solver: &GeodesicSolver,
    queries: Option<&[usize]>,
    params: &CircleParams,
    mask: Option<&VertexMask>,
) -> CirclesResult<GeodesicCircles> {
    params.validate()?;
    let graph = solver.graph();
    let vertices = resolve_queries(graph.vertex_count(), queries, mask)?;

    let total_area = graph.masked_area(mask);
    if total_area.is_nan() || total_area <= 0.0 {
        let reason = format!("surface area is {total_area}");
        return Err(CircleError::degenerate(reason));
    }
    if graph.edge_count() == 0 {
        return Err(CircleError::degenerate("mesh has no edges"));
    }

    let target_area = params.area_fraction_percent / 100.0 * total_area;
    let ideal_radius = (target_area / PI).sqrt();
    let window_top = ideal_radius + params.sample_half_width;
    let max_distance = (!params.compute_mean_distance).then(|| {
        params
            .margin_edge_factor
            .mul_add(graph.max_edge_length(), window_top)
    });

    let sampling = Sampling::new(params, ideal_radius, target_area);
    let start = Instant::now();
    info!(
        queries = vertices.len(),
        area_fraction_percent = params.area_fraction_percent,
        mean_distance = params.compute_mean_distance,
        "Starting geodesic circles"
    );
    debug!(
        total_area,
        target_area,
        ideal_radius,
        max_distance = ?max_distance,
        max_edge_length = graph.max_edge_length(),
        "Derived circle parameters"
    );

    let circles = par_map_queries(solver, &vertices, |workspace, vertex| {
        let field = workspace
            .propagate(&[vertex], max_distance, mask)
            .map_err(|err| CircleError::from(err).for_query(vertex))?
            .corrected();
        let (radius, perimeter) = sampling
            .fit(graph, &field, mask)
            .map_err(|err| err.for_query(vertex))?;

        Ok::<_, CircleError>(CircleResult {
            vertex,
            radius,
            perimeter,
            mean_distance: params.compute_mean_distance.then(|| field.mean_reached()),
        })
    })?;

    info!(
        queries = circles.len(),
        elapsed = ?start.elapsed(),
        "Geodesic circles complete"
    );

    Ok(GeodesicCircles {
        circles,
        target_area,
        ideal_radius,
        max_distance,
    })
}

/// Radii sampled around every query vertex and the spline grid they are
/// fitted on.
struct Sampling {
    radii: Vec<f64>,
    knots: Vec<f64>,
    resampled: Vec<f64>,
    target_area: f64,
}

impl Sampling {
    #[allow(clippy::cast_precision_loss)]
    fn new(params: &CircleParams, ideal_radius: f64, target_area: f64) -> Self {
        let low = ideal_radius - params.sample_half_width;
        let high = ideal_radius + params.sample_half_width;
        let count = params.sample_count;
        let factor = params.resample_factor as f64;

        Self {
            radii: linspace(low, high, count),
            knots: (1..=count).map(|i| i as f64).collect(),
            resampled: (0..params.resample_count())
                .map(|j| 1.0 + j as f64 / factor)
                .collect(),
            target_area,
        }
    }

    /// Pick the radius and perimeter whose interpolated area is closest to
    /// the target.
    fn fit(
        &self,
        graph: &MeshGraph,
        field: &DistanceField,
        mask: Option<&VertexMask>,
    ) -> CirclesResult<(f64, f64)> {
        let samples = circle_stats(graph, field, &self.radii, mask)?;
        let spline = |value: fn(&RadiusSample) -> f64| {
            MonotoneCubic::new(self.knots.clone(), samples.iter().map(value).collect())
        };
        let areas = spline(|s| s.area)?;
        let radii = spline(|s| s.radius)?;
        let perimeters = spline(|s| s.perimeter)?;

        let mut best = self.knots[0];
        let mut best_error = f64::INFINITY;
        for &t in &self.resampled {
            let error = (self.target_area - areas.evaluate(t)).abs();
            if error < best_error {
                best = t;
                best_error = error;
            }
        }

        Ok((radii.evaluate(best), perimeters.evaluate(best)))
    }
}

/// `count` evenly spaced values from `start` to `end`, both inclusive.
#[allow(clippy::cast_precision_loss)]
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count - 1)
                .map(|i| step.mul_add(i as f64, start))
                .collect();
            values.push(end);
            values
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_geodesic::GeodesicError;
    use mesh_types::{cube, grid};

    fn cube_solver() -> GeodesicSolver {
        GeodesicSolver::new(&cube(1.0)).unwrap()
    }

    fn at_percent(solver: &GeodesicSolver, vertex: usize, percent: f64) -> CircleResult {
        let params = CircleParams::with_area_fraction(percent);
        let circles = geodesic_circles(solver, Some(&[vertex]), &params, None).unwrap();
        circles.circles[0]
    }

    #[test]
    fn linspace_hits_both_ends() {
        let values = linspace(-1.0, 1.0, 5);
        assert_eq!(values, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(3.0, 4.0, 0).is_empty());
    }

    #[test]
    fn full_area_circle_covers_cube() {
        let solver = cube_solver();
        let params = CircleParams::with_area_fraction(100.0);
        let circles = geodesic_circles(&solver, None, &params, None).unwrap();

        let diameter = (0..8)
            .map(|v| solver.compute_from_vertex(v).unwrap().max_distance())
            .fold(0.0, f64::max);

        assert_eq!(circles.len(), 8);
        for circle in circles.iter() {
            assert!(circle.radius >= diameter);
            assert!(circle.mean_distance.is_none());
        }
        assert_relative_eq!(circles.target_area, 24.0, epsilon = 1e-10);
    }

    #[test]
    fn partial_circle_is_smaller_than_full() {
        let solver = cube_solver();
        let small = at_percent(&solver, 0, 20.0);
        let full = at_percent(&solver, 0, 100.0);
        assert!(small.radius < full.radius);
        assert!(small.perimeter > 0.0);
    }

    #[test]
    fn limit_is_measured_from_window_top() {
        let solver = cube_solver();
        let params = CircleParams::default();
        let circles = geodesic_circles(&solver, Some(&[3]), &params, None).unwrap();

        let ideal = (1.2 / PI).sqrt();
        let expected = ideal + 10.0 + 8.0 * 8.0_f64.sqrt();
        assert_relative_eq!(circles.target_area, 1.2, epsilon = 1e-10);
        assert_relative_eq!(circles.ideal_radius, ideal, epsilon = 1e-12);
        assert_relative_eq!(circles.max_distance.unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn results_follow_query_order() {
        let solver = cube_solver();
        let params = CircleParams::default();
        let circles = geodesic_circles(&solver, Some(&[5, 1, 5]), &params, None).unwrap();

        let order: Vec<usize> = circles.iter().map(|c| c.vertex).collect();
        assert_eq!(order, vec![5, 1, 5]);
        assert_eq!(circles.circles[0], circles.circles[2]);
    }

    #[test]
    fn mean_distance_matches_field() {
        let solver = cube_solver();
        let params = CircleParams::default().mean_distance(true);
        let circles = geodesic_circles(&solver, None, &params, None).unwrap();

        let means = circles.mean_distances().unwrap();
        for (v, mean) in means.into_iter().enumerate() {
            let expected = solver.compute_from_vertex(v).unwrap().mean_reached();
            assert_relative_eq!(mean, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn symmetric_corners_agree() {
        // Corners 0 and 6 are point reflections of each other on the cube
        let solver = cube_solver();
        let a = at_percent(&solver, 0, 5.0);
        let b = at_percent(&solver, 6, 5.0);
        assert_relative_eq!(a.radius, b.radius, epsilon = 1e-10);
        assert_relative_eq!(a.perimeter, b.perimeter, epsilon = 1e-10);
    }

    #[test]
    fn zero_margin_names_failing_query() {
        let solver = GeodesicSolver::new(&grid(40, 40, 1.0)).unwrap();
        let params = CircleParams::with_area_fraction(1.0)
            .sample_half_width(2.0)
            .margin_edge_factor(0.0);
        let queries = [0, 840, 1680];
        let err = geodesic_circles(&solver, Some(&queries), &params, None).unwrap_err();

        let query = err.query().unwrap();
        assert!(queries.contains(&query));
        let root = err.root();
        assert!(matches!(root, CircleError::InsufficientMargin { .. }));
    }

    #[test]
    fn masked_surface_shrinks_target() {
        let solver = GeodesicSolver::new(&grid(4, 4, 1.0)).unwrap();
        let mut mask = VertexMask::all_valid(25);
        mask.exclude(0);
        let params = CircleParams::default();
        let circles = geodesic_circles(&solver, Some(&[12]), &params, Some(&mask)).unwrap();

        // Vertex 0 touches two faces of area 0.5 each
        assert_relative_eq!(circles.target_area, 0.05 * 15.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_inputs() {
        let solver = cube_solver();
        let params = CircleParams::default();

        let err = geodesic_circles(&solver, None, &params.clone().area_fraction(0.0), None);
        assert!(matches!(err, Err(CircleError::InvalidArgument { .. })));

        let err = geodesic_circles(&solver, Some(&[8]), &params, None).unwrap_err();
        assert!(matches!(
            err,
            CircleError::Geodesic(GeodesicError::InvalidIndex { index: 8, .. })
        ));

        let mut mask = VertexMask::all_valid(8);
        mask.exclude(4);
        let err = geodesic_circles(&solver, Some(&[4]), &params, Some(&mask)).unwrap_err();
        assert!(matches!(
            err,
            CircleError::Geodesic(GeodesicError::InvalidArgument { .. })
        ));
        assert_eq!(err.query(), None);
    }

    #[test]
    fn fully_masked_surface_is_degenerate() {
        let solver = cube_solver();
        let mask = VertexMask::from_valid_indices(8, &[0]).unwrap();
        let params = CircleParams::default();
        let err = geodesic_circles(&solver, Some(&[0]), &params, Some(&mask)).unwrap_err();
        assert!(matches!(err, CircleError::DegenerateMesh { .. }));
    }

    #[test]
    fn scatter_places_values() {
        let circles = GeodesicCircles {
            circles: vec![CircleResult {
                vertex: 1,
                radius: 2.0,
                perimeter: 3.0,
                mean_distance: None,
            }],
            target_area: 1.0,
            ideal_radius: 1.0,
            max_distance: Some(2.0),
        };
        let dense = circles.scatter(3, -1.0, |c| c.perimeter);
        assert_eq!(dense, vec![-1.0, 3.0, -1.0]);
        assert_eq!(circles.radii(), vec![2.0]);
        assert_eq!(circles.perimeters(), vec![3.0]);
        assert!(circles.mean_distances().is_none());
    }
}
