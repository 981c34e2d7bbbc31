//! Parameters for geodesic circle computation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CircleError, CirclesResult};

/// Parameters for geodesic circle computation.
///
/// # Example
///
/// ```
/// use mesh_geocircles::CircleParams;
///
/// // Default: circles covering 5% of the surface
/// let params = CircleParams::default();
/// assert!((params.area_fraction_percent - 5.0).abs() < 1e-10);
/// assert_eq!(params.resample_count(), 91);
///
/// // Larger circles, with mean geodesic distance
/// let params = CircleParams::with_area_fraction(10.0).mean_distance(true);
/// assert!(params.compute_mean_distance);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircleParams {
    /// Share of the total surface area each circle should enclose, in percent.
    pub area_fraction_percent: f64,

    /// Also compute the mean geodesic distance from each query vertex.
    ///
    /// Forces unbounded propagation, which is much slower on large meshes.
    pub compute_mean_distance: bool,

    /// Number of radii sampled around the ideal radius.
    pub sample_count: usize,

    /// Half width of the sampled radius window, in mesh units.
    pub sample_half_width: f64,

    /// Spline resampling points per sampled interval.
    pub resample_factor: usize,

    /// Propagation margin beyond the ideal radius, in multiples of the
    /// longest edge.
    pub margin_edge_factor: f64,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self::cortical()
    }
}

impl CircleParams {
    /// Parameters used on cortical surfaces in millimeters (5% area).
    #[must_use]
    pub const fn cortical() -> Self {
        Self::with_area_fraction(5.0)
    }

    /// Create params with a custom area fraction, in percent.
    #[must_use]
    pub const fn with_area_fraction(percent: f64) -> Self {
        Self {
            area_fraction_percent: percent,
            compute_mean_distance: false,
            sample_count: 10,
            sample_half_width: 10.0,
            resample_factor: 10,
            margin_edge_factor: 8.0,
        }
    }

    /// Set the area fraction, in percent.
    #[must_use]
    pub const fn area_fraction(mut self, percent: f64) -> Self {
        self.area_fraction_percent = percent;
        self
    }

    /// Enable or disable the mean distance computation.
    #[must_use]
    pub const fn mean_distance(mut self, enable: bool) -> Self {
        self.compute_mean_distance = enable;
        self
    }

    /// Set the number of sampled radii.
    #[must_use]
    pub const fn sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Set the half width of the sampled radius window.
    #[must_use]
    pub const fn sample_half_width(mut self, half_width: f64) -> Self {
        self.sample_half_width = half_width;
        self
    }

    /// Set the spline resampling factor.
    #[must_use]
    pub const fn resample_factor(mut self, factor: usize) -> Self {
        self.resample_factor = factor;
        self
    }

    /// Set the propagation margin, in multiples of the longest edge.
    #[must_use]
    pub const fn margin_edge_factor(mut self, factor: f64) -> Self {
        self.margin_edge_factor = factor;
        self
    }

    /// Number of points the fitted splines are evaluated at.
    #[must_use]
    pub const fn resample_count(&self) -> usize {
        self.sample_count.saturating_sub(1) * self.resample_factor + 1
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`CircleError::InvalidArgument`] naming the first bad field.
    pub fn validate(&self) -> CirclesResult<()> {
        let percent = self.area_fraction_percent;
        if !percent.is_finite() || percent <= 0.0 {
            return Err(CircleError::invalid_argument(
                "area_fraction_percent",
                format!("must be positive and finite, got {percent}"),
            ));
        }
        if self.sample_count < 2 {
            return Err(CircleError::invalid_argument(
                "sample_count",
                format!("must be at least 2, got {}", self.sample_count),
            ));
        }
        let half_width = self.sample_half_width;
        if !half_width.is_finite() || half_width <= 0.0 {
            return Err(CircleError::invalid_argument(
                "sample_half_width",
                format!("must be positive and finite, got {half_width}"),
            ));
        }
        if self.resample_factor == 0 {
            return Err(CircleError::invalid_argument(
                "resample_factor",
                "must be at least 1",
            ));
        }
        let margin = self.margin_edge_factor;
        if !margin.is_finite() || margin < 0.0 {
            return Err(CircleError::invalid_argument(
                "margin_edge_factor",
                format!("must be non-negative and finite, got {margin}"),
            ));
        }
        Ok(())
    }
}
