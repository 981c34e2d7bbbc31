//! Monotone piecewise cubic Hermite interpolation (PCHIP).
//!
//! Slopes follow Fritsch and Carlson: zero at local extrema, a weighted
//! harmonic mean of the neighboring secants elsewhere, and the
//! shape-preserving three-point formula at both ends. The interpolant never
//! overshoots monotone data, and it is exactly flat wherever the data is.

use crate::error::{CircleError, CirclesResult};

/// Monotone cubic interpolant through a set of knots.
///
/// # Example
///
/// ```
/// use mesh_geocircles::MonotoneCubic;
///
/// let spline = MonotoneCubic::new(vec![1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, 4.0, 4.0]).unwrap();
/// assert_eq!(spline.evaluate(2.0), 1.0);
/// assert_eq!(spline.evaluate(3.5), 4.0); // flat data stays flat
/// let mid = spline.evaluate(2.5);
/// assert!(mid > 1.0 && mid < 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MonotoneCubic {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
}

impl MonotoneCubic {
    /// Fit the interpolant.
    ///
    /// # Errors
    ///
    /// Returns [`CircleError::InvalidArgument`] if fewer than two knots are
    /// given, the lengths differ, a value is not finite, or `x` is not
    /// strictly increasing.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> CirclesResult<Self> {
        if x.len() != y.len() {
            return Err(CircleError::invalid_argument(
                "y",
                format!("length {} does not match {} knots", y.len(), x.len()),
            ));
        }
        if x.len() < 2 {
            return Err(CircleError::invalid_argument(
                "x",
                "at least two knots are required",
            ));
        }
        if x.iter().chain(&y).any(|v| !v.is_finite()) {
            return Err(CircleError::invalid_argument(
                "knots",
                "values must be finite",
            ));
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CircleError::invalid_argument(
                "x",
                "must be strictly increasing",
            ));
        }

        let slopes = pchip_slopes(&x, &y);
        Ok(Self { x, y, slopes })
    }

    /// Evaluate the interpolant at `t`.
    ///
    /// Values outside the knot range are clamped to the first or last knot
    /// value.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> f64 {
        let n = self.x.len();
        if t <= self.x[0] {
            return self.y[0];
        }
        if t >= self.x[n - 1] {
            return self.y[n - 1];
        }

        // Index of the interval [x[i], x[i + 1]) containing t
        let i = self.x.partition_point(|&xk| xk <= t) - 1;
        let h = self.x[i + 1] - self.x[i];
        let s = (t - self.x[i]) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h01 = 3.0f64.mul_add(s2, -2.0 * s3);
        let h10 = s3 - 2.0 * s2 + s;
        let h11 = s3 - s2;

        let (y0, y1) = (self.y[i], self.y[i + 1]);
        (y1 - y0).mul_add(
            h01,
            y0 + h * self.slopes[i].mul_add(h10, self.slopes[i + 1] * h11),
        )
    }

    /// The knot positions.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.x
    }

    /// The slope at each knot.
    #[must_use]
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }
}

/// Sign as -1, 0 or 1, with zero mapped to 0.
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Compute Fritsch-Carlson knot slopes.
fn pchip_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = y
        .windows(2)
        .zip(&h)
        .map(|(w, &hk)| (w[1] - w[0]) / hk)
        .collect();

    if n == 2 {
        return vec![delta[0]; 2];
    }

    let mut slopes = vec![0.0; n];
    for k in 1..n - 1 {
        let (d0, d1) = (delta[k - 1], delta[k]);
        if sign(d0) * sign(d1) <= 0 {
            continue;
        }
        let w1 = 2.0f64.mul_add(h[k], h[k - 1]);
        let w2 = 2.0f64.mul_add(h[k - 1], h[k]);
        slopes[k] = (w1 + w2) / (w1 / d0 + w2 / d1);
    }

    slopes[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    slopes[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    slopes
}

/// Shape-preserving three-point slope at an end knot.
///
/// `h0`/`d0` belong to the end interval, `h1`/`d1` to its neighbor.
fn end_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let slope = (2.0f64.mul_add(h0, h1) * d0 - h0 * d1) / (h0 + h1);
    if sign(slope) != sign(d0) {
        0.0
    } else if sign(d0) != sign(d1) && slope.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        slope
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn knots(n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| f64::from(u32::try_from(i).unwrap()))
            .collect()
    }

    #[test]
    fn passes_through_knots() {
        let y = vec![0.0, 0.5, 3.0, 3.5, 7.0];
        let spline = MonotoneCubic::new(knots(5), y.clone()).unwrap();
        for (x, y) in knots(5).into_iter().zip(y) {
            assert_eq!(spline.evaluate(x), y);
        }
    }

    #[test]
    fn reproduces_linear_data() {
        let y: Vec<f64> = knots(6).iter().map(|x| 2.0 * x - 1.0).collect();
        let spline = MonotoneCubic::new(knots(6), y).unwrap();
        for i in 0..=50 {
            let t = 1.0 + f64::from(i) * 0.1;
            assert_relative_eq!(spline.evaluate(t), 2.0 * t - 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn monotone_data_never_overshoots() {
        let y = vec![0.0, 0.0, 0.1, 5.0, 5.1, 24.0, 24.0, 24.0];
        let spline = MonotoneCubic::new(knots(8), y).unwrap();
        let mut prev = spline.evaluate(1.0);
        for i in 1..=70 {
            let t = 1.0 + f64::from(i) * 0.1;
            let v = spline.evaluate(t);
            assert!(v >= prev - 1e-12);
            assert!(v <= 24.0);
            prev = v;
        }
    }

    #[test]
    fn flat_stretch_is_exact() {
        let y = vec![1.0, 3.0, 24.0, 24.0, 24.0];
        let spline = MonotoneCubic::new(knots(5), y).unwrap();
        for i in 0..=20 {
            let t = 3.0 + f64::from(i) * 0.1;
            assert_eq!(spline.evaluate(t), 24.0);
        }
    }

    #[test]
    fn extrema_get_zero_slope() {
        let spline = MonotoneCubic::new(knots(3), vec![0.0, 2.0, 0.0]).unwrap();
        assert_eq!(spline.slopes()[1], 0.0);
        assert!(spline.evaluate(1.5) <= 2.0);
    }

    #[test]
    fn two_knots_are_linear() {
        let spline = MonotoneCubic::new(vec![0.0, 2.0], vec![1.0, 5.0]).unwrap();
        assert_relative_eq!(spline.evaluate(0.5), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn clamps_outside_range() {
        let spline = MonotoneCubic::new(knots(3), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(spline.evaluate(-4.0), 1.0);
        assert_eq!(spline.evaluate(10.0), 3.0);
    }

    #[test]
    fn rejects_bad_knots() {
        assert!(MonotoneCubic::new(vec![1.0], vec![1.0]).is_err());
        assert!(MonotoneCubic::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(MonotoneCubic::new(vec![1.0, 1.0], vec![1.0, 2.0]).is_err());
        let nan = vec![f64::NAN, 2.0];
        assert!(MonotoneCubic::new(vec![1.0, 2.0], nan).is_err());
    }
}
