//! Triangles with resolved corner positions.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A face with its three corner positions resolved.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
///     Point3::new(0.0, 4.0, 0.0),
/// );
/// assert!((tri.area() - 6.0).abs() < 1e-10);
/// assert!((tri.normal().unwrap().z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First corner.
    pub v0: Point3<f64>,
    /// Second corner.
    pub v1: Point3<f64>,
    /// Third corner.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a triangle from its corners.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Cross product of the two edges leaving `v0`; its length is twice the area.
    #[inline]
    #[must_use]
    pub fn scaled_normal(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal, or `None` for a zero-area triangle.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.scaled_normal();
        let len = n.norm();
        (len > f64::EPSILON).then(|| n / len)
    }

    /// Surface area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.scaled_normal().norm() * 0.5
    }

    /// Interior angles in radians at `v0`, `v1` and `v2`.
    ///
    /// Angles at a zero-length corner are reported as `0.0`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Point3, Triangle};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// let [a0, a1, a2] = tri.angles();
    /// assert!((a0 - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
    /// assert!((a0 + a1 + a2 - std::f64::consts::PI).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn angles(&self) -> [f64; 3] {
        [
            corner_angle(self.v1 - self.v0, self.v2 - self.v0),
            corner_angle(self.v2 - self.v1, self.v0 - self.v1),
            corner_angle(self.v0 - self.v2, self.v1 - self.v2),
        ]
    }
}

fn corner_angle(a: Vector3<f64>, b: Vector3<f64>) -> f64 {
    let denom = a.norm() * b.norm();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (a.dot(&b) / denom).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Triangle {
        Triangle::new(Point3::from(a), Point3::from(b), Point3::from(c))
    }

    #[test]
    fn equilateral_angles() {
        let t = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 3.0_f64.sqrt(), 0.0]);
        for angle in t.angles() {
            assert_relative_eq!(angle, std::f64::consts::FRAC_PI_3, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_corner_angle_is_zero() {
        let t = tri([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let [a0, a1, _] = t.angles();
        assert_relative_eq!(a0, 0.0);
        assert_relative_eq!(a1, 0.0);
    }

    #[test]
    fn collinear_has_no_normal() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(t.normal().is_none());
        assert_relative_eq!(t.area(), 0.0);
    }

    #[test]
    fn clockwise_normal_points_down() {
        let t = tri([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let n = t.normal().unwrap_or_else(Vector3::zeros);
        assert_relative_eq!(n.z, -1.0);
    }
}
