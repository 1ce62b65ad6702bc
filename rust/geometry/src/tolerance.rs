// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance constants and the equality predicates built on them.
//!
//! Geometric equality is never tested with raw `==` on coordinates. Every
//! comparison goes through [`points_equal`] / [`vectors_parallel`] (or the
//! [`Tolerance`] methods when a caller carries custom settings).

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Distance below which two points are considered coincident.
pub const DISTANCE_TOLERANCE: f64 = 1e-7;

/// Angular tolerance, applied as `1 - |cos θ|` between two directions.
pub const ANGULAR_TOLERANCE: f64 = 1e-9;

/// Tolerance on curve and surface parameters.
pub const PARAMETRIC_TOLERANCE: f64 = 1e-9;

/// A set of tolerances used by the kernel's geometric predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub distance: f64,
    pub angular: f64,
    pub parametric: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            distance: DISTANCE_TOLERANCE,
            angular: ANGULAR_TOLERANCE,
            parametric: PARAMETRIC_TOLERANCE,
        }
    }
}

impl Tolerance {
    /// Returns `true` if `a` and `b` are within `distance` of each other.
    #[inline]
    pub fn points_equal(&self, a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm_squared() <= self.distance * self.distance
    }

    /// 2D variant of [`Tolerance::points_equal`].
    #[inline]
    pub fn points_equal_2d(&self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        (a - b).norm_squared() <= self.distance * self.distance
    }

    /// Returns `true` if the two directions are parallel or anti-parallel.
    ///
    /// A vector shorter than the distance tolerance has no direction and is
    /// treated as parallel to everything.
    pub fn vectors_parallel(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        let la = a.norm();
        let lb = b.norm();
        if la <= self.distance || lb <= self.distance {
            return true;
        }
        let cos = a.dot(b) / (la * lb);
        cos.abs() >= 1.0 - self.angular
    }

    #[inline]
    pub fn params_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.parametric
    }

    /// Returns `true` if `value` is indistinguishable from zero as a length.
    #[inline]
    pub fn is_zero_length(&self, value: f64) -> bool {
        value.abs() <= self.distance
    }
}

/// [`Tolerance::points_equal`] with the default tolerance.
#[inline]
pub fn points_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    Tolerance::default().points_equal(a, b)
}

/// [`Tolerance::points_equal_2d`] with the default tolerance.
#[inline]
pub fn points_equal_2d(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    Tolerance::default().points_equal_2d(a, b)
}

/// [`Tolerance::vectors_parallel`] with the default tolerance.
#[inline]
pub fn vectors_parallel(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    Tolerance::default().vectors_parallel(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_within_tolerance() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 5e-8, 2.0, 3.0);
        let c = Point3::new(1.0 + 2e-7, 2.0, 3.0);
        assert!(points_equal(&a, &b));
        assert!(!points_equal(&a, &c));
    }

    #[test]
    fn parallel_and_antiparallel() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        assert!(vectors_parallel(&x, &Vector3::new(3.0, 0.0, 0.0)));
        assert!(vectors_parallel(&x, &Vector3::new(-2.0, 0.0, 0.0)));
        assert!(!vectors_parallel(&x, &Vector3::new(1.0, 1e-3, 0.0)));
    }

    #[test]
    fn zero_vector_is_parallel_to_anything() {
        assert!(vectors_parallel(
            &Vector3::zeros(),
            &Vector3::new(0.0, 1.0, 0.0)
        ));
    }

    #[test]
    fn custom_tolerance_is_respected() {
        let loose = Tolerance {
            distance: 1e-3,
            ..Tolerance::default()
        };
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(5e-4, 0.0);
        assert!(loose.points_equal_2d(&a, &b));
        assert!(!points_equal_2d(&a, &b));
    }
}
