// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Math primitives shared by the whole kernel.
//!
//! Points and vectors are plain `nalgebra` types. This module adds what the
//! kernel needs on top: axis-angle and scale matrices, a linear + translation
//! [`Transform3`], orthonormal frame construction and axis-aligned bounds.

use nalgebra::{Matrix3, Point2, Point3, Rotation3, Unit, Vector3};

/// Rotation matrix for `angle` radians about `axis` (right-hand rule).
///
/// A zero-length axis yields the identity.
pub fn rotation_matrix(axis: &Vector3<f64>, angle: f64) -> Matrix3<f64> {
    match Unit::try_new(*axis, 1e-12) {
        Some(unit) => Rotation3::from_axis_angle(&unit, angle).into_inner(),
        None => Matrix3::identity(),
    }
}

/// Non-uniform scale matrix.
pub fn scale_matrix(sx: f64, sy: f64, sz: f64) -> Matrix3<f64> {
    Matrix3::from_diagonal(&Vector3::new(sx, sy, sz))
}

/// In-plane axes for a circle or cylinder with the given normal.
///
/// `u = (|n.x| < 0.9 ? X : Y) × n`, `v = n × u`. Both are unit length for a
/// non-zero normal.
pub fn circle_axes(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let n = normal.try_normalize(1e-12).unwrap_or_else(Vector3::z);
    let reference = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = reference.cross(&n).normalize();
    let v = n.cross(&u);
    (u, v)
}

/// Orthonormal plane basis for a normal.
///
/// Picks the world axis least parallel to the normal and removes its normal
/// component, so a `+Z` normal maps 2D `(x, y)` straight onto world `(x, y)`.
pub fn plane_basis(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let n = normal.try_normalize(1e-12).unwrap_or_else(Vector3::z);
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    let reference = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = (reference - n * reference.dot(&n)).normalize();
    let v = n.cross(&u);
    (u, v)
}

/// A linear map followed by a translation: `p ↦ linear · p + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3 {
    pub linear: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl Default for Transform3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3 {
    pub fn identity() -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn from_translation(offset: Vector3<f64>) -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: offset,
        }
    }

    /// Rotation about an axis through the world origin.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        Self {
            linear: rotation_matrix(axis, angle),
            translation: Vector3::zeros(),
        }
    }

    /// Rotation about an axis through `origin`.
    pub fn rotation_about(origin: &Point3<f64>, axis: &Vector3<f64>, angle: f64) -> Self {
        let linear = rotation_matrix(axis, angle);
        Self {
            linear,
            translation: origin.coords - linear * origin.coords,
        }
    }

    pub fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            linear: scale_matrix(sx, sy, sz),
            translation: Vector3::zeros(),
        }
    }

    #[inline]
    pub fn apply_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.linear * p.coords + self.translation)
    }

    #[inline]
    pub fn apply_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.linear * v
    }

    /// Composition `self ∘ other`: the result applies `other` first.
    pub fn combine(&self, other: &Transform3) -> Transform3 {
        Transform3 {
            linear: self.linear * other.linear,
            translation: self.linear * other.translation + self.translation,
        }
    }

    /// Inverse transform, or `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Transform3> {
        let inv = self.linear.try_inverse()?;
        Some(Transform3 {
            linear: inv,
            translation: -(inv * self.translation),
        })
    }

    /// `true` if the linear part flips handedness.
    pub fn is_mirroring(&self) -> bool {
        self.linear.determinant() < 0.0
    }
}

/// Axis-aligned 2D bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds2 {
    /// The degenerate box at the origin, used for empty inputs.
    pub fn zero() -> Self {
        Self {
            min: Point2::origin(),
            max: Point2::origin(),
        }
    }

    pub fn from_point(p: Point2<f64>) -> Self {
        Self { min: p, max: p }
    }

    /// Bounds of a point set, `None` when it is empty.
    pub fn from_points<I: IntoIterator<Item = Point2<f64>>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for p in iter {
            bounds.include(&p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: &Point2<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &Bounds2) -> Bounds2 {
        let mut out = *self;
        out.include(&other.min);
        out.include(&other.max);
        out
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Axis-aligned 3D bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds3 {
    pub fn zero() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
        }
    }

    pub fn from_point(p: Point3<f64>) -> Self {
        Self { min: p, max: p }
    }

    pub fn from_points<I: IntoIterator<Item = Point3<f64>>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for p in iter {
            bounds.include(&p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        Bounds3 {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    pub fn contains(&self, p: &Point3<f64>, tolerance: f64) -> bool {
        p.x >= self.min.x - tolerance
            && p.y >= self.min.y - tolerance
            && p.z >= self.min.z - tolerance
            && p.x <= self.max.x + tolerance
            && p.y <= self.max.y + tolerance
            && p.z <= self.max.z + tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotation_quarter_turn_about_z() {
        let m = rotation_matrix(&Vector3::z(), FRAC_PI_2);
        let v = m * Vector3::x();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn zero_axis_rotation_is_identity() {
        assert_eq!(rotation_matrix(&Vector3::zeros(), 1.0), Matrix3::identity());
    }

    #[test]
    fn combine_applies_right_operand_first() {
        let rotate = Transform3::from_axis_angle(&Vector3::z(), FRAC_PI_2);
        let shift = Transform3::from_translation(Vector3::new(1.0, 0.0, 0.0));

        // shift, then rotate: (0,0,0) -> (1,0,0) -> (0,1,0)
        let combined = rotate.combine(&shift);
        let p = combined.apply_point(&Point3::origin());
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        // rotate, then shift: (0,0,0) -> (0,0,0) -> (1,0,0)
        let p = shift.combine(&rotate).apply_point(&Point3::origin());
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rotation_about_offset_axis_keeps_origin_fixed() {
        let origin = Point3::new(2.0, 3.0, 0.0);
        let t = Transform3::rotation_about(&origin, &Vector3::z(), 1.234);
        assert_relative_eq!(t.apply_point(&origin), origin, epsilon = 1e-12);
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform3::rotation_about(&Point3::new(1.0, -2.0, 0.5), &Vector3::new(1.0, 1.0, 0.0), 0.7)
            .combine(&Transform3::from_scale(2.0, 2.0, 2.0));
        let inv = t.inverse().unwrap();
        let p = Point3::new(0.3, 4.0, -1.0);
        assert_relative_eq!(inv.apply_point(&t.apply_point(&p)), p, epsilon = 1e-10);
    }

    #[test]
    fn circle_axes_are_orthonormal() {
        for n in [Vector3::z(), Vector3::x(), Vector3::new(1.0, 2.0, 3.0)] {
            let (u, v) = circle_axes(&n);
            let n = n.normalize();
            assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
            assert!(u.dot(&n).abs() < 1e-12);
            assert_relative_eq!(u.cross(&v), n, epsilon = 1e-12);
        }
    }

    #[test]
    fn plane_basis_for_z_is_world_xy() {
        let (u, v) = plane_basis(&Vector3::z());
        assert_relative_eq!(u, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn bounds_from_points() {
        let b = Bounds3::from_points(vec![
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(-2.0, 3.0, 5.0),
        ])
        .unwrap();
        assert_eq!(b.min, Point3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.max, Point3::new(1.0, 3.0, 5.0));
        assert!(Bounds3::from_points(Vec::new()).is_none());
    }
}
