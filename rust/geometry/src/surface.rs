// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parametric surfaces `(u, v) → point, normal`.
//!
//! A face's outward direction is whatever its surface's `normal_at` returns.
//! Planes flip by swapping the sense of their `y_axis`; cylinders and
//! surfaces of revolution carry an explicit `reversed` sense instead.

use std::f64::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};

use crate::curve3d::Curve3D;
use crate::math::{circle_axes, plane_basis, rotation_matrix, Transform3};

/// Plane through `origin` spanned by `x_axis` and `y_axis`.
///
/// The parameter bounds default to the unit square and are meant to be
/// adjusted to the finite patch a face actually covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub u_range: (f64, f64),
    pub v_range: (f64, f64),
}

impl Plane {
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let (x_axis, y_axis) = plane_basis(&normal);
        Self::from_axes(origin, x_axis, y_axis)
    }

    pub fn from_axes(origin: Point3<f64>, x_axis: Vector3<f64>, y_axis: Vector3<f64>) -> Self {
        Self {
            origin,
            x_axis,
            y_axis,
            u_range: (0.0, 1.0),
            v_range: (0.0, 1.0),
        }
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.x_axis
            .cross(&self.y_axis)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::z)
    }

    pub fn set_bounds(&mut self, u_range: (f64, f64), v_range: (f64, f64)) {
        self.u_range = u_range;
        self.v_range = v_range;
    }

    /// Parameters of the orthogonal projection of `p` onto the plane.
    pub fn project(&self, p: &Point3<f64>) -> (f64, f64) {
        let d = p - self.origin;
        (d.dot(&self.x_axis), d.dot(&self.y_axis))
    }

    /// Signed distance from the plane along its normal.
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        (p - self.origin).dot(&self.normal())
    }

    /// The same plane with the opposite normal.
    pub fn flipped(&self) -> Plane {
        Plane {
            origin: self.origin,
            x_axis: self.x_axis,
            y_axis: -self.y_axis,
            u_range: self.u_range,
            v_range: (-self.v_range.1, -self.v_range.0),
        }
    }
}

/// Right circular cylinder around `axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub radius: f64,
    pub u_range: (f64, f64),
    pub v_range: (f64, f64),
    /// Normals point towards the axis when set.
    pub reversed: bool,
}

impl Cylinder {
    pub fn new(origin: Point3<f64>, axis: Vector3<f64>, radius: f64) -> Self {
        let axis = axis.try_normalize(1e-12).unwrap_or_else(Vector3::z);
        let (x_axis, y_axis) = circle_axes(&axis);
        Self {
            origin,
            axis,
            x_axis,
            y_axis,
            radius,
            u_range: (0.0, TAU),
            v_range: (0.0, 1.0),
            reversed: false,
        }
    }

    /// Cylinder sharing the frame of an existing circle.
    pub fn from_frame(
        origin: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
        radius: f64,
    ) -> Self {
        Self {
            origin,
            axis: x_axis.cross(&y_axis),
            x_axis,
            y_axis,
            radius,
            u_range: (0.0, TAU),
            v_range: (0.0, 1.0),
            reversed: false,
        }
    }

    /// Finite height along the axis, starting at the origin.
    pub fn set_height(&mut self, height: f64) {
        self.v_range = (0.0, height);
    }

    pub fn set_v_range(&mut self, v_min: f64, v_max: f64) {
        self.v_range = (v_min, v_max);
    }

    fn radial(&self, u: f64) -> Vector3<f64> {
        self.x_axis * u.cos() + self.y_axis * u.sin()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point3<f64>,
    pub radius: f64,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub z_axis: Vector3<f64>,
}

impl Sphere {
    pub fn new(center: Point3<f64>, radius: f64) -> Self {
        Self {
            center,
            radius,
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
            z_axis: Vector3::z(),
        }
    }

    fn direction(&self, u: f64, v: f64) -> Vector3<f64> {
        (self.x_axis * u.cos() + self.y_axis * u.sin()) * v.sin() + self.z_axis * v.cos()
    }
}

/// Surface swept by rotating a generatrix curve about an axis.
///
/// `u ∈ [0, angle]` is the rotation angle, `v ∈ [0, 1]` walks the generatrix
/// over its parameter sub-range `t_range`.
#[derive(Debug, Clone, PartialEq)]
pub struct Revolution {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub profile: Curve3D,
    pub t_range: (f64, f64),
    pub angle: f64,
    pub reversed: bool,
}

impl Revolution {
    fn profile_param(&self, v: f64) -> f64 {
        self.t_range.0 + v * (self.t_range.1 - self.t_range.0)
    }

    fn raw_normal(&self, u: f64, v: f64) -> Vector3<f64> {
        let rotation = rotation_matrix(&self.axis, u);
        let t = self.profile_param(v);
        let p = self.profile.point_at(t);
        let du = self.axis.cross(&(rotation * (p - self.origin)));
        let dv = rotation * self.profile.tangent_at(t) * (self.t_range.1 - self.t_range.0);
        du.cross(&dv)
    }
}

/// A parametric surface of one of the supported kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    Plane(Plane),
    Cylinder(Cylinder),
    Sphere(Sphere),
    Revolution(Revolution),
}

impl Surface {
    pub fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        match self {
            Surface::Plane(p) => p.origin + p.x_axis * u + p.y_axis * v,
            Surface::Cylinder(c) => c.origin + c.radial(u) * c.radius + c.axis * v,
            Surface::Sphere(s) => s.center + s.direction(u, v) * s.radius,
            Surface::Revolution(r) => {
                let rotation = rotation_matrix(&r.axis, u);
                let p = r.profile.point_at(r.profile_param(v));
                r.origin + rotation * (p - r.origin)
            }
        }
    }

    /// Unit normal at `(u, v)`.
    pub fn normal_at(&self, u: f64, v: f64) -> Vector3<f64> {
        match self {
            Surface::Plane(p) => p.normal(),
            Surface::Cylinder(c) => {
                let n = c.radial(u);
                if c.reversed {
                    -n
                } else {
                    n
                }
            }
            Surface::Sphere(s) => s.direction(u, v),
            Surface::Revolution(r) => {
                // On the axis the tangent plane degenerates; step inwards.
                let nudged = if v < 0.5 { v + 1e-4 } else { v - 1e-4 };
                let n = r
                    .raw_normal(u, v)
                    .try_normalize(1e-12)
                    .or_else(|| r.raw_normal(u, nudged).try_normalize(1e-12))
                    .unwrap_or(r.axis);
                if r.reversed {
                    -n
                } else {
                    n
                }
            }
        }
    }

    pub fn u_bounds(&self) -> (f64, f64) {
        match self {
            Surface::Plane(p) => p.u_range,
            Surface::Cylinder(c) => c.u_range,
            Surface::Sphere(_) => (0.0, TAU),
            Surface::Revolution(r) => (0.0, r.angle),
        }
    }

    pub fn v_bounds(&self) -> (f64, f64) {
        match self {
            Surface::Plane(p) => p.v_range,
            Surface::Cylinder(c) => c.v_range,
            Surface::Sphere(_) => (0.0, PI),
            Surface::Revolution(_) => (0.0, 1.0),
        }
    }

    pub fn is_planar(&self) -> bool {
        matches!(self, Surface::Plane(_))
    }

    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            Surface::Plane(p) => Some(p),
            _ => None,
        }
    }

    /// Grid resolution `(nu, nv)` used to tessellate the full parameter
    /// rectangle with `segments_per_turn` pieces per full revolution.
    pub fn grid_resolution(&self, segments_per_turn: usize) -> (usize, usize) {
        let turns = |span: f64| ((span.abs() / TAU * segments_per_turn as f64).ceil() as usize).max(1);
        let (u0, u1) = self.u_bounds();
        match self {
            Surface::Plane(_) => (1, 1),
            Surface::Cylinder(_) => (turns(u1 - u0), 1),
            Surface::Sphere(_) => (turns(u1 - u0), turns(PI).max(2)),
            Surface::Revolution(r) => (
                turns(u1 - u0),
                r.profile
                    .segment_count(r.t_range.0, r.t_range.1, segments_per_turn),
            ),
        }
    }

    /// Image of the surface under a rigid (or uniformly scaled) transform.
    pub fn transformed(&self, transform: &Transform3) -> Surface {
        let dir = |v: &Vector3<f64>| transform.apply_vector(v);
        let unit = |v: &Vector3<f64>| {
            let image = transform.apply_vector(v);
            image.try_normalize(1e-12).unwrap_or(image)
        };
        match self {
            Surface::Plane(p) => Surface::Plane(Plane {
                origin: transform.apply_point(&p.origin),
                x_axis: dir(&p.x_axis),
                y_axis: dir(&p.y_axis),
                u_range: p.u_range,
                v_range: p.v_range,
            }),
            Surface::Cylinder(c) => {
                let scale = dir(&c.x_axis).norm();
                Surface::Cylinder(Cylinder {
                    origin: transform.apply_point(&c.origin),
                    axis: unit(&c.axis),
                    x_axis: unit(&c.x_axis),
                    y_axis: unit(&c.y_axis),
                    radius: c.radius * scale,
                    u_range: c.u_range,
                    v_range: (c.v_range.0 * scale, c.v_range.1 * scale),
                    reversed: c.reversed,
                })
            }
            Surface::Sphere(s) => {
                let scale = dir(&s.x_axis).norm();
                Surface::Sphere(Sphere {
                    center: transform.apply_point(&s.center),
                    radius: s.radius * scale,
                    x_axis: unit(&s.x_axis),
                    y_axis: unit(&s.y_axis),
                    z_axis: unit(&s.z_axis),
                })
            }
            Surface::Revolution(r) => Surface::Revolution(Revolution {
                origin: transform.apply_point(&r.origin),
                axis: unit(&r.axis),
                profile: r.profile.transformed(transform),
                t_range: r.t_range,
                angle: r.angle,
                reversed: r.reversed,
            }),
        }
    }
}
