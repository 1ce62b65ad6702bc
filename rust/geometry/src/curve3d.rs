// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D parametric curves.
//!
//! Unlike the 2D curves, each 3D curve exposes its own natural parameter
//! domain (`[0, 1]` for lines, `[0, 2π]` for circles). Edges then select a
//! sub-range `[t0, t1]` of that domain.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::math::{circle_axes, Bounds3, Transform3};

#[derive(Debug, Clone, PartialEq)]
pub struct Line3D {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Line3D {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }
}

/// Circle in 3D space: `center + r (cos t · x_axis + sin t · y_axis)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle3D {
    pub center: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub radius: f64,
}

impl Circle3D {
    /// Circle around `normal`, with the in-plane frame from [`circle_axes`].
    pub fn new(center: Point3<f64>, normal: Vector3<f64>, radius: f64) -> Self {
        let (x_axis, y_axis) = circle_axes(&normal);
        Self {
            center,
            x_axis,
            y_axis,
            radius,
        }
    }

    /// Circle with an explicit frame. The axes are expected to be
    /// orthonormal; the normal follows as `x_axis × y_axis`.
    pub fn with_frame(
        center: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
        radius: f64,
    ) -> Self {
        Self {
            center,
            x_axis,
            y_axis,
            radius,
        }
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.x_axis.cross(&self.y_axis)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Curve3D {
    Line(Line3D),
    Circle(Circle3D),
}

impl Curve3D {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Curve3D::Line(Line3D::new(start, end))
    }

    /// Natural parameter domain `(t_min, t_max)`.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Curve3D::Line(_) => (0.0, 1.0),
            Curve3D::Circle(_) => (0.0, TAU),
        }
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        match self {
            Curve3D::Line(l) => l.start + (l.end - l.start) * t,
            Curve3D::Circle(c) => c.center + (c.x_axis * t.cos() + c.y_axis * t.sin()) * c.radius,
        }
    }

    /// Derivative `dP/dt`.
    pub fn tangent_at(&self, t: f64) -> Vector3<f64> {
        match self {
            Curve3D::Line(l) => l.end - l.start,
            Curve3D::Circle(c) => (c.y_axis * t.cos() - c.x_axis * t.sin()) * c.radius,
        }
    }

    /// Length over the whole domain.
    pub fn length(&self) -> f64 {
        let (a, b) = self.domain();
        self.length_between(a, b)
    }

    pub fn length_between(&self, t0: f64, t1: f64) -> f64 {
        match self {
            Curve3D::Line(l) => (l.end - l.start).norm() * (t1 - t0).abs(),
            Curve3D::Circle(c) => c.radius * (t1 - t0).abs(),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Curve3D::Line(_))
    }

    /// Number of straight segments used to approximate `[t0, t1]` when a full
    /// turn is split into `segments_per_turn` pieces.
    pub fn segment_count(&self, t0: f64, t1: f64, segments_per_turn: usize) -> usize {
        match self {
            Curve3D::Line(_) => 1,
            Curve3D::Circle(_) => {
                let turns = (t1 - t0).abs() / TAU;
                ((turns * segments_per_turn as f64).ceil() as usize).max(1)
            }
        }
    }

    /// Points along `[t0, t1]`, both ends included.
    pub fn sample(&self, t0: f64, t1: f64, segments_per_turn: usize) -> Vec<Point3<f64>> {
        let n = self.segment_count(t0, t1, segments_per_turn);
        (0..=n)
            .map(|i| self.point_at(t0 + (t1 - t0) * i as f64 / n as f64))
            .collect()
    }

    /// Exact axis-aligned bounds of the sub-range `[t0, t1]`.
    pub fn bounds_between(&self, t0: f64, t1: f64) -> Bounds3 {
        let mut bounds = Bounds3::from_point(self.point_at(t0));
        bounds.include(&self.point_at(t1));
        if let Curve3D::Circle(c) = self {
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            for k in 0..3 {
                // Extremes of x_k cos t + y_k sin t.
                let base = c.y_axis[k].atan2(c.x_axis[k]);
                for candidate in [base, base + std::f64::consts::PI] {
                    let mut t = candidate.rem_euclid(TAU) + (lo / TAU).floor() * TAU;
                    while t < lo {
                        t += TAU;
                    }
                    while t <= hi {
                        bounds.include(&self.point_at(t));
                        t += TAU;
                    }
                }
            }
        }
        bounds
    }

    /// Image of the curve under `transform`, assumed rigid or uniformly scaled.
    pub fn transformed(&self, transform: &Transform3) -> Curve3D {
        match self {
            Curve3D::Line(l) => Curve3D::Line(Line3D::new(
                transform.apply_point(&l.start),
                transform.apply_point(&l.end),
            )),
            Curve3D::Circle(c) => {
                let x = transform.apply_vector(&c.x_axis);
                let y = transform.apply_vector(&c.y_axis);
                let scale = x.norm();
                Curve3D::Circle(Circle3D::with_frame(
                    transform.apply_point(&c.center),
                    x.try_normalize(1e-12).unwrap_or(c.x_axis),
                    y.try_normalize(1e-12).unwrap_or(c.y_axis),
                    c.radius * scale,
                ))
            }
        }
    }
}
