// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D parametric curves over `t ∈ [0, 1]`.
//!
//! The variant set is closed, so curves are a plain enum dispatched by
//! `match`. `tangent_at` returns the derivative `dP/dt`, not a unit vector,
//! which makes `∫|tangent| dt` equal to the curve length.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::{Point2, Vector2};

use crate::math::Bounds2;

/// Straight segment from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Line2D {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }
}

/// Full circle, starting at angle 0 and running counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle2D {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle2D {
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Circular arc between two angles in radians.
///
/// `end_angle < start_angle` describes a clockwise arc.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc2D {
    pub center: Point2<f64>,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc2D {
    pub fn new(center: Point2<f64>, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    #[inline]
    fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Polyline through control points, parameterized by cumulative length.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline2D {
    control_points: Vec<Point2<f64>>,
    /// `cumulative[i]` is the arc length from the first point to point `i`.
    cumulative: Vec<f64>,
}

impl Spline2D {
    pub fn new(control_points: Vec<Point2<f64>>) -> Self {
        let mut cumulative = Vec::with_capacity(control_points.len());
        let mut acc = 0.0;
        for (i, p) in control_points.iter().enumerate() {
            if i > 0 {
                acc += (p - control_points[i - 1]).norm();
            }
            cumulative.push(acc);
        }
        Self {
            control_points,
            cumulative,
        }
    }

    pub fn control_points(&self) -> &[Point2<f64>] {
        &self.control_points
    }

    fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        let n = self.control_points.len();
        match n {
            0 => return Point2::origin(),
            1 => return self.control_points[0],
            _ => {}
        }
        let total = self.total_length();
        if total <= 0.0 {
            return self.control_points[0];
        }
        let target = t.clamp(0.0, 1.0) * total;
        // First point whose cumulative length reaches the target ends the segment.
        let hi = self
            .cumulative
            .partition_point(|&len| len < target)
            .clamp(1, n - 1);
        let lo = hi - 1;
        let seg = self.cumulative[hi] - self.cumulative[lo];
        if seg <= 0.0 {
            return self.control_points[hi];
        }
        let local = (target - self.cumulative[lo]) / seg;
        self.control_points[lo] + (self.control_points[hi] - self.control_points[lo]) * local
    }

    fn tangent_at(&self, t: f64) -> Vector2<f64> {
        const DT: f64 = 1e-6;
        let t0 = (t - DT).max(0.0);
        let t1 = (t + DT).min(1.0);
        if t1 <= t0 {
            return Vector2::zeros();
        }
        (self.point_at(t1) - self.point_at(t0)) / (t1 - t0)
    }
}

/// A 2D curve of one of the supported kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve2D {
    Line(Line2D),
    Circle(Circle2D),
    Arc(Arc2D),
    Spline(Spline2D),
}

impl Curve2D {
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        match self {
            Curve2D::Line(l) => l.start + (l.end - l.start) * t,
            Curve2D::Circle(c) => {
                let a = t * TAU;
                c.center + Vector2::new(a.cos(), a.sin()) * c.radius
            }
            Curve2D::Arc(a) => {
                let angle = a.start_angle + t * a.sweep();
                a.center + Vector2::new(angle.cos(), angle.sin()) * a.radius
            }
            Curve2D::Spline(s) => s.point_at(t),
        }
    }

    /// Derivative `dP/dt` at `t`.
    pub fn tangent_at(&self, t: f64) -> Vector2<f64> {
        match self {
            Curve2D::Line(l) => l.end - l.start,
            Curve2D::Circle(c) => {
                let a = t * TAU;
                Vector2::new(-a.sin(), a.cos()) * (c.radius * TAU)
            }
            Curve2D::Arc(a) => {
                let angle = a.start_angle + t * a.sweep();
                Vector2::new(-angle.sin(), angle.cos()) * (a.radius * a.sweep())
            }
            Curve2D::Spline(s) => s.tangent_at(t),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Curve2D::Line(l) => (l.end - l.start).norm(),
            Curve2D::Circle(c) => TAU * c.radius,
            Curve2D::Arc(a) => a.sweep().abs() * a.radius,
            Curve2D::Spline(s) => s.total_length(),
        }
    }

    pub fn start_point(&self) -> Point2<f64> {
        self.point_at(0.0)
    }

    pub fn end_point(&self) -> Point2<f64> {
        self.point_at(1.0)
    }

    /// Axis-aligned bounds of the curve.
    pub fn bounds(&self) -> Bounds2 {
        match self {
            Curve2D::Line(l) => {
                let mut b = Bounds2::from_point(l.start);
                b.include(&l.end);
                b
            }
            Curve2D::Circle(c) => {
                let r = Vector2::new(c.radius, c.radius);
                Bounds2 {
                    min: c.center - r,
                    max: c.center + r,
                }
            }
            Curve2D::Arc(a) => arc_bounds(a),
            Curve2D::Spline(s) => {
                Bounds2::from_points(s.control_points.iter().copied()).unwrap_or_else(Bounds2::zero)
            }
        }
    }

    /// `true` for curves whose end coincides with their start by construction.
    pub fn is_periodic(&self) -> bool {
        matches!(self, Curve2D::Circle(_))
    }

    /// The same point set traversed end to start. Full circles have no
    /// distinguished direction and come back unchanged.
    pub fn reversed(&self) -> Curve2D {
        match self {
            Curve2D::Line(l) => Curve2D::Line(Line2D::new(l.end, l.start)),
            Curve2D::Circle(c) => Curve2D::Circle(c.clone()),
            Curve2D::Arc(a) => Curve2D::Arc(Arc2D::new(a.center, a.radius, a.end_angle, a.start_angle)),
            Curve2D::Spline(s) => {
                Curve2D::Spline(Spline2D::new(s.control_points.iter().rev().copied().collect()))
            }
        }
    }
}

/// Exact arc bounds: the endpoints plus every axis extreme the sweep passes.
fn arc_bounds(arc: &Arc2D) -> Bounds2 {
    let point = |angle: f64| arc.center + Vector2::new(angle.cos(), angle.sin()) * arc.radius;
    let (lo, hi) = if arc.sweep() >= 0.0 {
        (arc.start_angle, arc.end_angle)
    } else {
        (arc.end_angle, arc.start_angle)
    };
    let mut bounds = Bounds2::from_point(point(lo));
    bounds.include(&point(hi));
    let mut k = (lo / FRAC_PI_2).ceil();
    while k * FRAC_PI_2 <= hi {
        bounds.include(&point(k * FRAC_PI_2));
        k += 1.0;
    }
    bounds
}
