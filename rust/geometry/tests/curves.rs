// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use brep_lite_geometry::{
    points_equal, points_equal_2d, Arc2D, Circle2D, Circle3D, Curve2D, Curve3D, Line2D, Point2, Point3,
    Spline2D, Vector3,
};
use std::f64::consts::PI;

/// Composite Simpson integration of |dP/dt| over `[a, b]`.
fn integrate(speed: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    let n = 2000;
    let h = (b - a) / n as f64;
    let mut sum = speed(a) + speed(b);
    for i in 1..n {
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += w * speed(a + i as f64 * h);
    }
    sum * h / 3.0
}

fn curves_2d() -> Vec<(Curve2D, Point2<f64>, Point2<f64>)> {
    vec![
        (
            Curve2D::Line(Line2D::new(Point2::new(1.0, 2.0), Point2::new(4.0, 6.0))),
            Point2::new(1.0, 2.0),
            Point2::new(4.0, 6.0),
        ),
        (
            Curve2D::Circle(Circle2D::new(Point2::new(1.0, 1.0), 2.0)),
            Point2::new(3.0, 1.0),
            Point2::new(3.0, 1.0),
        ),
        (
            Curve2D::Arc(Arc2D::new(Point2::origin(), 3.0, 0.0, 0.5 * PI)),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 3.0),
        ),
        (
            Curve2D::Arc(Arc2D::new(Point2::origin(), 1.0, PI, 0.25 * PI)),
            Point2::new(-1.0, 0.0),
            Point2::new(0.5f64.sqrt(), 0.5f64.sqrt()),
        ),
    ]
}

#[test]
fn endpoints_match_nominal_points() {
    for (curve, start, end) in curves_2d() {
        assert!(points_equal_2d(&curve.point_at(0.0), &start), "{curve:?}");
        assert!(points_equal_2d(&curve.point_at(1.0), &end), "{curve:?}");
    }

    let spline = Curve2D::Spline(Spline2D::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 2.0),
        Point2::new(3.0, 2.0),
    ]));
    assert!(points_equal_2d(&spline.start_point(), &Point2::new(0.0, 0.0)));
    assert!(points_equal_2d(&spline.end_point(), &Point2::new(3.0, 2.0)));
}

#[test]
fn closed_form_lengths_match_integration() {
    for (curve, _, _) in curves_2d() {
        let numeric = integrate(|t| curve.tangent_at(t).norm(), 0.0, 1.0);
        assert_relative_eq!(curve.length(), numeric, max_relative = 1e-6);
    }
}

#[test]
fn circle_3d_length_and_endpoints() {
    let curve = Curve3D::Circle(Circle3D::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(1.0, 1.0, 0.0), 2.0));
    let (a, b) = curve.domain();
    assert!(points_equal(&curve.point_at(a), &curve.point_at(b)));
    assert_relative_eq!((curve.point_at(1.3) - Point3::new(0.0, 0.0, 5.0)).norm(), 2.0, epsilon = 1e-12);
    let numeric = integrate(|t| curve.tangent_at(t).norm(), a, b);
    assert_relative_eq!(curve.length(), numeric, max_relative = 1e-6);

    let line = Curve3D::line(Point3::origin(), Point3::new(1.0, 2.0, 2.0));
    assert_relative_eq!(line.length(), 3.0);
    assert!(points_equal(&line.point_at(1.0), &Point3::new(1.0, 2.0, 2.0)));
}

#[test]
fn curve_bounds_enclose_samples() {
    for (curve, _, _) in curves_2d() {
        let b = curve.bounds();
        for i in 0..=64 {
            let p = curve.point_at(i as f64 / 64.0);
            assert!(p.x >= b.min.x - 1e-9 && p.x <= b.max.x + 1e-9);
            assert!(p.y >= b.min.y - 1e-9 && p.y <= b.max.y + 1e-9);
        }
    }
}
