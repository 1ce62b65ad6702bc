// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch → 2D wire conversion.
//!
//! Each geometry entity becomes zero or more [`Curve2D`]s:
//!
//! - `Line` → one line
//! - `Circle` → one full circle
//! - `Arc` → one arc, angles converted from degrees
//! - `Rectangle` → four lines counter-clockwise from the corner
//! - `Polygon`, `Spline` → a polyline from start to end point
//! - `Ellipse` → nothing, with a warning; its fields carry no axes
//! - `Point`, `Text` → nothing
//!
//! Entities too small to describe a curve are skipped with a warning.

use brep_lite_geometry::{Arc2D, Circle2D, Curve2D, Line2D, Point2, Spline2D, Tolerance, Wire2D};
use tracing::{debug, warn};

use crate::sketch::{GeometryEntity, GeometryType, Point2D, Sketch};

fn pt(p: &Point2D) -> Point2<f64> {
    Point2::new(p.x, p.y)
}

/// Curves for one sketch entity.
pub fn entity_curves(entity: &GeometryEntity, tolerance: &Tolerance) -> Vec<Curve2D> {
    let s = pt(&entity.start_point);
    let e = pt(&entity.end_point);
    let c = pt(&entity.center_point);
    let tiny = |len: f64| tolerance.is_zero_length(len);

    match entity.kind {
        GeometryType::Line => {
            if tiny((e - s).norm()) {
                warn!(id = %entity.id, "skipping zero-length line");
                return Vec::new();
            }
            vec![Curve2D::Line(Line2D::new(s, e))]
        }
        GeometryType::Circle => {
            if entity.radius <= tolerance.distance {
                warn!(id = %entity.id, radius = entity.radius, "skipping circle without radius");
                return Vec::new();
            }
            vec![Curve2D::Circle(Circle2D::new(c, entity.radius))]
        }
        GeometryType::Arc => {
            let sweep = entity.end_angle - entity.start_angle;
            if entity.radius <= tolerance.distance || tiny(sweep.abs()) {
                warn!(id = %entity.id, "skipping degenerate arc");
                return Vec::new();
            }
            vec![Curve2D::Arc(Arc2D::new(
                c,
                entity.radius,
                entity.start_angle.to_radians(),
                entity.end_angle.to_radians(),
            ))]
        }
        GeometryType::Rectangle => {
            if tiny(entity.width.abs()) || tiny(entity.height.abs()) {
                warn!(id = %entity.id, "skipping rectangle without area");
                return Vec::new();
            }
            let corners = [
                s,
                Point2::new(s.x + entity.width, s.y),
                Point2::new(s.x + entity.width, s.y + entity.height),
                Point2::new(s.x, s.y + entity.height),
            ];
            (0..4)
                .map(|i| Curve2D::Line(Line2D::new(corners[i], corners[(i + 1) % 4])))
                .collect()
        }
        GeometryType::Polygon | GeometryType::Spline => {
            if tiny((e - s).norm()) {
                warn!(id = %entity.id, kind = ?entity.kind, "skipping polyline with coincident ends");
                return Vec::new();
            }
            vec![Curve2D::Spline(Spline2D::new(vec![s, e]))]
        }
        GeometryType::Ellipse => {
            warn!(id = %entity.id, "skipping ellipse, only its end points are known");
            Vec::new()
        }
        GeometryType::Point | GeometryType::Text => Vec::new(),
    }
}

/// All curves of a sketch in entity order, as one wire.
pub fn build(sketch: &Sketch) -> Wire2D {
    build_with(sketch, &Tolerance::default())
}

pub fn build_with(sketch: &Sketch, tolerance: &Tolerance) -> Wire2D {
    let curves: Vec<Curve2D> = sketch
        .geometry
        .iter()
        .flat_map(|g| entity_curves(g, tolerance))
        .collect();
    debug!(sketch = %sketch.name, curves = curves.len(), "built sketch wire");
    Wire2D::from_curves(curves)
}

/// Splits a sketch into connected chains of curves.
///
/// Full circles are wires of their own. Other curves are chained end to
/// start, reversing a curve where that makes it connect; a chain stops
/// growing once it closes or nothing else connects.
pub fn build_wires(sketch: &Sketch) -> Vec<Wire2D> {
    build_wires_with(sketch, &Tolerance::default())
}

pub fn build_wires_with(sketch: &Sketch, tolerance: &Tolerance) -> Vec<Wire2D> {
    chain_curves(build_with(sketch, tolerance).into_curves(), tolerance)
}

/// Groups curves into connected chains.
pub fn chain_curves(curves: Vec<Curve2D>, tolerance: &Tolerance) -> Vec<Wire2D> {
    let meet = |a: &Point2<f64>, b: &Point2<f64>| tolerance.points_equal_2d(a, b);
    let mut wires = Vec::new();
    let mut pending: Vec<Curve2D> = Vec::with_capacity(curves.len());
    for curve in curves {
        if curve.is_periodic() {
            wires.push(Wire2D::from_curves(vec![curve]));
        } else {
            pending.push(curve);
        }
    }

    while !pending.is_empty() {
        let mut chain = vec![pending.remove(0)];
        loop {
            let (Some(head), Some(tail)) = (chain.first(), chain.last()) else {
                break;
            };
            let (start, end) = (head.start_point(), tail.end_point());
            if meet(&start, &end) {
                break;
            }

            if let Some(i) = pending
                .iter()
                .position(|c| meet(&c.start_point(), &end) || meet(&c.end_point(), &end))
            {
                let next = pending.remove(i);
                let next = if meet(&next.start_point(), &end) { next } else { next.reversed() };
                chain.push(next);
            } else if let Some(i) = pending
                .iter()
                .position(|c| meet(&c.end_point(), &start) || meet(&c.start_point(), &start))
            {
                let prev = pending.remove(i);
                let prev = if meet(&prev.end_point(), &start) { prev } else { prev.reversed() };
                chain.insert(0, prev);
            } else {
                break;
            }
        }
        wires.push(Wire2D::from_curves(chain));
    }
    wires
}
