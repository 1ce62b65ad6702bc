// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar 2D wire → 3D face construction.
//!
//! The sketch plane gets an orthonormal basis `(u, v)` with `u × v` equal to
//! the requested normal, and every 2D curve is carried into 3D faithfully:
//! lines stay lines, circles and arcs become 3D circles (arcs as a parameter
//! sub-range), polylines become one straight edge per segment.
//!
//! The wire's curves are grouped into connected loops. The loop enclosing
//! the largest area bounds the face; the others become holes. Loops are
//! wound so the face normal equals the plane normal: the outer loop
//! counter-clockwise around it, holes clockwise.

use brep_lite_geometry::math::plane_basis;
use brep_lite_geometry::triangulation::signed_area_2d;
use brep_lite_geometry::{
    Circle3D, Curve2D, Curve3D, Plane, Point2, Point3, Surface, Vector3, Wire2D,
};
use brep_lite_topology::{EdgeKey, FaceKey, TopologyArena, VertexKey, WireKey};
use tracing::debug;

use crate::error::{Error, Result};
use crate::sketch::Sketch;
use crate::wire_builder::{self, chain_curves};

/// Samples per full turn used to measure the area enclosed by a loop.
const AREA_SAMPLES: usize = 32;

/// Placement of a sketch plane in space.
#[derive(Debug, Clone, Copy)]
pub struct SketchFrame {
    pub origin: Point3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
}

impl SketchFrame {
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let (u, v) = plane_basis(&normal);
        Self { origin, u, v }
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.u.cross(&self.v)
    }

    pub fn point(&self, p: &Point2<f64>) -> Point3<f64> {
        self.origin + self.u * p.x + self.v * p.y
    }
}

/// Builds a planar face on the plane through `origin` with `normal`.
///
/// Fails with [`Error::EmptyWire`] for an empty wire, [`Error::OpenProfile`]
/// if some curves do not close up into loops, and
/// [`Error::DegenerateFace`] if the outer loop encloses no area.
pub fn build_planar_face(
    arena: &mut TopologyArena,
    wire: &Wire2D,
    origin: Point3<f64>,
    normal: Vector3<f64>,
) -> Result<FaceKey> {
    if wire.is_empty() {
        return Err(Error::EmptyWire);
    }
    let tolerance = *arena.tolerance();
    let chains = chain_curves(wire.curves().to_vec(), &tolerance);
    if let Some(open) = chains.iter().find(|c| !c.is_closed_with(&tolerance)) {
        return Err(Error::OpenProfile(format!(
            "chain of {} curve(s) from {:?} does not close",
            open.len(),
            open.start_point()
        )));
    }

    let mut loops: Vec<(Wire2D, f64)> = chains
        .into_iter()
        .map(|w| {
            let area = signed_area_2d(&sample_loop(&w));
            (w, area)
        })
        .collect();
    let outer_index = loops
        .iter()
        .enumerate()
        .max_by(|a, b| a.1 .1.abs().total_cmp(&b.1 .1.abs()))
        .map(|(i, _)| i)
        .ok_or(Error::EmptyWire)?;
    let (outer, outer_area) = loops.swap_remove(outer_index);
    if outer_area.abs() <= tolerance.distance * tolerance.distance {
        return Err(Error::DegenerateFace("profile encloses no area".into()));
    }

    let frame = SketchFrame::new(origin, normal);
    let outer_wire = build_loop(arena, &frame, &outer, outer_area < 0.0)?;
    let holes = loops
        .iter()
        .map(|(w, area)| build_loop(arena, &frame, w, *area > 0.0))
        .collect::<Result<Vec<_>>>()?;

    let mut plane = Plane::from_axes(origin, frame.u, frame.v);
    let b = outer.bounds();
    plane.set_bounds((b.min.x, b.max.x), (b.min.y, b.max.y));
    let surface = arena.add_surface(Surface::Plane(plane));
    let face = arena.add_face_with_holes(surface, outer_wire, &holes)?;
    debug!(curves = wire.len(), holes = holes.len(), "built planar face");
    Ok(face)
}

/// Builds the face bounded by `sketch`'s geometry on the given plane.
///
/// Fails with [`Error::EmptySketch`] when the sketch has no entity the wire
/// builder can turn into a curve.
pub fn build_sketch_face(
    arena: &mut TopologyArena,
    sketch: &Sketch,
    origin: Point3<f64>,
    normal: Vector3<f64>,
) -> Result<FaceKey> {
    let wire = wire_builder::build_with(sketch, arena.tolerance());
    if wire.is_empty() {
        return Err(Error::EmptySketch(sketch.name.clone()));
    }
    build_planar_face(arena, &wire, origin, normal)
}

/// Polygon through a closed 2D loop, closing point omitted.
fn sample_loop(wire: &Wire2D) -> Vec<Point2<f64>> {
    let mut points = Vec::new();
    for curve in wire.curves() {
        match curve {
            Curve2D::Line(l) => points.push(l.start),
            Curve2D::Spline(s) => {
                let cps = s.control_points();
                points.extend_from_slice(&cps[..cps.len().saturating_sub(1)]);
            }
            Curve2D::Circle(_) | Curve2D::Arc(_) => {
                points.extend((0..AREA_SAMPLES).map(|i| curve.point_at(i as f64 / AREA_SAMPLES as f64)));
            }
        }
    }
    points
}

/// Creates the edges of one closed loop and wires them, reversed if asked.
fn build_loop(
    arena: &mut TopologyArena,
    frame: &SketchFrame,
    wire: &Wire2D,
    reverse: bool,
) -> Result<WireKey> {
    let curves = wire.curves();
    let start = wire.start_point().ok_or(Error::EmptyWire)?;
    let first = arena.add_vertex(frame.point(&start));

    let mut current = first;
    let mut edges = Vec::with_capacity(curves.len());
    for (i, curve) in curves.iter().enumerate() {
        let next = match curves.get(i + 1) {
            Some(c) => arena.add_vertex(frame.point(&c.start_point())),
            None => first,
        };
        edges.extend(curve_edges(arena, frame, curve, current, next)?);
        current = next;
    }

    let orientations = vec![!reverse; edges.len()];
    if reverse {
        edges.reverse();
    }
    Ok(arena.add_wire_with_orientations(&edges, &orientations)?)
}

/// 3D edges for one 2D curve running from vertex `a` to vertex `b`.
fn curve_edges(
    arena: &mut TopologyArena,
    frame: &SketchFrame,
    curve: &Curve2D,
    a: VertexKey,
    b: VertexKey,
) -> Result<Vec<EdgeKey>> {
    match curve {
        Curve2D::Line(_) => Ok(vec![arena.add_line_edge(a, b)?]),
        Curve2D::Circle(c) => {
            let circle = Circle3D::with_frame(frame.point(&c.center), frame.u, frame.v, c.radius);
            Ok(vec![arena.add_curve_edge(Curve3D::Circle(circle), a, b)?])
        }
        Curve2D::Arc(arc) => {
            let center = frame.point(&arc.center);
            // Keep t0 < t1: a clockwise arc is a counter-clockwise one in the
            // mirrored frame.
            let (circle, t0, t1) = if arc.end_angle >= arc.start_angle {
                (
                    Circle3D::with_frame(center, frame.u, frame.v, arc.radius),
                    arc.start_angle,
                    arc.end_angle,
                )
            } else {
                (
                    Circle3D::with_frame(center, frame.u, -frame.v, arc.radius),
                    -arc.start_angle,
                    -arc.end_angle,
                )
            };
            let key = arena.add_curve(Curve3D::Circle(circle));
            Ok(vec![arena.add_edge(key, t0, t1, a, b)?])
        }
        Curve2D::Spline(s) => {
            let tolerance = *arena.tolerance();
            let cps = s.control_points();
            let mut inner: Vec<Point2<f64>> = Vec::new();
            let interior = cps.get(1..cps.len().saturating_sub(1)).unwrap_or(&[]);
            for p in interior {
                let prev = inner.last().copied().or_else(|| cps.first().copied());
                if prev.is_some_and(|q| tolerance.points_equal_2d(&q, p)) {
                    continue;
                }
                inner.push(*p);
            }
            if let (Some(last_inner), Some(end)) = (inner.last(), cps.last()) {
                if tolerance.points_equal_2d(last_inner, end) {
                    inner.pop();
                }
            }

            let mut chain = vec![a];
            for p in &inner {
                chain.push(arena.add_vertex(frame.point(p)));
            }
            chain.push(b);
            chain
                .windows(2)
                .map(|w| arena.add_line_edge(w[0], w[1]).map_err(Error::from))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brep_lite_geometry::{Arc2D, Circle2D, Line2D, Spline2D};
    use brep_lite_topology::Shape;
    use std::f64::consts::PI;

    fn rectangle(w: f64, h: f64) -> Vec<Curve2D> {
        let c = [
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
        ];
        (0..4)
            .map(|i| Curve2D::Line(Line2D::new(c[i], c[(i + 1) % 4])))
            .collect()
    }

    #[test]
    fn rectangle_face_on_xy() {
        let mut arena = TopologyArena::new();
        let wire = Wire2D::from_curves(rectangle(4.0, 2.0));
        let face = build_planar_face(&mut arena, &wire, Point3::origin(), Vector3::z()).unwrap();
        assert_eq!(arena.edges(Shape::Face(face)).len(), 4);
        assert_eq!(arena.vertices(Shape::Face(face)).len(), 4);
        assert_relative_eq!(arena.face_area(face).unwrap(), 8.0, epsilon = 1e-10);
        assert_relative_eq!(arena.face_plane_normal(face).unwrap(), Vector3::z(), epsilon = 1e-12);
        // Sketch coordinates land on world x/y.
        let b = arena.shape_bounds(Shape::Face(face));
        assert_relative_eq!(b.max, Point3::new(4.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn clockwise_profile_is_rewound() {
        let mut arena = TopologyArena::new();
        let curves: Vec<Curve2D> = rectangle(1.0, 1.0).iter().rev().map(|c| c.reversed()).collect();
        let face = build_planar_face(&mut arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap();
        for [a, b, c] in arena.tessellate_face(face, 8).unwrap() {
            assert!((b - a).cross(&(c - a)).z > 0.0);
        }
    }

    #[test]
    fn circle_inside_rectangle_is_a_hole() {
        let mut arena = TopologyArena::new();
        let mut curves = rectangle(10.0, 10.0);
        curves.insert(0, Curve2D::Circle(Circle2D::new(Point2::new(5.0, 5.0), 2.0)));
        let face = build_planar_face(&mut arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap();
        assert_eq!(arena.face(face).unwrap().inner_loops.len(), 1);
        let area = arena.face_area(face).unwrap();
        assert_relative_eq!(area, 100.0 - 4.0 * PI, max_relative = 1e-2);
    }

    #[test]
    fn arc_and_line_make_a_half_disc() {
        let mut arena = TopologyArena::new();
        let curves = vec![
            Curve2D::Arc(Arc2D::new(Point2::origin(), 1.0, 0.0, PI)),
            Curve2D::Line(Line2D::new(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0))),
        ];
        let face = build_planar_face(&mut arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap();
        let edges = arena.edges(Shape::Face(face));
        assert_eq!(edges.len(), 2);
        assert_relative_eq!(arena.edge_length(edges[0]).unwrap(), PI, epsilon = 1e-12);
        assert_relative_eq!(arena.face_area(face).unwrap(), PI / 2.0, max_relative = 1e-2);
    }

    #[test]
    fn spline_expands_to_segments() {
        let mut arena = TopologyArena::new();
        let curves = vec![
            Curve2D::Spline(Spline2D::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 2.0),
            ])),
            Curve2D::Line(Line2D::new(Point2::new(2.0, 2.0), Point2::new(0.0, 0.0))),
        ];
        let face = build_planar_face(&mut arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap();
        assert_eq!(arena.edges(Shape::Face(face)).len(), 3);
        assert_relative_eq!(arena.face_area(face).unwrap(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn tilted_plane_keeps_normal() {
        let mut arena = TopologyArena::new();
        let normal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let face = build_planar_face(
            &mut arena,
            &Wire2D::from_curves(rectangle(1.0, 1.0)),
            Point3::new(0.0, 0.0, 5.0),
            normal,
        )
        .unwrap();
        assert_relative_eq!(arena.face_plane_normal(face).unwrap(), normal, epsilon = 1e-12);
    }

    #[test]
    fn empty_and_open_wires_fail() {
        let mut arena = TopologyArena::new();
        assert!(matches!(
            build_planar_face(&mut arena, &Wire2D::new(), Point3::origin(), Vector3::z()),
            Err(Error::EmptyWire)
        ));
        let open = Wire2D::from_curves(rectangle(1.0, 1.0)[..3].to_vec());
        assert!(matches!(
            build_planar_face(&mut arena, &open, Point3::origin(), Vector3::z()),
            Err(Error::OpenProfile(_))
        ));
    }

    #[test]
    fn sketch_without_curves_is_empty() {
        let mut arena = TopologyArena::new();
        let mut sketch = Sketch::new("marks");
        sketch.add_point(crate::sketch::Point2D::new(1.0, 1.0));
        assert!(matches!(
            build_sketch_face(&mut arena, &sketch, Point3::origin(), Vector3::z()),
            Err(Error::EmptySketch(name)) if name == "marks"
        ));

        sketch.add_rectangle(crate::sketch::Point2D::new(0.0, 0.0), 2.0, 3.0);
        let face = build_sketch_face(&mut arena, &sketch, Point3::origin(), Vector3::z()).unwrap();
        assert_relative_eq!(arena.face_area(face).unwrap(), 6.0, epsilon = 1e-10);
    }
}
