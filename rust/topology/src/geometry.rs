// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric queries on topology entities.
//!
//! Lengths, normals, tessellation, volumes, bounds and containment. Every
//! query that has to approximate a curve or surface takes a
//! `segments_per_turn` resolution, or uses [`DEFAULT_SEGMENTS`].
//!
//! Planar faces are tessellated by projecting their loops onto the plane
//! and ear-clipping with holes. Curved faces are tessellated over the full
//! parameter rectangle of their surface; builders make sure a curved face's
//! loops cover exactly that patch.

use brep_lite_geometry::triangulation::calculate_polygon_normal;
use brep_lite_geometry::{
    triangulate_polygon, triangulate_polygon_with_holes, Bounds3, Curve3D, Plane, Point2, Point3,
    Surface, Triangle3, Vector3,
};

use crate::arena::TopologyArena;
use crate::error::{Error, Result};
use crate::keys::*;

/// Default number of segments per full turn for curved geometry.
pub const DEFAULT_SEGMENTS: usize = 32;

/// Plane fitted through a closed polygon.
///
/// The normal is Newell's normal (right-hand rule on the point order), the
/// origin is the first point and the parameter bounds are the projected
/// extents of the points.
pub fn polygon_plane(points: &[Point3<f64>]) -> Plane {
    let Some(&origin) = points.first() else {
        return Plane::new(Point3::origin(), Vector3::z());
    };
    let mut plane = Plane::new(origin, calculate_polygon_normal(points));
    let (mut u0, mut u1, mut v0, mut v1) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    for p in points {
        let (u, v) = plane.project(p);
        u0 = u0.min(u);
        u1 = u1.max(u);
        v0 = v0.min(v);
        v1 = v1.max(v);
    }
    plane.set_bounds((u0, u1), (v0, v1));
    plane
}

impl TopologyArena {
    pub fn edge_curve(&self, key: EdgeKey) -> Option<&Curve3D> {
        self.edges.get(key).and_then(|e| self.curves.get(e.curve))
    }

    pub fn face_surface(&self, key: FaceKey) -> Option<&Surface> {
        self.faces.get(key).and_then(|f| self.surfaces.get(f.surface))
    }

    /// Point on the edge's curve at curve parameter `t`.
    pub fn edge_point_at(&self, key: EdgeKey, t: f64) -> Option<Point3<f64>> {
        self.edge_curve(key).map(|c| c.point_at(t))
    }

    /// Arc length of the edge's curve range.
    pub fn edge_length(&self, key: EdgeKey) -> Option<f64> {
        let edge = self.edges.get(key)?;
        let curve = self.curves.get(edge.curve)?;
        Some(curve.length_between(edge.t0, edge.t1))
    }

    /// Points along an edge in the requested direction, both ends included.
    pub fn sample_edge(&self, key: EdgeKey, forward: bool, segments: usize) -> Vec<Point3<f64>> {
        let Some(edge) = self.edges.get(key) else {
            return Vec::new();
        };
        let Some(curve) = self.curves.get(edge.curve) else {
            return Vec::new();
        };
        let mut points = curve.sample(edge.t0, edge.t1, segments);
        if !forward {
            points.reverse();
        }
        points
    }

    /// Polygon approximating a wire, without repeating the closing point.
    ///
    /// Coincident consecutive samples are collapsed.
    pub fn sample_wire(&self, key: WireKey, segments: usize) -> Vec<Point3<f64>> {
        let mut points: Vec<Point3<f64>> = Vec::new();
        for (edge, forward) in self.wire_oriented_edges(key) {
            for p in self.sample_edge(edge, forward, segments) {
                if points.last().is_some_and(|last| self.tolerance.points_equal(last, &p)) {
                    continue;
                }
                points.push(p);
            }
        }
        while points.len() > 1 {
            match (points.first(), points.last()) {
                (Some(first), Some(last)) if self.tolerance.points_equal(first, last) => {
                    points.pop();
                }
                _ => break,
            }
        }
        points
    }

    /// Outward unit normal of a face at surface parameters `(u, v)`.
    pub fn face_normal_at(&self, key: FaceKey, u: f64, v: f64) -> Option<Vector3<f64>> {
        self.face_surface(key).map(|s| s.normal_at(u, v))
    }

    /// Outward normal of a planar face; `None` for curved faces.
    pub fn face_plane_normal(&self, key: FaceKey) -> Option<Vector3<f64>> {
        self.face_surface(key)?.as_plane().map(|p| p.normal())
    }

    /// Triangles covering a face, wound counter-clockwise around its
    /// outward normal.
    pub fn tessellate_face(&self, key: FaceKey, segments: usize) -> Result<Vec<Triangle3>> {
        let face = self.faces.get(key).ok_or(Error::FaceNotFound(key))?;
        let surface = self
            .surfaces
            .get(face.surface)
            .ok_or(Error::SurfaceNotFound(face.surface))?;

        match surface {
            Surface::Plane(plane) => self.tessellate_planar(key, plane, segments),
            _ => Ok(tessellate_patch(surface, segments)),
        }
    }

    fn tessellate_planar(&self, key: FaceKey, plane: &Plane, segments: usize) -> Result<Vec<Triangle3>> {
        let mut loops = self
            .face_wires(key)
            .into_iter()
            .map(|w| self.sample_wire(w, segments));
        let outer = loops.next().unwrap_or_default();
        if outer.len() < 3 {
            return Err(Error::DegenerateFace(format!(
                "outer loop has {} distinct points",
                outer.len()
            )));
        }
        let holes: Vec<Vec<Point3<f64>>> = loops.filter(|h| h.len() >= 3).collect();

        let project = |pts: &[Point3<f64>]| -> Vec<Point2<f64>> {
            pts.iter()
                .map(|p| {
                    let (u, v) = plane.project(p);
                    Point2::new(u, v)
                })
                .collect()
        };
        let outer_2d = project(&outer);
        let indices = if holes.is_empty() {
            triangulate_polygon(&outer_2d)?
        } else {
            let holes_2d: Vec<Vec<Point2<f64>>> = holes.iter().map(|h| project(h)).collect();
            triangulate_polygon_with_holes(&outer_2d, &holes_2d)?
        };

        let all: Vec<Point3<f64>> = outer.into_iter().chain(holes.into_iter().flatten()).collect();
        let normal = plane.normal();
        let mut triangles = Vec::with_capacity(indices.len() / 3);
        for chunk in indices.chunks_exact(3) {
            let (a, b, c) = (all[chunk[0]], all[chunk[1]], all[chunk[2]]);
            if (b - a).cross(&(c - a)).dot(&normal) < 0.0 {
                triangles.push([a, c, b]);
            } else {
                triangles.push([a, b, c]);
            }
        }
        Ok(triangles)
    }

    /// Triangles of every face of every shell of a solid.
    pub fn solid_triangles(&self, key: SolidKey, segments: usize) -> Result<Vec<Triangle3>> {
        if !self.solids.contains_key(key) {
            return Err(Error::SolidNotFound(key));
        }
        let mut triangles = Vec::new();
        for face in self.faces(Shape::Solid(key)) {
            triangles.extend(self.tessellate_face(face, segments)?);
        }
        Ok(triangles)
    }

    /// Signed volume by the divergence theorem; positive for outward faces.
    pub fn solid_signed_volume(&self, key: SolidKey, segments: usize) -> Result<f64> {
        let triangles = self.solid_triangles(key, segments)?;
        Ok(triangles
            .iter()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum())
    }

    /// Enclosed volume, tessellated at [`DEFAULT_SEGMENTS`].
    pub fn solid_volume(&self, key: SolidKey) -> Result<f64> {
        self.solid_volume_with(key, DEFAULT_SEGMENTS)
    }

    /// Outer shell volume minus the volume of every cavity. Each shell is
    /// measured by magnitude, so the result does not depend on how the
    /// cavity shells are wound.
    pub fn solid_volume_with(&self, key: SolidKey, segments: usize) -> Result<f64> {
        let solid = self.solids.get(key).ok_or(Error::SolidNotFound(key))?;
        let mut volume = self.shell_signed_volume(solid.outer_shell, segments)?.abs();
        for &cavity in &solid.inner_shells {
            volume -= self.shell_signed_volume(cavity, segments)?.abs();
        }
        Ok(volume)
    }

    /// Signed volume enclosed by one shell.
    pub fn shell_signed_volume(&self, key: ShellKey, segments: usize) -> Result<f64> {
        if !self.shells.contains_key(key) {
            return Err(Error::ShellNotFound(key));
        }
        let mut volume = 0.0;
        for face in self.faces(Shape::Shell(key)) {
            for [a, b, c] in self.tessellate_face(face, segments)? {
                volume += a.coords.dot(&b.coords.cross(&c.coords)) / 6.0;
            }
        }
        Ok(volume)
    }

    /// Surface area of a face from its tessellation.
    pub fn face_area(&self, key: FaceKey) -> Option<f64> {
        let triangles = self.tessellate_face(key, DEFAULT_SEGMENTS).ok()?;
        Some(
            triangles
                .iter()
                .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
                .sum(),
        )
    }

    /// Axis-aligned bounds of a shape.
    ///
    /// Edge curves contribute their exact extents; curved faces add their
    /// tessellation vertices, which catch bulges no edge passes through.
    /// Returns the zero box for a shape with no geometry.
    pub fn shape_bounds(&self, shape: Shape) -> Bounds3 {
        let mut bounds: Option<Bounds3> = None;
        let mut grow = |b: Bounds3| {
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        };

        if let Shape::Vertex(v) = shape {
            if let Some(p) = self.vertex_point(v) {
                grow(Bounds3::from_point(p));
            }
        }
        for edge in self.edges(shape) {
            if let (Some(data), Some(curve)) = (self.edges.get(edge), self.edge_curve(edge)) {
                grow(curve.bounds_between(data.t0, data.t1));
            }
        }
        for face in self.faces(shape) {
            match self.face_surface(face) {
                Some(surface) if !surface.is_planar() => {
                    let pts = tessellate_patch(surface, DEFAULT_SEGMENTS).into_iter().flatten();
                    if let Some(b) = Bounds3::from_points(pts) {
                        grow(b);
                    }
                }
                _ => {}
            }
        }
        bounds.unwrap_or_else(Bounds3::zero)
    }

    pub fn solid_bounds(&self, key: SolidKey) -> Bounds3 {
        self.shape_bounds(Shape::Solid(key))
    }

    /// Point-in-solid test by ray parity over the solid's tessellation.
    ///
    /// The ray direction is slightly perturbed off the coordinate axes so it
    /// does not graze triangle edges of axis-aligned solids.
    pub fn solid_contains(&self, key: SolidKey, point: &Point3<f64>) -> Option<bool> {
        let triangles = self.solid_triangles(key, DEFAULT_SEGMENTS).ok()?;
        let dir = Vector3::new(1.0, 1e-7, 1e-8);
        let crossings = triangles
            .iter()
            .filter(|[a, b, c]| ray_intersects_triangle(point, &dir, a, b, c))
            .count();
        Some(crossings % 2 == 1)
    }
}

/// Triangulates the full parameter rectangle of a curved surface.
///
/// Each triangle is wound to agree with the surface normal at the centre of
/// its grid cell. Collapsed triangles (at poles or on a revolution axis) are
/// dropped.
pub fn tessellate_patch(surface: &Surface, segments: usize) -> Vec<Triangle3> {
    let (nu, nv) = surface.grid_resolution(segments);
    let (u0, u1) = surface.u_bounds();
    let (v0, v1) = surface.v_bounds();
    let u_at = |i: usize| u0 + (u1 - u0) * i as f64 / nu as f64;
    let v_at = |j: usize| v0 + (v1 - v0) * j as f64 / nv as f64;

    let mut triangles = Vec::with_capacity(nu * nv * 2);
    for i in 0..nu {
        for j in 0..nv {
            let p00 = surface.point_at(u_at(i), v_at(j));
            let p10 = surface.point_at(u_at(i + 1), v_at(j));
            let p11 = surface.point_at(u_at(i + 1), v_at(j + 1));
            let p01 = surface.point_at(u_at(i), v_at(j + 1));
            let n = surface.normal_at(
                0.5 * (u_at(i) + u_at(i + 1)),
                0.5 * (v_at(j) + v_at(j + 1)),
            );
            for [a, b, c] in [[p00, p10, p11], [p00, p11, p01]] {
                let cross = (b - a).cross(&(c - a));
                if cross.norm() < 1e-14 {
                    continue;
                }
                if cross.dot(&n) < 0.0 {
                    triangles.push([a, c, b]);
                } else {
                    triangles.push([a, b, c]);
                }
            }
        }
    }
    triangles
}

/// Möller–Trumbore ray-triangle intersection test.
///
/// Casts a ray from `origin` along `dir` and tests if it hits the
/// triangle (v0, v1, v2) strictly in front of the origin.
pub fn ray_intersects_triangle(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> bool {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < 1e-12 {
        return false; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    let t = f * edge2.dot(&q);
    t > 1e-12
}
