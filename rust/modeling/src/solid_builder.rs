// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive and swept solids.
//!
//! Every builder creates new entities in the arena and leaves its inputs
//! untouched. Solids come out with shared vertices and edges and faces
//! oriented outwards, so volume, containment and closure checks work on
//! them directly.

use std::f64::consts::{PI, TAU};

use brep_lite_geometry::triangulation::calculate_polygon_normal;
use brep_lite_geometry::{
    Circle3D, Curve3D, Cylinder, Plane, Point3, Revolution, Sphere, Surface, Transform3, Vector3,
};
use brep_lite_topology::{
    polygon_plane, EdgeKey, FaceKey, SolidKey, TopologyArena, VertexKey, WireKey, DEFAULT_SEGMENTS,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result};

type OrientedEdges = Vec<(EdgeKey, bool)>;

fn check_positive(arena: &TopologyArena, what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= arena.tolerance().distance {
        return Err(Error::InvalidDimension(format!("{what} must be positive, got {value}")));
    }
    Ok(())
}

/// Straight edges keyed by their unordered vertex pair.
#[derive(Default)]
struct LineEdges(FxHashMap<(VertexKey, VertexKey), EdgeKey>);

impl LineEdges {
    /// The edge joining `a` and `b`, and whether it runs from `a` to `b`.
    fn between(&mut self, arena: &mut TopologyArena, a: VertexKey, b: VertexKey) -> Result<(EdgeKey, bool)> {
        let canonical = if a < b { (a, b) } else { (b, a) };
        let edge = match self.0.get(&canonical) {
            Some(&edge) => edge,
            None => {
                let edge = arena.add_line_edge(canonical.0, canonical.1)?;
                self.0.insert(canonical, edge);
                edge
            }
        };
        Ok((edge, canonical.0 == a))
    }

    fn polygon_face(&mut self, arena: &mut TopologyArena, corners: &[VertexKey]) -> Result<FaceKey> {
        let mut edges = Vec::with_capacity(corners.len());
        let mut orientations = Vec::with_capacity(corners.len());
        for i in 0..corners.len() {
            let (edge, forward) = self.between(arena, corners[i], corners[(i + 1) % corners.len()])?;
            edges.push(edge);
            orientations.push(forward);
        }
        let points = corners
            .iter()
            .map(|&v| arena.vertex_point(v).ok_or(brep_lite_topology::Error::VertexNotFound(v)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let wire = arena.add_wire_with_orientations(&edges, &orientations)?;
        let surface = arena.add_surface(Surface::Plane(polygon_plane(&points)));
        Ok(arena.add_face(surface, wire)?)
    }
}

/// Axis-aligned box with one corner at the origin, spanning `width` along X,
/// `height` along Y and `depth` along Z.
pub fn box_solid(arena: &mut TopologyArena, width: f64, height: f64, depth: f64) -> Result<SolidKey> {
    check_positive(arena, "box width", width)?;
    check_positive(arena, "box height", height)?;
    check_positive(arena, "box depth", depth)?;

    let v: Vec<VertexKey> = [
        (0.0, 0.0, 0.0),
        (width, 0.0, 0.0),
        (width, height, 0.0),
        (0.0, height, 0.0),
        (0.0, 0.0, depth),
        (width, 0.0, depth),
        (width, height, depth),
        (0.0, height, depth),
    ]
    .into_iter()
    .map(|(x, y, z)| arena.add_vertex(Point3::new(x, y, z)))
    .collect();

    // Corners listed counter-clockwise seen from outside.
    let quads = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    let mut edges = LineEdges::default();
    let mut faces = Vec::with_capacity(6);
    for quad in quads {
        let corners = quad.map(|i| v[i]);
        faces.push(edges.polygon_face(arena, &corners)?);
    }
    let solid = arena.add_solid_from_faces(&faces)?;
    debug!(width, height, depth, "built box");
    Ok(solid)
}

/// Cylinder of `radius` standing on the XY plane, axis +Z.
///
/// Three faces: bottom cap, top cap and the mantle. The mantle's boundary is
/// the bottom circle, the seam up, the top circle backwards and the seam down.
pub fn cylinder(arena: &mut TopologyArena, radius: f64, height: f64) -> Result<SolidKey> {
    check_positive(arena, "cylinder radius", radius)?;
    check_positive(arena, "cylinder height", height)?;

    let origin = Point3::origin();
    let top_center = Point3::new(0.0, 0.0, height);
    let (x, y) = (Vector3::x(), Vector3::y());

    let v_bottom = arena.add_vertex(Point3::new(radius, 0.0, 0.0));
    let v_top = arena.add_vertex(Point3::new(radius, 0.0, height));
    let bottom = arena.add_curve_edge(
        Curve3D::Circle(Circle3D::with_frame(origin, x, y, radius)),
        v_bottom,
        v_bottom,
    )?;
    let top = arena.add_curve_edge(
        Curve3D::Circle(Circle3D::with_frame(top_center, x, y, radius)),
        v_top,
        v_top,
    )?;
    let seam = arena.add_line_edge(v_bottom, v_top)?;

    let mut bottom_plane = Plane::from_axes(origin, x, -y);
    bottom_plane.set_bounds((-radius, radius), (-radius, radius));
    let bottom_wire = arena.add_wire_with_orientations(&[bottom], &[false])?;
    let bottom_surface = arena.add_surface(Surface::Plane(bottom_plane));
    let bottom_face = arena.add_face(bottom_surface, bottom_wire)?;

    let mut top_plane = Plane::from_axes(top_center, x, y);
    top_plane.set_bounds((-radius, radius), (-radius, radius));
    let top_wire = arena.add_wire_with_orientations(&[top], &[true])?;
    let top_surface = arena.add_surface(Surface::Plane(top_plane));
    let top_face = arena.add_face(top_surface, top_wire)?;

    let mut mantle = Cylinder::from_frame(origin, x, y, radius);
    mantle.set_height(height);
    let mantle_wire =
        arena.add_wire_with_orientations(&[bottom, seam, top, seam], &[true, true, false, false])?;
    let mantle_surface = arena.add_surface(Surface::Cylinder(mantle));
    let mantle_face = arena.add_face(mantle_surface, mantle_wire)?;

    let solid = arena.add_solid_from_faces(&[bottom_face, top_face, mantle_face])?;
    debug!(radius, height, "built cylinder");
    Ok(solid)
}

/// Sphere of `radius` centred at the origin.
///
/// One face on the sphere surface, bounded by a seam loop: the meridian from
/// the north to the south pole, forwards and back.
pub fn sphere(arena: &mut TopologyArena, radius: f64) -> Result<SolidKey> {
    check_positive(arena, "sphere radius", radius)?;

    let origin = Point3::origin();
    let north = arena.add_vertex(Point3::new(0.0, 0.0, radius));
    let south = arena.add_vertex(Point3::new(0.0, 0.0, -radius));
    let meridian = arena.add_curve(Curve3D::Circle(Circle3D::with_frame(
        origin,
        Vector3::z(),
        Vector3::x(),
        radius,
    )));
    let seam = arena.add_edge(meridian, 0.0, PI, north, south)?;
    let wire = arena.add_wire_with_orientations(&[seam, seam], &[true, false])?;
    let surface = arena.add_surface(Surface::Sphere(Sphere::new(origin, radius)));
    let face = arena.add_face(surface, wire)?;
    let solid = arena.add_solid_from_faces(&[face])?;
    debug!(radius, "built sphere");
    Ok(solid)
}

/// Plane and boundary wires (outer first) of a planar face.
fn planar_profile(arena: &TopologyArena, face: FaceKey) -> Result<(Plane, Vec<OrientedEdges>)> {
    let surface = arena
        .face_surface(face)
        .ok_or(brep_lite_topology::Error::FaceNotFound(face))?;
    let plane = surface.as_plane().ok_or(Error::NonPlanarProfile)?.clone();
    let loops = arena
        .face_wires(face)
        .into_iter()
        .map(|w| arena.wire_oriented_edges(w))
        .collect();
    Ok((plane, loops))
}

fn moved_plane(plane: &Plane, transform: &Transform3) -> Plane {
    Plane {
        origin: transform.apply_point(&plane.origin),
        x_axis: transform.apply_vector(&plane.x_axis),
        y_axis: transform.apply_vector(&plane.y_axis),
        u_range: plane.u_range,
        v_range: plane.v_range,
    }
}

/// Planar face bounded by existing edges; `reverse` flips both the loops
/// and the plane so the face points the other way.
fn cap_face(arena: &mut TopologyArena, plane: &Plane, loops: &[OrientedEdges], reverse: bool) -> Result<FaceKey> {
    let mut wires: Vec<WireKey> = Vec::with_capacity(loops.len());
    for oriented in loops {
        let (mut edges, mut orientations): (Vec<EdgeKey>, Vec<bool>) = oriented.iter().copied().unzip();
        if reverse {
            edges.reverse();
            orientations.reverse();
            orientations.iter_mut().for_each(|o| *o = !*o);
        }
        wires.push(arena.add_wire_with_orientations(&edges, &orientations)?);
    }
    let surface = if reverse { plane.flipped() } else { plane.clone() };
    let surface = arena.add_surface(Surface::Plane(surface));
    let (outer, holes) = wires.split_first().ok_or(Error::EmptyWire)?;
    Ok(arena.add_face_with_holes(surface, *outer, holes)?)
}

/// Images of profile vertices and edges under a rigid motion, created once
/// and shared between the faces that use them.
struct Images {
    transform: Transform3,
    vertices: FxHashMap<VertexKey, VertexKey>,
    edges: FxHashMap<EdgeKey, EdgeKey>,
}

impl Images {
    fn new(transform: Transform3) -> Self {
        Self {
            transform,
            vertices: FxHashMap::default(),
            edges: FxHashMap::default(),
        }
    }

    fn vertex(&mut self, arena: &mut TopologyArena, v: VertexKey) -> Result<VertexKey> {
        if let Some(&image) = self.vertices.get(&v) {
            return Ok(image);
        }
        let p = arena.vertex_point(v).ok_or(brep_lite_topology::Error::VertexNotFound(v))?;
        let image = arena.add_vertex(self.transform.apply_point(&p));
        self.vertices.insert(v, image);
        Ok(image)
    }

    fn edge(&mut self, arena: &mut TopologyArena, e: EdgeKey) -> Result<EdgeKey> {
        if let Some(&image) = self.edges.get(&e) {
            return Ok(image);
        }
        let data = arena.edge(e).ok_or(brep_lite_topology::Error::EdgeNotFound(e))?.clone();
        let curve = arena
            .curve(data.curve)
            .ok_or(brep_lite_topology::Error::CurveNotFound(data.curve))?
            .transformed(&self.transform);
        let start = self.vertex(arena, data.start)?;
        let end = self.vertex(arena, data.end)?;
        let key = arena.add_curve(curve);
        let image = arena.add_edge(key, data.t0, data.t1, start, end)?;
        self.edges.insert(e, image);
        Ok(image)
    }

    fn oriented(&mut self, arena: &mut TopologyArena, loops: &[OrientedEdges]) -> Result<Vec<OrientedEdges>> {
        loops
            .iter()
            .map(|l| l.iter().map(|&(e, o)| Ok((self.edge(arena, e)?, o))).collect())
            .collect()
    }
}

/// Side faces of a linear sweep, with the bookkeeping the caps need.
struct Sweep {
    plane: Plane,
    loops: Vec<OrientedEdges>,
    offset: Vector3<f64>,
    /// The sweep runs against the profile normal.
    against_normal: bool,
    top: Images,
    rails: FxHashMap<VertexKey, EdgeKey>,
    sides: Vec<FaceKey>,
}

impl Sweep {
    fn run(arena: &mut TopologyArena, face: FaceKey, direction: Vector3<f64>, length: f64) -> Result<Sweep> {
        check_positive(arena, "extrusion length", length)?;
        let unit = direction
            .try_normalize(1e-12)
            .ok_or_else(|| Error::InvalidDimension("extrusion direction has zero length".into()))?;
        let (plane, loops) = planar_profile(arena, face)?;
        let along = unit.dot(&plane.normal());
        if along.abs() <= arena.tolerance().angular {
            return Err(Error::InvalidDimension(
                "extrusion direction lies in the profile plane".into(),
            ));
        }
        let offset = unit * length;
        let mut sweep = Sweep {
            plane,
            loops,
            offset,
            against_normal: along < 0.0,
            top: Images::new(Transform3::from_translation(offset)),
            rails: FxHashMap::default(),
            sides: Vec::new(),
        };
        let profile = sweep.loops.clone();
        for (edge, forward) in profile.into_iter().flatten() {
            let side = sweep.side_face(arena, edge, forward)?;
            sweep.sides.push(side);
        }
        Ok(sweep)
    }

    fn rail(&mut self, arena: &mut TopologyArena, v: VertexKey) -> Result<EdgeKey> {
        if let Some(&rail) = self.rails.get(&v) {
            return Ok(rail);
        }
        let top = self.top.vertex(arena, v)?;
        let rail = arena.add_line_edge(v, top)?;
        self.rails.insert(v, rail);
        Ok(rail)
    }

    fn side_face(&mut self, arena: &mut TopologyArena, edge: EdgeKey, forward: bool) -> Result<FaceKey> {
        let data = arena.edge(edge).ok_or(brep_lite_topology::Error::EdgeNotFound(edge))?.clone();
        let curve = arena
            .curve(data.curve)
            .ok_or(brep_lite_topology::Error::CurveNotFound(data.curve))?
            .clone();
        let (a, b) = if forward { (data.start, data.end) } else { (data.end, data.start) };
        let top = self.top.edge(arena, edge)?;
        let rail_a = self.rail(arena, a)?;
        let rail_b = self.rail(arena, b)?;

        let (edges, orientations) = if self.against_normal {
            ([rail_a, top, rail_b, edge], [true, forward, false, !forward])
        } else {
            ([edge, rail_b, top, rail_a], [forward, true, !forward, false])
        };
        let wire = arena.add_wire_with_orientations(&edges, &orientations)?;

        let surface = match &curve {
            Curve3D::Line(_) => {
                let pa = arena.vertex_point(a).ok_or(brep_lite_topology::Error::VertexNotFound(a))?;
                let pb = arena.vertex_point(b).ok_or(brep_lite_topology::Error::VertexNotFound(b))?;
                let mut quad = vec![pa, pb, pb + self.offset, pa + self.offset];
                if self.against_normal {
                    quad.reverse();
                }
                Surface::Plane(polygon_plane(&quad))
            }
            Curve3D::Circle(c) => {
                let axis = c.normal();
                if !arena.tolerance().vectors_parallel(&axis, &self.offset) {
                    return Err(Error::UnsupportedEdge(
                        "circular edge swept off its axis".into(),
                    ));
                }
                let mut mantle = Cylinder::from_frame(c.center, c.x_axis, c.y_axis, c.radius);
                mantle.u_range = (data.t0.min(data.t1), data.t0.max(data.t1));
                let length = self.offset.norm();
                if self.offset.dot(&axis) > 0.0 {
                    mantle.set_v_range(0.0, length);
                } else {
                    mantle.set_v_range(-length, 0.0);
                }
                // Outwards is the in-plane direction tangent × normal, which
                // is radial when the loop runs with the circle about the
                // profile normal.
                let with_circle = forward == (axis.dot(&self.plane.normal()) > 0.0);
                mantle.reversed = !with_circle;
                Surface::Cylinder(mantle)
            }
        };
        let surface = arena.add_surface(surface);
        Ok(arena.add_face(surface, wire)?)
    }
}

/// Sweeps every boundary edge of a planar face along `direction`.
///
/// The result has one side face per boundary edge and no caps: it is an
/// open shell. Straight edges give planar quads; circular edges must be
/// swept along their axis and give cylinder patches. Use [`prism`] for a
/// closed solid.
pub fn extrude(
    arena: &mut TopologyArena,
    face: FaceKey,
    direction: Vector3<f64>,
    length: f64,
) -> Result<SolidKey> {
    let sweep = Sweep::run(arena, face, direction, length)?;
    debug!(sides = sweep.sides.len(), length, "extruded face");
    Ok(arena.add_solid_from_faces(&sweep.sides)?)
}

/// Closed extrusion: the [`extrude`] side faces plus bottom and top caps.
///
/// Faces come out as bottom cap, top cap, then the sides in boundary order.
pub fn prism(
    arena: &mut TopologyArena,
    face: FaceKey,
    direction: Vector3<f64>,
    length: f64,
) -> Result<SolidKey> {
    let mut sweep = Sweep::run(arena, face, direction, length)?;
    let bottom = cap_face(arena, &sweep.plane, &sweep.loops, !sweep.against_normal)?;
    let top_loops = sweep.top.oriented(arena, &sweep.loops)?;
    let top_plane = moved_plane(&sweep.plane, &sweep.top.transform);
    let top = cap_face(arena, &top_plane, &top_loops, sweep.against_normal)?;

    let mut faces = vec![bottom, top];
    faces.append(&mut sweep.sides);
    debug!(faces = faces.len(), length, "built prism");
    Ok(arena.add_solid_from_faces(&faces)?)
}

/// Revolves a planar face by `angle_deg` degrees about the axis through
/// `axis_origin` along `axis`.
///
/// Every profile edge off the axis sweeps a surface of revolution; every
/// profile vertex off the axis sweeps a circular edge. Below a full turn
/// the profile and its rotated copy cap the ends.
///
/// The axis must lie in the profile plane with the whole profile on one
/// side of it ([`Error::InvalidRevolveAxis`]), and the angle must lie in
/// `(0, 360]` ([`Error::InvalidDimension`]).
pub fn revolve(
    arena: &mut TopologyArena,
    face: FaceKey,
    axis_origin: Point3<f64>,
    axis: Vector3<f64>,
    angle_deg: f64,
) -> Result<SolidKey> {
    if !(angle_deg > 0.0 && angle_deg <= 360.0) {
        return Err(Error::InvalidDimension(format!(
            "revolve angle must be in (0, 360] degrees, got {angle_deg}"
        )));
    }
    let tolerance = *arena.tolerance();
    let axis = axis
        .try_normalize(1e-12)
        .ok_or_else(|| Error::InvalidRevolveAxis("axis has zero length".into()))?;
    let (plane, loops) = planar_profile(arena, face)?;
    let normal = plane.normal();
    if axis.dot(&normal).abs() > tolerance.angular {
        return Err(Error::InvalidRevolveAxis("axis is not in the profile plane".into()));
    }
    if plane.signed_distance(&axis_origin).abs() > tolerance.distance {
        return Err(Error::InvalidRevolveAxis("axis is off the profile plane".into()));
    }

    let across = axis.cross(&normal);
    let (lo, hi) = arena
        .face_wires(face)
        .into_iter()
        .flat_map(|w| arena.sample_wire(w, DEFAULT_SEGMENTS))
        .map(|p| (p - axis_origin).dot(&across))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
    if lo < -tolerance.distance && hi > tolerance.distance {
        return Err(Error::InvalidRevolveAxis("profile crosses the axis".into()));
    }
    if lo.abs().max(hi.abs()) <= tolerance.distance {
        return Err(Error::InvalidRevolveAxis("profile lies on the axis".into()));
    }
    // The sweep direction at the profile is -side × normal; faces built
    // from the profile's winding point inwards when it agrees with it.
    let negative_side = hi <= tolerance.distance;

    let full = (angle_deg - 360.0).abs() <= tolerance.angular;
    let angle = if full { TAU } else { angle_deg.to_radians() };
    let rotation = Transform3::rotation_about(&axis_origin, &axis, angle);
    let on_axis = |p: &Point3<f64>| {
        let d = p - axis_origin;
        (d - axis * d.dot(&axis)).norm() <= tolerance.distance
    };

    let mut revolver = Revolver {
        axis_origin,
        axis,
        angle,
        full,
        on_axis: FxHashMap::default(),
        images: Images::new(rotation),
        circles: FxHashMap::default(),
    };
    for (edge, _) in loops.iter().flatten() {
        let data = arena.edge(*edge).ok_or(brep_lite_topology::Error::EdgeNotFound(*edge))?.clone();
        for v in [data.start, data.end] {
            let p = arena.vertex_point(v).ok_or(brep_lite_topology::Error::VertexNotFound(v))?;
            revolver.on_axis.insert(v, on_axis(&p));
        }
    }
    // Points on the axis are their own images.
    for (&v, &fixed) in &revolver.on_axis {
        if fixed || full {
            revolver.images.vertices.insert(v, v);
        }
    }

    let mut faces = Vec::new();
    for &(edge, forward) in loops.iter().flatten() {
        if let Some(face) = revolver.side_face(arena, edge, forward, negative_side)? {
            faces.push(face);
        }
    }
    if !full {
        let start = cap_face(arena, &plane, &loops, negative_side)?;
        let end_loops = revolver.rotated_loops(arena, &loops)?;
        let end = cap_face(arena, &moved_plane(&plane, &rotation), &end_loops, !negative_side)?;
        faces.insert(0, end);
        faces.insert(0, start);
    }
    if faces.is_empty() {
        return Err(Error::InvalidRevolveAxis("profile lies on the axis".into()));
    }
    debug!(faces = faces.len(), angle_deg, "revolved face");
    Ok(arena.add_solid_from_faces(&faces)?)
}

struct Revolver {
    axis_origin: Point3<f64>,
    axis: Vector3<f64>,
    angle: f64,
    full: bool,
    on_axis: FxHashMap<VertexKey, bool>,
    images: Images,
    circles: FxHashMap<VertexKey, EdgeKey>,
}

impl Revolver {
    fn fixed(&self, v: VertexKey) -> bool {
        self.on_axis.get(&v).copied().unwrap_or(false)
    }

    /// Edge traced by a vertex off the axis.
    fn circle(&mut self, arena: &mut TopologyArena, v: VertexKey) -> Result<EdgeKey> {
        if let Some(&edge) = self.circles.get(&v) {
            return Ok(edge);
        }
        let p = arena.vertex_point(v).ok_or(brep_lite_topology::Error::VertexNotFound(v))?;
        let center = self.axis_origin + self.axis * (p - self.axis_origin).dot(&self.axis);
        let radial = p - center;
        let radius = radial.norm();
        let x_axis = radial / radius;
        let y_axis = self.axis.cross(&x_axis);
        let curve = arena.add_curve(Curve3D::Circle(Circle3D::with_frame(center, x_axis, y_axis, radius)));
        let image = self.images.vertex(arena, v)?;
        let edge = arena.add_edge(curve, 0.0, self.angle, v, image)?;
        self.circles.insert(v, edge);
        Ok(edge)
    }

    fn rotated_edge(&mut self, arena: &mut TopologyArena, edge: EdgeKey) -> Result<EdgeKey> {
        if self.full {
            return Ok(edge);
        }
        let data = arena.edge(edge).ok_or(brep_lite_topology::Error::EdgeNotFound(edge))?;
        let on_axis = self.fixed(data.start) && self.fixed(data.end);
        let straight = arena.curve(data.curve).is_some_and(|c| c.is_line());
        if on_axis && straight {
            return Ok(edge);
        }
        self.images.edge(arena, edge)
    }

    fn rotated_loops(&mut self, arena: &mut TopologyArena, loops: &[OrientedEdges]) -> Result<Vec<OrientedEdges>> {
        loops
            .iter()
            .map(|l| l.iter().map(|&(e, o)| Ok((self.rotated_edge(arena, e)?, o))).collect())
            .collect()
    }

    fn side_face(
        &mut self,
        arena: &mut TopologyArena,
        edge: EdgeKey,
        forward: bool,
        inward: bool,
    ) -> Result<Option<FaceKey>> {
        let data = arena.edge(edge).ok_or(brep_lite_topology::Error::EdgeNotFound(edge))?.clone();
        let curve = arena
            .curve(data.curve)
            .ok_or(brep_lite_topology::Error::CurveNotFound(data.curve))?
            .clone();
        let (a, b) = if forward { (data.start, data.end) } else { (data.end, data.start) };
        if curve.is_line() && self.fixed(a) && self.fixed(b) {
            return Ok(None);
        }

        let mut edges = vec![edge];
        let mut orientations = vec![forward];
        if !self.fixed(b) {
            edges.push(self.circle(arena, b)?);
            orientations.push(true);
        }
        edges.push(self.rotated_edge(arena, edge)?);
        orientations.push(!forward);
        if !self.fixed(a) {
            edges.push(self.circle(arena, a)?);
            orientations.push(false);
        }
        let wire = arena.add_wire_with_orientations(&edges, &orientations)?;

        let t_range = if forward { (data.t0, data.t1) } else { (data.t1, data.t0) };
        let surface = arena.add_surface(Surface::Revolution(Revolution {
            origin: self.axis_origin,
            axis: self.axis,
            profile: curve,
            t_range,
            angle: self.angle,
            reversed: inward,
        }));
        Ok(Some(arena.add_face(surface, wire)?))
    }
}

/// Ruled loft through closed section wires, capped at both ends.
pub fn loft(arena: &mut TopologyArena, sections: &[WireKey]) -> Result<SolidKey> {
    loft_with(arena, sections, DEFAULT_SEGMENTS)
}

/// [`loft`] with curved section edges sampled at `segments` per full turn.
///
/// Sections must be closed wires with the same number of edges, and
/// corresponding edges must sample to the same number of points. Side
/// quads that are not flat are split into two triangles.
pub fn loft_with(arena: &mut TopologyArena, sections: &[WireKey], segments: usize) -> Result<SolidKey> {
    if sections.len() < 2 {
        return Err(Error::LoftMismatch(format!(
            "need at least two sections, got {}",
            sections.len()
        )));
    }
    let tolerance = *arena.tolerance();

    let mut rings: Vec<Vec<Point3<f64>>> = Vec::with_capacity(sections.len());
    let mut layout: Option<Vec<usize>> = None;
    for &section in sections {
        if !arena.wire_is_closed(section) {
            return Err(Error::OpenProfile("loft section is not closed".into()));
        }
        let edges = arena.wire_oriented_edges(section);
        if edges.is_empty() {
            return Err(Error::EmptyWire);
        }
        let mut ring = Vec::new();
        let mut counts = Vec::with_capacity(edges.len());
        for (edge, forward) in edges {
            let samples = arena.sample_edge(edge, forward, segments);
            counts.push(samples.len());
            ring.extend_from_slice(&samples[..samples.len().saturating_sub(1)]);
        }
        match &layout {
            Some(expected) if expected.len() != counts.len() => {
                return Err(Error::LoftMismatch(format!(
                    "sections have {} and {} edges",
                    expected.len(),
                    counts.len()
                )));
            }
            Some(expected) if *expected != counts => {
                return Err(Error::LoftMismatch("corresponding edges differ in kind".into()));
            }
            Some(_) => {}
            None => layout = Some(counts),
        }
        rings.push(ring);
    }

    let centroid = |ring: &[Point3<f64>]| {
        ring.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / ring.len().max(1) as f64
    };
    let (first, last) = match (rings.first(), rings.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::EmptyWire),
    };
    let direction = centroid(last) - centroid(first);
    if direction.norm() <= tolerance.distance {
        return Err(Error::LoftMismatch("sections do not advance".into()));
    }
    // Wind every ring counter-clockwise about the loft direction, keeping
    // its first point first so corresponding points stay aligned.
    for ring in &mut rings {
        if calculate_polygon_normal(ring).dot(&direction) < 0.0 {
            ring[1..].reverse();
        }
    }

    let mut polygons: Vec<Vec<Point3<f64>>> = Vec::new();
    if let Some(bottom) = rings.first() {
        let mut cap = bottom.clone();
        cap[1..].reverse();
        polygons.push(cap);
    }
    if let Some(top) = rings.last() {
        polygons.push(top.clone());
    }
    for pair in rings.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        let n = lower.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let (a, b, c, d) = (lower[i], lower[j], upper[j], upper[i]);
            let normal = (b - a).cross(&(c - a));
            let flat = normal
                .try_normalize(1e-12)
                .map_or(true, |unit| (d - a).dot(&unit).abs() <= tolerance.distance);
            if flat {
                polygons.push(vec![a, b, c, d]);
            } else {
                polygons.push(vec![a, b, c]);
                polygons.push(vec![a, c, d]);
            }
        }
    }

    let solid = arena.add_solid_by_sewing(&polygons, tolerance.distance)?;
    debug!(sections = sections.len(), polygons = polygons.len(), "lofted sections");
    Ok(solid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_builder::build_planar_face;
    use approx::assert_relative_eq;
    use brep_lite_geometry::{Arc2D, Circle2D, Curve2D, Line2D, Point2, Wire2D};
    use brep_lite_topology::Shape;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2};

    fn outer_shell_closed(arena: &TopologyArena, solid: SolidKey) -> bool {
        arena
            .solid(solid)
            .is_some_and(|s| arena.shell_is_closed(s.outer_shell))
    }

    fn rectangle_face(arena: &mut TopologyArena, x0: f64, y0: f64, w: f64, h: f64) -> FaceKey {
        let c = [
            Point2::new(x0, y0),
            Point2::new(x0 + w, y0),
            Point2::new(x0 + w, y0 + h),
            Point2::new(x0, y0 + h),
        ];
        let curves = (0..4)
            .map(|i| Curve2D::Line(Line2D::new(c[i], c[(i + 1) % 4])))
            .collect();
        build_planar_face(arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap()
    }

    fn disc_face(arena: &mut TopologyArena, r: f64) -> FaceKey {
        let wire = Wire2D::from_curves(vec![Curve2D::Circle(Circle2D::new(Point2::origin(), r))]);
        build_planar_face(arena, &wire, Point3::origin(), Vector3::z()).unwrap()
    }

    #[test]
    fn box_topology_and_volume() {
        let mut arena = TopologyArena::new();
        let solid = box_solid(&mut arena, 2.0, 3.0, 4.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 6);
        assert_eq!(arena.edges(Shape::Solid(solid)).len(), 12);
        assert_eq!(arena.vertices(Shape::Solid(solid)).len(), 8);
        assert!(outer_shell_closed(&arena, solid));
        assert_relative_eq!(arena.solid_volume(solid).unwrap(), 24.0, epsilon = 1e-9);
        assert!(arena.solid_signed_volume(solid, 8).unwrap() > 0.0);
        assert_relative_eq!(arena.solid_bounds(solid).max, Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn box_rejects_non_positive_sizes() {
        let mut arena = TopologyArena::new();
        assert!(matches!(box_solid(&mut arena, 0.0, 1.0, 1.0), Err(Error::InvalidDimension(_))));
        assert!(matches!(box_solid(&mut arena, 1.0, f64::NAN, 1.0), Err(Error::InvalidDimension(_))));
    }

    #[test]
    fn cylinder_has_three_faces() {
        let mut arena = TopologyArena::new();
        let solid = cylinder(&mut arena, 2.0, 5.0).unwrap();
        let faces = arena.faces(Shape::Solid(solid));
        assert_eq!(faces.len(), 3);
        assert_eq!(arena.wire_oriented_edges(arena.face_outer_wire(faces[2]).unwrap()).len(), 4);
        assert_eq!(arena.edges(Shape::Solid(solid)).len(), 3);
        assert!(outer_shell_closed(&arena, solid));
        let volume = arena.solid_volume_with(solid, 128).unwrap();
        assert_relative_eq!(volume, PI * 4.0 * 5.0, max_relative = 2e-3);
        let b = arena.solid_bounds(solid);
        assert_relative_eq!(b.min, Point3::new(-2.0, -2.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(b.max, Point3::new(2.0, 2.0, 5.0), epsilon = 1e-9);
    }

    #[test]
    fn sphere_is_one_traversable_face() {
        let mut arena = TopologyArena::new();
        let solid = sphere(&mut arena, 1.5).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 1);
        assert_eq!(arena.edges(Shape::Solid(solid)).len(), 1);
        assert!(outer_shell_closed(&arena, solid));
        let volume = arena.solid_volume_with(solid, 128).unwrap();
        assert_relative_eq!(volume, 4.0 / 3.0 * PI * 1.5_f64.powi(3), max_relative = 5e-3);
        assert_eq!(arena.solid_contains(solid, &Point3::new(0.2, 0.1, 0.3)), Some(true));
        assert_eq!(arena.solid_contains(solid, &Point3::new(2.0, 0.0, 0.0)), Some(false));
    }

    #[test]
    fn extrude_makes_one_side_per_edge() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, 0.0, 0.0, 2.0, 1.0);
        let solid = extrude(&mut arena, face, Vector3::z(), 3.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 4);
        assert!(!outer_shell_closed(&arena, solid));
        let shell = arena.solid(solid).unwrap().outer_shell;
        assert_eq!(arena.shell_boundary_edges(shell).len(), 8);
    }

    #[test]
    fn prism_of_rectangle_is_closed_box() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, 0.0, 0.0, 2.0, 1.0);
        let solid = prism(&mut arena, face, Vector3::z(), 3.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 6);
        assert_eq!(arena.edges(Shape::Solid(solid)).len(), 12);
        assert!(outer_shell_closed(&arena, solid));
        assert_relative_eq!(arena.solid_signed_volume(solid, 8).unwrap(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn prism_against_normal_is_still_outward() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, 0.0, 0.0, 1.0, 1.0);
        let solid = prism(&mut arena, face, -Vector3::z(), 2.0).unwrap();
        assert_relative_eq!(arena.solid_signed_volume(solid, 8).unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(arena.solid_bounds(solid).min.z, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn prism_of_disc_is_a_cylinder() {
        let mut arena = TopologyArena::new();
        let face = disc_face(&mut arena, 1.0);
        let solid = prism(&mut arena, face, Vector3::z(), 2.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 3);
        assert!(outer_shell_closed(&arena, solid));
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, 2.0 * PI, max_relative = 2e-3);
    }

    #[test]
    fn prism_keeps_holes() {
        let mut arena = TopologyArena::new();
        let c = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)].map(|(x, y)| Point2::new(x, y));
        let mut curves: Vec<Curve2D> = (0..4)
            .map(|i| Curve2D::Line(Line2D::new(c[i], c[(i + 1) % 4])))
            .collect();
        curves.push(Curve2D::Circle(Circle2D::new(Point2::new(2.0, 2.0), 1.0)));
        let face = build_planar_face(&mut arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap();
        let solid = prism(&mut arena, face, Vector3::z(), 1.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 7);
        assert!(outer_shell_closed(&arena, solid));
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, 16.0 - PI, max_relative = 2e-3);
        assert_eq!(arena.solid_contains(solid, &Point3::new(2.0, 2.0, 0.5)), Some(false));
        assert_eq!(arena.solid_contains(solid, &Point3::new(0.5, 0.5, 0.5)), Some(true));
    }

    fn arc_prism(arena: &mut TopologyArena, curves: Vec<Curve2D>, height: f64, faces: usize) -> SolidKey {
        let face = build_planar_face(arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap();
        let solid = prism(arena, face, Vector3::z(), height).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), faces);
        assert!(outer_shell_closed(arena, solid));
        solid
    }

    #[test]
    fn prism_of_counter_clockwise_half_disc() {
        let mut arena = TopologyArena::new();
        let curves = vec![
            Curve2D::Line(Line2D::new(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0))),
            Curve2D::Arc(Arc2D::new(Point2::origin(), 1.0, 0.0, PI)),
        ];
        let solid = arc_prism(&mut arena, curves, 2.0, 4);
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, PI, max_relative = 2e-3);
        assert_eq!(arena.solid_contains(solid, &Point3::new(0.0, 0.9, 1.0)), Some(true));
        assert_eq!(arena.solid_contains(solid, &Point3::new(0.0, -0.1, 1.0)), Some(false));
    }

    #[test]
    fn prism_of_clockwise_half_disc() {
        let mut arena = TopologyArena::new();
        let curves = vec![
            Curve2D::Arc(Arc2D::new(Point2::origin(), 1.0, PI, 0.0)),
            Curve2D::Line(Line2D::new(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0))),
        ];
        let solid = arc_prism(&mut arena, curves, 2.0, 4);
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, PI, max_relative = 2e-3);
        assert_relative_eq!(arena.solid_bounds(solid).max.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn prism_with_concave_arc() {
        let mut arena = TopologyArena::new();
        // A 2x2 square whose top side dips down along an arc centred above it.
        let c = [(2.0, 2.0), (0.0, 0.0), (2.0, 0.0)].map(|(x, y)| Point2::new(x, y));
        let curves = vec![
            Curve2D::Line(Line2D::new(Point2::new(0.0, 2.0), c[1])),
            Curve2D::Line(Line2D::new(c[1], c[2])),
            Curve2D::Line(Line2D::new(c[2], c[0])),
            Curve2D::Arc(Arc2D::new(Point2::new(1.0, 3.0), SQRT_2, -FRAC_PI_4, -3.0 * FRAC_PI_4)),
        ];
        let solid = arc_prism(&mut arena, curves, 1.0, 6);
        let segment = FRAC_PI_2 - 1.0;
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, 4.0 - segment, max_relative = 1e-3);
        assert_eq!(arena.solid_contains(solid, &Point3::new(1.0, 1.8, 0.5)), Some(false));
        assert_eq!(arena.solid_contains(solid, &Point3::new(1.0, 1.4, 0.5)), Some(true));
    }

    #[test]
    fn extrude_rejects_in_plane_direction() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, 0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            extrude(&mut arena, face, Vector3::x(), 1.0),
            Err(Error::InvalidDimension(_))
        ));
        assert!(matches!(
            extrude(&mut arena, face, Vector3::z(), -1.0),
            Err(Error::InvalidDimension(_))
        ));
    }

    #[test]
    fn full_revolve_of_rectangle_is_a_tube() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, 1.0, 0.0, 1.0, 1.0);
        let solid = revolve(&mut arena, face, Point3::origin(), Vector3::y(), 360.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 4);
        assert!(outer_shell_closed(&arena, solid));
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, 3.0 * PI, max_relative = 2e-3);
    }

    #[test]
    fn quarter_revolve_gets_caps() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, 1.0, 0.0, 1.0, 1.0);
        let solid = revolve(&mut arena, face, Point3::origin(), Vector3::y(), 90.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 6);
        assert!(outer_shell_closed(&arena, solid));
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, 3.0 * PI / 4.0, max_relative = 2e-3);
    }

    #[test]
    fn profile_on_negative_side_revolves_outward() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, -2.0, 0.0, 1.0, 1.0);
        let solid = revolve(&mut arena, face, Point3::origin(), Vector3::y(), 360.0).unwrap();
        assert!(arena.solid_signed_volume(solid, 64).unwrap() > 0.0);
    }

    #[test]
    fn half_disc_revolves_into_sphere() {
        let mut arena = TopologyArena::new();
        let curves = vec![
            Curve2D::Arc(Arc2D::new(Point2::origin(), 1.0, -FRAC_PI_2, FRAC_PI_2)),
            Curve2D::Line(Line2D::new(Point2::new(0.0, 1.0), Point2::new(0.0, -1.0))),
        ];
        let face = build_planar_face(&mut arena, &Wire2D::from_curves(curves), Point3::origin(), Vector3::z()).unwrap();
        let solid = revolve(&mut arena, face, Point3::origin(), Vector3::y(), 360.0).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 1);
        assert!(outer_shell_closed(&arena, solid));
        let volume = arena.solid_signed_volume(solid, 128).unwrap();
        assert_relative_eq!(volume, 4.0 / 3.0 * PI, max_relative = 5e-3);
    }

    #[test]
    fn revolve_validates_axis_and_angle() {
        let mut arena = TopologyArena::new();
        let face = rectangle_face(&mut arena, -1.0, 0.0, 2.0, 1.0);
        assert!(matches!(
            revolve(&mut arena, face, Point3::origin(), Vector3::y(), 360.0),
            Err(Error::InvalidRevolveAxis(_))
        ));
        assert!(matches!(
            revolve(&mut arena, face, Point3::origin(), Vector3::z(), 360.0),
            Err(Error::InvalidRevolveAxis(_))
        ));
        assert!(matches!(
            revolve(&mut arena, face, Point3::new(-5.0, 0.0, 0.0), Vector3::y(), 0.0),
            Err(Error::InvalidDimension(_))
        ));
        assert!(matches!(
            revolve(&mut arena, face, Point3::new(-5.0, 0.0, 0.0), Vector3::y(), 400.0),
            Err(Error::InvalidDimension(_))
        ));
    }

    #[test]
    fn loft_between_squares_is_a_box() {
        let mut arena = TopologyArena::new();
        let bottom = rectangle_face(&mut arena, 0.0, 0.0, 1.0, 1.0);
        let bottom_wire = arena.face_outer_wire(bottom).unwrap();
        let sheet = arena.add_solid_from_faces(&[bottom]).unwrap();
        let moved = arena
            .transform_solid(sheet, &Transform3::from_translation(Vector3::new(0.0, 0.0, 2.0)))
            .unwrap();
        let top_face = arena.faces(Shape::Solid(moved))[0];
        let top_wire = arena.face_outer_wire(top_face).unwrap();

        let solid = loft(&mut arena, &[bottom_wire, top_wire]).unwrap();
        assert_eq!(arena.faces(Shape::Solid(solid)).len(), 6);
        assert!(outer_shell_closed(&arena, solid));
        assert_relative_eq!(arena.solid_signed_volume(solid, 8).unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn loft_rejects_mismatched_sections() {
        let mut arena = TopologyArena::new();
        let square = rectangle_face(&mut arena, 0.0, 0.0, 1.0, 1.0);
        let disc = disc_face(&mut arena, 1.0);
        let a = arena.face_outer_wire(square).unwrap();
        let b = arena.face_outer_wire(disc).unwrap();
        assert!(matches!(loft(&mut arena, &[a, b]), Err(Error::LoftMismatch(_))));
        assert!(matches!(loft(&mut arena, &[a]), Err(Error::LoftMismatch(_))));
    }
}
