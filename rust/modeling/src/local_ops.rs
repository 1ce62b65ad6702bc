// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fillets and chamfers on straight convex edges between planar faces.
//!
//! Each selected edge gets a tool running along it whose cross-section
//! covers the material to remove: the triangle between the edge and the
//! bevel line for a chamfer, that triangle minus the rounding circle for a
//! fillet. The tools are cut from the solid's tessellation one by one and
//! the result is sewn into a new solid.

use brep_lite_geometry::{boolean_triangles, BooleanOp, Point3, Triangle3, Vector3};
use brep_lite_topology::{EdgeKey, FaceKey, Shape, SolidKey, TopologyArena, DEFAULT_SEGMENTS};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::boolean::{fan_triangles, sew_result};
use crate::error::{Error, Result};

/// Rounds `edges` of `solid` with `radius`.
///
/// An empty edge list returns `solid` itself.
pub fn fillet(arena: &mut TopologyArena, solid: SolidKey, edges: &[EdgeKey], radius: f64) -> Result<SolidKey> {
    apply(arena, solid, edges, radius, Profile::Round, DEFAULT_SEGMENTS)
}

/// Bevels `edges` of `solid`, cutting `distance` back along both faces.
pub fn chamfer(arena: &mut TopologyArena, solid: SolidKey, edges: &[EdgeKey], distance: f64) -> Result<SolidKey> {
    apply(arena, solid, edges, distance, Profile::Bevel, DEFAULT_SEGMENTS)
}

/// [`fillet`] with the solid and the rounding tessellated at `segments`
/// per full turn.
pub fn fillet_with(
    arena: &mut TopologyArena,
    solid: SolidKey,
    edges: &[EdgeKey],
    radius: f64,
    segments: usize,
) -> Result<SolidKey> {
    apply(arena, solid, edges, radius, Profile::Round, segments)
}

pub fn chamfer_with(
    arena: &mut TopologyArena,
    solid: SolidKey,
    edges: &[EdgeKey],
    distance: f64,
    segments: usize,
) -> Result<SolidKey> {
    apply(arena, solid, edges, distance, Profile::Bevel, segments)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    Round,
    Bevel,
}

impl Profile {
    fn name(self) -> &'static str {
        match self {
            Profile::Round => "fillet",
            Profile::Bevel => "chamfer",
        }
    }
}

/// A straight convex edge with its two faces' outward normals and the
/// directions running from the edge into each face.
struct EdgeFrame {
    start: Point3<f64>,
    end: Point3<f64>,
    normals: [Vector3<f64>; 2],
    inward: [Vector3<f64>; 2],
}

fn apply(
    arena: &mut TopologyArena,
    solid: SolidKey,
    edges: &[EdgeKey],
    size: f64,
    profile: Profile,
    segments: usize,
) -> Result<SolidKey> {
    if !size.is_finite() || size <= arena.tolerance().distance {
        return Err(Error::InvalidDimension(format!(
            "{} size must be positive, got {size}",
            profile.name()
        )));
    }
    if edges.is_empty() {
        warn!(op = profile.name(), "no edges selected, solid left unchanged");
        return Ok(solid);
    }

    let faces: FxHashSet<FaceKey> = arena.faces(Shape::Solid(solid)).into_iter().collect();
    let frames = edges
        .iter()
        .map(|&e| edge_frame(arena, &faces, e))
        .collect::<Result<Vec<_>>>()?;

    let mut current = arena.solid_triangles(solid, segments)?;
    let mut polygons = Vec::new();
    for frame in &frames {
        let tool = tool_triangles(frame, size, profile, segments);
        polygons = boolean_triangles(&current, &tool, BooleanOp::Difference);
        current = fan_triangles(&polygons);
    }
    debug!(op = profile.name(), edges = edges.len(), size, polygons = polygons.len(), "applied local operation");
    sew_result(arena, &polygons, BooleanOp::Difference)
}

fn edge_frame(arena: &TopologyArena, faces: &FxHashSet<FaceKey>, edge: EdgeKey) -> Result<EdgeFrame> {
    let unsupported = |why: &str| Error::UnsupportedEdge(format!("{edge:?}: {why}"));
    let data = arena.edge(edge).ok_or_else(|| unsupported("no such edge"))?;
    if !arena.curve(data.curve).is_some_and(|c| c.is_line()) {
        return Err(unsupported("edge is not straight"));
    }
    let start = arena.vertex_point(data.start).ok_or_else(|| unsupported("missing vertex"))?;
    let end = arena.vertex_point(data.end).ok_or_else(|| unsupported("missing vertex"))?;
    let along = (end - start)
        .try_normalize(1e-12)
        .ok_or_else(|| unsupported("edge has no length"))?;

    let adjacent: Vec<FaceKey> = arena
        .edge_faces(edge)
        .into_iter()
        .filter(|f| faces.contains(f))
        .collect();
    let [f1, f2] = adjacent[..] else {
        return Err(unsupported("edge does not join exactly two faces of the solid"));
    };

    let mut normals = [Vector3::zeros(); 2];
    let mut inward = [Vector3::zeros(); 2];
    for (i, face) in [f1, f2].into_iter().enumerate() {
        let normal = arena
            .face_plane_normal(face)
            .ok_or_else(|| unsupported("adjacent face is not planar"))?;
        // Material lies to the left of the boundary seen from outside.
        let forward = arena
            .face_wires(face)
            .into_iter()
            .flat_map(|w| arena.wire_oriented_edges(w))
            .find(|(e, _)| *e == edge)
            .map(|(_, forward)| forward)
            .ok_or_else(|| unsupported("edge missing from face boundary"))?;
        let tangent = if forward { along } else { -along };
        normals[i] = normal;
        inward[i] = normal.cross(&tangent);
    }

    if inward[1].dot(&normals[0]) >= -arena.tolerance().angular {
        return Err(unsupported("edge is concave or flat"));
    }
    Ok(EdgeFrame {
        start,
        end,
        normals,
        inward,
    })
}

/// Past each end of the edge the tool reaches this fraction of `size`, so
/// its caps never coincide with the end faces.
const END_OVERSHOOT: f64 = 1e-3;

/// Closed, outward-wound prism along the edge covering the material to
/// remove, overshooting the outer corner by `size`.
///
/// The cross-section is swept straight along the edge and stops just past
/// its ends. Where an edge ends at a concave corner the cut therefore
/// finishes square against the neighbouring material instead of running
/// around it.
fn tool_triangles(frame: &EdgeFrame, size: f64, profile: Profile, segments: usize) -> Vec<Triangle3> {
    let [n1, n2] = frame.normals;
    let [d1, d2] = frame.inward;
    let along = frame.end - frame.start;
    let axis = along.normalize();
    let reach = size * END_OVERSHOOT;
    let base = frame.start - axis * reach;
    let length = along.norm() + 2.0 * reach;

    let apex = base - (d1 + d2) * size;
    let mut outline = Vec::new();
    match profile {
        Profile::Bevel => {
            outline.push(base + d1 * size);
            outline.push(base + d2 * size);
        }
        Profile::Round => {
            // Centre at depth `size` below both faces; the arc runs between
            // the two tangent points on the side facing the edge.
            let offset = -size / (1.0 + n1.dot(&n2));
            let center = base + (n1 + n2) * offset;
            let across = (n2 - n1 * n1.dot(&n2)).normalize();
            let sweep = n1.dot(&n2).clamp(-1.0, 1.0).acos();
            let steps = ((sweep / std::f64::consts::TAU * segments as f64).ceil() as usize).max(2);
            for i in 0..=steps {
                let t = sweep * i as f64 / steps as f64;
                outline.push(center + (n1 * t.cos() + across * t.sin()) * size);
            }
        }
    }

    let ring: Vec<Point3<f64>> = std::iter::once(apex).chain(outline).collect();
    let top: Vec<Point3<f64>> = ring.iter().map(|p| p + axis * length).collect();
    let n = ring.len();
    let mut triangles = Vec::with_capacity(4 * n);
    for i in 1..n - 1 {
        triangles.push([ring[0], ring[i + 1], ring[i]]);
        triangles.push([top[0], top[i], top[i + 1]]);
    }
    for i in 0..n {
        let j = (i + 1) % n;
        triangles.push([ring[i], ring[j], top[j]]);
        triangles.push([ring[i], top[j], top[i]]);
    }

    let volume: f64 = triangles
        .iter()
        .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
        .sum();
    if volume < 0.0 {
        for t in &mut triangles {
            t.swap(1, 2);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_builder::build_planar_face;
    use crate::solid_builder::{box_solid, cylinder, prism};
    use approx::assert_relative_eq;
    use brep_lite_geometry::{Curve2D, Line2D, Point2, Wire2D};
    use std::f64::consts::PI;

    /// The box edge along Z at x = 2, y = 2.
    fn vertical_edge(arena: &TopologyArena, solid: SolidKey) -> EdgeKey {
        arena
            .edges(Shape::Solid(solid))
            .into_iter()
            .find(|&e| {
                let (a, b) = arena.edge_vertices(e).unwrap();
                let (pa, pb) = (arena.vertex_point(a).unwrap(), arena.vertex_point(b).unwrap());
                pa.x == 2.0 && pa.y == 2.0 && pb.x == 2.0 && pb.y == 2.0
            })
            .unwrap()
    }

    #[test]
    fn chamfer_removes_a_prism() {
        let mut arena = TopologyArena::new();
        let block = box_solid(&mut arena, 2.0, 2.0, 2.0).unwrap();
        let edge = vertical_edge(&arena, block);
        let result = chamfer(&mut arena, block, &[edge], 0.5).unwrap();
        assert_relative_eq!(arena.solid_volume(result).unwrap(), 8.0 - 0.25, epsilon = 1e-6);
        assert_eq!(arena.solid_contains(result, &Point3::new(1.95, 1.95, 1.0)), Some(false));
        assert_eq!(arena.solid_contains(result, &Point3::new(1.5, 1.5, 1.0)), Some(true));
    }

    #[test]
    fn fillet_removes_the_corner_outside_the_circle() {
        let mut arena = TopologyArena::new();
        let block = box_solid(&mut arena, 2.0, 2.0, 2.0).unwrap();
        let edge = vertical_edge(&arena, block);
        let result = fillet_with(&mut arena, block, &[edge], 0.5, 128).unwrap();
        let removed = 2.0 * 0.25 * (1.0 - PI / 4.0);
        assert_relative_eq!(arena.solid_volume(result).unwrap(), 8.0 - removed, max_relative = 1e-4);
    }

    #[test]
    fn two_edges_are_both_cut() {
        let mut arena = TopologyArena::new();
        let block = box_solid(&mut arena, 2.0, 2.0, 2.0).unwrap();
        let edges = arena.edges(Shape::Solid(block));
        let picked: Vec<EdgeKey> = edges
            .into_iter()
            .filter(|&e| {
                let (a, b) = arena.edge_vertices(e).unwrap();
                let (pa, pb) = (arena.vertex_point(a).unwrap(), arena.vertex_point(b).unwrap());
                pa.z == 2.0 && pb.z == 2.0 && pa.y == pb.y
            })
            .collect();
        assert_eq!(picked.len(), 2);
        let result = chamfer(&mut arena, block, &picked, 0.5).unwrap();
        assert_relative_eq!(arena.solid_volume(result).unwrap(), 8.0 - 0.5, epsilon = 1e-6);
    }

    #[test]
    fn cut_stops_at_a_concave_corner() {
        // L-shaped plate one unit thick; the chamfered top edge along
        // y = 1 runs from the outer end x = 4 into the inner corner x = 1.
        let mut arena = TopologyArena::new();
        let corners = [(0.0, 0.0), (4.0, 0.0), (4.0, 1.0), (1.0, 1.0), (1.0, 4.0), (0.0, 4.0)]
            .map(|(x, y)| Point2::new(x, y));
        let lines = (0..corners.len())
            .map(|i| Curve2D::Line(Line2D::new(corners[i], corners[(i + 1) % corners.len()])))
            .collect();
        let face = build_planar_face(&mut arena, &Wire2D::from_curves(lines), Point3::origin(), Vector3::z()).unwrap();
        let plate = prism(&mut arena, face, Vector3::z(), 1.0).unwrap();
        assert_relative_eq!(arena.solid_volume(plate).unwrap(), 7.0, epsilon = 1e-9);

        let near = |a: f64, b: f64| (a - b).abs() < 1e-9;
        let edge = arena
            .edges(Shape::Solid(plate))
            .into_iter()
            .find(|&e| {
                let (a, b) = arena.edge_vertices(e).unwrap();
                let (pa, pb) = (arena.vertex_point(a).unwrap(), arena.vertex_point(b).unwrap());
                near(pa.y, 1.0) && near(pb.y, 1.0) && near(pa.z, 1.0) && near(pb.z, 1.0)
            })
            .unwrap();

        let result = chamfer(&mut arena, plate, &[edge], 0.5).unwrap();
        assert_relative_eq!(arena.solid_volume(result).unwrap(), 7.0 - 3.0 * 0.125, epsilon = 1e-3);
        assert_eq!(arena.solid_contains(result, &Point3::new(2.0, 0.9, 0.9)), Some(false));
        assert_eq!(arena.solid_contains(result, &Point3::new(0.9, 0.9, 0.9)), Some(true));
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let mut arena = TopologyArena::new();
        let block = box_solid(&mut arena, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(fillet(&mut arena, block, &[], 0.2).unwrap(), block);
    }

    #[test]
    fn rejects_bad_sizes_and_edges() {
        let mut arena = TopologyArena::new();
        let block = box_solid(&mut arena, 2.0, 2.0, 2.0).unwrap();
        let edge = vertical_edge(&arena, block);
        assert!(matches!(chamfer(&mut arena, block, &[edge], 0.0), Err(Error::InvalidDimension(_))));
        assert!(matches!(fillet(&mut arena, block, &[edge], -1.0), Err(Error::InvalidDimension(_))));

        let round = cylinder(&mut arena, 1.0, 1.0).unwrap();
        let circle = arena.edges(Shape::Solid(round))[0];
        assert!(matches!(fillet(&mut arena, round, &[circle], 0.1), Err(Error::UnsupportedEdge(_))));
    }
}
