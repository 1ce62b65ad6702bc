// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for topology entities.
//!
//! Each entity is created through the arena, which checks that referenced
//! sub-entities exist, validates the geometric invariants (edge endpoints on
//! the curve, connected wires, closed face boundaries) and maintains the
//! upward adjacency index.

use brep_lite_geometry::{Curve3D, Point3, Surface};

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;

impl TopologyArena {
    pub fn add_curve(&mut self, curve: Curve3D) -> CurveKey {
        self.curves.insert(curve)
    }

    pub fn add_surface(&mut self, surface: Surface) -> SurfaceKey {
        self.surfaces.insert(surface)
    }

    /// Creates an edge over `[t0, t1]` of an arena curve.
    ///
    /// Fails if a key is missing or if the curve does not pass through the
    /// vertices at the range ends.
    pub fn add_edge(
        &mut self,
        curve: CurveKey,
        t0: f64,
        t1: f64,
        start: VertexKey,
        end: VertexKey,
    ) -> Result<EdgeKey> {
        let c = self.curves.get(curve).ok_or(Error::CurveNotFound(curve))?;
        let p_start = self.vertex_point(start).ok_or(Error::VertexNotFound(start))?;
        let p_end = self.vertex_point(end).ok_or(Error::VertexNotFound(end))?;

        let gap = (c.point_at(t0) - p_start)
            .norm()
            .max((c.point_at(t1) - p_end).norm());
        if gap > self.tolerance.distance {
            return Err(Error::EdgeEndpointMismatch(gap));
        }

        let key = self.edges.insert(EdgeData {
            curve,
            t0,
            t1,
            start,
            end,
        });
        self.link_vertex_edge(start, key);
        self.link_vertex_edge(end, key);
        Ok(key)
    }

    /// Creates a straight edge between two existing vertices.
    pub fn add_line_edge(&mut self, start: VertexKey, end: VertexKey) -> Result<EdgeKey> {
        let a = self.vertex_point(start).ok_or(Error::VertexNotFound(start))?;
        let b = self.vertex_point(end).ok_or(Error::VertexNotFound(end))?;
        let curve = self.add_curve(Curve3D::line(a, b));
        self.add_edge(curve, 0.0, 1.0, start, end)
    }

    /// Creates an edge spanning the whole domain of a new curve.
    pub fn add_curve_edge(
        &mut self,
        curve: Curve3D,
        start: VertexKey,
        end: VertexKey,
    ) -> Result<EdgeKey> {
        let (t0, t1) = curve.domain();
        let key = self.add_curve(curve);
        self.add_edge(key, t0, t1, start, end)
    }

    /// `true` if the two vertices are the same entity or coincide within
    /// tolerance.
    pub(crate) fn vertices_meet(&self, a: VertexKey, b: VertexKey) -> bool {
        if a == b {
            return true;
        }
        match (self.vertex_point(a), self.vertex_point(b)) {
            (Some(pa), Some(pb)) => self.tolerance.points_equal(&pa, &pb),
            _ => false,
        }
    }

    /// Oriented `(start, end)` vertices of an edge.
    pub(crate) fn oriented_ends(&self, edge: &EdgeData, forward: bool) -> (VertexKey, VertexKey) {
        if forward {
            (edge.start, edge.end)
        } else {
            (edge.end, edge.start)
        }
    }

    /// Creates a wire from an ordered list of edges, inferring orientations.
    ///
    /// The first edge's direction is chosen so it connects to the second;
    /// every later edge is flipped as needed to continue the chain. Vertices
    /// connect when they are the same key or coincide within tolerance.
    ///
    /// Closed edges make the inference ambiguous (both ends touch the same
    /// vertex); use [`TopologyArena::add_wire_with_orientations`] for those.
    pub fn add_wire(&mut self, edge_keys: &[EdgeKey]) -> Result<WireKey> {
        if edge_keys.is_empty() {
            return Err(Error::EmptyWire);
        }
        for &ek in edge_keys {
            if !self.edges.contains_key(ek) {
                return Err(Error::EdgeNotFound(ek));
            }
        }

        let mut orientations = Vec::with_capacity(edge_keys.len());
        if edge_keys.len() == 1 {
            orientations.push(true);
        } else {
            let first = &self.edges[edge_keys[0]];
            let second = &self.edges[edge_keys[1]];
            if self.vertices_meet(first.end, second.start) || self.vertices_meet(first.end, second.end) {
                orientations.push(true);
            } else if self.vertices_meet(first.start, second.start)
                || self.vertices_meet(first.start, second.end)
            {
                orientations.push(false);
            } else {
                return Err(Error::DisconnectedWire(0, 1));
            }

            for i in 1..edge_keys.len() {
                let prev = &self.edges[edge_keys[i - 1]];
                let curr = &self.edges[edge_keys[i]];
                let (_, prev_end) = self.oriented_ends(prev, orientations[i - 1]);
                if self.vertices_meet(prev_end, curr.start) {
                    orientations.push(true);
                } else if self.vertices_meet(prev_end, curr.end) {
                    orientations.push(false);
                } else {
                    return Err(Error::DisconnectedWire(i - 1, i));
                }
            }
        }

        Ok(self.insert_wire(edge_keys, orientations))
    }

    /// Creates a wire with explicit per-edge orientations, checking that the
    /// oriented chain is connected.
    pub fn add_wire_with_orientations(
        &mut self,
        edge_keys: &[EdgeKey],
        orientations: &[bool],
    ) -> Result<WireKey> {
        if edge_keys.is_empty() {
            return Err(Error::EmptyWire);
        }
        if edge_keys.len() != orientations.len() {
            return Err(Error::OrientationCount {
                edges: edge_keys.len(),
                orientations: orientations.len(),
            });
        }
        for &ek in edge_keys {
            if !self.edges.contains_key(ek) {
                return Err(Error::EdgeNotFound(ek));
            }
        }
        for i in 1..edge_keys.len() {
            let (_, prev_end) = self.oriented_ends(&self.edges[edge_keys[i - 1]], orientations[i - 1]);
            let (curr_start, _) = self.oriented_ends(&self.edges[edge_keys[i]], orientations[i]);
            if !self.vertices_meet(prev_end, curr_start) {
                return Err(Error::DisconnectedWire(i - 1, i));
            }
        }

        Ok(self.insert_wire(edge_keys, orientations.to_vec()))
    }

    fn insert_wire(&mut self, edge_keys: &[EdgeKey], orientations: Vec<bool>) -> WireKey {
        let key = self.wires.insert(WireData {
            edges: edge_keys.to_vec(),
            orientations,
        });
        for &ek in edge_keys {
            self.link_edge_wire(ek, key);
        }
        key
    }

    /// Wraps a wire as a face boundary loop.
    pub fn add_loop(&mut self, wire: WireKey, kind: LoopKind) -> Result<LoopKey> {
        if !self.wires.contains_key(wire) {
            return Err(Error::WireNotFound(wire));
        }
        let key = self.loops.insert(LoopData { wire, kind });
        self.link_wire_loop(wire, key);
        Ok(key)
    }

    /// Creates a face on `surface` bounded by a closed outer wire.
    pub fn add_face(&mut self, surface: SurfaceKey, outer_wire: WireKey) -> Result<FaceKey> {
        self.add_face_with_holes(surface, outer_wire, &[])
    }

    /// Creates a face with an outer boundary and hole boundaries.
    pub fn add_face_with_holes(
        &mut self,
        surface: SurfaceKey,
        outer_wire: WireKey,
        inner_wires: &[WireKey],
    ) -> Result<FaceKey> {
        if !self.surfaces.contains_key(surface) {
            return Err(Error::SurfaceNotFound(surface));
        }
        for &w in std::iter::once(&outer_wire).chain(inner_wires) {
            if !self.wires.contains_key(w) {
                return Err(Error::WireNotFound(w));
            }
            if !self.wire_is_closed(w) {
                return Err(Error::OpenWire);
            }
        }

        let outer_loop = self.add_loop(outer_wire, LoopKind::Outer)?;
        let inner_loops = inner_wires
            .iter()
            .map(|&w| self.add_loop(w, LoopKind::Inner))
            .collect::<Result<Vec<_>>>()?;

        let key = self.faces.insert(FaceData {
            surface,
            outer_loop,
            inner_loops: inner_loops.clone(),
        });
        self.link_loop_face(outer_loop, key);
        for lp in inner_loops {
            self.link_loop_face(lp, key);
        }
        Ok(key)
    }

    /// Creates a shell from a list of faces. Watertightness is not checked.
    pub fn add_shell(&mut self, face_keys: &[FaceKey]) -> Result<ShellKey> {
        if face_keys.is_empty() {
            return Err(Error::EmptyShell);
        }
        for &fk in face_keys {
            if !self.faces.contains_key(fk) {
                return Err(Error::FaceNotFound(fk));
            }
        }

        let key = self.shells.insert(ShellData {
            faces: face_keys.to_vec(),
        });
        for &fk in face_keys {
            self.link_face_shell(fk, key);
        }
        Ok(key)
    }

    pub fn add_solid(&mut self, outer_shell: ShellKey) -> Result<SolidKey> {
        self.add_solid_with_voids(outer_shell, &[])
    }

    /// Creates a solid from an outer shell and cavity shells.
    pub fn add_solid_with_voids(
        &mut self,
        outer_shell: ShellKey,
        inner_shells: &[ShellKey],
    ) -> Result<SolidKey> {
        for &s in std::iter::once(&outer_shell).chain(inner_shells) {
            if !self.shells.contains_key(s) {
                return Err(Error::ShellNotFound(s));
            }
        }

        let key = self.solids.insert(SolidData {
            outer_shell,
            inner_shells: inner_shells.to_vec(),
        });
        self.link_shell_solid(outer_shell, key);
        for &s in inner_shells {
            self.link_shell_solid(s, key);
        }
        Ok(key)
    }

    /// Creates a solid whose outer shell is made of `faces`.
    pub fn add_solid_from_faces(&mut self, faces: &[FaceKey]) -> Result<SolidKey> {
        let shell = self.add_shell(faces)?;
        self.add_solid(shell)
    }
}

/// Builds a closed planar polygon face through existing vertices.
///
/// Consecutive vertices are joined by straight edges, the last back to the
/// first, and the plane is fitted with Newell's normal. Returns the face and
/// its edges in boundary order.
pub fn make_polygon_face(
    arena: &mut TopologyArena,
    vertices: &[VertexKey],
) -> Result<(FaceKey, Vec<EdgeKey>)> {
    if vertices.len() < 3 {
        return Err(Error::DegenerateFace(format!(
            "polygon needs at least 3 vertices, got {}",
            vertices.len()
        )));
    }
    let points = vertices
        .iter()
        .map(|&v| arena.vertex_point(v).ok_or(Error::VertexNotFound(v)))
        .collect::<Result<Vec<Point3<f64>>>>()?;

    let mut edges = Vec::with_capacity(vertices.len());
    for i in 0..vertices.len() {
        edges.push(arena.add_line_edge(vertices[i], vertices[(i + 1) % vertices.len()])?);
    }
    let orientations = vec![true; edges.len()];
    let wire = arena.add_wire_with_orientations(&edges, &orientations)?;
    let surface = arena.add_surface(Surface::Plane(crate::geometry::polygon_plane(&points)));
    let face = arena.add_face(surface, wire)?;
    Ok((face, edges))
}
