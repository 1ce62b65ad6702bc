// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for B-rep entities.
//!
//! The [`TopologyArena`] owns every vertex, edge, wire, loop, face, shell and
//! solid, together with the curves and surfaces they reference. Entities are
//! addressed by generational keys and never mutated after creation; building
//! a new solid means inserting new entities, which may share existing ones.
//!
//! Vertices and edges are shared by several parents (an edge usually bounds
//! two faces), so the arena keeps upward adjacency indices next to the
//! downward references stored in each entity.

use brep_lite_geometry::{Curve3D, Point3, Surface, Tolerance};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::keys::*;

#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: Point3<f64>,
}

/// An edge is the sub-range `[t0, t1]` of an arena curve.
///
/// The curve evaluated at `t0` coincides with `start`, at `t1` with `end`.
/// A closed edge (full circle) has `start == end`.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub curve: CurveKey,
    pub t0: f64,
    pub t1: f64,
    pub start: VertexKey,
    pub end: VertexKey,
}

/// Data stored for a wire: an ordered chain of connected edges.
#[derive(Debug, Clone)]
pub struct WireData {
    pub edges: Vec<EdgeKey>,
    /// `true` if `edges[i]` is traversed start→end, `false` if reversed.
    pub orientations: Vec<bool>,
}

/// Whether a loop bounds the outside of a face or one of its holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    Outer,
    Inner,
}

#[derive(Debug, Clone)]
pub struct LoopData {
    pub wire: WireKey,
    pub kind: LoopKind,
}

/// A face: one surface, one outer loop, any number of hole loops.
///
/// The outward direction is the surface normal. Outer loops run
/// counter-clockwise around it, hole loops clockwise.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub surface: SurfaceKey,
    pub outer_loop: LoopKey,
    pub inner_loops: Vec<LoopKey>,
}

#[derive(Debug, Clone)]
pub struct ShellData {
    pub faces: Vec<FaceKey>,
}

#[derive(Debug, Clone)]
pub struct SolidData {
    pub outer_shell: ShellKey,
    /// Cavities, with faces oriented away from the material.
    pub inner_shells: Vec<ShellKey>,
}

/// The central arena that owns all geometry and topology plus adjacency
/// indices.
///
/// # Example
///
/// ```
/// use brep_lite_topology::TopologyArena;
/// use brep_lite_geometry::Point3;
///
/// let mut arena = TopologyArena::new();
/// let a = arena.add_vertex(Point3::new(0.0, 0.0, 0.0));
/// let b = arena.add_vertex(Point3::new(1.0, 0.0, 0.0));
/// let edge = arena.add_line_edge(a, b).unwrap();
///
/// assert_eq!(arena.vertex_count(), 2);
/// assert_eq!(arena.edge_length(edge), Some(1.0));
/// ```
#[derive(Debug)]
pub struct TopologyArena {
    pub(crate) tolerance: Tolerance,

    // Geometry storage
    pub(crate) curves: SlotMap<CurveKey, Curve3D>,
    pub(crate) surfaces: SlotMap<SurfaceKey, Surface>,

    // Entity storage
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) wires: SlotMap<WireKey, WireData>,
    pub(crate) loops: SlotMap<LoopKey, LoopData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) shells: SlotMap<ShellKey, ShellData>,
    pub(crate) solids: SlotMap<SolidKey, SolidData>,

    // Upward adjacency: child → parents
    pub(crate) vertex_to_edges: FxHashMap<VertexKey, FxHashSet<EdgeKey>>,
    pub(crate) edge_to_wires: FxHashMap<EdgeKey, FxHashSet<WireKey>>,
    pub(crate) wire_to_loops: FxHashMap<WireKey, FxHashSet<LoopKey>>,
    pub(crate) loop_to_faces: FxHashMap<LoopKey, FxHashSet<FaceKey>>,
    pub(crate) face_to_shells: FxHashMap<FaceKey, FxHashSet<ShellKey>>,
    pub(crate) shell_to_solids: FxHashMap<ShellKey, FxHashSet<SolidKey>>,
}

impl TopologyArena {
    /// Creates an empty arena with the default tolerance.
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default())
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,

            curves: SlotMap::with_key(),
            surfaces: SlotMap::with_key(),

            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            wires: SlotMap::with_key(),
            loops: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            shells: SlotMap::with_key(),
            solids: SlotMap::with_key(),

            vertex_to_edges: FxHashMap::default(),
            edge_to_wires: FxHashMap::default(),
            wire_to_loops: FxHashMap::default(),
            loop_to_faces: FxHashMap::default(),
            face_to_shells: FxHashMap::default(),
            shell_to_solids: FxHashMap::default(),
        }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    // --- Geometry ---

    pub fn curve(&self, key: CurveKey) -> Option<&Curve3D> {
        self.curves.get(key)
    }

    pub fn surface(&self, key: SurfaceKey) -> Option<&Surface> {
        self.surfaces.get(key)
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // --- Vertex operations ---

    /// Adds a vertex at the given position.
    pub fn add_vertex(&mut self, point: Point3<f64>) -> VertexKey {
        self.vertices.insert(VertexData { point })
    }

    pub fn vertex(&self, key: VertexKey) -> Option<&VertexData> {
        self.vertices.get(key)
    }

    pub fn vertex_point(&self, key: VertexKey) -> Option<Point3<f64>> {
        self.vertices.get(key).map(|v| v.point)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Wire operations ---

    pub fn wire(&self, key: WireKey) -> Option<&WireData> {
        self.wires.get(key)
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    // --- Loop operations ---

    pub fn loop_data(&self, key: LoopKey) -> Option<&LoopData> {
        self.loops.get(key)
    }

    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    // --- Face operations ---

    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Shell operations ---

    pub fn shell(&self, key: ShellKey) -> Option<&ShellData> {
        self.shells.get(key)
    }

    pub fn shell_count(&self) -> usize {
        self.shells.len()
    }

    // --- Solid operations ---

    pub fn solid(&self, key: SolidKey) -> Option<&SolidData> {
        self.solids.get(key)
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Returns `true` if the given shape references a live entity.
    pub fn contains(&self, shape: Shape) -> bool {
        match shape {
            Shape::Vertex(k) => self.vertices.contains_key(k),
            Shape::Edge(k) => self.edges.contains_key(k),
            Shape::Wire(k) => self.wires.contains_key(k),
            Shape::Face(k) => self.faces.contains_key(k),
            Shape::Shell(k) => self.shells.contains_key(k),
            Shape::Solid(k) => self.solids.contains_key(k),
        }
    }

    // --- Adjacency index helpers ---

    pub(crate) fn link_vertex_edge(&mut self, vertex: VertexKey, edge: EdgeKey) {
        self.vertex_to_edges.entry(vertex).or_default().insert(edge);
    }

    pub(crate) fn link_edge_wire(&mut self, edge: EdgeKey, wire: WireKey) {
        self.edge_to_wires.entry(edge).or_default().insert(wire);
    }

    pub(crate) fn link_wire_loop(&mut self, wire: WireKey, lp: LoopKey) {
        self.wire_to_loops.entry(wire).or_default().insert(lp);
    }

    pub(crate) fn link_loop_face(&mut self, lp: LoopKey, face: FaceKey) {
        self.loop_to_faces.entry(lp).or_default().insert(face);
    }

    pub(crate) fn link_face_shell(&mut self, face: FaceKey, shell: ShellKey) {
        self.face_to_shells.entry(face).or_default().insert(shell);
    }

    pub(crate) fn link_shell_solid(&mut self, shell: ShellKey, solid: SolidKey) {
        self.shell_to_solids.entry(shell).or_default().insert(solid);
    }
}

impl Default for TopologyArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_is_empty() {
        let arena = TopologyArena::new();
        assert_eq!(arena.vertex_count(), 0);
        assert_eq!(arena.edge_count(), 0);
        assert_eq!(arena.wire_count(), 0);
        assert_eq!(arena.loop_count(), 0);
        assert_eq!(arena.face_count(), 0);
        assert_eq!(arena.shell_count(), 0);
        assert_eq!(arena.solid_count(), 0);
        assert_eq!(arena.curve_count(), 0);
        assert_eq!(arena.surface_count(), 0);
    }

    #[test]
    fn add_and_retrieve_vertex() {
        let mut arena = TopologyArena::new();
        let key = arena.add_vertex(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(arena.vertex_point(key), Some(Point3::new(1.0, 2.0, 3.0)));
        assert!(arena.contains(Shape::Vertex(key)));
    }

    #[test]
    fn custom_tolerance_is_kept() {
        let tol = Tolerance {
            distance: 1e-4,
            ..Tolerance::default()
        };
        let arena = TopologyArena::with_tolerance(tol);
        assert_eq!(arena.tolerance().distance, 1e-4);
    }
}
