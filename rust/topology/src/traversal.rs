// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traversal methods for navigating the topology hierarchy.
//!
//! Downward queries (solid → shells → faces → loops → wires → edges →
//! vertices) return entities in a deterministic order: the order of the
//! parent's lists, with duplicates dropped at first sight. Upward queries go
//! through the adjacency index and are sorted by key.
//!
//! A missing entity anywhere along the path yields an empty result rather
//! than an error; callers check for emptiness.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::TopologyArena;
use crate::keys::*;

/// Appends `items` to `out`, skipping anything already in `seen`.
fn push_unique<K: Copy + Eq + std::hash::Hash>(
    out: &mut Vec<K>,
    seen: &mut FxHashSet<K>,
    items: impl IntoIterator<Item = K>,
) {
    for item in items {
        if seen.insert(item) {
            out.push(item);
        }
    }
}

fn sorted<K: Copy + Ord>(set: Option<&FxHashSet<K>>) -> Vec<K> {
    let mut out: Vec<K> = set.map(|s| s.iter().copied().collect()).unwrap_or_default();
    out.sort();
    out
}

// =============================================================================
// Downward traversal
// =============================================================================

impl TopologyArena {
    pub fn edge_vertices(&self, key: EdgeKey) -> Option<(VertexKey, VertexKey)> {
        self.edges.get(key).map(|e| (e.start, e.end))
    }

    /// Edges of a wire paired with their traversal direction.
    pub fn wire_oriented_edges(&self, key: WireKey) -> Vec<(EdgeKey, bool)> {
        self.wires
            .get(key)
            .map(|w| w.edges.iter().copied().zip(w.orientations.iter().copied()).collect())
            .unwrap_or_default()
    }

    /// Start vertex of every oriented edge, in traversal order.
    pub fn wire_vertices_ordered(&self, key: WireKey) -> Vec<VertexKey> {
        self.wire_oriented_edges(key)
            .into_iter()
            .filter_map(|(ek, forward)| {
                let edge = self.edges.get(ek)?;
                Some(self.oriented_ends(edge, forward).0)
            })
            .collect()
    }

    /// `true` iff the wire's first oriented start meets its last oriented end.
    pub fn wire_is_closed(&self, key: WireKey) -> bool {
        let oriented = self.wire_oriented_edges(key);
        let (Some(&(first, first_fwd)), Some(&(last, last_fwd))) = (oriented.first(), oriented.last())
        else {
            return false;
        };
        match (self.edges.get(first), self.edges.get(last)) {
            (Some(f), Some(l)) => {
                let (start, _) = self.oriented_ends(f, first_fwd);
                let (_, end) = self.oriented_ends(l, last_fwd);
                self.vertices_meet(start, end)
            }
            _ => false,
        }
    }

    pub fn loop_wire(&self, key: LoopKey) -> Option<WireKey> {
        self.loops.get(key).map(|l| l.wire)
    }

    /// A loop is closed when its wire is.
    pub fn loop_is_closed(&self, key: LoopKey) -> bool {
        self.loop_wire(key).is_some_and(|w| self.wire_is_closed(w))
    }

    /// Loops of a face, outer loop first.
    pub fn face_loops(&self, key: FaceKey) -> Vec<LoopKey> {
        match self.faces.get(key) {
            Some(face) => std::iter::once(face.outer_loop)
                .chain(face.inner_loops.iter().copied())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn face_outer_wire(&self, key: FaceKey) -> Option<WireKey> {
        self.faces.get(key).and_then(|f| self.loop_wire(f.outer_loop))
    }

    /// Wires of a face, outer boundary first.
    pub fn face_wires(&self, key: FaceKey) -> Vec<WireKey> {
        self.face_loops(key)
            .into_iter()
            .filter_map(|l| self.loop_wire(l))
            .collect()
    }

    pub fn shell_faces(&self, key: ShellKey) -> Vec<FaceKey> {
        self.shells.get(key).map(|s| s.faces.clone()).unwrap_or_default()
    }

    /// Shells of a solid, outer shell first.
    pub fn solid_shells(&self, key: SolidKey) -> Vec<ShellKey> {
        match self.solids.get(key) {
            Some(solid) => std::iter::once(solid.outer_shell)
                .chain(solid.inner_shells.iter().copied())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Faces reachable from a shape: the face itself, a shell's faces, or
    /// every face of every shell of a solid.
    pub fn faces(&self, shape: Shape) -> Vec<FaceKey> {
        match shape {
            Shape::Face(f) if self.faces.contains_key(f) => vec![f],
            Shape::Shell(s) => self.shell_faces(s),
            Shape::Solid(s) => {
                let mut out = Vec::new();
                let mut seen = FxHashSet::default();
                for shell in self.solid_shells(s) {
                    push_unique(&mut out, &mut seen, self.shell_faces(shell));
                }
                out
            }
            _ => Vec::new(),
        }
    }

    /// Distinct edges of a shape in first-seen order.
    pub fn edges(&self, shape: Shape) -> Vec<EdgeKey> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        match shape {
            Shape::Vertex(_) => {}
            Shape::Edge(e) => {
                if self.edges.contains_key(e) {
                    out.push(e);
                }
            }
            Shape::Wire(w) => {
                push_unique(&mut out, &mut seen, self.wire_oriented_edges(w).into_iter().map(|(e, _)| e));
            }
            Shape::Face(_) | Shape::Shell(_) | Shape::Solid(_) => {
                for face in self.faces(shape) {
                    for wire in self.face_wires(face) {
                        push_unique(
                            &mut out,
                            &mut seen,
                            self.wire_oriented_edges(wire).into_iter().map(|(e, _)| e),
                        );
                    }
                }
            }
        }
        out
    }

    /// Distinct vertices of a shape in first-seen order.
    pub fn vertices(&self, shape: Shape) -> Vec<VertexKey> {
        if let Shape::Vertex(v) = shape {
            return if self.vertices.contains_key(v) { vec![v] } else { Vec::new() };
        }
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        for edge in self.edges(shape) {
            if let Some((a, b)) = self.edge_vertices(edge) {
                push_unique(&mut out, &mut seen, [a, b]);
            }
        }
        out
    }
}

// =============================================================================
// Upward traversal
// =============================================================================

impl TopologyArena {
    pub fn vertex_edges(&self, key: VertexKey) -> Vec<EdgeKey> {
        sorted(self.vertex_to_edges.get(&key))
    }

    pub fn edge_wires(&self, key: EdgeKey) -> Vec<WireKey> {
        sorted(self.edge_to_wires.get(&key))
    }

    pub fn wire_loops(&self, key: WireKey) -> Vec<LoopKey> {
        sorted(self.wire_to_loops.get(&key))
    }

    pub fn loop_faces(&self, key: LoopKey) -> Vec<FaceKey> {
        sorted(self.loop_to_faces.get(&key))
    }

    pub fn face_shells(&self, key: FaceKey) -> Vec<ShellKey> {
        sorted(self.face_to_shells.get(&key))
    }

    pub fn shell_solids(&self, key: ShellKey) -> Vec<SolidKey> {
        sorted(self.shell_to_solids.get(&key))
    }

    /// Every face bounded (outer or hole loop) by the edge.
    pub fn edge_faces(&self, key: EdgeKey) -> Vec<FaceKey> {
        let mut faces: Vec<FaceKey> = self
            .edge_wires(key)
            .into_iter()
            .flat_map(|w| self.wire_loops(w))
            .flat_map(|l| self.loop_faces(l))
            .collect();
        faces.sort();
        faces.dedup();
        faces
    }

    /// Faces of `shell` that share at least one edge with `face`.
    pub fn adjacent_faces_in_shell(&self, face: FaceKey, shell: ShellKey) -> Vec<FaceKey> {
        let members: FxHashSet<FaceKey> = self.shell_faces(shell).into_iter().collect();
        let mut out: Vec<FaceKey> = self
            .edges(Shape::Face(face))
            .into_iter()
            .flat_map(|e| self.edge_faces(e))
            .filter(|f| *f != face && members.contains(f))
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

// =============================================================================
// Closure checks
// =============================================================================

impl TopologyArena {
    /// Number of times each edge is used by the loops of a shell's faces.
    fn shell_edge_uses(&self, key: ShellKey) -> FxHashMap<EdgeKey, usize> {
        let mut uses: FxHashMap<EdgeKey, usize> = FxHashMap::default();
        for face in self.shell_faces(key) {
            for wire in self.face_wires(face) {
                for (edge, _) in self.wire_oriented_edges(wire) {
                    *uses.entry(edge).or_default() += 1;
                }
            }
        }
        uses
    }

    /// Edges not used exactly twice by the shell.
    pub fn shell_boundary_edges(&self, key: ShellKey) -> Vec<EdgeKey> {
        let mut out: Vec<EdgeKey> = self
            .shell_edge_uses(key)
            .into_iter()
            .filter(|&(_, n)| n != 2)
            .map(|(e, _)| e)
            .collect();
        out.sort();
        out
    }

    /// A shell is closed when every edge is used exactly twice.
    pub fn shell_is_closed(&self, key: ShellKey) -> bool {
        let uses = self.shell_edge_uses(key);
        !uses.is_empty() && uses.values().all(|&n| n == 2)
    }
}
