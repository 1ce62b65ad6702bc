// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid transformations of solids.
//!
//! Entities are immutable once created, so transforming a solid deep-copies
//! it: every vertex, curve, edge, wire, face and shell gets a transformed
//! twin and the original solid stays untouched. Sharing inside the solid is
//! preserved (an edge used by two faces maps to one new edge).

use brep_lite_geometry::{Point3, Transform3, Vector3};
use rustc_hash::FxHashMap;

use crate::arena::TopologyArena;
use crate::error::{Error, Result};
use crate::keys::*;

impl TopologyArena {
    /// Returns a transformed copy of `solid`.
    ///
    /// Mirroring transforms are rejected because they would turn every face
    /// inside out.
    pub fn transform_solid(&mut self, solid: SolidKey, transform: &Transform3) -> Result<SolidKey> {
        if transform.is_mirroring() {
            return Err(Error::MirroringTransform);
        }
        let data = self.solids.get(solid).ok_or(Error::SolidNotFound(solid))?.clone();

        let mut vertex_map: FxHashMap<VertexKey, VertexKey> = FxHashMap::default();
        for v in self.vertices(Shape::Solid(solid)) {
            let p = self.vertex_point(v).ok_or(Error::VertexNotFound(v))?;
            vertex_map.insert(v, self.add_vertex(transform.apply_point(&p)));
        }

        let mut curve_map: FxHashMap<CurveKey, CurveKey> = FxHashMap::default();
        let mut edge_map: FxHashMap<EdgeKey, EdgeKey> = FxHashMap::default();
        for e in self.edges(Shape::Solid(solid)) {
            let edge = self.edges.get(e).ok_or(Error::EdgeNotFound(e))?.clone();
            let curve = match curve_map.get(&edge.curve) {
                Some(&c) => c,
                None => {
                    let image = self
                        .curves
                        .get(edge.curve)
                        .ok_or(Error::CurveNotFound(edge.curve))?
                        .transformed(transform);
                    let c = self.add_curve(image);
                    curve_map.insert(edge.curve, c);
                    c
                }
            };
            let start = vertex_map.get(&edge.start).copied().ok_or(Error::VertexNotFound(edge.start))?;
            let end = vertex_map.get(&edge.end).copied().ok_or(Error::VertexNotFound(edge.end))?;
            edge_map.insert(e, self.add_edge(curve, edge.t0, edge.t1, start, end)?);
        }

        let mut wire_map: FxHashMap<WireKey, WireKey> = FxHashMap::default();
        let mut shells = Vec::new();
        for shell in self.solid_shells(solid) {
            let mut faces = Vec::new();
            for face in self.shell_faces(shell) {
                let mut wires = Vec::new();
                for w in self.face_wires(face) {
                    let copied = match wire_map.get(&w) {
                        Some(&copied) => copied,
                        None => {
                            let (edges, orientations): (Vec<EdgeKey>, Vec<bool>) = self
                                .wire_oriented_edges(w)
                                .into_iter()
                                .map(|(e, o)| edge_map.get(&e).map(|&ne| (ne, o)).ok_or(Error::EdgeNotFound(e)))
                                .collect::<Result<Vec<_>>>()?
                                .into_iter()
                                .unzip();
                            let copied = self.add_wire_with_orientations(&edges, &orientations)?;
                            wire_map.insert(w, copied);
                            copied
                        }
                    };
                    wires.push(copied);
                }
                let image = self
                    .face_surface(face)
                    .ok_or(Error::FaceNotFound(face))?
                    .transformed(transform);
                let surface = self.add_surface(image);
                let (outer, inner) = wires.split_first().ok_or(Error::FaceNotFound(face))?;
                faces.push(self.add_face_with_holes(surface, *outer, inner)?);
            }
            shells.push(self.add_shell(&faces)?);
        }

        let (outer, inner) = shells.split_first().ok_or(Error::ShellNotFound(data.outer_shell))?;
        self.add_solid_with_voids(*outer, inner)
    }

    pub fn translate_solid(&mut self, solid: SolidKey, offset: Vector3<f64>) -> Result<SolidKey> {
        self.transform_solid(solid, &Transform3::from_translation(offset))
    }

    /// Rotates a copy of `solid` by `angle` radians about the axis through
    /// `origin`.
    pub fn rotate_solid(
        &mut self,
        solid: SolidKey,
        origin: &Point3<f64>,
        axis: &Vector3<f64>,
        angle: f64,
    ) -> Result<SolidKey> {
        self.transform_solid(solid, &Transform3::rotation_about(origin, axis, angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unit_cube;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn translated_copy_leaves_original() {
        let mut arena = TopologyArena::new();
        let cube = unit_cube(&mut arena);
        let moved = arena.translate_solid(cube, Vector3::new(10.0, 0.0, 0.0)).unwrap();

        let b = arena.solid_bounds(moved);
        assert_relative_eq!(b.min, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(arena.solid_bounds(cube).max, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);

        assert_eq!(arena.edges(Shape::Solid(moved)).len(), 12);
        assert_eq!(arena.vertices(Shape::Solid(moved)).len(), 8);
        assert!(arena.shell_is_closed(arena.solid(moved).unwrap().outer_shell));
    }

    #[test]
    fn rotation_preserves_volume_and_orientation() {
        let mut arena = TopologyArena::new();
        let cube = unit_cube(&mut arena);
        let turned = arena
            .rotate_solid(cube, &Point3::origin(), &Vector3::z(), FRAC_PI_2)
            .unwrap();
        assert!(arena.solid_signed_volume(turned, 8).unwrap() > 0.0);
        assert_relative_eq!(arena.solid_volume(turned).unwrap(), 1.0, epsilon = 1e-10);
        let b = arena.solid_bounds(turned);
        assert_relative_eq!(b.min.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(b.max.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mirroring_is_rejected() {
        let mut arena = TopologyArena::new();
        let cube = unit_cube(&mut arena);
        let mirror = Transform3::from_scale(-1.0, 1.0, 1.0);
        assert!(matches!(arena.transform_solid(cube, &mirror), Err(Error::MirroringTransform)));
    }
}
