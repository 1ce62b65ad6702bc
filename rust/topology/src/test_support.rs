// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures for unit tests.

use brep_lite_geometry::{Point3, Surface};
use rustc_hash::FxHashMap;

use crate::arena::TopologyArena;
use crate::keys::*;

/// Unit cube with shared vertices and edges, faces wound outwards.
pub(crate) fn unit_cube(arena: &mut TopologyArena) -> SolidKey {
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let v: Vec<VertexKey> = [
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(1.0, 1.0, 0.0),
        p(0.0, 1.0, 0.0),
        p(0.0, 0.0, 1.0),
        p(1.0, 0.0, 1.0),
        p(1.0, 1.0, 1.0),
        p(0.0, 1.0, 1.0),
    ]
    .into_iter()
    .map(|pt| arena.add_vertex(pt))
    .collect();

    let quads = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    let mut edge_map: FxHashMap<(VertexKey, VertexKey), EdgeKey> = FxHashMap::default();
    let mut faces = Vec::new();
    for q in quads {
        let mut edges = Vec::new();
        for i in 0..4 {
            let (a, b) = (v[q[i]], v[q[(i + 1) % 4]]);
            let canonical = if a < b { (a, b) } else { (b, a) };
            let e = match edge_map.get(&canonical) {
                Some(&e) => e,
                None => {
                    let e = arena.add_line_edge(canonical.0, canonical.1).unwrap();
                    edge_map.insert(canonical, e);
                    e
                }
            };
            edges.push(e);
        }
        let wire = arena.add_wire(&edges).unwrap();
        let pts: Vec<_> = q.iter().map(|&i| arena.vertex_point(v[i]).unwrap()).collect();
        let surface = arena.add_surface(Surface::Plane(
            crate::geometry::polygon_plane(&pts),
        ));
        faces.push(arena.add_face(surface, wire).unwrap());
    }
    arena.add_solid_from_faces(&faces).unwrap()
}
