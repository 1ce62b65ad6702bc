// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid → triangle mesh conversion for rendering and export.

use brep_lite_geometry::mesh::triangle_normal;
use brep_lite_geometry::{Point3, TriangleMesh};
use brep_lite_topology::{Shape, SolidKey, TopologyArena};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::Result;

/// Triangulates every face of `solid`, curved faces at `segments` per full
/// turn.
///
/// Vertices with bit-identical coordinates are shared. Triangles without
/// area are dropped, and a face that cannot be triangulated is skipped with
/// a warning.
pub fn triangulate(arena: &TopologyArena, solid: SolidKey, segments: usize) -> Result<TriangleMesh> {
    if arena.solid(solid).is_none() {
        return Err(brep_lite_topology::Error::SolidNotFound(solid).into());
    }

    let mut mesh = TriangleMesh::new();
    let mut index: FxHashMap<[u64; 3], u32> = FxHashMap::default();
    let mut vertex = |mesh: &mut TriangleMesh, p: &Point3<f64>| -> u32 {
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        *index.entry(key).or_insert_with(|| mesh.add_vertex(p))
    };

    for face in arena.faces(Shape::Solid(solid)) {
        let triangles = match arena.tessellate_face(face, segments) {
            Ok(triangles) => triangles,
            Err(e) => {
                warn!(?face, error = %e, "skipping face that cannot be triangulated");
                continue;
            }
        };
        for [a, b, c] in triangles {
            if triangle_normal(&a, &b, &c).is_none() {
                continue;
            }
            let i0 = vertex(&mut mesh, &a);
            let i1 = vertex(&mut mesh, &b);
            let i2 = vertex(&mut mesh, &c);
            mesh.add_triangle(i0, i1, i2);
        }
    }
    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "triangulated solid"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid_builder::{box_solid, cylinder, sphere};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn unit_box_mesh() {
        let mut arena = TopologyArena::new();
        let solid = box_solid(&mut arena, 1.0, 1.0, 1.0).unwrap();
        let mesh = triangulate(&arena, solid, 32).unwrap();
        assert!(!mesh.vertices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 8);
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.surface_area(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn curved_faces_are_covered() {
        let mut arena = TopologyArena::new();
        let solid = cylinder(&mut arena, 1.0, 1.0).unwrap();
        let mesh = triangulate(&arena, solid, 64).unwrap();
        assert!(mesh.triangle_count() > 64);
        assert_relative_eq!(mesh.signed_volume(), PI, max_relative = 2e-3);

        let ball = sphere(&mut arena, 1.0).unwrap();
        let mesh = triangulate(&arena, ball, 64).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 4.0 / 3.0 * PI, max_relative = 1e-2);
    }

    #[test]
    fn missing_solid_is_an_error() {
        let mut arena = TopologyArena::new();
        let solid = box_solid(&mut arena, 1.0, 1.0, 1.0).unwrap();
        let other = TopologyArena::new();
        assert!(triangulate(&other, solid, 8).is_err());
    }
}
