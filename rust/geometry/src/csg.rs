// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh-level boolean operations backed by csgrs BSP trees.
//!
//! Inputs are triangle soups with outward winding; outputs are planar convex
//! polygons (also outward wound) ready to be sewn back into topology.

use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
use csgrs::traits::CSG;
use nalgebra::Point3;

use crate::mesh::triangle_normal;

/// Three corners, counter-clockwise seen from outside.
pub type Triangle3 = [Point3<f64>; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

impl BooleanOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOp::Union => "union",
            BooleanOp::Difference => "difference",
            BooleanOp::Intersection => "intersection",
        }
    }
}

/// Apply `op` to two closed triangle soups.
///
/// Returns the boundary of the result as polygons; an empty vector means the
/// result has no volume.
pub fn boolean_triangles(a: &[Triangle3], b: &[Triangle3], op: BooleanOp) -> Vec<Vec<Point3<f64>>> {
    // Short-circuit empty operands; the BSP code has nothing to clip against.
    match (a.is_empty(), b.is_empty(), op) {
        (true, _, BooleanOp::Union) => return triangles_to_polygons(b),
        (_, true, BooleanOp::Union) | (_, true, BooleanOp::Difference) => {
            return triangles_to_polygons(a)
        }
        (true, _, _) | (_, true, BooleanOp::Intersection) => return Vec::new(),
        _ => {}
    }

    let lhs = to_csg(a);
    let rhs = to_csg(b);
    let result = match op {
        BooleanOp::Union => lhs.union(&rhs),
        BooleanOp::Difference => lhs.difference(&rhs),
        BooleanOp::Intersection => lhs.intersection(&rhs),
    };
    from_csg(&result)
}

fn triangles_to_polygons(triangles: &[Triangle3]) -> Vec<Vec<Point3<f64>>> {
    triangles
        .iter()
        .filter(|[p0, p1, p2]| triangle_normal(p0, p1, p2).is_some())
        .map(|t| t.to_vec())
        .collect()
}

fn to_csg(triangles: &[Triangle3]) -> CSGMesh<()> {
    let mut polygons: Vec<Polygon<()>> = Vec::with_capacity(triangles.len());
    for [p0, p1, p2] in triangles {
        // Degenerate triangles would poison the BSP planes with NaNs.
        let Some(normal) = triangle_normal(p0, p1, p2) else {
            continue;
        };
        let vertices = vec![
            Vertex::new(*p0, normal),
            Vertex::new(*p1, normal),
            Vertex::new(*p2, normal),
        ];
        polygons.push(Polygon::new(vertices, None));
    }
    CSGMesh::from_polygons(&polygons, None)
}

fn from_csg(mesh: &CSGMesh<()>) -> Vec<Vec<Point3<f64>>> {
    mesh.polygons
        .iter()
        .filter(|polygon| polygon.vertices.len() >= 3)
        .map(|polygon| {
            polygon
                .vertices
                .iter()
                .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
                .collect::<Vec<_>>()
        })
        .filter(|points| points.iter().all(|p| p.coords.iter().all(|c| c.is_finite())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::calculate_polygon_normal;
    use approx::assert_relative_eq;

    /// Closed, outward-wound axis-aligned box.
    fn cube(min: [f64; 3], max: [f64; 3]) -> Vec<Triangle3> {
        let p = |x: usize, y: usize, z: usize| {
            Point3::new(
                if x == 0 { min[0] } else { max[0] },
                if y == 0 { min[1] } else { max[1] },
                if z == 0 { min[2] } else { max[2] },
            )
        };
        let quads = [
            [p(0, 0, 0), p(0, 1, 0), p(1, 1, 0), p(1, 0, 0)], // -z
            [p(0, 0, 1), p(1, 0, 1), p(1, 1, 1), p(0, 1, 1)], // +z
            [p(0, 0, 0), p(1, 0, 0), p(1, 0, 1), p(0, 0, 1)], // -y
            [p(0, 1, 0), p(0, 1, 1), p(1, 1, 1), p(1, 1, 0)], // +y
            [p(0, 0, 0), p(0, 0, 1), p(0, 1, 1), p(0, 1, 0)], // -x
            [p(1, 0, 0), p(1, 1, 0), p(1, 1, 1), p(1, 0, 1)], // +x
        ];
        quads
            .iter()
            .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
            .collect()
    }

    fn volume(polygons: &[Vec<Point3<f64>>]) -> f64 {
        polygons
            .iter()
            .map(|poly| {
                (1..poly.len() - 1)
                    .map(|i| poly[0].coords.dot(&poly[i].coords.cross(&poly[i + 1].coords)) / 6.0)
                    .sum::<f64>()
            })
            .sum()
    }

    #[test]
    fn difference_of_overlapping_cubes() {
        let a = cube([0.0; 3], [2.0; 3]);
        let b = cube([1.0, -1.0, -1.0], [3.0, 3.0, 3.0]);
        let result = boolean_triangles(&a, &b, BooleanOp::Difference);
        assert!(!result.is_empty());
        assert_relative_eq!(volume(&result), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn union_and_intersection_volumes() {
        let a = cube([0.0; 3], [2.0; 3]);
        let b = cube([1.0, 0.0, 0.0], [3.0, 2.0, 2.0]);
        let union = boolean_triangles(&a, &b, BooleanOp::Union);
        assert_relative_eq!(volume(&union), 12.0, epsilon = 1e-9);
        let common = boolean_triangles(&a, &b, BooleanOp::Intersection);
        assert_relative_eq!(volume(&common), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = cube([0.0; 3], [1.0; 3]);
        let b = cube([5.0; 3], [6.0; 3]);
        assert!(boolean_triangles(&a, &b, BooleanOp::Intersection).is_empty());
    }

    #[test]
    fn empty_operands_short_circuit() {
        let a = cube([0.0; 3], [1.0; 3]);
        assert_eq!(boolean_triangles(&a, &[], BooleanOp::Difference).len(), 12);
        assert_eq!(boolean_triangles(&[], &a, BooleanOp::Union).len(), 12);
        assert!(boolean_triangles(&[], &a, BooleanOp::Difference).is_empty());
    }

    #[test]
    fn result_polygons_are_outward() {
        let a = cube([0.0; 3], [2.0; 3]);
        let b = cube([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);
        for poly in boolean_triangles(&a, &b, BooleanOp::Difference) {
            let n = calculate_polygon_normal(&poly);
            let centroid = poly.iter().fold(Point3::origin(), |acc, p| acc + p.coords / poly.len() as f64);
            // For a shape inside [0,2]^3 the outward normal never points at the centre of the box.
            let to_center = Point3::new(1.0, 1.0, 1.0) - centroid;
            assert!(n.dot(&to_center) <= 1e-9);
        }
    }
}
