// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle mesh output container

use nalgebra::{Point3, Vector3};

use crate::math::Bounds3;

/// Flat triangle mesh: `vertices` holds `x, y, z` triples and `indices`
/// holds three vertex indices per triangle (so `indices.len() % 3 == 0`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<f64>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with preallocated capacity for vertices and triangles
    #[inline]
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(triangle_count * 3),
        }
    }

    /// Append a vertex and return its index.
    #[inline]
    pub fn add_vertex(&mut self, p: &Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
        index
    }

    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Append a free-standing triangle with its own three vertices.
    pub fn push_triangle(&mut self, a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) {
        let i0 = self.add_vertex(a);
        let i1 = self.add_vertex(b);
        let i2 = self.add_vertex(c);
        self.add_triangle(i0, i1, i2);
    }

    /// Merge another mesh into this one
    pub fn merge(&mut self, other: &TriangleMesh) {
        if other.is_empty() {
            return;
        }
        let offset = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex(&self, index: usize) -> Option<Point3<f64>> {
        let chunk = self.vertices.get(index * 3..index * 3 + 3)?;
        Some(Point3::new(chunk[0], chunk[1], chunk[2]))
    }

    /// Corner positions of triangle `index`, `None` if it references a
    /// missing vertex.
    pub fn triangle(&self, index: usize) -> Option<[Point3<f64>; 3]> {
        let tri = self.indices.get(index * 3..index * 3 + 3)?;
        Some([
            self.vertex(tri[0] as usize)?,
            self.vertex(tri[1] as usize)?,
            self.vertex(tri[2] as usize)?,
        ])
    }

    /// Iterate over all well-formed triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        (0..self.triangle_count()).filter_map(move |i| self.triangle(i))
    }

    pub fn bounds(&self) -> Bounds3 {
        Bounds3::from_points(
            self.vertices
                .chunks_exact(3)
                .map(|c| Point3::new(c[0], c[1], c[2])),
        )
        .unwrap_or_else(Bounds3::zero)
    }

    /// Sum of triangle areas.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Enclosed volume via the divergence theorem (signed tetrahedra against
    /// the origin). Only meaningful for closed, consistently wound meshes.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Unit normal of a triangle, `None` when it has no area.
#[inline]
pub fn triangle_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Vector3<f64>> {
    (b - a).cross(&(c - a)).try_normalize(1e-12)
}
