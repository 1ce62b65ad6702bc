// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level builders from raw coordinates.
//!
//! Two flavours: independent polygon faces with their own vertices (what an
//! STL file describes), and sewn shells where corners within tolerance are
//! merged and shared edges are created once.

use brep_lite_geometry::{Point3, Surface, Triangle3};
use rustc_hash::FxHashMap;

use crate::arena::TopologyArena;
use crate::construction::make_polygon_face;
use crate::error::{Error, Result};
use crate::geometry::polygon_plane;
use crate::keys::*;
use crate::spatial::SpatialIndex;

impl TopologyArena {
    /// Creates a planar polygon face with fresh vertices at `points`.
    pub fn add_face_by_points(&mut self, points: &[Point3<f64>]) -> Result<FaceKey> {
        if points.len() < 3 {
            return Err(Error::DegenerateFace(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        let vertices: Vec<VertexKey> = points.iter().map(|&p| self.add_vertex(p)).collect();
        let (face, _) = make_polygon_face(self, &vertices)?;
        Ok(face)
    }

    /// One independent triangular face per triangle, nothing shared.
    pub fn add_solid_from_triangles(&mut self, triangles: &[Triangle3]) -> Result<SolidKey> {
        let faces = triangles
            .iter()
            .map(|t| self.add_face_by_points(t))
            .collect::<Result<Vec<_>>>()?;
        self.add_solid_from_faces(&faces)
    }

    /// Creates a shell from polygon coordinate lists, merging corners that
    /// lie within `tolerance` of each other and sharing edges between faces.
    ///
    /// Polygons that collapse to fewer than three distinct corners after
    /// merging are dropped. Fails with [`Error::EmptyShell`] if none survive.
    pub fn sew_polygons(
        &mut self,
        polygons: &[Vec<Point3<f64>>],
        tolerance: f64,
    ) -> Result<(ShellKey, Vec<FaceKey>)> {
        let cell_size = tolerance.max(1e-10);
        let mut index = SpatialIndex::new(cell_size);
        // Canonical (min, max) vertex pair → shared edge
        let mut edge_map: FxHashMap<(VertexKey, VertexKey), EdgeKey> = FxHashMap::default();
        let mut faces = Vec::with_capacity(polygons.len());

        for polygon in polygons {
            let mut vertices: Vec<VertexKey> = Vec::with_capacity(polygon.len());
            for &p in polygon {
                let v = self.find_or_add_vertex(&mut index, p, tolerance);
                if vertices.last() != Some(&v) {
                    vertices.push(v);
                }
            }
            while vertices.len() > 1 && vertices.first() == vertices.last() {
                vertices.pop();
            }
            if vertices.len() < 3 {
                continue;
            }

            let mut edges = Vec::with_capacity(vertices.len());
            let mut orientations = Vec::with_capacity(vertices.len());
            for i in 0..vertices.len() {
                let start = vertices[i];
                let end = vertices[(i + 1) % vertices.len()];
                let canonical = if start < end { (start, end) } else { (end, start) };
                let edge = match edge_map.get(&canonical) {
                    Some(&existing) => existing,
                    None => {
                        let new_edge = self.add_line_edge(canonical.0, canonical.1)?;
                        edge_map.insert(canonical, new_edge);
                        new_edge
                    }
                };
                edges.push(edge);
                orientations.push(canonical.0 == start);
            }

            let points = vertices
                .iter()
                .map(|&v| self.vertex_point(v).ok_or(Error::VertexNotFound(v)))
                .collect::<Result<Vec<_>>>()?;
            let wire = self.add_wire_with_orientations(&edges, &orientations)?;
            let surface = self.add_surface(Surface::Plane(polygon_plane(&points)));
            faces.push(self.add_face(surface, wire)?);
        }

        let shell = self.add_shell(&faces)?;
        Ok((shell, faces))
    }

    /// Sews polygons into the outer shell of a new solid.
    pub fn add_solid_by_sewing(&mut self, polygons: &[Vec<Point3<f64>>], tolerance: f64) -> Result<SolidKey> {
        let (shell, _) = self.sew_polygons(polygons, tolerance)?;
        self.add_solid(shell)
    }
}
