// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weld grid for sewing polygon soups.
//!
//! Corners produced by CSG or read from STL rarely coincide bit for bit.
//! The grid buckets vertices by cell so that each new corner is compared
//! only against its 27 neighbouring cells when looking for a vertex to
//! merge into.

use brep_lite_geometry::Point3;
use rustc_hash::FxHashMap;

use crate::arena::TopologyArena;
use crate::keys::VertexKey;

type Cell = (i64, i64, i64);

/// Vertices bucketed on a uniform grid of cubic cells.
///
/// Queries are only exact for radii up to `cell_size`.
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: FxHashMap<Cell, Vec<(VertexKey, Point3<f64>)>>,
}

impl SpatialIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    /// Indexes every vertex currently in `arena`.
    pub fn from_arena(arena: &TopologyArena, cell_size: f64) -> Self {
        let mut index = Self::new(cell_size);
        for (key, data) in arena.vertices.iter() {
            index.insert(key, data.point);
        }
        index
    }

    pub fn insert(&mut self, key: VertexKey, point: Point3<f64>) {
        let cell = self.cell(&point);
        self.cells.entry(cell).or_default().push((key, point));
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The closest indexed vertex within `radius` of `point`.
    ///
    /// Ties go to the smaller key, so welding is independent of
    /// hash order.
    pub fn nearest(&self, point: &Point3<f64>, radius: f64) -> Option<VertexKey> {
        let (cx, cy, cz) = self.cell(point);
        let mut best: Option<(f64, VertexKey)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &(key, p) in bucket {
                        let d = (p - point).norm_squared();
                        let closer = match best {
                            None => true,
                            Some((best_d, best_key)) => d < best_d || (d == best_d && key < best_key),
                        };
                        if d <= radius * radius && closer {
                            best = Some((d, key));
                        }
                    }
                }
            }
        }
        best.map(|(_, key)| key)
    }

    fn cell(&self, p: &Point3<f64>) -> Cell {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        )
    }
}

impl TopologyArena {
    /// Merges `point` into the nearest indexed vertex within `tolerance`, or
    /// adds it as a new vertex.
    pub fn find_or_add_vertex(&mut self, index: &mut SpatialIndex, point: Point3<f64>, tolerance: f64) -> VertexKey {
        if let Some(existing) = index.nearest(&point, tolerance) {
            return existing;
        }
        let key = self.add_vertex(point);
        index.insert(key, point);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_within_radius() {
        let mut arena = TopologyArena::new();
        let a = arena.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = arena.add_vertex(Point3::new(0.004, 0.0, 0.0));
        arena.add_vertex(Point3::new(10.0, 10.0, 10.0));
        let index = SpatialIndex::from_arena(&arena, 0.01);
        assert_eq!(index.len(), 3);

        assert_eq!(index.nearest(&Point3::new(0.001, 0.0, 0.0), 0.01), Some(a));
        assert_eq!(index.nearest(&Point3::new(0.003, 0.0, 0.0), 0.01), Some(b));
        assert_eq!(index.nearest(&Point3::new(1.0, 0.0, 0.0), 0.01), None);
    }

    #[test]
    fn neighbouring_cells_are_searched() {
        let mut arena = TopologyArena::new();
        let v = arena.add_vertex(Point3::new(0.0099, 0.0, -0.0001));
        let index = SpatialIndex::from_arena(&arena, 0.01);
        assert_eq!(index.nearest(&Point3::new(0.0101, 0.0, 0.0001), 0.001), Some(v));
    }

    #[test]
    fn welding_reuses_vertices() {
        let mut arena = TopologyArena::new();
        let mut index = SpatialIndex::new(0.01);
        assert!(index.is_empty());

        let v0 = arena.find_or_add_vertex(&mut index, Point3::origin(), 0.001);
        let v1 = arena.find_or_add_vertex(&mut index, Point3::new(0.0001, 0.0, 0.0), 0.001);
        let v2 = arena.find_or_add_vertex(&mut index, Point3::new(5.0, 5.0, 5.0), 0.001);

        assert_eq!(v0, v1);
        assert_ne!(v0, v2);
        assert_eq!(arena.vertex_count(), 2);
    }
}
