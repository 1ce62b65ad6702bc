// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean operations on solids.
//!
//! Both operands are tessellated, combined with BSP-tree CSG and the
//! resulting polygons are sewn back into a shell of planar faces. Curved
//! inputs therefore come back faceted at the requested resolution.

use brep_lite_geometry::{boolean_triangles, BooleanOp, Point3, Triangle3};
use brep_lite_topology::{SolidKey, TopologyArena, DEFAULT_SEGMENTS};
use tracing::debug;

use crate::error::{Error, Result};

/// Corners closer than this are merged when sewing CSG output.
const WELD_TOLERANCE: f64 = 1e-6;

/// Union of `a` and `b`.
pub fn fuse(arena: &mut TopologyArena, a: SolidKey, b: SolidKey) -> Result<SolidKey> {
    boolean(arena, a, b, BooleanOp::Union, DEFAULT_SEGMENTS)
}

/// `a` minus `b`.
pub fn cut(arena: &mut TopologyArena, a: SolidKey, b: SolidKey) -> Result<SolidKey> {
    boolean(arena, a, b, BooleanOp::Difference, DEFAULT_SEGMENTS)
}

/// Intersection of `a` and `b`.
pub fn common(arena: &mut TopologyArena, a: SolidKey, b: SolidKey) -> Result<SolidKey> {
    boolean(arena, a, b, BooleanOp::Intersection, DEFAULT_SEGMENTS)
}

/// Applies `op`, tessellating curved faces at `segments` per full turn.
///
/// Fails with [`Error::EmptyBooleanResult`] when nothing is left, such as
/// the intersection of disjoint solids.
pub fn boolean(
    arena: &mut TopologyArena,
    a: SolidKey,
    b: SolidKey,
    op: BooleanOp,
    segments: usize,
) -> Result<SolidKey> {
    let lhs = arena.solid_triangles(a, segments)?;
    let rhs = arena.solid_triangles(b, segments)?;
    let polygons = boolean_triangles(&lhs, &rhs, op);
    debug!(op = op.as_str(), lhs = lhs.len(), rhs = rhs.len(), polygons = polygons.len(), "boolean");
    sew_result(arena, &polygons, op)
}

/// Sews CSG output polygons into a new solid.
pub(crate) fn sew_result(
    arena: &mut TopologyArena,
    polygons: &[Vec<Point3<f64>>],
    op: BooleanOp,
) -> Result<SolidKey> {
    if polygons.is_empty() {
        return Err(Error::EmptyBooleanResult(op.as_str()));
    }
    let weld = WELD_TOLERANCE.max(arena.tolerance().distance);
    match arena.add_solid_by_sewing(polygons, weld) {
        Ok(solid) => Ok(solid),
        Err(brep_lite_topology::Error::EmptyShell) => Err(Error::EmptyBooleanResult(op.as_str())),
        Err(e) => Err(e.into()),
    }
}

/// Fans convex polygons into triangles.
pub(crate) fn fan_triangles(polygons: &[Vec<Point3<f64>>]) -> Vec<Triangle3> {
    polygons
        .iter()
        .flat_map(|p| (1..p.len().saturating_sub(1)).map(move |i| [p[0], p[i], p[i + 1]]))
        .collect()
}
