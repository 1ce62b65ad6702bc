// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Planar boundary loops are projected into 2D and handed to `earcutr`.
//! Triangles and convex quads skip the ear-clipping pass entirely.

use crate::error::{Error, Result};
use nalgebra::{Point2, Point3, Vector3};

/// Signed area of a 2D polygon (positive when counter-clockwise).
pub fn signed_area_2d(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}

/// Triangulate a simple polygon given as a 2D loop.
///
/// Returns indices into `points`, three per triangle.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    if points.len() < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    if points.len() == 3 {
        return Ok(vec![0, 1, 2]);
    }

    // Convex quad: split along the 0-2 diagonal.
    if points.len() == 4 && is_convex(points) {
        return Ok(vec![0, 1, 2, 0, 2, 3]);
    }

    triangulate_polygon_with_holes(points, &[])
}

/// Triangulate an outer loop with any number of hole loops.
///
/// Indices address the concatenation `outer ++ holes[0] ++ holes[1] ++ ...`.
/// Holes with fewer than three points are ignored but still counted in the
/// index space so callers can keep a single flat vertex buffer.
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::TriangulationError(
            "Outer boundary needs at least 3 points".to_string(),
        ));
    }

    let total = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut coords = Vec::with_capacity(total * 2);
    coords.extend(outer.iter().flat_map(|p| [p.x, p.y]));

    // earcut only understands holes appended to the buffer; degenerate
    // holes are kept out of it and the indices remapped afterwards.
    let mut remap: Vec<usize> = (0..outer.len()).collect();
    let mut hole_starts = Vec::with_capacity(holes.len());
    let mut offset = outer.len();
    for hole in holes {
        if hole.len() >= 3 {
            hole_starts.push(coords.len() / 2);
            coords.extend(hole.iter().flat_map(|p| [p.x, p.y]));
            remap.extend(offset..offset + hole.len());
        }
        offset += hole.len();
    }

    let indices = earcutr::earcut(&coords, &hole_starts, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

    Ok(indices.into_iter().map(|i| remap[i]).collect())
}

fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let cross = (b - a).perp(&(c - b));
        if cross.abs() < 1e-12 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Project 3D points onto a plane with the given normal.
///
/// Returns the 2D points together with the basis `(u_axis, v_axis, origin)`
/// so further loops can be projected into the same space.
pub fn project_to_2d(
    points: &[Point3<f64>],
    normal: &Vector3<f64>,
) -> (Vec<Point2<f64>>, Vector3<f64>, Vector3<f64>, Point3<f64>) {
    let Some(&origin) = points.first() else {
        return (Vec::new(), Vector3::zeros(), Vector3::zeros(), Point3::origin());
    };
    let (u_axis, v_axis) = crate::math::plane_basis(normal);
    let projected = project_to_2d_with_basis(points, &u_axis, &v_axis, &origin);
    (projected, u_axis, v_axis, origin)
}

/// Project 3D points using an existing coordinate system
#[inline]
pub fn project_to_2d_with_basis(
    points: &[Point3<f64>],
    u_axis: &Vector3<f64>,
    v_axis: &Vector3<f64>,
    origin: &Point3<f64>,
) -> Vec<Point2<f64>> {
    points
        .iter()
        .map(|p| {
            let d = p - origin;
            Point2::new(d.dot(u_axis), d.dot(v_axis))
        })
        .collect()
}

/// Unit normal of a 3D polygon by Newell's method.
///
/// Falls back to `+Z` for degenerate input.
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    if n < 3 {
        return Vector3::z();
    }

    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal.try_normalize(1e-12).unwrap_or_else(Vector3::z)
}
