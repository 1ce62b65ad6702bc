// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # brep-lite geometry
//!
//! The geometric layer of the brep-lite kernel: tolerance predicates, a
//! rigid transform, 2D sketch curves and wires, 3D curves and surfaces, plus
//! the triangle-mesh utilities (ear-clipping triangulation and BSP booleans)
//! that the topology and modeling crates build on.

pub mod csg;
pub mod curve2d;
pub mod curve3d;
pub mod error;
pub mod math;
pub mod mesh;
pub mod surface;
pub mod tolerance;
pub mod triangulation;
pub mod wire2d;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point2, Point3, Vector2, Vector3};

pub use csg::{boolean_triangles, BooleanOp, Triangle3};
pub use curve2d::{Arc2D, Circle2D, Curve2D, Line2D, Spline2D};
pub use curve3d::{Circle3D, Curve3D, Line3D};
pub use error::{Error, Result};
pub use math::{Bounds2, Bounds3, Transform3};
pub use mesh::TriangleMesh;
pub use surface::{Cylinder, Plane, Revolution, Sphere, Surface};
pub use tolerance::{points_equal, points_equal_2d, vectors_parallel, Tolerance};
pub use triangulation::{triangulate_polygon, triangulate_polygon_with_holes};
pub use wire2d::Wire2D;
