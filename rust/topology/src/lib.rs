// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # brep-lite topology
//!
//! Boundary-representation topology for the brep-lite kernel.
//!
//! Every vertex, edge, wire, loop, face, shell and solid lives in a
//! [`TopologyArena`], addressed by generational keys, next to the curves and
//! surfaces those entities reference. Edges own their curve through a
//! [`CurveKey`], so no entity ever borrows geometry that could be dropped
//! underneath it. Upward adjacency indices answer "which faces use this
//! edge" without walking the whole graph.
//!
//! On top of the graph the crate provides traversal, face tessellation,
//! volume/bounds/containment queries, rigid transforms of solids and
//! tolerant sewing of polygon soups back into shells.

pub mod arena;
pub mod builders;
pub mod construction;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod spatial;
pub mod transform;
pub mod traversal;

#[cfg(test)]
mod test_support;

pub use arena::{EdgeData, FaceData, LoopData, LoopKind, ShellData, SolidData, TopologyArena, VertexData, WireData};
pub use construction::make_polygon_face;
pub use error::{Error, Result};
pub use geometry::{polygon_plane, tessellate_patch, DEFAULT_SEGMENTS};
pub use keys::{
    CurveKey, EdgeKey, FaceKey, LoopKey, Shape, ShapeType, ShellKey, SolidKey, SurfaceKey,
    VertexKey, WireKey,
};
pub use spatial::SpatialIndex;
