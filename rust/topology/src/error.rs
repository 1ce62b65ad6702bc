// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for topology operations.

use crate::keys::*;

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during topology operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexKey),

    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeKey),

    #[error("wire not found: {0:?}")]
    WireNotFound(WireKey),

    #[error("loop not found: {0:?}")]
    LoopNotFound(LoopKey),

    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    #[error("shell not found: {0:?}")]
    ShellNotFound(ShellKey),

    #[error("solid not found: {0:?}")]
    SolidNotFound(SolidKey),

    #[error("curve not found: {0:?}")]
    CurveNotFound(CurveKey),

    #[error("surface not found: {0:?}")]
    SurfaceNotFound(SurfaceKey),

    /// The curve does not pass through the edge's vertices at `t0`/`t1`.
    #[error("edge endpoints do not lie on the curve (gap {0:e})")]
    EdgeEndpointMismatch(f64),

    /// Consecutive edges of a wire do not share an endpoint.
    #[error("wire edges are not connected: edge {0} does not end where edge {1} starts")]
    DisconnectedWire(usize, usize),

    #[error("wire must have at least one edge")]
    EmptyWire,

    #[error("wire has {edges} edges but {orientations} orientation flags")]
    OrientationCount { edges: usize, orientations: usize },

    /// A face boundary must be a closed wire.
    #[error("face boundary wire is not closed")]
    OpenWire,

    #[error("face has a degenerate boundary: {0}")]
    DegenerateFace(String),

    #[error("shell must have at least one face")]
    EmptyShell,

    #[error("mirroring transforms would invert face orientation")]
    MirroringTransform,

    #[error(transparent)]
    Geometry(#[from] brep_lite_geometry::Error),
}
