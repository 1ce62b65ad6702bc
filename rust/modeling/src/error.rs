// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for modeling operations.

use thiserror::Error;

/// Result type alias for modeling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by builders, booleans, local operations and STL I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// The sketch produced no usable curves.
    #[error("sketch '{0}' has no buildable geometry")]
    EmptySketch(String),

    #[error("wire has no curves")]
    EmptyWire,

    /// A length, radius, angle or count is out of range.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("profile curves do not form closed loops: {0}")]
    OpenProfile(String),

    #[error("profile face is not planar")]
    NonPlanarProfile,

    #[error("degenerate face: {0}")]
    DegenerateFace(String),

    #[error("invalid revolve axis: {0}")]
    InvalidRevolveAxis(String),

    #[error("loft sections do not match: {0}")]
    LoftMismatch(String),

    #[error("boolean {0} produced an empty solid")]
    EmptyBooleanResult(&'static str),

    #[error("unsupported edge: {0}")]
    UnsupportedEdge(String),

    #[error("STL error: {0}")]
    Stl(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Topology(#[from] brep_lite_topology::Error),

    #[error(transparent)]
    Geometry(#[from] brep_lite_geometry::Error),
}
