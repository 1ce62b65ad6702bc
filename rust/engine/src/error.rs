// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The feature list has no Extrude or Revolve to start from.
    #[error("part '{0}' has no extrude or revolve feature")]
    NoBaseFeature(String),

    #[error("sketch '{0}' not found")]
    SketchNotFound(String),

    /// A fillet or chamfer names an edge the current solid does not have.
    #[error("feature '{feature}': edge index {index} out of range ({count} edges)")]
    EdgeIndex {
        feature: String,
        index: usize,
        count: usize,
    },

    #[error("no solid has been built")]
    NoSolid,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Modeling(#[from] brep_lite_modeling::Error),

    #[error(transparent)]
    Topology(#[from] brep_lite_topology::Error),
}
