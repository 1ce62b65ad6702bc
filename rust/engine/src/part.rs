// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part and feature input model.
//!
//! A part is an ordered feature list. Each feature carries a kind and the
//! numeric fields that kind reads; unused fields keep their zero defaults,
//! and a zero or negative value means "use the configured default".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Extrude,
    Revolve,
    Hole,
    Fillet,
    Chamfer,
    Loft,
    Sweep,
    Shell,
    Pattern,
    Mirror,
    /// Any kind this kernel does not know; passed through untouched.
    #[serde(other)]
    Other,
}

impl FeatureType {
    /// Whether this kind creates a body from a sketch.
    pub fn is_base(self) -> bool {
        matches!(self, FeatureType::Extrude | FeatureType::Revolve)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
    /// Profile sketch of an Extrude or Revolve.
    pub sketch_id: String,
    /// Section sketches of a Loft, bottom to top.
    pub sketch_ids: Vec<String>,
    /// Extrude depth, or the spacing between Loft sections.
    pub depth: f64,
    /// Extrude half the depth to each side of the sketch plane.
    pub symmetric: bool,
    /// Revolve axis name: `"X"`, `"Y"` or `"Z"`.
    pub axis: String,
    /// Revolve angle in degrees.
    pub angle: f64,
    pub diameter: f64,
    pub through_all: bool,
    pub hole_depth: f64,
    /// Fillet radius.
    pub radius: f64,
    /// Chamfer distance, overridden by `parameters["distance1"]`.
    pub distance: f64,
    /// Indices into the current solid's edge list, in traversal order.
    pub edge_ids: Vec<usize>,
    /// Free-form values. Holes read `x` and `y` as their centre on the
    /// sketch plane.
    pub parameters: BTreeMap<String, f64>,
}

impl Feature {
    pub fn new(name: impl Into<String>, kind: FeatureType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn extrude(name: impl Into<String>, sketch_id: impl Into<String>, depth: f64) -> Self {
        Self {
            sketch_id: sketch_id.into(),
            depth,
            ..Self::new(name, FeatureType::Extrude)
        }
    }

    pub fn revolve(
        name: impl Into<String>,
        sketch_id: impl Into<String>,
        axis: impl Into<String>,
        angle: f64,
    ) -> Self {
        Self {
            sketch_id: sketch_id.into(),
            axis: axis.into(),
            angle,
            ..Self::new(name, FeatureType::Revolve)
        }
    }

    pub fn hole(name: impl Into<String>, diameter: f64, hole_depth: f64) -> Self {
        Self {
            diameter,
            hole_depth,
            ..Self::new(name, FeatureType::Hole)
        }
    }

    pub fn fillet(name: impl Into<String>, edge_ids: Vec<usize>, radius: f64) -> Self {
        Self {
            edge_ids,
            radius,
            ..Self::new(name, FeatureType::Fillet)
        }
    }

    pub fn chamfer(name: impl Into<String>, edge_ids: Vec<usize>, distance: f64) -> Self {
        Self {
            edge_ids,
            distance,
            ..Self::new(name, FeatureType::Chamfer)
        }
    }

    pub fn loft(name: impl Into<String>, sketch_ids: Vec<String>, spacing: f64) -> Self {
        Self {
            sketch_ids,
            depth: spacing,
            ..Self::new(name, FeatureType::Loft)
        }
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }
}

/// A named solid described by its features, applied in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
        }
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Index of the first Extrude or Revolve.
    pub fn base_feature_index(&self) -> Option<usize> {
        self.features.iter().position(|f| f.kind.is_base())
    }
}
