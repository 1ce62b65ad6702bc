// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # brep-lite engine
//!
//! Host-facing entry point of the kernel. A [`KernelBridge`] turns a sketch,
//! or a [`Part`] with an ordered feature list, into a solid and keeps the
//! most recent result for meshing and STL export.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use brep_lite_engine::{Feature, KernelBridge, KernelConfig, Part};
//! use brep_lite_modeling::{Point2D, Sketch};
//!
//! let mut plate = Sketch::new("plate");
//! plate.add_rectangle(Point2D::new(0.0, 0.0), 40.0, 20.0);
//! let sketches = HashMap::from([(plate.name.clone(), plate)]);
//!
//! let mut part = Part::new("bracket");
//! part.add_feature(Feature::extrude("base", "plate", 5.0));
//! part.add_feature(Feature::hole("bore", 6.0, 5.0));
//!
//! let mut bridge = KernelBridge::new(KernelConfig::default());
//! bridge.build_part_from_part(&part, &sketches)?;
//! let mesh = bridge.last_solid_mesh()?;
//! # Ok::<(), brep_lite_engine::Error>(())
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod part;

pub use bridge::KernelBridge;
pub use config::{Axis, HoleDefaults, KernelConfig};
pub use error::{Error, Result};
pub use part::{Feature, FeatureType, Part};
