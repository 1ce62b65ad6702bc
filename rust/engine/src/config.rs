// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kernel configuration.
//!
//! The host owns persistence: it hands the bridge a [`KernelConfig`] built
//! in code or parsed from JSON. Missing fields take their defaults, so a
//! file only needs the values it changes.

use std::path::Path;

use brep_lite_geometry::{Tolerance, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A world axis through the origin, used as a revolve axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Parses `"X"`, `"Y"` or `"Z"` (either case).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "X" | "x" => Some(Axis::X),
            "Y" | "y" => Some(Axis::Y),
            "Z" | "z" => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn direction(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// Defaults for hole features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleDefaults {
    pub diameter: f64,
    pub depth: f64,
    /// Length of the tool for a through-all hole, centred on the sketch plane.
    pub through_all_height: f64,
}

impl Default for HoleDefaults {
    fn default() -> Self {
        Self {
            diameter: 5.0,
            depth: 10.0,
            through_all_height: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub tolerance: Tolerance,
    /// Tessellation segments per full turn for curved faces.
    pub segments: usize,
    /// Depth of the prism built by `build_part_from_sketch`.
    pub sketch_depth: f64,
    /// Extrude depth used when a feature does not give one.
    pub extrude_depth: f64,
    /// Revolve angle in degrees used when a feature's angle is not in (0, 360].
    pub revolve_angle: f64,
    pub revolve_axis: Axis,
    pub hole: HoleDefaults,
    pub fillet_radius: f64,
    pub chamfer_distance: f64,
    /// Text written into binary STL headers and ASCII `solid` lines.
    pub stl_header: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            segments: 32,
            sketch_depth: 10.0,
            extrude_depth: 10.0,
            revolve_angle: 360.0,
            revolve_axis: Axis::Y,
            hole: HoleDefaults::default(),
            fillet_radius: 2.0,
            chamfer_distance: 1.0,
            stl_header: "brep-lite".to_string(),
        }
    }
}

impl KernelConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every length, angle and count is usable.
    pub fn validate(&self) -> Result<()> {
        let t = &self.tolerance;
        for (name, value) in [
            ("tolerance.distance", t.distance),
            ("tolerance.angular", t.angular),
            ("tolerance.parametric", t.parametric),
            ("sketch_depth", self.sketch_depth),
            ("extrude_depth", self.extrude_depth),
            ("hole.diameter", self.hole.diameter),
            ("hole.depth", self.hole.depth),
            ("hole.through_all_height", self.hole.through_all_height),
            ("fillet_radius", self.fillet_radius),
            ("chamfer_distance", self.chamfer_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.revolve_angle > 0.0 && self.revolve_angle <= 360.0) {
            return Err(Error::Config(format!(
                "revolve_angle must be in (0, 360], got {}",
                self.revolve_angle
            )));
        }
        if self.segments < 3 {
            return Err(Error::Config(format!("segments must be at least 3, got {}", self.segments)));
        }
        Ok(())
    }
}
