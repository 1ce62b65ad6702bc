// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kernel bridge - sketch and feature list → solid.
//!
//! The bridge owns a topology arena and a single-slot cache holding the
//! most recently built solid. Every rebuild overwrites the cache; history
//! and undo belong to the host.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::Path;

use brep_lite_geometry::{BooleanOp, Point3, TriangleMesh, Vector3};
use brep_lite_modeling::boolean::boolean;
use brep_lite_modeling::local_ops::{chamfer_with, fillet_with};
use brep_lite_modeling::solid_builder::{cylinder, loft_with, prism, revolve};
use brep_lite_modeling::{build_sketch_face, triangulate, write_stl_file, Sketch, StlFormat};
use brep_lite_topology::{EdgeKey, FaceKey, Shape, SolidKey, TopologyArena};
use tracing::{debug, warn};

use crate::config::{Axis, KernelConfig};
use crate::error::{Error, Result};
use crate::part::{Feature, FeatureType, Part};

/// Builds solids from sketches and parts.
///
/// Sketches are placed on the world XY plane with their normal along +Z.
/// Operations never modify solids already in the arena, so keys returned
/// by earlier builds stay valid until [`KernelBridge::clear`].
pub struct KernelBridge {
    config: KernelConfig,
    arena: TopologyArena,
    last_solid: Option<SolidKey>,
}

impl Default for KernelBridge {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

impl KernelBridge {
    pub fn new(config: KernelConfig) -> Self {
        let arena = TopologyArena::with_tolerance(config.tolerance);
        Self {
            config,
            arena,
            last_solid: None,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn arena(&self) -> &TopologyArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut TopologyArena {
        &mut self.arena
    }

    /// The solid from the last successful build.
    pub fn last_solid(&self) -> Option<SolidKey> {
        self.last_solid
    }

    /// Triangulates the last solid; empty if nothing has been built.
    pub fn last_solid_mesh(&self) -> Result<TriangleMesh> {
        match self.last_solid {
            Some(solid) => Ok(triangulate(&self.arena, solid, self.config.segments)?),
            None => Ok(TriangleMesh::new()),
        }
    }

    /// Writes the last solid to an STL file named with the configured header.
    pub fn export_stl(&self, path: impl AsRef<Path>, format: StlFormat) -> Result<()> {
        let solid = self.last_solid.ok_or(Error::NoSolid)?;
        write_stl_file(
            &self.arena,
            solid,
            path,
            format,
            &self.config.stl_header,
            self.config.segments,
        )?;
        Ok(())
    }

    /// Drops every solid built so far.
    pub fn clear(&mut self) {
        self.arena = TopologyArena::with_tolerance(self.config.tolerance);
        self.last_solid = None;
    }

    /// Extrudes `sketch` along +Z by the configured sketch depth.
    pub fn build_part_from_sketch(&mut self, sketch: &Sketch) -> Result<SolidKey> {
        self.last_solid = None;
        let face = self.sketch_face(sketch, 0.0)?;
        let solid = prism(&mut self.arena, face, Vector3::z(), self.config.sketch_depth)?;
        debug!(sketch = %sketch.name, "built part from sketch");
        self.last_solid = Some(solid);
        Ok(solid)
    }

    /// Rebuilds `part` from its feature list.
    ///
    /// The first Extrude or Revolve creates the body; every other feature
    /// is then applied in list order. The first failing feature aborts the
    /// build and leaves the cache empty.
    pub fn build_part_from_part<S: BuildHasher>(
        &mut self,
        part: &Part,
        sketches: &HashMap<String, Sketch, S>,
    ) -> Result<SolidKey> {
        self.last_solid = None;
        let base_index = part
            .base_feature_index()
            .ok_or_else(|| Error::NoBaseFeature(part.name.clone()))?;
        let base = &part.features()[base_index];
        let mut solid = self.base_body(base, sketches)?;
        debug!(part = %part.name, feature = %base.name, kind = ?base.kind, "built base body");

        for (i, feature) in part.features().iter().enumerate() {
            if i == base_index {
                continue;
            }
            solid = self.apply_feature(solid, feature, sketches)?;
        }

        self.last_solid = Some(solid);
        Ok(solid)
    }

    fn apply_feature<S: BuildHasher>(
        &mut self,
        solid: SolidKey,
        feature: &Feature,
        sketches: &HashMap<String, Sketch, S>,
    ) -> Result<SolidKey> {
        let segments = self.config.segments;
        let result = match feature.kind {
            FeatureType::Extrude | FeatureType::Revolve => {
                if feature.sketch_id.is_empty() {
                    warn!(feature = %feature.name, "feature has no sketch, skipping");
                    return Ok(solid);
                }
                let body = self.base_body(feature, sketches)?;
                boolean(&mut self.arena, solid, body, BooleanOp::Union, segments)?
            }
            FeatureType::Hole => {
                let tool = self.hole_tool(feature)?;
                boolean(&mut self.arena, solid, tool, BooleanOp::Difference, segments)?
            }
            FeatureType::Fillet => {
                let edges = self.selected_edges(solid, feature)?;
                let radius = positive_or(feature.radius, self.config.fillet_radius);
                fillet_with(&mut self.arena, solid, &edges, radius, segments)?
            }
            FeatureType::Chamfer => {
                let edges = self.selected_edges(solid, feature)?;
                let distance = feature
                    .parameter("distance1")
                    .unwrap_or_else(|| positive_or(feature.distance, self.config.chamfer_distance));
                chamfer_with(&mut self.arena, solid, &edges, distance, segments)?
            }
            FeatureType::Loft => {
                let body = self.loft_body(feature, sketches)?;
                boolean(&mut self.arena, solid, body, BooleanOp::Union, segments)?
            }
            other => {
                warn!(feature = %feature.name, kind = ?other, "unsupported feature kind, passing through");
                return Ok(solid);
            }
        };
        debug!(feature = %feature.name, kind = ?feature.kind, "applied feature");
        Ok(result)
    }

    /// Body of an Extrude or Revolve feature.
    fn base_body<S: BuildHasher>(
        &mut self,
        feature: &Feature,
        sketches: &HashMap<String, Sketch, S>,
    ) -> Result<SolidKey> {
        let sketch = find_sketch(sketches, &feature.sketch_id)?;
        match feature.kind {
            FeatureType::Revolve => {
                let axis = Axis::from_name(&feature.axis).unwrap_or(self.config.revolve_axis);
                let angle = if feature.angle > 0.0 && feature.angle <= 360.0 {
                    feature.angle
                } else {
                    self.config.revolve_angle
                };
                let face = self.sketch_face(sketch, 0.0)?;
                Ok(revolve(&mut self.arena, face, Point3::origin(), axis.direction(), angle)?)
            }
            _ => {
                let depth = positive_or(feature.depth, self.config.extrude_depth);
                // A symmetric extrude is one prism centred on the sketch plane.
                let z0 = if feature.symmetric { -0.5 * depth } else { 0.0 };
                let face = self.sketch_face(sketch, z0)?;
                Ok(prism(&mut self.arena, face, Vector3::z(), depth)?)
            }
        }
    }

    /// Cylinder removed by a Hole feature, drilled from the sketch plane
    /// along +Z. A through-all tool is centred on the sketch plane.
    fn hole_tool(&mut self, feature: &Feature) -> Result<SolidKey> {
        let defaults = self.config.hole;
        let radius = 0.5 * positive_or(feature.diameter, defaults.diameter);
        let (height, z0) = if feature.through_all {
            (defaults.through_all_height, -0.5 * defaults.through_all_height)
        } else {
            (positive_or(feature.hole_depth, defaults.depth), 0.0)
        };
        let x = feature.parameter("x").unwrap_or(0.0);
        let y = feature.parameter("y").unwrap_or(0.0);

        let tool = cylinder(&mut self.arena, radius, height)?;
        Ok(self.arena.translate_solid(tool, Vector3::new(x, y, z0))?)
    }

    fn loft_body<S: BuildHasher>(
        &mut self,
        feature: &Feature,
        sketches: &HashMap<String, Sketch, S>,
    ) -> Result<SolidKey> {
        let spacing = positive_or(feature.depth, self.config.extrude_depth);
        let mut sections = Vec::with_capacity(feature.sketch_ids.len());
        for (i, id) in feature.sketch_ids.iter().enumerate() {
            let sketch = find_sketch(sketches, id)?;
            let face = self.sketch_face(sketch, i as f64 * spacing)?;
            let wire = self
                .arena
                .face_outer_wire(face)
                .ok_or(brep_lite_topology::Error::FaceNotFound(face))?;
            sections.push(wire);
        }
        Ok(loft_with(&mut self.arena, &sections, self.config.segments)?)
    }

    /// Resolves a feature's edge indices against the solid's edge order.
    fn selected_edges(&self, solid: SolidKey, feature: &Feature) -> Result<Vec<EdgeKey>> {
        let edges = self.arena.edges(Shape::Solid(solid));
        feature
            .edge_ids
            .iter()
            .map(|&index| {
                edges.get(index).copied().ok_or_else(|| Error::EdgeIndex {
                    feature: feature.name.clone(),
                    index,
                    count: edges.len(),
                })
            })
            .collect()
    }

    fn sketch_face(&mut self, sketch: &Sketch, z: f64) -> Result<FaceKey> {
        Ok(build_sketch_face(
            &mut self.arena,
            sketch,
            Point3::new(0.0, 0.0, z),
            Vector3::z(),
        )?)
    }
}

fn find_sketch<'a, S: BuildHasher>(sketches: &'a HashMap<String, Sketch, S>, id: &str) -> Result<&'a Sketch> {
    sketches.get(id).ok_or_else(|| Error::SketchNotFound(id.to_string()))
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        default
    }
}
