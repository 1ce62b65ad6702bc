// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # brep-lite modeling
//!
//! Turns sketches into solids and solids into meshes:
//!
//! - [`sketch`]: the 2D input model
//! - [`wire_builder`] / [`face_builder`]: sketch → 2D wire → planar face
//! - [`solid_builder`]: primitives, extrusion, revolution and loft
//! - [`boolean`] and [`local_ops`]: fuse/cut/common, fillet/chamfer
//! - [`mesh_gen`] and [`stl`]: triangulation and STL files
//!
//! Everything operates on a caller-owned [`TopologyArena`] and returns new
//! keys; inputs are never modified.
//!
//! ```no_run
//! use brep_lite_modeling::{face_builder, mesh_gen, solid_builder, wire_builder};
//! use brep_lite_modeling::sketch::{Point2D, Sketch};
//! use brep_lite_modeling::TopologyArena;
//! use brep_lite_geometry::{Point3, Vector3};
//!
//! let mut sketch = Sketch::new("plate");
//! sketch.add_rectangle(Point2D::new(0.0, 0.0), 40.0, 20.0);
//! sketch.add_circle(Point2D::new(20.0, 10.0), 4.0);
//!
//! let mut arena = TopologyArena::new();
//! let wire = wire_builder::build(&sketch);
//! let face = face_builder::build_planar_face(&mut arena, &wire, Point3::origin(), Vector3::z())?;
//! let plate = solid_builder::prism(&mut arena, face, Vector3::z(), 5.0)?;
//! let mesh = mesh_gen::triangulate(&arena, plate, 32)?;
//! # Ok::<(), brep_lite_modeling::Error>(())
//! ```

pub mod boolean;
pub mod error;
pub mod face_builder;
pub mod local_ops;
pub mod mesh_gen;
pub mod sketch;
pub mod solid_builder;
pub mod stl;
pub mod wire_builder;

pub use brep_lite_topology::TopologyArena;

pub use boolean::{common, cut, fuse};
pub use error::{Error, Result};
pub use face_builder::{build_planar_face, build_sketch_face, SketchFrame};
pub use local_ops::{chamfer, fillet};
pub use mesh_gen::triangulate;
pub use sketch::{Constraint, ConstraintType, GeometryEntity, GeometryType, Parameter, Point2D, Sketch};
pub use solid_builder::{box_solid, cylinder, extrude, loft, prism, revolve, sphere};
pub use stl::{read_stl, read_stl_file, write_stl, write_stl_file, StlFormat};
