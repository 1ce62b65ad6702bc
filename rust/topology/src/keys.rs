// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage.
//!
//! Every topology entity, and every curve or surface an entity refers to,
//! gets a type-safe generational key from `slotmap`. Keys stay valid for the
//! lifetime of the arena, which is what lets edges hold an owning reference
//! to their curve without borrowing it.

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Key for a vertex (point in 3D space).
    pub struct VertexKey;

    /// Key for an edge (curve sub-range between two vertices).
    pub struct EdgeKey;

    /// Key for a wire (ordered chain of connected edges).
    pub struct WireKey;

    /// Key for a loop (a wire used as a face boundary).
    pub struct LoopKey;

    /// Key for a face (surface bounded by loops).
    pub struct FaceKey;

    /// Key for a shell (collection of faces).
    pub struct ShellKey;

    /// Key for a solid (outer shell plus cavities).
    pub struct SolidKey;

    /// Key for a 3D curve stored in the arena.
    pub struct CurveKey;

    /// Key for a surface stored in the arena.
    pub struct SurfaceKey;
}

/// A reference to any traversable topology entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Vertex(VertexKey),
    Edge(EdgeKey),
    Wire(WireKey),
    Face(FaceKey),
    Shell(ShellKey),
    Solid(SolidKey),
}

impl Shape {
    /// Returns the type of the referenced entity.
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Vertex(_) => ShapeType::Vertex,
            Shape::Edge(_) => ShapeType::Edge,
            Shape::Wire(_) => ShapeType::Wire,
            Shape::Face(_) => ShapeType::Face,
            Shape::Shell(_) => ShapeType::Shell,
            Shape::Solid(_) => ShapeType::Solid,
        }
    }

    /// Stable integer identifier of the entity, unique within its type.
    pub fn id(&self) -> u64 {
        match self {
            Shape::Vertex(k) => k.data().as_ffi(),
            Shape::Edge(k) => k.data().as_ffi(),
            Shape::Wire(k) => k.data().as_ffi(),
            Shape::Face(k) => k.data().as_ffi(),
            Shape::Shell(k) => k.data().as_ffi(),
            Shape::Solid(k) => k.data().as_ffi(),
        }
    }
}

/// Discriminant for topology entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeType {
    Vertex = 0,
    Edge = 1,
    Wire = 2,
    Face = 3,
    Shell = 4,
    Solid = 5,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Vertex => "Vertex",
            ShapeType::Edge => "Edge",
            ShapeType::Wire => "Wire",
            ShapeType::Face => "Face",
            ShapeType::Shell => "Shell",
            ShapeType::Solid => "Solid",
        }
    }
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<VertexKey> for Shape {
    fn from(k: VertexKey) -> Self {
        Shape::Vertex(k)
    }
}

impl From<EdgeKey> for Shape {
    fn from(k: EdgeKey) -> Self {
        Shape::Edge(k)
    }
}

impl From<WireKey> for Shape {
    fn from(k: WireKey) -> Self {
        Shape::Wire(k)
    }
}

impl From<FaceKey> for Shape {
    fn from(k: FaceKey) -> Self {
        Shape::Face(k)
    }
}

impl From<ShellKey> for Shape {
    fn from(k: ShellKey) -> Self {
        Shape::Shell(k)
    }
}

impl From<SolidKey> for Shape {
    fn from(k: SolidKey) -> Self {
        Shape::Solid(k)
    }
}
