// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch input model.
//!
//! A sketch is a named 2D profile: a list of geometry entities plus
//! constraints and parameters. The kernel only reads the geometry; the
//! constraint solver that keeps it consistent lives with the host.
//!
//! Angles are in degrees here, matching what a host UI shows. The wire
//! builder converts them to radians.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    Coincident,
    Horizontal,
    Vertical,
    Parallel,
    Perpendicular,
    Tangent,
    Equal,
    Distance,
    Angle,
}

/// A relation between two sketch entities, referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub kind: ConstraintType,
    pub a: String,
    #[serde(default)]
    pub b: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeometryType {
    #[default]
    Point,
    Line,
    Circle,
    Arc,
    Rectangle,
    Ellipse,
    Polygon,
    Spline,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

fn full_turn() -> f64 {
    360.0
}

/// One sketch primitive. Which fields matter depends on `kind`:
///
/// | kind | fields |
/// |---|---|
/// | `Line`, `Polygon`, `Spline` | `start_point`, `end_point` |
/// | `Circle` | `center_point`, `radius` |
/// | `Arc` | `center_point`, `radius`, `start_angle`, `end_angle` |
/// | `Rectangle` | `start_point` (corner), `width`, `height` |
/// | `Ellipse`, `Point`, `Text` | ignored by the kernel |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub start_point: Point2D,
    pub end_point: Point2D,
    pub center_point: Point2D,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for GeometryEntity {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: GeometryType::Point,
            start_point: Point2D::default(),
            end_point: Point2D::default(),
            center_point: Point2D::default(),
            radius: 0.0,
            start_angle: 0.0,
            end_angle: full_turn(),
            width: 0.0,
            height: 0.0,
        }
    }
}

/// A named 2D profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    pub name: String,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub geometry: Vec<GeometryEntity>,
    #[serde(default = "first_id")]
    next_geometry_id: u32,
}

fn first_id() -> u32 {
    1
}

impl Sketch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            parameters: Vec::new(),
            geometry: Vec::new(),
            next_geometry_id: first_id(),
        }
    }

    fn push(&mut self, mut entity: GeometryEntity) -> String {
        // Deserialized sketches may already use ids we would hand out.
        loop {
            let id = format!("geom_{}", self.next_geometry_id);
            self.next_geometry_id += 1;
            if self.find_geometry(&id).is_none() {
                entity.id = id.clone();
                self.geometry.push(entity);
                return id;
            }
        }
    }

    pub fn add_line(&mut self, start: Point2D, end: Point2D) -> String {
        self.push(GeometryEntity {
            kind: GeometryType::Line,
            start_point: start,
            end_point: end,
            ..Default::default()
        })
    }

    pub fn add_circle(&mut self, center: Point2D, radius: f64) -> String {
        self.push(GeometryEntity {
            kind: GeometryType::Circle,
            center_point: center,
            radius,
            ..Default::default()
        })
    }

    /// Adds an arc; angles in degrees, counter-clockwise from +X.
    pub fn add_arc(&mut self, center: Point2D, radius: f64, start_angle: f64, end_angle: f64) -> String {
        self.push(GeometryEntity {
            kind: GeometryType::Arc,
            center_point: center,
            radius,
            start_angle,
            end_angle,
            ..Default::default()
        })
    }

    pub fn add_rectangle(&mut self, corner: Point2D, width: f64, height: f64) -> String {
        self.push(GeometryEntity {
            kind: GeometryType::Rectangle,
            start_point: corner,
            width,
            height,
            ..Default::default()
        })
    }

    pub fn add_point(&mut self, point: Point2D) -> String {
        self.push(GeometryEntity {
            kind: GeometryType::Point,
            start_point: point,
            ..Default::default()
        })
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub fn find_geometry(&self, id: &str) -> Option<&GeometryEntity> {
        self.geometry.iter().find(|g| g.id == id)
    }

    pub fn find_geometry_mut(&mut self, id: &str) -> Option<&mut GeometryEntity> {
        self.geometry.iter_mut().find(|g| g.id == id)
    }

    /// Removes an entity; returns `false` if no entity has that id.
    pub fn remove_geometry(&mut self, id: &str) -> bool {
        let before = self.geometry.len();
        self.geometry.retain(|g| g.id != id);
        self.geometry.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_unique() {
        let mut sketch = Sketch::new("profile");
        let a = sketch.add_line(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0));
        let b = sketch.add_circle(Point2D::new(0.0, 0.0), 2.0);
        assert_eq!(a, "geom_1");
        assert_eq!(b, "geom_2");
        assert!(sketch.remove_geometry(&a));
        assert!(!sketch.remove_geometry(&a));
        assert_eq!(sketch.add_point(Point2D::default()), "geom_3");
    }

    #[test]
    fn entity_defaults_from_json() {
        let json = r#"{
            "name": "s",
            "geometry": [
                { "id": "g1", "type": "Arc", "center_point": { "x": 1.0, "y": 2.0 }, "radius": 3.0 }
            ]
        }"#;
        let mut sketch: Sketch = serde_json::from_str(json).unwrap();
        let arc = sketch.find_geometry("g1").unwrap();
        assert_eq!(arc.kind, GeometryType::Arc);
        assert_eq!(arc.start_angle, 0.0);
        assert_eq!(arc.end_angle, 360.0);
        assert!(sketch.constraints.is_empty());

        sketch.find_geometry_mut("g1").unwrap().radius = 4.0;
        assert_eq!(sketch.geometry[0].radius, 4.0);
        assert_eq!(sketch.add_point(Point2D::default()), "geom_1");
    }

    #[test]
    fn generated_ids_skip_existing_ones() {
        let json = r#"{ "name": "s", "geometry": [ { "id": "geom_1", "type": "Point" } ] }"#;
        let mut sketch: Sketch = serde_json::from_str(json).unwrap();
        assert_eq!(sketch.add_point(Point2D::default()), "geom_2");
    }
}
