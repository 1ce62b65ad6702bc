// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parts described in JSON, rebuilt and exported.

use std::collections::HashMap;

use approx::assert_relative_eq;
use brep_lite_engine::{KernelBridge, KernelConfig, Part};
use brep_lite_geometry::Point3;
use brep_lite_modeling::{read_stl_file, Sketch, StlFormat, TopologyArena};

const SKETCHES: &str = r#"[
    {
        "name": "plate",
        "geometry": [
            { "id": "r1", "type": "Rectangle", "start_point": { "x": 0.0, "y": 0.0 },
              "width": 40.0, "height": 20.0 }
        ]
    },
    {
        "name": "boss",
        "geometry": [
            { "id": "c1", "type": "Circle", "center_point": { "x": 30.0, "y": 10.0 }, "radius": 4.0 }
        ]
    }
]"#;

const BRACKET: &str = r#"{
    "name": "bracket",
    "features": [
        { "name": "base", "type": "Extrude", "sketch_id": "plate", "depth": 5.0 },
        { "name": "bore", "type": "Hole", "diameter": 6.0, "through_all": true,
          "parameters": { "x": 10.0, "y": 10.0 } },
        { "name": "boss", "type": "Extrude", "sketch_id": "boss", "depth": 12.0 },
        { "name": "decal", "type": "Emboss" }
    ]
}"#;

fn load() -> (Part, HashMap<String, Sketch>) {
    let sketches: Vec<Sketch> = serde_json::from_str(SKETCHES).unwrap();
    let part: Part = serde_json::from_str(BRACKET).unwrap();
    (part, sketches.into_iter().map(|s| (s.name.clone(), s)).collect())
}

#[test]
fn bracket_from_json() {
    let (part, sketches) = load();
    let mut bridge = KernelBridge::new(KernelConfig::default());
    let solid = bridge.build_part_from_part(&part, &sketches).unwrap();
    assert_eq!(bridge.last_solid(), Some(solid));

    let arena = bridge.arena();
    assert_eq!(arena.solid_contains(solid, &Point3::new(10.0, 10.0, 2.5)), Some(false));
    assert_eq!(arena.solid_contains(solid, &Point3::new(2.0, 2.0, 2.5)), Some(true));
    assert_eq!(arena.solid_contains(solid, &Point3::new(30.0, 10.0, 10.0)), Some(true));
    assert_relative_eq!(arena.solid_bounds(solid).max.z, 12.0, epsilon = 1e-9);

    let mesh = bridge.last_solid_mesh().unwrap();
    assert!(!mesh.is_empty());
    assert_eq!(mesh.indices.len() % 3, 0);
    assert_relative_eq!(mesh.signed_volume(), arena.solid_volume(solid).unwrap(), max_relative = 1e-9);
}

#[test]
fn export_and_read_back() {
    let (_, sketches) = load();
    let mut bridge = KernelBridge::new(KernelConfig {
        stl_header: "bracket".into(),
        ..KernelConfig::default()
    });
    bridge.build_part_from_sketch(&sketches["boss"]).unwrap();
    let triangles = bridge.last_solid_mesh().unwrap().triangle_count();

    let dir = tempfile::tempdir().unwrap();
    let binary = dir.path().join("bracket.stl");
    bridge.export_stl(&binary, StlFormat::Binary).unwrap();
    let ascii = dir.path().join("bracket_ascii.stl");
    bridge.export_stl(&ascii, StlFormat::Ascii).unwrap();
    assert!(std::fs::read_to_string(&ascii).unwrap().starts_with("solid bracket"));

    let mut arena = TopologyArena::new();
    for path in [&binary, &ascii] {
        let solid = read_stl_file(&mut arena, path).unwrap();
        assert_eq!(arena.faces(brep_lite_topology::Shape::Solid(solid)).len(), triangles);
    }
}

#[test]
fn config_file_drives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kernel.json");
    std::fs::write(&path, r#"{ "sketch_depth": 2.5, "segments": 16 }"#).unwrap();
    let config = KernelConfig::from_path(&path).unwrap();

    let (_, sketches) = load();
    let mut bridge = KernelBridge::new(config);
    let solid = bridge.build_part_from_sketch(&sketches["plate"]).unwrap();
    assert_relative_eq!(bridge.arena().solid_volume(solid).unwrap(), 2000.0, epsilon = 1e-9);
}
