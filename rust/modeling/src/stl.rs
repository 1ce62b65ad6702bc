// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL reading and writing.
//!
//! Binary layout: an 80-byte header, a little-endian `u32` triangle count,
//! then 50 bytes per triangle (normal and three vertices as `f32` triples,
//! two attribute bytes). ASCII layout: `solid NAME`, one `facet normal …
//! outer loop … endloop endfacet` block per triangle, `endsolid NAME`.
//!
//! Reading detects ASCII by a leading `solid`, except when the byte length
//! matches the binary layout exactly: some binary writers put `solid` in
//! their header too.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use brep_lite_geometry::mesh::triangle_normal;
use brep_lite_geometry::{Point3, TriangleMesh, Triangle3, Vector3};
use brep_lite_topology::{SolidKey, TopologyArena};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::mesh_gen::triangulate;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Writes the triangles of `mesh` as STL.
///
/// `name` fills the binary header (truncated to 80 bytes) or names the
/// ASCII solid.
pub fn write_stl<W: Write>(mesh: &TriangleMesh, writer: W, format: StlFormat, name: &str) -> Result<()> {
    match format {
        StlFormat::Binary => write_binary(mesh, writer, name),
        StlFormat::Ascii => write_ascii(mesh, writer, name),
    }
}

fn binary_header(name: &str) -> [u8; HEADER_LEN] {
    // A binary header must not look like the start of an ASCII file.
    let text = if name.trim_start().starts_with("solid") {
        format!("binary {name}")
    } else {
        name.to_string()
    };
    let mut header = [0u8; HEADER_LEN];
    let bytes = text.as_bytes();
    let len = bytes.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&bytes[..len]);
    header
}

fn facet_normal(t: &Triangle3) -> Vector3<f64> {
    triangle_normal(&t[0], &t[1], &t[2]).unwrap_or_else(Vector3::zeros)
}

pub fn write_binary<W: Write>(mesh: &TriangleMesh, mut writer: W, header: &str) -> Result<()> {
    let count = u32::try_from(mesh.triangle_count())
        .map_err(|_| Error::Stl(format!("{} triangles do not fit a binary STL", mesh.triangle_count())))?;
    writer.write_all(&binary_header(header))?;
    writer.write_all(&count.to_le_bytes())?;

    let mut record = [0u8; TRIANGLE_LEN];
    for triangle in mesh.triangles() {
        let normal = facet_normal(&triangle);
        let values = [normal.x, normal.y, normal.z]
            .into_iter()
            .chain(triangle.iter().flat_map(|p| [p.x, p.y, p.z]));
        for (i, value) in values.enumerate() {
            record[i * 4..i * 4 + 4].copy_from_slice(&(value as f32).to_le_bytes());
        }
        record[48..].fill(0);
        writer.write_all(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_ascii<W: Write>(mesh: &TriangleMesh, mut writer: W, name: &str) -> Result<()> {
    writeln!(writer, "solid {name}")?;
    for triangle in mesh.triangles() {
        let n = facet_normal(&triangle);
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for p in &triangle {
            writeln!(writer, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    writer.flush()?;
    Ok(())
}

/// Reads STL triangles in either format.
pub fn read_stl<R: Read>(mut reader: R) -> Result<Vec<Triangle3>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_stl(&bytes)
}

pub fn parse_stl(bytes: &[u8]) -> Result<Vec<Triangle3>> {
    if looks_ascii(bytes) {
        let text = std::str::from_utf8(bytes).map_err(|e| Error::Stl(format!("ASCII STL is not UTF-8: {e}")))?;
        parse_ascii(text)
    } else {
        parse_binary(bytes)
    }
}

fn binary_len(bytes: &[u8]) -> Option<usize> {
    let count = bytes.get(HEADER_LEN..HEADER_LEN + 4)?;
    let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize;
    Some(HEADER_LEN + 4 + count * TRIANGLE_LEN)
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    bytes[start..].starts_with(b"solid") && binary_len(bytes) != Some(bytes.len())
}

fn parse_binary(bytes: &[u8]) -> Result<Vec<Triangle3>> {
    let expected = binary_len(bytes).ok_or_else(|| {
        Error::Stl(format!("binary STL needs at least {} bytes, got {}", HEADER_LEN + 4, bytes.len()))
    })?;
    if bytes.len() < expected {
        return Err(Error::Stl(format!(
            "binary STL truncated: expected {expected} bytes, got {}",
            bytes.len()
        )));
    }

    let body = &bytes[HEADER_LEN + 4..expected];
    let triangles = body
        .chunks_exact(TRIANGLE_LEN)
        .map(|record| {
            let f = |i: usize| {
                let at = 12 + i * 4;
                f32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]]) as f64
            };
            let p = |v: usize| Point3::new(f(v * 3), f(v * 3 + 1), f(v * 3 + 2));
            [p(0), p(1), p(2)]
        })
        .collect::<Vec<_>>();
    debug!(triangles = triangles.len(), "read binary STL");
    Ok(triangles)
}

fn parse_ascii(text: &str) -> Result<Vec<Triangle3>> {
    let mut triangles = Vec::new();
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);
    let mut tokens = text.split_whitespace();
    let number = |tokens: &mut std::str::SplitWhitespace<'_>| -> Result<f64> {
        let token = tokens
            .next()
            .ok_or_else(|| Error::Stl("unexpected end of file in vertex".into()))?;
        token
            .parse::<f64>()
            .map_err(|_| Error::Stl(format!("invalid number '{token}'")))
    };

    while let Some(token) = tokens.next() {
        match token {
            "facet" => corners.clear(),
            "vertex" => {
                let x = number(&mut tokens)?;
                let y = number(&mut tokens)?;
                let z = number(&mut tokens)?;
                corners.push(Point3::new(x, y, z));
            }
            "endfacet" => {
                let [a, b, c] = corners[..] else {
                    return Err(Error::Stl(format!("facet with {} vertices", corners.len())));
                };
                triangles.push([a, b, c]);
                corners.clear();
            }
            _ => {}
        }
    }
    debug!(triangles = triangles.len(), "read ASCII STL");
    Ok(triangles)
}

/// Triangulates `solid` and writes it to `path`.
pub fn write_stl_file(
    arena: &TopologyArena,
    solid: SolidKey,
    path: impl AsRef<Path>,
    format: StlFormat,
    name: &str,
    segments: usize,
) -> Result<()> {
    let mesh = triangulate(arena, solid, segments)?;
    let file = File::create(path.as_ref())?;
    write_stl(&mesh, BufWriter::new(file), format, name)?;
    debug!(path = %path.as_ref().display(), triangles = mesh.triangle_count(), "wrote STL");
    Ok(())
}

/// Reads an STL file into a solid with one independent face per triangle.
///
/// Vertices are not merged across triangles.
pub fn read_stl_file(arena: &mut TopologyArena, path: impl AsRef<Path>) -> Result<SolidKey> {
    let file = File::open(path.as_ref())?;
    let triangles = read_stl(BufReader::new(file))?;
    if triangles.is_empty() {
        return Err(Error::Stl("file contains no triangles".into()));
    }
    Ok(arena.add_solid_from_triangles(&triangles)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tetrahedron() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let p = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        for q in &p {
            mesh.add_vertex(q);
        }
        mesh.add_triangle(0, 2, 1);
        mesh.add_triangle(0, 1, 3);
        mesh.add_triangle(0, 3, 2);
        mesh.add_triangle(1, 2, 3);
        mesh
    }

    #[test]
    fn binary_layout() {
        let mut bytes = Vec::new();
        write_stl(&tetrahedron(), &mut bytes, StlFormat::Binary, "part").unwrap();
        assert_eq!(bytes.len(), 84 + 4 * 50);
        assert_eq!(&bytes[..4], b"part");
        assert!(bytes[4..80].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 4);
        // First facet normal is -Z.
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, -1.0);
    }

    #[test]
    fn binary_header_never_reads_as_ascii() {
        let header = binary_header("solid model");
        assert!(header.starts_with(b"binary solid"));
        let long = binary_header(&"x".repeat(200));
        assert_eq!(long.len(), 80);
    }

    #[test]
    fn binary_round_trip() {
        let mesh = tetrahedron();
        let mut bytes = Vec::new();
        write_binary(&mesh, &mut bytes, "t").unwrap();
        let triangles = parse_stl(&bytes).unwrap();
        assert_eq!(triangles.len(), 4);
        assert_relative_eq!(triangles[3][2], Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn ascii_text_and_round_trip() {
        let mut bytes = Vec::new();
        write_stl(&tetrahedron(), &mut bytes, StlFormat::Ascii, "tet").unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("solid tet\n"));
        assert!(text.trim_end().ends_with("endsolid tet"));
        assert_eq!(text.matches("facet normal").count(), 4);
        assert!(text.contains("vertex 1e0 0e0 0e0"));

        let triangles = read_stl(bytes.as_slice()).unwrap();
        assert_eq!(triangles.len(), 4);
        assert_relative_eq!(triangles[0][1], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn binary_with_solid_header_is_still_binary() {
        let mut bytes = Vec::new();
        write_binary(&tetrahedron(), &mut bytes, "").unwrap();
        bytes[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&bytes).unwrap().len(), 4);
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(parse_stl(b"short"), Err(Error::Stl(_))));
        let mut bytes = Vec::new();
        write_binary(&tetrahedron(), &mut bytes, "").unwrap();
        bytes.truncate(120);
        assert!(matches!(parse_stl(&bytes), Err(Error::Stl(_))));

        let bad = "solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 zero\n";
        assert!(matches!(parse_stl(bad.as_bytes()), Err(Error::Stl(_))));
        let short = "solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid x\n";
        assert!(matches!(parse_stl(short.as_bytes()), Err(Error::Stl(_))));
    }
}
