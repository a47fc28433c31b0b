// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Round-trip encode/decode tests, cross-checked against stl_io

use anyhow::Result;
use std::fs::File;
use std::io::Write;
use stl_topology::geometry::Primitive;
use stl_topology::io::{read_stl, NormalMode, StlEncoding, StlWriter, HEADER_MARKER};
use stl_topology::{decode, encode, load, save, FormatError, MeshError, TopologyConfig, Triangle};
use tempfile::NamedTempFile;

fn octahedron_soup() -> Vec<Triangle> {
    Primitive::octahedron(2.5).triangles()
}

#[test]
fn test_binary_roundtrip_is_exact() -> Result<()> {
    let triangles = octahedron_soup();
    let file = NamedTempFile::with_suffix(".stl")?;

    encode(file.path(), &triangles)?;
    let metadata = std::fs::metadata(file.path())?;
    assert_eq!(metadata.len(), 84 + 50 * triangles.len() as u64);

    let document = read_stl(file.path())?;
    assert_eq!(document.encoding, StlEncoding::Binary);
    assert_eq!(document.declared_count, Some(triangles.len() as u32));
    assert_eq!(document.triangles, triangles);

    Ok(())
}

#[test]
fn test_ascii_roundtrip() -> Result<()> {
    let triangles = Primitive::cube(4.0).triangles();
    let file = NamedTempFile::with_suffix(".stl")?;

    StlWriter::ascii()
        .with_header("cube")
        .write(file.path(), &triangles)?;

    let document = read_stl(file.path())?;
    assert_eq!(document.encoding, StlEncoding::Ascii);
    assert_eq!(document.name.as_deref(), Some("cube"));
    assert_eq!(document.triangles, triangles);

    Ok(())
}

#[test]
fn test_topology_survives_save_and_load() -> Result<()> {
    let original = stl_topology::MeshTopology::from_triangles(&octahedron_soup());
    let file = NamedTempFile::with_suffix(".stl")?;

    save(file.path(), original.topology())?;
    let reloaded = load(file.path())?;

    assert_eq!(reloaded, original);
    Ok(())
}

#[test]
fn test_stl_io_reads_our_binary_output() -> Result<()> {
    let triangles = Primitive::cube(1.0).triangles();
    let file = NamedTempFile::with_suffix(".stl")?;
    encode(file.path(), &triangles)?;

    let mesh = stl_io::read_stl(&mut File::open(file.path())?)?;
    println!(
        "stl_io: {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    );

    assert_eq!(mesh.faces.len(), triangles.len());
    assert_eq!(mesh.vertices.len(), 8);

    for (face, triangle) in mesh.faces.iter().zip(&triangles) {
        let normal = triangle.normal();
        assert_eq!([face.normal[0], face.normal[1], face.normal[2]], [normal.x, normal.y, normal.z]);
        for (index, expected) in face.vertices.iter().zip(&triangle.vertices) {
            let v = &mesh.vertices[*index];
            assert_eq!([v[0], v[1], v[2]], [expected.x, expected.y, expected.z]);
        }
    }

    Ok(())
}

#[test]
fn test_decodes_stl_io_binary_output() -> Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let triangles = octahedron_soup();
    let stl_triangles: Vec<StlTriangle> = triangles
        .iter()
        .map(|t| {
            let n = t.normal();
            let [a, b, c] = t.vertices;
            StlTriangle {
                normal: Normal::new([n.x, n.y, n.z]),
                vertices: [
                    StlVertex::new([a.x, a.y, a.z]),
                    StlVertex::new([b.x, b.y, b.z]),
                    StlVertex::new([c.x, c.y, c.z]),
                ],
            }
        })
        .collect();

    let file = NamedTempFile::with_suffix(".stl")?;
    {
        let mut out = File::create(file.path())?;
        stl_io::write_stl(&mut out, stl_triangles.iter())?;
    }

    let document = read_stl(file.path())?;
    assert_eq!(document.encoding, StlEncoding::Binary);
    assert_eq!(document.triangles, triangles);

    Ok(())
}

#[test]
fn test_header_marker_forces_binary_detection() -> Result<()> {
    // Records whose bytes are all ASCII would otherwise look like text
    let triangles = vec![Triangle::from_coords([
        [2.0, 2.0, 2.0],
        [2.0, 2.0, 2.0],
        [2.0, 2.0, 2.0],
    ])];
    let bytes = StlWriter::binary()
        .with_header("solid trap")
        .with_normals(NormalMode::Zero)
        .to_bytes(&triangles)?;

    assert_eq!(bytes[79], HEADER_MARKER);
    assert!(std::str::from_utf8(&bytes).is_err());
    assert_eq!(StlEncoding::detect(&bytes), StlEncoding::Binary);
    assert_eq!(stl_topology::io::decode_bytes(&bytes)?, triangles);

    Ok(())
}

#[test]
fn test_truncated_binary_tail_is_ignored() -> Result<()> {
    let triangles = octahedron_soup();
    let mut bytes = StlWriter::binary().to_bytes(&triangles[..2])?;
    bytes.truncate(84 + 50 + 30);

    let file = NamedTempFile::with_suffix(".stl")?;
    std::fs::write(file.path(), &bytes)?;

    let decoded = decode(file.path())?;
    assert_eq!(decoded, vec![triangles[0]]);
    Ok(())
}

#[test]
fn test_missing_endloop_is_format_error() -> Result<()> {
    let mut file = NamedTempFile::with_suffix(".stl")?;
    write!(
        file,
        "solid broken\n\
         facet normal 0 0 1\n\
         outer loop\n\
         vertex 0 0 0\n\
         vertex 1 0 0\n\
         vertex 0 1 0\n\
         endfacet\n\
         endsolid broken\n"
    )?;
    file.flush()?;

    let err = decode(file.path()).unwrap_err();
    assert!(err.is_format());
    assert!(matches!(
        err,
        MeshError::Format(FormatError::UnexpectedLine { line: 7, expected: "endloop", .. })
    ));
    Ok(())
}

#[test]
fn test_unwritable_path_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("out.stl");

    let err = encode(&path, &octahedron_soup()).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_config_file_drives_load_and_write() -> Result<()> {
    let mut config_file = NamedTempFile::with_suffix(".toml")?;
    writeln!(config_file, "weld_tolerance = 0.001")?;
    writeln!(config_file, "header = \"from config\"")?;
    writeln!(config_file, "normals = \"zero\"")?;
    config_file.flush()?;

    let config = TopologyConfig::from_file(config_file.path())?;
    assert_eq!(config.normals, NormalMode::Zero);
    assert!(!config.ascii_output);

    let jittered = vec![
        Triangle::from_coords([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
        Triangle::from_coords([[1.0, 0.0005, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
    ];
    let stl_file = NamedTempFile::with_suffix(".stl")?;
    StlWriter::from_config(&config).write(stl_file.path(), &jittered)?;

    let bytes = std::fs::read(stl_file.path())?;
    assert!(bytes.starts_with(b"from config\0"));
    assert!(bytes[84..96].iter().all(|&b| b == 0));

    let mesh = stl_topology::MeshTopology::load(stl_file.path(), &config)?;
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.edge_count(), 5);

    Ok(())
}
