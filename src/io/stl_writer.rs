// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL encoding
//!
//! Binary layout: 80-byte header, little-endian `u32` triangle count, then
//! one 50-byte record per triangle (normal, three vertices, zero attribute).
//! The header text is truncated to 79 bytes and padded with `0x00`; the last
//! header byte is always `0xFF`, which keeps the file from ever being valid
//! UTF-8 and so from being detected as ASCII STL on the way back in.

use super::stl_reader::HEADER_LEN;
use crate::config::TopologyConfig;
use crate::error::{MeshError, Result};
use crate::geometry::Triangle;
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const DEFAULT_HEADER: &str = "Binary STL written by stl-topology";

/// Last header byte; never valid in UTF-8
pub const HEADER_MARKER: u8 = 0xFF;

/// What to write in each record's normal slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalMode {
    /// Unit normal from the winding; zero for degenerate triangles
    #[default]
    Computed,
    /// All-zero normals
    Zero,
}

impl NormalMode {
    fn normal(self, triangle: &Triangle) -> Vector3<f32> {
        match self {
            Self::Computed => triangle.normal(),
            Self::Zero => Vector3::zeros(),
        }
    }
}

/// STL writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlWriter {
    header: String,
    normals: NormalMode,
    ascii: bool,
}

impl Default for StlWriter {
    fn default() -> Self {
        Self::binary()
    }
}

impl StlWriter {
    pub fn binary() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            normals: NormalMode::Computed,
            ascii: false,
        }
    }

    pub fn ascii() -> Self {
        Self {
            ascii: true,
            ..Self::binary()
        }
    }

    pub fn from_config(config: &TopologyConfig) -> Self {
        Self {
            header: config.header.clone(),
            normals: config.normals,
            ascii: config.ascii_output,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_normals(mut self, normals: NormalMode) -> Self {
        self.normals = normals;
        self
    }

    pub fn is_ascii(&self) -> bool {
        self.ascii
    }

    /// Write `triangles` to `path`, replacing any existing file.
    /// The target is only touched once the whole file has been written.
    pub fn write(&self, path: impl AsRef<Path>, triangles: &[Triangle]) -> Result<()> {
        let path = path.as_ref();
        persist_atomically(path, |writer| self.write_to(writer, triangles))?;

        debug!(
            "wrote {} triangles to {} ({})",
            triangles.len(),
            path.display(),
            if self.ascii { "ascii" } else { "binary" }
        );
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, triangles: &[Triangle]) -> std::io::Result<()> {
        if self.ascii {
            self.write_ascii(writer, triangles)
        } else {
            self.write_binary(writer, triangles)
        }
    }

    /// Encode into an in-memory buffer
    pub fn to_bytes(&self, triangles: &[Triangle]) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, triangles)?;
        Ok(buffer)
    }

    fn header_bytes(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        let text = self.header.as_bytes();
        let len = text.len().min(HEADER_LEN - 1);
        header[..len].copy_from_slice(&text[..len]);
        header[HEADER_LEN - 1] = HEADER_MARKER;
        header
    }

    fn write_binary<W: Write>(&self, writer: &mut W, triangles: &[Triangle]) -> std::io::Result<()> {
        let count = u32::try_from(triangles.len()).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "binary STL holds at most u32::MAX triangles",
            )
        })?;

        writer.write_all(&self.header_bytes())?;
        writer.write_all(&count.to_le_bytes())?;

        for triangle in triangles {
            let normal = self.normals.normal(triangle);
            write_floats(writer, &[normal.x, normal.y, normal.z])?;
            for v in &triangle.vertices {
                write_floats(writer, &[v.x, v.y, v.z])?;
            }
            writer.write_all(&[0u8, 0u8])?;
        }

        Ok(())
    }

    fn solid_name(&self) -> &str {
        self.header.lines().next().unwrap_or("").trim()
    }

    fn write_ascii<W: Write>(&self, writer: &mut W, triangles: &[Triangle]) -> std::io::Result<()> {
        let name = self.solid_name();
        writeln!(writer, "solid {}", name)?;

        for triangle in triangles {
            let n = self.normals.normal(triangle);
            writeln!(writer, "  facet normal {} {} {}", n.x, n.y, n.z)?;
            writeln!(writer, "    outer loop")?;
            for v in &triangle.vertices {
                writeln!(writer, "      vertex {} {} {}", v.x, v.y, v.z)?;
            }
            writeln!(writer, "    endloop")?;
            writeln!(writer, "  endfacet")?;
        }

        writeln!(writer, "endsolid {}", name)
    }
}

/// Fill a temporary file next to `path`, then rename it over `path`.
/// On any error the temporary file is removed and `path` is left as it was.
fn persist_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| MeshError::io(path, e))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        fill(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| MeshError::io(path, e))?;
    }

    temp.persist(path).map_err(|e| MeshError::io(path, e.error))?;
    Ok(())
}

fn write_floats<W: Write>(writer: &mut W, values: &[f32]) -> std::io::Result<()> {
    for value in values {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Write `triangles` as binary STL with the default header and computed normals
pub fn encode(path: impl AsRef<Path>, triangles: &[Triangle]) -> Result<()> {
    StlWriter::binary().write(path, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::from_coords([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    fn f32_at(bytes: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    #[test]
    fn test_binary_layout() {
        let bytes = StlWriter::binary()
            .to_bytes(&[unit_triangle(), unit_triangle()])
            .unwrap();

        assert_eq!(bytes.len(), 80 + 4 + 2 * 50);
        assert!(bytes.starts_with(DEFAULT_HEADER.as_bytes()));
        assert_eq!(bytes[DEFAULT_HEADER.len()], 0x00);
        assert_eq!(bytes[79], HEADER_MARKER);
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 2);

        // Normal of the first record
        assert_eq!(f32_at(&bytes, 84), 0.0);
        assert_eq!(f32_at(&bytes, 92), 1.0);
        // Second vertex x
        assert_eq!(f32_at(&bytes, 84 + 24), 1.0);
        // Attribute bytes
        assert_eq!(&bytes[84 + 48..84 + 50], &[0, 0]);
    }

    #[test]
    fn test_zero_normals() {
        let bytes = StlWriter::binary()
            .with_normals(NormalMode::Zero)
            .to_bytes(&[unit_triangle()])
            .unwrap();
        assert!(bytes[84..96].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_long_header_is_truncated() {
        let bytes = StlWriter::binary()
            .with_header("x".repeat(200))
            .to_bytes(&[])
            .unwrap();
        assert_eq!(bytes.len(), 84);
        assert!(bytes[..79].iter().all(|&b| b == b'x'));
        assert_eq!(bytes[79], HEADER_MARKER);
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.stl");
        std::fs::write(&path, b"previous contents").unwrap();

        let err = persist_atomically(&path, |writer| {
            writer.write_all(b"partial")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert!(err.is_io());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous contents");
        // No temporary file is left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.stl");
        std::fs::write(&path, b"previous contents").unwrap();

        StlWriter::binary().write(&path, &[unit_triangle()]).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 84 + 50);
    }

    #[test]
    fn test_ascii_output() {
        let bytes = StlWriter::ascii()
            .with_header("part")
            .to_bytes(&[unit_triangle()])
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("solid part\n"));
        assert!(text.contains("  facet normal 0 0 1\n"));
        assert!(text.contains("      vertex 1 0 0\n"));
        assert!(text.ends_with("endsolid part\n"));
    }
}
