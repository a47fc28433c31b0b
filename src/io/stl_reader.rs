// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL decoding (ASCII and binary) into a triangle soup
//!
//! The encoding is detected by trying to read the whole file as UTF-8: valid
//! UTF-8 is parsed as ASCII STL, anything else as binary. A binary file whose
//! bytes happen to form valid UTF-8 is therefore misread as ASCII and fails
//! with a format error; files written by [`super::StlWriter`] always carry a
//! non-UTF-8 header byte to avoid this.

use crate::config::TopologyConfig;
use crate::error::{FormatError, MeshError, Result};
use crate::geometry::Triangle;
use log::{debug, info};
use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub(crate) const HEADER_LEN: usize = 80;
pub(crate) const RECORD_LEN: usize = 50;

/// Detected STL encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StlEncoding {
    Ascii,
    Binary,
}

impl StlEncoding {
    /// UTF-8 text is ASCII STL, everything else is binary
    pub fn detect(bytes: &[u8]) -> Self {
        if std::str::from_utf8(bytes).is_ok() {
            Self::Ascii
        } else {
            Self::Binary
        }
    }
}

/// Decoded STL content
#[derive(Debug, Clone, PartialEq)]
pub struct StlDocument {
    pub encoding: StlEncoding,
    /// `solid` name for ASCII files, printable header prefix for binary files
    pub name: Option<String>,
    /// Triangle count recorded in a binary header; informational only
    pub declared_count: Option<u32>,
    pub triangles: Vec<Triangle>,
}

impl StlDocument {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// STL reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StlReader {
    parallel: bool,
}

impl Default for StlReader {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl StlReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TopologyConfig) -> Self {
        Self {
            parallel: config.parallel_decode,
        }
    }

    /// Parse binary records on the rayon pool. Output order is unaffected.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Read and decode an STL file
    pub fn read(&self, path: impl AsRef<Path>) -> Result<StlDocument> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| MeshError::io(path, e))?;
        let document = self.decode(&bytes)?;
        info!(
            "end of STL file {}: {} triangles ({:?})",
            path.display(),
            document.triangle_count(),
            document.encoding
        );
        Ok(document)
    }

    /// Decode an in-memory STL buffer
    pub fn decode(&self, bytes: &[u8]) -> Result<StlDocument> {
        let document = match StlEncoding::detect(bytes) {
            StlEncoding::Ascii => decode_ascii(&String::from_utf8_lossy(bytes))?,
            StlEncoding::Binary => decode_binary(bytes, self.parallel)?,
        };
        Ok(document)
    }
}

/// Decode an STL file into its triangles
pub fn decode(path: impl AsRef<Path>) -> Result<Vec<Triangle>> {
    StlReader::new().read(path).map(|doc| doc.triangles)
}

/// Decode an STL file, keeping encoding and header details
pub fn read_stl(path: impl AsRef<Path>) -> Result<StlDocument> {
    StlReader::new().read(path)
}

/// Decode an in-memory STL buffer into its triangles
pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<Triangle>> {
    StlReader::new().decode(bytes).map(|doc| doc.triangles)
}

fn read_point(data: &[u8]) -> Point3<f32> {
    let x = f32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let y = f32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let z = f32::from_le_bytes([data[8], data[9], data[10], data[11]]);
    Point3::new(x, y, z)
}

/// Record layout: normal (0..12, ignored), three vertices (12..48),
/// attribute byte count (48..50, ignored)
fn read_record(record: &[u8]) -> Triangle {
    Triangle::new(
        read_point(&record[12..24]),
        read_point(&record[24..36]),
        read_point(&record[36..48]),
    )
}

fn header_name(header: &[u8]) -> Option<String> {
    let text: String = header
        .iter()
        .take_while(|&&b| b != 0 && b != 0xFF)
        .map(|&b| b as char)
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn decode_binary(bytes: &[u8], parallel: bool) -> std::result::Result<StlDocument, FormatError> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(FormatError::TruncatedHeader { len: bytes.len() });
    }

    let declared = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
    let records = &bytes[HEADER_LEN + 4..];

    // The record count comes from the byte length; some writers store 0
    let triangles: Vec<Triangle> = if parallel {
        records.par_chunks_exact(RECORD_LEN).map(read_record).collect()
    } else {
        records.chunks_exact(RECORD_LEN).map(read_record).collect()
    };

    let trailing = records.len() % RECORD_LEN;
    if trailing != 0 {
        debug!("ignoring {} trailing bytes after the last full record", trailing);
    }
    if declared as usize != triangles.len() {
        debug!(
            "binary header declares {} triangles, found {}",
            declared,
            triangles.len()
        );
    }

    Ok(StlDocument {
        encoding: StlEncoding::Binary,
        name: header_name(&bytes[..HEADER_LEN]),
        declared_count: Some(declared),
        triangles,
    })
}

/// Non-blank, trimmed lines with 1-based line numbers
struct AsciiLines<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> AsciiLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }

    fn next_line(&mut self, expected: &'static str) -> std::result::Result<(usize, &'a str), FormatError> {
        for (index, line) in self.lines.by_ref() {
            let line = line.trim();
            if !line.is_empty() {
                return Ok((index + 1, line));
            }
        }
        Err(FormatError::UnexpectedEof { expected })
    }

    fn expect(&mut self, keyword: &'static str) -> std::result::Result<(usize, &'a str), FormatError> {
        let (line, text) = self.next_line(keyword)?;
        if !starts_with_keyword(text, keyword) {
            return Err(FormatError::UnexpectedLine {
                line,
                expected: keyword,
                found: text.to_string(),
            });
        }
        Ok((line, text))
    }
}

/// Token-wise, case-sensitive prefix match (`"outer loop"` matches `"outer   loop"`)
fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    let mut tokens = text.split_whitespace();
    keyword.split_whitespace().all(|k| tokens.next() == Some(k))
}

fn parse_vertex(line: usize, text: &str) -> std::result::Result<Point3<f32>, FormatError> {
    let mut tokens = text.split_whitespace();
    if tokens.next() != Some("vertex") {
        return Err(FormatError::UnexpectedLine {
            line,
            expected: "vertex",
            found: text.to_string(),
        });
    }

    let coords = tokens
        .map(|t| t.parse::<f32>())
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|e| FormatError::InvalidVertex {
            line,
            reason: e.to_string(),
        })?;

    match coords[..] {
        [x, y, z] => Ok(Point3::new(x, y, z)),
        _ => Err(FormatError::InvalidVertex {
            line,
            reason: format!("expected 3 coordinates, found {}", coords.len()),
        }),
    }
}

fn decode_ascii(text: &str) -> std::result::Result<StlDocument, FormatError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = AsciiLines::new(text);

    let (_, first) = lines
        .next_line("solid")
        .map_err(|_| FormatError::MissingSolidHeader)?;
    if !starts_with_keyword(first, "solid") {
        return Err(FormatError::MissingSolidHeader);
    }
    let name = first["solid".len()..].trim();
    let name = (!name.is_empty()).then(|| name.to_string());

    let mut triangles = Vec::new();
    loop {
        let (line, text) = lines.next_line("endsolid")?;
        if text.starts_with("endsolid") {
            break;
        }
        if !starts_with_keyword(text, "facet normal") {
            return Err(FormatError::UnexpectedLine {
                line,
                expected: "facet normal",
                found: text.to_string(),
            });
        }

        lines.expect("outer loop")?;
        let mut points = [Point3::origin(); 3];
        for point in points.iter_mut() {
            let (line, text) = lines.next_line("vertex")?;
            *point = parse_vertex(line, text)?;
        }
        lines.expect("endloop")?;
        lines.expect("endfacet")?;

        triangles.push(Triangle {
            vertices: points,
        });
    }

    Ok(StlDocument {
        encoding: StlEncoding::Ascii,
        name,
        declared_count: None,
        triangles,
    })
}
