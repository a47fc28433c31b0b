// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for STL decoding, encoding and topology construction

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the engine API
#[derive(Debug, Error)]
pub enum MeshError {
    /// The file could not be opened, read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is neither valid ASCII nor valid binary STL
    #[error("malformed STL: {0}")]
    Format(#[from] FormatError),
}

impl MeshError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Grammar or layout violations found while decoding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("expected `solid` on the first line")]
    MissingSolidHeader,

    #[error("line {line}: expected `{expected}`, found `{found}`")]
    UnexpectedLine {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("unexpected end of file, expected `{expected}`")]
    UnexpectedEof { expected: &'static str },

    #[error("line {line}: invalid vertex ({reason})")]
    InvalidVertex { line: usize, reason: String },

    #[error("binary STL needs at least 84 bytes of header and count, got {len}")]
    TruncatedHeader { len: usize },
}

pub type Result<T> = std::result::Result<T, MeshError>;
