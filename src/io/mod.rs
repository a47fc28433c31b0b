// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - STL decoding and encoding

mod stl_reader;
mod stl_writer;

pub use stl_reader::{decode, decode_bytes, read_stl, StlDocument, StlEncoding, StlReader};
pub use stl_writer::{encode, NormalMode, StlWriter, DEFAULT_HEADER, HEADER_MARKER};
