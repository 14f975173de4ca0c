// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL mesh loader
//!
//! Reads both on-disk STL encodings into a raw triangle-soup [`Mesh`]:
//! every triangle contributes three fresh vertices and one face with
//! sequential indices. No welding happens here.
//!
//! The encoding is detected from the file content, never the extension:
//! a file is binary when the u32 triangle count at offset 80 agrees with
//! the total byte length (80-byte header + count + 50 bytes per record),
//! ASCII when it opens with a `solid` header followed by `facet` records.
//! Binary files whose header happens to start with the word "solid" are
//! still classified correctly because the size check runs first.

use crate::error::ConvertError;
use crate::geometry::{Face, Mesh};
use nalgebra::Point3;
use std::fs;
use std::io::Cursor;
use std::path::Path;

const BINARY_HEADER_LEN: usize = 80;
const BINARY_COUNT_LEN: usize = 4;
const BINARY_RECORD_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Binary { triangles: usize },
    Ascii,
}

/// Load an STL file into a raw mesh.
pub fn load(path: &Path) -> Result<Mesh, ConvertError> {
    let bytes = fs::read(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = match detect_encoding(&bytes).map_err(|reason| ConvertError::format(path, reason))? {
        Encoding::Binary { triangles } => read_binary(path, &bytes, triangles)?,
        Encoding::Ascii => read_ascii(path, &bytes)?,
    };

    if mesh.is_empty() {
        return Err(ConvertError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    debug_assert!(mesh.indices_in_range());
    Ok(mesh)
}

fn detect_encoding(bytes: &[u8]) -> Result<Encoding, String> {
    // Binary first: the size equation is unambiguous.
    if bytes.len() >= BINARY_HEADER_LEN + BINARY_COUNT_LEN {
        let count_bytes: [u8; 4] = bytes[BINARY_HEADER_LEN..BINARY_HEADER_LEN + BINARY_COUNT_LEN]
            .try_into()
            .unwrap_or([0; 4]);
        let triangles = u32::from_le_bytes(count_bytes) as usize;
        let expected = BINARY_HEADER_LEN + BINARY_COUNT_LEN + triangles * BINARY_RECORD_LEN;
        if expected == bytes.len() {
            return Ok(Encoding::Binary { triangles });
        }
        if looks_ascii(bytes) {
            return Ok(Encoding::Ascii);
        }
        return Err(format!(
            "binary header declares {} triangles ({} bytes expected) but file has {} bytes, \
             and the content is not an ASCII solid",
            triangles,
            expected,
            bytes.len()
        ));
    }

    if looks_ascii(bytes) {
        return Ok(Encoding::Ascii);
    }

    Err(format!(
        "file is {} bytes, too short for a binary header and not an ASCII solid",
        bytes.len()
    ))
}

/// ASCII STL opens with `solid <name>` and, unless empty, a `facet` soon
/// after. Only the leading chunk is inspected.
fn looks_ascii(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let trimmed = head.trim_start();
    trimmed.starts_with("solid") && (trimmed.contains("facet") || trimmed.contains("endsolid"))
}

/// Decode fixed 50-byte binary records: normal (ignored), three vertices,
/// attribute byte count (ignored).
fn read_binary(path: &Path, bytes: &[u8], triangles: usize) -> Result<Mesh, ConvertError> {
    let mut mesh = Mesh::with_capacity(triangles * 3, triangles);
    let mut offset = BINARY_HEADER_LEN + BINARY_COUNT_LEN;

    for _ in 0..triangles {
        // Skip the 12-byte normal; winding alone determines orientation.
        let mut coords = [0.0f64; 9];
        for (i, coord) in coords.iter_mut().enumerate() {
            let start = offset + 12 + i * 4;
            let raw: [u8; 4] = bytes
                .get(start..start + 4)
                .and_then(|s| s.try_into().ok())
                .ok_or_else(|| ConvertError::format(path, "truncated binary record"))?;
            *coord = f32::from_le_bytes(raw) as f64;
        }

        let base = mesh.vertex_count();
        for v in 0..3 {
            mesh.add_vertex(Point3::new(
                coords[v * 3],
                coords[v * 3 + 1],
                coords[v * 3 + 2],
            ));
        }
        mesh.add_face(Face::new([base, base + 1, base + 2]));

        offset += BINARY_RECORD_LEN;
    }

    Ok(mesh)
}

/// Decode the verbose text encoding through stl_io's triangle reader.
fn read_ascii(path: &Path, bytes: &[u8]) -> Result<Mesh, ConvertError> {
    let mut cursor = Cursor::new(bytes);
    let reader = stl_io::create_stl_reader(&mut cursor)
        .map_err(|e| ConvertError::format(path, e.to_string()))?;

    let mut mesh = Mesh::new();
    for triangle in reader {
        let triangle = triangle.map_err(|e| ConvertError::format(path, e.to_string()))?;
        let base = mesh.vertex_count();
        for vertex in &triangle.vertices {
            mesh.add_vertex(Point3::new(
                vertex[0] as f64,
                vertex[1] as f64,
                vertex[2] as f64,
            ));
        }
        mesh.add_face(Face::new([base, base + 1, base + 2]));
    }

    Ok(mesh)
}
