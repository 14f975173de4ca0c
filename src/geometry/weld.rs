// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tolerance-based vertex welding
//!
//! Merges vertices that lie within a Euclidean distance tolerance of each
//! other, remapping face indices to the surviving vertices. Candidate
//! lookup goes through a spatial grid (cell side = tolerance) so meshes
//! with tens of thousands of triangles stay far from O(n²).

use super::{Face, Mesh};
use crate::error::ConvertError;
use ahash::AHashMap;
use nalgebra::Point3;

/// Grid cell key: coordinates divided by tolerance, floored.
type Cell = (i64, i64, i64);

/// Weld vertices of `mesh` in place and drop faces that collapse to fewer
/// than three distinct vertices. Returns the number of vertices removed.
///
/// Merge policy: scanning vertices in their original order, each vertex
/// joins the earliest previously-kept vertex within `tolerance`, or is
/// kept itself. There is no transitive chaining and no centroid averaging,
/// so output is reproducible for a given input order. Surviving vertices
/// keep their first-occurrence order and are pairwise farther apart than
/// `tolerance`, which makes the pass idempotent.
///
/// A `tolerance` of zero degenerates to exact-match welding; negative or
/// non-finite tolerances are rejected with [`ConvertError::Tolerance`].
pub fn deduplicate(mesh: &mut Mesh, tolerance: f64) -> Result<usize, ConvertError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ConvertError::Tolerance(tolerance));
    }

    if mesh.vertices.is_empty() {
        return Ok(0);
    }

    let original_count = mesh.vertices.len();
    let (new_vertices, new_indices) = if tolerance == 0.0 {
        weld_exact(&mesh.vertices)
    } else {
        weld_within(&mesh.vertices, tolerance)
    };

    // Re-index faces, dropping any that collapsed under the merge.
    let mut faces = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        let mapped = Face::new([
            new_indices[face.indices[0]],
            new_indices[face.indices[1]],
            new_indices[face.indices[2]],
        ]);
        if mapped.is_proper() {
            faces.push(mapped);
        }
    }

    mesh.vertices = new_vertices;
    mesh.faces = faces;

    Ok(original_count - mesh.vertices.len())
}

/// Exact-match welding keyed on coordinate bit patterns.
fn weld_exact(vertices: &[Point3<f64>]) -> (Vec<Point3<f64>>, Vec<usize>) {
    let mut kept: Vec<Point3<f64>> = Vec::new();
    let mut new_indices: Vec<usize> = vec![0; vertices.len()];
    let mut seen: AHashMap<[u64; 3], usize> = AHashMap::with_capacity(vertices.len());

    for (i, vertex) in vertices.iter().enumerate() {
        let key = [
            canonical_bits(vertex.x),
            canonical_bits(vertex.y),
            canonical_bits(vertex.z),
        ];
        match seen.get(&key) {
            Some(&j) => new_indices[i] = j,
            None => {
                let j = kept.len();
                seen.insert(key, j);
                kept.push(*vertex);
                new_indices[i] = j;
            }
        }
    }

    (kept, new_indices)
}

/// Grid-accelerated welding for a positive tolerance.
fn weld_within(vertices: &[Point3<f64>], tolerance: f64) -> (Vec<Point3<f64>>, Vec<usize>) {
    let mut kept: Vec<Point3<f64>> = Vec::new();
    let mut new_indices: Vec<usize> = vec![0; vertices.len()];
    let mut grid: AHashMap<Cell, Vec<usize>> = AHashMap::with_capacity(vertices.len());

    for (i, vertex) in vertices.iter().enumerate() {
        let cell = cell_of(vertex, tolerance);

        // Two points within `tolerance` are at most one cell apart on each
        // axis, so the 27-cell neighborhood covers every candidate. The
        // earliest kept index wins so ordering matches a linear scan.
        let mut winner: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    let Some(bucket) = grid.get(&neighbor) else {
                        continue;
                    };
                    for &j in bucket {
                        if (vertex - kept[j]).norm() <= tolerance
                            && winner.map_or(true, |w| j < w)
                        {
                            winner = Some(j);
                        }
                    }
                }
            }
        }

        match winner {
            Some(j) => new_indices[i] = j,
            None => {
                let j = kept.len();
                kept.push(*vertex);
                grid.entry(cell).or_default().push(j);
                new_indices[i] = j;
            }
        }
    }

    (kept, new_indices)
}

fn cell_of(point: &Point3<f64>, tolerance: f64) -> Cell {
    (
        (point.x / tolerance).floor() as i64,
        (point.y / tolerance).floor() as i64,
        (point.z / tolerance).floor() as i64,
    )
}

/// Collapse -0.0 onto +0.0 so both hash to the same key.
fn canonical_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn soup(points: &[[f64; 3]]) -> Mesh {
        let mut mesh = Mesh::new();
        for p in points {
            mesh.add_vertex(Point3::new(p[0], p[1], p[2]));
        }
        for i in 0..points.len() / 3 {
            mesh.add_face(Face::new([3 * i, 3 * i + 1, 3 * i + 2]));
        }
        mesh
    }

    #[test]
    fn test_exact_duplicates_collapse_at_zero_tolerance() {
        let mut mesh = soup(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ]);
        let removed = deduplicate(&mut mesh, 0.0).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[1].indices, [0, 2, 3]);
    }

    #[test]
    fn test_negative_zero_matches_positive_zero() {
        let mut mesh = soup(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
        ]);
        deduplicate(&mut mesh, 0.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn test_near_duplicates_merge_within_tolerance() {
        let mut mesh = soup(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1e-7, 0.0, 0.0],
            [1.0, 1e-7, 0.0],
            [5.0, 5.0, 0.0],
        ]);
        let removed = deduplicate(&mut mesh, 1e-6).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(mesh.faces[1].indices, [0, 1, 3]);
    }

    #[test]
    fn test_first_seen_wins_no_chaining() {
        // b is within tolerance of both a and c; a comes first, so b joins
        // a. c is farther than tolerance from a and stays its own vertex
        // even though it is within tolerance of b.
        let tol = 1.0;
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0)); // a
        mesh.add_vertex(Point3::new(0.9, 0.0, 0.0)); // b -> a
        mesh.add_vertex(Point3::new(1.8, 0.0, 0.0)); // c, |c-a| = 1.8 > tol
        mesh.add_face(Face::new([0, 1, 2]));

        let removed = deduplicate(&mut mesh, tol).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.vertices[1], Point3::new(1.8, 0.0, 0.0));
        // The face collapsed to two distinct indices and was dropped.
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_idempotent() {
        let mut mesh = soup(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1e-8, 0.0, 0.0],
            [1.0, 0.0, 1e-8],
            [1.0, 1.0, 0.0],
        ]);
        deduplicate(&mut mesh, 1e-6).unwrap();
        let vertices = mesh.vertices.clone();
        let faces = mesh.faces.clone();

        let removed = deduplicate(&mut mesh, 1e-6).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(mesh.vertices, vertices);
        assert_eq!(mesh.faces, faces);
    }

    #[test]
    fn test_monotonic_vertex_count() {
        for tol in [0.0, 1e-9, 1e-6, 1e-3, 0.5] {
            let mut mesh = soup(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1e-4],
                [1.0, 0.0, 0.0],
                [2.0, 2.0, 2.0],
            ]);
            let before = mesh.vertex_count();
            deduplicate(&mut mesh, tol).unwrap();
            assert!(mesh.vertex_count() <= before, "tolerance {}", tol);
        }
    }

    #[test]
    fn test_rejects_bad_tolerance() {
        let mut mesh = soup(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert!(matches!(
            deduplicate(&mut mesh, -1e-6),
            Err(ConvertError::Tolerance(_))
        ));
        assert!(matches!(
            deduplicate(&mut mesh, f64::NAN),
            Err(ConvertError::Tolerance(_))
        ));
    }
}
