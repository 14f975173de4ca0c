// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parser for emitted polyhedron scripts using pest
//!
//! Reads the `polyhedron()` subset back into a [`Mesh`] so verification
//! can compare the emitted geometry against the source mesh without
//! involving the external engine.

use crate::geometry::{Face, Mesh};
use anyhow::{anyhow, bail, Context, Result};
use nalgebra::Point3;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "io/scad.pest"]
struct ScadParser;

/// Parse a polyhedron script into a mesh.
pub fn parse_polyhedron(source: &str) -> Result<Mesh> {
    let mut pairs = ScadParser::parse(Rule::program, source)
        .context("Failed to parse polyhedron script")?;

    let program = pairs.next().ok_or_else(|| anyhow!("Empty script"))?;

    let mut mesh = Mesh::new();
    let mut saw_polyhedron = false;

    for statement in program.into_inner() {
        if statement.as_rule() != Rule::statement {
            continue;
        }
        let inner = statement
            .into_inner()
            .next()
            .ok_or_else(|| anyhow!("Empty statement"))?;
        if inner.as_rule() == Rule::polyhedron_stmt {
            if saw_polyhedron {
                bail!("Script contains more than one polyhedron statement");
            }
            saw_polyhedron = true;
            parse_polyhedron_stmt(inner, &mut mesh)?;
        }
    }

    if !saw_polyhedron {
        bail!("Script contains no polyhedron statement");
    }

    if !mesh.indices_in_range() {
        bail!(
            "Face index out of range for {} points",
            mesh.vertex_count()
        );
    }

    Ok(mesh)
}

fn parse_polyhedron_stmt(pair: Pair<Rule>, mesh: &mut Mesh) -> Result<()> {
    let arg_list = pair
        .into_inner()
        .next()
        .ok_or_else(|| anyhow!("polyhedron() without arguments"))?;

    for arg in arg_list.into_inner() {
        let mut parts = arg.into_inner();
        let name = parts
            .next()
            .ok_or_else(|| anyhow!("Malformed argument"))?
            .as_str()
            .to_string();
        let value = parts
            .next()
            .ok_or_else(|| anyhow!("Argument {} has no value", name))?;

        match name.as_str() {
            "points" => {
                for point in value.into_inner() {
                    mesh.add_vertex(parse_point(point)?);
                }
            }
            "faces" => {
                for face in value.into_inner() {
                    mesh.add_face(parse_face(face)?);
                }
            }
            // convexity and anything else the dialect grows later
            _ => {}
        }
    }

    Ok(())
}

fn parse_point(pair: Pair<Rule>) -> Result<Point3<f64>> {
    let coords = parse_numbers(pair)?;
    if coords.len() != 3 {
        bail!("Point literal has {} coordinates, expected 3", coords.len());
    }
    Ok(Point3::new(coords[0], coords[1], coords[2]))
}

fn parse_face(pair: Pair<Rule>) -> Result<Face> {
    let values = parse_numbers(pair)?;
    if values.len() != 3 {
        bail!("Face literal has {} indices, expected 3", values.len());
    }
    let mut indices = [0usize; 3];
    for (slot, value) in indices.iter_mut().zip(&values) {
        if value.fract() != 0.0 || *value < 0.0 {
            bail!("Face index {} is not a non-negative integer", value);
        }
        *slot = *value as usize;
    }
    Ok(Face::new(indices))
}

fn parse_numbers(pair: Pair<Rule>) -> Result<Vec<f64>> {
    if pair.as_rule() != Rule::vector {
        bail!("Expected a vector literal, found {}", pair.as_str());
    }
    pair.into_inner()
        .map(|item| {
            item.as_str()
                .parse::<f64>()
                .with_context(|| format!("Invalid number: {}", item.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_SNIPPET: &str = r#"
// source: cube.stl
polyhedron(
  points=[
    [0.000000, 0.000000, 0.000000],
    [1.000000, 0.000000, 0.000000],
    [0.000000, 1.000000, 0.000000],
    [0.000000, 0.000000, 1.000000],
  ],
  faces=[
    [0, 2, 1],
    [0, 1, 3],
    [0, 3, 2],
    [1, 2, 3],
  ],
  convexity=10
);
"#;

    #[test]
    fn test_parse_tetrahedron() {
        let mesh = parse_polyhedron(CUBE_SNIPPET).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.faces[0].indices, [0, 2, 1]);
        assert_eq!(mesh.vertices[1], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let script = "polyhedron(points=[[0,0,0],[1,0,0],[0,1,0]], faces=[[0,1,7]]);";
        assert!(parse_polyhedron(script).is_err());
    }

    #[test]
    fn test_fractional_face_index_rejected() {
        let script = "polyhedron(points=[[0,0,0],[1,0,0],[0,1,0]], faces=[[0,1,1.5]]);";
        assert!(parse_polyhedron(script).is_err());
    }

    #[test]
    fn test_missing_polyhedron_rejected() {
        assert!(parse_polyhedron("// just a comment\n").is_err());
    }

    #[test]
    fn test_negative_coordinates() {
        let script = "polyhedron(points=[[-1.5, 0, 0],[1,0,0],[0,1,0]], faces=[[0,1,2]]);";
        let mesh = parse_polyhedron(script).unwrap();
        assert_eq!(mesh.vertices[0], Point3::new(-1.5, 0.0, 0.0));
    }
}
