//! glTF/GLB mesh loading

use super::types::{Face, MeshSnapshot};
use ::gltf::mesh::Mode;
use anyhow::{Context, Result};
use glam::DVec3;
use std::path::Path;

use crate::error::ExportError;

/// Load one glTF mesh as a snapshot
///
/// Uses the mesh called `mesh_name`, or the first mesh in the file. All
/// primitives are merged into one vertex pool. Strips and fans are expanded to
/// triangles; point and line primitives are rejected.
pub fn load_gltf(input: &Path, mesh_name: Option<&str>) -> Result<MeshSnapshot> {
    let (document, buffers, _images) =
        ::gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    // Find mesh by name or use first
    let mesh = match mesh_name {
        Some(name) => document
            .meshes()
            .find(|m| m.name() == Some(name))
            .ok_or_else(|| ExportError::MeshNotFound {
                name: name.to_string(),
            })?,
        None => document
            .meshes()
            .next()
            .ok_or_else(|| ExportError::NoSelection(input.to_path_buf()))?,
    };
    let label = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh {}", mesh.index()));

    let mut vertices: Vec<DVec3> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for primitive in mesh.primitives() {
        let mode = primitive.mode();
        if matches!(
            mode,
            Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip
        ) {
            return Err(ExportError::WrongType {
                name: label,
                kind: format!("{:?} primitive", mode),
            }
            .into());
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        // Positions (required)
        let positions: Vec<DVec3> = reader
            .read_positions()
            .with_context(|| format!("No positions in primitive {} of {}", primitive.index(), label))?
            .map(|p| DVec3::from_array(p.map(f64::from)))
            .collect();

        // Indices (optional)
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let base = vertices.len();
        let triangles = assemble_triangles(&label, mode, &indices)?;
        tracing::debug!(
            "Primitive {} of {}: {:?}, {} vertices, {} triangles",
            primitive.index(),
            label,
            mode,
            positions.len(),
            triangles.len()
        );

        vertices.extend(positions);
        faces.extend(
            triangles
                .into_iter()
                .map(|t| Face::new(t.map(|i| base + i as usize))),
        );
    }

    let snapshot = MeshSnapshot::new(vertices, faces);
    Ok(match mesh.name() {
        Some(name) => snapshot.with_name(name),
        None => snapshot,
    })
}

/// Expand an index list into triangles for a triangle topology
///
/// Follows the glTF vertex ordering for strips and fans. Triangles with a
/// repeated corner (strip restarts) are dropped. A triangle list with a
/// partial last triangle is an error.
fn assemble_triangles(
    label: &str,
    mode: Mode,
    indices: &[u32],
) -> Result<Vec<[u32; 3]>, ExportError> {
    let triangles: Vec<[u32; 3]> = match mode {
        Mode::Triangles if indices.len() % 3 != 0 => {
            return Err(ExportError::TruncatedPrimitive {
                name: label.to_string(),
                count: indices.len(),
            });
        }
        Mode::Triangles => indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, w)| {
                if i % 2 == 0 {
                    [w[0], w[1], w[2]]
                } else {
                    [w[0], w[2], w[1]]
                }
            })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&hub, rest)) => rest.windows(2).map(|w| [w[0], w[1], hub]).collect(),
            None => Vec::new(),
        },
        _ => Vec::new(),
    };

    Ok(triangles
        .into_iter()
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect())
}
