//! OBJ mesh loading
//!
//! Only positions (`v`) and faces (`f`) matter for a PLC; texture coordinates
//! and normals in face references are parsed past and dropped. Polygons are
//! kept as written, without triangulation.

use super::types::{Face, MeshSnapshot};
use anyhow::{bail, Context, Result};
use glam::DVec3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ExportError;

/// Faces grouped under one `o` record
struct ObjObject {
    name: Option<String>,
    faces: Vec<Face>,
}

/// Raw OBJ contents: global vertex pool + faces per object
struct ObjData {
    positions: Vec<DVec3>,
    objects: Vec<ObjObject>,
}

/// Load an OBJ file as a mesh snapshot
///
/// With `object`, only faces of the `o` records with that name are kept, and
/// the vertex pool is reduced to the vertices they use (original order kept).
/// Without it, the whole file is one mesh.
pub fn load_obj(input: &Path, object: Option<&str>) -> Result<MeshSnapshot> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let data = parse_obj(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;

    if data.positions.is_empty() {
        return Err(ExportError::NoSelection(input.to_path_buf()).into());
    }

    let mesh = match object {
        None => {
            let name = match data.objects.as_slice() {
                [only] => only.name.clone(),
                _ => None,
            };
            let faces = data.objects.into_iter().flat_map(|o| o.faces).collect();
            MeshSnapshot {
                name,
                vertices: data.positions,
                faces,
            }
        }
        Some(wanted) => select_object(data, wanted)?,
    };

    tracing::debug!(
        "Loaded OBJ {:?}: {} vertices, {} faces",
        input,
        mesh.vertex_count(),
        mesh.face_count()
    );

    Ok(mesh)
}

/// Keep only the faces of object `wanted` and the vertices they reference
fn select_object(data: ObjData, wanted: &str) -> Result<MeshSnapshot> {
    let matching: Vec<ObjObject> = data
        .objects
        .into_iter()
        .filter(|o| o.name.as_deref() == Some(wanted))
        .collect();

    if matching.is_empty() {
        return Err(ExportError::MeshNotFound {
            name: wanted.to_string(),
        }
        .into());
    }

    let faces: Vec<Face> = matching.into_iter().flat_map(|o| o.faces).collect();
    if faces.is_empty() {
        return Err(ExportError::EmptyMesh {
            name: wanted.to_string(),
        }
        .into());
    }

    // Out-of-range references must be reported before remapping
    let full = MeshSnapshot::new(data.positions, faces);
    full.validate()?;

    let mut remap: Vec<Option<usize>> = vec![None; full.vertex_count()];
    for face in &full.faces {
        for &i in &face.vertices {
            remap[i] = Some(0);
        }
    }

    let mut vertices = Vec::new();
    for (slot, position) in remap.iter_mut().zip(&full.vertices) {
        if slot.is_some() {
            *slot = Some(vertices.len());
            vertices.push(*position);
        }
    }

    let faces = full
        .faces
        .iter()
        .map(|f| Face::new(f.vertices.iter().filter_map(|&i| remap[i]).collect::<Vec<_>>()))
        .collect();

    Ok(MeshSnapshot::new(vertices, faces).with_name(wanted))
}

fn parse_obj<R: BufRead>(reader: R) -> Result<ObjData> {
    let mut positions: Vec<DVec3> = Vec::new();
    let mut objects = vec![ObjObject {
        name: None,
        faces: Vec::new(),
    }];

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    bail!("line {}: vertex needs 3 coordinates", line_no);
                }
                let mut xyz = [0.0f64; 3];
                for (c, s) in xyz.iter_mut().zip(&parts[1..4]) {
                    *c = s
                        .parse()
                        .with_context(|| format!("line {}: invalid coordinate {:?}", line_no, s))?;
                }
                positions.push(DVec3::from_array(xyz));
            }
            "f" => {
                let vertices = parts[1..]
                    .iter()
                    .map(|s| parse_obj_vertex(s, positions.len()))
                    .collect::<Option<Vec<usize>>>()
                    .with_context(|| format!("line {}: invalid face {:?}", line_no, line))?;
                if let Some(current) = objects.last_mut() {
                    current.faces.push(Face::new(vertices));
                }
            }
            "o" => {
                let name = parts[1..].join(" ");
                objects.push(ObjObject {
                    name: (!name.is_empty()).then_some(name),
                    faces: Vec::new(),
                });
            }
            _ => {}
        }
    }

    // Drop the implicit leading object if every face came after an `o`
    if objects.len() > 1 && objects[0].faces.is_empty() {
        objects.remove(0);
    }

    Ok(ObjData { positions, objects })
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// Returns the 0-based position index. Negative indices count back from the
/// most recent vertex (`-1` is the last one read so far).
fn parse_obj_vertex(s: &str, vertex_count: usize) -> Option<usize> {
    let vi: i64 = s.split('/').next()?.parse().ok()?;

    match vi {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(), // OBJ indices are 1-based
        i => vertex_count.checked_sub(usize::try_from(i.unsigned_abs()).ok()?),
    }
}
