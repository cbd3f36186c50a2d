//! Mesh loading (OBJ/glTF -> MeshSnapshot)

mod gltf;
mod obj;
mod types;

use anyhow::{bail, Result};
use std::path::Path;

// Re-export public API
pub use self::gltf::load_gltf;
pub use obj::load_obj;
pub use types::{Face, MeshSnapshot, MIN_FACE_VERTICES};

/// Load a mesh snapshot, picking the loader from the file extension
///
/// `name` selects an object (OBJ `o` record) or mesh (glTF) by name; without
/// it the whole OBJ file or the first glTF mesh is used.
pub fn load_mesh(input: &Path, name: Option<&str>) -> Result<MeshSnapshot> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => load_obj(input, name),
        "gltf" | "glb" => load_gltf(input, name),
        _ => bail!(
            "Unsupported mesh format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}
