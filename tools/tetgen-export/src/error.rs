//! Error types for mesh export

use std::path::PathBuf;

/// Error type for a single `.smesh` export attempt.
///
/// Every variant is terminal for the export that raised it; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unknown axis mode: {0:?} (expected xyz, xzy, xz-y or -xzy)")]
    UnknownAxisMode(String),

    #[error("No mesh data found in {0:?}")]
    NoSelection(PathBuf),

    #[error("Mesh '{name}' not found")]
    MeshNotFound { name: String },

    #[error("Mesh '{name}' has no faces")]
    EmptyMesh { name: String },

    #[error("Mesh '{name}' is not a polygon mesh ({kind})")]
    WrongType { name: String, kind: String },

    #[error("Mesh '{name}' has a triangle list of {count} indices, not a multiple of 3")]
    TruncatedPrimitive { name: String, count: usize },

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Face {face} has {len} vertices, at least 3 are required")]
    DegenerateFace { face: usize, len: usize },

    #[error("Vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
