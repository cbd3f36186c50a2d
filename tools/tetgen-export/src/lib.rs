//! tetgen-export library
//!
//! Converts polygon meshes into Tetgen `.smesh` piecewise linear complexes.
//! The writer and axis transform are usable on their own with any
//! [`MeshSnapshot`]; the loaders and [`ExportSession`] back the CLI.

pub mod axis;
pub mod config;
pub mod error;
pub mod formats;
pub mod mesh;
pub mod session;

// Re-export key types for mesh export
pub use axis::{transform, AxisMode, AxisSwap};
pub use error::ExportError;
pub use formats::{export_smesh, render_smesh, write_smesh, SMESH_EXT};
pub use mesh::{load_gltf, load_mesh, load_obj, Face, MeshSnapshot};
pub use session::{ExportRequest, ExportSession, ExportSummary};
