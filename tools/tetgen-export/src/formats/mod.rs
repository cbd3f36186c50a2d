//! Output format definitions for Tetgen input files

mod smesh;

pub use smesh::{export_smesh, format_coord, render_smesh, write_smesh, COORD_DECIMALS};

/// File extension for piecewise linear complex files
pub const SMESH_EXT: &str = "smesh";
