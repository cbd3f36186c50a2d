//! Export session: configuration plus the last export location
//!
//! A session lives as long as the tool runs. Nothing is shared between
//! sessions and nothing is persisted unless the caller saves the config.

use std::path::{Path, PathBuf};

use crate::axis::AxisMode;
use crate::config::Config;
use crate::error::ExportError;
use crate::formats::{export_smesh, SMESH_EXT};
use crate::mesh::MeshSnapshot;

/// One export: where to, what, and how to orient it
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub path: PathBuf,
    pub mesh: MeshSnapshot,
    pub mode: AxisMode,
}

/// Outcome of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub vertex_count: usize,
    pub face_count: usize,
    pub mode: AxisMode,
}

#[derive(Debug, Clone, Default)]
pub struct ExportSession {
    config: Config,
    last_export_path: Option<PathBuf>,
}

impl ExportSession {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            last_export_path: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Destination of the last successful export in this session
    pub fn last_export_path(&self) -> Option<&Path> {
        self.last_export_path.as_deref()
    }

    /// Build a request, resolving the axis mode
    ///
    /// `mode` overrides the configured one. A configured mode that is not
    /// supported fails here, before anything touches the disk.
    pub fn request(
        &self,
        path: impl Into<PathBuf>,
        mesh: MeshSnapshot,
        mode: Option<AxisMode>,
    ) -> Result<ExportRequest, ExportError> {
        let mode = match mode {
            Some(mode) => mode,
            None => self.config.axis_mode()?,
        };
        Ok(ExportRequest {
            path: path.into(),
            mesh,
            mode,
        })
    }

    /// Write the requested `.smesh` file
    ///
    /// The last export path is only updated when the write succeeds.
    pub fn export(&mut self, request: ExportRequest) -> Result<ExportSummary, ExportError> {
        let ExportRequest { path, mesh, mode } = request;

        tracing::debug!("Exporting {:?} with axis mode {}", path, mode);
        export_smesh(&path, &mesh, mode)?;

        let summary = ExportSummary {
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            path: path.clone(),
            mode,
        };
        tracing::info!(
            "Exported smesh: {} vertices, {} faces, axis={} -> {:?}",
            summary.vertex_count,
            summary.face_count,
            mode,
            path
        );

        self.last_export_path = Some(path);
        Ok(summary)
    }

    /// Default destination for `input`
    ///
    /// `<stem>.smesh` in the directory of the previous export, or next to the
    /// input when nothing was exported yet.
    pub fn suggested_output(&self, input: &Path) -> PathBuf {
        let file_name = input.with_extension(SMESH_EXT);
        let file_name = file_name.file_name().unwrap_or(file_name.as_os_str());

        match self.last_export_path.as_deref().and_then(Path::parent) {
            Some(dir) => dir.join(file_name),
            None => input.with_extension(SMESH_EXT),
        }
    }
}
