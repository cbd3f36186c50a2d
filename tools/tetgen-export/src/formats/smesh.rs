//! Tetgen `.smesh` writer
//!
//! Layout (ASCII, `\n` line endings):
//!
//! ```text
//! <numVertices> 3 0 0
//! <i> <x> <y> <z>              one line per vertex, i = 1..=numVertices
//! <numFaces> 0
//! <k> <v1> <v2> ... <vk>       one line per face, 1-based, trailing space
//! 0                            holes
//! 0                            regions
//! ```
//!
//! No attributes, boundary markers, holes or regions are ever emitted.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::axis::{transform, AxisMode};
use crate::error::ExportError;
use crate::mesh::MeshSnapshot;

/// Fractional digits kept for every coordinate
pub const COORD_DECIMALS: usize = 6;

/// Write `mesh` as `.smesh` text to `w`
///
/// The snapshot is validated before anything is written, so a malformed mesh
/// leaves `w` untouched.
pub fn write_smesh<W: Write>(
    w: &mut W,
    mesh: &MeshSnapshot,
    mode: AxisMode,
) -> Result<(), ExportError> {
    mesh.validate()?;

    // Node list: count, dimension, attributes, boundary markers
    writeln!(w, "{} 3 0 0", mesh.vertex_count())?;
    for (i, v) in mesh.vertices.iter().enumerate() {
        let v = transform(*v, mode);
        writeln!(
            w,
            "{} {} {} {}",
            i + 1,
            format_coord(v.x),
            format_coord(v.y),
            format_coord(v.z)
        )?;
    }

    // Facet list: count, boundary markers
    writeln!(w, "{} 0", mesh.face_count())?;
    for face in &mesh.faces {
        write!(w, "{} ", face.len())?;
        for &index in &face.vertices {
            write!(w, "{} ", index + 1)?;
        }
        writeln!(w)?;
    }

    // Holes, regions
    w.write_all(b"0\n0\n")?;
    w.flush()?;

    Ok(())
}

/// Render `mesh` to an in-memory string
pub fn render_smesh(mesh: &MeshSnapshot, mode: AxisMode) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_smesh(&mut buf, mesh, mode)?;
    // Only ASCII digits, signs, dots, spaces and newlines are written
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `mesh` to `output` as `.smesh`
///
/// Data goes to a temporary file next to `output` that replaces it only after
/// a complete, flushed write. On error the temporary file is removed and any
/// existing `output` is left as it was.
///
/// The written file keeps the permissions of the `output` it replaces, or
/// gets the same mode a plain create would give when `output` is new.
pub fn export_smesh(output: &Path, mesh: &MeshSnapshot, mode: AxisMode) -> Result<(), ExportError> {
    // Checked here as well as in `write_smesh` so a bad mesh never creates a temp file
    mesh.validate()?;

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let tmp = create_temp(dir)?;
    match fs::metadata(output) {
        Ok(existing) => tmp.as_file().set_permissions(existing.permissions())?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut writer = BufWriter::new(tmp);
    write_smesh(&mut writer, mesh, mode)?;

    let tmp = writer.into_inner().map_err(|e| e.into_error())?;
    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| e.error)?;

    Ok(())
}

/// Temporary file in `dir` created with the umask-filtered default mode
#[cfg(unix)]
fn create_temp(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_temp(dir: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}

/// Round to [`COORD_DECIMALS`] places and render in plain decimal
///
/// The exact binary value is rounded by the formatter, re-read, then printed
/// in its shortest form. Integral values keep a trailing `.0`, negative zero
/// stays `-0.0`, and large magnitudes never switch to exponent notation.
pub fn format_coord(value: f64) -> String {
    let fixed = format!("{:.*}", COORD_DECIMALS, value);
    let rounded: f64 = fixed.parse().unwrap_or(value);

    let mut s = rounded.to_string();
    if rounded.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;
    use glam::DVec3;
    use tempfile::tempdir;

    fn triangle() -> MeshSnapshot {
        MeshSnapshot::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![Face::new([0, 1, 2])],
        )
    }

    #[test]
    fn test_single_triangle() {
        let text = render_smesh(&triangle(), AxisMode::Identity).unwrap();
        assert_eq!(
            text,
            "3 3 0 0\n\
             1 0.0 0.0 0.0\n\
             2 1.0 0.0 0.0\n\
             3 0.0 1.0 0.0\n\
             1 0\n\
             3 1 2 3 \n\
             0\n\
             0\n"
        );
    }

    #[test]
    fn test_swap_yz_negate_y() {
        let mesh = MeshSnapshot::new(vec![DVec3::new(1.0, 2.0, 3.0)], vec![]);
        let text = render_smesh(&mesh, AxisMode::SwapYzNegateY).unwrap();
        assert_eq!(text, "1 3 0 0\n1 1.0 3.0 -2.0\n0 0\n0\n0\n");
    }

    #[test]
    fn test_every_mode_on_vertex_block() {
        let mesh = MeshSnapshot::new(vec![DVec3::new(1.0, 2.0, 3.0)], vec![]);
        let line = |mode| {
            render_smesh(&mesh, mode)
                .unwrap()
                .lines()
                .nth(1)
                .unwrap()
                .to_string()
        };
        assert_eq!(line(AxisMode::Identity), "1 1.0 2.0 3.0");
        assert_eq!(line(AxisMode::SwapYz), "1 1.0 3.0 2.0");
        assert_eq!(line(AxisMode::SwapYzNegateY), "1 1.0 3.0 -2.0");
        assert_eq!(line(AxisMode::SwapYzNegateX), "1 -1.0 3.0 2.0");
    }

    #[test]
    fn test_rounding_to_six_places() {
        let mesh = MeshSnapshot::new(
            vec![
                DVec3::new(0.1234564, 0.1234565, 1.0),
                DVec3::new(0.1234566, 1234.5678915, -1e-9),
            ],
            vec![],
        );
        let text = render_smesh(&mesh, AxisMode::Identity).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // 0.1234565 is stored just below the midpoint
        assert_eq!(lines[1], "1 0.123456 0.123456 1.0");
        assert_eq!(lines[2], "2 0.123457 1234.567892 -0.0");
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(0.0), "0.0");
        assert_eq!(format_coord(-2.0), "-2.0");
        assert_eq!(format_coord(0.5), "0.5");
        assert_eq!(format_coord(0.1 + 0.2), "0.3");
        assert_eq!(format_coord(1e-5), "0.00001");
        assert_eq!(format_coord(2.5e-7), "0.0");
        assert_eq!(format_coord(1e21), "1000000000000000000000.0");
        assert_eq!(format_coord(0.1f32 as f64), "0.1");
    }

    #[test]
    fn test_polygon_faces_and_counts() {
        let mesh = MeshSnapshot::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(0.5, 0.5, 1.0),
            ],
            vec![
                Face::new([3, 2, 1, 0]),
                Face::new([0, 1, 4]),
                Face::new([1, 2, 4]),
                Face::new([2, 3, 4]),
                Face::new([3, 0, 4]),
            ],
        );
        let text = render_smesh(&mesh, AxisMode::Identity).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "5 3 0 0");
        for (i, line) in lines[1..=5].iter().enumerate() {
            let idx: usize = line.split(' ').next().unwrap().parse().unwrap();
            assert_eq!(idx, i + 1);
        }
        assert_eq!(lines[6], "5 0");

        for (face, line) in mesh.faces.iter().zip(&lines[7..12]) {
            assert!(line.ends_with(' '), "face line must keep trailing space");
            let nums: Vec<usize> = line
                .split_whitespace()
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(nums[0], nums.len() - 1);
            let expected: Vec<usize> = face.vertices.iter().map(|i| i + 1).collect();
            assert_eq!(&nums[1..], expected.as_slice());
            assert!(nums[1..].iter().all(|&i| (1..=5).contains(&i)));
        }
        assert_eq!(&lines[12..], &["0", "0"]);
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn test_output_is_deterministic() {
        let a = render_smesh(&triangle(), AxisMode::SwapYzNegateX).unwrap();
        let b = render_smesh(&triangle(), AxisMode::SwapYzNegateX).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_mesh() {
        let text = render_smesh(&MeshSnapshot::default(), AxisMode::default()).unwrap();
        assert_eq!(text, "0 3 0 0\n0 0\n0\n0\n");
    }

    #[test]
    fn test_bad_index_writes_nothing() {
        let mut mesh = triangle();
        mesh.faces.push(Face::new([0, 2, 3]));

        let mut buf = Vec::new();
        let err = write_smesh(&mut buf, &mesh, AxisMode::Identity).unwrap_err();
        assert!(matches!(err, ExportError::IndexOutOfRange { index: 3, .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("tri.smesh");

        export_smesh(&path, &triangle(), AxisMode::Identity).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_smesh(&triangle(), AxisMode::Identity).unwrap());
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_export_keeps_previous_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tri.smesh");
        std::fs::write(&path, "previous").unwrap();

        let mut mesh = triangle();
        mesh.faces.push(Face::new([7, 8, 9]));
        assert!(export_smesh(&path, &mesh, AxisMode::Identity).is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_export_uses_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("Failed to create temp dir");
        let exported = dir.path().join("tri.smesh");
        let plain = dir.path().join("plain.txt");

        export_smesh(&exported, &triangle(), AxisMode::Identity).unwrap();
        std::fs::write(&plain, "plain").unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&exported), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tri.smesh");
        std::fs::write(&path, "previous").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        export_smesh(&path, &triangle(), AxisMode::Identity).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("3 3 0 0\n"));
    }

    /// Writer that fails after a fixed number of bytes
    struct FailingWriter {
        remaining: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut w = FailingWriter { remaining: 10 };
        let err = write_smesh(&mut w, &triangle(), AxisMode::Identity).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
