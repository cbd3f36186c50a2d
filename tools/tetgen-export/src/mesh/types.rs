//! Mesh snapshot types

use glam::DVec3;

use crate::error::ExportError;

/// Smallest number of corners a facet can have
pub const MIN_FACE_VERTICES: usize = 3;

/// A polygonal face: vertex indices (0-based) in winding order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub vertices: Vec<usize>,
}

impl Face {
    pub fn new(vertices: impl Into<Vec<usize>>) -> Self {
        Self {
            vertices: vertices.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Read-only view of a mesh taken at export time
///
/// Faces refer to vertices by their position in `vertices`. The snapshot is
/// never mutated by the writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSnapshot {
    /// Object name, if the source had one
    pub name: Option<String>,
    pub vertices: Vec<DVec3>,
    pub faces: Vec<Face>,
}

impl MeshSnapshot {
    pub fn new(vertices: Vec<DVec3>, faces: Vec<Face>) -> Self {
        Self {
            name: None,
            vertices,
            faces,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check the invariants the writer relies on
    ///
    /// - every coordinate is finite
    /// - every face has at least [`MIN_FACE_VERTICES`] corners
    /// - every face index is `< vertex_count()`
    pub fn validate(&self) -> Result<(), ExportError> {
        if let Some(index) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(ExportError::NonFiniteVertex { index });
        }

        let vertex_count = self.vertex_count();
        for (face, f) in self.faces.iter().enumerate() {
            if f.len() < MIN_FACE_VERTICES {
                return Err(ExportError::DegenerateFace { face, len: f.len() });
            }
            if let Some(&index) = f.vertices.iter().find(|&&i| i >= vertex_count) {
                return Err(ExportError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }

    /// Fan-triangulate every face with more than three corners
    ///
    /// Assumes convex polygons. Face order and winding are preserved; vertices
    /// are untouched.
    pub fn triangulated(&self) -> MeshSnapshot {
        let mut faces = Vec::with_capacity(self.faces.len());
        for face in &self.faces {
            let v = &face.vertices;
            if v.len() <= MIN_FACE_VERTICES {
                faces.push(face.clone());
                continue;
            }
            for i in 1..v.len() - 1 {
                faces.push(Face::new([v[0], v[i], v[i + 1]]));
            }
        }

        MeshSnapshot {
            name: self.name.clone(),
            vertices: self.vertices.clone(),
            faces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshSnapshot {
        MeshSnapshot::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![Face::new([0, 1, 2, 3])],
        )
    }

    #[test]
    fn test_valid_mesh() {
        assert!(quad().validate().is_ok());
        assert!(MeshSnapshot::default().validate().is_ok());
    }

    #[test]
    fn test_index_out_of_range() {
        let mut mesh = quad();
        mesh.faces.push(Face::new([0, 1, 4]));

        match mesh.validate() {
            Err(ExportError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            }) => {
                assert_eq!(face, 1);
                assert_eq!(index, 4);
                assert_eq!(vertex_count, 4);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_face() {
        let mut mesh = quad();
        mesh.faces.insert(0, Face::new([0, 1]));
        assert!(matches!(
            mesh.validate(),
            Err(ExportError::DegenerateFace { face: 0, len: 2 })
        ));
    }

    #[test]
    fn test_non_finite_vertex() {
        let mut mesh = quad();
        mesh.vertices[2].y = f64::NAN;
        assert!(matches!(
            mesh.validate(),
            Err(ExportError::NonFiniteVertex { index: 2 })
        ));

        mesh.vertices[2].y = f64::INFINITY;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_triangulated_quad() {
        let mesh = quad().with_name("Plane").triangulated();
        assert_eq!(mesh.name.as_deref(), Some("Plane"));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(
            mesh.faces,
            vec![Face::new([0, 1, 2]), Face::new([0, 2, 3])]
        );
    }

    #[test]
    fn test_triangulated_keeps_order() {
        let mut mesh = quad();
        mesh.vertices.push(DVec3::new(0.5, 2.0, 0.0));
        mesh.faces.insert(0, Face::new([3, 2, 4]));
        mesh.faces.push(Face::new([4, 3, 0, 1, 2]));

        let tri = mesh.triangulated();
        assert_eq!(
            tri.faces,
            vec![
                Face::new([3, 2, 4]),
                Face::new([0, 1, 2]),
                Face::new([0, 2, 3]),
                Face::new([4, 3, 0]),
                Face::new([4, 0, 1]),
                Face::new([4, 1, 2]),
            ]
        );
        assert!(tri.faces.iter().all(|f| f.len() == 3));
    }
}
