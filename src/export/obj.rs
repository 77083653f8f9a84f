//! Wavefront OBJ export for the triangulated surface.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::mesh::TerrainMesh;

/// Errors that can occur during OBJ export.
#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Index buffer length {0} is not a multiple of 3")]
    MalformedIndices(usize),
}

/// Writes a terrain mesh as a Wavefront OBJ file.
///
/// Emits one `v x y z` line per vertex and one `f` line per triangle.
/// OBJ face indices are 1-based.
pub fn export_mesh_obj(mesh: &TerrainMesh, path: &Path) -> Result<(), ObjExportError> {
    if mesh.indices.len() % 3 != 0 {
        return Err(ObjExportError::MalformedIndices(mesh.indices.len()));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "o terrain")?;
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        writeln!(writer, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_mesh;
    use crate::terrain::HeightGrid;
    use tempfile::tempdir;

    #[test]
    fn test_export_obj() {
        let grid = HeightGrid::from_noise(4, 4, &|x: u32, z: u32| (x + z) as f32 * 0.5);
        let mesh = build_mesh(&grid);
        let dir = tempdir().unwrap();
        let path = dir.path().join("terrain.obj");

        export_mesh_obj(&mesh, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let v_lines = text.lines().filter(|l| l.starts_with("v ")).count();
        let f_lines = text.lines().filter(|l| l.starts_with("f ")).count();
        assert_eq!(v_lines, mesh.vertex_count());
        assert_eq!(f_lines, mesh.triangle_count());
    }

    #[test]
    fn test_obj_indices_are_one_based() {
        let grid = HeightGrid::new(1, 1);
        let mesh = build_mesh(&grid);
        let dir = tempdir().unwrap();
        let path = dir.path().join("cell.obj");

        export_mesh_obj(&mesh, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        // Lowest vertex reference must be 1, not 0.
        let min_ref = text
            .lines()
            .filter(|l| l.starts_with("f "))
            .flat_map(|l| l.split_whitespace().skip(1))
            .map(|t| t.parse::<u32>().unwrap())
            .min()
            .unwrap();
        assert_eq!(min_ref, 1);
    }

    #[test]
    fn test_rejects_malformed_indices() {
        let mesh = TerrainMesh {
            vertices: vec![glam::Vec3::ZERO; 3],
            indices: vec![0, 1],
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.obj");

        let result = export_mesh_obj(&mesh, &path);
        assert!(matches!(result, Err(ObjExportError::MalformedIndices(2))));
    }
}
