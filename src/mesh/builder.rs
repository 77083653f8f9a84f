//! Vertex/index buffer construction.
//!
//! A mechanical transform of the final grid: no erosion logic lives here, and
//! rendering concerns (normals, lighting) stay out of scope.

use glam::Vec3;

use crate::terrain::HeightGrid;

/// Vertex and triangle-index buffers for a height grid surface.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    /// One `(x, height, z)` vertex per grid node, row-major.
    pub vertices: Vec<Vec3>,
    /// Triangle list, two triangles per grid cell, consistent winding.
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Converts a height grid into a triangulated surface.
///
/// Each 2x2 node block becomes two triangles sharing the lower-left to
/// upper-right diagonal, wound consistently so every face points the same
/// way.
pub fn build_mesh(grid: &HeightGrid) -> TerrainMesh {
    let width = grid.width();
    let depth = grid.depth();

    let mut vertices = Vec::with_capacity(grid.node_count());
    for z in 0..=depth {
        for x in 0..=width {
            vertices.push(Vec3::new(x as f32, grid.get(x, z), z as f32));
        }
    }

    let mut indices = Vec::with_capacity((width as usize) * (depth as usize) * 6);
    let stride = width + 1;
    for z in 0..depth {
        for x in 0..width {
            let vert = z * stride + x;
            indices.extend_from_slice(&[
                vert,
                vert + stride,
                vert + 1,
                vert + 1,
                vert + stride,
                vert + stride + 1,
            ]);
        }
    }

    TerrainMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_counts() {
        let grid = HeightGrid::new(4, 3);
        let mesh = build_mesh(&grid);

        assert_eq!(mesh.vertex_count(), 5 * 4);
        assert_eq!(mesh.triangle_count(), 4 * 3 * 2);
        assert_eq!(mesh.indices.len(), 4 * 3 * 6);
    }

    #[test]
    fn test_vertices_carry_grid_heights() {
        let mut grid = HeightGrid::new(2, 2);
        grid.set(1, 2, 7.5);
        let mesh = build_mesh(&grid);

        // Row-major: node (1, 2) is vertex 2 * 3 + 1.
        let v = mesh.vertices[2 * 3 + 1];
        assert_eq!(v, Vec3::new(1.0, 7.5, 2.0));
    }

    #[test]
    fn test_indices_stay_in_range() {
        let grid = HeightGrid::new(5, 5);
        let mesh = build_mesh(&grid);
        let max = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn test_first_cell_winding() {
        let grid = HeightGrid::new(2, 2);
        let mesh = build_mesh(&grid);

        // Cell (0, 0): lower triangle then upper triangle, both turning the
        // same way around the shared diagonal.
        assert_eq!(&mesh.indices[0..6], &[0, 3, 1, 1, 3, 4]);
    }

    #[test]
    fn test_consistent_winding_across_cells() {
        let grid = HeightGrid::new(3, 2);
        let mesh = build_mesh(&grid);

        // Every triangle's signed area in the xz-plane must have the same
        // sign; mixed signs would mean flipped faces.
        let mut signs = Vec::new();
        for tri in mesh.indices.chunks_exact(3) {
            let a = mesh.vertices[tri[0] as usize];
            let b = mesh.vertices[tri[1] as usize];
            let c = mesh.vertices[tri[2] as usize];
            let area = (b.x - a.x) * (c.z - a.z) - (b.z - a.z) * (c.x - a.x);
            signs.push(area > 0.0);
        }
        assert!(signs.windows(2).all(|w| w[0] == w[1]));
    }
}
