//! Triangulated surface built from the height grid.

mod builder;

pub use builder::{build_mesh, TerrainMesh};
