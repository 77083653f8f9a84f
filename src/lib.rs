//! Procedural terrain generator with particle-based hydraulic erosion.
//!
//! This crate generates a heightmap from fractal noise, then sculpts it by
//! tracing simulated water droplets across the grid. Each droplet follows the
//! local gradient, picking up sediment on downhill stretches and depositing it
//! in pits, which carves channels and smooths basins the way rainfall does.
//! The final grid can be triangulated into a mesh and exported as PNG, RAW or
//! OBJ.

pub mod noise;
pub mod terrain;
pub mod erosion;
pub mod mesh;
pub mod export;
pub mod pipeline;

pub use noise::{FractalNoise, FractalNoiseConfig, NoiseSource};
pub use terrain::HeightGrid;
pub use erosion::{ConfigError, ErosionConfig, ErosionEngine, ErosionStats};
pub use mesh::{build_mesh, TerrainMesh};
pub use pipeline::{ErosionStage, GenerationStage, HeightmapStage, Pipeline, StageConfig};
