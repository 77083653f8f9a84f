//! Generation stage trait and pipeline orchestration.

use std::collections::HashMap;
use thiserror::Error;

use crate::erosion::{ErosionConfig, ErosionEngine};
use crate::noise::{FractalNoise, FractalNoiseConfig};
use crate::terrain::HeightGrid;

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Initial heightmap generation from noise.
    Heightmap,
    /// Particle-based hydraulic erosion.
    Erosion,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heightmap => "heightmap",
            StageId::Erosion => "erosion",
        }
    }
}

/// Configuration passed to each generation stage.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Noise configuration for terrain generation.
    pub noise: FractalNoiseConfig,
    /// Additional stage-specific parameters.
    pub params: HashMap<String, f32>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            noise: FractalNoiseConfig::default(),
            params: HashMap::new(),
        }
    }
}

impl StageConfig {
    /// Creates a new configuration with the given noise settings.
    pub fn with_noise(noise: FractalNoiseConfig) -> Self {
        Self {
            noise,
            params: HashMap::new(),
        }
    }

    /// Sets a stage parameter.
    pub fn set_param(&mut self, key: &str, value: f32) -> &mut Self {
        self.params.insert(key.to_string(), value);
        self
    }

    /// Gets a stage parameter, returning a default if not set.
    pub fn get_param(&self, key: &str, default: f32) -> f32 {
        self.params.get(key).copied().unwrap_or(default)
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the height grid in some way, building upon previous
/// stages. The trait-based design allows for modular composition and easy
/// extension with new generation phases.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the grid in place.
    fn execute(&self, grid: &mut HeightGrid, config: &StageConfig) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: StageConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: StageConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given grid.
    pub fn run(&self, grid: &mut HeightGrid) -> Result<(), PipelineError> {
        let mut completed: Vec<StageId> = Vec::new();

        for stage in &self.stages {
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            stage.execute(grid, &self.config)?;
            completed.push(stage.id());
        }

        Ok(())
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `grid` - The grid to generate
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        grid: &mut HeightGrid,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            stage.execute(grid, &self.config)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Heightmap generation stage using fractal noise.
pub struct HeightmapStage;

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(&self, grid: &mut HeightGrid, config: &StageConfig) -> Result<(), PipelineError> {
        let source = FractalNoise::new(config.noise.clone());
        grid.fill_from_noise(&source);
        Ok(())
    }
}

/// Hydraulic erosion stage driving the droplet engine.
pub struct ErosionStage {
    config: ErosionConfig,
}

impl ErosionStage {
    /// Creates the stage with the given erosion parameters.
    pub fn new(config: ErosionConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for ErosionStage {
    fn id(&self) -> StageId {
        StageId::Erosion
    }

    fn name(&self) -> &str {
        "Hydraulic Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, grid: &mut HeightGrid, _config: &StageConfig) -> Result<(), PipelineError> {
        let engine = ErosionEngine::new(self.config.clone())
            .map_err(|e| PipelineError::StageFailed(self.name().to_string(), e.to_string()))?;
        engine.run(grid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_runs_stages_in_order() {
        let mut grid = HeightGrid::new(16, 16);
        let mut pipeline = Pipeline::new(StageConfig::default());
        pipeline.add_stage(HeightmapStage);
        pipeline.add_stage(ErosionStage::new(ErosionConfig {
            droplet_count: 100,
            ..Default::default()
        }));

        assert_eq!(pipeline.stage_count(), 2);
        pipeline.run(&mut grid).unwrap();

        // Heightmap stage filled the grid; erosion kept it sane.
        assert!(grid.heights().iter().any(|&h| h != 0.0));
        assert!(grid.heights().iter().all(|&h| h >= 0.0));
    }

    #[test]
    fn test_missing_dependency_is_rejected() {
        let mut grid = HeightGrid::new(8, 8);
        let mut pipeline = Pipeline::new(StageConfig::default());
        pipeline.add_stage(ErosionStage::new(ErosionConfig::default()));

        let result = pipeline.run(&mut grid);
        assert!(matches!(result, Err(PipelineError::MissingDependency(_, _))));
    }

    #[test]
    fn test_invalid_erosion_config_fails_stage() {
        let mut grid = HeightGrid::new(8, 8);
        let mut pipeline = Pipeline::new(StageConfig::default());
        pipeline.add_stage(HeightmapStage);
        pipeline.add_stage(ErosionStage::new(ErosionConfig {
            radius: -1.0,
            ..Default::default()
        }));

        let result = pipeline.run(&mut grid);
        assert!(matches!(result, Err(PipelineError::StageFailed(_, _))));
    }

    #[test]
    fn test_stage_params() {
        let mut config = StageConfig::default();
        config.set_param("sea_level", 0.5);
        assert_eq!(config.get_param("sea_level", 0.0), 0.5);
        assert_eq!(config.get_param("missing", 1.25), 1.25);
    }

    #[test]
    fn test_callbacks_fire_per_stage() {
        let mut grid = HeightGrid::new(8, 8);
        let mut pipeline = Pipeline::new(StageConfig::default());
        pipeline.add_stage(HeightmapStage);

        let mut started = Vec::new();
        let mut finished = Vec::new();
        pipeline
            .run_with_callbacks(
                &mut grid,
                |name, i, total| started.push((name.to_string(), i, total)),
                |name, i, total| finished.push((name.to_string(), i, total)),
            )
            .unwrap();

        assert_eq!(started.len(), 1);
        assert_eq!(finished.len(), 1);
        assert_eq!(started[0].2, 1);
    }
}
