//! Erosion configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by [`ErosionConfig::validate`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("inertia must be in [0, 1], got {0}")]
    Inertia(f32),
    #[error("erosion radius must be positive, got {0}")]
    Radius(f32),
    #[error("droplet step budget must be at least 1")]
    StepBudget,
    #[error("evaporation rate must be in [0, 1), got {0}")]
    Evaporation(f32),
    #[error("deposition rate must be in [0, 1], got {0}")]
    DepositionRate(f32),
    #[error("erosion rate must be in [0, 1], got {0}")]
    ErosionRate(f32),
    #[error("initial water volume must be positive, got {0}")]
    InitialWater(f32),
    #[error("minimum slope must be non-negative, got {0}")]
    MinSlope(f32),
}

/// Parameters for droplet-based hydraulic erosion.
///
/// Defaults match common hydraulic-erosion literature ranges; the simulation
/// is tolerant of moderate changes but `validate` rejects values that would
/// break termination or numeric stability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Number of droplets to trace across the grid.
    pub droplet_count: u32,
    /// Step budget per droplet; the sole bound against a droplet oscillating
    /// forever in a flat basin.
    pub max_steps: u32,
    /// Direction blending factor in [0, 1]: 0 follows the gradient exactly,
    /// 1 never turns.
    pub inertia: f32,
    /// Slope floor for the capacity formula, keeps capacity alive on near-flat
    /// terrain.
    pub min_slope: f32,
    /// Sediment capacity factor (multiplies slope, speed and water volume).
    pub capacity_factor: f32,
    /// Fraction of surplus sediment settled per step when over capacity.
    pub deposition_rate: f32,
    /// Fraction of free capacity taken from the terrain per step.
    pub erosion_rate: f32,
    /// Water lost per step (0-1).
    pub evaporation_rate: f32,
    /// Gravity constant for the speed update.
    pub gravity: f32,
    /// Radius of the disk that spreads terrain removal.
    pub radius: f32,
    /// Water volume a droplet starts with.
    pub initial_water: f32,
    /// Speed a droplet starts with.
    pub initial_velocity: f32,
    /// Seed for droplet spawn positions.
    pub seed: u64,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            droplet_count: 100_000,
            max_steps: 100,
            inertia: 0.1,
            min_slope: 0.05,
            capacity_factor: 8.0,
            deposition_rate: 0.02,
            erosion_rate: 0.9,
            evaporation_rate: 0.0125,
            gravity: 10.0,
            radius: 4.0,
            initial_water: 1.0,
            initial_velocity: 1.0,
            seed: 42,
        }
    }
}

impl ErosionConfig {
    /// Checks the configuration for values that would break the simulation.
    ///
    /// Called by [`ErosionEngine::new`](crate::erosion::ErosionEngine::new),
    /// so a constructed engine never fails mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.inertia) {
            return Err(ConfigError::Inertia(self.inertia));
        }
        if !(self.radius > 0.0) {
            return Err(ConfigError::Radius(self.radius));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::StepBudget);
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(ConfigError::Evaporation(self.evaporation_rate));
        }
        if !(0.0..=1.0).contains(&self.deposition_rate) {
            return Err(ConfigError::DepositionRate(self.deposition_rate));
        }
        if !(0.0..=1.0).contains(&self.erosion_rate) {
            return Err(ConfigError::ErosionRate(self.erosion_rate));
        }
        if !(self.initial_water > 0.0) {
            return Err(ConfigError::InitialWater(self.initial_water));
        }
        if !(self.min_slope >= 0.0) {
            return Err(ConfigError::MinSlope(self.min_slope));
        }
        Ok(())
    }
}
