//! Multi-octave fractal Brownian motion (fBm) noise generation.

use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// A deterministic elevation source sampled once per grid node.
///
/// Implementations must return the same value for the same coordinates and
/// configuration, so that terrain generation is reproducible. Any
/// `Fn(u32, u32) -> f32` closure works as a source, which keeps the base
/// terrain pluggable for tests and callers with their own generators.
pub trait NoiseSource: Sync {
    /// Returns the elevation sample at integer grid coordinates.
    fn sample(&self, x: u32, z: u32) -> f32;
}

impl<F> NoiseSource for F
where
    F: Fn(u32, u32) -> f32 + Sync,
{
    fn sample(&self, x: u32, z: u32) -> f32 {
        self(x, z)
    }
}

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves (4-8 typical).
    pub octaves: u8,
    /// Base frequency in cycles per grid unit (0.005-0.05 typical).
    pub frequency: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Peak elevation of the generated terrain. Samples are mapped into
    /// `[0, amplitude]` so a fresh grid never starts below the erosion floor.
    pub amplitude: f32,
    /// Random seed for reproducible generation.
    pub seed: i32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 0.015,
            lacunarity: 2.0,
            persistence: 0.5,
            amplitude: 40.0,
            seed: 42,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Creates a low-relief, gently undulating configuration.
    pub fn rolling_hills(seed: i32) -> Self {
        Self {
            octaves: 3,
            frequency: 0.01,
            lacunarity: 2.0,
            persistence: 0.45,
            amplitude: 20.0,
            seed,
        }
    }

    /// Creates a high-relief configuration with pronounced ridges.
    pub fn mountainous(seed: i32) -> Self {
        Self {
            octaves: 6,
            frequency: 0.02,
            lacunarity: 2.1,
            persistence: 0.55,
            amplitude: 60.0,
            seed,
        }
    }
}

/// Samples fractal noise at a 2D grid position.
///
/// Accumulates one simplex octave at a time so each octave can carry its own
/// seed offset, then normalizes by the total amplitude.
///
/// # Returns
/// A noise value in approximately [-1, 1] range (normalized by amplitude sum)
pub fn sample_fractal_noise(x: f32, z: f32, config: &FractalNoiseConfig) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f32;

    for octave in 0..config.octaves {
        // Each octave gets a different seed offset for variation
        let octave_seed = config.seed.wrapping_add(octave as i32 * 31337);

        let nx = x * frequency;
        let nz = z * frequency;

        let noise_value = NoiseBuilder::fbm_2d_offset(nx, 1, nz, 1)
            .with_seed(octave_seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];

        total += noise_value * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    // Normalize to [-1, 1]
    total / max_amplitude
}

/// Fractal-noise elevation source for seeding a height grid.
#[derive(Debug, Clone)]
pub struct FractalNoise {
    config: FractalNoiseConfig,
}

impl FractalNoise {
    /// Creates a source from the given configuration.
    pub fn new(config: FractalNoiseConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration backing this source.
    pub fn config(&self) -> &FractalNoiseConfig {
        &self.config
    }
}

impl NoiseSource for FractalNoise {
    fn sample(&self, x: u32, z: u32) -> f32 {
        let n = sample_fractal_noise(x as f32, z as f32, &self.config);
        // Remap [-1, 1] to [0, amplitude]: elevations start non-negative.
        (n * 0.5 + 0.5) * self.config.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FractalNoiseConfig::default();
        assert_eq!(config.octaves, 4);
        assert_eq!(config.lacunarity, 2.0);
        assert_eq!(config.persistence, 0.5);
        assert_eq!(config.amplitude, 40.0);
    }

    #[test]
    fn test_noise_reproducibility() {
        let config = FractalNoiseConfig::with_seed(12345);

        let result1 = sample_fractal_noise(17.0, 23.0, &config);
        let result2 = sample_fractal_noise(17.0, 23.0, &config);

        assert_eq!(result1, result2, "Same seed and position should produce same result");
    }

    #[test]
    fn test_noise_range() {
        let config = FractalNoiseConfig::default();
        for (x, z) in [(0.0, 0.0), (10.5, 3.25), (100.0, 100.0), (7.0, 199.0)] {
            let value = sample_fractal_noise(x, z, &config);
            assert!(
                value >= -1.5 && value <= 1.5,
                "Noise value {} at ({}, {}) out of expected range",
                value,
                x,
                z
            );
        }
    }

    #[test]
    fn test_different_seeds_produce_different_results() {
        let config1 = FractalNoiseConfig::with_seed(1);
        let config2 = FractalNoiseConfig::with_seed(2);

        let result1 = sample_fractal_noise(5.0, 9.0, &config1);
        let result2 = sample_fractal_noise(5.0, 9.0, &config2);

        assert_ne!(result1, result2, "Different seeds should produce different results");
    }

    #[test]
    fn test_source_output_non_negative() {
        let source = FractalNoise::new(FractalNoiseConfig::default());
        for z in 0..32 {
            for x in 0..32 {
                let h = source.sample(x, z);
                assert!(h >= 0.0, "Sample at ({}, {}) is negative: {}", x, z, h);
                assert!(h <= source.config().amplitude * 1.5);
            }
        }
    }

    #[test]
    fn test_closure_source() {
        let source = |x: u32, z: u32| (x + z) as f32;
        assert_eq!(source.sample(3, 4), 7.0);
    }
}
