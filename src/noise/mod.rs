//! Base-terrain noise sources.

mod fractal;

pub use fractal::{sample_fractal_noise, FractalNoise, FractalNoiseConfig, NoiseSource};
