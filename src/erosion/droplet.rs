//! The droplet state machine: one simulated water particle walking the grid.

use glam::Vec2;

use crate::erosion::brush::{deposit_at, erode_at};
use crate::erosion::{ErosionConfig, ErosionStats};
use crate::terrain::HeightGrid;

/// Sediment below this is treated as exhausted. Exact float equality with
/// zero would only fire for droplets that never picked anything up; the
/// epsilon keeps the terminal condition robust against rounding.
pub(crate) const SEDIMENT_EPSILON: f32 = 1e-6;

/// Why a droplet stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The droplet stepped off the grid.
    OutOfBounds,
    /// Carried sediment dropped to (effectively) zero.
    SedimentExhausted,
    /// The per-droplet step budget ran out.
    StepBudget,
}

/// Transient per-particle state. Created fresh for each simulated droplet and
/// discarded when it terminates; droplets never share state with each other,
/// only with the grid.
#[derive(Debug, Clone)]
pub struct Droplet {
    /// Continuous position in grid space.
    pub pos: Vec2,
    /// Direction of travel; magnitude is the per-step displacement.
    pub dir: Vec2,
    /// Scalar physical speed, feeds the capacity formula.
    pub velocity: f32,
    /// Remaining water volume.
    pub water: f32,
    /// Carried sediment volume.
    pub sediment: f32,
    /// Sediment-carrying capacity from the last downhill step.
    pub capacity: f32,
    /// Steps taken so far.
    pub steps: u32,
}

impl Droplet {
    /// Creates a droplet at `pos` with the configured initial water and
    /// speed, no direction and no sediment.
    pub fn new(pos: Vec2, config: &ErosionConfig) -> Self {
        Self {
            pos,
            dir: Vec2::ZERO,
            velocity: config.initial_velocity,
            water: config.initial_water,
            sediment: 0.0,
            capacity: 0.0,
            steps: 0,
        }
    }
}

/// Drives droplets through their physical update loop against a height grid.
pub struct DropletSimulator<'a> {
    config: &'a ErosionConfig,
}

impl<'a> DropletSimulator<'a> {
    pub fn new(config: &'a ErosionConfig) -> Self {
        Self { config }
    }

    /// Runs one droplet to termination, applying its erosion and deposition
    /// to the grid as it goes.
    ///
    /// The droplet's position must start inside the grid. The loop is bounded
    /// by the step budget, so it always terminates.
    pub fn run(
        &self,
        grid: &mut HeightGrid,
        droplet: &mut Droplet,
        stats: &mut ErosionStats,
    ) -> Termination {
        debug_assert!(grid.contains(droplet.pos));
        let config = self.config;

        loop {
            if droplet.steps >= config.max_steps {
                return Termination::StepBudget;
            }

            let old_pos = droplet.pos;
            let grad = grid.gradient(old_pos);
            let old_height = grid.sample_bilinear(old_pos);

            // Inertia blending: low inertia follows the steepest descent,
            // high inertia keeps the previous heading. The direction is not
            // normalized; step length settles toward the gradient magnitude.
            droplet.dir = droplet.dir * config.inertia - grad * (1.0 - config.inertia);
            droplet.pos += droplet.dir;

            // Bounds check comes strictly before the sediment policy: a
            // droplet that runs off the map moves no mass on its final step.
            if !grid.contains(droplet.pos) {
                return Termination::OutOfBounds;
            }

            let new_height = grid.sample_bilinear(droplet.pos);
            let height_diff = new_height - old_height;

            if height_diff > 0.0 {
                // Moved uphill into a rise: fill the pit behind us, but never
                // with more than we carry.
                let drop_amount = height_diff.min(droplet.sediment);
                stats.total_deposited += deposit_at(grid, old_pos, drop_amount) as f64;
                droplet.sediment -= drop_amount;
            } else {
                droplet.capacity = (-height_diff).max(config.min_slope)
                    * droplet.velocity
                    * droplet.water
                    * config.capacity_factor;

                if droplet.sediment > droplet.capacity {
                    // Over capacity: settle a fraction of the surplus.
                    let drop_amount =
                        (droplet.sediment - droplet.capacity) * config.deposition_rate;
                    stats.total_deposited += deposit_at(grid, old_pos, drop_amount) as f64;
                    droplet.sediment -= drop_amount;
                } else {
                    // Under capacity: take from the terrain, capped by the
                    // height difference so the slope never inverts.
                    let take_amount = ((droplet.capacity - droplet.sediment)
                        * config.erosion_rate)
                        .min(-height_diff);
                    stats.total_eroded +=
                        erode_at(grid, old_pos, take_amount, config.radius) as f64;
                    droplet.sediment += take_amount;
                }
            }

            // Kinetic/potential energy exchange along the slope; the radicand
            // goes negative on steep uphill moves, clamp instead of NaN.
            droplet.velocity =
                (droplet.velocity * droplet.velocity - height_diff * config.gravity)
                    .max(0.0)
                    .sqrt();
            droplet.water *= 1.0 - config.evaporation_rate;

            if droplet.sediment <= SEDIMENT_EPSILON {
                return Termination::SedimentExhausted;
            }
            droplet.steps += 1;
        }
    }
}
