//! Terrain writers: radius-weighted erosion and bilinear deposition.
//!
//! Both writers operate at the droplet's pre-move position. Deposition uses
//! the same bilinear weights as height sampling so the surface stays smooth;
//! erosion spreads removal over a disk so channels do not collapse into
//! single-node spikes.

use glam::Vec2;

use crate::terrain::HeightGrid;

/// Computes the normalized weight of every grid node whose center lies within
/// `radius` of `pos`, clipped to grid bounds.
///
/// Weights fall off linearly to zero at the radius boundary and sum to 1.
/// Keys are the grid's linear node indices. Returns an empty vec when no node
/// carries positive weight; callers treat that as "no erosion applied".
pub fn erosion_weights(grid: &HeightGrid, pos: Vec2, radius: f32) -> Vec<(usize, f32)> {
    let min_x = (pos.x - radius).ceil().max(0.0) as u32;
    let max_x = ((pos.x + radius).floor() as i64).min(grid.width() as i64);
    let min_z = (pos.y - radius).ceil().max(0.0) as u32;
    let max_z = ((pos.y + radius).floor() as i64).min(grid.depth() as i64);
    if max_x < 0 || max_z < 0 {
        return Vec::new();
    }

    let mut nodes = Vec::new();
    let mut weight_sum = 0.0f32;
    for z in min_z..=max_z as u32 {
        for x in min_x..=max_x as u32 {
            let distance = Vec2::new(x as f32, z as f32).distance(pos);
            let weight = radius - distance;
            if weight > 0.0 {
                nodes.push((grid.index(x, z), weight));
                weight_sum += weight;
            }
        }
    }

    if weight_sum <= 0.0 {
        return Vec::new();
    }
    for (_, weight) in &mut nodes {
        *weight /= weight_sum;
    }
    nodes
}

/// Adds `amount` of material to the four nodes surrounding `pos`, split by
/// bilinear fractional weights. Returns the amount deposited (always exactly
/// `amount`; the four weights sum to 1).
///
/// `pos` must lie inside the grid's sampleable region.
pub fn deposit_at(grid: &mut HeightGrid, pos: Vec2, amount: f32) -> f32 {
    debug_assert!(grid.contains(pos), "deposit outside grid: {:?}", pos);
    let x0 = pos.x.floor() as u32;
    let z0 = pos.y.floor() as u32;
    let fx = pos.x - x0 as f32;
    let fz = pos.y - z0 as f32;

    grid.set(x0, z0, grid.get(x0, z0) + amount * (1.0 - fx) * (1.0 - fz));
    grid.set(x0 + 1, z0, grid.get(x0 + 1, z0) + amount * fx * (1.0 - fz));
    grid.set(x0, z0 + 1, grid.get(x0, z0 + 1) + amount * (1.0 - fx) * fz);
    grid.set(x0 + 1, z0 + 1, grid.get(x0 + 1, z0 + 1) + amount * fx * fz);
    amount
}

/// Removes up to `amount` of material from the weighted disk around `pos`,
/// clamping every node at the 0.0 floor. Returns the material actually
/// removed, which is less than `amount` when the floor absorbs part of it or
/// the disk is degenerate.
pub fn erode_at(grid: &mut HeightGrid, pos: Vec2, amount: f32, radius: f32) -> f32 {
    let mut removed = 0.0f32;
    for (index, weight) in erosion_weights(grid, pos, radius) {
        let (x, z) = grid.coords(index);
        let old = grid.get(x, z);
        let new = (old - weight * amount).max(0.0);
        grid.set(x, z, new);
        removed += old - new;
    }
    removed
}
