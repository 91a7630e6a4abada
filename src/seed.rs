use crate::agent::{Agent, AgentId};
use anyhow::Result;
use flock_common::{Bounds, Coloring, Rgb8, Vec2};
use rand::distr::Uniform;
use rand::prelude::*;
use rand::seq::IndexedRandom;

/// Initial velocity components are drawn from `[-INITIAL_VELOCITY_RANGE, INITIAL_VELOCITY_RANGE)`.
pub const INITIAL_VELOCITY_RANGE: f32 = 5.0;

/// Creates a fresh population of `count` agents with ids `first_id..first_id + count`.
///
/// Positions are uniform in `[0, width) x [0, height)`, velocity components uniform in
/// `[-5, 5)`, trails empty. Colors come from `coloring` and never change afterwards.
pub fn seed<R: Rng>(
    count: usize,
    bounds: Bounds,
    coloring: &Coloring,
    first_id: u64,
    rng: &mut R,
) -> Result<Vec<Agent>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let x_dist = Uniform::new(0.0f32, bounds.width)
        .map_err(|e| anyhow::anyhow!("Invalid bounds width {}: {}", bounds.width, e))?;
    let y_dist = Uniform::new(0.0f32, bounds.height)
        .map_err(|e| anyhow::anyhow!("Invalid bounds height {}: {}", bounds.height, e))?;
    let v_dist = Uniform::new(-INITIAL_VELOCITY_RANGE, INITIAL_VELOCITY_RANGE)?;

    if let Coloring::Palette(colors) = coloring {
        if colors.is_empty() {
            anyhow::bail!("Cannot seed agents from an empty color palette.");
        }
    }

    let mut agents = Vec::with_capacity(count);
    for i in 0..count {
        let position = Vec2::new(rng.sample(&x_dist), rng.sample(&y_dist));
        let velocity = Vec2::new(rng.sample(&v_dist), rng.sample(&v_dist));
        let color = pick_color(coloring, rng);
        agents.push(Agent::new(AgentId(first_id + i as u64), position, velocity, color));
    }
    Ok(agents)
}

fn pick_color<R: Rng>(coloring: &Coloring, rng: &mut R) -> Rgb8 {
    match coloring {
        Coloring::Fixed(color) => *color,
        // Non-empty, checked by the caller.
        Coloring::Palette(colors) => colors.choose(rng).copied().unwrap_or([0, 0, 0]),
    }
}
