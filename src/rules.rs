//! Steering rules. Each rule reads the pre-tick population and returns a velocity
//! delta; the step adds the deltas in a fixed order.

use crate::agent::Agent;
use crate::neighbors::{for_each_neighbor, SelfInclusion};
use flock_common::{FlockParams, Vec2};

/// Fly towards the centroid of agents within the visual range.
///
/// The agent counts itself: with one real neighbor the centroid sits halfway
/// between the two instead of on the neighbor. Alone, the centroid is its own
/// position and the delta is zero.
pub fn cohesion(population: &[Agent], agent_idx: usize, params: &FlockParams) -> Vec2 {
    let Some(agent) = population.get(agent_idx) else {
        return Vec2::zero();
    };

    let mut center = Vec2::zero();
    let mut num_neighbors = 0u32;
    for_each_neighbor(population, agent_idx, params.visual_range, SelfInclusion::Include, |other| {
        center += other.position;
        num_neighbors += 1;
        true
    });

    if num_neighbors == 0 {
        return Vec2::zero();
    }
    let centroid = center / num_neighbors as f32;
    (centroid - agent.position) * params.centering_factor
}

/// Move away from every other agent closer than the separation distance.
pub fn separation(population: &[Agent], agent_idx: usize, params: &FlockParams) -> Vec2 {
    let Some(agent) = population.get(agent_idx) else {
        return Vec2::zero();
    };

    let mut push = Vec2::zero();
    for_each_neighbor(population, agent_idx, params.separation_distance, SelfInclusion::Exclude, |other| {
        push += agent.position - other.position;
        true
    });
    push * params.separation_factor
}

/// Same accumulation as [`separation`], against a single external point with its own radius.
pub fn point_repulsion(position: Vec2, point: Vec2, params: &FlockParams) -> Vec2 {
    if position.distance(point) < params.repulsion_distance {
        (position - point) * params.separation_factor
    } else {
        Vec2::zero()
    }
}

/// Nudge `velocity` (already carrying this tick's earlier deltas) towards the
/// average velocity of the other agents in visual range.
pub fn alignment(population: &[Agent], agent_idx: usize, velocity: Vec2, params: &FlockParams) -> Vec2 {
    let mut sum = Vec2::zero();
    let mut num_neighbors = 0u32;
    for_each_neighbor(population, agent_idx, params.visual_range, SelfInclusion::Exclude, |other| {
        sum += other.velocity;
        num_neighbors += 1;
        true
    });

    if num_neighbors == 0 {
        return Vec2::zero();
    }
    let average = sum / num_neighbors as f32;
    (average - velocity) * params.matching_factor
}

/// Rescales `velocity` to exactly `speed_limit` when it is faster, keeping direction.
/// A non-positive limit stops the agent; a stationary agent is left alone.
pub fn limit_speed(velocity: Vec2, speed_limit: f32) -> Vec2 {
    if speed_limit <= 0.0 {
        return Vec2::zero();
    }
    let speed = velocity.length();
    if speed > speed_limit {
        velocity * (speed_limit / speed)
    } else {
        velocity
    }
}

/// Soft push back into the bounds: `turn_factor` per axis while inside the margin band
/// along an edge (or past it). Positions are never clamped or wrapped.
pub fn containment(position: Vec2, params: &FlockParams) -> Vec2 {
    let margin = params.boundary_margin;
    let turn = params.turn_factor;
    let bounds = params.bounds;

    let mut delta = Vec2::zero();
    if position.x < margin {
        delta.x += turn;
    }
    if position.x > bounds.width - margin {
        delta.x -= turn;
    }
    if position.y < margin {
        delta.y += turn;
    }
    if position.y > bounds.height - margin {
        delta.y -= turn;
    }
    delta
}
