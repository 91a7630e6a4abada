use crate::agent::Agent;

/// Whether the queried agent counts as its own neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfInclusion {
    /// The agent is reported alongside the others (its distance to itself is 0).
    /// Cohesion uses this, so a sparse neighborhood's centroid leans toward the agent.
    Include,
    /// Separation and alignment only look at other agents.
    Exclude,
}

/// Calls `f` for every agent strictly closer than `radius` to `population[agent_idx]`.
/// `f` returns `false` to stop early.
///
/// Brute force, O(n) per call. A non-positive or NaN radius matches nothing because
/// distances are never negative.
#[inline]
pub fn for_each_neighbor<'a, F>(
    population: &'a [Agent],
    agent_idx: usize,
    radius: f32,
    inclusion: SelfInclusion,
    mut f: F,
) where
    F: FnMut(&'a Agent) -> bool,
{
    let Some(agent) = population.get(agent_idx) else {
        return;
    };
    let origin = agent.position;

    for (idx, other) in population.iter().enumerate() {
        if idx == agent_idx && inclusion == SelfInclusion::Exclude {
            continue;
        }
        if origin.distance(other.position) < radius && !f(other) {
            return;
        }
    }
}

/// All neighbors of `population[agent_idx]` within `radius`, in population order.
pub fn neighbors(population: &[Agent], agent_idx: usize, radius: f32, inclusion: SelfInclusion) -> Vec<&Agent> {
    let mut found = Vec::new();
    for_each_neighbor(population, agent_idx, radius, inclusion, |other| {
        found.push(other);
        true
    });
    found
}

pub fn count_neighbors(population: &[Agent], agent_idx: usize, radius: f32, inclusion: SelfInclusion) -> usize {
    let mut count = 0;
    for_each_neighbor(population, agent_idx, radius, inclusion, |_| {
        count += 1;
        true
    });
    count
}
