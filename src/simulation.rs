use crate::agent::Agent;
use crate::neighbors::{count_neighbors, SelfInclusion};
use crate::render::{agent_views, RenderSink};
use crate::rules;
use crate::seed::seed;
use anyhow::Result;
use flock_common::{Bounds, FlockConfig, FlockParams, Snapshot, Vec2};
use log::{debug, info, trace, warn};
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

/// Histogram size for neighbor counts; larger counts land in the last bin.
const MAX_EXPECTED_NEIGHBORS: usize = 32;

/// Population size as stored in a snapshot, saturating at `u32::MAX`.
fn agent_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Advances every agent by one tick and returns the new population.
///
/// Pure: all neighbor lookups read `population` as it was before the tick, so no
/// agent observes another agent's update from the same tick. The parallel path
/// produces exactly the same result as the serial one.
pub fn step(population: &[Agent], params: &FlockParams) -> Vec<Agent> {
    if params.parallel {
        (0..population.len())
            .into_par_iter()
            .map(|idx| advance_agent(population, idx, params))
            .collect()
    } else {
        (0..population.len())
            .map(|idx| advance_agent(population, idx, params))
            .collect()
    }
}

/// One agent's update. Later rules see the velocity produced by earlier ones;
/// every rule sees the other agents' pre-tick state.
fn advance_agent(population: &[Agent], idx: usize, params: &FlockParams) -> Agent {
    let current = &population[idx];
    let toggles = params.toggles;
    let mut velocity = current.velocity;

    // --- 1. Cohesion ---
    if toggles.towards_center {
        velocity += rules::cohesion(population, idx, params);
    }
    // --- 2. Separation ---
    if toggles.avoid_others {
        velocity += rules::separation(population, idx, params);
    }
    // --- 3. Point Repulsion ---
    if let Some(point) = params.repulsion_target() {
        velocity += rules::point_repulsion(current.position, point, params);
    }
    // --- 4. Alignment ---
    if toggles.match_velocity {
        velocity += rules::alignment(population, idx, velocity, params);
    }
    // --- 5. Speed Limit ---
    velocity = rules::limit_speed(velocity, params.speed_limit);
    // --- 6. Boundary Containment ---
    velocity += rules::containment(current.position, params);

    // --- 7. Integrate & Record Trail ---
    let mut next = current.clone();
    next.velocity = velocity;
    next.position = current.position + velocity;
    next.record_trail(params.trail_lifetime);
    next
}

/// Owns the flock between ticks: configuration, RNG for (re)seeding, the live
/// population, and recorded snapshots.
pub struct FlockSimulation {
    /// The configuration the current population and parameters were derived from.
    config: FlockConfig,
    /// Parameters read by every tick.
    params: FlockParams,
    population: Vec<Agent>,
    /// Host-side RNG for seeding. Ticks themselves use no randomness.
    rng: StdRng,
    current_tick: u64,
    /// Next id handed out; ids are never reused across re-seeds.
    next_agent_id: u64,
    recorded_snapshots: Vec<Snapshot>,
}

impl FlockSimulation {
    /// Validates `config`, seeds the RNG and creates the initial population.
    pub fn new(config: FlockConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.initial_conditions.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let params = config.flock_params();

        let mut sim = Self {
            config,
            params,
            population: Vec::new(),
            rng,
            current_tick: 0,
            next_agent_id: 0,
            recorded_snapshots: Vec::new(),
        };
        sim.reseed()?;
        Ok(sim)
    }

    /// Replaces the whole population with a fresh batch of `count` agents.
    fn reseed(&mut self) -> Result<()> {
        let count = self.config.initial_conditions.count as usize;
        let coloring = self.config.appearance.coloring()?;
        let bounds = self.config.bounds();

        self.population = seed(count, bounds, &coloring, self.next_agent_id, &mut self.rng)?;
        self.next_agent_id += count as u64;
        debug!(
            "Seeded {} agents in {}x{} (next id {}).",
            count, bounds.width, bounds.height, self.next_agent_id
        );
        Ok(())
    }

    /// Advances the flock by one tick.
    pub fn step(&mut self) {
        self.population = step(&self.population, &self.params);
        self.current_tick += 1;
        trace!("Tick {} done ({} agents).", self.current_tick, self.population.len());
    }

    /// Runs one tick and hands the resulting frame to `sink`.
    pub fn advance_and_render<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.step();
        self.render(sink)
    }

    /// Hands the current agent states to `sink`.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.draw_frame(self.current_tick, &agent_views(&self.population))
    }

    /// Applies a new configuration from the next tick on.
    ///
    /// Changing `count` or the bounds re-seeds the whole population; anything else
    /// (factors, toggles, trail lifetime, colors) keeps the live agents. Returns whether
    /// a re-seed happened. On error nothing changes.
    pub fn reconfigure(&mut self, config: FlockConfig) -> Result<bool> {
        config.validate()?;

        let needs_reseed = config.initial_conditions.count != self.config.initial_conditions.count
            || config.bounds() != self.config.bounds();
        // Keep a pointer set via `set_repulsion_point` unless the new config names one.
        let pointer = self.params.repulsion_point;

        let previous = std::mem::replace(&mut self.config, config);
        if needs_reseed {
            if let Err(e) = self.reseed() {
                self.config = previous;
                return Err(e);
            }
            info!(
                "Re-seeded flock: {} agents in {}x{}.",
                self.population.len(),
                self.config.universe.width,
                self.config.universe.height
            );
        }

        self.params = self.config.flock_params();
        if self.params.repulsion_point.is_none() {
            self.params.repulsion_point = pointer;
        }
        debug!("Reconfigured: {:?}", self.params);
        Ok(needs_reseed)
    }

    /// Moves (or removes) the external repulsion point, e.g. to follow a pointer.
    pub fn set_repulsion_point(&mut self, point: Option<Vec2>) {
        if let Some(p) = point {
            if !p.is_finite() {
                warn!("Ignoring non-finite repulsion point ({}, {}).", p.x, p.y);
                self.params.repulsion_point = None;
                return;
            }
        }
        self.params.repulsion_point = point;
    }

    /// Collects flock metrics (and optionally agent views) as a Snapshot.
    pub fn record_snapshot(&mut self) {
        let snapshot = self.snapshot();
        debug!(
            "Snapshot at tick {}: mean speed {:.2}, polarization {:.3}",
            snapshot.tick, snapshot.mean_speed, snapshot.polarization
        );
        self.recorded_snapshots.push(snapshot);
    }

    /// Builds a snapshot of the current state without storing it.
    pub fn snapshot(&self) -> Snapshot {
        let population = &self.population;
        let n = population.len();

        let mut speed_sum = 0.0f32;
        let mut max_speed = 0.0f32;
        let mut heading_sum = Vec2::zero();
        let mut position_sum = Vec2::zero();
        let mut outside = 0u32;
        for agent in population {
            let speed = agent.speed();
            speed_sum += speed;
            max_speed = max_speed.max(speed);
            heading_sum += agent.velocity.normalize_or_zero();
            position_sum += agent.position;
            if !self.params.bounds.contains(agent.position) {
                outside += 1;
            }
        }

        let (mean_speed, polarization, centroid) = if n > 0 {
            let inv_n = 1.0 / n as f32;
            (speed_sum * inv_n, heading_sum.scale(inv_n).length(), position_sum.scale(inv_n))
        } else {
            (0.0, 0.0, Vec2::zero())
        };

        let mut neighbor_counts_distribution = vec![0u32; MAX_EXPECTED_NEIGHBORS];
        for count in self.neighbor_counts() {
            let bin = count.min(MAX_EXPECTED_NEIGHBORS - 1);
            neighbor_counts_distribution[bin] += 1;
        }

        let agents = if self.config.output.save_agents_in_snapshot {
            Some(agent_views(population))
        } else {
            None
        };

        Snapshot {
            tick: self.current_tick,
            agent_count: agent_count(n),
            mean_speed,
            max_speed,
            polarization,
            centroid: centroid.to_tuple(),
            neighbor_counts_distribution,
            agents_outside_bounds: outside,
            agents,
        }
    }

    /// Number of other agents within visual range, per agent.
    fn neighbor_counts(&self) -> Vec<usize> {
        let population = &self.population;
        let radius = self.params.visual_range;
        if self.params.parallel {
            (0..population.len())
                .into_par_iter()
                .map(|idx| count_neighbors(population, idx, radius, SelfInclusion::Exclude))
                .collect()
        } else {
            (0..population.len())
                .map(|idx| count_neighbors(population, idx, radius, SelfInclusion::Exclude))
                .collect()
        }
    }

    /// Provides access to the recorded snapshots.
    pub fn recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }

    /// The live population, in stable order.
    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    pub fn current_agent_count(&self) -> usize {
        self.population.len()
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Parameters the next tick will use.
    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.params.bounds
    }
}
