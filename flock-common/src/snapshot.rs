use crate::theme::Rgb8;
use serde::{Deserialize, Serialize};

/// Everything a renderer needs to draw one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: u64,
    pub position: (f32, f32),
    pub velocity: (f32, f32),
    /// `atan2(dy, dx)` in radians.
    pub heading: f32,
    pub color: Rgb8,
    /// Oldest first.
    pub trail: Vec<(f32, f32)>,
}

/// A snapshot of the flock and its metrics at a specific tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The tick at which the snapshot was taken.
    pub tick: u64,
    pub agent_count: u32,
    pub mean_speed: f32,
    pub max_speed: f32,
    /// Magnitude of the mean unit heading: 1.0 for a perfectly aligned flock, near 0.0 for disorder.
    pub polarization: f32,
    pub centroid: (f32, f32),
    /// `neighbor_counts_distribution[N]` is the number of agents with exactly N others within the
    /// visual range. The last bin also absorbs every larger count.
    pub neighbor_counts_distribution: Vec<u32>,
    /// Agents whose position currently lies outside the bounds rectangle.
    pub agents_outside_bounds: u32,
    /// Present only when `output.save_agents_in_snapshot` is set. Always serialized (as null when
    /// absent) so the non-self-describing binary formats stay decodable.
    #[serde(default)]
    pub agents: Option<Vec<AgentView>>,
}
