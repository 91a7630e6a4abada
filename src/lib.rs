//! Boids flocking core: agent state, neighborhood queries, steering rules and the
//! per-tick step, plus the driver and output helpers used by the headless binary.

pub mod agent;
pub mod neighbors;
pub mod output;
pub mod render;
pub mod rules;
pub mod seed;
pub mod simulation;

pub use agent::{Agent, AgentId};
pub use neighbors::{neighbors, SelfInclusion};
pub use render::{FrameLog, RenderSink};
pub use seed::seed;
pub use simulation::{step, FlockSimulation};

// Re-export the shared types hosts need alongside the engine
pub use flock_common::{AgentView, Bounds, Coloring, FlockConfig, FlockParams, RuleToggles, Snapshot, Vec2};
