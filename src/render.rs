//! Boundary to whatever draws the flock. The engine hands over agent states and
//! never issues drawing calls itself.

use crate::agent::Agent;
use anyhow::Result;
use flock_common::AgentView;
use log::trace;

/// Consumes one frame of agent states per tick, in population order.
pub trait RenderSink {
    fn draw_frame(&mut self, tick: u64, agents: &[AgentView]) -> Result<()>;
}

impl<F> RenderSink for F
where
    F: FnMut(u64, &[AgentView]) -> Result<()>,
{
    fn draw_frame(&mut self, tick: u64, agents: &[AgentView]) -> Result<()> {
        self(tick, agents)
    }
}

/// Render-facing views of a whole population.
pub fn agent_views(population: &[Agent]) -> Vec<AgentView> {
    population.iter().map(Agent::view).collect()
}

/// Headless sink: logs a one-line summary of every frame at trace level.
#[derive(Debug, Default)]
pub struct FrameLog {
    frames_seen: u64,
}

impl FrameLog {
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl RenderSink for FrameLog {
    fn draw_frame(&mut self, tick: u64, agents: &[AgentView]) -> Result<()> {
        self.frames_seen += 1;
        if let Some(first) = agents.first() {
            trace!(
                "Frame {}: {} agents, first at ({:.1}, {:.1}) heading {:.2} rad",
                tick,
                agents.len(),
                first.position.0,
                first.position.1,
                first.heading
            );
        } else {
            trace!("Frame {}: empty flock", tick);
        }
        Ok(())
    }
}
