use flock_common::{vec_to_angle, AgentView, Rgb8, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Opaque identifier, unique within the live population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boid-{}", self.0)
    }
}

/// One boid. Plain data; every tick produces a fresh copy from the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Not confined to the bounds rectangle.
    pub position: Vec2,
    /// Units per tick.
    pub velocity: Vec2,
    /// Past positions, most recent last.
    pub trail: VecDeque<Vec2>,
    pub color: Rgb8,
}

impl Agent {
    pub fn new(id: AgentId, position: Vec2, velocity: Vec2, color: Rgb8) -> Self {
        Self {
            id,
            position,
            velocity,
            trail: VecDeque::new(),
            color,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Heading in radians, `atan2(dy, dx)`.
    pub fn heading(&self) -> f32 {
        vec_to_angle(self.velocity)
    }

    /// Appends the current position and drops the oldest entries beyond `limit`.
    pub fn record_trail(&mut self, limit: usize) {
        self.trail.push_back(self.position);
        while self.trail.len() > limit {
            self.trail.pop_front();
        }
    }

    /// Render-facing copy of this agent.
    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.id.0,
            position: self.position.to_tuple(),
            velocity: self.velocity.to_tuple(),
            heading: self.heading(),
            color: self.color,
            trail: self.trail.iter().map(|p| p.to_tuple()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at(x: f32, y: f32) -> Agent {
        Agent::new(AgentId(1), Vec2::new(x, y), Vec2::new(0.0, 1.0), [1, 2, 3])
    }

    #[test]
    fn trail_drops_oldest_first() {
        let mut agent = agent_at(0.0, 0.0);
        for i in 0..5 {
            agent.position = Vec2::new(i as f32, 0.0);
            agent.record_trail(3);
        }
        let xs: Vec<f32> = agent.trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn zero_trail_lifetime_keeps_nothing() {
        let mut agent = agent_at(4.0, 4.0);
        agent.record_trail(0);
        assert!(agent.trail.is_empty());
    }

    #[test]
    fn view_carries_heading_and_trail() {
        let mut agent = agent_at(3.0, 4.0);
        agent.record_trail(10);
        let view = agent.view();
        assert_eq!(view.id, 1);
        assert_eq!(view.position, (3.0, 4.0));
        assert!((view.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(view.trail, vec![(3.0, 4.0)]);
        assert_eq!(view.color, [1, 2, 3]);
    }

    #[test]
    fn id_display() {
        assert_eq!(AgentId(42).to_string(), "boid-42");
    }
}
