use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// Width/height of the area agents are nudged to stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// Rule toggles the host can flip between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleToggles {
    #[serde(default = "enabled")]
    pub towards_center: bool,
    #[serde(default = "enabled")]
    pub avoid_others: bool,
    #[serde(default = "enabled")]
    pub mouse_effect: bool,
    #[serde(default = "enabled")]
    pub match_velocity: bool,
}

fn enabled() -> bool {
    true
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            towards_center: true,
            avoid_others: true,
            mouse_effect: true,
            match_velocity: true,
        }
    }
}

impl RuleToggles {
    /// Every toggleable rule switched off; speed limit and containment still run.
    pub fn none() -> Self {
        Self {
            towards_center: false,
            avoid_others: false,
            mouse_effect: false,
            match_velocity: false,
        }
    }
}

/// Runtime parameters read (never written) by every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockParams {
    // World
    pub bounds: Bounds,
    pub boundary_margin: f32,
    pub turn_factor: f32,

    // Motion
    pub speed_limit: f32,

    // Neighborhood rules
    pub visual_range: f32,
    pub centering_factor: f32,
    pub matching_factor: f32,
    pub separation_distance: f32,
    pub separation_factor: f32,

    // Point repulsion
    pub repulsion_point: Option<Vec2>,
    pub repulsion_distance: f32,

    pub toggles: RuleToggles,
    pub trail_lifetime: usize,
    /// Run the per-agent update on the rayon pool.
    pub parallel: bool,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(1000.0, 800.0),
            boundary_margin: 200.0,
            turn_factor: 1.0,
            speed_limit: 15.0,
            visual_range: 75.0,
            centering_factor: 0.005,
            matching_factor: 0.05,
            separation_distance: 20.0,
            separation_factor: 0.05,
            repulsion_point: None,
            repulsion_distance: 200.0,
            toggles: RuleToggles::default(),
            trail_lifetime: 50,
            parallel: false,
        }
    }
}

impl FlockParams {
    /// The point agents are pushed away from this tick, if the rule is on and the point is usable.
    /// A missing or non-finite point disables the rule rather than failing.
    pub fn repulsion_target(&self) -> Option<Vec2> {
        if !self.toggles.mouse_effect {
            return None;
        }
        self.repulsion_point.filter(|p| p.is_finite())
    }
}
