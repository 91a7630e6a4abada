pub mod config;
pub mod sim_params;
pub mod snapshot;
pub mod theme;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    AppearanceConfig, FlockConfig, InitialConditions, OutputConfig, RepulsionConfig, RuleParamsConfig,
    RuntimeConfig, TimingConfig, UniverseConfig,
};
pub use sim_params::{Bounds, FlockParams, RuleToggles};
pub use snapshot::{AgentView, Snapshot};
pub use theme::{parse_color, ColorTheme, Coloring, Rgb8};
pub use vecmath::{vec_to_angle, Vec2};
