use crate::sim_params::{Bounds, FlockParams, RuleToggles};
use crate::theme::{parse_color, ColorTheme, Coloring};
use crate::vecmath::Vec2;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for the area agents live in
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UniverseConfig {
    pub width: f32,
    pub height: f32,
}

// Configuration for how long the headless host runs and how often it records
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_total_ticks")]
    pub total_ticks: u32,
    #[serde(default = "default_record_interval_ticks")]
    pub record_interval_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            total_ticks: default_total_ticks(),
            record_interval_ticks: default_record_interval_ticks(),
        }
    }
}

// Initial population, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct InitialConditions {
    #[serde(default = "default_count")]
    pub count: u32,
    /// Seed for placement and color picks. Absent means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self { count: default_count(), seed: None }
    }
}

// Steering rule parameters
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RuleParamsConfig {
    #[serde(default = "default_speed_limit")]
    pub speed_limit: f32,
    #[serde(default = "default_visual_range")]
    pub visual_range: f32,
    #[serde(default = "default_centering_factor")]
    pub centering_factor: f32,
    #[serde(default = "default_matching_factor")]
    pub matching_factor: f32,
    #[serde(default = "default_separation_distance")]
    pub separation_distance: f32,
    #[serde(default = "default_separation_factor")]
    pub separation_factor: f32,
    #[serde(default = "default_boundary_margin")]
    pub boundary_margin: f32,
    #[serde(default = "default_turn_factor")]
    pub turn_factor: f32,
}

impl Default for RuleParamsConfig {
    fn default() -> Self {
        Self {
            speed_limit: default_speed_limit(),
            visual_range: default_visual_range(),
            centering_factor: default_centering_factor(),
            matching_factor: default_matching_factor(),
            separation_distance: default_separation_distance(),
            separation_factor: default_separation_factor(),
            boundary_margin: default_boundary_margin(),
            turn_factor: default_turn_factor(),
        }
    }
}

// External point agents steer away from (e.g. a pointer)
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RepulsionConfig {
    #[serde(default)]
    pub point: Option<[f32; 2]>,
    #[serde(default = "default_repulsion_distance")]
    pub distance: f32,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self { point: None, distance: default_repulsion_distance() }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppearanceConfig {
    #[serde(default)]
    pub theme: ColorTheme,
    /// Overrides `theme` when present.
    #[serde(default)]
    pub custom_palette: Option<Vec<String>>,
    /// Overrides both palettes: every agent gets this color.
    #[serde(default)]
    pub fixed_color: Option<String>,
    #[serde(default = "default_trail_lifetime")]
    pub trail_lifetime: u32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: ColorTheme::Default,
            custom_palette: None,
            fixed_color: None,
            trail_lifetime: default_trail_lifetime(),
        }
    }
}

impl AppearanceConfig {
    /// Resolves the configured colors into the assignment used when seeding.
    pub fn coloring(&self) -> Result<Coloring> {
        if let Some(fixed) = &self.fixed_color {
            return Ok(Coloring::Fixed(parse_color(fixed)?));
        }
        match &self.custom_palette {
            Some(codes) => {
                if codes.is_empty() {
                    anyhow::bail!("custom_palette must contain at least one color.");
                }
                let colors = codes.iter().map(|c| parse_color(c)).collect::<Result<Vec<_>>>()?;
                Ok(Coloring::Palette(colors))
            }
            None => Ok(Coloring::Palette(self.theme.colors())),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub parallel: bool,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default)]
    pub save_final_states: bool,
    #[serde(default = "default_save_stats")]
    pub save_stats: bool,
    #[serde(default)]
    pub save_agents_in_snapshot: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_filename: default_base_filename(),
            save_final_states: false,
            save_stats: default_save_stats(),
            save_agents_in_snapshot: false,
            format: None,
        }
    }
}

// Main flock configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FlockConfig {
    pub universe: UniverseConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub rules: RuleParamsConfig,
    #[serde(default)]
    pub toggles: RuleToggles,
    #[serde(default)]
    pub repulsion: RepulsionConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FlockConfig {
    /// A configuration with every section at its default and the given bounds.
    pub fn with_bounds(width: f32, height: f32) -> Self {
        Self {
            universe: UniverseConfig { width, height },
            timing: TimingConfig::default(),
            initial_conditions: InitialConditions::default(),
            rules: RuleParamsConfig::default(),
            toggles: RuleToggles::default(),
            repulsion: RepulsionConfig::default(),
            appearance: AppearanceConfig::default(),
            runtime: RuntimeConfig::default(),
            output: OutputConfig::default(),
        }
    }

    /// Loads the flock configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FlockConfig = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no tick could sensibly use. Degenerate-but-finite rule
    /// parameters (zero visual range, zero speed limit) are allowed; the rules
    /// treat them as no-ops.
    pub fn validate(&self) -> Result<()> {
        let universe = &self.universe;
        if !(universe.width.is_finite() && universe.width > 0.0) {
            anyhow::bail!("universe.width must be positive and finite.");
        }
        if !(universe.height.is_finite() && universe.height > 0.0) {
            anyhow::bail!("universe.height must be positive and finite.");
        }
        if self.timing.record_interval_ticks == 0 {
            anyhow::bail!("record_interval_ticks must be greater than 0.");
        }

        let rules = &self.rules;
        let numeric = [
            ("speed_limit", rules.speed_limit),
            ("visual_range", rules.visual_range),
            ("centering_factor", rules.centering_factor),
            ("matching_factor", rules.matching_factor),
            ("separation_distance", rules.separation_distance),
            ("separation_factor", rules.separation_factor),
            ("boundary_margin", rules.boundary_margin),
            ("turn_factor", rules.turn_factor),
            ("repulsion.distance", self.repulsion.distance),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                anyhow::bail!("{} must be finite (got {}).", name, value);
            }
        }

        // Surface bad color strings at load time rather than at seeding.
        self.appearance.coloring()?;
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.universe.width, self.universe.height)
    }

    /// Converts the configuration into the parameters read every tick.
    pub fn flock_params(&self) -> FlockParams {
        let rules = &self.rules;
        FlockParams {
            bounds: self.bounds(),
            boundary_margin: rules.boundary_margin,
            turn_factor: rules.turn_factor,
            speed_limit: rules.speed_limit,
            visual_range: rules.visual_range,
            centering_factor: rules.centering_factor,
            matching_factor: rules.matching_factor,
            separation_distance: rules.separation_distance,
            separation_factor: rules.separation_factor,
            repulsion_point: self.repulsion.point.map(|[x, y]| Vec2::new(x, y)),
            repulsion_distance: self.repulsion.distance,
            toggles: self.toggles,
            trail_lifetime: self.appearance.trail_lifetime as usize,
            parallel: self.runtime.parallel,
        }
    }
}

fn default_total_ticks() -> u32 {
    600
}

fn default_record_interval_ticks() -> u32 {
    10
}

fn default_count() -> u32 {
    150
}

fn default_speed_limit() -> f32 {
    15.0
}

fn default_visual_range() -> f32 {
    75.0
}

fn default_centering_factor() -> f32 {
    0.005
}

fn default_matching_factor() -> f32 {
    0.05
}

fn default_separation_distance() -> f32 {
    20.0
}

fn default_separation_factor() -> f32 {
    0.05
}

fn default_boundary_margin() -> f32 {
    200.0
}

fn default_turn_factor() -> f32 {
    1.0
}

fn default_repulsion_distance() -> f32 {
    200.0 // Larger than the default separation distance
}

fn default_trail_lifetime() -> u32 {
    50
}

fn default_base_filename() -> String {
    "flock".to_string()
}

fn default_save_stats() -> bool {
    true
}
