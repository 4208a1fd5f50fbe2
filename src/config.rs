//! Scene and viewer configuration.
//!
//! Configs are plain serde structs with builder methods. Every field has a
//! default, so a JSON file only needs the values it changes:
//!
//! ```json
//! { "scene": "field", "field": { "particle_count": 200, "link_threshold": 0.7 } }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::shell::Shell;

/// Parameters of a particle-link field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles, fixed for the scene's lifetime.
    pub particle_count: usize,
    /// Shell the particles are spawned in and bounce inside.
    pub shell: Shell,
    /// Each velocity component is drawn from `[-velocity_range, velocity_range]`.
    pub velocity_range: f32,
    /// Pairs closer than this are linked.
    pub link_threshold: f32,
    /// Links are rebuilt on every Nth tick.
    pub rebuild_every_n_ticks: u64,
    /// Upper bound on links per rebuild (sizes the GPU link buffer).
    pub max_links: usize,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
    pub particle_color: Vec3,
    pub link_color: Vec3,
    /// Particle billboard half-size in clip units.
    pub particle_size: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 120,
            shell: Shell {
                min_radius: 1.0,
                max_radius: 3.0,
            },
            velocity_range: 0.005,
            link_threshold: 0.9,
            rebuild_every_n_ticks: 5,
            max_links: 4096,
            seed: None,
            particle_color: Vec3::new(0.55, 0.75, 1.0),
            link_color: Vec3::new(0.4, 0.6, 1.0),
            particle_size: 0.012,
        }
    }
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the shell radii.
    pub fn with_radius_range(mut self, min_radius: f32, max_radius: f32) -> Self {
        self.shell = Shell {
            min_radius,
            max_radius,
        };
        self
    }

    /// Set the per-component drift speed limit.
    pub fn with_velocity_range(mut self, velocity_range: f32) -> Self {
        self.velocity_range = velocity_range;
        self
    }

    /// Set the link distance threshold.
    pub fn with_link_threshold(mut self, threshold: f32) -> Self {
        self.link_threshold = threshold;
        self
    }

    /// Rebuild links every `ticks` ticks.
    pub fn with_rebuild_every(mut self, ticks: u64) -> Self {
        self.rebuild_every_n_ticks = ticks;
        self
    }

    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links = max_links;
        self
    }

    /// Use a fixed seed so the same field is generated every run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_colors(mut self, particle: Vec3, link: Vec3) -> Self {
        self.particle_color = particle;
        self.link_color = link;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shell.validate()?;
        if !(self.velocity_range.is_finite() && self.velocity_range >= 0.0) {
            return Err(ConfigError::InvalidVelocity(self.velocity_range));
        }
        if !(self.link_threshold.is_finite() && self.link_threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold(self.link_threshold));
        }
        if self.rebuild_every_n_ticks == 0 {
            return Err(ConfigError::ZeroRebuildInterval);
        }
        Ok(())
    }

    /// Parse and validate a JSON field config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON field config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Parameters of the rotating double-helix scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixConfig {
    /// Points per strand.
    pub base_pairs: usize,
    pub radius: f32,
    pub height: f32,
    /// Full rotations from bottom to top.
    pub turns: f32,
    /// Phase advance per tick in radians.
    pub rotation_per_tick: f32,
    /// Opacity of the rungs joining paired bases.
    pub rung_opacity: f32,
    pub point_color: Vec3,
    pub link_color: Vec3,
    pub point_size: f32,
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            base_pairs: 40,
            radius: 0.8,
            height: 4.0,
            turns: 3.0,
            rotation_per_tick: 0.01,
            rung_opacity: 0.6,
            point_color: Vec3::new(0.3, 0.9, 0.8),
            link_color: Vec3::new(0.5, 0.7, 1.0),
            point_size: 0.016,
        }
    }
}

impl HelixConfig {
    pub fn with_base_pairs(mut self, base_pairs: usize) -> Self {
        self.base_pairs = base_pairs;
        self
    }

    pub fn with_shape(mut self, radius: f32, height: f32, turns: f32) -> Self {
        self.radius = radius;
        self.height = height;
        self.turns = turns;
        self
    }

    pub fn with_rotation(mut self, radians_per_tick: f32) -> Self {
        self.rotation_per_tick = radians_per_tick;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_pairs == 0 {
            return Err(ConfigError::EmptyHelix);
        }
        Ok(())
    }
}

/// Which decorative scene the viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    #[default]
    Field,
    Helix,
}

/// Everything the viewer binary needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub scene: SceneKind,
    pub field: FieldConfig,
    pub helix: HelixConfig,
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::Field,
            field: FieldConfig::default(),
            helix: HelixConfig::default(),
            width: 1280,
            height: 720,
            title: "linkfield".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.scene {
            SceneKind::Field => self.field.validate(),
            SceneKind::Helix => self.helix.validate(),
        }
    }

    /// Parse and validate a JSON viewer config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON viewer config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
