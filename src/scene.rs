//! Simulation state and the per-tick step.
//!
//! [`SceneState`] holds everything that changes from tick to tick and
//! [`step`] advances it. Neither touches a drawing surface, so the
//! simulation runs the same headless as it does under the viewer.

use glam::Vec3;

use crate::config::FieldConfig;
use crate::integrator::integrate;
use crate::links::{build_links, cap_links, Link};
use crate::particle::Particle;
use crate::spawn::{generate_field, SpawnContext};

/// Colors and sizes a surface should draw a frame with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub point_color: Vec3,
    pub link_color: Vec3,
    pub point_size: f32,
}

/// One tick's worth of drawable data.
///
/// Links refer to `points` by index.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub points: &'a [Vec3],
    pub links: &'a [Link],
    pub tick: u64,
    pub style: FrameStyle,
}

/// Upper bounds a surface must size its buffers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCapacity {
    pub points: usize,
    pub links: usize,
}

/// A decorative scene the driver can tick and draw.
pub trait Scene {
    /// Advance by one tick.
    fn step(&mut self);

    /// Data to draw for the current tick.
    fn frame(&self) -> Frame<'_>;

    /// Largest point and link counts [`Scene::frame`] will ever return.
    fn capacity(&self) -> SceneCapacity;

    /// Radius of a sphere around the origin enclosing the scene.
    fn extent(&self) -> f32;
}

impl<S: Scene + ?Sized> Scene for Box<S> {
    fn step(&mut self) {
        (**self).step()
    }

    fn frame(&self) -> Frame<'_> {
        (**self).frame()
    }

    fn capacity(&self) -> SceneCapacity {
        (**self).capacity()
    }

    fn extent(&self) -> f32 {
        (**self).extent()
    }
}

/// Particles, their current links, and the tick counter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneState {
    pub particles: Vec<Particle>,
    pub links: Vec<Link>,
    pub tick_count: u64,
    /// Qualifying links cut by `max_links` on the last rebuild.
    pub dropped_links: usize,
}

impl SceneState {
    /// Spawn a fresh field and build its initial links.
    pub fn new(config: &FieldConfig, ctx: &mut SpawnContext) -> Self {
        let particles = generate_field(
            config.particle_count,
            &config.shell,
            config.velocity_range,
            ctx,
        );
        Self::from_particles(particles, config)
    }

    /// Start from an existing particle set.
    pub fn from_particles(particles: Vec<Particle>, config: &FieldConfig) -> Self {
        let mut state = Self {
            particles,
            links: Vec::new(),
            tick_count: 0,
            dropped_links: 0,
        };
        state.rebuild_links(config);
        state
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Replace the link set with one built from current positions.
    ///
    /// Past `max_links` only the shortest links are kept. A warning is logged
    /// when the field starts overflowing the cap, not on every rebuild.
    pub fn rebuild_links(&mut self, config: &FieldConfig) {
        let mut links = build_links(&self.positions(), config.link_threshold);
        let dropped = cap_links(&mut links, config.max_links);
        if dropped > 0 && self.dropped_links == 0 {
            log::warn!(
                "{} links exceed max_links {}; keeping the shortest",
                dropped + config.max_links,
                config.max_links
            );
        }
        self.links = links;
        self.dropped_links = dropped;
    }

    /// Whether the link set is rebuilt on the current tick.
    pub fn is_rebuild_tick(&self, config: &FieldConfig) -> bool {
        self.tick_count % config.rebuild_every_n_ticks.max(1) == 0
    }
}

/// Advance `state` by one tick.
///
/// Integrates first, then, on every `rebuild_every_n_ticks`-th tick, rebuilds
/// the links from the positions just integrated. Between rebuilds the
/// previous link set is kept.
pub fn step(mut state: SceneState, config: &FieldConfig, dt: f32) -> SceneState {
    integrate(&mut state.particles, &config.shell, dt);
    state.tick_count += 1;

    if state.is_rebuild_tick(config) {
        state.rebuild_links(config);
        log::trace!(
            "tick {}: rebuilt {} links",
            state.tick_count,
            state.links.len()
        );
    }

    state
}

/// The particle-link field as a drivable [`Scene`].
pub struct FieldScene {
    config: FieldConfig,
    state: SceneState,
    points: Vec<Vec3>,
}

impl FieldScene {
    pub fn new(config: FieldConfig) -> Self {
        let mut ctx = SpawnContext::from_seed(config.seed);
        let state = SceneState::new(&config, &mut ctx);
        let points = state.positions();
        Self {
            config,
            state,
            points,
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

impl Scene for FieldScene {
    fn step(&mut self) {
        // One unit step per tick.
        self.state = step(std::mem::take(&mut self.state), &self.config, 1.0);
        self.points.clear();
        self.points
            .extend(self.state.particles.iter().map(|p| p.position));
    }

    fn frame(&self) -> Frame<'_> {
        Frame {
            points: &self.points,
            links: &self.state.links,
            tick: self.state.tick_count,
            style: FrameStyle {
                point_color: self.config.particle_color,
                link_color: self.config.link_color,
                point_size: self.config.particle_size,
            },
        }
    }

    fn capacity(&self) -> SceneCapacity {
        let n = self.config.particle_count;
        let pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
        SceneCapacity {
            points: n,
            links: pairs.min(self.config.max_links),
        }
    }

    fn extent(&self) -> f32 {
        self.config.shell.max_radius
    }
}
