//! Particle field generation.
//!
//! Particles are scattered through a spherical shell with a direction that is
//! uniform over the sphere and a small random drift velocity.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::particle::Particle;
use crate::shell::Shell;

/// Random source with helpers for the spawn patterns the field needs.
///
/// ```ignore
/// let mut ctx = SpawnContext::seeded(7);
/// let particles = generate_field(120, &Shell::default(), 0.002, &mut ctx);
/// ```
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Context seeded from the clock, so each run looks different.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Context with a fixed seed for reproducible fields.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Use the seed if one is given, otherwise the clock.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_clock(),
        }
    }

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`, or exactly `min` when the range is empty.
    #[inline]
    pub fn random_between(&mut self, min: f32, max: f32) -> f32 {
        min + self.random() * (max - min)
    }

    /// Random unit vector, uniformly distributed on the unit sphere.
    ///
    /// `phi = acos(2u - 1)` rather than `phi ~ U[0, π)`, which would bunch
    /// points at the poles.
    pub fn random_direction(&mut self) -> Vec3 {
        let theta = self.random() * TAU;
        let phi = (2.0 * self.random() - 1.0).acos();

        Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        )
    }

    /// Random point in the shell: uniform direction, radius uniform in
    /// `[min_radius, max_radius]`.
    pub fn random_in_shell(&mut self, shell: &Shell) -> Vec3 {
        let direction = self.random_direction();
        let r = self.random_between(shell.min_radius, shell.max_radius);
        direction * r
    }

    /// Velocity with each component drawn independently from `[-v, v]`.
    pub fn random_velocity(&mut self, max_speed: f32) -> Vec3 {
        Vec3::new(
            self.random_between(-max_speed, max_speed),
            self.random_between(-max_speed, max_speed),
            self.random_between(-max_speed, max_speed),
        )
    }
}

/// Generate `count` particles inside `shell`, each drifting with a velocity
/// whose components lie in `[-max_speed, max_speed]`.
pub fn generate_field(
    count: usize,
    shell: &Shell,
    max_speed: f32,
    ctx: &mut SpawnContext,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let position = ctx.random_in_shell(shell);
            let velocity = ctx.random_velocity(max_speed);
            Particle::new(position, velocity)
        })
        .collect()
}
