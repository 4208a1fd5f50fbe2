//! Particle data and its GPU representation.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A point drifting through the field.
///
/// A particle has no identity beyond its index in the scene's particle
/// vector. The vector never grows or shrinks while a scene is alive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    /// Position in world space.
    pub position: Vec3,
    /// Displacement applied per tick.
    pub velocity: Vec3,
}

impl Particle {
    /// Create a particle from a position and a velocity.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// Distance from the origin.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.position.length()
    }
}

/// GPU-side particle instance.
///
/// Only the position is uploaded; vec3 is padded to 16 bytes to match
/// WGSL storage alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleGpu {
    pub position: [f32; 3],
    pub _pad: f32,
}

impl From<Vec3> for ParticleGpu {
    fn from(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _pad: 0.0,
        }
    }
}
