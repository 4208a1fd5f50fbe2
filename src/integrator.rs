//! Euler step with shell bounce.

use crate::particle::Particle;
use crate::shell::Shell;

/// Advance every particle by `velocity * dt`, then reverse the velocity of
/// any particle that left the shell.
///
/// The reversal negates all three components rather than reflecting the
/// radial one, so a bounced particle retraces its path. Position is never
/// clamped: a particle may sit one step outside the shell until the next
/// step brings it back.
///
/// Returns how many particles bounced.
pub fn integrate(particles: &mut [Particle], shell: &Shell, dt: f32) -> usize {
    let mut bounced = 0;

    for p in particles.iter_mut() {
        p.position += p.velocity * dt;

        if shell.is_outside(p.position.length()) {
            p.velocity = -p.velocity;
            bounced += 1;
        }
    }

    bounced
}
