//! Spherical shell bounds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The region between two concentric spheres centred on the origin.
///
/// Particles are confined to the shell by velocity reversal, not by
/// clamping, so a particle may sit up to one step outside it before the
/// bounce carries it back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Shell {
    /// Create a shell, rejecting negative, non-finite or inverted radii.
    pub fn new(min_radius: f32, max_radius: f32) -> Result<Self, ConfigError> {
        let shell = Self {
            min_radius,
            max_radius,
        };
        shell.validate()?;
        Ok(shell)
    }

    /// Check that `0 <= min_radius <= max_radius` and both are finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.min_radius.is_finite()
            && self.max_radius.is_finite()
            && self.min_radius >= 0.0
            && self.min_radius <= self.max_radius;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidShell {
                min: self.min_radius,
                max: self.max_radius,
            })
        }
    }

    /// Whether a point lies inside the shell, both radii inclusive.
    pub fn contains(&self, point: Vec3) -> bool {
        let r = point.length();
        r >= self.min_radius && r <= self.max_radius
    }

    /// Whether a radius triggers a bounce.
    ///
    /// Strict on both ends: a particle exactly on a boundary stays put.
    #[inline]
    pub fn is_outside(&self, radius: f32) -> bool {
        radius > self.max_radius || radius < self.min_radius
    }

    /// Shell thickness.
    pub fn thickness(&self) -> f32 {
        self.max_radius - self.min_radius
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self {
            min_radius: 0.5,
            max_radius: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_radii() {
        assert!(matches!(
            Shell::new(2.0, 1.0),
            Err(ConfigError::InvalidShell { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(Shell::new(-0.1, 1.0).is_err());
        assert!(Shell::new(0.0, f32::NAN).is_err());
        assert!(Shell::new(0.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_degenerate_shell_is_allowed() {
        let shell = Shell::new(1.0, 1.0).unwrap();
        assert_eq!(shell.thickness(), 0.0);
        assert!(shell.contains(Vec3::X));
    }

    #[test]
    fn test_boundary_is_not_outside() {
        let shell = Shell::new(0.5, 2.0).unwrap();
        assert!(!shell.is_outside(2.0));
        assert!(!shell.is_outside(0.5));
        assert!(shell.is_outside(2.0001));
        assert!(shell.is_outside(0.4999));
    }
}
