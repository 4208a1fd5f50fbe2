//! Rotating double helix.
//!
//! Two strands wind around the Y axis half a turn apart. Paired bases are
//! joined by rungs and consecutive bases on a strand by backbone links. The
//! topology never changes; only the phase does.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::config::HelixConfig;
use crate::links::Link;
use crate::scene::{Frame, FrameStyle, Scene, SceneCapacity};

/// Point positions for both strands at rotation `phase`.
///
/// Strand A occupies indices `0..base_pairs`, strand B
/// `base_pairs..2 * base_pairs`; base `i` of A pairs with base `i` of B.
pub fn helix_points(config: &HelixConfig, phase: f32) -> Vec<Vec3> {
    let n = config.base_pairs;
    let strand = |offset: f32| {
        (0..n).map(move |i| {
            let t = i as f32 / n as f32;
            let angle = t * TAU * config.turns + phase + offset;
            Vec3::new(
                config.radius * angle.cos(),
                (t - 0.5) * config.height,
                config.radius * angle.sin(),
            )
        })
    };

    strand(0.0).chain(strand(PI)).collect()
}

/// Rungs and backbone links for `points` as laid out by [`helix_points`].
pub fn helix_links(config: &HelixConfig, points: &[Vec3]) -> Vec<Link> {
    let n = config.base_pairs;
    let mut links = Vec::with_capacity(helix_link_count(n));

    let mut push = |a: usize, b: usize, opacity: f32| {
        links.push(Link {
            a,
            b,
            distance: points[a].distance(points[b]),
            opacity,
        });
    };

    for i in 0..n {
        push(i, n + i, config.rung_opacity);
    }
    for i in 1..n {
        push(i - 1, i, 1.0);
        push(n + i - 1, n + i, 1.0);
    }

    links
}

fn helix_link_count(base_pairs: usize) -> usize {
    base_pairs + 2 * base_pairs.saturating_sub(1)
}

/// The double helix as a drivable [`Scene`].
pub struct HelixScene {
    config: HelixConfig,
    phase: f32,
    tick: u64,
    points: Vec<Vec3>,
    links: Vec<Link>,
}

impl HelixScene {
    pub fn new(config: HelixConfig) -> Self {
        let points = helix_points(&config, 0.0);
        let links = helix_links(&config, &points);
        Self {
            config,
            phase: 0.0,
            tick: 0,
            points,
            links,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}

impl Scene for HelixScene {
    fn step(&mut self) {
        self.tick += 1;
        self.phase = (self.phase + self.config.rotation_per_tick) % TAU;
        self.points = helix_points(&self.config, self.phase);
    }

    fn frame(&self) -> Frame<'_> {
        Frame {
            points: &self.points,
            links: &self.links,
            tick: self.tick,
            style: FrameStyle {
                point_color: self.config.point_color,
                link_color: self.config.link_color,
                point_size: self.config.point_size,
            },
        }
    }

    fn capacity(&self) -> SceneCapacity {
        SceneCapacity {
            points: 2 * self.config.base_pairs,
            links: helix_link_count(self.config.base_pairs),
        }
    }

    fn extent(&self) -> f32 {
        self.config.radius.max(self.config.height * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HelixConfig {
        HelixConfig::default().with_base_pairs(10).with_shape(1.0, 2.0, 1.0)
    }

    #[test]
    fn test_points_lie_on_cylinder() {
        let points = helix_points(&config(), 0.3);
        assert_eq!(points.len(), 20);
        for p in &points {
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
            assert!(p.y >= -1.0 && p.y < 1.0);
        }
    }

    #[test]
    fn test_strands_are_opposite() {
        let points = helix_points(&config(), 0.0);
        for i in 0..10 {
            let a = points[i];
            let b = points[10 + i];
            assert!((a.x + b.x).abs() < 1e-5);
            assert!((a.z + b.z).abs() < 1e-5);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn test_link_topology() {
        let config = config();
        let points = helix_points(&config, 0.0);
        let links = helix_links(&config, &points);
        assert_eq!(links.len(), 10 + 2 * 9);

        let rungs: Vec<_> = links.iter().filter(|l| l.b == l.a + 10).collect();
        assert_eq!(rungs.len(), 10);
        for rung in rungs {
            assert!((rung.distance - 2.0).abs() < 1e-5);
            assert_eq!(rung.opacity, config.rung_opacity);
        }
        assert!(links.iter().all(|l| l.a < l.b));
    }

    #[test]
    fn test_step_rotates_and_keeps_topology() {
        let mut scene = HelixScene::new(config().with_rotation(0.5));
        let before = scene.frame().points.to_vec();
        let links = scene.frame().links.to_vec();
        scene.step();
        assert_eq!(scene.frame().tick, 1);
        assert!((scene.phase() - 0.5).abs() < 1e-6);
        assert_ne!(scene.frame().points, before.as_slice());
        assert_eq!(scene.frame().links, links.as_slice());
    }

    #[test]
    fn test_single_base_pair() {
        let scene = HelixScene::new(config().with_base_pairs(1));
        assert_eq!(
            scene.capacity(),
            SceneCapacity {
                points: 2,
                links: 1,
            }
        );
        assert_eq!(scene.frame().links.len(), 1);
    }
}
