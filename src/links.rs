//! Proximity links between nearby particles.
//!
//! Every pair closer than the link threshold gets a line whose opacity fades
//! linearly to zero at the threshold. The check is all-pairs; fields are tens
//! to low hundreds of particles.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A line between two particles, valid for one rebuild cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Lower particle index.
    pub a: usize,
    /// Higher particle index.
    pub b: usize,
    /// Euclidean distance between the endpoints when the link was built.
    pub distance: f32,
    /// `1 - distance / threshold`, clamped to `[0, 1]`.
    pub opacity: f32,
}

/// Opacity for a pair `distance` apart under `threshold`.
///
/// Always in `[0, 1]`; a non-positive threshold or a non-finite result gives 0.
#[inline]
pub fn link_opacity(distance: f32, threshold: f32) -> f32 {
    if !(threshold > 0.0) {
        return 0.0;
    }
    let opacity = 1.0 - distance / threshold;
    if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// All pairs `(i, j)`, `i < j`, closer than `threshold`.
///
/// Links come out ordered by `(a, b)`. A non-positive or non-finite
/// threshold produces no links.
pub fn build_links(positions: &[Vec3], threshold: f32) -> Vec<Link> {
    let mut links = Vec::new();
    if !(threshold.is_finite() && threshold > 0.0) {
        return links;
    }

    let threshold_sq = threshold * threshold;

    for (i, &pa) in positions.iter().enumerate() {
        for (j, &pb) in positions.iter().enumerate().skip(i + 1) {
            let dist_sq = pa.distance_squared(pb);
            if dist_sq >= threshold_sq {
                continue;
            }
            let distance = dist_sq.sqrt();
            links.push(Link {
                a: i,
                b: j,
                distance,
                opacity: link_opacity(distance, threshold),
            });
        }
    }

    links
}

/// Like [`build_links`], but keeps at most `max_links` links.
///
/// See [`cap_links`] for which links survive.
pub fn build_links_capped(positions: &[Vec3], threshold: f32, max_links: usize) -> Vec<Link> {
    let mut links = build_links(positions, threshold);
    cap_links(&mut links, max_links);
    links
}

/// Trim `links` to the `max_links` shortest, returning how many were dropped.
///
/// Ties on distance keep the lower `(a, b)`. The survivors stay ordered by
/// `(a, b)`, and no particle is favoured by its index.
pub fn cap_links(links: &mut Vec<Link>, max_links: usize) -> usize {
    let found = links.len();
    if found <= max_links {
        return 0;
    }
    if max_links == 0 {
        links.clear();
        return found;
    }

    links.select_nth_unstable_by(max_links - 1, |x, y| {
        x.distance
            .total_cmp(&y.distance)
            .then_with(|| (x.a, x.b).cmp(&(y.a, y.b)))
    });
    links.truncate(max_links);
    links.sort_unstable_by_key(|link| (link.a, link.b));
    found - max_links
}

/// GPU form of a link: endpoint A with opacity in `w`, endpoint B.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LinkSegment {
    pub start: [f32; 4],
    pub end: [f32; 4],
}

impl LinkSegment {
    /// Resolve a link's indices against `points`.
    ///
    /// Returns `None` if either index is out of range.
    pub fn resolve(link: &Link, points: &[Vec3]) -> Option<Self> {
        let a = points.get(link.a)?;
        let b = points.get(link.b)?;
        Some(Self {
            start: a.extend(link.opacity).to_array(),
            end: b.extend(0.0).to_array(),
        })
    }
}
