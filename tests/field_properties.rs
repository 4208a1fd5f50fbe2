//! Behavioural properties of the particle-link field, checked through the
//! public API.

use linkfield::{
    build_links, generate_field, integrate, step, FieldConfig, Link, Particle, SceneState, Shell,
    SpawnContext, Vec3,
};

const EPS: f32 = 1e-4;

fn field_config() -> FieldConfig {
    FieldConfig::new()
        .with_particle_count(150)
        .with_radius_range(1.0, 2.5)
        .with_velocity_range(0.03)
        .with_link_threshold(0.7)
        .with_seed(42)
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_every_generated_particle_is_inside_shell() {
    for seed in 0..10 {
        let shell = Shell::new(0.25, 4.0).unwrap();
        let particles = generate_field(300, &shell, 0.01, &mut SpawnContext::seeded(seed));
        for p in &particles {
            let r = p.radius();
            assert!(r >= shell.min_radius - EPS, "seed {seed}: r = {r}");
            assert!(r <= shell.max_radius + EPS, "seed {seed}: r = {r}");
        }
    }
}

// ============================================================================
// Integration
// ============================================================================

#[test]
fn test_shell_holds_within_one_step_of_overshoot() {
    let config = field_config();
    let mut state = SceneState::new(&config, &mut SpawnContext::seeded(7));
    let max_step = Vec3::splat(config.velocity_range).length();
    let shell = config.shell;

    for tick in 0..2_000 {
        state = step(state, &config, 1.0);
        for p in &state.particles {
            let r = p.radius();
            assert!(
                r >= shell.min_radius - max_step - EPS && r <= shell.max_radius + max_step + EPS,
                "tick {tick}: r = {r}"
            );
        }
    }
}

#[test]
fn test_bounce_boundary_is_strict() {
    let shell = Shell::new(0.5, 2.0).unwrap();

    // Lands exactly on max_radius: no bounce.
    let mut on = [Particle::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.5, 0.0))];
    assert_eq!(integrate(&mut on, &shell, 1.0), 0);
    assert_eq!(on[0].position.length(), 2.0);
    assert_eq!(on[0].velocity, Vec3::new(0.0, 0.5, 0.0));

    // Lands just past it: bounce on the same step.
    let mut past = [Particle::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.5625, 0.0))];
    assert_eq!(integrate(&mut past, &shell, 1.0), 1);
    assert_eq!(past[0].velocity, Vec3::new(0.0, -0.5625, 0.0));
}

// ============================================================================
// Links
// ============================================================================

fn pair_key(link: &Link) -> (usize, usize) {
    (link.a.min(link.b), link.a.max(link.b))
}

#[test]
fn test_links_are_exactly_pairs_under_threshold() {
    let config = field_config();
    let state = SceneState::new(&config, &mut SpawnContext::seeded(3));
    let positions = state.positions();
    let threshold = config.link_threshold;
    let links = build_links(&positions, threshold);

    let mut expected = Vec::new();
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if positions[i].distance_squared(positions[j]) < threshold * threshold {
                expected.push((i, j));
            }
        }
    }
    let found: Vec<_> = links.iter().map(pair_key).collect();
    assert_eq!(found, expected);

    for link in &links {
        let d = positions[link.a].distance(positions[link.b]);
        let opacity = (1.0 - d / threshold).clamp(0.0, 1.0);
        assert!((link.opacity - opacity).abs() < 1e-5);
        assert!((0.0..=1.0).contains(&link.opacity));
    }
}

#[test]
fn test_links_do_not_depend_on_order() {
    let config = field_config();
    let positions = SceneState::new(&config, &mut SpawnContext::seeded(4)).positions();
    let n = positions.len();

    let reversed: Vec<_> = positions.iter().rev().copied().collect();

    let mut forward: Vec<_> = build_links(&positions, config.link_threshold)
        .iter()
        .map(|l| (pair_key(l), l.opacity))
        .collect();
    let mut backward: Vec<_> = build_links(&reversed, config.link_threshold)
        .iter()
        .map(|l| {
            let a = n - 1 - l.a;
            let b = n - 1 - l.b;
            ((a.min(b), a.max(b)), l.opacity)
        })
        .collect();

    forward.sort_by_key(|(k, _)| *k);
    backward.sort_by_key(|(k, _)| *k);
    assert_eq!(forward, backward);
}

#[test]
fn test_link_builder_is_idempotent() {
    let positions = SceneState::new(&field_config(), &mut SpawnContext::seeded(5)).positions();
    assert_eq!(build_links(&positions, 0.7), build_links(&positions, 0.7));
}

#[test]
fn test_unit_square_scenario() {
    let square = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    let links = build_links(&square, 1.5);
    let pairs: Vec<_> = links.iter().map(pair_key).collect();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);

    for link in &links {
        let diagonal = (link.a, link.b) == (0, 2) || (link.a, link.b) == (1, 3);
        let expected = if diagonal { 0.057 } else { 0.333 };
        assert!((link.opacity - expected).abs() < 1e-3, "{link:?}");
    }

    assert!(build_links(&square, 1.0).is_empty());
    assert_eq!(build_links(&square, 1.0001).len(), 4);
}
