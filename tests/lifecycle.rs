//! Mount / tick / dispose lifecycle of the scene driver.

use linkfield::prelude::*;
use linkfield::{GpuError, SceneError, TickOutcome};

fn field() -> FieldScene {
    FieldScene::new(
        FieldConfig::new()
            .with_particle_count(40)
            .with_link_threshold(1.2)
            .with_seed(99),
    )
}

#[test]
fn test_repeated_mounts_do_not_leak() {
    let counter = ResourceCounter::new();

    for round in 0..25 {
        let mut driver = SceneDriver::mount(field(), |cap| HeadlessSurface::acquire(&counter, cap));
        assert_eq!(driver.state(), DriverState::Running);
        assert!(counter.live() > 0);

        for _ in 0..(round * 3) {
            assert!(matches!(driver.tick(), TickOutcome::Drawn));
        }

        driver.dispose();
        assert_eq!(counter.live(), 0, "round {round}");
    }
}

#[test]
fn test_unmount_by_drop_releases() {
    let counter = ResourceCounter::new();
    for _ in 0..10 {
        let mut driver = SceneDriver::mount(field(), |cap| HeadlessSurface::acquire(&counter, cap));
        driver.tick();
    }
    assert_eq!(counter.live(), 0);
}

#[test]
fn test_draw_failure_mid_run_releases() {
    let counter = ResourceCounter::new();
    let mut driver = SceneDriver::mount(field(), |cap| {
        HeadlessSurface::acquire(&counter, cap).map(|s| s.fail_on_tick(10))
    });

    let mut drawn = 0;
    loop {
        match driver.tick() {
            TickOutcome::Drawn => drawn += 1,
            TickOutcome::Stopped(SceneError::Draw { tick, .. }) => {
                assert_eq!(tick, 10);
                break;
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(drawn, 9);
    assert_eq!(driver.state(), DriverState::Disposed);
    assert_eq!(counter.live(), 0);
}

#[test]
fn test_unavailable_surface_degrades_quietly() {
    let mut driver: SceneDriver<FieldScene, HeadlessSurface> = SceneDriver::mount(field(), |_| {
        Err(SceneError::Unavailable("no rendering context".to_string()))
    });

    assert_eq!(driver.state(), DriverState::Degraded);
    for _ in 0..5 {
        assert!(matches!(driver.tick(), TickOutcome::Idle));
    }
    driver.dispose();
    assert_eq!(driver.state(), DriverState::Disposed);
}

#[test]
fn test_oversized_buffer_degrades() {
    let mut driver: SceneDriver<FieldScene, HeadlessSurface> = SceneDriver::mount(field(), |_| {
        Err(GpuError::BufferTooLarge {
            buffer: "link",
            size: 160_000_000,
            limit: 134_217_728,
        }
        .into())
    });

    assert_eq!(driver.state(), DriverState::Degraded);
    assert!(matches!(driver.tick(), TickOutcome::Idle));
}

#[test]
fn test_helix_runs_under_driver() {
    let counter = ResourceCounter::new();
    let helix = HelixScene::new(HelixConfig::default().with_base_pairs(12));
    let mut driver = SceneDriver::mount(helix, |cap| HeadlessSurface::acquire(&counter, cap));

    for _ in 0..30 {
        driver.tick();
    }
    let last = driver.surface().unwrap().last_frame().unwrap();
    assert_eq!(last.tick, 30);
    assert_eq!(last.points, 24);
    assert_eq!(last.links, 12 + 2 * 11);

    drop(driver);
    assert_eq!(counter.live(), 0);
}

#[test]
fn test_boxed_scenes_share_a_driver_type() {
    let counter = ResourceCounter::new();
    let scenes: Vec<Box<dyn Scene>> = vec![
        Box::new(field()),
        Box::new(HelixScene::new(HelixConfig::default())),
    ];

    for scene in scenes {
        let mut driver = SceneDriver::mount(scene, |cap| HeadlessSurface::acquire(&counter, cap));
        assert!(matches!(driver.tick(), TickOutcome::Drawn));
    }
    assert_eq!(counter.live(), 0);
}
