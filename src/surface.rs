//! Drawing surfaces.
//!
//! A surface is acquired once when a scene is mounted and released once when
//! it is torn down. [`HeadlessSurface`] draws nothing and exists for tests
//! and for running scenes without a window.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::SceneError;
use crate::scene::{Frame, SceneCapacity};

/// Something a scene can be drawn onto.
pub trait DrawSurface {
    /// The viewport changed size.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), SceneError>;

    /// Free every resource the surface holds. Must be idempotent.
    fn release(&mut self);
}

/// Shared count of live drawing resources.
///
/// Clones share the same count. After every surface built against it has
/// been released the count returns to zero.
#[derive(Debug, Clone, Default)]
pub struct ResourceCounter {
    live: Arc<AtomicUsize>,
}

impl ResourceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, n: usize) {
        self.live.fetch_add(n, Ordering::SeqCst);
    }

    pub fn release(&self, n: usize) {
        self.live.fetch_sub(n, Ordering::SeqCst);
    }

    /// Resources currently held.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Summary of the last frame a [`HeadlessSurface`] drew.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnFrame {
    pub tick: u64,
    pub points: usize,
    pub links: usize,
}

/// Point buffer, link buffer and pipeline.
const HEADLESS_RESOURCES: usize = 3;

/// A surface that records what it was asked to draw.
#[derive(Debug)]
pub struct HeadlessSurface {
    counter: ResourceCounter,
    capacity: SceneCapacity,
    held: usize,
    size: (u32, u32),
    frames_drawn: u64,
    last_frame: Option<DrawnFrame>,
    fail_on_tick: Option<u64>,
}

impl HeadlessSurface {
    /// Acquire a surface sized for `capacity`, counting its resources in
    /// `counter`.
    pub fn acquire(counter: &ResourceCounter, capacity: SceneCapacity) -> Result<Self, SceneError> {
        counter.acquire(HEADLESS_RESOURCES);
        log::debug!(
            "headless surface acquired ({} points, {} links)",
            capacity.points,
            capacity.links
        );
        Ok(Self {
            counter: counter.clone(),
            capacity,
            held: HEADLESS_RESOURCES,
            size: (0, 0),
            frames_drawn: 0,
            last_frame: None,
            fail_on_tick: None,
        })
    }

    /// Make the draw for `tick` fail.
    pub fn fail_on_tick(mut self, tick: u64) -> Self {
        self.fail_on_tick = Some(tick);
        self
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn last_frame(&self) -> Option<&DrawnFrame> {
        self.last_frame.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_released(&self) -> bool {
        self.held == 0
    }
}

impl DrawSurface for HeadlessSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), SceneError> {
        if self.is_released() {
            return Err(SceneError::Draw {
                tick: frame.tick,
                reason: "surface already released".to_string(),
            });
        }
        if self.fail_on_tick == Some(frame.tick) {
            return Err(SceneError::Draw {
                tick: frame.tick,
                reason: "scripted failure".to_string(),
            });
        }

        self.frames_drawn += 1;
        self.last_frame = Some(DrawnFrame {
            tick: frame.tick,
            points: frame.points.len().min(self.capacity.points),
            links: frame.links.len().min(self.capacity.links),
        });
        Ok(())
    }

    fn release(&mut self) {
        if self.held > 0 {
            self.counter.release(self.held);
            self.held = 0;
            log::debug!("headless surface released");
        }
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::FrameStyle;
    use glam::Vec3;

    fn capacity() -> SceneCapacity {
        SceneCapacity {
            points: 4,
            links: 6,
        }
    }

    fn style() -> FrameStyle {
        FrameStyle {
            point_color: Vec3::ONE,
            link_color: Vec3::ONE,
            point_size: 0.01,
        }
    }

    #[test]
    fn test_release_is_idempotent() {
        let counter = ResourceCounter::new();
        let mut surface = HeadlessSurface::acquire(&counter, capacity()).unwrap();
        assert_eq!(counter.live(), HEADLESS_RESOURCES);
        surface.release();
        surface.release();
        assert_eq!(counter.live(), 0);
        drop(surface);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn test_drop_releases() {
        let counter = ResourceCounter::new();
        {
            let _a = HeadlessSurface::acquire(&counter, capacity()).unwrap();
            let _b = HeadlessSurface::acquire(&counter, capacity()).unwrap();
            assert_eq!(counter.live(), 2 * HEADLESS_RESOURCES);
        }
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn test_draw_records_frame_and_scripted_failure() {
        let counter = ResourceCounter::new();
        let mut surface = HeadlessSurface::acquire(&counter, capacity())
            .unwrap()
            .fail_on_tick(2);
        let points = [Vec3::ZERO, Vec3::X];

        let frame = Frame {
            points: &points,
            links: &[],
            tick: 1,
            style: style(),
        };
        surface.draw(&frame).unwrap();
        assert_eq!(
            surface.last_frame(),
            Some(&DrawnFrame {
                tick: 1,
                points: 2,
                links: 0,
            })
        );

        let frame = Frame { tick: 2, ..frame };
        assert!(matches!(surface.draw(&frame), Err(SceneError::Draw { tick: 2, .. })));
        assert_eq!(surface.frames_drawn(), 1);
    }

    #[test]
    fn test_draw_after_release_fails() {
        let counter = ResourceCounter::new();
        let mut surface = HeadlessSurface::acquire(&counter, capacity()).unwrap();
        surface.release();
        let frame = Frame {
            points: &[],
            links: &[],
            tick: 0,
            style: style(),
        };
        assert!(surface.draw(&frame).is_err());
    }
}
