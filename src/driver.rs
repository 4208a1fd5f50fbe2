//! Scene driver: owns a scene and its drawing surface for one mount.
//!
//! ```text
//! Uninitialized --start ok--> Running --dispose / draw error--> Disposed
//!       |
//!       +--start err--> Degraded (draws nothing, never retried)
//! ```
//!
//! The host owns the frame loop and calls [`SceneDriver::tick`] once per
//! display refresh. Each tick steps the scene and then draws it, so the
//! draw always sees the positions integrated on the same tick.

use crate::error::SceneError;
use crate::scene::{Scene, SceneCapacity};
use crate::surface::DrawSurface;

/// Lifecycle of a mounted scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Running,
    /// Surface acquisition failed; the scene stays blank.
    Degraded,
    Disposed,
}

/// What a call to [`SceneDriver::tick`] did.
#[derive(Debug)]
pub enum TickOutcome {
    /// The scene stepped and a frame was drawn.
    Drawn,
    /// Not running; nothing happened.
    Idle,
    /// Drawing failed. The driver has released its surface and will not
    /// tick again.
    Stopped(SceneError),
}

pub struct SceneDriver<S: Scene, D: DrawSurface> {
    scene: S,
    surface: Option<D>,
    state: DriverState,
}

impl<S: Scene, D: DrawSurface> SceneDriver<S, D> {
    /// A driver that has not acquired a surface yet.
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            surface: None,
            state: DriverState::Uninitialized,
        }
    }

    /// Create a driver and immediately acquire its surface.
    ///
    /// Never fails: if `acquire` errors the driver comes back
    /// [`DriverState::Degraded`].
    pub fn mount<F>(scene: S, acquire: F) -> Self
    where
        F: FnOnce(SceneCapacity) -> Result<D, SceneError>,
    {
        let mut driver = Self::new(scene);
        driver.start(acquire);
        driver
    }

    /// Acquire the surface and start running.
    ///
    /// Only valid from [`DriverState::Uninitialized`]; later calls are
    /// ignored and return `false`. A failed acquisition is logged once.
    pub fn start<F>(&mut self, acquire: F) -> bool
    where
        F: FnOnce(SceneCapacity) -> Result<D, SceneError>,
    {
        if self.state != DriverState::Uninitialized {
            return false;
        }

        match acquire(self.scene.capacity()) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.state = DriverState::Running;
                log::info!("scene mounted");
                true
            }
            Err(e) => {
                log::warn!("scene disabled, drawing surface unavailable: {}", e);
                self.state = DriverState::Degraded;
                false
            }
        }
    }

    /// Step the scene and draw it.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != DriverState::Running {
            return TickOutcome::Idle;
        }
        let Some(surface) = self.surface.as_mut() else {
            return TickOutcome::Idle;
        };

        self.scene.step();
        let result = surface.draw(&self.scene.frame());

        match result {
            Ok(()) => TickOutcome::Drawn,
            Err(e) => {
                log::error!("stopping scene after draw failure: {}", e);
                self.dispose();
                TickOutcome::Stopped(e)
            }
        }
    }

    /// Forward a viewport size change to the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.state != DriverState::Running {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
    }

    /// Stop ticking and release the surface. Safe to call any number of
    /// times; also called on drop.
    pub fn dispose(&mut self) {
        if self.state == DriverState::Disposed {
            return;
        }
        self.state = DriverState::Disposed;
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            log::info!("scene disposed");
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn surface(&self) -> Option<&D> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut D> {
        self.surface.as_mut()
    }
}

impl<S: Scene, D: DrawSurface> Drop for SceneDriver<S, D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
