//! Windowed viewer.
//!
//! Opens a window, mounts the configured scene on a [`GpuSurface`] and ticks
//! it once per redraw. Left-drag orbits the camera, the wheel zooms.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::{SceneKind, ViewerConfig};
use crate::driver::{SceneDriver, TickOutcome};
use crate::error::{SceneError, ViewerError};
use crate::gpu::GpuSurface;
use crate::helix::HelixScene;
use crate::scene::{FieldScene, Scene};

type Driver = SceneDriver<Box<dyn Scene>, GpuSurface>;

/// Run the viewer. Blocks until the window is closed.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Build the scene a config asks for.
pub fn build_scene(config: &ViewerConfig) -> Box<dyn Scene> {
    match config.scene {
        SceneKind::Field => Box::new(FieldScene::new(config.field.clone())),
        SceneKind::Helix => Box::new(HelixScene::new(config.helix.clone())),
    }
}

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    driver: Option<Driver>,
    error: Option<ViewerError>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            driver: None,
            error: None,
            mouse_pressed: false,
            last_mouse_pos: None,
        }
    }

    fn gpu_surface(&mut self) -> Option<&mut GpuSurface> {
        self.driver.as_mut().and_then(|d| d.surface_mut())
    }

    fn shutdown(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.dispose();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let scene = build_scene(&self.config);
        let extent = scene.extent();
        let driver = SceneDriver::mount(scene, |capacity| {
            pollster::block_on(GpuSurface::new(window.clone(), capacity, extent))
                .map_err(SceneError::from)
        });
        self.driver = Some(driver);

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(surface) = self.gpu_surface() {
                            surface.camera.orbit(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(surface) = self.gpu_surface() {
                    surface.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(driver) = self.driver.as_mut() else {
                    return;
                };
                match driver.tick() {
                    TickOutcome::Drawn => {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                    // Degraded or stopped: the window stays blank.
                    TickOutcome::Idle | TickOutcome::Stopped(_) => {}
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
