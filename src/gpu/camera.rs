//! Camera for 3D orbit view.

use glam::{Mat4, Vec3};

const FOV_Y_DEGREES: f32 = 45.0;

/// Orbit camera looking at the origin.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Yaw added every frame while the user is not dragging.
    pub spin: f32,
}

impl Camera {
    /// Camera far enough back to see a sphere of radius `extent`.
    pub fn framing(extent: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: (extent * 2.8).max(1.0),
            target: Vec3::ZERO,
            spin: 0.001,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Combined projection and view for a viewport of the given aspect.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let far = (self.distance * 4.0).max(100.0);
        let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, 0.1, far);
        proj * self.view_matrix()
    }

    /// Rotate by a mouse drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Move closer or further by a scroll amount.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.3).clamp(0.5, 50.0);
    }

    pub fn advance_spin(&mut self) {
        self.yaw += self.spin;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::framing(1.0)
    }
}
