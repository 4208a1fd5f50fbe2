//! Error types for linkfield.
//!
//! Configuration, GPU initialization, per-tick drawing and the viewer
//! each get their own error enum.

use thiserror::Error;

/// Errors produced while building or loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Shell radii are negative, non-finite or inverted.
    #[error("invalid shell radii: min {min}, max {max} (need 0 <= min <= max)")]
    InvalidShell {
        /// Requested inner radius
        min: f32,
        /// Requested outer radius
        max: f32,
    },

    /// Velocity range must be finite and non-negative.
    #[error("invalid velocity range {0} (must be finite and >= 0)")]
    InvalidVelocity(f32),

    /// Link threshold must be finite and non-negative.
    #[error("invalid link threshold {0} (must be finite and >= 0)")]
    InvalidThreshold(f32),

    /// Links are rebuilt every N ticks; N must be at least 1.
    #[error("rebuild interval must be at least 1 tick")]
    ZeroRebuildInterval,

    /// Helix needs at least one base pair.
    #[error("helix must have at least one base pair")]
    EmptyHelix,

    /// Failed to read a config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during GPU initialization.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// Surface reported no supported texture formats.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,

    /// The scene needs a buffer larger than the device allows.
    #[error("{buffer} buffer needs {size} bytes but the device allows {limit}")]
    BufferTooLarge {
        /// Which buffer
        buffer: &'static str,
        /// Requested size in bytes
        size: u64,
        /// Device limit in bytes
        limit: u64,
    },
}

/// Errors raised by the scene driver and its drawing surface.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The drawing surface could not be acquired.
    #[error("drawing surface unavailable: {0}")]
    Gpu(#[from] GpuError),

    /// Surface acquisition failed for a non-GPU reason.
    #[error("drawing surface unavailable: {0}")]
    Unavailable(String),

    /// A frame could not be presented.
    #[error("failed to present frame: {0}")]
    Present(#[from] wgpu::SurfaceError),

    /// A frame could not be drawn.
    #[error("failed to draw frame {tick}: {reason}")]
    Draw {
        /// Tick on which drawing failed
        tick: u64,
        /// Why the surface rejected the frame
        reason: String,
    },
}

/// Errors that can occur when running the viewer.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// Invalid viewer configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_error_message_names_both_radii() {
        let err = ConfigError::InvalidShell { min: 2.0, max: 1.0 };
        let msg = err.to_string();
        assert!(msg.contains("min 2"));
        assert!(msg.contains("max 1"));
    }

    #[test]
    fn test_config_error_converts_into_viewer_error() {
        let err: ViewerError = ConfigError::ZeroRebuildInterval.into();
        assert!(matches!(err, ViewerError::Config(ConfigError::ZeroRebuildInterval)));
    }

    #[test]
    fn test_buffer_limit_error_names_buffer() {
        let err = GpuError::BufferTooLarge {
            buffer: "link",
            size: 160_000_000,
            limit: 134_217_728,
        };
        let msg = SceneError::from(err).to_string();
        assert!(msg.contains("link buffer needs 160000000 bytes"));
    }
}
