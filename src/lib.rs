//! # linkfield
//!
//! Decorative particle-link fields: particles drift inside a spherical shell
//! and every pair closer than a threshold is joined by a line that fades out
//! with distance.
//!
//! The simulation is plain data. [`SceneState`] is advanced by [`step`], which
//! never touches a GPU, so it can be driven and tested headless. Drawing goes
//! through the [`DrawSurface`] trait; [`SceneDriver`] owns one scene and one
//! surface for the lifetime of a mount and guarantees the surface is released
//! exactly once.
//!
//! ## Quick Start
//!
//! ```ignore
//! use linkfield::prelude::*;
//!
//! let config = ViewerConfig {
//!     field: FieldConfig::new()
//!         .with_particle_count(150)
//!         .with_radius_range(1.0, 3.0)
//!         .with_link_threshold(0.9),
//!     ..Default::default()
//! };
//! linkfield::viewer::run(config)?;
//! ```
//!
//! ## Headless
//!
//! ```ignore
//! use linkfield::prelude::*;
//!
//! let counter = ResourceCounter::new();
//! let scene = FieldScene::new(FieldConfig::new().with_seed(1));
//! let mut driver = SceneDriver::mount(scene, |cap| HeadlessSurface::acquire(&counter, cap));
//! for _ in 0..60 {
//!     driver.tick();
//! }
//! driver.dispose();
//! assert_eq!(counter.live(), 0);
//! ```
//!
//! ## Scenes
//!
//! | Scene | Description |
//! |-------|-------------|
//! | [`FieldScene`] | Drifting particles in a shell, links rebuilt every few ticks |
//! | [`HelixScene`] | Rotating double helix with rungs and backbone links |

pub mod config;
mod driver;
pub mod error;
pub mod gpu;
mod helix;
mod integrator;
mod links;
mod particle;
mod scene;
mod shell;
mod spawn;
mod surface;
pub mod viewer;

pub use config::{FieldConfig, HelixConfig, SceneKind, ViewerConfig};
pub use driver::{DriverState, SceneDriver, TickOutcome};
pub use error::{ConfigError, GpuError, SceneError, ViewerError};
pub use glam::Vec3;
pub use helix::{helix_links, helix_points, HelixScene};
pub use integrator::integrate;
pub use links::{build_links, build_links_capped, cap_links, link_opacity, Link, LinkSegment};
pub use particle::{Particle, ParticleGpu};
pub use scene::{step, FieldScene, Frame, FrameStyle, Scene, SceneCapacity, SceneState};
pub use shell::Shell;
pub use spawn::{generate_field, SpawnContext};
pub use surface::{DrawSurface, DrawnFrame, HeadlessSurface, ResourceCounter};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use linkfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{FieldConfig, HelixConfig, SceneKind, ViewerConfig};
    pub use crate::driver::{DriverState, SceneDriver, TickOutcome};
    pub use crate::helix::HelixScene;
    pub use crate::scene::{FieldScene, Scene, SceneState};
    pub use crate::shell::Shell;
    pub use crate::surface::{DrawSurface, HeadlessSurface, ResourceCounter};
    pub use crate::Vec3;
}
