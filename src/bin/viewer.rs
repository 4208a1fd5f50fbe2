//! Particle-link field viewer.
//!
//! Run with: `cargo run --release --bin linkfield-viewer [config.json]`
//!
//! Set `RUST_LOG=linkfield=debug` for lifecycle logging.

use linkfield::config::ViewerConfig;
use linkfield::error::ViewerError;

fn main() -> Result<(), ViewerError> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {}", path);
            ViewerConfig::from_path(&path)?
        }
        None => ViewerConfig::default(),
    };

    log::info!(
        "showing {:?} scene at {}x{}",
        config.scene,
        config.width,
        config.height
    );
    linkfield::viewer::run(config)
}
