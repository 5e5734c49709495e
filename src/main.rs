//! Application entry point.

use lamplight::engine::res::ResourceLoader;
use lamplight::engine::{Engine, WindowSettings};
use lamplight::logging::{init_logging, LoggingConfig};
use lamplight::{AppConfig, MainGame};
use log::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = AppConfig::load().inspect_err(|e| {
        // the logger is configured from this file, so it is not up yet
        eprintln!("Failed to load configuration: {e}");
    })?;

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..Default::default()
    });
    info!("Starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("Configuration from {source}");

    let settings = WindowSettings {
        title: config.window.title.clone(),
        width: config.window.width,
        height: config.window.height,
    };
    let resources = ResourceLoader::new(&config.resource_dir);
    let scene = config.scene.clone();

    let engine = Engine::new(settings, move |gpu| {
        let game = MainGame::new(gpu, resources.clone(), &scene)?;
        Ok(game)
    });
    if let Err(e) = engine.run() {
        error!("Application error: {e}");
        return Err(Box::new(e));
    }

    info!("Exited cleanly");
    Ok(())
}
