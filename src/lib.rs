//! A small forward renderer: textured, Phong-lit crates and lamps.

pub mod config;
pub mod engine;
pub mod game;
pub mod logging;

pub use config::AppConfig;
pub use game::MainGame;
