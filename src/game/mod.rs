//! The demo scene.

mod main_game;
pub mod scene;

pub use main_game::{MainGame, SceneError};
