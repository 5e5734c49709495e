//! Reusable engine pieces: maths, resources, lights, cameras, entities and
//! the wgpu renderer, plus the winit game loop that drives them.

pub mod camera;
pub mod entity;
pub mod graphics;
pub mod input;
pub mod light;
pub mod math;
pub mod res;
pub mod runtime;
pub mod util;

pub use entity::{Entity, EntityBuilder};
pub use runtime::{Engine, Game, RuntimeError, WindowSettings};
