//! Keyboard and mouse state, turned into camera movement once per frame.

mod handler;

pub use handler::InputHandler;
