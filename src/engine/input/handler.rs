use std::collections::HashSet;

use log::{debug, warn};
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

use crate::engine::camera::Camera;
use crate::engine::math::{Vector, Vector3};

const MAX_PITCH: f32 = 88.0 * std::f32::consts::PI / 180.0;

/// Collects window input between frames. Movement is applied per second of
/// frame time, mouse look per pixel of accumulated motion.
pub struct InputHandler {
    /// Radians per pixel.
    pub mouse_sensitivity: f32,
    /// Units per second.
    pub movement_speed: f32,
    pressed_keys: HashSet<KeyCode>,
    mouse_delta: (f64, f64),
    close_requested: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            movement_speed: 3.0,
            pressed_keys: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            close_requested: false,
        }
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_keyboard_input_event(&mut self, keycode: KeyCode, pressed: bool) {
        if pressed {
            if keycode == KeyCode::Escape {
                debug!("Escape pressed, requesting close");
                self.close_requested = true;
            }
            self.pressed_keys.insert(keycode);
        } else {
            self.pressed_keys.remove(&keycode);
        }
    }

    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta.0 += delta.0;
        self.mouse_delta.1 += delta.1;
    }

    /// Grabs and hides the cursor while the window has focus.
    pub fn handle_window_focus(&mut self, focused: bool, window: &Window) {
        if focused {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                warn!("Could not grab the cursor: {err}");
            }
            window.set_cursor_visible(false);
            debug!("Window focused, cursor grabbed");
        } else {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Could not release the cursor: {err}");
            }
            window.set_cursor_visible(true);
            self.pressed_keys.clear();
            self.mouse_delta = (0.0, 0.0);
            debug!("Window unfocused, cursor released");
        }
    }

    pub fn is_pressed(&self, keycode: KeyCode) -> bool {
        self.pressed_keys.contains(&keycode)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Turns the camera by the mouse motion gathered since the last call.
    pub fn apply_mouse_look(&mut self, camera: &mut impl Camera) {
        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let (yaw, pitch) = yaw_pitch(camera.direction());
        let yaw = yaw + dx as f32 * self.mouse_sensitivity;
        let pitch = (pitch - dy as f32 * self.mouse_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        camera.set_direction(direction_from(yaw, pitch));
    }

    /// WASD moves along the ground plane of the view, Space and Shift
    /// straight up and down.
    pub fn apply_movement(&self, camera: &mut impl Camera, delta_secs: f32) {
        use KeyCode::*;
        let (yaw, _) = yaw_pitch(camera.direction());
        let forward = Vector3::new(yaw.sin(), 0.0, -yaw.cos());
        let right = Vector3::new(yaw.cos(), 0.0, yaw.sin());

        let mut direction = Vector3::ZERO;
        if self.is_pressed(KeyW) {
            direction += forward;
        }
        if self.is_pressed(KeyS) {
            direction += -forward;
        }
        if self.is_pressed(KeyD) {
            direction += right;
        }
        if self.is_pressed(KeyA) {
            direction += -right;
        }
        if self.is_pressed(Space) {
            direction += Vector3::UP;
        }
        if self.is_pressed(ShiftLeft) || self.is_pressed(ShiftRight) {
            direction += -Vector3::UP;
        }

        if !direction.is_zero() {
            let step = direction.normalise() * (self.movement_speed * delta_secs);
            camera.set_position(camera.position() + step);
        }
    }
}

/// Yaw about +Y measured from −Z towards +X, pitch above the ground plane.
fn yaw_pitch(direction: Vector3) -> (f32, f32) {
    let d = direction.normalise();
    (d.x.atan2(-d.z), d.y.clamp(-1.0, 1.0).asin())
}

fn direction_from(yaw: f32, pitch: f32) -> Vector3 {
    Vector3::new(pitch.cos() * yaw.sin(), pitch.sin(), -pitch.cos() * yaw.cos())
}
