//! Vector, colour and matrix types used by the engine.
//!
//! Everything here is plain `f32` arithmetic. Operations that can divide by
//! zero return a [`MathError`] instead of producing infinities.

pub mod color;
pub mod matrix4;
pub mod projection;
pub mod vector;
pub mod vector2;
pub mod vector3;
pub mod vector4;

pub use color::{Color3, Color4};
pub use matrix4::Matrix4;
pub use vector::Vector;
pub use vector2::Vector2;
pub use vector3::Vector3;
pub use vector4::Vector4;

pub const EPSILON: f32 = 1e-6;
pub const PI: f32 = std::f32::consts::PI;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    #[error("division by zero: cannot invert a matrix whose determinant is 0")]
    SingularMatrix,

    #[error("expected {expected} matrix elements but got {actual}")]
    BadLength { expected: usize, actual: usize },
}

pub fn cotan(theta: f32) -> f32 {
    1.0 / theta.tan()
}

/// Hash key for a float, treating `-0.0` and `0.0` as the same value.
#[inline]
pub(crate) fn float_key(value: f32) -> u32 {
    (value + 0.0).to_bits()
}

#[cfg(test)]
pub(crate) fn assert_close(expected: f32, actual: f32, tolerance: f32) {
    assert!(
        (expected - actual).abs() <= tolerance,
        "expected {expected} but was {actual} (tolerance {tolerance})"
    );
}
