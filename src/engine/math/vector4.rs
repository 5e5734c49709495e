use std::fmt;
use std::hash::{Hash, Hasher};

use super::vector::vector_ops;
use super::{float_key, Vector, Vector3};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const ZERO: Vector4 = Vector4::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn unit(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::new(x, y, z, w).normalise()
    }

    /// Point (`w = 1`) or direction (`w = 0`) from a 3-vector.
    pub fn extend(v: Vector3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Vector for Vector4 {
    #[inline]
    fn splat(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(
            f(self.x, rhs.x),
            f(self.y, rhs.y),
            f(self.z, rhs.z),
            f(self.w, rhs.w),
        )
    }

    #[inline]
    fn sum(self) -> f32 {
        self.x + self.y + self.z + self.w
    }

    #[inline]
    fn any(self, predicate: impl Fn(f32) -> bool) -> bool {
        predicate(self.x) || predicate(self.y) || predicate(self.z) || predicate(self.w)
    }
}

vector_ops!(Vector4);

impl Hash for Vector4 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.to_array() {
            float_key(c).hash(state);
        }
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vector4{{{:.2}, {:.2}, {:.2}, {:.2}}}",
            self.x, self.y, self.z, self.w
        )
    }
}
