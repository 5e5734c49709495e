use std::fmt;
use std::hash::{Hash, Hasher};

use super::vector::vector_ops;
use super::{float_key, Vector};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn unit(x: f32, y: f32) -> Self {
        Self::new(x, y).normalise()
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Vector for Vector2 {
    #[inline]
    fn splat(value: f32) -> Self {
        Self::new(value, value)
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, rhs.x), f(self.y, rhs.y))
    }

    #[inline]
    fn sum(self) -> f32 {
        self.x + self.y
    }

    #[inline]
    fn any(self, predicate: impl Fn(f32) -> bool) -> bool {
        predicate(self.x) || predicate(self.y)
    }
}

vector_ops!(Vector2);

impl Hash for Vector2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        float_key(self.x).hash(state);
        float_key(self.y).hash(state);
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector2{{{:.2}, {:.2}}}", self.x, self.y)
    }
}
