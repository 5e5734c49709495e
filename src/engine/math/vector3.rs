use std::fmt;
use std::hash::{Hash, Hasher};

use super::vector::vector_ops;
use super::{float_key, Vector};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);
    pub const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn unit(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z).normalise()
    }

    /// Not commutative: `a.cross(b) == -(b.cross(a))`.
    pub fn cross(self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    pub fn is_zero(self) -> bool {
        self == Vector3::ZERO
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Vector for Vector3 {
    #[inline]
    fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, rhs.x), f(self.y, rhs.y), f(self.z, rhs.z))
    }

    #[inline]
    fn sum(self) -> f32 {
        self.x + self.y + self.z
    }

    #[inline]
    fn any(self, predicate: impl Fn(f32) -> bool) -> bool {
        predicate(self.x) || predicate(self.y) || predicate(self.z)
    }
}

vector_ops!(Vector3);

impl Hash for Vector3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        float_key(self.x).hash(state);
        float_key(self.y).hash(state);
        float_key(self.z).hash(state);
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector3{{{:.2}, {:.2}, {:.2}}}", self.x, self.y, self.z)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;
    use crate::engine::math::{assert_close, MathError, EPSILON, PI};

    fn v(x: f32, y: f32, z: f32) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn hash_of(v: Vector3) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn zero_has_no_components() {
        assert_eq!(Vector3::ZERO, v(0.0, 0.0, 0.0));
    }

    #[test]
    fn unit_is_normalised_on_construction() {
        let u = Vector3::unit(2.0, 3.0, 6.0);
        assert_close(0.285_714_28, u.x, EPSILON);
        assert_close(0.428_571_42, u.y, EPSILON);
        assert_close(0.857_142_85, u.z, EPSILON);
    }

    #[test]
    fn normalise_scales_to_unit_length() {
        let n = v(2.0, 3.0, 6.0).normalise();
        assert_close(0.285_714_28, n.x, EPSILON);
        assert_close(0.428_571_42, n.y, EPSILON);
        assert_close(0.857_142_85, n.z, EPSILON);
        assert_close(1.0, n.length(), EPSILON);
    }

    #[test]
    fn normalised_zero_is_zero() {
        assert_eq!(Vector3::ZERO.normalise(), Vector3::ZERO);
    }

    #[test]
    fn length_of_pythagorean_quadruples() {
        assert_close(7.0, v(2.0, 3.0, 6.0).length(), EPSILON);
        assert_close(15.0, v(2.0, 10.0, 11.0).length(), EPSILON);
        assert_close(21.0, v(4.0, 13.0, 16.0).length(), EPSILON);
        assert_close(27.0, v(2.0, 10.0, 25.0).length(), EPSILON);
        assert_eq!(Vector3::ZERO.length(), 0.0);
    }

    #[test]
    fn length2_is_squared_length() {
        assert_eq!(v(2.0, 3.0, 6.0).length2(), 49.0);
        assert_eq!(v(2.0, 10.0, 25.0).length2(), 729.0);
        assert_eq!(Vector3::ZERO.length2(), 0.0);
    }

    #[test]
    fn dot_product() {
        assert_eq!(v(2.0, 3.0, 6.0).dot(v(4.0, 13.0, 16.0)), 143.0);
    }

    #[test]
    fn cross_of_basis_vectors() {
        let x = v(1.0, 0.0, 0.0);
        let y = v(0.0, 1.0, 0.0);
        let z = v(0.0, 0.0, 1.0);
        assert_eq!(x.cross(y), z);
        assert_eq!(y.cross(z), x);
        assert_eq!(z.cross(x), y);
    }

    #[test]
    fn cross_is_anticommutative_and_perpendicular() {
        let a = v(2.0, 3.0, 6.0);
        let b = v(4.0, 13.0, 16.0);
        let c = a.cross(b);
        assert_eq!(c, -b.cross(a));
        assert_eq!(c.dot(a), 0.0);
        assert_eq!(c.dot(b), 0.0);
    }

    #[test]
    fn negate_flips_every_component() {
        assert_eq!(v(2.0, -3.0, 6.0).negate(), v(-2.0, 3.0, -6.0));
    }

    #[test]
    fn reciprocal_inverts_components() {
        let r = v(2.0, 3.0, 6.0).reciprocal().unwrap();
        assert_close(0.5, r.x, EPSILON);
        assert_close(0.333_333_33, r.y, EPSILON);
        assert_close(0.166_666_66, r.z, EPSILON);
    }

    #[test]
    fn reciprocal_of_zero_component_fails() {
        assert!(matches!(
            v(1.0, 0.0, 1.0).reciprocal(),
            Err(MathError::DivisionByZero(_))
        ));
    }

    #[test]
    fn arithmetic_is_component_wise() {
        let a = v(2.0, 3.0, 6.0);
        let b = v(4.0, 13.0, 16.0);
        assert_eq!(a + b, v(6.0, 16.0, 22.0));
        assert_eq!(a - b, v(-2.0, -10.0, -10.0));
        assert_eq!(a * b, v(8.0, 39.0, 96.0));
        assert_eq!(a * 2.0, v(4.0, 6.0, 12.0));

        let d = a.divide(b).unwrap();
        assert_close(0.5, d.x, EPSILON);
        assert_close(0.230_769_23, d.y, EPSILON);
        assert_close(0.375, d.z, EPSILON);
    }

    #[test]
    fn divide_by_zero_fails() {
        let err = v(2.0, 3.0, 6.0).divide(v(1.0, 1.0, 0.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "division by zero: Vector3{2.00, 3.00, 6.00} / Vector3{1.00, 1.00, 0.00}"
        );
        assert!(v(1.0, 1.0, 1.0).divide_scalar(0.0).is_err());
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(v(EPSILON, -PI, PI).to_string(), "Vector3{0.00, -3.14, 3.14}");
    }

    #[test]
    fn equal_vectors_hash_the_same() {
        assert_eq!(hash_of(v(2.0, 3.0, 6.0)), hash_of(v(2.0, 3.0, 6.0)));
        assert_eq!(hash_of(v(0.0, 0.0, 0.0)), hash_of(v(-0.0, 0.0, -0.0)));
        assert_ne!(hash_of(v(2.0, 3.0, 6.0)), hash_of(v(4.0, 13.0, 16.0)));
    }

    #[test]
    fn converts_to_and_from_glam() {
        let g: glam::Vec3 = v(1.0, 2.0, 3.0).into();
        assert_eq!(g, glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector3::from(g), v(1.0, 2.0, 3.0));
    }
}
