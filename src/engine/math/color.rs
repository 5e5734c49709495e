use std::fmt;
use std::hash::{Hash, Hasher};

use super::vector::vector_ops;
use super::{float_key, Vector};

/// Opaque RGB colour, components nominally in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const BLACK: Color3 = Color3::gray(0.0);
    pub const WHITE: Color3 = Color3::gray(1.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn gray(brightness: f32) -> Self {
        Self::rgb(brightness, brightness, brightness)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Vector for Color3 {
    #[inline]
    fn splat(value: f32) -> Self {
        Self::gray(value)
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::rgb(f(self.r, rhs.r), f(self.g, rhs.g), f(self.b, rhs.b))
    }

    #[inline]
    fn sum(self) -> f32 {
        self.r + self.g + self.b
    }

    #[inline]
    fn any(self, predicate: impl Fn(f32) -> bool) -> bool {
        predicate(self.r) || predicate(self.g) || predicate(self.b)
    }
}

vector_ops!(Color3);

impl Hash for Color3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.to_array() {
            float_key(c).hash(state);
        }
    }
}

impl fmt::Display for Color3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color3{{{:.2}, {:.2}, {:.2}}}", self.r, self.g, self.b)
    }
}

/// RGBA colour. Also the cache key for solid-colour textures, hence `Eq`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const TRANSPARENT: Color4 = Color4::gray(0.0, 0.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn gray(brightness: f32, alpha: f32) -> Self {
        Self::rgba(brightness, brightness, brightness, alpha)
    }

    pub const fn black(alpha: f32) -> Self {
        Self::gray(0.0, alpha)
    }

    pub const fn white(alpha: f32) -> Self {
        Self::gray(1.0, alpha)
    }

    pub const fn from_rgb(rgb: Color3, a: f32) -> Self {
        Self::rgba(rgb.r, rgb.g, rgb.b, a)
    }

    pub fn rgb(self) -> Color3 {
        Color3::rgb(self.r, self.g, self.b)
    }

    pub fn is_opaque(self) -> bool {
        self.a == 1.0
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Quantises to 8-bit RGBA, clamping out-of-range components.
    pub fn to_rgba8(self) -> [u8; 4] {
        self.to_array()
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

impl Vector for Color4 {
    #[inline]
    fn splat(value: f32) -> Self {
        Self::gray(value, value)
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::rgba(
            f(self.r, rhs.r),
            f(self.g, rhs.g),
            f(self.b, rhs.b),
            f(self.a, rhs.a),
        )
    }

    #[inline]
    fn sum(self) -> f32 {
        self.r + self.g + self.b + self.a
    }

    #[inline]
    fn any(self, predicate: impl Fn(f32) -> bool) -> bool {
        predicate(self.r) || predicate(self.g) || predicate(self.b) || predicate(self.a)
    }
}

vector_ops!(Color4);

// NaN components break reflexivity; texture loading rejects non-finite colours.
impl Eq for Color4 {}

impl Hash for Color4 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.to_array() {
            float_key(c).hash(state);
        }
    }
}

impl fmt::Display for Color4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color4{{{:.2}, {:.2}, {:.2}, {:.2}}}",
            self.r, self.g, self.b, self.a
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn scaling_a_colour() {
        assert_eq!(Color3::WHITE * 0.5, Color3::gray(0.5));
        assert_eq!(
            Color3::rgb(0.5, 0.5, 0.25) * Color3::rgb(2.0, 1.0, 4.0),
            Color3::rgb(1.0, 0.5, 1.0)
        );
    }

    #[test]
    fn colour_division_checks_for_zero() {
        assert!(Color3::WHITE.divide(Color3::BLACK).is_err());
        assert!(Color4::TRANSPARENT.reciprocal().is_err());
    }

    #[test]
    fn rgba_round_trips_through_rgb() {
        let c = Color4::from_rgb(Color3::rgb(0.1, 0.2, 0.3), 1.0);
        assert_eq!(c.rgb(), Color3::rgb(0.1, 0.2, 0.3));
        assert!(c.is_opaque());
        assert!(!Color4::white(0.5).is_opaque());
    }

    #[test]
    fn quantises_to_bytes() {
        assert_eq!(Color4::rgba(1.0, 0.0, 0.5, 2.0).to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn equal_colours_share_a_set_slot() {
        let mut set = HashSet::new();
        set.insert(Color4::rgba(0.0, 0.5, 1.0, 1.0));
        set.insert(Color4::rgba(-0.0, 0.5, 1.0, 1.0));
        set.insert(Color4::white(1.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(Color3::gray(0.5).to_string(), "Color3{0.50, 0.50, 0.50}");
        assert_eq!(Color4::black(1.0).to_string(), "Color4{0.00, 0.00, 0.00, 1.00}");
    }
}
