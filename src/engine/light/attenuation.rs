use std::fmt;

/// Distance falloff of a point light: `1 / (k + l·d + q·d²)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Attenuation {
    /// constant factor
    pub k: f32,
    /// linear factor
    pub l: f32,
    /// quadratic factor
    pub q: f32,
}

impl Attenuation {
    pub const fn new(k: f32, l: f32, q: f32) -> Self {
        Self { k, l, q }
    }

    /// Full intensity at any distance.
    pub const fn none() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Full intensity at the light, falling to about 1% at `range`.
    pub fn range(range: f32) -> Self {
        Self::new(1.0, 4.5 / range, 75.0 / (range * range))
    }

    pub fn intensity(&self, distance: f32) -> f32 {
        1.0 / (self.k + self.l * distance + self.q * distance * distance)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.k, self.l, self.q]
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Attenuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attenuation{{k={:.2}, l={:.2}, q={:.2}}}", self.k, self.l, self.q)
    }
}
