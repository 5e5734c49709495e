//! Light sources for Phong shading. Apertures are full cone angles in radians.

mod attenuation;

pub use attenuation::Attenuation;

use crate::engine::math::{Color3, Vector3};

/// Per-term colour of a light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightColors {
    pub ambient: Color3,
    pub diffuse: Color3,
    pub specular: Color3,
}

impl LightColors {
    pub const fn new(ambient: Color3, diffuse: Color3, specular: Color3) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }

    /// Diffuse and specular at `color`, ambient at `color * ambient_factor`.
    pub fn from_color(color: Color3, ambient_factor: f32) -> Self {
        Self::new(color * ambient_factor, color, color)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3,
    pub colors: LightColors,
}

impl DirectionalLight {
    pub fn new(direction: Vector3, colors: LightColors) -> Self {
        Self { direction, colors }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vector3,
    pub attenuation: Attenuation,
    pub colors: LightColors,
}

impl PointLight {
    pub fn new(position: Vector3, attenuation: Attenuation, colors: LightColors) -> Self {
        Self {
            position,
            attenuation,
            colors,
        }
    }
}

/// Cone of light: full intensity inside `aperture`, fading to nothing at
/// `outer_aperture`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpotLight {
    pub position: Vector3,
    pub direction: Vector3,
    pub aperture: f32,
    pub outer_aperture: f32,
    pub colors: LightColors,
}

impl SpotLight {
    pub fn new(
        position: Vector3,
        direction: Vector3,
        aperture: f32,
        outer_aperture: f32,
        colors: LightColors,
    ) -> Self {
        Self {
            position,
            direction,
            aperture,
            outer_aperture,
            colors,
        }
    }

    /// Cosines of the inner and outer half-angles, as compared against in
    /// the fragment shader.
    pub fn cutoffs(&self) -> (f32, f32) {
        ((self.aperture / 2.0).cos(), (self.outer_aperture / 2.0).cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::math::{assert_close, PI};

    #[test]
    fn ambient_is_scaled_from_the_light_colour() {
        let colors = LightColors::from_color(Color3::gray(0.5), 0.1);
        assert_eq!(colors.diffuse, Color3::gray(0.5));
        assert_eq!(colors.specular, Color3::gray(0.5));
        assert_close(0.05, colors.ambient.r, 1e-7);
    }

    #[test]
    fn spot_cutoffs_use_half_apertures() {
        let torch = SpotLight::new(
            Vector3::ZERO,
            Vector3::new(0.0, 0.0, -1.0),
            PI / 2.0,
            PI,
            LightColors::from_color(Color3::WHITE, 0.1),
        );
        let (inner, outer) = torch.cutoffs();
        assert_close(std::f32::consts::FRAC_1_SQRT_2, inner, 1e-6);
        assert_close(0.0, outer, 1e-6);
    }
}
