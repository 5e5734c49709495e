//! Uniform blocks shared with `main.wgsl`. Every field is a `vec4` or a
//! `mat4x4` so the Rust layout matches WGSL's uniform layout without
//! explicit padding.

use bytemuck::{Pod, Zeroable};

use crate::engine::camera::Camera;
use crate::engine::light::{DirectionalLight, LightColors, PointLight, SpotLight};
use crate::engine::math::{projection, Color3, Matrix4, Vector3};

pub const MAX_POINT_LIGHTS: usize = 4;
pub const MAX_SPOT_LIGHTS: usize = 2;

/// Smallest gap between the inner and outer cone cosines; the shader
/// divides by it.
pub const MIN_SPOT_FADE: f32 = 1e-4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightColorsUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl From<&LightColors> for LightColorsUniform {
    fn from(colors: &LightColors) -> Self {
        Self {
            ambient: color(colors.ambient),
            diffuse: color(colors.diffuse),
            specular: color(colors.specular),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    pub direction: [f32; 4],
    pub colors: LightColorsUniform,
}

impl From<&DirectionalLight> for DirectionalLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: vec4(light.direction, 0.0),
            colors: (&light.colors).into(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub attenuation: [f32; 4],
    pub colors: LightColorsUniform,
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        let [k, l, q] = light.attenuation.to_array();
        Self {
            position: vec4(light.position, 1.0),
            attenuation: [k, l, q, 0.0],
            colors: (&light.colors).into(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub cutoffs: [f32; 4],
    pub colors: LightColorsUniform,
}

impl From<&SpotLight> for SpotLightUniform {
    fn from(light: &SpotLight) -> Self {
        let (inner, outer) = light.cutoffs();
        let inner = inner.max(outer + MIN_SPOT_FADE);
        Self {
            position: vec4(light.position, 1.0),
            direction: vec4(light.direction, 0.0),
            cutoffs: [inner, outer, 0.0, 0.0],
            colors: (&light.colors).into(),
        }
    }
}

/// Written once per frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub pv: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub sun: DirectionalLightUniform,
    pub spot_lights: [SpotLightUniform; MAX_SPOT_LIGHTS],
    pub counts: [u32; 4],
}

impl FrameUniforms {
    /// Spot lights past [`MAX_SPOT_LIGHTS`] are dropped.
    pub fn new(camera: &impl Camera, sun: &DirectionalLight, spot_lights: &[SpotLight]) -> Self {
        let mut uniforms = Self {
            pv: (projection::opengl_to_wgpu() * camera.pv_transform()).to_cols_array_2d(),
            camera_position: vec4(camera.position(), 1.0),
            sun: sun.into(),
            ..Default::default()
        };
        let count = spot_lights.len().min(MAX_SPOT_LIGHTS);
        for (slot, light) in uniforms.spot_lights.iter_mut().zip(spot_lights) {
            *slot = light.into();
        }
        uniforms.counts[0] = count as u32;
        uniforms
    }
}

/// Written once per entity, at a dynamic offset into one shared buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub counts: [u32; 4],
}

impl DrawUniforms {
    /// Point lights past [`MAX_POINT_LIGHTS`] are dropped. A model transform
    /// that cannot be inverted (zero scale) gets an identity normal matrix.
    pub fn new(model: Matrix4, point_lights: &[&PointLight]) -> Self {
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(Matrix4::IDENTITY);
        let mut uniforms = Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            ..Default::default()
        };
        let count = point_lights.len().min(MAX_POINT_LIGHTS);
        for (slot, light) in uniforms.point_lights.iter_mut().zip(point_lights) {
            *slot = (*light).into();
        }
        uniforms.counts[0] = count as u32;
        uniforms
    }
}

fn vec4(v: Vector3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

fn color(c: Color3) -> [f32; 4] {
    [c.r, c.g, c.b, 1.0]
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::*;
    use crate::engine::camera::PerspectiveCamera;
    use crate::engine::light::Attenuation;
    use crate::engine::math::{assert_close, Vector};

    fn lamp(x: f32) -> PointLight {
        PointLight::new(
            Vector3::new(x, 0.0, 0.0),
            Attenuation::range(30.0),
            LightColors::from_color(Color3::WHITE, 0.1),
        )
    }

    #[test]
    fn blocks_match_the_shader_layout() {
        assert_eq!(size_of::<LightColorsUniform>(), 48);
        assert_eq!(size_of::<PointLightUniform>(), 80);
        assert_eq!(size_of::<SpotLightUniform>(), 96);
        assert_eq!(size_of::<FrameUniforms>(), 352);
        assert_eq!(size_of::<DrawUniforms>(), 464);
    }

    #[test]
    fn point_lights_are_capped() {
        let lights: Vec<_> = (0..6).map(|i| lamp(i as f32)).collect();
        let refs: Vec<_> = lights.iter().collect();
        let uniforms = DrawUniforms::new(Matrix4::IDENTITY, &refs);
        assert_eq!(uniforms.counts[0], MAX_POINT_LIGHTS as u32);
        assert_eq!(uniforms.point_lights[3].position, [3.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unused_light_slots_stay_zeroed() {
        let light = lamp(2.0);
        let uniforms = DrawUniforms::new(Matrix4::IDENTITY, &[&light]);
        assert_eq!(uniforms.counts[0], 1);
        assert_eq!(uniforms.point_lights[0].attenuation[0], 1.0);
        assert_eq!(uniforms.point_lights[1], PointLightUniform::default());
    }

    #[test]
    fn model_is_uploaded_column_major() {
        let model = Matrix4::translate(Vector3::new(1.0, 2.0, 3.0));
        let uniforms = DrawUniforms::new(model, &[]);
        assert_eq!(uniforms.model[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Matrix4::scale(Vector3::new(2.0, 4.0, 1.0));
        let uniforms = DrawUniforms::new(model, &[]);
        assert_close(0.5, uniforms.normal[0][0], 1e-6);
        assert_close(0.25, uniforms.normal[1][1], 1e-6);
        assert_close(1.0, uniforms.normal[2][2], 1e-6);
    }

    #[test]
    fn singular_model_falls_back_to_identity_normals() {
        let uniforms = DrawUniforms::new(Matrix4::scale(Vector3::splat(0.0)), &[]);
        assert_eq!(uniforms.normal, Matrix4::IDENTITY.to_cols_array_2d());
    }

    fn sun() -> DirectionalLight {
        DirectionalLight::new(
            Vector3::new(0.0, -1.0, 0.0),
            LightColors::from_color(Color3::WHITE, 0.1),
        )
    }

    #[test]
    fn hard_edged_spot_keeps_a_nonzero_fade() {
        let colors = LightColors::from_color(Color3::WHITE, 0.1);
        let forward = Vector3::new(0.0, 0.0, -1.0);
        let hard = SpotLight::new(Vector3::ZERO, forward, 0.5, 0.5, colors);
        let [inner, outer, ..] = SpotLightUniform::from(&hard).cutoffs;
        assert!(inner > outer);
        assert_close(MIN_SPOT_FADE, inner - outer, 1e-6);

        // an inner cone wider than the outer one gets the same treatment
        let inverted = SpotLight::new(Vector3::ZERO, forward, 0.8, 0.4, colors);
        let [inner, outer, ..] = SpotLightUniform::from(&inverted).cutoffs;
        assert!(inner > outer);

        let soft = SpotLight::new(Vector3::ZERO, forward, 0.4, 0.8, colors);
        assert_eq!(SpotLightUniform::from(&soft).cutoffs[0], soft.cutoffs().0);
    }

    #[test]
    fn frame_keeps_at_most_two_spot_lights() {
        let forward = Vector3::new(0.0, 0.0, -1.0);
        let camera = PerspectiveCamera::new(Vector3::new(0.0, 0.0, 6.0), forward, 1.0);
        let sun = sun();
        let torch = SpotLight::new(
            Vector3::ZERO,
            forward,
            0.5,
            0.6,
            LightColors::from_color(Color3::WHITE, 0.1),
        );
        let uniforms = FrameUniforms::new(&camera, &sun, &[torch, torch, torch]);

        assert_eq!(uniforms.counts[0], 2);
        assert_eq!(uniforms.camera_position, [0.0, 0.0, 6.0, 1.0]);
        assert_eq!(uniforms.sun.direction, [0.0, -1.0, 0.0, 0.0]);
        assert_close(0.25f32.cos(), uniforms.spot_lights[1].cutoffs[0], 1e-6);
    }

    #[test]
    fn frame_pv_maps_depth_into_zero_to_one() {
        let camera = PerspectiveCamera::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), 1.0);
        let uniforms = FrameUniforms::new(&camera, &sun(), &[]);
        let pv = glam::Mat4::from_cols_array_2d(&uniforms.pv);

        let near = pv * glam::Vec4::new(0.0, 0.0, -camera.near(), 1.0);
        let far = pv * glam::Vec4::new(0.0, 0.0, -camera.far(), 1.0);
        assert_close(0.0, near.z / near.w, 1e-5);
        assert_close(1.0, far.z / far.w, 1e-4);
    }
}
