use std::borrow::Cow;

/// Source of the Phong pipeline. Light array sizes must agree with
/// [`MAX_POINT_LIGHTS`](super::MAX_POINT_LIGHTS) and
/// [`MAX_SPOT_LIGHTS`](super::MAX_SPOT_LIGHTS).
pub const MAIN_SHADER: &str = include_str!("shaders/main.wgsl");

#[derive(Debug, Clone, thiserror::Error)]
#[error("shader {label} failed to compile: {message}")]
pub struct ShaderError {
    pub label: String,
    pub message: String,
}

/// Compiles WGSL, turning validation failures into an error instead of the
/// device's uncaptured-error panic.
pub fn create_shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError {
            label: label.to_owned(),
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graphics::{MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS, MIN_SPOT_FADE};

    #[test]
    fn main_shader_validates() {
        let module = naga::front::wgsl::parse_str(MAIN_SHADER).unwrap();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap();
    }

    #[test]
    fn main_shader_has_both_entry_points() {
        let module = naga::front::wgsl::parse_str(MAIN_SHADER).unwrap();
        let names: Vec<_> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn light_limits_agree_with_the_shader() {
        assert!(MAIN_SHADER.contains(&format!("const MAX_POINT_LIGHTS: u32 = {MAX_POINT_LIGHTS}u;")));
        assert!(MAIN_SHADER.contains(&format!("const MAX_SPOT_LIGHTS: u32 = {MAX_SPOT_LIGHTS}u;")));
        assert!(MAIN_SHADER.contains(&format!("const MIN_SPOT_FADE: f32 = {MIN_SPOT_FADE};")));
        assert!(MAIN_SHADER.contains("max(light.cutoffs.x - light.cutoffs.y, MIN_SPOT_FADE)"));
    }
}
