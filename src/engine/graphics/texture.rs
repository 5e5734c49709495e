use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::debug;
use wgpu::util::DeviceExt;

use crate::engine::res::{ResourceError, TextureBackend, TexturePixels, TextureSlot};

/// Material maps are colour data; sampling them through an sRGB view keeps
/// the lighting maths linear.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const SAMPLER_BINDING: u32 = 4;
const PARAMS_BINDING: u32 = 5;

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Bind group of one material: four maps, the shared sampler and the
/// shininess uniform.
pub struct MaterialBinding {
    pub bind_group: wgpu::BindGroup,
    // kept alive with the bind group
    _params: wgpu::Buffer,
}

/// Texture backend on a wgpu device.
pub struct WgpuTextures {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    sampler: wgpu::Sampler,
    layout: wgpu::BindGroupLayout,
}

impl WgpuTextures {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            // nearest texel of the nearest mip when minifying
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &material_layout_entries(),
        });
        Self {
            device,
            queue,
            sampler,
            layout,
        }
    }

    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }
}

impl TextureBackend for WgpuTextures {
    type Handle = GpuTexture;
    type Binding = MaterialBinding;

    fn upload(&mut self, pixels: &TexturePixels) -> Result<GpuTexture, ResourceError> {
        if pixels.width == 0 || pixels.height == 0 {
            return Err(ResourceError::Backend("texture has no texels".into()));
        }
        let expected = pixels.width as usize * pixels.height as usize * 4;
        if pixels.rgba.len() != expected {
            return Err(ResourceError::Backend(format!(
                "expected {expected} bytes of RGBA but got {}",
                pixels.rgba.len()
            )));
        }

        let levels = mip_chain(pixels)?;
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Material Texture"),
            size: level_extent(&levels[0]),
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        for (mip_level, level) in (0u32..).zip(&levels) {
            self.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width()),
                    rows_per_image: Some(level.height()),
                },
                level_extent(level),
            );
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        debug!(
            "Uploaded {}x{} texture with {} mip levels",
            pixels.width,
            pixels.height,
            levels.len()
        );
        Ok(GpuTexture { texture, view })
    }

    fn unload(&mut self, handle: &GpuTexture) {
        handle.texture.destroy();
    }

    fn bind_material(
        &mut self,
        name: &str,
        maps: [&GpuTexture; 4],
        shininess: f32,
    ) -> Result<MaterialBinding, ResourceError> {
        let params = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(name),
            contents: bytemuck::cast_slice(&[shininess, 0.0, 0.0, 0.0]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let mut entries: Vec<wgpu::BindGroupEntry> = TextureSlot::ALL
            .iter()
            .zip(maps)
            .map(|(slot, map)| wgpu::BindGroupEntry {
                binding: slot.index(),
                resource: wgpu::BindingResource::TextureView(&map.view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: SAMPLER_BINDING,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: PARAMS_BINDING,
            resource: params.as_entire_binding(),
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(name),
            layout: &self.layout,
            entries: &entries,
        });
        Ok(MaterialBinding {
            bind_group,
            _params: params,
        })
    }
}

fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

/// Base level followed by successive halvings down to 1x1.
fn mip_chain(pixels: &TexturePixels) -> Result<Vec<RgbaImage>, ResourceError> {
    let base = RgbaImage::from_raw(pixels.width, pixels.height, pixels.rgba.clone()).ok_or_else(|| {
        ResourceError::Backend(format!("{}x{} texels do not fit their buffer", pixels.width, pixels.height))
    })?;
    let count = mip_level_count(pixels.width, pixels.height);
    let mut levels = Vec::with_capacity(count as usize);
    levels.push(base);
    for _ in 1..count {
        let Some(above) = levels.last() else { break };
        let (width, height) = ((above.width() / 2).max(1), (above.height() / 2).max(1));
        let level = imageops::resize(above, width, height, FilterType::Triangle);
        levels.push(level);
    }
    Ok(levels)
}

fn level_extent(level: &RgbaImage) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: level.width(),
        height: level.height(),
        depth_or_array_layers: 1,
    }
}

/// Layout of group 2 in `main.wgsl`.
fn material_layout_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries: Vec<_> = TextureSlot::ALL
        .iter()
        .map(|slot| wgpu::BindGroupLayoutEntry {
            binding: slot.index(),
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        })
        .collect();
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: SAMPLER_BINDING,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    });
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: PARAMS_BINDING,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(16),
        },
        count: None,
    });
    entries
}
