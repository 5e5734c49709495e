use std::mem::size_of;

use log::{debug, info};

use super::gpu::{GpuContext, GpuError, SurfaceErrorAction, DEPTH_FORMAT};
use super::mesh::Model;
use super::shader::{create_shader_module, MAIN_SHADER};
use super::uniforms::{DrawUniforms, FrameUniforms};
use super::vertex::Vertex;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.4,
    b: 0.5,
    a: 1.0,
};

const INITIAL_DRAW_CAPACITY: usize = 64;

/// One entity's worth of drawing: what to draw and its per-draw uniforms.
pub struct Draw<'a> {
    pub model: &'a Model,
    pub uniforms: DrawUniforms,
}

/// Forward Phong renderer. Frame uniforms live in group 0, per-draw
/// uniforms in group 1 at a dynamic offset, the material in group 2.
pub struct PhongRenderer {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    draw_stride: u64,
    max_draws: usize,
    staging: Vec<u8>,
}

impl PhongRenderer {
    /// `material_layout` is the layout the material bind groups were built
    /// against, see [`WgpuTextures::material_layout`](super::WgpuTextures::material_layout).
    pub fn new(gpu: &GpuContext, material_layout: &wgpu::BindGroupLayout) -> Result<Self, GpuError> {
        let device = gpu.device();
        let shader = create_shader_module(device, "Phong Shader", MAIN_SHADER)?;

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[uniform_layout_entry::<FrameUniforms>(false)],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[uniform_layout_entry::<DrawUniforms>(true)],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout, material_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Phong Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let draw_stride = align_to(size_of::<DrawUniforms>() as u64, alignment);
        let max_draws = max_draws(draw_stride, device.limits().max_buffer_size);
        let (draw_buffer, draw_bind_group) = create_draw_buffer(
            device,
            &draw_layout,
            draw_stride,
            INITIAL_DRAW_CAPACITY.min(max_draws),
        );
        info!("Phong pipeline ready (draw stride {draw_stride} bytes, at most {max_draws} draws)");

        Ok(Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity: INITIAL_DRAW_CAPACITY.min(max_draws),
            draw_stride,
            max_draws,
            staging: Vec::new(),
        })
    }

    /// Draws one frame and presents it. Lost or outdated surfaces are
    /// reconfigured and the frame dropped; only running out of memory is
    /// an error.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        frame: &FrameUniforms,
        draws: &[Draw<'_>],
    ) -> Result<(), GpuError> {
        if draws.len() > self.max_draws {
            return Err(self.too_many_draws(draws.len()));
        }
        if gpu.is_minimised() {
            return Ok(());
        }
        let output = match gpu.current_texture() {
            Ok(output) => output,
            Err(err) => {
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(GpuError::OutOfMemory),
                    _ => Ok(()),
                }
            }
        };

        self.write_uniforms(gpu, frame, draws);

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (i, draw) in draws.iter().enumerate() {
                let offset = draw_offset(i, self.draw_stride)
                    .ok_or_else(|| self.too_many_draws(draws.len()))?;
                let mesh = &draw.model.mesh;
                render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                render_pass.set_bind_group(2, &draw.model.material.binding().bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn too_many_draws(&self, count: usize) -> GpuError {
        GpuError::TooManyDraws {
            count,
            max: self.max_draws,
        }
    }

    fn write_uniforms(&mut self, gpu: &GpuContext, frame: &FrameUniforms, draws: &[Draw<'_>]) {
        gpu.queue()
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(frame));

        if draws.len() > self.draw_capacity {
            let capacity = draws.len().next_power_of_two().min(self.max_draws);
            debug!("Growing draw uniform buffer to {capacity} entries");
            let (buffer, bind_group) =
                create_draw_buffer(gpu.device(), &self.draw_layout, self.draw_stride, capacity);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = capacity;
        }
        if draws.is_empty() {
            return;
        }

        pack_draws(&mut self.staging, self.draw_stride as usize, draws.iter().map(|d| &d.uniforms));
        gpu.queue().write_buffer(&self.draw_buffer, 0, &self.staging);
    }
}

fn uniform_layout_entry<T>(dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: wgpu::BufferSize::new(size_of::<T>() as u64),
        },
        count: None,
    }
}

fn create_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(size_of::<DrawUniforms>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

/// Lays the draw uniforms out `stride` bytes apart, zero-filling the gaps.
fn pack_draws<'a>(
    staging: &mut Vec<u8>,
    stride: usize,
    draws: impl ExactSizeIterator<Item = &'a DrawUniforms>,
) {
    staging.clear();
    staging.resize(stride * draws.len(), 0);
    for (i, uniforms) in draws.enumerate() {
        let bytes = bytemuck::bytes_of(uniforms);
        staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
    }
}

fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Dynamic offsets are `u32`; `None` once the slot is out of their reach.
fn draw_offset(index: usize, stride: u64) -> Option<u32> {
    let offset = u64::try_from(index).ok()?.checked_mul(stride)?;
    u32::try_from(offset).ok()
}

/// Draw slots that fit both the device's buffer size and a `u32` offset.
fn max_draws(stride: u64, max_buffer_size: u64) -> usize {
    let by_offset = u64::from(u32::MAX) / stride + 1;
    let by_buffer = max_buffer_size / stride;
    usize::try_from(by_offset.min(by_buffer)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::math::Matrix4;

    #[test]
    fn draw_stride_rounds_up_to_the_alignment() {
        assert_eq!(align_to(464, 256), 512);
        assert_eq!(align_to(512, 256), 512);
        assert_eq!(align_to(1, 256), 256);
    }

    #[test]
    fn draw_offsets_stop_at_the_u32_limit() {
        assert_eq!(draw_offset(0, 512), Some(0));
        assert_eq!(draw_offset(3, 512), Some(1536));
        let last = (u32::MAX / 512) as usize;
        assert_eq!(draw_offset(last, 512), Some(last as u32 * 512));
        assert_eq!(draw_offset(last + 1, 512), None);
        assert_eq!(draw_offset(usize::MAX, 512), None);
    }

    #[test]
    fn max_draws_respects_buffer_size_and_offset_range() {
        // wgpu's default 256 MiB buffer limit binds first
        assert_eq!(max_draws(512, 256 << 20), 524_288);
        // a huge buffer limit leaves the u32 offset as the bound
        let bound = max_draws(512, u64::MAX);
        assert!(draw_offset(bound - 1, 512).is_some());
        assert!(draw_offset(bound, 512).is_none());
        assert!(crate::config::MAX_SCENE_ENTITIES <= max_draws(512, 256 << 20));
    }

    #[test]
    fn packed_draws_start_on_stride_boundaries() {
        let a = DrawUniforms::new(Matrix4::IDENTITY, &[]);
        let b = DrawUniforms::new(Matrix4::scale_uniform(2.0), &[]);
        let mut staging = vec![0xff; 8];

        pack_draws(&mut staging, 512, [a, b].iter());

        assert_eq!(staging.len(), 1024);
        assert_eq!(&staging[..464], bytemuck::bytes_of(&a));
        assert!(staging[464..512].iter().all(|&byte| byte == 0));
        assert_eq!(&staging[512..976], bytemuck::bytes_of(&b));
    }

    #[test]
    fn clears_to_a_grey_blue() {
        assert_eq!((CLEAR_COLOR.r, CLEAR_COLOR.g, CLEAR_COLOR.b), (0.4, 0.4, 0.5));
    }
}
