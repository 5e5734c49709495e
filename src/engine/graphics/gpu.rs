use std::sync::Arc;

use log::{info, warn};
use winit::dpi::PhysicalSize;
use winit::window::Window;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create window surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter compatible with the window surface")]
    NoAdapter,

    #[error("failed to open graphics device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface supports no texture formats")]
    NoSurfaceFormat,

    #[error(transparent)]
    Shader(#[from] super::ShaderError),

    #[error("surface out of memory")]
    OutOfMemory,

    #[error("{count} draws in one frame, the uniform buffer holds at most {max}")]
    TooManyDraws { count: usize, max: usize },
}

/// What the frame loop should do after `get_current_texture` failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceErrorAction {
    Reconfigured,
    SkipFrame,
    Fatal,
}

/// The window surface together with the device that draws to it.
pub struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
}

impl GpuContext {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        let adapter_info = adapter.get_info();
        info!("Using adapter {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("lamplight device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats).ok_or(GpuError::NoSurfaceFormat)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: caps.present_modes.first().copied().unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        Ok(Self {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            size,
            depth_view,
        })
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    /// A zero-sized window (minimised) is remembered but not configured.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
    }

    pub fn is_minimised(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    pub fn current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub fn handle_surface_error(&self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface_error_action(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                if !self.is_minimised() {
                    self.surface.configure(&self.device, &self.config);
                }
                warn!("Surface {err}; reconfigured");
            }
            SurfaceErrorAction::SkipFrame => warn!("Surface {err}; skipping frame"),
            SurfaceErrorAction::Fatal => {}
        }
        action
    }
}

pub(crate) fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
    }
}

/// Prefers an sRGB format so lighting is done in linear space.
pub(crate) fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        label: Some("Depth Texture"),
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_srgb_formats() {
        let formats = [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn falls_back_to_the_first_format() {
        let formats = [wgpu::TextureFormat::Rgba16Float, wgpu::TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats), Some(wgpu::TextureFormat::Rgba16Float));
        assert_eq!(choose_surface_format(&[]), None);
    }

    #[test]
    fn maps_surface_errors_to_actions() {
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(surface_error_action(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
