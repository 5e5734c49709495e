//! GPU side of the engine: device and surface, the Phong pipeline, meshes
//! and the wgpu texture backend.

mod gpu;
mod mesh;
mod renderer;
mod shader;
mod texture;
mod uniforms;
mod vertex;

pub use gpu::{GpuContext, GpuError, SurfaceErrorAction, DEPTH_FORMAT};
pub use mesh::{cube_geometry, Mesh, Model};
pub use renderer::{Draw, PhongRenderer, CLEAR_COLOR};
pub use shader::{create_shader_module, ShaderError, MAIN_SHADER};
pub use texture::{GpuTexture, MaterialBinding, WgpuTextures, TEXTURE_FORMAT};
pub use uniforms::{DrawUniforms, FrameUniforms, MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS, MIN_SPOT_FADE};
pub use vertex::Vertex;
