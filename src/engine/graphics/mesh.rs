use std::rc::Rc;

use wgpu::util::DeviceExt;

use super::texture::WgpuTextures;
use super::vertex::{Vertex, CUBE_INDICES, CUBE_VERTICES};
use crate::engine::res::Material;

/// Indexed triangle list on the GPU.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u16]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    pub fn cube(device: &wgpu::Device) -> Self {
        let (vertices, indices) = cube_geometry();
        Self::new(device, "Cube", vertices, indices)
    }
}

/// The 2x2x2 cube every entity in the scene is drawn with.
pub fn cube_geometry() -> (&'static [Vertex], &'static [u16]) {
    (&CUBE_VERTICES, &CUBE_INDICES)
}

/// A mesh drawn with a material. Both halves are shared between entities.
#[derive(Clone)]
pub struct Model {
    pub mesh: Rc<Mesh>,
    pub material: Rc<Material<WgpuTextures>>,
}

impl Model {
    pub fn new(mesh: Rc<Mesh>, material: Rc<Material<WgpuTextures>>) -> Self {
        Self { mesh, material }
    }
}
