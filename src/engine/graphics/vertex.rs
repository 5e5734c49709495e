#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const fn v(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Vertex {
    Vertex::new(position, normal, tex_coord)
}

// 2x2x2 cube centred on the origin, four vertices per face so every face
// gets its own normal. Faces wind counter-clockwise seen from outside.
#[rustfmt::skip]
pub const CUBE_VERTICES: [Vertex; 24] = [
    // front
    v([-1.0, -1.0,  1.0], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
    v([ 1.0, -1.0,  1.0], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    v([ 1.0,  1.0,  1.0], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
    v([-1.0,  1.0,  1.0], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    // back
    v([ 1.0, -1.0, -1.0], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
    v([-1.0, -1.0, -1.0], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    v([-1.0,  1.0, -1.0], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
    v([ 1.0,  1.0, -1.0], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    // left
    v([-1.0, -1.0, -1.0], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    v([-1.0, -1.0,  1.0], [-1.0,  0.0,  0.0], [1.0, 1.0]),
    v([-1.0,  1.0,  1.0], [-1.0,  0.0,  0.0], [1.0, 0.0]),
    v([-1.0,  1.0, -1.0], [-1.0,  0.0,  0.0], [0.0, 0.0]),
    // right
    v([ 1.0, -1.0,  1.0], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
    v([ 1.0, -1.0, -1.0], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
    v([ 1.0,  1.0, -1.0], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
    v([ 1.0,  1.0,  1.0], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
    // top
    v([-1.0,  1.0,  1.0], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
    v([ 1.0,  1.0,  1.0], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
    v([ 1.0,  1.0, -1.0], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    v([-1.0,  1.0, -1.0], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
    // bottom
    v([-1.0, -1.0, -1.0], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    v([ 1.0, -1.0, -1.0], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
    v([ 1.0, -1.0,  1.0], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    v([-1.0, -1.0,  1.0], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
];

#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
     0,  1,  2,  2,  3,  0, // front
     4,  5,  6,  6,  7,  4, // back
     8,  9, 10, 10, 11,  8, // left
    12, 13, 14, 14, 15, 12, // right
    16, 17, 18, 18, 19, 16, // top
    20, 21, 22, 22, 23, 20, // bottom
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::math::{Vector, Vector3};

    fn pos(i: u16) -> Vector3 {
        let [x, y, z] = CUBE_VERTICES[i as usize].position;
        Vector3::new(x, y, z)
    }

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 32);
        assert_eq!(desc.attributes[1].offset, 12);
        assert_eq!(desc.attributes[2].offset, 24);
    }

    #[test]
    fn cube_triangles_face_outwards() {
        for tri in CUBE_INDICES.chunks(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let [nx, ny, nz] = CUBE_VERTICES[tri[0] as usize].normal;
            let facing = (b - a).cross(c - a).dot(Vector3::new(nx, ny, nz));
            assert!(facing > 0.0, "triangle {tri:?} winds inwards");
        }
    }

    #[test]
    fn cube_normals_point_away_from_the_centre() {
        for vertex in CUBE_VERTICES {
            let [x, y, z] = vertex.position;
            let [nx, ny, nz] = vertex.normal;
            assert_eq!(Vector3::new(nx, ny, nz).length(), 1.0);
            assert_eq!(Vector3::new(x, y, z).dot(Vector3::new(nx, ny, nz)), 1.0);
        }
    }
}
