//! Projection and view matrices in OpenGL conventions: right-handed eye
//! space looking down −Z, clip-space depth in `[-1, 1]`.

use super::{cotan, Matrix4, Vector, Vector3};

pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4 {
    let f = cotan(fov_y / 2.0);
    let mut m = [0.0; 16];
    m[0] = f / aspect_ratio;
    m[5] = f;
    m[10] = -(near + far) / (far - near);
    m[11] = -2.0 * near * far / (far - near);
    m[14] = -1.0;
    Matrix4::from_array(m)
}

pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4 {
    let mut m = [0.0; 16];
    m[0] = 2.0 / (right - left);
    m[5] = 2.0 / (top - bottom);
    m[10] = 2.0 / (near - far);
    m[3] = (left + right) / (left - right);
    m[7] = (bottom + top) / (bottom - top);
    m[11] = (near + far) / (near - far);
    m[15] = 1.0;
    Matrix4::from_array(m)
}

/// View matrix for an eye at `eye` looking towards `centre`.
///
/// `up` only has to be roughly up; it is re-orthogonalised against the
/// viewing direction. It must not be parallel to `centre - eye`.
pub fn look_at(eye: Vector3, centre: Vector3, up: Vector3) -> Matrix4 {
    let forward = (centre - eye).normalise();
    let side = forward.cross(up).normalise();
    let up = side.cross(forward).normalise();

    #[rustfmt::skip]
    let rotation = Matrix4::from_array([
        side.x,     side.y,     side.z,     0.0,
        up.x,       up.y,       up.z,       0.0,
        -forward.x, -forward.y, -forward.z, 0.0,
        0.0,        0.0,        0.0,        1.0,
    ]);
    rotation * Matrix4::translate(-eye)
}

/// Maps OpenGL clip depth `[-1, 1]` onto the `[0, 1]` range wgpu expects.
#[rustfmt::skip]
pub fn opengl_to_wgpu() -> Matrix4 {
    Matrix4::from_array([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    ])
}
