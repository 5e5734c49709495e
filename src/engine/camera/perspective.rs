use super::{set_lens_param, Camera, CameraCore};
use crate::engine::math::{projection, Matrix4, Vector3, PI};

#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    core: CameraCore,
    near: f32,
    far: f32,
    /// vertical field of view, radians
    fov_y: f32,
    aspect_ratio: f32,
}

impl PerspectiveCamera {
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 100.0;
    pub const DEFAULT_FOV_Y: f32 = PI / 4.0;

    pub fn new(position: Vector3, direction: Vector3, aspect_ratio: f32) -> Self {
        Self::with_lens(
            position,
            direction,
            Self::DEFAULT_NEAR,
            Self::DEFAULT_FAR,
            Self::DEFAULT_FOV_Y,
            aspect_ratio,
        )
    }

    pub fn with_lens(
        position: Vector3,
        direction: Vector3,
        near: f32,
        far: f32,
        fov_y: f32,
        aspect_ratio: f32,
    ) -> Self {
        Self {
            core: CameraCore::new(position, direction),
            near,
            far,
            fov_y,
            aspect_ratio,
        }
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn set_near(&mut self, near: f32) {
        set_lens_param(&self.core, &mut self.near, near);
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_far(&mut self, far: f32) {
        set_lens_param(&self.core, &mut self.far, far);
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        set_lens_param(&self.core, &mut self.fov_y, fov_y);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        set_lens_param(&self.core, &mut self.aspect_ratio, aspect_ratio);
    }

    fn projection(&self) -> Matrix4 {
        projection::perspective(self.fov_y, self.aspect_ratio, self.near, self.far)
    }
}

impl Camera for PerspectiveCamera {
    fn position(&self) -> Vector3 {
        self.core.position()
    }

    fn set_position(&mut self, position: Vector3) {
        self.core.set_position(position);
    }

    fn direction(&self) -> Vector3 {
        self.core.direction()
    }

    fn set_direction(&mut self, direction: Vector3) {
        self.core.set_direction(direction);
    }

    fn pv_transform(&self) -> Matrix4 {
        self.core.pv_transform(|| self.projection())
    }
}
