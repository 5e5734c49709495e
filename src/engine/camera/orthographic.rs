use super::{set_lens_param, Camera, CameraCore};
use crate::engine::math::{projection, Matrix4, Vector3};

#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    core: CameraCore,
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
}

impl OrthographicCamera {
    pub fn new(position: Vector3, direction: Vector3) -> Self {
        Self::with_bounds(position, direction, -1.0, 1.0, -1.0, 1.0, 0.1, 100.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_bounds(
        position: Vector3,
        direction: Vector3,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            core: CameraCore::new(position, direction),
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn set_left(&mut self, left: f32) {
        set_lens_param(&self.core, &mut self.left, left);
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn set_right(&mut self, right: f32) {
        set_lens_param(&self.core, &mut self.right, right);
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        set_lens_param(&self.core, &mut self.bottom, bottom);
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn set_top(&mut self, top: f32) {
        set_lens_param(&self.core, &mut self.top, top);
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

    fn projection(&self) -> Matrix4 {
        projection::orthographic(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

impl Camera for OrthographicCamera {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrthographicCamera {
        OrthographicCamera::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn defaults() {
        let c = camera();
        assert_eq!(
            (c.left(), c.right(), c.bottom(), c.top(), c.near(), c.far()),
            (-1.0, 1.0, -1.0, 1.0, 0.1, 100.0)
        );
    }

    #[test]
    fn pv_is_projection_times_view() {
        let c = camera();
        let expected = projection::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 100.0)
            * projection::look_at(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), Vector3::UP);
        assert_eq!(c.pv_transform(), expected);
    }

    #[test]
    fn every_bound_setter_invalidates() {
        let mut camera = camera();
        let setters: [fn(&mut OrthographicCamera); 6] = [
            |c| c.set_left(-2.0),
            |c| c.set_right(2.0),
            |c| c.set_bottom(-2.0),
            |c| c.set_top(2.0),
            |c| c.set_near(1.0),
            |c| c.set_far(10.0),
        ];
        for set in setters {
            camera.pv_transform();
            set(&mut camera);
            assert_eq!(camera.core.cached(), (false, true, false));
        }

        let widened = camera.pv_transform();
        let expected = projection::orthographic(-2.0, 2.0, -2.0, 2.0, 1.0, 10.0)
            * projection::look_at(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), Vector3::UP);
        assert_eq!(widened, expected);
    }

    #[test]
    fn unchanged_bound_keeps_the_cache() {
        let mut camera = camera();
        camera.pv_transform();
        camera.set_top(1.0);
        assert_eq!(camera.core.cached(), (true, true, true));
    }
}
