//! Cameras produce the projection·view transform handed to the shader.
//!
//! Both halves of the product are cached. Moving or turning the camera only
//! invalidates the view; changing a lens parameter only invalidates the
//! projection.

mod orthographic;
mod perspective;

use std::cell::Cell;

pub use orthographic::OrthographicCamera;
pub use perspective::PerspectiveCamera;

use crate::engine::math::{projection, Matrix4, Vector3};

pub trait Camera {
    fn position(&self) -> Vector3;

    fn set_position(&mut self, position: Vector3);

    fn direction(&self) -> Vector3;

    fn set_direction(&mut self, direction: Vector3);

    /// `projection * view`, recomputed only when an input has changed.
    fn pv_transform(&self) -> Matrix4;
}

/// Position, direction and the matrix caches shared by every camera.
#[derive(Debug, Clone)]
pub struct CameraCore {
    position: Vector3,
    direction: Vector3,
    projection: Cell<Option<Matrix4>>,
    view: Cell<Option<Matrix4>>,
    pv: Cell<Option<Matrix4>>,
}

impl CameraCore {
    pub fn new(position: Vector3, direction: Vector3) -> Self {
        Self {
            position,
            direction,
            projection: Cell::new(None),
            view: Cell::new(None),
            pv: Cell::new(None),
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.dirty_view();
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vector3) {
        self.direction = direction;
        self.dirty_view();
    }

    /// Returns the cached product, filling in whichever half is missing.
    pub fn pv_transform(&self, projection: impl FnOnce() -> Matrix4) -> Matrix4 {
        if let Some(pv) = self.pv.get() {
            return pv;
        }
        let p = self.projection.get().unwrap_or_else(projection);
        self.projection.set(Some(p));
        let v = self.view.get().unwrap_or_else(|| self.view_transform());
        self.view.set(Some(v));

        let pv = p * v;
        self.pv.set(Some(pv));
        pv
    }

    pub fn dirty_projection(&self) {
        self.projection.set(None);
        self.pv.set(None);
    }

    pub fn dirty_view(&self) {
        self.view.set(None);
        self.pv.set(None);
    }

    fn view_transform(&self) -> Matrix4 {
        projection::look_at(self.position, self.position + self.direction, Vector3::UP)
    }

    /// Which of projection, view and their product are currently cached.
    #[cfg(test)]
    pub(crate) fn cached(&self) -> (bool, bool, bool) {
        (
            self.projection.get().is_some(),
            self.view.get().is_some(),
            self.pv.get().is_some(),
        )
    }
}

/// Updates `field` and invalidates the projection, unless the value is
/// unchanged.
pub(crate) fn set_lens_param(core: &CameraCore, field: &mut f32, value: f32) {
    if *field == value {
        return;
    }
    *field = value;
    core.dirty_projection();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> CameraCore {
        CameraCore::new(Vector3::new(0.0, 0.0, 6.0), Vector3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn nothing_is_cached_until_requested() {
        let core = core();
        assert_eq!(core.cached(), (false, false, false));
        core.pv_transform(|| Matrix4::IDENTITY);
        assert_eq!(core.cached(), (true, true, true));
    }

    #[test]
    fn cached_product_skips_the_projection() {
        let core = core();
        let first = core.pv_transform(|| Matrix4::scale_uniform(2.0));
        let second = core.pv_transform(|| panic!("projection should be cached"));
        assert_eq!(first, second);
    }

    #[test]
    fn moving_invalidates_only_the_view() {
        let mut core = core();
        core.pv_transform(|| Matrix4::IDENTITY);
        core.set_position(Vector3::ZERO);
        assert_eq!(core.cached(), (true, false, false));

        let pv = core.pv_transform(|| panic!("projection should be cached"));
        assert_eq!(pv, projection::look_at(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0), Vector3::UP));
    }

    #[test]
    fn lens_changes_invalidate_only_the_projection() {
        let core = core();
        core.pv_transform(|| Matrix4::IDENTITY);

        let mut near = 0.1;
        set_lens_param(&core, &mut near, 0.1);
        assert_eq!(core.cached(), (true, true, true));

        set_lens_param(&core, &mut near, 0.5);
        assert_eq!(near, 0.5);
        assert_eq!(core.cached(), (false, true, false));
    }
}
