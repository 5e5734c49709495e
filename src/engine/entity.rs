use std::cell::Cell;

use crate::engine::math::{Matrix4, Vector3};

/// A model placed in the world, with optional linear and angular velocity.
///
/// Rotation is Euler angles in radians; velocities are per second.
#[derive(Debug)]
pub struct Entity<M> {
    model: M,
    position: Vector3,
    rotation: Vector3,
    scale: Vector3,
    velocity: Vector3,
    rotational_velocity: Vector3,
    transform: Cell<Option<Matrix4>>,
}

impl<M> Entity<M> {
    pub fn builder(model: M) -> EntityBuilder<M> {
        EntityBuilder::new(model)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.dirty();
    }

    pub fn rotation(&self) -> Vector3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vector3) {
        self.rotation = rotation;
        self.dirty();
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
        self.dirty();
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    pub fn rotational_velocity(&self) -> Vector3 {
        self.rotational_velocity
    }

    pub fn set_rotational_velocity(&mut self, rotational_velocity: Vector3) {
        self.rotational_velocity = rotational_velocity;
    }

    /// Integrates velocities over `delta_secs`. A stationary entity keeps its
    /// cached transform.
    pub fn update(&mut self, delta_secs: f32, _elapsed_secs: f32) {
        if !self.velocity.is_zero() {
            self.position = self.position + self.velocity * delta_secs;
            self.dirty();
        }
        if !self.rotational_velocity.is_zero() {
            self.rotation = self.rotation + self.rotational_velocity * delta_secs;
            self.dirty();
        }
    }

    /// Model transform, `translate · rotate · scale`.
    pub fn transform(&self) -> Matrix4 {
        if let Some(transform) = self.transform.get() {
            return transform;
        }
        let transform = Matrix4::transform(self.position, self.rotation, self.scale);
        self.transform.set(Some(transform));
        transform
    }

    fn dirty(&mut self) {
        self.transform.set(None);
    }
}

/// Builds an [`Entity`]. Anything not set, scale included, is zero.
#[derive(Debug)]
pub struct EntityBuilder<M> {
    model: M,
    position: Vector3,
    rotation: Vector3,
    scale: Vector3,
    velocity: Vector3,
    rotational_velocity: Vector3,
}

impl<M> EntityBuilder<M> {
    fn new(model: M) -> Self {
        Self {
            model,
            position: Vector3::ZERO,
            rotation: Vector3::ZERO,
            scale: Vector3::ZERO,
            velocity: Vector3::ZERO,
            rotational_velocity: Vector3::ZERO,
        }
    }

    pub fn position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Vector3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    pub fn velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn rotational_velocity(mut self, rotational_velocity: Vector3) -> Self {
        self.rotational_velocity = rotational_velocity;
        self
    }

    pub fn build(self) -> Entity<M> {
        Entity {
            model: self.model,
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            velocity: self.velocity,
            rotational_velocity: self.rotational_velocity,
            transform: Cell::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::math::{assert_close, PI};

    #[test]
    fn builder_defaults_everything_to_zero() {
        let entity = Entity::builder("cube").build();
        assert_eq!(*entity.model(), "cube");
        assert_eq!(entity.position(), Vector3::ZERO);
        assert_eq!(entity.rotation(), Vector3::ZERO);
        assert_eq!(entity.scale(), Vector3::ZERO);
        assert_eq!(entity.velocity(), Vector3::ZERO);
        assert_eq!(entity.rotational_velocity(), Vector3::ZERO);
    }

    #[test]
    fn transform_combines_position_rotation_and_scale() {
        let entity = Entity::builder(())
            .position(Vector3::new(1.0, 2.0, 3.0))
            .rotation(Vector3::new(0.0, PI / 2.0, 0.0))
            .scale(Vector3::ONE * 0.5)
            .build();
        let expected = Matrix4::transform(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, PI / 2.0, 0.0),
            Vector3::ONE * 0.5,
        );
        assert_eq!(entity.transform(), expected);
    }

    #[test]
    fn update_integrates_velocities() {
        let mut entity = Entity::builder(())
            .position(Vector3::new(1.0, 0.0, 0.0))
            .velocity(Vector3::new(2.0, 0.0, -4.0))
            .rotational_velocity(Vector3::new(0.0, PI, 0.0))
            .build();
        entity.update(0.5, 10.0);

        assert_eq!(entity.position(), Vector3::new(2.0, 0.0, -2.0));
        assert_close(PI / 2.0, entity.rotation().y, 1e-6);
    }

    #[test]
    fn stationary_entity_keeps_its_cached_transform() {
        let mut entity = Entity::builder(()).scale(Vector3::ONE).build();
        entity.transform();
        entity.update(1.0, 1.0);
        assert!(entity.transform.get().is_some());
    }

    #[test]
    fn moving_entity_recomputes_its_transform() {
        let mut entity = Entity::builder(())
            .scale(Vector3::ONE)
            .velocity(Vector3::new(1.0, 0.0, 0.0))
            .build();
        let before = entity.transform();
        entity.update(1.0, 1.0);
        assert!(entity.transform.get().is_none());
        assert_eq!(entity.transform().get(0, 3), before.get(0, 3) + 1.0);
    }

    #[test]
    fn setters_invalidate_the_transform() {
        let mut entity = Entity::builder(()).scale(Vector3::ONE).build();
        entity.transform();
        entity.set_position(Vector3::new(0.0, 5.0, 0.0));
        assert_eq!(entity.transform().get(1, 3), 5.0);

        entity.set_scale(Vector3::ONE * 2.0);
        assert_eq!(entity.transform().get(0, 0), 2.0);

        // velocity only matters on the next update
        entity.set_velocity(Vector3::new(1.0, 0.0, 0.0));
        assert!(entity.transform.get().is_some());
    }
}
