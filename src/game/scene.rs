//! Placement and lighting of the demo scene, kept apart from the GPU so it
//! can be tested on its own.

use fastrand::Rng;

use crate::engine::camera::Camera;
use crate::engine::entity::Entity;
use crate::engine::light::{Attenuation, DirectionalLight, LightColors, PointLight, SpotLight};
use crate::engine::math::{Color3, Vector, Vector3, PI};

pub const CRATE_MATERIAL: &str = "crate.material.yml";
pub const LAMP_MATERIAL: &str = "lamp.material.yml";

/// Fraction of a light's colour used for its ambient term.
const AMBIENT_FACTOR: f32 = 0.1;
/// Fastest a crate spins about its Y axis, radians per second.
const MAX_SPIN: f32 = PI / 4.0;

fn between(rng: &mut Rng, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.f32()
}

/// Somewhere in the box in front of the camera's starting point.
pub fn random_position(rng: &mut Rng) -> Vector3 {
    let x = between(rng, -10.0, 10.0);
    let y = between(rng, -10.0, 10.0);
    let z = between(rng, -8.0, -4.0);
    Vector3::new(x, y, z)
}

pub fn random_rotation(rng: &mut Rng) -> Vector3 {
    let x = between(rng, 0.0, 2.0 * PI);
    let y = between(rng, 0.0, 2.0 * PI);
    let z = between(rng, 0.0, 2.0 * PI);
    Vector3::new(x, y, z)
}

pub fn crate_entity<M>(rng: &mut Rng, model: M, size: f32) -> Entity<M> {
    let position = random_position(rng);
    let rotation = random_rotation(rng);
    let spin = Vector3::new(0.0, between(rng, -MAX_SPIN, MAX_SPIN), 0.0);
    Entity::builder(model)
        .position(position)
        .rotation(rotation)
        .rotational_velocity(spin)
        .scale(Vector3::splat(size))
        .build()
}

pub fn lamp_entity<M>(rng: &mut Rng, model: M, size: f32) -> Entity<M> {
    let position = random_position(rng);
    let rotation = random_rotation(rng);
    Entity::builder(model)
        .position(position)
        .rotation(rotation)
        .scale(Vector3::splat(size))
        .build()
}

/// White light fading out over `range`.
pub fn lamp_light(position: Vector3, range: f32) -> PointLight {
    PointLight::new(
        position,
        Attenuation::range(range),
        LightColors::from_color(Color3::WHITE, AMBIENT_FACTOR),
    )
}

pub fn sun() -> DirectionalLight {
    DirectionalLight::new(
        Vector3::unit(-0.2, -1.0, -0.3),
        LightColors::from_color(Color3::gray(0.5), AMBIENT_FACTOR),
    )
}

/// Yellowish spot light shining from the camera along its view.
pub fn torch(camera: &impl Camera) -> SpotLight {
    SpotLight::new(
        camera.position(),
        camera.direction(),
        25f32.to_radians(),
        35f32.to_radians(),
        LightColors::from_color(Color3::rgb(0.75, 0.75, 0.25), AMBIENT_FACTOR),
    )
}

/// The `limit` lights nearest to `target`, nearest first. Equally distant
/// lights keep their order in `lights`.
pub fn closest_point_lights(
    target: Vector3,
    lights: &[PointLight],
    limit: usize,
) -> Vec<&PointLight> {
    let mut by_distance: Vec<(f32, &PointLight)> = lights
        .iter()
        .map(|light| ((light.position - target).length2(), light))
        .collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
    by_distance.into_iter().take(limit).map(|(_, light)| light).collect()
}
