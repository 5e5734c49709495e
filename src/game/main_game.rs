use std::rc::Rc;

use fastrand::Rng;
use log::{info, warn};
use winit::dpi::PhysicalSize;

use super::scene::{self, CRATE_MATERIAL, LAMP_MATERIAL};
use crate::config::SceneConfig;
use crate::engine::camera::{Camera, PerspectiveCamera};
use crate::engine::entity::Entity;
use crate::engine::graphics::{
    Draw, DrawUniforms, FrameUniforms, GpuContext, GpuError, Mesh, Model, PhongRenderer,
    WgpuTextures, MAX_POINT_LIGHTS,
};
use crate::engine::input::InputHandler;
use crate::engine::light::{DirectionalLight, PointLight, SpotLight};
use crate::engine::math::Vector3;
use crate::engine::res::{MaterialLoader, ResourceError, ResourceLoader, TextureLoader};
use crate::engine::runtime::Game;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Crates tumbling in front of the camera, lit by a sun, a torch held by
/// the camera and a lamp light per lamp.
pub struct MainGame {
    renderer: PhongRenderer,
    materials: MaterialLoader<WgpuTextures>,
    camera: PerspectiveCamera,
    crates: Vec<Entity<Model>>,
    lamps: Vec<Entity<Model>>,
    // one per lamp, same order
    lamp_lights: Vec<PointLight>,
    sun: DirectionalLight,
    torch: SpotLight,
}

impl MainGame {
    pub fn new(
        gpu: &GpuContext,
        resources: ResourceLoader,
        config: &SceneConfig,
    ) -> Result<Self, SceneError> {
        info!("Building scene from {}", resources.base_dir().display());
        let backend = WgpuTextures::new(gpu.device().clone(), gpu.queue().clone());
        let textures = TextureLoader::new(resources.clone(), backend)?;
        let renderer = PhongRenderer::new(gpu, textures.backend().material_layout())?;
        let mut materials = MaterialLoader::new(resources, textures);

        let mut rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        let cube = Rc::new(Mesh::cube(gpu.device()));

        let mut crates = Vec::with_capacity(config.crate_count);
        for _ in 0..config.crate_count {
            let model = Model::new(cube.clone(), materials.load(CRATE_MATERIAL)?);
            crates.push(scene::crate_entity(&mut rng, model, config.crate_size));
        }

        let mut lamps = Vec::with_capacity(config.lamp_count);
        let mut lamp_lights = Vec::with_capacity(config.lamp_count);
        for _ in 0..config.lamp_count {
            let model = Model::new(cube.clone(), materials.load(LAMP_MATERIAL)?);
            let lamp = scene::lamp_entity(&mut rng, model, config.lamp_size);
            lamp_lights.push(scene::lamp_light(lamp.position(), config.lamp_range));
            lamps.push(lamp);
        }

        let camera = PerspectiveCamera::new(
            Vector3::new(0.0, 0.0, 6.0),
            Vector3::unit(0.0, 0.0, -1.0),
            gpu.aspect_ratio(),
        );
        let torch = scene::torch(&camera);
        info!(
            "Scene ready: {} crates, {} lamps, {} materials",
            crates.len(),
            lamps.len(),
            materials.cached_count()
        );

        Ok(Self {
            renderer,
            materials,
            camera,
            crates,
            lamps,
            lamp_lights,
            sun: scene::sun(),
            torch,
        })
    }
}

impl Game for MainGame {
    fn process_input(&mut self, input: &mut InputHandler, delta_secs: f32) {
        input.apply_mouse_look(&mut self.camera);
        input.apply_movement(&mut self.camera, delta_secs);
        self.torch.position = self.camera.position();
        self.torch.direction = self.camera.direction();
    }

    fn update(&mut self, delta_secs: f32, elapsed_secs: f32) {
        for entity in &mut self.crates {
            entity.update(delta_secs, elapsed_secs);
        }
        for (lamp, light) in self.lamps.iter_mut().zip(&mut self.lamp_lights) {
            lamp.update(delta_secs, elapsed_secs);
            light.position = lamp.position();
        }
    }

    fn render(&mut self, gpu: &GpuContext) -> Result<(), GpuError> {
        let frame = FrameUniforms::new(&self.camera, &self.sun, std::slice::from_ref(&self.torch));
        let draws: Vec<Draw<'_>> = self
            .crates
            .iter()
            .chain(&self.lamps)
            .map(|entity| {
                let lights =
                    scene::closest_point_lights(entity.position(), &self.lamp_lights, MAX_POINT_LIGHTS);
                Draw {
                    model: entity.model(),
                    uniforms: DrawUniforms::new(entity.transform(), &lights),
                }
            })
            .collect();
        self.renderer.render(gpu, &frame, &draws)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width > 0 && size.height > 0 {
            self.camera
                .set_aspect_ratio(size.width as f32 / size.height as f32);
        }
    }

    fn destroy(&mut self) {
        info!("Releasing scene");
        for entity in self.crates.drain(..).chain(self.lamps.drain(..)) {
            if let Err(err) = self.materials.release(&entity.model().material) {
                warn!("Could not release {}: {err}", entity.model().material);
            }
        }
        self.lamp_lights.clear();
        if self.materials.cached_count() > 0 {
            warn!("{} materials still loaded after release", self.materials.cached_count());
        }
    }
}
