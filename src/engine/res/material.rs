use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use log::{debug, warn};
use serde::Deserialize;

use super::{ResourceError, ResourceLoader, Texture, TextureBackend, TextureDescription, TextureLoader};
use crate::engine::util::RefCache;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialDescription {
    pub name: String,
    pub ambient: TextureDescription,
    pub diffuse: TextureDescription,
    pub specular: TextureDescription,
    pub emission: TextureDescription,
    pub shininess: f32,
}

/// Texture binding slot of each material map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Ambient = 0,
    Diffuse = 1,
    Specular = 2,
    Emission = 3,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Ambient,
        TextureSlot::Diffuse,
        TextureSlot::Specular,
        TextureSlot::Emission,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }
}

pub struct Material<B: TextureBackend> {
    name: String,
    maps: [Rc<Texture<B>>; 4],
    shininess: f32,
    binding: B::Binding,
}

impl<B: TextureBackend> Material<B> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map(&self, slot: TextureSlot) -> &Rc<Texture<B>> {
        &self.maps[slot as usize]
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn binding(&self) -> &B::Binding {
        &self.binding
    }
}

impl<B: TextureBackend> PartialEq for Material<B> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<B: TextureBackend> Eq for Material<B> {}

impl<B: TextureBackend> Hash for Material<B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<B: TextureBackend> fmt::Debug for Material<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("name", &self.name)
            .field("maps", &self.maps)
            .field("shininess", &self.shininess)
            .finish_non_exhaustive()
    }
}

impl<B: TextureBackend> fmt::Display for Material<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Material{{{}}}", self.name)
    }
}

/// Materials are YAML files under the resource directory, cached by file
/// name. Each owns one reference to each of its four textures.
pub struct MaterialLoader<B: TextureBackend> {
    resources: ResourceLoader,
    textures: TextureLoader<B>,
    materials: RefCache<String, Material<B>>,
}

impl<B: TextureBackend> MaterialLoader<B> {
    pub fn new(resources: ResourceLoader, textures: TextureLoader<B>) -> Self {
        Self {
            resources,
            textures,
            materials: RefCache::new(),
        }
    }

    pub fn textures(&self) -> &TextureLoader<B> {
        &self.textures
    }

    pub fn load(&mut self, name: &str) -> Result<Rc<Material<B>>, ResourceError> {
        let Self {
            resources,
            textures,
            materials,
        } = self;
        materials.acquire(&name.to_owned(), |name| {
            let desc: MaterialDescription = resources.load_yaml(name)?;
            if desc.name != *name {
                return Err(ResourceError::NameMismatch {
                    expected: name.clone(),
                    actual: desc.name,
                });
            }
            let material = load_material(textures, desc)?;
            debug!("Loaded {material}");
            Ok(material)
        })
    }

    /// Returns a reference. The last one releases the material's textures.
    pub fn release(&mut self, material: &Rc<Material<B>>) -> Result<(), ResourceError> {
        let Some(material) = self.materials.release(&material.name, material)? else {
            return Ok(());
        };
        debug!("Unloading {material}");
        release_all(&mut self.textures, &material.maps)
    }

    pub fn cached_count(&self) -> usize {
        self.materials.len()
    }
}

fn load_material<B: TextureBackend>(
    textures: &mut TextureLoader<B>,
    desc: MaterialDescription,
) -> Result<Material<B>, ResourceError> {
    let mut maps = Vec::with_capacity(TextureSlot::ALL.len());
    for map in [&desc.ambient, &desc.diffuse, &desc.specular, &desc.emission] {
        match textures.load(map) {
            Ok(texture) => maps.push(texture),
            Err(err) => {
                let _ = release_all(textures, &maps);
                return Err(err);
            }
        }
    }

    let maps: [Rc<Texture<B>>; 4] = maps
        .try_into()
        .map_err(|_| ResourceError::InvalidDescription(format!("{} needs four maps", desc.name)))?;

    let handles = maps.each_ref().map(|map| map.handle());
    let binding = match textures.backend_mut().bind_material(&desc.name, handles, desc.shininess) {
        Ok(binding) => binding,
        Err(err) => {
            let _ = release_all(textures, &maps);
            return Err(err);
        }
    };

    Ok(Material {
        name: desc.name,
        maps,
        shininess: desc.shininess,
        binding,
    })
}

/// Releases every map even when one fails, returning the first error.
fn release_all<B: TextureBackend>(
    textures: &mut TextureLoader<B>,
    maps: &[Rc<Texture<B>>],
) -> Result<(), ResourceError> {
    let mut first_error = None;
    for map in maps {
        if let Err(err) = textures.release(map) {
            warn!("Could not release {map}: {err}");
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}
