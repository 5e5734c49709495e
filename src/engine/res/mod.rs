//! Loading of files under the resource directory and the ref-counted
//! texture and material caches built on top of it.

mod material;
mod texture;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

pub use material::{Material, MaterialDescription, MaterialLoader, TextureSlot};
pub use texture::{Texture, TextureBackend, TextureDescription, TextureLoader, TexturePixels, TextureSource};

use crate::engine::util::RefCountError;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource not found: \"{}\"", .0.display())]
    NotFound(PathBuf),

    #[error("unable to read \"{}\"", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported or corrupt image \"{}\"", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unable to parse YAML resource \"{}\" as a {type_name}", .path.display())]
    Yaml {
        path: PathBuf,
        type_name: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("expected material \"{expected}\" but the file describes \"{actual}\"")]
    NameMismatch { expected: String, actual: String },

    #[error("invalid resource description: {0}")]
    InvalidDescription(String),

    #[error("GPU upload failed: {0}")]
    Backend(String),

    #[error(transparent)]
    RefCount(#[from] RefCountError),
}

/// Resolves resource names against a base directory and decodes them.
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    base_dir: PathBuf,
}

impl ResourceLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn load_image(&self, name: &str) -> Result<image::DynamicImage, ResourceError> {
        let path = self.existing_path(name)?;
        debug!("Loading image {}", path.display());
        image::open(&path).map_err(|source| match source {
            image::ImageError::IoError(source) => ResourceError::Io { path, source },
            source => ResourceError::Image { path, source },
        })
    }

    pub fn load_text(&self, name: &str) -> Result<String, ResourceError> {
        let path = self.existing_path(name)?;
        fs::read_to_string(&path).map_err(|source| ResourceError::Io { path, source })
    }

    pub fn load_yaml<T: DeserializeOwned>(&self, name: &str) -> Result<T, ResourceError> {
        let text = self.load_text(name)?;
        serde_yaml::from_str(&text).map_err(|source| ResourceError::Yaml {
            path: self.path(name),
            type_name: std::any::type_name::<T>(),
            source,
        })
    }

    fn existing_path(&self, name: &str) -> Result<PathBuf, ResourceError> {
        let path = self.path(name);
        if !path.is_file() {
            return Err(ResourceError::NotFound(path));
        }
        Ok(path)
    }
}
