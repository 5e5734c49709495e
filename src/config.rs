//! Application settings, read from `lamplight.yml` (or the file named by
//! `LAMPLIGHT_CONFIG`). Every field is optional; a missing file means all
//! defaults.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "lamplight.yml";
pub const CONFIG_ENV_VAR: &str = "LAMPLIGHT_CONFIG";

/// Crates and lamps together. Each one takes a slot in the per-draw
/// uniform buffer, whose offsets are 32-bit.
pub const MAX_SCENE_ENTITIES: usize = 65_536;

/// Where [`AppConfig::load`] found its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Learning OpenGL".into(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub crate_count: usize,
    pub crate_size: f32,
    pub lamp_count: usize,
    pub lamp_size: f32,
    /// Distance at which a lamp's light has faded out.
    pub lamp_range: f32,
    /// Fixed seed for a reproducible scene.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            crate_count: 400,
            crate_size: 0.375,
            lamp_count: 100,
            lamp_size: 0.1,
            lamp_range: 30.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub resource_dir: PathBuf,
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            scene: SceneConfig::default(),
            resource_dir: PathBuf::from("res"),
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Loads from `LAMPLIGHT_CONFIG` if set, else `lamplight.yml`. Runs
    /// before logging is up, so the caller reports the source.
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        Self::load_from(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            Path::new(DEFAULT_CONFIG_FILE),
        )
    }

    /// An explicit path must exist; the fallback may be missing.
    fn load_from(explicit: Option<PathBuf>, fallback: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        match explicit {
            Some(path) => Ok((Self::from_file(&path)?, ConfigSource::File(path))),
            None if fallback.exists() => Ok((
                Self::from_file(fallback)?,
                ConfigSource::File(fallback.to_owned()),
            )),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_owned(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // an empty document deserialises as unit, not as an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid(
                "window",
                format!("{}x{} has no area", self.window.width, self.window.height),
            ));
        }
        positive("scene.crate_size", self.scene.crate_size)?;
        positive("scene.lamp_size", self.scene.lamp_size)?;
        positive("scene.lamp_range", self.scene.lamp_range)?;
        let entities = self.scene.crate_count.saturating_add(self.scene.lamp_count);
        if entities > MAX_SCENE_ENTITIES {
            return Err(invalid(
                "scene",
                format!("{entities} crates and lamps exceed the limit of {MAX_SCENE_ENTITIES}"),
            ));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not a positive number")))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
