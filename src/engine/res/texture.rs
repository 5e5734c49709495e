use std::fmt;
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use super::{ResourceError, ResourceLoader};
use crate::engine::math::{Color3, Color4};
use crate::engine::util::RefCache;

const COLOR_TEXTURE_WIDTH: u32 = 4;
const COLOR_TEXTURE_HEIGHT: u32 = 4;

/// Where the GPU side of the textures lives. Everything above this seam is
/// plain bookkeeping.
pub trait TextureBackend {
    type Handle;
    type Binding;

    fn upload(&mut self, pixels: &TexturePixels) -> Result<Self::Handle, ResourceError>;

    fn unload(&mut self, handle: &Self::Handle);

    /// Binds four maps, in slot order, and a shininess into one material
    /// binding.
    fn bind_material(
        &mut self,
        name: &str,
        maps: [&Self::Handle; 4],
        shininess: f32,
    ) -> Result<Self::Binding, ResourceError>;
}

/// Tightly packed RGBA8 texels. Textures without alpha have every alpha
/// byte set to 255.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePixels {
    pub width: u32,
    pub height: u32,
    pub use_alpha: bool,
    pub rgba: Vec<u8>,
}

impl TexturePixels {
    pub fn from_image(img: &image::DynamicImage, use_alpha: bool) -> Self {
        let img = img.to_rgba8();
        let (width, height) = img.dimensions();
        let mut rgba = img.into_raw();
        if !use_alpha {
            rgba.chunks_exact_mut(4).for_each(|px| px[3] = u8::MAX);
        }
        Self {
            width,
            height,
            use_alpha,
            rgba,
        }
    }

    pub fn solid(color: Color4, width: u32, height: u32, use_alpha: bool) -> Self {
        let mut texel = color.to_rgba8();
        if !use_alpha {
            texel[3] = u8::MAX;
        }
        Self {
            width,
            height,
            use_alpha,
            rgba: texel.repeat((width * height) as usize),
        }
    }
}

/// How a texture map is described in a material file, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TextureDescription {
    Image {
        name: String,
        #[serde(default, rename = "useAlpha")]
        use_alpha: bool,
    },
    Color {
        color: Vec<f32>,
    },
    None,
}

impl TextureDescription {
    pub fn color(&self) -> Result<Option<Color4>, ResourceError> {
        let Self::Color { color } = self else {
            return Ok(None);
        };
        match color.as_slice() {
            &[r, g, b, a] => finite_color(Color4::rgba(r, g, b, a)).map(Some),
            other => Err(ResourceError::InvalidDescription(format!(
                "colour needs exactly 4 components, got {other:?}"
            ))),
        }
    }
}

/// Colours are cache keys, and a NaN key could never be found again.
fn finite_color(color: Color4) -> Result<Color4, ResourceError> {
    if color.to_array().iter().all(|c| c.is_finite()) {
        Ok(color)
    } else {
        Err(ResourceError::InvalidDescription(format!(
            "colour components must be finite, got {color}"
        )))
    }
}

/// What a texture was made from; also the key it is cached under.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    Image(String),
    Color(Color4),
    Empty,
}

pub struct Texture<B: TextureBackend> {
    source: TextureSource,
    width: u32,
    height: u32,
    use_alpha: bool,
    handle: B::Handle,
}

impl<B: TextureBackend> Texture<B> {
    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn use_alpha(&self) -> bool {
        self.use_alpha
    }

    pub fn handle(&self) -> &B::Handle {
        &self.handle
    }
}

impl<B: TextureBackend> fmt::Debug for Texture<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("source", &self.source)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("use_alpha", &self.use_alpha)
            .finish_non_exhaustive()
    }
}

impl<B: TextureBackend> fmt::Display for Texture<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            TextureSource::Image(name) => write!(f, "ImageTexture{{{name}}}"),
            TextureSource::Color(color) => write!(f, "ColorTexture{{{color}}}"),
            TextureSource::Empty => f.write_str("EmptyTexture"),
        }
    }
}

/// Uploads textures once and shares them between everyone asking for the
/// same image or colour.
pub struct TextureLoader<B: TextureBackend> {
    resources: ResourceLoader,
    backend: B,
    images: RefCache<String, Texture<B>>,
    colors: RefCache<Color4, Texture<B>>,
    empty: Rc<Texture<B>>,
}

impl<B: TextureBackend> TextureLoader<B> {
    pub fn new(resources: ResourceLoader, mut backend: B) -> Result<Self, ResourceError> {
        let pixels = TexturePixels::solid(Color4::TRANSPARENT, 1, 1, true);
        let empty = Rc::new(Texture {
            source: TextureSource::Empty,
            width: pixels.width,
            height: pixels.height,
            use_alpha: true,
            handle: backend.upload(&pixels)?,
        });
        Ok(Self {
            resources,
            backend,
            images: RefCache::new(),
            colors: RefCache::new(),
            empty,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn load(&mut self, description: &TextureDescription) -> Result<Rc<Texture<B>>, ResourceError> {
        match description {
            TextureDescription::Image { name, use_alpha } => self.load_image(name, *use_alpha),
            TextureDescription::Color { .. } => match description.color()? {
                Some(color) => self.load_color(color),
                None => Ok(self.empty()),
            },
            TextureDescription::None => Ok(self.empty()),
        }
    }

    pub fn load_image(&mut self, name: &str, use_alpha: bool) -> Result<Rc<Texture<B>>, ResourceError> {
        let Self {
            resources,
            backend,
            images,
            ..
        } = self;
        images.acquire(&name.to_owned(), |name| {
            let img = resources.load_image(name)?;
            let pixels = TexturePixels::from_image(&img, use_alpha);
            debug!("Uploading image texture {name} ({}x{})", pixels.width, pixels.height);
            Ok(Texture {
                source: TextureSource::Image(name.clone()),
                width: pixels.width,
                height: pixels.height,
                use_alpha,
                handle: backend.upload(&pixels)?,
            })
        })
    }

    /// Opaque solid colour.
    pub fn load_color3(&mut self, color: Color3) -> Result<Rc<Texture<B>>, ResourceError> {
        self.load_color(Color4::from_rgb(color, 1.0))
    }

    /// Solid colour; the alpha channel is kept only when it is not 1.
    pub fn load_color(&mut self, color: Color4) -> Result<Rc<Texture<B>>, ResourceError> {
        let color = finite_color(color)?;
        let use_alpha = !color.is_opaque();
        let backend = &mut self.backend;
        self.colors.acquire(&color, |color| {
            let pixels = TexturePixels::solid(*color, COLOR_TEXTURE_WIDTH, COLOR_TEXTURE_HEIGHT, use_alpha);
            debug!("Uploading colour texture {color}");
            Ok(Texture {
                source: TextureSource::Color(*color),
                width: pixels.width,
                height: pixels.height,
                use_alpha,
                handle: backend.upload(&pixels)?,
            })
        })
    }

    /// The shared placeholder for unused maps. It is never counted.
    pub fn empty(&self) -> Rc<Texture<B>> {
        Rc::clone(&self.empty)
    }

    /// Returns a reference, unloading the texture when it was the last one.
    pub fn release(&mut self, texture: &Rc<Texture<B>>) -> Result<(), ResourceError> {
        let unloaded = match &texture.source {
            TextureSource::Image(name) => self.images.release(name, texture)?,
            TextureSource::Color(color) => self.colors.release(color, texture)?,
            TextureSource::Empty => None,
        };
        if let Some(texture) = unloaded {
            debug!("Unloading {texture}");
            self.backend.unload(&texture.handle);
        }
        Ok(())
    }

    /// Number of distinct textures currently uploaded, the empty one aside.
    pub fn cached_count(&self) -> usize {
        self.images.len() + self.colors.len()
    }
}

impl<B: TextureBackend> Drop for TextureLoader<B> {
    fn drop(&mut self) {
        self.backend.unload(&self.empty.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::res::mock::MockBackend;

    fn loader() -> TextureLoader<MockBackend> {
        TextureLoader::new(ResourceLoader::new("res"), MockBackend::default()).unwrap()
    }

    fn loader_with_image(name: &str) -> (tempfile::TempDir, TextureLoader<MockBackend>) {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 10]))
            .save(dir.path().join(name))
            .unwrap();
        let loader = TextureLoader::new(ResourceLoader::new(dir.path()), MockBackend::default()).unwrap();
        (dir, loader)
    }

    // ── descriptions ──

    #[test]
    fn parses_every_description_type() {
        let image: TextureDescription = serde_yaml::from_str("type: image\nname: crate.png\nuseAlpha: true").unwrap();
        assert_eq!(
            image,
            TextureDescription::Image { name: "crate.png".into(), use_alpha: true }
        );

        let plain: TextureDescription = serde_yaml::from_str("type: image\nname: crate.png").unwrap();
        assert_eq!(
            plain,
            TextureDescription::Image { name: "crate.png".into(), use_alpha: false }
        );

        let color: TextureDescription = serde_yaml::from_str("type: color\ncolor: [1, 0.5, 0, 1]").unwrap();
        assert_eq!(color.color().unwrap(), Some(Color4::rgba(1.0, 0.5, 0.0, 1.0)));

        let none: TextureDescription = serde_yaml::from_str("type: none").unwrap();
        assert_eq!(none, TextureDescription::None);
    }

    #[test]
    fn colour_must_have_four_components() {
        let short: TextureDescription = serde_yaml::from_str("type: color\ncolor: [1, 0.5, 0]").unwrap();
        assert!(matches!(short.color(), Err(ResourceError::InvalidDescription(_))));
        assert!(loader().load(&short).is_err());
    }

    #[test]
    fn colour_must_be_finite() {
        let nan: TextureDescription = serde_yaml::from_str("type: color\ncolor: [.nan, 0, 0, 1]").unwrap();
        assert!(matches!(nan.color(), Err(ResourceError::InvalidDescription(_))));

        let mut loader = loader();
        assert!(loader.load(&nan).is_err());
        assert!(loader.load_color(Color4::rgba(0.0, f32::INFINITY, 0.0, 1.0)).is_err());
        assert_eq!(loader.cached_count(), 0);
        assert_eq!(loader.backend().uploads.borrow().len(), 1); // empty only
    }

    // ── colour textures ──

    #[test]
    fn same_colour_is_uploaded_once() {
        let mut loader = loader();
        let a = loader.load_color(Color4::rgba(1.0, 0.0, 0.0, 1.0)).unwrap();
        let b = loader.load_color3(Color3::rgb(1.0, 0.0, 0.0)).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(loader.backend().uploads.borrow().len(), 2); // empty + red
        assert_eq!(loader.cached_count(), 1);
    }

    #[test]
    fn colour_textures_are_small_and_solid() {
        let mut loader = loader();
        let tex = loader.load_color(Color4::rgba(1.0, 0.0, 0.0, 1.0)).unwrap();
        assert_eq!((tex.width(), tex.height()), (4, 4));
        assert!(!tex.use_alpha());

        let uploads = loader.backend().uploads.borrow();
        let pixels = uploads.last().unwrap();
        assert_eq!(pixels.rgba.len(), 4 * 4 * 4);
        assert!(pixels.rgba.chunks(4).all(|px| px == [255, 0, 0, 255]));
    }

    #[test]
    fn translucent_colour_keeps_its_alpha() {
        let mut loader = loader();
        let tex = loader.load_color(Color4::rgba(0.0, 0.0, 1.0, 0.5)).unwrap();
        assert!(tex.use_alpha());
        let uploads = loader.backend().uploads.borrow();
        assert_eq!(&uploads.last().unwrap().rgba[..4], &[0, 0, 255, 128]);
    }

    #[test]
    fn last_release_unloads_the_colour() {
        let mut loader = loader();
        let a = loader.load_color3(Color3::WHITE).unwrap();
        let b = loader.load_color3(Color3::WHITE).unwrap();
        let id = *a.handle();

        loader.release(&a).unwrap();
        assert!(loader.backend().live.borrow().contains(&id));
        loader.release(&b).unwrap();
        assert!(!loader.backend().live.borrow().contains(&id));
        assert_eq!(loader.cached_count(), 0);
    }

    #[test]
    fn releasing_too_often_fails() {
        let mut loader = loader();
        let a = loader.load_color3(Color3::WHITE).unwrap();
        loader.release(&a).unwrap();
        assert!(matches!(loader.release(&a), Err(ResourceError::RefCount(_))));
    }

    // ── empty texture ──

    #[test]
    fn none_description_is_the_shared_empty_texture() {
        let mut loader = loader();
        let a = loader.load(&TextureDescription::None).unwrap();
        let b = loader.empty();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.source(), &TextureSource::Empty);
        assert_eq!(a.to_string(), "EmptyTexture");
    }

    #[test]
    fn releasing_the_empty_texture_is_a_no_op() {
        let mut loader = loader();
        let empty = loader.empty();
        for _ in 0..3 {
            loader.release(&empty).unwrap();
        }
        assert!(loader.backend().live.borrow().contains(empty.handle()));
    }

    // ── image textures ──

    #[test]
    fn image_is_loaded_once_by_name() {
        let (_dir, mut loader) = loader_with_image("crate.png");
        let a = loader.load_image("crate.png", false).unwrap();
        let b = loader.load(&TextureDescription::Image { name: "crate.png".into(), use_alpha: false }).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.to_string(), "ImageTexture{crate.png}");
        assert_eq!((a.width(), a.height()), (2, 2));
    }

    #[test]
    fn image_without_alpha_is_made_opaque() {
        let (_dir, mut loader) = loader_with_image("glass.png");
        loader.load_image("glass.png", false).unwrap();
        let uploads = loader.backend().uploads.borrow();
        assert!(uploads.last().unwrap().rgba.chunks(4).all(|px| px == [200, 100, 50, 255]));
    }

    #[test]
    fn image_with_alpha_keeps_it() {
        let (_dir, mut loader) = loader_with_image("glass.png");
        loader.load_image("glass.png", true).unwrap();
        let uploads = loader.backend().uploads.borrow();
        assert!(uploads.last().unwrap().rgba.chunks(4).all(|px| px == [200, 100, 50, 10]));
    }

    #[test]
    fn missing_image_is_not_cached() {
        let (_dir, mut loader) = loader_with_image("crate.png");
        assert!(matches!(
            loader.load_image("missing.png", false),
            Err(ResourceError::NotFound(_))
        ));
        assert_eq!(loader.cached_count(), 0);
    }

    #[test]
    fn failed_upload_is_not_cached() {
        let mut loader = loader();
        loader.backend_mut().fail_uploads = true;
        assert!(matches!(
            loader.load_color3(Color3::WHITE),
            Err(ResourceError::Backend(_))
        ));
        assert_eq!(loader.cached_count(), 0);
    }
}
