//! Texture image loading and caching.
//!
//! Images are decoded through the `image` crate into tightly packed RGB8
//! buffers. The renderer samples them as-is (bytes scaled to 0-1), so no
//! color space conversion happens here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while loading a texture image.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    InvalidSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

pub type TextureResult<T> = Result<T, TextureError>;

const BYTES_PER_PIXEL: usize = 3;

/// A decoded image: row-major RGB8, top row first.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap an existing RGB8 buffer.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }

        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(TextureError::InvalidSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes at integer coordinates, clamped to the image edges.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

/// Decode an image file into RGB8.
pub fn load_image(path: impl AsRef<Path>) -> TextureResult<ImageData> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: path.display().to_string(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    ImageData::from_rgb(width, height, rgb.into_raw())
}

/// Cache of decoded images keyed by the path they were requested with.
///
/// Scenes reuse the same picture for several objects; this keeps one copy.
pub struct ImageCache {
    images: HashMap<String, Arc<ImageData>>,
    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image, using the cache if it was decoded before.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<ImageData>> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }

        let full_path = self.resolve_path(path);
        let image = Arc::new(load_image(&full_path)?);
        self.images.insert(path.to_string(), image.clone());

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            full_path.display(),
            image.width(),
            image.height(),
            image.size_bytes() as f64 / 1024.0
        );

        Ok(image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nw_core_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_from_rgb_rejects_wrong_length() {
        let err = ImageData::from_rgb(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::InvalidSize {
                expected: 12,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_from_rgb_rejects_zero_size() {
        assert!(matches!(
            ImageData::from_rgb(0, 4, vec![]),
            Err(TextureError::Empty { .. })
        ));
    }

    #[test]
    fn test_pixel_clamps_to_edges() {
        let image = ImageData::from_rgb(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
        assert_eq!(image.pixel(0, 0), [10, 20, 30]);
        assert_eq!(image.pixel(1, 0), [40, 50, 60]);
        assert_eq!(image.pixel(9, 9), [40, 50, 60]);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut cache = ImageCache::with_base_dir(scratch_dir("missing"));
        let result = cache.load("does_not_exist.png");
        assert!(matches!(result, Err(TextureError::Load { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_loads_once() {
        let dir = scratch_dir("cache");
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([255, 128, 0]));
        img.save(dir.join("tiny.png")).unwrap();

        let mut cache = ImageCache::with_base_dir(&dir);
        let first = cache.load("tiny.png").unwrap();
        let second = cache.load("tiny.png").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!((first.width(), first.height()), (3, 2));
        assert_eq!(first.pixel(2, 1), [255, 128, 0]);
        assert_eq!(first.pixel(0, 0), [0, 0, 0]);
    }
}
