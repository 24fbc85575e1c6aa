//! Shared services for the path tracer that sit outside the render loop.
//!
//! Currently this is texture image decoding: files are decoded once into
//! plain RGB8 buffers and shared between textures through `ImageCache`.
//!
//! # Example
//!
//! ```ignore
//! use nw_core::ImageCache;
//!
//! let mut cache = ImageCache::with_base_dir("assets");
//! let earth = cache.load("earthmap.jpg")?;
//! println!("{}x{}", earth.width(), earth.height());
//! ```

pub mod image_data;

pub use image_data::{load_image, ImageCache, ImageData, TextureError, TextureResult};
