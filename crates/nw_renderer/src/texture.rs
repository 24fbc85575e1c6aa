//! Textures: colors as a function of surface UV and world position.

use std::sync::Arc;

use crate::perlin::Perlin;
use nw_core::{ImageData, TextureResult};
use nw_math::{Color, Interval, Vec3};
use rand::RngCore;

/// Color used in place of an image that could not be loaded.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Anything that can be evaluated to a color at a surface point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern selecting between two child textures.
///
/// The cell is picked by the sign of `sin(sx)·sin(sy)·sin(sz)`, so the
/// pattern lives in world space rather than UV space.
pub struct CheckerTexture {
    frequency: f64,
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub const DEFAULT_FREQUENCY: f64 = 10.0;

    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
            odd,
            even,
        }
    }

    pub fn from_colors(odd: Color, even: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(odd)), Arc::new(SolidColor::new(even)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        let f = self.frequency;
        let sines = (f * p.x).sin() * (f * p.y).sin() * (f * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// How `NoiseTexture` turns the noise field into a gray level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseStyle {
    /// `0.5 * (1 + noise(scale * p))`
    Smooth,
    /// `turbulence(scale * p)`
    Turbulence,
    /// Sine bands along z, phase-shifted by turbulence.
    #[default]
    Marble,
}

/// Procedural gray pattern driven by Perlin noise.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
    style: NoiseStyle,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
            style: NoiseStyle::default(),
        }
    }

    pub fn with_style(mut self, style: NoiseStyle) -> Self {
        self.style = style;
        self
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Vec3) -> Color {
        let gray = match self.style {
            NoiseStyle::Smooth => 0.5 * (1.0 + self.noise.noise(self.scale * p)),
            NoiseStyle::Turbulence => self.noise.turbulence_default(self.scale * p),
            NoiseStyle::Marble => {
                0.5 * (1.0 + (self.scale * p.z + 10.0 * self.noise.turbulence_default(p)).sin())
            }
        };
        Color::splat(gray)
    }
}

/// Texture backed by a decoded image, addressed by surface UV.
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image: Some(image) }
    }

    /// Build from the outcome of an image load.
    ///
    /// A failed load is logged and the texture renders as
    /// `MISSING_TEXTURE_COLOR`; it never stops the render.
    pub fn from_load(result: TextureResult<Arc<ImageData>>) -> Self {
        match result {
            Ok(image) => Self::new(image),
            Err(err) => {
                log::warn!("{}; using fallback color", err);
                Self { image: None }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Vec3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_TEXTURE_COLOR;
        };

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Image rows run top to bottom, v runs bottom to top.
        let v = 1.0 - unit.clamp(v);

        let x = (u * image.width() as f64) as u32;
        let y = (v * image.height() as f64) as u32;
        let [r, g, b] = image.pixel(x, y);

        const COLOR_SCALE: f64 = 1.0 / 255.0;
        Color::new(r as f64, g as f64, b as f64) * COLOR_SCALE
    }
}
