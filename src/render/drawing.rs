//! The imported drawing as an image asset that can be resized, fitted and
//! laid over the background map.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::{Result, RouteArtError};
use crate::geo::view::MAX_DIMENSION;

/// Target size for [`DrawingImage::resize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageSize {
    Absolute { width: u32, height: u32 },
    Relative(f64),
}

impl ImageSize {
    /// Pixel size for an image of `width` x `height`, each side kept in
    /// `1..=MAX_DIMENSION`.
    fn resolve(self, width: u32, height: u32) -> Result<(u32, u32)> {
        let (width, height) = match self {
            ImageSize::Absolute { width, height } => (width, height),
            ImageSize::Relative(factor) => {
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(RouteArtError::invalid(
                        "factor",
                        format!("must be a finite number greater than 0, got {factor}"),
                    ));
                }
                let scale = |side: u32| (f64::from(side) * factor).min(f64::from(MAX_DIMENSION)) as u32;
                (scale(width), scale(height))
            }
        };
        Ok((width.clamp(1, MAX_DIMENSION), height.clamp(1, MAX_DIMENSION)))
    }
}

pub struct DrawingImage {
    path: Option<PathBuf>,
    image: Option<RgbaImage>,
    alpha: f32,
}

impl Default for DrawingImage {
    fn default() -> Self {
        Self {
            path: None,
            image: None,
            alpha: 1.0,
        }
    }
}

impl DrawingImage {
    /// Placeholder with no file behind it; every image operation fails
    /// with `MissingPath` until [`reload`](Self::reload) is called.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut drawing = Self::default();
        drawing.reload(path)?;
        Ok(drawing)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(RgbaImage::dimensions)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn reload(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.image = Some(image::open(&path)?.to_rgba8());
        self.path = Some(path);
        Ok(())
    }

    /// Resize from the original file so repeated resizes do not compound
    /// resampling loss.
    pub fn resize(&mut self, size: ImageSize) -> Result<()> {
        let path = self.require_path()?.to_path_buf();
        let original = image::open(&path)?.to_rgba8();
        let (width, height) = size.resolve(original.width(), original.height())?;
        self.image = Some(imageops::resize(&original, width, height, FilterType::Triangle));
        Ok(())
    }

    /// Scale uniformly to the largest size that fits inside the rect.
    pub fn fit_to_rect(&mut self, rect_width: u32, rect_height: u32) -> Result<()> {
        self.require_path()?;
        let (width, height) = self.loaded()?.dimensions();

        let x_ratio = f64::from(rect_width) / f64::from(width);
        let y_ratio = f64::from(rect_height) / f64::from(height);
        let target = if x_ratio < y_ratio {
            ImageSize::Absolute {
                width: rect_width,
                height: (f64::from(height) * x_ratio) as u32,
            }
        } else {
            ImageSize::Absolute {
                width: (f64::from(width) * y_ratio) as u32,
                height: rect_height,
            }
        };
        self.resize(target)
    }

    /// Current pixels with the configured alpha applied.
    pub fn render(&self) -> Result<RgbaImage> {
        self.require_path()?;
        let mut out = self.loaded()?.clone();
        if self.alpha < 1.0 {
            for pixel in out.pixels_mut() {
                pixel.0[3] = (f32::from(pixel.0[3]) * self.alpha).round() as u8;
            }
        }
        Ok(out)
    }

    /// Draw this image centered on top of `background`.
    pub fn overlay_on(&self, background: &RgbaImage) -> Result<RgbaImage> {
        let top = self.render()?;
        let mut out = background.clone();
        let x = (i64::from(background.width()) - i64::from(top.width())) / 2;
        let y = (i64::from(background.height()) - i64::from(top.height())) / 2;
        imageops::overlay(&mut out, &top, x, y);
        Ok(out)
    }

    fn require_path(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .ok_or(RouteArtError::MissingPath("drawing image"))
    }

    fn loaded(&self) -> Result<&RgbaImage> {
        self.image
            .as_ref()
            .ok_or(RouteArtError::MissingPath("drawing image"))
    }
}
