//! Owned pixel buffers handed between pipeline stages
//!
//! A [`RasterBitmap`] is produced by exactly one stage and then moved into the
//! next; stages never mutate a bitmap they did not create.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};

/// Pixel encoding of a [`RasterBitmap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Four 8-bit channels, straight alpha
    Rgba8,
    /// One 8-bit luma channel
    Gray8,
}

/// Width×height pixel buffer with a top-left origin, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterBitmap {
    /// Color buffer
    Rgba(RgbaImage),
    /// Single-channel gray buffer
    Gray(GrayImage),
}

impl RasterBitmap {
    /// Width in pixels
    pub fn width(&self) -> u32 {
        match self {
            Self::Rgba(img) => img.width(),
            Self::Gray(img) => img.width(),
        }
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        match self {
            Self::Rgba(img) => img.height(),
            Self::Gray(img) => img.height(),
        }
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Encoding of the underlying buffer
    pub const fn pixel_format(&self) -> PixelFormat {
        match self {
            Self::Rgba(_) => PixelFormat::Rgba8,
            Self::Gray(_) => PixelFormat::Gray8,
        }
    }

    /// Color at a pixel, or `None` outside the image
    ///
    /// Gray pixels are expanded to opaque RGBA.
    pub fn rgba(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        match self {
            Self::Rgba(img) => img.get_pixel_checked(x, y).copied(),
            Self::Gray(img) => img
                .get_pixel_checked(x, y)
                .map(|p| Rgba([p.0[0], p.0[0], p.0[0], u8::MAX])),
        }
    }

    /// Luma at a pixel, or `None` outside the image
    pub fn luma(&self, x: i64, y: i64) -> Option<u8> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        match self {
            Self::Rgba(img) => img
                .get_pixel_checked(x, y)
                .map(|p| image::Pixel::to_luma(p).0[0]),
            Self::Gray(img) => img.get_pixel_checked(x, y).map(|p| p.0[0]),
        }
    }

    /// Desaturated copy of the buffer
    pub fn to_gray(&self) -> GrayImage {
        match self {
            Self::Rgba(img) => imageops::grayscale(img),
            Self::Gray(img) => img.clone(),
        }
    }

    /// Color copy of the buffer
    pub fn to_rgba(&self) -> RgbaImage {
        match self {
            Self::Rgba(img) => img.clone(),
            Self::Gray(img) => DynamicImage::ImageLuma8(img.clone()).to_rgba8(),
        }
    }

    /// Borrow the color buffer if this bitmap is RGBA
    pub const fn as_rgba(&self) -> Option<&RgbaImage> {
        match self {
            Self::Rgba(img) => Some(img),
            Self::Gray(_) => None,
        }
    }

    /// Borrow the gray buffer if this bitmap is single-channel
    pub const fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            Self::Gray(img) => Some(img),
            Self::Rgba(_) => None,
        }
    }

    /// Downscale so the longest side is at most `max_size`
    ///
    /// Aspect ratio is preserved and images are never upscaled. A bitmap that
    /// already fits is returned unchanged.
    #[must_use]
    pub fn fit_within(self, max_size: u32) -> Self {
        let (width, height) = self.dimensions();
        let longest = width.max(height);
        if max_size == 0 || longest <= max_size {
            return self;
        }

        let scale = f64::from(max_size) / f64::from(longest);
        let new_width = ((f64::from(width) * scale).round() as u32).max(1);
        let new_height = ((f64::from(height) * scale).round() as u32).max(1);

        log::debug!("Resizing source from {width}x{height} to {new_width}x{new_height}");

        match self {
            Self::Rgba(img) => Self::Rgba(imageops::resize(
                &img,
                new_width,
                new_height,
                FilterType::Triangle,
            )),
            Self::Gray(img) => Self::Gray(imageops::resize(
                &img,
                new_width,
                new_height,
                FilterType::Triangle,
            )),
        }
    }
}

impl From<RgbaImage> for RasterBitmap {
    fn from(img: RgbaImage) -> Self {
        Self::Rgba(img)
    }
}

impl From<GrayImage> for RasterBitmap {
    fn from(img: GrayImage) -> Self {
        Self::Gray(img)
    }
}

impl From<DynamicImage> for RasterBitmap {
    fn from(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(gray) => Self::Gray(gray),
            DynamicImage::ImageRgba8(rgba) => Self::Rgba(rgba),
            other => Self::Rgba(other.to_rgba8()),
        }
    }
}
